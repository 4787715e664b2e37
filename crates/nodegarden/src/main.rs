use std::io;
use std::time::{Duration, Instant};

use crossterm::{
    event::{
        self, DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture,
        Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
        MouseEventKind,
    },
    execute,
};
use nodegarden_background::{BackgroundSettings, BackgroundState, to_terminal_color};
use nodegarden_config::Config;
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Constraint, Flex, Layout, Rect},
    style::{Style, Stylize},
    text::Line,
    widgets::{Block, Clear, Paragraph},
};

mod logging;

/// Time between event polls, roughly one display frame.
const POLL_INTERVAL: Duration = Duration::from_millis(16);

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    logging::init()?;

    let config = Config::load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "failed to load config, using defaults");
        Config::default()
    });

    let terminal = ratatui::init();
    let result = execute!(io::stdout(), EnableMouseCapture, EnableFocusChange)
        .map_err(Into::into)
        .and_then(|()| App::new(config).run(terminal));
    if let Err(e) = execute!(io::stdout(), DisableFocusChange, DisableMouseCapture) {
        tracing::warn!(error = %e, "failed to release mouse capture");
    }
    ratatui::restore();
    result
}

/// The main application which holds the state and logic of the application.
#[derive(Debug)]
pub struct App {
    /// Is the application running?
    running: bool,
    /// Settings persisted between runs.
    config: Config,
    /// Animation drawn behind the card.
    background: BackgroundState,
}

impl App {
    /// Construct a new instance of [`App`].
    pub fn new(config: Config) -> Self {
        let background = BackgroundState::new(BackgroundSettings {
            style: config.style,
            theme: config.theme,
            pixel_ratio: config.pixel_ratio,
            seed: config.seed,
            garden: config.garden,
        });
        Self {
            running: false,
            config,
            background,
        }
    }

    /// Run the application's main loop.
    pub fn run(mut self, mut terminal: DefaultTerminal) -> color_eyre::Result<()> {
        let size = terminal.size()?;
        self.background.resize(size.width, size.height);
        self.background.start();

        let started = Instant::now();
        self.running = true;
        while self.running {
            self.background.tick(started.elapsed().as_secs_f64() * 1000.0);
            terminal.draw(|frame| self.render(frame))?;
            self.handle_crossterm_events()?;
        }
        self.background.stop();
        Ok(())
    }

    /// Renders the user interface.
    fn render(&self, frame: &mut Frame) {
        self.background.render(frame);

        let theme = self.background.theme();
        let fg = to_terminal_color(theme.foreground(), theme.backdrop());
        let bg = to_terminal_color(theme.backdrop(), theme.backdrop());
        let card = centered(frame.area(), 44, 7);

        let state = if self.background.is_playing() {
            "running"
        } else {
            "paused"
        };
        let text = vec![
            Line::from("nodegarden".bold()).centered(),
            Line::from(""),
            Line::from(format!(
                "{} · {} · {state}",
                self.background.style().name(),
                theme.name()
            ))
            .centered(),
            Line::from(vec![
                "space".bold(),
                " play  ".dim(),
                "s".bold(),
                " style  ".dim(),
                "t".bold(),
                " theme  ".dim(),
                "q".bold(),
                " quit".dim(),
            ])
            .centered(),
        ];

        frame.render_widget(Clear, card);
        frame.render_widget(
            Paragraph::new(text)
                .style(Style::new().fg(fg).bg(bg))
                .block(Block::bordered().border_style(Style::new().fg(fg))),
            card,
        );
    }

    /// Reads the crossterm events and updates the state of [`App`].
    fn handle_crossterm_events(&mut self) -> color_eyre::Result<()> {
        if event::poll(POLL_INTERVAL)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => self.on_key_event(key),
                Event::Mouse(mouse) => self.on_mouse_event(mouse),
                Event::FocusLost => self.background.pointer_leave(),
                Event::Resize(width, height) => self.background.resize(width, height),
                _ => {}
            }
        }
        Ok(())
    }

    /// Handles the key events and updates the state of [`App`].
    fn on_key_event(&mut self, key: KeyEvent) {
        match (key.modifiers, key.code) {
            (_, KeyCode::Esc | KeyCode::Char('q'))
            | (KeyModifiers::CONTROL, KeyCode::Char('c') | KeyCode::Char('C')) => self.quit(),
            (_, KeyCode::Char(' ')) => self.background.toggle_playing(),
            (_, KeyCode::Char('s')) => {
                self.config.style = self.background.cycle_style();
                self.save_config();
            }
            (_, KeyCode::Char('t')) => {
                self.config.theme = self.background.toggle_theme();
                self.save_config();
            }
            _ => {}
        }
    }

    /// Maps the left button onto the pointer of the animation.
    fn on_mouse_event(&mut self, mouse: MouseEvent) {
        let (column, row) = (mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => self.background.pointer_down(column, row),
            MouseEventKind::Drag(MouseButton::Left) | MouseEventKind::Moved => {
                self.background.pointer_move(column, row)
            }
            MouseEventKind::Up(MouseButton::Left) => self.background.pointer_up(),
            _ => {}
        }
    }

    fn save_config(&self) {
        if let Err(e) = self.config.save() {
            tracing::warn!(error = %e, "failed to save config");
        }
    }

    /// Set running to false to quit the application.
    fn quit(&mut self) {
        self.running = false;
    }
}

/// A `width` x `height` rect in the middle of `area`, clipped to it.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [card] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(row);
    card
}
