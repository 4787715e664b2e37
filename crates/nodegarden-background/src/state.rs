//! Background animation state management.

use nodegarden_core::{BackgroundStyle, GardenParams, Theme};
use ratatui::Frame;

use crate::animations::constellation::Constellation;
use crate::animations::trails::Trails;
use crate::animations::{Animation, FrameStatus, Viewport};
use crate::garden::NodeGarden;
use crate::surface::CommandBuffer;
use crate::view::{DOTS_PER_CELL, GardenView};

/// Settings the background is built from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackgroundSettings {
    pub style: BackgroundStyle,
    pub theme: Theme,
    /// Surface pixels per braille dot.
    pub pixel_ratio: f64,
    /// Fixed RNG seed, random when `None`.
    pub seed: Option<u64>,
    pub garden: GardenParams,
}

impl Default for BackgroundSettings {
    fn default() -> Self {
        Self {
            style: BackgroundStyle::default(),
            theme: Theme::default(),
            pixel_ratio: 4.0,
            seed: None,
            garden: GardenParams::default(),
        }
    }
}

/// The animation currently shown.
#[derive(Debug)]
enum ActiveAnimation {
    Garden(NodeGarden<CommandBuffer>),
    Constellation(Constellation<CommandBuffer>),
    Trails(Trails<CommandBuffer>),
}

impl ActiveAnimation {
    fn build(settings: &BackgroundSettings) -> Self {
        let surface = CommandBuffer::new();
        match (settings.style, settings.seed) {
            (BackgroundStyle::NodeGarden, Some(seed)) => Self::Garden(NodeGarden::with_seed(
                surface,
                settings.garden,
                settings.theme,
                seed,
            )),
            (BackgroundStyle::NodeGarden, None) => {
                Self::Garden(NodeGarden::new(surface, settings.garden, settings.theme))
            }
            (BackgroundStyle::Constellation, Some(seed)) => {
                Self::Constellation(Constellation::with_seed(surface, seed))
            }
            (BackgroundStyle::Constellation, None) => {
                Self::Constellation(Constellation::new(surface))
            }
            (BackgroundStyle::Trails, Some(seed)) => Self::Trails(Trails::with_seed(surface, seed)),
            (BackgroundStyle::Trails, None) => Self::Trails(Trails::new(surface)),
        }
    }

    fn get(&self) -> &dyn Animation<Surface = CommandBuffer> {
        match self {
            Self::Garden(a) => a,
            Self::Constellation(a) => a,
            Self::Trails(a) => a,
        }
    }

    fn get_mut(&mut self) -> &mut dyn Animation<Surface = CommandBuffer> {
        match self {
            Self::Garden(a) => a,
            Self::Constellation(a) => a,
            Self::Trails(a) => a,
        }
    }
}

/// Background animation state.
///
/// Acts as the frame scheduler for the active animation: [`tick`] only
/// runs a frame while the previous one asked for a successor.
///
/// [`tick`]: BackgroundState::tick
#[derive(Debug)]
pub struct BackgroundState {
    settings: BackgroundSettings,
    animation: ActiveAnimation,
    /// Last known terminal width in cells.
    last_width: u16,
    /// Last known terminal height in cells.
    last_height: u16,
    frame_pending: bool,
}

impl Default for BackgroundState {
    fn default() -> Self {
        Self::new(BackgroundSettings::default())
    }
}

impl BackgroundState {
    /// Create a new, stopped background state. Call [`resize`] before the
    /// first frame.
    ///
    /// [`resize`]: BackgroundState::resize
    pub fn new(settings: BackgroundSettings) -> Self {
        Self {
            animation: ActiveAnimation::build(&settings),
            settings,
            last_width: 0,
            last_height: 0,
            frame_pending: false,
        }
    }

    pub fn style(&self) -> BackgroundStyle {
        self.settings.style
    }

    pub fn theme(&self) -> Theme {
        self.settings.theme
    }

    pub fn is_playing(&self) -> bool {
        self.animation.get().is_playing()
    }

    /// The active animation.
    pub fn animation(&self) -> &dyn Animation<Surface = CommandBuffer> {
        self.animation.get()
    }

    /// The node garden, when it is the active style.
    pub fn garden(&self) -> Option<&NodeGarden<CommandBuffer>> {
        match &self.animation {
            ActiveAnimation::Garden(garden) => Some(garden),
            _ => None,
        }
    }

    /// Host layout for the current terminal size.
    pub fn viewport(&self) -> Viewport {
        Viewport::new(
            self.last_width as f64 * DOTS_PER_CELL.0,
            self.last_height as f64 * DOTS_PER_CELL.1,
            self.settings.pixel_ratio,
        )
    }

    /// Surface position of the centre of a terminal cell.
    pub fn cell_to_surface(&self, column: u16, row: u16) -> (f64, f64) {
        let ratio = self.viewport().pixel_ratio;
        (
            (column as f64 * DOTS_PER_CELL.0 + DOTS_PER_CELL.0 / 2.0) * ratio,
            (row as f64 * DOTS_PER_CELL.1 + DOTS_PER_CELL.1 / 2.0) * ratio,
        )
    }

    /// Switch to another style, keeping size and play state.
    pub fn set_style(&mut self, style: BackgroundStyle) {
        if style == self.settings.style {
            return;
        }
        let playing = self.is_playing();
        self.settings.style = style;
        self.animation = ActiveAnimation::build(&self.settings);
        let viewport = self.viewport();
        self.animation.get_mut().resize(viewport);
        self.frame_pending = false;
        if playing {
            self.start();
        }
        tracing::debug!(style = style.name(), "background style switched");
    }

    /// Cycle to the next style and return it.
    pub fn cycle_style(&mut self) -> BackgroundStyle {
        let next = self.settings.style.next();
        self.set_style(next);
        next
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.settings.theme = theme;
        self.animation.get_mut().set_theme(theme);
    }

    /// Toggle day/night and return the new theme.
    pub fn toggle_theme(&mut self) -> Theme {
        let theme = self.settings.theme.toggle();
        self.set_theme(theme);
        theme
    }

    pub fn start(&mut self) {
        if self.animation.get_mut().start() == FrameStatus::Scheduled {
            self.frame_pending = true;
        }
    }

    pub fn stop(&mut self) {
        self.animation.get_mut().stop();
    }

    pub fn toggle_playing(&mut self) {
        if self.is_playing() {
            self.stop();
        } else {
            self.start();
        }
    }

    /// Resize to a terminal of `width` x `height` cells.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.last_width = width;
        self.last_height = height;
        let viewport = self.viewport();
        self.animation.get_mut().resize(viewport);
    }

    pub fn pointer_down(&mut self, column: u16, row: u16) {
        let (x, y) = self.cell_to_surface(column, row);
        self.animation.get_mut().pointer_down(x, y);
    }

    pub fn pointer_move(&mut self, column: u16, row: u16) {
        let (x, y) = self.cell_to_surface(column, row);
        self.animation.get_mut().pointer_move(x, y);
    }

    pub fn pointer_up(&mut self) {
        self.animation.get_mut().pointer_up();
    }

    pub fn pointer_leave(&mut self) {
        self.animation.get_mut().pointer_leave();
    }

    /// Run the scheduled frame, if any, at `elapsed_ms` since startup.
    pub fn tick(&mut self, elapsed_ms: f64) {
        if self.frame_pending {
            self.frame_pending =
                self.animation.get_mut().frame(elapsed_ms) == FrameStatus::Scheduled;
        }
    }

    /// Render the background to the frame.
    pub fn render(&self, frame: &mut Frame) {
        let view = GardenView::new(self.animation.get().surface(), self.settings.theme.backdrop());
        frame.render_widget(view, frame.area());
    }
}
