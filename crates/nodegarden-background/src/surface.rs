//! Drawing surface abstraction.
//!
//! Animations draw through [`DrawSurface`] and never touch the host's
//! terminal or window directly. [`CommandBuffer`] records the calls so the
//! host can replay them later.

use nodegarden_core::Rgba;

/// A 2D drawing target in surface pixels, origin at the top left.
pub trait DrawSurface {
    /// Resize the drawable area. Existing contents are discarded.
    fn set_size(&mut self, width: f64, height: f64);

    /// Clear everything drawn so far.
    fn clear(&mut self);

    /// Fill the whole surface with a vertical gradient.
    fn fill_gradient(&mut self, top: Rgba, bottom: Rgba);

    /// Fill a circle.
    fn fill_circle(&mut self, x: f64, y: f64, radius: f64, color: Rgba);

    /// Stroke a straight line.
    fn stroke_line(&mut self, from: (f64, f64), to: (f64, f64), width: f64, color: Rgba);
}

/// A single recorded draw call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Gradient {
        top: Rgba,
        bottom: Rgba,
    },
    Circle {
        x: f64,
        y: f64,
        radius: f64,
        color: Rgba,
    },
    Line {
        from: (f64, f64),
        to: (f64, f64),
        width: f64,
        color: Rgba,
    },
}

/// Surface that records draw calls for later replay.
#[derive(Debug, Clone, Default)]
pub struct CommandBuffer {
    width: f64,
    height: f64,
    commands: Vec<DrawCommand>,
}

impl CommandBuffer {
    /// Create an empty zero-sized buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Surface width in pixels.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Surface height in pixels.
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Commands recorded since the last clear, in draw order.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Recorded lines only.
    pub fn lines(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Line { .. }))
    }

    /// Recorded circles only.
    pub fn circles(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Circle { .. }))
    }

    /// The last gradient fill, if any.
    pub fn gradient(&self) -> Option<(Rgba, Rgba)> {
        self.commands.iter().rev().find_map(|c| match c {
            DrawCommand::Gradient { top, bottom } => Some((*top, *bottom)),
            _ => None,
        })
    }
}

impl DrawSurface for CommandBuffer {
    fn set_size(&mut self, width: f64, height: f64) {
        self.width = width.max(0.0);
        self.height = height.max(0.0);
        self.commands.clear();
    }

    fn clear(&mut self) {
        self.commands.clear();
    }

    fn fill_gradient(&mut self, top: Rgba, bottom: Rgba) {
        // A gradient covers everything below it.
        self.commands.clear();
        self.commands.push(DrawCommand::Gradient { top, bottom });
    }

    fn fill_circle(&mut self, x: f64, y: f64, radius: f64, color: Rgba) {
        self.commands.push(DrawCommand::Circle {
            x,
            y,
            radius,
            color,
        });
    }

    fn stroke_line(&mut self, from: (f64, f64), to: (f64, f64), width: f64, color: Rgba) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            width,
            color,
        });
    }
}
