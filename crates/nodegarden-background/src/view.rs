//! Terminal widget that replays a [`CommandBuffer`] with braille dots.

use nodegarden_core::Rgba;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    symbols::Marker,
    widgets::{
        Widget,
        canvas::{Canvas, Circle, Line, Points},
    },
};

use crate::color::{gradient_at, to_terminal_color};
use crate::surface::{CommandBuffer, DrawCommand};

/// Braille dots per terminal cell, horizontally and vertically.
pub const DOTS_PER_CELL: (f64, f64) = (2.0, 4.0);

/// Renders a recorded surface over a solid backdrop.
#[derive(Debug, Clone, Copy)]
pub struct GardenView<'a> {
    buffer: &'a CommandBuffer,
    backdrop: Rgba,
}

impl<'a> GardenView<'a> {
    pub fn new(buffer: &'a CommandBuffer, backdrop: Rgba) -> Self {
        Self { buffer, backdrop }
    }
}

impl Widget for GardenView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.is_empty() {
            return;
        }

        let width = self.buffer.width().max(1.0);
        let height = self.buffer.height().max(1.0);
        let gradient = self.buffer.gradient();
        // Translucent shapes are flattened against the middle of a gradient.
        let backdrop = match gradient {
            Some((top, bottom)) => top.lerp(bottom, 0.5),
            None => self.backdrop,
        };
        let dot_width = width / (area.width as f64 * DOTS_PER_CELL.0);

        Canvas::default()
            .marker(Marker::Braille)
            .background_color(to_terminal_color(backdrop, backdrop))
            .x_bounds([0.0, width])
            .y_bounds([0.0, height])
            .paint(|ctx| {
                for command in self.buffer.commands() {
                    match *command {
                        DrawCommand::Gradient { .. } => {}
                        DrawCommand::Circle {
                            x,
                            y,
                            radius,
                            color,
                        } => {
                            let color = to_terminal_color(color, backdrop);
                            // Canvas y grows upward.
                            let y = height - y;
                            if radius > dot_width {
                                ctx.draw(&Circle {
                                    x,
                                    y,
                                    radius,
                                    color,
                                });
                            }
                            ctx.draw(&Points {
                                coords: &[(x, y)],
                                color,
                            });
                        }
                        DrawCommand::Line {
                            from, to, color, ..
                        } => {
                            ctx.draw(&Line::new(
                                from.0,
                                height - from.1,
                                to.0,
                                height - to.1,
                                to_terminal_color(color, backdrop),
                            ));
                        }
                    }
                }
            })
            .render(area, buf);

        if let Some((top, bottom)) = gradient {
            for row in 0..area.height {
                let bg = to_terminal_color(gradient_at(top, bottom, row, area.height), backdrop);
                for col in area.left()..area.right() {
                    if let Some(cell) = buf.cell_mut((col, area.top() + row)) {
                        cell.set_bg(bg);
                    }
                }
            }
        }
    }
}
