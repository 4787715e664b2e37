//! Colour conversion for terminal rendering.

use nodegarden_core::Rgba;
use ratatui::style::Color;

/// Terminal cells have no alpha, so translucent colours are flattened onto
/// `backdrop` first.
pub fn to_terminal_color(color: Rgba, backdrop: Rgba) -> Color {
    let flat = color.over(backdrop);
    Color::Rgb(flat.r, flat.g, flat.b)
}

/// Colour of a vertical gradient at `row` of `rows`, sampled at the row centre.
pub fn gradient_at(top: Rgba, bottom: Rgba, row: u16, rows: u16) -> Rgba {
    if rows == 0 {
        return top;
    }
    let t = (row as f64 + 0.5) / rows as f64;
    top.lerp(bottom, t)
}
