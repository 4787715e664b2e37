//! Core types shared by the nodegarden crates.

use serde::{Deserialize, Serialize};

/// Which background animation is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BackgroundStyle {
    /// Mass-based attraction with collision merging and a pointer anchor.
    #[default]
    NodeGarden,
    /// Drifting particles linked by faint lines, repelled by the pointer.
    Constellation,
    /// Fading particles spawned along the pointer path.
    Trails,
}

impl BackgroundStyle {
    /// Every style, in cycling order.
    pub const ALL: [BackgroundStyle; 3] = [
        BackgroundStyle::NodeGarden,
        BackgroundStyle::Constellation,
        BackgroundStyle::Trails,
    ];

    /// Cycle to the next style.
    pub fn next(self) -> Self {
        match self {
            BackgroundStyle::NodeGarden => BackgroundStyle::Constellation,
            BackgroundStyle::Constellation => BackgroundStyle::Trails,
            BackgroundStyle::Trails => BackgroundStyle::NodeGarden,
        }
    }

    /// Human-readable name.
    pub fn name(self) -> &'static str {
        match self {
            BackgroundStyle::NodeGarden => "node garden",
            BackgroundStyle::Constellation => "constellation",
            BackgroundStyle::Trails => "trails",
        }
    }
}

/// Light or dark page palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Theme {
    #[default]
    Day,
    Night,
}

impl Theme {
    /// Switch between day and night.
    pub fn toggle(self) -> Self {
        match self {
            Theme::Day => Theme::Night,
            Theme::Night => Theme::Day,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Theme::Day => "day",
            Theme::Night => "night",
        }
    }

    /// Colour behind the animation.
    pub fn backdrop(self) -> Rgba {
        match self {
            Theme::Day => Rgba::rgb(248, 250, 252),
            Theme::Night => Rgba::rgb(15, 23, 42),
        }
    }

    /// Fill colour for garden nodes.
    pub fn node_fill(self) -> Rgba {
        match self {
            // Slate 900
            Theme::Day => Rgba::rgb(15, 23, 42),
            Theme::Night => Rgba::rgb(255, 255, 255),
        }
    }

    /// Colour for foreground text drawn over the animation.
    pub fn foreground(self) -> Rgba {
        match self {
            Theme::Day => Rgba::rgb(30, 41, 59),
            Theme::Night => Rgba::rgb(226, 232, 240),
        }
    }
}

/// An sRGB colour with straight alpha in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgba {
    /// Opaque colour.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Colour with an explicit alpha, clamped to `0.0..=1.0`.
    pub fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self::rgb(r, g, b).with_alpha(a)
    }

    /// Same colour with a different alpha. NaN becomes fully transparent.
    pub fn with_alpha(self, a: f64) -> Self {
        let a = if a.is_nan() { 0.0 } else { a.clamp(0.0, 1.0) };
        Self { a, ..self }
    }

    /// Composite this colour over an opaque `backdrop`.
    pub fn over(self, backdrop: Rgba) -> Rgba {
        let mix = |fg: u8, bg: u8| -> u8 {
            (fg as f64 * self.a + bg as f64 * (1.0 - self.a)).round() as u8
        };
        Rgba::rgb(
            mix(self.r, backdrop.r),
            mix(self.g, backdrop.g),
            mix(self.b, backdrop.b),
        )
    }

    /// Linear interpolation between two opaque colours, `t` in `0.0..=1.0`.
    pub fn lerp(self, other: Rgba, t: f64) -> Rgba {
        other.with_alpha(t).over(self)
    }
}

/// Tunable constants for the node garden simulation.
///
/// Every field falls back to its default when missing from a config file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GardenParams {
    /// Node count is `floor(sqrt(area) / density_divisor)`.
    pub density_divisor: f64,
    /// Gain in `force = gain * m1 * m2 / d²`.
    pub force_gain: f64,
    /// Line opacity is `force * opacity_scale`, capped at 1.
    pub opacity_scale: f64,
    /// Pairs whose line opacity would be below this are skipped entirely.
    pub visibility_threshold: f64,
    /// Mass of the pointer anchor node.
    pub anchor_mass: f64,
    /// Distance past the surface edge at which a node respawns.
    pub edge_margin: f64,
    /// Lower bound (inclusive) of the random node mass.
    pub mass_min: f64,
    /// Upper bound (exclusive) of the random node mass.
    pub mass_max: f64,
    /// Random velocity components lie in `[-max_speed, max_speed)`.
    pub max_speed: f64,
}

impl Default for GardenParams {
    fn default() -> Self {
        Self {
            density_divisor: 25.0,
            force_gain: 3.0,
            opacity_scale: 100.0,
            visibility_threshold: 0.025,
            anchor_mass: 15.0,
            edge_margin: 50.0,
            mass_min: 0.5,
            mass_max: 3.0,
            max_speed: 0.25,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_cycle_visits_all() {
        let mut style = BackgroundStyle::default();
        for expected in BackgroundStyle::ALL {
            assert_eq!(style, expected);
            style = style.next();
        }
        assert_eq!(style, BackgroundStyle::NodeGarden);
    }

    #[test]
    fn test_theme_toggle() {
        assert_eq!(Theme::Day.toggle(), Theme::Night);
        assert_eq!(Theme::Night.toggle().toggle(), Theme::Night);
    }

    #[test]
    fn test_alpha_clamped() {
        assert_eq!(Rgba::rgba(1, 2, 3, 4.0).a, 1.0);
        assert_eq!(Rgba::rgba(1, 2, 3, -1.0).a, 0.0);
        assert_eq!(Rgba::rgba(1, 2, 3, f64::NAN).a, 0.0);
    }

    #[test]
    fn test_over_blends_toward_backdrop() {
        let white = Rgba::rgb(255, 255, 255);
        let black = Rgba::rgb(0, 0, 0);
        assert_eq!(black.with_alpha(0.0).over(white), white);
        assert_eq!(black.over(white), black);
        assert_eq!(black.with_alpha(0.5).over(white), Rgba::rgb(128, 128, 128));
    }

    #[test]
    fn test_default_params() {
        let params = GardenParams::default();
        assert_eq!(params.density_divisor, 25.0);
        assert_eq!(params.force_gain, 3.0);
        assert!(params.mass_min > 0.0 && params.mass_min < params.mass_max);
    }
}
