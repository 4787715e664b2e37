//! The animation interface shared by every background style.

pub mod constellation;
pub mod trails;

use nodegarden_core::Theme;

use crate::node::Bounds;
use crate::surface::DrawSurface;

/// Layout box of the host the surface is attached to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Width in layout units.
    pub client_width: f64,
    /// Height in layout units.
    pub client_height: f64,
    /// Surface pixels per layout unit.
    pub pixel_ratio: f64,
}

impl Viewport {
    pub fn new(client_width: f64, client_height: f64, pixel_ratio: f64) -> Self {
        Self {
            client_width,
            client_height,
            pixel_ratio,
        }
    }

    /// Surface size in pixels. Negative or non-finite input collapses to 0.
    pub fn surface_bounds(&self) -> Bounds {
        let ratio = if self.pixel_ratio.is_finite() && self.pixel_ratio > 0.0 {
            self.pixel_ratio
        } else {
            1.0
        };
        let clamp = |v: f64| {
            let v = v * ratio;
            if v.is_finite() { v.max(0.0) } else { 0.0 }
        };
        Bounds::new(clamp(self.client_width), clamp(self.client_height))
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(0.0, 0.0, 1.0)
    }
}

/// Whether the host should schedule another frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStatus {
    /// Call `frame` again on the next display refresh.
    Scheduled,
    /// Nothing to schedule.
    Idle,
}

/// A background animation driven by host frame callbacks.
pub trait Animation {
    type Surface: DrawSurface;

    /// The surface the animation draws on.
    fn surface(&self) -> &Self::Surface;

    /// Recompute surface size from the host layout.
    fn resize(&mut self, viewport: Viewport);

    /// Start playing. Returns [`FrameStatus::Scheduled`] when the host must
    /// schedule the first frame.
    fn start(&mut self) -> FrameStatus;

    /// Stop playing. The next `frame` call returns without drawing.
    fn stop(&mut self);

    fn is_playing(&self) -> bool;

    /// Advance and redraw one frame at `timestamp_ms`.
    fn frame(&mut self, timestamp_ms: f64) -> FrameStatus;

    fn pointer_down(&mut self, x: f64, y: f64);

    fn pointer_move(&mut self, x: f64, y: f64);

    fn pointer_up(&mut self);

    /// The pointer left the surface.
    fn pointer_leave(&mut self) {}

    fn set_theme(&mut self, _theme: Theme) {}
}

/// Play state plus the timestamp of the previous frame.
#[derive(Debug, Clone, Default)]
pub(crate) struct FrameClock {
    playing: bool,
    last_time: Option<f64>,
}

impl FrameClock {
    pub(crate) fn is_playing(&self) -> bool {
        self.playing
    }

    pub(crate) fn start(&mut self) -> FrameStatus {
        if self.playing {
            return FrameStatus::Idle;
        }
        self.playing = true;
        // The first frame after a restart sees no elapsed time.
        self.last_time = None;
        FrameStatus::Scheduled
    }

    pub(crate) fn stop(&mut self) {
        self.playing = false;
    }

    /// Elapsed milliseconds since the previous tick, or `None` when stopped.
    pub(crate) fn tick(&mut self, timestamp_ms: f64) -> Option<f64> {
        if !self.playing {
            return None;
        }
        let elapsed = timestamp_ms - self.last_time.unwrap_or(timestamp_ms);
        if timestamp_ms.is_finite() {
            self.last_time = Some(timestamp_ms);
        }
        Some(if elapsed.is_finite() { elapsed.max(0.0) } else { 0.0 })
    }
}
