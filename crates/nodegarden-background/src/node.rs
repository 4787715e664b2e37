//! Garden nodes: simulated particles and the pointer anchor.

use nodegarden_core::{GardenParams, Rgba};
use rand::Rng;

use crate::surface::DrawSurface;

/// Reference frame interval in milliseconds. Velocities are expressed in
/// pixels per reference frame.
pub const TARGET_FRAME_MS: f64 = 1000.0 / 60.0;

/// Size of the area nodes spawn into.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Whether `(x, y)` lies outside the bounds grown by `margin` on every side.
    pub fn is_outside(&self, x: f64, y: f64, margin: f64) -> bool {
        x > self.width + margin || x < -margin || y > self.height + margin || y < -margin
    }
}

/// Which behavior a node follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Moves, respawns and draws itself.
    Simulated,
    /// Held by the pointer. Only exerts pull; never moves, resets or draws
    /// on its own.
    Anchor,
}

/// Starting values for [`Node::reset`]. Unset fields are randomized.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NodeOverrides {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub vx: Option<f64>,
    pub vy: Option<f64>,
    pub m: Option<f64>,
}

/// Signed offset from one node to another, with its length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Distance {
    pub x: f64,
    pub y: f64,
    pub total: f64,
}

impl Distance {
    /// Unit vector along the offset, or `None` for a zero or non-finite length.
    pub fn direction(&self) -> Option<(f64, f64)> {
        if self.total > 0.0 && self.total.is_finite() {
            Some((self.x / self.total, self.y / self.total))
        } else {
            None
        }
    }
}

/// A point mass in surface space.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    /// Mass, also the drawn radius.
    pub m: f64,
    kind: NodeKind,
}

impl Node {
    /// A simulated node with random position, velocity and mass.
    pub fn new<R: Rng>(params: &GardenParams, bounds: Bounds, rng: &mut R) -> Self {
        Self::with_overrides(NodeOverrides::default(), params, bounds, rng)
    }

    /// A simulated node with some fields fixed and the rest random.
    pub fn with_overrides<R: Rng>(
        overrides: NodeOverrides,
        params: &GardenParams,
        bounds: Bounds,
        rng: &mut R,
    ) -> Self {
        let mut node = Self {
            x: 0.0,
            y: 0.0,
            vx: 0.0,
            vy: 0.0,
            m: params.mass_min,
            kind: NodeKind::Simulated,
        };
        node.reset(overrides, params, bounds, rng);
        node
    }

    /// The pointer anchor at `(x, y)`.
    pub fn anchor(x: f64, y: f64, mass: f64) -> Self {
        Self {
            x,
            y,
            vx: 0.0,
            vy: 0.0,
            m: mass,
            kind: NodeKind::Anchor,
        }
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn is_anchor(&self) -> bool {
        self.kind == NodeKind::Anchor
    }

    pub fn radius(&self) -> f64 {
        self.m
    }

    /// Reinitialize position, velocity and mass. No-op for the anchor.
    pub fn reset<R: Rng>(
        &mut self,
        overrides: NodeOverrides,
        params: &GardenParams,
        bounds: Bounds,
        rng: &mut R,
    ) {
        if self.is_anchor() {
            return;
        }
        self.x = overrides.x.unwrap_or_else(|| random_below(rng, bounds.width));
        self.y = overrides.y.unwrap_or_else(|| random_below(rng, bounds.height));
        self.vx = overrides
            .vx
            .unwrap_or_else(|| random_between(rng, -params.max_speed, params.max_speed));
        self.vy = overrides
            .vy
            .unwrap_or_else(|| random_between(rng, -params.max_speed, params.max_speed));
        self.m = overrides
            .m
            .unwrap_or_else(|| random_between(rng, params.mass_min, params.mass_max));
    }

    /// Accelerate by `force` along `direction`. Heavier nodes accelerate less.
    pub fn apply_force(&mut self, force: f64, direction: (f64, f64)) {
        self.vx += force * direction.0 / self.m;
        self.vy += force * direction.1 / self.m;
    }

    /// Offset from this node to `other`.
    pub fn distance_to(&self, other: &Node) -> Distance {
        let x = other.x - self.x;
        let y = other.y - self.y;
        Distance {
            x,
            y,
            total: (x * x + y * y).sqrt(),
        }
    }

    pub fn squared_distance_to(&self, other: &Node) -> f64 {
        let x = other.x - self.x;
        let y = other.y - self.y;
        x * x + y * y
    }

    /// Move by velocity scaled to `elapsed_ms`, respawning when the node has
    /// drifted past the edge margin. No-op for the anchor.
    pub fn advance<R: Rng>(
        &mut self,
        elapsed_ms: f64,
        params: &GardenParams,
        bounds: Bounds,
        rng: &mut R,
    ) {
        if self.is_anchor() {
            return;
        }
        let scale = elapsed_ms / TARGET_FRAME_MS;
        self.x += self.vx * scale;
        self.y += self.vy * scale;

        if !self.x.is_finite()
            || !self.y.is_finite()
            || bounds.is_outside(self.x, self.y, params.edge_margin)
        {
            self.reset(NodeOverrides::default(), params, bounds, rng);
        }
    }

    /// Merge into `survivor`: the survivor takes the mass-weighted average
    /// velocity of both, and this node respawns.
    pub fn collide_into<R: Rng>(
        &mut self,
        survivor: &mut Node,
        params: &GardenParams,
        bounds: Bounds,
        rng: &mut R,
    ) {
        let total = self.m + survivor.m;
        survivor.vx = survivor.m * survivor.vx / total + self.m * self.vx / total;
        survivor.vy = survivor.m * survivor.vy / total + self.m * self.vy / total;
        self.reset(NodeOverrides::default(), params, bounds, rng);
    }

    /// Draw as a filled circle. No-op for the anchor.
    pub fn render<S: DrawSurface>(&self, surface: &mut S, color: Rgba) {
        if self.is_anchor() {
            return;
        }
        surface.fill_circle(self.x, self.y, self.radius(), color);
    }
}

/// Uniform in `[0, upper)`, or 0 for an empty range.
pub(crate) fn random_below<R: Rng>(rng: &mut R, upper: f64) -> f64 {
    random_between(rng, 0.0, upper)
}

/// Uniform in `[low, high)`, or `low` when the range is empty.
pub(crate) fn random_between<R: Rng>(rng: &mut R, low: f64, high: f64) -> f64 {
    if high > low {
        rng.random_range(low..high)
    } else {
        low
    }
}
