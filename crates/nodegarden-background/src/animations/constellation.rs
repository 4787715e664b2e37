//! Constellation animation: slow drifting particles linked by faint lines,
//! gently pushed away from the pointer.

use nodegarden_core::Rgba;
use rand::{Rng, SeedableRng, rngs::StdRng};

use super::{Animation, FrameClock, FrameStatus, Viewport};
use crate::node::{Bounds, TARGET_FRAME_MS, random_below};
use crate::surface::DrawSurface;

/// Surfaces narrower than this get the smaller particle set.
const NARROW_WIDTH: f64 = 768.0;
const NARROW_COUNT: usize = 60;
const WIDE_COUNT: usize = 130;

const PARTICLE_RADIUS: f64 = 2.5;
const SPEED: f64 = 0.2;
const CONNECTION_DISTANCE: f64 = 140.0;
const LINE_OPACITY: f64 = 0.1;
const POINTER_RADIUS: f64 = 250.0;
const REPULSION: f64 = 0.01 * 0.05;

const PARTICLE_COLOR: Rgba = Rgba {
    r: 30,
    g: 41,
    b: 59,
    a: 0.25,
};
const LINE_COLOR: Rgba = Rgba::rgb(51, 65, 85);
const GRADIENT_TOP: Rgba = Rgba::rgb(255, 255, 255);
const GRADIENT_BOTTOM: Rgba = Rgba::rgb(241, 245, 249);

/// A single drifting particle.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
}

impl Particle {
    fn random<R: Rng>(bounds: Bounds, rng: &mut R) -> Self {
        Self {
            x: random_below(rng, bounds.width),
            y: random_below(rng, bounds.height),
            vx: (rng.random::<f64>() - 0.5) * SPEED,
            vy: (rng.random::<f64>() - 0.5) * SPEED,
        }
    }

    fn update(&mut self, scale: f64, pointer: Option<(f64, f64)>, bounds: Bounds) {
        self.x += self.vx * scale;
        self.y += self.vy * scale;

        if let Some((px, py)) = pointer {
            let dx = px - self.x;
            let dy = py - self.y;
            let distance = (dx * dx + dy * dy).sqrt();
            if distance > 0.0 && distance < POINTER_RADIUS {
                let falloff = (POINTER_RADIUS - distance) / POINTER_RADIUS;
                self.vx -= dx / distance * falloff * REPULSION * scale;
                self.vy -= dy / distance * falloff * REPULSION * scale;
            }
        }

        // Only flip while heading outward so a particle can't get stuck
        // oscillating past the edge.
        if (self.x < 0.0 && self.vx < 0.0) || (self.x > bounds.width && self.vx > 0.0) {
            self.vx = -self.vx;
        }
        if (self.y < 0.0 && self.vy < 0.0) || (self.y > bounds.height && self.vy > 0.0) {
            self.vy = -self.vy;
        }
    }
}

/// Particle count for a surface of the given width.
pub fn particle_count(width: f64) -> usize {
    if width < NARROW_WIDTH {
        NARROW_COUNT
    } else {
        WIDE_COUNT
    }
}

/// The constellation background.
#[derive(Debug)]
pub struct Constellation<S> {
    surface: S,
    particles: Vec<Particle>,
    bounds: Bounds,
    pointer: Option<(f64, f64)>,
    clock: FrameClock,
    rng: StdRng,
}

impl<S: DrawSurface> Constellation<S> {
    pub fn new(surface: S) -> Self {
        Self::with_rng(surface, StdRng::from_os_rng())
    }

    pub fn with_seed(surface: S, seed: u64) -> Self {
        Self::with_rng(surface, StdRng::seed_from_u64(seed))
    }

    fn with_rng(surface: S, rng: StdRng) -> Self {
        Self {
            surface,
            particles: Vec::new(),
            bounds: Bounds::default(),
            pointer: None,
            clock: FrameClock::default(),
            rng,
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    pub fn pointer(&self) -> Option<(f64, f64)> {
        self.pointer
    }
}

impl<S: DrawSurface> Animation for Constellation<S> {
    type Surface = S;

    fn surface(&self) -> &S {
        &self.surface
    }

    /// Rebuild the whole particle set for the new size.
    fn resize(&mut self, viewport: Viewport) {
        let bounds = viewport.surface_bounds();
        self.bounds = bounds;
        self.surface.set_size(bounds.width, bounds.height);

        let count = if bounds.area() > 0.0 {
            particle_count(bounds.width)
        } else {
            0
        };
        let rng = &mut self.rng;
        self.particles = (0..count).map(|_| Particle::random(bounds, rng)).collect();
        tracing::debug!(
            width = bounds.width,
            height = bounds.height,
            count,
            "constellation resized"
        );
    }

    fn start(&mut self) -> FrameStatus {
        self.clock.start()
    }

    fn stop(&mut self) {
        self.clock.stop();
    }

    fn is_playing(&self) -> bool {
        self.clock.is_playing()
    }

    fn frame(&mut self, timestamp_ms: f64) -> FrameStatus {
        let Some(elapsed) = self.clock.tick(timestamp_ms) else {
            return FrameStatus::Idle;
        };
        let scale = elapsed / TARGET_FRAME_MS;

        self.surface.fill_gradient(GRADIENT_TOP, GRADIENT_BOTTOM);

        for particle in &mut self.particles {
            particle.update(scale, self.pointer, self.bounds);
            self.surface
                .fill_circle(particle.x, particle.y, PARTICLE_RADIUS, PARTICLE_COLOR);
        }

        for (i, a) in self.particles.iter().enumerate() {
            for b in &self.particles[i + 1..] {
                let dx = a.x - b.x;
                let dy = a.y - b.y;
                let distance = (dx * dx + dy * dy).sqrt();
                if distance < CONNECTION_DISTANCE {
                    let opacity = (1.0 - distance / CONNECTION_DISTANCE) * LINE_OPACITY;
                    self.surface.stroke_line(
                        (a.x, a.y),
                        (b.x, b.y),
                        1.0,
                        LINE_COLOR.with_alpha(opacity),
                    );
                }
            }
        }

        FrameStatus::Scheduled
    }

    fn pointer_down(&mut self, x: f64, y: f64) {
        self.pointer = Some((x, y));
    }

    fn pointer_move(&mut self, x: f64, y: f64) {
        self.pointer = Some((x, y));
    }

    fn pointer_up(&mut self) {}

    fn pointer_leave(&mut self) {
        self.pointer = None;
    }
}
