//! Trails animation: short-lived particles spawned along the pointer path,
//! drifting apart and fading while linked to their neighbours.

use nodegarden_core::Rgba;
use rand::{Rng, SeedableRng, rngs::StdRng};

use super::{Animation, FrameClock, FrameStatus, Viewport};
use crate::node::TARGET_FRAME_MS;
use crate::surface::DrawSurface;

/// Particles spawned per pointer move.
pub const SPAWN_RATE: usize = 4;
/// Spawn offset range around the pointer, per axis.
const SPAWN_SPREAD: f64 = 20.0;
const MAX_EXTRA_SIZE: f64 = 2.0;
const VELOCITY: f64 = 1.0;
/// Life lost per reference frame.
const LIFE_DECAY: f64 = 0.015;
const CONNECTION_DISTANCE: f64 = 100.0;
const LINE_WIDTH: f64 = 0.5;
/// Most sparks alive at once; the oldest go first.
pub const MAX_SPARKS: usize = 400;

const PRIMARY: Rgba = Rgba::rgb(0, 85, 255);
const SECONDARY: Rgba = Rgba::rgb(0, 200, 255);

/// A fading particle.
#[derive(Debug, Clone, PartialEq)]
pub struct Spark {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub size: f64,
    /// Remaining life in `0.0..=1.0`, also the draw alpha.
    pub life: f64,
    pub color: Rgba,
}

impl Spark {
    fn spawn<R: Rng>(x: f64, y: f64, rng: &mut R) -> Self {
        Self {
            x,
            y,
            size: rng.random::<f64>() * MAX_EXTRA_SIZE + 1.0,
            vx: (rng.random::<f64>() - 0.5) * VELOCITY,
            vy: (rng.random::<f64>() - 0.5) * VELOCITY,
            life: 1.0,
            color: if rng.random::<f64>() > 0.5 {
                PRIMARY
            } else {
                SECONDARY
            },
        }
    }

    fn update(&mut self, scale: f64) {
        self.x += self.vx * scale;
        self.y += self.vy * scale;
        self.life -= LIFE_DECAY * scale;
    }
}

/// The trails background.
#[derive(Debug)]
pub struct Trails<S> {
    surface: S,
    sparks: Vec<Spark>,
    clock: FrameClock,
    rng: StdRng,
}

impl<S: DrawSurface> Trails<S> {
    pub fn new(surface: S) -> Self {
        Self::with_rng(surface, StdRng::from_os_rng())
    }

    pub fn with_seed(surface: S, seed: u64) -> Self {
        Self::with_rng(surface, StdRng::seed_from_u64(seed))
    }

    fn with_rng(surface: S, rng: StdRng) -> Self {
        Self {
            surface,
            sparks: Vec::new(),
            clock: FrameClock::default(),
            rng,
        }
    }

    pub fn sparks(&self) -> &[Spark] {
        &self.sparks
    }

    fn spawn_around(&mut self, x: f64, y: f64) {
        for _ in 0..SPAWN_RATE {
            let ox = (self.rng.random::<f64>() - 0.5) * SPAWN_SPREAD;
            let oy = (self.rng.random::<f64>() - 0.5) * SPAWN_SPREAD;
            let spark = Spark::spawn(x + ox, y + oy, &mut self.rng);
            self.sparks.push(spark);
        }
        if self.sparks.len() > MAX_SPARKS {
            let excess = self.sparks.len() - MAX_SPARKS;
            self.sparks.drain(..excess);
        }
    }
}

impl<S: DrawSurface> Animation for Trails<S> {
    type Surface = S;

    fn surface(&self) -> &S {
        &self.surface
    }

    fn resize(&mut self, viewport: Viewport) {
        let bounds = viewport.surface_bounds();
        self.surface.set_size(bounds.width, bounds.height);
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

        self.surface.clear();
        self.sparks.retain(|s| s.life > 0.0);

        for spark in &mut self.sparks {
            spark.update(scale);
            self.surface
                .fill_circle(spark.x, spark.y, spark.size, spark.color.with_alpha(spark.life));
        }

        for (i, a) in self.sparks.iter().enumerate() {
            for b in &self.sparks[i + 1..] {
                let dx = a.x - b.x;
                let dy = a.y - b.y;
                let distance = (dx * dx + dy * dy).sqrt();
                if distance >= CONNECTION_DISTANCE {
                    continue;
                }
                let opacity = (1.0 - distance / CONNECTION_DISTANCE) * a.life.min(b.life);
                if opacity > 0.0 {
                    self.surface.stroke_line(
                        (a.x, a.y),
                        (b.x, b.y),
                        LINE_WIDTH,
                        PRIMARY.with_alpha(opacity),
                    );
                }
            }
        }

        FrameStatus::Scheduled
    }

    fn pointer_down(&mut self, _x: f64, _y: f64) {}

    /// Spawns sparks while playing. A paused background ignores the pointer.
    fn pointer_move(&mut self, x: f64, y: f64) {
        if !self.clock.is_playing() {
            return;
        }
        self.spawn_around(x, y);
    }

    fn pointer_up(&mut self) {}
}
