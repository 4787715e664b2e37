//! The node garden: mass-based attraction between nodes, with collisions
//! merging the lighter node into the heavier one.
//!
//! Every pair of nodes pulls on each other with an inverse-square force.
//! Pairs whose pull is strong enough to be visible are joined by a line
//! whose opacity tracks the force. Pressing the pointer drops a heavy
//! anchor node that drags nearby nodes toward it until released.

use nodegarden_core::{GardenParams, Rgba, Theme};
use rand::{SeedableRng, rngs::StdRng};

use crate::animations::{Animation, FrameClock, FrameStatus, Viewport};
use crate::node::{Bounds, Node};
use crate::surface::DrawSurface;

/// Colour of the connecting lines (slate 500).
const LINE_COLOR: Rgba = Rgba::rgb(100, 116, 139);

/// Width of the connecting lines in pixels.
const LINE_WIDTH: f64 = 1.0;

/// The simulation surface for the node garden.
#[derive(Debug)]
pub struct NodeGarden<S> {
    surface: S,
    nodes: Vec<Node>,
    bounds: Bounds,
    params: GardenParams,
    node_color: Rgba,
    clock: FrameClock,
    rng: StdRng,
}

impl<S: DrawSurface> NodeGarden<S> {
    /// Create an empty garden drawing on `surface`. Call
    /// [`Animation::resize`] to populate it.
    pub fn new(surface: S, params: GardenParams, theme: Theme) -> Self {
        Self::with_rng(surface, params, theme, StdRng::from_os_rng())
    }

    /// Like [`NodeGarden::new`] with a deterministic RNG.
    pub fn with_seed(surface: S, params: GardenParams, theme: Theme, seed: u64) -> Self {
        Self::with_rng(surface, params, theme, StdRng::seed_from_u64(seed))
    }

    fn with_rng(surface: S, params: GardenParams, theme: Theme, rng: StdRng) -> Self {
        Self {
            surface,
            nodes: Vec::new(),
            bounds: Bounds::default(),
            params,
            node_color: theme.node_fill(),
            clock: FrameClock::default(),
            rng,
        }
    }

    /// All nodes, anchor first when one is held.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Mutable access to node state, e.g. to place nodes deterministically.
    pub fn nodes_mut(&mut self) -> &mut [Node] {
        &mut self.nodes
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn params(&self) -> &GardenParams {
        &self.params
    }

    /// Whether the pointer anchor is currently in the collection.
    pub fn has_anchor(&self) -> bool {
        self.nodes.iter().any(Node::is_anchor)
    }

    /// Number of nodes excluding the anchor.
    pub fn simulated_count(&self) -> usize {
        self.nodes.iter().filter(|n| !n.is_anchor()).count()
    }

    /// Node count for the current surface: `floor(sqrt(area) / divisor)`.
    pub fn target_count(&self) -> usize {
        let target = (self.bounds.area().sqrt() / self.params.density_divisor).floor();
        if target.is_finite() && target > 0.0 {
            target as usize
        } else {
            0
        }
    }

    /// Apply forces, resolve collisions and draw lines for every pair.
    fn interact_pairs(&mut self) {
        let params = self.params;
        let bounds = self.bounds;
        let count = self.nodes.len();

        for i in 0..count.saturating_sub(1) {
            for j in (i + 1)..count {
                let (head, tail) = self.nodes.split_at_mut(j);
                let a = &mut head[i];
                let b = &mut tail[0];

                let squared = a.squared_distance_to(b);
                if squared == 0.0 {
                    merge(a, b, &params, bounds, &mut self.rng);
                    continue;
                }

                let force = params.force_gain * (a.m * b.m) / squared;
                let opacity = force * params.opacity_scale;
                if opacity < params.visibility_threshold {
                    continue;
                }

                let reach = a.m / 2.0 + b.m / 2.0;
                if squared <= reach * reach {
                    merge(a, b, &params, bounds, &mut self.rng);
                    continue;
                }

                let Some(direction) = a.distance_to(b).direction() else {
                    continue;
                };

                self.surface.stroke_line(
                    (a.x, a.y),
                    (b.x, b.y),
                    LINE_WIDTH,
                    LINE_COLOR.with_alpha(opacity.min(1.0)),
                );

                a.apply_force(force, direction);
                b.apply_force(-force, direction);
            }
        }
    }
}

/// Collide the lighter node into the heavier one; `a` yields on equal mass.
fn merge(a: &mut Node, b: &mut Node, params: &GardenParams, bounds: Bounds, rng: &mut StdRng) {
    if a.m <= b.m {
        a.collide_into(b, params, bounds, rng);
    } else {
        b.collide_into(a, params, bounds, rng);
    }
}

impl<S: DrawSurface> Animation for NodeGarden<S> {
    type Surface = S;

    fn surface(&self) -> &S {
        &self.surface
    }

    /// Grow the node collection to fit the new surface. Nodes are only ever
    /// appended, so existing nodes keep their state.
    fn resize(&mut self, viewport: Viewport) {
        let bounds = viewport.surface_bounds();
        if bounds != self.bounds {
            self.bounds = bounds;
            self.surface.set_size(bounds.width, bounds.height);
        }

        let target = self.target_count();
        let current = self.simulated_count();
        for _ in current..target {
            let node = Node::new(&self.params, self.bounds, &mut self.rng);
            self.nodes.push(node);
        }

        tracing::debug!(
            width = bounds.width,
            height = bounds.height,
            target,
            added = target.saturating_sub(current),
            "node garden resized"
        );
    }

    fn start(&mut self) -> FrameStatus {
        let status = self.clock.start();
        if status == FrameStatus::Scheduled {
            tracing::debug!(nodes = self.nodes.len(), "node garden started");
        }
        status
    }

    fn stop(&mut self) {
        if self.clock.is_playing() {
            tracing::debug!("node garden stopped");
        }
        self.clock.stop();
    }

    fn is_playing(&self) -> bool {
        self.clock.is_playing()
    }

    fn frame(&mut self, timestamp_ms: f64) -> FrameStatus {
        let Some(elapsed) = self.clock.tick(timestamp_ms) else {
            return FrameStatus::Idle;
        };

        self.surface.clear();
        self.interact_pairs();

        let params = self.params;
        let bounds = self.bounds;
        for node in &mut self.nodes {
            node.render(&mut self.surface, self.node_color);
            node.advance(elapsed, &params, bounds, &mut self.rng);
        }

        FrameStatus::Scheduled
    }

    /// Drop the anchor at the pointer. A held anchor is moved instead.
    fn pointer_down(&mut self, x: f64, y: f64) {
        if let Some(anchor) = self.nodes.iter_mut().find(|n| n.is_anchor()) {
            anchor.x = x;
            anchor.y = y;
            return;
        }
        self.nodes.insert(0, Node::anchor(x, y, self.params.anchor_mass));
        tracing::debug!(x, y, "anchor inserted");
    }

    fn pointer_move(&mut self, x: f64, y: f64) {
        if let Some(anchor) = self.nodes.iter_mut().find(|n| n.is_anchor()) {
            anchor.x = x;
            anchor.y = y;
        }
    }

    fn pointer_up(&mut self) {
        if let Some(index) = self.nodes.iter().position(Node::is_anchor) {
            self.nodes.remove(index);
            tracing::debug!("anchor removed");
        }
    }

    fn set_theme(&mut self, theme: Theme) {
        self.node_color = theme.node_fill();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{NodeOverrides, TARGET_FRAME_MS};
    use crate::surface::{CommandBuffer, DrawCommand};

    fn garden() -> NodeGarden<CommandBuffer> {
        NodeGarden::with_seed(CommandBuffer::new(), GardenParams::default(), Theme::Day, 42)
    }

    fn place(garden: &mut NodeGarden<CommandBuffer>, index: usize, x: f64, y: f64, m: f64) {
        let params = *garden.params();
        let bounds = garden.bounds();
        let overrides = NodeOverrides {
            x: Some(x),
            y: Some(y),
            vx: Some(0.0),
            vy: Some(0.0),
            m: Some(m),
        };
        let mut rng = StdRng::seed_from_u64(0);
        garden.nodes_mut()[index].reset(overrides, &params, bounds, &mut rng);
    }

    /// A garden with exactly two simulated nodes on a 100x100 surface.
    fn two_node_garden() -> NodeGarden<CommandBuffer> {
        let mut garden = garden();
        garden.params.density_divisor = 50.0;
        garden.resize(Viewport::new(100.0, 100.0, 1.0));
        assert_eq!(garden.nodes().len(), 2);
        garden
    }

    #[test]
    fn test_resize_target_count() {
        let mut garden = garden();
        garden.resize(Viewport::new(800.0, 600.0, 1.0));
        assert_eq!(garden.nodes().len(), 27);

        let mut retina = self::garden();
        retina.resize(Viewport::new(400.0, 300.0, 2.0));
        assert_eq!(retina.bounds(), Bounds::new(800.0, 600.0));
        assert_eq!(retina.nodes().len(), 27);
    }

    #[test]
    fn test_resize_is_idempotent() {
        let mut garden = garden();
        let viewport = Viewport::new(800.0, 600.0, 1.0);
        garden.resize(viewport);
        let before = garden.nodes().to_vec();
        garden.resize(viewport);
        assert_eq!(garden.nodes(), before.as_slice());
    }

    #[test]
    fn test_resize_never_shrinks() {
        let mut garden = garden();
        garden.resize(Viewport::new(800.0, 600.0, 1.0));
        let before = garden.nodes().to_vec();

        garden.resize(Viewport::new(100.0, 100.0, 1.0));
        assert_eq!(garden.nodes(), before.as_slice());

        garden.resize(Viewport::new(1600.0, 1200.0, 1.0));
        assert_eq!(garden.nodes().len(), 55);
        assert_eq!(&garden.nodes()[..27], before.as_slice());
    }

    #[test]
    fn test_zero_area_is_empty() {
        let mut garden = garden();
        garden.resize(Viewport::new(0.0, 600.0, 1.0));
        assert!(garden.nodes().is_empty());

        garden.start();
        assert_eq!(garden.frame(0.0), FrameStatus::Scheduled);
        assert!(garden.surface().commands().is_empty());
    }

    #[test]
    fn test_frame_when_stopped_draws_nothing() {
        let mut garden = garden();
        garden.resize(Viewport::new(800.0, 600.0, 1.0));
        assert_eq!(garden.frame(0.0), FrameStatus::Idle);
        assert!(garden.surface().commands().is_empty());

        garden.start();
        garden.frame(0.0);
        garden.stop();
        let drawn = garden.surface().commands().to_vec();
        assert_eq!(garden.frame(16.0), FrameStatus::Idle);
        assert_eq!(garden.surface().commands(), drawn.as_slice());
    }

    #[test]
    fn test_first_frame_does_not_move_nodes() {
        let mut garden = garden();
        garden.resize(Viewport::new(800.0, 600.0, 1.0));
        for i in 0..garden.nodes().len() {
            // Spread nodes on a coarse grid so no pair is close enough to act.
            let x = 50.0 + (i % 6) as f64 * 140.0;
            let y = 50.0 + (i / 6) as f64 * 120.0;
            place(&mut garden, i, x, y, 0.5);
        }
        let before = garden.nodes().to_vec();

        assert_eq!(garden.start(), FrameStatus::Scheduled);
        garden.frame(1234.0);

        assert_eq!(garden.nodes(), before.as_slice());
        assert_eq!(garden.surface().circles().count(), 27);
        assert_eq!(garden.surface().lines().count(), 0);
    }

    #[test]
    fn test_pair_forces_are_equal_and_opposite() {
        let mut garden = two_node_garden();
        place(&mut garden, 0, 40.0, 50.0, 2.0);
        place(&mut garden, 1, 50.0, 50.0, 1.0);

        garden.start();
        garden.frame(0.0);

        let a = &garden.nodes()[0];
        let b = &garden.nodes()[1];
        // force = 3 * 2 * 1 / 100 = 0.06
        assert!((a.vx * a.m - 0.06).abs() < 1e-12);
        assert!((b.vx * b.m + 0.06).abs() < 1e-12);
        assert_eq!(a.vy, 0.0);
        assert_eq!(b.vy, 0.0);

        let lines: Vec<_> = garden.surface().lines().collect();
        assert_eq!(lines.len(), 1);
        match lines[0] {
            DrawCommand::Line { from, to, color, .. } => {
                assert_eq!(*from, (40.0, 50.0));
                assert_eq!(*to, (50.0, 50.0));
                assert_eq!(color.a, 1.0);
            }
            other => panic!("expected a line, got {other:?}"),
        }
    }

    #[test]
    fn test_faint_pairs_are_skipped() {
        let mut garden = two_node_garden();
        // force = 3 * 0.5 * 0.5 / 90² ≈ 9.3e-5, opacity ≈ 0.0093 < 0.025
        place(&mut garden, 0, 5.0, 5.0, 0.5);
        place(&mut garden, 1, 95.0, 5.0, 0.5);

        garden.start();
        garden.frame(0.0);

        assert_eq!(garden.surface().lines().count(), 0);
        assert_eq!(garden.nodes()[0].vx, 0.0);
        assert_eq!(garden.nodes()[1].vx, 0.0);
    }

    #[test]
    fn test_line_opacity_tracks_force() {
        let mut garden = two_node_garden();
        // force = 3 * 1 * 1 / 60² ≈ 8.3e-4, opacity ≈ 0.083
        place(&mut garden, 0, 20.0, 50.0, 1.0);
        place(&mut garden, 1, 80.0, 50.0, 1.0);

        garden.start();
        garden.frame(0.0);

        let expected = 3.0 / 3600.0 * 100.0;
        match garden.surface().lines().next() {
            Some(DrawCommand::Line { color, .. }) => {
                assert!((color.a - expected).abs() < 1e-12);
            }
            other => panic!("expected a line, got {other:?}"),
        }
    }

    #[test]
    fn test_coincident_nodes_collide() {
        let mut garden = two_node_garden();
        place(&mut garden, 0, 50.0, 50.0, 1.0);
        place(&mut garden, 1, 50.0, 50.0, 2.0);
        garden.nodes_mut()[0].vx = 0.3;
        garden.nodes_mut()[1].vx = -0.3;

        garden.start();
        garden.frame(0.0);

        for node in garden.nodes() {
            assert!(node.x.is_finite() && node.y.is_finite());
            assert!(node.vx.is_finite() && node.vy.is_finite());
        }
        let survivor = &garden.nodes()[1];
        assert_eq!(survivor.m, 2.0);
        assert_eq!((survivor.x, survivor.y), (50.0, 50.0));
        // (2 * -0.3 + 1 * 0.3) / 3
        assert!((survivor.vx + 0.1).abs() < 1e-12);
        assert_eq!(garden.surface().lines().count(), 0);
    }

    #[test]
    fn test_heavier_first_node_absorbs() {
        let mut garden = two_node_garden();
        place(&mut garden, 0, 50.0, 50.0, 3.0);
        place(&mut garden, 1, 51.0, 50.0, 1.0);

        garden.start();
        garden.frame(0.0);

        assert_eq!(garden.nodes()[0].m, 3.0);
        assert_eq!((garden.nodes()[0].x, garden.nodes()[0].y), (50.0, 50.0));
        assert_eq!(garden.nodes().len(), 2);
    }

    #[test]
    fn test_nodes_advance_after_first_frame() {
        let mut garden = two_node_garden();
        place(&mut garden, 0, 10.0, 10.0, 0.5);
        place(&mut garden, 1, 90.0, 90.0, 0.5);
        garden.nodes_mut()[0].vx = 0.2;

        garden.start();
        garden.frame(100.0);
        garden.frame(100.0 + TARGET_FRAME_MS);

        assert!((garden.nodes()[0].x - 10.2).abs() < 1e-9);
    }

    #[test]
    fn test_pointer_anchor_lifecycle() {
        let mut garden = garden();
        garden.resize(Viewport::new(800.0, 600.0, 1.0));
        let before = garden.nodes().to_vec();

        garden.pointer_down(100.0, 200.0);
        assert_eq!(garden.nodes().len(), before.len() + 1);
        assert!(garden.nodes()[0].is_anchor());
        assert_eq!(garden.nodes()[0].m, 15.0);
        assert_eq!(&garden.nodes()[1..], before.as_slice());

        // A second press moves the held anchor rather than adding another.
        garden.pointer_down(110.0, 210.0);
        garden.pointer_move(300.0, 250.0);
        assert_eq!(garden.nodes().iter().filter(|n| n.is_anchor()).count(), 1);
        assert_eq!((garden.nodes()[0].x, garden.nodes()[0].y), (300.0, 250.0));

        garden.pointer_up();
        assert!(!garden.has_anchor());
        assert_eq!(garden.nodes(), before.as_slice());
    }

    #[test]
    fn test_pointer_move_without_press_is_ignored() {
        let mut garden = garden();
        garden.resize(Viewport::new(800.0, 600.0, 1.0));
        let before = garden.nodes().to_vec();
        garden.pointer_move(10.0, 10.0);
        garden.pointer_up();
        assert_eq!(garden.nodes(), before.as_slice());
    }

    #[test]
    fn test_anchor_not_counted_by_resize() {
        let mut garden = garden();
        garden.pointer_down(5.0, 5.0);
        garden.resize(Viewport::new(800.0, 600.0, 1.0));
        assert_eq!(garden.simulated_count(), 27);
        assert_eq!(garden.nodes().len(), 28);
    }

    #[test]
    fn test_anchor_is_not_drawn() {
        let mut garden = two_node_garden();
        place(&mut garden, 0, 5.0, 5.0, 0.5);
        place(&mut garden, 1, 95.0, 95.0, 0.5);
        garden.pointer_down(50.0, 5.0);

        garden.start();
        garden.frame(0.0);

        assert_eq!(garden.surface().circles().count(), 2);
        // The anchor pulls the near node and draws a line to it.
        assert!(garden.surface().lines().count() >= 1);
        assert!(garden.nodes()[1].vx > 0.0);
    }

    #[test]
    fn test_theme_sets_node_color() {
        let mut garden = two_node_garden();
        garden.set_theme(Theme::Night);
        garden.start();
        garden.frame(0.0);
        for circle in garden.surface().circles() {
            if let DrawCommand::Circle { color, .. } = circle {
                assert_eq!(*color, Theme::Night.node_fill());
            }
        }
    }
}
