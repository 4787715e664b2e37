use nodegarden_background::{
    Animation, CommandBuffer, FrameStatus, NodeGarden, NodeOverrides, TARGET_FRAME_MS, Viewport,
};
use nodegarden_core::{GardenParams, Theme};
use rand::{SeedableRng, rngs::StdRng};

/// A started 800x600 garden with a fixed seed.
fn running_garden(seed: u64) -> NodeGarden<CommandBuffer> {
    let mut garden =
        NodeGarden::with_seed(CommandBuffer::new(), GardenParams::default(), Theme::Day, seed);
    garden.resize(Viewport::new(800.0, 600.0, 1.0));
    assert_eq!(garden.start(), FrameStatus::Scheduled);
    garden
}

fn run_frames(garden: &mut NodeGarden<CommandBuffer>, frames: usize) {
    let mut now = 0.0;
    for _ in 0..frames {
        assert_eq!(garden.frame(now), FrameStatus::Scheduled);
        now += TARGET_FRAME_MS;
    }
}

// ==================================================================================
// Long-running invariants
// ==================================================================================

#[test]
fn state_stays_finite_and_bounded() {
    let mut garden = running_garden(5);
    let params = *garden.params();
    let bounds = garden.bounds();

    let mut now = 0.0;
    for _ in 0..600 {
        garden.frame(now);
        now += TARGET_FRAME_MS;

        for node in garden.nodes() {
            assert!(node.x.is_finite() && node.y.is_finite());
            assert!(node.vx.is_finite() && node.vy.is_finite());
            assert!(node.m >= params.mass_min && node.m < params.mass_max);
            assert!(!bounds.is_outside(node.x, node.y, params.edge_margin));
        }
    }
}

#[test]
fn node_count_is_constant_across_frames() {
    let mut garden = running_garden(9);
    run_frames(&mut garden, 300);
    assert_eq!(garden.nodes().len(), 27);
}

#[test]
fn same_seed_same_simulation() {
    let mut a = running_garden(21);
    let mut b = running_garden(21);
    run_frames(&mut a, 120);
    run_frames(&mut b, 120);
    assert_eq!(a.nodes(), b.nodes());
    assert_eq!(a.surface().commands(), b.surface().commands());
}

// ==================================================================================
// Pointer anchor
// ==================================================================================

#[test]
fn anchor_pulls_nodes_while_held() {
    let mut garden = running_garden(2);
    // One node just right of where the pointer lands, the rest parked in a
    // column far out of the anchor's reach.
    let params = *garden.params();
    let bounds = garden.bounds();
    let mut rng = StdRng::seed_from_u64(0);
    for (i, node) in garden.nodes_mut().iter_mut().enumerate() {
        let (x, y) = if i == 0 {
            (430.0, 300.0)
        } else {
            (10.0, 20.0 * i as f64)
        };
        let overrides = NodeOverrides {
            x: Some(x),
            y: Some(y),
            vx: Some(0.0),
            vy: Some(0.0),
            m: Some(0.5),
        };
        node.reset(overrides, &params, bounds, &mut rng);
    }

    garden.pointer_down(400.0, 300.0);
    garden.frame(0.0);
    garden.frame(TARGET_FRAME_MS);

    // The first simulated node sits right of the anchor and is pulled left.
    let pulled = &garden.nodes()[1];
    assert!(pulled.vx < 0.0);
    assert!(pulled.x < 430.0);

    // The anchor itself never moves on its own.
    assert_eq!((garden.nodes()[0].x, garden.nodes()[0].y), (400.0, 300.0));

    garden.pointer_up();
    assert!(!garden.has_anchor());
    assert_eq!(garden.nodes().len(), 27);
}

#[test]
fn stop_ends_the_frame_chain() {
    let mut garden = running_garden(4);
    run_frames(&mut garden, 3);
    garden.stop();
    assert_eq!(garden.frame(100.0), FrameStatus::Idle);
    assert_eq!(garden.start(), FrameStatus::Scheduled);
    assert_eq!(garden.start(), FrameStatus::Idle);
}
