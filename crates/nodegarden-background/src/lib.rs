//! Particle background animations for nodegarden.
//!
//! Three interchangeable styles draw through a [`DrawSurface`]:
//! the physics-driven [`NodeGarden`], the drifting [`Constellation`] and
//! pointer-spawned [`Trails`]. [`BackgroundState`] hosts whichever style is
//! active and renders it to a ratatui frame.

mod animations;
mod color;
mod garden;
mod node;
mod state;
mod surface;
mod view;

pub use animations::constellation::{self, Constellation};
pub use animations::trails::{self, Trails};
pub use animations::{Animation, FrameStatus, Viewport};
pub use color::to_terminal_color;
pub use garden::NodeGarden;
pub use node::{Bounds, Distance, Node, NodeKind, NodeOverrides, TARGET_FRAME_MS};
pub use state::{BackgroundSettings, BackgroundState};
pub use surface::{CommandBuffer, DrawCommand, DrawSurface};
pub use view::{DOTS_PER_CELL, GardenView};
