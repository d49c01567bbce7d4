//! The endless runner: world model, obstacle spawning, physics and the session loop.

pub mod catalog;
pub mod collision;
pub mod physics;
pub mod session;
pub mod spawner;
pub mod timer;
pub mod types;

pub use catalog::{ObstacleCatalog, ObstacleVariant};
pub use session::{GameOverAction, GameSession, NullSurface, RenderSurface, TickOutcome};
pub use types::*;
