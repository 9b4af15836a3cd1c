pub mod api;
pub mod components;
pub mod core;
pub mod persist;
pub mod systems;

// Re-export key types at crate root for convenience
pub use crate::api::commands::{Command, CommandQueue};
pub use crate::api::config::TowerConfig;
pub use crate::api::session::{Phase, TowerSession};
pub use crate::api::snapshot::{PieceView, TickSnapshot};
pub use crate::api::types::{BodyId, Direction, GameEvent, Rect, SoundCue};
pub use crate::components::arena::{Arena, Platform, Wall};
pub use crate::components::piece::{Piece, PieceState};
pub use crate::components::shape::{ColorTag, ShapeGrid, Tetromino};
pub use crate::core::physics::{
    BlockShape, BodyDesc, BodyMaterial, BodyType, ContactEvent, ContactPoint, PhysicsBody,
    PhysicsWorld,
};
pub use crate::core::rng::Rng;
pub use crate::core::schedule::{DueAction, Scheduler};
pub use crate::core::time::FixedTimestep;
pub use crate::persist::{JsonScoreStore, Profile, ScoreStore};
pub use crate::systems::camera::CameraScroll;
