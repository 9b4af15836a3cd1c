use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::api::types::{BodyId, Rect};
use crate::components::shape::{ColorTag, Tetromino};

/// Render-ready view of one piece.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PieceView {
    pub id: BodyId,
    pub kind: Tetromino,
    pub color: ColorTag,
    pub pos: Vec2,
    pub rotation: f32,
    pub aabb: Rect,
    pub landed: bool,
}

/// Read-only state published after every tick. Rebuilt by copy, so an
/// external reader never observes a half-updated tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TickSnapshot {
    pub tick: u64,
    pub score: u32,
    pub height_blocks: u32,
    pub lives: u32,
    pub stability_pct: f32,
    pub camera_offset: f32,
    pub paused: bool,
    pub game_over: bool,
    pub high_score: u32,
    pub next_kind: Tetromino,
    pub active: Option<PieceView>,
    pub locked: Vec<PieceView>,
}

impl Default for TickSnapshot {
    fn default() -> Self {
        Self {
            tick: 0,
            score: 0,
            height_blocks: 0,
            lives: 0,
            stability_pct: 100.0,
            camera_offset: 0.0,
            paused: false,
            game_over: false,
            high_score: 0,
            next_kind: Tetromino::I,
            active: None,
            locked: Vec::new(),
        }
    }
}
