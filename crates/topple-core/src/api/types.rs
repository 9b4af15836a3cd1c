use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Unique identifier for a body owned by the session (piece, platform or wall).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BodyId(pub u32);

/// Horizontal nudge direction for the active piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    /// Signed unit factor: -1 for left, +1 for right.
    pub fn sign(self) -> f32 {
        match self {
            Direction::Left => -1.0,
            Direction::Right => 1.0,
        }
    }
}

/// Axis-aligned rectangle in world space. Y grows downward, so `min.y` is the
/// top edge and `max.y` is the bottom edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn from_center(center: Vec2, half: Vec2) -> Self {
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    /// Top edge (smallest y, since up is negative).
    pub fn top(&self) -> f32 {
        self.min.y
    }

    /// Bottom edge (largest y).
    pub fn bottom(&self) -> f32 {
        self.max.y
    }

    pub fn left(&self) -> f32 {
        self.min.x
    }

    pub fn right(&self) -> f32 {
        self.max.x
    }

    pub fn overlaps(&self, other: &Rect) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }

    /// Length of the shared horizontal span, 0 when disjoint.
    pub fn overlap_x(&self, other: &Rect) -> f32 {
        (self.max.x.min(other.max.x) - self.min.x.max(other.min.x)).max(0.0)
    }

    /// Length of the shared vertical span, 0 when disjoint.
    pub fn overlap_y(&self, other: &Rect) -> f32 {
        (self.max.y.min(other.max.y) - self.min.y.max(other.min.y)).max(0.0)
    }

    /// Rectangle grown by `margin` on every side.
    pub fn expanded(&self, margin: f32) -> Rect {
        Rect {
            min: self.min - Vec2::splat(margin),
            max: self.max + Vec2::splat(margin),
        }
    }

    /// Smallest rectangle containing both.
    pub fn merged(&self, other: &Rect) -> Rect {
        Rect {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }
}

/// Events emitted by the session for external UI/persistence collaborators.
/// Drained once per tick; never read back by the core itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    PieceSpawned { id: BodyId },
    PieceLocked { id: BodyId, height_blocks: u32 },
    PieceLost { id: BodyId, lives_left: u32 },
    Milestone { height_blocks: u32, bonus: u32 },
    GameOver { score: u32, height_blocks: u32 },
}

/// Cues forwarded to the external audio collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    Land,
    Fall,
    Milestone,
    GameOver,
}
