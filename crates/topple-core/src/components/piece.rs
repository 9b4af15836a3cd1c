use crate::api::types::BodyId;
use crate::components::shape::{ColorTag, Tetromino};
use crate::core::physics::PhysicsBody;

/// Lifecycle of a piece. Landing is terminal: a landed piece never falls
/// again (it can still be removed by the fall monitor).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PieceState {
    Falling,
    Landed,
}

/// One spawned tetromino and its simulation handle.
#[derive(Debug, Clone)]
pub struct Piece {
    pub id: BodyId,
    pub kind: Tetromino,
    pub color: ColorTag,
    pub body: PhysicsBody,
    state: PieceState,
}

impl Piece {
    pub fn new(id: BodyId, kind: Tetromino, body: PhysicsBody) -> Self {
        Self {
            id,
            kind,
            color: kind.color(),
            body,
            state: PieceState::Falling,
        }
    }

    pub fn state(&self) -> PieceState {
        self.state
    }

    pub fn is_landed(&self) -> bool {
        self.state == PieceState::Landed
    }

    /// Write-once transition to Landed. Returns `false` when the piece was
    /// already landed, so a second detection has no effect.
    pub fn mark_landed(&mut self) -> bool {
        if self.state == PieceState::Landed {
            return false;
        }
        self.state = PieceState::Landed;
        true
    }
}
