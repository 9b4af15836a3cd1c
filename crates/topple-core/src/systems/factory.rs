use glam::Vec2;

use crate::api::config::TowerConfig;
use crate::api::types::BodyId;
use crate::components::piece::Piece;
use crate::components::shape::Tetromino;
use crate::core::physics::{BlockShape, BodyDesc, BodyMaterial, PhysicsWorld};

/// Build the compound rigid body for a tetromino and register it with the
/// simulation: one cuboid block per filled cell, merged under one dynamic
/// body with the stacking material profile.
pub fn build_piece(
    cfg: &TowerConfig,
    physics: &mut PhysicsWorld,
    id: BodyId,
    kind: Tetromino,
    spawn_pos: Vec2,
) -> Piece {
    let half = cfg.block_size / 2.0;
    let blocks: Vec<BlockShape> = kind
        .block_offsets(cfg.block_size)
        .into_iter()
        .map(|offset| BlockShape {
            offset,
            half: Vec2::splat(half),
        })
        .collect();

    let desc = BodyDesc::dynamic(blocks)
        .with_position(spawn_pos)
        .with_angular_damping(cfg.angular_damping)
        .with_extra_angular_inertia(cfg.extra_angular_inertia)
        .with_ccd(true);

    let material = BodyMaterial {
        restitution: cfg.restitution,
        friction: cfg.friction,
        density: cfg.density,
    };

    let body = physics.create_body(id, &desc, material);
    Piece::new(id, kind, body)
}
