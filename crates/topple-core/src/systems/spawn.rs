use glam::Vec2;

use crate::api::config::TowerConfig;
use crate::api::types::Rect;
use crate::components::shape::Tetromino;

/// Bounded retries; each step moves the candidate a fixed distance up, so
/// this is only reachable with a pathological locked-piece layout.
const MAX_RAISES: u32 = 256;

/// Compute a collision-free spawn point for the next piece.
///
/// `occupied` reports whether a candidate rectangle overlaps any locked
/// piece; static geometry is deliberately not part of that test. The result
/// is deterministic: platform center horizontally, a fixed offset below the
/// top of the current camera view, raised in fixed steps until clear.
pub fn plan_spawn(
    cfg: &TowerConfig,
    camera_offset: f32,
    kind: Tetromino,
    mut occupied: impl FnMut(Rect) -> bool,
) -> Vec2 {
    let half = kind.half_extents(cfg.block_size);
    let x = cfg.platform_center_x();
    let mut y = camera_offset + cfg.spawn_view_offset;

    for _ in 0..MAX_RAISES {
        let candidate = Rect::from_center(Vec2::new(x, y), half).expanded(cfg.spawn_clearance);
        if !occupied(candidate) {
            return Vec2::new(x, y);
        }
        y -= cfg.spawn_step;
    }
    log::warn!("spawn planner exhausted retries, spawning at y={}", y);
    Vec2::new(x, y)
}
