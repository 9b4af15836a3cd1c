//! Heuristic support scoring for the locked stack. Feedback only: this is
//! not a static-equilibrium analysis and never drives gameplay transitions.

use crate::api::config::TowerConfig;
use crate::api::types::Rect;

/// Score contributed by each supporting neighbor.
const NEIGHBOR_SHARE: f32 = 50.0;

/// Support score for one locked piece in [0, 100].
///
/// A piece resting on the platform is fully supported. Anything else scores
/// by how many other bodies touch it (within the contact tolerance), two
/// neighbors being as good as the platform.
pub fn support_score(cfg: &TowerConfig, piece_aabb: Rect, platform: Rect, others: &[Rect]) -> f32 {
    let on_platform = (piece_aabb.bottom() - platform.top()).abs() <= cfg.contact_tolerance
        && piece_aabb.overlap_x(&platform) > 0.0;
    if on_platform {
        return 100.0;
    }
    let supporters = others
        .iter()
        .filter(|other| piece_aabb.expanded(cfg.contact_tolerance).overlaps(other))
        .count();
    (supporters as f32 * NEIGHBOR_SHARE).min(100.0)
}

/// Aggregate stability of the stack: mean of the per-piece scores, or 100
/// when nothing is locked yet.
pub fn aggregate_stability(cfg: &TowerConfig, locked: &[Rect], platform: Rect) -> f32 {
    if locked.is_empty() {
        return 100.0;
    }
    let total: f32 = locked
        .iter()
        .enumerate()
        .map(|(i, piece)| {
            let others: Vec<Rect> = locked
                .iter()
                .enumerate()
                .filter(|(j, _)| *j != i)
                .map(|(_, r)| *r)
                .collect();
            support_score(cfg, *piece, platform, &others)
        })
        .sum();
    total / locked.len() as f32
}
