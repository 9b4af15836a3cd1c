//! Safe-region monitoring. Any piece, falling or locked, that leaves the
//! platform's safe region costs a life and is removed from the simulation.

use crate::api::config::TowerConfig;
use crate::api::types::Rect;

/// Whether a piece with this bounding box has left the safe region.
///
/// Two ways out: sinking past the platform underside by more than the fall
/// margin, or sliding out sideways (no horizontal overlap with the platform
/// while already down at platform height). The conjunction in the second rule
/// keeps a piece that merely overhangs the edge (but still rests on top)
/// alive.
pub fn has_fallen(cfg: &TowerConfig, piece_aabb: Rect, platform: Rect) -> bool {
    if piece_aabb.bottom() > platform.bottom() + cfg.fall_margin {
        return true;
    }
    piece_aabb.overlap_x(&platform) <= 0.0
        && piece_aabb.bottom() >= platform.top() - cfg.near_platform_band
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn cfg() -> TowerConfig {
        TowerConfig::default()
    }

    fn platform() -> Rect {
        cfg().platform_rect()
    }

    #[test]
    fn piece_below_underside_margin_has_fallen() {
        // Platform spans x 100..300 with its top at 500; a piece whose bottom
        // reaches 560 is past the underside (520) by more than the margin.
        let piece = Rect::from_center(Vec2::new(200.0, 550.0), Vec2::new(20.0, 10.0));
        assert_eq!(piece.bottom(), 560.0);
        assert!(has_fallen(&cfg(), piece, platform()));
    }

    #[test]
    fn piece_resting_on_platform_is_safe() {
        let piece = Rect::from_center(Vec2::new(200.0, 490.0), Vec2::new(20.0, 10.0));
        assert!(!has_fallen(&cfg(), piece, platform()));
    }

    #[test]
    fn overhanging_piece_is_safe() {
        // Sticks out past the right edge but still overlaps the platform.
        let piece = Rect::from_center(Vec2::new(310.0, 490.0), Vec2::new(20.0, 10.0));
        assert!(piece.overlap_x(&platform()) > 0.0);
        assert!(!has_fallen(&cfg(), piece, platform()));
    }

    #[test]
    fn piece_beside_platform_at_its_height_has_fallen() {
        // Fully clear of the platform horizontally and already down at
        // platform height: it slid off the side.
        let piece = Rect::from_center(Vec2::new(340.0, 500.0), Vec2::new(20.0, 10.0));
        assert!(has_fallen(&cfg(), piece, platform()));
    }

    #[test]
    fn piece_beside_platform_but_high_up_is_still_falling() {
        // Horizontally clear, but far above the platform: the camera may
        // still bring it back over the stack, so it hasn't fallen yet.
        let piece = Rect::from_center(Vec2::new(340.0, 200.0), Vec2::new(20.0, 10.0));
        assert!(!has_fallen(&cfg(), piece, platform()));
    }

    #[test]
    fn piece_just_under_the_margin_is_still_falling() {
        let c = cfg();
        // Bottom at underside + margin exactly: not yet past it.
        let bottom = platform().bottom() + c.fall_margin;
        let piece = Rect::new(
            Vec2::new(180.0, bottom - 20.0),
            Vec2::new(220.0, bottom),
        );
        assert!(!has_fallen(&c, piece, platform()));
    }
}
