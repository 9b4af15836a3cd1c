use anyhow::{ensure, Result};
use glam::Vec2;

use crate::api::types::Rect;

/// Session configuration. All geometry is in world units (pixels), with the
/// origin at the top-left of the initial view and Y growing downward.
#[derive(Debug, Clone)]
pub struct TowerConfig {
    /// Play field width in world units.
    pub world_width: f32,
    /// Play field height in world units.
    pub world_height: f32,
    /// Edge length of one tetromino cell.
    pub block_size: f32,

    /// Width of the elevated platform (narrower than the field).
    pub platform_width: f32,
    /// Y of the platform's top surface.
    pub platform_top: f32,
    /// Platform slab thickness.
    pub platform_thickness: f32,

    /// Thickness of the two side walls.
    pub wall_thickness: f32,
    /// Fraction of the field height covered by the walls, measured from the
    /// top. The remainder is an open gap so fallen pieces can exit sideways.
    pub wall_coverage: f32,

    /// Downward gravity in world units per second squared.
    pub gravity: f32,
    /// Fixed simulation timestep in seconds.
    pub fixed_dt: f32,

    /// Piece surface friction (high, so stacks grip).
    pub friction: f32,
    /// Piece restitution (zero, so landings don't bounce).
    pub restitution: f32,
    /// Piece collider density.
    pub density: f32,
    /// Angular damping applied to pieces.
    pub angular_damping: f32,
    /// Extra rotational inertia added to each piece so glancing contacts
    /// don't spin it.
    pub extra_angular_inertia: f32,

    /// Positional slack when deciding two surfaces are touching. Larger than
    /// the physics engine's own numerical tolerance.
    pub contact_tolerance: f32,
    /// Minimum share of the narrower extent that must overlap along the
    /// tangential axis for a contact to count as support.
    pub min_overlap_fraction: f32,
    /// Speed below which the per-tick rest poll runs for the active piece.
    pub landing_speed: f32,
    /// Velocity away from a surface above which a contact is rejected.
    pub parting_speed: f32,

    /// How far past the platform underside a piece may sink before it counts
    /// as fallen.
    pub fall_margin: f32,
    /// Vertical band around platform height used by the sideways fall rule.
    pub near_platform_band: f32,

    /// Spawn y below the top of the current camera view.
    pub spawn_view_offset: f32,
    /// Extra clearance required around a spawn candidate.
    pub spawn_clearance: f32,
    /// How far the candidate moves up per occupied retry.
    pub spawn_step: f32,

    /// Tower height at which the camera starts scrolling.
    pub camera_trigger: f32,
    /// Fraction of the remaining distance the camera covers per tick.
    pub camera_smoothing: f32,

    /// Ticks between a piece locking and its sleep hint.
    pub settle_delay_ticks: u32,
    /// Ticks between a piece locking and the next spawn.
    pub spawn_delay_ticks: u32,
    /// Ticks between a life loss and the recovery spawn.
    pub respawn_delay_ticks: u32,

    /// Minimum ticks between horizontal nudges.
    pub move_cooldown_ticks: u32,
    /// Minimum ticks between rotations.
    pub rotate_cooldown_ticks: u32,
    /// Horizontal speed applied by a move command.
    pub move_speed: f32,
    /// Downward speed applied by a drop command.
    pub drop_speed: f32,

    pub starting_lives: u32,
    /// Every this many blocks of height, a one-time milestone fires.
    pub milestone_blocks: u32,
    /// Score bonus per milestone.
    pub milestone_bonus: u32,

    /// Seed for the piece sequence. Equal seeds replay identically.
    pub rng_seed: u64,
}

impl Default for TowerConfig {
    fn default() -> Self {
        Self {
            world_width: 400.0,
            world_height: 600.0,
            block_size: 20.0,
            platform_width: 200.0,
            platform_top: 500.0,
            platform_thickness: 20.0,
            wall_thickness: 20.0,
            wall_coverage: 2.0 / 3.0,
            gravity: 900.0,
            fixed_dt: 1.0 / 60.0,
            friction: 1.0,
            restitution: 0.0,
            density: 1.0,
            angular_damping: 0.6,
            extra_angular_inertia: 40_000.0,
            contact_tolerance: 4.0,
            min_overlap_fraction: 0.25,
            landing_speed: 25.0,
            parting_speed: 40.0,
            fall_margin: 30.0,
            near_platform_band: 6.0,
            spawn_view_offset: 80.0,
            spawn_clearance: 10.0,
            spawn_step: 40.0,
            camera_trigger: 160.0,
            camera_smoothing: 0.12,
            settle_delay_ticks: 30,
            spawn_delay_ticks: 36,
            respawn_delay_ticks: 60,
            move_cooldown_ticks: 6,
            rotate_cooldown_ticks: 12,
            move_speed: 160.0,
            drop_speed: 480.0,
            starting_lives: 3,
            milestone_blocks: 5,
            milestone_bonus: 250,
            rng_seed: 0x70_77_3e,
        }
    }
}

impl TowerConfig {
    /// Reject degenerate geometry and parameters before any tick runs.
    pub fn validate(&self) -> Result<()> {
        ensure!(self.world_width > 0.0, "world width must be positive");
        ensure!(self.world_height > 0.0, "world height must be positive");
        ensure!(self.block_size > 0.0, "block size must be positive");
        ensure!(
            self.platform_width > 0.0 && self.platform_width < self.world_width,
            "platform must be narrower than the field ({} vs {})",
            self.platform_width,
            self.world_width
        );
        ensure!(self.platform_thickness > 0.0, "platform thickness must be positive");
        ensure!(self.fixed_dt > 0.0, "fixed timestep must be positive");
        ensure!(
            self.camera_smoothing > 0.0 && self.camera_smoothing <= 1.0,
            "camera smoothing must be in (0, 1]"
        );
        ensure!(
            self.min_overlap_fraction > 0.0 && self.min_overlap_fraction <= 1.0,
            "overlap fraction must be in (0, 1]"
        );
        ensure!(self.contact_tolerance > 0.0, "contact tolerance must be positive");
        ensure!(self.starting_lives > 0, "at least one life is required");
        ensure!(self.milestone_blocks > 0, "milestone interval must be positive");
        Ok(())
    }

    /// Horizontal center of the platform (and of the field).
    pub fn platform_center_x(&self) -> f32 {
        self.world_width / 2.0
    }

    /// Full platform slab as a rectangle.
    pub fn platform_rect(&self) -> Rect {
        let half_w = self.platform_width / 2.0;
        let cx = self.platform_center_x();
        Rect::new(
            Vec2::new(cx - half_w, self.platform_top),
            Vec2::new(cx + half_w, self.platform_top + self.platform_thickness),
        )
    }

    /// Left and right wall slabs. Each covers the upper part of its side and
    /// leaves the bottom open.
    pub fn wall_rects(&self) -> [Rect; 2] {
        let bottom = self.world_height * self.wall_coverage;
        [
            Rect::new(Vec2::new(0.0, 0.0), Vec2::new(self.wall_thickness, bottom)),
            Rect::new(
                Vec2::new(self.world_width - self.wall_thickness, 0.0),
                Vec2::new(self.world_width, bottom),
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(TowerConfig::default().validate().is_ok());
    }

    #[test]
    fn platform_rect_is_centered() {
        let cfg = TowerConfig::default();
        let p = cfg.platform_rect();
        assert_eq!(p.left(), 100.0);
        assert_eq!(p.right(), 300.0);
        assert_eq!(p.top(), 500.0);
        assert_eq!(p.bottom(), 520.0);
    }

    #[test]
    fn walls_leave_a_bottom_gap() {
        let cfg = TowerConfig::default();
        let [left, right] = cfg.wall_rects();
        assert_eq!(left.bottom(), 400.0);
        assert_eq!(right.bottom(), 400.0);
        assert!(left.bottom() < cfg.platform_top);
        assert_eq!(right.right(), cfg.world_width);
    }

    #[test]
    fn rejects_platform_wider_than_field() {
        let cfg = TowerConfig {
            platform_width: 500.0,
            ..TowerConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_zero_block_size() {
        let cfg = TowerConfig {
            block_size: 0.0,
            ..TowerConfig::default()
        };
        assert!(cfg.validate().is_err());
    }
}
