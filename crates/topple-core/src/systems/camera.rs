//! Vertical scroll that keeps a growing tower in view.

use crate::api::config::TowerConfig;

/// Camera state: a current and a target vertical offset. Up is negative, so
/// the offset goes negative as the tower outgrows the trigger height.
#[derive(Debug, Clone, Copy)]
pub struct CameraScroll {
    pub offset: f32,
    pub target: f32,
    smoothing: f32,
    trigger: f32,
}

impl CameraScroll {
    pub fn new(cfg: &TowerConfig) -> Self {
        Self {
            offset: 0.0,
            target: 0.0,
            smoothing: cfg.camera_smoothing,
            trigger: cfg.camera_trigger,
        }
    }

    /// Re-aim at the current tower height (world units above the platform).
    /// Heights at or below the trigger keep the camera home.
    pub fn retarget(&mut self, tower_height: f32) {
        self.target = if tower_height > self.trigger {
            -(tower_height - self.trigger)
        } else {
            0.0
        };
    }

    /// Move a fixed fraction of the remaining distance. Exponential
    /// smoothing: converges without overshoot, like the sprite camera's
    /// follow mode.
    pub fn tick(&mut self) {
        self.offset += (self.target - self.offset) * self.smoothing;
    }

    pub fn reset(&mut self) {
        self.offset = 0.0;
        self.target = 0.0;
    }
}

/// Tower height above the platform top from the locked pieces' top edges
/// (smallest y). The active piece is excluded by the caller so a piece in
/// flight never drags the view. Returns 0 for an empty stack.
pub fn tower_height(platform_top: f32, locked_tops: impl Iterator<Item = f32>) -> f32 {
    locked_tops
        .fold(None, |best: Option<f32>, top| {
            Some(best.map_or(top, |b| b.min(top)))
        })
        .map(|highest| (platform_top - highest).max(0.0))
        .unwrap_or(0.0)
}
