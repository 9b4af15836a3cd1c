use glam::Vec2;

use crate::api::config::TowerConfig;
use crate::api::types::{BodyId, Rect};
use crate::core::physics::{BodyDesc, BodyMaterial, PhysicsBody, PhysicsWorld};

/// The elevated platform pieces must land on. Immutable for the session.
#[derive(Debug, Clone)]
pub struct Platform {
    pub id: BodyId,
    pub rect: Rect,
    pub body: PhysicsBody,
}

impl Platform {
    /// Y of the resting surface.
    pub fn top(&self) -> f32 {
        self.rect.top()
    }

    /// Y of the underside; pieces sinking past this are falling out.
    pub fn underside(&self) -> f32 {
        self.rect.bottom()
    }
}

/// One of the two side walls. They guard the upper part of the field and
/// leave a gap at the bottom so fallen pieces exit instead of resting on
/// them.
#[derive(Debug, Clone)]
pub struct Wall {
    pub id: BodyId,
    pub rect: Rect,
    pub body: PhysicsBody,
}

/// All static fixtures, built once per session.
#[derive(Debug, Clone)]
pub struct Arena {
    pub platform: Platform,
    pub walls: [Wall; 2],
}

impl Arena {
    /// Register the platform and walls with the simulation.
    pub fn build(cfg: &TowerConfig, physics: &mut PhysicsWorld, first_id: u32) -> Arena {
        let material = BodyMaterial {
            restitution: cfg.restitution,
            friction: cfg.friction,
            density: cfg.density,
        };

        let platform_rect = cfg.platform_rect();
        let platform_id = BodyId(first_id);
        let platform_body = physics.create_body(
            platform_id,
            &BodyDesc::fixed_box(Vec2::new(
                platform_rect.width() / 2.0,
                platform_rect.height() / 2.0,
            ))
            .with_position(platform_rect.center()),
            material,
        );

        let wall_rects = cfg.wall_rects();
        let walls = [0usize, 1].map(|i| {
            let rect = wall_rects[i];
            let id = BodyId(first_id + 1 + i as u32);
            let body = physics.create_body(
                id,
                &BodyDesc::fixed_box(Vec2::new(rect.width() / 2.0, rect.height() / 2.0))
                    .with_position(rect.center()),
                material,
            );
            Wall { id, rect, body }
        });

        Arena {
            platform: Platform {
                id: platform_id,
                rect: platform_rect,
                body: platform_body,
            },
            walls,
        }
    }

    pub fn is_static(&self, id: BodyId) -> bool {
        id == self.platform.id || self.walls.iter().any(|w| w.id == id)
    }
}
