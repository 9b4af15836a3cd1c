//! Rest detection for the active falling piece.
//!
//! Two triggers feed one authoritative rule. Contact events from the physics
//! step are validated against the rule as they arrive; a per-tick poll
//! re-derives rest from scratch once the piece is slow, so a missed or
//! ambiguous event cannot strand a piece in the falling state. Both paths
//! share the same tolerances, so they cannot disagree.

use glam::Vec2;

use crate::api::config::TowerConfig;
use crate::api::types::Rect;
use crate::components::piece::Piece;
use crate::core::physics::{ContactPoint, PhysicsBody, PhysicsWorld};

fn min_overlap(cfg: &TowerConfig, a: f32, b: f32) -> f32 {
    cfg.min_overlap_fraction * a.min(b)
}

/// Validate a reported contact as a resting contact.
///
/// `top_only` restricts the test to the support's upper surface (used for the
/// platform, whose sides are never a valid resting place). For locked pieces
/// both the top and the sides qualify.
pub fn contact_rest_qualifies(
    cfg: &TowerConfig,
    contact: &ContactPoint,
    piece_aabb: Rect,
    piece_vel: Vec2,
    support_aabb: Rect,
    top_only: bool,
) -> bool {
    let tol = cfg.contact_tolerance;
    if contact.dist > tol {
        return false;
    }

    if contact.normal.y.abs() >= contact.normal.x.abs() {
        // Vertical contact: the support must be below the piece.
        if contact.normal.y <= 0.0 {
            return false;
        }
        let on_surface = (contact.point.y - support_aabb.top()).abs() <= tol;
        let approaching = piece_vel.y >= -cfg.parting_speed;
        let overlap = piece_aabb.overlap_x(&support_aabb)
            >= min_overlap(cfg, piece_aabb.width(), support_aabb.width());
        on_surface && approaching && overlap
    } else {
        if top_only {
            return false;
        }
        // Side contact: only a slow piece can come to rest leaning against
        // the stack; a fast one is sliding past.
        if piece_vel.y.abs() > cfg.landing_speed {
            return false;
        }
        let near_side = (contact.point.x - support_aabb.left()).abs() <= tol
            || (contact.point.x - support_aabb.right()).abs() <= tol;
        let toward = piece_aabb.center().x - support_aabb.center().x;
        let parting = toward.signum() * piece_vel.x > cfg.parting_speed;
        let overlap = piece_aabb.overlap_y(&support_aabb)
            >= min_overlap(cfg, piece_aabb.height(), support_aabb.height());
        near_side && !parting && overlap
    }
}

/// Vertex-precise rest test against the support's upper surface. Handles
/// rotated pieces whose true contact points are corners, not the AABB.
pub fn vertices_rest_on_top(
    cfg: &TowerConfig,
    verts: &[Vec2],
    piece_aabb: Rect,
    piece_vel: Vec2,
    support_aabb: Rect,
) -> bool {
    let tol = cfg.contact_tolerance;
    let top = support_aabb.top();
    let touching = verts.iter().any(|v| {
        (v.y - top).abs() <= tol
            && v.x >= support_aabb.left() - tol
            && v.x <= support_aabb.right() + tol
    });
    touching
        && piece_aabb.top() < top
        && piece_vel.y >= -cfg.parting_speed
        && piece_aabb.overlap_x(&support_aabb)
            >= min_overlap(cfg, piece_aabb.width(), support_aabb.width())
}

/// Vertex-precise rest test against a support's side face.
pub fn vertices_rest_on_side(
    cfg: &TowerConfig,
    verts: &[Vec2],
    piece_aabb: Rect,
    piece_vel: Vec2,
    support_aabb: Rect,
) -> bool {
    let tol = cfg.contact_tolerance;
    if piece_vel.y.abs() > cfg.landing_speed {
        return false;
    }
    let touching = [support_aabb.left(), support_aabb.right()]
        .into_iter()
        .any(|side_x| {
            verts.iter().any(|v| {
                (v.x - side_x).abs() <= tol
                    && v.y >= support_aabb.top() - tol
                    && v.y <= support_aabb.bottom() + tol
            })
        });
    let toward = piece_aabb.center().x - support_aabb.center().x;
    let parting = toward.signum() * piece_vel.x > cfg.parting_speed;
    touching
        && !parting
        && piece_aabb.overlap_y(&support_aabb)
            >= min_overlap(cfg, piece_aabb.height(), support_aabb.height())
}

/// Coarse AABB band test against the platform top. Last resort when the
/// vertex set is inconclusive (e.g. a near-axis-aligned piece straddling the
/// numeric edge of the tolerance).
pub fn aabb_rests_on_platform(
    cfg: &TowerConfig,
    piece_aabb: Rect,
    piece_vel: Vec2,
    platform: Rect,
) -> bool {
    (piece_aabb.bottom() - platform.top()).abs() <= cfg.contact_tolerance
        && piece_aabb.overlap_x(&platform) > 0.0
        && piece_vel.y >= -cfg.parting_speed
}

/// Event trigger: validate a contact-started event between the active piece
/// and a candidate support body. The contact is checked against each block
/// of the support separately, so resting on the low ledge of an L works the
/// same as resting on a flat top.
pub fn event_rest(
    cfg: &TowerConfig,
    physics: &PhysicsWorld,
    active: &Piece,
    support_body: &PhysicsBody,
    top_only: bool,
) -> bool {
    let Some(contact) = physics.closest_contact(&active.body, support_body, cfg.contact_tolerance)
    else {
        return false;
    };
    let Some(piece_aabb) = physics.body_aabb(&active.body) else {
        return false;
    };
    let piece_vel = physics.velocity(&active.body);
    physics
        .collider_rects(support_body)
        .into_iter()
        .any(|rect| contact_rest_qualifies(cfg, &contact, piece_aabb, piece_vel, rect, top_only))
}

/// Polling trigger, run every tick: once the piece is slow, re-derive rest
/// against the platform and every locked piece.
pub fn poll_rest<'a>(
    cfg: &TowerConfig,
    physics: &PhysicsWorld,
    active: &Piece,
    platform: Rect,
    locked: impl Iterator<Item = &'a Piece>,
) -> bool {
    let vel = physics.velocity(&active.body);
    if vel.length() > cfg.landing_speed {
        return false;
    }
    let Some(aabb) = physics.body_aabb(&active.body) else {
        return false;
    };
    let verts = physics.world_vertices(&active.body);

    if vertices_rest_on_top(cfg, &verts, aabb, vel, platform) {
        return true;
    }
    for piece in locked {
        for support in physics.collider_rects(&piece.body) {
            if vertices_rest_on_top(cfg, &verts, aabb, vel, support)
                || vertices_rest_on_side(cfg, &verts, aabb, vel, support)
            {
                return true;
            }
        }
    }
    aabb_rests_on_platform(cfg, aabb, vel, platform)
}
