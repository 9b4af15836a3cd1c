use glam::Vec2;
use rapier2d::parry::query;
use rapier2d::prelude::*;
use std::sync::Mutex;

use crate::api::types::{BodyId, Rect};

// ---------------------------------------------------------------------------
// Conversion helpers (private) — glam ↔ nalgebra
// ---------------------------------------------------------------------------

fn vec2_to_na(v: Vec2) -> nalgebra::Vector2<f32> {
    nalgebra::Vector2::new(v.x, v.y)
}

fn na_to_vec2(v: &nalgebra::Vector2<f32>) -> Vec2 {
    Vec2::new(v.x, v.y)
}

fn na_point_to_vec2(p: &nalgebra::Point2<f32>) -> Vec2 {
    Vec2::new(p.x, p.y)
}

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// The kind of rigid body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyType {
    Dynamic,
    Fixed,
}

impl BodyType {
    fn to_rapier(self) -> RigidBodyType {
        match self {
            BodyType::Dynamic => RigidBodyType::Dynamic,
            BodyType::Fixed => RigidBodyType::Fixed,
        }
    }
}

/// One rectangular collider of a body, placed relative to the body origin.
/// A tetromino is a set of these, one per filled cell; static fixtures use a
/// single block at the origin.
#[derive(Debug, Clone, Copy)]
pub struct BlockShape {
    pub offset: Vec2,
    pub half: Vec2,
}

impl BlockShape {
    pub fn at_origin(half: Vec2) -> Self {
        Self {
            offset: Vec2::ZERO,
            half,
        }
    }
}

/// Physical material properties shared by all of a body's colliders.
#[derive(Debug, Clone, Copy)]
pub struct BodyMaterial {
    pub restitution: f32,
    pub friction: f32,
    pub density: f32,
}

impl Default for BodyMaterial {
    fn default() -> Self {
        // Low-bounce, high-grip stacking profile.
        Self {
            restitution: 0.0,
            friction: 1.0,
            density: 1.0,
        }
    }
}

/// Builder for describing a rigid body before creation.
#[derive(Debug, Clone)]
pub struct BodyDesc {
    pub body_type: BodyType,
    pub position: Vec2,
    pub rotation: f32,
    pub velocity: Vec2,
    pub linear_damping: f32,
    pub angular_damping: f32,
    pub ccd: bool,
    /// Extra rotational inertia merged into the collider-derived mass
    /// properties. Zero leaves them untouched.
    pub extra_angular_inertia: f32,
    pub blocks: Vec<BlockShape>,
}

impl BodyDesc {
    /// A dynamic compound body made of the given blocks.
    pub fn dynamic(blocks: Vec<BlockShape>) -> Self {
        Self {
            body_type: BodyType::Dynamic,
            position: Vec2::ZERO,
            rotation: 0.0,
            velocity: Vec2::ZERO,
            linear_damping: 0.0,
            angular_damping: 0.0,
            ccd: false,
            extra_angular_inertia: 0.0,
            blocks,
        }
    }

    /// A fixed (static) box centered on the body position.
    pub fn fixed_box(half: Vec2) -> Self {
        Self {
            body_type: BodyType::Fixed,
            position: Vec2::ZERO,
            rotation: 0.0,
            velocity: Vec2::ZERO,
            linear_damping: 0.0,
            angular_damping: 0.0,
            ccd: false,
            extra_angular_inertia: 0.0,
            blocks: vec![BlockShape::at_origin(half)],
        }
    }

    pub fn with_position(mut self, pos: Vec2) -> Self {
        self.position = pos;
        self
    }

    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_velocity(mut self, vel: Vec2) -> Self {
        self.velocity = vel;
        self
    }

    pub fn with_ccd(mut self, enabled: bool) -> Self {
        self.ccd = enabled;
        self
    }

    pub fn with_linear_damping(mut self, damping: f32) -> Self {
        self.linear_damping = damping;
        self
    }

    pub fn with_angular_damping(mut self, damping: f32) -> Self {
        self.angular_damping = damping;
        self
    }

    pub fn with_extra_angular_inertia(mut self, inertia: f32) -> Self {
        self.extra_angular_inertia = inertia;
        self
    }
}

/// Handles stored on a gameplay entity, referencing Rapier internals.
/// Compound pieces own one collider handle per block.
#[derive(Debug, Clone)]
pub struct PhysicsBody {
    pub body_handle: RigidBodyHandle,
    pub collider_handles: Vec<ColliderHandle>,
}

/// A begin/end contact between two session bodies, drained after each step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContactEvent {
    pub a: BodyId,
    pub b: BodyId,
    /// `true` when the contact just started, `false` when it ended.
    pub started: bool,
}

impl ContactEvent {
    /// The other participant, if `id` is one of the pair.
    pub fn other(&self, id: BodyId) -> Option<BodyId> {
        if self.a == id {
            Some(self.b)
        } else if self.b == id {
            Some(self.a)
        } else {
            None
        }
    }
}

/// Closest-point result of a pairwise body query.
#[derive(Debug, Clone, Copy)]
pub struct ContactPoint {
    /// World-space point on the first body.
    pub point: Vec2,
    /// World-space normal on the first body, pointing toward the second.
    pub normal: Vec2,
    /// Signed distance; negative means penetration.
    pub dist: f32,
}

// ---------------------------------------------------------------------------
// Event collector
// ---------------------------------------------------------------------------

struct ContactEventCollector {
    collisions: Mutex<Vec<CollisionEvent>>,
}

impl ContactEventCollector {
    fn new() -> Self {
        Self {
            collisions: Mutex::new(Vec::new()),
        }
    }

    fn drain_collisions(&self) -> Vec<CollisionEvent> {
        std::mem::take(&mut *self.collisions.lock().unwrap())
    }
}

impl EventHandler for ContactEventCollector {
    fn handle_collision_event(
        &self,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        event: CollisionEvent,
        _contact_pair: Option<&ContactPair>,
    ) {
        self.collisions.lock().unwrap().push(event);
    }

    fn handle_contact_force_event(
        &self,
        _dt: f32,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        _contact_pair: &ContactPair,
        _total_force_magnitude: f32,
    ) {
        // Contact forces are not consumed by the gameplay layer.
    }
}

// ---------------------------------------------------------------------------
// PhysicsWorld
// ---------------------------------------------------------------------------

/// Wraps all Rapier2D boilerplate into a single struct. The gameplay layer
/// only ever talks to the simulation through this surface: step, body
/// registry, region/pair queries and per-body reads.
pub struct PhysicsWorld {
    gravity: nalgebra::Vector2<f32>,
    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
    event_collector: ContactEventCollector,
}

impl PhysicsWorld {
    /// Create a new physics world. Y grows downward, so a stacking game
    /// passes positive `gravity.y`.
    pub fn new(gravity: Vec2) -> Self {
        Self {
            gravity: vec2_to_na(gravity),
            integration_parameters: IntegrationParameters::default(),
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            event_collector: ContactEventCollector::new(),
        }
    }

    /// Set the integration timestep.
    pub fn set_dt(&mut self, dt: f32) {
        self.integration_parameters.dt = dt;
    }

    /// Create a rigid body with one cuboid collider per block.
    /// The BodyId is stored in the body's `user_data` for contact lookups.
    pub fn create_body(
        &mut self,
        id: BodyId,
        desc: &BodyDesc,
        material: BodyMaterial,
    ) -> PhysicsBody {
        let mut builder = RigidBodyBuilder::new(desc.body_type.to_rapier())
            .translation(vec2_to_na(desc.position))
            .rotation(desc.rotation)
            .linvel(vec2_to_na(desc.velocity))
            .linear_damping(desc.linear_damping)
            .angular_damping(desc.angular_damping)
            .ccd_enabled(desc.ccd)
            .user_data(id.0 as u128);
        if desc.extra_angular_inertia > 0.0 {
            builder = builder.additional_mass_properties(MassProperties::new(
                nalgebra::Point2::new(0.0, 0.0),
                0.0,
                desc.extra_angular_inertia,
            ));
        }
        let body_handle = self.bodies.insert(builder.build());

        let mut collider_handles = Vec::with_capacity(desc.blocks.len());
        for block in &desc.blocks {
            let collider = ColliderBuilder::cuboid(block.half.x, block.half.y)
                .translation(vec2_to_na(block.offset))
                .restitution(material.restitution)
                .friction(material.friction)
                .density(material.density)
                .active_events(ActiveEvents::COLLISION_EVENTS)
                .build();
            collider_handles.push(self.colliders.insert_with_parent(
                collider,
                body_handle,
                &mut self.bodies,
            ));
        }

        PhysicsBody {
            body_handle,
            collider_handles,
        }
    }

    /// Remove a body and all its colliders. Touching bodies are woken so a
    /// stack resettles when its support disappears.
    pub fn remove_body(&mut self, body: &PhysicsBody) {
        self.bodies.remove(
            body.body_handle,
            &mut self.island_manager,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
    }

    /// Step the simulation and collect contact events into the provided Vec.
    pub fn step_into(&mut self, contact_events: &mut Vec<ContactEvent>) {
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &self.event_collector,
        );

        for event in self.event_collector.drain_collisions() {
            let (h1, h2, started) = match event {
                CollisionEvent::Started(h1, h2, _) => (h1, h2, true),
                CollisionEvent::Stopped(h1, h2, _) => (h1, h2, false),
            };
            let a = self.collider_to_id(h1);
            let b = self.collider_to_id(h2);
            if let (Some(a), Some(b)) = (a, b) {
                contact_events.push(ContactEvent { a, b, started });
            }
        }
    }

    /// Current position and rotation of a body.
    pub fn body_position(&self, body: &PhysicsBody) -> (Vec2, f32) {
        self.bodies
            .get(body.body_handle)
            .map(|rb| (na_to_vec2(rb.translation()), rb.rotation().angle()))
            .unwrap_or((Vec2::ZERO, 0.0))
    }

    /// Teleport a body, waking it.
    pub fn set_position(&mut self, body: &PhysicsBody, pos: Vec2, rotation: f32) {
        if let Some(rb) = self.bodies.get_mut(body.body_handle) {
            rb.set_position(
                nalgebra::Isometry2::new(vec2_to_na(pos), rotation),
                true,
            );
        }
    }

    /// Current linear velocity of a body.
    pub fn velocity(&self, body: &PhysicsBody) -> Vec2 {
        self.bodies
            .get(body.body_handle)
            .map(|rb| na_to_vec2(rb.linvel()))
            .unwrap_or(Vec2::ZERO)
    }

    /// Set the linear velocity of a body directly, waking it.
    pub fn set_velocity(&mut self, body: &PhysicsBody, vel: Vec2) {
        if let Some(rb) = self.bodies.get_mut(body.body_handle) {
            rb.set_linvel(vec2_to_na(vel), true);
        }
    }

    /// Snap a body's rotation, waking it.
    pub fn set_rotation(&mut self, body: &PhysicsBody, angle: f32) {
        if let Some(rb) = self.bodies.get_mut(body.body_handle) {
            rb.set_rotation(nalgebra::UnitComplex::new(angle), true);
        }
    }

    /// Zero a body's angular velocity.
    pub fn set_angvel(&mut self, body: &PhysicsBody, angvel: f32) {
        if let Some(rb) = self.bodies.get_mut(body.body_handle) {
            rb.set_angvel(angvel, true);
        }
    }

    /// Hint that a body no longer needs fine-grained simulation. Rapier wakes
    /// it again on any new contact, so this is never load-bearing.
    pub fn sleep(&mut self, body: &PhysicsBody) {
        if let Some(rb) = self.bodies.get_mut(body.body_handle) {
            rb.sleep();
        }
    }

    pub fn wake(&mut self, body: &PhysicsBody) {
        if let Some(rb) = self.bodies.get_mut(body.body_handle) {
            rb.wake_up(true);
        }
    }

    /// World-space bounding box of a body: the union over its colliders.
    /// `None` once the body has been removed.
    pub fn body_aabb(&self, body: &PhysicsBody) -> Option<Rect> {
        let mut merged: Option<Rect> = None;
        for handle in &body.collider_handles {
            let collider = self.colliders.get(*handle)?;
            let aabb = collider.compute_aabb();
            let rect = Rect::new(
                Vec2::new(aabb.mins.x, aabb.mins.y),
                Vec2::new(aabb.maxs.x, aabb.maxs.y),
            );
            merged = Some(match merged {
                Some(m) => m.merged(&rect),
                None => rect,
            });
        }
        merged
    }

    /// World-space corner vertices of every cuboid collider of the body.
    /// Captures the true rotated outline, unlike the axis-aligned AABB.
    pub fn world_vertices(&self, body: &PhysicsBody) -> Vec<Vec2> {
        let mut verts = Vec::with_capacity(body.collider_handles.len() * 4);
        for handle in &body.collider_handles {
            let Some(collider) = self.colliders.get(*handle) else {
                continue;
            };
            let Some(cuboid) = collider.shape().as_cuboid() else {
                continue;
            };
            let h = cuboid.half_extents;
            let iso = collider.position();
            for (sx, sy) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
                let local = nalgebra::Point2::new(h.x * sx, h.y * sy);
                verts.push(na_point_to_vec2(&iso.transform_point(&local)));
            }
        }
        verts
    }

    /// World-space bounding box of each collider of the body, one per block.
    /// For validating rest against the true cell surfaces of a compound,
    /// where the merged AABB would lie.
    pub fn collider_rects(&self, body: &PhysicsBody) -> Vec<Rect> {
        body.collider_handles
            .iter()
            .filter_map(|handle| {
                let aabb = self.colliders.get(*handle)?.compute_aabb();
                Some(Rect::new(
                    Vec2::new(aabb.mins.x, aabb.mins.y),
                    Vec2::new(aabb.maxs.x, aabb.maxs.y),
                ))
            })
            .collect()
    }

    /// Ids of all bodies whose bounding box intersects the region.
    pub fn bodies_in_region(&self, region: Rect) -> Vec<BodyId> {
        let mut hits: Vec<BodyId> = Vec::new();
        for (_, collider) in self.colliders.iter() {
            let aabb = collider.compute_aabb();
            let rect = Rect::new(
                Vec2::new(aabb.mins.x, aabb.mins.y),
                Vec2::new(aabb.maxs.x, aabb.maxs.y),
            );
            if !region.overlaps(&rect) {
                continue;
            }
            let Some(id) = collider
                .parent()
                .and_then(|bh| self.bodies.get(bh))
                .map(|rb| BodyId(rb.user_data as u32))
            else {
                continue;
            };
            if !hits.contains(&id) {
                hits.push(id);
            }
        }
        hits
    }

    /// Closest contact between two bodies, within `prediction` distance.
    /// Scans all collider pairs of the two compounds and keeps the deepest.
    pub fn closest_contact(
        &self,
        a: &PhysicsBody,
        b: &PhysicsBody,
        prediction: f32,
    ) -> Option<ContactPoint> {
        let mut best: Option<ContactPoint> = None;
        for ha in &a.collider_handles {
            let Some(ca) = self.colliders.get(*ha) else {
                continue;
            };
            for hb in &b.collider_handles {
                let Some(cb) = self.colliders.get(*hb) else {
                    continue;
                };
                let contact = query::contact(
                    ca.position(),
                    ca.shape(),
                    cb.position(),
                    cb.shape(),
                    prediction,
                );
                if let Ok(Some(c)) = contact {
                    let candidate = ContactPoint {
                        point: na_point_to_vec2(&c.point1),
                        normal: na_to_vec2(&c.normal1.into_inner()),
                        dist: c.dist,
                    };
                    if best.map_or(true, |p| candidate.dist < p.dist) {
                        best = Some(candidate);
                    }
                }
            }
        }
        best
    }

    /// Number of rigid bodies in the simulation.
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    // -- private helpers --

    fn collider_to_id(&self, collider_handle: ColliderHandle) -> Option<BodyId> {
        let collider = self.colliders.get(collider_handle)?;
        let body_handle = collider.parent()?;
        let body = self.bodies.get(body_handle)?;
        Some(BodyId(body.user_data as u32))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn square_blocks(half: f32) -> Vec<BlockShape> {
        vec![BlockShape::at_origin(Vec2::splat(half))]
    }

    #[test]
    fn create_and_remove_body() {
        let mut world = PhysicsWorld::new(Vec2::ZERO);
        let body = world.create_body(
            BodyId(1),
            &BodyDesc::dynamic(square_blocks(10.0)),
            BodyMaterial::default(),
        );
        assert_eq!(world.body_count(), 1);
        world.remove_body(&body);
        assert_eq!(world.body_count(), 0);
    }

    #[test]
    fn gravity_pulls_dynamic_body_down() {
        let mut world = PhysicsWorld::new(Vec2::new(0.0, 900.0));
        world.set_dt(1.0 / 60.0);
        let body = world.create_body(
            BodyId(1),
            &BodyDesc::dynamic(square_blocks(5.0)),
            BodyMaterial::default(),
        );
        let (initial, _) = world.body_position(&body);
        let mut events = Vec::new();
        for _ in 0..10 {
            world.step_into(&mut events);
        }
        let (pos, _) = world.body_position(&body);
        assert!(
            pos.y > initial.y,
            "body should fall: start={}, end={}",
            initial.y,
            pos.y
        );
    }

    #[test]
    fn compound_body_owns_one_collider_per_block() {
        let mut world = PhysicsWorld::new(Vec2::ZERO);
        let blocks = vec![
            BlockShape {
                offset: Vec2::new(-10.0, 0.0),
                half: Vec2::splat(10.0),
            },
            BlockShape {
                offset: Vec2::new(10.0, 0.0),
                half: Vec2::splat(10.0),
            },
        ];
        let body = world.create_body(BodyId(1), &BodyDesc::dynamic(blocks), BodyMaterial::default());
        assert_eq!(body.collider_handles.len(), 2);
        assert_eq!(world.body_count(), 1);
    }

    #[test]
    fn body_aabb_unions_all_blocks() {
        let mut world = PhysicsWorld::new(Vec2::ZERO);
        let blocks = vec![
            BlockShape {
                offset: Vec2::new(-10.0, 0.0),
                half: Vec2::splat(10.0),
            },
            BlockShape {
                offset: Vec2::new(10.0, 0.0),
                half: Vec2::splat(10.0),
            },
        ];
        let body = world.create_body(
            BodyId(1),
            &BodyDesc::dynamic(blocks).with_position(Vec2::new(100.0, 50.0)),
            BodyMaterial::default(),
        );
        let aabb = world.body_aabb(&body).expect("body exists");
        assert!((aabb.left() - 80.0).abs() < 0.01);
        assert!((aabb.right() - 120.0).abs() < 0.01);
        assert!((aabb.top() - 40.0).abs() < 0.01);
        assert!((aabb.bottom() - 60.0).abs() < 0.01);
    }

    #[test]
    fn world_vertices_rotate_with_the_body() {
        let mut world = PhysicsWorld::new(Vec2::ZERO);
        let body = world.create_body(
            BodyId(1),
            &BodyDesc::dynamic(square_blocks(10.0))
                .with_position(Vec2::new(0.0, 0.0))
                .with_rotation(std::f32::consts::FRAC_PI_4),
            BodyMaterial::default(),
        );
        let verts = world.world_vertices(&body);
        assert_eq!(verts.len(), 4);
        // A square rotated 45° has a corner straight below its center.
        let lowest = verts
            .iter()
            .map(|v| v.y)
            .fold(f32::MIN, f32::max);
        let expected = 10.0 * std::f32::consts::SQRT_2;
        assert!(
            (lowest - expected).abs() < 0.01,
            "lowest vertex {} vs {}",
            lowest,
            expected
        );
    }

    #[test]
    fn bodies_in_region_filters_by_aabb() {
        let mut world = PhysicsWorld::new(Vec2::ZERO);
        world.create_body(
            BodyId(1),
            &BodyDesc::dynamic(square_blocks(5.0)).with_position(Vec2::new(0.0, 0.0)),
            BodyMaterial::default(),
        );
        world.create_body(
            BodyId(2),
            &BodyDesc::dynamic(square_blocks(5.0)).with_position(Vec2::new(500.0, 0.0)),
            BodyMaterial::default(),
        );
        let hits = world.bodies_in_region(Rect::new(
            Vec2::new(-20.0, -20.0),
            Vec2::new(20.0, 20.0),
        ));
        assert_eq!(hits, vec![BodyId(1)]);
    }

    #[test]
    fn closest_contact_reports_touching_bodies() {
        let mut world = PhysicsWorld::new(Vec2::ZERO);
        let a = world.create_body(
            BodyId(1),
            &BodyDesc::dynamic(square_blocks(10.0)).with_position(Vec2::new(0.0, 0.0)),
            BodyMaterial::default(),
        );
        let b = world.create_body(
            BodyId(2),
            &BodyDesc::dynamic(square_blocks(10.0)).with_position(Vec2::new(0.0, 21.0)),
            BodyMaterial::default(),
        );
        let contact = world.closest_contact(&a, &b, 4.0).expect("within prediction");
        assert!(contact.dist <= 4.0);
        // Normal on `a` points toward `b`, i.e. downward (+Y).
        assert!(contact.normal.y > 0.9, "normal {:?}", contact.normal);

        let far = world.create_body(
            BodyId(3),
            &BodyDesc::dynamic(square_blocks(10.0)).with_position(Vec2::new(200.0, 0.0)),
            BodyMaterial::default(),
        );
        assert!(world.closest_contact(&a, &far, 4.0).is_none());
    }

    #[test]
    fn contact_events_fire_when_a_body_lands_on_a_fixed_box() {
        let mut world = PhysicsWorld::new(Vec2::new(0.0, 900.0));
        world.set_dt(1.0 / 60.0);
        world.create_body(
            BodyId(1),
            &BodyDesc::fixed_box(Vec2::new(100.0, 10.0)).with_position(Vec2::new(0.0, 100.0)),
            BodyMaterial::default(),
        );
        world.create_body(
            BodyId(2),
            &BodyDesc::dynamic(square_blocks(10.0)).with_position(Vec2::new(0.0, 0.0)),
            BodyMaterial::default(),
        );
        let mut events = Vec::new();
        for _ in 0..120 {
            world.step_into(&mut events);
        }
        let started: Vec<_> = events.iter().filter(|e| e.started).collect();
        assert!(!started.is_empty(), "expected a contact start event");
        let pair = started[0];
        let ids = [pair.a, pair.b];
        assert!(ids.contains(&BodyId(1)));
        assert!(ids.contains(&BodyId(2)));
    }

    #[test]
    fn set_position_teleports_body() {
        let mut world = PhysicsWorld::new(Vec2::ZERO);
        let body = world.create_body(
            BodyId(1),
            &BodyDesc::dynamic(square_blocks(5.0)),
            BodyMaterial::default(),
        );
        world.set_position(&body, Vec2::new(40.0, -30.0), 1.0);
        let (pos, rot) = world.body_position(&body);
        assert!((pos.x - 40.0).abs() < 0.001);
        assert!((pos.y + 30.0).abs() < 0.001);
        assert!((rot - 1.0).abs() < 0.001);
    }

    #[test]
    fn contact_event_other_resolves_partner() {
        let ev = ContactEvent {
            a: BodyId(1),
            b: BodyId(2),
            started: true,
        };
        assert_eq!(ev.other(BodyId(1)), Some(BodyId(2)));
        assert_eq!(ev.other(BodyId(2)), Some(BodyId(1)));
        assert_eq!(ev.other(BodyId(3)), None);
    }
}
