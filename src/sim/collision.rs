//! Swept-AABB collision detection and the per-frame resolution loop
//!
//! The tricky part of a fast-moving platformer: a box moved by `vel * dt` can
//! tunnel straight through thin geometry if only its end position is tested.
//! Instead the moving box is shrunk to a point, every static box is expanded
//! by the mover's half-extents (Minkowski sum), and the frame's displacement
//! is cast as a ray against the expanded boxes. The earliest hit in the frame
//! window wins and is reported to the entity, which corrects its own pose and
//! velocity; the loop then re-sweeps for secondary contacts (corners, slides).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geom::Aabb;

/// Resolution passes per frame. Chosen empirically to settle
/// slide-into-corner cases; a bounded-cost heuristic, not a convergence
/// guarantee.
pub const MAX_RESOLVE_ITERATIONS: u32 = 4;

/// Back-off subtracted from the impact time so the entity never comes to
/// rest exactly on a surface and re-collides with it every frame.
pub const CONTACT_EPSILON: f32 = 1e-3;

/// One frame's movement: origin at the moving box's center, direction
/// `vel * dt`.
#[derive(Debug, Clone, Copy)]
pub struct Ray2 {
    pub origin: Vec2,
    pub dir: Vec2,
}

/// What a static collider does to things that touch it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColliderKind {
    Solid,
    Death,
    Trigger,
}

/// Level geometry, owned by the host and passed in as a slice each frame
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StaticCollider {
    pub kind: ColliderKind,
    pub id: i32,
    pub aabb: Aabb,
}

impl StaticCollider {
    pub fn new(kind: ColliderKind, id: i32, aabb: Aabb) -> Self {
        Self { kind, id, aabb }
    }

    /// Adapter for tile-map collaborators that hand over top-left rectangles
    pub fn from_tile_rect(kind: ColliderKind, id: i32, x: f32, y: f32, w: f32, h: f32) -> Self {
        Self::new(kind, id, Aabb::from_min_size(Vec2::new(x, y), Vec2::new(w, h)))
    }
}

/// A raw ray/box intersection
///
/// `t_hit` is parametric along the ray and may fall outside the frame
/// window; [`sweep`] applies the `[0, 1)` gate.
#[derive(Debug, Clone, Copy)]
pub struct RayHit {
    pub t_hit: f32,
    pub contact_point: Vec2,
    pub contact_normal: Vec2,
}

/// One resolved contact, produced per detection and consumed immediately
#[derive(Debug, Clone, Copy)]
pub struct CollisionInfo {
    pub contact_point: Vec2,
    pub contact_normal: Vec2,
    /// Fraction of the frame's movement at which contact occurs, in `[0, 1)`
    pub t_hit: f32,
    pub kind: ColliderKind,
    pub id: i32,
}

/// An entity's physical view: pose, velocity, accumulated acceleration and
/// the collision box that tracks `pos`.
#[derive(Debug, Clone, Copy)]
pub struct Body {
    pub pos: Vec2,
    pub vel: Vec2,
    pub acc: Vec2,
    pub bbox: Aabb,
}

impl Body {
    pub fn new(pos: Vec2, bbox_size: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            acc: Vec2::ZERO,
            bbox: Aabb::new(pos, bbox_size),
        }
    }

    /// The frame's displacement as a ray
    #[inline]
    pub fn movement_ray(&self, dt: f32) -> Ray2 {
        Ray2 {
            origin: self.pos,
            dir: self.vel * dt,
        }
    }

    /// Re-center the collision box on the current position
    #[inline]
    pub fn sync_bbox(&mut self) {
        self.bbox.recenter(self.pos);
    }
}

/// Something the resolution loop can sweep and notify
///
/// The typed replacement for an opaque owner pointer: the loop reads the
/// body, and the implementor decides how to react to each contact (it owns
/// all pose/velocity mutation; the loop never corrects state itself).
pub trait Collidable {
    fn body(&self) -> &Body;
    fn on_collision(&mut self, info: &CollisionInfo, dt: f32);
}

/// Slab-method ray/box intersection
///
/// A zero direction component makes the ray parallel to that axis' slabs:
/// miss unless the origin already lies between them. Degenerate parametric
/// times (NaN) are a miss, never a panic.
pub fn ray_vs_aabb(ray: &Ray2, aabb: &Aabb) -> Option<RayHit> {
    let min = aabb.min();
    let max = aabb.max();

    if ray.dir.x == 0.0 && (ray.origin.x < min.x || ray.origin.x > max.x) {
        return None;
    }
    if ray.dir.y == 0.0 && (ray.origin.y < min.y || ray.origin.y > max.y) {
        return None;
    }

    let inv = Vec2::new(1.0 / ray.dir.x, 1.0 / ray.dir.y);

    let mut t_near = (min - ray.origin) * inv;
    let mut t_far = (max - ray.origin) * inv;

    if t_near.x.is_nan() || t_near.y.is_nan() || t_far.x.is_nan() || t_far.y.is_nan() {
        return None;
    }

    // Sort entry/exit per axis
    if t_near.x > t_far.x {
        std::mem::swap(&mut t_near.x, &mut t_far.x);
    }
    if t_near.y > t_far.y {
        std::mem::swap(&mut t_near.y, &mut t_far.y);
    }

    // The slabs never overlap along the ray
    if t_near.x > t_far.y || t_near.y > t_far.x {
        return None;
    }

    // Entry is the later of the near times, exit the earlier of the fars
    let t_hit = t_near.x.max(t_near.y);
    let t_exit = t_far.x.min(t_far.y);

    // Box entirely behind the origin
    if t_exit < 0.0 {
        return None;
    }

    // The axis that produced the later entry carries the contact normal.
    // Exact corner hits (equal entry times) resolve to the vertical normal:
    // grounding contacts must be deterministic for replay.
    let contact_normal = if t_near.x > t_near.y {
        Vec2::new(if inv.x < 0.0 { 1.0 } else { -1.0 }, 0.0)
    } else {
        Vec2::new(0.0, if inv.y < 0.0 { 1.0 } else { -1.0 })
    };

    Some(RayHit {
        t_hit,
        contact_point: ray.origin + ray.dir * t_hit,
        contact_normal,
    })
}

/// Swept test between a moving box and a static box
///
/// Expands the static box by the mover's half-extents and casts the movement
/// ray from the mover's center. A hit only counts when it lands within the
/// current frame (`0 <= t_hit < 1`).
pub fn sweep(ray: &Ray2, moving: &Aabb, fixed: &Aabb) -> Option<RayHit> {
    let expanded = fixed.expand(moving.half);
    let hit = ray_vs_aabb(ray, &expanded)?;
    (0.0..1.0).contains(&hit.t_hit).then_some(hit)
}

/// The canonical sliding contact response
///
/// Advance to just short of the impact point, then remove the velocity
/// component along the contact normal so motion continues along the surface.
pub fn slide_response(body: &mut Body, info: &CollisionInfo, dt: f32) {
    body.pos += body.vel * dt * (info.t_hit - CONTACT_EPSILON);

    let along = body.vel.dot(info.contact_normal);
    body.vel -= along * info.contact_normal;
}

/// Sweep an entity against all static colliders and resolve contacts
///
/// Each pass finds the earliest collision of the frame (strictly smallest
/// `t_hit`; the first collider in the slice wins exact ties) and reports it
/// to the target exactly once. The target's response changes the movement
/// ray, so the loop re-sweeps until nothing is hit or the iteration cap is
/// reached. Residual interpenetration past the cap is accepted.
pub fn resolve<C: Collidable>(target: &mut C, colliders: &[StaticCollider], dt: f32) {
    for pass in 0..MAX_RESOLVE_ITERATIONS {
        let body = target.body();
        let ray = body.movement_ray(dt);

        let mut nearest: Option<CollisionInfo> = None;
        for collider in colliders {
            let Some(hit) = sweep(&ray, &body.bbox, &collider.aabb) else {
                continue;
            };
            if nearest.is_none_or(|n| hit.t_hit < n.t_hit) {
                nearest = Some(CollisionInfo {
                    contact_point: hit.contact_point,
                    contact_normal: hit.contact_normal,
                    t_hit: hit.t_hit,
                    kind: collider.kind,
                    id: collider.id,
                });
            }
        }

        let Some(info) = nearest else {
            break;
        };

        log::trace!(
            "contact pass={} id={} normal=({}, {}) t={:.4}",
            pass,
            info.id,
            info.contact_normal.x,
            info.contact_normal.y,
            info.t_hit
        );
        target.on_collision(&info, dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Minimal responder: records contacts and applies the slide response.
    struct Probe {
        body: Body,
        contacts: Vec<CollisionInfo>,
    }

    impl Probe {
        fn new(pos: Vec2, size: Vec2) -> Self {
            Self {
                body: Body::new(pos, size),
                contacts: Vec::new(),
            }
        }
    }

    impl Collidable for Probe {
        fn body(&self) -> &Body {
            &self.body
        }

        fn on_collision(&mut self, info: &CollisionInfo, dt: f32) {
            self.contacts.push(*info);
            slide_response(&mut self.body, info, dt);
        }
    }

    #[test]
    fn test_sweep_head_on_wall() {
        // Box (12x16) at origin moving right at 100 px/s toward a wall whose
        // left edge is at x=20; with dt=0.2 the frame displacement is 20 px.
        let moving = Aabb::new(Vec2::ZERO, Vec2::new(12.0, 16.0));
        let wall = Aabb::from_min_size(Vec2::new(20.0, -50.0), Vec2::new(16.0, 100.0));
        let vel = Vec2::new(100.0, 0.0);
        let dt = 0.2;

        let ray = Ray2 {
            origin: moving.center,
            dir: vel * dt,
        };
        let hit = sweep(&ray, &moving, &wall).unwrap();

        // t_hit = (wall left - box right) / (vel.x * dt) = (20 - 6) / 20
        let expected = (20.0 - 6.0) / (vel.x * dt);
        assert!((hit.t_hit - expected).abs() < 1e-6);
        assert_eq!(hit.contact_normal, Vec2::new(-1.0, 0.0));
    }

    #[test]
    fn test_sweep_falls_short_of_wall() {
        let moving = Aabb::new(Vec2::ZERO, Vec2::new(12.0, 16.0));
        let wall = Aabb::from_min_size(Vec2::new(20.0, -50.0), Vec2::new(16.0, 100.0));
        // Only 10 px of travel; the gap is 14 px.
        let ray = Ray2 {
            origin: moving.center,
            dir: Vec2::new(10.0, 0.0),
        };
        assert!(sweep(&ray, &moving, &wall).is_none());
    }

    #[test]
    fn test_sweep_box_already_passed() {
        let moving = Aabb::new(Vec2::new(50.0, 0.0), Vec2::new(12.0, 16.0));
        let wall = Aabb::from_min_size(Vec2::new(20.0, -50.0), Vec2::new(16.0, 100.0));
        // Moving further away from a box that is entirely behind the ray.
        let ray = Ray2 {
            origin: moving.center,
            dir: Vec2::new(10.0, 0.0),
        };
        assert!(sweep(&ray, &moving, &wall).is_none());
    }

    #[test]
    fn test_ray_parallel_axis_inside_and_outside_slab() {
        let target = Aabb::new(Vec2::new(0.0, 10.0), Vec2::new(4.0, 4.0));

        // Purely vertical ray whose x already lies within the slab: hit.
        let inside = Ray2 {
            origin: Vec2::new(1.0, 0.0),
            dir: Vec2::new(0.0, 20.0),
        };
        let hit = ray_vs_aabb(&inside, &target).unwrap();
        assert_eq!(hit.contact_normal, Vec2::new(0.0, -1.0));

        // Same ray shifted outside the x slab: parallel miss.
        let outside = Ray2 {
            origin: Vec2::new(5.0, 0.0),
            dir: Vec2::new(0.0, 20.0),
        };
        assert!(ray_vs_aabb(&outside, &target).is_none());
    }

    #[test]
    fn test_degenerate_zero_ray_is_never_a_frame_hit() {
        let target = Aabb::new(Vec2::ZERO, Vec2::new(4.0, 4.0));
        let moving = Aabb::new(Vec2::ZERO, Vec2::new(1.0, 1.0));

        // Zero-length ray starting inside the expanded box: the sweep's
        // frame-window gate rejects it rather than crashing on inf/NaN.
        let ray = Ray2 {
            origin: Vec2::new(0.5, 0.5),
            dir: Vec2::ZERO,
        };
        assert!(sweep(&ray, &moving, &target).is_none());

        // Origin exactly on the expanded box edge produces NaN times: miss.
        let on_edge = Ray2 {
            origin: Vec2::new(2.5, 0.0),
            dir: Vec2::new(0.0, 0.0),
        };
        assert!(sweep(&on_edge, &moving, &target).is_none());
    }

    #[test]
    fn test_corner_hit_prefers_vertical_normal() {
        // Expanded box spans [5,9]x[5,9]; the ray (10,10) from the origin
        // reaches the (5,5) corner at exactly t=0.5 on both axes.
        let moving = Aabb::new(Vec2::ZERO, Vec2::new(2.0, 2.0));
        let fixed = Aabb::new(Vec2::new(7.0, 7.0), Vec2::new(2.0, 2.0));
        let ray = Ray2 {
            origin: Vec2::ZERO,
            dir: Vec2::new(10.0, 10.0),
        };

        let hit = sweep(&ray, &moving, &fixed).unwrap();
        assert!((hit.t_hit - 0.5).abs() < 1e-6);
        assert_eq!(hit.contact_normal, Vec2::new(0.0, -1.0));
    }

    #[test]
    fn test_resolve_corner_reports_both_surfaces() {
        // Moving down-right into a floor, then sliding into a wall within
        // the same frame: two contacts, two callbacks.
        let floor = StaticCollider::from_tile_rect(ColliderKind::Solid, 1, -10.0, 2.0, 30.0, 2.0);
        let wall = StaticCollider::from_tile_rect(ColliderKind::Solid, 2, 6.0, -10.0, 2.0, 20.0);
        let colliders = [floor, wall];

        let mut probe = Probe::new(Vec2::ZERO, Vec2::new(2.0, 2.0));
        probe.body.vel = Vec2::new(10.0, 10.0);

        resolve(&mut probe, &colliders, 1.0);

        assert_eq!(probe.contacts.len(), 2);
        assert_eq!(probe.contacts[0].id, 1);
        assert_eq!(probe.contacts[0].contact_normal, Vec2::new(0.0, -1.0));
        assert_eq!(probe.contacts[1].id, 2);
        assert_eq!(probe.contacts[1].contact_normal, Vec2::new(-1.0, 0.0));

        // Both velocity components were projected out.
        assert_eq!(probe.body.vel, Vec2::ZERO);
    }

    #[test]
    fn test_resolve_is_idempotent_once_settled() {
        let floor = StaticCollider::from_tile_rect(ColliderKind::Solid, 1, -10.0, 2.0, 30.0, 2.0);
        let colliders = [floor];

        let mut probe = Probe::new(Vec2::ZERO, Vec2::new(2.0, 2.0));
        probe.body.vel = Vec2::new(0.0, 10.0);
        resolve(&mut probe, &colliders, 1.0);
        assert_eq!(probe.contacts.len(), 1);

        // No velocity remains along the normal; a second resolution in the
        // same frame must not move the body or report anything new.
        let settled_pos = probe.body.pos;
        probe.contacts.clear();
        resolve(&mut probe, &colliders, 1.0);
        assert!(probe.contacts.is_empty());
        assert_eq!(probe.body.pos, settled_pos);
    }

    #[test]
    fn test_resolve_tie_goes_to_first_collider() {
        // Two identical colliders: the earlier slice entry wins the tie.
        let a = StaticCollider::from_tile_rect(ColliderKind::Solid, 7, 4.0, -2.0, 4.0, 4.0);
        let b = StaticCollider::from_tile_rect(ColliderKind::Trigger, 8, 4.0, -2.0, 4.0, 4.0);

        let mut probe = Probe::new(Vec2::ZERO, Vec2::new(2.0, 2.0));
        probe.body.vel = Vec2::new(10.0, 0.0);
        resolve(&mut probe, &[a, b], 1.0);

        assert_eq!(probe.contacts[0].id, 7);
        assert_eq!(probe.contacts[0].kind, ColliderKind::Solid);
    }

    #[test]
    fn test_resolve_caps_reported_contacts() {
        // A closed pocket of four walls around the probe can keep producing
        // contacts; the pass cap bounds the reports per frame.
        let walls = [
            StaticCollider::from_tile_rect(ColliderKind::Solid, 1, 2.0, -10.0, 2.0, 20.0),
            StaticCollider::from_tile_rect(ColliderKind::Solid, 2, -4.0, -10.0, 2.0, 20.0),
            StaticCollider::from_tile_rect(ColliderKind::Solid, 3, -10.0, 2.0, 20.0, 2.0),
            StaticCollider::from_tile_rect(ColliderKind::Solid, 4, -10.0, -4.0, 20.0, 2.0),
        ];

        let mut probe = Probe::new(Vec2::ZERO, Vec2::new(2.0, 2.0));
        probe.body.vel = Vec2::new(50.0, 50.0);
        resolve(&mut probe, &walls, 1.0);

        assert!(probe.contacts.len() <= MAX_RESOLVE_ITERATIONS as usize);
    }

    #[test]
    fn test_slide_response_keeps_tangential_velocity() {
        let mut body = Body::new(Vec2::ZERO, Vec2::new(2.0, 2.0));
        body.vel = Vec2::new(30.0, 40.0);
        let info = CollisionInfo {
            contact_point: Vec2::new(0.0, 1.0),
            contact_normal: Vec2::new(0.0, -1.0),
            t_hit: 0.5,
            kind: ColliderKind::Solid,
            id: 0,
        };

        slide_response(&mut body, &info, 1.0);

        // Vertical component removed, horizontal untouched.
        assert_eq!(body.vel, Vec2::new(30.0, 0.0));
        // Advanced to just short of the impact.
        assert!((body.pos.y - 40.0 * (0.5 - CONTACT_EPSILON)).abs() < 1e-4);
    }

    proptest! {
        // A ray whose swept corridor stays strictly below the static box
        // can never produce a frame hit.
        #[test]
        fn prop_sweep_has_no_false_positives(
            ox in -200.0f32..200.0,
            oy in -200.0f32..200.0,
            dx in -150.0f32..150.0,
            dy in -150.0f32..150.0,
            mover_w in 0.0f32..40.0,
            mover_h in 0.0f32..40.0,
            fixed_w in 0.1f32..60.0,
            fixed_h in 0.1f32..60.0,
            gap in 0.01f32..50.0,
        ) {
            let moving = Aabb::new(Vec2::new(ox, oy), Vec2::new(mover_w, mover_h));
            // Place the static box beyond the corridor's maximum vertical
            // reach: |dy| of travel plus both half-heights plus a gap.
            let fixed_center_y =
                oy + dy.abs() + mover_h * 0.5 + fixed_h * 0.5 + gap;
            let fixed = Aabb::new(
                Vec2::new(ox, fixed_center_y),
                Vec2::new(fixed_w, fixed_h),
            );

            let ray = Ray2 { origin: moving.center, dir: Vec2::new(dx, dy) };
            prop_assert!(sweep(&ray, &moving, &fixed).is_none());
        }

        // Any reported frame hit carries an axis-aligned unit normal and a
        // t in [0, 1).
        #[test]
        fn prop_frame_hits_are_well_formed(
            ox in -100.0f32..100.0,
            oy in -100.0f32..100.0,
            dx in -200.0f32..200.0,
            dy in -200.0f32..200.0,
            cx in -100.0f32..100.0,
            cy in -100.0f32..100.0,
        ) {
            let moving = Aabb::new(Vec2::new(ox, oy), Vec2::new(12.0, 16.0));
            let fixed = Aabb::new(Vec2::new(cx, cy), Vec2::new(32.0, 32.0));
            let ray = Ray2 { origin: moving.center, dir: Vec2::new(dx, dy) };

            if let Some(hit) = sweep(&ray, &moving, &fixed) {
                prop_assert!(hit.t_hit >= 0.0 && hit.t_hit < 1.0);
                let n = hit.contact_normal;
                prop_assert!(
                    (n.x.abs() == 1.0 && n.y == 0.0)
                        || (n.y.abs() == 1.0 && n.x == 0.0)
                );
            }
        }
    }
}
