//! Collision detection for axis-aligned boxes
//!
//! Broad phase is a plain pairwise AABB test; narrow phase builds a
//! minimum-translation manifold. Also provides collision filtering via
//! layer masks.

use bitflags::bitflags;
use slotmap::SlotMap;

use crate::body::{BodyKey, RigidBody};
use crate::manifold::Manifold;
use cuboid_math::Vec3;

bitflags! {
    /// Collision layers for filtering which bodies can collide
    ///
    /// Each layer is a bit in a 32-bit mask. Bodies can belong to multiple layers
    /// and can define which layers they collide with via a collision mask.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct CollisionLayer: u32 {
        /// Default layer for most bodies
        const DEFAULT = 1 << 0;
        /// Player-controlled box
        const PLAYER = 1 << 1;
        /// Static world geometry (ground, walls)
        const STATIC = 1 << 2;
        /// Shot boxes
        const PROJECTILE = 1 << 3;
        /// Trigger zones (detect but don't push)
        const TRIGGER = 1 << 4;
        /// All layers (collide with everything)
        const ALL = 0xFFFFFFFF;
    }
}

/// Collision filter determining what a body collides with
///
/// Two bodies A and B collide if:
/// - (A.layer & B.mask) != 0, AND
/// - (B.layer & A.mask) != 0
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CollisionFilter {
    /// Which layer(s) this body belongs to
    pub layer: CollisionLayer,
    /// Which layer(s) this body can collide with
    pub mask: CollisionLayer,
}

impl Default for CollisionFilter {
    fn default() -> Self {
        Self {
            layer: CollisionLayer::DEFAULT,
            mask: CollisionLayer::ALL,
        }
    }
}

impl CollisionFilter {
    pub fn new(layer: CollisionLayer, mask: CollisionLayer) -> Self {
        Self { layer, mask }
    }

    /// Check if this filter allows collision with another filter
    pub fn collides_with(&self, other: &Self) -> bool {
        self.layer.intersects(other.mask) && other.layer.intersects(self.mask)
    }

    /// Player boxes collide with everything except their own projectiles
    pub fn player() -> Self {
        Self {
            layer: CollisionLayer::PLAYER,
            mask: CollisionLayer::ALL & !CollisionLayer::PROJECTILE,
        }
    }

    /// Static world geometry
    pub fn static_world() -> Self {
        Self {
            layer: CollisionLayer::STATIC,
            mask: CollisionLayer::ALL,
        }
    }

    /// Trigger zones that report the given layers
    ///
    /// Only the trigger's mask is consulted when it checks another body, so
    /// the detected bodies need not list `TRIGGER` in their own masks.
    pub fn trigger(detects: CollisionLayer) -> Self {
        Self {
            layer: CollisionLayer::TRIGGER,
            mask: detects,
        }
    }

    /// One-way check: does this filter's mask accept the other's layer
    pub fn detects(&self, other: &Self) -> bool {
        self.mask.intersects(other.layer)
    }

    /// Projectiles hit everything except the player that fired them
    pub fn projectile() -> Self {
        Self {
            layer: CollisionLayer::PROJECTILE,
            mask: CollisionLayer::ALL & !CollisionLayer::PLAYER,
        }
    }
}

/// Broad-phase test: true if the two boxes overlap (or touch) on all three axes
pub fn aabb_overlap(a: &RigidBody, b: &RigidBody) -> bool {
    let (a_min, a_max) = (a.min(), a.max());
    let (b_min, b_max) = (b.min(), b.max());

    a_max.x >= b_min.x
        && a_min.x <= b_max.x
        && a_max.y >= b_min.y
        && a_min.y <= b_max.y
        && a_max.z >= b_min.z
        && a_min.z <= b_max.z
}

/// Sign of a center delta; exactly zero stays zero so the normal degenerates
fn axis_sign(delta: f32) -> f32 {
    if delta > 0.0 {
        1.0
    } else if delta < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Narrow-phase test: build the contact manifold for a pair of boxes
///
/// The contact axis is the one with the smallest penetration. Exact ties
/// resolve in X, Y, Z order; changing that order changes which normal is
/// picked and therefore the solver outcome. The normal points from A toward B.
///
/// Returns an invalid manifold if the boxes do not interpenetrate on every
/// axis, or if the centers coincide on the chosen axis.
pub fn build_manifold(key_a: BodyKey, a: &RigidBody, key_b: BodyKey, b: &RigidBody) -> Manifold {
    let (a_min, a_max) = (a.min(), a.max());
    let (b_min, b_max) = (b.min(), b.max());

    // Smaller of the two possible depths on each axis
    let overlap = (b_max - a_min).min_components(a_max - b_min);
    let (overlap_x, overlap_y, overlap_z) = (overlap.x, overlap.y, overlap.z);

    if overlap_x <= 0.0 || overlap_y <= 0.0 || overlap_z <= 0.0 {
        return Manifold::invalid(key_a, key_b);
    }

    let delta = b.position - a.position;

    let (normal, penetration) = if overlap_x <= overlap_y && overlap_x <= overlap_z {
        (Vec3::new(axis_sign(delta.x), 0.0, 0.0), overlap_x)
    } else if overlap_y <= overlap_z {
        (Vec3::new(0.0, axis_sign(delta.y), 0.0), overlap_y)
    } else {
        (Vec3::new(0.0, 0.0, axis_sign(delta.z)), overlap_z)
    };

    Manifold::new(key_a, key_b, normal, penetration)
}

/// Whether a pair involving a trigger is worth testing
fn trigger_detects(a: &RigidBody, b: &RigidBody) -> bool {
    (a.is_trigger && a.filter.detects(&b.filter)) || (b.is_trigger && b.filter.detects(&a.filter))
}

/// Find all contacts among the given bodies
///
/// Checks every unordered pair once, in slot order. Static-static pairs and
/// pairs rejected by their collision filters are skipped without any test.
///
/// Pairs with a trigger are kept whenever the boxes interpenetrate, even if
/// the centers coincide and the normal is zero; they come back with
/// `trigger` set and the solver leaves them alone. Solid pairs are kept only
/// when the manifold is valid.
pub fn find_overlaps(bodies: &SlotMap<BodyKey, RigidBody>) -> Vec<Manifold> {
    let entries: Vec<(BodyKey, &RigidBody)> = bodies.iter().collect();
    let mut contacts = Vec::new();

    for i in 0..entries.len() {
        for j in (i + 1)..entries.len() {
            let (key_a, a) = entries[i];
            let (key_b, b) = entries[j];

            if a.is_static() && b.is_static() {
                continue;
            }

            let trigger = a.is_trigger || b.is_trigger;
            let accepted = if trigger {
                trigger_detects(a, b)
            } else {
                a.filter.collides_with(&b.filter)
            };
            if !accepted || !aabb_overlap(a, b) {
                continue;
            }

            let mut manifold = build_manifold(key_a, a, key_b, b);
            if trigger {
                if manifold.penetration > 0.0 {
                    manifold.trigger = true;
                    contacts.push(manifold);
                }
            } else if manifold.is_valid() {
                contacts.push(manifold);
            }
        }
    }

    contacts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cube(x: f32, y: f32, z: f32) -> RigidBody {
        RigidBody::dynamic_box(Vec3::new(x, y, z), Vec3::splat(0.5), 0.5)
    }

    fn insert_pair(a: RigidBody, b: RigidBody) -> (SlotMap<BodyKey, RigidBody>, BodyKey, BodyKey) {
        let mut bodies = SlotMap::with_key();
        let ka = bodies.insert(a);
        let kb = bodies.insert(b);
        (bodies, ka, kb)
    }

    #[test]
    fn test_aabb_overlap_separated() {
        assert!(!aabb_overlap(&cube(0.0, 0.0, 0.0), &cube(5.0, 0.0, 0.0)));
        assert!(!aabb_overlap(&cube(0.0, 0.0, 0.0), &cube(0.0, 1.5, 0.0)));
        assert!(!aabb_overlap(&cube(0.0, 0.0, 0.0), &cube(0.0, 0.0, -1.01)));
    }

    #[test]
    fn test_aabb_overlap_touching_counts() {
        assert!(aabb_overlap(&cube(0.0, 0.0, 0.0), &cube(1.0, 0.0, 0.0)));
    }

    #[test]
    fn test_aabb_overlap_is_symmetric() {
        let bodies = [
            cube(0.0, 0.0, 0.0),
            cube(0.9, 0.2, -0.3),
            cube(1.0, 1.0, 1.0),
            cube(3.0, 0.0, 0.0),
            RigidBody::static_box(Vec3::new(0.0, -0.05, 0.0), Vec3::new(25.0, 0.05, 25.0)),
        ];
        for a in &bodies {
            for b in &bodies {
                assert_eq!(aabb_overlap(a, b), aabb_overlap(b, a));
            }
        }
    }

    #[test]
    fn test_build_manifold_minimum_axis() {
        // Overlaps: x = 0.8, y = 0.3, z = 1.0
        let (bodies, ka, kb) = insert_pair(cube(0.0, 0.0, 0.0), cube(0.2, 0.7, 0.0));
        let m = build_manifold(ka, &bodies[ka], kb, &bodies[kb]);

        assert!(m.is_valid());
        assert!((m.penetration - 0.3).abs() < 0.0001);
        assert_eq!(m.normal, Vec3::Y);
        assert_eq!(m.body_a, ka);
        assert_eq!(m.body_b, kb);
    }

    #[test]
    fn test_build_manifold_normal_points_from_a_to_b() {
        let (bodies, ka, kb) = insert_pair(cube(0.0, 0.0, 0.0), cube(-0.75, 0.0, 0.1));
        let m = build_manifold(ka, &bodies[ka], kb, &bodies[kb]);
        assert_eq!(m.normal, -Vec3::X);
        assert!((m.penetration - 0.25).abs() < 0.0001);

        let m = build_manifold(kb, &bodies[kb], ka, &bodies[ka]);
        assert_eq!(m.normal, Vec3::X);
    }

    #[test]
    fn test_build_manifold_tie_prefers_x_then_y() {
        // Identical 0.5 penetration on X and Y, 1.0 on Z
        let (bodies, ka, kb) = insert_pair(cube(0.0, 0.0, 0.0), cube(0.5, 0.5, 0.0));
        let m = build_manifold(ka, &bodies[ka], kb, &bodies[kb]);
        assert_eq!(m.normal, Vec3::X);
        assert_eq!(m.penetration, 0.5);

        // Tie between Y and Z picks Y
        let (bodies, ka, kb) = insert_pair(cube(0.0, 0.0, 0.0), cube(0.0, -0.5, 0.5));
        let m = build_manifold(ka, &bodies[ka], kb, &bodies[kb]);
        assert_eq!(m.normal, -Vec3::Y);
    }

    #[test]
    fn test_build_manifold_touching_is_invalid() {
        let (bodies, ka, kb) = insert_pair(cube(0.0, 0.0, 0.0), cube(1.0, 0.0, 0.0));
        let m = build_manifold(ka, &bodies[ka], kb, &bodies[kb]);
        assert!(!m.is_valid());
        assert_eq!(m.normal, Vec3::ZERO);
        assert_eq!(m.penetration, 0.0);
    }

    #[test]
    fn test_build_manifold_coincident_centers_is_invalid() {
        let (bodies, ka, kb) = insert_pair(cube(0.0, 0.0, 0.0), cube(0.0, 0.0, 0.0));
        let m = build_manifold(ka, &bodies[ka], kb, &bodies[kb]);
        assert!(!m.is_valid());
    }

    #[test]
    fn test_find_overlaps_skips_static_pairs() {
        let mut bodies = SlotMap::with_key();
        bodies.insert(RigidBody::static_box(Vec3::ZERO, Vec3::splat(1.0)));
        bodies.insert(RigidBody::static_box(Vec3::new(0.5, 0.2, 0.0), Vec3::splat(1.0)));

        assert!(find_overlaps(&bodies).is_empty());
    }

    #[test]
    fn test_find_overlaps_collects_valid_pairs() {
        let mut bodies = SlotMap::with_key();
        let ground = bodies.insert(RigidBody::static_box(
            Vec3::new(0.0, -0.05, 0.0),
            Vec3::new(25.0, 0.05, 25.0),
        ));
        let resting = bodies.insert(cube(0.0, 0.45, 0.0));
        bodies.insert(cube(10.0, 5.0, 0.0));

        let contacts = find_overlaps(&bodies);
        assert_eq!(contacts.len(), 1);
        assert_eq!(contacts[0].body_a, ground);
        assert_eq!(contacts[0].body_b, resting);
        assert_eq!(contacts[0].normal, Vec3::Y);
    }

    #[test]
    fn test_find_overlaps_respects_filters() {
        let mut bodies = SlotMap::with_key();
        bodies.insert(cube(0.0, 0.0, 0.0).with_filter(CollisionFilter::player()));
        bodies.insert(cube(0.6, 0.0, 0.0).with_filter(CollisionFilter::projectile()));

        assert!(find_overlaps(&bodies).is_empty());
    }

    #[test]
    fn test_find_overlaps_reports_trigger_pairs() {
        let mut bodies = SlotMap::with_key();
        let zone = bodies.insert(
            RigidBody::static_box(Vec3::ZERO, Vec3::splat(2.0))
                .with_trigger(true)
                .with_filter(CollisionFilter::trigger(CollisionLayer::PLAYER)),
        );
        // Centered in the zone, so the normal degenerates
        let player = bodies.insert(cube(0.0, 0.0, 0.0).with_filter(CollisionFilter::player()));
        bodies.insert(cube(0.5, 0.0, 0.0));

        // Zone/player (trigger) and player/crate (solid); the default-layer
        // crate also overlaps the zone but is not detected by it
        let contacts = find_overlaps(&bodies);
        assert_eq!(contacts.len(), 2);

        assert!(contacts[0].trigger);
        assert_eq!(contacts[0].body_a, zone);
        assert_eq!(contacts[0].other(zone), Some(player));
        assert!(contacts[0].penetration > 0.0);
        assert!(!contacts[0].is_valid());

        assert!(!contacts[1].trigger);
        assert_eq!(contacts[1].body_a, player);
    }

    #[test]
    fn test_find_overlaps_trigger_needs_penetration() {
        let mut bodies = SlotMap::with_key();
        bodies.insert(RigidBody::static_box(Vec3::ZERO, Vec3::splat(0.5)).with_trigger(true));
        bodies.insert(cube(1.0, 0.0, 0.0));

        assert!(find_overlaps(&bodies).is_empty());
    }

    // ===== Collision Filter Tests =====

    #[test]
    fn test_collision_filter_default_collides_with_everything() {
        let default = CollisionFilter::default();
        assert!(default.collides_with(&CollisionFilter::player()));
        assert!(default.collides_with(&CollisionFilter::static_world()));
        assert!(default.collides_with(&CollisionFilter::projectile()));
    }

    #[test]
    fn test_collision_filter_projectile_vs_static() {
        assert!(CollisionFilter::projectile().collides_with(&CollisionFilter::static_world()));
    }

    #[test]
    fn test_collision_filter_trigger_detects_one_way() {
        let zone = CollisionFilter::trigger(CollisionLayer::PLAYER);
        let player = CollisionFilter::player();

        assert!(zone.detects(&player));
        assert!(!zone.detects(&CollisionFilter::default()));
        assert!(!zone.detects(&CollisionFilter::static_world()));
    }

    #[test]
    fn test_collision_filter_player_vs_projectile() {
        let player = CollisionFilter::player();
        let projectile = CollisionFilter::projectile();
        assert!(!player.collides_with(&projectile));
        assert!(!projectile.collides_with(&player));
    }
}
