//! Contact manifolds produced by the narrow phase

use crate::body::BodyKey;
use cuboid_math::Vec3;

/// A single box-box contact, rebuilt from scratch every step
///
/// Stores keys rather than references so the solver can borrow the two
/// bodies mutably from the world's body map.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Manifold {
    pub body_a: BodyKey,
    pub body_b: BodyKey,
    /// Unit axis normal pointing from A toward B
    pub normal: Vec3,
    /// Overlap along the normal (positive means interpenetrating)
    pub penetration: f32,
    /// At least one body is a trigger: reported, never resolved
    pub trigger: bool,
}

impl Manifold {
    pub fn new(body_a: BodyKey, body_b: BodyKey, normal: Vec3, penetration: f32) -> Self {
        Self {
            body_a,
            body_b,
            normal,
            penetration,
            trigger: false,
        }
    }

    /// The key of the other body if `key` is part of this contact
    pub fn other(&self, key: BodyKey) -> Option<BodyKey> {
        if self.body_a == key {
            Some(self.body_b)
        } else if self.body_b == key {
            Some(self.body_a)
        } else {
            None
        }
    }

    /// A manifold that carries no contact (zero normal, zero penetration)
    pub fn invalid(body_a: BodyKey, body_b: BodyKey) -> Self {
        Self::new(body_a, body_b, Vec3::ZERO, 0.0)
    }

    /// True if the pair actually interpenetrates along a usable normal
    pub fn is_valid(&self) -> bool {
        self.penetration > 0.0 && self.normal.length_squared() > 0.0
    }
}
