//! Sequential-impulse contact solver
//!
//! Velocities are resolved with a fixed number of passes over the whole
//! contact list (normal impulse with restitution, then Coulomb friction).
//! A single Baumgarte pass afterwards pushes residual overlap apart by
//! moving positions only, so it never adds velocity.

use serde::{Deserialize, Serialize};
use slotmap::SlotMap;

use crate::body::{BodyKey, RigidBody};
use crate::manifold::Manifold;

/// Tangential speeds (squared) below this produce no friction impulse
const TANGENT_EPSILON_SQ: f32 = 1e-6;

/// Solver tuning
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Solver {
    /// Velocity passes over the full contact list per step
    pub iterations: u32,
    /// Coulomb friction coefficient shared by every contact
    pub friction: f32,
    /// Penetration left alone by positional correction
    pub penetration_slop: f32,
    /// Fraction of the remaining penetration removed per step
    pub baumgarte: f32,
}

impl Default for Solver {
    fn default() -> Self {
        Self {
            iterations: 8,
            friction: 0.6,
            penetration_slop: 0.01,
            baumgarte: 0.2,
        }
    }
}

impl Solver {
    /// Resolve the relative velocity of one contact
    ///
    /// Trigger contacts, pairs whose combined inverse mass is zero, and pairs
    /// that are already separating along the normal, are skipped.
    pub fn resolve_contact(&self, a: &mut RigidBody, b: &mut RigidBody, manifold: &Manifold) {
        if manifold.trigger {
            return;
        }
        let inv_a = a.inverse_mass();
        let inv_b = b.inverse_mass();
        let inv_mass_sum = inv_a + inv_b;
        if inv_mass_sum <= 0.0 {
            return;
        }

        let normal = manifold.normal;
        let relative = b.velocity - a.velocity;
        let vel_along_normal = relative.dot(normal);
        if vel_along_normal > 0.0 {
            return;
        }

        let e = a.restitution.max(b.restitution);
        let j = -(1.0 + e) * vel_along_normal / inv_mass_sum;
        let impulse = normal * j;

        if inv_a > 0.0 {
            a.velocity -= impulse * inv_a;
        }
        if inv_b > 0.0 {
            b.velocity += impulse * inv_b;
        }

        // Friction against the post-impulse relative velocity
        let relative = b.velocity - a.velocity;
        let tangent = relative - normal * relative.dot(normal);
        if tangent.length_squared() <= TANGENT_EPSILON_SQ {
            return;
        }
        let tangent = tangent.normalized();

        let jt = -relative.dot(tangent) / inv_mass_sum;
        let max_friction = j * self.friction;
        let friction_impulse = if jt.abs() < max_friction {
            tangent * jt
        } else {
            tangent * -max_friction
        };

        if inv_a > 0.0 {
            a.velocity -= friction_impulse * inv_a;
        }
        if inv_b > 0.0 {
            b.velocity += friction_impulse * inv_b;
        }
    }

    /// Push one contact's bodies apart along the normal (Baumgarte)
    pub fn correct_position(&self, a: &mut RigidBody, b: &mut RigidBody, manifold: &Manifold) {
        if manifold.trigger {
            return;
        }
        let inv_a = a.inverse_mass();
        let inv_b = b.inverse_mass();
        let inv_mass_sum = inv_a + inv_b;
        if inv_mass_sum <= 0.0 {
            return;
        }

        let magnitude = (manifold.penetration - self.penetration_slop).max(0.0)
            * (self.baumgarte / inv_mass_sum);
        let correction = manifold.normal * magnitude;

        if inv_a > 0.0 {
            a.position -= correction * inv_a;
        }
        if inv_b > 0.0 {
            b.position += correction * inv_b;
        }
    }

    /// Run every velocity iteration over the full contact list
    pub fn solve_velocities(&self, bodies: &mut SlotMap<BodyKey, RigidBody>, contacts: &[Manifold]) {
        for _ in 0..self.iterations {
            for manifold in contacts {
                if let Some([a, b]) = bodies.get_disjoint_mut([manifold.body_a, manifold.body_b]) {
                    self.resolve_contact(a, b, manifold);
                }
            }
        }
    }

    /// Apply one positional-correction pass over the contact list
    pub fn correct_positions(&self, bodies: &mut SlotMap<BodyKey, RigidBody>, contacts: &[Manifold]) {
        for manifold in contacts {
            if let Some([a, b]) = bodies.get_disjoint_mut([manifold.body_a, manifold.body_b]) {
                self.correct_position(a, b, manifold);
            }
        }
    }
}
