//! Rigid body types for box physics

use crate::collision::CollisionFilter;
use cuboid_math::Vec3;
use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

// Define generational key type for rigid bodies
new_key_type! {
    /// Key to a rigid body in the physics world
    ///
    /// Uses generational indexing to prevent the ABA problem where a handle
    /// could point to a reused slot. If a body is removed and its slot reused,
    /// old keys will return None instead of pointing to the wrong body.
    pub struct BodyKey;
}

/// Restitution given to dynamic boxes when none is specified
pub const DEFAULT_RESTITUTION: f32 = 0.5;

/// How a body participates in the simulation
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BodyType {
    /// Never moves, never receives impulses or corrections
    Static,
    /// Fully simulated: gravity, forces, impulses and positional correction
    #[default]
    Dynamic,
    /// Moves by its own velocity only; pushes dynamic bodies but is never pushed
    Kinematic,
}

/// An axis-aligned box rigid body
///
/// Gameplay code may write `position`, `velocity` and `force` directly
/// between steps (a jump sets `velocity.y`, for example). Mass and body type
/// are private because the inverse mass is derived from them.
#[derive(Clone, Debug)]
pub struct RigidBody {
    /// Center of the box (world coordinates)
    pub position: Vec3,
    /// Velocity (units per second)
    pub velocity: Vec3,
    /// Half the box size on each axis; all components must be positive
    pub half_extents: Vec3,
    /// Coefficient of restitution (0.0 = no bounce, 1.0 = perfect bounce).
    /// Not clamped.
    pub restitution: f32,
    /// External force accumulated for the current step
    pub force: Vec3,
    /// Whether world gravity applies to this body
    pub affected_by_gravity: bool,
    /// Layer/mask pair deciding which bodies this one can touch
    pub filter: CollisionFilter,
    /// Trigger volumes report overlaps but never push or get pushed
    pub is_trigger: bool,
    mass: f32,
    body_type: BodyType,
}

impl RigidBody {
    fn new(position: Vec3, half_extents: Vec3, body_type: BodyType, restitution: f32) -> Self {
        let mass = match body_type {
            BodyType::Dynamic => 1.0,
            BodyType::Static | BodyType::Kinematic => f32::INFINITY,
        };
        Self {
            position,
            velocity: Vec3::ZERO,
            half_extents,
            restitution,
            force: Vec3::ZERO,
            affected_by_gravity: body_type == BodyType::Dynamic,
            filter: CollisionFilter::default(),
            is_trigger: false,
            mass,
            body_type,
        }
    }

    /// Create a static box with zero restitution
    pub fn static_box(position: Vec3, half_extents: Vec3) -> Self {
        Self::new(position, half_extents, BodyType::Static, 0.0)
    }

    /// Create a dynamic box with unit mass
    pub fn dynamic_box(position: Vec3, half_extents: Vec3, restitution: f32) -> Self {
        Self::new(position, half_extents, BodyType::Dynamic, restitution)
    }

    /// Create a kinematic box (moved only by its velocity)
    pub fn kinematic_box(position: Vec3, half_extents: Vec3) -> Self {
        Self::new(position, half_extents, BodyType::Kinematic, 0.0)
    }

    /// Set the velocity of this body
    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.velocity = velocity;
        self
    }

    /// Set the mass of this body (see [`RigidBody::set_mass`])
    pub fn with_mass(mut self, mass: f32) -> Self {
        self.set_mass(mass);
        self
    }

    /// Set the restitution (bounciness) of this body
    pub fn with_restitution(mut self, restitution: f32) -> Self {
        self.restitution = restitution;
        self
    }

    /// Set whether this body is affected by gravity
    pub fn with_gravity(mut self, affected: bool) -> Self {
        self.affected_by_gravity = affected;
        self
    }

    /// Set the collision filter of this body
    pub fn with_filter(mut self, filter: CollisionFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Turn this body into a trigger volume (or back into a solid box)
    pub fn with_trigger(mut self, is_trigger: bool) -> Self {
        self.is_trigger = is_trigger;
        self
    }

    /// Assign a new mass.
    ///
    /// Known quirk: a mass that is not strictly positive (zero, negative or
    /// NaN) is silently ignored and the previous mass is kept. Callers get no
    /// error. Do not turn this into a panic without checking the gameplay
    /// code that relies on it.
    ///
    /// An infinite mass makes a dynamic body immovable by contacts while it
    /// still integrates gravity.
    pub fn set_mass(&mut self, mass: f32) {
        if mass.is_nan() || mass <= 0.0 {
            return;
        }
        self.mass = mass;
    }

    /// Current mass (infinite for static and kinematic bodies)
    pub fn mass(&self) -> f32 {
        match self.body_type {
            BodyType::Dynamic => self.mass,
            BodyType::Static | BodyType::Kinematic => f32::INFINITY,
        }
    }

    /// Inverse mass, derived from the body type and mass on every read
    pub fn inverse_mass(&self) -> f32 {
        match self.body_type {
            BodyType::Dynamic if self.mass.is_finite() => 1.0 / self.mass,
            _ => 0.0,
        }
    }

    pub fn body_type(&self) -> BodyType {
        self.body_type
    }

    pub fn is_static(&self) -> bool {
        self.body_type == BodyType::Static
    }

    pub fn is_dynamic(&self) -> bool {
        self.body_type == BodyType::Dynamic
    }

    pub fn is_kinematic(&self) -> bool {
        self.body_type == BodyType::Kinematic
    }

    /// Accumulate an external force for the next step.
    ///
    /// Forces on static and kinematic bodies are cleared each step without
    /// ever reaching their velocity.
    pub fn apply_force(&mut self, force: Vec3) {
        self.force += force;
    }

    pub fn clear_force(&mut self) {
        self.force = Vec3::ZERO;
    }

    /// Minimum corner of the box
    pub fn min(&self) -> Vec3 {
        self.position - self.half_extents
    }

    /// Maximum corner of the box
    pub fn max(&self) -> Vec3 {
        self.position + self.half_extents
    }
}
