//! Physics world and simulation

use crate::body::{BodyKey, RigidBody};
use crate::collision::find_overlaps;
use crate::manifold::Manifold;
use crate::solver::Solver;
use crate::stepper::{FixedTimestep, DEFAULT_MAX_FRAME_TIME, FIXED_DT};
use cuboid_math::Vec3;
use serde::{Deserialize, Serialize};
use slotmap::SlotMap;

/// Configuration for the physics simulation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Gravity acceleration applied to dynamic bodies
    pub gravity: Vec3,
    /// Simulation step used by [`PhysicsWorld::update`]
    pub fixed_dt: f32,
    /// Largest frame time accepted per update
    pub max_frame_time: f32,
    /// Contact solver tuning
    pub solver: Solver,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: Vec3::new(0.0, -9.81, 0.0),
            fixed_dt: FIXED_DT,
            max_frame_time: DEFAULT_MAX_FRAME_TIME,
            solver: Solver::default(),
        }
    }
}

impl PhysicsConfig {
    /// Create a new physics config with the given gravity
    pub fn new(gravity: Vec3) -> Self {
        Self {
            gravity,
            ..Self::default()
        }
    }
}

/// The physics world containing all rigid bodies
///
/// The world owns its bodies; callers hold [`BodyKey`] handles. Bodies may be
/// read and mutated through [`PhysicsWorld::get_body_mut`] between steps.
/// Adding or removing bodies while a step is running is impossible through
/// this API since `step` holds `&mut self`.
///
/// Cloning gives an independent snapshot that steps identically.
#[derive(Clone)]
pub struct PhysicsWorld {
    /// All rigid bodies in the world (using generational keys)
    bodies: SlotMap<BodyKey, RigidBody>,
    /// Physics configuration
    pub config: PhysicsConfig,
    stepper: FixedTimestep,
    /// Contacts found by the most recent step, triggers included
    contacts: Vec<Manifold>,
}

impl PhysicsWorld {
    /// Create a new physics world with default configuration
    pub fn new() -> Self {
        Self::with_config(PhysicsConfig::default())
    }

    /// Create a new physics world with custom configuration
    pub fn with_config(config: PhysicsConfig) -> Self {
        let stepper = FixedTimestep::new(config.fixed_dt, config.max_frame_time);
        Self {
            bodies: SlotMap::with_key(),
            config,
            stepper,
            contacts: Vec::new(),
        }
    }

    /// Add a body to the world and return its key
    pub fn add_body(&mut self, body: RigidBody) -> BodyKey {
        let body_type = body.body_type();
        let key = self.bodies.insert(body);
        log::debug!("Added {:?} body {:?}", body_type, key);
        key
    }

    /// Remove a body from the world and return it
    ///
    /// The key becomes stale: every lookup with it returns `None` from now on.
    pub fn remove_body(&mut self, key: BodyKey) -> Option<RigidBody> {
        let removed = self.bodies.remove(key);
        if removed.is_some() {
            log::debug!("Removed body {:?}", key);
        }
        removed
    }

    /// Get an immutable reference to a body by key
    pub fn get_body(&self, key: BodyKey) -> Option<&RigidBody> {
        self.bodies.get(key)
    }

    /// Get a mutable reference to a body by key
    pub fn get_body_mut(&mut self, key: BodyKey) -> Option<&mut RigidBody> {
        self.bodies.get_mut(key)
    }

    /// Get the number of bodies in the world
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Iterate over all body keys
    pub fn body_keys(&self) -> impl Iterator<Item = BodyKey> + '_ {
        self.bodies.keys()
    }

    /// Iterate over all bodies with their keys
    pub fn bodies(&self) -> impl Iterator<Item = (BodyKey, &RigidBody)> {
        self.bodies.iter()
    }

    /// Contacts found during the last step, in detection order
    ///
    /// Trigger overlaps are included with `trigger` set. Keys may be stale if
    /// a body was removed since.
    pub fn last_contacts(&self) -> &[Manifold] {
        &self.contacts
    }

    /// Bodies that touched `key` during the last step
    pub fn touching(&self, key: BodyKey) -> impl Iterator<Item = BodyKey> + '_ {
        self.contacts.iter().filter_map(move |m| m.other(key))
    }

    /// Time stored in the accumulator, not yet simulated
    pub fn pending_time(&self) -> f32 {
        self.stepper.accumulator()
    }

    /// Copy every body position into `out` in iteration order
    ///
    /// The buffer is cleared first. `Vec3` is `Pod`, so the result can be
    /// uploaded as a flat float buffer.
    pub fn write_positions(&self, out: &mut Vec<Vec3>) {
        out.clear();
        out.extend(self.bodies.values().map(|body| body.position));
    }

    /// Advance by one frame of wall-clock time
    ///
    /// Runs [`PhysicsWorld::step`] with the fixed timestep as many times as
    /// the accumulated time allows and returns how many steps ran. This is the
    /// entry point for a game loop; `step` itself should only ever see the
    /// fixed timestep.
    pub fn update(&mut self, frame_time: f32) -> u32 {
        self.stepper.accumulate(frame_time);
        let dt = self.stepper.fixed_dt();
        let mut steps = 0;
        while self.stepper.consume() {
            self.step(dt);
            steps += 1;
        }
        steps
    }

    /// Step the physics simulation forward by dt seconds
    ///
    /// This performs, in order:
    /// 1. Semi-implicit Euler integration (forces are cleared on every body)
    /// 2. Pairwise contact detection
    /// 3. Sequential-impulse velocity resolution
    /// 4. One positional correction pass
    pub fn step(&mut self, dt: f32) {
        self.integrate(dt);

        self.contacts = find_overlaps(&self.bodies);
        log::trace!("Step {:.4}s: {} contacts", dt, self.contacts.len());

        let solver = self.config.solver;
        solver.solve_velocities(&mut self.bodies, &self.contacts);
        solver.correct_positions(&mut self.bodies, &self.contacts);
    }

    fn integrate(&mut self, dt: f32) {
        let gravity = self.config.gravity;

        for body in self.bodies.values_mut() {
            if body.is_dynamic() {
                let mut acceleration = body.force * body.inverse_mass();
                if body.affected_by_gravity {
                    acceleration += gravity;
                }
                body.velocity += acceleration * dt;
                body.position += body.velocity * dt;
            } else if body.is_kinematic() {
                body.position += body.velocity * dt;
            }
            body.clear_force();
        }
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}
