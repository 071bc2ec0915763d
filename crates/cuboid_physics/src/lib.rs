//! Box rigid-body physics for cuboid
//!
//! This crate provides a small, deterministic physics core for axis-aligned
//! boxes, including:
//! - Rigid bodies with static, dynamic and kinematic variants
//! - Pairwise AABB collision detection with minimum-translation manifolds
//! - A sequential-impulse solver with friction and Baumgarte correction
//! - A fixed-timestep accumulator for driving the world from a game loop
//!
//! Everything runs synchronously on the caller's thread. There are no error
//! paths: invalid input (a non-positive mass, a pair of immovable bodies, a
//! separating contact) is skipped silently.

pub mod body;
pub mod collision;
pub mod manifold;
pub mod solver;
pub mod stepper;
pub mod world;

// Re-export commonly used types
pub use body::{BodyKey, BodyType, RigidBody, DEFAULT_RESTITUTION};
pub use collision::{aabb_overlap, build_manifold, find_overlaps, CollisionFilter, CollisionLayer};
pub use manifold::Manifold;
pub use solver::Solver;
pub use stepper::{FixedTimestep, DEFAULT_MAX_FRAME_TIME, FIXED_DT};
pub use world::{PhysicsConfig, PhysicsWorld};
