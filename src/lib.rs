//! Cuboid - box physics sandbox
//!
//! Application layer on top of `cuboid_physics`: configuration loading,
//! scene construction and the per-frame simulation system.

pub mod config;
pub mod scene;
pub mod systems;
