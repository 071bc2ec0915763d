//! Scene construction utilities
//!
//! This module provides a declarative API for building box scenes.

mod scene_builder;

pub use scene_builder::{Scene, SceneBuilder, CRATE_HALF_EXTENTS};
