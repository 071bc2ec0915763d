//! SceneBuilder - Declarative scene construction
//!
//! Provides a fluent API for building box scenes on top of a physics world.

use cuboid_math::Vec3;
use cuboid_physics::{BodyKey, CollisionFilter, CollisionLayer, PhysicsConfig, PhysicsWorld, RigidBody};

/// Half extents of a standard crate
pub const CRATE_HALF_EXTENTS: Vec3 = Vec3::new(0.5, 0.5, 0.5);

/// A built scene: the world plus the handles gameplay code needs
pub struct Scene {
    pub world: PhysicsWorld,
    pub ground: Option<BodyKey>,
    pub player: Option<BodyKey>,
    pub crates: Vec<BodyKey>,
    /// Trigger zones that report the player
    pub zones: Vec<BodyKey>,
}

/// Builder for constructing box scenes with physics
///
/// # Example
/// ```ignore
/// let scene = SceneBuilder::new(PhysicsConfig::default())
///     .add_ground(Vec3::new(0.0, -0.05, 0.0), Vec3::new(25.0, 0.05, 25.0))
///     .add_crate_stack(Vec3::ZERO, 3)
///     .add_player(Vec3::new(0.0, 1.0, 5.0))
///     .build();
/// ```
pub struct SceneBuilder {
    scene: Scene,
}

impl SceneBuilder {
    /// Create a new scene builder with the given physics configuration
    pub fn new(config: PhysicsConfig) -> Self {
        Self {
            scene: Scene {
                world: PhysicsWorld::with_config(config),
                ground: None,
                player: None,
                crates: Vec::new(),
                zones: Vec::new(),
            },
        }
    }

    /// Add a static ground slab centered at `position`
    pub fn add_ground(mut self, position: Vec3, half_extents: Vec3) -> Self {
        let body = RigidBody::static_box(position, half_extents).with_filter(CollisionFilter::static_world());
        self.scene.ground = Some(self.scene.world.add_body(body));
        self
    }

    /// Add a single dynamic crate
    pub fn add_crate(mut self, position: Vec3, restitution: f32) -> Self {
        let key = self
            .scene
            .world
            .add_body(RigidBody::dynamic_box(position, CRATE_HALF_EXTENTS, restitution));
        self.scene.crates.push(key);
        self
    }

    /// Stack `count` crates with the bottom one resting on `base`
    pub fn add_crate_stack(mut self, base: Vec3, count: u32) -> Self {
        let height = CRATE_HALF_EXTENTS.y * 2.0;
        for i in 0..count {
            let position = base + Vec3::new(0.0, CRATE_HALF_EXTENTS.y + height * i as f32, 0.0);
            self = self.add_crate(position, 0.0);
        }
        self
    }

    /// Add a static trigger zone that detects the player
    pub fn add_zone(mut self, position: Vec3, half_extents: Vec3) -> Self {
        let body = RigidBody::static_box(position, half_extents)
            .with_trigger(true)
            .with_filter(CollisionFilter::trigger(CollisionLayer::PLAYER));
        self.scene.zones.push(self.scene.world.add_body(body));
        self
    }

    /// Add the player box
    ///
    /// The player is a dynamic body whose velocity gameplay code sets
    /// directly; it does not collide with its own projectiles.
    pub fn add_player(mut self, position: Vec3) -> Self {
        let body = RigidBody::dynamic_box(position, Vec3::new(0.4, 0.9, 0.4), 0.0)
            .with_mass(2.0)
            .with_filter(CollisionFilter::player());
        self.scene.player = Some(self.scene.world.add_body(body));
        self
    }

    /// Finish and return the scene
    pub fn build(self) -> Scene {
        log::info!(
            "Built scene with {} bodies ({} crates)",
            self.scene.world.body_count(),
            self.scene.crates.len()
        );
        self.scene
    }
}
