//! Game simulation system
//!
//! Manages the game loop side of the physics contract:
//! - Frame time measurement
//! - Input → player velocity (move, jump)
//! - Spawning and expiring shot boxes
//! - Feeding frame time to the fixed-step accumulator

use std::time::Instant;

use cuboid_math::Vec3;
use cuboid_physics::{BodyKey, CollisionFilter, RigidBody};

use crate::config::PlayerSection;
use crate::scene::Scene;

/// Half extents of a shot box
const PROJECTILE_HALF_EXTENTS: Vec3 = Vec3::new(0.2, 0.2, 0.2);

/// Player input sampled for one frame
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PlayerInput {
    /// Horizontal movement on X and Z, each in [-1, 1]
    pub movement: [f32; 2],
    pub jump: bool,
    pub shoot: bool,
}

/// Result of a simulation update
#[derive(Debug, Default)]
pub struct SimulationResult {
    /// Fixed physics steps run this frame
    pub steps: u32,
    /// Shot box spawned this frame, if any
    pub spawned: Option<BodyKey>,
    /// Shot boxes removed this frame
    pub expired: usize,
    /// (shot box, body it touched) pairs from the last physics step
    pub hits: Vec<(BodyKey, BodyKey)>,
    /// Trigger zones the player overlapped in the last physics step
    pub zones_entered: Vec<BodyKey>,
}

#[derive(Debug)]
struct Projectile {
    key: BodyKey,
    age: f32,
}

/// Manages the game simulation loop
pub struct SimulationSystem {
    last_frame: Instant,
    player: PlayerSection,
    projectiles: Vec<Projectile>,
}

impl SimulationSystem {
    /// Create a new simulation system
    pub fn new(player: PlayerSection) -> Self {
        Self {
            last_frame: Instant::now(),
            player,
            projectiles: Vec::new(),
        }
    }

    /// Wall-clock seconds since the previous call
    pub fn frame_time(&mut self) -> f32 {
        let now = Instant::now();
        let dt = (now - self.last_frame).as_secs_f32();
        self.last_frame = now;
        dt
    }

    /// Number of shot boxes still alive
    pub fn projectile_count(&self) -> usize {
        self.projectiles.len()
    }

    /// Run one frame
    ///
    /// Input is applied to the player between physics steps, then the
    /// accumulated frame time is simulated in fixed steps.
    pub fn update(&mut self, scene: &mut Scene, input: &PlayerInput, frame_time: f32) -> SimulationResult {
        let mut result = SimulationResult::default();

        if let Some(player) = scene.player.and_then(|key| scene.world.get_body_mut(key)) {
            player.velocity.x = input.movement[0] * self.player.move_speed;
            player.velocity.z = input.movement[1] * self.player.move_speed;
            if input.jump {
                player.velocity.y = self.player.jump_velocity;
            }
        }

        if input.shoot {
            result.spawned = self.shoot(scene);
        }

        result.steps = scene.world.update(frame_time);
        self.collect_contacts(scene, &mut result);
        result.expired = self.expire_projectiles(scene, frame_time);
        result
    }

    /// Read back what shot boxes hit and which zones hold the player
    fn collect_contacts(&self, scene: &Scene, result: &mut SimulationResult) {
        if result.steps == 0 {
            return;
        }
        for projectile in &self.projectiles {
            for other in scene.world.touching(projectile.key) {
                log::debug!("Shot box {:?} hit {:?}", projectile.key, other);
                result.hits.push((projectile.key, other));
            }
        }
        if let Some(player) = scene.player {
            result.zones_entered = scene
                .world
                .touching(player)
                .filter(|other| scene.zones.contains(other))
                .collect();
        }
    }

    fn shoot(&mut self, scene: &mut Scene) -> Option<BodyKey> {
        let origin = scene
            .player
            .and_then(|key| scene.world.get_body(key))
            .map(|player| player.position)?;

        // Fire toward -Z from just in front of the player
        let forward = -Vec3::Z;
        let body = RigidBody::dynamic_box(origin + forward * 0.8, PROJECTILE_HALF_EXTENTS, 0.3)
            .with_velocity(forward * self.player.projectile_speed)
            .with_mass(0.5)
            .with_filter(CollisionFilter::projectile());
        let key = scene.world.add_body(body);
        self.projectiles.push(Projectile { key, age: 0.0 });
        log::debug!("Shot box {:?} from {:?}", key, origin);
        Some(key)
    }

    fn expire_projectiles(&mut self, scene: &mut Scene, frame_time: f32) -> usize {
        let lifetime = self.player.projectile_lifetime;
        let before = self.projectiles.len();

        self.projectiles.retain_mut(|projectile| {
            projectile.age += frame_time.max(0.0);
            if projectile.age < lifetime {
                return true;
            }
            scene.world.remove_body(projectile.key);
            false
        });

        before - self.projectiles.len()
    }
}

impl Default for SimulationSystem {
    fn default() -> Self {
        Self::new(PlayerSection::default())
    }
}
