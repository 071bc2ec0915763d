//! Cuboid - headless box physics demo
//!
//! Builds a ground slab, a crate stack and a player, then drives the
//! world with an uneven frame rate while the player walks, jumps and
//! shoots. Final body positions are logged.

use cuboid::config::AppConfig;
use cuboid::scene::{Scene, SceneBuilder};
use cuboid::systems::{PlayerInput, SimulationSystem};
use cuboid_math::Vec3;

/// Scripted input for a moment in the demo run
fn scripted_input(elapsed: f32, frame: usize) -> PlayerInput {
    let walking = elapsed < 1.0;
    PlayerInput {
        movement: if walking { [0.0, -1.0] } else { [0.0, 0.0] },
        jump: frame == 90,
        shoot: frame == 150 || frame == 200,
    }
}

fn build_scene(config: &AppConfig) -> Scene {
    SceneBuilder::new(config.physics.to_physics_config())
        .add_ground(Vec3::new(0.0, -0.05, 0.0), Vec3::new(25.0, 0.05, 25.0))
        .add_crate_stack(Vec3::ZERO, config.demo.crate_count)
        // Straddles the player's walk toward the crates
        .add_zone(Vec3::new(0.0, 1.0, 3.0), Vec3::new(1.0, 1.0, 0.5))
        .add_player(Vec3::from(config.player.spawn))
        .build()
}

fn main() {
    let loaded = AppConfig::load();
    let config = loaded.as_ref().cloned().unwrap_or_default();

    // RUST_LOG wins over the configured level
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.debug.log_level.as_str()),
    )
    .init();

    // Reported once the logger is up
    if let Err(e) = &loaded {
        log::warn!("Failed to load config: {}. Using defaults.", e);
    }
    log::info!("Starting Cuboid");

    let mut scene = build_scene(&config);
    let mut simulation = SimulationSystem::new(config.player.clone());

    let frame_times = config.demo.usable_frame_times();
    let duration = if config.demo.duration.is_finite() {
        config.demo.duration
    } else {
        log::warn!("Demo duration {} is not finite, using 5s", config.demo.duration);
        5.0
    };

    let mut elapsed = 0.0_f32;
    let mut total_steps = 0_u32;
    let mut frame = 0_usize;
    let mut was_in_zone = false;
    for frame_time in frame_times.iter().copied().cycle() {
        if elapsed >= duration {
            break;
        }

        let input = scripted_input(elapsed, frame);
        let result = simulation.update(&mut scene, &input, frame_time);
        if let Some(key) = result.spawned {
            log::info!("Frame {}: shot box {:?}", frame, key);
        }
        for (shot, other) in &result.hits {
            log::info!("Frame {}: shot box {:?} hit {:?}", frame, shot, other);
        }
        let in_zone = !result.zones_entered.is_empty();
        if in_zone && !was_in_zone {
            log::info!("Frame {}: player entered zone {:?}", frame, result.zones_entered);
        }
        if result.steps > 0 {
            was_in_zone = in_zone;
        }
        if result.expired > 0 {
            log::info!("Frame {}: removed {} shot box(es)", frame, result.expired);
        }

        total_steps += result.steps;
        elapsed += frame_time;
        frame += 1;
    }

    log::info!(
        "Simulated {:.2}s in {} frames, {} fixed steps, {} contacts in last step",
        elapsed,
        frame,
        total_steps,
        scene.world.last_contacts().len()
    );

    let mut positions = Vec::new();
    scene.world.write_positions(&mut positions);
    for ((key, body), position) in scene.world.bodies().zip(&positions) {
        log::info!(
            "{:?} {:?}: position ({:.3}, {:.3}, {:.3}) velocity ({:.3}, {:.3}, {:.3})",
            key,
            body.body_type(),
            position.x,
            position.y,
            position.z,
            body.velocity.x,
            body.velocity.y,
            body.velocity.z
        );
    }
}
