//! Application configuration
//!
//! Configuration is loaded from multiple sources with the following priority (lowest to highest):
//! 1. `config/default.toml` (version controlled)
//! 2. `config/user.toml` (gitignored, user overrides)
//! 3. Environment variables (`CUBOID_SECTION__KEY`)

use cuboid_math::Vec3;
use cuboid_physics::{PhysicsConfig, Solver, FIXED_DT};
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Physics configuration
    #[serde(default)]
    pub physics: PhysicsSection,
    /// Player control tuning
    #[serde(default)]
    pub player: PlayerSection,
    /// Headless demo run
    #[serde(default)]
    pub demo: DemoSection,
    /// Debug configuration
    #[serde(default)]
    pub debug: DebugSection,
}

impl AppConfig {
    /// Load configuration from default locations
    ///
    /// Priority (lowest to highest):
    /// 1. `config/default.toml`
    /// 2. `config/user.toml`
    /// 3. Environment variables (`CUBOID_*`)
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific config directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();
        let default_path = config_dir.join("default.toml");
        let user_path = config_dir.join("user.toml");

        let mut figment = Figment::new();

        if default_path.exists() {
            figment = figment.merge(Toml::file(&default_path));
        }

        if user_path.exists() {
            figment = figment.merge(Toml::file(&user_path));
        }

        // Environment variables override everything
        // CUBOID_PHYSICS__FIXED_DT=0.01 -> physics.fixed_dt = 0.01
        figment = figment.merge(Env::prefixed("CUBOID_").split("__"));

        figment.extract().map_err(ConfigError::from)
    }
}

/// Physics configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsSection {
    /// Gravity [x, y, z] in units per second squared
    pub gravity: [f32; 3],
    /// Simulation step in seconds
    pub fixed_dt: f32,
    /// Longest frame time fed to the accumulator at once
    pub max_frame_time: f32,
    /// Velocity solver passes per step
    pub solver_iterations: u32,
    /// Coulomb friction coefficient
    pub friction: f32,
    /// Penetration tolerated before positional correction kicks in
    pub penetration_slop: f32,
    /// Fraction of penetration corrected per step
    pub baumgarte: f32,
}

impl Default for PhysicsSection {
    fn default() -> Self {
        let physics = PhysicsConfig::default();
        Self {
            gravity: physics.gravity.to_array(),
            fixed_dt: physics.fixed_dt,
            max_frame_time: physics.max_frame_time,
            solver_iterations: physics.solver.iterations,
            friction: physics.solver.friction,
            penetration_slop: physics.solver.penetration_slop,
            baumgarte: physics.solver.baumgarte,
        }
    }
}

impl PhysicsSection {
    /// Convert into the physics crate's configuration
    pub fn to_physics_config(&self) -> PhysicsConfig {
        PhysicsConfig {
            gravity: Vec3::from(self.gravity),
            fixed_dt: self.fixed_dt,
            max_frame_time: self.max_frame_time,
            solver: Solver {
                iterations: self.solver_iterations,
                friction: self.friction,
                penetration_slop: self.penetration_slop,
                baumgarte: self.baumgarte,
            },
        }
    }
}

/// Player configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerSection {
    /// Spawn position [x, y, z]
    pub spawn: [f32; 3],
    /// Horizontal speed set from movement input (units per second)
    pub move_speed: f32,
    /// Upward velocity set on jump
    pub jump_velocity: f32,
    /// Initial speed of shot boxes
    pub projectile_speed: f32,
    /// Seconds before a shot box is removed
    pub projectile_lifetime: f32,
}

impl Default for PlayerSection {
    fn default() -> Self {
        Self {
            spawn: [0.0, 1.0, 5.0],
            move_speed: 3.0,
            jump_velocity: 5.0,
            projectile_speed: 15.0,
            projectile_lifetime: 3.0,
        }
    }
}

/// Headless demo configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoSection {
    /// Simulated wall-clock duration in seconds
    pub duration: f32,
    /// Frame times cycled through to imitate an uneven frame rate
    pub frame_times: Vec<f32>,
    /// Height of the crate stack
    pub crate_count: u32,
}

impl DemoSection {
    /// Frame times that advance the clock
    ///
    /// Zero, negative and non-finite entries are dropped; if nothing is left
    /// the list is a single fixed step.
    pub fn usable_frame_times(&self) -> Vec<f32> {
        let usable: Vec<f32> = self
            .frame_times
            .iter()
            .copied()
            .filter(|dt| dt.is_finite() && *dt > 0.0)
            .collect();
        if usable.is_empty() {
            log::warn!("No usable demo frame times, using {}", FIXED_DT);
            return vec![FIXED_DT];
        }
        usable
    }
}

impl Default for DemoSection {
    fn default() -> Self {
        Self {
            duration: 5.0,
            frame_times: vec![0.016, 0.017, 0.033, 0.008, 0.016],
            crate_count: 3,
        }
    }
}

/// Debug configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugSection {
    /// Log level (error, warn, info, debug, trace)
    pub log_level: String,
}

impl Default for DebugSection {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Configuration error
#[derive(Debug)]
pub struct ConfigError {
    message: String,
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        ConfigError {
            message: e.to_string(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Configuration error: {}", self.message)
    }
}

impl std::error::Error for ConfigError {}
