//! Integration tests for configuration loading
//!
//! Tests that verify config loading from files and environment variables.

use std::path::PathBuf;

use cuboid::config::AppConfig;
use cuboid_physics::PhysicsConfig;
use serial_test::serial;

/// Scratch config directory unique to one test
fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("cuboid-config-{}-{}", name, std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
#[serial]
fn test_shipped_defaults_match_code_defaults() {
    let config = AppConfig::load_from(concat!(env!("CARGO_MANIFEST_DIR"), "/config")).unwrap();
    assert_eq!(config.physics.to_physics_config(), PhysicsConfig::default());
    assert_eq!(config.demo.crate_count, 3);
    assert_eq!(config.debug.log_level, "info");
}

#[test]
#[serial]
fn test_env_override() {
    std::env::set_var("CUBOID_PHYSICS__FRICTION", "0.25");
    std::env::set_var("CUBOID_DEBUG__LOG_LEVEL", "trace");
    let config = AppConfig::load_from(scratch_dir("env"));
    std::env::remove_var("CUBOID_PHYSICS__FRICTION");
    std::env::remove_var("CUBOID_DEBUG__LOG_LEVEL");

    let config = config.unwrap();
    assert_eq!(config.physics.friction, 0.25);
    assert_eq!(config.debug.log_level, "trace");
    assert_eq!(config.physics.solver_iterations, 8);
}

#[test]
#[serial]
fn test_user_file_overrides_default_file() {
    let dir = scratch_dir("user");
    std::fs::write(
        dir.join("default.toml"),
        "[physics]\nbaumgarte = 0.3\nfriction = 0.5\n",
    )
    .unwrap();
    std::fs::write(dir.join("user.toml"), "[physics]\nfriction = 0.1\n").unwrap();

    let config = AppConfig::load_from(&dir).unwrap();
    std::fs::remove_dir_all(&dir).unwrap();

    assert_eq!(config.physics.friction, 0.1);
    assert_eq!(config.physics.baumgarte, 0.3);
    assert_eq!(config.physics.penetration_slop, 0.01);
}

#[test]
#[serial]
fn test_malformed_file_is_an_error() {
    let dir = scratch_dir("bad");
    std::fs::write(dir.join("default.toml"), "[physics]\nfriction = \"lots\"\n").unwrap();

    let result = AppConfig::load_from(&dir);
    std::fs::remove_dir_all(&dir).unwrap();

    let err = result.unwrap_err();
    assert!(err.to_string().starts_with("Configuration error"));
}
