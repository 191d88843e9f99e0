// Copyright 2025 John Brosnihan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//! Configuration loading tests

use actor_pool::adapters::Easing;
use actor_pool::math::Point3;
use actor_pool::templates::ColliderShape;
use actor_pool::{ActorType, ConfigError, PoolConfig, PoolManager, SceneAdapters};
use std::time::Duration;

const POOL_TOML: &str = r#"
soft_limit = 4
hard_limit = 9
flight_duration_ms = 800
sink_point = [5.0, -20.0, 0.0]
arrival_easing = "cubic_out"
hover_easing = "linear"
seed = 17

[templates.coin]
shape = { kind = "sphere", radius = 0.4 }
base_scale = 0.8

[templates.crate]
shape = { kind = "cuboid", half_extents = [0.5, 0.5, 0.5] }
body = { mass = 3.0, restitution = 0.1 }
"#;

#[test]
fn test_parse_full_document() {
    let config = PoolConfig::from_toml_str(POOL_TOML).unwrap();
    assert_eq!(config.soft_limit, 4);
    assert_eq!(config.hard_limit, 9);
    assert_eq!(config.flight_duration(), Duration::from_millis(800));
    assert_eq!(config.sink(), Point3::new(5.0, -20.0, 0.0));
    assert_eq!(config.arrival_easing, Easing::CubicOut);
    assert_eq!(config.hover_easing, Easing::Linear);
    assert_eq!(config.seed, Some(17));
    // Keys left out keep their defaults.
    assert_eq!(config.hover_duration_ms, PoolConfig::default().hover_duration_ms);

    let coin = &config.templates[&ActorType::new("coin")];
    assert_eq!(coin.shape, ColliderShape::Sphere { radius: 0.4 });
    assert_eq!(coin.base_scale, 0.8);
    let crate_template = &config.templates[&ActorType::new("crate")];
    assert_eq!(crate_template.body.mass, 3.0);
    assert_eq!(crate_template.body.restitution, 0.1);
}

#[test]
fn test_empty_document_is_default() {
    let config = PoolConfig::from_toml_str("").unwrap();
    assert_eq!(config, PoolConfig::default());
}

#[test]
fn test_invalid_limits_rejected() {
    let result = PoolConfig::from_toml_str("soft_limit = 10\nhard_limit = 10\n");
    assert!(matches!(result, Err(ConfigError::HardLimitTooLow { soft: 10, hard: 10 })));

    let result = PoolConfig::from_toml_str("soft_limit = 0\n");
    assert!(matches!(result, Err(ConfigError::ZeroSoftLimit)));
}

#[test]
fn test_invalid_template_rejected() {
    let text = r#"
[templates.coin]
shape = { kind = "sphere", radius = -1.0 }
"#;
    assert!(matches!(
        PoolConfig::from_toml_str(text),
        Err(ConfigError::InvalidTemplate { .. })
    ));
}

#[test]
fn test_malformed_toml_rejected() {
    assert!(matches!(
        PoolConfig::from_toml_str("soft_limit = \"ten\""),
        Err(ConfigError::Parse(_))
    ));
    assert!(matches!(
        PoolConfig::from_toml_str("[templates.coin]\nshape = { kind = \"torus\" }\n"),
        Err(ConfigError::Parse(_))
    ));
}

#[test]
fn test_load_from_file() {
    let path = std::env::temp_dir().join(format!("actor-pool-config-{}.toml", std::process::id()));
    std::fs::write(&path, POOL_TOML).unwrap();
    let loaded = PoolConfig::load(&path);
    std::fs::remove_file(&path).unwrap();

    let config = loaded.unwrap();
    assert_eq!(config.templates.len(), 2);
    assert!(PoolManager::new(config, SceneAdapters::headless()).is_ok());
}

#[test]
fn test_load_missing_file() {
    let path = std::env::temp_dir().join("actor-pool-config-does-not-exist.toml");
    assert!(matches!(PoolConfig::load(path), Err(ConfigError::Io(_))));
}

#[test]
fn test_loaded_templates_are_spawnable() {
    let config = PoolConfig::from_toml_str(POOL_TOML).unwrap();
    let mut pool = PoolManager::new(config, SceneAdapters::headless()).unwrap();
    let id = pool.spawn(&ActorType::new("crate"), Point3::origin(), None).unwrap();
    assert_eq!(pool.entity(id).unwrap().actor_type().as_str(), "crate");
    assert!(pool.spawn(&ActorType::new("barrel"), Point3::origin(), None).is_none());
}
