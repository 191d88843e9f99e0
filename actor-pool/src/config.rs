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
//! Pool configuration
//!
//! Limits, eviction flight timing, cosmetic tuning and template
//! registrations. Configs are built in code with the `with_*` methods or
//! loaded from TOML:
//!
//! ```toml
//! soft_limit = 10
//! hard_limit = 20
//! flight_duration_ms = 1500
//! sink_point = [0.0, -40.0, -60.0]
//! seed = 7
//!
//! [templates.coin]
//! shape = { kind = "sphere", radius = 0.4 }
//! ```

use crate::adapters::Easing;
use crate::entity::ActorType;
use crate::error::ConfigError;
use crate::math::{point_from_array, Point3};
use crate::templates::ActorTemplate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

/// Configuration for pool limits and actor behavior
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Active actors allowed before the oldest is evicted on the next spawn
    pub soft_limit: usize,
    /// Ceiling on active + dying actors
    pub hard_limit: usize,
    /// How long an evicted actor flies before it is cleaned up, in milliseconds
    pub flight_duration_ms: u64,
    /// Off-scene point evicted actors are thrown toward
    pub sink_point: [f64; 3],
    /// Where cleaned-up bodies are parked, far outside interaction range
    pub parking_position: [f64; 3],
    /// Magnitude of the outward impulse applied on eviction
    pub eviction_impulse: f64,
    /// Maximum per-axis spin impulse applied on eviction
    pub eviction_spin: f64,
    /// Maximum per-axis random torque impulse applied on spawn
    pub spawn_torque: f64,
    /// Upward impulse applied when an actor is clicked
    pub click_impulse: f64,
    /// Length of the arrival scale ramp, in milliseconds
    pub arrival_duration_ms: u64,
    /// Curve of the arrival scale ramp
    pub arrival_easing: Easing,
    /// Length of the hover scale tween, in milliseconds
    pub hover_duration_ms: u64,
    /// Curve of the hover scale tween
    pub hover_easing: Easing,
    /// Speed of the idle glow oscillation, in radians per second
    pub oscillation_rate: f64,
    /// RNG seed; drawn from entropy when absent
    pub seed: Option<u64>,
    /// Templates registered at construction
    pub templates: BTreeMap<ActorType, ActorTemplate>,
}

impl Default for PoolConfig {
    fn default() -> Self {
        PoolConfig {
            soft_limit: 10,
            hard_limit: 20,
            flight_duration_ms: 1500,
            sink_point: [0.0, -40.0, -60.0],
            parking_position: [0.0, -10_000.0, 0.0],
            eviction_impulse: 12.0,
            eviction_spin: 4.0,
            spawn_torque: 1.5,
            click_impulse: 6.0,
            arrival_duration_ms: 350,
            arrival_easing: Easing::BackOut,
            hover_duration_ms: 120,
            hover_easing: Easing::QuadOut,
            oscillation_rate: 2.0,
            seed: None,
            templates: BTreeMap::new(),
        }
    }
}

impl PoolConfig {
    /// Create a configuration with custom limits and default tuning
    pub fn new(soft_limit: usize, hard_limit: usize) -> Self {
        PoolConfig {
            soft_limit,
            hard_limit,
            ..Self::default()
        }
    }

    /// Set the eviction flight duration
    ///
    /// The config stores whole milliseconds; a fractional duration is rounded
    /// up so that any non-zero flight stays non-zero. Durations beyond
    /// `u64::MAX` milliseconds saturate.
    pub fn with_flight_duration(mut self, flight: Duration) -> Self {
        let millis = (flight.as_nanos() + 999_999) / 1_000_000;
        self.flight_duration_ms = u64::try_from(millis).unwrap_or(u64::MAX);
        self
    }

    /// Seed the RNG for reproducible torques and spins
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the off-scene eviction target
    pub fn with_sink_point(mut self, sink: Point3) -> Self {
        self.sink_point = [sink.x, sink.y, sink.z];
        self
    }

    /// Add a template registration
    pub fn with_template(
        mut self,
        actor_type: impl Into<ActorType>,
        template: ActorTemplate,
    ) -> Self {
        self.templates.insert(actor_type.into(), template);
        self
    }

    /// Parse a TOML document and validate it
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` for malformed TOML, or any validation error.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: PoolConfig =
            toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Io` when the file cannot be read, otherwise as
    /// [`PoolConfig::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Serialize to TOML
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` if a value has no TOML representation.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Check limits, durations, tuning values and templates
    ///
    /// # Errors
    ///
    /// Returns the first violated rule.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.soft_limit == 0 {
            return Err(ConfigError::ZeroSoftLimit);
        }
        if self.hard_limit <= self.soft_limit {
            return Err(ConfigError::HardLimitTooLow {
                soft: self.soft_limit,
                hard: self.hard_limit,
            });
        }
        if self.flight_duration_ms == 0 {
            return Err(ConfigError::ZeroDuration("flight_duration_ms"));
        }
        let tuning = [
            ("eviction_impulse", self.eviction_impulse),
            ("eviction_spin", self.eviction_spin),
            ("spawn_torque", self.spawn_torque),
            ("click_impulse", self.click_impulse),
            ("oscillation_rate", self.oscillation_rate),
        ];
        for (name, value) in tuning {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::InvalidValue { name, value });
            }
        }
        let points = [
            ("sink_point", self.sink_point),
            ("parking_position", self.parking_position),
        ];
        for (name, point) in points {
            if let Some(value) = point.iter().copied().find(|v| !v.is_finite()) {
                return Err(ConfigError::InvalidValue { name, value });
            }
        }
        for (actor_type, template) in &self.templates {
            template.validate(actor_type)?;
        }
        Ok(())
    }

    /// `T_FLIGHT`
    pub fn flight_duration(&self) -> Duration {
        Duration::from_millis(self.flight_duration_ms)
    }

    /// Arrival tween length
    pub fn arrival_duration(&self) -> Duration {
        Duration::from_millis(self.arrival_duration_ms)
    }

    /// Hover tween length
    pub fn hover_duration(&self) -> Duration {
        Duration::from_millis(self.hover_duration_ms)
    }

    /// Eviction target as a point
    pub fn sink(&self) -> Point3 {
        point_from_array(self.sink_point)
    }

    /// Parking position as a point
    pub fn parking(&self) -> Point3 {
        point_from_array(self.parking_position)
    }
}
