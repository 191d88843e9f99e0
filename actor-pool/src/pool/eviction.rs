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
//! Eviction policy
//!
//! Picks the oldest active entity and computes the cosmetic "thrown away"
//! motion: an impulse toward a fixed off-scene sink plus a random spin. The
//! flight lasts `T_FLIGHT`, after which the scheduled cleanup pools the
//! entity.

use crate::config::PoolConfig;
use crate::entity::EntityId;
use crate::math::{Point3, Vec3};
use crate::pool::collections::ActiveQueue;
use rand::Rng;
use std::time::Duration;

/// Eviction target, strength and flight time
#[derive(Debug, Clone, PartialEq)]
pub struct EvictionPolicy {
    sink: Point3,
    impulse: f64,
    spin: f64,
    flight: Duration,
}

impl EvictionPolicy {
    /// Policy with explicit parameters
    pub fn new(sink: Point3, impulse: f64, spin: f64, flight: Duration) -> Self {
        EvictionPolicy {
            sink,
            impulse,
            spin,
            flight,
        }
    }

    /// Policy described by a pool config
    pub fn from_config(config: &PoolConfig) -> Self {
        EvictionPolicy::new(
            config.sink(),
            config.eviction_impulse,
            config.eviction_spin,
            config.flight_duration(),
        )
    }

    /// FIFO victim: the entity with the smallest activation order
    pub fn select_victim(&self, active: &ActiveQueue) -> Option<EntityId> {
        active.oldest()
    }

    /// Unit vector from `from` toward the sink
    ///
    /// Falls back to +Y when `from` sits on the sink.
    pub fn exit_direction(&self, from: Point3) -> Vec3 {
        (self.sink - from)
            .try_normalize(1e-9)
            .unwrap_or_else(Vec3::y)
    }

    /// Outward impulse for an entity at `from`
    pub fn exit_impulse(&self, from: Point3) -> Vec3 {
        self.exit_direction(from) * self.impulse
    }

    /// Random spin impulse, each axis in `[-spin, spin]`
    pub fn spin_impulse<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec3 {
        random_axes(rng, self.spin)
    }

    /// `T_FLIGHT`
    pub fn flight_duration(&self) -> Duration {
        self.flight
    }

    /// The off-scene target
    pub fn sink(&self) -> Point3 {
        self.sink
    }
}

/// Vector with each component uniform in `[-max, max]`
pub(crate) fn random_axes<R: Rng + ?Sized>(rng: &mut R, max: f64) -> Vec3 {
    if max <= 0.0 {
        return Vec3::zeros();
    }
    Vec3::new(
        rng.gen_range(-max..=max),
        rng.gen_range(-max..=max),
        rng.gen_range(-max..=max),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn policy() -> EvictionPolicy {
        EvictionPolicy::new(Point3::new(0.0, -10.0, 0.0), 5.0, 2.0, Duration::from_millis(800))
    }

    #[test]
    fn test_select_victim_is_oldest() {
        let mut active = ActiveQueue::new();
        assert_eq!(policy().select_victim(&active), None);
        active.push(EntityId::new(7));
        active.push(EntityId::new(3));
        assert_eq!(policy().select_victim(&active), Some(EntityId::new(7)));
    }

    #[test]
    fn test_exit_impulse_points_at_sink() {
        let impulse = policy().exit_impulse(Point3::new(0.0, 10.0, 0.0));
        assert_relative_eq!(impulse, Vec3::new(0.0, -5.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_exit_direction_degenerate() {
        let p = policy();
        assert_eq!(p.exit_direction(p.sink()), Vec3::y());
    }

    #[test]
    fn test_spin_bounds() {
        let mut rng = StdRng::seed_from_u64(3);
        let p = policy();
        for _ in 0..100 {
            let spin = p.spin_impulse(&mut rng);
            assert!(spin.iter().all(|v| v.abs() <= 2.0));
        }
    }

    #[test]
    fn test_zero_spin_is_zero() {
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(random_axes(&mut rng, 0.0), Vec3::zeros());
    }

    #[test]
    fn test_from_config() {
        let config = PoolConfig::default();
        let p = EvictionPolicy::from_config(&config);
        assert_eq!(p.flight_duration(), config.flight_duration());
        assert_eq!(p.sink(), config.sink());
    }
}
