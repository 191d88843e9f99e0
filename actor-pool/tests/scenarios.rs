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
//! End-to-end pool scenarios with a soft limit of 10 and a hard limit of 20
//!
//! All scenarios run against the headless adapters and advance the pool
//! clock by hand.

use actor_pool::math::Point3;
use actor_pool::templates::{ActorTemplate, ColliderShape};
use actor_pool::{
    ActorType, EntityId, EntityState, PoolConfig, PoolCounts, PoolManager, SceneAdapters,
};
use std::time::Duration;

const SOFT: usize = 10;
const HARD: usize = 20;
const FLIGHT: Duration = Duration::from_millis(1500);

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn coin() -> ActorType {
    ActorType::new("coin")
}

fn new_pool() -> PoolManager {
    init_logging();
    let config = PoolConfig::new(SOFT, HARD)
        .with_seed(42)
        .with_flight_duration(FLIGHT)
        .with_template("coin", ActorTemplate::new(ColliderShape::Sphere { radius: 0.5 }));
    PoolManager::new(config, SceneAdapters::headless()).unwrap()
}

fn spawn_n(pool: &mut PoolManager, n: usize) -> Vec<EntityId> {
    (0..n)
        .map(|i| {
            pool.spawn(&coin(), Point3::new(i as f64, 2.0, 0.0), None)
                .expect("coin spawn should succeed")
        })
        .collect()
}

fn counts(active: usize, dying: usize, pooled: usize) -> PoolCounts {
    PoolCounts { active, dying, pooled }
}

#[test]
fn test_scenario_a_soft_limit_evicts_first_spawned() {
    let mut pool = new_pool();
    let ids = spawn_n(&mut pool, 10);
    assert_eq!(pool.counts(), counts(10, 0, 0));

    let eleventh = spawn_n(&mut pool, 1)[0];
    assert_eq!(pool.counts(), counts(10, 1, 0));
    assert_eq!(pool.entity(ids[0]).unwrap().state(), EntityState::Dying);
    assert_eq!(pool.entity(eleventh).unwrap().state(), EntityState::Active);
    assert_eq!(pool.dying_ids(), vec![ids[0]]);
    assert!(pool.verify_invariants().is_ok());
}

#[test]
fn test_scenario_b_hard_limit_recycles_oldest_dying() {
    let mut pool = new_pool();
    let ids = spawn_n(&mut pool, 20);
    assert_eq!(pool.counts(), counts(10, 10, 0));
    assert_eq!(pool.dying_ids(), ids[..10].to_vec());

    // Soft eviction of the oldest active entity pushes the total to the hard
    // limit, so the oldest dying entity is cleaned up and reused on the spot.
    let reused = spawn_n(&mut pool, 1)[0];
    assert_eq!(reused, ids[0]);
    assert_eq!(pool.entity(reused).unwrap().state(), EntityState::Active);
    assert_eq!(pool.counts(), counts(10, 10, 0));
    assert_eq!(pool.stats().forced_dying_recycles, 1);
    assert_eq!(pool.stats().forced_active_recycles, 0);
    assert_eq!(pool.stats().created, 20);
    assert_eq!(pool.stats().reused, 1);

    let counts = pool.counts();
    assert!(counts.active <= SOFT);
    assert!(counts.active + counts.dying <= HARD);
    assert!(pool.verify_invariants().is_ok());
}

#[test]
fn test_scenario_c_flight_completion_pools_entity() {
    let mut pool = new_pool();
    let ids = spawn_n(&mut pool, 11);
    assert_eq!(pool.pooled_ids(&coin()).len(), 0);

    pool.tick(FLIGHT - Duration::from_millis(1));
    assert_eq!(pool.entity(ids[0]).unwrap().state(), EntityState::Dying);

    pool.tick(FLIGHT);
    assert_eq!(pool.entity(ids[0]).unwrap().state(), EntityState::Pooled);
    assert_eq!(pool.pooled_ids(&coin()), &[ids[0]]);
    assert_eq!(pool.counts(), counts(10, 0, 1));
    assert_eq!(pool.stats().flights_completed, 1);
    assert_eq!(pool.pending_tasks(), 0);

    // The next spawn reuses the pooled entity instead of creating one.
    let next = spawn_n(&mut pool, 1)[0];
    assert_eq!(next, ids[0]);
    assert_eq!(pool.stats().created, 11);
}

#[test]
fn test_scenario_d_stale_flight_task_is_noop() {
    let mut pool = new_pool();
    let ids = spawn_n(&mut pool, 21);
    let victim = ids[0];
    // ids[20] is the reused victim; its old flight task is still queued.
    assert_eq!(ids[20], victim);
    let generation = pool.entity(victim).unwrap().generation();

    pool.tick(FLIGHT);
    let entity = pool.entity(victim).unwrap();
    assert_eq!(entity.state(), EntityState::Active);
    assert_eq!(entity.generation(), generation);
    assert_eq!(pool.stats().stale_tasks, 1);
    assert!(!pool.pooled_ids(&coin()).contains(&victim));
    assert!(pool.active_ids().contains(&victim));
    assert!(pool.verify_invariants().is_ok());
}

#[test]
fn test_scenario_d_stale_task_after_recycle_does_not_double_pool() {
    let mut pool = new_pool();
    let ids = spawn_n(&mut pool, 21);

    // Entity 0 was force-recycled and reused; evict it again and let every
    // task run. It must end up in the pool exactly once.
    spawn_n(&mut pool, 10);
    assert_eq!(pool.entity(ids[0]).unwrap().state(), EntityState::Dying);

    pool.tick(Duration::from_secs(10));
    let pooled = pool.pooled_ids(&coin());
    assert_eq!(pooled.iter().filter(|id| **id == ids[0]).count(), 1);
    assert!(pool.verify_invariants().is_ok());
}
