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
//! Burst example
//!
//! Drives a headless pool through a burst of spawns at 60 frames per second
//! and prints the pool counts as actors are evicted, fly off and get reused.
//!
//! Run with `RUST_LOG=debug cargo run --example burst` to see the pool's own
//! log output.

use actor_pool::adapters::{HeadlessPhysics, StaticLabels};
use actor_pool::math::{Point3, Vec3};
use actor_pool::templates::{ActorTemplate, ColliderShape};
use actor_pool::{ActorType, PoolConfig, PoolManager, SceneAdapters};
use std::time::Duration;

fn main() {
    env_logger::init();

    println!("=== Actor Pool Burst ===\n");

    let config = PoolConfig::new(10, 20)
        .with_seed(2025)
        .with_flight_duration(Duration::from_millis(750))
        .with_template("coin", ActorTemplate::new(ColliderShape::Sphere { radius: 0.4 }))
        .with_template(
            "gem",
            ActorTemplate::new(ColliderShape::Cuboid {
                half_extents: [0.2, 0.3, 0.2],
            }),
        );
    let adapters = SceneAdapters::headless().with_display(Box::new(
        StaticLabels::new().with_label("coin", "Coin").with_label("gem", "Gem"),
    ));
    let mut pool = match PoolManager::new(config, adapters) {
        Ok(pool) => pool,
        Err(e) => {
            eprintln!("Invalid pool configuration: {}", e);
            return;
        }
    };

    let types = [ActorType::new("coin"), ActorType::new("gem")];
    let frame = Duration::from_millis(16);
    let mut now = Duration::ZERO;

    println!("{:>6} {:>7} {:>6} {:>7}", "frame", "active", "dying", "pooled");
    for i in 0..180u32 {
        // Three spawns per frame for the first second, then quiet.
        if i < 60 {
            for k in 0..3u32 {
                let x = f64::from(k) - 1.0;
                let impulse = Vec3::new(0.0, 2.0 + f64::from(k), 0.0);
                pool.spawn(&types[(i + k) as usize % 2], Point3::new(x, 1.0, 0.0), Some(impulse));
            }
        }

        now += frame;
        if let Some(physics) = pool.adapters_mut().physics_mut::<HeadlessPhysics>() {
            physics.step(frame);
        }
        pool.tick(now);

        if i % 15 == 0 {
            let counts = pool.counts();
            println!("{:>6} {:>7} {:>6} {:>7}", i, counts.active, counts.dying, counts.pooled);
        }
    }

    let stats = pool.stats();
    println!("\nCreated:          {}", stats.created);
    println!("Reused:           {} ({:.1}%)", stats.reused, stats.reuse_rate());
    println!("Soft evictions:   {}", stats.soft_evictions);
    println!("Forced recycles:  {}", stats.forced_recycles());
    println!("Stale tasks:      {}", stats.stale_tasks);
    println!("Peak active:      {}", stats.peak_active);

    match pool.verify_invariants() {
        Ok(()) => println!("\n✓ Pool invariants hold"),
        Err(e) => println!("\n✗ {}", e),
    }
}
