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
//! # Actor Pool
//!
//! A bounded object pool for physically simulated decorative actors.
//!
//! Actors are spawned on demand at a point in the scene. Past a soft limit
//! the oldest visible actor is thrown toward an off-scene sink and recycled
//! once its flight is over; at the hard limit recycling happens on the spot.
//! Recycled actors keep their visual and physics body and are reused by the
//! next spawn of the same type.
//!
//! ## Features
//!
//! - **Bounded**: `active <= soft_limit` and `active + dying <= hard_limit` after every spawn
//! - **FIFO eviction**: actors leave in the order they arrived
//! - **Stale-safe timers**: delayed cleanups carry a generation and never touch a reused actor
//! - **Pluggable scene**: physics, rendering, animation and input sit behind adapter traits
//!
//! ## Example
//!
//! ```rust
//! use actor_pool::{PoolConfig, PoolManager, SceneAdapters};
//! use actor_pool::templates::{ActorTemplate, ColliderShape};
//! use actor_pool::math::Point3;
//! use std::time::Duration;
//!
//! let config = PoolConfig::new(10, 20)
//!     .with_template("coin", ActorTemplate::new(ColliderShape::Sphere { radius: 0.5 }));
//! let mut pool = PoolManager::new(config, SceneAdapters::headless()).unwrap();
//!
//! let coin = "coin".into();
//! for _ in 0..12 {
//!     pool.spawn(&coin, Point3::new(0.0, 1.0, 0.0), None);
//! }
//! assert_eq!(pool.counts().active, 10);
//! assert_eq!(pool.counts().dying, 2);
//!
//! pool.tick(Duration::from_secs(2));
//! assert_eq!(pool.counts().pooled, 2);
//! ```

#![warn(missing_docs)]

/// Scene adapter traits and headless implementations
pub mod adapters;

/// Pool configuration
pub mod config;

/// Entity identity and per-entity state
pub mod entity;

/// Error types
pub mod error;

/// Math aliases and transforms
pub mod math;

/// The pool itself
pub mod pool;

/// Generation-checked delayed tasks
pub mod scheduler;

/// Per-type actor templates
pub mod templates;

pub use adapters::{InteractionEvent, SceneAdapters};
pub use config::PoolConfig;
pub use entity::{ActorType, Entity, EntityId, EntityState};
pub use error::{AdapterError, ConfigError, InvariantViolation, SpawnRejection};
pub use pool::{PoolCounts, PoolManager, PoolStats};
