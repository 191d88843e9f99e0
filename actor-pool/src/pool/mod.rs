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
//! Bounded actor pool
//!
//! Every entity lives in exactly one of three collections:
//!
//! - a per-type pool of hidden, reusable entities ([`TypePool`])
//! - the FIFO queue of visible, simulated entities ([`ActiveQueue`])
//! - the set of entities flying off-scene before cleanup ([`DyingSet`])
//!
//! [`PoolManager`] owns all three and is the only code that moves entities
//! between them. Spawning past the soft limit evicts the oldest active
//! entity; reaching the hard limit recycles synchronously.

pub mod collections;
pub mod eviction;
pub mod labels;
mod manager;
mod spawn;
pub mod stats;

pub use collections::{ActiveQueue, DyingSet, TypePool};
pub use eviction::EvictionPolicy;
pub use labels::LabelCache;
pub use manager::PoolManager;
pub use stats::{PoolCounts, PoolStats};
