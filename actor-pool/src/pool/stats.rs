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
//! Monitoring snapshots

/// Running counters for monitoring pool behavior
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Entities created because no pooled entity of the type was available
    pub created: usize,
    /// Spawns served from a type pool
    pub reused: usize,
    /// Active entities moved to Dying by the soft limit
    pub soft_evictions: usize,
    /// Dying entities recycled early under hard-limit pressure
    pub forced_dying_recycles: usize,
    /// Active entities recycled directly under hard-limit pressure
    pub forced_active_recycles: usize,
    /// Flight tasks that completed and pooled their entity
    pub flights_completed: usize,
    /// Flight tasks dropped because their entity had moved on
    pub stale_tasks: usize,
    /// Spawns that went ahead without a physics body
    pub physics_degraded: usize,
    /// Spawn calls that produced no entity
    pub rejected_spawns: usize,
    /// Highest Active count observed
    pub peak_active: usize,
    /// Highest Dying count observed
    pub peak_dying: usize,
}

impl PoolStats {
    /// Share of successful spawns served by reuse, as a percentage
    pub fn reuse_rate(&self) -> f64 {
        let total = self.created + self.reused;
        if total == 0 {
            0.0
        } else {
            (self.reused as f64 / total as f64) * 100.0
        }
    }

    /// Total forced recycles of either kind
    pub fn forced_recycles(&self) -> usize {
        self.forced_dying_recycles + self.forced_active_recycles
    }
}

/// Current size of each collection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolCounts {
    /// Entities in the active queue
    pub active: usize,
    /// Entities in the dying set
    pub dying: usize,
    /// Entities across all type pools
    pub pooled: usize,
}

impl PoolCounts {
    /// Every entity ever created
    pub fn total(&self) -> usize {
        self.active + self.dying + self.pooled
    }
}
