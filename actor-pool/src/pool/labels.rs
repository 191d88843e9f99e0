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
//! Per-type cache of cosmetic labels
//!
//! Each type is looked up at most once. A failed lookup is remembered so it
//! is not retried every spawn.

use crate::entity::ActorType;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
enum LabelState {
    Pending,
    Ready(String),
    Failed,
}

/// Label lookups keyed by actor type
#[derive(Debug, Default)]
pub struct LabelCache {
    entries: HashMap<ActorType, LabelState>,
}

impl LabelCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a type as pending and report whether a lookup should start
    pub fn begin_lookup(&mut self, actor_type: &ActorType) -> bool {
        if self.entries.contains_key(actor_type) {
            return false;
        }
        self.entries.insert(actor_type.clone(), LabelState::Pending);
        true
    }

    /// Record a successful lookup
    pub fn resolve(&mut self, actor_type: ActorType, label: String) {
        self.entries.insert(actor_type, LabelState::Ready(label));
    }

    /// Record a failed lookup
    pub fn fail(&mut self, actor_type: ActorType) {
        self.entries.insert(actor_type, LabelState::Failed);
    }

    /// Cached label, if the lookup succeeded
    pub fn get(&self, actor_type: &ActorType) -> Option<&str> {
        match self.entries.get(actor_type) {
            Some(LabelState::Ready(label)) => Some(label),
            _ => None,
        }
    }

    /// Whether a lookup is in flight
    pub fn is_pending(&self, actor_type: &ActorType) -> bool {
        matches!(self.entries.get(actor_type), Some(LabelState::Pending))
    }
}
