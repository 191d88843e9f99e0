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
//! The three collections that partition every entity
//!
//! Each entity id lives in exactly one of: its type's [`TypePool`], the
//! [`ActiveQueue`] or the [`DyingSet`]. Only `PoolManager` mutates them.

use crate::entity::{ActorType, EntityId};
use std::collections::{HashMap, VecDeque};

/// Inactive entities per actor type, ready for reuse
#[derive(Debug, Default)]
pub struct TypePool {
    pools: HashMap<ActorType, Vec<EntityId>>,
}

impl TypePool {
    /// Create an empty pool
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, actor_type: &ActorType, id: EntityId) {
        match self.pools.get_mut(actor_type) {
            Some(list) => list.push(id),
            None => {
                self.pools.insert(actor_type.clone(), vec![id]);
            }
        }
    }

    pub(crate) fn pop(&mut self, actor_type: &ActorType) -> Option<EntityId> {
        self.pools.get_mut(actor_type).and_then(Vec::pop)
    }

    /// Pooled ids of one type
    pub fn ids(&self, actor_type: &ActorType) -> &[EntityId] {
        self.pools.get(actor_type).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of pooled entities of one type
    pub fn len_of(&self, actor_type: &ActorType) -> usize {
        self.ids(actor_type).len()
    }

    /// Number of pooled entities across all types
    pub fn total(&self) -> usize {
        self.pools.values().map(Vec::len).sum()
    }

    /// Every pooled id with its type
    pub fn iter(&self) -> impl Iterator<Item = (&ActorType, EntityId)> {
        self.pools
            .iter()
            .flat_map(|(t, ids)| ids.iter().map(move |id| (t, *id)))
    }
}

/// Active entities, oldest activation first
///
/// Entities are appended at activation with a strictly increasing
/// activation order, so the front is always the oldest.
#[derive(Debug, Default)]
pub struct ActiveQueue {
    queue: VecDeque<EntityId>,
}

impl ActiveQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, id: EntityId) {
        self.queue.push_back(id);
    }

    pub(crate) fn pop_oldest(&mut self) -> Option<EntityId> {
        self.queue.pop_front()
    }

    /// Oldest active entity
    pub fn oldest(&self) -> Option<EntityId> {
        self.queue.front().copied()
    }

    /// Number of active entities
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Whether nothing is active
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Whether `id` is active
    pub fn contains(&self, id: EntityId) -> bool {
        self.queue.contains(&id)
    }

    /// Active ids, oldest first
    pub fn iter(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.queue.iter().copied()
    }
}

/// Entities mid-eviction, in eviction order
#[derive(Debug, Default)]
pub struct DyingSet {
    queue: VecDeque<EntityId>,
}

impl DyingSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, id: EntityId) {
        self.queue.push_back(id);
    }

    pub(crate) fn pop_oldest(&mut self) -> Option<EntityId> {
        self.queue.pop_front()
    }

    pub(crate) fn remove(&mut self, id: EntityId) -> bool {
        match self.queue.iter().position(|d| *d == id) {
            Some(index) => {
                self.queue.remove(index);
                true
            }
            None => false,
        }
    }

    /// Number of dying entities
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Whether nothing is dying
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Whether `id` is dying
    pub fn contains(&self, id: EntityId) -> bool {
        self.queue.contains(&id)
    }

    /// Dying ids, earliest eviction first
    pub fn iter(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.queue.iter().copied()
    }
}
