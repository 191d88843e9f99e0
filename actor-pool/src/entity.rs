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
//! Poolable actor records
//!
//! An entity is created once, lazily, and then cycles through
//! `Pooled → Active → Dying → Pooled` for the rest of the session. Its id and
//! type never change; everything else is reset on reactivation.

use crate::adapters::{BodyHandle, TweenHandle, VisualHandle};
use crate::math::{Motion, Transform};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a pooled actor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(u64);

impl EntityId {
    /// Create a new EntityId from a raw u64 value
    pub fn new(id: u64) -> Self {
        EntityId(id)
    }

    /// Get the raw u64 value
    pub fn raw(&self) -> u64 {
        self.0
    }

    pub(crate) fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

/// Tag selecting an actor's template, material and collider shape
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActorType(String);

impl ActorType {
    /// Create an actor type from its name
    pub fn new(name: impl Into<String>) -> Self {
        ActorType(name.into())
    }

    /// The type name
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ActorType {
    fn from(name: &str) -> Self {
        ActorType::new(name)
    }
}

/// Lifecycle state of a pooled actor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityState {
    /// Inactive, held in its type's reuse list
    Pooled,
    /// Visible and simulated, present in the activation queue
    Active,
    /// Flying off-scene, waiting for its cleanup task
    Dying,
}

impl EntityState {
    /// Whether the pool's state machine allows moving from `self` to `next`
    ///
    /// ```
    /// use actor_pool::entity::EntityState;
    ///
    /// assert!(EntityState::Pooled.can_transition(EntityState::Active));
    /// assert!(EntityState::Active.can_transition(EntityState::Pooled));
    /// assert!(!EntityState::Pooled.can_transition(EntityState::Dying));
    /// ```
    pub fn can_transition(self, next: EntityState) -> bool {
        matches!(
            (self, next),
            (EntityState::Pooled, EntityState::Active)
                | (EntityState::Active, EntityState::Dying)
                | (EntityState::Active, EntityState::Pooled)
                | (EntityState::Dying, EntityState::Pooled)
        )
    }
}

impl fmt::Display for EntityState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityState::Pooled => "Pooled",
            EntityState::Active => "Active",
            EntityState::Dying => "Dying",
        };
        f.write_str(name)
    }
}

/// One poolable actor
///
/// Handles are non-owning: the render scene owns the visual and the physics
/// world owns the body.
#[derive(Debug, Clone)]
pub struct Entity {
    id: EntityId,
    actor_type: ActorType,
    pub(crate) state: EntityState,
    visual: VisualHandle,
    pub(crate) body: Option<BodyHandle>,
    pub(crate) activation_order: u64,
    pub(crate) generation: u32,
    pub(crate) first_activation: bool,
    pub(crate) transform: Transform,
    pub(crate) motion: Motion,
    pub(crate) hovered: bool,
    pub(crate) arrival_tween: Option<TweenHandle>,
    pub(crate) hover_tween: Option<TweenHandle>,
    pub(crate) label: Option<String>,
}

impl Entity {
    /// A freshly created entity, `Pooled` and never activated
    pub(crate) fn new(id: EntityId, actor_type: ActorType, visual: VisualHandle) -> Self {
        Entity {
            id,
            actor_type,
            state: EntityState::Pooled,
            visual,
            body: None,
            activation_order: 0,
            generation: 0,
            first_activation: true,
            transform: Transform::default(),
            motion: Motion::rest(),
            hovered: false,
            arrival_tween: None,
            hover_tween: None,
            label: None,
        }
    }

    /// Move to `next`, which must be a legal transition
    pub(crate) fn set_state(&mut self, next: EntityState) {
        debug_assert!(
            self.state.can_transition(next),
            "illegal transition {} -> {} for {}",
            self.state,
            next,
            self.id
        );
        self.state = next;
    }

    /// Invalidate any delayed task captured against the current generation
    pub(crate) fn bump_generation(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }

    /// Stable id
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Actor type
    pub fn actor_type(&self) -> &ActorType {
        &self.actor_type
    }

    /// Current lifecycle state
    pub fn state(&self) -> EntityState {
        self.state
    }

    /// Render-side handle
    pub fn visual(&self) -> VisualHandle {
        self.visual
    }

    /// Physics-side handle, absent before the first successful binding
    pub fn body(&self) -> Option<BodyHandle> {
        self.body
    }

    /// Order of the latest activation; smaller means older
    pub fn activation_order(&self) -> u64 {
        self.activation_order
    }

    /// Version tag used to invalidate stale cleanup tasks
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// True until the entity has been activated once
    pub fn is_first_activation(&self) -> bool {
        self.first_activation
    }

    /// Transform applied at the latest activation
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Transient motion state
    pub fn motion(&self) -> &Motion {
        &self.motion
    }

    /// Whether the hover dispatcher reported the pointer over this actor
    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    /// Handle of the arrival animation, if one is running
    pub fn arrival_tween(&self) -> Option<TweenHandle> {
        self.arrival_tween
    }

    /// Handle of the hover animation, if one is running
    pub fn hover_tween(&self) -> Option<TweenHandle> {
        self.hover_tween
    }

    /// Cosmetic label, once the display data source answered
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_id() {
        let id = EntityId::new(42);
        assert_eq!(id.raw(), 42);
        assert_eq!(id.to_string(), "Entity(42)");
    }

    #[test]
    fn test_new_entity_is_pooled_and_unactivated() {
        let e = Entity::new(EntityId::new(1), ActorType::new("coin"), VisualHandle::new(7));
        assert_eq!(e.state(), EntityState::Pooled);
        assert!(e.is_first_activation());
        assert!(e.body().is_none());
        assert_eq!(e.generation(), 0);
        assert_eq!(e.actor_type().as_str(), "coin");
    }

    #[test]
    fn test_state_machine_table() {
        use EntityState::*;
        let legal = [(Pooled, Active), (Active, Dying), (Active, Pooled), (Dying, Pooled)];
        for from in [Pooled, Active, Dying] {
            for to in [Pooled, Active, Dying] {
                assert_eq!(
                    from.can_transition(to),
                    legal.contains(&(from, to)),
                    "{} -> {}",
                    from,
                    to
                );
            }
        }
    }

    #[test]
    fn test_generation_wraps() {
        let mut e = Entity::new(EntityId::new(0), ActorType::new("gem"), VisualHandle::new(0));
        e.generation = u32::MAX;
        e.bump_generation();
        assert_eq!(e.generation(), 0);
    }
}
