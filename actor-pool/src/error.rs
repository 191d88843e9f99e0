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
//! Error types
//!
//! Nothing here ever crosses the `spawn`/`tick` boundary: runtime failures
//! are recovered inside the pool and only logged. These types surface from
//! construction, configuration loading, template registration and the
//! invariant checker.

use crate::entity::{ActorType, EntityId};

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// Soft limit must allow at least one visible actor
    #[error("soft_limit must be greater than zero")]
    ZeroSoftLimit,

    /// Hard limit must leave room above the soft limit for dying actors
    #[error("hard_limit ({hard}) must be greater than soft_limit ({soft})")]
    HardLimitTooLow {
        /// Configured soft limit
        soft: usize,
        /// Configured hard limit
        hard: usize,
    },

    /// A duration that must be positive was zero
    #[error("{0} must be greater than zero")]
    ZeroDuration(&'static str),

    /// A tuning value was NaN, infinite or negative
    #[error("{name} must be finite and non-negative, got {value}")]
    InvalidValue {
        /// Config key
        name: &'static str,
        /// Offending value
        value: f64,
    },

    /// The same actor type was registered twice
    #[error("template for '{0}' is already registered")]
    DuplicateTemplate(ActorType),

    /// A template carried unusable shape or body parameters
    #[error("template for '{actor_type}' is invalid: {reason}")]
    InvalidTemplate {
        /// Actor type of the template
        actor_type: ActorType,
        /// What is wrong with it
        reason: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Failure reported by one of the scene adapters
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum AdapterError {
    /// The physics world could not create a body
    #[error("physics body creation failed: {0}")]
    BodyCreation(String),

    /// The physics world could not attach a visual to a body
    #[error("visual/body binding failed: {0}")]
    Binding(String),

    /// The render scene could not clone the template for a type
    #[error("template clone failed for '{0}'")]
    TemplateClone(ActorType),

    /// A display-data lookup failed
    #[error("display data lookup failed: {0}")]
    Lookup(String),
}

/// Why a spawn request produced no actor
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum SpawnRejection {
    /// No template registered for the requested type
    #[error("no template registered for '{0}'")]
    UnknownType(ActorType),
    /// Origin had a NaN or infinite coordinate
    #[error("origin is not a finite position")]
    InvalidOrigin,
    /// The render scene failed to clone the template
    #[error(transparent)]
    TemplateClone(AdapterError),
}

/// A broken pool invariant, reported by `PoolManager::verify_invariants`
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum InvariantViolation {
    /// An entity is listed in more than one collection, or in none
    #[error("{id} appears in {count} collections")]
    Partition {
        /// Offending entity
        id: EntityId,
        /// How many collections list it
        count: usize,
    },

    /// The state recorded on an entity disagrees with the collection holding it
    #[error("{id} is held by the {collection} collection but its state is {state}")]
    StateMismatch {
        /// Offending entity
        id: EntityId,
        /// Collection that holds it
        collection: &'static str,
        /// State recorded on the entity
        state: String,
    },

    /// Active + Dying exceeded the hard limit
    #[error("active ({active}) + dying ({dying}) exceeds hard limit {hard}")]
    HardLimit {
        /// Active count
        active: usize,
        /// Dying count
        dying: usize,
        /// Configured hard limit
        hard: usize,
    },

    /// The active queue is not ordered by activation order
    #[error("active queue out of activation order at {0}")]
    ActiveOrder(EntityId),
}
