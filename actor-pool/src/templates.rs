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
//! Actor template registry
//!
//! A template describes how to build and simulate one actor type: its
//! collider, its body options and the scales used by the cosmetic
//! animations. Spawning a type without a template is a configuration error.
//!
//! Templates come either from static registration or from the
//! `[templates.<type>]` tables of a config file:
//!
//! ```toml
//! [templates.coin]
//! shape = { kind = "sphere", radius = 0.4 }
//! body = { mass = 0.5, restitution = 0.6 }
//! base_scale = 1.0
//! hover_scale = 1.2
//! ```

use crate::entity::ActorType;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Collider shape attached when a visual is bound to a body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColliderShape {
    /// Sphere
    Sphere {
        /// Radius
        radius: f64,
    },
    /// Axis-aligned box in body space
    Cuboid {
        /// Half extents along x, y, z
        half_extents: [f64; 3],
    },
    /// Capsule along the body's y axis
    Capsule {
        /// Half height of the cylindrical part
        half_height: f64,
        /// Radius
        radius: f64,
    },
}

impl ColliderShape {
    fn is_valid(&self) -> bool {
        let positive = |v: f64| v.is_finite() && v > 0.0;
        match self {
            ColliderShape::Sphere { radius } => positive(*radius),
            ColliderShape::Cuboid { half_extents } => half_extents.iter().all(|v| positive(*v)),
            ColliderShape::Capsule { half_height, radius } => {
                positive(*half_height) && positive(*radius)
            }
        }
    }
}

/// Rigid body parameters passed to the physics world
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BodyOptions {
    /// Mass in kilograms
    pub mass: f64,
    /// Bounciness in `[0, 1]`
    pub restitution: f64,
    /// Surface friction
    pub friction: f64,
    /// Linear damping
    pub linear_damping: f64,
    /// Angular damping
    pub angular_damping: f64,
}

impl Default for BodyOptions {
    fn default() -> Self {
        BodyOptions {
            mass: 1.0,
            restitution: 0.4,
            friction: 0.5,
            linear_damping: 0.05,
            angular_damping: 0.1,
        }
    }
}

/// Everything the pool needs to know about one actor type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActorTemplate {
    /// Collider
    pub shape: ColliderShape,
    /// Body options
    #[serde(default)]
    pub body: BodyOptions,
    /// Resting scale reached at the end of the arrival animation
    #[serde(default = "default_base_scale")]
    pub base_scale: f64,
    /// Scale while hovered
    #[serde(default = "default_hover_scale")]
    pub hover_scale: f64,
}

fn default_base_scale() -> f64 {
    1.0
}

fn default_hover_scale() -> f64 {
    1.15
}

impl ActorTemplate {
    /// Template with the given collider and default body options and scales
    pub fn new(shape: ColliderShape) -> Self {
        ActorTemplate {
            shape,
            body: BodyOptions::default(),
            base_scale: default_base_scale(),
            hover_scale: default_hover_scale(),
        }
    }

    /// Override the body options
    pub fn with_body(mut self, body: BodyOptions) -> Self {
        self.body = body;
        self
    }

    /// Override the resting and hover scales
    pub fn with_scales(mut self, base_scale: f64, hover_scale: f64) -> Self {
        self.base_scale = base_scale;
        self.hover_scale = hover_scale;
        self
    }

    /// Check shape, mass and scales
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidTemplate` naming the first bad field.
    pub fn validate(&self, actor_type: &ActorType) -> Result<(), ConfigError> {
        let invalid = |reason: &str| ConfigError::InvalidTemplate {
            actor_type: actor_type.clone(),
            reason: reason.to_string(),
        };
        if !self.shape.is_valid() {
            return Err(invalid("collider dimensions must be positive and finite"));
        }
        if !(self.body.mass.is_finite() && self.body.mass > 0.0) {
            return Err(invalid("mass must be positive and finite"));
        }
        for (name, v) in [("base_scale", self.base_scale), ("hover_scale", self.hover_scale)] {
            if !(v.is_finite() && v > 0.0) {
                return Err(invalid(&format!("{} must be positive and finite", name)));
            }
        }
        Ok(())
    }
}

/// Registered templates, keyed by actor type
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    templates: BTreeMap<ActorType, ActorTemplate>,
}

impl TemplateRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a template
    ///
    /// # Errors
    ///
    /// - `ConfigError::DuplicateTemplate` if the type is already registered
    /// - `ConfigError::InvalidTemplate` if the template fails validation
    pub fn register(
        &mut self,
        actor_type: ActorType,
        template: ActorTemplate,
    ) -> Result<(), ConfigError> {
        if self.templates.contains_key(&actor_type) {
            return Err(ConfigError::DuplicateTemplate(actor_type));
        }
        template.validate(&actor_type)?;
        self.templates.insert(actor_type, template);
        Ok(())
    }

    /// Template for a type
    pub fn get(&self, actor_type: &ActorType) -> Option<&ActorTemplate> {
        self.templates.get(actor_type)
    }

    /// Whether a type has a template
    pub fn contains(&self, actor_type: &ActorType) -> bool {
        self.templates.contains_key(actor_type)
    }

    /// Number of registered types
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Whether nothing is registered
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Registered types in name order
    pub fn types(&self) -> impl Iterator<Item = &ActorType> {
        self.templates.keys()
    }
}
