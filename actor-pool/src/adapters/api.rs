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
//! Adapter traits for the collaborators the pool drives
//!
//! The pool never looks inside the renderer, the physics engine, the
//! tweening engine or the hover dispatcher. It talks to them through these
//! traits and keeps only opaque handles.
//!
//! # Contracts
//!
//! Implementations must:
//! - Tolerate repeated calls (sleeping a sleeping body, hiding a hidden visual)
//! - Never call back into the pool from inside an adapter method
//! - Report failures through `AdapterError` instead of panicking

use crate::adapters::tween::Tween;
use crate::entity::{ActorType, EntityId};
use crate::error::AdapterError;
use crate::math::{Point3, Quat, Vec3};
use crate::templates::{BodyOptions, ColliderShape};
use std::any::Any;
use std::fmt;

macro_rules! opaque_handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(u64);

        impl $name {
            /// Wrap a raw adapter-assigned value
            pub fn new(raw: u64) -> Self {
                $name(raw)
            }

            /// The raw adapter-assigned value
            pub fn raw(&self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }
    };
}

opaque_handle!(
    /// Handle to a visual owned by the render scene
    VisualHandle
);
opaque_handle!(
    /// Handle to a rigid body owned by the physics world
    BodyHandle
);
opaque_handle!(
    /// Handle to a running tween owned by the animator
    TweenHandle
);

/// Physics engine boundary
pub trait PhysicsWorld {
    /// Create a dynamic body at `position`
    ///
    /// # Errors
    ///
    /// Returns `AdapterError::BodyCreation` when the world cannot allocate a body.
    fn create_body(&mut self, position: Point3) -> Result<BodyHandle, AdapterError>;

    /// Attach a visual to a body with the template's collider and body options
    ///
    /// # Errors
    ///
    /// Returns `AdapterError::Binding` when the visual cannot be attached.
    fn bind_visual_to_body(
        &mut self,
        visual: VisualHandle,
        body: BodyHandle,
        shape: &ColliderShape,
        options: &BodyOptions,
    ) -> Result<(), AdapterError>;

    /// Move a body without simulating the path in between
    fn teleport_body(&mut self, body: BodyHandle, position: Point3);

    /// Overwrite the linear velocity
    fn set_linear_velocity(&mut self, body: BodyHandle, velocity: Vec3);

    /// Overwrite the angular velocity
    fn set_angular_velocity(&mut self, body: BodyHandle, velocity: Vec3);

    /// Apply an instantaneous linear impulse
    fn apply_impulse(&mut self, body: BodyHandle, impulse: Vec3);

    /// Apply an instantaneous angular impulse
    fn apply_torque_impulse(&mut self, body: BodyHandle, impulse: Vec3);

    /// Wake a sleeping body
    fn wake(&mut self, body: BodyHandle);

    /// Put a body to sleep
    fn sleep(&mut self, body: BodyHandle);

    /// Include the body in the per-step simulation set
    fn add_to_simulation_set(&mut self, body: BodyHandle);

    /// Exclude the body from the per-step simulation set
    fn remove_from_simulation_set(&mut self, body: BodyHandle);

    /// Current simulated position, when the engine exposes it
    fn body_position(&self, _body: BodyHandle) -> Option<Point3> {
        None
    }

    /// Allow downcasting to the concrete adapter
    fn as_any(&self) -> &dyn Any;

    /// Allow mutable downcasting to the concrete adapter
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Scene graph / renderer boundary
pub trait RenderScene {
    /// Instantiate a fresh visual from the type's template
    ///
    /// # Errors
    ///
    /// Returns `AdapterError::TemplateClone` when the scene has no prototype for the type.
    fn clone_template(&mut self, actor_type: &ActorType) -> Result<VisualHandle, AdapterError>;

    /// Show or hide a visual
    fn set_visible(&mut self, visual: VisualHandle, visible: bool);

    /// Place a visual
    fn set_transform(&mut self, visual: VisualHandle, position: Point3, rotation: Quat, scale: f64);

    /// Attach a cosmetic text label
    fn set_label(&mut self, _visual: VisualHandle, _label: &str) {}

    /// Set the emissive intensity used for the idle glow
    fn set_intensity(&mut self, _visual: VisualHandle, _intensity: f64) {}

    /// Allow downcasting to the concrete adapter
    fn as_any(&self) -> &dyn Any;

    /// Allow mutable downcasting to the concrete adapter
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Tweening engine boundary
///
/// The animator owns per-frame interpolation and writes straight into the
/// visual named by the tween. The pool keeps the returned handle so that it
/// can cancel the animation when the entity is recycled.
pub trait Animator {
    /// Start a tween
    fn tween(&mut self, tween: Tween) -> TweenHandle;

    /// Stop a tween early; unknown or finished handles are ignored
    fn cancel(&mut self, handle: TweenHandle);

    /// Allow downcasting to the concrete adapter
    fn as_any(&self) -> &dyn Any;

    /// Allow mutable downcasting to the concrete adapter
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Pointer interaction events reported by the external hover dispatcher
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InteractionEvent {
    /// Pointer entered the actor
    Enter,
    /// Pointer left the actor
    Leave,
    /// Actor was clicked
    Click,
}

/// Hover/raycast dispatcher boundary
///
/// Registration only records which entity a visual stands for. When the
/// dispatcher later hits the visual it reports the event back through
/// `PoolManager::dispatch_interaction` with that id, and the pool resolves
/// the handler from the current entity record.
pub trait InteractionTarget {
    /// Make `visual` pickable on behalf of `entity`
    fn register_hover_target(&mut self, visual: VisualHandle, entity: EntityId);

    /// Allow downcasting to the concrete adapter
    fn as_any(&self) -> &dyn Any;

    /// Allow mutable downcasting to the concrete adapter
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Optional asynchronous source of cosmetic labels
///
/// `request` starts a lookup; answers are collected later by `poll`. A
/// missing or failing source never influences pooling.
pub trait DisplayDataSource {
    /// Start a lookup for `actor_type`
    fn request(&mut self, actor_type: &ActorType);

    /// Collect finished lookups
    fn poll(&mut self) -> Vec<(ActorType, Result<String, AdapterError>)>;

    /// Allow downcasting to the concrete adapter
    fn as_any(&self) -> &dyn Any;
}

/// The full set of collaborators a pool is wired to
pub struct SceneAdapters {
    /// Physics engine
    pub physics: Box<dyn PhysicsWorld>,
    /// Scene graph / renderer
    pub render: Box<dyn RenderScene>,
    /// Tweening engine
    pub animation: Box<dyn Animator>,
    /// Hover dispatcher
    pub interaction: Box<dyn InteractionTarget>,
    /// Label source, if any
    pub display: Option<Box<dyn DisplayDataSource>>,
}

impl SceneAdapters {
    /// Bundle the four required adapters, without a label source
    pub fn new(
        physics: Box<dyn PhysicsWorld>,
        render: Box<dyn RenderScene>,
        animation: Box<dyn Animator>,
        interaction: Box<dyn InteractionTarget>,
    ) -> Self {
        SceneAdapters {
            physics,
            render,
            animation,
            interaction,
            display: None,
        }
    }

    /// Attach a label source
    pub fn with_display(mut self, display: Box<dyn DisplayDataSource>) -> Self {
        self.display = Some(display);
        self
    }

    /// Downcast the physics adapter
    pub fn physics<T: 'static>(&self) -> Option<&T> {
        self.physics.as_any().downcast_ref::<T>()
    }

    /// Downcast the physics adapter mutably
    pub fn physics_mut<T: 'static>(&mut self) -> Option<&mut T> {
        self.physics.as_any_mut().downcast_mut::<T>()
    }

    /// Downcast the render adapter
    pub fn render<T: 'static>(&self) -> Option<&T> {
        self.render.as_any().downcast_ref::<T>()
    }

    /// Downcast the animation adapter
    pub fn animation<T: 'static>(&self) -> Option<&T> {
        self.animation.as_any().downcast_ref::<T>()
    }

    /// Downcast the interaction adapter
    pub fn interaction<T: 'static>(&self) -> Option<&T> {
        self.interaction.as_any().downcast_ref::<T>()
    }

    /// Downcast the label source, if one is attached
    pub fn display<T: 'static>(&self) -> Option<&T> {
        self.display.as_ref()?.as_any().downcast_ref::<T>()
    }
}
