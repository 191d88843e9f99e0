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
//! Scene adapters
//!
//! The pool is wired to five collaborators through narrow traits:
//!
//! - [`PhysicsWorld`]: body creation, binding, teleport, impulses, sleep
//! - [`RenderScene`]: template cloning, visibility, transforms
//! - [`Animator`]: bounded-duration tweens
//! - [`InteractionTarget`]: one-time hover registration
//! - [`DisplayDataSource`]: optional cosmetic labels
//!
//! # Implementing an adapter
//!
//! ```rust,ignore
//! use actor_pool::adapters::{RenderScene, VisualHandle};
//!
//! struct MyScene { /* scene graph */ }
//!
//! impl RenderScene for MyScene {
//!     fn clone_template(&mut self, actor_type: &ActorType) -> Result<VisualHandle, AdapterError> {
//!         // instantiate the prototype mesh/material for the type
//!     }
//!     fn set_visible(&mut self, visual: VisualHandle, visible: bool) { /* ... */ }
//!     fn set_transform(&mut self, visual: VisualHandle, at: Point3, rot: Quat, scale: f64) {
//!         /* ... */
//!     }
//!     fn as_any(&self) -> &dyn std::any::Any { self }
//!     fn as_any_mut(&mut self) -> &mut dyn std::any::Any { self }
//! }
//! ```
//!
//! The [`headless`] module provides in-memory implementations of every trait.

pub mod api;
pub mod headless;
pub mod tween;

pub use api::{
    Animator, BodyHandle, DisplayDataSource, InteractionEvent, InteractionTarget, PhysicsWorld,
    RenderScene, SceneAdapters, TweenHandle, VisualHandle,
};
pub use headless::{
    HeadlessAnimator, HeadlessInteraction, HeadlessPhysics, HeadlessScene, StaticLabels,
};
pub use tween::{Easing, Tween, TweenChannel};

impl SceneAdapters {
    /// Wire a pool to the in-memory adapters
    pub fn headless() -> Self {
        SceneAdapters::new(
            Box::new(HeadlessPhysics::new()),
            Box::new(HeadlessScene::new()),
            Box::new(HeadlessAnimator::new()),
            Box::new(HeadlessInteraction::new()),
        )
    }
}
