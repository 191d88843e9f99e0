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
//! In-memory adapters
//!
//! These adapters keep just enough state to observe what the pool asks of
//! its collaborators: body positions and velocities, sleep and simulation
//! membership, visual visibility and transforms, running tweens and hover
//! registrations. They back the test suite, the benchmark and the demo, and
//! are a reasonable stand-in wherever the pool runs without a real scene.
//!
//! The physics stand-in integrates with unit mass divided by the template
//! mass and no gravity; it is not a solver.

use crate::adapters::tween::{Tween, TweenChannel};
use crate::adapters::{
    Animator, BodyHandle, DisplayDataSource, InteractionTarget, PhysicsWorld, RenderScene,
    TweenHandle, VisualHandle,
};
use crate::entity::{ActorType, EntityId};
use crate::error::AdapterError;
use crate::math::{Point3, Quat, Vec3};
use crate::templates::{BodyOptions, ColliderShape};
use std::any::Any;
use std::collections::{HashMap, HashSet};
use std::time::Duration;

/// Observable state of one headless body
#[derive(Debug, Clone, PartialEq)]
pub struct BodyState {
    /// Current position
    pub position: Point3,
    /// Linear velocity
    pub linear_velocity: Vec3,
    /// Angular velocity
    pub angular_velocity: Vec3,
    /// Whether the body is asleep
    pub sleeping: bool,
    /// Whether the body is in the simulation set
    pub in_simulation: bool,
    /// Visual bound to the body
    pub visual: Option<VisualHandle>,
    /// Collider used at binding time
    pub shape: Option<ColliderShape>,
    /// Mass used to turn impulses into velocity changes
    pub mass: f64,
    /// Number of linear impulses received
    pub impulses: usize,
    /// Number of torque impulses received
    pub torque_impulses: usize,
}

/// Headless physics world
#[derive(Debug, Default)]
pub struct HeadlessPhysics {
    bodies: HashMap<BodyHandle, BodyState>,
    next_body: u64,
    fail_creation: bool,
    created: usize,
}

impl HeadlessPhysics {
    /// Create an empty world
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `create_body` call fail (or succeed again)
    pub fn set_fail_creation(&mut self, fail: bool) {
        self.fail_creation = fail;
    }

    /// Look up a body
    pub fn body(&self, body: BodyHandle) -> Option<&BodyState> {
        self.bodies.get(&body)
    }

    /// Number of bodies ever created
    pub fn created_count(&self) -> usize {
        self.created
    }

    /// Number of bodies currently in the simulation set
    pub fn simulated_count(&self) -> usize {
        self.bodies.values().filter(|b| b.in_simulation).count()
    }

    /// Advance awake, simulated bodies by `dt` at constant velocity
    pub fn step(&mut self, dt: Duration) {
        let dt = dt.as_secs_f64();
        for body in self.bodies.values_mut() {
            if body.in_simulation && !body.sleeping {
                body.position += body.linear_velocity * dt;
            }
        }
    }

    fn with_body(&mut self, body: BodyHandle, f: impl FnOnce(&mut BodyState)) {
        if let Some(state) = self.bodies.get_mut(&body) {
            f(state);
        }
    }
}

impl PhysicsWorld for HeadlessPhysics {
    fn create_body(&mut self, position: Point3) -> Result<BodyHandle, AdapterError> {
        if self.fail_creation {
            return Err(AdapterError::BodyCreation("headless world refuses new bodies".to_string()));
        }
        let handle = BodyHandle::new(self.next_body);
        self.next_body += 1;
        self.created += 1;
        self.bodies.insert(
            handle,
            BodyState {
                position,
                linear_velocity: Vec3::zeros(),
                angular_velocity: Vec3::zeros(),
                sleeping: false,
                in_simulation: false,
                visual: None,
                shape: None,
                mass: 1.0,
                impulses: 0,
                torque_impulses: 0,
            },
        );
        Ok(handle)
    }

    fn bind_visual_to_body(
        &mut self,
        visual: VisualHandle,
        body: BodyHandle,
        shape: &ColliderShape,
        options: &BodyOptions,
    ) -> Result<(), AdapterError> {
        let state = self
            .bodies
            .get_mut(&body)
            .ok_or_else(|| AdapterError::Binding(format!("unknown {}", body)))?;
        state.visual = Some(visual);
        state.shape = Some(shape.clone());
        state.mass = options.mass;
        Ok(())
    }

    fn teleport_body(&mut self, body: BodyHandle, position: Point3) {
        self.with_body(body, |b| b.position = position);
    }

    fn set_linear_velocity(&mut self, body: BodyHandle, velocity: Vec3) {
        self.with_body(body, |b| b.linear_velocity = velocity);
    }

    fn set_angular_velocity(&mut self, body: BodyHandle, velocity: Vec3) {
        self.with_body(body, |b| b.angular_velocity = velocity);
    }

    fn apply_impulse(&mut self, body: BodyHandle, impulse: Vec3) {
        self.with_body(body, |b| {
            b.linear_velocity += impulse / b.mass;
            b.impulses += 1;
        });
    }

    fn apply_torque_impulse(&mut self, body: BodyHandle, impulse: Vec3) {
        self.with_body(body, |b| {
            b.angular_velocity += impulse / b.mass;
            b.torque_impulses += 1;
        });
    }

    fn wake(&mut self, body: BodyHandle) {
        self.with_body(body, |b| b.sleeping = false);
    }

    fn sleep(&mut self, body: BodyHandle) {
        self.with_body(body, |b| b.sleeping = true);
    }

    fn add_to_simulation_set(&mut self, body: BodyHandle) {
        self.with_body(body, |b| b.in_simulation = true);
    }

    fn remove_from_simulation_set(&mut self, body: BodyHandle) {
        self.with_body(body, |b| b.in_simulation = false);
    }

    fn body_position(&self, body: BodyHandle) -> Option<Point3> {
        self.bodies.get(&body).map(|b| b.position)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Observable state of one headless visual
#[derive(Debug, Clone, PartialEq)]
pub struct VisualState {
    /// Type the visual was cloned from
    pub actor_type: ActorType,
    /// Visibility flag
    pub visible: bool,
    /// Last position set
    pub position: Point3,
    /// Last rotation set
    pub rotation: Quat,
    /// Last scale set, by transform or by a tween
    pub scale: f64,
    /// Label, if one was attached
    pub label: Option<String>,
    /// Last emissive intensity set
    pub intensity: f64,
}

/// Headless scene graph
#[derive(Debug, Default)]
pub struct HeadlessScene {
    visuals: HashMap<VisualHandle, VisualState>,
    prototypes: Option<HashSet<ActorType>>,
    next_visual: u64,
}

impl HeadlessScene {
    /// A scene that can clone any type
    pub fn new() -> Self {
        Self::default()
    }

    /// A scene that only knows prototypes for the given types
    pub fn with_prototypes<I, T>(types: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<ActorType>,
    {
        HeadlessScene {
            prototypes: Some(types.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    /// Look up a visual
    pub fn visual(&self, visual: VisualHandle) -> Option<&VisualState> {
        self.visuals.get(&visual)
    }

    /// Number of template clones performed
    pub fn clone_count(&self) -> usize {
        self.visuals.len()
    }

    /// Number of currently visible visuals
    pub fn visible_count(&self) -> usize {
        self.visuals.values().filter(|v| v.visible).count()
    }

    /// Write an animated value into a visual
    pub fn apply_channel(&mut self, visual: VisualHandle, channel: TweenChannel, value: f64) {
        if let Some(state) = self.visuals.get_mut(&visual) {
            match channel {
                TweenChannel::Scale => state.scale = value,
                TweenChannel::Intensity => state.intensity = value,
            }
        }
    }
}

impl RenderScene for HeadlessScene {
    fn clone_template(&mut self, actor_type: &ActorType) -> Result<VisualHandle, AdapterError> {
        if let Some(prototypes) = &self.prototypes {
            if !prototypes.contains(actor_type) {
                return Err(AdapterError::TemplateClone(actor_type.clone()));
            }
        }
        let handle = VisualHandle::new(self.next_visual);
        self.next_visual += 1;
        self.visuals.insert(
            handle,
            VisualState {
                actor_type: actor_type.clone(),
                visible: false,
                position: Point3::origin(),
                rotation: Quat::identity(),
                scale: 1.0,
                label: None,
                intensity: 1.0,
            },
        );
        Ok(handle)
    }

    fn set_visible(&mut self, visual: VisualHandle, visible: bool) {
        if let Some(state) = self.visuals.get_mut(&visual) {
            state.visible = visible;
        }
    }

    fn set_transform(
        &mut self,
        visual: VisualHandle,
        position: Point3,
        rotation: Quat,
        scale: f64,
    ) {
        if let Some(state) = self.visuals.get_mut(&visual) {
            state.position = position;
            state.rotation = rotation;
            state.scale = scale;
        }
    }

    fn set_label(&mut self, visual: VisualHandle, label: &str) {
        if let Some(state) = self.visuals.get_mut(&visual) {
            state.label = Some(label.to_string());
        }
    }

    fn set_intensity(&mut self, visual: VisualHandle, intensity: f64) {
        if let Some(state) = self.visuals.get_mut(&visual) {
            state.intensity = intensity;
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Headless tweening engine
///
/// Tweens advance only when `advance` is called; sampled values are returned
/// so the caller can write them into a scene.
#[derive(Debug, Default)]
pub struct HeadlessAnimator {
    running: HashMap<TweenHandle, (Tween, Duration)>,
    next_tween: u64,
    started: usize,
    cancelled: usize,
    completed: usize,
}

impl HeadlessAnimator {
    /// Create an idle animator
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a tween is still running
    pub fn is_running(&self, handle: TweenHandle) -> bool {
        self.running.contains_key(&handle)
    }

    /// The request behind a running tween
    pub fn tween(&self, handle: TweenHandle) -> Option<&Tween> {
        self.running.get(&handle).map(|(t, _)| t)
    }

    /// Number of running tweens
    pub fn running_count(&self) -> usize {
        self.running.len()
    }

    /// Tweens started so far
    pub fn started_count(&self) -> usize {
        self.started
    }

    /// Tweens cancelled before completing
    pub fn cancelled_count(&self) -> usize {
        self.cancelled
    }

    /// Tweens that ran to completion
    pub fn completed_count(&self) -> usize {
        self.completed
    }

    /// Advance every running tween by `dt` and return the sampled values
    ///
    /// Finished tweens report their end value once and are dropped.
    pub fn advance(&mut self, dt: Duration) -> Vec<(VisualHandle, TweenChannel, f64)> {
        let mut samples = Vec::with_capacity(self.running.len());
        let mut finished = Vec::new();
        for (handle, (tween, elapsed)) in self.running.iter_mut() {
            *elapsed += dt;
            samples.push((tween.visual, tween.channel, tween.sample(*elapsed)));
            if *elapsed >= tween.duration {
                finished.push(*handle);
            }
        }
        for handle in finished {
            self.running.remove(&handle);
            self.completed += 1;
        }
        samples
    }
}

impl Animator for HeadlessAnimator {
    fn tween(&mut self, tween: Tween) -> TweenHandle {
        let handle = TweenHandle::new(self.next_tween);
        self.next_tween += 1;
        self.started += 1;
        self.running.insert(handle, (tween, Duration::ZERO));
        handle
    }

    fn cancel(&mut self, handle: TweenHandle) {
        if self.running.remove(&handle).is_some() {
            self.cancelled += 1;
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Headless hover registry
///
/// Stands in for the raycast dispatcher: it remembers which entity each
/// registered visual belongs to so a caller can route picks back to the pool.
#[derive(Debug, Default)]
pub struct HeadlessInteraction {
    targets: HashMap<VisualHandle, EntityId>,
    registrations: HashMap<EntityId, usize>,
}

impl HeadlessInteraction {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Entity registered for a visual
    pub fn target_of(&self, visual: VisualHandle) -> Option<EntityId> {
        self.targets.get(&visual).copied()
    }

    /// How many times an entity was registered
    pub fn registration_count(&self, entity: EntityId) -> usize {
        self.registrations.get(&entity).copied().unwrap_or(0)
    }

    /// Total registrations across all entities
    pub fn total_registrations(&self) -> usize {
        self.registrations.values().sum()
    }
}

impl InteractionTarget for HeadlessInteraction {
    fn register_hover_target(&mut self, visual: VisualHandle, entity: EntityId) {
        self.targets.insert(visual, entity);
        *self.registrations.entry(entity).or_insert(0) += 1;
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Label source answering from a fixed table
///
/// Requests are answered on the next `poll`. Types missing from the table
/// fail with `AdapterError::Lookup`.
#[derive(Debug, Default)]
pub struct StaticLabels {
    table: HashMap<ActorType, String>,
    pending: Vec<ActorType>,
    requests: usize,
}

impl StaticLabels {
    /// Create a source with an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an answer for a type
    pub fn with_label(
        mut self,
        actor_type: impl Into<ActorType>,
        label: impl Into<String>,
    ) -> Self {
        self.table.insert(actor_type.into(), label.into());
        self
    }

    /// Number of lookups started
    pub fn request_count(&self) -> usize {
        self.requests
    }
}

impl DisplayDataSource for StaticLabels {
    fn request(&mut self, actor_type: &ActorType) {
        self.requests += 1;
        self.pending.push(actor_type.clone());
    }

    fn poll(&mut self) -> Vec<(ActorType, Result<String, AdapterError>)> {
        self.pending
            .drain(..)
            .map(|t| {
                let answer = self
                    .table
                    .get(&t)
                    .cloned()
                    .ok_or_else(|| AdapterError::Lookup(format!("no label for '{}'", t)));
                (t, answer)
            })
            .collect()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
