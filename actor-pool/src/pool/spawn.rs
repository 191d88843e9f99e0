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
//! Spawn path
//!
//! 1. Soft limit: evict the oldest active entity.
//! 2. Hard limit: synchronously recycle the oldest dying entity, or the
//!    oldest active one when nothing is dying.
//! 3. Acquire a pooled entity of the type, or create one. A visual that
//!    has to be cloned is cloned before steps 1 and 2, so a failed clone
//!    leaves the pool untouched.
//! 4. Reset transient state and append to the active queue.
//! 5. Bind or rebind the physics body and apply the impulses.
//! 6. Register hover handling, once per entity lifetime.
//! 7. Reveal the visual with the arrival animation.

use crate::adapters::{BodyHandle, PhysicsWorld, Tween, TweenChannel, VisualHandle};
use crate::entity::{ActorType, Entity, EntityId, EntityState};
use crate::error::{AdapterError, SpawnRejection};
use crate::math::{is_finite_point, Motion, Point3, Transform, Vec3};
use crate::pool::eviction::random_axes;
use crate::pool::manager::PoolManager;
use crate::templates::ActorTemplate;
use log::{error, trace, warn};

impl PoolManager {
    /// Spawn an actor of `actor_type` at `origin`
    ///
    /// `impulse`, when given, is applied to the body after placement. Returns
    /// the id of the now-active entity, or `None` when the type has no
    /// template, the origin is not finite, or the scene cannot instantiate
    /// the template. Rejections are logged and never panic.
    ///
    /// After the call `active <= soft_limit` and `active + dying <= hard_limit`.
    pub fn spawn(
        &mut self,
        actor_type: &ActorType,
        origin: Point3,
        impulse: Option<Vec3>,
    ) -> Option<EntityId> {
        match self.try_spawn(actor_type, origin, impulse) {
            Ok(id) => Some(id),
            Err(rejection) => {
                self.stats.rejected_spawns += 1;
                match rejection {
                    SpawnRejection::TemplateClone(_) => {
                        error!("Spawn of '{}' failed: {}", actor_type, rejection)
                    }
                    _ => warn!("Spawn of '{}' rejected: {}", actor_type, rejection),
                }
                None
            }
        }
    }

    fn try_spawn(
        &mut self,
        actor_type: &ActorType,
        origin: Point3,
        impulse: Option<Vec3>,
    ) -> Result<EntityId, SpawnRejection> {
        let template = self
            .templates
            .get(actor_type)
            .cloned()
            .ok_or_else(|| SpawnRejection::UnknownType(actor_type.clone()))?;
        let finite_impulse = impulse.map_or(true, |i| i.iter().all(|v| v.is_finite()));
        if !is_finite_point(&origin) || !finite_impulse {
            return Err(SpawnRejection::InvalidOrigin);
        }

        // A rejected spawn must leave the pool untouched, so a visual that
        // has to be cloned is cloned before any eviction or recycle.
        let fresh_visual = if self.will_reuse(actor_type) {
            None
        } else {
            let visual = self
                .adapters
                .render
                .clone_template(actor_type)
                .map_err(SpawnRejection::TemplateClone)?;
            Some(visual)
        };

        if self.active.len() >= self.config.soft_limit {
            self.evict_oldest();
        }
        while self.active.len() + self.dying.len() >= self.config.hard_limit {
            if self.force_recycle().is_none() {
                break;
            }
        }

        let id = self
            .acquire(actor_type, fresh_visual)
            .map_err(SpawnRejection::TemplateClone)?;
        self.reset(id, origin, &template);
        self.bind_physics(id, origin, impulse, &template);
        self.register_interaction(id);
        self.reveal(id, &template);

        self.stats.peak_active = self.stats.peak_active.max(self.active.len());
        trace!("Spawned {} '{}' at {:?}", id, actor_type, origin);
        Ok(id)
    }

    /// Whether a pooled entity of the type will be available once the limit
    /// checks have run
    fn will_reuse(&self, actor_type: &ActorType) -> bool {
        if self.type_pool.len_of(actor_type) > 0 {
            return true;
        }
        self.pending_recycles()
            .iter()
            .any(|id| self.entities[id.index()].actor_type() == actor_type)
    }

    fn acquire(
        &mut self,
        actor_type: &ActorType,
        fresh_visual: Option<VisualHandle>,
    ) -> Result<EntityId, AdapterError> {
        if fresh_visual.is_none() {
            if let Some(id) = self.type_pool.pop(actor_type) {
                self.stats.reused += 1;
                return Ok(id);
            }
        }

        let visual = match fresh_visual {
            Some(visual) => visual,
            None => self.adapters.render.clone_template(actor_type)?,
        };
        let id = EntityId::new(self.entities.len() as u64);
        self.entities.push(Entity::new(id, actor_type.clone(), visual));
        self.stats.created += 1;

        if let Some(display) = self.adapters.display.as_mut() {
            if self.labels.begin_lookup(actor_type) {
                display.request(actor_type);
            }
        }
        Ok(id)
    }

    fn reset(&mut self, id: EntityId, origin: Point3, template: &ActorTemplate) {
        let entity = &mut self.entities[id.index()];
        let pending = [entity.arrival_tween.take(), entity.hover_tween.take()];
        for handle in pending.into_iter().flatten() {
            self.adapters.animation.cancel(handle);
        }

        entity.set_state(EntityState::Active);
        entity.bump_generation();
        entity.activation_order = self.next_activation;
        self.next_activation += 1;
        entity.transform = Transform::at(origin, template.base_scale);
        entity.motion = Motion::rest();
        entity.hovered = false;
        self.active.push(id);
    }

    fn bind_physics(
        &mut self,
        id: EntityId,
        origin: Point3,
        impulse: Option<Vec3>,
        template: &ActorTemplate,
    ) {
        let entity = &mut self.entities[id.index()];
        let physics = &mut self.adapters.physics;

        match entity.body {
            Some(body) => {
                physics.wake(body);
                physics.teleport_body(body, origin);
                physics.set_linear_velocity(body, Vec3::zeros());
                physics.set_angular_velocity(body, Vec3::zeros());
            }
            None => match create_bound_body(&mut **physics, entity.visual(), origin, template) {
                Ok(body) => entity.body = Some(body),
                Err(e) => {
                    warn!("{} spawned without physics: {}", id, e);
                    self.stats.physics_degraded += 1;
                    return;
                }
            },
        }

        if let Some(body) = entity.body {
            physics.add_to_simulation_set(body);
            if let Some(impulse) = impulse {
                physics.apply_impulse(body, impulse);
            }
            let torque = random_axes(&mut self.rng, self.config.spawn_torque);
            physics.apply_torque_impulse(body, torque);
        }
    }

    fn register_interaction(&mut self, id: EntityId) {
        let entity = &mut self.entities[id.index()];
        if entity.first_activation {
            self.adapters
                .interaction
                .register_hover_target(entity.visual(), id);
            entity.first_activation = false;
        }
    }

    fn reveal(&mut self, id: EntityId, template: &ActorTemplate) {
        let entity = &mut self.entities[id.index()];
        let visual = entity.visual();
        let arrival = self.config.arrival_duration();
        let render = &mut self.adapters.render;

        let start_scale = if arrival.is_zero() { template.base_scale } else { 0.0 };
        let Transform { position, rotation, .. } = entity.transform;
        render.set_transform(visual, position, rotation, start_scale);
        render.set_visible(visual, true);
        if !arrival.is_zero() {
            entity.arrival_tween = Some(self.adapters.animation.tween(Tween {
                visual,
                channel: TweenChannel::Scale,
                from: 0.0,
                to: template.base_scale,
                duration: arrival,
                easing: self.config.arrival_easing,
            }));
        }

        if entity.label.is_none() {
            if let Some(label) = self.labels.get(entity.actor_type()) {
                self.adapters.render.set_label(visual, label);
                entity.label = Some(label.to_string());
            }
        }
    }
}

/// Create a body and attach the visual; a body that cannot be bound is put to sleep
fn create_bound_body(
    physics: &mut dyn PhysicsWorld,
    visual: VisualHandle,
    origin: Point3,
    template: &ActorTemplate,
) -> Result<BodyHandle, AdapterError> {
    let body = physics.create_body(origin)?;
    if let Err(e) = physics.bind_visual_to_body(visual, body, &template.shape, &template.body) {
        physics.sleep(body);
        return Err(e);
    }
    Ok(body)
}
