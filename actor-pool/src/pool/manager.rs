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
//! Pool manager
//!
//! The single owner of every pooled entity and of the collections that
//! partition them. One instance per scene; nothing is global.
//!
//! # State machine
//!
//! ```text
//!            spawn               softEvict
//!  Pooled ----------> Active -------------> Dying
//!    ^                  |                     |
//!    |  forcedRecycle   |                     |  flightComplete
//!    +------------------+---------------------+  or forcedRecycle
//! ```
//!
//! # Generations
//!
//! Every reset and every forced recycle bumps the entity's generation. A
//! flight task only cleans up an entity whose generation still matches the
//! one captured at eviction and which is still `Dying`; anything else is a
//! stale task and is dropped.

use crate::adapters::{InteractionEvent, SceneAdapters, Tween, TweenChannel};
use crate::config::PoolConfig;
use crate::entity::{ActorType, Entity, EntityId, EntityState};
use crate::error::{ConfigError, InvariantViolation};
use crate::math::{Motion, Vec3};
use crate::pool::collections::{ActiveQueue, DyingSet, TypePool};
use crate::pool::eviction::EvictionPolicy;
use crate::pool::labels::LabelCache;
use crate::pool::stats::{PoolCounts, PoolStats};
use crate::scheduler::{DelayedTask, DelayedTaskQueue};
use crate::templates::{ActorTemplate, TemplateRegistry};
use log::{debug, trace};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::VecDeque;
use std::f64::consts::TAU;
use std::time::Duration;

/// Bounded pool of decorative actors
///
/// # Examples
///
/// ```
/// use actor_pool::{PoolConfig, PoolManager, SceneAdapters};
/// use actor_pool::math::Point3;
/// use actor_pool::templates::{ActorTemplate, ColliderShape};
///
/// let config = PoolConfig::new(2, 4)
///     .with_seed(1)
///     .with_template("coin", ActorTemplate::new(ColliderShape::Sphere { radius: 0.3 }));
/// let mut pool = PoolManager::new(config, SceneAdapters::headless()).unwrap();
///
/// for _ in 0..3 {
///     pool.spawn(&"coin".into(), Point3::origin(), None);
/// }
/// let counts = pool.counts();
/// assert_eq!((counts.active, counts.dying), (2, 1));
/// ```
pub struct PoolManager {
    pub(crate) config: PoolConfig,
    pub(crate) templates: TemplateRegistry,
    pub(crate) adapters: SceneAdapters,
    pub(crate) entities: Vec<Entity>,
    pub(crate) type_pool: TypePool,
    pub(crate) active: ActiveQueue,
    pub(crate) dying: DyingSet,
    pub(crate) tasks: DelayedTaskQueue,
    pub(crate) policy: EvictionPolicy,
    pub(crate) labels: LabelCache,
    pub(crate) rng: StdRng,
    pub(crate) next_activation: u64,
    pub(crate) now: Duration,
    pub(crate) stats: PoolStats,
}

impl PoolManager {
    /// Build a pool from a config and the adapters it drives
    ///
    /// Templates listed in the config are registered immediately.
    ///
    /// # Errors
    ///
    /// Returns the first validation error of the config or its templates.
    pub fn new(config: PoolConfig, adapters: SceneAdapters) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut templates = TemplateRegistry::new();
        for (actor_type, template) in &config.templates {
            templates.register(actor_type.clone(), template.clone())?;
        }

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        debug!(
            "Actor pool ready: soft_limit={}, hard_limit={}, flight={:?}, {} template(s)",
            config.soft_limit,
            config.hard_limit,
            config.flight_duration(),
            templates.len()
        );

        Ok(PoolManager {
            policy: EvictionPolicy::from_config(&config),
            config,
            templates,
            adapters,
            entities: Vec::new(),
            type_pool: TypePool::new(),
            active: ActiveQueue::new(),
            dying: DyingSet::new(),
            tasks: DelayedTaskQueue::new(),
            labels: LabelCache::new(),
            rng,
            next_activation: 0,
            now: Duration::ZERO,
            stats: PoolStats::default(),
        })
    }

    /// Register a template after construction
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::DuplicateTemplate` or `ConfigError::InvalidTemplate`.
    pub fn register_template(
        &mut self,
        actor_type: impl Into<ActorType>,
        template: ActorTemplate,
    ) -> Result<(), ConfigError> {
        self.templates.register(actor_type.into(), template)
    }

    /// Advance the pool clock to `now`
    ///
    /// Runs every flight task that is due, advances the idle oscillation of
    /// active actors and collects finished label lookups. A clock that goes
    /// backwards is ignored.
    pub fn tick(&mut self, now: Duration) {
        if now < self.now {
            debug!("Ignoring clock rewind from {:?} to {:?}", self.now, now);
            return;
        }
        let dt = now - self.now;
        self.now = now;

        for task in self.tasks.drain_due(now) {
            self.complete_flight(task);
        }

        self.advance_oscillation(dt);
        self.poll_labels();
    }

    /// Route a hover/click report from the external dispatcher
    ///
    /// Returns `false` when the id is unknown or the entity is not active
    /// anymore; such reports are ignored.
    pub fn dispatch_interaction(&mut self, id: EntityId, event: InteractionEvent) -> bool {
        let Some(entity) = self.entities.get_mut(id.index()) else {
            return false;
        };
        if entity.state != EntityState::Active {
            trace!("Ignoring {:?} for {} in state {}", event, id, entity.state);
            return false;
        }
        let Some(template) = self.templates.get(entity.actor_type()) else {
            return false;
        };

        match event {
            InteractionEvent::Enter | InteractionEvent::Leave => {
                let entering = event == InteractionEvent::Enter;
                if entity.hovered == entering {
                    return true;
                }
                entity.hovered = entering;
                if let Some(handle) = entity.hover_tween.take() {
                    self.adapters.animation.cancel(handle);
                }
                let (from, to) = if entering {
                    (template.base_scale, template.hover_scale)
                } else {
                    (template.hover_scale, template.base_scale)
                };
                entity.hover_tween = Some(self.adapters.animation.tween(Tween {
                    visual: entity.visual(),
                    channel: TweenChannel::Scale,
                    from,
                    to,
                    duration: self.config.hover_duration(),
                    easing: self.config.hover_easing,
                }));
            }
            InteractionEvent::Click => {
                if let Some(body) = entity.body {
                    self.adapters.physics.wake(body);
                    self.adapters
                        .physics
                        .apply_impulse(body, Vec3::y() * self.config.click_impulse);
                }
            }
        }
        true
    }

    /// Move the oldest active entity to `Dying`
    ///
    /// Applies the exit impulse and spin and schedules the flight task.
    pub(crate) fn evict_oldest(&mut self) {
        let Some(id) = self.policy.select_victim(&self.active) else {
            return;
        };
        self.active.pop_oldest();

        let entity = &mut self.entities[id.index()];
        entity.set_state(EntityState::Dying);
        entity.hovered = false;
        self.dying.insert(id);

        if let Some(body) = entity.body {
            let from = self
                .adapters
                .physics
                .body_position(body)
                .unwrap_or(entity.transform.position);
            let impulse = self.policy.exit_impulse(from);
            let spin = self.policy.spin_impulse(&mut self.rng);
            self.adapters.physics.apply_impulse(body, impulse);
            self.adapters.physics.apply_torque_impulse(body, spin);
        }

        let fire_at = self.now + self.policy.flight_duration();
        self.tasks.schedule(fire_at, id, entity.generation);
        self.stats.soft_evictions += 1;
        self.stats.peak_dying = self.stats.peak_dying.max(self.dying.len());
        debug!("Evicted {} (gen {}), cleanup at {:?}", id, entity.generation, fire_at);
    }

    /// Recycle one entity synchronously to relieve hard-limit pressure
    ///
    /// Prefers the oldest dying entity and falls back to the oldest active one.
    pub(crate) fn force_recycle(&mut self) -> Option<EntityId> {
        let id = if let Some(id) = self.dying.pop_oldest() {
            self.stats.forced_dying_recycles += 1;
            id
        } else {
            let id = self.active.pop_oldest()?;
            self.stats.forced_active_recycles += 1;
            id
        };
        // Invalidates any flight task still queued for this entity.
        self.entities[id.index()].bump_generation();
        self.cleanup(id);
        debug!("Force-recycled {}", id);
        Some(id)
    }

    /// Entities the limit checks of the next spawn would recycle, in order
    ///
    /// Mirrors the soft eviction in `evict_oldest` followed by repeated
    /// `force_recycle` calls, without touching any state.
    pub(crate) fn pending_recycles(&self) -> Vec<EntityId> {
        let mut active: VecDeque<EntityId> = self.active.iter().collect();
        let mut dying: VecDeque<EntityId> = self.dying.iter().collect();
        if active.len() >= self.config.soft_limit {
            if let Some(id) = active.pop_front() {
                dying.push_back(id);
            }
        }

        let mut victims = Vec::new();
        while active.len() + dying.len() >= self.config.hard_limit {
            match dying.pop_front().or_else(|| active.pop_front()) {
                Some(id) => victims.push(id),
                None => break,
            }
        }
        victims
    }

    fn complete_flight(&mut self, task: DelayedTask) {
        let Some(entity) = self.entities.get(task.entity.index()) else {
            self.stats.stale_tasks += 1;
            return;
        };
        if entity.generation != task.generation || entity.state != EntityState::Dying {
            trace!(
                "Dropping stale flight task for {} (task gen {}, entity gen {}, state {})",
                task.entity,
                task.generation,
                entity.generation,
                entity.state
            );
            self.stats.stale_tasks += 1;
            return;
        }
        self.dying.remove(task.entity);
        self.cleanup(task.entity);
        self.stats.flights_completed += 1;
    }

    /// Hide, park and pool an entity that has already left Active/Dying
    fn cleanup(&mut self, id: EntityId) {
        let parking = self.config.parking();
        let entity = &mut self.entities[id.index()];

        self.adapters.render.set_visible(entity.visual(), false);
        if let Some(body) = entity.body {
            let physics = &mut self.adapters.physics;
            physics.remove_from_simulation_set(body);
            physics.teleport_body(body, parking);
            physics.set_linear_velocity(body, Vec3::zeros());
            physics.set_angular_velocity(body, Vec3::zeros());
            physics.sleep(body);
        }
        let pending = [entity.arrival_tween.take(), entity.hover_tween.take()];
        for handle in pending.into_iter().flatten() {
            self.adapters.animation.cancel(handle);
        }
        entity.hovered = false;
        entity.motion = Motion::rest();
        entity.set_state(EntityState::Pooled);
        self.type_pool.push(entity.actor_type(), id);
    }

    fn advance_oscillation(&mut self, dt: Duration) {
        if dt.is_zero() {
            return;
        }
        let step = dt.as_secs_f64() * self.config.oscillation_rate;
        for id in self.active.iter() {
            let entity = &mut self.entities[id.index()];
            entity.motion.oscillation_phase = (entity.motion.oscillation_phase + step) % TAU;
            self.adapters
                .render
                .set_intensity(entity.visual(), entity.motion.intensity());
        }
    }

    fn poll_labels(&mut self) {
        let answers = match self.adapters.display.as_mut() {
            Some(display) => display.poll(),
            None => return,
        };
        for (actor_type, answer) in answers {
            match answer {
                Ok(label) => {
                    let matching = self
                        .entities
                        .iter_mut()
                        .filter(|e| e.actor_type() == &actor_type);
                    for entity in matching {
                        self.adapters.render.set_label(entity.visual(), &label);
                        entity.label = Some(label.clone());
                    }
                    self.labels.resolve(actor_type, label);
                }
                Err(e) => {
                    debug!("No label for '{}': {}", actor_type, e);
                    self.labels.fail(actor_type);
                }
            }
        }
    }

    /// Entity record by id
    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id.index())
    }

    /// Every entity ever created, in id order
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    /// Current collection sizes
    pub fn counts(&self) -> PoolCounts {
        PoolCounts {
            active: self.active.len(),
            dying: self.dying.len(),
            pooled: self.type_pool.total(),
        }
    }

    /// Counters since construction
    pub fn stats(&self) -> &PoolStats {
        &self.stats
    }

    /// Pool clock
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Configuration in effect
    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Registered templates
    pub fn templates(&self) -> &TemplateRegistry {
        &self.templates
    }

    /// Active ids, oldest first
    pub fn active_ids(&self) -> Vec<EntityId> {
        self.active.iter().collect()
    }

    /// Dying ids, earliest eviction first
    pub fn dying_ids(&self) -> Vec<EntityId> {
        self.dying.iter().collect()
    }

    /// Pooled ids of one type
    pub fn pooled_ids(&self, actor_type: &ActorType) -> &[EntityId] {
        self.type_pool.ids(actor_type)
    }

    /// Flight tasks still queued, stale ones included
    pub fn pending_tasks(&self) -> usize {
        self.tasks.len()
    }

    /// Fire time of the next queued flight task
    pub fn next_task_due(&self) -> Option<Duration> {
        self.tasks.next_due()
    }

    /// The adapters this pool drives
    pub fn adapters(&self) -> &SceneAdapters {
        &self.adapters
    }

    /// Mutable access to the adapters, e.g. to step a headless world
    pub fn adapters_mut(&mut self) -> &mut SceneAdapters {
        &mut self.adapters
    }

    /// Check the partition, state and limit invariants
    ///
    /// # Errors
    ///
    /// Returns the first violation found.
    pub fn verify_invariants(&self) -> Result<(), InvariantViolation> {
        let mut membership = vec![0usize; self.entities.len()];
        let mut check = |id: EntityId, collection: &'static str, expected: EntityState| {
            membership[id.index()] += 1;
            let entity = &self.entities[id.index()];
            if entity.state != expected {
                return Err(InvariantViolation::StateMismatch {
                    id,
                    collection,
                    state: entity.state.to_string(),
                });
            }
            Ok(())
        };

        for id in self.active.iter() {
            check(id, "active", EntityState::Active)?;
        }
        for id in self.dying.iter() {
            check(id, "dying", EntityState::Dying)?;
        }
        for (_, id) in self.type_pool.iter() {
            check(id, "pooled", EntityState::Pooled)?;
        }

        if let Some((index, count)) = membership.iter().enumerate().find(|(_, c)| **c != 1) {
            return Err(InvariantViolation::Partition {
                id: EntityId::new(index as u64),
                count: *count,
            });
        }

        let (active, dying) = (self.active.len(), self.dying.len());
        if active + dying > self.config.hard_limit {
            return Err(InvariantViolation::HardLimit {
                active,
                dying,
                hard: self.config.hard_limit,
            });
        }

        let mut last_order = None;
        for id in self.active.iter() {
            let order = self.entities[id.index()].activation_order;
            if last_order.map_or(false, |last| order <= last) {
                return Err(InvariantViolation::ActiveOrder(id));
            }
            last_order = Some(order);
        }
        Ok(())
    }
}
