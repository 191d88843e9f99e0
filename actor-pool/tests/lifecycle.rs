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
//! Entity lifecycle tests
//!
//! Reuse, adapter side effects, degraded physics, labels and interaction
//! dispatch, observed through the headless adapters.

use actor_pool::adapters::{
    Easing, HeadlessAnimator, HeadlessInteraction, HeadlessPhysics, HeadlessScene, StaticLabels,
};
use actor_pool::math::{Point3, Vec3};
use actor_pool::templates::{ActorTemplate, ColliderShape};
use actor_pool::{ActorType, EntityState, InteractionEvent, PoolConfig, PoolManager, SceneAdapters};
use approx::assert_relative_eq;
use std::time::Duration;

const FLIGHT: Duration = Duration::from_millis(1000);

fn config() -> PoolConfig {
    let _ = env_logger::builder().is_test(true).try_init();
    PoolConfig::new(2, 4)
        .with_seed(3)
        .with_flight_duration(FLIGHT)
        .with_template(
            "coin",
            ActorTemplate::new(ColliderShape::Sphere { radius: 0.5 }).with_scales(1.0, 1.5),
        )
        .with_template(
            "gem",
            ActorTemplate::new(ColliderShape::Cuboid {
                half_extents: [0.2, 0.3, 0.2],
            }),
        )
}

fn headless_pool() -> PoolManager {
    PoolManager::new(config(), SceneAdapters::headless()).unwrap()
}

fn coin() -> ActorType {
    ActorType::new("coin")
}

/// Spawn three coins and let the first one finish its flight
fn pool_with_recycled_coin() -> (PoolManager, actor_pool::EntityId) {
    let mut pool = headless_pool();
    let first = pool.spawn(&coin(), Point3::new(1.0, 1.0, 0.0), None).unwrap();
    pool.spawn(&coin(), Point3::origin(), None).unwrap();
    pool.spawn(&coin(), Point3::origin(), None).unwrap();
    pool.tick(FLIGHT);
    assert_eq!(pool.entity(first).unwrap().state(), EntityState::Pooled);
    (pool, first)
}

#[test]
fn test_cleanup_hides_and_parks() {
    let (pool, first) = pool_with_recycled_coin();
    let entity = pool.entity(first).unwrap();
    let body = entity.body().unwrap();

    let physics = pool.adapters().physics::<HeadlessPhysics>().unwrap();
    let state = physics.body(body).unwrap();
    assert!(state.sleeping);
    assert!(!state.in_simulation);
    assert_eq!(state.position, pool.config().parking());
    assert_eq!(state.linear_velocity, Vec3::zeros());

    let scene = pool.adapters().render::<HeadlessScene>().unwrap();
    assert!(!scene.visual(entity.visual()).unwrap().visible);
    assert!(entity.arrival_tween().is_none());
}

#[test]
fn test_reuse_keeps_body_and_visual() {
    let (mut pool, first) = pool_with_recycled_coin();
    let (body, visual) = {
        let entity = pool.entity(first).unwrap();
        (entity.body().unwrap(), entity.visual())
    };

    let again = pool.spawn(&coin(), Point3::new(0.0, 3.0, 0.0), None).unwrap();
    assert_eq!(again, first);
    let entity = pool.entity(again).unwrap();
    assert_eq!(entity.body(), Some(body));
    assert_eq!(entity.visual(), visual);
    assert!(!entity.is_first_activation());
    assert!(!entity.is_hovered());
    assert_eq!(entity.transform().position, Point3::new(0.0, 3.0, 0.0));

    let physics = pool.adapters().physics::<HeadlessPhysics>().unwrap();
    let state = physics.body(body).unwrap();
    assert!(!state.sleeping);
    assert!(state.in_simulation);
    assert_eq!(state.position, Point3::new(0.0, 3.0, 0.0));
    assert_eq!(physics.created_count(), 3);
    assert_eq!(pool.adapters().render::<HeadlessScene>().unwrap().clone_count(), 3);
}

#[test]
fn test_reuse_is_idempotent() {
    let (mut pool, first) = pool_with_recycled_coin();
    let mut now = FLIGHT;
    for _ in 0..5 {
        pool.spawn(&coin(), Point3::origin(), None).unwrap();
        pool.spawn(&coin(), Point3::origin(), None).unwrap();
        now += FLIGHT;
        pool.tick(now);
        assert!(pool.verify_invariants().is_ok());
    }

    let physics = pool.adapters().physics::<HeadlessPhysics>().unwrap();
    assert_eq!(physics.created_count(), 4);
    assert_eq!(physics.simulated_count(), pool.counts().active);
    assert!(pool.entity(first).unwrap().generation() > 1);
    assert_eq!(pool.stats().created, 4);
}

#[test]
fn test_interaction_registered_once() {
    let (mut pool, first) = pool_with_recycled_coin();
    pool.spawn(&coin(), Point3::origin(), None).unwrap();

    let interaction = pool.adapters().interaction::<HeadlessInteraction>().unwrap();
    assert_eq!(interaction.registration_count(first), 1);
    assert_eq!(interaction.total_registrations(), 3);
    let visual = pool.entity(first).unwrap().visual();
    assert_eq!(interaction.target_of(visual), Some(first));
}

#[test]
fn test_degraded_physics_spawn() {
    let mut pool = headless_pool();
    pool.adapters_mut()
        .physics_mut::<HeadlessPhysics>()
        .unwrap()
        .set_fail_creation(true);

    let id = pool.spawn(&coin(), Point3::origin(), Some(Vec3::y())).unwrap();
    let entity = pool.entity(id).unwrap();
    assert_eq!(entity.state(), EntityState::Active);
    assert_eq!(entity.body(), None);
    assert_eq!(pool.stats().physics_degraded, 1);

    let scene = pool.adapters().render::<HeadlessScene>().unwrap();
    assert!(scene.visual(entity.visual()).unwrap().visible);

    // Body-less entities still cycle through the pool and retry creation on
    // their next activation.
    pool.spawn(&coin(), Point3::origin(), None).unwrap();
    pool.spawn(&coin(), Point3::origin(), None).unwrap();
    pool.tick(FLIGHT);
    assert_eq!(pool.entity(id).unwrap().state(), EntityState::Pooled);

    pool.adapters_mut()
        .physics_mut::<HeadlessPhysics>()
        .unwrap()
        .set_fail_creation(false);
    let again = pool.spawn(&coin(), Point3::origin(), None).unwrap();
    assert_eq!(again, id);
    assert!(pool.entity(again).unwrap().body().is_some());
}

#[test]
fn test_types_are_pooled_separately() {
    let mut pool = headless_pool();
    let gem = ActorType::new("gem");
    let first = pool.spawn(&gem, Point3::origin(), None).unwrap();
    pool.spawn(&coin(), Point3::origin(), None).unwrap();
    pool.spawn(&coin(), Point3::origin(), None).unwrap();
    pool.tick(FLIGHT);
    assert_eq!(pool.pooled_ids(&gem), &[first]);
    assert!(pool.pooled_ids(&coin()).is_empty());

    let next_coin = pool.spawn(&coin(), Point3::origin(), None).unwrap();
    assert_ne!(next_coin, first);
    assert_eq!(pool.pooled_ids(&gem), &[first]);
}

#[test]
fn test_labels_requested_once_per_type() {
    let adapters = SceneAdapters::headless()
        .with_display(Box::new(StaticLabels::new().with_label("coin", "Gold Coin")));
    let mut pool = PoolManager::new(config(), adapters).unwrap();
    let gem = ActorType::new("gem");

    let a = pool.spawn(&coin(), Point3::origin(), None).unwrap();
    let g = pool.spawn(&gem, Point3::origin(), None).unwrap();
    assert_eq!(pool.entity(a).unwrap().label(), None);

    pool.tick(Duration::from_millis(16));
    assert_eq!(pool.entity(a).unwrap().label(), Some("Gold Coin"));
    assert_eq!(pool.entity(g).unwrap().label(), None);

    let b = pool.spawn(&coin(), Point3::origin(), None).unwrap();
    assert_eq!(pool.entity(b).unwrap().label(), Some("Gold Coin"));
    pool.spawn(&gem, Point3::origin(), None).unwrap();

    let labels = pool.adapters().display::<StaticLabels>().unwrap();
    assert_eq!(labels.request_count(), 2);
    let scene = pool.adapters().render::<HeadlessScene>().unwrap();
    let visual = scene.visual(pool.entity(b).unwrap().visual()).unwrap();
    assert_eq!(visual.label.as_deref(), Some("Gold Coin"));
}

#[test]
fn test_arrival_tween_cancelled_on_recycle() {
    let mut pool = headless_pool();
    let first = pool.spawn(&coin(), Point3::origin(), None).unwrap();
    let tween = pool.entity(first).unwrap().arrival_tween().unwrap();
    pool.spawn(&coin(), Point3::origin(), None).unwrap();
    pool.spawn(&coin(), Point3::origin(), None).unwrap();
    pool.tick(FLIGHT);

    let animator = pool.adapters().animation::<HeadlessAnimator>().unwrap();
    assert!(!animator.is_running(tween));
    assert!(animator.cancelled_count() >= 1);
}

#[test]
fn test_hover_scales_toward_hover_scale() {
    let mut pool = headless_pool();
    let id = pool.spawn(&coin(), Point3::origin(), None).unwrap();

    assert!(pool.dispatch_interaction(id, InteractionEvent::Enter));
    assert!(pool.entity(id).unwrap().is_hovered());
    let handle = pool.entity(id).unwrap().hover_tween().unwrap();
    let animator = pool.adapters().animation::<HeadlessAnimator>().unwrap();
    let hover = animator.tween(handle).unwrap();
    assert_eq!(hover.from, 1.0);
    assert_eq!(hover.to, 1.5);

    assert!(pool.dispatch_interaction(id, InteractionEvent::Leave));
    assert!(!pool.entity(id).unwrap().is_hovered());
    let animator = pool.adapters().animation::<HeadlessAnimator>().unwrap();
    assert!(!animator.is_running(handle));
    let back = pool.entity(id).unwrap().hover_tween().unwrap();
    assert_eq!(animator.tween(back).unwrap().to, 1.0);
}

#[test]
fn test_hover_uses_its_own_easing() {
    let mut config = config();
    config.arrival_easing = Easing::BackOut;
    config.hover_easing = Easing::Linear;
    let mut pool = PoolManager::new(config, SceneAdapters::headless()).unwrap();
    let id = pool.spawn(&coin(), Point3::origin(), None).unwrap();

    assert!(pool.dispatch_interaction(id, InteractionEvent::Enter));
    let handle = pool.entity(id).unwrap().hover_tween().unwrap();
    let animator = pool.adapters().animation::<HeadlessAnimator>().unwrap();
    let hover = animator.tween(handle).unwrap();
    assert_eq!(hover.easing, Easing::Linear);
    assert_eq!(hover.duration, pool.config().hover_duration());
}

#[test]
fn test_click_applies_upward_impulse() {
    let mut pool = headless_pool();
    let id = pool.spawn(&coin(), Point3::origin(), None).unwrap();
    let body = pool.entity(id).unwrap().body().unwrap();

    assert!(pool.dispatch_interaction(id, InteractionEvent::Click));
    let physics = pool.adapters().physics::<HeadlessPhysics>().unwrap();
    let state = physics.body(body).unwrap();
    assert_eq!(state.impulses, 1);
    assert_relative_eq!(state.linear_velocity.y, pool.config().click_impulse);
}

#[test]
fn test_interaction_on_inactive_entity_ignored() {
    let mut pool = headless_pool();
    let first = pool.spawn(&coin(), Point3::origin(), None).unwrap();
    pool.spawn(&coin(), Point3::origin(), None).unwrap();
    pool.spawn(&coin(), Point3::origin(), None).unwrap();
    assert_eq!(pool.entity(first).unwrap().state(), EntityState::Dying);

    assert!(!pool.dispatch_interaction(first, InteractionEvent::Enter));
    assert!(!pool.entity(first).unwrap().is_hovered());
    assert!(!pool.dispatch_interaction(actor_pool::EntityId::new(99), InteractionEvent::Click));
}

#[test]
fn test_eviction_throws_toward_sink() {
    let mut pool = headless_pool();
    let first = pool.spawn(&coin(), Point3::new(0.0, 5.0, 0.0), None).unwrap();
    let body = pool.entity(first).unwrap().body().unwrap();
    pool.spawn(&coin(), Point3::origin(), None).unwrap();
    pool.spawn(&coin(), Point3::origin(), None).unwrap();

    let physics = pool.adapters().physics::<HeadlessPhysics>().unwrap();
    let state = physics.body(body).unwrap();
    let to_sink = pool.config().sink() - Point3::new(0.0, 5.0, 0.0);
    assert!(state.linear_velocity.dot(&to_sink) > 0.0);
    assert_eq!(state.torque_impulses, 2);
}
