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
//! Background stepping tests
//!
//! These tests sleep for short wall-clock periods, so they assert on
//! direction of motion rather than exact positions.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tower_physics::{EngineConfig, EngineError, PhysicsEngine, RigidBody, SteppingMode, Vector2};

fn background_engine() -> PhysicsEngine {
    PhysicsEngine::new(
        EngineConfig::default()
            .with_stepping_mode(SteppingMode::Background)
            .with_tick(Duration::from_millis(2), 0.05),
    )
}

#[test]
fn test_background_thread_advances_bodies() {
    let engine = background_engine();
    let block = engine.create_body(RigidBody::default()).unwrap();

    engine.start().unwrap();
    assert!(engine.is_running());
    thread::sleep(Duration::from_millis(100));
    engine.stop();
    assert!(!engine.is_running());

    let stopped_at = engine.body(block).unwrap().position;
    assert!(stopped_at.y < 0.0);

    thread::sleep(Duration::from_millis(30));
    assert_eq!(engine.body(block).unwrap().position, stopped_at);
}

#[test]
fn test_start_and_stop_are_idempotent() {
    let engine = background_engine();
    engine.stop();
    engine.start().unwrap();
    engine.start().unwrap();
    assert!(engine.is_running());
    engine.stop();
    engine.stop();
    assert!(!engine.is_running());

    engine.start().unwrap();
    assert!(engine.is_running());
}

#[test]
fn test_pause_freezes_and_start_resumes() {
    let engine = background_engine();
    let block = engine.create_body(RigidBody::default()).unwrap();
    engine.start().unwrap();
    engine.pause();
    assert!(engine.is_paused());
    assert!(engine.is_running());

    // Let any step already in flight finish
    thread::sleep(Duration::from_millis(20));
    let frozen = engine.body(block).unwrap().position;
    thread::sleep(Duration::from_millis(40));
    assert_eq!(engine.body(block).unwrap().position, frozen);

    engine.start().unwrap();
    assert!(!engine.is_paused());
    thread::sleep(Duration::from_millis(60));
    assert!(engine.body(block).unwrap().position.y < frozen.y);
}

#[test]
fn test_stepping_mode_mismatch() {
    let background = background_engine();
    assert!(matches!(
        background.update(1.0 / 60.0),
        Err(EngineError::ModeMismatch(_))
    ));

    let manual = PhysicsEngine::default();
    assert!(matches!(manual.start(), Err(EngineError::ModeMismatch(_))));
    assert!(!manual.is_running());
}

#[test]
fn test_callback_on_background_thread_can_mutate_engine() {
    let engine = Arc::new(background_engine());
    engine.set_gravity(Vector2::zero());
    let a = engine.create_body(RigidBody::default()).unwrap();
    let b = engine
        .create_body(RigidBody::new(Vector2::new(0.5, 0.0), 1.0, 1.0, 1.0))
        .unwrap();

    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let weak = Arc::downgrade(&engine);
    engine.set_collision_callback(move |contact| {
        counter.fetch_add(1, Ordering::SeqCst);
        if let Some(engine) = weak.upgrade() {
            engine.remove_body(contact.body_b);
            assert!(engine.body(contact.body_a).is_some());
        }
    });

    engine.start().unwrap();
    thread::sleep(Duration::from_millis(60));
    engine.stop();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(engine.body(a).is_some());
    assert!(engine.body(b).is_none());
}

#[test]
fn test_drop_stops_thread() {
    let engine = background_engine();
    engine.create_body(RigidBody::default()).unwrap();
    engine.start().unwrap();
    thread::sleep(Duration::from_millis(10));
    drop(engine);
}

#[test]
fn test_config_is_kept() {
    let config = EngineConfig::default().with_tick(Duration::from_millis(7), 0.02);
    let engine = PhysicsEngine::new(config.with_stepping_mode(SteppingMode::Background));
    assert_eq!(engine.config().tick_interval, Duration::from_millis(7));
    assert_eq!(engine.config().max_step, 0.02);
    assert_eq!(engine.stepping_mode(), SteppingMode::Background);
}
