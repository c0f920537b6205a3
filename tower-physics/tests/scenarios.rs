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
//! End-to-end scenarios driven through the engine facade
//!
//! Tests falling, landing and resting behavior plus the immediate effect of
//! impulses and explosions.

use tower_physics::{BodyHandle, PhysicsEngine, RigidBody, TetrominoShape, Vector2};

const DT: f64 = 1.0 / 60.0;

fn ground_scene() -> (PhysicsEngine, BodyHandle, BodyHandle) {
    let engine = PhysicsEngine::default();
    let block = engine
        .create_body(RigidBody::new(Vector2::zero(), 1.0, 1.0, 1.0))
        .unwrap();
    let ground = engine
        .create_body(RigidBody::new_static(Vector2::new(0.0, -10.0), 20.0, 1.0))
        .unwrap();
    (engine, block, ground)
}

#[test]
fn test_block_settles_on_ground() {
    let (engine, block, ground) = ground_scene();

    for _ in 0..600 {
        engine.update(DT).unwrap();
    }

    let body = engine.body(block).unwrap();
    let bottom = body.position.y - body.height() / 2.0;
    assert!((bottom - -9.5).abs() < 0.1, "bottom edge at {}", bottom);
    assert!((body.position.y - -9.0).abs() < 0.1, "center at {}", body.position.y);
    assert!(body.velocity.y.abs() < 0.25, "still moving at {}", body.velocity.y);
    assert!(body.position.x.abs() < 1e-9);
    assert!(body.rotation.abs() < 1e-9);

    assert_eq!(engine.body(ground).unwrap().position, Vector2::new(0.0, -10.0));
    assert!(engine.check_collision(block, ground));
}

#[test]
fn test_single_step_from_rest() {
    let engine = PhysicsEngine::default();
    let block = engine
        .create_body(RigidBody::new(Vector2::new(3.0, 7.0), 1.0, 1.0, 2.0))
        .unwrap();

    engine.update(DT).unwrap();

    let body = engine.body(block).unwrap();
    let expected_v = -9.8 * DT * 0.98;
    assert!((body.velocity.y - expected_v).abs() < 1e-12);
    assert!((body.position.y - (7.0 + expected_v * DT)).abs() < 1e-12);
    assert_eq!(body.velocity.x, 0.0);
    assert_eq!(body.force, Vector2::zero());
}

#[test]
fn test_static_bodies_never_move() {
    let (engine, _block, ground) = ground_scene();
    let ledge = engine
        .create_body(RigidBody::new_static(Vector2::new(3.0, -5.0), 2.0, 0.5).with_rotation(0.3))
        .unwrap();
    engine.apply_force(ground, Vector2::new(100.0, 100.0));
    engine.apply_explosion(Vector2::new(0.0, -10.0), 50.0, 1000.0);
    engine.apply_spell("impulse_up", &[ground, ledge]);

    for _ in 0..300 {
        engine.update(DT).unwrap();
    }

    for (handle, position, rotation) in [
        (ground, Vector2::new(0.0, -10.0), 0.0),
        (ledge, Vector2::new(3.0, -5.0), 0.3),
    ] {
        let body = engine.body(handle).unwrap();
        assert_eq!(body.inverse_mass(), 0.0);
        assert_eq!(body.inverse_inertia(), 0.0);
        assert_eq!(body.position, position);
        assert_eq!(body.rotation, rotation);
    }
}

#[test]
fn test_impulse_sets_velocity_immediately() {
    let (engine, block, _ground) = ground_scene();
    for _ in 0..600 {
        engine.update(DT).unwrap();
    }

    let center = engine.body(block).unwrap().position;
    engine.with_body_mut(block, |body| body.velocity = Vector2::zero());
    assert!(engine.apply_impulse(block, Vector2::new(0.0, 10.0), center));
    assert_eq!(engine.body(block).unwrap().velocity.y, 10.0);

    engine.update(DT).unwrap();
    assert!(engine.body(block).unwrap().position.y > center.y);
}

#[test]
fn test_explosion_falloff_halves_at_half_radius() {
    let engine = PhysicsEngine::default();
    let near = engine.create_body(RigidBody::default()).unwrap();
    let mid = engine
        .create_body(RigidBody::new(Vector2::new(5.0, 0.0), 1.0, 1.0, 1.0))
        .unwrap();

    assert_eq!(engine.apply_explosion(Vector2::zero(), 10.0, 50.0), 2);

    let near_force = engine.body(near).unwrap().force.length();
    let mid_force = engine.body(mid).unwrap().force;
    assert!((near_force - 50.0).abs() < 1e-9);
    assert!((mid_force.length() - 25.0).abs() < 1e-9);
    assert!(mid_force.x > 0.0);
}

#[test]
fn test_tetromino_falls_as_a_unit() {
    let engine = PhysicsEngine::default();
    let blocks = engine
        .spawn_tetromino(TetrominoShape::I, Vector2::new(0.0, 20.0), 0.0)
        .unwrap();
    let before: Vec<Vector2> = blocks
        .iter()
        .map(|h| engine.body(*h).unwrap().position)
        .collect();

    for _ in 0..30 {
        engine.update(DT).unwrap();
    }

    // Side-by-side blocks touch without overlapping, so no contacts form
    assert!(engine.contacts().is_empty());
    let drop = before[0].y - engine.body(blocks[0]).unwrap().position.y;
    assert!(drop > 0.0);
    for (handle, start) in blocks.iter().zip(&before) {
        let body = engine.body(*handle).unwrap();
        assert!((body.position.x - start.x).abs() < 1e-12);
        assert!((start.y - body.position.y - drop).abs() < 1e-9);
    }
}
