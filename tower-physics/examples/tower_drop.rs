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
//! Drop a few pieces on the ground and report the tower
//!
//! Run with `RUST_LOG=debug` to see body creation and collision logging.
//! `--background` drives the simulation from the engine's own thread
//! instead of calling `update` in a loop.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tower_physics::{
    BodyHandle, EngineConfig, PhysicsEngine, RigidBody, SteppingMode, TetrominoShape, Vector2,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let background = std::env::args().any(|arg| arg == "--background");
    let mode = if background {
        SteppingMode::Background
    } else {
        SteppingMode::Manual
    };
    let engine = PhysicsEngine::new(EngineConfig::from_env().with_stepping_mode(mode));

    engine.create_body(RigidBody::new_static(Vector2::new(0.0, -10.0), 20.0, 1.0))?;

    let contacts = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&contacts);
    engine.set_collision_callback(move |_| {
        counter.fetch_add(1, Ordering::Relaxed);
    });

    let mut tower: Vec<BodyHandle> = Vec::new();
    for (i, shape) in [TetrominoShape::O, TetrominoShape::I, TetrominoShape::T]
        .into_iter()
        .enumerate()
    {
        let spawn = Vector2::new(0.0, -8.0 + i as f64 * 3.0);
        tower.extend(engine.spawn_tetromino(shape, spawn, 0.0)?);
    }
    engine.apply_spell("sticky", &tower);

    if background {
        engine.start()?;
        thread::sleep(Duration::from_secs(3));
        engine.stop();
    } else {
        for _ in 0..180 {
            engine.update(engine.time_step())?;
        }
    }

    println!("Contacts reported: {}", contacts.load(Ordering::Relaxed));
    for handle in &tower {
        if let Some(body) = engine.body(*handle) {
            println!(
                "{}: ({:.3}, {:.3}) rot {:.3} speed {:.3}",
                handle,
                body.position.x,
                body.position.y,
                body.rotation,
                body.speed()
            );
        }
    }
    println!("Tower stable: {}", engine.check_tower_stability(&tower));

    let state = engine.export_state_json()?;
    println!("Exported {} bytes of state", state.len());

    Ok(())
}
