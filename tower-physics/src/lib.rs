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
//! # Tower Physics
//!
//! 2D rigid-body physics for falling-block tower games: oriented rectangles
//! stacked under gravity, with friction, restitution and spells that change
//! a block's material on the fly.
//!
//! ## Features
//!
//! - **Collision**: AABB broad phase, SAT narrow phase for rotated rectangles
//! - **Response**: impulse solver with Coulomb friction and positional correction
//! - **Integration**: semi-implicit Euler with per-step damping
//! - **Gameplay**: tetromino factory, spells, explosions, wind, tower stability
//! - **Threading**: one-lock engine facade with an optional background loop
//! - **Persistence**: JSON state export and validated atomic import
//! - **Parallelization**: optional Rayon narrow phase for large worlds
//!
//! ## Example
//!
//! ```rust
//! use tower_physics::{PhysicsEngine, RigidBody, Vector2};
//!
//! let engine = PhysicsEngine::default();
//! let ground = engine
//!     .create_body(RigidBody::new_static(Vector2::new(0.0, -10.0), 20.0, 1.0))
//!     .unwrap();
//! let block = engine
//!     .create_body(RigidBody::new(Vector2::zero(), 1.0, 1.0, 1.0))
//!     .unwrap();
//!
//! for _ in 0..60 {
//!     engine.update(1.0 / 60.0).unwrap();
//! }
//! assert!(engine.body(block).unwrap().position.y < 0.0);
//! assert_eq!(engine.body(ground).unwrap().position, Vector2::new(0.0, -10.0));
//! ```

#![warn(missing_docs)]

/// Rigid bodies, handles and the body registry
pub mod body;

/// Collision detection and response
pub mod collision;

/// Engine facade, configuration and state documents
pub mod engine;

/// Crate error type
pub mod error;

/// Numerical integration methods
pub mod integration;

/// 2D vector math
pub mod math;

/// Four-block composite pieces
pub mod tetromino;

/// Spatial queries, stability checks, effects and spells
pub mod world;

pub use body::{BodyHandle, Material, RigidBody};
pub use collision::Contact;
pub use engine::{EngineConfig, EngineState, PhysicsEngine, SteppingMode};
pub use error::{EngineError, Result};
pub use math::Vector2;
pub use tetromino::{Tetromino, TetrominoShape};
