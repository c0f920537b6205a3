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
//! Thread-safe engine facade
//!
//! [`PhysicsEngine`] owns every body behind a single lock. Callers hold
//! [`BodyHandle`]s and receive clones of bodies, never references into the
//! engine, so every method takes `&self` and the engine can be shared across
//! threads in an `Arc`.
//!
//! # Stepping
//!
//! Each step detects contacts, notifies the collision callback, resolves
//! the contacts and integrates every active dynamic body. Who drives the
//! steps is fixed by [`SteppingMode`] at construction:
//!
//! - [`SteppingMode::Manual`]: the caller calls [`PhysicsEngine::update`]
//! - [`SteppingMode::Background`]: [`PhysicsEngine::start`] spawns a thread
//!   stepping at [`EngineConfig::tick_interval`] with a measured dt clamped
//!   to [`EngineConfig::max_step`]
//!
//! # Collision callback
//!
//! The callback runs with the world lock released, so it may query the
//! engine or remove bodies. It must not call [`PhysicsEngine::update`],
//! [`PhysicsEngine::import_state`] or
//! [`PhysicsEngine::set_collision_callback`], which wait for the step it is
//! running in.

mod config;
mod simulation;
mod state;

use std::sync::atomic::Ordering;
use std::sync::{Arc, Mutex};

pub use config::{EngineConfig, SteppingMode, MAX_STEP_ENV, TICK_MS_ENV};
pub use state::{BodyState, EngineState, FORMAT_VERSION};

use crate::body::{BodyHandle, RigidBody};
use crate::collision::{collide, Contact};
use crate::error::{EngineError, Result};
use crate::integration::validate_timestep;
use crate::math::Vector2;
use crate::tetromino::{Tetromino, TetrominoShape};
use crate::world::{self, Spell};

use simulation::{join, lock, Shared, SimulationThread, World};

/// The physics world and its stepping driver
pub struct PhysicsEngine {
    shared: Arc<Shared>,
    thread: Mutex<SimulationThread>,
    config: EngineConfig,
}

impl PhysicsEngine {
    /// Create an empty engine
    pub fn new(config: EngineConfig) -> Self {
        PhysicsEngine {
            shared: Arc::new(Shared::new(&config)),
            thread: Mutex::new(SimulationThread::idle()),
            config,
        }
    }

    /// Configuration the engine was built with
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Stepping mode fixed at construction
    pub fn stepping_mode(&self) -> SteppingMode {
        self.config.stepping_mode
    }

    // ----- Lifecycle -----

    /// Reset to an empty, unpaused world with the configured gravity
    ///
    /// Custom spells and the collision callback are kept. A running
    /// background thread keeps running.
    pub fn initialize(&self) {
        let mut world = self.shared.world();
        world.registry.clear();
        world.contacts.clear();
        world.gravity = self.config.gravity;
        self.shared.paused.store(false, Ordering::Release);
        log::info!("Physics engine initialized");
    }

    /// Stop the background thread and remove every body
    pub fn shutdown(&self) {
        self.stop();
        let mut world = self.shared.world();
        world.registry.clear();
        world.contacts.clear();
        log::info!("Physics engine shut down");
    }

    // ----- Bodies -----

    /// Validate a blueprint and register it
    pub fn create_body(&self, body: RigidBody) -> Result<BodyHandle> {
        if let Err(reason) = body.validate() {
            log::warn!("Rejected body blueprint: {}", reason);
            return Err(EngineError::InvalidBody(reason));
        }
        let handle = self.shared.world().registry.insert(body);
        log::debug!("Created {}", handle);
        Ok(handle)
    }

    /// Build a tetromino and register its four blocks
    pub fn spawn_tetromino(
        &self,
        shape: TetrominoShape,
        spawn: Vector2,
        rotation: f64,
    ) -> Result<[BodyHandle; 4]> {
        let blocks = Tetromino::new(shape, spawn, rotation).into_blocks();
        for block in &blocks {
            block.validate().map_err(EngineError::InvalidBody)?;
        }
        let mut world = self.shared.world();
        let handles = blocks.map(|block| world.registry.insert(block));
        log::debug!("Spawned {} tetromino at ({}, {})", shape, spawn.x, spawn.y);
        Ok(handles)
    }

    /// Remove a body; returns `false` for unknown or stale handles
    pub fn remove_body(&self, handle: BodyHandle) -> bool {
        let removed = self.shared.world().registry.remove(handle).is_some();
        if removed {
            log::debug!("Removed {}", handle);
        }
        removed
    }

    /// Snapshot of a body
    pub fn body(&self, handle: BodyHandle) -> Option<RigidBody> {
        self.shared.world().registry.get(handle).cloned()
    }

    /// Mutate a body in place under the world lock
    ///
    /// Returns `None` for unknown or stale handles.
    pub fn with_body_mut<R>(&self, handle: BodyHandle, f: impl FnOnce(&mut RigidBody) -> R) -> Option<R> {
        self.shared.world().registry.get_mut(handle).map(f)
    }

    /// Snapshot of every body with its handle, in slot order
    pub fn bodies(&self) -> Vec<(BodyHandle, RigidBody)> {
        self.shared
            .world()
            .registry
            .iter()
            .map(|(handle, body)| (handle, body.clone()))
            .collect()
    }

    /// Number of registered bodies
    pub fn body_count(&self) -> usize {
        self.shared.world().registry.len()
    }

    // ----- Forces and effects -----

    /// Accumulate a force on a body for the next step
    pub fn apply_force(&self, handle: BodyHandle, force: Vector2) -> bool {
        self.with_body_mut(handle, |body| body.apply_force(force)).is_some()
    }

    /// Apply an impulse at a world-space point immediately
    pub fn apply_impulse(&self, handle: BodyHandle, impulse: Vector2, point: Vector2) -> bool {
        self.with_body_mut(handle, |body| body.apply_impulse(impulse, point))
            .is_some()
    }

    /// Radial force with linear falloff; returns the number of bodies pushed
    pub fn apply_explosion(&self, center: Vector2, radius: f64, force: f64) -> usize {
        world::apply_explosion(&mut self.shared.world().registry, center, radius, force)
    }

    /// Uniform directional force; returns the number of bodies pushed
    pub fn apply_wind(&self, direction: Vector2, strength: f64) -> usize {
        world::apply_wind(&mut self.shared.world().registry, direction, strength)
    }

    /// Cast a named spell on the listed bodies
    ///
    /// Unknown spells and stale handles are ignored. Returns the number of
    /// bodies affected.
    pub fn apply_spell(&self, name: &str, targets: &[BodyHandle]) -> usize {
        let mut guard = self.shared.world();
        let world = &mut *guard;
        world.spells.cast(name, &mut world.registry, targets)
    }

    /// Register a custom spell
    pub fn register_spell(&self, spell: Box<dyn Spell>) -> Result<()> {
        self.shared.world().spells.register(spell)
    }

    /// Names of every registered spell, sorted
    pub fn spell_names(&self) -> Vec<String> {
        self.shared.world().spells.names()
    }

    // ----- Queries -----

    /// Whether two registered bodies currently overlap
    pub fn check_collision(&self, a: BodyHandle, b: BodyHandle) -> bool {
        let world = self.shared.world();
        match (world.registry.get(a), world.registry.get(b)) {
            (Some(body_a), Some(body_b)) if a != b => collide(body_a, body_b).is_some(),
            _ => false,
        }
    }

    /// Contacts found by the most recent step
    pub fn contacts(&self) -> Vec<Contact> {
        self.shared.world().contacts.clone()
    }

    /// Whether `point` lies inside the body
    pub fn is_point_in_body(&self, handle: BodyHandle, point: Vector2) -> bool {
        world::is_point_in_body(&self.shared.world().registry, handle, point)
    }

    /// Bodies whose bounds touch the area `[min, max]`
    pub fn bodies_in_area(&self, min: Vector2, max: Vector2) -> Vec<BodyHandle> {
        world::bodies_in_area(&self.shared.world().registry, min, max)
    }

    /// Nearest active body strictly within `max_distance` of `point`
    pub fn find_closest_body(&self, point: Vector2, max_distance: f64) -> Option<BodyHandle> {
        world::find_closest_body(&self.shared.world().registry, point, max_distance)
    }

    /// Whether the listed blocks are at rest and balanced on the lowest one
    pub fn check_tower_stability(&self, blocks: &[BodyHandle]) -> bool {
        world::check_tower_stability(&self.shared.world().registry, blocks)
    }

    // ----- Settings -----

    /// Change gravity
    pub fn set_gravity(&self, gravity: Vector2) {
        self.shared.world().gravity = gravity;
    }

    /// Current gravity
    pub fn gravity(&self) -> Vector2 {
        self.shared.world().gravity
    }

    /// Change the solver iteration counts
    pub fn set_iterations(&self, velocity_iterations: u32, position_iterations: u32) {
        let mut world = self.shared.world();
        world.velocity_iterations = velocity_iterations;
        world.position_iterations = position_iterations;
    }

    /// Velocity iteration count
    pub fn iterations(&self) -> u32 {
        self.shared.world().velocity_iterations
    }

    /// Position iteration count
    pub fn position_iterations(&self) -> u32 {
        self.shared.world().position_iterations
    }

    /// Nominal step length
    pub fn time_step(&self) -> f64 {
        self.shared.world().time_step
    }

    // ----- Stepping -----

    /// Advance the simulation by `dt` seconds
    ///
    /// Only valid in [`SteppingMode::Manual`]. A paused engine does not
    /// advance. Non-positive or non-finite steps are skipped with a warning.
    pub fn update(&self, dt: f64) -> Result<()> {
        if self.config.stepping_mode != SteppingMode::Manual {
            return Err(EngineError::ModeMismatch(
                "update() is driven by the background thread in this engine".to_string(),
            ));
        }
        if let Err(msg) = validate_timestep(dt) {
            log::warn!("{}", msg);
            if !(dt.is_finite() && dt > 0.0) {
                return Ok(());
            }
        }
        if self.is_paused() {
            return Ok(());
        }
        self.shared.step(dt);
        Ok(())
    }

    /// Install the collision callback, replacing any previous one
    ///
    /// Waits for an in-flight step to finish.
    pub fn set_collision_callback<F>(&self, callback: F)
    where
        F: Fn(&Contact) + Send + Sync + 'static,
    {
        let _gate = lock(&self.shared.step_gate);
        *lock(&self.shared.callback) = Some(Arc::new(callback));
    }

    /// Remove the collision callback
    pub fn clear_collision_callback(&self) {
        let _gate = lock(&self.shared.step_gate);
        *lock(&self.shared.callback) = None;
    }

    /// Start or resume the background thread
    ///
    /// Idempotent while running. Resumes a paused engine.
    pub fn start(&self) -> Result<()> {
        if self.config.stepping_mode != SteppingMode::Background {
            return Err(EngineError::ModeMismatch(
                "start() requires SteppingMode::Background".to_string(),
            ));
        }
        let was_paused = self.shared.paused.swap(false, Ordering::AcqRel);
        let started = lock(&self.thread).start(
            &self.shared,
            self.config.tick_interval,
            self.config.max_step,
        )?;
        if started {
            log::info!(
                "Simulation thread started ({:?} tick, {} max step)",
                self.config.tick_interval,
                self.config.max_step
            );
        } else if was_paused {
            log::info!("Simulation resumed");
        }
        Ok(())
    }

    /// Stop advancing the simulation until resumed
    pub fn pause(&self) {
        if !self.shared.paused.swap(true, Ordering::AcqRel) {
            log::info!("Simulation paused");
        }
    }

    /// Clear the paused flag
    pub fn resume(&self) {
        if self.shared.paused.swap(false, Ordering::AcqRel) {
            log::info!("Simulation resumed");
        }
    }

    /// Stop the background thread and wait for it to exit
    ///
    /// Idempotent. From inside a collision callback the thread is only
    /// signalled and exits after the current step.
    pub fn stop(&self) {
        let (was_running, handle) = lock(&self.thread).stop(&self.shared);
        if let Some(handle) = handle {
            join(handle);
        }
        if was_running {
            log::info!("Simulation thread stopped");
        }
    }

    /// Whether the background thread is running
    pub fn is_running(&self) -> bool {
        self.shared.running.load(Ordering::Acquire)
    }

    /// Whether the simulation is paused
    pub fn is_paused(&self) -> bool {
        self.shared.paused.load(Ordering::Acquire)
    }

    // ----- State -----

    /// Snapshot the whole engine
    pub fn export_state(&self) -> EngineState {
        let world = self.shared.world();
        snapshot(&world, self.is_running(), self.is_paused())
    }

    /// Snapshot the whole engine as pretty-printed JSON
    pub fn export_state_json(&self) -> Result<String> {
        self.export_state().to_json()
    }

    /// Replace the engine's state with a snapshot
    ///
    /// The document is validated completely before anything changes; on
    /// failure the error is logged and the engine is left untouched. Body
    /// ids are kept, and handles this engine issued for bodies missing from
    /// the document stay stale. The paused flag is restored; `isRunning` is
    /// ignored.
    pub fn import_state(&self, state: &EngineState) -> Result<()> {
        let mut registry = match state.build_registry() {
            Ok(registry) => registry,
            Err(e) => {
                log::error!("State import failed: {}", e);
                return Err(e);
            }
        };

        let _gate = lock(&self.shared.step_gate);
        let mut world = self.shared.world();
        registry.retire_handles_from(&world.registry);
        world.registry = registry;
        world.contacts.clear();
        world.gravity = state.gravity;
        world.time_step = state.time_step;
        world.velocity_iterations = state.velocity_iterations;
        world.position_iterations = state.position_iterations;
        self.shared.paused.store(state.is_paused, Ordering::Release);

        log::info!("Imported state with {} bodies", world.registry.len());
        Ok(())
    }

    /// Parse a JSON snapshot and import it
    pub fn import_state_json(&self, json: &str) -> Result<()> {
        let state = EngineState::from_json(json).map_err(|e| {
            log::error!("State import failed: {}", e);
            e
        })?;
        self.import_state(&state)
    }
}

impl Default for PhysicsEngine {
    fn default() -> Self {
        PhysicsEngine::new(EngineConfig::default())
    }
}

impl Drop for PhysicsEngine {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for PhysicsEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhysicsEngine")
            .field("stepping_mode", &self.config.stepping_mode)
            .field("bodies", &self.body_count())
            .field("running", &self.is_running())
            .field("paused", &self.is_paused())
            .finish()
    }
}

fn snapshot(world: &World, is_running: bool, is_paused: bool) -> EngineState {
    EngineState {
        format_version: FORMAT_VERSION.to_string(),
        gravity: world.gravity,
        time_step: world.time_step,
        velocity_iterations: world.velocity_iterations,
        position_iterations: world.position_iterations,
        is_running,
        is_paused,
        bodies: world
            .registry
            .iter()
            .map(|(handle, body)| BodyState::capture(handle, body))
            .collect(),
    }
}
