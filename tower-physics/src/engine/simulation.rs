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
//! Shared world state, the step pipeline and the background driver

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::body::BodyRegistry;
use crate::collision::{detect_contacts, CollisionResolver, Contact};
use crate::error::Result;
use crate::integration::{integrate_bodies, SemiImplicitEuler};
use crate::math::Vector2;
use crate::world::SpellRegistry;

use super::config::EngineConfig;

pub(crate) type CollisionCallback = Arc<dyn Fn(&Contact) + Send + Sync>;

/// Lock a mutex, recovering the data if a previous holder panicked
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Everything guarded by the world lock
pub(crate) struct World {
    pub(crate) registry: BodyRegistry,
    pub(crate) gravity: Vector2,
    pub(crate) time_step: f64,
    pub(crate) velocity_iterations: u32,
    pub(crate) position_iterations: u32,
    pub(crate) resolver: CollisionResolver,
    pub(crate) integrator: SemiImplicitEuler,
    pub(crate) spells: SpellRegistry,
    pub(crate) contacts: Vec<Contact>,
}

impl World {
    pub(crate) fn new(config: &EngineConfig) -> Self {
        World {
            registry: BodyRegistry::new(),
            gravity: config.gravity,
            time_step: config.time_step,
            velocity_iterations: config.velocity_iterations,
            position_iterations: config.position_iterations,
            resolver: CollisionResolver::new(config.correction_percent, config.penetration_slop),
            integrator: SemiImplicitEuler::new(config.linear_damping, config.angular_damping),
            spells: SpellRegistry::new(),
            contacts: Vec::new(),
        }
    }
}

/// State shared between the facade and the background thread
pub(crate) struct Shared {
    pub(crate) world: Mutex<World>,
    /// Held for the whole of a step, so steps never interleave
    pub(crate) step_gate: Mutex<()>,
    pub(crate) callback: Mutex<Option<CollisionCallback>>,
    pub(crate) running: AtomicBool,
    pub(crate) paused: AtomicBool,
}

impl Shared {
    pub(crate) fn new(config: &EngineConfig) -> Self {
        Shared {
            world: Mutex::new(World::new(config)),
            step_gate: Mutex::new(()),
            callback: Mutex::new(None),
            running: AtomicBool::new(false),
            paused: AtomicBool::new(false),
        }
    }

    pub(crate) fn world(&self) -> MutexGuard<'_, World> {
        lock(&self.world)
    }

    /// Run one detect, notify, resolve, integrate cycle
    ///
    /// The world lock is released while the collision callback runs.
    pub(crate) fn step(&self, dt: f64) {
        let _gate = lock(&self.step_gate);

        let contacts = detect_contacts(&self.world().registry);

        let callback = lock(&self.callback).clone();
        if let Some(callback) = callback {
            for contact in &contacts {
                callback(contact);
            }
        }

        let mut guard = self.world();
        let world = &mut *guard;
        world.resolver.resolve(&mut world.registry, &contacts);
        integrate_bodies(&world.integrator, &mut world.registry, world.gravity, dt);
        world.contacts = contacts;
    }
}

/// Handle to the background stepping thread
pub(crate) struct SimulationThread {
    handle: Option<JoinHandle<()>>,
}

impl SimulationThread {
    pub(crate) fn idle() -> Self {
        SimulationThread { handle: None }
    }

    /// Spawn the loop unless it is already running
    ///
    /// Returns `true` if a new thread was started. Callers serialize calls
    /// to `start` and `stop`.
    pub(crate) fn start(&mut self, shared: &Arc<Shared>, tick: Duration, max_step: f64) -> Result<bool> {
        if shared.running.load(Ordering::Acquire) {
            return Ok(false);
        }
        if self.on_sim_thread() {
            // Restarted from a callback before the loop noticed the stop
            shared.running.store(true, Ordering::Release);
            return Ok(false);
        }
        // A loop stopped from its own callback is still waiting to be joined
        self.reap();

        shared.running.store(true, Ordering::Release);
        let loop_shared = Arc::clone(shared);
        let spawned = thread::Builder::new()
            .name("tower-physics-sim".to_string())
            .spawn(move || run_loop(&loop_shared, tick, max_step));

        match spawned {
            Ok(handle) => {
                self.handle = Some(handle);
                Ok(true)
            }
            Err(e) => {
                shared.running.store(false, Ordering::Release);
                Err(e.into())
            }
        }
    }

    /// Signal the loop to exit
    ///
    /// Returns whether the loop was running, plus the thread for the caller
    /// to [`join`] once it has released its own locks. No thread is handed
    /// back when called from the simulation thread itself, for example from a
    /// collision callback.
    pub(crate) fn stop(&mut self, shared: &Shared) -> (bool, Option<JoinHandle<()>>) {
        let was_running = shared.running.swap(false, Ordering::AcqRel);
        let handle = if self.on_sim_thread() {
            None
        } else {
            self.handle.take()
        };
        (was_running, handle)
    }

    fn on_sim_thread(&self) -> bool {
        self.handle
            .as_ref()
            .is_some_and(|h| h.thread().id() == thread::current().id())
    }

    fn reap(&mut self) {
        if let Some(handle) = self.handle.take() {
            join(handle);
        }
    }
}

/// Wait for a stopped loop to exit
pub(crate) fn join(handle: JoinHandle<()>) {
    if handle.join().is_err() {
        log::error!("Simulation thread panicked");
    }
}

fn run_loop(shared: &Shared, tick: Duration, max_step: f64) {
    let mut last = Instant::now();
    while shared.running.load(Ordering::Acquire) {
        let now = Instant::now();
        let dt = now.duration_since(last).as_secs_f64().min(max_step);
        last = now;

        if !shared.paused.load(Ordering::Acquire) && dt > 0.0 {
            shared.step(dt);
        }
        thread::sleep(tick);
    }
    log::debug!("Simulation loop exited");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::RigidBody;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_step_notifies_before_resolving() {
        let shared = Shared::new(&EngineConfig::default());
        {
            let mut world = shared.world();
            world.registry.insert(RigidBody::new(Vector2::zero(), 1.0, 1.0, 1.0));
            world.registry.insert(RigidBody::new(Vector2::new(0.5, 0.0), 1.0, 1.0, 1.0));
        }

        let seen = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&seen);
        *lock(&shared.callback) = Some(Arc::new(move |_: &Contact| {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        shared.step(1.0 / 60.0);
        assert_eq!(seen.load(Ordering::SeqCst), 1);
        assert_eq!(shared.world().contacts.len(), 1);
    }

    #[test]
    fn test_thread_start_stop() {
        let shared = Arc::new(Shared::new(&EngineConfig::default()));
        let mut thread = SimulationThread::idle();
        assert!(thread.start(&shared, Duration::from_millis(1), 0.05).unwrap());
        assert!(!thread.start(&shared, Duration::from_millis(1), 0.05).unwrap());
        let (was_running, handle) = thread.stop(&shared);
        assert!(was_running);
        join(handle.unwrap());

        let (was_running, handle) = thread.stop(&shared);
        assert!(!was_running);
        assert!(handle.is_none());
    }
}
