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
//! Numerical integration for rigid bodies
//!
//! Integrators turn the accumulated force and torque of each body into new
//! velocities and positions, then clear the accumulators.
//!
//! # Timestep Guidelines
//!
//! - Too small: Numerical precision issues and wasted computation
//! - Too large: Bodies tunnel through thin platforms and stacks jitter
//! - Recommended: dt = 1/60, which is what the background loop targets

use crate::body::{BodyRegistry, RigidBody};
use crate::math::Vector2;

mod euler;

pub use euler::SemiImplicitEuler;

/// Kinetic energy of a body, linear plus rotational
///
/// KE = 0.5 * m * v² + 0.5 * I * ω²
pub fn kinetic_energy(body: &RigidBody) -> f64 {
    if body.is_static() {
        return 0.0;
    }
    0.5 * body.mass() * body.velocity.length_squared()
        + 0.5 * body.inertia() * body.angular_velocity * body.angular_velocity
}

/// Total kinetic energy of every registered body
pub fn total_kinetic_energy(registry: &BodyRegistry) -> f64 {
    registry.iter().map(|(_, body)| kinetic_energy(body)).sum()
}

/// Validate a timestep for stability
///
/// Returns a warning message if the timestep might cause numerical issues.
/// Extremely small timesteps may lead to precision loss, while large
/// timesteps may cause instability.
pub fn validate_timestep(dt: f64) -> Result<(), String> {
    if dt <= 0.0 || !dt.is_finite() {
        return Err(format!("Invalid timestep: {}. Must be positive and finite.", dt));
    }

    if dt < 1e-9 {
        return Err(format!(
            "Timestep {} is extremely small and may cause precision loss",
            dt
        ));
    }

    if dt > 0.1 {
        return Err(format!(
            "Timestep {} is large and may let bodies pass through each other",
            dt
        ));
    }

    Ok(())
}

/// Trait for numerical integration methods
///
/// An integrator advances one body by `dt` under a global gravity vector.
/// Static and inactive bodies are filtered out by [`integrate_bodies`]
/// before the integrator sees them.
pub trait Integrator: Send + Sync {
    /// Get the name of this integrator
    fn name(&self) -> &str;

    /// Advance a single dynamic body and reset its force/torque accumulators
    fn integrate_body(&self, body: &mut RigidBody, gravity: Vector2, dt: f64);
}

/// Integrate every active, non-static body in the registry
///
/// Returns the number of bodies advanced.
pub fn integrate_bodies(
    integrator: &dyn Integrator,
    registry: &mut BodyRegistry,
    gravity: Vector2,
    dt: f64,
) -> usize {
    let mut updated = 0;
    for (_, body) in registry.iter_mut() {
        if !body.is_active || body.is_static() {
            continue;
        }
        integrator.integrate_body(body, gravity, dt);
        if !body.position.is_valid() || !body.velocity.is_valid() {
            log::warn!("Body state became non-finite after {} step", integrator.name());
        }
        updated += 1;
    }
    updated
}
