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
//! Sequential impulse contact resolution
//!
//! Each contact is resolved once per step, in detection order:
//!
//! ```text
//! v_rel = v_B(p) - v_A(p)
//! j     = -(1 + e) * (v_rel . n) / (1/m_A + 1/m_B)      e = min(e_A, e_B)
//! jt    = clamp(-(v_rel . t) / (1/m_A + 1/m_B), -mu*j, mu*j)   mu = (mu_A + mu_B) / 2
//! ```
//!
//! followed by a Baumgarte-style positional correction that moves the
//! bodies apart along the normal by a fraction of the penetration beyond
//! the allowed slop, split by inverse mass. The correction writes positions
//! directly and is not iterated to convergence.

use crate::body::{BodyRegistry, RigidBody};
use crate::collision::Contact;
use crate::math::Vector2;

/// Tangential speeds below this are treated as no sliding
const TANGENT_EPSILON: f64 = 1e-4;

/// Impulse solver settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionResolver {
    /// Fraction of the excess penetration removed per step
    pub correction_percent: f64,
    /// Penetration depth tolerated without correction
    pub penetration_slop: f64,
}

impl Default for CollisionResolver {
    fn default() -> Self {
        CollisionResolver {
            correction_percent: 0.2,
            penetration_slop: 0.01,
        }
    }
}

impl CollisionResolver {
    /// Create a resolver with explicit correction settings
    pub fn new(correction_percent: f64, penetration_slop: f64) -> Self {
        CollisionResolver {
            correction_percent,
            penetration_slop,
        }
    }

    /// Resolve every contact in order
    ///
    /// Contacts whose bodies are no longer registered are skipped. Returns
    /// the number of contacts that received an impulse.
    pub fn resolve(&self, registry: &mut BodyRegistry, contacts: &[Contact]) -> usize {
        let mut resolved = 0;
        for contact in contacts {
            let Some((a, b)) = registry.pair_mut(contact.body_a, contact.body_b) else {
                continue;
            };
            if self.resolve_contact(a, b, contact) {
                resolved += 1;
            }
        }
        resolved
    }

    /// Resolve a single contact between `a` and `b`
    ///
    /// Returns `false` when the contact was skipped: both bodies static, or
    /// the bodies already separating along the normal.
    pub fn resolve_contact(&self, a: &mut RigidBody, b: &mut RigidBody, contact: &Contact) -> bool {
        if a.is_static() && b.is_static() {
            return false;
        }

        let normal = contact.normal;
        let point = contact.point;
        let relative_velocity = b.velocity_at_point(point) - a.velocity_at_point(point);
        let velocity_along_normal = relative_velocity.dot(normal);

        if velocity_along_normal >= 0.0 {
            return false;
        }

        let inverse_mass_sum = a.inverse_mass() + b.inverse_mass();
        let restitution = a.restitution.min(b.restitution);

        let j = -(1.0 + restitution) * velocity_along_normal / inverse_mass_sum;
        let impulse = normal * j;
        apply_impulse_pair(a, b, impulse, point);

        let tangent = relative_velocity - normal * velocity_along_normal;
        let tangent_speed = tangent.length();
        if tangent_speed > TANGENT_EPSILON {
            let tangent = tangent * (1.0 / tangent_speed);
            let friction = (a.friction + b.friction) * 0.5;
            let max_jt = j * friction;
            let jt = (-relative_velocity.dot(tangent) / inverse_mass_sum).clamp(-max_jt, max_jt);
            apply_impulse_pair(a, b, tangent * jt, point);
        }

        let depth = (contact.penetration - self.penetration_slop).max(0.0);
        let correction = normal * (depth * self.correction_percent / inverse_mass_sum);
        if !a.is_static() {
            a.position -= correction * a.inverse_mass();
        }
        if !b.is_static() {
            b.position += correction * b.inverse_mass();
        }

        true
    }
}

fn apply_impulse_pair(a: &mut RigidBody, b: &mut RigidBody, impulse: Vector2, point: Vector2) {
    if !a.is_static() {
        a.apply_impulse(-impulse, point);
    }
    if !b.is_static() {
        b.apply_impulse(impulse, point);
    }
}
