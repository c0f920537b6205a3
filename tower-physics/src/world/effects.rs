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
//! Area force fields
//!
//! Both effects accumulate forces, so they take effect at the next
//! integration step. Static and inactive bodies are unaffected.

use crate::body::BodyRegistry;
use crate::math::Vector2;

/// Push bodies away from `center` with a linear falloff
///
/// A body whose center lies within `radius` receives
/// `direction * force * (1 - distance / radius)`. A body sitting exactly on
/// the center is pushed along +y. Returns the number of bodies affected.
pub fn apply_explosion(registry: &mut BodyRegistry, center: Vector2, radius: f64, force: f64) -> usize {
    if radius.is_nan() || radius <= 0.0 {
        log::debug!("Ignoring explosion with non-positive radius {}", radius);
        return 0;
    }

    let mut affected = 0;
    for (_, body) in registry.iter_mut() {
        if body.is_static() || !body.is_active {
            continue;
        }
        let offset = body.position - center;
        let distance = offset.length();
        if distance > radius {
            continue;
        }
        let direction = if distance > 0.0 {
            offset * (1.0 / distance)
        } else {
            Vector2::new(0.0, 1.0)
        };
        body.apply_force(direction * (force * (1.0 - distance / radius)));
        affected += 1;
    }
    affected
}

/// Apply a uniform force of `strength` along `direction` to every body
///
/// A zero direction applies nothing. Returns the number of bodies affected.
pub fn apply_wind(registry: &mut BodyRegistry, direction: Vector2, strength: f64) -> usize {
    let push = direction.normalized() * strength;
    if push == Vector2::zero() {
        return 0;
    }

    let mut affected = 0;
    for (_, body) in registry.iter_mut() {
        if body.is_static() || !body.is_active {
            continue;
        }
        body.apply_force(push);
        affected += 1;
    }
    affected
}
