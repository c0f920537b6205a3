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
//! Tower balance check
//!
//! A tower is stable when every block is nearly at rest and the
//! mass-weighted center of the blocks sits above the lowest block's base.

use crate::body::{BodyHandle, BodyRegistry, RigidBody};

/// Linear speed above which a block counts as moving
pub const LINEAR_REST_THRESHOLD: f64 = 0.1;
/// Angular speed above which a block counts as moving
pub const ANGULAR_REST_THRESHOLD: f64 = 0.1;

/// Check whether the listed blocks form a stable tower
///
/// An empty list is stable. Any unknown or stale handle makes the tower
/// unstable. The lowest block is the one with the smallest center `y`,
/// earliest in `blocks` on ties.
pub fn check_tower_stability(registry: &BodyRegistry, blocks: &[BodyHandle]) -> bool {
    if blocks.is_empty() {
        return true;
    }

    let Some(tower) = blocks
        .iter()
        .map(|&handle| registry.get(handle))
        .collect::<Option<Vec<&RigidBody>>>()
    else {
        return false;
    };

    let moving = tower.iter().any(|body| {
        body.speed() > LINEAR_REST_THRESHOLD || body.angular_velocity.abs() > ANGULAR_REST_THRESHOLD
    });
    if moving {
        return false;
    }

    let mut lowest = tower[0];
    for body in &tower[1..] {
        if body.position.y < lowest.position.y {
            lowest = body;
        }
    }

    let total_mass: f64 = tower.iter().map(|body| body.mass()).sum();
    let center_x = tower.iter().map(|body| body.position.x * body.mass()).sum::<f64>() / total_mass;

    let half_width = lowest.width() / 2.0;
    center_x >= lowest.position.x - half_width && center_x <= lowest.position.x + half_width
}
