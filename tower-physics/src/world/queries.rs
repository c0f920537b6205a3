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
//! Read-only spatial queries

use crate::body::{BodyHandle, BodyRegistry};
use crate::math::{Aabb, Vector2};

/// Whether `point` lies inside the body, edges included
///
/// Unknown or stale handles return `false`.
pub fn is_point_in_body(registry: &BodyRegistry, handle: BodyHandle, point: Vector2) -> bool {
    registry
        .get(handle)
        .is_some_and(|body| body.contains_point(point))
}

/// Handles of every body whose rotated bounds touch the area `[min, max]`
///
/// Static and inactive bodies are included. Results follow slot order.
pub fn bodies_in_area(registry: &BodyRegistry, min: Vector2, max: Vector2) -> Vec<BodyHandle> {
    let area = Aabb::new(min, max);
    registry
        .iter()
        .filter(|(_, body)| body.aabb().overlaps(&area))
        .map(|(handle, _)| handle)
        .collect()
}

/// Nearest active body whose center is strictly within `max_distance`
///
/// Ties keep the body earliest in slot order.
pub fn find_closest_body(
    registry: &BodyRegistry,
    point: Vector2,
    max_distance: f64,
) -> Option<BodyHandle> {
    let mut closest = None;
    let mut best = max_distance;
    for (handle, body) in registry.iter() {
        if !body.is_active {
            continue;
        }
        let distance = body.position.distance(point);
        if distance < best {
            best = distance;
            closest = Some(handle);
        }
    }
    closest
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::RigidBody;

    fn registry_with(bodies: Vec<RigidBody>) -> (BodyRegistry, Vec<BodyHandle>) {
        let mut registry = BodyRegistry::new();
        let handles = bodies.into_iter().map(|b| registry.insert(b)).collect();
        (registry, handles)
    }

    #[test]
    fn test_point_in_body() {
        let (mut registry, handles) = registry_with(vec![RigidBody::new(Vector2::zero(), 2.0, 1.0, 1.0)]);
        let h = handles[0];
        assert!(is_point_in_body(&registry, h, Vector2::new(1.0, 0.5)));
        assert!(!is_point_in_body(&registry, h, Vector2::new(1.01, 0.0)));

        registry.remove(h);
        assert!(!is_point_in_body(&registry, h, Vector2::zero()));
    }

    #[test]
    fn test_bodies_in_area_uses_rotated_bounds() {
        let (registry, handles) = registry_with(vec![
            RigidBody::new(Vector2::zero(), 1.0, 1.0, 1.0).with_rotation(std::f64::consts::FRAC_PI_4),
            RigidBody::new_static(Vector2::new(5.0, 0.0), 1.0, 1.0),
        ]);
        // Rotated square reaches x = 0.707
        let found = bodies_in_area(&registry, Vector2::new(0.6, -0.1), Vector2::new(0.65, 0.1));
        assert_eq!(found, vec![handles[0]]);

        let all = bodies_in_area(&registry, Vector2::new(-10.0, -10.0), Vector2::new(10.0, 10.0));
        assert_eq!(all, handles);
    }

    #[test]
    fn test_find_closest_body() {
        let mut inactive = RigidBody::new(Vector2::new(0.1, 0.0), 1.0, 1.0, 1.0);
        inactive.is_active = false;
        let (registry, handles) = registry_with(vec![
            inactive,
            RigidBody::new(Vector2::new(2.0, 0.0), 1.0, 1.0, 1.0),
            RigidBody::new(Vector2::new(-2.0, 0.0), 1.0, 1.0, 1.0),
            RigidBody::new(Vector2::new(1.5, 0.0), 1.0, 1.0, 1.0),
        ]);

        assert_eq!(find_closest_body(&registry, Vector2::zero(), 10.0), Some(handles[3]));
        assert_eq!(find_closest_body(&registry, Vector2::zero(), 1.9), Some(handles[3]));
        // Strictly closer than the limit
        assert_eq!(find_closest_body(&registry, Vector2::zero(), 1.5), None);
    }

    #[test]
    fn test_find_closest_tie_keeps_earliest() {
        let (registry, handles) = registry_with(vec![
            RigidBody::new(Vector2::new(1.0, 0.0), 1.0, 1.0, 1.0),
            RigidBody::new(Vector2::new(-1.0, 0.0), 1.0, 1.0, 1.0),
        ]);
        assert_eq!(find_closest_body(&registry, Vector2::zero(), 5.0), Some(handles[0]));
    }
}
