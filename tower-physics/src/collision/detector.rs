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
//! Collision detection for oriented rectangles
//!
//! Detection is a two-phase pipeline run on every pair of bodies:
//!
//! 1. **Broad phase**: the axis-aligned bounds of both rotated rectangles
//!    must overlap, otherwise the pair is rejected.
//! 2. **Narrow phase**: the Separating Axis Theorem is applied to the edge
//!    normals of both rectangles. Any axis with zero or negative overlap
//!    separates the pair. Otherwise the axis of least overlap becomes the
//!    contact normal and the overlap its penetration depth.
//!
//! The contact point is the midpoint between the two centers. This is a
//! coarse single-point approximation, not a clipped contact manifold.
//!
//! # Ordering
//!
//! Pairs are enumerated as `(i, j)` with `i < j` over registry slot order.
//! With the `parallel` feature enabled rows are evaluated on the Rayon pool
//! and collected back in the same order, so the contact list is identical
//! to the sequential path.

use crate::body::{BodyHandle, BodyRegistry, RigidBody};
use crate::collision::{Contact, ContactGeometry};
use crate::math::Vector2;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Below this many bodies the pairwise loop stays on the calling thread
#[cfg(feature = "parallel")]
const PARALLEL_THRESHOLD: usize = 64;

const PARALLEL_AXIS_EPSILON: f64 = 1e-9;

/// Broad-phase test on the rotated rectangles' axis-aligned bounds
pub fn aabb_overlap(a: &RigidBody, b: &RigidBody) -> bool {
    a.aabb().overlaps(&b.aabb())
}

/// Full two-phase test between two bodies
///
/// Returns `None` when the bodies are disjoint or merely touching.
pub fn collide(a: &RigidBody, b: &RigidBody) -> Option<ContactGeometry> {
    if !aabb_overlap(a, b) {
        return None;
    }
    sat_collide(a, b)
}

fn sat_collide(a: &RigidBody, b: &RigidBody) -> Option<ContactGeometry> {
    let verts_a = a.vertices();
    let verts_b = b.vertices();

    let axes_a = edge_axes(&verts_a);
    let axes_b = edge_axes(&verts_b);

    let mut min_overlap = f64::MAX;
    let mut min_axis = Vector2::zero();

    let candidates = axes_a.iter().chain(
        axes_b
            .iter()
            .filter(|axis| axes_a.iter().all(|seen| seen.cross(**axis).abs() > PARALLEL_AXIS_EPSILON)),
    );

    for axis in candidates {
        let (min_a, max_a) = project(&verts_a, *axis);
        let (min_b, max_b) = project(&verts_b, *axis);
        let overlap = max_a.min(max_b) - min_a.max(min_b);

        if overlap <= 0.0 {
            return None;
        }
        if overlap < min_overlap {
            min_overlap = overlap;
            min_axis = *axis;
        }
    }

    let direction = b.position - a.position;
    let normal = if direction.dot(min_axis) < 0.0 {
        -min_axis
    } else {
        min_axis
    };

    Some(ContactGeometry {
        point: a.position + direction * 0.5,
        normal,
        penetration: min_overlap,
    })
}

/// Unit normals of the first two edges; the other two are antiparallel
fn edge_axes(vertices: &[Vector2; 4]) -> [Vector2; 2] {
    [0, 1].map(|i| (vertices[i + 1] - vertices[i]).perp().normalized())
}

fn project(vertices: &[Vector2; 4], axis: Vector2) -> (f64, f64) {
    vertices.iter().fold((f64::MAX, f64::MIN), |(min, max), v| {
        let p = v.dot(axis);
        (min.min(p), max.max(p))
    })
}

fn row_contacts<'a>(
    bodies: &'a [(BodyHandle, &'a RigidBody)],
    i: usize,
) -> impl Iterator<Item = Contact> + 'a {
    let (handle_a, a) = bodies[i];
    bodies[i + 1..]
        .iter()
        .filter_map(move |&(handle_b, b)| collide(a, b).map(|g| Contact::new(handle_a, handle_b, g)))
}

/// Detect every contact among the registered bodies in deterministic order
pub fn detect_contacts(registry: &BodyRegistry) -> Vec<Contact> {
    let bodies: Vec<(BodyHandle, &RigidBody)> = registry.iter().collect();

    #[cfg(feature = "parallel")]
    {
        if bodies.len() >= PARALLEL_THRESHOLD {
            return (0..bodies.len())
                .into_par_iter()
                .flat_map_iter(|i| row_contacts(&bodies, i))
                .collect();
        }
    }

    (0..bodies.len())
        .flat_map(|i| row_contacts(&bodies, i))
        .collect()
}
