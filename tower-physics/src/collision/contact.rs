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
use crate::body::BodyHandle;
use crate::math::Vector2;

/// Geometric result of a narrow-phase test between two rectangles
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactGeometry {
    /// Approximate world-space contact point
    pub point: Vector2,
    /// Unit normal pointing from the first body toward the second
    pub normal: Vector2,
    /// Overlap depth along `normal`, always positive
    pub penetration: f64,
}

/// Contact between two registered bodies
///
/// Contacts are rebuilt every step and never persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// First body of the pair (earlier in slot order)
    pub body_a: BodyHandle,
    /// Second body of the pair
    pub body_b: BodyHandle,
    /// Approximate world-space contact point
    pub point: Vector2,
    /// Unit normal from `body_a` toward `body_b`
    pub normal: Vector2,
    /// Overlap depth along `normal`
    pub penetration: f64,
}

impl Contact {
    /// Attach body handles to a narrow-phase result
    pub fn new(body_a: BodyHandle, body_b: BodyHandle, geometry: ContactGeometry) -> Self {
        Contact {
            body_a,
            body_b,
            point: geometry.point,
            normal: geometry.normal,
            penetration: geometry.penetration,
        }
    }

    /// Check whether `handle` is one of the two bodies
    pub fn involves(&self, handle: BodyHandle) -> bool {
        self.body_a == handle || self.body_b == handle
    }
}
