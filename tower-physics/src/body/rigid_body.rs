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
//! Rectangular rigid bodies
//!
//! A [`RigidBody`] is an oriented rectangle with linear and angular state,
//! force/torque accumulators and derived mass data. Kinematic state is
//! public; mass, dimensions and the static flag sit behind setters so the
//! inverse mass and inverse inertia can never drift out of sync with them.

use crate::body::Material;
use crate::math::{Aabb, Vector2};

/// Smallest mass a dynamic body may have
pub const MIN_MASS: f64 = 1e-3;

/// Smallest width or height a body may have
pub const MIN_DIMENSION: f64 = 1e-3;

/// Default restitution of a freshly created body
pub const DEFAULT_RESTITUTION: f64 = 0.5;

/// Default friction coefficient of a freshly created body
pub const DEFAULT_FRICTION: f64 = 0.3;

/// Oriented rectangular rigid body
///
/// # Examples
///
/// ```
/// use tower_physics::body::RigidBody;
/// use tower_physics::math::Vector2;
///
/// let mut body = RigidBody::new(Vector2::zero(), 1.0, 1.0, 1.0);
/// body.apply_impulse(Vector2::new(0.0, 10.0), body.position);
/// assert_eq!(body.velocity.y, 10.0);
/// assert!(body.contains_point(Vector2::new(0.25, -0.25)));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RigidBody {
    /// Center of the rectangle in world space
    pub position: Vector2,
    /// Linear velocity
    pub velocity: Vector2,
    /// Force accumulated since the last integration step
    pub force: Vector2,
    /// Rotation in radians, counter-clockwise
    pub rotation: f64,
    /// Angular velocity in radians per second
    pub angular_velocity: f64,
    /// Torque accumulated since the last integration step
    pub torque: f64,
    /// Bounciness coefficient in `[0, 1]`
    pub restitution: f64,
    /// Coulomb friction coefficient
    pub friction: f64,
    /// Inactive bodies are skipped by integration and effects
    pub is_active: bool,
    /// Material tag
    pub material: Material,
    mass: f64,
    inverse_mass: f64,
    inertia: f64,
    inverse_inertia: f64,
    width: f64,
    height: f64,
    is_static: bool,
}

impl RigidBody {
    /// Create a dynamic body
    ///
    /// Non-finite mass and dimensions, or values below [`MIN_MASS`] and
    /// [`MIN_DIMENSION`], are raised to those minimums with a warning.
    pub fn new(position: Vector2, width: f64, height: f64, mass: f64) -> Self {
        let mut body = RigidBody {
            position,
            velocity: Vector2::zero(),
            force: Vector2::zero(),
            rotation: 0.0,
            angular_velocity: 0.0,
            torque: 0.0,
            restitution: DEFAULT_RESTITUTION,
            friction: DEFAULT_FRICTION,
            is_active: true,
            material: Material::Normal,
            mass: clamp_mass(mass),
            inverse_mass: 0.0,
            inertia: 0.0,
            inverse_inertia: 0.0,
            width: clamp_dimension(width),
            height: clamp_dimension(height),
            is_static: false,
        };
        body.update_mass_data();
        body
    }

    /// Create an immovable body such as the ground or a platform
    pub fn new_static(position: Vector2, width: f64, height: f64) -> Self {
        let mut body = RigidBody::new(position, width, height, 1.0);
        body.set_static(true);
        body
    }

    /// Set the restitution coefficient
    pub fn with_restitution(mut self, restitution: f64) -> Self {
        self.restitution = restitution;
        self
    }

    /// Set the friction coefficient
    pub fn with_friction(mut self, friction: f64) -> Self {
        self.friction = friction;
        self
    }

    /// Set the rotation in radians
    pub fn with_rotation(mut self, rotation: f64) -> Self {
        self.rotation = rotation;
        self
    }

    /// Set the initial linear velocity
    pub fn with_velocity(mut self, velocity: Vector2) -> Self {
        self.velocity = velocity;
        self
    }

    /// Set the material tag
    pub fn with_material(mut self, material: Material) -> Self {
        self.material = material;
        self
    }

    /// Mass of the body
    pub fn mass(&self) -> f64 {
        self.mass
    }

    /// Inverse mass; zero for static bodies
    pub fn inverse_mass(&self) -> f64 {
        self.inverse_mass
    }

    /// Moment of inertia around the center
    pub fn inertia(&self) -> f64 {
        self.inertia
    }

    /// Inverse moment of inertia; zero for static bodies
    pub fn inverse_inertia(&self) -> f64 {
        self.inverse_inertia
    }

    /// Full width
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Full height
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Half extents `(width / 2, height / 2)`
    pub fn half_extents(&self) -> Vector2 {
        Vector2::new(self.width * 0.5, self.height * 0.5)
    }

    /// Whether the body is immovable
    pub fn is_static(&self) -> bool {
        self.is_static
    }

    /// Change the mass, raising it to [`MIN_MASS`] if needed, and recompute mass data
    pub fn set_mass(&mut self, mass: f64) {
        self.mass = clamp_mass(mass);
        self.update_mass_data();
    }

    /// Change the dimensions, raising them to [`MIN_DIMENSION`] if needed, and recompute mass data
    pub fn set_dimensions(&mut self, width: f64, height: f64) {
        self.width = clamp_dimension(width);
        self.height = clamp_dimension(height);
        self.update_mass_data();
    }

    /// Toggle the static flag and recompute mass data
    ///
    /// Making a body static also clears its linear and angular velocity.
    pub fn set_static(&mut self, is_static: bool) {
        self.is_static = is_static;
        if is_static {
            self.velocity = Vector2::zero();
            self.angular_velocity = 0.0;
        }
        self.update_mass_data();
    }

    /// Recompute inverse mass, inertia and inverse inertia
    pub fn update_mass_data(&mut self) {
        self.inertia = self.mass * (self.width * self.width + self.height * self.height) / 12.0;
        if self.is_static {
            self.inverse_mass = 0.0;
            self.inverse_inertia = 0.0;
        } else {
            self.inverse_mass = 1.0 / self.mass;
            self.inverse_inertia = 1.0 / self.inertia;
        }
    }

    /// Accumulate a force, consumed at the next integration step
    pub fn apply_force(&mut self, force: Vector2) {
        self.force += force;
    }

    /// Accumulate a torque, consumed at the next integration step
    pub fn apply_torque(&mut self, torque: f64) {
        self.torque += torque;
    }

    /// Apply an instantaneous impulse at a world-space point
    ///
    /// Changes linear velocity by `impulse / mass` and angular velocity by
    /// `cross(point - position, impulse) / inertia`.
    pub fn apply_impulse(&mut self, impulse: Vector2, contact_point: Vector2) {
        self.velocity += impulse * self.inverse_mass;
        let r = contact_point - self.position;
        self.angular_velocity += r.cross(impulse) * self.inverse_inertia;
    }

    /// Velocity of the material point currently at `point`
    pub fn velocity_at_point(&self, point: Vector2) -> Vector2 {
        let r = point - self.position;
        self.velocity + r.perp() * self.angular_velocity
    }

    /// Inclusive point containment in the body's rotated frame
    pub fn contains_point(&self, point: Vector2) -> bool {
        let local = (point - self.position).rotated(-self.rotation);
        let half = self.half_extents();
        local.x >= -half.x && local.x <= half.x && local.y >= -half.y && local.y <= half.y
    }

    /// World-space corners, counter-clockwise starting at the local bottom-left
    pub fn vertices(&self) -> [Vector2; 4] {
        let half = self.half_extents();
        [
            Vector2::new(-half.x, -half.y),
            Vector2::new(half.x, -half.y),
            Vector2::new(half.x, half.y),
            Vector2::new(-half.x, half.y),
        ]
        .map(|corner| self.position + corner.rotated(self.rotation))
    }

    /// Axis-aligned bounds of the rotated rectangle
    pub fn aabb(&self) -> Aabb {
        Aabb::from_points(&self.vertices())
    }

    /// Linear speed
    pub fn speed(&self) -> f64 {
        self.velocity.length()
    }

    /// Check that every numeric field is finite and the coefficients are in range
    pub fn validate(&self) -> Result<(), String> {
        if !self.position.is_valid() || !self.velocity.is_valid() || !self.force.is_valid() {
            return Err("position, velocity and force must be finite".to_string());
        }
        if !self.rotation.is_finite() || !self.angular_velocity.is_finite() || !self.torque.is_finite() {
            return Err("rotation, angular velocity and torque must be finite".to_string());
        }
        if !(0.0..=1.0).contains(&self.restitution) {
            return Err(format!("restitution {} must be within [0, 1]", self.restitution));
        }
        if !(self.friction >= 0.0 && self.friction.is_finite()) {
            return Err(format!("friction {} must be non-negative and finite", self.friction));
        }
        Ok(())
    }
}

impl Default for RigidBody {
    fn default() -> Self {
        RigidBody::new(Vector2::zero(), 1.0, 1.0, 1.0)
    }
}

fn clamp_mass(mass: f64) -> f64 {
    if !(mass.is_finite() && mass >= MIN_MASS) {
        log::warn!("Clamping invalid body mass {} to {}", mass, MIN_MASS);
        return MIN_MASS;
    }
    mass
}

fn clamp_dimension(extent: f64) -> f64 {
    if !(extent.is_finite() && extent >= MIN_DIMENSION) {
        log::warn!("Clamping invalid body dimension {} to {}", extent, MIN_DIMENSION);
        return MIN_DIMENSION;
    }
    extent
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_mass_data() {
        let body = RigidBody::new(Vector2::zero(), 2.0, 1.0, 4.0);
        assert_eq!(body.inverse_mass(), 0.25);
        let inertia = 4.0 * (4.0 + 1.0) / 12.0;
        assert!((body.inertia() - inertia).abs() < 1e-12);
        assert!((body.inverse_inertia() - 1.0 / inertia).abs() < 1e-12);
    }

    #[test]
    fn test_static_body_has_zero_inverse_mass() {
        let body = RigidBody::new_static(Vector2::zero(), 20.0, 1.0);
        assert!(body.is_static());
        assert_eq!(body.inverse_mass(), 0.0);
        assert_eq!(body.inverse_inertia(), 0.0);
    }

    #[test]
    fn test_invalid_mass_is_clamped() {
        let zero = RigidBody::new(Vector2::zero(), 1.0, 1.0, 0.0);
        assert_eq!(zero.mass(), MIN_MASS);
        assert!(zero.inverse_mass().is_finite());

        let mut body = RigidBody::default();
        body.set_mass(-3.0);
        assert_eq!(body.mass(), MIN_MASS);
        body.set_mass(f64::NAN);
        assert_eq!(body.mass(), MIN_MASS);
        body.set_mass(MIN_MASS / 10.0);
        assert_eq!(body.mass(), MIN_MASS);
        body.set_mass(MIN_MASS);
        assert_eq!(body.mass(), MIN_MASS);
    }

    #[test]
    fn test_invalid_dimensions_are_clamped() {
        let body = RigidBody::new(Vector2::zero(), 0.0, -1.0, 1.0);
        assert_eq!(body.width(), MIN_DIMENSION);
        assert_eq!(body.height(), MIN_DIMENSION);
        assert!(body.inverse_inertia().is_finite());
    }

    #[test]
    fn test_setters_recompute_mass_data() {
        let mut body = RigidBody::default();
        body.set_mass(2.0);
        assert_eq!(body.inverse_mass(), 0.5);

        body.set_dimensions(2.0, 2.0);
        assert!((body.inertia() - 2.0 * 8.0 / 12.0).abs() < 1e-12);

        body.velocity = Vector2::new(1.0, 1.0);
        body.set_static(true);
        assert_eq!(body.inverse_mass(), 0.0);
        assert_eq!(body.velocity, Vector2::zero());

        body.set_static(false);
        assert_eq!(body.inverse_mass(), 0.5);
    }

    #[test]
    fn test_force_has_no_immediate_effect() {
        let mut body = RigidBody::default();
        body.apply_force(Vector2::new(5.0, 0.0));
        body.apply_force(Vector2::new(0.0, 2.0));
        assert_eq!(body.force, Vector2::new(5.0, 2.0));
        assert_eq!(body.velocity, Vector2::zero());
    }

    #[test]
    fn test_off_center_impulse_spins_body() {
        let mut body = RigidBody::default();
        body.apply_impulse(Vector2::new(0.0, 1.0), Vector2::new(0.5, 0.0));
        assert_eq!(body.velocity, Vector2::new(0.0, 1.0));
        // r x J = 0.5 * 1.0, inertia of a unit square is 1/6
        assert!((body.angular_velocity - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_velocity_at_point() {
        let mut body = RigidBody::default();
        body.velocity = Vector2::new(1.0, 0.0);
        body.angular_velocity = 2.0;
        let v = body.velocity_at_point(Vector2::new(0.0, 1.0));
        assert_eq!(v, Vector2::new(-1.0, 0.0));
    }

    #[test]
    fn test_contains_point_respects_rotation() {
        let body = RigidBody::new(Vector2::new(1.0, 1.0), 4.0, 1.0, 1.0);
        assert!(body.contains_point(Vector2::new(2.5, 1.0)));
        assert!(!body.contains_point(Vector2::new(1.0, 2.5)));

        let rotated = body.with_rotation(FRAC_PI_2);
        assert!(!rotated.contains_point(Vector2::new(2.5, 1.0)));
        assert!(rotated.contains_point(Vector2::new(1.0, 2.5)));
    }

    #[test]
    fn test_vertices_and_aabb() {
        let body = RigidBody::new(Vector2::new(1.0, 2.0), 2.0, 4.0, 1.0);
        let v = body.vertices();
        assert_eq!(v[0], Vector2::new(0.0, 0.0));
        assert_eq!(v[2], Vector2::new(2.0, 4.0));

        let rotated = body.with_rotation(FRAC_PI_2).aabb();
        assert!((rotated.min.x - -1.0).abs() < 1e-12);
        assert!((rotated.max.x - 3.0).abs() < 1e-12);
        assert!((rotated.min.y - 1.0).abs() < 1e-12);
        assert!((rotated.max.y - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_validate() {
        assert!(RigidBody::default().validate().is_ok());
        assert!(RigidBody::default().with_restitution(1.5).validate().is_err());
        assert!(RigidBody::default().with_friction(-0.1).validate().is_err());

        let mut body = RigidBody::default();
        body.position.x = f64::NAN;
        assert!(body.validate().is_err());
    }
}
