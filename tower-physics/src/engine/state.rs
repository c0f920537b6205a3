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
//! Serializable engine snapshots
//!
//! The state document is plain JSON with camelCase keys:
//!
//! ```json
//! {
//!   "formatVersion": "1.0.0",
//!   "gravity": { "x": 0.0, "y": -9.8 },
//!   "timeStep": 0.016666666666666666,
//!   "velocityIterations": 8,
//!   "positionIterations": 3,
//!   "isRunning": false,
//!   "isPaused": false,
//!   "bodies": [ { "id": "body_0_0", "position": { "x": 0.0, "y": 0.0 }, ... } ]
//! }
//! ```
//!
//! Derived mass data is written for consumers but recomputed on import.

use semver::Version;
use serde::{Deserialize, Serialize};

use crate::body::{BodyHandle, BodyRegistry, Material, RigidBody, MIN_DIMENSION, MIN_MASS};
use crate::error::{EngineError, Result};
use crate::math::Vector2;

/// Format version written by this build
pub const FORMAT_VERSION: &str = "1.0.0";

/// Snapshot of one registered body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct BodyState {
    pub id: BodyHandle,
    pub position: Vector2,
    pub velocity: Vector2,
    pub force: Vector2,
    pub rotation: f64,
    pub angular_velocity: f64,
    pub torque: f64,
    pub mass: f64,
    pub inverse_mass: f64,
    pub inertia: f64,
    pub inverse_inertia: f64,
    pub restitution: f64,
    pub friction: f64,
    pub is_static: bool,
    pub is_active: bool,
    pub material: Material,
    pub width: f64,
    pub height: f64,
}

impl BodyState {
    /// Capture a registered body
    pub fn capture(id: BodyHandle, body: &RigidBody) -> Self {
        BodyState {
            id,
            position: body.position,
            velocity: body.velocity,
            force: body.force,
            rotation: body.rotation,
            angular_velocity: body.angular_velocity,
            torque: body.torque,
            mass: body.mass(),
            inverse_mass: body.inverse_mass(),
            inertia: body.inertia(),
            inverse_inertia: body.inverse_inertia(),
            restitution: body.restitution,
            friction: body.friction,
            is_static: body.is_static(),
            is_active: body.is_active,
            material: body.material,
            width: body.width(),
            height: body.height(),
        }
    }

    /// Rebuild the body, rejecting values that would need clamping
    pub fn to_body(&self) -> std::result::Result<RigidBody, String> {
        if !(self.mass.is_finite() && self.mass >= MIN_MASS) {
            return Err(format!(
                "{}: mass {} must be finite and at least {}",
                self.id, self.mass, MIN_MASS
            ));
        }
        let dimensions_ok = [self.width, self.height]
            .iter()
            .all(|d| d.is_finite() && *d >= MIN_DIMENSION);
        if !dimensions_ok {
            return Err(format!(
                "{}: dimensions {}x{} must be finite and at least {}",
                self.id, self.width, self.height, MIN_DIMENSION
            ));
        }

        let mut body = RigidBody::new(self.position, self.width, self.height, self.mass)
            .with_rotation(self.rotation)
            .with_velocity(self.velocity)
            .with_restitution(self.restitution)
            .with_friction(self.friction)
            .with_material(self.material);
        body.force = self.force;
        body.angular_velocity = self.angular_velocity;
        body.torque = self.torque;
        body.is_active = self.is_active;
        if self.is_static {
            body.set_static(true);
        }

        body.validate().map_err(|e| format!("{}: {}", self.id, e))?;
        Ok(body)
    }
}

/// Snapshot of a whole engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineState {
    /// Semver of the document layout
    pub format_version: String,
    /// Gravitational acceleration
    pub gravity: Vector2,
    /// Nominal step length
    pub time_step: f64,
    /// Solver velocity iterations
    pub velocity_iterations: u32,
    /// Solver position iterations
    pub position_iterations: u32,
    /// Whether the background thread was running at export time
    pub is_running: bool,
    /// Whether the simulation was paused at export time
    pub is_paused: bool,
    /// Every registered body in slot order
    pub bodies: Vec<BodyState>,
}

impl EngineState {
    /// Serialize as pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a JSON document without validating it
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Check that this build can read the document's format version
    pub fn check_version(&self) -> Result<()> {
        if is_version_compatible(&self.format_version, FORMAT_VERSION) {
            Ok(())
        } else {
            Err(EngineError::IncompatibleVersion {
                found: self.format_version.clone(),
                supported: FORMAT_VERSION.to_string(),
            })
        }
    }

    /// Validate the whole document and build the registry it describes
    ///
    /// Nothing is returned unless every body is valid and every id is unique.
    pub fn build_registry(&self) -> Result<BodyRegistry> {
        self.check_version()?;

        if !self.gravity.is_valid() {
            return Err(EngineError::InvalidState("gravity must be finite".to_string()));
        }
        if !(self.time_step.is_finite() && self.time_step > 0.0) {
            return Err(EngineError::InvalidState(format!(
                "time step {} must be positive",
                self.time_step
            )));
        }

        let entries = self
            .bodies
            .iter()
            .map(|state| state.to_body().map(|body| (state.id, body)))
            .collect::<std::result::Result<Vec<_>, String>>()
            .map_err(EngineError::InvalidState)?;

        BodyRegistry::from_entries(entries).map_err(EngineError::InvalidState)
    }
}

/// Same major version, and a minor version no newer than ours
///
/// For 0.x.y versions the minor must match exactly.
fn is_version_compatible(document_version: &str, supported_version: &str) -> bool {
    let (Ok(document), Ok(supported)) = (
        Version::parse(document_version),
        Version::parse(supported_version),
    ) else {
        return false;
    };

    if document.major != supported.major {
        return false;
    }
    if document.major != 0 {
        document.minor <= supported.minor
    } else {
        document.minor == supported.minor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_state() -> EngineState {
        let mut registry = BodyRegistry::new();
        registry.insert(RigidBody::new(Vector2::new(1.0, 2.0), 1.0, 2.0, 3.0));
        registry.insert(RigidBody::new_static(Vector2::new(0.0, -10.0), 20.0, 1.0));
        EngineState {
            format_version: FORMAT_VERSION.to_string(),
            gravity: Vector2::new(0.0, -9.8),
            time_step: 1.0 / 60.0,
            velocity_iterations: 8,
            position_iterations: 3,
            is_running: false,
            is_paused: false,
            bodies: registry.iter().map(|(h, b)| BodyState::capture(h, b)).collect(),
        }
    }

    #[test]
    fn test_json_field_names() {
        let json = sample_state().to_json().unwrap();
        for key in [
            "\"formatVersion\"",
            "\"timeStep\"",
            "\"velocityIterations\"",
            "\"positionIterations\"",
            "\"isRunning\"",
            "\"angularVelocity\"",
            "\"inverseInertia\"",
            "\"isStatic\"",
            "\"id\": \"body_1_0\"",
            "\"material\": \"normal\"",
        ] {
            assert!(json.contains(key), "missing {} in {}", key, json);
        }
    }

    #[test]
    fn test_version_compatibility() {
        assert!(is_version_compatible("1.0.0", "1.0.0"));
        assert!(is_version_compatible("1.0.7", "1.2.0"));
        assert!(!is_version_compatible("1.3.0", "1.2.0"));
        assert!(!is_version_compatible("2.0.0", "1.0.0"));
        assert!(!is_version_compatible("0.2.0", "0.1.0"));
        assert!(!is_version_compatible("one", "1.0.0"));

        let mut state = sample_state();
        state.format_version = "2.0.0".to_string();
        assert!(matches!(
            state.build_registry(),
            Err(EngineError::IncompatibleVersion { .. })
        ));
    }

    #[test]
    fn test_build_registry_recomputes_mass_data() {
        let mut state = sample_state();
        state.bodies[0].inverse_mass = 42.0;
        let registry = state.build_registry().unwrap();
        let body = registry.get(state.bodies[0].id).unwrap();
        assert!((body.inverse_mass() - 1.0 / 3.0).abs() < 1e-12);

        let ground = registry.get(state.bodies[1].id).unwrap();
        assert!(ground.is_static());
        assert_eq!(ground.inverse_mass(), 0.0);
    }

    #[test]
    fn test_invalid_documents_rejected() {
        let mut state = sample_state();
        state.bodies[0].mass = 0.0;
        assert!(matches!(state.build_registry(), Err(EngineError::InvalidState(_))));

        let mut state = sample_state();
        state.bodies[1].width = -1.0;
        assert!(matches!(state.build_registry(), Err(EngineError::InvalidState(_))));

        let mut state = sample_state();
        state.bodies[0].mass = MIN_MASS / 10.0;
        assert!(matches!(state.build_registry(), Err(EngineError::InvalidState(_))));

        let mut state = sample_state();
        state.bodies[0].height = MIN_DIMENSION / 2.0;
        assert!(matches!(state.build_registry(), Err(EngineError::InvalidState(_))));

        let mut state = sample_state();
        state.bodies[1].id = state.bodies[0].id;
        assert!(matches!(state.build_registry(), Err(EngineError::InvalidState(_))));

        let mut state = sample_state();
        state.bodies[0].position.x = f64::NAN;
        assert!(matches!(state.build_registry(), Err(EngineError::InvalidState(_))));

        let mut state = sample_state();
        state.bodies[0].restitution = 1.5;
        assert!(matches!(state.build_registry(), Err(EngineError::InvalidState(_))));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(EngineState::from_json("{"), Err(EngineError::Json(_))));
        let bad_id = sample_state()
            .to_json()
            .unwrap()
            .replace("body_0_0", "block-zero");
        assert!(matches!(EngineState::from_json(&bad_id), Err(EngineError::Json(_))));
    }
}
