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
//! Engine configuration
//!
//! # Environment Configuration
//!
//! [`EngineConfig::from_env`] overlays these variables on the defaults:
//! ```bash
//! export TOWER_PHYSICS_TICK_MS=16      # background loop sleep, milliseconds
//! export TOWER_PHYSICS_MAX_STEP=0.05   # background dt clamp, seconds
//! ```

use std::time::Duration;

use crate::math::Vector2;

/// Environment variable overriding [`EngineConfig::tick_interval`]
pub const TICK_MS_ENV: &str = "TOWER_PHYSICS_TICK_MS";
/// Environment variable overriding [`EngineConfig::max_step`]
pub const MAX_STEP_ENV: &str = "TOWER_PHYSICS_MAX_STEP";

/// Who advances the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SteppingMode {
    /// The caller drives every step through `update(dt)`
    #[default]
    Manual,
    /// An internal thread steps at a wall-clock cadence once started
    Background,
}

/// Configuration for a [`PhysicsEngine`](crate::engine::PhysicsEngine)
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Gravitational acceleration
    pub gravity: Vector2,
    /// Nominal step length, exported with the state
    pub time_step: f64,
    /// Solver velocity iterations
    pub velocity_iterations: u32,
    /// Solver position iterations
    pub position_iterations: u32,
    /// Linear velocity multiplier applied every step
    pub linear_damping: f64,
    /// Angular velocity multiplier applied every step
    pub angular_damping: f64,
    /// Fraction of excess penetration corrected per step
    pub correction_percent: f64,
    /// Penetration tolerated without correction
    pub penetration_slop: f64,
    /// Upper bound on the background loop's measured dt
    pub max_step: f64,
    /// Sleep between background steps
    pub tick_interval: Duration,
    /// Who advances the simulation
    pub stepping_mode: SteppingMode,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            gravity: Vector2::new(0.0, -9.8),
            time_step: 1.0 / 60.0,
            velocity_iterations: 8,
            position_iterations: 3,
            linear_damping: 0.98,
            angular_damping: 0.98,
            correction_percent: 0.2,
            penetration_slop: 0.01,
            max_step: 0.05,
            tick_interval: Duration::from_millis(16),
            stepping_mode: SteppingMode::Manual,
        }
    }
}

impl EngineConfig {
    /// Defaults with the background tuning taken from the environment
    ///
    /// Unset, unparsable and non-positive values keep their defaults.
    /// Unparsable values are reported with a warning.
    pub fn from_env() -> Self {
        let mut config = EngineConfig::default();

        if let Some(ms) = read_env::<u64>(TICK_MS_ENV).filter(|ms| *ms > 0) {
            config.tick_interval = Duration::from_millis(ms);
        }
        if let Some(step) = read_env::<f64>(MAX_STEP_ENV).filter(|s| s.is_finite() && *s > 0.0) {
            config.max_step = step;
        }

        config
    }

    /// Set gravity
    pub fn with_gravity(mut self, gravity: Vector2) -> Self {
        self.gravity = gravity;
        self
    }

    /// Set the stepping mode
    pub fn with_stepping_mode(mut self, mode: SteppingMode) -> Self {
        self.stepping_mode = mode;
        self
    }

    /// Set velocity and position iteration counts
    pub fn with_iterations(mut self, velocity: u32, position: u32) -> Self {
        self.velocity_iterations = velocity;
        self.position_iterations = position;
        self
    }

    /// Set per-step damping multipliers
    pub fn with_damping(mut self, linear: f64, angular: f64) -> Self {
        assert!(
            (0.0..=1.0).contains(&linear) && (0.0..=1.0).contains(&angular),
            "Damping must be within [0, 1]"
        );
        self.linear_damping = linear;
        self.angular_damping = angular;
        self
    }

    /// Set positional correction parameters
    pub fn with_correction(mut self, percent: f64, slop: f64) -> Self {
        self.correction_percent = percent;
        self.penetration_slop = slop;
        self
    }

    /// Set the background loop cadence and dt clamp
    pub fn with_tick(mut self, interval: Duration, max_step: f64) -> Self {
        assert!(max_step > 0.0, "Max step must be positive");
        self.tick_interval = interval;
        self.max_step = max_step;
        self
    }
}

fn read_env<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    match raw.trim().parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            log::warn!("Ignoring {}={:?}: not a valid value", key, raw);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.gravity, Vector2::new(0.0, -9.8));
        assert_eq!(config.velocity_iterations, 8);
        assert_eq!(config.position_iterations, 3);
        assert_eq!(config.tick_interval, Duration::from_millis(16));
        assert_eq!(config.stepping_mode, SteppingMode::Manual);
    }

    #[test]
    fn test_builders() {
        let config = EngineConfig::default()
            .with_gravity(Vector2::zero())
            .with_stepping_mode(SteppingMode::Background)
            .with_iterations(4, 2)
            .with_damping(1.0, 0.5)
            .with_tick(Duration::from_millis(5), 0.02);
        assert_eq!(config.gravity, Vector2::zero());
        assert_eq!(config.stepping_mode, SteppingMode::Background);
        assert_eq!(config.velocity_iterations, 4);
        assert_eq!(config.angular_damping, 0.5);
        assert_eq!(config.max_step, 0.02);
    }

    #[test]
    #[should_panic(expected = "Damping must be within [0, 1]")]
    fn test_invalid_damping() {
        EngineConfig::default().with_damping(2.0, 0.5);
    }

    // Both variables are handled in one test so parallel tests never race on them
    #[test]
    fn test_from_env() {
        std::env::set_var(TICK_MS_ENV, "5");
        std::env::set_var(MAX_STEP_ENV, "fast");
        let config = EngineConfig::from_env();
        assert_eq!(config.tick_interval, Duration::from_millis(5));
        assert_eq!(config.max_step, 0.05);

        std::env::set_var(TICK_MS_ENV, "0");
        std::env::set_var(MAX_STEP_ENV, "0.1");
        let config = EngineConfig::from_env();
        assert_eq!(config.tick_interval, Duration::from_millis(16));
        assert_eq!(config.max_step, 0.1);

        std::env::remove_var(TICK_MS_ENV);
        std::env::remove_var(MAX_STEP_ENV);
    }
}
