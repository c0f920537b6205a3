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
//! Named spells
//!
//! A spell mutates a single body: its material coefficients, its mass or its
//! motion. Spells are looked up by name in a [`SpellRegistry`], which starts
//! with the built-in set and accepts custom spells at runtime.
//!
//! # Built-in spells
//!
//! | name            | effect                                              |
//! |-----------------|-----------------------------------------------------|
//! | `heavy`         | mass ×2, material Heavy                             |
//! | `light`         | mass ×0.5, material Light                           |
//! | `slippery`      | friction ×0.2, material Slippery                    |
//! | `sticky`        | friction ×2, material Sticky                        |
//! | `bouncy`        | restitution 0.9, material Bouncy                    |
//! | `normal`        | mass 1, friction 0.3, restitution 0.5, Normal       |
//! | `impulse_up`    | impulse (0, 10) at the center                       |
//! | `impulse_down`  | impulse (0, -5) at the center                       |
//! | `impulse_left`  | impulse (-5, 0) at the center                       |
//! | `impulse_right` | impulse (5, 0) at the center                        |
//! | `rotate_cw`     | angular velocity +2                                 |
//! | `rotate_ccw`    | angular velocity -2                                 |

use std::collections::HashMap;

use crate::body::{BodyHandle, BodyRegistry, Material, RigidBody, DEFAULT_FRICTION, DEFAULT_RESTITUTION};
use crate::error::{EngineError, Result};
use crate::math::Vector2;

/// A named mutation applied to one body at a time
///
/// Implementations must be `Send + Sync` so the registry can live inside the
/// engine's shared state.
pub trait Spell: Send + Sync {
    /// Unique name the spell is invoked by
    fn name(&self) -> &str;

    /// Apply the spell to a single body
    fn apply(&self, body: &mut RigidBody);
}

/// Spell backed by a plain function
///
/// Used for the built-in set and convenient for simple custom spells.
pub struct FnSpell {
    name: String,
    effect: Box<dyn Fn(&mut RigidBody) + Send + Sync>,
}

impl FnSpell {
    /// Wrap `effect` under `name`
    pub fn new(name: impl Into<String>, effect: impl Fn(&mut RigidBody) + Send + Sync + 'static) -> Self {
        FnSpell {
            name: name.into(),
            effect: Box::new(effect),
        }
    }
}

impl Spell for FnSpell {
    fn name(&self) -> &str {
        &self.name
    }

    fn apply(&self, body: &mut RigidBody) {
        (self.effect)(body)
    }
}

fn impulse(body: &mut RigidBody, impulse: Vector2) {
    let center = body.position;
    body.apply_impulse(impulse, center);
}

fn spin(body: &mut RigidBody, delta: f64) {
    if !body.is_static() {
        body.angular_velocity += delta;
    }
}

/// The twelve spells every registry starts with
pub fn builtin_spells() -> Vec<FnSpell> {
    vec![
        FnSpell::new("heavy", |body| {
            body.set_mass(body.mass() * 2.0);
            body.material = Material::Heavy;
        }),
        FnSpell::new("light", |body| {
            body.set_mass(body.mass() * 0.5);
            body.material = Material::Light;
        }),
        FnSpell::new("slippery", |body| {
            body.friction *= 0.2;
            body.material = Material::Slippery;
        }),
        FnSpell::new("sticky", |body| {
            body.friction *= 2.0;
            body.material = Material::Sticky;
        }),
        FnSpell::new("bouncy", |body| {
            body.restitution = 0.9;
            body.material = Material::Bouncy;
        }),
        FnSpell::new("normal", |body| {
            body.set_mass(1.0);
            body.friction = DEFAULT_FRICTION;
            body.restitution = DEFAULT_RESTITUTION;
            body.material = Material::Normal;
        }),
        FnSpell::new("impulse_up", |body| impulse(body, Vector2::new(0.0, 10.0))),
        FnSpell::new("impulse_down", |body| impulse(body, Vector2::new(0.0, -5.0))),
        FnSpell::new("impulse_left", |body| impulse(body, Vector2::new(-5.0, 0.0))),
        FnSpell::new("impulse_right", |body| impulse(body, Vector2::new(5.0, 0.0))),
        FnSpell::new("rotate_cw", |body| spin(body, 2.0)),
        FnSpell::new("rotate_ccw", |body| spin(body, -2.0)),
    ]
}

/// Spells indexed by name
pub struct SpellRegistry {
    spells: HashMap<String, Box<dyn Spell>>,
}

impl SpellRegistry {
    /// Create a registry holding only the built-in spells
    pub fn new() -> Self {
        let mut spells: HashMap<String, Box<dyn Spell>> = HashMap::new();
        for spell in builtin_spells() {
            spells.insert(spell.name().to_string(), Box::new(spell));
        }
        SpellRegistry { spells }
    }

    /// Create a registry with no spells at all
    pub fn empty() -> Self {
        SpellRegistry {
            spells: HashMap::new(),
        }
    }

    /// Register a custom spell
    ///
    /// Fails with [`EngineError::DuplicateSpell`] if the name is taken,
    /// including by a built-in.
    pub fn register(&mut self, spell: Box<dyn Spell>) -> Result<()> {
        let name = spell.name().to_string();
        if self.spells.contains_key(&name) {
            return Err(EngineError::DuplicateSpell(name));
        }
        log::debug!("Registered spell '{}'", name);
        self.spells.insert(name, spell);
        Ok(())
    }

    /// Look up a spell by name
    pub fn get(&self, name: &str) -> Option<&dyn Spell> {
        self.spells.get(name).map(|spell| spell.as_ref())
    }

    /// Whether a spell with this name exists
    pub fn contains(&self, name: &str) -> bool {
        self.spells.contains_key(name)
    }

    /// Registered spell names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.spells.keys().cloned().collect();
        names.sort();
        names
    }

    /// Cast `name` on every listed body
    ///
    /// Unknown spell names and stale handles are skipped. Returns the number
    /// of bodies the spell was applied to.
    pub fn cast(&self, name: &str, registry: &mut BodyRegistry, targets: &[BodyHandle]) -> usize {
        let Some(spell) = self.get(name) else {
            log::debug!("Ignoring unknown spell '{}'", name);
            return 0;
        };

        let mut applied = 0;
        for &handle in targets {
            if let Some(body) = registry.get_mut(handle) {
                spell.apply(body);
                applied += 1;
            }
        }
        applied
    }
}

impl Default for SpellRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SpellRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpellRegistry")
            .field("spells", &self.names())
            .finish()
    }
}
