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
//! Queries and effects over a populated [`BodyRegistry`](crate::body::BodyRegistry)
//!
//! Everything here is a free function taking the registry, so the engine can
//! call it while holding its world lock and tests can call it directly.
//!
//! - [`queries`]: point containment, area and nearest-body lookups
//! - [`stability`]: tower balance check
//! - [`effects`]: explosion and wind force fields
//! - [`spells`]: named material and motion mutators

pub mod effects;
pub mod queries;
pub mod spells;
pub mod stability;

pub use effects::{apply_explosion, apply_wind};
pub use queries::{bodies_in_area, find_closest_body, is_point_in_body};
pub use spells::{FnSpell, Spell, SpellRegistry};
pub use stability::check_tower_stability;
