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
use serde::{Deserialize, Serialize};

/// Material tag carried by every body
///
/// The tag records which spell last changed the body's properties. The
/// numeric coefficients live on the body itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Material {
    /// Unmodified block
    #[default]
    Normal,
    /// Increased mass
    Heavy,
    /// Reduced mass
    Light,
    /// Reduced friction
    Slippery,
    /// Increased friction
    Sticky,
    /// Increased restitution
    Bouncy,
}
