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
//! Body handles
//!
//! Handles are lightweight generational identifiers for registered bodies.
//! A handle stays comparable after its body is removed, but the registry
//! bumps the slot generation on removal so the stale handle no longer
//! resolves to anything.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const HANDLE_PREFIX: &str = "body_";

/// Generational handle to a body owned by the engine
///
/// The external, opaque form of a handle is the string
/// `body_<index>_<generation>`, which is what state documents carry.
///
/// # Examples
///
/// ```
/// use tower_physics::body::BodyHandle;
///
/// let handle = BodyHandle::new(3, 1);
/// assert_eq!(handle.to_string(), "body_3_1");
/// assert_eq!("body_3_1".parse::<BodyHandle>().unwrap(), handle);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct BodyHandle {
    index: u32,
    generation: u32,
}

impl BodyHandle {
    /// Create a handle from a slot index and generation
    pub fn new(index: u32, generation: u32) -> Self {
        BodyHandle { index, generation }
    }

    /// Slot index inside the registry
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Generation of the slot when the handle was issued
    pub fn generation(&self) -> u32 {
        self.generation
    }
}

impl fmt::Display for BodyHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}_{}", HANDLE_PREFIX, self.index, self.generation)
    }
}

/// Error returned when a string is not a valid body handle
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid body id '{0}', expected body_<index>_<generation>")]
pub struct ParseHandleError(String);

impl FromStr for BodyHandle {
    type Err = ParseHandleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseHandleError(s.to_string());
        let rest = s.strip_prefix(HANDLE_PREFIX).ok_or_else(err)?;
        let (index, generation) = rest.split_once('_').ok_or_else(err)?;
        let index = index.parse::<u32>().map_err(|_| err())?;
        let generation = generation.parse::<u32>().map_err(|_| err())?;
        Ok(BodyHandle::new(index, generation))
    }
}

impl From<BodyHandle> for String {
    fn from(handle: BodyHandle) -> String {
        handle.to_string()
    }
}

impl TryFrom<String> for BodyHandle {
    type Error = ParseHandleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
