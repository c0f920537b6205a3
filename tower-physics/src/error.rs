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
//! Error type shared by the engine facade and its registries

use thiserror::Error;

/// Errors reported by [`PhysicsEngine`](crate::engine::PhysicsEngine)
#[derive(Debug, Error)]
pub enum EngineError {
    /// A body blueprint failed validation
    #[error("invalid body: {0}")]
    InvalidBody(String),

    /// An imported state document is structurally valid JSON but unusable
    #[error("invalid state document: {0}")]
    InvalidState(String),

    /// An imported state document was written by an incompatible format version
    #[error("state format version {found} is not compatible with {supported}")]
    IncompatibleVersion {
        /// Version found in the document
        found: String,
        /// Version this build writes
        supported: String,
    },

    /// A state document could not be parsed or written
    #[error("state serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    /// The call does not match the engine's stepping mode
    #[error("stepping mode mismatch: {0}")]
    ModeMismatch(String),

    /// A spell with the same name is already registered
    #[error("spell '{0}' is already registered")]
    DuplicateSpell(String),

    /// The background simulation thread could not be spawned
    #[error("failed to spawn simulation thread: {0}")]
    ThreadSpawn(#[from] std::io::Error),
}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, EngineError>;
