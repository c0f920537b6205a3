//! Rigid bodies and their ownership
//!
//! This module provides:
//! - [`RigidBody`], the oriented rectangle simulated by the engine
//! - [`BodyHandle`], the generational identifier handed to callers
//! - [`BodyRegistry`], the slot storage that owns every registered body

mod handle;
mod material;
mod registry;
mod rigid_body;

pub use handle::{BodyHandle, ParseHandleError};
pub use material::Material;
pub use registry::{BodyRegistry, MAX_VACANT_SLOTS};
pub use rigid_body::{RigidBody, DEFAULT_FRICTION, DEFAULT_RESTITUTION, MIN_DIMENSION, MIN_MASS};
