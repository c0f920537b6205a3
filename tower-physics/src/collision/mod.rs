//! Contact generation and response
//!
//! - [`detector`]: AABB broad phase and SAT narrow phase
//! - [`resolver`]: sequential impulse solver with friction and positional correction

mod contact;
pub mod detector;
pub mod resolver;

pub use contact::{Contact, ContactGeometry};
pub use detector::{collide, detect_contacts};
pub use resolver::CollisionResolver;
