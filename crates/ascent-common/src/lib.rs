//! # Ascent Common
//!
//! Common types shared by the Ascent crates:
//! - ID types (EntityId, SubscriptionId)
//! - Physics layer masks
//! - Common error types
//! - Prelude for convenient imports

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod error;
pub mod ids;
pub mod layers;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::*;
    pub use crate::ids::*;
    pub use crate::layers::*;
}

pub use prelude::*;
