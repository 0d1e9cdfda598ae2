//! # Ember Common
//!
//! Common types shared by every Ember crate.
//!
//! This crate provides the foundational vocabulary of the popup pipeline:
//! - Overlay geometry (points, rectangles, viewport)
//! - ID types (`EntityId`, `LabelId`)
//! - Target handles and the lookup trait used to resolve them
//! - Common error types
//! - Prelude for convenient imports

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod coords;
pub mod error;
pub mod ids;
pub mod target;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::coords::*;
    pub use crate::error::*;
    pub use crate::ids::*;
    pub use crate::target::*;
}

pub use prelude::*;
