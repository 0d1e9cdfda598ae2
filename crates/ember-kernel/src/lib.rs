//! # Ember Kernel
//!
//! Serialized floating-text popups for combat numbers.
//!
//! This crate turns bursts of damage, critical and heal events into short
//! animated overlay labels:
//! - A FIFO queue drained by a single paced consumer ([`scheduler`])
//! - Anchor resolution against moving or vanished targets ([`resolver`])
//! - Per-label pop-in, settle, drift and fade tweens ([`label`], [`tween`])
//! - An overlay root that owns and tears down live labels ([`overlay`])
//!
//! ## Frame order
//!
//! Everything runs on the game loop's thread. Each frame,
//! [`PopupSystem::update`] pulls requests sent through [`PopupHandle`]s,
//! advances live labels, and then lets the drainer process at most one
//! queued request.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod camera;
pub mod easing;
pub mod label;
pub mod overlay;
pub mod resolver;
pub mod scheduler;
pub mod settings;
pub mod system;
pub mod tween;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::camera::*;
    pub use crate::easing::*;
    pub use crate::label::*;
    pub use crate::overlay::*;
    pub use crate::resolver::*;
    pub use crate::scheduler::*;
    pub use crate::settings::*;
    pub use crate::system::*;
    pub use crate::tween::*;
}

pub use prelude::*;
