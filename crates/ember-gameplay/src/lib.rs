//! # Ember Gameplay
//!
//! Combat-side collaborators of the popup pipeline:
//! - Combatants that popups anchor to
//! - Event bus for resolved combat outcomes
//! - `CombatState`, the owner the popup system registers with

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod entity;
pub mod events;
pub mod game_state;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::entity::*;
    pub use crate::events::*;
    pub use crate::game_state::*;
}

pub use prelude::*;
