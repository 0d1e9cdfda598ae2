//! Target handles for popups.
//!
//! A popup never owns its target. It stores a [`TargetRef`], which is only
//! resolved when the popup is processed. By then the target may have moved or
//! been destroyed, so resolution goes through a [`TargetLookup`] that answers
//! `None` for anything no longer present.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::coords::ScreenRect;
use crate::ids::EntityId;

/// Non-owning, possibly dangling reference to a presentable entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TargetRef(Option<EntityId>);

impl TargetRef {
    /// Reference to the given entity.
    #[must_use]
    pub const fn entity_ref(id: EntityId) -> Self {
        Self(Some(id))
    }

    /// Reference that was never set.
    #[must_use]
    pub const fn none() -> Self {
        Self(None)
    }

    /// The referenced entity, if one was set.
    #[must_use]
    pub const fn entity(self) -> Option<EntityId> {
        self.0
    }
}

impl From<EntityId> for TargetRef {
    fn from(id: EntityId) -> Self {
        Self::entity_ref(id)
    }
}

impl From<Option<EntityId>> for TargetRef {
    fn from(id: Option<EntityId>) -> Self {
        Self(id)
    }
}

/// Where a live target currently is.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TargetFootprint {
    /// Target is itself an overlay element (card, portrait, health frame).
    /// The rectangle is its on-screen bounding box in screen pixels.
    Overlay(ScreenRect),
    /// Target lives in the game world.
    World(Vec2),
}

/// Answers where a target is right now.
pub trait TargetLookup {
    /// Current footprint of the entity, or `None` if it no longer exists.
    fn footprint(&self, id: EntityId) -> Option<TargetFootprint>;

    /// Resolves a [`TargetRef`], treating an unset reference as absent.
    fn resolve(&self, target: TargetRef) -> Option<TargetFootprint> {
        target.entity().and_then(|id| self.footprint(id))
    }
}

/// Lookup that knows no targets. Every resolution falls back.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTargets;

impl TargetLookup for NoTargets {
    fn footprint(&self, _id: EntityId) -> Option<TargetFootprint> {
        None
    }
}
