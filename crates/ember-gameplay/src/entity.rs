//! Combatant storage.
//!
//! Combatants are whatever popups can be anchored to: UI elements such as
//! cards or portraits, or entities standing in the world. The arena answers
//! [`TargetLookup`] queries, so a despawned combatant simply stops resolving.

use std::collections::HashMap;

use ember_common::{EntityId, ScreenRect, TargetFootprint, TargetLookup};
use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error types for combatant operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EntityError {
    /// Entity not found
    #[error("Entity not found: {0:?}")]
    NotFound(EntityId),
}

/// Result type for combatant operations.
pub type EntityResult<T> = Result<T, EntityError>;

/// Where a combatant is presented.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Presence {
    /// Overlay element with its on-screen bounds.
    Overlay(ScreenRect),
    /// World entity at a position.
    World(Vec2),
}

/// A combatant that damage and healing can land on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Combatant {
    id: EntityId,
    name: String,
    presence: Presence,
    health: i32,
    max_health: i32,
}

impl Combatant {
    /// Creates a combatant at full health.
    #[must_use]
    pub fn new(name: impl Into<String>, presence: Presence, max_health: i32) -> Self {
        let max_health = max_health.max(1);
        Self {
            id: EntityId::new(),
            name: name.into(),
            presence,
            health: max_health,
            max_health,
        }
    }

    /// Unique ID.
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.id
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Where the combatant is presented.
    #[must_use]
    pub const fn presence(&self) -> Presence {
        self.presence
    }

    /// Current health.
    #[must_use]
    pub const fn health(&self) -> i32 {
        self.health
    }

    /// Maximum health.
    #[must_use]
    pub const fn max_health(&self) -> i32 {
        self.max_health
    }

    /// Whether health has reached zero.
    #[must_use]
    pub const fn is_dead(&self) -> bool {
        self.health <= 0
    }

    /// Applies damage and returns the amount actually taken.
    pub fn take_damage(&mut self, amount: i32) -> i32 {
        let taken = amount.clamp(0, self.health.max(0));
        self.health -= taken;
        taken
    }

    /// Applies healing and returns the amount actually restored.
    pub fn heal(&mut self, amount: i32) -> i32 {
        let restored = amount.clamp(0, self.max_health - self.health);
        self.health += restored;
        restored
    }

    fn footprint(&self) -> TargetFootprint {
        match self.presence {
            Presence::Overlay(rect) => TargetFootprint::Overlay(rect),
            Presence::World(position) => TargetFootprint::World(position),
        }
    }
}

/// All live combatants.
#[derive(Debug, Default)]
pub struct CombatantArena {
    combatants: HashMap<EntityId, Combatant>,
}

impl CombatantArena {
    /// Creates an empty arena.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a combatant and returns its ID.
    pub fn spawn(&mut self, combatant: Combatant) -> EntityId {
        let id = combatant.id();
        self.combatants.insert(id, combatant);
        id
    }

    /// Removes a combatant. Popups still queued for it will fall back.
    pub fn despawn(&mut self, id: EntityId) -> EntityResult<Combatant> {
        self.combatants.remove(&id).ok_or(EntityError::NotFound(id))
    }

    /// Moves a combatant (overlay rect or world position).
    pub fn set_presence(&mut self, id: EntityId, presence: Presence) -> EntityResult<()> {
        let combatant = self.get_mut(id)?;
        combatant.presence = presence;
        Ok(())
    }

    /// Gets a combatant.
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&Combatant> {
        self.combatants.get(&id)
    }

    /// Gets a combatant mutably.
    pub fn get_mut(&mut self, id: EntityId) -> EntityResult<&mut Combatant> {
        self.combatants.get_mut(&id).ok_or(EntityError::NotFound(id))
    }

    /// Number of live combatants.
    #[must_use]
    pub fn len(&self) -> usize {
        self.combatants.len()
    }

    /// Whether there are no combatants.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.combatants.is_empty()
    }
}

impl TargetLookup for CombatantArena {
    fn footprint(&self, id: EntityId) -> Option<TargetFootprint> {
        self.combatants.get(&id).map(Combatant::footprint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn goblin() -> Combatant {
        Combatant::new("Goblin", Presence::World(Vec2::new(10.0, 20.0)), 30)
    }

    #[test]
    fn test_damage_clamps_to_health() {
        let mut c = goblin();
        assert_eq!(c.take_damage(12), 12);
        assert_eq!(c.take_damage(100), 18);
        assert!(c.is_dead());
        assert_eq!(c.take_damage(5), 0);
    }

    #[test]
    fn test_heal_clamps_to_max() {
        let mut c = goblin();
        c.take_damage(10);
        assert_eq!(c.heal(25), 10);
        assert_eq!(c.health(), 30);
    }

    #[test]
    fn test_arena_lookup_follows_presence() {
        let mut arena = CombatantArena::new();
        let id = arena.spawn(goblin());
        assert_eq!(
            arena.footprint(id),
            Some(TargetFootprint::World(Vec2::new(10.0, 20.0)))
        );

        let rect = ScreenRect::new(0.0, 0.0, 64.0, 96.0);
        arena.set_presence(id, Presence::Overlay(rect)).expect("present");
        assert_eq!(arena.footprint(id), Some(TargetFootprint::Overlay(rect)));
    }

    #[test]
    fn test_despawned_combatant_stops_resolving() {
        let mut arena = CombatantArena::new();
        let id = arena.spawn(goblin());
        assert!(arena.despawn(id).is_ok());
        assert_eq!(arena.footprint(id), None);
        assert_eq!(arena.despawn(id).err(), Some(EntityError::NotFound(id)));
        assert!(arena.is_empty());
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_health_stays_in_range(ops in prop::collection::vec((any::<bool>(), -50i32..200), 0..64)) {
                let mut c = goblin();
                for (is_heal, amount) in ops {
                    let before = c.health();
                    let applied = if is_heal { c.heal(amount) } else { c.take_damage(amount) };
                    prop_assert!(applied >= 0);
                    prop_assert_eq!((c.health() - before).abs(), applied);
                    prop_assert!((0..=c.max_health()).contains(&c.health()));
                }
            }
        }
    }
}
