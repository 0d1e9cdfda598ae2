//! Central combat state.
//!
//! `CombatState` owns the combatants and the event bus, and is the object
//! the popup system registers with at startup. Combat code reports outcomes
//! here; [`CombatState::dispatch_events`] forwards them to whatever popup
//! handle was registered. Without a registration the events are consumed
//! and nothing is shown.

use ember_common::EntityId;
use ember_kernel::{PopupHandle, PopupRegistrar};
use tracing::debug;

use crate::entity::{CombatantArena, EntityResult};
use crate::events::{CombatEvent, EventBus};

/// Single owner of combat-side state.
#[derive(Debug, Default)]
pub struct CombatState {
    combatants: CombatantArena,
    events: EventBus,
    popups: Option<PopupHandle>,
}

impl CombatState {
    /// Creates an empty combat state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Combatants.
    #[must_use]
    pub const fn combatants(&self) -> &CombatantArena {
        &self.combatants
    }

    /// Combatants, mutably.
    pub fn combatants_mut(&mut self) -> &mut CombatantArena {
        &mut self.combatants
    }

    /// Whether a popup handle has been registered.
    #[must_use]
    pub const fn has_popups(&self) -> bool {
        self.popups.is_some()
    }

    /// Damages a combatant and reports the damage actually taken.
    ///
    /// Returns the amount taken.
    pub fn apply_damage(&mut self, target: EntityId, amount: i32, critical: bool) -> EntityResult<i32> {
        let taken = self.combatants.get_mut(target)?.take_damage(amount);
        self.report_damage(target, taken, critical);
        Ok(taken)
    }

    /// Heals a combatant and reports the amount actually restored.
    pub fn apply_heal(&mut self, target: EntityId, amount: i32) -> EntityResult<i32> {
        let restored = self.combatants.get_mut(target)?.heal(amount);
        self.report_heal(target, restored);
        Ok(restored)
    }

    /// Reports damage decided elsewhere.
    pub fn report_damage(&self, target: EntityId, amount: i32, critical: bool) {
        self.events.publish(CombatEvent::Damaged {
            target,
            amount,
            critical,
        });
    }

    /// Reports healing decided elsewhere.
    pub fn report_heal(&self, target: EntityId, amount: i32) {
        self.events.publish(CombatEvent::Healed { target, amount });
    }

    /// Forwards pending combat events to the registered popup handle.
    ///
    /// Returns the number of events consumed.
    pub fn dispatch_events(&mut self) -> usize {
        let events = self.events.drain();
        let Some(popups) = &self.popups else {
            return events.len();
        };
        for event in &events {
            match *event {
                CombatEvent::Damaged {
                    target,
                    amount,
                    critical,
                } => popups.enqueue_damage(amount, target, critical),
                CombatEvent::Healed { target, amount } => popups.enqueue_heal(amount, target),
            }
        }
        events.len()
    }
}

impl PopupRegistrar for CombatState {
    fn register_popups(&mut self, handle: PopupHandle) {
        if self.popups.replace(handle).is_some() {
            debug!("popup handle replaced");
        }
    }
}
