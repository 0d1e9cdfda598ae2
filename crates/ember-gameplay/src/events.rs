//! Event bus carrying resolved combat outcomes to presentation systems.

use crossbeam_channel::{unbounded, Receiver, Sender};
use serde::{Deserialize, Serialize};

use ember_common::EntityId;

/// Resolved combat outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CombatEvent {
    /// Entity took damage
    Damaged {
        /// Entity hit
        target: EntityId,
        /// Damage amount
        amount: i32,
        /// Whether the hit was critical
        critical: bool,
    },
    /// Entity was healed
    Healed {
        /// Entity healed
        target: EntityId,
        /// Amount restored
        amount: i32,
    },
}

/// Event bus for broadcasting combat events to subscribers.
///
/// The channel is unbounded: every outcome reported between two drains is
/// kept, however large the burst.
#[derive(Debug)]
pub struct EventBus {
    sender: Sender<CombatEvent>,
    receiver: Receiver<CombatEvent>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    /// Creates a new event bus.
    #[must_use]
    pub fn new() -> Self {
        let (sender, receiver) = unbounded();
        Self { sender, receiver }
    }

    /// Publishes an event to the bus.
    pub fn publish(&self, event: CombatEvent) {
        // The bus holds its own receiver, so the channel cannot be disconnected.
        let _ = self.sender.send(event);
    }

    /// Drains all pending events.
    pub fn drain(&self) -> Vec<CombatEvent> {
        self.receiver.try_iter().collect()
    }

    /// Returns the number of pending events.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }

    /// Creates a new sender handle for publishing events.
    #[must_use]
    pub fn sender(&self) -> Sender<CombatEvent> {
        self.sender.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_preserves_order() {
        let bus = EventBus::new();
        let a = EntityId::new();
        let b = EntityId::new();
        bus.publish(CombatEvent::Damaged {
            target: a,
            amount: 3,
            critical: false,
        });
        bus.publish(CombatEvent::Healed { target: b, amount: 2 });

        let events = bus.drain();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], CombatEvent::Damaged { amount: 3, .. }));
        assert!(matches!(events[1], CombatEvent::Healed { amount: 2, .. }));
        assert_eq!(bus.pending_count(), 0);
    }

    #[test]
    fn test_large_burst_is_kept() {
        let bus = EventBus::new();
        let target = EntityId::new();
        for amount in 1..=1500 {
            bus.publish(CombatEvent::Damaged {
                target,
                amount,
                critical: false,
            });
        }
        assert_eq!(bus.pending_count(), 1500);
        let events = bus.drain();
        assert_eq!(events.len(), 1500);
        assert!(matches!(events[1499], CombatEvent::Damaged { amount: 1500, .. }));
    }

    #[test]
    fn test_external_sender_feeds_bus() {
        let bus = EventBus::new();
        let sender = bus.sender();
        sender
            .send(CombatEvent::Healed {
                target: EntityId::new(),
                amount: 4,
            })
            .expect("bus alive");
        assert_eq!(bus.pending_count(), 1);
    }
}
