//! Event bus for inter-system communication.
//!
//! The controller publishes what happened during a tick (state changes,
//! jumps, attacks, hits) so animation, audio or HUD code can react without
//! reaching into controller internals.

use crossbeam_channel::{bounded, Receiver, Sender};
use serde::{Deserialize, Serialize};

use ascent_common::EntityId;

use crate::locomotion::LocomotionState;

/// Event types that can be sent through the event bus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameplayEvent {
    /// A locomotion state was entered
    StateEntered {
        /// Entity ID
        entity_id: EntityId,
        /// State entered
        state: LocomotionState,
    },
    /// A jump request was accepted
    JumpAccepted {
        /// Entity ID
        entity_id: EntityId,
        /// Jumps taken including this one
        jump_count: u32,
    },
    /// A jump request was ignored because the budget is spent
    JumpRejected {
        /// Entity ID
        entity_id: EntityId,
        /// Jumps taken so far
        jump_count: u32,
    },
    /// The jump budget was restored after landing
    JumpsReset {
        /// Entity ID
        entity_id: EntityId,
    },
    /// The attack volume was activated
    AttackStarted {
        /// Entity ID
        entity_id: EntityId,
    },
    /// The attack cooldown expired and the volume was deactivated
    AttackFinished {
        /// Entity ID
        entity_id: EntityId,
    },
    /// A target took damage
    TargetHit {
        /// Attacking entity
        entity_id: EntityId,
        /// Damage dealt
        damage: f32,
        /// Whether the hit was critical
        critical: bool,
    },
    /// A target was struck but its level requirement was not met
    HitRejected {
        /// Attacking entity
        entity_id: EntityId,
        /// Attacker's level
        attacker_level: i32,
        /// Level the target requires
        required_level: i32,
    },
}

impl GameplayEvent {
    /// Entity the event belongs to.
    #[must_use]
    pub fn entity_id(&self) -> EntityId {
        match self {
            Self::StateEntered { entity_id, .. }
            | Self::JumpAccepted { entity_id, .. }
            | Self::JumpRejected { entity_id, .. }
            | Self::JumpsReset { entity_id }
            | Self::AttackStarted { entity_id }
            | Self::AttackFinished { entity_id }
            | Self::TargetHit { entity_id, .. }
            | Self::HitRejected { entity_id, .. } => *entity_id,
        }
    }
}

/// Event bus for broadcasting events to subscribers.
#[derive(Debug)]
pub struct EventBus {
    /// Sender for broadcasting events
    sender: Sender<GameplayEvent>,
    /// Receiver for collecting events
    receiver: Receiver<GameplayEvent>,
    /// Channel capacity
    capacity: usize,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(1024)
    }
}

impl EventBus {
    /// Creates a new event bus with the given capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = bounded(capacity);
        Self {
            sender,
            receiver,
            capacity,
        }
    }

    /// Publishes an event to the bus.
    pub fn publish(&self, event: GameplayEvent) {
        // Non-blocking send - if full, event is dropped
        let _ = self.sender.try_send(event);
    }

    /// Drains all pending events.
    pub fn drain(&self) -> Vec<GameplayEvent> {
        self.receiver.try_iter().collect()
    }

    /// Returns the number of pending events.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }

    /// Returns the channel capacity.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Creates a new sender handle for publishing events.
    #[must_use]
    pub fn sender(&self) -> Sender<GameplayEvent> {
        self.sender.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_and_drain() {
        let bus = EventBus::new(8);
        let entity_id = EntityId::new();

        bus.publish(GameplayEvent::AttackStarted { entity_id });
        bus.publish(GameplayEvent::AttackFinished { entity_id });

        assert_eq!(bus.pending_count(), 2);
        let events = bus.drain();
        assert_eq!(
            events,
            vec![
                GameplayEvent::AttackStarted { entity_id },
                GameplayEvent::AttackFinished { entity_id },
            ]
        );
        assert_eq!(bus.pending_count(), 0);
    }

    #[test]
    fn test_full_bus_drops_events() {
        let bus = EventBus::new(1);
        let entity_id = EntityId::new();

        bus.publish(GameplayEvent::JumpsReset { entity_id });
        bus.publish(GameplayEvent::JumpsReset { entity_id });

        assert_eq!(bus.drain().len(), 1);
        assert_eq!(bus.capacity(), 1);
    }

    #[test]
    fn test_sender_handle_publishes() {
        let bus = EventBus::default();
        let entity_id = EntityId::new();

        bus.sender()
            .send(GameplayEvent::JumpsReset { entity_id })
            .expect("bus should accept event");

        let events = bus.drain();
        assert_eq!(events[0].entity_id(), entity_id);
    }
}
