//! Input delivery for player controls.
//!
//! Device polling happens elsewhere; this module only fans decoded input
//! events out to subscribers. Each subscriber owns a channel receiver and
//! drains it once per tick, so events are applied on the ticking thread.

use crossbeam_channel::{unbounded, Receiver, Sender};
use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use ascent_common::SubscriptionId;

/// Errors that can occur in the input system.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    /// Subscription was never issued or was already removed
    #[error("unknown input subscription: {0}")]
    UnknownSubscription(SubscriptionId),
}

/// Phase of a held action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputPhase {
    /// Action just began
    Started,
    /// Action is held
    Performed,
    /// Action was released
    Canceled,
}

impl InputPhase {
    /// Whether the action counts as held.
    #[must_use]
    pub fn is_active(self) -> bool {
        matches!(self, Self::Started | Self::Performed)
    }
}

/// Decoded input event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    /// Directional input; zero means no input
    Move(Vec2),
    /// Jump trigger
    Jump,
    /// Attack trigger
    Fire,
    /// Sprint modifier
    Sprint(InputPhase),
}

/// Receiving end of an input subscription.
#[derive(Debug)]
pub struct InputSubscription {
    /// Subscription handle
    id: SubscriptionId,
    /// Channel the reader sends to
    receiver: Receiver<InputEvent>,
}

impl InputSubscription {
    /// Subscription handle, used to unsubscribe.
    #[must_use]
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Takes all events delivered since the last drain, oldest first.
    pub fn drain(&self) -> Vec<InputEvent> {
        self.receiver.try_iter().collect()
    }

    /// Number of undelivered events.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }
}

/// Publish/subscribe hub for input events.
#[derive(Debug, Default)]
pub struct InputReader {
    /// Live subscribers
    subscribers: Vec<(SubscriptionId, Sender<InputEvent>)>,
    /// Next handle to issue
    next_id: u64,
}

impl InputReader {
    /// Creates a reader with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new subscriber.
    pub fn subscribe(&mut self) -> InputSubscription {
        let id = SubscriptionId::from_raw(self.next_id);
        self.next_id += 1;

        let (sender, receiver) = unbounded();
        self.subscribers.push((id, sender));
        debug!(subscription = %id, "input subscribed");

        InputSubscription { id, receiver }
    }

    /// Removes a subscriber.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::UnknownSubscription`] if `id` is not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> Result<(), InputError> {
        let index = self
            .subscribers
            .iter()
            .position(|(sub_id, _)| *sub_id == id)
            .ok_or(InputError::UnknownSubscription(id))?;

        self.subscribers.swap_remove(index);
        debug!(subscription = %id, "input unsubscribed");
        Ok(())
    }

    /// Sends an event to every subscriber. Returns how many received it.
    ///
    /// Subscribers whose receiver was dropped are removed.
    pub fn publish(&mut self, event: InputEvent) -> usize {
        self.subscribers
            .retain(|(_, sender)| sender.send(event).is_ok());
        self.subscribers.len()
    }

    /// Publishes a move vector.
    pub fn move_to(&mut self, input: Vec2) -> usize {
        self.publish(InputEvent::Move(input))
    }

    /// Publishes a jump trigger.
    pub fn jump(&mut self) -> usize {
        self.publish(InputEvent::Jump)
    }

    /// Publishes an attack trigger.
    pub fn fire(&mut self) -> usize {
        self.publish(InputEvent::Fire)
    }

    /// Publishes a sprint phase change.
    pub fn sprint(&mut self, phase: InputPhase) -> usize {
        self.publish(InputEvent::Sprint(phase))
    }

    /// Number of live subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}
