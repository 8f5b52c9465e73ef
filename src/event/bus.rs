//! Event bus: Explicit publish/subscribe over crossbeam channels.
//!
//! Every subscriber owns an unbounded channel, so publishing never blocks and
//! never loses an event. A disconnected subscriber is pruned.

use super::messages::MemoryEvent;
use crossbeam_channel::{unbounded, Receiver, Sender, TryRecvError};
use std::time::Duration;

/// Identifier handed out by [`EventBus::subscribe`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct SubscriberId(pub u64);

/// Receiving end of a subscription.
#[derive(Debug)]
pub struct Subscription {
    id: SubscriberId,
    rx: Receiver<MemoryEvent>,
}

impl Subscription {
    /// Identifier to pass to [`EventBus::unsubscribe`].
    pub const fn id(&self) -> SubscriberId {
        self.id
    }

    /// Get the receiver for `select!`-style loops.
    pub const fn receiver(&self) -> &Receiver<MemoryEvent> {
        &self.rx
    }

    /// Poll for the next event (non-blocking).
    ///
    /// Returns `None` if no event is pending or the bus is gone.
    pub fn poll(&self) -> Option<MemoryEvent> {
        match self.rx.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    /// Wait for the next event (blocking with timeout).
    pub fn wait(&self, timeout: Duration) -> Option<MemoryEvent> {
        self.rx.recv_timeout(timeout).ok()
    }

    /// Drain all pending events.
    pub fn drain(&self) -> Vec<MemoryEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.rx.try_recv() {
            events.push(event);
        }
        events
    }
}

/// Publish/subscribe channel for [`MemoryEvent`]s.
#[derive(Debug)]
pub struct EventBus {
    subscribers: Vec<(SubscriberId, Sender<MemoryEvent>)>,
    next_id: u64,
    closed: bool,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    /// Create an empty bus.
    pub const fn new() -> Self {
        Self {
            subscribers: Vec::new(),
            next_id: 0,
            closed: false,
        }
    }

    /// Register a new subscriber.
    pub fn subscribe(&mut self) -> Subscription {
        let id = SubscriberId(self.next_id);
        self.next_id += 1;

        let (tx, rx) = unbounded();
        if !self.closed {
            self.subscribers.push((id, tx));
        }
        Subscription { id, rx }
    }

    /// Remove a subscriber. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    /// Deliver `event` to every subscriber.
    ///
    /// Returns the number of subscribers that received it.
    pub fn publish(&mut self, event: MemoryEvent) -> usize {
        if self.closed {
            return 0;
        }

        let mut delivered = 0;
        self.subscribers.retain(|(id, tx)| {
            if tx.send(event).is_ok() {
                delivered += 1;
                true
            } else {
                tracing::trace!(subscriber = id.0, "pruning disconnected subscriber");
                false
            }
        });
        delivered
    }

    /// Number of registered subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Drop every subscriber and stop accepting events.
    pub fn close(&mut self) {
        self.subscribers.clear();
        self.closed = true;
    }

    /// Whether [`close`](Self::close) has been called.
    pub const fn is_closed(&self) -> bool {
        self.closed
    }
}
