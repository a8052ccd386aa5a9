//! # Signal bus for producers on other tasks and threads.
//!
//! [`Bus`] is a thin wrapper around [`tokio::sync::broadcast`] carrying owned
//! [`Signal`]s. A [`Relay`](crate::Relay) drains one receiver and re-publishes every
//! signal into a [`SharedHub`](crate::SharedHub), one at a time.
//!
//! ## Architecture
//! ```text
//! Publishers (many):                 Receiver (one):
//!   task 1   ──┐
//!   task 2   ──┼──────► Bus ───────► Relay ────► SharedHub ──► subscribers
//!   thread N ──┘  (broadcast chan)
//! ```
//!
//! ## Rules
//! - **Non-blocking publish**: `publish()` never blocks; it calls `broadcast::Sender::send`.
//! - **Bounded capacity**: one ring buffer stores recent signals for all receivers.
//! - **Lag handling**: slow receivers get `RecvError::Lagged(n)` and skip `n` oldest items.
//! - **No persistence**: signals are lost if there are no receivers at send time.

use std::error::Error;
use std::fmt;

use tokio::sync::broadcast;

use super::signal::Signal;

/// Broadcast channel for hub signals.
///
/// Cheap to clone (internally holds an `Arc`-backed sender).
pub struct Bus<T> {
    tx: broadcast::Sender<Signal<T>>,
}

impl<T: Clone> Bus<T> {
    /// Creates a new bus with the given channel capacity.
    ///
    /// ### Notes
    /// - Capacity is **shared** across all receivers.
    /// - The minimum capacity is 1 (clamped).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (tx, _rx) = broadcast::channel::<Signal<T>>(capacity);
        Self { tx }
    }

    /// Publishes a signal to all receivers.
    ///
    /// If there are no receivers, the signal is dropped and this still returns immediately.
    pub fn publish(&self, signal: Signal<T>) {
        let _ = self.tx.send(signal);
    }

    /// Publishes `Signal::Next(value)`.
    pub fn publish_next(&self, value: T) {
        self.publish(Signal::Next(value));
    }

    /// Publishes `Signal::Error(error)`.
    pub fn publish_error(&self, error: impl Error + Send + Sync + 'static) {
        self.publish(Signal::error(error));
    }

    /// Publishes `Signal::Completed`.
    pub fn publish_completed(&self) {
        self.publish(Signal::Completed);
    }

    /// Creates a new receiver that observes signals sent after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<Signal<T>> {
        self.tx.subscribe()
    }

    /// Number of live receivers.
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl<T> Clone for Bus<T> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<T> fmt::Debug for Bus<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bus")
            .field("receivers", &self.tx.receiver_count())
            .finish()
    }
}
