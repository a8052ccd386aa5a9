//! # Subscriber trait.
//!
//! Provides [`Subscribe`], the capability a hub calls into for each broadcast.
//!
//! Each subscriber gets:
//! - **Inline delivery** (callbacks run on the publisher's thread, before `publish_*` returns)
//! - **Registration order** (earlier subscribers are called first)
//! - **Failure isolation** (an `Err` or a panic is reported, the next subscriber still runs)
//!
//! ## Architecture
//! ```text
//! hub.publish_next(v) ──► snapshot ──► sub1.on_next(&v) ──► sub2.on_next(&v) ──► ...
//!                                          └─► Err / panic → SubscriberFailure, continue
//! ```
//!
//! ## Rules
//! - Exactly one callback is invoked per subscriber per broadcast.
//! - Callbacks take `&self`; keep mutable state behind `Cell`/`RefCell`/`Mutex`.
//! - A callback may cancel subscriptions or subscribe new subscribers; the change
//!   applies from the next broadcast on.
//!
//! ## Example
//! ```rust
//! use std::cell::Cell;
//! use notifyhub::{Subscribe, SubscriberError};
//!
//! #[derive(Default)]
//! struct Counter {
//!     seen: Cell<u32>,
//! }
//!
//! impl Subscribe<String> for Counter {
//!     fn on_next(&self, _video: &String) -> Result<(), SubscriberError> {
//!         self.seen.set(self.seen.get() + 1);
//!         Ok(())
//!     }
//!
//!     fn name(&self) -> &'static str { "counter" }
//! }
//! ```

use crate::error::SubscriberError;
use crate::events::{SignalError, SignalRef};

/// Observer of a hub broadcasting values of type `T`.
///
/// ### Implementation requirements
/// - Return `Err` for expected failures; the hub logs and reports them.
/// - Do not rely on panics; they are caught, but `RefCell` borrows or locks held
///   by the panicking callback may be left in an inconsistent state.
/// - Keep callbacks short: delivery is synchronous and later subscribers wait.
pub trait Subscribe<T>: 'static {
    /// Handles a new value.
    fn on_next(&self, value: &T) -> Result<(), SubscriberError>;

    /// Handles a producer error.
    ///
    /// Default: ignore.
    fn on_error(&self, error: &SignalError) -> Result<(), SubscriberError> {
        let _ = error;
        Ok(())
    }

    /// Handles the end of the broadcast session.
    ///
    /// Default: ignore.
    fn on_completed(&self) -> Result<(), SubscriberError> {
        Ok(())
    }

    /// Returns the subscriber name used in logs and failure reports.
    ///
    /// The default uses `type_name::<Self>()`, which can be verbose - override it when possible.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Dispatches one signal to the matching callback.
    fn on_signal(&self, signal: SignalRef<'_, T>) -> Result<(), SubscriberError> {
        match signal {
            SignalRef::Next(value) => self.on_next(value),
            SignalRef::Error(err) => self.on_error(err),
            SignalRef::Completed => self.on_completed(),
        }
    }
}
