//! # Subscribers for the notification hubs.
//!
//! This module provides the [`Subscribe`] trait and built-in implementations
//! that a [`NotificationHub`](crate::NotificationHub) or [`SharedHub`](crate::SharedHub)
//! fans signals out to.
//!
//! ## Architecture
//! ```text
//! Signal flow:
//!   producer ── publish_*(..) ──► hub ──► snapshot ──► Subscribe::on_signal
//!                                                           │
//!                                              ┌────────────┼────────────┐
//!                                              ▼            ▼            ▼
//!                                          on_next      on_error    on_completed
//! ```
//!
//! ## Subscriber types
//! - **Custom subscribers**: implement [`Subscribe`] directly (stateful reports, alerts).
//! - **Closures**: wrap an `Fn(&T)` in [`SubscriberFn`].
//! - **Logging**: [`LogWriter`] (feature `logging`) writes each signal to `tracing`.

#[cfg(feature = "logging")]
mod log;
mod subscriber;
mod subscriber_fn;

#[cfg(feature = "logging")]
pub use log::LogWriter;
pub use subscriber::Subscribe;
pub use subscriber_fn::SubscriberFn;
