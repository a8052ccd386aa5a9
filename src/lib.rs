//! # notifyhub
//!
//! **notifyhub** is a small, generic publish/subscribe notification core.
//!
//! A hub keeps an ordered set of subscribers and broadcasts three kinds of
//! signals to them: `next` (a value), `error` and `completed`. Subscribers are
//! released through handles returned by `subscribe`. One hub type serves any
//! payload: visitor records, video titles, stock prices.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   producer ─┐                       ┌──────────────────────────────┐
//!             ├─ publish_next(v) ───► │ NotificationHub / SharedHub  │
//!   producer ─┘  publish_error(e)     │  - Registry (ordered, unique)│
//!                publish_completed()  │  - CompletionPolicy gate     │
//!                                     └──────────────┬───────────────┘
//!                                                    │ snapshot
//!                                     ┌──────────────┼──────────────┐
//!                                     ▼              ▼              ▼
//!                                sub1.on_*()    sub2.on_*()    subN.on_*()
//!                                     └─ Err / panic → SubscriberFailure (fan-out continues)
//!
//!   async producers ──► Bus (broadcast) ──► Relay ──► SharedHub
//! ```
//!
//! ### Lifecycle
//! ```text
//! NotificationHub::new()
//!   ├─► subscribe(sub)          ─► Subscription (cancel() is idempotent)
//!   ├─► publish_next / publish_error
//!   │       └─ every active subscriber, registration order, inline
//!   ├─► publish_completed()     ─► hub marked completed
//!   │       └─ clear_on_complete? ─► subscribers dropped
//!   └─► later publishes         ─► CompletionPolicy: Allow | Ignore | Reject
//! ```
//!
//! ## Features
//! | Area              | Description                                                  | Key types / traits                          |
//! |-------------------|--------------------------------------------------------------|---------------------------------------------|
//! | **Subscriber API**| Receive next / error / completed signals.                    | [`Subscribe`], [`SubscriberFn`]             |
//! | **Hubs**          | Single-threaded and thread-safe broadcast registries.        | [`NotificationHub`], [`SharedHub`]          |
//! | **Handles**       | Idempotent unsubscription, scoped guards.                    | [`Subscription`], [`SubscriptionGuard`]     |
//! | **Async bridge**  | Feed a shared hub from tokio tasks.                          | [`Bus`], [`Relay`]                          |
//! | **Errors**        | Typed hub errors and per-subscriber failure reports.         | [`HubError`], [`SubscriberFailure`]         |
//! | **Configuration** | Completion policy, clear-on-complete, relay stop behaviour.  | [`HubConfig`], [`RelayConfig`]              |
//!
//! ## Optional features
//! - `logging`: exports a [`LogWriter`] subscriber that writes signals to `tracing`.
//!
//! ## Example
//! ```rust
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use notifyhub::{NotificationHub, Subscribe, SubscriberError};
//!
//! struct Viewer {
//!     name: &'static str,
//!     inbox: RefCell<Vec<String>>,
//! }
//!
//! impl Subscribe<String> for Viewer {
//!     fn on_next(&self, title: &String) -> Result<(), SubscriberError> {
//!         self.inbox.borrow_mut().push(title.clone());
//!         Ok(())
//!     }
//!
//!     fn name(&self) -> &'static str { self.name }
//! }
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let channel = NotificationHub::<String>::new();
//!     let rahul = Rc::new(Viewer { name: "rahul", inbox: RefCell::default() });
//!     let priya = Rc::new(Viewer { name: "priya", inbox: RefCell::default() });
//!
//!     let rahul_sub = channel.subscribe(rahul.clone());
//!     let _priya_sub = channel.subscribe(priya.clone());
//!
//!     channel.publish_next("Tutorial Part 1".to_string())?;
//!     rahul_sub.cancel();
//!     channel.publish_next("Tutorial Part 2".to_string())?;
//!     channel.publish_completed()?;
//!
//!     assert_eq!(rahul.inbox.borrow().len(), 1);
//!     assert_eq!(priya.inbox.borrow().len(), 2);
//!     Ok(())
//! }
//! ```
mod core;
mod error;
mod events;
mod subscribers;

// ---- Public re-exports ----

pub use crate::core::{
    CompletionPolicy, Delivery, Disposable, HubConfig, NotificationHub, Relay, RelayConfig,
    RelayStats, SharedHub, SharedSubscriber, SharedSubscription, Subscription, SubscriptionGuard,
    SubscriptionId,
};
pub use error::{FailureCause, HubError, SubscriberError, SubscriberFailure};
pub use events::{Bus, Signal, SignalError, SignalKind, SignalRef};
pub use subscribers::{Subscribe, SubscriberFn};

// Optional: expose a built-in tracing subscriber.
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
