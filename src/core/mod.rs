//! Hub core: registry, fan-out and the two hub flavours.
//!
//! Internal modules:
//! - [`registry`]: ordered, identity-unique subscriber list with registration ids;
//! - [`fanout`]: failure-isolated delivery of one signal to a snapshot;
//! - [`hub`]: single-threaded [`NotificationHub`];
//! - [`shared`]: thread-safe [`SharedHub`];
//! - [`subscription`]: handles and drop-guards;
//! - [`relay`]: async bridge from a [`Bus`](crate::Bus) into a [`SharedHub`];
//! - [`config`]: hub and relay settings.

mod config;
mod fanout;
mod hub;
mod registry;
mod relay;
mod shared;
mod subscription;

pub use config::{CompletionPolicy, HubConfig, RelayConfig};
pub use fanout::Delivery;
pub use hub::NotificationHub;
pub use registry::SubscriptionId;
pub use relay::{Relay, RelayStats};
pub use shared::{SharedHub, SharedSubscriber};
pub use subscription::{Disposable, SharedSubscription, Subscription, SubscriptionGuard};
