//! # Bus → hub relay.
//!
//! [`Relay`] drains a [`Bus`](crate::Bus) receiver and re-publishes each signal into a
//! [`SharedHub`] inline, in arrival order. It is the single consumer that turns many
//! async producers into one serial delivery loop.
//!
//! ## Loop
//! ```text
//! loop {
//!   select (biased) {
//!     token.cancelled()       ─► exit
//!     rx.recv()
//!       ├─ Ok(signal)         ─► hub.broadcast(signal); stop after Completed if configured
//!       ├─ Err(Lagged(n))     ─► warn!, stats.lagged += n, continue
//!       └─ Err(Closed)        ─► exit
//!   }
//! }
//! ```
//!
//! ## Example
//! ```rust
//! use notifyhub::{Bus, Relay, RelayConfig, SharedHub};
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let bus = Bus::<u32>::new(64);
//!     let hub = SharedHub::<u32>::new();
//!     let _h = hub.subscribe_fn("printer", |v: &u32| println!("got {v}"));
//!
//!     let relay = Relay::new(hub, RelayConfig::default())
//!         .spawn(bus.subscribe(), CancellationToken::new());
//!
//!     bus.publish_next(1);
//!     bus.publish_completed();
//!
//!     let stats = relay.await.expect("relay task");
//!     assert_eq!(stats.relayed, 2);
//! }
//! ```

use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::config::RelayConfig;
use super::shared::SharedHub;
use crate::events::Signal;

/// Counters reported when a relay exits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RelayStats {
    /// Signals the hub broadcast to its subscribers.
    pub relayed: u64,
    /// Signals the hub dropped under [`CompletionPolicy::Ignore`](crate::CompletionPolicy::Ignore).
    pub suppressed: u64,
    /// Signals skipped because the receiver lagged behind the bus.
    pub lagged: u64,
    /// Signals the hub rejected (see [`CompletionPolicy::Reject`](crate::CompletionPolicy::Reject)).
    pub rejected: u64,
    /// Subscriber failures reported by the hub across all relayed signals.
    pub failures: u64,
}

/// Forwards bus signals into a [`SharedHub`].
pub struct Relay<T: 'static> {
    hub: SharedHub<T>,
    config: RelayConfig,
}

impl<T> Relay<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Creates a relay that forwards into `hub`.
    pub fn new(hub: SharedHub<T>, config: RelayConfig) -> Self {
        Self { hub, config }
    }

    /// Spawns [`run`](Self::run) on the current tokio runtime.
    pub fn spawn(
        self,
        rx: broadcast::Receiver<Signal<T>>,
        token: CancellationToken,
    ) -> JoinHandle<RelayStats> {
        tokio::spawn(self.run(rx, token))
    }

    /// Relays until the token is cancelled, the bus closes, or (if configured)
    /// a `completed` signal has been forwarded.
    pub async fn run(
        self,
        mut rx: broadcast::Receiver<Signal<T>>,
        token: CancellationToken,
    ) -> RelayStats {
        let mut stats = RelayStats::default();

        loop {
            let received = tokio::select! {
                biased;
                _ = token.cancelled() => break,
                r = rx.recv() => r,
            };

            match received {
                Ok(signal) => {
                    let terminal = signal.is_terminal();
                    match self.hub.broadcast(signal.as_signal_ref()) {
                        Ok(delivery) if delivery.suppressed => stats.suppressed += 1,
                        Ok(delivery) => {
                            stats.relayed += 1;
                            stats.failures += delivery.failures.len() as u64;
                        }
                        Err(err) => {
                            tracing::warn!(label = err.as_label(), reason = %err.as_message(), "relay: signal rejected");
                            stats.rejected += 1;
                        }
                    }
                    if terminal && self.config.stop_on_completed {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "relay lagged behind bus");
                    stats.lagged += skipped;
                }
                Err(RecvError::Closed) => break,
            }
        }

        tracing::debug!(
            relayed = stats.relayed,
            suppressed = stats.suppressed,
            lagged = stats.lagged,
            rejected = stats.rejected,
            failures = stats.failures,
            "relay stopped"
        );
        stats
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use parking_lot::Mutex;

    use super::*;
    use crate::error::SubscriberError;
    use crate::events::SignalError;
    use crate::{Bus, CompletionPolicy, HubConfig, Subscribe};

    #[derive(Default)]
    struct Journal {
        entries: Mutex<Vec<String>>,
    }

    impl Subscribe<u32> for Journal {
        fn on_next(&self, value: &u32) -> Result<(), SubscriberError> {
            self.entries.lock().push(format!("next:{value}"));
            Ok(())
        }

        fn on_error(&self, error: &SignalError) -> Result<(), SubscriberError> {
            self.entries.lock().push(format!("error:{error}"));
            Ok(())
        }

        fn on_completed(&self) -> Result<(), SubscriberError> {
            self.entries.lock().push("completed".to_string());
            Ok(())
        }
    }

    fn setup(config: HubConfig) -> (SharedHub<u32>, Arc<Journal>) {
        let hub = SharedHub::with_config(config);
        let journal = Arc::new(Journal::default());
        let _ = hub.subscribe(journal.clone());
        (hub, journal)
    }

    #[tokio::test]
    async fn forwards_in_order_and_stops_on_completed() {
        let (hub, journal) = setup(HubConfig::default());
        let bus = Bus::<u32>::new(16);
        let relay = Relay::new(hub.clone(), RelayConfig::default())
            .spawn(bus.subscribe(), CancellationToken::new());

        bus.publish_next(1);
        bus.publish_error(std::io::Error::other("feed outage"));
        bus.publish_next(2);
        bus.publish_completed();
        bus.publish_next(3);

        let stats = relay.await.unwrap();
        assert_eq!(stats.relayed, 4);
        assert_eq!(stats.lagged, 0);
        assert_eq!(
            *journal.entries.lock(),
            vec!["next:1", "error:feed outage", "next:2", "completed"]
        );
        assert!(hub.is_completed());
    }

    #[tokio::test]
    async fn lag_is_counted_and_relay_continues() {
        let (hub, journal) = setup(HubConfig::default());
        let bus = Bus::<u32>::new(2);
        let rx = bus.subscribe();

        for v in 1..=5 {
            bus.publish_next(v);
        }
        bus.publish_completed();

        let stats = Relay::new(hub, RelayConfig::default())
            .run(rx, CancellationToken::new())
            .await;
        assert_eq!(stats.lagged, 4);
        assert_eq!(stats.relayed, 2);
        assert_eq!(*journal.entries.lock(), vec!["next:5", "completed"]);
    }

    #[tokio::test]
    async fn cancellation_stops_relay() {
        let (hub, journal) = setup(HubConfig::default());
        let bus = Bus::<u32>::new(4);
        let token = CancellationToken::new();
        let relay = Relay::new(hub, RelayConfig::default()).spawn(bus.subscribe(), token.clone());

        token.cancel();
        let stats = relay.await.unwrap();
        assert_eq!(stats, RelayStats::default());
        assert!(journal.entries.lock().is_empty());
    }

    #[tokio::test]
    async fn closed_bus_stops_relay_and_rejections_are_counted() {
        let (hub, journal) = setup(HubConfig::with_completion(CompletionPolicy::Reject));
        let bus = Bus::<u32>::new(8);
        let rx = bus.subscribe();
        let config = RelayConfig {
            stop_on_completed: false,
        };

        bus.publish_completed();
        bus.publish_next(7);
        drop(bus);

        let stats = Relay::new(hub, config)
            .run(rx, CancellationToken::new())
            .await;
        assert_eq!(stats.relayed, 1);
        assert_eq!(stats.rejected, 1);
        assert_eq!(*journal.entries.lock(), vec!["completed"]);
    }

    #[tokio::test]
    async fn suppressed_signals_are_counted_apart_from_relayed() {
        let (hub, journal) = setup(HubConfig::with_completion(CompletionPolicy::Ignore));
        let bus = Bus::<u32>::new(8);
        let rx = bus.subscribe();
        let config = RelayConfig {
            stop_on_completed: false,
        };

        bus.publish_completed();
        bus.publish_next(7);
        bus.publish_next(8);
        drop(bus);

        let stats = Relay::new(hub, config)
            .run(rx, CancellationToken::new())
            .await;
        assert_eq!(stats.relayed, 1);
        assert_eq!(stats.suppressed, 2);
        assert_eq!(stats.rejected, 0);
        assert_eq!(*journal.entries.lock(), vec!["completed"]);
    }
}
