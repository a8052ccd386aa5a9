//! # Thread-safe notification hub.
//!
//! [`SharedHub`] is the concurrent variant of [`NotificationHub`](super::NotificationHub):
//! many producer threads may publish, subscribe and cancel at the same time.
//!
//! ## Architecture
//! ```text
//! thread A ── publish_next(a) ──┐
//! thread B ── publish_next(b) ──┼──► delivery lock (re-entrant, one broadcast at a time)
//! thread C ── cancel()        ──┘         │
//!                                         ├─► registry lock: snapshot, release
//!                                         └─► fan-out to snapshot in registration order
//! ```
//!
//! ## Rules
//! - The subscriber list sits behind a single writer lock, held only to mutate or snapshot.
//! - Broadcasts are serialized: callbacks of two broadcasts never interleave.
//! - A callback may publish re-entrantly on the same thread without deadlocking.
//! - `cancel()` racing an in-flight broadcast affects later broadcasts only.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::{Mutex, ReentrantMutex};

use super::config::HubConfig;
use super::fanout::{Delivery, completion_gate, deliver};
use super::registry::{Registry, SubscriptionId, identity_key};
use super::subscription::SharedSubscription;
use crate::error::HubError;
use crate::events::{SignalError, SignalKind, SignalRef};
use crate::subscribers::{Subscribe, SubscriberFn};

/// Subscriber shape accepted by [`SharedHub`].
pub type SharedSubscriber<T> = Arc<dyn Subscribe<T> + Send + Sync>;

pub(crate) struct SharedInner<T: 'static> {
    registry: Mutex<Registry<SharedSubscriber<T>>>,
    delivery: ReentrantMutex<()>,
    completed: AtomicBool,
    config: HubConfig,
}

impl<T: 'static> SharedInner<T> {
    pub(crate) fn cancel(&self, id: SubscriptionId) -> bool {
        let removed = self.registry.lock().remove(id);
        match removed {
            Some(sub) => {
                tracing::debug!(subscriber = sub.name(), %id, "unsubscribed");
                true
            }
            None => false,
        }
    }

    pub(crate) fn is_registered(&self, id: SubscriptionId) -> bool {
        self.registry.lock().contains_id(id)
    }
}

/// Thread-safe broadcast registry over payload type `T`.
///
/// Cheap to clone: clones share the same subscriber list.
pub struct SharedHub<T: 'static> {
    inner: Arc<SharedInner<T>>,
}

impl<T: 'static> SharedHub<T> {
    /// Creates an empty hub with [`HubConfig::default`].
    pub fn new() -> Self {
        Self::with_config(HubConfig::default())
    }

    /// Creates an empty hub with the given configuration.
    pub fn with_config(config: HubConfig) -> Self {
        Self {
            inner: Arc::new(SharedInner {
                registry: Mutex::new(Registry::new()),
                delivery: ReentrantMutex::new(()),
                completed: AtomicBool::new(false),
                config,
            }),
        }
    }

    /// Registers `subscriber` and returns a handle bound to its registration.
    ///
    /// Subscribing an `Arc` that is already registered does not add a second entry.
    pub fn subscribe(&self, subscriber: SharedSubscriber<T>) -> SharedSubscription<T> {
        let key = identity_key(Arc::as_ptr(&subscriber));
        let name = subscriber.name();
        let (id, added) = self.inner.registry.lock().insert(key, subscriber);
        if added {
            tracing::debug!(subscriber = name, %id, "subscribed");
        } else {
            tracing::debug!(subscriber = name, %id, "already subscribed");
        }
        SharedSubscription::new(Arc::downgrade(&self.inner), id)
    }

    /// Subscribes a closure that receives every `next` value.
    pub fn subscribe_fn<F>(&self, name: &'static str, f: F) -> SharedSubscription<T>
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.subscribe(SubscriberFn::arc(name, f))
    }

    /// Broadcasts a value to every active subscriber.
    pub fn publish_next(&self, value: T) -> Result<Delivery, HubError> {
        self.broadcast(SignalRef::Next(&value))
    }

    /// Broadcasts a borrowed value to every active subscriber.
    pub fn publish_next_ref(&self, value: &T) -> Result<Delivery, HubError> {
        self.broadcast(SignalRef::Next(value))
    }

    /// Broadcasts a producer error to every active subscriber.
    pub fn publish_error(&self, error: &SignalError) -> Result<Delivery, HubError> {
        self.broadcast(SignalRef::Error(error))
    }

    /// Broadcasts end-of-session and marks the hub completed.
    pub fn publish_completed(&self) -> Result<Delivery, HubError> {
        self.broadcast(SignalRef::Completed)
    }

    /// Removes every subscriber; returns how many were removed.
    pub fn clear(&self) -> usize {
        let drained = self.inner.registry.lock().drain();
        let n = drained.len();
        // Lock released: dropping a subscriber may cancel through its own guard.
        drop(drained);
        tracing::debug!(removed = n, "subscribers cleared");
        n
    }

    /// Number of active subscribers.
    pub fn len(&self) -> usize {
        self.inner.registry.lock().len()
    }

    /// True if there are no active subscribers.
    pub fn is_empty(&self) -> bool {
        self.inner.registry.lock().is_empty()
    }

    /// True if this exact allocation is currently subscribed.
    pub fn contains<S: ?Sized>(&self, subscriber: &Arc<S>) -> bool {
        let key = identity_key(Arc::as_ptr(subscriber));
        self.inner.registry.lock().contains_key(key)
    }

    /// True once `publish_completed` has been called.
    pub fn is_completed(&self) -> bool {
        self.inner.completed.load(Ordering::Acquire)
    }

    /// Configuration this hub was built with.
    pub fn config(&self) -> &HubConfig {
        &self.inner.config
    }

    pub(crate) fn broadcast(&self, signal: SignalRef<'_, T>) -> Result<Delivery, HubError> {
        let inner = &self.inner;
        let _serial = inner.delivery.lock();

        let kind = signal.kind();
        if let Some(skipped) =
            completion_gate(inner.config.completion, self.is_completed(), kind)?
        {
            return Ok(skipped);
        }
        if kind == SignalKind::Completed {
            inner.completed.store(true, Ordering::Release);
        }

        let snapshot = inner.registry.lock().snapshot();
        tracing::trace!(signal = kind.as_str(), recipients = snapshot.len(), "broadcast");
        let delivery = deliver(
            snapshot.iter().map(|s| &**s as &dyn Subscribe<T>),
            signal,
        );

        if kind == SignalKind::Completed && inner.config.clear_on_complete {
            self.clear();
        }
        Ok(delivery)
    }
}

impl<T: 'static> Clone for SharedHub<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: 'static> Default for SharedHub<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> fmt::Debug for SharedHub<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedHub")
            .field("subscribers", &self.len())
            .field("completed", &self.is_completed())
            .field("config", &self.inner.config)
            .finish()
    }
}
