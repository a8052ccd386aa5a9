//! # Single-threaded notification hub.
//!
//! [`NotificationHub`] keeps an ordered set of subscribers and broadcasts
//! `next` / `error` / `completed` signals to them inline.
//!
//! ## Architecture
//! ```text
//! subscribe(sub) ──► Registry (insertion order, unique by Rc identity) ──► Subscription
//!
//! publish_next(v)
//!     ├─► completion gate (CompletionPolicy)
//!     ├─► snapshot = registry.snapshot()      (borrow released here)
//!     └─► fan-out: sub1.on_next(&v) ─► sub2.on_next(&v) ─► ... ─► Delivery
//! ```
//!
//! ## Rules
//! - **Synchronous**: callbacks run before `publish_*` returns, in registration order.
//! - **Snapshot per broadcast**: callbacks may cancel, subscribe or publish re-entrantly;
//!   the in-flight broadcast still goes to the snapshot taken at its start.
//! - **Idempotent subscribe**: the same `Rc` allocation is registered at most once.
//! - **Completion**: `publish_completed` marks the hub completed; what later publishes
//!   do is decided by [`CompletionPolicy`](crate::CompletionPolicy).
//!
//! ## Example
//! ```rust
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use notifyhub::{NotificationHub, SubscriberFn};
//!
//! let seen = Rc::new(RefCell::new(Vec::new()));
//! let sink = Rc::clone(&seen);
//!
//! let channel = NotificationHub::<String>::new();
//! let priya = channel.subscribe(SubscriberFn::rc("priya", move |title: &String| {
//!     sink.borrow_mut().push(title.clone());
//! }));
//!
//! channel.publish_next("Part 1".to_string()).unwrap();
//! priya.cancel();
//! channel.publish_next("Part 2".to_string()).unwrap();
//!
//! assert_eq!(*seen.borrow(), vec!["Part 1".to_string()]);
//! ```

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use super::config::HubConfig;
use super::fanout::{Delivery, completion_gate, deliver};
use super::registry::{Registry, SubscriptionId, identity_key};
use super::subscription::Subscription;
use crate::error::HubError;
use crate::events::{SignalError, SignalKind, SignalRef};
use crate::subscribers::{Subscribe, SubscriberFn};

pub(crate) struct HubInner<T: 'static> {
    registry: RefCell<Registry<Rc<dyn Subscribe<T>>>>,
    completed: Cell<bool>,
    config: HubConfig,
}

impl<T: 'static> HubInner<T> {
    pub(crate) fn cancel(&self, id: SubscriptionId) -> bool {
        let removed = self.registry.borrow_mut().remove(id);
        match removed {
            Some(sub) => {
                tracing::debug!(subscriber = sub.name(), %id, "unsubscribed");
                true
            }
            None => false,
        }
    }

    pub(crate) fn is_registered(&self, id: SubscriptionId) -> bool {
        self.registry.borrow().contains_id(id)
    }
}

/// Single-threaded broadcast registry over payload type `T`.
pub struct NotificationHub<T: 'static> {
    inner: Rc<HubInner<T>>,
}

impl<T: 'static> NotificationHub<T> {
    /// Creates an empty hub with [`HubConfig::default`].
    pub fn new() -> Self {
        Self::with_config(HubConfig::default())
    }

    /// Creates an empty hub with the given configuration.
    pub fn with_config(config: HubConfig) -> Self {
        Self {
            inner: Rc::new(HubInner {
                registry: RefCell::new(Registry::new()),
                completed: Cell::new(false),
                config,
            }),
        }
    }

    /// Registers `subscriber` and returns a handle bound to its registration.
    ///
    /// Subscribing an `Rc` that is already registered does not add a second entry;
    /// the returned handle is bound to the existing registration.
    pub fn subscribe(&self, subscriber: Rc<dyn Subscribe<T>>) -> Subscription<T> {
        let key = identity_key(Rc::as_ptr(&subscriber));
        let name = subscriber.name();
        let (id, added) = self.inner.registry.borrow_mut().insert(key, subscriber);
        if added {
            tracing::debug!(subscriber = name, %id, "subscribed");
        } else {
            tracing::debug!(subscriber = name, %id, "already subscribed");
        }
        Subscription::new(Rc::downgrade(&self.inner), id)
    }

    /// Subscribes a closure that receives every `next` value.
    pub fn subscribe_fn<F>(&self, name: &'static str, f: F) -> Subscription<T>
    where
        F: Fn(&T) + 'static,
    {
        self.subscribe(SubscriberFn::rc(name, f))
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

    /// Broadcasts end-of-session to every active subscriber and marks the hub completed.
    ///
    /// The subscriber list is kept unless [`HubConfig::clear_on_complete`] is set.
    pub fn publish_completed(&self) -> Result<Delivery, HubError> {
        self.broadcast(SignalRef::Completed)
    }

    /// Removes every subscriber; returns how many were removed.
    pub fn clear(&self) -> usize {
        let drained = self.inner.registry.borrow_mut().drain();
        let n = drained.len();
        // Borrow released: dropping a subscriber may cancel through its own guard.
        drop(drained);
        tracing::debug!(removed = n, "subscribers cleared");
        n
    }

    /// Number of active subscribers.
    pub fn len(&self) -> usize {
        self.inner.registry.borrow().len()
    }

    /// True if there are no active subscribers.
    pub fn is_empty(&self) -> bool {
        self.inner.registry.borrow().is_empty()
    }

    /// True if this exact allocation is currently subscribed.
    pub fn contains<S: ?Sized>(&self, subscriber: &Rc<S>) -> bool {
        let key = identity_key(Rc::as_ptr(subscriber));
        self.inner.registry.borrow().contains_key(key)
    }

    /// True once `publish_completed` has been called.
    pub fn is_completed(&self) -> bool {
        self.inner.completed.get()
    }

    /// Configuration this hub was built with.
    pub fn config(&self) -> &HubConfig {
        &self.inner.config
    }

    fn broadcast(&self, signal: SignalRef<'_, T>) -> Result<Delivery, HubError> {
        let inner = &self.inner;
        let kind = signal.kind();
        if let Some(skipped) =
            completion_gate(inner.config.completion, inner.completed.get(), kind)?
        {
            return Ok(skipped);
        }
        if kind == SignalKind::Completed {
            inner.completed.set(true);
        }

        let snapshot = inner.registry.borrow().snapshot();
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

impl<T: 'static> Default for NotificationHub<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> fmt::Debug for NotificationHub<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotificationHub")
            .field("subscribers", &self.len())
            .field("completed", &self.is_completed())
            .field("config", &self.inner.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{FailureCause, SubscriberError};
    use crate::{CompletionPolicy, SubscriptionGuard};

    type Log = Rc<RefCell<Vec<String>>>;

    /// Records every callback as `"<name>:<signal>[:value]"`.
    struct Probe {
        name: &'static str,
        log: Log,
    }

    impl Probe {
        fn rc(name: &'static str, log: &Log) -> Rc<Self> {
            Rc::new(Self {
                name,
                log: Rc::clone(log),
            })
        }
    }

    impl Subscribe<&'static str> for Probe {
        fn on_next(&self, value: &&'static str) -> Result<(), SubscriberError> {
            self.log.borrow_mut().push(format!("{}:next:{}", self.name, value));
            Ok(())
        }

        fn on_error(&self, error: &SignalError) -> Result<(), SubscriberError> {
            self.log.borrow_mut().push(format!("{}:error:{}", self.name, error));
            Ok(())
        }

        fn on_completed(&self) -> Result<(), SubscriberError> {
            self.log.borrow_mut().push(format!("{}:completed", self.name));
            Ok(())
        }

        fn name(&self) -> &'static str {
            self.name
        }
    }

    fn log() -> Log {
        Rc::new(RefCell::new(Vec::new()))
    }

    #[test]
    fn size_tracks_distinct_subscribers_minus_cancelled() {
        let hub = NotificationHub::<&'static str>::new();
        let log = log();
        let a = hub.subscribe(Probe::rc("a", &log));
        let _b = hub.subscribe(Probe::rc("b", &log));
        let _c = hub.subscribe(Probe::rc("c", &log));
        assert_eq!(hub.len(), 3);

        assert!(a.cancel());
        assert_eq!(hub.len(), 2);
    }

    #[test]
    fn duplicate_subscribe_is_absorbed() {
        let hub = NotificationHub::<&'static str>::new();
        let log = log();
        let a = Probe::rc("a", &log);

        let first = hub.subscribe(a.clone());
        let second = hub.subscribe(a.clone());
        assert_eq!(hub.len(), 1);
        assert_eq!(first.id(), second.id());
        assert!(hub.contains(&a));

        hub.publish_next("x").unwrap();
        assert_eq!(*log.borrow(), vec!["a:next:x"]);
    }

    #[test]
    fn cancel_twice_is_noop() {
        let hub = NotificationHub::<&'static str>::new();
        let log = log();
        let a = hub.subscribe(Probe::rc("a", &log));
        let _b = hub.subscribe(Probe::rc("b", &log));

        assert!(a.cancel());
        assert!(!a.cancel());
        assert!(!a.is_active());
        assert_eq!(hub.len(), 1);
    }

    #[test]
    fn stale_handle_does_not_remove_new_registration() {
        let hub = NotificationHub::<&'static str>::new();
        let log = log();
        let a = Probe::rc("a", &log);

        let old = hub.subscribe(a.clone());
        old.cancel();
        let fresh = hub.subscribe(a.clone());
        assert_ne!(old.id(), fresh.id());

        assert!(!old.cancel());
        assert!(fresh.is_active());
        assert_eq!(hub.len(), 1);
    }

    #[test]
    fn error_and_completed_reach_every_subscriber_once() {
        let hub = NotificationHub::<&'static str>::new();
        let log = log();
        let _a = hub.subscribe(Probe::rc("a", &log));
        let _b = hub.subscribe(Probe::rc("b", &log));

        let err = std::io::Error::other("camera offline");
        hub.publish_error(&err).unwrap();
        let d = hub.publish_completed().unwrap();

        assert_eq!(
            *log.borrow(),
            vec![
                "a:error:camera offline",
                "b:error:camera offline",
                "a:completed",
                "b:completed",
            ]
        );
        assert_eq!(d.signal, SignalKind::Completed);
        assert_eq!(d.recipients, 2);
        assert!(hub.is_completed());
        assert_eq!(hub.len(), 2);
    }

    #[test]
    fn clear_on_complete_drops_subscribers() {
        let hub = NotificationHub::<&'static str>::with_config(HubConfig {
            clear_on_complete: true,
            ..HubConfig::default()
        });
        let log = log();
        let a = hub.subscribe(Probe::rc("a", &log));

        hub.publish_completed().unwrap();
        assert!(hub.is_empty());
        assert!(!a.is_active());
        assert!(!a.cancel());
    }

    #[test]
    fn allow_policy_delivers_after_completed() {
        let hub = NotificationHub::<&'static str>::new();
        let log = log();
        let _a = hub.subscribe(Probe::rc("a", &log));

        hub.publish_completed().unwrap();
        let d = hub.publish_next("late").unwrap();
        assert_eq!(d.recipients, 1);
        assert_eq!(*log.borrow(), vec!["a:completed", "a:next:late"]);
    }

    #[test]
    fn ignore_policy_suppresses_after_completed() {
        let hub = NotificationHub::<&'static str>::with_config(HubConfig::with_completion(
            CompletionPolicy::Ignore,
        ));
        let log = log();
        let _a = hub.subscribe(Probe::rc("a", &log));

        hub.publish_completed().unwrap();
        let d = hub.publish_next("late").unwrap();
        assert!(d.suppressed);
        assert_eq!(d.recipients, 0);
        assert_eq!(*log.borrow(), vec!["a:completed"]);
    }

    #[test]
    fn reject_policy_errors_after_completed() {
        let hub = NotificationHub::<&'static str>::with_config(HubConfig::with_completion(
            CompletionPolicy::Reject,
        ));
        let log = log();
        let _a = hub.subscribe(Probe::rc("a", &log));

        hub.publish_completed().unwrap();
        assert_eq!(
            hub.publish_next("late"),
            Err(HubError::Completed {
                signal: SignalKind::Next
            })
        );
        assert_eq!(
            hub.publish_completed(),
            Err(HubError::Completed {
                signal: SignalKind::Completed
            })
        );
        assert_eq!(*log.borrow(), vec!["a:completed"]);
    }

    /// Cancels a list of handles from inside its own `on_next`.
    struct Canceller {
        targets: RefCell<Vec<Subscription<&'static str>>>,
        log: Log,
    }

    impl Subscribe<&'static str> for Canceller {
        fn on_next(&self, value: &&'static str) -> Result<(), SubscriberError> {
            self.log.borrow_mut().push(format!("canceller:next:{value}"));
            for handle in self.targets.borrow().iter() {
                handle.cancel();
            }
            Ok(())
        }

        fn name(&self) -> &'static str {
            "canceller"
        }
    }

    #[test]
    fn cancel_during_broadcast_keeps_in_flight_snapshot() {
        let hub = NotificationHub::<&'static str>::new();
        let log = log();
        let canceller = Rc::new(Canceller {
            targets: RefCell::new(Vec::new()),
            log: Rc::clone(&log),
        });
        let own = hub.subscribe(canceller.clone());
        let b = hub.subscribe(Probe::rc("b", &log));
        canceller.targets.borrow_mut().extend([own, b]);

        hub.publish_next("x").unwrap();
        assert_eq!(*log.borrow(), vec!["canceller:next:x", "b:next:x"]);
        assert!(hub.is_empty());

        hub.publish_next("y").unwrap();
        assert_eq!(log.borrow().len(), 2);
    }

    struct Failing;

    impl Subscribe<&'static str> for Failing {
        fn on_next(&self, _value: &&'static str) -> Result<(), SubscriberError> {
            Err(SubscriberError::new("disk full"))
        }

        fn name(&self) -> &'static str {
            "failing"
        }
    }

    #[test]
    fn failing_subscriber_does_not_stop_fan_out() {
        let hub = NotificationHub::<&'static str>::new();
        let log = log();
        let _f = hub.subscribe(Rc::new(Failing));
        let _b = hub.subscribe(Probe::rc("b", &log));

        let d = hub.publish_next("x").unwrap();
        assert_eq!(*log.borrow(), vec!["b:next:x"]);
        assert_eq!(d.failures.len(), 1);
        assert_eq!(d.failures[0].subscriber, "failing");
        assert!(matches!(d.failures[0].cause, FailureCause::Returned(_)));
    }

    #[test]
    fn handle_outliving_hub_is_inert() {
        let log = log();
        let handle = {
            let hub = NotificationHub::<&'static str>::new();
            hub.subscribe(Probe::rc("a", &log))
        };
        assert!(!handle.is_active());
        assert!(!handle.cancel());
    }

    #[test]
    fn guard_cancels_on_drop_and_disarm_keeps_subscription() {
        let hub = NotificationHub::<&'static str>::new();
        let log = log();
        {
            let _guard = hub.subscribe(Probe::rc("a", &log)).into_guard();
            assert_eq!(hub.len(), 1);
        }
        assert!(hub.is_empty());

        let guard = hub.subscribe(Probe::rc("b", &log)).into_guard();
        assert!(guard.handle().is_some_and(|h| h.is_active()));
        let handle = guard.disarm().unwrap();
        assert!(handle.is_active());
        assert_eq!(hub.len(), 1);
    }

    #[test]
    fn subscribe_fn_receives_values() {
        let hub = NotificationHub::<u32>::new();
        let total = Rc::new(Cell::new(0));
        let sink = Rc::clone(&total);
        let _h = hub.subscribe_fn("sum", move |v: &u32| sink.set(sink.get() + v));

        hub.publish_next(2).unwrap();
        hub.publish_next_ref(&3).unwrap();
        assert_eq!(total.get(), 5);
    }

    /// Subscribes a waiting recruit on its first `next`.
    struct Recruiter {
        hub: Rc<NotificationHub<&'static str>>,
        recruit: RefCell<Option<Rc<Probe>>>,
        recruited: RefCell<Vec<Subscription<&'static str>>>,
    }

    impl Subscribe<&'static str> for Recruiter {
        fn on_next(&self, _value: &&'static str) -> Result<(), SubscriberError> {
            if let Some(recruit) = self.recruit.borrow_mut().take() {
                let handle = self.hub.subscribe(recruit);
                self.recruited.borrow_mut().push(handle);
            }
            Ok(())
        }

        fn name(&self) -> &'static str {
            "recruiter"
        }
    }

    #[test]
    fn subscriber_added_during_broadcast_starts_with_the_next_one() {
        let hub = Rc::new(NotificationHub::<&'static str>::new());
        let log = log();
        let _r = hub.subscribe(Rc::new(Recruiter {
            hub: Rc::clone(&hub),
            recruit: RefCell::new(Some(Probe::rc("late", &log))),
            recruited: RefCell::new(Vec::new()),
        }));

        let d = hub.publish_next("x").unwrap();
        assert_eq!(d.recipients, 1);
        assert_eq!(hub.len(), 2);
        assert!(log.borrow().is_empty());

        hub.publish_next("y").unwrap();
        assert_eq!(*log.borrow(), vec!["late:next:y"]);

        // Break the hub <-> recruiter cycle.
        hub.clear();
    }

    /// Keeps a helper registration alive for as long as it lives.
    struct Owner {
        _helper: SubscriptionGuard<Subscription<&'static str>>,
    }

    impl Subscribe<&'static str> for Owner {
        fn on_next(&self, _value: &&'static str) -> Result<(), SubscriberError> {
            Ok(())
        }
    }

    fn owner_with_helper(
        hub: &NotificationHub<&'static str>,
        log: &Log,
    ) -> Subscription<&'static str> {
        let helper = hub.subscribe(Probe::rc("helper", log)).into_guard();
        hub.subscribe(Rc::new(Owner { _helper: helper }))
    }

    #[test]
    fn clear_drops_guard_owning_subscribers_safely() {
        let hub = NotificationHub::<&'static str>::new();
        let log = log();
        let _owner = owner_with_helper(&hub, &log);
        assert_eq!(hub.len(), 2);

        assert_eq!(hub.clear(), 2);
        assert!(hub.is_empty());
        hub.publish_next("x").unwrap();
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn cancelling_an_owner_releases_its_helper() {
        let hub = NotificationHub::<&'static str>::new();
        let log = log();
        let owner = owner_with_helper(&hub, &log);
        assert_eq!(hub.len(), 2);

        assert!(owner.cancel());
        assert!(hub.is_empty());
    }
}
