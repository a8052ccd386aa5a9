//! # Subscription handles.
//!
//! `subscribe` returns a handle bound to one hub and one registration:
//! - [`Subscription`] for [`NotificationHub`](super::NotificationHub) (single-threaded),
//! - [`SharedSubscription`] for [`SharedHub`](super::SharedHub) (`Send + Sync`).
//!
//! ## Rules
//! - `cancel()` removes the bound registration if still present; later calls are no-ops.
//! - Handles hold the hub weakly; once the hub is dropped, `cancel()` does nothing.
//! - Cancelling during a broadcast only affects later broadcasts.
//! - [`SubscriptionGuard`] cancels on drop, for scoped subscriptions.
//!
//! ## Example
//! ```rust
//! use notifyhub::{NotificationHub, SubscriberFn};
//!
//! let hub = NotificationHub::<u32>::new();
//! {
//!     let _guard = hub
//!         .subscribe(SubscriberFn::rc("scoped", |_: &u32| {}))
//!         .into_guard();
//!     assert_eq!(hub.len(), 1);
//! }
//! assert!(hub.is_empty());
//! ```

use std::fmt;
use std::rc::Weak;
use std::sync::Weak as SyncWeak;

use super::hub::HubInner;
use super::registry::SubscriptionId;
use super::shared::SharedInner;

/// Something that can release one registration.
pub trait Disposable {
    /// Removes the bound registration; returns `true` if it was still present.
    fn cancel(&self) -> bool;

    /// True while the bound registration is present in its hub.
    fn is_active(&self) -> bool;
}

/// Handle to one registration in a [`NotificationHub`](super::NotificationHub).
pub struct Subscription<T: 'static> {
    hub: Weak<HubInner<T>>,
    id: SubscriptionId,
}

impl<T: 'static> Subscription<T> {
    pub(crate) fn new(hub: Weak<HubInner<T>>, id: SubscriptionId) -> Self {
        Self { hub, id }
    }

    /// Registration id this handle is bound to.
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Removes the bound subscriber from the hub if still present.
    ///
    /// Returns `true` only for the call that actually removed it.
    pub fn cancel(&self) -> bool {
        self.hub.upgrade().is_some_and(|hub| hub.cancel(self.id))
    }

    /// True while the bound subscriber still receives broadcasts.
    pub fn is_active(&self) -> bool {
        self.hub.upgrade().is_some_and(|hub| hub.is_registered(self.id))
    }

    /// Converts the handle into a guard that cancels on drop.
    pub fn into_guard(self) -> SubscriptionGuard<Self> {
        SubscriptionGuard::new(self)
    }
}

impl<T: 'static> Disposable for Subscription<T> {
    fn cancel(&self) -> bool {
        Subscription::cancel(self)
    }

    fn is_active(&self) -> bool {
        Subscription::is_active(self)
    }
}

impl<T: 'static> Clone for Subscription<T> {
    fn clone(&self) -> Self {
        Self {
            hub: Weak::clone(&self.hub),
            id: self.id,
        }
    }
}

impl<T: 'static> fmt::Debug for Subscription<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

/// Handle to one registration in a [`SharedHub`](super::SharedHub).
///
/// `Send + Sync`: may be cancelled from any thread.
pub struct SharedSubscription<T: 'static> {
    hub: SyncWeak<SharedInner<T>>,
    id: SubscriptionId,
}

impl<T: 'static> SharedSubscription<T> {
    pub(crate) fn new(hub: SyncWeak<SharedInner<T>>, id: SubscriptionId) -> Self {
        Self { hub, id }
    }

    /// Registration id this handle is bound to.
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Removes the bound subscriber from the hub if still present.
    ///
    /// A broadcast already in flight still reaches it; later ones do not.
    pub fn cancel(&self) -> bool {
        self.hub.upgrade().is_some_and(|hub| hub.cancel(self.id))
    }

    /// True while the bound subscriber still receives broadcasts.
    pub fn is_active(&self) -> bool {
        self.hub.upgrade().is_some_and(|hub| hub.is_registered(self.id))
    }

    /// Converts the handle into a guard that cancels on drop.
    pub fn into_guard(self) -> SubscriptionGuard<Self> {
        SubscriptionGuard::new(self)
    }
}

impl<T: 'static> Disposable for SharedSubscription<T> {
    fn cancel(&self) -> bool {
        SharedSubscription::cancel(self)
    }

    fn is_active(&self) -> bool {
        SharedSubscription::is_active(self)
    }
}

impl<T: 'static> Clone for SharedSubscription<T> {
    fn clone(&self) -> Self {
        Self {
            hub: SyncWeak::clone(&self.hub),
            id: self.id,
        }
    }
}

impl<T: 'static> fmt::Debug for SharedSubscription<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedSubscription")
            .field("id", &self.id)
            .finish()
    }
}

/// Cancels the wrapped subscription when dropped.
#[must_use = "dropping the guard cancels the subscription immediately"]
pub struct SubscriptionGuard<S: Disposable> {
    handle: Option<S>,
}

impl<S: Disposable> SubscriptionGuard<S> {
    /// Guards `handle`; it is cancelled when the guard drops.
    pub fn new(handle: S) -> Self {
        Self {
            handle: Some(handle),
        }
    }

    /// Releases the handle without cancelling it.
    pub fn disarm(mut self) -> Option<S> {
        self.handle.take()
    }

    /// Borrows the guarded handle.
    pub fn handle(&self) -> Option<&S> {
        self.handle.as_ref()
    }
}

impl<S: Disposable> Drop for SubscriptionGuard<S> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.cancel();
        }
    }
}
