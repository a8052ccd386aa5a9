//! # Ordered subscriber registry.
//!
//! [`Registry`] stores the active subscribers of a hub in registration order and
//! guarantees unique membership by allocation identity.
//!
//! Both hubs own one registry behind their own cell/lock:
//! - [`NotificationHub`](super::NotificationHub): `RefCell<Registry<Rc<dyn Subscribe<T>>>>`
//! - [`SharedHub`](super::SharedHub): `Mutex<Registry<Arc<dyn Subscribe<T> + Send + Sync>>>`
//!
//! ## Rules
//! - Each registration gets a fresh [`SubscriptionId`]; ids are never reused.
//! - Inserting an already registered allocation returns the existing id.
//! - Removal is by id, so a stale handle never removes a later re-registration.
//! - [`Registry::snapshot`] clones the pointers; the caller delivers without holding a borrow.

use std::fmt;

/// Identifier of one registration within a hub.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Returns the raw numeric id.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identity key of a shared allocation (`Rc`/`Arc` data pointer, metadata dropped).
#[inline]
pub(crate) fn identity_key<P: ?Sized>(ptr: *const P) -> usize {
    ptr as *const () as usize
}

struct Entry<S> {
    id: SubscriptionId,
    key: usize,
    subscriber: S,
}

/// Insertion-ordered, identity-unique subscriber list.
pub(crate) struct Registry<S> {
    entries: Vec<Entry<S>>,
    next_id: u64,
}

impl<S: Clone> Registry<S> {
    pub(crate) fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 1,
        }
    }

    /// Registers `subscriber` under identity `key`.
    ///
    /// Returns the id and whether a new entry was appended.
    pub(crate) fn insert(&mut self, key: usize, subscriber: S) -> (SubscriptionId, bool) {
        if let Some(entry) = self.entries.iter().find(|e| e.key == key) {
            return (entry.id, false);
        }
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry {
            id,
            key,
            subscriber,
        });
        (id, true)
    }

    /// Removes the entry registered under `id`, if still present.
    pub(crate) fn remove(&mut self, id: SubscriptionId) -> Option<S> {
        let pos = self.entries.iter().position(|e| e.id == id)?;
        Some(self.entries.remove(pos).subscriber)
    }

    pub(crate) fn contains_id(&self, id: SubscriptionId) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    pub(crate) fn contains_key(&self, key: usize) -> bool {
        self.entries.iter().any(|e| e.key == key)
    }

    /// Copies the active subscribers in registration order.
    pub(crate) fn snapshot(&self) -> Vec<S> {
        self.entries.iter().map(|e| e.subscriber.clone()).collect()
    }

    /// Removes every entry and hands the subscribers back.
    ///
    /// Callers drop the returned list only after releasing their borrow or lock:
    /// a subscriber's `Drop` may cancel a registration of this same registry.
    pub(crate) fn drain(&mut self) -> Vec<S> {
        self.entries.drain(..).map(|e| e.subscriber).collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
