//! # Closure-backed subscriber (`SubscriberFn`)
//!
//! [`SubscriberFn`] wraps a closure `F: Fn(&T)` and forwards every `next` signal to it.
//! `error` and `completed` signals are accepted and ignored.
//!
//! ## Example
//! ```rust
//! use notifyhub::{NotificationHub, SubscriberFn};
//!
//! let hub = NotificationHub::<u32>::new();
//! let sub = SubscriberFn::rc("printer", |price: &u32| println!("price={price}"));
//! let _handle = hub.subscribe(sub);
//! assert_eq!(hub.len(), 1);
//! ```

use std::rc::Rc;
use std::sync::Arc;

use crate::error::SubscriberError;
use crate::subscribers::Subscribe;

/// Function-backed subscriber.
pub struct SubscriberFn<F> {
    name: &'static str,
    f: F,
}

impl<F> SubscriberFn<F> {
    /// Creates a new function-backed subscriber.
    ///
    /// Prefer [`SubscriberFn::rc`] / [`SubscriberFn::arc`] when you immediately
    /// need a shared handle for a hub.
    pub fn new(name: &'static str, f: F) -> Self {
        Self { name, f }
    }

    /// Creates the subscriber behind an `Rc`, for [`NotificationHub`](crate::NotificationHub).
    pub fn rc(name: &'static str, f: F) -> Rc<Self> {
        Rc::new(Self::new(name, f))
    }

    /// Creates the subscriber behind an `Arc`, for [`SharedHub`](crate::SharedHub).
    pub fn arc(name: &'static str, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

impl<T, F> Subscribe<T> for SubscriberFn<F>
where
    F: Fn(&T) + 'static,
{
    fn on_next(&self, value: &T) -> Result<(), SubscriberError> {
        (self.f)(value);
        Ok(())
    }

    fn name(&self) -> &'static str {
        self.name
    }
}
