//! # Failure-isolated fan-out.
//!
//! [`deliver`] hands one signal to every subscriber of a snapshot, in order, and
//! collects a [`Delivery`] report.
//!
//! ## Architecture
//! ```text
//! deliver(snapshot, signal)
//!     │
//!     ├──► sub1.on_signal() ── Ok
//!     ├──► sub2.on_signal() ── Err(e)  → SubscriberFailure::Returned, warn!, continue
//!     ├──► sub3.on_signal() ── panic   → SubscriberFailure::Panicked, warn!, continue
//!     └──► subN.on_signal() ── Ok
//! ```
//!
//! ## Panic handling
//! Each callback runs inside `catch_unwind`:
//! - the panic is converted into [`FailureCause::Panicked`] with its message,
//! - delivery continues with the next subscriber.
//!
//! **Warning**: `AssertUnwindSafe` is used, which can leave shared state inconsistent
//! if the subscriber panics while holding a `RefCell` borrow or a lock.

use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};

use crate::core::config::CompletionPolicy;
use crate::error::{FailureCause, HubError, SubscriberFailure};
use crate::events::{SignalKind, SignalRef};
use crate::subscribers::Subscribe;

/// Outcome of one broadcast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    /// Kind of the broadcast signal.
    pub signal: SignalKind,
    /// Number of subscribers in the snapshot the signal was delivered to.
    pub recipients: usize,
    /// Subscribers whose callback returned `Err` or panicked, in delivery order.
    pub failures: Vec<SubscriberFailure>,
    /// True if the completion policy dropped the broadcast before any delivery.
    pub suppressed: bool,
}

impl Delivery {
    pub(crate) fn suppressed(signal: SignalKind) -> Self {
        Self {
            signal,
            recipients: 0,
            failures: Vec::new(),
            suppressed: true,
        }
    }

    /// True if every recipient handled the signal without failing.
    #[inline]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// Number of recipients whose callback succeeded.
    #[inline]
    pub fn succeeded(&self) -> usize {
        self.recipients - self.failures.len()
    }
}

/// Delivers `signal` to each subscriber in iteration order.
pub(crate) fn deliver<'a, T, I>(subscribers: I, signal: SignalRef<'_, T>) -> Delivery
where
    T: 'static,
    I: IntoIterator<Item = &'a dyn Subscribe<T>>,
{
    let kind = signal.kind();
    let mut recipients = 0;
    let mut failures = Vec::new();

    for sub in subscribers {
        recipients += 1;
        let cause = match catch_unwind(AssertUnwindSafe(|| sub.on_signal(signal))) {
            Ok(Ok(())) => continue,
            Ok(Err(err)) => FailureCause::Returned(err),
            Err(panic_err) => FailureCause::Panicked(panic_message(&*panic_err)),
        };

        tracing::warn!(
            subscriber = sub.name(),
            signal = kind.as_str(),
            label = cause.as_label(),
            reason = %cause.as_message(),
            "subscriber callback failed"
        );
        failures.push(SubscriberFailure {
            subscriber: sub.name(),
            signal: kind,
            cause,
        });
    }

    Delivery {
        signal: kind,
        recipients,
        failures,
        suppressed: false,
    }
}

/// Applies the completion policy to a signal about to be broadcast.
///
/// - `Ok(None)` → deliver
/// - `Ok(Some(delivery))` → drop the broadcast, return `delivery`
/// - `Err(..)` → reject
pub(crate) fn completion_gate(
    policy: CompletionPolicy,
    completed: bool,
    signal: SignalKind,
) -> Result<Option<Delivery>, HubError> {
    if !completed {
        return Ok(None);
    }
    match policy {
        CompletionPolicy::Allow => Ok(None),
        CompletionPolicy::Ignore => {
            tracing::debug!(signal = signal.as_str(), "dropping signal after completed");
            Ok(Some(Delivery::suppressed(signal)))
        }
        CompletionPolicy::Reject => Err(HubError::Completed { signal }),
    }
}

fn panic_message(any: &(dyn Any + Send)) -> String {
    if let Some(msg) = any.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = any.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::error::SubscriberError;

    struct Recorder {
        name: &'static str,
        log: Rc<RefCell<Vec<String>>>,
        mode: Mode,
    }

    enum Mode {
        Ok,
        Fail,
        Panic,
    }

    impl Subscribe<u32> for Recorder {
        fn on_next(&self, value: &u32) -> Result<(), SubscriberError> {
            self.log.borrow_mut().push(format!("{}:{}", self.name, value));
            match self.mode {
                Mode::Ok => Ok(()),
                Mode::Fail => Err(SubscriberError::new("rejected")),
                Mode::Panic => panic!("{} exploded", self.name),
            }
        }

        fn name(&self) -> &'static str {
            self.name
        }
    }

    fn recorder(name: &'static str, log: &Rc<RefCell<Vec<String>>>, mode: Mode) -> Recorder {
        Recorder {
            name,
            log: Rc::clone(log),
            mode,
        }
    }

    #[test]
    fn delivers_in_order_and_counts_recipients() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let subs = [
            recorder("a", &log, Mode::Ok),
            recorder("b", &log, Mode::Ok),
        ];

        let d = deliver(subs.iter().map(|s| s as &dyn Subscribe<u32>), SignalRef::Next(&5));

        assert_eq!(*log.borrow(), vec!["a:5", "b:5"]);
        assert_eq!(d.recipients, 2);
        assert!(d.is_clean());
        assert!(!d.suppressed);
        assert_eq!(d.signal, SignalKind::Next);
    }

    #[test]
    fn failures_are_isolated_and_reported() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let subs = [
            recorder("a", &log, Mode::Fail),
            recorder("b", &log, Mode::Panic),
            recorder("c", &log, Mode::Ok),
        ];

        let d = deliver(subs.iter().map(|s| s as &dyn Subscribe<u32>), SignalRef::Next(&1));

        assert_eq!(*log.borrow(), vec!["a:1", "b:1", "c:1"]);
        assert_eq!(d.recipients, 3);
        assert_eq!(d.succeeded(), 1);
        assert_eq!(d.failures.len(), 2);
        assert_eq!(d.failures[0].subscriber, "a");
        assert_eq!(
            d.failures[0].cause,
            FailureCause::Returned(SubscriberError::new("rejected"))
        );
        assert_eq!(d.failures[1].subscriber, "b");
        assert_eq!(
            d.failures[1].cause,
            FailureCause::Panicked("b exploded".to_string())
        );
    }

    #[test]
    fn panic_message_handles_static_and_owned() {
        let s: Box<dyn Any + Send> = Box::new("static");
        let o: Box<dyn Any + Send> = Box::new(String::from("owned"));
        let other: Box<dyn Any + Send> = Box::new(42u8);
        assert_eq!(panic_message(&*s), "static");
        assert_eq!(panic_message(&*o), "owned");
        assert_eq!(panic_message(&*other), "unknown panic");
    }

    #[test]
    fn gate_is_open_before_completion() {
        for policy in [
            CompletionPolicy::Allow,
            CompletionPolicy::Ignore,
            CompletionPolicy::Reject,
        ] {
            assert_eq!(completion_gate(policy, false, SignalKind::Next), Ok(None));
        }
    }

    #[test]
    fn gate_after_completion_follows_policy() {
        assert_eq!(
            completion_gate(CompletionPolicy::Allow, true, SignalKind::Next),
            Ok(None)
        );
        assert_eq!(
            completion_gate(CompletionPolicy::Ignore, true, SignalKind::Next),
            Ok(Some(Delivery::suppressed(SignalKind::Next)))
        );
        assert_eq!(
            completion_gate(CompletionPolicy::Reject, true, SignalKind::Error),
            Err(HubError::Completed {
                signal: SignalKind::Error
            })
        );
    }

    #[test]
    fn suppressed_delivery_has_no_recipients() {
        let d = Delivery::suppressed(SignalKind::Completed);
        assert!(d.suppressed);
        assert_eq!(d.recipients, 0);
        assert!(d.is_clean());
    }
}
