//! # Signals broadcast by a hub.
//!
//! Every broadcast carries exactly one of three signals:
//! - **next**: a new payload value,
//! - **error**: a producer-side error,
//! - **completed**: the end of the broadcast session.
//!
//! Two shapes exist:
//! - [`SignalRef`] borrows its payload and is what the hubs hand to the fan-out.
//! - [`Signal`] owns its payload and is what travels through the [`Bus`](super::Bus).
//!
//! ## Example
//! ```rust
//! use notifyhub::{Signal, SignalKind};
//!
//! let sig: Signal<&str> = Signal::Next("C# Tutorial Part 1");
//! assert_eq!(sig.kind(), SignalKind::Next);
//! assert!(!sig.is_terminal());
//! assert!(Signal::<&str>::Completed.is_terminal());
//! ```

use std::error::Error;
use std::fmt;
use std::sync::Arc;

/// Error payload shape shared by hubs, subscribers and the bus.
pub type SignalError = dyn Error + Send + Sync + 'static;

/// Classification of a broadcast signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalKind {
    /// A payload value (`on_next`).
    Next,
    /// A producer error (`on_error`).
    Error,
    /// End of session (`on_completed`).
    Completed,
}

impl SignalKind {
    /// Returns a short stable name for logs.
    pub fn as_str(self) -> &'static str {
        match self {
            SignalKind::Next => "next",
            SignalKind::Error => "error",
            SignalKind::Completed => "completed",
        }
    }
}

impl fmt::Display for SignalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Borrowed signal handed to subscribers during one broadcast.
pub enum SignalRef<'a, T> {
    /// A value.
    Next(&'a T),
    /// A producer-side error.
    Error(&'a SignalError),
    /// End of session.
    Completed,
}

impl<T> SignalRef<'_, T> {
    /// Kind of this signal.
    #[inline]
    pub fn kind(&self) -> SignalKind {
        match self {
            SignalRef::Next(_) => SignalKind::Next,
            SignalRef::Error(_) => SignalKind::Error,
            SignalRef::Completed => SignalKind::Completed,
        }
    }
}

impl<T> Clone for SignalRef<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for SignalRef<'_, T> {}

/// Owned signal, suitable for sending across tasks and threads.
#[derive(Debug, Clone)]
pub enum Signal<T> {
    /// A value.
    Next(T),
    /// A producer-side error, shared between receivers.
    Error(Arc<SignalError>),
    /// End of session.
    Completed,
}

impl<T> Signal<T> {
    /// Wraps any error into an error signal.
    pub fn error(err: impl Error + Send + Sync + 'static) -> Self {
        Signal::Error(Arc::new(err))
    }

    /// Kind of this signal.
    #[inline]
    pub fn kind(&self) -> SignalKind {
        self.as_signal_ref().kind()
    }

    /// True for [`Signal::Completed`].
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Signal::Completed)
    }

    /// Borrows the payload as a [`SignalRef`].
    pub fn as_signal_ref(&self) -> SignalRef<'_, T> {
        match self {
            Signal::Next(value) => SignalRef::Next(value),
            Signal::Error(err) => SignalRef::Error(err.as_ref()),
            Signal::Completed => SignalRef::Completed,
        }
    }
}
