//! Error types used by the notification hubs and their subscribers.
//!
//! This module defines:
//!
//! - [`HubError`]: errors returned by a hub's `publish_*` operations.
//! - [`SubscriberError`]: the error a subscriber callback returns to signal failure.
//! - [`SubscriberFailure`]: a per-subscriber diagnostic collected during fan-out.
//!
//! Subscriber failures never abort a broadcast. They are logged, recorded in the
//! [`Delivery`](crate::Delivery) report and delivery continues with the next subscriber.
//! `HubError` and `FailureCause` provide `as_label` / `as_message` helpers for logs.

use std::borrow::Cow;

use thiserror::Error;

use crate::events::SignalKind;

/// # Errors produced by a notification hub.
///
/// Only raised when the hub is configured with
/// [`CompletionPolicy::Reject`](crate::CompletionPolicy::Reject).
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HubError {
    /// A signal was published after the hub had already broadcast `completed`.
    #[error("hub already completed; rejected {signal} signal")]
    Completed {
        /// Kind of the rejected signal.
        signal: SignalKind,
    },
}

impl HubError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use notifyhub::{HubError, SignalKind};
    ///
    /// let err = HubError::Completed { signal: SignalKind::Next };
    /// assert_eq!(err.as_label(), "hub_completed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            HubError::Completed { .. } => "hub_completed",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            HubError::Completed { signal } => {
                format!("publish after completed: signal={}", signal.as_str())
            }
        }
    }
}

/// # Error returned by a subscriber callback.
///
/// Carries a message only; subscribers wrap whatever went wrong on their side.
///
/// ```
/// use notifyhub::SubscriberError;
///
/// let err = SubscriberError::new("report printer offline");
/// assert_eq!(err.to_string(), "report printer offline");
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct SubscriberError {
    message: Cow<'static, str>,
}

impl SubscriberError {
    /// Creates a new error with the given message.
    pub fn new(message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Returns the error message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<&'static str> for SubscriberError {
    fn from(message: &'static str) -> Self {
        Self::new(message)
    }
}

impl From<String> for SubscriberError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

/// Why a subscriber callback failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FailureCause {
    /// The callback returned `Err`.
    #[error("returned error: {0}")]
    Returned(#[from] SubscriberError),

    /// The callback panicked; holds the extracted panic message.
    #[error("panicked: {0}")]
    Panicked(String),
}

impl FailureCause {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            FailureCause::Returned(_) => "subscriber_error",
            FailureCause::Panicked(_) => "subscriber_panicked",
        }
    }

    /// Returns the failure message without the classification prefix.
    pub fn as_message(&self) -> String {
        match self {
            FailureCause::Returned(err) => err.message().to_string(),
            FailureCause::Panicked(info) => info.clone(),
        }
    }

    /// True if the callback panicked.
    pub fn is_panic(&self) -> bool {
        matches!(self, FailureCause::Panicked(_))
    }
}

/// # A single subscriber's failure during one broadcast.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("subscriber '{subscriber}' failed on {signal}: {cause}")]
pub struct SubscriberFailure {
    /// Name reported by [`Subscribe::name`](crate::Subscribe::name).
    pub subscriber: &'static str,
    /// Signal being delivered when the failure happened.
    pub signal: SignalKind,
    /// What went wrong.
    pub cause: FailureCause,
}
