//! # Hub configuration.
//!
//! Provides [`HubConfig`] settings shared by [`NotificationHub`](super::NotificationHub)
//! and [`SharedHub`](super::SharedHub), and [`RelayConfig`] for the bus relay.
//!
//! ## Defaults
//! - `completion = Allow` → the hub does not police publishes after `completed`
//! - `clear_on_complete = false` → the caller decides whether to clear after `completed`
//! - `stop_on_completed = true` → the relay exits after forwarding `completed`

/// What a hub does with a publish that arrives after `publish_completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompletionPolicy {
    /// Deliver normally; completion is caller discipline.
    #[default]
    Allow,
    /// Drop the broadcast and return a suppressed [`Delivery`](crate::Delivery).
    Ignore,
    /// Return [`HubError::Completed`](crate::HubError::Completed).
    Reject,
}

/// Configuration for a notification hub.
///
/// ## Field semantics
/// - `completion`: handling of `publish_*` after the hub completed
/// - `clear_on_complete`: drop all subscribers right after delivering `completed`
#[derive(Clone, Debug, Default)]
pub struct HubConfig {
    /// Policy for signals published after `completed`.
    pub completion: CompletionPolicy,

    /// Clears the subscriber list after a `completed` broadcast.
    ///
    /// Handles issued before the clear become inactive; `cancel` on them is a no-op.
    pub clear_on_complete: bool,
}

impl HubConfig {
    /// Shorthand for a config with the given completion policy.
    #[inline]
    pub fn with_completion(completion: CompletionPolicy) -> Self {
        Self {
            completion,
            ..Self::default()
        }
    }

    /// True if the hub polices publishes after completion.
    #[inline]
    pub fn enforces_completion(&self) -> bool {
        self.completion != CompletionPolicy::Allow
    }
}

/// Configuration for the [`Relay`](crate::Relay).
#[derive(Clone, Debug)]
pub struct RelayConfig {
    /// Stop relaying after a `completed` signal has been forwarded.
    pub stop_on_completed: bool,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            stop_on_completed: true,
        }
    }
}
