//! # LogWriter: tracing event writer
//!
//! A minimal subscriber that turns every signal into a `tracing` event.
//! Use it for tests, demos or as a tap next to real subscribers.
//!
//! ## Example output (fmt subscriber)
//! ```text
//! INFO notifyhub::subscribers::log: next subscriber="ticker-log" value=StockPrice { name: "ACME", price: 2000 }
//! WARN notifyhub::subscribers::log: error subscriber="ticker-log" error=feed outage
//! INFO notifyhub::subscribers::log: completed subscriber="ticker-log"
//! ```

use std::fmt;

use crate::error::SubscriberError;
use crate::events::SignalError;
use crate::subscribers::Subscribe;

/// Signal writer subscriber.
#[derive(Debug, Clone)]
pub struct LogWriter {
    name: &'static str,
}

impl LogWriter {
    /// Construct a new [`LogWriter`] reporting under `name`.
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self { name }
    }
}

impl Default for LogWriter {
    fn default() -> Self {
        Self::new("LogWriter")
    }
}

impl<T: fmt::Debug> Subscribe<T> for LogWriter {
    fn on_next(&self, value: &T) -> Result<(), SubscriberError> {
        tracing::info!(subscriber = self.name, ?value, "next");
        Ok(())
    }

    fn on_error(&self, error: &SignalError) -> Result<(), SubscriberError> {
        tracing::warn!(subscriber = self.name, %error, "error");
        Ok(())
    }

    fn on_completed(&self) -> Result<(), SubscriberError> {
        tracing::info!(subscriber = self.name, "completed");
        Ok(())
    }

    fn name(&self) -> &'static str {
        self.name
    }
}
