//! Hub signals: types and broadcast bus.
//!
//! This module groups the signal **data model** and the **bus** used to feed a
//! [`SharedHub`](crate::SharedHub) from async producers.
//!
//! ## Contents
//! - [`SignalKind`], [`SignalRef`], [`Signal`] classification and payloads
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`

mod bus;
mod signal;

pub use bus::Bus;
pub use signal::{Signal, SignalError, SignalKind, SignalRef};
