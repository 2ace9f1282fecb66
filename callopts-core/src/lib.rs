//! Core call-configuration types for callopts.
//!
//! This crate provides the transport-agnostic values shared by the client
//! crate (`callopts-client`) and any transport that consumes them.
//!
//! ## Modules
//!
//! - [`ticker`]: Monotonic time sources
//! - [`deadline`]: Deadlines computed against a ticker
//! - [`attributes`]: Immutable, type-keyed metadata bags
//! - [`testing`]: A manually advanced ticker for deterministic tests
//!
//! All values here are immutable after construction and are `Send + Sync`,
//! so they can be shared between calls and threads without locking.

pub mod attributes;
mod compression;
pub mod deadline;
mod error;
pub mod testing;
pub mod ticker;
mod unit;

pub use attributes::{Attributes, Key};
pub use compression::*;
pub use deadline::{Deadline, defaults};
pub use error::*;
pub use ticker::{SystemTicker, Ticker, nano_time};
pub use unit::{ParseTimeUnitError, TimeUnit};
