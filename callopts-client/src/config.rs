//! Configuration modules for the callopts client.
//!
//! This module contains per-call configuration:
//! - [`CallOptions`]: Deadline, authority, affinity, executor and compressor
//! - [`Executor`]: The capability a call may be asked to run callbacks on

mod executor;
mod options;

pub use executor::{DirectExecutor, Executor, Task, TokioExecutor};
pub use options::CallOptions;
