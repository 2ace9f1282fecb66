//! Call options for per-call configuration.
//!
//! This module provides [`CallOptions`], the immutable bundle of settings a
//! stub hands to its channel for every call: deadline, authority override,
//! affinity attributes, executor and compressor name.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use callopts_core::{Attributes, CompressionEncoding, Deadline, TimeUnit};
use http::uri::Authority;

use super::executor::Executor;
use crate::error::InvalidAuthority;

/// Options for configuring individual RPC calls.
///
/// `CallOptions` is a value: every `with_*` method returns a new instance with
/// exactly one field replaced and leaves the receiver untouched. Passing
/// `None` clears a field.
///
/// # Example
///
/// ```
/// use callopts_client::CallOptions;
/// use callopts_core::TimeUnit;
///
/// let options = CallOptions::DEFAULT
///     .with_authority(Some("api.example.com"))
///     .with_deadline_after(5, TimeUnit::Seconds)
///     .with_compression(Some("gzip"));
///
/// assert_eq!(options.get_authority(), Some("api.example.com"));
/// assert!(CallOptions::DEFAULT.get_deadline().is_none());
/// ```
#[derive(Clone, Default)]
pub struct CallOptions {
    /// Absolute deadline for the call.
    deadline: Option<Deadline>,
    /// Overrides the channel's authority (`:authority` / `Host`) for this call.
    authority: Option<Arc<str>>,
    /// Opaque routing metadata for the transport.
    affinity: Attributes,
    /// Executor the channel should run this call's callbacks on.
    executor: Option<Arc<dyn Executor>>,
    /// Name of the compressor to use for outgoing messages.
    compressor_name: Option<Arc<str>>,
}

impl CallOptions {
    /// Every field absent, affinity empty.
    pub const DEFAULT: CallOptions = CallOptions {
        deadline: None,
        authority: None,
        affinity: Attributes::EMPTY,
        executor: None,
        compressor_name: None,
    };

    /// Create new default call options.
    pub fn new() -> Self {
        Self::DEFAULT
    }

    /// Override the authority for this call.
    pub fn with_authority(&self, authority: Option<&str>) -> Self {
        Self {
            authority: authority.map(Arc::from),
            ..self.clone()
        }
    }

    /// Like [`with_authority`](Self::with_authority), but rejects values that
    /// are not a valid `host[:port]` authority.
    pub fn try_with_authority(&self, authority: &str) -> Result<Self, InvalidAuthority> {
        Authority::from_str(authority).map_err(|e| InvalidAuthority::new(authority, e))?;
        Ok(self.with_authority(Some(authority)))
    }

    /// Set or clear the deadline.
    pub fn with_deadline(&self, deadline: Option<Deadline>) -> Self {
        Self {
            deadline,
            ..self.clone()
        }
    }

    /// Set a deadline `amount` of `unit` from now.
    pub fn with_deadline_after(&self, amount: i64, unit: TimeUnit) -> Self {
        self.with_deadline(Some(Deadline::after(amount, unit)))
    }

    /// Set the deadline from a raw [`callopts_core::nano_time`] reading.
    #[deprecated(note = "use `with_deadline` with a `Deadline`")]
    pub fn with_deadline_nano_time(&self, deadline_nano_time: Option<i64>) -> Self {
        self.with_deadline(deadline_nano_time.map(Deadline::from_nano_time))
    }

    /// Replace the whole affinity bag. Entries are not merged.
    pub fn with_affinity(&self, affinity: Attributes) -> Self {
        Self {
            affinity,
            ..self.clone()
        }
    }

    /// Set or clear the executor.
    pub fn with_executor(&self, executor: Option<Arc<dyn Executor>>) -> Self {
        Self {
            executor,
            ..self.clone()
        }
    }

    /// Set or clear the compressor name.
    ///
    /// The name is not checked here; the channel decides whether it has a
    /// matching compressor.
    pub fn with_compression(&self, compressor_name: Option<&str>) -> Self {
        Self {
            compressor_name: compressor_name.map(Arc::from),
            ..self.clone()
        }
    }

    /// Set the compressor name from a well-known encoding.
    pub fn with_compression_encoding(&self, encoding: CompressionEncoding) -> Self {
        self.with_compression(Some(encoding.as_str()))
    }

    pub fn get_deadline(&self) -> Option<&Deadline> {
        self.deadline.as_ref()
    }

    pub fn get_authority(&self) -> Option<&str> {
        self.authority.as_deref()
    }

    pub fn get_affinity(&self) -> &Attributes {
        &self.affinity
    }

    pub fn get_executor(&self) -> Option<&Arc<dyn Executor>> {
        self.executor.as_ref()
    }

    pub fn get_compressor(&self) -> Option<&str> {
        self.compressor_name.as_deref()
    }

    /// The compressor name as a well-known encoding.
    ///
    /// `None` when the name is unset or not a known encoding.
    pub fn compression_encoding(&self) -> Option<CompressionEncoding> {
        self.compressor_name
            .as_deref()
            .and_then(|name| CompressionEncoding::from_name(Some(name)))
    }

    /// The deadline as a raw [`callopts_core::nano_time`] reading.
    #[deprecated(note = "use `get_deadline`")]
    pub fn get_deadline_nano_time(&self) -> Option<i64> {
        self.deadline.as_ref().map(Deadline::nano_time)
    }

    /// Field-wise comparison of the logical call configuration.
    ///
    /// Compares deadline, authority and affinity. The executor and compressor
    /// name are not compared: they select *where* and *how* a call runs, not
    /// what it asks for. [`Display`](fmt::Display) still shows both.
    pub fn same_configuration(&self, other: &CallOptions) -> bool {
        self.deadline == other.deadline
            && self.authority == other.authority
            && self.affinity == other.affinity
    }
}

struct OrNull<T>(Option<T>);

impl<T: fmt::Display> fmt::Display for OrNull<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Some(value) => fmt::Display::fmt(value, f),
            None => f.write_str("null"),
        }
    }
}

/// Stable diagnostic form, fields in a fixed order:
///
/// ```text
/// CallOptions{deadline=null, authority=null, affinity={}, executor=null, compressorName=null}
/// ```
impl fmt::Display for CallOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CallOptions{{deadline={}, authority={}, affinity={}, executor={}, compressorName={}}}",
            OrNull(self.deadline.as_ref()),
            OrNull(self.get_authority()),
            self.affinity,
            OrNull(self.executor.as_ref().map(|e| e.type_name())),
            OrNull(self.get_compressor()),
        )
    }
}

impl fmt::Debug for CallOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallOptions")
            .field("deadline", &self.deadline)
            .field("authority", &self.authority)
            .field("affinity", &self.affinity)
            .field("executor", &self.executor.as_ref().map(|e| e.type_name()))
            .field("compressor_name", &self.compressor_name)
            .finish()
    }
}
