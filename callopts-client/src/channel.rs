//! The boundary between stubs and the transport.
//!
//! A [`Channel`] turns a [`MethodDescriptor`] plus the caller's
//! [`CallOptions`] into a [`ClientCall`]. Everything behind it (connections,
//! codecs, load balancing, deadline enforcement) belongs to the channel
//! implementation.

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use futures::future::BoxFuture;

use crate::ClientError;
use crate::config::CallOptions;

/// The shape of an RPC method.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MethodType {
    Unary,
    ServerStreaming,
    ClientStreaming,
    BidiStreaming,
}

impl MethodType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MethodType::Unary => "unary",
            MethodType::ServerStreaming => "server_stream",
            MethodType::ClientStreaming => "client_stream",
            MethodType::BidiStreaming => "bidi_stream",
        }
    }
}

/// Identifies an RPC method by its full name, e.g. `"package.Service/Method"`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MethodDescriptor {
    full_method_name: &'static str,
    method_type: MethodType,
}

impl MethodDescriptor {
    pub const fn new(full_method_name: &'static str, method_type: MethodType) -> Self {
        Self {
            full_method_name,
            method_type,
        }
    }

    pub fn full_method_name(&self) -> &'static str {
        self.full_method_name
    }

    pub fn method_type(&self) -> MethodType {
        self.method_type
    }

    /// The part before the last `/`, or `None` for a malformed name.
    pub fn service_name(&self) -> Option<&'static str> {
        self.full_method_name
            .rsplit_once('/')
            .map(|(service, _)| service)
    }

    /// The part after the last `/`.
    pub fn method_name(&self) -> &'static str {
        self.full_method_name
            .rsplit_once('/')
            .map_or(self.full_method_name, |(_, method)| method)
    }
}

impl fmt::Display for MethodDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.full_method_name)
    }
}

/// Future resolving to a call's response payload.
pub type CallFuture = BoxFuture<'static, Result<Bytes, ClientError>>;

/// A single call created by a [`Channel`].
pub trait ClientCall: Send {
    /// Send `request` and wait for the response.
    fn start(self: Box<Self>, request: Bytes) -> CallFuture;
}

/// Creates calls for stubs.
///
/// Implementations receive the stub's `CallOptions` as the same `Arc` the
/// stub holds and are responsible for honoring it: enforcing the deadline,
/// applying the authority override and routing on the affinity attributes.
pub trait Channel: Send + Sync + 'static {
    /// Create a call for `method` configured by `call_options`.
    fn new_call(
        &self,
        method: &MethodDescriptor,
        call_options: Arc<CallOptions>,
    ) -> Box<dyn ClientCall>;

    /// The authority calls go to unless overridden per call.
    fn authority(&self) -> &str;
}
