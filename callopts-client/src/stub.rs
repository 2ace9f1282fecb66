//! Stubs: immutable handles binding a channel to a set of call options.
//!
//! Reconfiguring a stub never changes it. Each `with_*` method derives a new
//! stub of the same type, bound to the same channel, holding freshly derived
//! [`CallOptions`]. Every call a stub issues passes its own `Arc<CallOptions>`
//! to the channel, so calls from differently configured stubs are
//! distinguishable by pointer identity at the channel boundary.
//!
//! # Example
//!
//! ```ignore
//! use callopts_client::{ClientStub, Stub};
//! use callopts_core::TimeUnit;
//!
//! let stub = ClientStub::new(channel);
//! let hurried = stub.with_deadline_after(250, TimeUnit::Milliseconds);
//!
//! let response = hurried.call_unary(&ECHO, request).await?;
//! ```

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use callopts_core::{Attributes, Deadline, TimeUnit};
#[cfg(feature = "tracing")]
use futures::FutureExt;
#[cfg(feature = "tracing")]
use tracing::{Instrument, info_span};

use crate::channel::{CallFuture, Channel, MethodDescriptor};
use crate::config::{CallOptions, Executor};

/// Common behavior of all stubs.
///
/// Implementors supply construction and the two accessors; derivation and
/// call issuing come for free.
pub trait Stub: Sized {
    /// Build a stub of this type from its parts.
    fn build(channel: Arc<dyn Channel>, call_options: Arc<CallOptions>) -> Self;

    fn channel(&self) -> &Arc<dyn Channel>;

    /// The options every call from this stub carries.
    fn call_options(&self) -> &Arc<CallOptions>;

    /// A new stub on the same channel with `call_options`.
    fn derive(&self, call_options: CallOptions) -> Self {
        #[cfg(feature = "tracing")]
        tracing::trace!(call_options = %call_options, "derived stub");
        Self::build(Arc::clone(self.channel()), Arc::new(call_options))
    }

    fn with_deadline(&self, deadline: Option<Deadline>) -> Self {
        self.derive(self.call_options().with_deadline(deadline))
    }

    fn with_deadline_after(&self, amount: i64, unit: TimeUnit) -> Self {
        self.derive(self.call_options().with_deadline_after(amount, unit))
    }

    #[deprecated(note = "use `with_deadline` with a `Deadline`")]
    #[allow(deprecated)]
    fn with_deadline_nano_time(&self, deadline_nano_time: Option<i64>) -> Self {
        self.derive(
            self.call_options()
                .with_deadline_nano_time(deadline_nano_time),
        )
    }

    fn with_authority(&self, authority: Option<&str>) -> Self {
        self.derive(self.call_options().with_authority(authority))
    }

    fn with_affinity(&self, affinity: Attributes) -> Self {
        self.derive(self.call_options().with_affinity(affinity))
    }

    fn with_executor(&self, executor: Option<Arc<dyn Executor>>) -> Self {
        self.derive(self.call_options().with_executor(executor))
    }

    fn with_compression(&self, compressor_name: Option<&str>) -> Self {
        self.derive(self.call_options().with_compression(compressor_name))
    }

    /// Issue a unary call carrying this stub's current options.
    fn call_unary(&self, method: &MethodDescriptor, request: Bytes) -> CallFuture {
        let call_options = Arc::clone(self.call_options());

        #[cfg(feature = "tracing")]
        let span = info_span!(
            "rpc.call",
            rpc.method = %method,
            rpc.type = method.method_type().as_str(),
            rpc.authority = call_options
                .get_authority()
                .unwrap_or_else(|| self.channel().authority()),
            rpc.deadline_ms = call_options
                .get_deadline()
                .map(|d| d.time_remaining(TimeUnit::Milliseconds)),
            otel.kind = "client",
        );

        let call = self.channel().new_call(method, call_options);
        let future = call.start(request);

        #[cfg(feature = "tracing")]
        let future = future.instrument(span).boxed();

        future
    }
}

/// A stub for callers without generated service code.
#[derive(Clone)]
pub struct ClientStub {
    channel: Arc<dyn Channel>,
    call_options: Arc<CallOptions>,
}

impl ClientStub {
    /// A stub on `channel` with [`CallOptions::DEFAULT`].
    pub fn new(channel: Arc<dyn Channel>) -> Self {
        Self::build(channel, Arc::new(CallOptions::DEFAULT))
    }
}

impl Stub for ClientStub {
    fn build(channel: Arc<dyn Channel>, call_options: Arc<CallOptions>) -> Self {
        Self {
            channel,
            call_options,
        }
    }

    fn channel(&self) -> &Arc<dyn Channel> {
        &self.channel
    }

    fn call_options(&self) -> &Arc<CallOptions> {
        &self.call_options
    }
}

impl fmt::Debug for ClientStub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientStub")
            .field("authority", &self.channel.authority())
            .field("call_options", &self.call_options)
            .finish()
    }
}
