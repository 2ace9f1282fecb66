//! Per-call configuration for RPC clients.
//!
//! This crate provides the pieces a client uses to carry call-scoped settings
//! from a stub down to the transport:
//!
//! - [`CallOptions`]: an immutable bundle of deadline, authority override,
//!   affinity attributes, executor and compressor name
//! - [`Stub`]: "reconfigure by deriving" for stub types, plus the generic
//!   [`ClientStub`]
//! - [`Channel`] / [`ClientCall`]: the boundary a transport implements
//!
//! ## Example
//!
//! ```ignore
//! use callopts_client::{ClientStub, MethodDescriptor, MethodType, Stub};
//! use callopts_core::TimeUnit;
//!
//! const ECHO: MethodDescriptor =
//!     MethodDescriptor::new("echo.v1.EchoService/Echo", MethodType::Unary);
//!
//! let stub = ClientStub::new(channel);
//!
//! // Derive a stub with a deadline; `stub` itself is unchanged.
//! let hurried = stub.with_deadline_after(2, TimeUnit::Seconds);
//!
//! let response = hurried.call_unary(&ECHO, request).await?;
//! ```
//!
//! ## Deadlines
//!
//! Deadlines are computed against a monotonic [`Ticker`](callopts_core::Ticker).
//! Production code uses the system ticker; tests substitute
//! [`FakeTicker`](callopts_core::testing::FakeTicker) and advance it by hand:
//!
//! ```
//! use callopts_client::CallOptions;
//! use callopts_core::testing::FakeTicker;
//! use callopts_core::{Deadline, TimeUnit};
//!
//! let ticker = FakeTicker::new();
//! let options = CallOptions::DEFAULT.with_deadline(Some(Deadline::after_with_ticker(
//!     1,
//!     TimeUnit::Seconds,
//!     ticker.shared(),
//! )));
//!
//! ticker.forward(1, TimeUnit::Seconds);
//! assert!(options.get_deadline().unwrap().is_expired());
//! ```
//!
//! Expiry is a polled predicate. Channels check it and fail calls with
//! [`Code::DeadlineExceeded`]; nothing in this crate cancels work on its own.
//!
//! ## Feature Flags
//!
//! | Feature | Description | Dependencies |
//! |---------|-------------|--------------|
//! | `tracing` | Tracing spans for stub calls | `tracing` |
//!
//! When enabled, each call creates a span with:
//! - `rpc.method`: Full method name (e.g., "package.Service/Method")
//! - `rpc.type`: Call type ("unary", "server_stream", "client_stream", "bidi_stream")
//! - `rpc.authority`: The per-call authority override, or the channel's authority
//! - `rpc.deadline_ms`: Milliseconds left on the deadline, if one is set
//! - `otel.kind`: "client"

mod channel;
pub mod config;
mod error;
mod stub;

pub use channel::{CallFuture, Channel, ClientCall, MethodDescriptor, MethodType};
pub use error::{ClientError, InvalidAuthority};
pub use stub::{ClientStub, Stub};

// Re-export from config module
pub use config::{CallOptions, DirectExecutor, Executor, Task, TokioExecutor};

// Re-export core types that users need
pub use callopts_core::{Attributes, Code, CompressionEncoding, Deadline, Key, TimeUnit};

// Re-export types needed by channel implementations
pub use bytes::Bytes;
