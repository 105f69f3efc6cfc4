//! Request construction and execution for a small versioned HTTP API.
//!
//! # Overview
//! A caller hands a base endpoint and `RequestOptions` to a `Client`. The
//! client composes the URL, encodes headers and body into an immutable
//! `RequestDescriptor`, reports it to the observability hook, executes it,
//! and returns a `ResponseEnvelope` whose body can be decoded as JSON or text.
//!
//! # Design
//! - Building is pure and fails fast: empty query, form or JSON inputs are
//!   rejected before any I/O.
//! - Execution has one path. The callback form (`Client::send_with`) and the
//!   async form (`Client::send`) differ only in how the result is delivered.
//! - HTTP status codes are data on the envelope, not errors.
//! - The transport sits behind the `Transport` trait; `UreqTransport` is the
//!   default.

pub mod client;
pub mod compose;
pub mod encode;
pub mod error;
pub mod hook;
pub mod http;
pub mod options;
pub mod transport;

pub use client::Client;
pub use compose::{compose, Endpoint};
pub use encode::{encode, DEFAULT_TIMEOUT};
pub use error::{Error, Result};
pub use hook::{LogHook, LogRecord};
pub use http::{RequestDescriptor, ResponseEnvelope};
pub use options::{HttpMethod, RequestBody, RequestOptions, DEFAULT_API_VERSION, DEFAULT_CLIENT_ID};
pub use transport::{Executor, Transport, UreqTransport};
pub use url::Url;
