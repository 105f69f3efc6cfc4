//! Client facade: builds, logs and executes requests.
//!
//! # Design
//! `Client` owns three things: the observability hook, the transport
//! executor and the default timeout. The hook is a plain field, replaced by
//! assignment through `set_hook`; there is no global logger slot.
//!
//! `build_request` is the only place requests are constructed. Both
//! `send` (async) and `send_with` (callback) go through it, so encoding
//! errors are raised before any I/O and the hook sees every request exactly
//! once, before the network call starts.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::Duration;

use tracing::warn;

use crate::compose::Endpoint;
use crate::encode::{encode, DEFAULT_TIMEOUT};
use crate::error::Result;
use crate::hook::{default_hook, LogHook, LogRecord};
use crate::http::{RequestDescriptor, ResponseEnvelope};
use crate::options::RequestOptions;
use crate::transport::{deliver, Executor, Transport, UreqTransport};

pub struct Client {
    hook: LogHook,
    executor: Executor,
    default_timeout: Duration,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("executor", &self.executor)
            .field("default_timeout", &self.default_timeout)
            .finish_non_exhaustive()
    }
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

impl Client {
    /// Client with the `tracing` hook, the ureq transport and a 60s timeout.
    pub fn new() -> Self {
        Self::with_transport(UreqTransport)
    }

    pub fn with_transport(transport: impl Transport) -> Self {
        Self {
            hook: default_hook(),
            executor: Executor::new(transport),
            default_timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_hook(mut self, hook: impl Fn(&LogRecord) + Send + Sync + 'static) -> Self {
        self.set_hook(hook);
        self
    }

    /// Replace the hook. The previous one is dropped.
    pub fn set_hook(&mut self, hook: impl Fn(&LogRecord) + Send + Sync + 'static) {
        self.hook = Box::new(hook);
    }

    /// Timeout used when the options do not set one.
    pub fn with_default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }

    pub fn default_timeout(&self) -> Duration {
        self.default_timeout
    }

    /// Compose and encode a request, then report it to the hook.
    pub fn build_request(
        &self,
        endpoint: impl Endpoint,
        options: &RequestOptions,
    ) -> Result<RequestDescriptor> {
        let url = endpoint.into_url()?;
        let descriptor = encode(url, options, self.default_timeout)?;

        let record = LogRecord::snapshot(&descriptor, &options.body);
        if catch_unwind(AssertUnwindSafe(|| (self.hook)(&record))).is_err() {
            warn!(url = %record.url, "request hook panicked; continuing");
        }
        Ok(descriptor)
    }

    /// Build and execute a request, suspending until the response arrives.
    pub async fn send(
        &self,
        endpoint: impl Endpoint,
        options: RequestOptions,
    ) -> Result<ResponseEnvelope> {
        let descriptor = self.build_request(endpoint, &options)?;
        self.executor.execute_async(descriptor).await
    }

    /// Build and execute a request, reporting through `on_result`.
    ///
    /// `on_result` fires exactly once and never before this call returns,
    /// including when the request cannot be built.
    pub fn send_with<F>(&self, endpoint: impl Endpoint, options: RequestOptions, on_result: F)
    where
        F: FnOnce(Result<ResponseEnvelope>) + Send + 'static,
    {
        match self.build_request(endpoint, &options) {
            Ok(descriptor) => self.executor.execute(descriptor, on_result),
            Err(err) => deliver(Err(err), on_result),
        }
    }
}
