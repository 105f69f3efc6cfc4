//! Executes a `RequestDescriptor` and normalises the outcome.
//!
//! # Design
//! There is one execution path. `Executor::execute` runs the blocking
//! round trip off the caller's thread and hands the result to a callback.
//! `Executor::execute_async` is that same call with a oneshot channel as the
//! callback, so both forms share timeouts, error mapping and logging.
//!
//! The round trip runs on the Tokio blocking pool when called inside a
//! runtime, and on a detached thread otherwise. The callback is never run on
//! the calling thread before `execute` returns.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tracing::{debug, warn};
use ureq::Agent;

use crate::error::{Error, Result};
use crate::http::{RequestDescriptor, ResponseEnvelope};
use crate::options::HttpMethod;

/// Performs one blocking HTTP exchange.
///
/// `Ok(None)` means the exchange finished without error but produced no
/// usable response; the executor reports it as `Error::NoResponse`.
pub trait Transport: Send + Sync + 'static {
    fn round_trip(&self, request: &RequestDescriptor) -> Result<Option<ResponseEnvelope>>;
}

/// `ureq`-backed transport. Status codes are returned as data, never as errors.
#[derive(Debug, Default, Clone, Copy)]
pub struct UreqTransport;

impl Transport for UreqTransport {
    fn round_trip(&self, request: &RequestDescriptor) -> Result<Option<ResponseEnvelope>> {
        let timeout = request.timeout();
        let agent: Agent = Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(timeout))
            .build()
            .new_agent();

        let url = request.url().as_str();
        let sent = match request.method() {
            HttpMethod::Get => {
                let mut builder = agent.get(url);
                for (k, v) in request.headers() {
                    builder = builder.header(k.as_str(), v.as_str());
                }
                builder.call()
            }
            HttpMethod::Post => {
                let mut builder = agent.post(url);
                // ureq writes Content-Length itself from the sized body.
                for (k, v) in request
                    .headers()
                    .iter()
                    .filter(|(k, _)| !k.eq_ignore_ascii_case("content-length"))
                {
                    builder = builder.header(k.as_str(), v.as_str());
                }
                match request.body() {
                    Some(body) => builder.send(body),
                    None => builder.send_empty(),
                }
            }
        };
        let mut response = sent.map_err(|e| map_ureq_error(e, timeout))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(k, v)| {
                v.to_str()
                    .ok()
                    .map(|v| (k.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response
            .body_mut()
            .with_config()
            .limit(u64::MAX)
            .read_to_vec()
            .map_err(|e| map_ureq_error(e, timeout))?;

        Ok(Some(ResponseEnvelope::new(status, headers, Some(body))))
    }
}

fn map_ureq_error(err: ureq::Error, timeout: Duration) -> Error {
    match err {
        ureq::Error::Timeout(_) => Error::Timeout(timeout),
        ureq::Error::Io(ref io) if io.kind() == std::io::ErrorKind::TimedOut => {
            Error::Timeout(timeout)
        }
        other => Error::Transport(other),
    }
}

#[derive(Clone)]
pub struct Executor {
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for Executor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Executor").finish_non_exhaustive()
    }
}

impl Executor {
    pub fn new(transport: impl Transport) -> Self {
        Self {
            transport: Arc::new(transport),
        }
    }

    /// Issue the request; `on_result` fires exactly once, off this thread.
    pub fn execute<F>(&self, descriptor: RequestDescriptor, on_result: F)
    where
        F: FnOnce(Result<ResponseEnvelope>) + Send + 'static,
    {
        let transport = Arc::clone(&self.transport);
        dispatch(move || {
            let started = Instant::now();
            debug!(method = %descriptor.method(), url = %descriptor.url(), "dispatching request");

            let result = catch_unwind(AssertUnwindSafe(|| transport.round_trip(&descriptor)))
                .unwrap_or_else(|_| {
                    warn!(url = %descriptor.url(), "transport panicked");
                    Ok(None)
                })
                .and_then(|resp| resp.ok_or(Error::NoResponse));

            match &result {
                Ok(resp) => debug!(
                    url = %descriptor.url(),
                    status = resp.status(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "response received"
                ),
                Err(err) => debug!(url = %descriptor.url(), error = %err, "request failed"),
            }
            on_result(result);
        });
    }

    /// Same as `execute`, suspending the caller until the result is ready.
    pub async fn execute_async(&self, descriptor: RequestDescriptor) -> Result<ResponseEnvelope> {
        let (tx, rx) = oneshot::channel();
        self.execute(descriptor, move |result| {
            let _ = tx.send(result);
        });
        // The sender only disappears without a value if the job never ran.
        rx.await.unwrap_or(Err(Error::NoResponse))
    }
}

/// Deliver an already-known result through the same asynchronous path.
pub(crate) fn deliver<F>(result: Result<ResponseEnvelope>, on_result: F)
where
    F: FnOnce(Result<ResponseEnvelope>) + Send + 'static,
{
    dispatch(move || on_result(result));
}

fn dispatch(job: impl FnOnce() + Send + 'static) {
    match Handle::try_current() {
        Ok(handle) => {
            handle.spawn_blocking(job);
        }
        Err(_) => {
            std::thread::spawn(job);
        }
    }
}
