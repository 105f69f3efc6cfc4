//! Diagnostic snapshot of each built request and the sink that receives it.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::http::RequestDescriptor;
use crate::options::{HttpMethod, RequestBody};

/// Observability sink. Invoked synchronously once per built request.
pub type LogHook = Box<dyn Fn(&LogRecord) + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogRecord {
    pub t: &'static str,
    pub method: HttpMethod,
    pub url: String,
    pub timeout_secs: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub form_fields: Option<BTreeMap<String, String>>,
    pub headers: BTreeMap<String, String>,
}

impl LogRecord {
    pub(crate) fn snapshot(descriptor: &RequestDescriptor, body: &RequestBody) -> Self {
        let form_fields = match body {
            RequestBody::Form(fields) => Some(fields.clone()),
            _ => None,
        };
        Self {
            t: "Created request",
            method: descriptor.method(),
            url: descriptor.url().to_string(),
            timeout_secs: descriptor.timeout().as_secs_f64(),
            form_fields,
            headers: descriptor.headers().iter().cloned().collect(),
        }
    }
}

impl fmt::Display for LogRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} {} (timeout {}s)",
            self.t, self.method, self.url, self.timeout_secs
        )?;
        for (k, v) in &self.headers {
            write!(f, " {k}={v}")?;
        }
        if let Some(fields) = &self.form_fields {
            write!(f, " form={fields:?}")?;
        }
        Ok(())
    }
}

/// Emits the record as a human-readable `info` event.
pub fn default_hook() -> LogHook {
    Box::new(|record: &LogRecord| {
        tracing::info!(target: "request_core::hook", "{record}");
    })
}
