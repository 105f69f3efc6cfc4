//! Turns `RequestOptions` into a `RequestDescriptor`. No I/O happens here.
//!
//! # Design
//! Every request carries `Accept-Version` and `X-Client`. The body variant
//! decides the rest:
//! - `Form`: POST, `application/x-www-form-urlencoded`, explicit
//!   `Content-Length`. Everything but ASCII alphanumerics is percent-escaped
//!   so `+`, `=` and `&` inside a value cannot split a pair.
//! - `Json`: POST, `application/json`, bytes passed through untouched.
//! - `None`: the caller's method, no body, no content headers.

use std::collections::BTreeMap;
use std::time::Duration;

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use url::Url;

use crate::compose::compose;
use crate::error::{Error, Result};
use crate::http::RequestDescriptor;
use crate::options::{HttpMethod, RequestBody, RequestOptions};

/// Applied when the options carry no timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
pub const JSON_CONTENT_TYPE: &str = "application/json";

pub fn encode(
    base: Url,
    options: &RequestOptions,
    default_timeout: Duration,
) -> Result<RequestDescriptor> {
    let url = compose(base, options.query.as_ref())?;
    let timeout = effective_timeout(options.timeout_secs, default_timeout)?;

    let mut headers = vec![
        ("Accept-Version".to_string(), options.api_version.to_string()),
        ("X-Client".to_string(), options.client_id.clone()),
    ];

    let (method, body) = match &options.body {
        RequestBody::Form(fields) => {
            if fields.is_empty() {
                return Err(Error::EmptyForm);
            }
            let body = encode_form(fields).into_bytes();
            headers.push(("Content-Type".to_string(), FORM_CONTENT_TYPE.to_string()));
            headers.push(("Content-Length".to_string(), body.len().to_string()));
            (HttpMethod::Post, Some(body))
        }
        RequestBody::Json(bytes) => {
            if bytes.is_empty() {
                return Err(Error::EmptyBody);
            }
            headers.push(("Content-Type".to_string(), JSON_CONTENT_TYPE.to_string()));
            (HttpMethod::Post, Some(bytes.clone()))
        }
        RequestBody::None => (options.method, None),
    };

    Ok(RequestDescriptor::new(url, method, headers, body, timeout))
}

/// `key=value` pairs joined by `&`, both sides escaped.
pub fn encode_form(fields: &BTreeMap<String, String>) -> String {
    fields
        .iter()
        .map(|(k, v)| {
            format!(
                "{}={}",
                utf8_percent_encode(k, NON_ALPHANUMERIC),
                utf8_percent_encode(v, NON_ALPHANUMERIC)
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}

fn effective_timeout(secs: Option<f64>, default_timeout: Duration) -> Result<Duration> {
    let Some(secs) = secs else {
        return Ok(default_timeout);
    };
    match Duration::try_from_secs_f64(secs) {
        Ok(timeout) if !timeout.is_zero() => Ok(timeout),
        _ => Err(Error::InvalidTimeout(secs)),
    }
}
