//! Request and response values exchanged with the transport.
//!
//! # Design
//! `RequestDescriptor` is built once by the encoder and never mutated; its
//! fields are private and exposed through getters so nothing downstream can
//! change a request after the hook has seen it.
//!
//! `ResponseEnvelope` keeps the raw body bytes. The JSON and text accessors
//! decode from those bytes on every call, so repeated calls return the same
//! result and never touch the network.

use std::time::Duration;

use serde::de::DeserializeOwned;
use url::Url;

use crate::error::{Error, Result};
use crate::options::HttpMethod;

/// A fully composed outbound request.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    url: Url,
    method: HttpMethod,
    headers: Vec<(String, String)>,
    body: Option<Vec<u8>>,
    timeout: Duration,
}

impl RequestDescriptor {
    pub(crate) fn new(
        url: Url,
        method: HttpMethod,
        headers: Vec<(String, String)>,
        body: Option<Vec<u8>>,
        timeout: Duration,
    ) -> Self {
        Self {
            url,
            method,
            headers,
            body,
            timeout,
        }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

/// A response as returned by the transport.
///
/// A missing or empty body is a valid response (204 and friends); only the
/// decoding accessors treat it as a failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseEnvelope {
    status: u16,
    headers: Vec<(String, String)>,
    body: Option<Vec<u8>>,
}

impl ResponseEnvelope {
    pub fn new(status: u16, headers: Vec<(String, String)>, body: Option<Vec<u8>>) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    /// Decode the body as an arbitrary JSON value.
    pub fn as_json(&self) -> Result<serde_json::Value> {
        self.json()
    }

    /// Decode the body into `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        let bytes = self.body.as_deref().ok_or_else(|| Error::BodyNotJson {
            status: self.status,
            reason: "response has no body".to_string(),
        })?;
        serde_json::from_slice(bytes).map_err(|e| Error::BodyNotJson {
            status: self.status,
            reason: e.to_string(),
        })
    }

    /// Decode the body as UTF-8 text.
    pub fn as_text(&self) -> Result<String> {
        let bytes = self.body.as_deref().ok_or_else(|| Error::BodyNotText {
            status: self.status,
            reason: "response has no body".to_string(),
        })?;
        std::str::from_utf8(bytes)
            .map(str::to_owned)
            .map_err(|e| Error::BodyNotText {
                status: self.status,
                reason: e.to_string(),
            })
    }
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}
