//! Error type shared by request building, execution and body decoding.
//!
//! # Design
//! Encoding failures (`InvalidUrl`, `Empty*`, `InvalidTimeout`) are produced
//! before any network I/O. Transport failures come out of the executor, and
//! `BodyNotJson` / `BodyNotText` only when a response accessor is called.
//! Both execution forms return this one type, so callers inspect errors the
//! same way whichever form they use.
//!
//! Non-2xx status codes are not errors here; they stay on the envelope.

use std::time::Duration;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The base URL, or the URL produced after merging the query, cannot be parsed.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("query parameters were supplied but are empty")]
    EmptyQuery,

    #[error("form fields were supplied but are empty")]
    EmptyForm,

    #[error("JSON body was supplied but is empty")]
    EmptyBody,

    /// Timeout is negative, zero or not finite.
    #[error("invalid timeout: {0} seconds")]
    InvalidTimeout(f64),

    /// The transport did not complete within the effective timeout.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// DNS, connection, TLS or protocol failure.
    #[error("transport error: {0}")]
    Transport(#[source] ureq::Error),

    #[error("transport completed without a response")]
    NoResponse,

    #[error("response body (status {status}) is not JSON: {reason}")]
    BodyNotJson { status: u16, reason: String },

    #[error("response body (status {status}) is not UTF-8 text: {reason}")]
    BodyNotText { status: u16, reason: String },
}

impl Error {
    /// True for errors raised while building the request, before any I/O.
    pub fn is_encoding(&self) -> bool {
        matches!(
            self,
            Error::InvalidUrl(_)
                | Error::EmptyQuery
                | Error::EmptyForm
                | Error::EmptyBody
                | Error::InvalidTimeout(_)
        )
    }
}
