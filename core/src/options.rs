//! Caller-supplied intent for a single request.
//!
//! # Design
//! The body is a tagged variant rather than two optional fields, so a form
//! and a JSON payload can never both be set. Constructors that attach a body
//! switch the method to POST; the encoder enforces the same rule again.
//!
//! Mappings are `BTreeMap` so the encoded form body is deterministic.

use std::collections::BTreeMap;

use serde::Serialize;

pub const DEFAULT_API_VERSION: u32 = 1;

/// Sent as `X-Client` unless overridden.
pub const DEFAULT_CLIENT_ID: &str = "rust-1";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request payload. `Json` carries bytes that are already serialized.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RequestBody {
    #[default]
    None,
    Form(BTreeMap<String, String>),
    Json(Vec<u8>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RequestOptions {
    /// `None` leaves the endpoint untouched; `Some(empty)` is rejected.
    pub query: Option<BTreeMap<String, String>>,
    /// `None` falls back to the client's default timeout.
    pub timeout_secs: Option<f64>,
    pub api_version: u32,
    pub client_id: String,
    pub method: HttpMethod,
    pub body: RequestBody,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            query: None,
            timeout_secs: None,
            api_version: DEFAULT_API_VERSION,
            client_id: DEFAULT_CLIENT_ID.to_string(),
            method: HttpMethod::Get,
            body: RequestBody::None,
        }
    }
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// POST with a pre-encoded JSON body.
    pub fn with_json(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            method: HttpMethod::Post,
            body: RequestBody::Json(bytes.into()),
            ..Self::default()
        }
    }

    /// POST with an `application/x-www-form-urlencoded` body.
    pub fn with_form<K, V>(fields: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            method: HttpMethod::Post,
            body: RequestBody::Form(collect_pairs(fields)),
            ..Self::default()
        }
    }

    pub fn query<K, V>(mut self, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.query = Some(collect_pairs(pairs));
        self
    }

    pub fn query_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query
            .get_or_insert_with(BTreeMap::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn timeout_secs(mut self, secs: f64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    pub fn api_version(mut self, version: u32) -> Self {
        self.api_version = version;
        self
    }

    pub fn client_id(mut self, id: impl Into<String>) -> Self {
        self.client_id = id.into();
        self
    }

    /// Only meaningful without a body; a body always forces POST.
    pub fn method(mut self, method: HttpMethod) -> Self {
        self.method = method;
        self
    }
}

fn collect_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> BTreeMap<String, String>
where
    K: Into<String>,
    V: Into<String>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_get_without_body() {
        let opts = RequestOptions::new();
        assert_eq!(opts.method, HttpMethod::Get);
        assert_eq!(opts.body, RequestBody::None);
        assert_eq!(opts.api_version, 1);
        assert_eq!(opts.client_id, "rust-1");
        assert!(opts.query.is_none());
        assert!(opts.timeout_secs.is_none());
    }

    #[test]
    fn json_constructor_forces_post() {
        let opts = RequestOptions::with_json(br#"{"a":1}"#.to_vec());
        assert_eq!(opts.method, HttpMethod::Post);
        assert_eq!(opts.body, RequestBody::Json(br#"{"a":1}"#.to_vec()));
    }

    #[test]
    fn form_constructor_forces_post() {
        let opts = RequestOptions::with_form([("foo", "bar")]);
        assert_eq!(opts.method, HttpMethod::Post);
        match opts.body {
            RequestBody::Form(fields) => assert_eq!(fields["foo"], "bar"),
            other => panic!("unexpected body: {other:?}"),
        }
    }

    #[test]
    fn query_param_accumulates() {
        let opts = RequestOptions::new()
            .query_param("a", "1")
            .query_param("b", "2");
        let query = opts.query.unwrap();
        assert_eq!(query.len(), 2);
        assert_eq!(query["b"], "2");
    }

    #[test]
    fn empty_query_is_kept_as_present() {
        let opts = RequestOptions::new().query(Vec::<(String, String)>::new());
        assert_eq!(opts.query, Some(BTreeMap::new()));
    }

    #[test]
    fn method_serializes_uppercase() {
        let json = serde_json::to_value(HttpMethod::Post).unwrap();
        assert_eq!(json, "POST");
    }
}
