//! Verify request encoding against JSON test vectors stored in `test-vectors/`.
//!
//! Each case describes an endpoint, the options to encode and either the
//! expected request or the expected error. Header order is part of the
//! contract; body bytes are compared exactly.

use request_core::{encode, Endpoint, Error, HttpMethod, RequestOptions, DEFAULT_TIMEOUT};

const BASE_URL: &str = "http://localhost:3000";

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        other => panic!("unknown method: {other}"),
    }
}

fn string_pairs(value: &serde_json::Value) -> Vec<(String, String)> {
    value
        .as_object()
        .unwrap()
        .iter()
        .map(|(k, v)| (k.clone(), v.as_str().unwrap().to_string()))
        .collect()
}

fn build_options(raw: &serde_json::Value) -> RequestOptions {
    let mut options = match (raw.get("form"), raw.get("json")) {
        (Some(form), _) => RequestOptions::with_form(string_pairs(form)),
        (None, Some(json)) => RequestOptions::with_json(json.as_str().unwrap().as_bytes().to_vec()),
        (None, None) => RequestOptions::new(),
    };
    if let Some(query) = raw.get("query") {
        options = options.query(string_pairs(query));
    }
    if let Some(version) = raw.get("version") {
        options = options.api_version(version.as_u64().unwrap() as u32);
    }
    if let Some(client_id) = raw.get("client_id") {
        options = options.client_id(client_id.as_str().unwrap());
    }
    options
}

#[test]
fn encode_test_vectors() {
    let raw = include_str!("../../test-vectors/encode.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let endpoint = format!("{BASE_URL}{}", case["endpoint"].as_str().unwrap());
        let options = build_options(&case["options"]);
        let result = encode(endpoint.into_url().unwrap(), &options, DEFAULT_TIMEOUT);

        if let Some(expected_error) = case.get("expected_error") {
            let err = result.unwrap_err();
            match expected_error.as_str().unwrap() {
                "EmptyQuery" => assert!(matches!(err, Error::EmptyQuery), "{name}: {err}"),
                "EmptyForm" => assert!(matches!(err, Error::EmptyForm), "{name}: {err}"),
                "EmptyBody" => assert!(matches!(err, Error::EmptyBody), "{name}: {err}"),
                other => panic!("{name}: unknown expected_error: {other}"),
            }
            continue;
        }

        let req = result.unwrap();
        let expected_req = &case["expected_request"];
        assert_eq!(req.method(), parse_method(expected_req["method"].as_str().unwrap()), "{name}: method");
        assert_eq!(
            req.url().as_str(),
            format!("{BASE_URL}{}", expected_req["url"].as_str().unwrap()),
            "{name}: url"
        );

        let expected_headers: Vec<(String, String)> = expected_req["headers"]
            .as_array()
            .unwrap()
            .iter()
            .map(|h| {
                let arr = h.as_array().unwrap();
                (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
            })
            .collect();
        assert_eq!(req.headers(), expected_headers.as_slice(), "{name}: headers");

        let expected_body = expected_req["body"].as_str().map(str::as_bytes);
        assert_eq!(req.body(), expected_body, "{name}: body");
        assert_eq!(req.timeout(), DEFAULT_TIMEOUT, "{name}: timeout");
    }
}
