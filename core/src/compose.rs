//! URL composition: base endpoint + query parameters.

use std::collections::BTreeMap;

use url::Url;

use crate::error::{Error, Result};

/// Anything that can name an absolute endpoint.
pub trait Endpoint {
    fn into_url(self) -> Result<Url>;
}

impl Endpoint for Url {
    fn into_url(self) -> Result<Url> {
        check_scheme(self)
    }
}

impl Endpoint for &Url {
    fn into_url(self) -> Result<Url> {
        check_scheme(self.clone())
    }
}

impl Endpoint for &str {
    fn into_url(self) -> Result<Url> {
        let url = Url::parse(self).map_err(|e| Error::InvalidUrl(format!("{self}: {e}")))?;
        check_scheme(url)
    }
}

impl Endpoint for String {
    fn into_url(self) -> Result<Url> {
        self.as_str().into_url()
    }
}

impl Endpoint for &String {
    fn into_url(self) -> Result<Url> {
        self.as_str().into_url()
    }
}

fn check_scheme(url: Url) -> Result<Url> {
    if matches!(url.scheme(), "http" | "https") && url.has_host() {
        Ok(url)
    } else {
        Err(Error::InvalidUrl(url.to_string()))
    }
}

/// Merge `query` into `base`, keeping any query the base already carries.
///
/// Keys and values are escaped with standard query escaping. Pair order in
/// the result is not significant.
pub fn compose(base: Url, query: Option<&BTreeMap<String, String>>) -> Result<Url> {
    let Some(query) = query else {
        return Ok(base);
    };
    if query.is_empty() {
        return Err(Error::EmptyQuery);
    }

    let mut url = base;
    url.query_pairs_mut().extend_pairs(query.iter());

    // Round-trip through the parser so a broken composition is reported here
    // rather than by the transport.
    Url::parse(url.as_str()).map_err(|e| Error::InvalidUrl(format!("{url}: {e}")))
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn base() -> Url {
        "http://localhost:3000/bar".into_url().unwrap()
    }

    fn pairs(url: &Url) -> HashSet<(String, String)> {
        url.query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    #[test]
    fn absent_query_returns_base_unchanged() {
        let url = compose(base(), None).unwrap();
        assert_eq!(url.as_str(), "http://localhost:3000/bar");
    }

    #[test]
    fn empty_query_is_rejected() {
        let err = compose(base(), Some(&BTreeMap::new())).unwrap_err();
        assert!(matches!(err, Error::EmptyQuery));
    }

    #[test]
    fn query_pairs_round_trip() {
        let query: BTreeMap<String, String> = [
            ("foo", "bar"),
            ("space key", "a b"),
            ("amp", "x&y=z"),
            ("plus", "1+1"),
            ("unicode", "blåbær"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let url = compose(base(), Some(&query)).unwrap();
        let expected: HashSet<_> = query.into_iter().collect();
        assert_eq!(pairs(&url), expected);
        assert_eq!(url.path(), "/bar");
        assert_eq!(url.host_str(), Some("localhost"));
    }

    #[test]
    fn existing_query_is_preserved() {
        let base = "http://localhost/bar?keep=me".into_url().unwrap();
        let query = BTreeMap::from([("foo".to_string(), "bar".to_string())]);
        let url = compose(base, Some(&query)).unwrap();
        let got = pairs(&url);
        assert!(got.contains(&("keep".to_string(), "me".to_string())));
        assert!(got.contains(&("foo".to_string(), "bar".to_string())));
    }

    #[test]
    fn malformed_base_is_invalid_url() {
        let err = "not a url".into_url().unwrap_err();
        assert!(matches!(err, Error::InvalidUrl(msg) if msg.starts_with("not a url")));
    }

    #[test]
    fn non_http_scheme_is_invalid_url() {
        let err = "mailto:someone@example.com".into_url().unwrap_err();
        assert!(matches!(err, Error::InvalidUrl(_)));
    }

    #[test]
    fn parsed_url_is_accepted() {
        let url = Url::parse("https://example.com/x").unwrap();
        assert_eq!((&url).into_url().unwrap(), url);
    }
}
