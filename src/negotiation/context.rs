//! Per-request version context.
//!
//! The requested version is read from the `version` query parameter, then the
//! `accept-version` header, then the `api-version` header. The first present,
//! non-empty value wins.

use std::convert::Infallible;

use axum::{
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap, HeaderName, Uri},
};
use serde::Serialize;

/// Query parameter carrying the requested version.
pub const VERSION_QUERY_PARAM: &str = "version";

/// First fallback header.
pub const ACCEPT_VERSION: HeaderName = HeaderName::from_static("accept-version");

/// Second fallback header. Also the response header carrying the matched version.
pub const API_VERSION: HeaderName = HeaderName::from_static("api-version");

/// Negotiation result attached to each request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RequestVersion {
    /// Raw client input, verbatim.
    #[serde(rename = "version")]
    pub requested: Option<String>,

    /// The supported version selected; `None` when negotiation failed.
    #[serde(rename = "matchedVersion")]
    pub matched: Option<String>,
}

impl RequestVersion {
    pub fn requested(requested: Option<String>) -> Self {
        Self {
            requested,
            matched: None,
        }
    }
}

impl<S> FromRequestParts<S> for RequestVersion
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts.extensions.get::<RequestVersion>().cloned().unwrap_or_default())
    }
}

/// Extract the client's requested version.
pub fn requested_version(uri: &Uri, headers: &HeaderMap) -> Option<String> {
    query_version(uri)
        .or_else(|| header_version(headers, &ACCEPT_VERSION))
        .or_else(|| header_version(headers, &API_VERSION))
}

fn query_version(uri: &Uri) -> Option<String> {
    let query = uri.query()?;
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == VERSION_QUERY_PARAM)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}

// Bytes outside visible ASCII are kept (lossily) so the value fails matching
// instead of being skipped.
fn header_version(headers: &HeaderMap, name: &HeaderName) -> Option<String> {
    headers
        .get(name)
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(pairs: &[(&HeaderName, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert((*name).clone(), HeaderValue::from_str(value).unwrap());
        }
        map
    }

    #[test]
    fn test_query_version() {
        let uri: Uri = "/items?version=%3E%3D1.0.0".parse().unwrap();
        assert_eq!(requested_version(&uri, &HeaderMap::new()).as_deref(), Some(">=1.0.0"));
    }

    #[test]
    fn test_header_fallbacks() {
        let uri: Uri = "/".parse().unwrap();
        let h = headers(&[(&ACCEPT_VERSION, ">=1.0.0")]);
        assert_eq!(requested_version(&uri, &h).as_deref(), Some(">=1.0.0"));

        let h = headers(&[(&API_VERSION, "~2.0.0")]);
        assert_eq!(requested_version(&uri, &h).as_deref(), Some("~2.0.0"));
    }

    #[test]
    fn test_query_wins_over_headers() {
        let uri: Uri = "/?version=a.b.c".parse().unwrap();
        let h = headers(&[(&ACCEPT_VERSION, "1.0.0"), (&API_VERSION, ">=0.9.0")]);
        assert_eq!(requested_version(&uri, &h).as_deref(), Some("a.b.c"));
    }

    #[test]
    fn test_accept_version_wins_over_api_version() {
        let uri: Uri = "/".parse().unwrap();
        let h = headers(&[(&API_VERSION, "2.0.0"), (&ACCEPT_VERSION, "1.0.0")]);
        assert_eq!(requested_version(&uri, &h).as_deref(), Some("1.0.0"));
    }

    #[test]
    fn test_empty_values_fall_through() {
        let uri: Uri = "/?version=&other=1".parse().unwrap();
        let h = headers(&[(&ACCEPT_VERSION, ""), (&API_VERSION, "1.0.0")]);
        assert_eq!(requested_version(&uri, &h).as_deref(), Some("1.0.0"));
        assert_eq!(requested_version(&uri, &HeaderMap::new()), None);
    }

    #[test]
    fn test_opaque_header_bytes_are_kept() {
        let uri: Uri = "/".parse().unwrap();
        let mut h = headers(&[(&API_VERSION, "1.0.0")]);
        h.insert(ACCEPT_VERSION, HeaderValue::from_bytes(b"1.0.0\xe9").unwrap());

        let requested = requested_version(&uri, &h).unwrap();
        assert_eq!(requested, "1.0.0\u{fffd}");
        assert!(crate::negotiation::matcher::VersionRange::parse(&requested).is_none());
    }

    #[test]
    fn test_context_serializes_like_request_annotations() {
        let context = RequestVersion {
            requested: Some("^1.0.0".into()),
            matched: Some("1.2.0".into()),
        };
        assert_eq!(
            serde_json::to_value(&context).unwrap(),
            serde_json::json!({"version": "^1.0.0", "matchedVersion": "1.2.0"})
        );
    }
}
