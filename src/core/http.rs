//! HTTP utilities for football API communication

use crate::error::{FootballError, Result};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT};

/// Header carrying the football-data.org API token.
pub const AUTH_TOKEN_HEADER: &str = "x-auth-token";

/// Build the default request headers, adding the auth token when a key is
/// configured. Anonymous access is allowed (free tier endpoints).
pub fn api_header_map(api_key: Option<&str>) -> Result<HeaderMap> {
    let mut h = HeaderMap::new();
    h.insert(ACCEPT, HeaderValue::from_static("application/json"));

    if let Some(key) = api_key.map(str::trim).filter(|k| !k.is_empty()) {
        let value = HeaderValue::from_str(key).map_err(|_| FootballError::Config {
            message: "API key contains characters not allowed in a header".to_string(),
        })?;
        h.insert(HeaderName::from_static(AUTH_TOKEN_HEADER), value);
    }

    Ok(h)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_header_map_with_key() {
        let headers = api_header_map(Some("abc123")).unwrap();

        assert!(headers.contains_key(ACCEPT));
        assert_eq!(headers.get(AUTH_TOKEN_HEADER).unwrap(), "abc123");
    }

    #[test]
    fn test_api_header_map_without_key() {
        let headers = api_header_map(None).unwrap();
        assert!(headers.contains_key(ACCEPT));
        assert!(!headers.contains_key(AUTH_TOKEN_HEADER));

        let blank = api_header_map(Some("   ")).unwrap();
        assert!(!blank.contains_key(AUTH_TOKEN_HEADER));
    }

    #[test]
    fn test_api_header_map_rejects_invalid_key() {
        assert!(matches!(
            api_header_map(Some("bad\nkey")),
            Err(FootballError::Config { .. })
        ));
    }
}
