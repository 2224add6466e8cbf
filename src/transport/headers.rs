//! Pod Point API header construction.

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};

/// Content type sent on all JSON requests.
pub const CONTENT_TYPE_JSON: &str = "application/json; charset=UTF-8";

/// Headers for unauthenticated JSON requests.
pub fn json_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(CONTENT_TYPE_JSON));
    headers
}

/// Headers for authenticated requests: JSON content type plus a bearer token.
pub fn bearer_headers(access_token: &str) -> HeaderMap {
    let mut headers = json_headers();
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", access_token))
            .unwrap_or_else(|_| HeaderValue::from_static("Bearer invalid")),
    );
    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_headers() {
        let headers = json_headers();
        assert_eq!(
            headers.get(CONTENT_TYPE).unwrap(),
            "application/json; charset=UTF-8"
        );
        assert!(headers.get(AUTHORIZATION).is_none());
    }

    #[test]
    fn test_bearer_headers() {
        let headers = bearer_headers("tok-123");
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer tok-123");
        assert_eq!(
            headers.get(CONTENT_TYPE).unwrap(),
            "application/json; charset=UTF-8"
        );
    }

    #[test]
    fn test_bearer_headers_invalid_token_falls_back() {
        let headers = bearer_headers("bad\ntoken");
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer invalid");
    }
}
