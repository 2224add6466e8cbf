//! Wrapper around calls to the Pod Point API.
//!
//! Every call is attempted exactly once: a response whose status falls inside
//! the accepted window is returned as-is, anything else becomes a typed error.
//! Retry policy, if wanted, belongs to the caller.

use std::ops::RangeInclusive;
use std::time::{Duration, Instant};

use reqwest::header::HeaderMap;
use tracing::debug;

use crate::config::REQUEST_TIMEOUT;
use crate::error::{Error, ErrorKind, Result};

/// Accepted window for most domain calls.
pub const ACCEPT_DEFAULT: RangeInclusive<u16> = 200..=204;

/// Accepted window for the identity and session exchanges.
pub const ACCEPT_OK: RangeInclusive<u16> = 200..=200;

/// Accepted window for resource-creating calls.
pub const ACCEPT_CREATED: RangeInclusive<u16> = 201..=201;

/// Issues one HTTP call with a bounded timeout and classifies failures.
#[derive(Debug, Clone)]
pub struct ApiWrapper {
    client: reqwest::Client,
    timeout: Duration,
}

impl ApiWrapper {
    /// Create a wrapper with the default per-request timeout.
    pub fn new(client: reqwest::Client) -> Self {
        Self::with_timeout(client, REQUEST_TIMEOUT)
    }

    /// Create a wrapper with a custom per-request timeout.
    pub fn with_timeout(client: reqwest::Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    /// Make a GET request.
    pub async fn get(
        &self,
        url: &str,
        query: &[(String, String)],
        headers: HeaderMap,
        kind: ErrorKind,
        accept: RangeInclusive<u16>,
    ) -> Result<reqwest::Response> {
        let request = self.client.get(url).query(query).headers(headers);
        self.dispatch("GET", url, request, kind, accept).await
    }

    /// Make a PUT request with a JSON body.
    pub async fn put(
        &self,
        url: &str,
        body: &serde_json::Value,
        query: &[(String, String)],
        headers: HeaderMap,
        kind: ErrorKind,
        accept: RangeInclusive<u16>,
    ) -> Result<reqwest::Response> {
        let request = self.client.put(url).query(query).headers(headers).json(body);
        self.dispatch("PUT", url, request, kind, accept).await
    }

    /// Make a POST request with a JSON body.
    pub async fn post(
        &self,
        url: &str,
        body: &serde_json::Value,
        query: &[(String, String)],
        headers: HeaderMap,
        kind: ErrorKind,
        accept: RangeInclusive<u16>,
    ) -> Result<reqwest::Response> {
        let request = self.client.post(url).query(query).headers(headers).json(body);
        self.dispatch("POST", url, request, kind, accept).await
    }

    /// Make a POST request with a form-encoded body. Overrides the JSON
    /// content type with `application/x-www-form-urlencoded`.
    pub async fn post_form(
        &self,
        url: &str,
        form: &[(&str, &str)],
        query: &[(String, String)],
        headers: HeaderMap,
        kind: ErrorKind,
        accept: RangeInclusive<u16>,
    ) -> Result<reqwest::Response> {
        let request = self.client.post(url).query(query).headers(headers).form(form);
        self.dispatch("POST", url, request, kind, accept).await
    }

    /// Make a DELETE request.
    pub async fn delete(
        &self,
        url: &str,
        query: &[(String, String)],
        headers: HeaderMap,
        kind: ErrorKind,
        accept: RangeInclusive<u16>,
    ) -> Result<reqwest::Response> {
        let request = self.client.delete(url).query(query).headers(headers);
        self.dispatch("DELETE", url, request, kind, accept).await
    }

    async fn dispatch(
        &self,
        method: &'static str,
        url: &str,
        request: reqwest::RequestBuilder,
        kind: ErrorKind,
        accept: RangeInclusive<u16>,
    ) -> Result<reqwest::Response> {
        let started = Instant::now();
        debug!(method, url, "sending request");

        let response = request
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| classify_transport_error(url, &e))?;

        let status = response.status().as_u16();
        debug!(
            method,
            url,
            status,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "response received"
        );

        if !accept.contains(&status) {
            let body = response.text().await.unwrap_or_default();
            return Err(kind.with_status(status, body));
        }

        Ok(response)
    }
}

/// Classify a reqwest error into a connection error naming the target URL.
/// Timeouts are always distinguished from other transport failures.
fn classify_transport_error(url: &str, err: &reqwest::Error) -> Error {
    if err.is_timeout() {
        Error::connection(format!(
            "Timeout error fetching information from {} - {}",
            url, err
        ))
    } else {
        Error::connection(format!("Error connecting to Pod Point ({}) - {}", url, err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accept_windows() {
        assert!(ACCEPT_DEFAULT.contains(&200));
        assert!(ACCEPT_DEFAULT.contains(&204));
        assert!(!ACCEPT_DEFAULT.contains(&205));
        assert!(!ACCEPT_DEFAULT.contains(&199));

        assert!(ACCEPT_OK.contains(&200));
        assert!(!ACCEPT_OK.contains(&201));

        assert!(ACCEPT_CREATED.contains(&201));
        assert!(!ACCEPT_CREATED.contains(&200));
    }
}
