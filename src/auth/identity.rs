//! Identity-provider token exchanges.
//!
//! Two request shapes exist: a password grant for fresh logins and a
//! form-encoded refresh grant for expired tokens. The provider names the same
//! fields differently in each response; both are normalized into one
//! [`Credential`].

use reqwest::header::HeaderMap;
use serde::Deserialize;
use tracing::debug;

use crate::config::ApiUrls;
use crate::error::{Error, ErrorKind, Result};
use crate::transport::headers::json_headers;
use crate::transport::http::{ApiWrapper, ACCEPT_OK};

use super::credential::Credential;

/// A token TTL as the provider reports it: sometimes a number, sometimes a
/// decimal string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TtlValue {
    Number(i64),
    Text(String),
}

impl TtlValue {
    fn seconds(&self) -> Option<i64> {
        match self {
            TtlValue::Number(n) => Some(*n),
            TtlValue::Text(s) => s.trim().parse().ok(),
        }
    }
}

/// Success body of the password-grant exchange.
#[derive(Debug, Deserialize)]
struct PasswordGrantResponse {
    #[serde(rename = "idToken")]
    id_token: Option<String>,
    #[serde(rename = "refreshToken")]
    refresh_token: Option<String>,
    #[serde(rename = "expiresIn")]
    expires_in: Option<TtlValue>,
}

/// Success body of the refresh-grant exchange.
#[derive(Debug, Deserialize)]
struct RefreshGrantResponse {
    id_token: Option<String>,
    refresh_token: Option<String>,
    expires_in: Option<TtlValue>,
}

/// Exchange email and password for a fresh credential.
///
/// POST `{identity_base}/verifyPassword?key=<api_key>` with
/// `{email, password, returnSecureToken: true}`.
pub(crate) async fn password_grant(
    wrapper: &ApiWrapper,
    urls: &ApiUrls,
    email: &str,
    password: &str,
) -> Result<Credential> {
    let url = urls.password_verify_url();
    debug!("exchanging password for access token");

    let payload = serde_json::json!({
        "email": email,
        "password": password,
        "returnSecureToken": true,
    });

    let response = wrapper
        .post(&url, &payload, &[], json_headers(), ErrorKind::Auth, ACCEPT_OK)
        .await?;
    let status = response.status().as_u16();

    let body: PasswordGrantResponse = response.json().await.map_err(|e| {
        Error::auth(status, format!("Error processing access token response. {}", e))
    })?;

    let access_token = body
        .id_token
        .ok_or_else(|| missing_field(status, "idToken"))?;
    let ttl = body
        .expires_in
        .ok_or_else(|| missing_field(status, "expiresIn"))?;
    let ttl_seconds = ttl.seconds().ok_or_else(|| invalid_ttl(status, "expiresIn"))?;

    Ok(Credential::from_provider_ttl(
        access_token,
        body.refresh_token,
        ttl_seconds,
    ))
}

/// Exchange a refresh token for a fresh credential.
///
/// POST `{token_base}/token?key=<api_key>` with a form body
/// `grant_type=refresh_token&refresh_token=<token>`.
pub(crate) async fn refresh_grant(
    wrapper: &ApiWrapper,
    urls: &ApiUrls,
    refresh_token: &str,
) -> Result<Credential> {
    let url = urls.refresh_token_url();
    debug!("exchanging refresh token for access token");

    let form = [
        ("grant_type", "refresh_token"),
        ("refresh_token", refresh_token),
    ];

    let response = wrapper
        .post_form(&url, &form, &[], HeaderMap::new(), ErrorKind::Auth, ACCEPT_OK)
        .await?;
    let status = response.status().as_u16();

    let body: RefreshGrantResponse = response.json().await.map_err(|e| {
        Error::auth(status, format!("Error processing access token response. {}", e))
    })?;

    let access_token = body
        .id_token
        .ok_or_else(|| missing_field(status, "id_token"))?;
    let ttl = body
        .expires_in
        .ok_or_else(|| missing_field(status, "expires_in"))?;
    let ttl_seconds = ttl.seconds().ok_or_else(|| invalid_ttl(status, "expires_in"))?;

    // The provider may rotate the refresh token; fall back to the one we sent.
    let refresh = body
        .refresh_token
        .unwrap_or_else(|| refresh_token.to_string());

    Ok(Credential::from_provider_ttl(
        access_token,
        Some(refresh),
        ttl_seconds,
    ))
}

fn missing_field(status: u16, field: &str) -> Error {
    Error::auth(
        status,
        format!("Error processing access token response. {} not found in json.", field),
    )
}

fn invalid_ttl(status: u16, field: &str) -> Error {
    Error::auth(
        status,
        format!("Error processing access token response. {} is not a number.", field),
    )
}
