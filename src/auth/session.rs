//! Backend session establishment.
//!
//! Every domain call requires an application session obtained by exchanging a
//! valid access token (plus the account credentials) at the sessions endpoint.

use serde_json::Value;
use tracing::debug;

use crate::config::ApiUrls;
use crate::error::{Error, ErrorKind, Result};
use crate::transport::headers::bearer_headers;
use crate::transport::http::{ApiWrapper, ACCEPT_OK};

/// A backend application session: the session handle and the resolved user id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Opaque session identifier.
    pub id: String,
    /// The account's user id, used to build user-scoped URLs.
    pub user_id: String,
}

/// Establish a new session with the backend.
///
/// POST `{api_base}/sessions` with `{email, password}` and a bearer header
/// built from the access token. Expects `{"sessions": {"id", "user_id"}}`.
pub(crate) async fn establish(
    wrapper: &ApiWrapper,
    urls: &ApiUrls,
    email: &str,
    password: &str,
    access_token: &str,
) -> Result<Session> {
    let url = urls.sessions_url();
    debug!("creating backend session");

    let payload = serde_json::json!({
        "email": email,
        "password": password,
    });

    let response = wrapper
        .post(
            &url,
            &payload,
            &[],
            bearer_headers(access_token),
            ErrorKind::Session,
            ACCEPT_OK,
        )
        .await?;
    let status = response.status().as_u16();

    let body: Value = response.json().await.map_err(|e| {
        Error::session(status, format!("Error processing session response. {}", e))
    })?;

    // An absent or null envelope on a 200 cannot be told apart from a
    // degenerate success that omits it; both surface as a session error.
    let envelope = match body.get("sessions") {
        Some(value) if !value.is_null() => value,
        _ => return Err(missing_key(status, "sessions")),
    };

    let id = envelope
        .get("id")
        .and_then(string_value)
        .ok_or_else(|| missing_key(status, "id"))?;
    let user_id = envelope
        .get("user_id")
        .and_then(string_value)
        .ok_or_else(|| missing_key(status, "user_id"))?;

    Ok(Session { id, user_id })
}

/// The API serves ids as strings, but numeric ids have been observed too.
fn string_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn missing_key(status: u16, key: &str) -> Error {
    Error::session(
        status,
        format!("Error processing session response. Unable to find key: {} within json.", key),
    )
}
