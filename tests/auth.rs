//! Integration tests for the authentication/session lifecycle using wiremock.

use std::time::Duration;

use chrono::Utc;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use podpoint_client::{Credential, Error, PodPointClient};

const EMAIL: &str = "test@example.com";
const PASSWORD: &str = "pw";

/// Build a client whose API and identity endpoints all point at the mock
/// server.
fn test_client(server: &MockServer) -> PodPointClient {
    PodPointClient::builder()
        .email(EMAIL)
        .password(PASSWORD)
        .api_base_url(server.uri())
        .identity_base_url(server.uri())
        .token_base_url(server.uri())
        .api_key("test-key")
        .build()
        .expect("client should build")
}

fn password_grant_response() -> serde_json::Value {
    json!({
        "idToken": "T",
        "refreshToken": "R",
        "expiresIn": "100"
    })
}

fn session_response() -> serde_json::Value {
    json!({
        "sessions": {
            "id": "S",
            "user_id": "U"
        }
    })
}

async fn mount_password_grant(server: &MockServer, response: serde_json::Value, expect: u64) {
    Mock::given(method("POST"))
        .and(path("/verifyPassword"))
        .and(query_param("key", "test-key"))
        .and(body_json(json!({
            "email": EMAIL,
            "password": PASSWORD,
            "returnSecureToken": true
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(response))
        .expect(expect)
        .mount(server)
        .await;
}

async fn mount_session(server: &MockServer, response: serde_json::Value, expect: u64) {
    Mock::given(method("POST"))
        .and(path("/sessions"))
        .and(body_json(json!({ "email": EMAIL, "password": PASSWORD })))
        .respond_with(ResponseTemplate::new(200).set_body_json(response))
        .expect(expect)
        .mount(server)
        .await;
}

// ============================================================================
// Happy path
// ============================================================================

#[tokio::test]
async fn test_fresh_login_produces_token_and_session() {
    let server = MockServer::start().await;
    mount_password_grant(&server, password_grant_response(), 1).await;
    mount_session(&server, session_response(), 1).await;

    let client = test_client(&server);
    let snapshot = client.auth().ensure_valid().await.unwrap();

    assert_eq!(snapshot.access_token, "T");
    assert_eq!(snapshot.session_id, "S");
    assert_eq!(snapshot.user_id, "U");

    // expiresIn of 100 is stored with the 10 second safety margin applied
    let expiry = client.auth().access_token_expiry().await.unwrap();
    let remaining = expiry - Utc::now();
    assert!(remaining <= chrono::Duration::seconds(90));
    assert!(remaining > chrono::Duration::seconds(85));

    assert_eq!(client.auth().access_token().await.as_deref(), Some("T"));
    assert_eq!(client.auth().session_id().await.as_deref(), Some("S"));
    assert_eq!(client.auth().user_id().await.as_deref(), Some("U"));
    assert!(client.auth().is_fresh().await);
}

#[tokio::test]
async fn test_session_carries_bearer_token_from_exchange() {
    let server = MockServer::start().await;
    mount_password_grant(&server, password_grant_response(), 1).await;

    Mock::given(method("POST"))
        .and(path("/sessions"))
        .and(header("authorization", "Bearer T"))
        .respond_with(ResponseTemplate::new(200).set_body_json(session_response()))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    client.auth().ensure_valid().await.unwrap();
}

#[tokio::test]
async fn test_valid_credentials_issue_no_further_calls() {
    let server = MockServer::start().await;
    mount_password_grant(&server, password_grant_response(), 1).await;
    mount_session(&server, session_response(), 1).await;

    let client = test_client(&server);
    let first = client.auth().ensure_valid().await.unwrap();
    let second = client.auth().ensure_valid().await.unwrap();

    // Both calls succeed; the mock expectations verify the second call made
    // zero network requests.
    assert_eq!(first, second);
}

// ============================================================================
// Refresh
// ============================================================================

#[tokio::test]
async fn test_expired_token_refreshes_and_re_establishes_session() {
    let server = MockServer::start().await;

    // No password login should happen when a refresh token is held.
    mount_password_grant(&server, password_grant_response(), 0).await;

    Mock::given(method("POST"))
        .and(path("/token"))
        .and(query_param("key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id_token": "T2",
            "refresh_token": "R2",
            "expires_in": "3600",
            "access_token": "T2",
            "token_type": "Bearer",
            "user_id": "U"
        })))
        .expect(1)
        .mount(&server)
        .await;
    mount_session(&server, session_response(), 1).await;

    let stale = Credential::with_expiry(
        "stale-token",
        Some("R".into()),
        Utc::now() - chrono::Duration::minutes(10),
    );
    let client = PodPointClient::builder()
        .email(EMAIL)
        .password(PASSWORD)
        .api_base_url(server.uri())
        .identity_base_url(server.uri())
        .token_base_url(server.uri())
        .api_key("test-key")
        .credential(stale)
        .build()
        .unwrap();

    let snapshot = client.auth().ensure_valid().await.unwrap();
    assert_eq!(snapshot.access_token, "T2");
    assert_eq!(snapshot.session_id, "S");
}

#[tokio::test]
async fn test_refresh_token_without_issued_token_logs_in() {
    let server = MockServer::start().await;
    mount_password_grant(&server, password_grant_response(), 1).await;
    mount_session(&server, session_response(), 1).await;

    // The refresh grant is only for tokens that were issued and expired; a
    // bare refresh token goes through a fresh login.
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let client = PodPointClient::builder()
        .email(EMAIL)
        .password(PASSWORD)
        .api_base_url(server.uri())
        .identity_base_url(server.uri())
        .token_base_url(server.uri())
        .api_key("test-key")
        .credential(Credential::from_refresh_token("R"))
        .build()
        .unwrap();
    client.auth().ensure_valid().await.unwrap();
}

#[tokio::test]
async fn test_session_bound_to_replaced_token_is_re_established() {
    let server = MockServer::start().await;
    mount_password_grant(&server, password_grant_response(), 1).await;

    Mock::given(method("POST"))
        .and(path("/sessions"))
        .and(header("authorization", "Bearer T"))
        .respond_with(ResponseTemplate::new(200).set_body_json(session_response()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/sessions"))
        .and(header("authorization", "Bearer OTHER"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "sessions": { "id": "S2", "user_id": "U" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    client.auth().ensure_valid().await.unwrap();

    // Install a fresh token the session was not established against. The
    // manager must notice the mismatch and re-establish rather than trust the
    // stale pairing.
    client
        .auth()
        .set_credential(Credential::with_expiry(
            "OTHER",
            None,
            Utc::now() + chrono::Duration::hours(1),
        ))
        .await;

    let snapshot = client.auth().ensure_valid().await.unwrap();
    assert_eq!(snapshot.access_token, "OTHER");
    assert_eq!(snapshot.session_id, "S2");
}

// ============================================================================
// Concurrency
// ============================================================================

#[tokio::test]
async fn test_concurrent_callers_share_one_refresh_cycle() {
    let server = MockServer::start().await;
    mount_password_grant(&server, password_grant_response(), 1).await;
    mount_session(&server, session_response(), 1).await;

    let client = test_client(&server);
    let auth = client.auth();

    let (a, b) = tokio::join!(auth.ensure_valid(), auth.ensure_valid());
    assert_eq!(a.unwrap(), b.unwrap());
}

// ============================================================================
// Error surfacing
// ============================================================================

#[tokio::test]
async fn test_identity_rejection_surfaces_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/verifyPassword"))
        .respond_with(ResponseTemplate::new(401).set_body_string("foo error"))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let err = client.auth().ensure_valid().await.unwrap_err();

    assert!(matches!(err, Error::Auth { status: 401, .. }));
    assert!(err.to_string().contains("(401) - foo error"));
}

#[tokio::test]
async fn test_identity_response_missing_token_field() {
    let server = MockServer::start().await;
    mount_password_grant(
        &server,
        json!({ "refreshToken": "R", "expiresIn": "100" }),
        1,
    )
    .await;

    let client = test_client(&server);
    let err = client.auth().ensure_valid().await.unwrap_err();

    assert!(matches!(err, Error::Auth { status: 200, .. }));
    assert!(err.to_string().contains("idToken"));
}

#[tokio::test]
async fn test_identity_response_non_numeric_ttl() {
    let server = MockServer::start().await;
    mount_password_grant(
        &server,
        json!({ "idToken": "T", "refreshToken": "R", "expiresIn": "soon" }),
        1,
    )
    .await;

    let client = test_client(&server);
    let err = client.auth().ensure_valid().await.unwrap_err();

    assert!(matches!(err, Error::Auth { status: 200, .. }));
    assert!(err.to_string().contains("expiresIn"));
}

#[tokio::test]
async fn test_session_rejection_surfaces_status_and_body() {
    let server = MockServer::start().await;
    mount_password_grant(&server, password_grant_response(), 1).await;
    Mock::given(method("POST"))
        .and(path("/sessions"))
        .respond_with(ResponseTemplate::new(401).set_body_string("bar error"))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let err = client.auth().ensure_valid().await.unwrap_err();

    assert!(matches!(err, Error::Session { status: 401, .. }));
    assert!(err.to_string().contains("(401) - bar error"));
}

#[tokio::test]
async fn test_session_response_missing_id_key() {
    let server = MockServer::start().await;
    mount_password_grant(&server, password_grant_response(), 1).await;
    mount_session(&server, json!({ "sessions": { "user_id": "1234" } }), 1).await;

    let client = test_client(&server);
    let err = client.auth().ensure_valid().await.unwrap_err();

    assert!(matches!(err, Error::Session { status: 200, .. }));
    assert!(err.to_string().contains("Unable to find key: id"));
}

#[tokio::test]
async fn test_session_response_missing_envelope() {
    let server = MockServer::start().await;
    mount_password_grant(&server, password_grant_response(), 1).await;
    // A 200 without the envelope could be a degenerate success or a malformed
    // response; the two are indistinguishable and both surface as a session
    // error naming the envelope key.
    mount_session(&server, json!({}), 1).await;

    let client = test_client(&server);
    let err = client.auth().ensure_valid().await.unwrap_err();

    assert!(matches!(err, Error::Session { status: 200, .. }));
    assert!(err.to_string().contains("sessions"));
}

#[tokio::test]
async fn test_identity_timeout_is_a_connection_error_naming_the_url() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/verifyPassword"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(password_grant_response())
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let client = PodPointClient::builder()
        .email(EMAIL)
        .password(PASSWORD)
        .api_base_url(server.uri())
        .identity_base_url(server.uri())
        .token_base_url(server.uri())
        .api_key("test-key")
        .timeout(Duration::from_millis(100))
        .build()
        .unwrap();

    let err = client.auth().ensure_valid().await.unwrap_err();
    assert!(matches!(err, Error::Connection(_)));

    let message = err.to_string();
    assert!(message.starts_with("Connection Error: Timeout error"));
    assert!(message.contains("/verifyPassword"));
}

#[tokio::test]
async fn test_failed_login_leaves_client_unauthenticated() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/verifyPassword"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let client = test_client(&server);
    assert!(client.auth().ensure_valid().await.is_err());

    assert!(client.auth().access_token().await.is_none());
    assert!(client.auth().session_id().await.is_none());
    assert!(!client.auth().is_fresh().await);
}

#[tokio::test]
async fn test_invalidate_forces_full_login() {
    let server = MockServer::start().await;
    mount_password_grant(&server, password_grant_response(), 2).await;
    mount_session(&server, session_response(), 2).await;

    let client = test_client(&server);
    client.auth().ensure_valid().await.unwrap();

    client.auth().invalidate().await;
    assert!(client.auth().access_token().await.is_none());

    client.auth().ensure_valid().await.unwrap();
}
