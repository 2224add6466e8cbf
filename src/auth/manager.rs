//! Authentication lifecycle manager.
//!
//! Owns the credential and the backend session, and decides when to reuse,
//! refresh, or log in from scratch. The whole refresh cycle runs under one
//! lock so concurrent callers await a single in-flight exchange instead of
//! issuing duplicates.

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::debug;

use crate::config::ApiUrls;
use crate::error::{Error, Result};
use crate::transport::http::ApiWrapper;

use super::credential::Credential;
use super::session::Session;
use super::{identity, session};

/// A ready-to-use credential set returned by [`AuthManager::ensure_valid`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSnapshot {
    /// Fresh bearer token for domain calls.
    pub access_token: String,
    /// Backend session id bound to that token.
    pub session_id: String,
    /// Resolved user id.
    pub user_id: String,
}

/// A session together with the fingerprint of the token that produced it.
/// A mismatch means the session belongs to a previous credential and must be
/// re-established before it can be trusted.
#[derive(Debug, Clone)]
struct BoundSession {
    token_fingerprint: String,
    session: Session,
}

#[derive(Debug, Default)]
struct AuthState {
    credential: Credential,
    session: Option<BoundSession>,
}

/// Manages the authentication lifecycle for one user.
pub struct AuthManager {
    email: String,
    password: String,
    urls: ApiUrls,
    wrapper: ApiWrapper,
    state: Mutex<AuthState>,
}

impl AuthManager {
    /// Create a manager with no credential; the first [`ensure_valid`] call
    /// performs a fresh login.
    ///
    /// [`ensure_valid`]: AuthManager::ensure_valid
    pub(crate) fn new(
        email: impl Into<String>,
        password: impl Into<String>,
        urls: ApiUrls,
        wrapper: ApiWrapper,
    ) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            urls,
            wrapper,
            state: Mutex::new(AuthState::default()),
        }
    }

    /// Seed the manager with a previously issued credential.
    pub(crate) fn with_credential(self, credential: Credential) -> Self {
        Self {
            state: Mutex::new(AuthState {
                credential,
                session: None,
            }),
            ..self
        }
    }

    /// Ensure a fresh access token with a session bound to it, performing the
    /// refresh-or-login plus session exchanges only when needed.
    ///
    /// Safe to call before every domain operation: when the held credential is
    /// fresh and the session belongs to it, no network calls are made.
    /// Concurrent callers on a stale credential serialize on an internal lock
    /// and reuse the one refresh that ran.
    pub async fn ensure_valid(&self) -> Result<AuthSnapshot> {
        let mut state = self.state.lock().await;

        // Another caller may have completed the cycle while we waited.
        if let Some(snapshot) = ready_snapshot(&state) {
            return Ok(snapshot);
        }

        if !state.credential.is_fresh() {
            let credential = match state.credential.refresh_token() {
                Some(refresh) if state.credential.is_expired() => {
                    debug!("access token expired, exchanging refresh token");
                    identity::refresh_grant(&self.wrapper, &self.urls, refresh).await?
                }
                _ => {
                    debug!("no usable access token, performing login");
                    identity::password_grant(&self.wrapper, &self.urls, &self.email, &self.password)
                        .await?
                }
            };
            state.credential = credential;
            // The previous session was bound to the replaced token.
            state.session = None;
            debug!(expiry = ?state.credential.expires_at(), "access token updated");
        }

        let token = match state.credential.token() {
            Some(token) => token.clone(),
            // Every successful exchange stores a token, so this is unreachable.
            None => return Err(Error::api(200, "identity exchange produced no access token")),
        };

        let fingerprint = token.fingerprint();
        let session = match state.session.as_ref() {
            Some(bound) if bound.token_fingerprint == fingerprint => bound.session.clone(),
            _ => {
                let session = session::establish(
                    &self.wrapper,
                    &self.urls,
                    &self.email,
                    &self.password,
                    &token.access_token,
                )
                .await?;
                state.session = Some(BoundSession {
                    token_fingerprint: fingerprint,
                    session: session.clone(),
                });
                session
            }
        };

        Ok(AuthSnapshot {
            access_token: token.access_token,
            session_id: session.id,
            user_id: session.user_id,
        })
    }

    /// The current access token, if one is held.
    pub async fn access_token(&self) -> Option<String> {
        self.state
            .lock()
            .await
            .credential
            .access_token()
            .map(str::to_owned)
    }

    /// The current token expiry, if a token is held.
    pub async fn access_token_expiry(&self) -> Option<DateTime<Utc>> {
        self.state.lock().await.credential.expires_at()
    }

    /// True iff the held token is fresh.
    pub async fn is_fresh(&self) -> bool {
        self.state.lock().await.credential.is_fresh()
    }

    /// The current session id, if a session has been established.
    pub async fn session_id(&self) -> Option<String> {
        self.state
            .lock()
            .await
            .session
            .as_ref()
            .map(|b| b.session.id.clone())
    }

    /// The resolved user id, if a session has been established.
    pub async fn user_id(&self) -> Option<String> {
        self.state
            .lock()
            .await
            .session
            .as_ref()
            .map(|b| b.session.user_id.clone())
    }

    /// Replace the held credential wholesale. The bound session is kept and
    /// re-validated against the new token on the next [`ensure_valid`] call.
    ///
    /// [`ensure_valid`]: AuthManager::ensure_valid
    pub async fn set_credential(&self, credential: Credential) {
        let mut state = self.state.lock().await;
        state.credential = credential;
    }

    /// Drop the credential and session, forcing a full login on the next
    /// [`ensure_valid`] call.
    ///
    /// [`ensure_valid`]: AuthManager::ensure_valid
    pub async fn invalidate(&self) {
        let mut state = self.state.lock().await;
        *state = AuthState::default();
    }
}

impl std::fmt::Debug for AuthManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthManager")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

fn ready_snapshot(state: &AuthState) -> Option<AuthSnapshot> {
    if !state.credential.is_fresh() {
        return None;
    }
    let token = state.credential.token()?;
    let bound = state.session.as_ref()?;
    if bound.token_fingerprint != token.fingerprint() {
        return None;
    }
    Some(AuthSnapshot {
        access_token: token.access_token.clone(),
        session_id: bound.session.id.clone(),
        user_id: bound.session.user_id.clone(),
    })
}
