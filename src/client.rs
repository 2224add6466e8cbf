//! Main client entry point.

use std::sync::Arc;
use std::time::Duration;

use chrono::{SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::auth::{AuthManager, Credential};
use crate::config::{ApiUrls, REQUEST_TIMEOUT};
use crate::error::{Error, ErrorKind, Result};
use crate::models::charge_mode::ChargeMode;
use crate::models::charge_override::ChargeOverride;
use crate::models::connectivity::ConnectivityStatus;
use crate::models::{
    Charge, ChargesEnvelope, Firmware, FirmwareEnvelope, Pod, PodsEnvelope, Schedule, User,
    UserEnvelope,
};
use crate::transport::headers::bearer_headers;
use crate::transport::http::{ApiWrapper, ACCEPT_CREATED, ACCEPT_DEFAULT};

/// Includes requested by default when listing pods.
pub const DEFAULT_POD_INCLUDES: &[&str] = &[
    "statuses",
    "price",
    "model",
    "unit_connectors",
    "charge_schedules",
];

/// Includes requested when fetching the current user.
const USER_INCLUDES: &[&str] = &[
    "account",
    "vehicle",
    "vehicle.make",
    "unit.pod.unit_connectors",
    "unit.pod.statuses",
    "unit.pod.model",
    "unit.pod.charge_schedules",
    "unit.pod.charge_override",
];

/// Page size used by the all-pods pager.
const PODS_PAGE_SIZE: u32 = 5;

/// Page size used by the all-charges pager.
const CHARGES_PAGE_SIZE: u32 = 50;

/// API client for communicating with Pod Point.
///
/// Every domain operation first ensures a valid credential set through the
/// [`AuthManager`], then issues one wrapped HTTP call and decodes the body.
///
/// # Examples
///
/// ```rust,no_run
/// use podpoint_client::PodPointClient;
///
/// # async fn example() -> podpoint_client::Result<()> {
/// let client = PodPointClient::new("user@example.com", "secret");
///
/// for pod in client.pods(5, 1, None).await? {
///     println!("{:?} last seen {:?}", pod.ppid, pod.last_contact_at);
/// }
/// # Ok(())
/// # }
/// ```
pub struct PodPointClient {
    auth: Arc<AuthManager>,
    wrapper: ApiWrapper,
    urls: ApiUrls,
    include_timestamp: bool,
}

impl PodPointClient {
    /// Create a client with default configuration.
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self::builder().email(email).password(password).assemble()
    }

    /// Create a builder for configuring the client.
    pub fn builder() -> PodPointClientBuilder {
        PodPointClientBuilder::new()
    }

    /// The authentication manager for this client.
    pub fn auth(&self) -> &AuthManager {
        &self.auth
    }

    /// Perform a minimum call to verify the credentials work: authenticate
    /// and fetch a single pod.
    pub async fn credentials_verified(&self) -> Result<bool> {
        self.auth.ensure_valid().await?;
        let pods = self.pods(1, 1, Some(&[])).await?;
        Ok(!pods.is_empty())
    }

    /// Get one page of pods. `includes` of `None` requests the default
    /// include set; an empty slice requests none.
    pub async fn pods(
        &self,
        per_page: u32,
        page: u32,
        includes: Option<&[&str]>,
    ) -> Result<Vec<Pod>> {
        let snapshot = self.auth.ensure_valid().await?;
        let includes = includes.unwrap_or(DEFAULT_POD_INCLUDES);

        let mut params = vec![
            ("perpage".to_string(), per_page.to_string()),
            ("page".to_string(), page.to_string()),
        ];
        if !includes.is_empty() {
            params.push(("include".to_string(), includes.join(",")));
        }

        let response = self
            .wrapper
            .get(
                &self.urls.user_pods_url(&snapshot.user_id),
                &self.complete_params(params),
                bearer_headers(&snapshot.access_token),
                ErrorKind::Api,
                ACCEPT_DEFAULT,
            )
            .await?;

        let envelope: PodsEnvelope = decode_json(response).await?;
        Ok(envelope.pods)
    }

    /// Get every pod on the account, paging until a short page arrives.
    pub async fn all_pods(&self) -> Result<Vec<Pod>> {
        let mut pods = Vec::new();
        let mut page = 1;

        loop {
            let new_pods = self.pods(PODS_PAGE_SIZE, page, None).await?;
            let short_page = new_pods.len() < PODS_PAGE_SIZE as usize;
            pods.extend(new_pods);
            if short_page {
                return Ok(pods);
            }
            page += 1;
        }
    }

    /// Get a specific pod by its id.
    pub async fn pod(&self, pod_id: i64) -> Result<Option<Pod>> {
        let pods = self.all_pods().await?;
        Ok(pods.into_iter().find(|pod| pod.id == Some(pod_id)))
    }

    /// Enable or disable charging for a pod by replacing its weekly charge
    /// schedule. Returns true when the API confirms the new schedule.
    pub async fn set_schedule(&self, enabled: bool, pod: &Pod) -> Result<bool> {
        let unit_id = require_unit_id(pod)?;
        let snapshot = self.auth.ensure_valid().await?;

        debug!(unit_id, enabled, "updating pod charge schedule");

        let body = serde_json::json!({ "data": Schedule::weekly(enabled) });
        let response = self
            .wrapper
            .put(
                &self.urls.unit_charge_schedules_url(unit_id),
                &body,
                &self.complete_params(Vec::new()),
                bearer_headers(&snapshot.access_token),
                ErrorKind::Api,
                ACCEPT_DEFAULT,
            )
            .await?;

        let status = response.status().as_u16();
        if status == 201 {
            return Ok(true);
        }

        let text = response.text().await.unwrap_or_default();
        warn!(
            status,
            body = text.as_str(),
            "expected 201 status code when creating schedules"
        );
        Ok(false)
    }

    /// Get one page of charge history.
    pub async fn charges(&self, per_page: u32, page: u32) -> Result<Vec<Charge>> {
        let snapshot = self.auth.ensure_valid().await?;

        let params = vec![
            ("perpage".to_string(), per_page.to_string()),
            ("page".to_string(), page.to_string()),
        ];

        let response = self
            .wrapper
            .get(
                &self.urls.user_charges_url(&snapshot.user_id),
                &self.complete_params(params),
                bearer_headers(&snapshot.access_token),
                ErrorKind::Api,
                ACCEPT_DEFAULT,
            )
            .await?;

        let envelope: ChargesEnvelope = decode_json(response).await?;
        Ok(envelope.charges)
    }

    /// Get the full charge history, paging until a short page arrives.
    pub async fn all_charges(&self) -> Result<Vec<Charge>> {
        let mut charges = Vec::new();
        let mut page = 1;

        loop {
            let new_charges = self.charges(CHARGES_PAGE_SIZE, page).await?;
            let short_page = new_charges.len() < CHARGES_PAGE_SIZE as usize;
            charges.extend(new_charges);
            if short_page {
                return Ok(charges);
            }
            page += 1;
        }
    }

    /// Get firmware information for a pod's unit.
    pub async fn firmware(&self, pod: &Pod) -> Result<Vec<Firmware>> {
        let unit_id = require_unit_id(pod)?;
        let snapshot = self.auth.ensure_valid().await?;

        let response = self
            .wrapper
            .get(
                &self.urls.unit_firmware_url(unit_id),
                &self.complete_params(Vec::new()),
                bearer_headers(&snapshot.access_token),
                ErrorKind::Api,
                ACCEPT_DEFAULT,
            )
            .await?;

        let envelope: FirmwareEnvelope = decode_json(response).await?;
        Ok(envelope.data)
    }

    /// Get the authenticated user with account, vehicle, and unit details.
    /// `None` when the API answers without a user envelope.
    pub async fn user(&self) -> Result<Option<User>> {
        let snapshot = self.auth.ensure_valid().await?;

        let params = vec![("include".to_string(), USER_INCLUDES.join(","))];
        let response = self
            .wrapper
            .get(
                &self.urls.auth_user_url(),
                &self.complete_params(params),
                bearer_headers(&snapshot.access_token),
                ErrorKind::Api,
                ACCEPT_DEFAULT,
            )
            .await?;

        let envelope: UserEnvelope = decode_json(response).await?;
        Ok(envelope.users)
    }

    /// Get the connectivity status of a pod.
    pub async fn connectivity_status(&self, pod: &Pod) -> Result<ConnectivityStatus> {
        let ppid = require_ppid(pod)?;
        let snapshot = self.auth.ensure_valid().await?;

        let response = self
            .wrapper
            .get(
                &self.urls.charger_connectivity_status_url(&ppid),
                &self.complete_params(Vec::new()),
                bearer_headers(&snapshot.access_token),
                ErrorKind::Api,
                ACCEPT_DEFAULT,
            )
            .await?;

        decode_json(response).await
    }

    /// Get the current charge override for a pod. `None` means no override is
    /// set and the pod follows its schedules.
    pub async fn charge_override(&self, pod: &Pod) -> Result<Option<ChargeOverride>> {
        let unit_id = require_unit_id(pod)?;
        let snapshot = self.auth.ensure_valid().await?;

        let response = self
            .wrapper
            .get(
                &self.urls.unit_charge_override_url(unit_id),
                &self.complete_params(Vec::new()),
                bearer_headers(&snapshot.access_token),
                ErrorKind::Api,
                ACCEPT_DEFAULT,
            )
            .await?;

        if response.status().as_u16() == 204 {
            return Ok(None);
        }

        let url = response.url().to_string();
        let text = response
            .text()
            .await
            .map_err(|e| Error::connection(format!("Error connecting to Pod Point ({}) - {}", url, e)))?;
        if text.trim().is_empty() {
            return Ok(None);
        }

        Ok(Some(serde_json::from_str(&text)?))
    }

    /// Request a timed charge override ("charge now") for a pod. The duration
    /// must be positive; validation happens before any network call.
    pub async fn set_charge_override(
        &self,
        pod: &Pod,
        hours: i64,
        minutes: i64,
        seconds: i64,
    ) -> Result<ChargeOverride> {
        let total_seconds = hours * 3600 + minutes * 60 + seconds;
        if total_seconds <= 0 {
            return Err(Error::Validation(format!(
                "charge override duration must be positive, got {}h {}m {}s",
                hours, minutes, seconds
            )));
        }
        let ppid = require_ppid(pod)?;
        let unit_id = require_unit_id(pod)?;

        let snapshot = self.auth.ensure_valid().await?;
        let ends_at = Utc::now() + chrono::Duration::seconds(total_seconds);

        debug!(unit_id, total_seconds, "requesting charge override");

        let body = serde_json::json!({
            "ppid": ppid,
            "ends_at": ends_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        });
        let response = self
            .wrapper
            .put(
                &self.urls.unit_charge_override_url(unit_id),
                &body,
                &self.complete_params(Vec::new()),
                bearer_headers(&snapshot.access_token),
                ErrorKind::Api,
                ACCEPT_CREATED,
            )
            .await?;

        decode_json(response).await
    }

    /// Switch a pod to manual mode: an open-ended override with no end time.
    /// Returns true when the API echoes the override back for this pod.
    pub async fn set_charge_mode_manual(&self, pod: &Pod) -> Result<bool> {
        let ppid = require_ppid(pod)?;
        let unit_id = require_unit_id(pod)?;
        let snapshot = self.auth.ensure_valid().await?;

        debug!(unit_id, "switching charge mode to manual");

        let body = serde_json::json!({ "ppid": ppid.clone() });
        let response = self
            .wrapper
            .put(
                &self.urls.unit_charge_override_url(unit_id),
                &body,
                &self.complete_params(Vec::new()),
                bearer_headers(&snapshot.access_token),
                ErrorKind::Api,
                ACCEPT_DEFAULT,
            )
            .await?;

        let confirmed: ChargeOverride = decode_json(response).await?;
        Ok(confirmed.ppid.as_deref() == Some(ppid.as_str()))
    }

    /// Switch a pod back to smart mode by deleting its charge override.
    /// Returns true on the expected 204; any other accepted status means the
    /// switch was not confirmed.
    pub async fn set_charge_mode_smart(&self, pod: &Pod) -> Result<bool> {
        let unit_id = require_unit_id(pod)?;
        let snapshot = self.auth.ensure_valid().await?;

        debug!(unit_id, "switching charge mode to smart");

        let response = self
            .wrapper
            .delete(
                &self.urls.unit_charge_override_url(unit_id),
                &self.complete_params(Vec::new()),
                bearer_headers(&snapshot.access_token),
                ErrorKind::Api,
                ACCEPT_DEFAULT,
            )
            .await?;

        let status = response.status().as_u16();
        if status != 204 {
            warn!(status, "expected 204 status code when deleting charge override");
        }
        Ok(status == 204)
    }

    /// Determine the pod's current charge mode from its override state.
    pub async fn charge_mode(&self, pod: &Pod) -> Result<ChargeMode> {
        match self.charge_override(pod).await? {
            None => Ok(ChargeMode::Smart),
            Some(ov) if ov.ends_at.is_none() => Ok(ChargeMode::Manual),
            Some(_) => Ok(ChargeMode::Override),
        }
    }

    /// Add the optional timestamp parameter to a parameter set.
    fn complete_params(&self, mut params: Vec<(String, String)>) -> Vec<(String, String)> {
        if self.include_timestamp {
            params.push(("timestamp".to_string(), Utc::now().timestamp().to_string()));
        }
        params
    }
}

impl std::fmt::Debug for PodPointClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PodPointClient")
            .field("auth", &self.auth)
            .field("include_timestamp", &self.include_timestamp)
            .finish_non_exhaustive()
    }
}

fn require_unit_id(pod: &Pod) -> Result<i64> {
    pod.unit_id
        .ok_or_else(|| Error::Validation("pod has no unit id".into()))
}

fn require_ppid(pod: &Pod) -> Result<String> {
    pod.ppid
        .clone()
        .ok_or_else(|| Error::Validation("pod has no ppid".into()))
}

/// Read the full body and decode it, keeping transport failures distinct from
/// decode failures.
async fn decode_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let url = response.url().to_string();
    let text = response
        .text()
        .await
        .map_err(|e| Error::connection(format!("Error connecting to Pod Point ({}) - {}", url, e)))?;
    Ok(serde_json::from_str(&text)?)
}

/// Builder for [`PodPointClient`].
pub struct PodPointClientBuilder {
    email: Option<String>,
    password: Option<String>,
    urls: ApiUrls,
    timeout: Duration,
    include_timestamp: bool,
    credential: Option<Credential>,
    http_client: Option<reqwest::Client>,
}

impl PodPointClientBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            email: None,
            password: None,
            urls: ApiUrls::default(),
            timeout: REQUEST_TIMEOUT,
            include_timestamp: false,
            credential: None,
            http_client: None,
        }
    }

    /// Account email address.
    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Account password.
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Override the Pod Point API base URL.
    pub fn api_base_url(mut self, url: impl Into<String>) -> Self {
        self.urls.api_base = url.into();
        self
    }

    /// Override the identity-provider base URL (password grant).
    pub fn identity_base_url(mut self, url: impl Into<String>) -> Self {
        self.urls.identity_base = url.into();
        self
    }

    /// Override the identity-provider token base URL (refresh grant).
    pub fn token_base_url(mut self, url: impl Into<String>) -> Self {
        self.urls.token_base = url.into();
        self
    }

    /// Override the identity-provider API key.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.urls.api_key = key.into();
        self
    }

    /// Per-request timeout (default 10 seconds).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Append a `timestamp` query parameter to domain calls.
    pub fn include_timestamp(mut self, include: bool) -> Self {
        self.include_timestamp = include;
        self
    }

    /// Seed the client with a previously issued credential.
    pub fn credential(mut self, credential: Credential) -> Self {
        self.credential = Some(credential);
        self
    }

    /// Use a custom reqwest client (useful for TLS or proxy configuration).
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<PodPointClient> {
        if self.email.is_none() {
            return Err(Error::Config("email is required".into()));
        }
        if self.password.is_none() {
            return Err(Error::Config("password is required".into()));
        }
        Ok(self.assemble())
    }

    fn assemble(self) -> PodPointClient {
        let email = self.email.unwrap_or_default();
        let password = self.password.unwrap_or_default();

        let http_client = self.http_client.unwrap_or_default();
        let wrapper = ApiWrapper::with_timeout(http_client, self.timeout);

        let mut auth = AuthManager::new(email, password, self.urls.clone(), wrapper.clone());
        if let Some(credential) = self.credential {
            auth = auth.with_credential(credential);
        }

        info!("PodPointClient initialized");
        PodPointClient {
            auth: Arc::new(auth),
            wrapper,
            urls: self.urls,
            include_timestamp: self.include_timestamp,
        }
    }
}

impl Default for PodPointClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
