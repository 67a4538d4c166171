//! HTTP client for the user directory endpoint.
//!
//! One GET for the full list and one HEAD for the connectivity probe. There
//! is no retry, no pagination and no authentication.

use std::future::Future;
use std::time::Duration;

use anyhow::Result;
use reqwest::{header, Client};
use tracing::{debug, info, warn};

use crate::models::UserRecord;

use super::FetchError;

// ============================================================================
// Constants
// ============================================================================

/// Public endpoint serving the static user list.
pub const DEFAULT_API_URL: &str = "https://jsonplaceholder.typicode.com/users";

/// HTTP request timeout in seconds.
/// A timed out request is reported as a network failure.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Result of the best-effort connectivity probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    /// Probe not finished yet
    Checking,
    Connected,
    Disconnected,
}

impl ConnectionStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ConnectionStatus::Checking => "Verificando...",
            ConnectionStatus::Connected => "Conectado",
            ConnectionStatus::Disconnected => "Desconectado",
        }
    }
}

/// Source of the authoritative user list.
///
/// `UserClient` is the production implementation; tests substitute canned
/// sources.
pub trait UserSource {
    fn fetch_all(&self) -> impl Future<Output = Result<Vec<UserRecord>, FetchError>> + Send;

    fn check_status(&self) -> impl Future<Output = ConnectionStatus> + Send;
}

/// Client for the directory endpoint.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct UserClient {
    client: Client,
    url: String,
}

impl UserClient {
    /// Create a client for the default endpoint
    pub fn new() -> Result<Self> {
        Self::with_url(DEFAULT_API_URL)
    }

    /// Create a client for a specific endpoint
    pub fn with_url(url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self::with_client(client, url))
    }

    /// Wrap an already configured reqwest client.
    pub fn with_client(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch the full user list.
    pub async fn fetch_all(&self) -> Result<Vec<UserRecord>, FetchError> {
        debug!(url = %self.url, "Fetching users");

        let response = self
            .client
            .get(&self.url)
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;

        let response = Self::check_response(response)?;
        let body = response.text().await?;
        let users = decode_users(&body)?;

        info!(count = users.len(), "Users fetched");
        Ok(users)
    }

    /// Probe the endpoint with a HEAD request.
    /// Any HTTP answer counts as connected, whatever its status.
    pub async fn check_status(&self) -> ConnectionStatus {
        match self.client.head(&self.url).send().await {
            Ok(response) => {
                debug!(status = %response.status(), "Connectivity probe answered");
                ConnectionStatus::Connected
            }
            Err(e) => {
                warn!(error = %e, "Connectivity probe failed");
                ConnectionStatus::Disconnected
            }
        }
    }

    /// Check if response is successful, returning a typed error if not.
    fn check_response(response: reqwest::Response) -> Result<reqwest::Response, FetchError> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            warn!(%status, "User fetch rejected");
            Err(FetchError::from_status(status))
        }
    }
}

impl UserSource for UserClient {
    fn fetch_all(&self) -> impl Future<Output = Result<Vec<UserRecord>, FetchError>> + Send {
        UserClient::fetch_all(self)
    }

    fn check_status(&self) -> impl Future<Output = ConnectionStatus> + Send {
        UserClient::check_status(self)
    }
}

/// Decode a response body into user records.
///
/// The top-level value must be an array; individual records are returned
/// verbatim without further validation.
pub fn decode_users(body: &str) -> Result<Vec<UserRecord>, FetchError> {
    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|e| FetchError::InvalidBody(e.to_string()))?;

    if !value.is_array() {
        return Err(FetchError::Shape);
    }

    serde_json::from_value(value).map_err(|e| FetchError::InvalidBody(e.to_string()))
}
