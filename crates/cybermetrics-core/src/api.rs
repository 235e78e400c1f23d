// HTTP client for the Cybermetrics REST API.
//
// `ApiClient` wraps reqwest with the base URL, timeout and bearer-token
// injection, and turns every failure into an `ApiError`. The consumed
// endpoints are grouped into the `AuthApi`, `HealthApi` and `PlayerApi`
// traits so the rest of the crate can be tested against in-memory fakes.

use anyhow::Context;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::ApiConfig;
use crate::models::{
    AddPlayerResponse, DeletePlayerResponse, HealthResponse, LoginRequest, LoginResponse,
    NewSavedPlayer, PlayerDetail, PlayerSearchResult, SavedPlayer, SignupRequest, SignupResponse,
    VerifyTokenResponse,
};
use crate::session::SessionContext;

// ---------------------------------------------------------------------------
// Endpoints
// ---------------------------------------------------------------------------

pub const LOGIN_PATH: &str = "/api/auth/login";
pub const SIGNUP_PATH: &str = "/api/auth/signup";
pub const VERIFY_PATH: &str = "/api/auth/verify";
pub const HEALTH_PATH: &str = "/health";
pub const SEARCH_PATH: &str = "/api/players/search";
pub const SAVED_PATH: &str = "/api/players/saved";

pub fn detail_path(player_id: u64) -> String {
    format!("/api/players/{player_id}/detail")
}

pub fn saved_player_path(player_id: u64) -> String {
    format!("{SAVED_PATH}/{player_id}")
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why a call to the remote API failed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// The request never produced a response (connect failure, timeout).
    #[error("No response from server: {0}")]
    Transport(String),

    /// The server answered with a non-success status.
    #[error("server returned {status}: {}", .detail.as_deref().unwrap_or("Request failed"))]
    Server { status: u16, detail: Option<String> },

    /// A response arrived but its body did not match the expected shape.
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// Rejected on the client before any request was sent.
    #[error("{0}")]
    Validation(String),
}

impl ApiError {
    /// The message shown to the user. Server detail wins; transport failures
    /// get a fixed message; anything else falls back to `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ApiError::Transport(_) => "No response from server".to_string(),
            ApiError::Server {
                detail: Some(detail),
                ..
            } if !detail.trim().is_empty() => detail.clone(),
            ApiError::Server { .. } | ApiError::Decode(_) => fallback.to_string(),
            ApiError::Validation(message) => message.clone(),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Server { status: 401 | 403, .. })
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else {
            ApiError::Transport(e.to_string())
        }
    }
}

/// Pull a human-readable message out of an error body.
///
/// Accepts `{"detail": "..."}` as well as the validation shape
/// `{"detail": [{"msg": "...", ...}, ...]}`, using the first entry.
pub(crate) fn parse_detail(body: &str) -> Option<String> {
    let v: Value = serde_json::from_str(body).ok()?;
    match v.get("detail")? {
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => items
            .first()?
            .get("msg")?
            .as_str()
            .map(|s| s.to_string()),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Consumed API surface
// ---------------------------------------------------------------------------

#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError>;
    async fn signup(&self, request: &SignupRequest) -> Result<SignupResponse, ApiError>;
    /// Validate the bearer token currently held by the session.
    async fn verify(&self) -> Result<VerifyTokenResponse, ApiError>;
}

#[async_trait]
pub trait HealthApi: Send + Sync {
    async fn health(&self) -> Result<HealthResponse, ApiError>;
}

#[async_trait]
pub trait PlayerApi: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<PlayerSearchResult>, ApiError>;
    async fn player_detail(&self, player_id: u64) -> Result<PlayerDetail, ApiError>;
    async fn saved_players(&self) -> Result<Vec<SavedPlayer>, ApiError>;
    async fn save_player(&self, player: &NewSavedPlayer) -> Result<AddPlayerResponse, ApiError>;
    async fn delete_saved_player(&self, player_id: u64) -> Result<DeletePlayerResponse, ApiError>;
}

/// Everything the client consumes. Blanket-implemented for any type that
/// provides all three surfaces.
pub trait CybermetricsApi: AuthApi + HealthApi + PlayerApi {}

impl<T: AuthApi + HealthApi + PlayerApi> CybermetricsApi for T {}

// ---------------------------------------------------------------------------
// ApiClient
// ---------------------------------------------------------------------------

/// reqwest-backed implementation of the API traits.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: SessionContext,
}

impl ApiClient {
    /// Build a client for `config.base_url`. The token is read from
    /// `session` on every request.
    pub fn new(config: &ApiConfig, session: SessionContext) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout())
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    /// Start a request, attaching `Authorization: Bearer <token>` when the
    /// session holds a token.
    fn request(&self, method: Method, endpoint: &str) -> RequestBuilder {
        let builder = self.http.request(method, self.url(endpoint));
        match self.session.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Send a prepared request and decode a JSON success body.
    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ApiError> {
        let response = builder.send().await.map_err(|e| {
            warn!("Request failed before a response arrived: {}", e);
            ApiError::from(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = parse_detail(&body);
            debug!("Server returned {} (detail: {:?})", status, detail);
            return Err(ApiError::Server {
                status: status.as_u16(),
                detail,
            });
        }

        response.json::<T>().await.map_err(ApiError::from)
    }

    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ApiError> {
        self.send(self.request(Method::GET, endpoint)).await
    }

    pub async fn post<T, B>(&self, endpoint: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send(self.request(Method::POST, endpoint).json(body)).await
    }

    pub async fn put<T, B>(&self, endpoint: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send(self.request(Method::PUT, endpoint).json(body)).await
    }

    pub async fn patch<T, B>(&self, endpoint: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send(self.request(Method::PATCH, endpoint).json(body)).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ApiError> {
        self.send(self.request(Method::DELETE, endpoint)).await
    }
}

#[async_trait]
impl AuthApi for ApiClient {
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
        self.post(LOGIN_PATH, request).await
    }

    async fn signup(&self, request: &SignupRequest) -> Result<SignupResponse, ApiError> {
        self.post(SIGNUP_PATH, request).await
    }

    async fn verify(&self) -> Result<VerifyTokenResponse, ApiError> {
        self.get(VERIFY_PATH).await
    }
}

#[async_trait]
impl HealthApi for ApiClient {
    async fn health(&self) -> Result<HealthResponse, ApiError> {
        self.get(HEALTH_PATH).await
    }
}

#[async_trait]
impl PlayerApi for ApiClient {
    async fn search(&self, query: &str) -> Result<Vec<PlayerSearchResult>, ApiError> {
        // reqwest percent-encodes the query value.
        let builder = self
            .request(Method::GET, SEARCH_PATH)
            .query(&[("q", query)]);
        self.send(builder).await
    }

    async fn player_detail(&self, player_id: u64) -> Result<PlayerDetail, ApiError> {
        self.get(&detail_path(player_id)).await
    }

    async fn saved_players(&self) -> Result<Vec<SavedPlayer>, ApiError> {
        self.get(SAVED_PATH).await
    }

    async fn save_player(&self, player: &NewSavedPlayer) -> Result<AddPlayerResponse, ApiError> {
        self.post(SAVED_PATH, player).await
    }

    async fn delete_saved_player(&self, player_id: u64) -> Result<DeletePlayerResponse, ApiError> {
        self.delete(&saved_player_path(player_id)).await
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
