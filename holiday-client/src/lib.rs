//! Holiday HTTP Client
//!
//! A type-safe client for the holiday planning API.
//!
//! The crate has two layers:
//! - [`ApiClient`], the request pipeline: it stamps every call with the session
//!   headers, normalizes failures into [`ClientError`], tears the session down on
//!   401 and offers caching, retry, serial queuing, batching, file transfer and
//!   server-push helpers.
//! - [`HolidayPlanService`], a facade mapping plan, activity, sharing, template
//!   and calendar operations onto `/api/holidays` endpoints.
//!
//! # Example
//!
//! ```no_run
//! use holiday_client::{ApiClient, HolidayPlanService};
//!
//! # async fn example() -> holiday_client::Result<()> {
//! let client = ApiClient::new("http://localhost:8080")?;
//! client.login("a@b.com", "secret").await?;
//!
//! let plans = HolidayPlanService::new(client);
//! let plan = plans.get_plan_by_id(42).await?;
//! println!("{} in {}", plan.title, plan.destination);
//! # Ok(())
//! # }
//! ```

mod auth;
pub mod cache;
pub mod cancel;
pub mod config;
pub mod error;
pub mod events;
pub mod metrics;
pub mod queue;
pub mod reporter;
mod resilience;
pub mod service;
pub mod session;
mod transfer;

// Re-export commonly used types
pub use cancel::CancelHandle;
pub use config::ClientConfig;
pub use error::{ClientError, Result};
pub use events::{EventStream, ServerEvent};
pub use metrics::PerformanceMetrics;
pub use reporter::{Reporter, Severity, TracingReporter};
pub use resilience::{RetryPolicy, batch, retry_with_backoff};
pub use service::HolidayPlanService;
pub use session::{FileSessionStore, MemorySessionStore, Session, SessionStore};
pub use transfer::UploadFile;

use std::sync::Arc;
use std::time::Duration;

use chrono::{SecondsFormat, Utc};
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::time::Instant;
use tracing::{debug, error};

use cache::ResponseCache;
use metrics::MetricsRecorder;
use queue::RequestQueue;

/// Header carrying the signed-in user's email
pub const USER_EMAIL_HEADER: &str = "X-User-Email";
/// Header carrying the time the request was issued (RFC 3339)
pub const REQUEST_TIME_HEADER: &str = "X-Request-Time";

/// Warning shown when a 401 ends the session
pub const SESSION_EXPIRED_MESSAGE: &str = "Your session has expired. Please log in again.";
/// Shown for every 403
pub const PERMISSION_DENIED_MESSAGE: &str =
    "Access denied. You don't have permission to perform this action.";
/// Shown for every 5xx
pub const SERVER_ERROR_MESSAGE: &str = "Server error. Please try again later.";

/// Process-wide state shared by every clone of an [`ApiClient`]
///
/// Groups the session, the response cache, the serial queue and the
/// performance counters so that they can be created and reset together.
pub struct ClientState {
    session: Session,
    cache: ResponseCache,
    queue: RequestQueue,
    metrics: MetricsRecorder,
}

impl ClientState {
    /// Initializes fresh state over the given session store
    pub fn new(store: Arc<dyn SessionStore>, queue_spacing: Duration) -> Self {
        Self {
            session: Session::new(store),
            cache: ResponseCache::new(),
            queue: RequestQueue::new(queue_spacing),
            metrics: MetricsRecorder::new(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    pub fn queue(&self) -> &RequestQueue {
        &self.queue
    }

    /// Clears the cache, pending queue items, counters and the session
    pub fn reset(&self) {
        self.cache.clear();
        self.queue.clear();
        self.metrics.reset();
        self.session.clear();
    }
}

impl std::fmt::Debug for ClientState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientState")
            .field("session", &self.session)
            .field("cached_entries", &self.cache.len())
            .field("queue", &self.queue)
            .finish()
    }
}

/// HTTP client for the holiday planning API
///
/// Cloning is cheap; clones share session, cache, queue and counters.
#[derive(Clone)]
pub struct ApiClient {
    /// Base URL of the API (e.g., "http://localhost:8080")
    base_url: String,
    /// HTTP client instance
    client: Client,
    /// Per-call time budget
    timeout: Duration,
    /// Where the reporter is sent when the session is rejected
    login_path: String,
    state: Arc<ClientState>,
    reporter: Arc<dyn Reporter>,
}

impl ApiClient {
    /// Create a client for `base_url` with default settings
    ///
    /// # Example
    /// ```
    /// use holiday_client::ApiClient;
    ///
    /// let client = ApiClient::new("http://localhost:8080/").unwrap();
    /// assert_eq!(client.base_url(), "http://localhost:8080");
    /// ```
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::from_config(ClientConfig::new(base_url))
    }

    /// Create a client from a full configuration
    pub fn from_config(config: ClientConfig) -> Result<Self> {
        config.validate()?;

        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );

        let client = Client::builder()
            .default_headers(headers)
            .connect_timeout(config.timeout)
            .build()
            .map_err(|e| ClientError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self::with_client(config, client))
    }

    /// Create a client around a custom reqwest Client
    ///
    /// This allows you to configure proxies, TLS settings, etc. The per-call
    /// timeout from `config` is still applied to every request.
    pub fn with_client(config: ClientConfig, client: Client) -> Self {
        let store: Arc<dyn SessionStore> = Arc::new(MemorySessionStore::new());
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
            timeout: config.timeout,
            login_path: config.login_path,
            state: Arc::new(ClientState::new(store, config.queue_spacing)),
            reporter: Arc::new(TracingReporter),
        }
    }

    /// Replace the session store, starting from fresh client state
    pub fn with_session_store(mut self, store: Arc<dyn SessionStore>) -> Self {
        let spacing = self.state.queue.spacing();
        self.state = Arc::new(ClientState::new(store, spacing));
        self
    }

    /// Replace the side-channel reporter
    pub fn with_reporter(mut self, reporter: Arc<dyn Reporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Get the base URL of the API
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Shared state behind this client
    pub fn state(&self) -> &ClientState {
        &self.state
    }

    /// Clear cache, queue, counters and session
    pub fn reset(&self) {
        self.state.reset();
    }

    // =============================================================================
    // Generic Verbs
    // =============================================================================

    /// GET `path` and decode the JSON body
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.send(self.request(Method::GET, path)).await
    }

    /// GET `path` with a query string built from `query`
    pub async fn get_with_query<T, Q>(&self, path: &str, query: &Q) -> Result<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        self.send(self.request(Method::GET, path).query(query)).await
    }

    /// POST a JSON body to `path`
    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send(self.request(Method::POST, path).json(body)).await
    }

    /// POST to `path` without a body
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.send(self.request(Method::POST, path)).await
    }

    /// PUT a JSON body to `path`
    pub async fn put<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send(self.request(Method::PUT, path).json(body)).await
    }

    /// PATCH a JSON body to `path`
    pub async fn patch<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send(self.request(Method::PATCH, path).json(body)).await
    }

    /// DELETE `path`
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.send(self.request(Method::DELETE, path)).await
    }

    /// DELETE `path` with a query string built from `query`
    pub async fn delete_with_query<T, Q>(&self, path: &str, query: &Q) -> Result<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        self.send(self.request(Method::DELETE, path).query(query)).await
    }

    // =============================================================================
    // Request Interception
    // =============================================================================

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Start a request carrying the session headers and the call timeout
    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.stamp(self.client.request(method, self.url(path))).timeout(self.timeout)
    }

    /// Attach bearer token, user email and issue time
    fn stamp(&self, mut builder: RequestBuilder) -> RequestBuilder {
        let session = &self.state.session;

        if let Some(token) = session.token() {
            builder = builder.bearer_auth(token);
        }

        if let Some(email) = session.email() {
            builder = builder.header(USER_EMAIL_HEADER, email);
        }

        builder.header(
            REQUEST_TIME_HEADER,
            Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        )
    }

    /// Dispatch and decode a JSON response
    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let response = self.dispatch(builder).await?;
        Self::decode(response).await.map_err(|e| self.fail(e))
    }

    /// Send a request, record it, and turn non-2xx answers into errors
    ///
    /// Every failure leaving this method has already been reported.
    async fn dispatch(&self, builder: RequestBuilder) -> Result<Response> {
        let (client, request) = builder.build_split();
        let request = request.map_err(|e| self.fail(e.into()))?;

        let method = request.method().clone();
        let url = request.url().path().to_string();
        debug!("API Request: {} {}", method, url);

        let started = Instant::now();
        let outcome = match client.execute(request).await {
            Ok(response) => Self::check_status(response).await,
            Err(e) => Err(ClientError::from(e)),
        };
        self.state.metrics.record(started.elapsed(), outcome.is_err());

        match outcome {
            Ok(response) => {
                debug!("API Response: {} {} -> {}", method, url, response.status());
                Ok(response)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Handle an API response status
    ///
    /// Successful responses pass through untouched; anything else is read
    /// for an error payload and normalized.
    async fn check_status(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.bytes().await.unwrap_or_default();
        Err(ClientError::from_response(status, &body))
    }

    /// Deserialize a JSON body; an empty body decodes as `null`
    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        let body = response.bytes().await?;
        let raw: &[u8] = if body.is_empty() { b"null" } else { &body };

        serde_json::from_slice(raw)
            .map_err(|e| ClientError::Parse(format!("Failed to parse JSON response: {}", e)))
    }

    // =============================================================================
    // Response Interception
    // =============================================================================

    /// Report a failure through the side channels and hand it back
    ///
    /// Exactly one notification is produced per failure. A 401 takes
    /// precedence over every other branch: the session is cleared and the
    /// reporter is sent to the login entry point instead of the generic
    /// error notification.
    fn fail(&self, error: ClientError) -> ClientError {
        error!(status = error.status(), "API Error: {}", error.message());

        match error.status() {
            401 => self.invalidate_session(),
            403 => self.reporter.notify(Severity::Error, PERMISSION_DENIED_MESSAGE),
            status if status >= 500 => self.reporter.notify(Severity::Error, SERVER_ERROR_MESSAGE),
            _ => self.reporter.notify(Severity::Error, &error.message()),
        }

        error
    }

    fn invalidate_session(&self) {
        self.state.session.clear();
        self.reporter.notify(Severity::Warning, SESSION_EXPIRED_MESSAGE);
        self.reporter.navigate(&self.login_path);
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("state", &self.state)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = ApiClient::new("http://localhost:8080").unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080");
    }

    #[test]
    fn test_client_trims_trailing_slash() {
        let client = ApiClient::new("http://localhost:8080/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080");
        assert_eq!(client.url("/api/holidays"), "http://localhost:8080/api/holidays");
    }

    #[test]
    fn test_client_rejects_bad_url() {
        assert!(matches!(
            ApiClient::new("localhost:8080"),
            Err(ClientError::Validation(_))
        ));
    }

    #[test]
    fn test_client_with_custom_client() {
        let client = ApiClient::with_client(ClientConfig::default(), Client::new());
        assert_eq!(client.base_url(), "http://localhost:8080");
    }

    #[test]
    fn test_reset_clears_shared_state() {
        let client = ApiClient::new("http://localhost:8080").unwrap();
        let clone = client.clone();

        client.set_auth_token("T");
        client
            .state()
            .cache()
            .store("k", &1, cache::DEFAULT_TTL)
            .unwrap();
        assert!(clone.is_authenticated());

        clone.reset();
        assert!(!client.is_authenticated());
        assert!(client.state().cache().is_empty());
    }
}
