//! Authentication endpoints and session accessors

use holiday_core::dto::auth::{HealthStatus, LoginRequest, LoginResponse, RefreshResponse};
use serde::de::IgnoredAny;
use tracing::{info, warn};

use crate::ApiClient;
use crate::error::Result;

impl ApiClient {
    // =============================================================================
    // Session Lifecycle
    // =============================================================================

    /// Log in and store the issued token, the email and the profile
    ///
    /// # Arguments
    /// * `email` - The account email
    /// * `password` - The account password
    ///
    /// # Returns
    /// The token and profile returned by the server
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse> {
        let response: LoginResponse = self
            .post(
                "/auth/login",
                &LoginRequest {
                    email: email.to_string(),
                    password: password.to_string(),
                },
            )
            .await?;

        if !response.token.is_empty() {
            self.state
                .session
                .establish(&response.token, email, &response.user);
            info!("Logged in as {}", email);
        }

        Ok(response)
    }

    /// Log out
    ///
    /// The server is notified on a best-effort basis: a failure is logged and
    /// swallowed. The local session is cleared in every case.
    pub async fn logout(&self) {
        let notified: Result<IgnoredAny> = self.post_empty("/auth/logout").await;
        if let Err(e) = notified {
            warn!("Logout error: {}", e);
        }

        self.state.session.clear();
    }

    /// Exchange the current token for a fresh one
    ///
    /// Only the token is replaced; email and profile are left as they are.
    pub async fn refresh_token(&self) -> Result<RefreshResponse> {
        let response: RefreshResponse = self.post_empty("/auth/refresh").await?;

        if !response.token.is_empty() {
            self.state.session.set_token(&response.token);
        }

        Ok(response)
    }

    // =============================================================================
    // Session Accessors
    // =============================================================================

    /// Whether a token is present
    pub fn is_authenticated(&self) -> bool {
        self.state.session.token().is_some()
    }

    /// The stored user profile, if any
    pub fn get_current_user(&self) -> Option<serde_json::Value> {
        self.state.session.profile()
    }

    /// The signed-in user's email, if any
    pub fn get_user_email(&self) -> Option<String> {
        self.state.session.email()
    }

    /// Store a token obtained elsewhere
    pub fn set_auth_token(&self, token: &str) {
        self.state.session.set_token(token);
    }

    /// Forget the token, keeping email and profile
    pub fn clear_auth_token(&self) {
        self.state.session.clear_token();
    }

    /// Query the API health endpoint
    pub async fn health_check(&self) -> Result<HealthStatus> {
        self.get("/health").await
    }
}
