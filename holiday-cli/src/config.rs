//! Configuration module
//!
//! Resolves the CLI settings into a ready-to-use API client.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use holiday_client::{ApiClient, ClientConfig, FileSessionStore, HolidayPlanService};

use crate::reporter::ConsoleReporter;

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// URL of the holiday API
    pub api_url: String,

    /// Session file shared by consecutive invocations
    pub session_file: PathBuf,

    /// Shared by every client this config builds
    reporter: Arc<ConsoleReporter>,
}

impl Config {
    pub fn new(api_url: impl Into<String>, session_file: PathBuf) -> Self {
        Self {
            api_url: api_url.into(),
            session_file,
            reporter: Arc::new(ConsoleReporter::default()),
        }
    }

    pub fn reporter(&self) -> &ConsoleReporter {
        &self.reporter
    }

    /// `<config dir>/holiday/session.json`, or `./holiday/session.json` when
    /// the platform has no config directory
    pub fn default_session_file() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("holiday")
            .join("session.json")
    }

    /// Build a client backed by the session file
    ///
    /// The timeout still comes from `HOLIDAY_API_TIMEOUT` when set.
    pub fn client(&self) -> Result<ApiClient> {
        let mut client_config = ClientConfig::from_env();
        client_config.base_url = self.api_url.clone();

        let client = ApiClient::from_config(client_config)?
            .with_session_store(Arc::new(FileSessionStore::open(&self.session_file)))
            .with_reporter(self.reporter.clone());

        Ok(client)
    }

    pub fn service(&self) -> Result<HolidayPlanService> {
        Ok(HolidayPlanService::new(self.client()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_session_file_location() {
        let path = Config::default_session_file();
        assert!(path.ends_with("holiday/session.json"));
    }

    #[test]
    fn test_client_uses_configured_url() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::new("http://api.example.com/", dir.path().join("session.json"));

        let client = config.client().unwrap();
        assert_eq!(client.base_url(), "http://api.example.com");
        assert!(!client.is_authenticated());
    }

    #[test]
    fn test_session_survives_between_clients() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::new(
            "http://localhost:8080",
            dir.path().join("nested").join("session.json"),
        );

        config.client().unwrap().set_auth_token("tok-1");

        let next = config.client().unwrap();
        assert!(next.is_authenticated());
    }

    #[test]
    fn test_bad_url_is_rejected() {
        let config = Config::new("localhost", PathBuf::from("session.json"));

        assert!(config.client().is_err());
    }

    #[tokio::test]
    async fn test_client_failures_reach_the_shared_reporter() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/holidays/1")
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let config = Config::new(server.url(), dir.path().join("session.json"));
        assert!(!config.reporter().has_shown_failure());

        let err = config.service().unwrap().get_plan_by_id(1).await.unwrap_err();

        assert_eq!(err.status(), 0);
        assert!(!err.is_transport());
        assert!(config.reporter().has_shown_failure());
    }
}
