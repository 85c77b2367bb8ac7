//! Shared fixtures for the integration tests

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use holiday_client::{ApiClient, ClientConfig, Reporter, Severity};

/// Reporter that remembers every side effect
#[derive(Debug, Default)]
pub struct RecordingReporter {
    pub notifications: Mutex<Vec<(Severity, String)>>,
    pub navigations: Mutex<Vec<String>>,
    pub progress: Mutex<Vec<u8>>,
}

impl Reporter for RecordingReporter {
    fn notify(&self, severity: Severity, message: &str) {
        self.notifications
            .lock()
            .unwrap()
            .push((severity, message.to_string()));
    }

    fn on_progress(&self, percent: u8) {
        self.progress.lock().unwrap().push(percent);
    }

    fn navigate(&self, location: &str) {
        self.navigations.lock().unwrap().push(location.to_string());
    }
}

impl RecordingReporter {
    pub fn notifications(&self) -> Vec<(Severity, String)> {
        self.notifications.lock().unwrap().clone()
    }

    pub fn navigations(&self) -> Vec<String> {
        self.navigations.lock().unwrap().clone()
    }

    pub fn progress(&self) -> Vec<u8> {
        self.progress.lock().unwrap().clone()
    }
}

/// Client pointed at `url` with a recording reporter attached
pub fn client_for(url: &str) -> (ApiClient, Arc<RecordingReporter>) {
    let reporter = Arc::new(RecordingReporter::default());
    let client = ApiClient::from_config(ClientConfig::new(url))
        .unwrap()
        .with_reporter(reporter.clone());
    (client, reporter)
}

pub fn plan_json(id: i64) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "title": "Summer in Lisbon",
        "destination": "Lisbon",
        "startDate": "2024-07-01",
        "endDate": "2024-07-10",
        "userEmail": "a@b.com",
        "status": "DRAFT",
        "activities": []
    })
}
