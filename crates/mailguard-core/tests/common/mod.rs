//! Common test utilities for integration tests
#![allow(dead_code)]

use mailguard_core::models::SecurityConfig;
use mailguard_core::services::{
    ConfirmationResponse, InMemoryDoNotContactStore, NoopMetricsService, SecurityValidator,
    SubscriptionConfirmer,
};
use mailguard_core::{FeedbackProcessor, MailguardError, Translator};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// Get path to test fixtures directory
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

/// Load a notification JSON fixture
pub fn load_notification_fixture(name: &str) -> Vec<u8> {
    let path = fixtures_dir().join("notifications").join(name);
    std::fs::read(&path).unwrap_or_else(|_| panic!("Failed to read fixture: {:?}", path))
}

/// Confirmer that records every URL and answers with a fixed status
pub struct RecordingConfirmer {
    pub status: u16,
    pub calls: Mutex<Vec<String>>,
}

impl RecordingConfirmer {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl SubscriptionConfirmer for RecordingConfirmer {
    async fn confirm(&self, subscribe_url: &str) -> Result<ConfirmationResponse, MailguardError> {
        self.calls.lock().unwrap().push(subscribe_url.to_string());
        Ok(ConfirmationResponse {
            status: self.status,
            body: String::new(),
        })
    }
}

/// Topic the SNS fixtures are published on
pub const FEEDBACK_TOPIC_ARN: &str = "arn:aws:sns:us-east-1:123456789012:ses-feedback";

/// Processor without a topic allowlist, accepting bare SES payloads
pub fn build_processor(
    store: Arc<InMemoryDoNotContactStore>,
    confirmer: Arc<RecordingConfirmer>,
) -> FeedbackProcessor {
    build_processor_for_topics(store, confirmer, &[])
}

/// Processor that only accepts feedback published on `FEEDBACK_TOPIC_ARN`
pub fn build_topic_processor(
    store: Arc<InMemoryDoNotContactStore>,
    confirmer: Arc<RecordingConfirmer>,
) -> FeedbackProcessor {
    build_processor_for_topics(store, confirmer, &[FEEDBACK_TOPIC_ARN])
}

fn build_processor_for_topics(
    store: Arc<InMemoryDoNotContactStore>,
    confirmer: Arc<RecordingConfirmer>,
    topics: &[&str],
) -> FeedbackProcessor {
    FeedbackProcessor::new(
        store,
        confirmer,
        Arc::new(NoopMetricsService),
        SecurityValidator::new(SecurityConfig {
            allowed_topic_arns: topics.iter().map(|t| t.to_string()).collect(),
            verify_subscribe_url: true,
        }),
        Translator::new("en"),
    )
}
