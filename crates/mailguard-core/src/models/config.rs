/// Configuration models
use crate::constants::{DEFAULT_CONFIRM_TIMEOUT_SECS, DEFAULT_LOCALE, METRICS_NAMESPACE};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookConfig {
    pub store: StoreConfig,
    pub security: SecurityConfig,
    pub metrics: MetricsConfig,
    pub locale: String,
    pub confirm_timeout_secs: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    DynamoDb,
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    pub table: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Empty means every topic is accepted
    pub allowed_topic_arns: Vec<String>,
    pub verify_subscribe_url: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    pub enabled: bool,
    pub namespace: String,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            store: StoreConfig {
                backend: StoreBackend::Memory,
                table: None,
            },
            security: SecurityConfig {
                allowed_topic_arns: vec![],
                verify_subscribe_url: true,
            },
            metrics: MetricsConfig {
                enabled: false,
                namespace: METRICS_NAMESPACE.to_string(),
            },
            locale: DEFAULT_LOCALE.to_string(),
            confirm_timeout_secs: DEFAULT_CONFIRM_TIMEOUT_SECS,
        }
    }
}
