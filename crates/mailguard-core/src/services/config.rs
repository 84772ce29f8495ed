/// Configuration loader - reads config from environment variables
use crate::constants::{
    DEFAULT_CONFIRM_TIMEOUT_SECS, DEFAULT_DNC_STORE, DEFAULT_LOCALE, METRICS_NAMESPACE,
};
use crate::error::MailguardError;
use crate::models::{MetricsConfig, SecurityConfig, StoreBackend, StoreConfig, WebhookConfig};

impl WebhookConfig {
    pub fn from_env() -> Result<Self, MailguardError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the config from any variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, MailguardError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let backend = match lookup("DNC_STORE")
            .unwrap_or_else(|| DEFAULT_DNC_STORE.to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "dynamodb" => StoreBackend::DynamoDb,
            "memory" => StoreBackend::Memory,
            other => {
                return Err(MailguardError::Config(format!(
                    "Invalid DNC_STORE value: {}",
                    other
                )));
            }
        };

        let table = lookup("DNC_TABLE").filter(|t| !t.trim().is_empty());
        if backend == StoreBackend::DynamoDb && table.is_none() {
            return Err(MailguardError::Config("Missing DNC_TABLE env var".to_string()));
        }

        let allowed_topic_arns = lookup("ALLOWED_TOPIC_ARNS")
            .unwrap_or_default()
            .split(',')
            .filter(|s| !s.trim().is_empty())
            .map(|s| s.trim().to_string())
            .collect();

        let confirm_timeout_secs = match lookup("CONFIRM_TIMEOUT_SECS") {
            Some(value) => value.trim().parse::<u64>().map_err(|e| {
                MailguardError::Config(format!("Invalid CONFIRM_TIMEOUT_SECS: {}", e))
            })?,
            None => DEFAULT_CONFIRM_TIMEOUT_SECS,
        };

        Ok(Self {
            store: StoreConfig { backend, table },
            security: SecurityConfig {
                allowed_topic_arns,
                verify_subscribe_url: parse_bool(&lookup, "VERIFY_SUBSCRIBE_URL", true)?,
            },
            metrics: MetricsConfig {
                enabled: parse_bool(&lookup, "METRICS_ENABLED", true)?,
                namespace: lookup("METRICS_NAMESPACE")
                    .unwrap_or_else(|| METRICS_NAMESPACE.to_string()),
            },
            locale: lookup("WEBHOOK_LOCALE").unwrap_or_else(|| DEFAULT_LOCALE.to_string()),
            confirm_timeout_secs,
        })
    }
}

fn parse_bool<F>(lookup: &F, name: &str, default: bool) -> Result<bool, MailguardError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name).map(|v| v.trim().to_ascii_lowercase()) {
        None => Ok(default),
        Some(v) if v.is_empty() => Ok(default),
        Some(v) => match v.as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(MailguardError::Config(format!("Invalid {} value: {}", name, v))),
        },
    }
}
