/// Security validation for SNS envelopes
use crate::constants::{LOG_TARGET_SECURITY, SNS_HOST_PATTERN};
use crate::error::MailguardError;
use crate::models::SecurityConfig;
use regex::Regex;
use std::sync::LazyLock;
use tracing::warn;
use url::Url;

static SNS_HOST: LazyLock<Regex> = LazyLock::new(|| Regex::new(SNS_HOST_PATTERN).unwrap());

/// Security validation service
pub struct SecurityValidator {
    security_config: SecurityConfig,
}

impl SecurityValidator {
    pub fn new(security_config: SecurityConfig) -> Self {
        Self { security_config }
    }

    /// Validates that a SubscribeURL points at SNS over https
    pub fn validate_subscribe_url(&self, subscribe_url: &str) -> Result<(), MailguardError> {
        let url = Url::parse(subscribe_url).map_err(|e| {
            MailguardError::InvalidPayload(format!("Invalid SubscribeURL: {}", e))
        })?;

        if !self.security_config.verify_subscribe_url {
            return Ok(());
        }

        let host = url.host_str().unwrap_or_default();
        if url.scheme() != "https" || !SNS_HOST.is_match(host) {
            warn!(
                target: LOG_TARGET_SECURITY,
                scheme = url.scheme(),
                host = host,
                "Rejected SubscribeURL outside of SNS"
            );
            return Err(MailguardError::Validation(format!(
                "SubscribeURL host {} is not an SNS endpoint",
                host
            )));
        }

        Ok(())
    }

    /// Validates the envelope's TopicArn against the allowlist
    pub fn validate_topic(&self, topic_arn: Option<&str>) -> Result<(), MailguardError> {
        let allowed = &self.security_config.allowed_topic_arns;
        if allowed.is_empty() {
            return Ok(());
        }

        match topic_arn {
            Some(arn) if allowed.iter().any(|a| a == arn) => Ok(()),
            other => {
                warn!(
                    target: LOG_TARGET_SECURITY,
                    topic_arn = other.unwrap_or("<none>"),
                    "Rejected notification from topic outside the allowlist"
                );
                Err(MailguardError::TopicNotAllowed(
                    other.unwrap_or("<none>").to_string(),
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validator(verify: bool, topics: &[&str]) -> SecurityValidator {
        SecurityValidator::new(SecurityConfig {
            allowed_topic_arns: topics.iter().map(|t| t.to_string()).collect(),
            verify_subscribe_url: verify,
        })
    }

    #[test]
    fn test_subscribe_url_accepts_sns_hosts() {
        let v = validator(true, &[]);
        assert!(
            v.validate_subscribe_url(
                "https://sns.us-east-1.amazonaws.com/?Action=ConfirmSubscription&Token=x"
            )
            .is_ok()
        );
        assert!(
            v.validate_subscribe_url("https://sns.cn-north-1.amazonaws.com.cn/?Token=x")
                .is_ok()
        );
    }

    #[test]
    fn test_subscribe_url_rejects_other_hosts() {
        let v = validator(true, &[]);
        assert!(v.validate_subscribe_url("http://sns.us-east-1.amazonaws.com/").is_err());
        assert!(v.validate_subscribe_url("https://evil.example.com/").is_err());
        assert!(
            v.validate_subscribe_url("https://sns.us-east-1.amazonaws.com.evil.com/")
                .is_err()
        );
        assert!(matches!(
            v.validate_subscribe_url("not a url"),
            Err(MailguardError::InvalidPayload(_))
        ));
    }

    #[test]
    fn test_subscribe_url_check_can_be_disabled() {
        let v = validator(false, &[]);
        assert!(v.validate_subscribe_url("http://127.0.0.1:8080/confirm").is_ok());
    }

    #[test]
    fn test_topic_allowlist() {
        let open = validator(true, &[]);
        assert!(open.validate_topic(None).is_ok());

        let v = validator(true, &["arn:aws:sns:us-east-1:123:ses-feedback"]);
        assert!(v.validate_topic(Some("arn:aws:sns:us-east-1:123:ses-feedback")).is_ok());
        assert!(matches!(
            v.validate_topic(Some("arn:aws:sns:us-east-1:123:other")),
            Err(MailguardError::TopicNotAllowed(_))
        ));
        assert!(v.validate_topic(None).is_err());
    }
}
