/// Error types for Mailguard
use crate::i18n::MessageKey;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MailguardError {
    #[error("Invalid JSON payload: {0}")]
    InvalidJson(String),

    #[error("Missing notification type")]
    MissingType,

    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    #[error("Invalid notification message: {0}")]
    InvalidNotificationMessage(String),

    #[error("Subscription confirmation failed: {0}")]
    Subscription(String),

    #[error("Topic not allowed: {0}")]
    TopicNotAllowed(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl MailguardError {
    /// Key of the localized message reported to the caller
    pub fn message_key(&self) -> MessageKey {
        match self {
            Self::InvalidJson(_) => MessageKey::InvalidJson,
            Self::MissingType => MessageKey::MissingType,
            Self::InvalidPayload(_) => MessageKey::InvalidPayload,
            Self::InvalidNotificationMessage(_) => MessageKey::InvalidNotificationMessage,
            Self::Subscription(_) => MessageKey::SubscriptionFailed,
            Self::TopicNotAllowed(_) => MessageKey::TopicNotAllowed,
            Self::Validation(_) => MessageKey::InvalidPayload,
            Self::Storage(_) | Self::Config(_) => MessageKey::InternalError,
        }
    }

    /// HTTP status code reported to the caller
    ///
    /// Everything the sender got wrong is a 400; store and config failures are
    /// a 500 so SNS redelivers the notification.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Storage(_) | Self::Config(_) => 500,
            _ => 400,
        }
    }
}

// Implement conversions for common error types
impl From<serde_json::Error> for MailguardError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidPayload(err.to_string())
    }
}
