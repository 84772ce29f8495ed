/// Mailguard Core - SES/SNS feedback processing
///
/// This crate turns Amazon SNS/SES delivery-status notifications into
/// do-not-contact records. It is shared by the webhook API Lambda and its tests.
pub mod constants;
pub mod error;
pub mod i18n;
pub mod models;
pub mod processor;
pub mod services;
pub mod utils;

// Re-export commonly used types
pub use error::MailguardError;
pub use i18n::{MessageKey, Translator};
pub use processor::{FeedbackProcessor, ProcessOutcome};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
