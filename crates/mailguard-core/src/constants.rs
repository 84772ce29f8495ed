/// Application constants
///
/// Values shared by the processor, the stores and the configuration loader.
// ============================================================================
// Notification Format Constants
// ============================================================================
/// Discriminator fields, checked in this order
pub const TYPE_FIELDS: &[&str] = &["Type", "eventType", "notificationType"];

/// Bounce type that results in a suppression
pub const PERMANENT_BOUNCE_TYPE: &str = "Permanent";

/// Header carrying the id of the email that was sent
pub const EMAIL_ID_HEADER: &str = "X-EMAIL-ID";

/// Comment recorded when a bounce carries no diagnostic code
pub const UNKNOWN_DIAGNOSTIC_CODE: &str = "unknown";

/// Maximum depth of `Notification` envelopes wrapping each other
pub const MAX_NOTIFICATION_DEPTH: usize = 3;

// ============================================================================
// Do-Not-Contact Constants
// ============================================================================

/// Channel recorded on every suppression entry
pub const EMAIL_CHANNEL: &str = "email";

/// Default store backend
pub const DEFAULT_DNC_STORE: &str = "dynamodb";

// ============================================================================
// Subscription Confirmation
// ============================================================================

/// Default timeout for the SubscribeURL callback in seconds
pub const DEFAULT_CONFIRM_TIMEOUT_SECS: u64 = 10;

/// Maximum number of response body bytes kept for logging a failed callback
pub const MAX_LOGGED_BODY_BYTES: usize = 512;

/// Hosts SNS sends SubscribeURLs from
pub const SNS_HOST_PATTERN: &str = r"^sns\.[a-z0-9-]+\.amazonaws\.com(\.cn)?$";

// ============================================================================
// Localization
// ============================================================================

/// Default response locale
pub const DEFAULT_LOCALE: &str = "en";

// ============================================================================
// Logging & Monitoring
// ============================================================================

/// Metric namespace for CloudWatch
pub const METRICS_NAMESPACE: &str = "Mailguard";

/// Log target for metrics
pub const LOG_TARGET_METRICS: &str = "metrics";

/// Log target for security events
pub const LOG_TARGET_SECURITY: &str = "security";
