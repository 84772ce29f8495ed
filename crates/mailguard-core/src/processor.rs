/// Feedback processing - turns SNS/SES notifications into suppression entries
use crate::constants::{
    EMAIL_ID_HEADER, MAX_LOGGED_BODY_BYTES, MAX_NOTIFICATION_DEPTH, PERMANENT_BOUNCE_TYPE,
    UNKNOWN_DIAGNOSTIC_CODE,
};
use crate::error::MailguardError;
use crate::i18n::{MessageKey, Translator};
use crate::models::{
    BounceNotification, ComplaintNotification, DoNotContactEntry, DoNotContactReason, MailInfo,
    NotificationKind, SnsNotification, SubscriptionConfirmation,
};
use crate::services::{
    DoNotContactChange, DoNotContactStore, Metrics, MetricsService, SecurityValidator,
    SubscriptionConfirmer,
};
use crate::utils::{normalize_address, redact_email, truncate_for_log};
use serde::Deserialize;
use serde_json::Value;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// What a single callback did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutcome {
    /// Kind that was handled; for SNS envelopes, the kind of the wrapped message
    pub kind: NotificationKind,
    /// Recipients listed in the notification that were acted upon
    pub recipients: usize,
    /// Entries created, or replaced because their reason changed
    pub recorded: usize,
}

impl ProcessOutcome {
    fn handled(kind: NotificationKind) -> Self {
        Self {
            kind,
            recipients: 0,
            recorded: 0,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self.kind, NotificationKind::Unknown(_))
    }

    pub fn message_key(&self) -> MessageKey {
        if self.is_unknown() {
            MessageKey::UnknownType
        } else {
            MessageKey::Processed
        }
    }
}

pub struct FeedbackProcessor {
    store: Arc<dyn DoNotContactStore>,
    confirmer: Arc<dyn SubscriptionConfirmer>,
    metrics: Arc<dyn MetricsService>,
    security: SecurityValidator,
    translator: Translator,
}

impl FeedbackProcessor {
    pub fn new(
        store: Arc<dyn DoNotContactStore>,
        confirmer: Arc<dyn SubscriptionConfirmer>,
        metrics: Arc<dyn MetricsService>,
        security: SecurityValidator,
        translator: Translator,
    ) -> Self {
        Self {
            store,
            confirmer,
            metrics,
            security,
            translator,
        }
    }

    pub fn store(&self) -> &Arc<dyn DoNotContactStore> {
        &self.store
    }

    pub fn translator(&self) -> &Translator {
        &self.translator
    }

    /// Localized message for a successful callback
    pub fn outcome_message(&self, outcome: &ProcessOutcome) -> String {
        self.translator
            .translate_with(outcome.message_key(), &[("type", outcome.kind.as_str())])
    }

    /// Localized message for a failed callback
    pub fn error_message(&self, err: &MailguardError) -> String {
        self.translator.translate(err.message_key())
    }

    /// Processes a raw request body
    pub async fn process_body(&self, body: &[u8]) -> Result<ProcessOutcome, MailguardError> {
        let payload: Value = serde_json::from_slice(body).map_err(|e| {
            warn!(error = %e, "Received callback with malformed JSON");
            MailguardError::InvalidJson(e.to_string())
        })?;

        if !payload.is_object() {
            return Err(MailguardError::InvalidJson(
                "payload is not a JSON object".to_string(),
            ));
        }

        self.process_payload(&payload).await
    }

    /// Processes an already decoded payload
    pub async fn process_payload(&self, payload: &Value) -> Result<ProcessOutcome, MailguardError> {
        self.dispatch(payload, 0).await
    }

    async fn dispatch(
        &self,
        payload: &Value,
        depth: usize,
    ) -> Result<ProcessOutcome, MailguardError> {
        let kind = NotificationKind::from_payload(payload).ok_or(MailguardError::MissingType)?;
        debug!(kind = %kind, depth = depth, "Dispatching callback");

        // With an allowlist set, feedback is only trusted inside a checked envelope
        if depth == 0 && matches!(kind, NotificationKind::Complaint | NotificationKind::Bounce) {
            self.security.validate_topic(None)?;
        }

        let outcome = match kind {
            NotificationKind::SubscriptionConfirmation => {
                self.confirm_subscription(payload).await?
            }
            // The wrapped message reports its own metrics
            NotificationKind::Notification => {
                return self.unwrap_notification(payload, depth).await;
            }
            NotificationKind::Delivery => {
                let mail = payload
                    .get("mail")
                    .and_then(|m| MailInfo::deserialize(m).ok())
                    .unwrap_or_default();
                info!(
                    message_id = mail.message_id.as_deref().unwrap_or("unknown"),
                    "Delivery notification acknowledged"
                );
                ProcessOutcome::handled(NotificationKind::Delivery)
            }
            NotificationKind::Complaint => self.process_complaint(payload).await?,
            NotificationKind::Bounce => self.process_bounce(payload).await?,
            NotificationKind::Unknown(notification_type) => {
                warn!(
                    notification_type = %notification_type,
                    "Received SES webhook of unknown type"
                );
                debug!(payload = %redact_email(&payload.to_string()), "Unknown webhook payload");
                Metrics::unknown_notification(self.metrics.as_ref()).await;
                return Ok(ProcessOutcome::handled(NotificationKind::Unknown(
                    notification_type,
                )));
            }
        };

        Metrics::notification_processed(self.metrics.as_ref(), outcome.kind.as_str()).await;
        Ok(outcome)
    }

    async fn unwrap_notification(
        &self,
        payload: &Value,
        depth: usize,
    ) -> Result<ProcessOutcome, MailguardError> {
        if depth >= MAX_NOTIFICATION_DEPTH {
            return Err(MailguardError::InvalidNotificationMessage(format!(
                "notifications nested more than {} levels",
                MAX_NOTIFICATION_DEPTH
            )));
        }

        let envelope = SnsNotification::deserialize(payload)
            .map_err(|e| MailguardError::InvalidNotificationMessage(e.to_string()))?;
        self.security.validate_topic(envelope.topic_arn.as_deref())?;

        let message = match envelope.message {
            Some(Value::String(raw)) => serde_json::from_str::<Value>(&raw)
                .map_err(|e| MailguardError::InvalidNotificationMessage(e.to_string()))?,
            Some(object @ Value::Object(_)) => object,
            Some(_) => {
                return Err(MailguardError::InvalidNotificationMessage(
                    "Message is neither a string nor an object".to_string(),
                ));
            }
            None => {
                return Err(MailguardError::InvalidNotificationMessage(
                    "Message is missing".to_string(),
                ));
            }
        };

        if !message.is_object() {
            return Err(MailguardError::InvalidNotificationMessage(
                "Message is not a JSON object".to_string(),
            ));
        }

        debug!(
            sns_message_id = envelope.message_id.as_deref().unwrap_or("unknown"),
            "Unwrapped SNS notification"
        );

        self.dispatch_boxed(&message, depth + 1).await
    }

    // Boxed so the envelope recursion has a sized, Send future
    fn dispatch_boxed<'a>(
        &'a self,
        payload: &'a Value,
        depth: usize,
    ) -> Pin<Box<dyn Future<Output = Result<ProcessOutcome, MailguardError>> + Send + 'a>> {
        Box::pin(self.dispatch(payload, depth))
    }

    async fn confirm_subscription(&self, payload: &Value) -> Result<ProcessOutcome, MailguardError> {
        let confirmation = SubscriptionConfirmation::deserialize(payload)?;
        self.security
            .validate_topic(confirmation.topic_arn.as_deref())?;

        let subscribe_url = confirmation.subscribe_url.ok_or_else(|| {
            MailguardError::InvalidPayload("SubscribeURL is missing".to_string())
        })?;
        self.security.validate_subscribe_url(&subscribe_url)?;

        let reason = match self.confirmer.confirm(&subscribe_url).await {
            Ok(response) if response.is_confirmed() => {
                info!(
                    topic_arn = confirmation.topic_arn.as_deref().unwrap_or("unknown"),
                    "Callback to SubscribeURL from Amazon SNS succeeded"
                );
                Metrics::subscription_confirmation(self.metrics.as_ref(), true).await;
                return Ok(ProcessOutcome::handled(
                    NotificationKind::SubscriptionConfirmation,
                ));
            }
            Ok(response) => format!(
                "HTTP code {}, {}",
                response.status,
                truncate_for_log(&response.body, MAX_LOGGED_BODY_BYTES)
            ),
            Err(e) => e.to_string(),
        };

        error!(reason = %reason, "Callback to SubscribeURL from Amazon SNS failed");
        Metrics::subscription_confirmation(self.metrics.as_ref(), false).await;
        Err(MailguardError::Subscription(reason))
    }

    async fn process_complaint(&self, payload: &Value) -> Result<ProcessOutcome, MailguardError> {
        let notification = ComplaintNotification::deserialize(payload)?;
        let complaint = &notification.complaint;

        let comments = self.translator.translate(MessageKey::for_complaint_feedback(
            complaint.complaint_feedback_type.as_deref(),
        ));
        let channel_id = email_id(notification.mail.as_ref());
        let addresses = normalize_recipients(
            complaint
                .complained_recipients
                .iter()
                .map(|r| r.email_address.as_str()),
        )?;

        let mut outcome = ProcessOutcome::handled(NotificationKind::Complaint);
        for address in addresses {
            if self
                .record(
                    &address,
                    DoNotContactReason::Unsubscribed,
                    &comments,
                    channel_id.as_deref(),
                )
                .await?
                .is_written()
            {
                outcome.recorded += 1;
            }
            debug!(address = %redact_email(&address), "Unsubscribed complaining recipient");
            outcome.recipients += 1;
        }

        Ok(outcome)
    }

    async fn process_bounce(&self, payload: &Value) -> Result<ProcessOutcome, MailguardError> {
        let notification = BounceNotification::deserialize(payload)?;
        let bounce = &notification.bounce;

        let mut outcome = ProcessOutcome::handled(NotificationKind::Bounce);
        if bounce.bounce_type != PERMANENT_BOUNCE_TYPE {
            info!(
                bounce_type = %bounce.bounce_type,
                bounce_sub_type = bounce.bounce_sub_type.as_deref().unwrap_or("none"),
                "Ignoring non-permanent bounce"
            );
            return Ok(outcome);
        }

        let channel_id = email_id(notification.mail.as_ref());
        let addresses = normalize_recipients(
            bounce
                .bounced_recipients
                .iter()
                .map(|r| r.email_address.as_str()),
        )?;

        for (address, recipient) in addresses.iter().zip(&bounce.bounced_recipients) {
            let bounce_code = recipient
                .diagnostic_code
                .as_deref()
                .unwrap_or(UNKNOWN_DIAGNOSTIC_CODE);

            if self
                .record(
                    address,
                    DoNotContactReason::Bounced,
                    bounce_code,
                    channel_id.as_deref(),
                )
                .await?
                .is_written()
            {
                outcome.recorded += 1;
            }
            debug!(
                address = %redact_email(address),
                reason = %bounce_code,
                "Marked recipient as bounced"
            );
            outcome.recipients += 1;
        }

        Ok(outcome)
    }

    async fn record(
        &self,
        address: &str,
        reason: DoNotContactReason,
        comments: &str,
        channel_id: Option<&str>,
    ) -> Result<DoNotContactChange, MailguardError> {
        let entry = DoNotContactEntry::new(address, reason, comments)
            .with_channel_id(channel_id.map(str::to_string));

        let change = self.store.add(&entry).await?;
        if change.is_written() {
            Metrics::dnc_recorded(self.metrics.as_ref(), reason).await;
        }
        Ok(change)
    }
}

/// Normalizes every recipient up front so a bad address fails the whole
/// callback before anything is written
fn normalize_recipients<'a>(
    raw: impl Iterator<Item = &'a str>,
) -> Result<Vec<String>, MailguardError> {
    raw.map(|address| {
        let normalized = normalize_address(address);
        if normalized.is_empty() {
            Err(MailguardError::InvalidPayload(
                "Recipient with an empty email address".to_string(),
            ))
        } else {
            Ok(normalized)
        }
    })
    .collect()
}

fn email_id(mail: Option<&MailInfo>) -> Option<String> {
    mail.and_then(|m| m.header(EMAIL_ID_HEADER))
        .map(str::to_string)
}
