/// SNS envelopes and SES feedback payloads
use crate::constants::TYPE_FIELDS;
use serde::Deserialize;
use serde_json::Value;
use std::fmt;

/// Value of the payload discriminator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationKind {
    SubscriptionConfirmation,
    Notification,
    Delivery,
    Complaint,
    Bounce,
    Unknown(String),
}

impl NotificationKind {
    /// Reads the first string discriminator among `Type`, `eventType` and
    /// `notificationType`
    pub fn from_payload(payload: &Value) -> Option<Self> {
        TYPE_FIELDS
            .iter()
            .find_map(|field| payload.get(*field).and_then(Value::as_str))
            .map(Self::parse)
    }

    pub fn parse(value: &str) -> Self {
        match value {
            "SubscriptionConfirmation" => Self::SubscriptionConfirmation,
            "Notification" => Self::Notification,
            "Delivery" => Self::Delivery,
            "Complaint" => Self::Complaint,
            "Bounce" => Self::Bounce,
            other => Self::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::SubscriptionConfirmation => "SubscriptionConfirmation",
            Self::Notification => "Notification",
            Self::Delivery => "Delivery",
            Self::Complaint => "Complaint",
            Self::Bounce => "Bounce",
            Self::Unknown(value) => value,
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// SNS subscription handshake
#[derive(Debug, Clone, Deserialize)]
pub struct SubscriptionConfirmation {
    #[serde(rename = "SubscribeURL")]
    pub subscribe_url: Option<String>,
    #[serde(rename = "TopicArn")]
    pub topic_arn: Option<String>,
    #[serde(rename = "Token")]
    pub token: Option<String>,
    #[serde(rename = "MessageId")]
    pub message_id: Option<String>,
}

/// SNS envelope; `Message` holds the SES notification as a JSON string
#[derive(Debug, Clone, Deserialize)]
pub struct SnsNotification {
    #[serde(rename = "Message")]
    pub message: Option<Value>,
    #[serde(rename = "TopicArn")]
    pub topic_arn: Option<String>,
    #[serde(rename = "MessageId")]
    pub message_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ComplaintNotification {
    pub complaint: Complaint,
    pub mail: Option<MailInfo>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Complaint {
    pub complained_recipients: Vec<Recipient>,
    pub complaint_feedback_type: Option<String>,
    pub feedback_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BounceNotification {
    pub bounce: Bounce,
    pub mail: Option<MailInfo>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bounce {
    pub bounce_type: String,
    pub bounce_sub_type: Option<String>,
    pub bounced_recipients: Vec<Recipient>,
    pub feedback_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipient {
    pub email_address: String,
    pub diagnostic_code: Option<String>,
    pub status: Option<String>,
    pub action: Option<String>,
}

/// The `mail` object SES attaches to every feedback notification
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MailInfo {
    pub message_id: Option<String>,
    pub source: Option<String>,
    #[serde(default)]
    pub headers: Vec<MailHeader>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MailHeader {
    pub name: String,
    pub value: String,
}

impl MailInfo {
    /// Header names are matched case-insensitively
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|h| h.name.eq_ignore_ascii_case(name))
            .map(|h| h.value.as_str())
    }
}
