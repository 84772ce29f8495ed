/// Do-not-contact records
use crate::constants::EMAIL_CHANNEL;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DoNotContactReason {
    Unsubscribed,
    Bounced,
}

impl DoNotContactReason {
    /// Numeric code stored alongside the entry
    pub fn code(&self) -> u8 {
        match self {
            Self::Unsubscribed => 1,
            Self::Bounced => 2,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::Unsubscribed),
            2 => Some(Self::Bounced),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unsubscribed => "unsubscribed",
            Self::Bounced => "bounced",
        }
    }
}

impl fmt::Display for DoNotContactReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A suppression record for one address on one channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoNotContactEntry {
    pub address: String,
    pub channel: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<String>,
    pub reason: DoNotContactReason,
    pub comments: String,
    pub date_added: DateTime<Utc>,
}

impl DoNotContactEntry {
    /// Creates an email-channel entry; `address` must already be normalized
    pub fn new(
        address: impl Into<String>,
        reason: DoNotContactReason,
        comments: impl Into<String>,
    ) -> Self {
        Self {
            address: address.into(),
            channel: EMAIL_CHANNEL.to_string(),
            channel_id: None,
            reason,
            comments: comments.into(),
            date_added: Utc::now(),
        }
    }

    pub fn with_channel_id(mut self, channel_id: Option<String>) -> Self {
        self.channel_id = channel_id;
        self
    }
}
