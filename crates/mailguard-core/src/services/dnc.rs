use crate::error::MailguardError;
use crate::models::{DoNotContactEntry, DoNotContactReason};
use crate::utils::logging::redact_email;
use async_trait::async_trait;
use aws_sdk_dynamodb::operation::put_item::PutItemError;
use aws_sdk_dynamodb::types::{AttributeValue, ReturnValue};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tracing::{debug, info};

/// What `add` did to the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoNotContactChange {
    Created,
    /// The existing entry had another reason and was overwritten
    Updated,
    /// The existing entry already had this reason
    Unchanged,
}

impl DoNotContactChange {
    pub fn is_written(&self) -> bool {
        !matches!(self, DoNotContactChange::Unchanged)
    }
}

#[async_trait]
pub trait DoNotContactStore: Send + Sync {
    /// Record a suppression entry
    ///
    /// There is at most one entry per address and channel. An existing entry
    /// is replaced only when the reason differs.
    async fn add(&self, entry: &DoNotContactEntry) -> Result<DoNotContactChange, MailguardError>;

    /// Look up the entry for a normalized address
    async fn find(
        &self,
        address: &str,
        channel: &str,
    ) -> Result<Option<DoNotContactEntry>, MailguardError>;

    /// Check that the backing store is reachable
    async fn health_check(&self) -> Result<(), MailguardError>;
}

/// DynamoDB-backed do-not-contact store
///
/// Partition key `address`, sort key `channel`.
pub struct DynamoDbDoNotContactStore {
    client: aws_sdk_dynamodb::Client,
    table_name: String,
}

impl DynamoDbDoNotContactStore {
    pub fn new(client: aws_sdk_dynamodb::Client, table_name: String) -> Self {
        Self { client, table_name }
    }
}

#[async_trait]
impl DoNotContactStore for DynamoDbDoNotContactStore {
    async fn add(
        &self,
        entry: &DoNotContactEntry,
    ) -> Result<DoNotContactChange, MailguardError> {
        let mut request = self
            .client
            .put_item()
            .table_name(&self.table_name)
            .item("address", AttributeValue::S(entry.address.clone()))
            .item("channel", AttributeValue::S(entry.channel.clone()))
            .item("reason", AttributeValue::N(entry.reason.code().to_string()))
            .item("comments", AttributeValue::S(entry.comments.clone()))
            .item("dateAdded", AttributeValue::S(entry.date_added.to_rfc3339()))
            .condition_expression("attribute_not_exists(address) OR #reason <> :reason")
            .expression_attribute_names("#reason", "reason")
            .expression_attribute_values(
                ":reason",
                AttributeValue::N(entry.reason.code().to_string()),
            )
            .return_values(ReturnValue::AllOld);

        if let Some(channel_id) = &entry.channel_id {
            request = request.item("channelId", AttributeValue::S(channel_id.clone()));
        }

        match request.send().await {
            Ok(output) => {
                let change = if output.attributes().is_some_and(|old| !old.is_empty()) {
                    DoNotContactChange::Updated
                } else {
                    DoNotContactChange::Created
                };
                info!(
                    address = %redact_email(&entry.address),
                    reason = %entry.reason,
                    change = ?change,
                    "Recorded do-not-contact entry"
                );
                Ok(change)
            }
            Err(err) => {
                if let Some(PutItemError::ConditionalCheckFailedException(_)) =
                    err.as_service_error()
                {
                    debug!(
                        address = %redact_email(&entry.address),
                        reason = %entry.reason,
                        "Address already suppressed for this reason"
                    );
                    return Ok(DoNotContactChange::Unchanged);
                }
                Err(MailguardError::Storage(format!(
                    "DynamoDB put_item failed: {}",
                    err
                )))
            }
        }
    }

    async fn find(
        &self,
        address: &str,
        channel: &str,
    ) -> Result<Option<DoNotContactEntry>, MailguardError> {
        let result = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key("address", AttributeValue::S(address.to_string()))
            .key("channel", AttributeValue::S(channel.to_string()))
            .send()
            .await
            .map_err(|e| MailguardError::Storage(format!("DynamoDB get_item failed: {}", e)))?;

        result.item().map(entry_from_item).transpose()
    }

    async fn health_check(&self) -> Result<(), MailguardError> {
        self.client
            .describe_table()
            .table_name(&self.table_name)
            .send()
            .await
            .map_err(|e| {
                MailguardError::Storage(format!("DynamoDB describe_table failed: {}", e))
            })?;
        Ok(())
    }
}

fn entry_from_item(
    item: &HashMap<String, AttributeValue>,
) -> Result<DoNotContactEntry, MailguardError> {
    let string_attr = |name: &str| -> Result<String, MailguardError> {
        item.get(name)
            .and_then(|v| v.as_s().ok())
            .cloned()
            .ok_or_else(|| MailguardError::Storage(format!("Item is missing attribute {}", name)))
    };

    let reason = item
        .get("reason")
        .and_then(|v| v.as_n().ok())
        .and_then(|n| n.parse::<u8>().ok())
        .and_then(DoNotContactReason::from_code)
        .ok_or_else(|| MailguardError::Storage("Item has an invalid reason".to_string()))?;

    let date_added = DateTime::parse_from_rfc3339(&string_attr("dateAdded")?)
        .map_err(|e| MailguardError::Storage(format!("Item has an invalid dateAdded: {}", e)))?
        .with_timezone(&Utc);

    Ok(DoNotContactEntry {
        address: string_attr("address")?,
        channel: string_attr("channel")?,
        channel_id: item
            .get("channelId")
            .and_then(|v| v.as_s().ok())
            .cloned(),
        reason,
        comments: string_attr("comments")?,
        date_added,
    })
}

/// In-memory do-not-contact store for testing and local runs
pub struct InMemoryDoNotContactStore {
    entries: tokio::sync::Mutex<HashMap<(String, String), DoNotContactEntry>>,
}

impl InMemoryDoNotContactStore {
    pub fn new() -> Self {
        Self {
            entries: tokio::sync::Mutex::new(HashMap::new()),
        }
    }

    /// All entries, ordered by address
    pub async fn entries(&self) -> Vec<DoNotContactEntry> {
        let entries = self.entries.lock().await;
        let mut all: Vec<DoNotContactEntry> = entries.values().cloned().collect();
        all.sort_by(|a, b| a.address.cmp(&b.address));
        all
    }
}

impl Default for InMemoryDoNotContactStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DoNotContactStore for InMemoryDoNotContactStore {
    async fn add(
        &self,
        entry: &DoNotContactEntry,
    ) -> Result<DoNotContactChange, MailguardError> {
        let mut entries = self.entries.lock().await;
        let key = (entry.address.clone(), entry.channel.clone());

        let change = match entries.get(&key) {
            Some(existing) if existing.reason == entry.reason => {
                return Ok(DoNotContactChange::Unchanged);
            }
            Some(_) => DoNotContactChange::Updated,
            None => DoNotContactChange::Created,
        };
        entries.insert(key, entry.clone());
        Ok(change)
    }

    async fn find(
        &self,
        address: &str,
        channel: &str,
    ) -> Result<Option<DoNotContactEntry>, MailguardError> {
        let entries = self.entries.lock().await;
        Ok(entries
            .get(&(address.to_string(), channel.to_string()))
            .cloned())
    }

    async fn health_check(&self) -> Result<(), MailguardError> {
        Ok(())
    }
}
