//! The persistence seam and its DynamoDB implementation.

use std::collections::HashMap;
use std::future::Future;

use aws_sdk_dynamodb::types::AttributeValue;

use palaver_core::models::turn::Turn;

use crate::error::StorageError;

/// Default name of the attribute the table's TTL setting watches.
pub const DEFAULT_TTL_ATTRIBUTE: &str = "expiresAt";

/// Row-level access to stored turns.
///
/// Uses native async fn in traits (Rust 2024 edition, no async_trait macro).
pub trait TurnStore: Send + Sync {
    /// Up to `limit` turns for `user_id`, newest first.
    fn query_latest(
        &self,
        user_id: &str,
        limit: u32,
    ) -> impl Future<Output = Result<Vec<Turn>, StorageError>> + Send;

    /// Insert one turn. Fails with [`StorageError::Conflict`] rather than
    /// overwrite an existing turn with the same key.
    fn put_turn(&self, turn: &Turn) -> impl Future<Output = Result<(), StorageError>> + Send;
}

/// [`TurnStore`] backed by a DynamoDB table.
#[derive(Clone, Debug)]
pub struct DynamoTurnStore {
    client: aws_sdk_dynamodb::Client,
    table: String,
    ttl_attribute: String,
}

impl DynamoTurnStore {
    pub fn new(config: &aws_config::SdkConfig, table: impl Into<String>) -> Self {
        Self::from_client(aws_sdk_dynamodb::Client::new(config), table)
    }

    pub fn from_client(client: aws_sdk_dynamodb::Client, table: impl Into<String>) -> Self {
        Self {
            client,
            table: table.into(),
            ttl_attribute: DEFAULT_TTL_ATTRIBUTE.to_string(),
        }
    }

    /// Store the expiry under `attribute` instead of [`DEFAULT_TTL_ATTRIBUTE`].
    pub fn with_ttl_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.ttl_attribute = attribute.into();
        self
    }

    pub fn table(&self) -> &str {
        &self.table
    }
}

impl TurnStore for DynamoTurnStore {
    async fn query_latest(&self, user_id: &str, limit: u32) -> Result<Vec<Turn>, StorageError> {
        let limit = i32::try_from(limit).unwrap_or(i32::MAX);

        let response = self
            .client
            .query()
            .table_name(&self.table)
            .key_condition_expression("#uid = :uid")
            .expression_attribute_names("#uid", "userId")
            .expression_attribute_values(":uid", AttributeValue::S(user_id.to_string()))
            .scan_index_forward(false)
            .limit(limit)
            .send()
            .await
            .map_err(|e| StorageError::Query(e.into_service_error().to_string()))?;

        response
            .items()
            .iter()
            .map(|item| turn_from_item(item, &self.ttl_attribute))
            .collect()
    }

    async fn put_turn(&self, turn: &Turn) -> Result<(), StorageError> {
        // `timestamp` is a DynamoDB reserved word, hence the placeholder.
        self.client
            .put_item()
            .table_name(&self.table)
            .item("userId", AttributeValue::S(turn.user_id.clone()))
            .item("timestamp", AttributeValue::N(turn.timestamp.to_string()))
            .item("userMessage", AttributeValue::S(turn.user_message.clone()))
            .item("botResponse", AttributeValue::S(turn.bot_response.clone()))
            .item(
                self.ttl_attribute.as_str(),
                AttributeValue::N(turn.expires_at.to_string()),
            )
            .condition_expression("attribute_not_exists(#ts)")
            .expression_attribute_names("#ts", "timestamp")
            .send()
            .await
            .map_err(|e| {
                let err = e.into_service_error();
                if err.is_conditional_check_failed_exception() {
                    StorageError::Conflict {
                        user_id: turn.user_id.clone(),
                        timestamp: turn.timestamp,
                    }
                } else {
                    StorageError::PutItem(err.to_string())
                }
            })?;

        Ok(())
    }
}

/// Decode a stored item. A missing expiry attribute decodes as `0`, since
/// the history routes never read it.
pub fn turn_from_item(
    item: &HashMap<String, AttributeValue>,
    ttl_attribute: &str,
) -> Result<Turn, StorageError> {
    Ok(Turn {
        user_id: string_attr(item, "userId")?,
        timestamp: integer_attr(item, "timestamp")?,
        user_message: string_attr(item, "userMessage")?,
        bot_response: string_attr(item, "botResponse")?,
        expires_at: match item.get(ttl_attribute) {
            Some(_) => expiry_attr(item, ttl_attribute)?,
            None => 0,
        },
    })
}

fn string_attr(item: &HashMap<String, AttributeValue>, name: &str) -> Result<String, StorageError> {
    item.get(name)
        .and_then(|v| v.as_s().ok())
        .cloned()
        .ok_or_else(|| StorageError::MalformedItem(format!("missing string attribute `{name}`")))
}

fn raw_number<'a>(
    item: &'a HashMap<String, AttributeValue>,
    name: &str,
) -> Result<&'a str, StorageError> {
    item.get(name)
        .and_then(|v| v.as_n().ok())
        .map(String::as_str)
        .ok_or_else(|| StorageError::MalformedItem(format!("missing number attribute `{name}`")))
}

/// An exact integer. Sort keys must round-trip, so fractions and
/// out-of-range values are rejected.
fn integer_attr(item: &HashMap<String, AttributeValue>, name: &str) -> Result<i64, StorageError> {
    let raw = raw_number(item, name)?;
    raw.parse::<i64>().map_err(|_| {
        StorageError::MalformedItem(format!("attribute `{name}` is not an integer: {raw}"))
    })
}

/// Epoch seconds. Expiry values written by other tools may carry a
/// fractional part, which is dropped.
fn expiry_attr(item: &HashMap<String, AttributeValue>, name: &str) -> Result<i64, StorageError> {
    let raw = raw_number(item, name)?;
    raw.parse::<i64>()
        .or_else(|_| raw.parse::<f64>().map(|n| n as i64))
        .map_err(|_| StorageError::MalformedItem(format!("attribute `{name}` is not a number: {raw}")))
}
