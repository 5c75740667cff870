use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("DynamoDB Query error: {0}")]
    Query(String),

    #[error("DynamoDB PutItem error: {0}")]
    PutItem(String),

    #[error("turn already exists for user {user_id} at {timestamp}")]
    Conflict { user_id: String, timestamp: i64 },

    #[error("malformed item: {0}")]
    MalformedItem(String),
}
