//! palaver-storage
//!
//! Conversation persistence. Turns live in a DynamoDB table keyed by
//! `userId` (partition) and `timestamp` (sort), expired by the table's TTL.

pub mod client;
pub mod error;
pub mod memory;
pub mod turns;
