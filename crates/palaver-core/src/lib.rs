//! palaver-core
//!
//! Pure domain types for the chat backend: turns, history entries, and
//! inbound request validation. No AWS SDK dependency.

pub mod error;
pub mod limits;
pub mod models;
