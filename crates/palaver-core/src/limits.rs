//! Fixed sizes and lifetimes shared by the chat and history routes.

use crate::error::CoreError;

/// Seconds a stored turn lives before the table's TTL removes it (30 days).
pub const TURN_TTL_SECONDS: i64 = 2_592_000;

/// Number of previous turns fetched to seed the prompt of a chat request.
pub const CONTEXT_TURNS: u32 = 5;

/// Page size of the history route when the caller gives no `limit`.
pub const DEFAULT_HISTORY_LIMIT: u32 = 50;

/// Parse the history route's `limit` query parameter.
///
/// `None` means the caller gave none and yields [`DEFAULT_HISTORY_LIMIT`].
/// Anything that is not a positive integer is rejected.
pub fn parse_history_limit(raw: Option<&str>) -> Result<u32, CoreError> {
    let Some(raw) = raw else {
        return Ok(DEFAULT_HISTORY_LIMIT);
    };

    match raw.trim().parse::<u32>() {
        Ok(0) => Err(CoreError::InvalidLimit("limit must be at least 1".to_string())),
        Ok(limit) => Ok(limit),
        Err(_) => Err(CoreError::InvalidLimit(format!(
            "expected a positive integer, got {raw:?}"
        ))),
    }
}
