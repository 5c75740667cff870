use serde::{Deserialize, Serialize};

use crate::limits::TURN_TTL_SECONDS;

/// One recorded exchange between a user and the model.
///
/// Written once after a successful reply and never updated. The table's TTL
/// setting removes it once `expires_at` has passed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Turn {
    /// Partition key: the caller's `sub` claim.
    pub user_id: String,
    /// Sort key: milliseconds since the Unix epoch at write time.
    pub timestamp: i64,
    pub user_message: String,
    pub bot_response: String,
    /// Seconds since the Unix epoch after which the row may be deleted.
    pub expires_at: i64,
}

impl Turn {
    /// Build the turn recorded at `written_at`.
    ///
    /// The bot response is trimmed and the expiry is fixed at
    /// [`TURN_TTL_SECONDS`] after the write.
    pub fn new(
        user_id: impl Into<String>,
        user_message: impl Into<String>,
        bot_response: &str,
        written_at: jiff::Timestamp,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            timestamp: written_at.as_millisecond(),
            user_message: user_message.into(),
            bot_response: bot_response.trim().to_string(),
            expires_at: written_at.as_second() + TURN_TTL_SECONDS,
        }
    }
}

/// The subset of a [`Turn`] exposed by the history route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub timestamp: i64,
    pub user_message: String,
    pub bot_response: String,
}

impl From<Turn> for HistoryEntry {
    fn from(turn: Turn) -> Self {
        Self {
            timestamp: turn.timestamp,
            user_message: turn.user_message,
            bot_response: turn.bot_response,
        }
    }
}
