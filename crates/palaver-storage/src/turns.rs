//! Conversation reads and writes on top of a [`TurnStore`].

use tracing::{debug, info};

use palaver_core::limits::DEFAULT_HISTORY_LIMIT;
use palaver_core::models::turn::{HistoryEntry, Turn};

use crate::client::TurnStore;
use crate::error::StorageError;

/// The `limit` most recent turns for `user_id`, oldest first.
///
/// A user with no turns gets an empty list.
pub async fn fetch_recent<S: TurnStore>(
    store: &S,
    user_id: &str,
    limit: u32,
) -> Result<Vec<Turn>, StorageError> {
    let mut turns = store.query_latest(user_id, limit).await?;
    turns.reverse();
    debug!(user_id, limit, found = turns.len(), "fetched recent turns");
    Ok(turns)
}

/// Record one exchange written at `written_at`.
///
/// The bot response is trimmed and the turn expires 30 days after
/// `written_at`. Returns the turn as stored.
pub async fn append<S: TurnStore>(
    store: &S,
    user_id: &str,
    written_at: jiff::Timestamp,
    user_message: &str,
    bot_response: &str,
) -> Result<Turn, StorageError> {
    let turn = Turn::new(user_id, user_message, bot_response, written_at);
    store.put_turn(&turn).await?;
    info!(user_id, timestamp = turn.timestamp, "turn stored");
    Ok(turn)
}

/// The time to write a user's next turn at.
///
/// Usually `now`, but never at or before `latest`, so sort keys stay unique
/// and increasing even when the clock has not moved past the newest turn.
pub fn next_write_time(now: jiff::Timestamp, latest: Option<&Turn>) -> jiff::Timestamp {
    match latest {
        Some(turn) if turn.timestamp >= now.as_millisecond() => {
            jiff::Timestamp::from_millisecond(turn.timestamp + 1).unwrap_or(now)
        }
        _ => now,
    }
}

/// The `limit` most recent history entries for `user_id`, oldest first.
///
/// Without a limit, at most [`DEFAULT_HISTORY_LIMIT`] entries are returned.
pub async fn list_history<S: TurnStore>(
    store: &S,
    user_id: &str,
    limit: Option<u32>,
) -> Result<Vec<HistoryEntry>, StorageError> {
    let limit = limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
    let turns = fetch_recent(store, user_id, limit).await?;
    Ok(turns.into_iter().map(HistoryEntry::from).collect())
}
