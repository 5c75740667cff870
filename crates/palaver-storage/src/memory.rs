//! In-process [`TurnStore`] with the same ordering and write-once rules as
//! the DynamoDB table. Expiry is not enforced.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

use palaver_core::models::turn::Turn;

use crate::client::TurnStore;
use crate::error::StorageError;

#[derive(Debug, Default)]
pub struct MemoryTurnStore {
    partitions: Mutex<HashMap<String, BTreeMap<i64, Turn>>>,
}

impl MemoryTurnStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every stored turn for `user_id`, oldest first.
    pub fn turns_for(&self, user_id: &str) -> Vec<Turn> {
        self.lock()
            .get(user_id)
            .map(|p| p.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Total number of stored turns across all users.
    pub fn len(&self) -> usize {
        self.lock().values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, BTreeMap<i64, Turn>>> {
        self.partitions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl TurnStore for MemoryTurnStore {
    async fn query_latest(&self, user_id: &str, limit: u32) -> Result<Vec<Turn>, StorageError> {
        Ok(self
            .lock()
            .get(user_id)
            .map(|p| p.values().rev().take(limit as usize).cloned().collect())
            .unwrap_or_default())
    }

    async fn put_turn(&self, turn: &Turn) -> Result<(), StorageError> {
        let mut partitions = self.lock();
        let partition = partitions.entry(turn.user_id.clone()).or_default();

        if partition.contains_key(&turn.timestamp) {
            return Err(StorageError::Conflict {
                user_id: turn.user_id.clone(),
                timestamp: turn.timestamp,
            });
        }

        partition.insert(turn.timestamp, turn.clone());
        Ok(())
    }
}
