use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;

use palaver_core::models::turn::Turn;
use palaver_storage::client::{DEFAULT_TTL_ATTRIBUTE, TurnStore, turn_from_item};
use palaver_storage::error::StorageError;
use palaver_storage::memory::MemoryTurnStore;
use palaver_storage::turns::{append, fetch_recent, list_history, next_write_time};

fn at(ms: i64) -> jiff::Timestamp {
    jiff::Timestamp::from_millisecond(ms).unwrap()
}

async fn seed(store: &MemoryTurnStore, user_id: &str, count: i64) {
    for i in 1..=count {
        append(store, user_id, at(i * 1_000), &format!("q{i}"), &format!("a{i}"))
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn fetch_recent_returns_latest_in_chronological_order() {
    let store = MemoryTurnStore::new();
    seed(&store, "user-1", 7).await;

    let turns = fetch_recent(&store, "user-1", 5).await.unwrap();

    let stamps: Vec<i64> = turns.iter().map(|t| t.timestamp).collect();
    assert_eq!(stamps, vec![3_000, 4_000, 5_000, 6_000, 7_000]);
    assert_eq!(turns[0].user_message, "q3");
}

#[tokio::test]
async fn fetch_recent_for_unknown_user_is_empty() {
    let store = MemoryTurnStore::new();
    seed(&store, "someone-else", 2).await;

    assert!(fetch_recent(&store, "nobody", 5).await.unwrap().is_empty());
}

#[tokio::test]
async fn fetch_recent_is_scoped_to_the_user() {
    let store = MemoryTurnStore::new();
    seed(&store, "user-1", 3).await;
    seed(&store, "user-2", 3).await;

    let turns = fetch_recent(&store, "user-2", 10).await.unwrap();
    assert_eq!(turns.len(), 3);
    assert!(turns.iter().all(|t| t.user_id == "user-2"));
}

#[tokio::test]
async fn append_then_fetch_returns_trimmed_turn() {
    let store = MemoryTurnStore::new();
    seed(&store, "user-1", 2).await;

    let written = append(&store, "user-1", at(9_000), "hello", "  hi there \n")
        .await
        .unwrap();
    let turns = fetch_recent(&store, "user-1", 1).await.unwrap();

    assert_eq!(turns, vec![written]);
    assert_eq!(turns[0].bot_response, "hi there");
    assert_eq!(turns[0].expires_at, 9 + 2_592_000);
}

#[tokio::test]
async fn append_refuses_to_overwrite_a_turn() {
    let store = MemoryTurnStore::new();
    append(&store, "user-1", at(1_000), "first", "a").await.unwrap();

    let result = append(&store, "user-1", at(1_000), "second", "b").await;

    assert!(matches!(
        result,
        Err(StorageError::Conflict { timestamp: 1_000, .. })
    ));
    assert_eq!(store.turns_for("user-1")[0].user_message, "first");
}

#[tokio::test]
async fn next_write_time_avoids_existing_turn() {
    let store = MemoryTurnStore::new();
    let now = at(5_000);
    let existing = append(&store, "user-1", now, "first", "a").await.unwrap();

    let written_at = next_write_time(now, Some(&existing));
    let second = append(&store, "user-1", written_at, "second", "b")
        .await
        .unwrap();

    assert_eq!(second.timestamp, 5_001);
    assert_eq!(store.turns_for("user-1").len(), 2);
}

#[test]
fn next_write_time_is_now_when_clock_has_moved_on() {
    let latest = Turn::new("user-1", "q", "a", at(1_000));

    assert_eq!(next_write_time(at(2_000), Some(&latest)), at(2_000));
    assert_eq!(next_write_time(at(2_000), None), at(2_000));
    // A turn written ahead of the local clock still pushes the next one past it.
    assert_eq!(next_write_time(at(500), Some(&latest)), at(1_001));
}

#[tokio::test]
async fn list_history_defaults_to_fifty_entries() {
    let store = MemoryTurnStore::new();
    seed(&store, "user-1", 60).await;

    let history = list_history(&store, "user-1", None).await.unwrap();

    assert_eq!(history.len(), 50);
    assert_eq!(history.first().unwrap().timestamp, 11_000);
    assert_eq!(history.last().unwrap().timestamp, 60_000);
}

#[tokio::test]
async fn list_history_honours_explicit_limit() {
    let store = MemoryTurnStore::new();
    seed(&store, "user-1", 4).await;

    let history = list_history(&store, "user-1", Some(2)).await.unwrap();

    let messages: Vec<&str> = history.iter().map(|e| e.user_message.as_str()).collect();
    assert_eq!(messages, vec!["q3", "q4"]);
}

#[tokio::test]
async fn memory_store_query_is_newest_first() {
    let store = MemoryTurnStore::new();
    seed(&store, "user-1", 3).await;

    let raw = store.query_latest("user-1", 2).await.unwrap();
    assert_eq!(raw[0].timestamp, 3_000);
    assert_eq!(raw[1].timestamp, 2_000);
}

fn item(pairs: &[(&str, AttributeValue)]) -> HashMap<String, AttributeValue> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

#[test]
fn decodes_a_stored_item() {
    let stored = item(&[
        ("userId", AttributeValue::S("user-1".to_string())),
        ("timestamp", AttributeValue::N("1700000000123".to_string())),
        ("userMessage", AttributeValue::S("q".to_string())),
        ("botResponse", AttributeValue::S("a".to_string())),
        ("expiresAt", AttributeValue::N("1702592000".to_string())),
    ]);

    let turn = turn_from_item(&stored, DEFAULT_TTL_ATTRIBUTE).unwrap();

    assert_eq!(
        turn,
        Turn {
            user_id: "user-1".to_string(),
            timestamp: 1_700_000_000_123,
            user_message: "q".to_string(),
            bot_response: "a".to_string(),
            expires_at: 1_702_592_000,
        }
    );
}

#[test]
fn decodes_expiry_under_a_custom_attribute() {
    let stored = item(&[
        ("userId", AttributeValue::S("user-1".to_string())),
        ("timestamp", AttributeValue::N("5".to_string())),
        ("userMessage", AttributeValue::S("q".to_string())),
        ("botResponse", AttributeValue::S("a".to_string())),
        ("ttl", AttributeValue::N("99".to_string())),
    ]);

    assert_eq!(turn_from_item(&stored, "ttl").unwrap().expires_at, 99);
    assert_eq!(turn_from_item(&stored, DEFAULT_TTL_ATTRIBUTE).unwrap().expires_at, 0);
}

#[test]
fn rejects_items_missing_required_attributes() {
    let stored = item(&[
        ("userId", AttributeValue::S("user-1".to_string())),
        ("timestamp", AttributeValue::S("not a number".to_string())),
    ]);

    assert!(matches!(
        turn_from_item(&stored, DEFAULT_TTL_ATTRIBUTE),
        Err(StorageError::MalformedItem(_))
    ));
}

#[test]
fn rejects_fractional_or_out_of_range_sort_keys() {
    for raw in ["1700000000123.5", "1e30", "99999999999999999999"] {
        let stored = item(&[
            ("userId", AttributeValue::S("user-1".to_string())),
            ("timestamp", AttributeValue::N(raw.to_string())),
            ("userMessage", AttributeValue::S("q".to_string())),
            ("botResponse", AttributeValue::S("a".to_string())),
        ]);

        assert!(
            matches!(
                turn_from_item(&stored, DEFAULT_TTL_ATTRIBUTE),
                Err(StorageError::MalformedItem(_))
            ),
            "expected timestamp {raw} to be rejected"
        );
    }
}

#[test]
fn fractional_expiry_is_accepted() {
    let stored = item(&[
        ("userId", AttributeValue::S("user-1".to_string())),
        ("timestamp", AttributeValue::N("5".to_string())),
        ("userMessage", AttributeValue::S("q".to_string())),
        ("botResponse", AttributeValue::S("a".to_string())),
        ("expiresAt", AttributeValue::N("1702592000.75".to_string())),
    ]);

    assert_eq!(
        turn_from_item(&stored, DEFAULT_TTL_ATTRIBUTE).unwrap().expires_at,
        1_702_592_000
    );
}
