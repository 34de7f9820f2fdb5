//! Log initialization and queueing.

use serde_json::json;
use trellis_canon::{CanonicalEncoder, KeyOrder, Record};

use super::helpers::{FakeLogService, connection, root};
use crate::ClientError;

#[tokio::test]
#[ntest::timeout(10000)]
async fn test_init_log_returns_created_root() {
    let fake = FakeLogService::with_tree_size(0);
    let conn = connection(&fake);

    assert_eq!(conn.init_log().await.unwrap(), Some(root(0)));
}

#[tokio::test]
#[ntest::timeout(10000)]
async fn test_queue_record_sends_canonical_bytes() {
    let fake = FakeLogService::with_tree_size(0);
    let conn = connection(&fake);
    let record = Record::from_json(&json!({"b": 1, "a": 2})).unwrap();

    let queued = conn
        .queue_record(&record, &CanonicalEncoder::default())
        .await
        .unwrap();

    assert_eq!(queued.leaf.leaf_value, br#"{"b":"1","a":"2"}"#.to_vec());
    assert!(!queued.already_exists);
    assert_eq!(fake.queued(), vec![br#"{"b":"1","a":"2"}"#.to_vec()]);
}

#[tokio::test]
#[ntest::timeout(10000)]
async fn test_equivalent_records_are_duplicates() {
    let fake = FakeLogService::with_tree_size(0);
    let conn = connection(&fake);
    let encoder = CanonicalEncoder::new(KeyOrder::Ascending);

    let first = Record::from_json(&json!({"id": 7, "kind": "login"})).unwrap();
    let second = Record::from_json(&json!({"kind": "login", "id": "7"})).unwrap();

    assert!(!conn.queue_record(&first, &encoder).await.unwrap().already_exists);
    assert!(conn.queue_record(&second, &encoder).await.unwrap().already_exists);
    assert_eq!(fake.queued().len(), 1);
}

#[tokio::test]
#[ntest::timeout(10000)]
async fn test_empty_leaf_is_rejected() {
    let fake = FakeLogService::with_tree_size(0);
    let conn = connection(&fake);

    let err = conn.queue_leaf(Vec::new()).await.unwrap_err();

    assert!(matches!(err, ClientError::InvalidArgument(_)));
    assert_eq!(fake.calls("QueueLeaf"), 0);
}

#[test]
fn test_empty_record_is_invalid_argument() {
    let err: ClientError = Record::from_json(&json!({})).unwrap_err().into();

    assert!(matches!(err, ClientError::InvalidArgument(_)));
}
