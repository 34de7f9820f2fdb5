//! Log administration.

use std::time::Duration;

use trellis_types::{
    EcdsaCurve, HashAlgorithm, HashStrategy, KeySpec, SignatureAlgorithm, TreeId, TreeState,
    TreeType,
};

use super::helpers::{FakeLogService, admin, tree};
use crate::ClientError;

#[tokio::test]
#[ntest::timeout(10000)]
async fn test_logs_leave_out_other_tree_types() {
    let fake = FakeLogService::with_tree_size(0);
    fake.add_tree(tree(1, TreeType::Log, "audit"));
    fake.add_tree(tree(2, TreeType::Map, "index"));
    fake.add_tree(tree(3, TreeType::PreorderedLog, "mirror"));
    fake.add_tree(tree(4, TreeType::Unknown, "legacy"));

    let logs = admin(&fake).logs().await.unwrap();

    let ids: Vec<i64> = logs.iter().map(|t| t.tree_id.get()).collect();
    assert_eq!(ids, vec![1, 3]);
}

#[tokio::test]
#[ntest::timeout(10000)]
async fn test_create_log_uses_standard_configuration() {
    let fake = FakeLogService::with_tree_size(0);
    let client = admin(&fake);

    let created = client.create_log("audit", "audit events").await.unwrap();

    assert_eq!(created.display_name, "audit");
    assert_eq!(created.description, "audit events");

    let configs = fake.created_configs();
    assert_eq!(configs.len(), 1);
    let config = &configs[0];
    assert_eq!(config.state, TreeState::Active);
    assert_eq!(config.tree_type, TreeType::Log);
    assert_eq!(config.hash_strategy, HashStrategy::Rfc6962Sha256);
    assert_eq!(config.hash_algorithm, HashAlgorithm::Sha256);
    assert_eq!(config.signature_algorithm, SignatureAlgorithm::Ecdsa);
    assert_eq!(
        config.key_spec,
        KeySpec::Ecdsa {
            curve: EcdsaCurve::Default
        }
    );
    assert_eq!(config.max_root_duration, Duration::from_secs(600));

    let fetched = client.get_log(created.tree_id).await.unwrap();
    assert_eq!(fetched, created);
}

#[tokio::test]
#[ntest::timeout(10000)]
async fn test_delete_unknown_log_is_not_found() {
    let fake = FakeLogService::with_tree_size(0);

    let err = admin(&fake).delete_log(TreeId::new(424242)).await.unwrap_err();

    assert_eq!(
        err,
        ClientError::NotFound {
            tree_id: TreeId::new(424242)
        }
    );
    assert_eq!(fake.calls("DeleteTree"), 1);
}

#[tokio::test]
#[ntest::timeout(10000)]
async fn test_delete_then_get_is_not_found() {
    let fake = FakeLogService::with_tree_size(0);
    fake.add_tree(tree(7, TreeType::Log, "audit"));
    let client = admin(&fake);

    client.delete_log(TreeId::new(7)).await.unwrap();
    let err = client.get_log(TreeId::new(7)).await.unwrap_err();

    assert_eq!(err, ClientError::NotFound { tree_id: TreeId::new(7) });
    assert_eq!(fake.calls("GetTree"), 1);
}

#[tokio::test]
#[ntest::timeout(10000)]
async fn test_public_key_projection() {
    let fake = FakeLogService::with_tree_size(0);
    fake.add_tree(tree(9, TreeType::Log, "audit"));

    let key = admin(&fake).get_public_key(TreeId::new(9)).await.unwrap();

    assert_eq!(key.hash_algorithm, HashAlgorithm::Sha256);
    assert_eq!(key.signature_algorithm, SignatureAlgorithm::Ecdsa);
    assert_eq!(key.der, vec![0x30, 0x59, 0x30, 0x13]);
}
