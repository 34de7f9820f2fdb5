//! In-memory log service used by the client tests.

use std::collections::{BTreeMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use trellis_rpc::{AdminRpc, LogRpc, RpcCode, RpcError};
use trellis_types::{
    ConsistencyProof, HashAlgorithm, HashStrategy, LeafBatch, LogLeaf, QueuedLeaf,
    SignatureAlgorithm, SignedLogRoot, Tree, TreeConfig, TreeId, TreeState, TreeType,
};

use crate::{AdminClient, LogConnection, RetryPolicy};

pub const LOG_ID: i64 = 6962;

/// Retry policy with millisecond backoffs so retry tests stay fast.
pub fn fast_retry() -> RetryPolicy {
    RetryPolicy {
        max_attempts: 3,
        initial_backoff: Duration::from_millis(1),
        max_backoff: Duration::from_millis(5),
        multiplier: 2.0,
    }
}

pub fn connection(fake: &Arc<FakeLogService>) -> LogConnection {
    LogConnection::with_rpc(TreeId::new(LOG_ID), fake.clone(), fast_retry())
}

pub fn admin(fake: &Arc<FakeLogService>) -> AdminClient {
    AdminClient::with_rpc(fake.clone(), fast_retry())
}

/// The leaf the fake serves at `index`.
pub fn leaf(index: u64) -> LogLeaf {
    LogLeaf {
        leaf_index: index,
        leaf_value: format!("leaf-{index}").into_bytes(),
        merkle_leaf_hash: index.to_be_bytes().to_vec(),
        leaf_identity_hash: None,
        extra_data: Vec::new(),
        queue_timestamp: None,
        integrate_timestamp: None,
    }
}

pub fn root(tree_size: u64) -> SignedLogRoot {
    SignedLogRoot {
        timestamp_nanos: 1_700_000_000_000_000_000,
        root_hash: vec![0xab; 32],
        tree_size,
        tree_revision: tree_size as i64,
        key_hint: Vec::new(),
        log_root: Vec::new(),
        log_root_signature: Vec::new(),
    }
}

pub fn tree(id: i64, tree_type: TreeType, name: &str) -> Tree {
    Tree {
        tree_id: TreeId::new(id),
        state: TreeState::Active,
        tree_type,
        hash_strategy: HashStrategy::Rfc6962Sha256,
        hash_algorithm: HashAlgorithm::Sha256,
        signature_algorithm: SignatureAlgorithm::Ecdsa,
        display_name: name.to_string(),
        description: String::new(),
        public_key_der: vec![0x30, 0x59, 0x30, 0x13],
        max_root_duration: None,
        created_at: None,
        updated_at: None,
        deleted: false,
    }
}

#[derive(Default)]
struct FakeState {
    tree_size: u64,
    reverse_responses: bool,
    omit_proof_hashes: bool,
    failures: VecDeque<RpcError>,
    calls: BTreeMap<&'static str, usize>,
    index_requests: Vec<Vec<u64>>,
    queued: Vec<Vec<u8>>,
    trees: BTreeMap<i64, Tree>,
    next_tree_id: i64,
    created: Vec<TreeConfig>,
}

/// Fake log and admin service.
///
/// Serves [`leaf`] for every index below the configured tree size, records
/// the requests it receives and fails calls on demand.
pub struct FakeLogService {
    state: Mutex<FakeState>,
}

impl FakeLogService {
    pub fn with_tree_size(tree_size: u64) -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(FakeState {
                tree_size,
                next_tree_id: 1000,
                ..FakeState::default()
            }),
        })
    }

    /// Answer leaf lookups in reverse index order.
    pub fn reverse_responses(&self) {
        self.state.lock().unwrap().reverse_responses = true;
    }

    /// Answer consistency proof requests with no hashes.
    pub fn omit_proof_hashes(&self) {
        self.state.lock().unwrap().omit_proof_hashes = true;
    }

    /// Fail the next call, whichever RPC it is, with `err`.
    pub fn fail_next(&self, err: RpcError) {
        self.state.lock().unwrap().failures.push_back(err);
    }

    pub fn set_tree_size(&self, tree_size: u64) {
        self.state.lock().unwrap().tree_size = tree_size;
    }

    pub fn add_tree(&self, tree: Tree) {
        let mut state = self.state.lock().unwrap();
        state.trees.insert(tree.tree_id.get(), tree);
    }

    /// Number of times `rpc` was invoked, including failed invocations.
    pub fn calls(&self, rpc: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .calls
            .get(rpc)
            .copied()
            .unwrap_or(0)
    }

    pub fn index_requests(&self) -> Vec<Vec<u64>> {
        self.state.lock().unwrap().index_requests.clone()
    }

    pub fn queued(&self) -> Vec<Vec<u8>> {
        self.state.lock().unwrap().queued.clone()
    }

    pub fn created_configs(&self) -> Vec<TreeConfig> {
        self.state.lock().unwrap().created.clone()
    }

    fn begin(&self, rpc: &'static str) -> Result<std::sync::MutexGuard<'_, FakeState>, RpcError> {
        let mut state = self.state.lock().unwrap();
        *state.calls.entry(rpc).or_default() += 1;
        match state.failures.pop_front() {
            Some(err) => Err(err),
            None => Ok(state),
        }
    }
}

#[async_trait::async_trait]
impl LogRpc for FakeLogService {
    async fn init_log(&self, _log_id: TreeId) -> Result<Option<SignedLogRoot>, RpcError> {
        let state = self.begin("InitLog")?;
        Ok(Some(root(state.tree_size)))
    }

    async fn queue_leaf(
        &self,
        _log_id: TreeId,
        leaf_value: Vec<u8>,
    ) -> Result<QueuedLeaf, RpcError> {
        let mut state = self.begin("QueueLeaf")?;
        let already_exists = state.queued.contains(&leaf_value);
        if !already_exists {
            state.queued.push(leaf_value.clone());
        }
        Ok(QueuedLeaf {
            leaf: LogLeaf {
                leaf_value,
                ..leaf(0)
            },
            already_exists,
        })
    }

    async fn get_leaves_by_index(
        &self,
        _log_id: TreeId,
        indexes: &[u64],
    ) -> Result<LeafBatch, RpcError> {
        let mut state = self.begin("GetLeavesByIndex")?;
        state.index_requests.push(indexes.to_vec());
        if let Some(&index) = indexes.iter().find(|&&i| i >= state.tree_size) {
            return Err(RpcError::status(
                RpcCode::OutOfRange,
                format!("leaf index {index} beyond tree size {}", state.tree_size),
            ));
        }
        let mut leaves: Vec<LogLeaf> = indexes.iter().map(|&i| leaf(i)).collect();
        if state.reverse_responses {
            leaves.reverse();
        }
        Ok(LeafBatch {
            leaves,
            signed_log_root: Some(root(state.tree_size)),
        })
    }

    async fn get_consistency_proof(
        &self,
        _log_id: TreeId,
        first_tree_size: u64,
        second_tree_size: u64,
    ) -> Result<ConsistencyProof, RpcError> {
        let state = self.begin("GetConsistencyProof")?;
        if second_tree_size > state.tree_size {
            return Err(RpcError::status(
                RpcCode::InvalidArgument,
                "second_tree_size beyond current tree",
            ));
        }
        let hashes = if state.omit_proof_hashes {
            Vec::new()
        } else {
            vec![
                first_tree_size.to_be_bytes().to_vec(),
                second_tree_size.to_be_bytes().to_vec(),
            ]
        };
        Ok(ConsistencyProof {
            hashes,
            signed_log_root: root(state.tree_size),
        })
    }

    async fn get_latest_signed_log_root(
        &self,
        _log_id: TreeId,
    ) -> Result<SignedLogRoot, RpcError> {
        let state = self.begin("GetLatestSignedLogRoot")?;
        Ok(root(state.tree_size))
    }
}

#[async_trait::async_trait]
impl AdminRpc for FakeLogService {
    async fn list_trees(&self) -> Result<Vec<Tree>, RpcError> {
        let state = self.begin("ListTrees")?;
        Ok(state.trees.values().cloned().collect())
    }

    async fn get_tree(&self, tree_id: TreeId) -> Result<Tree, RpcError> {
        let state = self.begin("GetTree")?;
        state
            .trees
            .get(&tree_id.get())
            .cloned()
            .ok_or_else(|| RpcError::status(RpcCode::NotFound, format!("tree {tree_id} not found")))
    }

    async fn create_tree(&self, config: &TreeConfig) -> Result<Tree, RpcError> {
        let mut state = self.begin("CreateTree")?;
        let id = state.next_tree_id;
        state.next_tree_id += 1;
        state.created.push(config.clone());

        let mut created = tree(id, config.tree_type, &config.display_name);
        created.description = config.description.clone();
        created.max_root_duration = Some(config.max_root_duration);
        state.trees.insert(id, created.clone());
        Ok(created)
    }

    async fn delete_tree(&self, tree_id: TreeId) -> Result<(), RpcError> {
        let mut state = self.begin("DeleteTree")?;
        match state.trees.remove(&tree_id.get()) {
            Some(_) => Ok(()),
            None => Err(RpcError::status(
                RpcCode::NotFound,
                format!("tree {tree_id} not found"),
            )),
        }
    }
}
