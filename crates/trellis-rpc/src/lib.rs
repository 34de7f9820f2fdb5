//! RPC layer for the Trillian log service.
//!
//! This crate separates *what* the client asks the service from *how* the
//! request travels:
//!
//! - [`LogRpc`] and [`AdminRpc`] — one async method per RPC, speaking the
//!   domain types of `trellis-types`. Business logic only sees these traits,
//!   so tests can substitute an in-memory fake.
//! - [`GrpcTransport`] — the production implementation over a tonic
//!   [`Channel`](tonic::transport::Channel), with a per-call deadline.
//! - [`proto`] — the protobuf messages on the wire.
//! - [`RpcError`] — transport and status failures, with transient/permanent
//!   classification used by the client's retry policy.

pub mod convert;
mod error;
mod grpc;
pub mod proto;

pub use error::{RpcCode, RpcError};
pub use grpc::{GrpcOptions, GrpcTransport};

use trellis_types::{
    ConsistencyProof, LeafBatch, QueuedLeaf, SignedLogRoot, Tree, TreeConfig, TreeId,
};

/// Per-log data-path RPCs (`trillian.TrillianLog`).
#[async_trait::async_trait]
pub trait LogRpc: Send + Sync {
    /// Initialize storage for a freshly created log. Returns the first root.
    async fn init_log(&self, log_id: TreeId) -> Result<Option<SignedLogRoot>, RpcError>;

    /// Queue a leaf for integration.
    async fn queue_leaf(&self, log_id: TreeId, leaf_value: Vec<u8>)
    -> Result<QueuedLeaf, RpcError>;

    /// Fetch leaves by explicit index, with the root the service attached.
    /// Leaf order is not guaranteed.
    async fn get_leaves_by_index(
        &self,
        log_id: TreeId,
        indexes: &[u64],
    ) -> Result<LeafBatch, RpcError>;

    /// Fetch a proof that the tree at `first` is a prefix of the tree at `second`.
    async fn get_consistency_proof(
        &self,
        log_id: TreeId,
        first_tree_size: u64,
        second_tree_size: u64,
    ) -> Result<ConsistencyProof, RpcError>;

    /// Fetch the latest signed root.
    async fn get_latest_signed_log_root(&self, log_id: TreeId)
    -> Result<SignedLogRoot, RpcError>;
}

/// Tree lifecycle RPCs (`trillian.TrillianAdmin`).
#[async_trait::async_trait]
pub trait AdminRpc: Send + Sync {
    /// List every tree the service knows, of any type.
    async fn list_trees(&self) -> Result<Vec<Tree>, RpcError>;

    /// Fetch one tree.
    async fn get_tree(&self, tree_id: TreeId) -> Result<Tree, RpcError>;

    /// Create a tree. The service assigns the id and generates the key.
    async fn create_tree(&self, config: &TreeConfig) -> Result<Tree, RpcError>;

    /// Delete a tree.
    async fn delete_tree(&self, tree_id: TreeId) -> Result<(), RpcError>;
}
