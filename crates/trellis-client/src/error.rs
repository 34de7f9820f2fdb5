//! Error types for client operations.

use trellis_canon::CanonError;
use trellis_rpc::RpcError;
use trellis_types::TreeId;

/// Errors surfaced to callers of the client.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    /// The request was rejected before any RPC was issued.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The service has no tree with this identifier.
    #[error("tree {tree_id} not found")]
    NotFound {
        /// The identifier that was looked up.
        tree_id: TreeId,
    },

    /// The RPC failed, timed out, or returned a response that could not be read.
    #[error("transport failure: {0}")]
    TransportFailure(#[from] RpcError),
}

impl From<CanonError> for ClientError {
    fn from(err: CanonError) -> Self {
        Self::InvalidArgument(err.to_string())
    }
}

impl ClientError {
    /// Translate a service NOT_FOUND for `tree_id` into [`ClientError::NotFound`].
    pub(crate) fn for_tree(tree_id: TreeId, err: RpcError) -> Self {
        if err.is_not_found() {
            Self::NotFound { tree_id }
        } else {
            Self::TransportFailure(err)
        }
    }
}
