//! Consistency proofs between two tree sizes.

use tracing::debug;
use trellis_types::ConsistencyProof;

use crate::connection::LogConnection;
use crate::error::ClientError;

impl LogConnection {
    /// Fetch a proof that the tree at `first_tree_size` is a prefix of the
    /// tree at `second_tree_size`.
    ///
    /// The signed root returned with the proof is authoritative for the later
    /// state. A response without a root is a transport failure; a response
    /// without a proof yields an empty hash list.
    pub async fn get_consistency_proof(
        &self,
        first_tree_size: u64,
        second_tree_size: u64,
    ) -> Result<ConsistencyProof, ClientError> {
        if first_tree_size == 0 {
            return Err(ClientError::InvalidArgument(
                "first_tree_size must be greater than 0".into(),
            ));
        }
        if first_tree_size > second_tree_size {
            return Err(ClientError::InvalidArgument(format!(
                "first_tree_size ({first_tree_size}) must not exceed second_tree_size ({second_tree_size})"
            )));
        }

        debug!(
            log_id = %self.log_id,
            first_tree_size,
            second_tree_size,
            "requesting consistency proof"
        );
        let proof = self
            .retry
            .run("GetConsistencyProof", || {
                self.rpc
                    .get_consistency_proof(self.log_id, first_tree_size, second_tree_size)
            })
            .await?;
        Ok(proof)
    }
}
