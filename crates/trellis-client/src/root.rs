//! Signed log root queries.

use tracing::debug;
use trellis_types::SignedLogRoot;

use crate::connection::LogConnection;
use crate::error::ClientError;

impl LogConnection {
    /// Fetch the latest signed root of the log.
    ///
    /// Every call is a fresh query. Callers that need the size and the root
    /// hash of the same snapshot should read both from one returned value.
    pub async fn get_signed_log_root(&self) -> Result<SignedLogRoot, ClientError> {
        let root = self
            .retry
            .run("GetLatestSignedLogRoot", || {
                self.rpc.get_latest_signed_log_root(self.log_id)
            })
            .await?;
        debug!(log_id = %self.log_id, tree_size = root.tree_size, "fetched signed log root");
        Ok(root)
    }

    /// Number of leaves integrated into the log, from the latest signed root.
    pub async fn get_tree_size(&self) -> Result<u64, ClientError> {
        Ok(self.get_signed_log_root().await?.tree_size)
    }
}
