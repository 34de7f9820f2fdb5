//! Tree lifecycle administration.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info};
use trellis_rpc::{AdminRpc, GrpcTransport};
use trellis_types::{PublicKeyInfo, Tree, TreeConfig, TreeId};

use crate::connection::ConnectionOptions;
use crate::error::ClientError;
use crate::retry::RetryPolicy;

/// Client for the service's administrative API.
///
/// Read operations are retried on transient failures. `create_log` and
/// `delete_log` are issued once: a repeated create would allocate a second
/// tree, and a repeated delete reports `NotFound` for a tree it removed.
#[derive(Clone)]
pub struct AdminClient {
    rpc: Arc<dyn AdminRpc>,
    retry: RetryPolicy,
}

impl AdminClient {
    /// Prepare a client for the admin API served at `host:port`. Performs no I/O.
    pub fn connect(host: &str, port: u16, options: ConnectionOptions) -> Result<Self, ClientError> {
        let transport = GrpcTransport::connect_lazy(host, port, options.grpc())?;
        debug!(endpoint = transport.target(), "prepared admin client");
        Ok(Self::with_rpc(Arc::new(transport), options.retry))
    }

    /// Build a client over any [`AdminRpc`] implementation.
    pub fn with_rpc(rpc: Arc<dyn AdminRpc>, retry: RetryPolicy) -> Self {
        Self { rpc, retry }
    }

    /// List the logs known to the service.
    ///
    /// Trees of other types (maps, unknown) are left out.
    pub async fn logs(&self) -> Result<Vec<Tree>, ClientError> {
        let trees = self.retry.run("ListTrees", || self.rpc.list_trees()).await?;
        let total = trees.len();
        let logs: Vec<Tree> = trees
            .into_iter()
            .filter(|tree| tree.tree_type.is_log())
            .collect();
        debug!(total, logs = logs.len(), "listed trees");
        Ok(logs)
    }

    /// Create a new log with the standard configuration
    /// (see [`TreeConfig::standard_log`]).
    ///
    /// The new log must be initialized with
    /// [`LogConnection::init_log`](crate::LogConnection::init_log) before use.
    pub async fn create_log(
        &self,
        display_name: &str,
        description: &str,
    ) -> Result<Tree, ClientError> {
        let config = TreeConfig::standard_log(display_name, description);
        let tree = self.rpc.create_tree(&config).await?;
        info!(tree_id = %tree.tree_id, display_name, "created log");
        Ok(tree)
    }

    /// Delete a log.
    pub async fn delete_log(&self, tree_id: TreeId) -> Result<(), ClientError> {
        self.rpc
            .delete_tree(tree_id)
            .await
            .map_err(|err| ClientError::for_tree(tree_id, err))?;
        info!(%tree_id, "deleted log");
        Ok(())
    }

    /// Fetch one log's metadata.
    pub async fn get_log(&self, tree_id: TreeId) -> Result<Tree, ClientError> {
        self.retry
            .run("GetTree", || self.rpc.get_tree(tree_id))
            .await
            .map_err(|err| ClientError::for_tree(tree_id, err))
    }

    /// Fetch the public key attributes of a log.
    pub async fn get_public_key(&self, tree_id: TreeId) -> Result<PublicKeyInfo, ClientError> {
        Ok(self.get_log(tree_id).await?.public_key())
    }
}

impl fmt::Debug for AdminClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminClient")
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}
