//! Handle on one log of a remote log service.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};
use trellis_canon::{CanonicalEncoder, Record};
use trellis_rpc::{GrpcOptions, GrpcTransport, LogRpc};
use trellis_types::{QueuedLeaf, SignedLogRoot, TreeId};

use crate::error::ClientError;
use crate::retry::RetryPolicy;

/// Timeouts and retry behavior shared by log and admin clients.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConnectionOptions {
    /// Upper bound on each RPC.
    pub deadline: Duration,
    /// Upper bound on establishing the channel.
    pub connect_timeout: Duration,
    /// Retry applied to transient failures.
    pub retry: RetryPolicy,
}

impl Default for ConnectionOptions {
    fn default() -> Self {
        let grpc = GrpcOptions::default();
        Self {
            deadline: grpc.deadline,
            connect_timeout: grpc.connect_timeout,
            retry: RetryPolicy::default(),
        }
    }
}

impl ConnectionOptions {
    pub(crate) fn grpc(&self) -> GrpcOptions {
        GrpcOptions {
            deadline: self.deadline,
            connect_timeout: self.connect_timeout,
        }
    }
}

/// Addressable handle on one log.
///
/// Cheap to clone; clones share the underlying channel and can be used from
/// any number of tasks. Nothing is cached: every accessor issues a live query.
#[derive(Clone)]
pub struct LogConnection {
    pub(crate) log_id: TreeId,
    pub(crate) rpc: Arc<dyn LogRpc>,
    pub(crate) retry: RetryPolicy,
}

impl LogConnection {
    /// Prepare a connection to log `log_id` served at `host:port`.
    ///
    /// No I/O happens here. An unreachable service is reported as
    /// [`ClientError::TransportFailure`] by the first call.
    pub fn connect(
        host: &str,
        port: u16,
        log_id: TreeId,
        options: ConnectionOptions,
    ) -> Result<Self, ClientError> {
        let transport = GrpcTransport::connect_lazy(host, port, options.grpc())?;
        debug!(endpoint = transport.target(), %log_id, "prepared log connection");
        Ok(Self::with_rpc(log_id, Arc::new(transport), options.retry))
    }

    /// Build a connection over any [`LogRpc`] implementation.
    pub fn with_rpc(log_id: TreeId, rpc: Arc<dyn LogRpc>, retry: RetryPolicy) -> Self {
        Self { log_id, rpc, retry }
    }

    /// The log this connection addresses.
    pub fn log_id(&self) -> TreeId {
        self.log_id
    }

    /// Initialize storage for a freshly created log.
    ///
    /// Must be called once after [`AdminClient::create_log`](crate::AdminClient::create_log)
    /// before leaves can be queued. Not retried: a repeated call on an
    /// initialized log is rejected by the service.
    pub async fn init_log(&self) -> Result<Option<SignedLogRoot>, ClientError> {
        let root = self.rpc.init_log(self.log_id).await?;
        info!(log_id = %self.log_id, "initialized log");
        Ok(root)
    }

    /// Queue raw bytes for inclusion in the log.
    ///
    /// The service deduplicates by leaf identity, so a queued leaf that is
    /// retried after a lost response comes back with `already_exists` set.
    pub async fn queue_leaf(&self, leaf_value: Vec<u8>) -> Result<QueuedLeaf, ClientError> {
        if leaf_value.is_empty() {
            return Err(ClientError::InvalidArgument(
                "leaf value must not be empty".into(),
            ));
        }
        debug!(log_id = %self.log_id, bytes = leaf_value.len(), "queueing leaf");
        let queued = self
            .retry
            .run("QueueLeaf", || {
                self.rpc.queue_leaf(self.log_id, leaf_value.clone())
            })
            .await?;
        if queued.already_exists {
            debug!(log_id = %self.log_id, "leaf already present");
        }
        Ok(queued)
    }

    /// Canonicalize `record` with `encoder` and queue the resulting bytes.
    pub async fn queue_record(
        &self,
        record: &Record,
        encoder: &CanonicalEncoder,
    ) -> Result<QueuedLeaf, ClientError> {
        self.queue_leaf(encoder.normalize(record)).await
    }
}

impl fmt::Debug for LogConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogConnection")
            .field("log_id", &self.log_id)
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use trellis_rpc::RpcError;

    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_handles_are_shareable() {
        assert_send_sync::<LogConnection>();
        assert_send_sync::<crate::AdminClient>();
    }

    #[tokio::test]
    async fn test_connect_performs_no_io() {
        let conn = LogConnection::connect("127.0.0.1", 1, TreeId::new(7), ConnectionOptions::default())
            .unwrap();
        assert_eq!(conn.log_id(), TreeId::new(7));
    }

    #[tokio::test]
    async fn test_invalid_host_is_transport_failure() {
        let err = LogConnection::connect("bad host", 1, TreeId::new(7), ConnectionOptions::default())
            .unwrap_err();
        assert!(matches!(err, ClientError::TransportFailure(RpcError::Channel(_))));
    }
}
