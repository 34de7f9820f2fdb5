//! gRPC transport built on tonic.
//!
//! [`GrpcTransport`] wraps a tonic [`Channel`] and provides:
//! - Lazy connection: constructing the transport performs no I/O, an
//!   unreachable service surfaces as [`RpcError::Channel`] on the first call.
//! - A deadline attached to every call as the gRPC timeout.
//! - Unary calls encoded with prost, one method per Trillian RPC.
//!
//! The channel multiplexes calls over HTTP/2 and is cheap to clone, so one
//! transport can be shared by every connection to the same service.

use std::time::Duration;

use tonic::client::Grpc;
use tonic::codegen::http::uri::PathAndQuery;
use tonic::transport::{Channel, Endpoint};
use tracing::debug;
use trellis_types::{
    ConsistencyProof, LeafBatch, QueuedLeaf, SignedLogRoot, Tree, TreeConfig, TreeId,
};

use crate::convert::{self, to_wire_i64};
use crate::error::RpcError;
use crate::proto::{self, paths};
use crate::{AdminRpc, LogRpc};

/// Timeouts applied to the channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrpcOptions {
    /// Upper bound on a single call, sent to the service as the gRPC deadline.
    pub deadline: Duration,
    /// Upper bound on establishing the HTTP/2 connection.
    pub connect_timeout: Duration,
}

impl Default for GrpcOptions {
    fn default() -> Self {
        Self {
            deadline: Duration::from_secs(10),
            connect_timeout: Duration::from_secs(5),
        }
    }
}

/// tonic-backed implementation of [`LogRpc`] and [`AdminRpc`].
#[derive(Debug, Clone)]
pub struct GrpcTransport {
    channel: Channel,
    deadline: Duration,
    target: String,
}

impl GrpcTransport {
    /// Prepare a plaintext channel to `host:port` without connecting.
    ///
    /// Must be called from within a tokio runtime: the channel spawns its
    /// background worker immediately.
    pub fn connect_lazy(host: &str, port: u16, options: GrpcOptions) -> Result<Self, RpcError> {
        let target = format!("http://{host}:{port}");
        let endpoint = Endpoint::from_shared(target.clone())
            .map_err(|e| RpcError::Channel(format!("invalid endpoint {target}: {e}")))?
            .connect_timeout(options.connect_timeout)
            .timeout(options.deadline);

        Ok(Self {
            channel: endpoint.connect_lazy(),
            deadline: options.deadline,
            target,
        })
    }

    /// Wrap an already configured channel.
    pub fn from_channel(channel: Channel, deadline: Duration) -> Self {
        Self {
            channel,
            deadline,
            target: String::from("<channel>"),
        }
    }

    /// The `http://host:port` URI this transport talks to.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Issue one unary call.
    async fn unary<Req, Resp>(&self, path: &'static str, message: Req) -> Result<Resp, RpcError>
    where
        Req: prost::Message + Send + Sync + 'static,
        Resp: prost::Message + Default + Send + Sync + 'static,
    {
        let mut grpc = Grpc::new(self.channel.clone());
        grpc.ready()
            .await
            .map_err(|e| RpcError::Channel(format!("{}: {e}", self.target)))?;

        let mut request = tonic::Request::new(message);
        request.set_timeout(self.deadline);

        let codec = tonic_prost::ProstCodec::<Req, Resp>::default();
        match grpc
            .unary(request, PathAndQuery::from_static(path), codec)
            .await
        {
            Ok(response) => Ok(response.into_inner()),
            Err(status) => {
                debug!(rpc = path, endpoint = %self.target, code = ?status.code(), "rpc failed");
                Err(status.into())
            }
        }
    }
}

#[async_trait::async_trait]
impl LogRpc for GrpcTransport {
    async fn init_log(&self, log_id: TreeId) -> Result<Option<SignedLogRoot>, RpcError> {
        let response: proto::InitLogResponse = self
            .unary(
                paths::INIT_LOG,
                proto::InitLogRequest {
                    log_id: log_id.get(),
                },
            )
            .await?;
        response
            .created
            .map(convert::signed_log_root_from_proto)
            .transpose()
    }

    async fn queue_leaf(
        &self,
        log_id: TreeId,
        leaf_value: Vec<u8>,
    ) -> Result<QueuedLeaf, RpcError> {
        let request = proto::QueueLeafRequest {
            log_id: log_id.get(),
            leaf: Some(proto::LogLeaf {
                leaf_value,
                ..Default::default()
            }),
        };
        let response: proto::QueueLeafResponse = self.unary(paths::QUEUE_LEAF, request).await?;
        convert::queued_leaf_from_proto(response)
    }

    async fn get_leaves_by_index(
        &self,
        log_id: TreeId,
        indexes: &[u64],
    ) -> Result<LeafBatch, RpcError> {
        let leaf_index = indexes
            .iter()
            .map(|&i| to_wire_i64("leaf_index", i))
            .collect::<Result<Vec<_>, _>>()?;
        let request = proto::GetLeavesByIndexRequest {
            log_id: log_id.get(),
            leaf_index,
        };
        let response: proto::GetLeavesByIndexResponse =
            self.unary(paths::GET_LEAVES_BY_INDEX, request).await?;
        convert::leaf_batch_from_proto(response)
    }

    async fn get_consistency_proof(
        &self,
        log_id: TreeId,
        first_tree_size: u64,
        second_tree_size: u64,
    ) -> Result<ConsistencyProof, RpcError> {
        let request = proto::GetConsistencyProofRequest {
            log_id: log_id.get(),
            first_tree_size: to_wire_i64("first_tree_size", first_tree_size)?,
            second_tree_size: to_wire_i64("second_tree_size", second_tree_size)?,
        };
        let response: proto::GetConsistencyProofResponse =
            self.unary(paths::GET_CONSISTENCY_PROOF, request).await?;
        convert::consistency_proof_from_proto(response)
    }

    async fn get_latest_signed_log_root(
        &self,
        log_id: TreeId,
    ) -> Result<SignedLogRoot, RpcError> {
        let request = proto::GetLatestSignedLogRootRequest {
            log_id: log_id.get(),
        };
        let response: proto::GetLatestSignedLogRootResponse =
            self.unary(paths::GET_LATEST_SIGNED_LOG_ROOT, request).await?;
        convert::required_root(response.signed_log_root, "GetLatestSignedLogRoot")
    }
}

#[async_trait::async_trait]
impl AdminRpc for GrpcTransport {
    async fn list_trees(&self) -> Result<Vec<Tree>, RpcError> {
        let response: proto::ListTreesResponse = self
            .unary(paths::LIST_TREES, proto::ListTreesRequest::default())
            .await?;
        Ok(response
            .tree
            .into_iter()
            .map(convert::tree_from_proto)
            .collect())
    }

    async fn get_tree(&self, tree_id: TreeId) -> Result<Tree, RpcError> {
        let tree: proto::Tree = self
            .unary(
                paths::GET_TREE,
                proto::GetTreeRequest {
                    tree_id: tree_id.get(),
                },
            )
            .await?;
        Ok(convert::tree_from_proto(tree))
    }

    async fn create_tree(&self, config: &TreeConfig) -> Result<Tree, RpcError> {
        let request = convert::create_tree_request(config)?;
        let tree: proto::Tree = self.unary(paths::CREATE_TREE, request).await?;
        Ok(convert::tree_from_proto(tree))
    }

    async fn delete_tree(&self, tree_id: TreeId) -> Result<(), RpcError> {
        let _deleted: proto::Tree = self
            .unary(
                paths::DELETE_TREE,
                proto::DeleteTreeRequest {
                    tree_id: tree_id.get(),
                },
            )
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RpcCode;

    #[tokio::test]
    async fn test_connect_lazy_does_not_dial() {
        let transport = GrpcTransport::connect_lazy("127.0.0.1", 8090, GrpcOptions::default())
            .expect("valid endpoint");
        assert_eq!(transport.target(), "http://127.0.0.1:8090");
    }

    #[tokio::test]
    async fn test_invalid_host_is_rejected() {
        let err = GrpcTransport::connect_lazy("bad host", 1, GrpcOptions::default()).unwrap_err();
        assert!(matches!(err, RpcError::Channel(_)));
    }

    #[tokio::test]
    #[ntest::timeout(10000)]
    async fn test_silent_service_times_out_as_transient() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        // Accept connections and never answer.
        let silent = tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let options = GrpcOptions {
            deadline: Duration::from_millis(300),
            connect_timeout: Duration::from_secs(1),
        };
        let transport = GrpcTransport::connect_lazy("127.0.0.1", port, options).unwrap();
        let err = transport
            .get_latest_signed_log_root(TreeId::new(1))
            .await
            .unwrap_err();

        assert_eq!(err.code(), Some(RpcCode::DeadlineExceeded), "{err}");
        assert!(err.is_transient());
        silent.abort();
    }
}
