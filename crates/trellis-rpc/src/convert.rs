//! Proto ↔ domain conversion.
//!
//! Decoding is fallible: negative sizes and missing submessages are reported
//! as [`RpcError::Malformed`].

use std::time::{Duration, SystemTime};

use trellis_types::{
    ConsistencyProof, EcdsaCurve, HashAlgorithm, HashStrategy, KeySpec, LeafBatch, LogLeaf,
    QueuedLeaf,
    SignatureAlgorithm, SignedLogRoot, Tree, TreeConfig, TreeId, TreeState, TreeType,
};

use crate::error::{RpcCode, RpcError};
use crate::proto;

type Result<T> = std::result::Result<T, RpcError>;

// ==================== Scalars ====================

/// Convert an unsigned request value to the service's signed wire type.
pub fn to_wire_i64(field: &'static str, value: u64) -> Result<i64> {
    i64::try_from(value).map_err(|_| RpcError::OutOfRange { field, value })
}

fn from_wire_u64(field: &str, value: i64) -> Result<u64> {
    u64::try_from(value).map_err(|_| RpcError::Malformed(format!("negative {field}: {value}")))
}

fn time_from_proto(ts: Option<prost_types::Timestamp>) -> Option<SystemTime> {
    ts.and_then(|ts| SystemTime::try_from(ts).ok())
}

fn duration_from_proto(d: Option<prost_types::Duration>) -> Option<Duration> {
    d.and_then(|d| Duration::try_from(d).ok())
}

// ==================== Trees ====================

fn tree_state_from_proto(state: proto::TreeState) -> TreeState {
    match state {
        proto::TreeState::Active => TreeState::Active,
        proto::TreeState::Frozen => TreeState::Frozen,
        proto::TreeState::Draining => TreeState::Draining,
        _ => TreeState::Unknown,
    }
}

fn tree_state_to_proto(state: TreeState) -> proto::TreeState {
    match state {
        TreeState::Unknown => proto::TreeState::UnknownTreeState,
        TreeState::Active => proto::TreeState::Active,
        TreeState::Frozen => proto::TreeState::Frozen,
        TreeState::Draining => proto::TreeState::Draining,
    }
}

fn tree_type_from_proto(tree_type: proto::TreeType) -> TreeType {
    match tree_type {
        proto::TreeType::UnknownTreeType => TreeType::Unknown,
        proto::TreeType::Log => TreeType::Log,
        proto::TreeType::Map => TreeType::Map,
        proto::TreeType::PreorderedLog => TreeType::PreorderedLog,
    }
}

fn tree_type_to_proto(tree_type: TreeType) -> proto::TreeType {
    match tree_type {
        TreeType::Unknown => proto::TreeType::UnknownTreeType,
        TreeType::Log => proto::TreeType::Log,
        TreeType::Map => proto::TreeType::Map,
        TreeType::PreorderedLog => proto::TreeType::PreorderedLog,
    }
}

fn hash_strategy_from_proto(strategy: proto::HashStrategy) -> HashStrategy {
    match strategy {
        proto::HashStrategy::Rfc6962Sha256 => HashStrategy::Rfc6962Sha256,
        proto::HashStrategy::ObjectRfc6962Sha256 => HashStrategy::ObjectRfc6962Sha256,
        _ => HashStrategy::Unknown,
    }
}

fn hash_strategy_to_proto(strategy: HashStrategy) -> proto::HashStrategy {
    match strategy {
        HashStrategy::Unknown => proto::HashStrategy::UnknownHashStrategy,
        HashStrategy::Rfc6962Sha256 => proto::HashStrategy::Rfc6962Sha256,
        HashStrategy::ObjectRfc6962Sha256 => proto::HashStrategy::ObjectRfc6962Sha256,
    }
}

fn hash_algorithm_from_proto(alg: proto::HashAlgorithm) -> HashAlgorithm {
    match alg {
        proto::HashAlgorithm::None => HashAlgorithm::None,
        proto::HashAlgorithm::Sha256 => HashAlgorithm::Sha256,
    }
}

fn hash_algorithm_to_proto(alg: HashAlgorithm) -> proto::HashAlgorithm {
    match alg {
        HashAlgorithm::None => proto::HashAlgorithm::None,
        HashAlgorithm::Sha256 => proto::HashAlgorithm::Sha256,
    }
}

fn signature_algorithm_from_proto(alg: proto::SignatureAlgorithm) -> SignatureAlgorithm {
    match alg {
        proto::SignatureAlgorithm::Anonymous => SignatureAlgorithm::Anonymous,
        proto::SignatureAlgorithm::Rsa => SignatureAlgorithm::Rsa,
        proto::SignatureAlgorithm::Ecdsa => SignatureAlgorithm::Ecdsa,
        proto::SignatureAlgorithm::Ed25519 => SignatureAlgorithm::Ed25519,
    }
}

fn signature_algorithm_to_proto(alg: SignatureAlgorithm) -> proto::SignatureAlgorithm {
    match alg {
        SignatureAlgorithm::Anonymous => proto::SignatureAlgorithm::Anonymous,
        SignatureAlgorithm::Rsa => proto::SignatureAlgorithm::Rsa,
        SignatureAlgorithm::Ecdsa => proto::SignatureAlgorithm::Ecdsa,
        SignatureAlgorithm::Ed25519 => proto::SignatureAlgorithm::Ed25519,
    }
}

fn key_spec_to_proto(spec: KeySpec) -> proto::KeySpecification {
    use proto::key_specification::Params;

    let params = match spec {
        KeySpec::Ecdsa { curve } => {
            let curve = match curve {
                EcdsaCurve::Default => proto::EcdsaCurve::DefaultCurve,
                EcdsaCurve::P256 => proto::EcdsaCurve::P256,
                EcdsaCurve::P384 => proto::EcdsaCurve::P384,
                EcdsaCurve::P521 => proto::EcdsaCurve::P521,
            };
            Params::EcdsaParams(proto::EcdsaParams {
                curve: curve as i32,
            })
        }
        KeySpec::Rsa { bits } => Params::RsaParams(proto::RsaParams { bits }),
        KeySpec::Ed25519 => Params::Ed25519Params(proto::Ed25519Params {}),
    };
    proto::KeySpecification {
        params: Some(params),
    }
}

/// Proto → domain tree. Unrecognized enum values map to the `Unknown` variants.
pub fn tree_from_proto(tree: proto::Tree) -> Tree {
    Tree {
        tree_id: TreeId::new(tree.tree_id),
        state: tree_state_from_proto(tree.tree_state()),
        tree_type: tree_type_from_proto(tree.tree_type()),
        hash_strategy: hash_strategy_from_proto(tree.hash_strategy()),
        hash_algorithm: hash_algorithm_from_proto(tree.hash_algorithm()),
        signature_algorithm: signature_algorithm_from_proto(tree.signature_algorithm()),
        public_key_der: tree.public_key.map(|k| k.der).unwrap_or_default(),
        max_root_duration: duration_from_proto(tree.max_root_duration),
        created_at: time_from_proto(tree.create_time),
        updated_at: time_from_proto(tree.update_time),
        deleted: tree.deleted,
        display_name: tree.display_name,
        description: tree.description,
    }
}

/// Domain tree configuration → CreateTree request.
pub fn create_tree_request(config: &TreeConfig) -> Result<proto::CreateTreeRequest> {
    let max_root_duration = prost_types::Duration::try_from(config.max_root_duration)
        .map_err(|e| RpcError::Malformed(format!("max_root_duration: {e}")))?;

    let tree = proto::Tree {
        tree_state: tree_state_to_proto(config.state) as i32,
        tree_type: tree_type_to_proto(config.tree_type) as i32,
        hash_strategy: hash_strategy_to_proto(config.hash_strategy) as i32,
        hash_algorithm: hash_algorithm_to_proto(config.hash_algorithm) as i32,
        signature_algorithm: signature_algorithm_to_proto(config.signature_algorithm) as i32,
        display_name: config.display_name.clone(),
        description: config.description.clone(),
        max_root_duration: Some(max_root_duration),
        ..Default::default()
    };

    Ok(proto::CreateTreeRequest {
        tree: Some(tree),
        key_spec: Some(key_spec_to_proto(config.key_spec)),
    })
}

// ==================== Log data ====================

/// Fields of a TLS-encoded `LogRootV1`.
#[derive(Debug, PartialEq, Eq)]
struct LogRootV1 {
    tree_size: u64,
    root_hash: Vec<u8>,
    timestamp_nanos: u64,
    revision: u64,
}

fn truncated_log_root() -> RpcError {
    RpcError::Malformed("truncated log_root".into())
}

fn take<'a>(input: &mut &'a [u8], len: usize) -> Result<&'a [u8]> {
    let current: &'a [u8] = *input;
    let (head, rest) = current.split_at_checked(len).ok_or_else(truncated_log_root)?;
    *input = rest;
    Ok(head)
}

fn take_array<const N: usize>(input: &mut &[u8]) -> Result<[u8; N]> {
    <[u8; N]>::try_from(take(input, N)?).map_err(|_| truncated_log_root())
}

/// Decode `version(u16) tree_size(u64) root_hash<0..128> timestamp_nanos(u64)
/// revision(u64) metadata<0..65535>`, big-endian.
fn decode_log_root_v1(mut input: &[u8]) -> Result<LogRootV1> {
    let version = u16::from_be_bytes(take_array(&mut input)?);
    if version != 1 {
        return Err(RpcError::Malformed(format!(
            "unsupported log_root version {version}"
        )));
    }
    let tree_size = u64::from_be_bytes(take_array(&mut input)?);
    let [hash_len] = take_array::<1>(&mut input)?;
    let root_hash = take(&mut input, usize::from(hash_len))?.to_vec();
    let timestamp_nanos = u64::from_be_bytes(take_array(&mut input)?);
    let revision = u64::from_be_bytes(take_array(&mut input)?);
    let metadata_len = u16::from_be_bytes(take_array(&mut input)?);
    take(&mut input, usize::from(metadata_len))?;
    if !input.is_empty() {
        return Err(RpcError::Malformed(format!(
            "{} trailing bytes after log_root",
            input.len()
        )));
    }

    Ok(LogRootV1 {
        tree_size,
        root_hash,
        timestamp_nanos,
        revision,
    })
}

/// Proto → domain signed log root. Negative sizes or timestamps are rejected.
///
/// Services from Trillian 1.2 on leave the per-field values unset and send
/// only the encoded `log_root`; in that case the fields are read from it.
pub fn signed_log_root_from_proto(root: proto::SignedLogRoot) -> Result<SignedLogRoot> {
    if root.tree_size == 0 && root.root_hash.is_empty() && !root.log_root.is_empty() {
        let decoded = decode_log_root_v1(&root.log_root)?;
        let tree_revision = i64::try_from(decoded.revision).map_err(|_| {
            RpcError::Malformed(format!("log_root revision too large: {}", decoded.revision))
        })?;
        return Ok(SignedLogRoot {
            timestamp_nanos: decoded.timestamp_nanos,
            tree_size: decoded.tree_size,
            tree_revision,
            root_hash: decoded.root_hash,
            key_hint: root.key_hint,
            log_root: root.log_root,
            log_root_signature: root.log_root_signature,
        });
    }

    Ok(SignedLogRoot {
        timestamp_nanos: from_wire_u64("timestamp_nanos", root.timestamp_nanos)?,
        tree_size: from_wire_u64("tree_size", root.tree_size)?,
        tree_revision: root.tree_revision,
        root_hash: root.root_hash,
        key_hint: root.key_hint,
        log_root: root.log_root,
        log_root_signature: root.log_root_signature,
    })
}

/// Unwrap the root every root-bearing response must carry.
pub fn required_root(root: Option<proto::SignedLogRoot>, rpc: &str) -> Result<SignedLogRoot> {
    let root = root.ok_or_else(|| RpcError::Malformed(format!("{rpc}: missing signed_log_root")))?;
    signed_log_root_from_proto(root)
}

/// Proto → domain leaf.
pub fn leaf_from_proto(leaf: proto::LogLeaf) -> Result<LogLeaf> {
    Ok(LogLeaf {
        leaf_index: from_wire_u64("leaf_index", leaf.leaf_index)?,
        leaf_value: leaf.leaf_value,
        merkle_leaf_hash: leaf.merkle_leaf_hash,
        leaf_identity_hash: (!leaf.leaf_identity_hash.is_empty())
            .then_some(leaf.leaf_identity_hash),
        extra_data: leaf.extra_data,
        queue_timestamp: time_from_proto(leaf.queue_timestamp),
        integrate_timestamp: time_from_proto(leaf.integrate_timestamp),
    })
}

/// GetLeavesByIndex response → leaves plus the root they were served under.
pub fn leaf_batch_from_proto(response: proto::GetLeavesByIndexResponse) -> Result<LeafBatch> {
    Ok(LeafBatch {
        leaves: response
            .leaves
            .into_iter()
            .map(leaf_from_proto)
            .collect::<Result<_>>()?,
        signed_log_root: response
            .signed_log_root
            .map(signed_log_root_from_proto)
            .transpose()?,
    })
}

/// QueueLeaf response → domain queued leaf.
pub fn queued_leaf_from_proto(response: proto::QueueLeafResponse) -> Result<QueuedLeaf> {
    let queued = response
        .queued_leaf
        .ok_or_else(|| RpcError::Malformed("QueueLeaf: missing queued_leaf".into()))?;
    let leaf = queued
        .leaf
        .ok_or_else(|| RpcError::Malformed("QueueLeaf: missing leaf".into()))?;

    let already_exists = queued
        .status
        .is_some_and(|s| RpcCode::from_i32(s.code) == RpcCode::AlreadyExists);

    Ok(QueuedLeaf {
        leaf: leaf_from_proto(leaf)?,
        already_exists,
    })
}

/// GetConsistencyProof response → domain proof. A missing proof is an empty one.
pub fn consistency_proof_from_proto(
    response: proto::GetConsistencyProofResponse,
) -> Result<ConsistencyProof> {
    let signed_log_root = required_root(response.signed_log_root, "GetConsistencyProof")?;
    Ok(ConsistencyProof {
        hashes: response.proof.map(|p| p.hashes).unwrap_or_default(),
        signed_log_root,
    })
}
