//! Protobuf messages for the Trillian v1 log and admin APIs.
//!
//! Only the fields Trellis reads or writes are declared; prost skips unknown
//! fields when decoding, so the remaining fields of the service's messages are
//! ignored. Tags match `trillian.proto`, `trillian_log_api.proto`,
//! `trillian_admin_api.proto`, `crypto/keyspb/keyspb.proto` and
//! `crypto/sigpb/sigpb.proto`.
//!
//! `SignedLogRoot` carries both layouts of the v1 API: the per-field tags
//! 1, 2, 3 and 6 of releases before 1.2, and the TLS-encoded `log_root`
//! (tag 8) that later releases send with the per-field tags reserved.
//! [`convert::signed_log_root_from_proto`](crate::convert::signed_log_root_from_proto)
//! decodes `log_root` when the per-field values are absent.

/// Fully qualified gRPC method paths.
pub mod paths {
    pub const INIT_LOG: &str = "/trillian.TrillianLog/InitLog";
    pub const QUEUE_LEAF: &str = "/trillian.TrillianLog/QueueLeaf";
    pub const GET_LEAVES_BY_INDEX: &str = "/trillian.TrillianLog/GetLeavesByIndex";
    pub const GET_CONSISTENCY_PROOF: &str = "/trillian.TrillianLog/GetConsistencyProof";
    pub const GET_LATEST_SIGNED_LOG_ROOT: &str = "/trillian.TrillianLog/GetLatestSignedLogRoot";

    pub const LIST_TREES: &str = "/trillian.TrillianAdmin/ListTrees";
    pub const GET_TREE: &str = "/trillian.TrillianAdmin/GetTree";
    pub const CREATE_TREE: &str = "/trillian.TrillianAdmin/CreateTree";
    pub const DELETE_TREE: &str = "/trillian.TrillianAdmin/DeleteTree";
}

// ---------------------------------------------------------------------------
// sigpb / keyspb
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum HashAlgorithm {
    None = 0,
    Sha256 = 4,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum SignatureAlgorithm {
    Anonymous = 0,
    Rsa = 1,
    Ecdsa = 3,
    Ed25519 = 7,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum EcdsaCurve {
    DefaultCurve = 0,
    P256 = 1,
    P384 = 2,
    P521 = 3,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct EcdsaParams {
    #[prost(enumeration = "EcdsaCurve", tag = "1")]
    pub curve: i32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RsaParams {
    #[prost(int32, tag = "1")]
    pub bits: i32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Ed25519Params {}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct KeySpecification {
    #[prost(oneof = "key_specification::Params", tags = "1, 2, 3")]
    pub params: Option<key_specification::Params>,
}

pub mod key_specification {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Params {
        #[prost(message, tag = "1")]
        EcdsaParams(super::EcdsaParams),
        #[prost(message, tag = "2")]
        RsaParams(super::RsaParams),
        #[prost(message, tag = "3")]
        Ed25519Params(super::Ed25519Params),
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PublicKey {
    #[prost(bytes = "vec", tag = "1")]
    pub der: Vec<u8>,
}

// ---------------------------------------------------------------------------
// trillian.proto
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum TreeState {
    UnknownTreeState = 0,
    Active = 1,
    Frozen = 2,
    DeprecatedSoftDeleted = 3,
    DeprecatedHardDeleted = 4,
    Draining = 5,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum TreeType {
    UnknownTreeType = 0,
    Log = 1,
    Map = 2,
    PreorderedLog = 3,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum HashStrategy {
    UnknownHashStrategy = 0,
    Rfc6962Sha256 = 1,
    TestMapHasher = 2,
    ObjectRfc6962Sha256 = 3,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Tree {
    #[prost(int64, tag = "1")]
    pub tree_id: i64,
    #[prost(enumeration = "TreeState", tag = "2")]
    pub tree_state: i32,
    #[prost(enumeration = "TreeType", tag = "3")]
    pub tree_type: i32,
    #[prost(enumeration = "HashStrategy", tag = "4")]
    pub hash_strategy: i32,
    #[prost(enumeration = "HashAlgorithm", tag = "5")]
    pub hash_algorithm: i32,
    #[prost(enumeration = "SignatureAlgorithm", tag = "6")]
    pub signature_algorithm: i32,
    #[prost(string, tag = "8")]
    pub display_name: String,
    #[prost(string, tag = "9")]
    pub description: String,
    #[prost(message, optional, tag = "14")]
    pub public_key: Option<PublicKey>,
    #[prost(message, optional, tag = "15")]
    pub max_root_duration: Option<::prost_types::Duration>,
    #[prost(message, optional, tag = "16")]
    pub create_time: Option<::prost_types::Timestamp>,
    #[prost(message, optional, tag = "17")]
    pub update_time: Option<::prost_types::Timestamp>,
    #[prost(bool, tag = "19")]
    pub deleted: bool,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SignedLogRoot {
    #[prost(int64, tag = "1")]
    pub timestamp_nanos: i64,
    #[prost(bytes = "vec", tag = "2")]
    pub root_hash: Vec<u8>,
    #[prost(int64, tag = "3")]
    pub tree_size: i64,
    #[prost(int64, tag = "6")]
    pub tree_revision: i64,
    #[prost(bytes = "vec", tag = "7")]
    pub key_hint: Vec<u8>,
    #[prost(bytes = "vec", tag = "8")]
    pub log_root: Vec<u8>,
    #[prost(bytes = "vec", tag = "9")]
    pub log_root_signature: Vec<u8>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Proof {
    #[prost(int64, tag = "1")]
    pub leaf_index: i64,
    #[prost(bytes = "vec", repeated, tag = "3")]
    pub hashes: Vec<Vec<u8>>,
}

// ---------------------------------------------------------------------------
// trillian_log_api.proto
// ---------------------------------------------------------------------------

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct LogLeaf {
    #[prost(bytes = "vec", tag = "1")]
    pub merkle_leaf_hash: Vec<u8>,
    #[prost(bytes = "vec", tag = "2")]
    pub leaf_value: Vec<u8>,
    #[prost(bytes = "vec", tag = "3")]
    pub extra_data: Vec<u8>,
    #[prost(int64, tag = "4")]
    pub leaf_index: i64,
    #[prost(bytes = "vec", tag = "5")]
    pub leaf_identity_hash: Vec<u8>,
    #[prost(message, optional, tag = "6")]
    pub queue_timestamp: Option<::prost_types::Timestamp>,
    #[prost(message, optional, tag = "7")]
    pub integrate_timestamp: Option<::prost_types::Timestamp>,
}

/// `google.rpc.Status`, as attached to a queued leaf.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct LeafStatus {
    #[prost(int32, tag = "1")]
    pub code: i32,
    #[prost(string, tag = "2")]
    pub message: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct QueuedLogLeaf {
    #[prost(message, optional, tag = "1")]
    pub leaf: Option<LogLeaf>,
    #[prost(message, optional, tag = "2")]
    pub status: Option<LeafStatus>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct InitLogRequest {
    #[prost(int64, tag = "1")]
    pub log_id: i64,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct InitLogResponse {
    #[prost(message, optional, tag = "1")]
    pub created: Option<SignedLogRoot>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct QueueLeafRequest {
    #[prost(int64, tag = "1")]
    pub log_id: i64,
    #[prost(message, optional, tag = "2")]
    pub leaf: Option<LogLeaf>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct QueueLeafResponse {
    #[prost(message, optional, tag = "2")]
    pub queued_leaf: Option<QueuedLogLeaf>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetLeavesByIndexRequest {
    #[prost(int64, tag = "1")]
    pub log_id: i64,
    #[prost(int64, repeated, tag = "2")]
    pub leaf_index: Vec<i64>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetLeavesByIndexResponse {
    #[prost(message, repeated, tag = "2")]
    pub leaves: Vec<LogLeaf>,
    #[prost(message, optional, tag = "3")]
    pub signed_log_root: Option<SignedLogRoot>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetConsistencyProofRequest {
    #[prost(int64, tag = "1")]
    pub log_id: i64,
    #[prost(int64, tag = "2")]
    pub first_tree_size: i64,
    #[prost(int64, tag = "3")]
    pub second_tree_size: i64,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetConsistencyProofResponse {
    #[prost(message, optional, tag = "2")]
    pub proof: Option<Proof>,
    #[prost(message, optional, tag = "3")]
    pub signed_log_root: Option<SignedLogRoot>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetLatestSignedLogRootRequest {
    #[prost(int64, tag = "1")]
    pub log_id: i64,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetLatestSignedLogRootResponse {
    #[prost(message, optional, tag = "2")]
    pub signed_log_root: Option<SignedLogRoot>,
}

// ---------------------------------------------------------------------------
// trillian_admin_api.proto
// ---------------------------------------------------------------------------

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ListTreesRequest {
    #[prost(bool, tag = "1")]
    pub show_deleted: bool,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ListTreesResponse {
    #[prost(message, repeated, tag = "1")]
    pub tree: Vec<Tree>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetTreeRequest {
    #[prost(int64, tag = "1")]
    pub tree_id: i64,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CreateTreeRequest {
    #[prost(message, optional, tag = "1")]
    pub tree: Option<Tree>,
    #[prost(message, optional, tag = "2")]
    pub key_spec: Option<KeySpecification>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DeleteTreeRequest {
    #[prost(int64, tag = "1")]
    pub tree_id: i64,
}
