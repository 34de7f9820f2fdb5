//! Shared entities for Trellis.
//!
//! This crate defines the types exchanged between the log service and its
//! callers: tree administration ([`Tree`], [`TreeConfig`], [`KeySpec`],
//! [`PublicKeyInfo`]), signed snapshots of tree state ([`SignedLogRoot`]),
//! appended records ([`LogLeaf`], [`LeafBatch`], [`QueuedLeaf`]) and proofs
//! ([`ConsistencyProof`]).
//!
//! None of these values is cached by the client: every instance is the
//! result of one live query against the remote service.

use std::fmt;
use std::str::FromStr;
use std::time::{Duration, SystemTime};

use serde::{Deserialize, Serialize};

pub mod b64;

/// Maximum number of leaf indexes requested in a single leaf lookup.
pub const MAX_LEAVES_PER_REQUEST: u64 = 1024;

/// Staleness bound configured on every log created through the admin client.
pub const DEFAULT_MAX_ROOT_DURATION: Duration = Duration::from_secs(600);

// ---------------------------------------------------------------------------
// Identifiers
// ---------------------------------------------------------------------------

/// Identifier of a tree (log) assigned by the service at creation.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TreeId(i64);

impl TreeId {
    /// Wrap a raw service identifier.
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Return the raw service identifier.
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl From<i64> for TreeId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl FromStr for TreeId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<i64>().map(Self)
    }
}

impl fmt::Display for TreeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for TreeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TreeId({})", self.0)
    }
}

// ---------------------------------------------------------------------------
// Tree configuration enums
// ---------------------------------------------------------------------------

/// Lifecycle state of a tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TreeState {
    /// State not reported by the service.
    Unknown,
    /// Accepting writes.
    Active,
    /// Read-only.
    Frozen,
    /// Finishing integration of queued leaves before freezing.
    Draining,
}

/// Kind of tree. Only `Log` and `PreorderedLog` trees carry leaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TreeType {
    /// Type not reported by the service.
    Unknown,
    /// Append-only log; the service assigns leaf indexes.
    Log,
    /// Verifiable map (not a log).
    Map,
    /// Log whose leaf indexes are assigned by the submitter.
    PreorderedLog,
}

impl TreeType {
    /// Whether trees of this type hold an ordered sequence of leaves.
    pub fn is_log(self) -> bool {
        matches!(self, Self::Log | Self::PreorderedLog)
    }
}

/// Merkle hashing strategy of a tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HashStrategy {
    /// Strategy not reported by the service.
    Unknown,
    /// RFC 6962 Merkle hashing with SHA-256.
    Rfc6962Sha256,
    /// Object hashing on top of RFC 6962 SHA-256.
    ObjectRfc6962Sha256,
}

/// Hash algorithm used when signing tree heads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HashAlgorithm {
    /// No hash algorithm.
    None,
    /// SHA-256.
    Sha256,
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("NONE"),
            Self::Sha256 => f.write_str("SHA256"),
        }
    }
}

/// Signature algorithm of the tree's signing key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignatureAlgorithm {
    /// Unsigned.
    Anonymous,
    /// RSA signatures.
    Rsa,
    /// ECDSA signatures.
    Ecdsa,
    /// Ed25519 signatures.
    Ed25519,
}

impl fmt::Display for SignatureAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Anonymous => f.write_str("ANONYMOUS"),
            Self::Rsa => f.write_str("RSA"),
            Self::Ecdsa => f.write_str("ECDSA"),
            Self::Ed25519 => f.write_str("ED25519"),
        }
    }
}

/// Elliptic curve for ECDSA keys. `Default` lets the service choose.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EcdsaCurve {
    /// Service default curve.
    #[default]
    Default,
    /// NIST P-256.
    P256,
    /// NIST P-384.
    P384,
    /// NIST P-521.
    P521,
}

/// Parameters for the signing key the service generates for a new tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeySpec {
    /// ECDSA key on the given curve.
    Ecdsa {
        /// Curve to generate the key on.
        curve: EcdsaCurve,
    },
    /// RSA key of the given modulus size (0 lets the service choose).
    Rsa {
        /// Modulus size in bits.
        bits: i32,
    },
    /// Ed25519 key.
    Ed25519,
}

// ---------------------------------------------------------------------------
// Trees
// ---------------------------------------------------------------------------

/// Administrative identity of one tree.
///
/// `tree_id`, `hash_algorithm` and `signature_algorithm` are fixed once the
/// tree has been created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tree {
    /// Identifier assigned by the service.
    pub tree_id: TreeId,
    /// Lifecycle state.
    pub state: TreeState,
    /// Log, map or pre-ordered log.
    pub tree_type: TreeType,
    /// Merkle hashing strategy.
    pub hash_strategy: HashStrategy,
    /// Hash used when signing.
    pub hash_algorithm: HashAlgorithm,
    /// Signing algorithm.
    pub signature_algorithm: SignatureAlgorithm,
    /// Human-readable name.
    pub display_name: String,
    /// Free-form description.
    pub description: String,
    /// DER-encoded public key of the tree's signer.
    #[serde(with = "b64")]
    pub public_key_der: Vec<u8>,
    /// Longest interval before the service must issue a fresh signed root.
    pub max_root_duration: Option<Duration>,
    /// Creation time.
    pub created_at: Option<SystemTime>,
    /// Last update time.
    pub updated_at: Option<SystemTime>,
    /// Whether the tree is soft-deleted.
    pub deleted: bool,
}

impl Tree {
    /// Project the tree onto its public key attributes.
    pub fn public_key(&self) -> PublicKeyInfo {
        PublicKeyInfo {
            hash_algorithm: self.hash_algorithm,
            signature_algorithm: self.signature_algorithm,
            der: self.public_key_der.clone(),
        }
    }
}

/// Requested configuration for a new tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeConfig {
    /// Initial lifecycle state.
    pub state: TreeState,
    /// Kind of tree.
    pub tree_type: TreeType,
    /// Merkle hashing strategy.
    pub hash_strategy: HashStrategy,
    /// Hash used when signing.
    pub hash_algorithm: HashAlgorithm,
    /// Signing algorithm.
    pub signature_algorithm: SignatureAlgorithm,
    /// Human-readable name.
    pub display_name: String,
    /// Free-form description.
    pub description: String,
    /// Longest interval before a fresh signed root must be issued.
    pub max_root_duration: Duration,
    /// Signing key to generate.
    pub key_spec: KeySpec,
}

impl TreeConfig {
    /// The fixed configuration used for every log created by the admin client:
    /// active, log type, RFC 6962 SHA-256 hashing, ECDSA on the default curve
    /// and a 600 second maximum root duration.
    pub fn standard_log(display_name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            state: TreeState::Active,
            tree_type: TreeType::Log,
            hash_strategy: HashStrategy::Rfc6962Sha256,
            hash_algorithm: HashAlgorithm::Sha256,
            signature_algorithm: SignatureAlgorithm::Ecdsa,
            display_name: display_name.into(),
            description: description.into(),
            max_root_duration: DEFAULT_MAX_ROOT_DURATION,
            key_spec: KeySpec::Ecdsa {
                curve: EcdsaCurve::Default,
            },
        }
    }
}

/// Public key attributes of a tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicKeyInfo {
    /// Hash used when signing.
    pub hash_algorithm: HashAlgorithm,
    /// Signing algorithm.
    pub signature_algorithm: SignatureAlgorithm,
    /// DER-encoded public key.
    #[serde(with = "b64")]
    pub der: Vec<u8>,
}

// ---------------------------------------------------------------------------
// Log data
// ---------------------------------------------------------------------------

/// A signed snapshot of a log's state.
///
/// Successive roots of the same log never report a smaller `tree_size`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedLogRoot {
    /// Time the root was produced, in nanoseconds since the Unix epoch.
    pub timestamp_nanos: u64,
    /// Merkle root hash.
    #[serde(with = "b64")]
    pub root_hash: Vec<u8>,
    /// Number of leaves integrated into the tree.
    pub tree_size: u64,
    /// Storage revision of the tree at this root.
    pub tree_revision: i64,
    /// Hint identifying the signing key.
    #[serde(with = "b64")]
    pub key_hint: Vec<u8>,
    /// Encoded log root structure covered by the signature.
    #[serde(with = "b64")]
    pub log_root: Vec<u8>,
    /// Signature over `log_root`.
    #[serde(with = "b64")]
    pub log_root_signature: Vec<u8>,
}

/// One appended record.
///
/// Leaf indexes are assigned by the service, unique per log and dense from 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogLeaf {
    /// Position in the log.
    pub leaf_index: u64,
    /// Canonical bytes submitted by the producer.
    #[serde(with = "b64")]
    pub leaf_value: Vec<u8>,
    /// Merkle hash of the leaf.
    #[serde(with = "b64")]
    pub merkle_leaf_hash: Vec<u8>,
    /// Identity hash used for duplicate detection, when the service reports one.
    #[serde(with = "b64::option")]
    pub leaf_identity_hash: Option<Vec<u8>>,
    /// Unhashed data stored alongside the leaf.
    #[serde(with = "b64")]
    pub extra_data: Vec<u8>,
    /// When the leaf was queued.
    pub queue_timestamp: Option<SystemTime>,
    /// When the leaf was integrated into the tree.
    pub integrate_timestamp: Option<SystemTime>,
}

/// Leaves returned by one index lookup, with the root the service served
/// them under.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LeafBatch {
    /// Leaves in the order the service sent them.
    pub leaves: Vec<LogLeaf>,
    /// Root attached to the response, when the service sends one.
    pub signed_log_root: Option<SignedLogRoot>,
}

/// Outcome of queueing a leaf for inclusion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueuedLeaf {
    /// The leaf as echoed back by the service.
    pub leaf: LogLeaf,
    /// The service already held a leaf with the same identity.
    pub already_exists: bool,
}

/// Evidence that an earlier tree state is a prefix of a later one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsistencyProof {
    /// Ordered proof hashes.
    #[serde(with = "b64::list")]
    pub hashes: Vec<Vec<u8>>,
    /// Root the service paired with the proof. Authoritative for the later state.
    pub signed_log_root: SignedLogRoot,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
