//! Error types for RPC calls against the log service.

use std::fmt;

/// gRPC status codes as reported by the log service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RpcCode {
    Ok,
    Cancelled,
    Unknown,
    InvalidArgument,
    DeadlineExceeded,
    NotFound,
    AlreadyExists,
    PermissionDenied,
    ResourceExhausted,
    FailedPrecondition,
    Aborted,
    OutOfRange,
    Unimplemented,
    Internal,
    Unavailable,
    DataLoss,
    Unauthenticated,
}

impl RpcCode {
    /// Map a numeric `google.rpc.Code` value. Unrecognized values map to `Unknown`.
    pub fn from_i32(code: i32) -> Self {
        match code {
            0 => Self::Ok,
            1 => Self::Cancelled,
            3 => Self::InvalidArgument,
            4 => Self::DeadlineExceeded,
            5 => Self::NotFound,
            6 => Self::AlreadyExists,
            7 => Self::PermissionDenied,
            8 => Self::ResourceExhausted,
            9 => Self::FailedPrecondition,
            10 => Self::Aborted,
            11 => Self::OutOfRange,
            12 => Self::Unimplemented,
            13 => Self::Internal,
            14 => Self::Unavailable,
            15 => Self::DataLoss,
            16 => Self::Unauthenticated,
            _ => Self::Unknown,
        }
    }
}

impl From<tonic::Code> for RpcCode {
    fn from(code: tonic::Code) -> Self {
        Self::from_i32(code as i32)
    }
}

impl fmt::Display for RpcCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Errors that can occur while issuing an RPC.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RpcError {
    /// The service answered with a non-OK status.
    #[error("{code}: {message}")]
    Status {
        /// Status code.
        code: RpcCode,
        /// Description supplied by the service.
        message: String,
    },

    /// The channel to the service could not be established or broke.
    #[error("channel error: {0}")]
    Channel(String),

    /// The service answered with a message that cannot be interpreted.
    #[error("malformed response: {0}")]
    Malformed(String),

    /// A request value does not fit the wire type.
    #[error("value out of range for request field {field}: {value}")]
    OutOfRange {
        /// Request field name.
        field: &'static str,
        /// Rejected value.
        value: u64,
    },
}

impl RpcError {
    /// Shorthand for a status error.
    pub fn status(code: RpcCode, message: impl Into<String>) -> Self {
        Self::Status {
            code,
            message: message.into(),
        }
    }

    /// The status code, if the service answered.
    pub fn code(&self) -> Option<RpcCode> {
        match self {
            Self::Status { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Whether the service reported that the referenced tree does not exist.
    pub fn is_not_found(&self) -> bool {
        self.code() == Some(RpcCode::NotFound)
    }

    /// Whether repeating the same call may succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Channel(_) => true,
            Self::Status { code, .. } => matches!(
                code,
                RpcCode::Unavailable
                    | RpcCode::DeadlineExceeded
                    | RpcCode::ResourceExhausted
                    | RpcCode::Aborted
            ),
            Self::Malformed(_) | Self::OutOfRange { .. } => false,
        }
    }
}

/// Message tonic attaches when its own client-side timeout fires.
const CLIENT_TIMEOUT_MESSAGE: &str = "Timeout expired";

impl From<tonic::Status> for RpcError {
    fn from(status: tonic::Status) -> Self {
        // tonic reports an expired local deadline as CANCELLED.
        let code = match status.code() {
            tonic::Code::Cancelled if status.message() == CLIENT_TIMEOUT_MESSAGE => {
                RpcCode::DeadlineExceeded
            }
            code => code.into(),
        };
        Self::Status {
            code,
            message: status.message().to_string(),
        }
    }
}
