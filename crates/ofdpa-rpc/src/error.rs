//! OF-DPA error types and status handling.
//!
//! Every remote call reports an `OFDPA_ERROR_t` status code. This module maps
//! those codes onto [`OfdpaStatus`] and lifts failures into [`OfdpaError`].

use std::fmt;
use std::io;
use thiserror::Error;

/// OF-DPA status codes as returned by the flow table service.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OfdpaStatus {
    None = 0,
    Rpc = -20,
    Internal = -21,
    Param = -22,
    Error = -23,
    Full = -24,
    Exists = -25,
    Timeout = -26,
    Fail = -27,
    Disabled = -28,
    Unavail = -29,
    NotFound = -30,
    Empty = -31,
    RequestDenied = -32,
    NotImplemented = -33,
}

impl OfdpaStatus {
    /// Creates an OfdpaStatus from a raw i32 value.
    ///
    /// Codes outside the known set map to [`OfdpaStatus::Fail`].
    pub fn from_raw(status: i32) -> Self {
        match status {
            0 => OfdpaStatus::None,
            -20 => OfdpaStatus::Rpc,
            -21 => OfdpaStatus::Internal,
            -22 => OfdpaStatus::Param,
            -23 => OfdpaStatus::Error,
            -24 => OfdpaStatus::Full,
            -25 => OfdpaStatus::Exists,
            -26 => OfdpaStatus::Timeout,
            -27 => OfdpaStatus::Fail,
            -28 => OfdpaStatus::Disabled,
            -29 => OfdpaStatus::Unavail,
            -30 => OfdpaStatus::NotFound,
            -31 => OfdpaStatus::Empty,
            -32 => OfdpaStatus::RequestDenied,
            -33 => OfdpaStatus::NotImplemented,
            _ => OfdpaStatus::Fail,
        }
    }

    /// Returns the raw status code.
    pub const fn code(self) -> i32 {
        self as i32
    }

    /// Returns true if the status indicates success.
    pub fn is_success(&self) -> bool {
        *self == OfdpaStatus::None
    }

    /// Converts to a Result, returning Ok(()) for success.
    pub fn into_result(self) -> OfdpaResult<()> {
        if self.is_success() {
            Ok(())
        } else {
            Err(OfdpaError::Status { status: self })
        }
    }
}

impl fmt::Display for OfdpaStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OfdpaStatus::None => "OFDPA_E_NONE",
            OfdpaStatus::Rpc => "OFDPA_E_RPC",
            OfdpaStatus::Internal => "OFDPA_E_INTERNAL",
            OfdpaStatus::Param => "OFDPA_E_PARAM",
            OfdpaStatus::Error => "OFDPA_E_ERROR",
            OfdpaStatus::Full => "OFDPA_E_FULL",
            OfdpaStatus::Exists => "OFDPA_E_EXISTS",
            OfdpaStatus::Timeout => "OFDPA_E_TIMEOUT",
            OfdpaStatus::Fail => "OFDPA_E_FAIL",
            OfdpaStatus::Disabled => "OFDPA_E_DISABLED",
            OfdpaStatus::Unavail => "OFDPA_E_UNAVAIL",
            OfdpaStatus::NotFound => "OFDPA_E_NOT_FOUND",
            OfdpaStatus::Empty => "OFDPA_E_EMPTY",
            OfdpaStatus::RequestDenied => "OFDPA_E_REQUEST_DENIED",
            OfdpaStatus::NotImplemented => "OFDPA_NOT_IMPLEMENTED_YET",
        };
        write!(f, "{} ({})", s, self.code())
    }
}

/// Error type for flow table operations.
#[derive(Debug, Error)]
pub enum OfdpaError {
    /// The service returned a non-success status.
    #[error("OF-DPA call failed: {status}")]
    Status { status: OfdpaStatus },

    /// The RPC connection could not be established or broke mid-call.
    #[error("RPC transport error ({addr}): {source}")]
    Transport {
        addr: String,
        #[source]
        source: io::Error,
    },

    /// A request or reply could not be encoded or decoded.
    #[error("RPC codec error: {0}")]
    Codec(#[from] serde_json::Error),

    /// The reply did not carry the payload the call expects.
    #[error("Malformed reply to {call}")]
    MalformedReply { call: &'static str },
}

impl OfdpaError {
    /// Creates an error from a status code.
    pub fn from_status(status: OfdpaStatus) -> Self {
        OfdpaError::Status { status }
    }

    /// Creates a not found error.
    pub fn not_found() -> Self {
        OfdpaError::Status {
            status: OfdpaStatus::NotFound,
        }
    }

    /// Creates a transport error for the given peer.
    pub fn transport(addr: impl Into<String>, source: io::Error) -> Self {
        OfdpaError::Transport {
            addr: addr.into(),
            source,
        }
    }

    /// Returns the status this error reports.
    ///
    /// Local failures (transport, codec, malformed replies) report
    /// [`OfdpaStatus::Rpc`].
    pub fn status(&self) -> OfdpaStatus {
        match self {
            OfdpaError::Status { status } => *status,
            _ => OfdpaStatus::Rpc,
        }
    }

    /// Returns true if this error marks the end of an enumeration or a missing entry.
    pub fn is_not_found(&self) -> bool {
        self.status() == OfdpaStatus::NotFound
    }
}

/// Result type for OF-DPA operations.
pub type OfdpaResult<T> = Result<T, OfdpaError>;

/// Extension trait for converting raw OF-DPA status codes.
pub trait OfdpaStatusExt {
    /// Converts a raw status code to a Result.
    fn to_result(self) -> OfdpaResult<()>;
}

impl OfdpaStatusExt for i32 {
    fn to_result(self) -> OfdpaResult<()> {
        OfdpaStatus::from_raw(self).into_result()
    }
}
