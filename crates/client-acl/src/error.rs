//! Error types for the Policy ACL client.
//!
//! All errors implement `std::error::Error` via `thiserror`.

use ofdpa_rpc::OfdpaError;
use ofdpa_types::ParseError;
use std::io;
use thiserror::Error;

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Cross-field consistency failures detected once all options are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Incorrect ethertype 0x{ether_type:04x} for IPv6 address")]
    Ipv6AddressWithEthertype { ether_type: u16 },

    #[error("Incorrect ethertype 0x{ether_type:04x} for IPv4 address")]
    Ipv4AddressWithEthertype { ether_type: u16 },
}

/// Errors that can occur while building or submitting ACL flows.
#[derive(Debug, Error)]
pub enum ClientError {
    /// An option value could not be decoded.
    #[error("Invalid {field} \"{value}\": {source}")]
    InvalidField {
        /// The long option name.
        field: &'static str,
        /// The text as given on the command line.
        value: String,
        /// The underlying parse error.
        #[source]
        source: ParseError,
    },

    /// The assembled rule is inconsistent.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The flow table service rejected a call.
    #[error("{operation} failed: {source}")]
    Remote {
        /// The flow table call that failed.
        operation: &'static str,
        /// The error reported for the call.
        #[source]
        source: OfdpaError,
    },

    /// Writing the report failed.
    #[error("Output error: {0}")]
    Io(#[from] io::Error),
}

impl ClientError {
    /// Creates an invalid field error.
    pub fn invalid_field(field: &'static str, value: impl Into<String>, source: ParseError) -> Self {
        ClientError::InvalidField {
            field,
            value: value.into(),
            source,
        }
    }

    /// Creates a remote error for the named call.
    pub fn remote(operation: &'static str, source: OfdpaError) -> Self {
        ClientError::Remote { operation, source }
    }
}
