//! Value types for OF-DPA flow match fields.
//!
//! This crate provides the typed building blocks that flow-table clients decode
//! command-line text into:
//!
//! - [`MacAddress`]: 48-bit Ethernet MAC addresses in colon, dash or dotted notation
//! - [`MatchField`]: a (value, mask) pair with wildcard/exact semantics
//! - [`ip`]: IPv4/IPv6 address decoding and CIDR prefix masks
//! - [`int`]: bounded unsigned integer literals (decimal or `0x` hex)

pub mod field;
pub mod int;
pub mod ip;
mod mac;

pub use field::{MaskBits, MatchField};
pub use mac::{Dotted, MacAddress, MacLayout};

/// Common error type for parsing failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("invalid MAC address format: {0}")]
    InvalidMacAddress(String),

    #[error("invalid IP address format: {0}")]
    InvalidIpAddress(String),

    #[error("invalid integer literal: {0:?}")]
    InvalidInteger(String),

    #[error("value {value} out of range (maximum {max})")]
    OutOfRange { value: u64, max: u64 },

    #[error("invalid prefix length {value:?} (must be 0-{max})")]
    InvalidPrefixLength { value: String, max: u8 },
}
