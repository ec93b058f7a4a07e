//! IP address decoding and CIDR prefix masks.

use crate::int::parse_literal;
use crate::ParseError;
use std::net::{Ipv4Addr, Ipv6Addr};

/// Longest IPv4 prefix.
pub const IPV4_MAX_PREFIX: u8 = 32;

/// Longest IPv6 prefix.
pub const IPV6_MAX_PREFIX: u8 = 128;

/// Decodes an IPv4 address in dotted-quad form, or as a raw 32-bit literal.
///
/// ```
/// use ofdpa_types::ip::parse_ipv4;
/// use std::net::Ipv4Addr;
///
/// assert_eq!(parse_ipv4("10.0.0.1").unwrap(), Ipv4Addr::new(10, 0, 0, 1));
/// assert_eq!(parse_ipv4("0x0a000001").unwrap(), Ipv4Addr::new(10, 0, 0, 1));
/// ```
pub fn parse_ipv4(s: &str) -> Result<Ipv4Addr, ParseError> {
    let text = s.trim();
    if let Ok(addr) = text.parse::<Ipv4Addr>() {
        return Ok(addr);
    }

    match parse_literal(text) {
        Ok(raw) => u32::try_from(raw)
            .map(Ipv4Addr::from)
            .map_err(|_| ParseError::InvalidIpAddress(s.to_string())),
        Err(_) => Err(ParseError::InvalidIpAddress(s.to_string())),
    }
}

/// Decodes an IPv6 address in standard colon-hex notation.
pub fn parse_ipv6(s: &str) -> Result<Ipv6Addr, ParseError> {
    s.trim()
        .parse::<Ipv6Addr>()
        .map_err(|_| ParseError::InvalidIpAddress(s.to_string()))
}

fn parse_prefix_len(s: &str, max: u8) -> Result<u8, ParseError> {
    let invalid = || ParseError::InvalidPrefixLength {
        value: s.to_string(),
        max,
    };
    let len = parse_literal(s).map_err(|_| invalid())?;
    u8::try_from(len)
        .ok()
        .filter(|len| *len <= max)
        .ok_or_else(invalid)
}

/// Returns the IPv4 mask with the top `prefix_len` bits set.
///
/// # Errors
///
/// Returns an error if `prefix_len` exceeds 32.
pub fn ipv4_prefix_mask(prefix_len: u8) -> Result<Ipv4Addr, ParseError> {
    if prefix_len > IPV4_MAX_PREFIX {
        return Err(ParseError::InvalidPrefixLength {
            value: prefix_len.to_string(),
            max: IPV4_MAX_PREFIX,
        });
    }
    let bits = match prefix_len {
        0 => 0,
        len => u32::MAX << (IPV4_MAX_PREFIX - len),
    };
    Ok(Ipv4Addr::from(bits))
}

/// Returns the IPv6 mask with the top `prefix_len` bits set.
///
/// The mask is assembled over four 32-bit words: full words are all ones, the
/// word the prefix ends in is partially set from the top, the rest are zero.
///
/// # Errors
///
/// Returns an error if `prefix_len` exceeds 128.
pub fn ipv6_prefix_mask(prefix_len: u8) -> Result<Ipv6Addr, ParseError> {
    if prefix_len > IPV6_MAX_PREFIX {
        return Err(ParseError::InvalidPrefixLength {
            value: prefix_len.to_string(),
            max: IPV6_MAX_PREFIX,
        });
    }

    let mut octets = [0u8; 16];
    let mut remaining = u32::from(prefix_len);
    for word in octets.chunks_exact_mut(4) {
        let bits = match remaining {
            0 => 0,
            n if n >= 32 => u32::MAX,
            n => u32::MAX << (32 - n),
        };
        word.copy_from_slice(&bits.to_be_bytes());
        remaining = remaining.saturating_sub(32);
    }
    Ok(Ipv6Addr::from(octets))
}

/// Decodes an IPv4 CIDR prefix length (`0..=32`) into its mask.
pub fn parse_ipv4_prefix(s: &str) -> Result<Ipv4Addr, ParseError> {
    ipv4_prefix_mask(parse_prefix_len(s, IPV4_MAX_PREFIX)?)
}

/// Decodes an IPv6 CIDR prefix length (`0..=128`) into its mask.
pub fn parse_ipv6_prefix(s: &str) -> Result<Ipv6Addr, ParseError> {
    ipv6_prefix_mask(parse_prefix_len(s, IPV6_MAX_PREFIX)?)
}
