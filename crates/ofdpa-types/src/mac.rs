//! MAC address type with multi-layout parsing and big-endian sequencing.

use crate::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A 48-bit Ethernet MAC address.
///
/// # Examples
///
/// ```
/// use ofdpa_types::MacAddress;
///
/// let mac: MacAddress = "00:11:22:33:44:55".parse().unwrap();
/// assert_eq!(mac.to_string(), "00:11:22:33:44:55");
///
/// // Dash-separated octets and dotted 16-bit groups decode to the same address
/// let dashed: MacAddress = "00-11-22-33-44-55".parse().unwrap();
/// let dotted: MacAddress = "0011.2233.4455".parse().unwrap();
/// assert_eq!(mac, dashed);
/// assert_eq!(mac, dotted);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MacAddress([u8; 6]);

impl MacAddress {
    /// The all-ones MAC address (FF:FF:FF:FF:FF:FF), also the exact-match mask.
    pub const BROADCAST: MacAddress = MacAddress([0xff, 0xff, 0xff, 0xff, 0xff, 0xff]);

    /// The zero MAC address (00:00:00:00:00:00), also the wildcard mask.
    pub const ZERO: MacAddress = MacAddress([0, 0, 0, 0, 0, 0]);

    /// Creates a new MAC address from raw bytes.
    pub const fn new(bytes: [u8; 6]) -> Self {
        MacAddress(bytes)
    }

    /// Returns the raw bytes of the MAC address.
    pub const fn as_bytes(&self) -> &[u8; 6] {
        &self.0
    }

    /// Returns true if this is the zero address.
    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    /// Returns the next address, treating the six bytes as a big-endian counter.
    ///
    /// The last byte is incremented and the carry ripples left while a byte wraps
    /// to zero. Incrementing the all-ones address wraps to all zeros.
    ///
    /// ```
    /// use ofdpa_types::MacAddress;
    ///
    /// let mac = MacAddress::new([0, 0, 0, 0, 0, 0xff]);
    /// assert_eq!(mac.successor(), MacAddress::new([0, 0, 0, 0, 1, 0]));
    /// assert_eq!(MacAddress::BROADCAST.successor(), MacAddress::ZERO);
    /// ```
    #[must_use]
    pub fn successor(&self) -> Self {
        let mut bytes = self.0;
        for byte in bytes.iter_mut().rev() {
            *byte = byte.wrapping_add(1);
            if *byte != 0 {
                break;
            }
        }
        MacAddress(bytes)
    }

    /// Advances this address in place to its [`successor`](Self::successor).
    pub fn increment(&mut self) {
        *self = self.successor();
    }

    /// Formats the address as three dotted 16-bit groups (`xxxx.xxxx.xxxx`).
    pub fn dotted(&self) -> Dotted<'_> {
        Dotted(self)
    }
}

/// Display adapter returned by [`MacAddress::dotted`].
pub struct Dotted<'a>(&'a MacAddress);

impl fmt::Display for Dotted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let b = &self.0 .0;
        write!(
            f,
            "{:02x}{:02x}.{:02x}{:02x}.{:02x}{:02x}",
            b[0], b[1], b[2], b[3], b[4], b[5]
        )
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
            self.0[0], self.0[1], self.0[2], self.0[3], self.0[4], self.0[5]
        )
    }
}

/// Textual MAC layouts, in the order [`MacAddress::from_str`] tries them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacLayout {
    /// `01:02:03:04:05:06`
    Colon,
    /// `01-02-03-04-05-06`
    Dash,
    /// `0102.0304.0506`, each group in network byte order
    Dotted,
}

impl MacLayout {
    /// Candidate layouts in decode order.
    pub const ALL: [MacLayout; 3] = [MacLayout::Colon, MacLayout::Dash, MacLayout::Dotted];

    /// Decodes `s` in this layout, or `None` if it does not match.
    pub fn parse(self, s: &str) -> Option<MacAddress> {
        match self {
            MacLayout::Colon => parse_octets(s, ':'),
            MacLayout::Dash => parse_octets(s, '-'),
            MacLayout::Dotted => parse_groups(s),
        }
    }
}

fn parse_hex(s: &str, max_digits: usize) -> Option<u16> {
    if s.is_empty() || s.len() > max_digits || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u16::from_str_radix(s, 16).ok()
}

fn parse_octets(s: &str, separator: char) -> Option<MacAddress> {
    let mut bytes = [0u8; 6];
    let mut parts = s.split(separator);
    for byte in bytes.iter_mut() {
        *byte = u8::try_from(parse_hex(parts.next()?, 2)?).ok()?;
    }
    if parts.next().is_some() {
        return None;
    }
    Some(MacAddress(bytes))
}

fn parse_groups(s: &str) -> Option<MacAddress> {
    let mut bytes = [0u8; 6];
    let mut parts = s.split('.');
    for chunk in bytes.chunks_exact_mut(2) {
        let group = parse_hex(parts.next()?, 4)?;
        chunk.copy_from_slice(&group.to_be_bytes());
    }
    if parts.next().is_some() {
        return None;
    }
    Some(MacAddress(bytes))
}

impl FromStr for MacAddress {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        MacLayout::ALL
            .iter()
            .find_map(|layout| layout.parse(text))
            .ok_or_else(|| ParseError::InvalidMacAddress(s.to_string()))
    }
}

impl TryFrom<String> for MacAddress {
    type Error = ParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<MacAddress> for String {
    fn from(mac: MacAddress) -> String {
        mac.to_string()
    }
}

impl From<[u8; 6]> for MacAddress {
    fn from(bytes: [u8; 6]) -> Self {
        MacAddress(bytes)
    }
}
