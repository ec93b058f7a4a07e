//! Unsigned integer literals with domain bounds.
//!
//! Literals are decimal, or hexadecimal with a `0x`/`0X` prefix. Surrounding
//! whitespace is ignored; anything else (signs, trailing garbage, empty text)
//! is rejected.

use crate::ParseError;

/// Parses an unsigned literal into a `u64`.
pub fn parse_literal(s: &str) -> Result<u64, ParseError> {
    let text = s.trim();
    let (digits, radix) = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => (hex, 16),
        None => (text, 10),
    };

    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return Err(ParseError::InvalidInteger(s.to_string()));
    }

    u64::from_str_radix(digits, radix).map_err(|_| ParseError::InvalidInteger(s.to_string()))
}

/// Parses an unsigned literal and checks it against an inclusive upper bound.
///
/// # Examples
///
/// ```
/// use ofdpa_types::int::parse_bounded;
///
/// let vlan: u16 = parse_bounded("0xfff", 4095).unwrap();
/// assert_eq!(vlan, 4095);
/// assert!(parse_bounded::<u16>("4096", 4095).is_err());
/// ```
pub fn parse_bounded<T>(s: &str, max: T) -> Result<T, ParseError>
where
    T: Copy + Into<u64> + TryFrom<u64>,
{
    let value = parse_literal(s)?;
    let max: u64 = max.into();
    if value > max {
        return Err(ParseError::OutOfRange { value, max });
    }
    T::try_from(value).map_err(|_| ParseError::OutOfRange { value, max })
}

/// Parses a literal that must fit the full width of `T`.
pub fn parse_unsigned<T>(s: &str) -> Result<T, ParseError>
where
    T: Copy + Into<u64> + TryFrom<u64> + Bounded,
{
    parse_bounded(s, T::MAX_VALUE)
}

/// Largest representable value of an unsigned integer type.
pub trait Bounded {
    const MAX_VALUE: Self;
}

macro_rules! impl_bounded {
    ($($t:ty),*) => {
        $(impl Bounded for $t {
            const MAX_VALUE: Self = <$t>::MAX;
        })*
    };
}

impl_bounded!(u8, u16, u32, u64);
