//! Address text parsing and mask/prefix conversion.

use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

use serde::{Serialize, Serializer};

/// Errors for malformed address, mask, or prefix input
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddressError {
    #[error("Invalid IPv4 address: '{text}'")]
    InvalidAddressText { text: String },

    #[error("Invalid subnet mask: '{mask}' (ones must be contiguous from the left)")]
    InvalidMask { mask: String },

    #[error("Invalid prefix: '{prefix}' (must be between 0 and 32)")]
    InvalidPrefix { prefix: String },

    #[error("Invalid network notation: '{text}' (expected a.b.c.d or a.b.c.d/p)")]
    InvalidCidr { text: String },
}

/// Number of leading network bits, always within `0..=32`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Prefix(u8);

impl Prefix {
    pub const MAX: u8 = 32;

    pub fn new(len: u8) -> Result<Self, AddressError> {
        if len > Self::MAX {
            return Err(AddressError::InvalidPrefix {
                prefix: len.to_string(),
            });
        }
        Ok(Prefix(len))
    }

    /// Prefix of a block whose host portion is `bits` wide
    pub fn for_host_bits(bits: u32) -> Option<Self> {
        u32::from(Self::MAX)
            .checked_sub(bits)
            .map(|len| Prefix(len as u8))
    }

    pub fn len(self) -> u8 {
        self.0
    }

    /// Width of the host portion in bits
    pub fn host_bits(self) -> u32 {
        u32::from(Self::MAX - self.0)
    }

    /// The 32-bit mask with `len` leading ones
    pub fn mask_bits(self) -> u32 {
        match self.0 {
            0 => 0,
            len => u32::MAX << (32 - u32::from(len)),
        }
    }

    pub fn mask(self) -> Ipv4Addr {
        Ipv4Addr::from(self.mask_bits())
    }
}

impl FromStr for Prefix {
    type Err = AddressError;

    /// Accepts `24` as well as `/24`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.trim().strip_prefix('/').unwrap_or(s.trim());
        let invalid = || AddressError::InvalidPrefix {
            prefix: s.to_string(),
        };
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let len: u8 = digits.parse().map_err(|_| invalid())?;
        Prefix::new(len).map_err(|_| invalid())
    }
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.0)
    }
}

impl Serialize for Prefix {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.0)
    }
}

/// Parse dotted-decimal IPv4 text
pub fn parse_address(text: &str) -> Result<Ipv4Addr, AddressError> {
    text.trim()
        .parse::<Ipv4Addr>()
        .map_err(|_| AddressError::InvalidAddressText {
            text: text.to_string(),
        })
}

/// Parse `a.b.c.d` or `a.b.c.d/p` into an address and optional prefix
pub fn parse_cidr(text: &str) -> Result<(Ipv4Addr, Option<Prefix>), AddressError> {
    match text.trim().split_once('/') {
        None => Ok((parse_address(text)?, None)),
        Some((addr, prefix)) => {
            if prefix.contains('/') {
                return Err(AddressError::InvalidCidr {
                    text: text.to_string(),
                });
            }
            Ok((parse_address(addr)?, Some(prefix.parse()?)))
        }
    }
}

/// Convert a prefix length to its dotted mask.
///
/// # Examples
/// ```
/// use vlsmplan::ip::prefix_to_mask;
///
/// assert_eq!(prefix_to_mask(20).unwrap().to_string(), "255.255.240.0");
/// assert!(prefix_to_mask(33).is_err());
/// ```
pub fn prefix_to_mask(prefix: u8) -> Result<Ipv4Addr, AddressError> {
    Ok(Prefix::new(prefix)?.mask())
}

/// Convert a dotted mask to its prefix length.
///
/// The mask must be a run of leading ones followed only by zeros.
pub fn mask_to_prefix(mask: Ipv4Addr) -> Result<Prefix, AddressError> {
    let bits = u32::from(mask);
    let host = !bits;
    // The host part must be of the form 0..01..1
    if host & host.wrapping_add(1) != 0 {
        return Err(AddressError::InvalidMask {
            mask: mask.to_string(),
        });
    }
    Prefix::new(bits.leading_ones() as u8)
}

/// Parse mask text and convert it to a prefix
pub fn parse_mask(text: &str) -> Result<Prefix, AddressError> {
    let mask = text
        .trim()
        .parse::<Ipv4Addr>()
        .map_err(|_| AddressError::InvalidMask {
            mask: text.to_string(),
        })?;
    mask_to_prefix(mask)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_all_prefixes() {
        for len in 0..=32u8 {
            let mask = prefix_to_mask(len).unwrap();
            assert_eq!(mask_to_prefix(mask).unwrap().len(), len);
        }
    }

    #[test]
    fn test_known_masks() {
        assert_eq!(prefix_to_mask(0).unwrap(), Ipv4Addr::new(0, 0, 0, 0));
        assert_eq!(prefix_to_mask(10).unwrap(), Ipv4Addr::new(255, 192, 0, 0));
        assert_eq!(prefix_to_mask(24).unwrap(), Ipv4Addr::new(255, 255, 255, 0));
        assert_eq!(prefix_to_mask(32).unwrap(), Ipv4Addr::new(255, 255, 255, 255));
        assert_eq!(parse_mask("255.255.255.252").unwrap().len(), 30);
    }

    #[test]
    fn test_rejects_non_contiguous_masks() {
        for mask in ["255.255.255.1", "255.0.255.0", "0.255.255.255", "255.255.253.0"] {
            assert_eq!(
                parse_mask(mask),
                Err(AddressError::InvalidMask { mask: mask.to_string() })
            );
        }
        assert!(parse_mask("255.255.256.0").is_err());
    }

    #[test]
    fn test_rejects_invalid_prefix() {
        assert_eq!(
            prefix_to_mask(33),
            Err(AddressError::InvalidPrefix { prefix: "33".to_string() })
        );
        assert!("".parse::<Prefix>().is_err());
        assert!("/-1".parse::<Prefix>().is_err());
        assert!("/40".parse::<Prefix>().is_err());
        assert_eq!("/12".parse::<Prefix>().unwrap().len(), 12);
        assert_eq!("8".parse::<Prefix>().unwrap().len(), 8);
    }

    #[test]
    fn test_parse_cidr() {
        let (addr, prefix) = parse_cidr("192.168.20.0/24").unwrap();
        assert_eq!(addr, Ipv4Addr::new(192, 168, 20, 0));
        assert_eq!(prefix.map(Prefix::len), Some(24));

        assert_eq!(parse_cidr("10.1.2.3").unwrap().1, None);
        assert!(matches!(parse_cidr("10.1.2/8"), Err(AddressError::InvalidAddressText { .. })));
        assert!(matches!(parse_cidr("10.1.2.3/8/8"), Err(AddressError::InvalidCidr { .. })));
        assert!(matches!(parse_cidr("10.1.2.3/33"), Err(AddressError::InvalidPrefix { .. })));
    }
}
