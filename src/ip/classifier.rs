//! Classful address classification.

use std::fmt;
use std::net::Ipv4Addr;

use serde::Serialize;

use super::mask::Prefix;
use super::network::Network;
use super::registry::{SpecialUseRecord, SPECIAL_USE};

/// Classful address class, decided by the leading bits of the first octet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AddressClass {
    /// `0xxxxxxx`
    A,
    /// `10xxxxxx`
    B,
    /// `110xxxxx`
    C,
    /// `1110xxxx`, multicast
    D,
    /// `1111xxxx`, reserved
    E,
}

impl AddressClass {
    pub fn of(addr: Ipv4Addr) -> Self {
        match addr.octets()[0].leading_ones() {
            0 => AddressClass::A,
            1 => AddressClass::B,
            2 => AddressClass::C,
            3 => AddressClass::D,
            _ => AddressClass::E,
        }
    }

    /// Classful default prefix; D and E have none
    pub fn default_prefix(self) -> Option<Prefix> {
        let len = match self {
            AddressClass::A => 8,
            AddressClass::B => 16,
            AddressClass::C => 24,
            AddressClass::D | AddressClass::E => return None,
        };
        Prefix::new(len).ok()
    }
}

impl fmt::Display for AddressClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            AddressClass::A => "A",
            AddressClass::B => "B",
            AddressClass::C => "C",
            AddressClass::D => "D",
            AddressClass::E => "E",
        };
        f.write_str(letter)
    }
}

/// Everything known about a single address
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub address: Ipv4Addr,
    pub class: AddressClass,
    pub default_prefix: Option<Prefix>,
    pub default_mask: Option<Ipv4Addr>,
    pub special_use: Option<SpecialUseRecord>,
    /// Network containing the address at a caller-supplied prefix
    pub custom_network: Option<Network>,
}

/// Classify an address, optionally resolving its network at `custom_prefix`.
///
/// # Examples
/// ```
/// use std::net::Ipv4Addr;
/// use vlsmplan::ip::{classify, AddressClass};
///
/// let info = classify(Ipv4Addr::new(172, 16, 5, 0), None);
/// assert_eq!(info.class, AddressClass::B);
/// assert_eq!(info.special_use.unwrap().rfc, "RFC 1918");
/// ```
pub fn classify(address: Ipv4Addr, custom_prefix: Option<Prefix>) -> Classification {
    let class = AddressClass::of(address);
    let default_prefix = class.default_prefix();

    Classification {
        address,
        class,
        default_prefix,
        default_mask: default_prefix.map(Prefix::mask),
        special_use: SPECIAL_USE.lookup(address).cloned(),
        custom_network: custom_prefix.map(|prefix| Network::containing(address, prefix)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_boundaries() {
        let cases = [
            (Ipv4Addr::new(0, 0, 0, 1), AddressClass::A),
            (Ipv4Addr::new(127, 255, 255, 255), AddressClass::A),
            (Ipv4Addr::new(128, 0, 0, 0), AddressClass::B),
            (Ipv4Addr::new(191, 255, 0, 0), AddressClass::B),
            (Ipv4Addr::new(192, 0, 0, 0), AddressClass::C),
            (Ipv4Addr::new(223, 1, 1, 1), AddressClass::C),
            (Ipv4Addr::new(224, 0, 0, 1), AddressClass::D),
            (Ipv4Addr::new(239, 255, 255, 255), AddressClass::D),
            (Ipv4Addr::new(240, 0, 0, 0), AddressClass::E),
            (Ipv4Addr::BROADCAST, AddressClass::E),
        ];
        for (addr, class) in cases {
            assert_eq!(AddressClass::of(addr), class, "{}", addr);
        }
    }

    #[test]
    fn test_defaults() {
        let info = classify(Ipv4Addr::new(10, 4, 0, 1), None);
        assert_eq!(info.default_prefix.map(Prefix::len), Some(8));
        assert_eq!(info.default_mask, Some(Ipv4Addr::new(255, 0, 0, 0)));
        assert_eq!(info.custom_network, None);

        let multicast = classify(Ipv4Addr::new(224, 0, 0, 251), None);
        assert_eq!(multicast.class, AddressClass::D);
        assert_eq!(multicast.default_prefix, None);
        assert_eq!(multicast.default_mask, None);
        assert_eq!(multicast.special_use.unwrap().label, "Multicast");
    }

    #[test]
    fn test_custom_prefix_network() {
        let info = classify(Ipv4Addr::new(142, 212, 80, 8), Some(Prefix::new(19).unwrap()));
        assert_eq!(info.class, AddressClass::B);
        assert_eq!(info.special_use, None);
        assert_eq!(info.custom_network.unwrap().to_string(), "142.212.64.0/19");
    }
}
