//! Special-use address registry.
//!
//! This file holds the table of IANA special-use IPv4 blocks (RFC 5735 and
//! its successors) and answers longest-prefix-match queries against it.
//! The table is built once per process and never changes afterwards.

use std::fmt;
use std::net::Ipv4Addr;
use std::sync::LazyLock;

use serde::Serialize;

use super::mask::Prefix;
use super::network::Network;

/// Address block, RFC citation, label, and whether the block may be subnetted
const SPECIAL_USE_BLOCKS: &[([u8; 4], u8, &str, &str, bool)] = &[
    ([0, 0, 0, 0], 8, "RFC 1122, Section 3.2.1.3", "\"This\" Network", false),
    ([10, 0, 0, 0], 8, "RFC 1918", "Private-Use Networks", true),
    ([127, 0, 0, 0], 8, "RFC 1122, Section 3.2.1.3", "Loopback", false),
    ([169, 254, 0, 0], 16, "RFC 3927", "Link Local", false),
    ([172, 16, 0, 0], 12, "RFC 1918", "Private-Use Networks", true),
    ([192, 0, 0, 0], 24, "RFC 5736", "IETF Protocol Assignments", false),
    ([192, 0, 2, 0], 24, "RFC 5737", "TEST-NET-1", false),
    ([192, 88, 99, 0], 24, "RFC 3068", "6to4 Relay Anycast", false),
    ([192, 168, 0, 0], 16, "RFC 1918", "Private-Use Networks", true),
    ([198, 18, 0, 0], 15, "RFC 2544", "Network Interconnect Device Benchmark Testing", false),
    ([198, 51, 100, 0], 24, "RFC 5737", "TEST-NET-2", false),
    ([203, 0, 113, 0], 24, "RFC 5737", "TEST-NET-3", false),
    ([224, 0, 0, 0], 4, "RFC 3171", "Multicast", false),
    ([240, 0, 0, 0], 4, "RFC 1112, Section 4", "Reserved for Future Use", false),
    ([255, 255, 255, 255], 32, "RFC 919, Section 7; RFC 922, Section 7", "Limited Broadcast", false),
];

/// A special-use address block
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpecialUseRecord {
    pub network: Network,
    pub rfc: &'static str,
    pub label: &'static str,
    /// Only private-use space may be carved into subnets
    pub subnettable: bool,
}

impl fmt::Display for SpecialUseRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.label, self.rfc)
    }
}

/// Registry of special-use blocks, ordered longest prefix first
#[derive(Debug)]
pub struct SpecialUseRegistry {
    records: Vec<SpecialUseRecord>,
}

/// The IANA special-use table, loaded on first use
pub static SPECIAL_USE: LazyLock<SpecialUseRegistry> = LazyLock::new(SpecialUseRegistry::iana);

impl SpecialUseRegistry {
    pub fn new(mut records: Vec<SpecialUseRecord>) -> Self {
        // Stable sort keeps table order among equal prefix lengths
        records.sort_by(|a, b| b.network.prefix().cmp(&a.network.prefix()));
        SpecialUseRegistry { records }
    }

    /// Registry of the well-known IANA special-use blocks
    pub fn iana() -> Self {
        let records = SPECIAL_USE_BLOCKS
            .iter()
            .filter_map(|&(octets, len, rfc, label, subnettable)| {
                let prefix = Prefix::new(len).ok()?;
                Some(SpecialUseRecord {
                    network: Network::containing(Ipv4Addr::from(octets), prefix),
                    rfc,
                    label,
                    subnettable,
                })
            })
            .collect();
        Self::new(records)
    }

    /// Most specific block containing `addr`
    pub fn lookup(&self, addr: Ipv4Addr) -> Option<&SpecialUseRecord> {
        self.records.iter().find(|record| record.network.contains(addr))
    }

    /// All blocks sharing at least one address with `network`
    pub fn overlapping<'a>(
        &'a self,
        network: &'a Network,
    ) -> impl Iterator<Item = &'a SpecialUseRecord> + 'a {
        self.records.iter().filter(move |record| record.network.overlaps(network))
    }

    pub fn records(&self) -> &[SpecialUseRecord] {
        &self.records
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_private_use_lookup() {
        for addr in [Ipv4Addr::new(10, 1, 2, 3), Ipv4Addr::new(172, 31, 255, 1), Ipv4Addr::new(192, 168, 20, 0)] {
            let record = SPECIAL_USE.lookup(addr).unwrap();
            assert_eq!(record.rfc, "RFC 1918");
            assert!(record.subnettable);
        }
        assert!(SPECIAL_USE.lookup(Ipv4Addr::new(172, 32, 0, 0)).is_none());
    }

    #[test]
    fn test_longest_prefix_wins() {
        let record = SPECIAL_USE.lookup(Ipv4Addr::new(192, 0, 2, 77)).unwrap();
        assert_eq!(record.label, "TEST-NET-1");
        assert_eq!(record.to_string(), "TEST-NET-1 (RFC 5737)");

        // 255.255.255.255 is inside 240.0.0.0/4 but the /32 is more specific
        let record = SPECIAL_USE.lookup(Ipv4Addr::BROADCAST).unwrap();
        assert_eq!(record.label, "Limited Broadcast");

        let record = SPECIAL_USE.lookup(Ipv4Addr::new(255, 255, 255, 254)).unwrap();
        assert_eq!(record.label, "Reserved for Future Use");
    }

    #[test]
    fn test_public_addresses_have_no_record() {
        for addr in [Ipv4Addr::new(8, 8, 8, 8), Ipv4Addr::new(142, 212, 80, 8), Ipv4Addr::new(198, 20, 0, 1)] {
            assert!(SPECIAL_USE.lookup(addr).is_none(), "{} should be public", addr);
        }
    }

    #[test]
    fn test_records_sorted_by_specificity() {
        let lens: Vec<u8> = SPECIAL_USE.records().iter().map(|r| r.network.prefix().len()).collect();
        assert!(lens.windows(2).all(|w| w[0] >= w[1]));
        assert_eq!(lens.len(), SPECIAL_USE_BLOCKS.len());
    }

    #[test]
    fn test_overlapping_blocks() {
        let parent = Network::containing(Ipv4Addr::new(192, 0, 0, 0), Prefix::new(16).unwrap());
        let labels: Vec<&str> = SPECIAL_USE.overlapping(&parent).map(|r| r.label).collect();
        assert_eq!(labels, vec!["IETF Protocol Assignments", "TEST-NET-1"]);
    }
}
