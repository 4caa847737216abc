//! IPv4 network blocks.
//!
//! A [`Network`] is a block of `2^(32 - prefix)` addresses starting at its
//! base address. Blocks built with [`Network::containing`] are always aligned
//! to their prefix; planned subnets inherit the alignment of the parent they
//! were carved from, which need not be aligned itself.

use std::fmt;
use std::net::Ipv4Addr;

use serde::Serialize;

use super::mask::Prefix;

/// One past the highest IPv4 address
pub const ADDRESS_SPACE_END: u64 = 1 << 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Network {
    base: Ipv4Addr,
    prefix: Prefix,
}

impl Network {
    /// The network of the given prefix that contains `addr`
    pub fn containing(addr: Ipv4Addr, prefix: Prefix) -> Self {
        Network {
            base: Ipv4Addr::from(u32::from(addr) & prefix.mask_bits()),
            prefix,
        }
    }

    /// A block of the given prefix starting exactly at `base`
    pub fn anchored(base: Ipv4Addr, prefix: Prefix) -> Self {
        Network { base, prefix }
    }

    /// The prefix-aligned network this block's base belongs to
    pub fn aligned(&self) -> Self {
        Network::containing(self.base, self.prefix)
    }

    pub fn base(&self) -> Ipv4Addr {
        self.base
    }

    pub fn prefix(&self) -> Prefix {
        self.prefix
    }

    pub fn mask(&self) -> Ipv4Addr {
        self.prefix.mask()
    }

    /// Whether the low `32 - prefix` bits of the base are zero
    pub fn is_aligned(&self) -> bool {
        u32::from(self.base) & !self.prefix.mask_bits() == 0
    }

    /// Number of addresses in the block
    pub fn size(&self) -> u64 {
        1u64 << self.prefix.host_bits()
    }

    /// First address of the block as an integer
    pub fn start(&self) -> u64 {
        u64::from(u32::from(self.base))
    }

    /// One past the last address, clipped to the IPv4 space
    pub fn end(&self) -> u64 {
        (self.start() + self.size()).min(ADDRESS_SPACE_END)
    }

    pub fn network_address(&self) -> Ipv4Addr {
        self.base
    }

    pub fn broadcast_address(&self) -> Ipv4Addr {
        Ipv4Addr::from((self.end() - 1) as u32)
    }

    /// Usable host addresses; zero for /31 and /32
    pub fn max_hosts(&self) -> u64 {
        self.size().saturating_sub(2)
    }

    pub fn first_host(&self) -> Option<Ipv4Addr> {
        (self.max_hosts() > 0).then(|| Ipv4Addr::from(u32::from(self.base) + 1))
    }

    pub fn last_host(&self) -> Option<Ipv4Addr> {
        (self.max_hosts() > 0).then(|| Ipv4Addr::from((self.end() - 2) as u32))
    }

    /// Address directly following the block, if any
    pub fn next_address(&self) -> Option<Ipv4Addr> {
        (self.end() < ADDRESS_SPACE_END).then(|| Ipv4Addr::from(self.end() as u32))
    }

    pub fn contains(&self, addr: Ipv4Addr) -> bool {
        let addr = u64::from(u32::from(addr));
        self.start() <= addr && addr < self.end()
    }

    /// Whether `other` lies entirely inside this block
    pub fn covers(&self, other: &Network) -> bool {
        self.start() <= other.start() && other.end() <= self.end()
    }

    pub fn overlaps(&self, other: &Network) -> bool {
        self.start() < other.end() && other.start() < self.end()
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.base, self.prefix)
    }
}
