//! Block size calculation.
//!
//! A subnet whose host portion is `B` bits wide offers `2^B - 2` usable
//! addresses: the first is the network address, the last the broadcast.

use crate::ip::Prefix;

use super::parser::Demand;

/// Total hosts a demand needs, reserve included.
///
/// `H + ceil(H * R / 100)`, computed in integers.
pub fn total_hosts(demand: &Demand) -> u64 {
    let hosts = u64::from(demand.initial_hosts);
    let reserve = u64::from(demand.reserve_percent);
    hosts + (hosts * reserve).div_ceil(100)
}

/// Smallest host portion width `B` with `2^B - 2 >= total_hosts(demand)`.
///
/// # Examples
/// ```
/// use vlsmplan::demand::{required_bits, Demand};
///
/// // 500 hosts with 150% reserve -> 1250 hosts -> 11 bits (2046 usable)
/// assert_eq!(required_bits(&Demand::new(500, 150)), 11);
/// ```
pub fn required_bits(demand: &Demand) -> u32 {
    let total = u128::from(total_hosts(demand));
    let mut bits = 0u32;
    while (1u128 << bits) < total + 2 {
        bits += 1;
    }
    bits
}

/// A demand annotated with its block size and its position in the input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizedDemand {
    pub demand: Demand,
    /// 0-based position among the expanded demands
    pub index: usize,
    /// Hosts required including reserve
    pub total_hosts: u64,
    /// Host portion width in bits
    pub block_bits: u32,
}

impl SizedDemand {
    pub fn new(demand: Demand, index: usize) -> Self {
        SizedDemand {
            demand,
            index,
            total_hosts: total_hosts(&demand),
            block_bits: required_bits(&demand),
        }
    }

    /// Prefix of a subnet sized for this demand, if it fits in IPv4 at all
    pub fn subnet_prefix(&self) -> Option<Prefix> {
        Prefix::for_host_bits(self.block_bits)
    }

    /// Usable addresses of a block sized for this demand
    pub fn capacity(&self) -> u64 {
        (1u64 << self.block_bits.min(63)).saturating_sub(2)
    }
}
