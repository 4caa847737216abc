//! VLSM subnet allocation.
//!
//! This file contains the greedy largest-first allocation algorithm: demands
//! are sized, sorted by descending block size, and carved one after another
//! from the parent network starting at its base address. Placement never
//! passes the end of the prefix-aligned network that base belongs to, even
//! when the base itself is not aligned. A demand that cannot
//! be placed becomes a [`PlacementFailure`] carrying bit-level diagnostics;
//! the run always continues so every demand gets a result.

use std::net::Ipv4Addr;

use crate::demand::{Demand, SizedDemand};

use super::mask::Prefix;
use super::network::Network;

/// A demand that received a subnet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacedSubnet {
    pub network: Network,
    pub demand: SizedDemand,
}

impl PlacedSubnet {
    pub fn max_hosts(&self) -> u64 {
        self.network.max_hosts()
    }
}

/// A demand that could not be placed, with the reasons in bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacementFailure {
    pub demand: SizedDemand,
    /// Host portion the demand needs
    pub host_portion_bits: u32,
    /// Host bits that would overlap space already committed
    pub colliding_bits: u32,
    /// Subnetting bits left between the parent prefix and the host portion
    pub subnet_portion_bits: u32,
    /// Subnetting bits needed beyond those available
    pub exploding_bits: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocationResult {
    Placed(PlacedSubnet),
    Failed(PlacementFailure),
}

impl AllocationResult {
    pub fn demand(&self) -> &SizedDemand {
        match self {
            AllocationResult::Placed(placed) => &placed.demand,
            AllocationResult::Failed(failure) => &failure.demand,
        }
    }

    pub fn placed(&self) -> Option<&PlacedSubnet> {
        match self {
            AllocationResult::Placed(placed) => Some(placed),
            AllocationResult::Failed(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&PlacementFailure> {
        match self {
            AllocationResult::Placed(_) => None,
            AllocationResult::Failed(failure) => Some(failure),
        }
    }

    pub fn is_placed(&self) -> bool {
        matches!(self, AllocationResult::Placed(_))
    }
}

/// True when every demand was placed
pub fn all_placed(results: &[AllocationResult]) -> bool {
    results.iter().all(AllocationResult::is_placed)
}

/// Bits needed to number `count` subnets
pub fn subnet_bits_for(count: usize) -> u32 {
    match count {
        0 | 1 => 0,
        n => usize::BITS - (n - 1).leading_zeros(),
    }
}

/// Widest aligned block that still fits into `remaining` addresses
fn fitting_host_bits(remaining: u64) -> u32 {
    match remaining {
        0 => 0,
        n => 63 - n.leading_zeros(),
    }
}

/// Longest parent prefix that holds every demand, assuming an aligned base.
///
/// `None` when the blocks together need more than the IPv4 space.
pub fn suggested_parent_prefix(demands: &[SizedDemand]) -> Option<Prefix> {
    let mut total: u128 = 0;
    let mut widest = 0;
    for demand in demands {
        total += 1u128.checked_shl(demand.block_bits)?;
        widest = widest.max(demand.block_bits);
    }

    // Packing power-of-two blocks largest first leaves no gaps
    let host_bits = total.next_power_of_two().trailing_zeros().max(widest + 1);
    Prefix::for_host_bits(host_bits)
}

/// Allocate one subnet per demand inside `parent`.
///
/// Placement starts at the parent's base address as given and ends with the
/// aligned network of the parent's prefix, so an unaligned base leaves less
/// room than the prefix suggests.
///
/// Results come back in input order, one per demand, even though placement
/// happens largest block first. Ties keep their input order.
pub fn allocate(parent: &Network, demands: &[Demand]) -> Vec<AllocationResult> {
    let mut sized: Vec<SizedDemand> = demands
        .iter()
        .enumerate()
        .map(|(index, demand)| SizedDemand::new(*demand, index))
        .collect();
    sized.sort_by(|a, b| b.block_bits.cmp(&a.block_bits).then(a.index.cmp(&b.index)));

    let parent_host_bits = parent.prefix().host_bits();
    let required_subnet_bits = subnet_bits_for(demands.len());
    let end = parent.aligned().end();
    let mut cursor = parent.start();

    log::info!(
        "Allocating {} subnet(s) in {} ({} host bits, {} subnetting bit(s) needed)",
        demands.len(),
        parent,
        parent_host_bits,
        required_subnet_bits
    );

    let mut results: Vec<(usize, AllocationResult)> = Vec::with_capacity(sized.len());
    for demand in sized {
        let available_host_bits = fitting_host_bits(end - cursor);
        let bits = demand.block_bits;

        // A single subnet may never take the whole parent: there are always others
        let fits = bits < parent_host_bits && bits <= available_host_bits;
        let prefix = match Prefix::for_host_bits(bits) {
            Some(prefix) if fits => prefix,
            _ => {
                let subnet_portion_bits = parent_host_bits.saturating_sub(bits);
                let failure = PlacementFailure {
                    demand,
                    host_portion_bits: bits,
                    colliding_bits: bits.saturating_sub(available_host_bits),
                    subnet_portion_bits,
                    exploding_bits: required_subnet_bits.saturating_sub(subnet_portion_bits),
                };
                log::debug!(
                    "Demand #{} ({} hosts, {} bits) does not fit: {} colliding, {} exploding",
                    demand.index + 1,
                    demand.total_hosts,
                    bits,
                    failure.colliding_bits,
                    failure.exploding_bits
                );
                results.push((demand.index, AllocationResult::Failed(failure)));
                continue;
            }
        };

        let network = Network::anchored(Ipv4Addr::from(cursor as u32), prefix);
        cursor += network.size();

        log::debug!(
            "Demand #{} ({} hosts) placed at {}",
            demand.index + 1,
            demand.total_hosts,
            network
        );
        results.push((demand.index, AllocationResult::Placed(PlacedSubnet { network, demand })));
    }

    results.sort_by_key(|(index, _)| *index);
    results.into_iter().map(|(_, result)| result).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demand::parse_demands;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn parent(a: u8, b: u8, c: u8, d: u8, len: u8) -> Network {
        Network::anchored(Ipv4Addr::new(a, b, c, d), Prefix::new(len).unwrap())
    }

    #[test]
    fn test_subnet_bits_for() {
        assert_eq!(subnet_bits_for(1), 0);
        assert_eq!(subnet_bits_for(2), 1);
        assert_eq!(subnet_bits_for(3), 2);
        assert_eq!(subnet_bits_for(4), 2);
        assert_eq!(subnet_bits_for(5), 3);
    }

    #[test]
    fn test_largest_first_in_input_order() {
        let demands = parse_demands("40:300 10:100 500:150 30:300").unwrap();
        let results = allocate(&parent(172, 16, 5, 0, 16), &demands);

        let cidrs: Vec<String> = results
            .iter()
            .map(|r| r.placed().unwrap().network.to_string())
            .collect();
        assert_eq!(
            cidrs,
            vec!["172.16.13.0/24", "172.16.14.128/27", "172.16.5.0/21", "172.16.14.0/25"]
        );
        let hosts: Vec<u64> = results.iter().map(|r| r.placed().unwrap().max_hosts()).collect();
        assert_eq!(hosts, vec![254, 30, 2046, 126]);
    }

    #[test]
    fn test_whole_parent_demands_fail() {
        let demands = parse_demands("200:0x2").unwrap();
        let results = allocate(&parent(192, 168, 20, 0, 24), &demands);

        assert_eq!(results.len(), 2);
        for result in &results {
            let failure = result.failure().unwrap();
            assert_eq!(failure.host_portion_bits, 8);
            assert_eq!(failure.colliding_bits, 0);
            assert_eq!(failure.subnet_portion_bits, 0);
            assert_eq!(failure.exploding_bits, 1);
        }
        assert!(!all_placed(&results));
    }

    #[test]
    fn test_exhaustion_keeps_going() {
        // Only two /25 blocks fit into a /24, nothing is left for the /30
        let demands = parse_demands("100:0x3 2:0").unwrap();
        let results = allocate(&parent(192, 168, 1, 0, 24), &demands);

        assert_eq!(results[0].placed().unwrap().network.to_string(), "192.168.1.0/25");
        assert_eq!(results[1].placed().unwrap().network.to_string(), "192.168.1.128/25");

        let failure = results[2].failure().unwrap();
        assert_eq!(failure.host_portion_bits, 7);
        assert_eq!(failure.colliding_bits, 7);
        assert_eq!(failure.subnet_portion_bits, 1);
        assert_eq!(failure.exploding_bits, 1);

        let small = results[3].failure().unwrap();
        assert_eq!(small.host_portion_bits, 2);
        assert_eq!(small.colliding_bits, 2);
        assert_eq!(small.exploding_bits, 0);
    }

    #[test]
    fn test_oversized_demand() {
        let demands = parse_demands("5000:0 10:0").unwrap();
        let results = allocate(&parent(192, 168, 1, 0, 24), &demands);

        let failure = results[0].failure().unwrap();
        assert_eq!(failure.host_portion_bits, 13);
        assert_eq!(failure.colliding_bits, 5);
        assert_eq!(failure.subnet_portion_bits, 0);
        assert_eq!(failure.exploding_bits, 1);

        // The failed block does not consume space
        assert_eq!(results[1].placed().unwrap().network.to_string(), "192.168.1.0/28");
    }

    #[test]
    fn test_unaligned_parent_stops_at_network_end() {
        // Only 256 addresses remain between 10.255.255.0 and the end of 10.0.0.0/8
        let demands = parse_demands("200:0 200:0").unwrap();
        let results = allocate(&parent(10, 255, 255, 0, 8), &demands);

        assert_eq!(results[0].placed().unwrap().network.to_string(), "10.255.255.0/24");
        let failure = results[1].failure().unwrap();
        assert_eq!(failure.host_portion_bits, 8);
        assert_eq!(failure.colliding_bits, 8);
        assert_eq!(failure.subnet_portion_bits, 16);
        assert_eq!(failure.exploding_bits, 0);
    }

    #[test]
    fn test_suggested_parent_prefix() {
        let sized = |config: &str| -> Vec<SizedDemand> {
            parse_demands(config)
                .unwrap()
                .into_iter()
                .enumerate()
                .map(|(index, demand)| SizedDemand::new(demand, index))
                .collect()
        };
        let suggest = |config: &str| suggested_parent_prefix(&sized(config)).map(|p| p.len());

        assert_eq!(suggest("100:0x3 2:0"), Some(23));
        assert_eq!(suggest("200:0x2"), Some(23));
        assert_eq!(suggest("40:300 10:100 500:150 30:300"), Some(20));
        assert_eq!(suggest("2:0 2:0"), Some(29));
        assert_eq!(suggest("4000000000:0 1:0"), None);

        // The suggestion always fits when carved from an aligned base
        for config in ["100:0x3 2:0", "40:300 10:100 500:150 30:300", "2:0x7 60:0"] {
            let prefix = suggested_parent_prefix(&sized(config)).unwrap();
            let net = Network::anchored(Ipv4Addr::new(10, 0, 0, 0), prefix);
            assert!(all_placed(&allocate(&net, &parse_demands(config).unwrap())), "{}", config);
        }
    }

    #[test]
    fn test_multiplier_matches_repetition() {
        let net = parent(10, 0, 0, 0, 8);
        let repeated = allocate(&net, &parse_demands("42:42 42:42").unwrap());
        let multiplied = allocate(&net, &parse_demands("42:42x2").unwrap());

        let networks = |results: &[AllocationResult]| -> Vec<Network> {
            results.iter().map(|r| r.placed().unwrap().network).collect()
        };
        assert_eq!(networks(&repeated[..]), networks(&multiplied[..]));
    }

    #[test]
    fn test_random_plans_are_disjoint_and_sufficient() {
        let mut rng = StdRng::seed_from_u64(7);
        for round in 0..600 {
            let len = rng.gen_range(8..=28u8);
            let prefix = Prefix::new(len).unwrap();
            // Every other parent starts at an arbitrary address inside its network
            let base = match round % 2 {
                0 => rng.gen::<u32>() & prefix.mask_bits(),
                _ => rng.gen::<u32>(),
            };
            let net = Network::anchored(Ipv4Addr::from(base), prefix);
            let bounds = Network::containing(Ipv4Addr::from(base), prefix);

            let count = rng.gen_range(2..12);
            let demands: Vec<Demand> = (0..count)
                .map(|_| Demand::new(rng.gen_range(1..2000), rng.gen_range(0..200)))
                .collect();
            let results = allocate(&net, &demands);
            assert_eq!(results.len(), demands.len());

            let placed: Vec<&PlacedSubnet> = results.iter().filter_map(AllocationResult::placed).collect();
            for (i, a) in placed.iter().enumerate() {
                assert!(bounds.covers(&a.network), "{} escapes {}", a.network, bounds);
                assert!(a.network.start() >= net.start(), "{} starts before {}", a.network, net);
                if net.is_aligned() {
                    assert!(a.network.is_aligned(), "{} is unaligned", a.network);
                }
                assert!(a.max_hosts() >= a.demand.total_hosts);
                for b in &placed[i + 1..] {
                    assert!(!a.network.overlaps(&b.network), "{} overlaps {}", a.network, b.network);
                }
            }
            for (i, result) in results.iter().enumerate() {
                assert_eq!(result.demand().index, i);
            }
        }
    }
}
