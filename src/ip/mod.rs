//! IPv4 address space handling.
//!
//! This module models networks and prefixes, converts between masks and
//! prefixes, classifies addresses against the classful scheme and the
//! special-use registry, and carves parent networks into VLSM subnets.

pub mod allocator;
pub mod classifier;
pub mod mask;
pub mod network;
pub mod registry;

// Re-export commonly used types
pub use allocator::{
    allocate, all_placed, suggested_parent_prefix, AllocationResult, PlacedSubnet, PlacementFailure,
};
pub use classifier::{classify, AddressClass, Classification};
pub use mask::{mask_to_prefix, parse_address, parse_cidr, parse_mask, prefix_to_mask, AddressError, Prefix};
pub use network::Network;
pub use registry::{SpecialUseRecord, SpecialUseRegistry, SPECIAL_USE};
