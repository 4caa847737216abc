//! Host demand handling.
//!
//! This module turns a demand config string such as `"40:300 10:100 500:150x2"`
//! into individual subnet demands and computes the address block each of them
//! needs once its growth reserve is added.

pub mod parser;
pub mod sizing;

pub use parser::{parse_demands, parse_groups, Demand, DemandError, DemandGroup};
pub use sizing::{required_bits, total_hosts, SizedDemand};
