//! # vlsmplan - IPv4 address planning utility
//!
//! This library plans IPv4 address space with Variable Length Subnet Masking
//! (VLSM): given a parent network and a list of host demands, it carves the
//! network into correctly sized, non-overlapping subnets and explains in bits
//! why a demand does not fit when the space runs out.
//!
//! ## Key Features
//!
//! - **Demand strings**: `H:R` or `H:RxM` tokens, host count `H`, growth
//!   reserve `R` in percent, and an optional multiplier `M`
//! - **Largest-first allocation**: blocks are placed biggest first and
//!   reported in input order
//! - **Diagnostics**: colliding and exploding bits for every failed demand
//! - **Special-use awareness**: subnets are annotated with their RFC block,
//!   parents inside reserved space are refused
//! - **Utilities**: classful address inspection and mask/prefix conversion
//!
//! ## Architecture
//!
//! - `demand`: demand string parsing and block sizing
//! - `ip`: networks, masks, the special-use registry, classification, and the allocator
//! - `planner`: parent resolution, reserved-space policy, batch planning
//! - `report`: text and JSON reports
//! - `config` / `config_loader`: YAML batch plan files
//!
//! ## Example Usage
//!
//! ```rust
//! use vlsmplan::planner::plan;
//! use vlsmplan::report::{render_plan, AllocationReport};
//!
//! let plan = plan("172.16.5.0", None, "40:300 10:100 500:150 30:300")?;
//! assert!(plan.is_success());
//!
//! let report = AllocationReport::from_plan(&plan);
//! println!("{}", render_plan(&report));
//! # Ok::<(), vlsmplan::planner::PlanError>(())
//! ```
//!
//! ## Error Handling
//!
//! Input problems are reported through `thiserror` enums (`DemandError`,
//! `AddressError`, `PlanError`). A demand that does not fit is not an error
//! but a `PlacementFailure` result, so a run always reports on every demand.
//! File-facing functions return `color_eyre` results with context attached.

pub mod config;
pub mod config_loader;
pub mod demand;
pub mod ip;
pub mod planner;
pub mod report;
