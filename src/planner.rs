//! High-level orchestration of subnet planning.
//!
//! This module ties the pieces together: it resolves the parent network
//! from user input, refuses parents inside reserved special-use space, runs
//! the allocator, and annotates every placed subnet. Batch plans run in
//! parallel since no state is shared between them.

use std::net::Ipv4Addr;

use log::{info, warn};
use rayon::prelude::*;

use crate::config::PlanSpec;
use crate::demand::{parse_demands, parse_groups, DemandError, DemandGroup};
use crate::ip::{
    allocate, parse_cidr, AddressClass, AddressError, AllocationResult, Network,
    PlacedSubnet, PlacementFailure, Prefix, SpecialUseRecord, SPECIAL_USE,
};

/// Errors that stop a plan before allocation starts
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlanError {
    #[error(transparent)]
    Demand(#[from] DemandError),

    #[error(transparent)]
    Address(#[from] AddressError),

    #[error("No prefix given for {address} and class {class} has no default prefix")]
    MissingPrefix { address: Ipv4Addr, class: AddressClass },

    #[error("Network {network} lies in reserved address space: {record}")]
    ReservedParentNetwork {
        network: Network,
        record: SpecialUseRecord,
    },
}

/// A single allocation result with its special-use annotation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanEntry {
    pub result: AllocationResult,
    pub special_use: Option<SpecialUseRecord>,
}

/// Outcome of planning one parent network
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    pub parent: Network,
    pub class: AddressClass,
    pub parent_special_use: Option<SpecialUseRecord>,
    pub groups: Vec<DemandGroup>,
    pub entries: Vec<PlanEntry>,
    /// Conditions worth reporting that did not stop the plan
    pub warnings: Vec<String>,
}

impl Plan {
    /// True when every demand received a subnet
    pub fn is_success(&self) -> bool {
        self.entries.iter().all(|entry| entry.result.is_placed())
    }

    pub fn results(&self) -> Vec<AllocationResult> {
        self.entries.iter().map(|entry| entry.result).collect()
    }

    pub fn placed(&self) -> impl Iterator<Item = &PlacedSubnet> {
        self.entries.iter().filter_map(|entry| entry.result.placed())
    }

    pub fn failures(&self) -> impl Iterator<Item = &PlacementFailure> {
        self.entries.iter().filter_map(|entry| entry.result.failure())
    }
}

/// Resolve the parent network from `a.b.c.d[/p]` and an optional override.
///
/// The explicit prefix wins over a `/p` suffix, which wins over the class
/// default. Class D and E addresses have no default and need a prefix.
pub fn resolve_parent(network: &str, prefix: Option<Prefix>) -> Result<Network, PlanError> {
    let (base, suffix) = parse_cidr(network)?;
    let class = AddressClass::of(base);
    let prefix = prefix
        .or(suffix)
        .or_else(|| class.default_prefix())
        .ok_or(PlanError::MissingPrefix { address: base, class })?;
    Ok(Network::anchored(base, prefix))
}

/// Check the parent against the special-use registry.
///
/// Returns the record matching the parent base address, or an error if that
/// record is closed to subnetting. Blocks overlapping the aligned network of
/// the parent are appended to `warnings`.
pub fn check_reserved_parent(
    parent: &Network,
    warnings: &mut Vec<String>,
) -> Result<Option<SpecialUseRecord>, PlanError> {
    let record = SPECIAL_USE.lookup(parent.base()).cloned();

    if let Some(record) = &record {
        if !record.subnettable {
            return Err(PlanError::ReservedParentNetwork {
                network: *parent,
                record: record.clone(),
            });
        }
    }

    let bounds = parent.aligned();
    for other in SPECIAL_USE.overlapping(&bounds) {
        if !other.subnettable && !other.network.contains(parent.base()) {
            let warning = format!(
                "{} overlaps reserved block {}: {}",
                bounds, other.network, other
            );
            warn!("{}", warning);
            warnings.push(warning);
        }
    }

    Ok(record)
}

/// Plan subnets for `demands` inside the network given as text.
///
/// # Examples
/// ```
/// use vlsmplan::planner::plan;
///
/// let plan = plan("172.16.5.0", None, "40:300 10:100 500:150 30:300").unwrap();
/// assert!(plan.is_success());
/// assert_eq!(plan.parent.to_string(), "172.16.5.0/16");
/// ```
pub fn plan(network: &str, prefix: Option<Prefix>, demands: &str) -> Result<Plan, PlanError> {
    let parent = resolve_parent(network, prefix)?;
    let groups = parse_groups(demands)?;
    let units = parse_demands(demands)?;

    let mut warnings = Vec::new();
    let parent_special_use = check_reserved_parent(&parent, &mut warnings)?;

    if !parent.is_aligned() {
        let aligned = parent.aligned();
        let warning = format!(
            "{} is not aligned to its prefix (network address is {}); subnets start at {} and end with {}",
            parent,
            aligned.base(),
            parent.base(),
            aligned.broadcast_address()
        );
        warn!("{}", warning);
        warnings.push(warning);
    }

    let entries: Vec<PlanEntry> = allocate(&parent, &units)
        .into_iter()
        .map(|result| PlanEntry {
            special_use: result
                .placed()
                .and_then(|placed| annotate(placed.network.base())),
            result,
        })
        .collect();

    let plan = Plan {
        parent,
        class: AddressClass::of(parent.base()),
        parent_special_use,
        groups,
        entries,
        warnings,
    };

    info!(
        "Planned {}: {} placed, {} failed",
        plan.parent,
        plan.placed().count(),
        plan.failures().count()
    );
    Ok(plan)
}

fn annotate(addr: Ipv4Addr) -> Option<SpecialUseRecord> {
    SPECIAL_USE.lookup(addr).cloned()
}

/// Run every plan of a batch in parallel, keeping the input order
pub fn plan_batch(specs: &[PlanSpec]) -> Vec<(String, Result<Plan, PlanError>)> {
    info!("Running {} plan(s)", specs.len());
    specs
        .par_iter()
        .map(|spec| {
            let prefix = spec.prefix.map(Prefix::new).transpose();
            let outcome = prefix
                .map_err(PlanError::from)
                .and_then(|prefix| plan(&spec.network, prefix, &spec.demands));
            (spec.name.clone(), outcome)
        })
        .collect()
}
