//! Serializable report types.
//!
//! Reports flatten planner and classifier results into plain records that
//! are printed as text or written out as JSON.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::ip::{
    suggested_parent_prefix, AddressClass, AllocationResult, Classification, PlacedSubnet, PlacementFailure,
    Prefix, SpecialUseRecord,
};
use crate::planner::Plan;

/// One placed subnet, ready for display or export
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubnetRecord {
    /// 1-based position among the expanded demands
    pub ordinal: usize,
    /// 1-based position of the demand token
    pub group: usize,
    pub cidr: String,
    pub required_hosts: u64,
    pub max_hosts: u64,
    pub mask: String,
    pub first_host: Option<String>,
    pub last_host: Option<String>,
    pub broadcast: String,
    pub next_address: Option<String>,
    pub special_use: Option<String>,
}

/// One demand that could not be placed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureRecord {
    pub ordinal: usize,
    pub group: usize,
    pub required_hosts: u64,
    pub host_portion_bits: u32,
    pub colliding_bits: u32,
    pub subnet_portion_bits: u32,
    pub exploding_bits: u32,
    pub hint: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ReportEntry {
    Placed(SubnetRecord),
    Failed(FailureRecord),
}

/// Full result of one plan, in input order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AllocationReport {
    pub network: String,
    pub class: AddressClass,
    pub special_use: Option<String>,
    pub success: bool,
    pub warnings: Vec<String>,
    pub entries: Vec<ReportEntry>,
}

/// Placed subnets of a fully successful plan, as written to disk
#[derive(Debug, Clone, Serialize)]
pub struct SubnetExport {
    pub generated_at: DateTime<Utc>,
    pub network: String,
    pub subnets: Vec<SubnetRecord>,
}

/// Outcome of one plan of a batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchEntry {
    pub name: String,
    pub success: bool,
    /// Report file, when the plan got far enough to produce one
    pub report: Option<String>,
    pub error: Option<String>,
}

/// Everything known about one address
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InspectionReport {
    pub address: String,
    pub class: AddressClass,
    pub special_use: Option<String>,
    pub default_prefix: Option<u8>,
    pub default_mask: Option<String>,
    pub custom_network: Option<String>,
}

/// Result of a mask/prefix conversion
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversionReport {
    pub prefix: u8,
    pub mask: String,
}

impl SubnetRecord {
    pub fn new(placed: &PlacedSubnet, special_use: Option<&SpecialUseRecord>) -> Self {
        let network = &placed.network;
        SubnetRecord {
            ordinal: placed.demand.index + 1,
            group: placed.demand.demand.group,
            cidr: network.to_string(),
            required_hosts: placed.demand.total_hosts,
            max_hosts: placed.max_hosts(),
            mask: network.mask().to_string(),
            first_host: network.first_host().map(|a| a.to_string()),
            last_host: network.last_host().map(|a| a.to_string()),
            broadcast: network.broadcast_address().to_string(),
            next_address: network.next_address().map(|a| a.to_string()),
            special_use: special_use.map(ToString::to_string),
        }
    }
}

impl FailureRecord {
    pub fn new(
        failure: &PlacementFailure,
        class: AddressClass,
        parent_prefix: Prefix,
        suggested: Option<Prefix>,
    ) -> Self {
        FailureRecord {
            ordinal: failure.demand.index + 1,
            group: failure.demand.demand.group,
            required_hosts: failure.demand.total_hosts,
            host_portion_bits: failure.host_portion_bits,
            colliding_bits: failure.colliding_bits,
            subnet_portion_bits: failure.subnet_portion_bits,
            exploding_bits: failure.exploding_bits,
            hint: remediation_hint(failure, class, parent_prefix, suggested),
        }
    }
}

/// Suggest a way out of a failed placement, depending on the parent's class.
///
/// `suggested` is the longest parent prefix that holds the whole plan, see
/// [`suggested_parent_prefix`].
pub fn remediation_hint(
    failure: &PlacementFailure,
    class: AddressClass,
    parent_prefix: Prefix,
    suggested: Option<Prefix>,
) -> String {
    let mut hint = String::new();

    if failure.colliding_bits > 0 {
        hint.push_str(&format!(
            "Needs {} host bits, {} more than the space left. ",
            failure.host_portion_bits, failure.colliding_bits
        ));
    }
    if failure.exploding_bits > 0 {
        hint.push_str(&format!(
            "Numbering all subnets needs {} more subnetting bit(s) than the {} left. ",
            failure.exploding_bits, failure.subnet_portion_bits
        ));
    }

    let wider = match suggested {
        Some(prefix) if prefix < parent_prefix => {
            format!("Use a shorter prefix than {} (an aligned {} holds every subnet)", parent_prefix, prefix)
        }
        Some(_) => format!("Start the {} parent at its aligned network address", parent_prefix),
        None => {
            hint.push_str("No IPv4 network can hold all of these subnets; reduce the demands.");
            return hint;
        }
    };
    let advice = match class {
        AddressClass::A => format!("{} or reduce the demands.", wider),
        AddressClass::B => format!(
            "{}, move to a class A network such as 10.0.0.0/8, or reduce the demands.",
            wider
        ),
        AddressClass::C => format!(
            "{}, move to a class B network such as 172.16.0.0/12, or reduce the demands.",
            wider
        ),
        AddressClass::D | AddressClass::E => {
            "Class D and E space is not meant for host subnets; plan inside a class A, B or C network.".to_string()
        }
    };
    hint.push_str(&advice);
    hint
}

impl AllocationReport {
    pub fn from_plan(plan: &Plan) -> Self {
        let demands: Vec<_> = plan.entries.iter().map(|entry| *entry.result.demand()).collect();
        let suggested = suggested_parent_prefix(&demands);

        let entries = plan
            .entries
            .iter()
            .map(|entry| match &entry.result {
                AllocationResult::Placed(placed) => {
                    ReportEntry::Placed(SubnetRecord::new(placed, entry.special_use.as_ref()))
                }
                AllocationResult::Failed(failure) => {
                    ReportEntry::Failed(FailureRecord::new(failure, plan.class, plan.parent.prefix(), suggested))
                }
            })
            .collect();

        AllocationReport {
            network: plan.parent.to_string(),
            class: plan.class,
            special_use: plan.parent_special_use.as_ref().map(ToString::to_string),
            success: plan.is_success(),
            warnings: plan.warnings.clone(),
            entries,
        }
    }

    pub fn subnets(&self) -> impl Iterator<Item = &SubnetRecord> {
        self.entries.iter().filter_map(|entry| match entry {
            ReportEntry::Placed(record) => Some(record),
            ReportEntry::Failed(_) => None,
        })
    }

    pub fn failures(&self) -> impl Iterator<Item = &FailureRecord> {
        self.entries.iter().filter_map(|entry| match entry {
            ReportEntry::Failed(record) => Some(record),
            ReportEntry::Placed(_) => None,
        })
    }

    /// Export of the placed subnets; `None` when any demand failed
    pub fn export(&self) -> Option<SubnetExport> {
        self.success.then(|| SubnetExport {
            generated_at: Utc::now(),
            network: self.network.clone(),
            subnets: self.subnets().cloned().collect(),
        })
    }
}

impl InspectionReport {
    pub fn new(info: &Classification) -> Self {
        InspectionReport {
            address: info.address.to_string(),
            class: info.class,
            special_use: info.special_use.as_ref().map(ToString::to_string),
            default_prefix: info.default_prefix.map(Prefix::len),
            default_mask: info.default_mask.map(|m| m.to_string()),
            custom_network: info.custom_network.map(|n| n.to_string()),
        }
    }
}

impl ConversionReport {
    pub fn new(prefix: Prefix) -> Self {
        ConversionReport {
            prefix: prefix.len(),
            mask: prefix.mask().to_string(),
        }
    }
}
