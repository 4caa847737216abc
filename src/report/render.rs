//! Report rendering.
//!
//! Generates both JSON files and human-readable text.

use std::fs;
use std::path::Path;

use color_eyre::eyre::{Context, Result};
use serde::Serialize;

use crate::planner::{Plan, PlanError};

use super::types::*;

/// Write any report as pretty-printed JSON
pub fn write_json_report<T: Serialize>(report: &T, output_path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(report)
        .context("Failed to serialize report to JSON")?;

    fs::write(output_path, json)
        .with_context(|| format!("Failed to write JSON report to {}", output_path.display()))?;

    log::info!("JSON report written to {}", output_path.display());
    Ok(())
}

/// Write one JSON report per batch plan plus a `summary.json`.
///
/// Plans stopped by an input error get no report file of their own but are
/// listed in the summary with their error.
pub fn write_batch_reports(
    outcomes: &[(String, Result<Plan, PlanError>)],
    output_dir: &Path,
) -> Result<Vec<BatchEntry>> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output directory: {}", output_dir.display()))?;

    let mut summary = Vec::with_capacity(outcomes.len());
    for (name, outcome) in outcomes {
        let entry = match outcome {
            Ok(plan) => {
                let report = AllocationReport::from_plan(plan);
                let path = output_dir.join(format!("{}.json", name));
                write_json_report(&report, &path)?;
                BatchEntry {
                    name: name.clone(),
                    success: report.success,
                    report: Some(path.display().to_string()),
                    error: None,
                }
            }
            Err(err) => {
                log::warn!("Plan '{}' failed: {}", name, err);
                BatchEntry {
                    name: name.clone(),
                    success: false,
                    report: None,
                    error: Some(err.to_string()),
                }
            }
        };
        summary.push(entry);
    }

    write_json_report(&summary, &output_dir.join("summary.json"))?;
    Ok(summary)
}

/// Render a plan as a subnetting table
pub fn render_plan(report: &AllocationReport) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push(format!("Subnetting table for network {} (class {})", report.network, report.class));
    if let Some(special_use) = &report.special_use {
        lines.push(format!("\t(i) {}", special_use));
    }
    for warning in &report.warnings {
        lines.push(format!("\t(!) {}", warning));
    }
    lines.push(String::new());

    for entry in &report.entries {
        match entry {
            ReportEntry::Placed(subnet) => {
                lines.push(format!("{}. Subnet {}", subnet.ordinal, subnet.cidr));
                lines.push(format!(
                    "\tCapable of {} hosts at max ({} required)",
                    subnet.max_hosts, subnet.required_hosts
                ));
                lines.push(format!("\tSubnet mask:     {}", subnet.mask));
                lines.push(format!("\tFirst host addr: {}", subnet.first_host.as_deref().unwrap_or("-")));
                lines.push(format!("\tLast host addr:  {}", subnet.last_host.as_deref().unwrap_or("-")));
                lines.push(format!("\tBroadcast addr:  {}", subnet.broadcast));
                if let Some(special_use) = &subnet.special_use {
                    lines.push(format!("\t(i) {}", special_use));
                }
            }
            ReportEntry::Failed(failure) => {
                lines.push(format!(
                    "{}. Subnet for {} hosts does not fit",
                    failure.ordinal, failure.required_hosts
                ));
                lines.push(format!("\tHost portion:    {} bits", failure.host_portion_bits));
                lines.push(format!("\tColliding bits:  {}", failure.colliding_bits));
                lines.push(format!("\tSubnet portion:  {} bits", failure.subnet_portion_bits));
                lines.push(format!("\tExploding bits:  {}", failure.exploding_bits));
                lines.push(format!("\t(!) {}", failure.hint));
            }
        }
        lines.push(String::new());
    }

    let placed = report.subnets().count();
    let failed = report.failures().count();
    if failed == 0 {
        lines.push(format!("All {} subnets placed.", placed));
    } else {
        lines.push(format!("{} of {} subnets could not be placed.", failed, placed + failed));
    }

    lines.join("\n")
}

/// Render everything known about an address
pub fn render_inspection(report: &InspectionReport) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push(format!("Address {}", report.address));
    lines.push(format!("\tClass:           {}", report.class));
    match (report.default_prefix, &report.default_mask) {
        (Some(prefix), Some(mask)) => {
            lines.push(format!("\tDefault prefix:  /{}", prefix));
            lines.push(format!("\tDefault mask:    {}", mask));
        }
        _ => lines.push("\tDefault prefix:  n/a".to_string()),
    }
    if let Some(network) = &report.custom_network {
        lines.push(format!("\tNetwork:         {}", network));
    }
    if let Some(special_use) = &report.special_use {
        lines.push(format!("\t(i) {}", special_use));
    }

    lines.join("\n")
}

/// Render a mask/prefix conversion
pub fn render_conversion(report: &ConversionReport) -> String {
    format!("/{} = {}", report.prefix, report.mask)
}
