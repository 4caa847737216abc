use clap::{Parser, Subcommand};
use color_eyre::eyre::{eyre, WrapErr};
use color_eyre::Result;
use env_logger::Env;
use log::info;
use std::path::PathBuf;

use vlsmplan::config_loader;
use vlsmplan::ip::{classify, parse_cidr, parse_mask, Prefix};
use vlsmplan::planner::{plan, plan_batch};
use vlsmplan::report::{
    render_conversion, render_inspection, render_plan, write_batch_reports, write_json_report,
    AllocationReport, ConversionReport, InspectionReport,
};

/// Default directory for batch reports
const DEFAULT_OUTPUT_DIR: &str = "plans_output";

/// IPv4 address planning: VLSM subnetting, address inspection and mask conversion
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Carve a network into subnets sized for host demands
    Plan {
        /// Parent network, a.b.c.d or a.b.c.d/p (class default prefix if omitted)
        network: String,

        /// Demands as H:R or H:RxM (hosts, reserve in %, multiplier)
        #[arg(required = true, num_args = 1..)]
        demands: Vec<String>,

        /// Parent prefix, overrides a /p suffix
        #[arg(short, long)]
        prefix: Option<u8>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,

        /// Write the placed subnets to a JSON file (only if all demands fit)
        #[arg(short, long)]
        export: Option<PathBuf>,
    },

    /// Show class, special use, and default prefix of an address
    Inspect {
        /// Address, a.b.c.d or a.b.c.d/p
        address: String,

        /// Custom prefix to resolve the containing network
        #[arg(short, long)]
        prefix: Option<u8>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Convert a subnet mask to a prefix or a prefix (24 or /24) to a mask
    Convert {
        value: String,
    },

    /// Run every plan of a YAML plan file
    Batch {
        /// Path to the plan file
        config: PathBuf,

        /// Output directory for JSON reports
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Number of parallel workers (0 = auto-detect)
        #[arg(short = 'j', long, default_value = "0")]
        threads: usize,
    },
}

fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    let cli = Cli::parse();

    env_logger::Builder::from_env(Env::default().default_filter_or(&cli.log_level)).init();

    match cli.command {
        Commands::Plan {
            network,
            demands,
            prefix,
            json,
            export,
        } => run_plan(&network, &demands.join(" "), prefix, json, export),
        Commands::Inspect {
            address,
            prefix,
            json,
        } => run_inspect(&address, prefix, json),
        Commands::Convert { value } => run_convert(&value),
        Commands::Batch {
            config,
            output,
            threads,
        } => run_batch(config, output, threads),
    }
}

fn run_plan(
    network: &str,
    demands: &str,
    prefix: Option<u8>,
    json: bool,
    export: Option<PathBuf>,
) -> Result<()> {
    let prefix = prefix.map(Prefix::new).transpose()?;
    let plan = plan(network, prefix, demands)?;
    let report = AllocationReport::from_plan(&plan);

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).wrap_err("Failed to serialize report")?
        );
    } else {
        println!("{}", render_plan(&report));
    }

    if !report.success {
        let failed = report.failures().count();
        return Err(eyre!(
            "{} of {} subnets do not fit into {}",
            failed,
            report.entries.len(),
            report.network
        ));
    }

    if let Some(path) = export {
        if let Some(document) = report.export() {
            write_json_report(&document, &path)?;
            info!("Exported {} subnets to {:?}", document.subnets.len(), path);
        }
    }

    Ok(())
}

fn run_inspect(address: &str, prefix: Option<u8>, json: bool) -> Result<()> {
    let (addr, suffix) = parse_cidr(address)?;
    let prefix = prefix.map(Prefix::new).transpose()?.or(suffix);
    let report = InspectionReport::new(&classify(addr, prefix));

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).wrap_err("Failed to serialize report")?
        );
    } else {
        println!("{}", render_inspection(&report));
    }
    Ok(())
}

fn run_convert(value: &str) -> Result<()> {
    let prefix = if value.contains('.') {
        parse_mask(value)?
    } else {
        value.parse::<Prefix>()?
    };
    println!("{}", render_conversion(&ConversionReport::new(prefix)));
    Ok(())
}

fn run_batch(config: PathBuf, output: Option<PathBuf>, threads: usize) -> Result<()> {
    // Set thread pool size
    if threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .wrap_err("Failed to configure thread pool")?;
    }

    let config = config_loader::load_config(&config)?;
    let output_dir = output
        .or_else(|| config.general.output_dir.as_ref().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));

    let outcomes = plan_batch(&config.plans);
    let summary = write_batch_reports(&outcomes, &output_dir)?;

    for entry in &summary {
        match (&entry.error, entry.success) {
            (Some(error), _) => println!("{}: error: {}", entry.name, error),
            (None, true) => println!("{}: ok", entry.name),
            (None, false) => println!("{}: subnets do not fit", entry.name),
        }
    }
    println!("Reports written to {}", output_dir.display());

    let failed = summary.iter().filter(|entry| !entry.success).count();
    if failed > 0 {
        return Err(eyre!("{} of {} plans failed", failed, summary.len()));
    }
    Ok(())
}
