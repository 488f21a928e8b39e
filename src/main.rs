use anyhow::{bail, Context, Result};
use clap::Parser;
use rtti_probe::config::{validate_config, Config, ConfigLoader};
use rtti_probe::{
    annotate_fields, Address, FieldAnnotation, PointerWidth, RemoteMemory, Resolution,
    SnapshotMemory, TypeInfoResolver,
};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "rtti-probe")]
#[command(version)]
#[command(about = "Guess the runtime type of objects inside another process", long_about = None)]
struct Args {
    /// TOML configuration file (defaults to ./rtti-probe.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Resolve against a captured memory snapshot
    #[arg(long, conflicts_with = "pid", required_unless_present = "pid")]
    snapshot: Option<PathBuf>,

    /// Resolve against a live process (Windows only)
    #[arg(long)]
    pid: Option<u32>,

    /// Override the target architecture (x86 or x64)
    #[arg(long, value_parser = parse_width)]
    arch: Option<PointerWidth>,

    /// Treat each address as a structure and annotate N pointer-sized fields
    #[arg(long, value_name = "N")]
    fields: Option<usize>,

    /// Emit JSON instead of text
    #[arg(long)]
    json: bool,

    /// Addresses to inspect (hex with 0x or $ prefix, or decimal)
    #[arg(required = true, value_parser = parse_address)]
    addresses: Vec<Address>,
}

#[derive(Debug, Serialize)]
struct AddressReport {
    address: Address,
    #[serde(skip_serializing_if = "Option::is_none")]
    resolution: Option<Resolution>,
    #[serde(skip_serializing_if = "Option::is_none")]
    annotation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<Vec<FieldAnnotation>>,
}

fn parse_address(s: &str) -> Result<Address, String> {
    s.parse::<Address>().map_err(|e| e.to_string())
}

fn parse_width(s: &str) -> Result<PointerWidth, String> {
    match s.to_ascii_lowercase().as_str() {
        "x86" | "32" | "4" => Ok(PointerWidth::Width4),
        "x64" | "64" | "8" => Ok(PointerWidth::Width8),
        other => Err(format!("unknown architecture '{}', expected x86 or x64", other)),
    }
}

fn load_config(args: &Args) -> Result<Config> {
    let config = match &args.config {
        Some(path) => ConfigLoader::new(path)
            .load()
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => rtti_probe::config::load_config()?,
    };
    Ok(config)
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut config = load_config(&args)?;

    init_logging(&config.logging.level);
    info!("rtti-probe v{}", env!("CARGO_PKG_VERSION"));

    if let Some(arch) = args.arch {
        config.target.architecture = arch;
    }

    if let Some(path) = &args.snapshot {
        let snapshot = SnapshotMemory::load(path)
            .with_context(|| format!("loading snapshot {}", path.display()))?;
        info!(
            regions = snapshot.region_count(),
            bytes = snapshot.total_size(),
            "snapshot loaded"
        );
        validate_config(&config).context("invalid configuration")?;
        return run(&args, &config, &snapshot);
    }

    match args.pid {
        Some(pid) => run_live(&args, config, pid),
        None => bail!("either --snapshot or --pid is required"),
    }
}

#[cfg(windows)]
fn run_live(args: &Args, mut config: Config, pid: u32) -> Result<()> {
    use rtti_probe::memory::ProcessMemory;
    use rtti_probe::process::ProcessHandle;

    let handle =
        ProcessHandle::open_for_read(pid).with_context(|| format!("opening process {}", pid))?;
    let mem = ProcessMemory::new(&handle);

    if args.arch.is_none() {
        let detected = mem.architecture().context("detecting target architecture")?;
        debug!(%detected, "detected target architecture");
        config.target.architecture = detected;
    }
    validate_config(&config).context("invalid configuration")?;
    info!(pid, arch = %config.target.architecture, "attached");

    run(args, &config, &mem)
}

#[cfg(not(windows))]
fn run_live(_args: &Args, _config: Config, pid: u32) -> Result<()> {
    bail!("attaching to process {} requires Windows; use --snapshot instead", pid)
}

fn run(args: &Args, config: &Config, mem: &dyn RemoteMemory) -> Result<()> {
    let resolver = TypeInfoResolver::from_config(config);
    debug!(config = ?resolver.config(), "resolver ready");

    let reports: Vec<AddressReport> = args
        .addresses
        .iter()
        .map(|&address| match args.fields {
            Some(count) => AddressReport {
                address,
                resolution: None,
                annotation: None,
                fields: Some(annotate_fields(
                    &resolver,
                    mem,
                    address,
                    count,
                    config.target.architecture,
                )),
            },
            None => {
                let resolution = resolver.resolve(address, mem);
                AddressReport {
                    address,
                    annotation: resolution.as_ref().map(ToString::to_string),
                    resolution,
                    fields: None,
                }
            }
        })
        .collect();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        for report in &reports {
            print_report(report);
        }
    }
    Ok(())
}

fn print_report(report: &AddressReport) {
    match &report.fields {
        Some(fields) => {
            println!("{}", report.address);
            for field in fields {
                let value = field
                    .value
                    .map_or_else(|| "????????????????".to_string(), |v| format!("{:016X}", v.as_u64()));
                println!(
                    "  +0x{:04X} {} => {}",
                    field.offset,
                    value,
                    field.info.as_deref().unwrap_or("<none>")
                );
            }
        }
        None => println!(
            "{} => {}",
            report.address,
            report.annotation.as_deref().unwrap_or("<none>")
        ),
    }
}
