//! Mesh bounds check.
//!
//! Loads a text mesh, validates its topology, computes its bounding box, and
//! cross-checks that box against a BVH built from the same buffers.
//!
//! # Usage
//!
//! ```text
//! mesh-check [PATH] [--policy referenced|all] [--epsilon E] [--relative R]
//!            [--format pretty|json] [--verbose]
//! ```
//!
//! Without `PATH`, `mesh_triangles.txt` next to this crate's manifest is used.
//!
//! # Exit codes
//!
//! | Code | Meaning |
//! |------|---------|
//! | 0 | Checked (a bounding box mismatch is reported, not fatal) |
//! | 1 | The mesh could not be read or parsed |
//! | 2 | Invalid topology or a NaN coordinate |
//! | 3 | The mesh has no triangles |
//! | 4 | The BVH oracle failed |

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use mesh_audit::{
    AabbPolicy, AuditConfig, AuditError, BvhOracle, CrossCheck, Tolerance, TopologyReport,
    cross_check, validate_mesh,
};
use mesh_io::load_mesh;
use serde::Serialize;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

const DEFAULT_MESH_FILE: &str = "mesh_triangles.txt";

/// Validate a text mesh and cross-check its bounding box against a BVH.
#[derive(Parser)]
#[command(name = "mesh-check")]
#[command(about = "Bounding box cross-check for text meshes", long_about = None)]
#[command(version)]
struct Cli {
    /// Mesh file to check
    #[arg(name = "PATH")]
    path: Option<PathBuf>,

    /// Which vertices contribute to the bounding box
    #[arg(long, value_enum, default_value_t = PolicyArg::Referenced)]
    policy: PolicyArg,

    /// Absolute comparison tolerance (default: machine epsilon)
    #[arg(long)]
    epsilon: Option<f64>,

    /// Relative comparison tolerance
    #[arg(long)]
    relative: Option<f64>,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Pretty)]
    format: Format,

    /// Enable debug logging
    #[arg(long, short)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum PolicyArg {
    /// Only vertices referenced by a triangle
    Referenced,
    /// Every vertex in the file
    All,
}

impl From<PolicyArg> for AabbPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Referenced => Self::ReferencedOnly,
            PolicyArg::All => Self::AllVertices,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Pretty,
    Json,
}

#[derive(Serialize)]
struct Report<'a> {
    path: &'a Path,
    topology: TopologyReport,
    truncated_lines: Vec<String>,
    check: CrossCheck,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.verbose) {
        eprintln!("{e:#}");
        return ExitCode::FAILURE;
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::from(exit_code(&e))
        }
    }
}

fn init_logging(verbose: bool) -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(if verbose { Level::DEBUG } else { Level::INFO })
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("Failed to set subscriber")
}

fn run(cli: &Cli) -> Result<()> {
    let path = cli
        .path
        .clone()
        .unwrap_or_else(|| Path::new(env!("CARGO_MANIFEST_DIR")).join(DEFAULT_MESH_FILE));
    println!("Mesh Triangles File Path: {}", path.display());

    let config = build_config(cli)?;

    let loaded = load_mesh(&path)?;
    info!(
        vertices = loaded.mesh.vertex_count(),
        triangles = loaded.mesh.triangle_count(),
        "Mesh loaded"
    );

    let topology = validate_mesh(&loaded.mesh);
    let check = cross_check(&loaded.mesh, &BvhOracle::new(config.bvh), &config)?;

    match cli.format {
        Format::Pretty => {
            print!("{topology}");
            for truncated in &loaded.truncated_lines {
                println!("  Truncated {truncated}");
            }
            println!("{check}");
        }
        Format::Json => {
            let report = Report {
                path: &path,
                topology,
                truncated_lines: loaded.truncated_lines.iter().map(ToString::to_string).collect(),
                check,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}

fn build_config(cli: &Cli) -> Result<AuditConfig> {
    let defaults = AuditConfig::default();
    let absolute = cli.epsilon.unwrap_or(defaults.tolerance.absolute);
    let relative = cli.relative.unwrap_or(defaults.tolerance.relative);

    for (name, value) in [("epsilon", absolute), ("relative", relative)] {
        if !value.is_finite() || value < 0.0 {
            bail!("--{name} must be a non-negative finite number, got {value}");
        }
    }

    Ok(defaults
        .with_policy(cli.policy.into())
        .with_tolerance(Tolerance::combined(absolute, relative)))
}

/// Map a failure to the process exit code.
///
/// Load and parse failures, and anything unclassified, exit with 1.
fn exit_code(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<AuditError>() {
        Some(AuditError::InvalidMeshTopology { .. } | AuditError::NanCoordinate { .. }) => 2,
        Some(AuditError::EmptyMesh) => 3,
        Some(AuditError::Oracle(_) | AuditError::OracleBoundsMissing { .. }) => 4,
        None => 1,
    }
}
