//! mailmesh CLI - inspect and classify Code_Aster `.mail` meshes.
//!
//! Usage: mailmesh <COMMAND> [OPTIONS] <INPUT>
//!
//! Run `mailmesh --help` for available commands. Set `RUST_LOG` to see
//! skipped elements (`warn`) or pipeline milestones (`info`).

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use clap::{Args, Parser, Subcommand, ValueEnum};

use mailmesh::algo::{ClassifyOptions, Progress, QuadFallback};
use mailmesh::io::{self, GroupKind, Keywords, SectionMode};
use mailmesh::kernel::{FillTolerances, NativeKernel};
use mailmesh::mesh::BuildOptions;
use mailmesh::pipeline::{self, MeshSummary, PipelineOptions};

#[derive(Parser)]
#[command(name = "mailmesh")]
#[command(author, version, about = "Code_Aster mesh ingestion CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display mesh counts
    Info {
        #[command(flatten)]
        scan: ScanArgs,
    },

    /// List named groups
    Groups {
        #[command(flatten)]
        scan: ScanArgs,
    },

    /// Classify every element and report the geometry it produces
    Classify {
        #[command(flatten)]
        scan: ScanArgs,

        /// Policy for non-planar quadrangles
        #[arg(short, long, value_enum, default_value = "split")]
        fallback: Fallback,

        /// Maximum vertex distance from a quadrangle's plane
        #[arg(long, default_value = "1e-6")]
        plane_tolerance: f64,

        /// Filling surface parametric tolerance
        #[arg(long, default_value = "1e-4")]
        tol_2d: f64,

        /// Filling surface distance tolerance
        #[arg(long, default_value = "0.2")]
        tol_3d: f64,

        /// Filling surface angular tolerance (radians)
        #[arg(long, default_value = "0.1")]
        tol_angle: f64,

        /// Filling surface curvature tolerance
        #[arg(long, default_value = "1.0")]
        tol_curvature: f64,
    },
}

#[derive(Args)]
struct ScanArgs {
    /// Input mesh file
    input: PathBuf,

    /// Capture every occurrence of a section, not only the first
    #[arg(long)]
    every_section: bool,

    /// Ignore node groups (GROUP_NO)
    #[arg(long)]
    element_groups_only: bool,
}

impl ScanArgs {
    fn build_options(&self) -> BuildOptions {
        let mut keywords = Keywords::default();
        if self.element_groups_only {
            keywords = keywords.element_groups_only();
        }
        let mode = if self.every_section {
            SectionMode::EverySection
        } else {
            SectionMode::FirstSection
        };
        BuildOptions::default().with_keywords(keywords).with_mode(mode)
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Fallback {
    /// Split along the 0-2 diagonal into two triangles
    Split,
    /// Fit one surface through the four boundary edges
    Fill,
}

impl From<Fallback> for QuadFallback {
    fn from(fallback: Fallback) -> Self {
        match fallback {
            Fallback::Split => QuadFallback::SplitDiagonal,
            Fallback::Fill => QuadFallback::Fill,
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Info { scan } => {
            cmd_info(&scan.input, &scan.build_options())?;
        }

        Commands::Groups { scan } => {
            cmd_groups(&scan.input, &scan.build_options())?;
        }

        Commands::Classify {
            scan,
            fallback,
            plane_tolerance,
            tol_2d,
            tol_3d,
            tol_angle,
            tol_curvature,
        } => {
            let tolerances = FillTolerances::default()
                .with_tol_2d(tol_2d)
                .with_tol_3d(tol_3d)
                .with_tol_angle(tol_angle)
                .with_tol_curvature(tol_curvature);
            let options = PipelineOptions::default()
                .with_build(scan.build_options())
                .with_classify(
                    ClassifyOptions::default()
                        .with_fallback(fallback.into())
                        .with_tolerances(tolerances),
                );
            let kernel = NativeKernel::new().with_plane_tolerance(plane_tolerance);
            kernel.validate()?;
            cmd_classify(&scan.input, &kernel, &options)?;
        }
    }

    Ok(())
}

/// Create a progress reporter that displays a progress bar on stderr.
fn create_progress() -> Progress {
    let max_percent = Arc::new(AtomicUsize::new(0)); // highest percent shown so far

    Progress::new(move |current, total, message| {
        if total == 0 {
            return;
        }

        let raw_percent = if current >= total {
            100
        } else {
            ((current * 100) + (total / 2)) / total
        };

        let previous = max_percent.fetch_max(raw_percent, Ordering::Relaxed);
        let percent = previous.max(raw_percent);

        // Only redraw when the bar moves
        if percent == previous && percent != 100 {
            return;
        }

        let bar_width = 30;
        let filled = (percent * bar_width) / 100;
        let bar = "=".repeat(filled);
        let space = " ".repeat(bar_width - filled);

        eprint!("\r[{}{}] {:3}% {}", bar, space, percent, message);
        let _ = std::io::stderr().flush();

        if current >= total {
            eprintln!();
        }
    })
}

fn cmd_info(input: &Path, options: &BuildOptions) -> Result<(), Box<dyn std::error::Error>> {
    let start = Instant::now();
    let mesh = io::load_with(input, options)?;

    println!("File: {}", input.display());
    println!("{}", MeshSummary::from_snapshot(&mesh));

    let points = mesh.nodes().points();
    if let Some(first) = points.first() {
        let (min, max) = points.iter().fold((*first, *first), |(lo, hi), p| {
            (lo.inf(p), hi.sup(p))
        });
        println!(
            "Bounding box: ({:.3}, {:.3}, {:.3}) to ({:.3}, {:.3}, {:.3})",
            min.x, min.y, min.z, max.x, max.y, max.z
        );
        let diag = max - min;
        println!("Dimensions: {:.3} x {:.3} x {:.3}", diag.x, diag.y, diag.z);
    }

    println!("Loaded in {:.2?}", start.elapsed());
    Ok(())
}

fn cmd_groups(input: &Path, options: &BuildOptions) -> Result<(), Box<dyn std::error::Error>> {
    let mesh = io::load_with(input, options)?;

    if mesh.groups().is_empty() {
        println!("No groups");
        return Ok(());
    }

    let width = mesh.groups().iter().map(|g| g.name.len()).max().unwrap_or(0);
    for group in mesh.groups() {
        let kind = match group.kind {
            GroupKind::Element => "elements",
            GroupKind::Node => "nodes",
        };
        println!(
            "{:width$}  {:>8} {}",
            group.name,
            group.members.len(),
            kind,
            width = width
        );
    }
    Ok(())
}

fn cmd_classify(
    input: &Path,
    kernel: &NativeKernel,
    options: &PipelineOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let progress = create_progress();

    let start = Instant::now();
    let (mesh, synthesis) = pipeline::run_with_progress(input, kernel, options, &progress)?;
    let elapsed = start.elapsed();

    let area: f64 = synthesis.faces.iter().map(|f| f.area()).sum();
    let length: f64 = synthesis.edges.iter().map(|e| e.length()).sum();

    println!("File: {}", input.display());
    println!("{}", MeshSummary::from_snapshot(&mesh).with_synthesis(&synthesis));
    println!("Surface area: {:.6}", area);
    println!("Edge length: {:.6}", length);
    println!("Completed in {:.2?}", elapsed);
    Ok(())
}
