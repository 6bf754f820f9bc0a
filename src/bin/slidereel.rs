use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use slidereel::{
    BatchManifest, BatchSummary, EncodeEngine, FfmpegEngine, FfmpegEngineOpts, InMemoryEngine,
    JobOutcome, JobPlan, Orchestrator,
};

#[derive(Parser, Debug)]
#[command(name = "slidereel", version)]
struct Cli {
    /// Log at debug level (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate a manifest and print the job specs it produces as JSON.
    Plan(PlanArgs),
    /// Render every slide of a manifest to MP4 (requires `ffmpeg` on PATH).
    Render(RenderArgs),
}

#[derive(Parser, Debug)]
struct PlanArgs {
    /// Input manifest JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Number of rows to use (overrides the manifest).
    #[arg(long)]
    count: Option<usize>,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input manifest JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output directory for the MP4 files.
    #[arg(long)]
    out: PathBuf,

    /// Number of rows to render (overrides the manifest).
    #[arg(long)]
    count: Option<usize>,

    /// Output frames-per-second.
    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// Font file for slide text.
    #[arg(long)]
    font_file: Option<PathBuf>,

    /// Run the batch against the in-memory engine and write nothing.
    #[arg(long)]
    dry_run: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Plan(args) => cmd_plan(args),
        Command::Render(args) => cmd_render(args),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn read_manifest(path: &Path, count: Option<usize>) -> anyhow::Result<BatchManifest> {
    let manifest = BatchManifest::from_path(path)
        .with_context(|| format!("load manifest '{}'", path.display()))?;
    Ok(match count {
        Some(n) => manifest.with_count(n),
        None => manifest,
    })
}

fn cmd_plan(args: PlanArgs) -> anyhow::Result<()> {
    let manifest = read_manifest(&args.in_path, args.count)?;
    let plan = manifest.plan()?;
    let json = serde_json::to_string_pretty(&plan).context("serialize job plan")?;
    println!("{json}");
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let manifest = read_manifest(&args.in_path, args.count)?;
    let plan = manifest.plan()?;

    let summary = if args.dry_run {
        run_batch(InMemoryEngine::new(), plan, None)?
    } else {
        std::fs::create_dir_all(&args.out)
            .with_context(|| format!("create output dir '{}'", args.out.display()))?;
        let engine = FfmpegEngine::new(FfmpegEngineOpts {
            fps: args.fps,
            font_file: args.font_file,
            ..FfmpegEngineOpts::default()
        });
        run_batch(engine, plan, Some(&args.out))?
    };

    eprintln!(
        "{}: {} succeeded, {} failed",
        summary.batch, summary.succeeded, summary.failed
    );
    if summary.failed > 0 {
        anyhow::bail!("{} of {} slides failed", summary.failed, summary.total);
    }
    Ok(())
}

fn run_batch<E: EncodeEngine>(
    engine: E,
    plan: JobPlan,
    out_dir: Option<&Path>,
) -> anyhow::Result<BatchSummary> {
    let orchestrator = Orchestrator::new(engine);
    let mut run = orchestrator.start(plan)?;

    for outcome in run.by_ref() {
        match &outcome {
            JobOutcome::Success { artifact, .. } => {
                let name = output_file_name(&outcome);
                match out_dir {
                    Some(dir) => {
                        let path = dir.join(&name);
                        artifact.write_to(&path)?;
                        println!(
                            "ok    {} -> {} ({} bytes, {})",
                            outcome.job_id(),
                            path.display(),
                            artifact.len(),
                            artifact.handle().as_str()
                        );
                    }
                    None => println!(
                        "ok    {} -> {name} (dry run, {} bytes)",
                        outcome.job_id(),
                        artifact.len()
                    ),
                }
            }
            JobOutcome::Failure { title, reason, .. } => {
                println!("FAIL  {} '{title}': {reason}", outcome.job_id());
            }
        }
    }
    Ok(run.summary())
}

/// `NN-<slug>.mp4`, numbered from 1 in batch order.
fn output_file_name(outcome: &JobOutcome) -> String {
    let slug = slug::slugify(outcome.title());
    let slug = if slug.is_empty() { "slide" } else { slug.as_str() };
    format!("{:02}-{slug}.mp4", outcome.job_id().0 + 1)
}
