use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing::Level;

#[derive(Parser, Debug)]
#[command(name = "mdlreel", version)]
struct Cli {
    /// Log debug output.
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log warnings and errors.
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a script: display/save a still, or render and assemble an animation.
    Run(RunArgs),
    /// Print the animation plan and per-frame knob values as JSON, without rendering.
    Plan(PlanArgs),
}

#[derive(Parser, Debug)]
struct RunArgs {
    /// Script JSON.
    script: PathBuf,

    /// Settings JSON (every field optional).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory for numbered animation frames.
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Directory for the assembled animation.
    #[arg(long)]
    animation_dir: Option<PathBuf>,

    /// Image width in pixels.
    #[arg(long)]
    width: Option<u32>,

    /// Image height in pixels.
    #[arg(long)]
    height: Option<u32>,

    /// Tessellation steps for spheres and tori.
    #[arg(long)]
    subdivisions: Option<usize>,

    /// Program used for `display` commands.
    #[arg(long)]
    viewer: Option<String>,
}

#[derive(Parser, Debug)]
struct PlanArgs {
    /// Script JSON.
    script: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose {
        Level::DEBUG
    } else if cli.quiet {
        Level::WARN
    } else {
        Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match cli.cmd {
        Command::Run(args) => cmd_run(args),
        Command::Plan(args) => cmd_plan(args),
    }
}

fn cmd_run(args: RunArgs) -> anyhow::Result<()> {
    let mut settings = match &args.config {
        Some(path) => mdlreel::RenderSettings::from_path(path)?,
        None => mdlreel::RenderSettings::default(),
    };
    if let Some(dir) = args.out_dir {
        settings.output_dir = dir;
    }
    if let Some(dir) = args.animation_dir {
        settings.animation_dir = dir;
    }
    if let Some(w) = args.width {
        settings.width = w;
    }
    if let Some(h) = args.height {
        settings.height = h;
    }
    if let Some(n) = args.subdivisions {
        settings.subdivisions = n;
    }
    if let Some(v) = args.viewer {
        settings.viewer = v;
    }

    let mut script = mdlreel::Script::from_path(&args.script)
        .with_context(|| format!("load script '{}'", args.script.display()))?;

    let mut sink = mdlreel::FileSink::new(mdlreel::FileSinkOpts {
        viewer: settings.viewer.clone(),
        animation_dir: settings.animation_dir.clone(),
        frame_delay_ms: settings.frame_delay_ms,
    });
    let mut rasterizer = mdlreel::ScanlineRasterizer::new();

    let summary = mdlreel::run_script(&mut script, &settings, &mut rasterizer, &mut sink)?;

    if summary.num_frames > 1 {
        eprintln!(
            "wrote {} frames to '{}' and {}",
            summary.frames.len(),
            settings.output_dir.display(),
            sink.animation_path(&summary.basename).display()
        );
    }
    Ok(())
}

fn cmd_plan(args: PlanArgs) -> anyhow::Result<()> {
    let script = mdlreel::Script::from_path(&args.script)
        .with_context(|| format!("load script '{}'", args.script.display()))?;
    let compiled = mdlreel::compile_script(&script)?;
    let json = serde_json::to_string_pretty(&compiled).context("serialize plan")?;
    println!("{json}");
    Ok(())
}
