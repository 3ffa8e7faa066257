use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};

use camgauge::replay::{replay_files, MAIN_VIEW};
use camgauge::{init_logging, Config, ViewId};

#[derive(Parser)]
#[command(name = "camgauge")]
#[command(about = "Measure and annotate camera frames with lines, circles and detected edges")]
#[command(version = concat!(env!("CARGO_PKG_VERSION"), " (built ", env!("BUILD_DATE"), ")"))]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a gesture script onto an image and print the measurement labels.
    Replay(ReplayArgs),

    /// Write the default settings file.
    InitConfig {
        /// Destination (.json or .toml); defaults to the platform config path.
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Args)]
struct ReplayArgs {
    /// Input frame.
    #[arg(long)]
    image: PathBuf,

    /// JSON gesture script.
    #[arg(long)]
    script: PathBuf,

    /// Where to write the annotated frame.
    #[arg(long)]
    out: PathBuf,

    /// Settings file (.json or .toml). Defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// View that receives the gestures (1 = main view, 2 = mirror view).
    #[arg(long, default_value_t = MAIN_VIEW.0)]
    camera_view: u32,
}

fn run_replay(args: ReplayArgs) -> anyhow::Result<()> {
    let config = match &args.config {
        Some(path) => Config::load_from_file(path)
            .with_context(|| format!("Failed to load settings {}", path.display()))?,
        None => Config::default(),
    };
    let rendered = replay_files(
        &args.image,
        &args.script,
        &args.out,
        &config,
        ViewId(args.camera_view),
    )?;
    for label in &rendered.labels {
        println!("{}\t{}", label.object_id, label.text);
    }
    Ok(())
}

fn init_config(out: Option<PathBuf>) -> anyhow::Result<()> {
    let path = match out {
        Some(path) => path,
        None => Config::default_path()?,
    };
    Config::default().save_to_file(&path)?;
    println!("{}", path.display());
    Ok(())
}

fn main() -> anyhow::Result<()> {
    init_logging()?;

    match Cli::parse().command {
        Commands::Replay(args) => run_replay(args),
        Commands::InitConfig { out } => init_config(out),
    }
}
