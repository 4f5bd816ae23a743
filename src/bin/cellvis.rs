use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "cellvis", version, about)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the whole sequence into TIFF and/or AVI chunks.
    Render(ConfigArgs),
    /// Load and validate everything, then print the sequence shape and chunk plan.
    Check(ConfigArgs),
    /// Composite a single frame as a PNG.
    Frame(FrameArgs),
}

#[derive(Parser, Debug)]
struct ConfigArgs {
    /// Run configuration JSON.
    #[arg(long)]
    config: PathBuf,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Run configuration JSON.
    #[arg(long)]
    config: PathBuf,

    /// Frame index (0-based).
    #[arg(long)]
    frame: u64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Check(args) => cmd_check(args),
        Command::Frame(args) => cmd_frame(args),
    }
}

fn cmd_render(args: ConfigArgs) -> anyhow::Result<()> {
    let mut sess = cellvis::VisualizerSession::open(&args.config)
        .with_context(|| format!("load session from '{}'", args.config.display()))?;
    let stats = sess.run()?;
    eprintln!(
        "wrote {} frames in {} chunks ({} files, {:.2} MB)",
        stats.frames,
        stats.chunks,
        stats.artifacts.len(),
        stats.bytes_written() as f64 / (1024.0 * 1024.0)
    );
    Ok(())
}

fn cmd_check(args: ConfigArgs) -> anyhow::Result<()> {
    let sess = cellvis::VisualizerSession::open(&args.config)
        .with_context(|| format!("load session from '{}'", args.config.display()))?;
    let summary = sess.summary()?;
    print!("{summary}");
    for range in sess.chunk_plan()? {
        println!("chunk {range}");
    }
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let mut sess = cellvis::VisualizerSession::open(&args.config)
        .with_context(|| format!("load session from '{}'", args.config.display()))?;
    let frame = sess.render_frame(cellvis::FrameIndex(args.frame))?;

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    image::save_buffer_with_format(
        &args.out,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgb8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}
