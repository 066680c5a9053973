use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;

mod convert;
mod emit;
mod error;
mod ppm;

use convert::{discover_images, ImageConverter};
use emit::{Emitter, DEFAULT_INCLUDE};

/// Output location relative to the input directory
const DEFAULT_OUTPUT_DIR: &str = "../src/ui/images";

#[derive(Parser)]
#[command(name = "ppm-convert")]
#[command(about = "Convert ASCII PPM images into RGB565 flash storage sources")]
#[command(version = "0.1.0")]
struct Cli {
    /// Directory scanned for *.ppm images [default: current working directory]
    #[arg(short, long, default_value = ".", hide_default_value = true)]
    input_dir: PathBuf,

    /// Destination for generated files (must exist) [default: <INPUT_DIR>/../src/ui/images]
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Accessor header included by the generated sources
    #[arg(long, default_value = DEFAULT_INCLUDE)]
    include: String,

    /// Convert these files instead of scanning the input directory
    files: Vec<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let output_dir = cli
        .output_dir
        .unwrap_or_else(|| cli.input_dir.join(DEFAULT_OUTPUT_DIR));

    let files = if cli.files.is_empty() {
        discover_images(&cli.input_dir)
            .with_context(|| format!("Failed to list images in {}", cli.input_dir.display()))?
    } else {
        cli.files
    };

    if files.is_empty() {
        log::warn!("No .ppm images found in {}", cli.input_dir.display());
        return Ok(());
    }

    log::info!("Converting {} image(s) into {}", files.len(), output_dir.display());

    let emitter = Emitter::new(output_dir).with_include(cli.include);
    let converter = ImageConverter::new(emitter);

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .context("Invalid progress template")?,
    );

    let summary = converter.convert_all(&files, &pb)?;

    pb.finish_with_message("done");
    println!(
        "Converted {} image(s), {} pixels, {} files written",
        summary.images, summary.pixels, summary.files_written
    );

    Ok(())
}
