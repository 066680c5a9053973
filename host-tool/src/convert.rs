use anyhow::{bail, Context, Result};
use indicatif::ProgressBar;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::emit::Emitter;
use crate::ppm::read_ppm;

/// Extension of the images picked up by discovery
pub const INPUT_EXTENSION: &str = "ppm";

pub struct ImageConverter {
    emitter: Emitter,
}

/// Outcome of converting one image
#[derive(Debug)]
pub struct ConvertedImage {
    pub name: String,
    pub pixels: usize,
    pub files: Vec<PathBuf>,
}

#[derive(Debug, Default)]
pub struct ConversionSummary {
    pub images: usize,
    pub pixels: usize,
    pub files_written: usize,
}

impl ImageConverter {
    pub fn new(emitter: Emitter) -> Self {
        Self { emitter }
    }

    /// Fail early when the destination is missing; it is never created here
    pub fn check_output_dir(&self) -> Result<()> {
        let dir = self.emitter.output_dir();
        if !dir.is_dir() {
            bail!("Output directory {} does not exist", dir.display());
        }
        Ok(())
    }

    /// Read, pack and emit a single image. Nothing is written unless the
    /// image passes validation.
    pub fn convert_file(&self, path: &Path) -> Result<ConvertedImage> {
        let image = read_ppm(path)?;
        let pair = self.emitter.generate(path, &image)?;
        let files = self.emitter.write(&pair)?;

        log::info!(
            "{} -> {} ({}x{}, {} files)",
            path.display(),
            pair.name,
            image.width,
            image.height,
            files.len()
        );
        for file in &files {
            log::debug!("  wrote {}", file.display());
        }

        Ok(ConvertedImage {
            name: pair.name,
            pixels: image.pixel_count(),
            files,
        })
    }

    /// Convert every file in order, stopping at the first failure
    pub fn convert_all(&self, files: &[PathBuf], progress: &ProgressBar) -> Result<ConversionSummary> {
        self.check_output_dir()?;

        let mut summary = ConversionSummary::default();
        for path in files {
            progress.set_message(path.display().to_string());

            let converted = self
                .convert_file(path)
                .with_context(|| format!("Failed to convert {}", path.display()))?;

            log::debug!("Packed {} ({} pixels)", converted.name, converted.pixels);
            summary.images += 1;
            summary.pixels += converted.pixels;
            summary.files_written += converted.files.len();
            progress.inc(1);
        }

        Ok(summary)
    }
}

/// All `*.ppm` files directly inside `dir`, hidden files excluded, sorted
pub fn discover_images(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).follow_links(true) {
        let entry = entry.with_context(|| format!("Failed to scan {}", dir.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }

        let hidden = entry.file_name().to_string_lossy().starts_with('.');
        let matches = entry.path().extension().map_or(false, |ext| ext == INPUT_EXTENSION);
        if matches && !hidden {
            files.push(entry.into_path());
        }
    }

    files.sort();
    log::debug!("Found {} image(s) in {}", files.len(), dir.display());
    Ok(files)
}
