use std::fs;
use std::path::{Path, PathBuf};

use flash_image_format::{pack_pixels, CHANNELS_PER_PIXEL};

use crate::error::ConvertError;
use crate::ppm::PpmImage;

/// Accessor header providing FLASH_STORAGE / EXTERN_FLASH_STORAGE
pub const DEFAULT_INCLUDE: &str = "modm/architecture/interface/accessor.hpp";

pub const SOURCE_EXTENSION: &str = "cpp";
pub const HEADER_EXTENSION: &str = "hpp";

const INDENT: &str = "        ";

/// Rendered outputs for one image, not yet on disk
#[derive(Debug, Clone)]
pub struct GeneratedPair {
    pub name: String,
    pub source: String,
    pub header: String,
}

pub struct Emitter {
    output_dir: PathBuf,
    include: String,
}

impl Emitter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            include: DEFAULT_INCLUDE.to_owned(),
        }
    }

    pub fn with_include(mut self, include: impl Into<String>) -> Self {
        self.include = include.into();
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Validate and pack `image`, then render both files in memory
    pub fn generate(&self, path: &Path, image: &PpmImage) -> Result<GeneratedPair, ConvertError> {
        let name = image_name(path)?;
        let pixels = pack_image(path, image)?;

        let body = render_body(image.width, image.height, &pixels);
        let source = render_source(&self.include, &name, &body);
        let header = render_header(
            &self.include,
            &path.display().to_string(),
            image.width,
            image.height,
            &name,
        );

        Ok(GeneratedPair {
            name,
            source,
            header,
        })
    }

    /// Write both files into the output directory, replacing older ones
    pub fn write(&self, pair: &GeneratedPair) -> Result<Vec<PathBuf>, ConvertError> {
        let mut written = Vec::with_capacity(2);

        let source_path = self.artifact_path(&pair.name, SOURCE_EXTENSION);
        fs::write(&source_path, &pair.source).map_err(|e| ConvertError::io(&source_path, e))?;
        written.push(source_path);

        let header_path = self.artifact_path(&pair.name, HEADER_EXTENSION);
        fs::write(&header_path, &pair.header).map_err(|e| ConvertError::io(&header_path, e))?;
        written.push(header_path);

        Ok(written)
    }

    fn artifact_path(&self, name: &str, extension: &str) -> PathBuf {
        self.output_dir.join(format!("{}.{}", name, extension))
    }
}

/// Array name for an input file: its base name without extension
pub fn image_name(path: &Path) -> Result<String, ConvertError> {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .ok_or_else(|| ConvertError::InvalidName {
            path: path.to_path_buf(),
        })
}

/// Check the channel count and pack `width * height` pixels in row-major order
pub fn pack_image(path: &Path, image: &PpmImage) -> Result<Vec<u16>, ConvertError> {
    let count = image.channels.len();
    if count % CHANNELS_PER_PIXEL != 0 {
        return Err(ConvertError::ChannelCount {
            path: path.to_path_buf(),
            count,
        });
    }

    let mismatch = || ConvertError::DimensionMismatch {
        path: path.to_path_buf(),
        width: image.width,
        height: image.height,
        expected: image.pixel_count().saturating_mul(CHANNELS_PER_PIXEL),
        found: count,
    };

    let expected = image
        .pixel_count()
        .checked_mul(CHANNELS_PER_PIXEL)
        .ok_or_else(mismatch)?;
    if count < expected {
        return Err(mismatch());
    }
    if count > expected {
        log::warn!(
            "{}: ignoring {} channel values past {}x{} pixels",
            path.display(),
            count - expected,
            image.width,
            image.height
        );
    }

    pack_pixels(&image.channels, image.pixel_count()).map_err(|_| mismatch())
}

/// Dimension line followed by the comma joined hex values
pub fn render_body(width: u32, height: u32, pixels: &[u16]) -> String {
    let values: Vec<String> = pixels.iter().map(|p| format!("{:#06x}", p)).collect();
    format!(
        "{indent}{}, {},\n{indent}{}",
        width,
        height,
        values.join(","),
        indent = INDENT
    )
}

/// Data file defining the flash array
pub fn render_source(include: &str, name: &str, body: &str) -> String {
    format!(
        "
#include <{include}>

namespace images
{{
\tFLASH_STORAGE(uint16_t {name}[]) =
\t{{
{body}
\t}};
}}
"
    )
}

/// Declaration file for the flash array
pub fn render_header(include: &str, source_path: &str, width: u32, height: u32, name: &str) -> String {
    format!(
        "
#include <{include}>

namespace images
{{
\t/**
\t * Generated from file \"{source_path}\".
\t *
\t * width  : {width}
\t * height : {height}
\t */
\tEXTERN_FLASH_STORAGE(uint16_t {name}[]);
}}
"
    )
}
