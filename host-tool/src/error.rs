use std::io;
use std::num::ParseIntError;
use std::path::PathBuf;

/// Errors raised while reading a PPM file or emitting its sources
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("Unexpected file format in {}. Expected a P3 magic number for ASCII PPM, got {found}", path.display())]
    BadMagic { path: PathBuf, found: String },

    #[error("Expected multiple of 3 pixel values from {}, found {count}", path.display())]
    ChannelCount { path: PathBuf, count: usize },

    #[error("{} declares {width}x{height} pixels ({expected} values) but contains only {found}", path.display())]
    DimensionMismatch {
        path: PathBuf,
        width: u32,
        height: u32,
        expected: usize,
        found: usize,
    },

    #[error("Unexpected end of data in {} while reading {field}", path.display())]
    UnexpectedEof { path: PathBuf, field: &'static str },

    #[error("Invalid {field} {token:?} in {}", path.display())]
    InvalidNumber {
        path: PathBuf,
        field: &'static str,
        token: String,
        #[source]
        source: ParseIntError,
    },

    #[error("Cannot derive an image name from {}", path.display())]
    InvalidName { path: PathBuf },

    #[error("I/O error on {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ConvertError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_show_plain_paths() {
        let err = ConvertError::BadMagic {
            path: PathBuf::from("images/logo.ppm"),
            found: "P6".to_owned(),
        };
        assert_eq!(
            err.to_string(),
            "Unexpected file format in images/logo.ppm. Expected a P3 magic number for ASCII PPM, got P6"
        );

        let err = ConvertError::ChannelCount {
            path: PathBuf::from("images/logo.ppm"),
            count: 7,
        };
        assert_eq!(
            err.to_string(),
            "Expected multiple of 3 pixel values from images/logo.ppm, found 7"
        );
    }
}
