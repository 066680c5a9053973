//! ASCII PPM (P3) reader
//!
//! Layout accepted:
//!
//! ```text
//! P3
//! <comment line, ignored>
//! <width> <height>
//! <maxval>
//! <R> <G> <B> <R> <G> <B> ...
//! ```
//!
//! Everything after the comment line is whitespace separated and may be laid
//! out over any number of lines.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::num::ParseIntError;
use std::path::Path;
use std::str::FromStr;

use crate::error::ConvertError;

/// Magic number of the ASCII PPM variant
pub const PPM_MAGIC: &str = "P3";

/// The only maxval the packer assumes
pub const EXPECTED_MAXVAL: u16 = 255;

/// Decoded PPM contents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PpmImage {
    pub width: u32,
    pub height: u32,
    pub maxval: u16,
    /// Flat R,G,B,R,G,B,... sequence in file order
    pub channels: Vec<u8>,
}

impl PpmImage {
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// Lazy whitespace tokenizer pulling lines from the reader on demand
pub struct Tokens<R> {
    reader: R,
    line: String,
    pending: Vec<String>,
}

impl<R: BufRead> Tokens<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: String::new(),
            pending: Vec::new(),
        }
    }
}

impl<R: BufRead> Iterator for Tokens<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.pending.is_empty() {
            self.line.clear();
            match self.reader.read_line(&mut self.line) {
                Ok(0) => return None,
                Ok(_) => {
                    // Stored reversed so pop() yields tokens in order
                    self.pending = self.line.split_whitespace().rev().map(str::to_owned).collect();
                }
                Err(e) => return Some(Err(e)),
            }
        }
        self.pending.pop().map(Ok)
    }
}

/// Read and decode the PPM file at `path`
pub fn read_ppm(path: &Path) -> Result<PpmImage, ConvertError> {
    let file = File::open(path).map_err(|e| ConvertError::io(path, e))?;
    parse_ppm(BufReader::new(file), path)
}

/// Decode PPM data from any buffered reader; `path` is only used in errors
pub fn parse_ppm<R: BufRead>(mut reader: R, path: &Path) -> Result<PpmImage, ConvertError> {
    let mut line = String::new();
    reader.read_line(&mut line).map_err(|e| ConvertError::io(path, e))?;

    let magic = line.trim();
    if magic != PPM_MAGIC {
        return Err(ConvertError::BadMagic {
            path: path.to_path_buf(),
            found: magic.to_owned(),
        });
    }

    // Comment line, skipped without looking at it
    line.clear();
    reader.read_line(&mut line).map_err(|e| ConvertError::io(path, e))?;

    let mut tokens = Tokens::new(reader);
    let width: u32 = next_number(&mut tokens, path, "width")?;
    let height: u32 = next_number(&mut tokens, path, "height")?;
    let maxval: u16 = next_number(&mut tokens, path, "maxval")?;

    if maxval != EXPECTED_MAXVAL {
        log::warn!(
            "{}: maxval is {}, channel values are packed as if it were {}",
            path.display(),
            maxval,
            EXPECTED_MAXVAL
        );
    }

    let mut channels = Vec::new();
    for token in tokens {
        let token = token.map_err(|e| ConvertError::io(path, e))?;
        channels.push(parse_token(token, path, "channel value")?);
    }

    log::debug!(
        "{}: {}x{} maxval {}, {} channel values",
        path.display(),
        width,
        height,
        maxval,
        channels.len()
    );

    Ok(PpmImage {
        width,
        height,
        maxval,
        channels,
    })
}

fn next_number<R, T>(tokens: &mut Tokens<R>, path: &Path, field: &'static str) -> Result<T, ConvertError>
where
    R: BufRead,
    T: FromStr<Err = ParseIntError>,
{
    match tokens.next() {
        Some(Ok(token)) => parse_token(token, path, field),
        Some(Err(e)) => Err(ConvertError::io(path, e)),
        None => Err(ConvertError::UnexpectedEof {
            path: path.to_path_buf(),
            field,
        }),
    }
}

fn parse_token<T>(token: String, path: &Path, field: &'static str) -> Result<T, ConvertError>
where
    T: FromStr<Err = ParseIntError>,
{
    token.parse().map_err(|source| ConvertError::InvalidNumber {
        path: path.to_path_buf(),
        field,
        token,
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<PpmImage, ConvertError> {
        parse_ppm(text.as_bytes(), Path::new("test.ppm"))
    }

    #[test]
    fn test_tokens_span_lines() {
        let tokens: Vec<String> = Tokens::new("  1 2\n\n3\t4  \n 5".as_bytes())
            .collect::<io::Result<_>>()
            .unwrap();
        assert_eq!(tokens, ["1", "2", "3", "4", "5"]);
    }

    #[test]
    fn test_parse_basic() {
        let image = parse("P3\n#comment\n2 1\n255\n255 0 0 0 255 0\n").unwrap();
        assert_eq!(image.width, 2);
        assert_eq!(image.height, 1);
        assert_eq!(image.maxval, 255);
        assert_eq!(image.channels, vec![255, 0, 0, 0, 255, 0]);
        assert_eq!(image.pixel_count(), 2);
    }

    #[test]
    fn test_parse_free_layout() {
        let image = parse("P3\r\n# GIMP\r\n1\n1 255 1\n2\n\n 3").unwrap();
        assert_eq!(image.channels, vec![1, 2, 3]);
    }

    #[test]
    fn test_comment_line_is_skipped_unconditionally() {
        // No comment: the dimension line is swallowed instead
        let image = parse("P3\n9 9\n1 1\n255\n1 2 3\n").unwrap();
        assert_eq!((image.width, image.height), (1, 1));
    }

    #[test]
    fn test_rejects_binary_ppm() {
        match parse("P6\n#comment\n1 1\n255\n0 0 0\n") {
            Err(ConvertError::BadMagic { found, .. }) => assert_eq!(found, "P6"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_rejects_empty_file() {
        assert!(matches!(parse(""), Err(ConvertError::BadMagic { .. })));
    }

    #[test]
    fn test_truncated_header() {
        match parse("P3\n#comment\n4\n") {
            Err(ConvertError::UnexpectedEof { field, .. }) => assert_eq!(field, "height"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_invalid_tokens() {
        match parse("P3\n#\nwide 1\n255\n") {
            Err(ConvertError::InvalidNumber { field, token, .. }) => {
                assert_eq!(field, "width");
                assert_eq!(token, "wide");
            }
            other => panic!("unexpected result: {:?}", other),
        }

        // Channel values outside 0..=255 cannot be packed
        assert!(matches!(
            parse("P3\n#\n1 1\n255\n0 256 0\n"),
            Err(ConvertError::InvalidNumber { field: "channel value", .. })
        ));
    }

    #[test]
    fn test_keeps_non_default_maxval() {
        let image = parse("P3\n#\n1 1\n15\n15 15 15\n").unwrap();
        assert_eq!(image.maxval, 15);
        assert_eq!(image.channels, vec![15, 15, 15]);
    }
}
