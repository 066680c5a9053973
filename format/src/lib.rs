#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "std")]
extern crate std;

#[cfg(feature = "std")]
use std::vec::Vec;

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

/// Channels per source pixel (R, G, B)
pub const CHANNELS_PER_PIXEL: usize = 3;

/// Pack an RGB888 triplet into RGB565.
///
/// Red and blue keep their top 5 bits, green its top 6. The low bits are
/// truncated, never rounded.
pub const fn make_rgb(red: u8, green: u8, blue: u8) -> u16 {
    let r5 = (red >> 3) as u16;
    let g6 = (green >> 2) as u16;
    let b5 = (blue >> 3) as u16;
    (r5 << 11) | (g6 << 5) | b5
}

/// Expand an RGB565 value back to 8-bit channels, low bits zero.
pub const fn split_rgb(packed: u16) -> (u8, u8, u8) {
    let red = ((packed >> 11) << 3) as u8;
    let green = (((packed >> 5) & 0x3F) << 2) as u8;
    let blue = ((packed & 0x1F) << 3) as u8;
    (red, green, blue)
}

/// Pack the first `pixel_count` triplets of a flat R,G,B,... sequence.
///
/// Trailing channels past `pixel_count * 3` are ignored.
pub fn pack_pixels(channels: &[u8], pixel_count: usize) -> Result<Vec<u16>, &'static str> {
    let needed = pixel_count
        .checked_mul(CHANNELS_PER_PIXEL)
        .ok_or("Pixel count overflow")?;
    if channels.len() < needed {
        return Err("Insufficient channel data");
    }

    Ok(channels[..needed]
        .chunks_exact(CHANNELS_PER_PIXEL)
        .map(|p| make_rgb(p[0], p[1], p[2]))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_primary_colors() {
        assert_eq!(make_rgb(0, 0, 0), 0x0000);
        assert_eq!(make_rgb(255, 255, 255), 0xFFFF);
        assert_eq!(make_rgb(255, 0, 0), 0xF800);
        assert_eq!(make_rgb(0, 255, 0), 0x07E0);
        assert_eq!(make_rgb(0, 0, 255), 0x001F);
    }

    #[test]
    fn test_low_bits_truncated() {
        // 7 and 3 sit entirely below the kept bits
        assert_eq!(make_rgb(7, 3, 7), 0x0000);
        assert_eq!(make_rgb(8, 4, 8), 0x0821);
    }

    #[test]
    fn test_pack_pixels_ignores_trailing() {
        let channels = [255, 0, 0, 0, 255, 0, 9];
        let pixels = pack_pixels(&channels, 2).unwrap();
        assert_eq!(pixels, vec![0xF800, 0x07E0]);
    }

    #[test]
    fn test_pack_pixels_short_input() {
        assert!(pack_pixels(&[1, 2, 3], 2).is_err());
    }

    proptest! {
        #[test]
        fn prop_split_recovers_truncated_channels(r: u8, g: u8, b: u8) {
            prop_assert_eq!(split_rgb(make_rgb(r, g, b)), (r & 0xF8, g & 0xFC, b & 0xF8));
        }
    }
}
