//! Airline logos: fetched lazily, shrunk to a half-block tile and cached

use std::collections::{BTreeMap, BTreeSet};

use image::imageops::FilterType;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::LogoError;
use crate::results::ResultEntry;

pub const LOGO_BASE_URL: &str = "https://images.kiwi.com/airlines/32";

/// Terminal cells per logo: one row of half blocks
pub const TILE_COLS: u32 = 4;
pub const TILE_PIXEL_ROWS: u32 = 2;

/// Transparent pixels are blended onto this
const BACKDROP: Rgb = Rgb(24, 24, 32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// Downsampled logo, row-major pixels
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct LogoTile {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Rgb>,
}

impl LogoTile {
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get((y * self.width + x) as usize).copied()
    }

    /// Pairs of (upper, lower) pixels for each cell of a half-block row
    pub fn half_block_row(&self, row: u32) -> Vec<(Rgb, Rgb)> {
        (0..self.width)
            .map(|x| {
                let upper = self.pixel(x, row * 2).unwrap_or(BACKDROP);
                let lower = self.pixel(x, row * 2 + 1).unwrap_or(upper);
                (upper, lower)
            })
            .collect()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum LogoState {
    Loading,
    Ready(LogoTile),
    /// Shown as a text badge from then on
    Failed,
}

pub fn logo_url(code: &str) -> String {
    format!("{LOGO_BASE_URL}/{code}.png")
}

fn blend(channel: u8, backdrop: u8, alpha: u8) -> u8 {
    let alpha = u16::from(alpha);
    ((u16::from(channel) * alpha + u16::from(backdrop) * (255 - alpha)) / 255) as u8
}

/// Decode a PNG and shrink it to the tile size
pub fn decode_logo(bytes: &[u8]) -> Result<LogoTile, LogoError> {
    let image = image::load_from_memory(bytes)?;
    let small = image
        .resize_exact(TILE_COLS, TILE_PIXEL_ROWS, FilterType::Triangle)
        .to_rgba8();
    let pixels = small
        .pixels()
        .map(|p| {
            let [r, g, b, a] = p.0;
            Rgb(
                blend(r, BACKDROP.0, a),
                blend(g, BACKDROP.1, a),
                blend(b, BACKDROP.2, a),
            )
        })
        .collect();
    Ok(LogoTile {
        width: small.width(),
        height: small.height(),
        pixels,
    })
}

/// Airline codes of `entries` whose logo was never requested
pub fn pending_codes<'a>(
    entries: impl IntoIterator<Item = &'a ResultEntry>,
    logos: &BTreeMap<String, LogoState>,
) -> Vec<String> {
    let codes: BTreeSet<&String> = entries
        .into_iter()
        .flat_map(|entry| entry.airlines.iter())
        .filter(|code| !logos.contains_key(code.as_str()))
        .collect();
    codes.into_iter().cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, ImageFormat, Rgba};
    use std::io::Cursor;

    fn png(color: [u8; 4]) -> Vec<u8> {
        let img = ImageBuffer::from_pixel(32, 32, Rgba(color));
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_decode_shrinks_to_tile() {
        let tile = decode_logo(&png([200, 10, 10, 255])).unwrap();
        assert_eq!((tile.width, tile.height), (TILE_COLS, TILE_PIXEL_ROWS));
        assert_eq!(tile.pixel(0, 0), Some(Rgb(200, 10, 10)));
        assert_eq!(tile.half_block_row(0).len(), TILE_COLS as usize);
    }

    #[test]
    fn test_transparent_pixels_take_backdrop() {
        let tile = decode_logo(&png([255, 255, 255, 0])).unwrap();
        assert_eq!(tile.pixel(1, 1), Some(BACKDROP));
    }

    #[test]
    fn test_garbage_is_an_error() {
        assert!(decode_logo(b"not a png").is_err());
    }

    #[test]
    fn test_url() {
        assert_eq!(
            logo_url("FR"),
            "https://images.kiwi.com/airlines/32/FR.png"
        );
    }
}
