//! Decoded photographs and their pixel views.

use std::path::Path;

use image::{DynamicImage, GrayImage, Luma, RgbImage};
use serde::{Deserialize, Serialize};

use super::stats::{ChannelStats, Histogram};
use crate::error::ImageLoadError;

/// Image dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageDimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl ImageDimensions {
    /// Creates a new dimensions record.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Pixel count.
    #[must_use]
    pub const fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

/// Grayscale value of an RGB pixel using ITU-R BT.601 weights, rounded.
#[allow(clippy::cast_possible_truncation)]
#[must_use]
pub const fn luma_bt601([r, g, b]: [u8; 3]) -> u8 {
    // Max is (255 * 1000 + 500) / 1000 = 255.
    ((r as u32 * 299 + g as u32 * 587 + b as u32 * 114 + 500) / 1000) as u8
}

/// A photograph under analysis.
///
/// Holds the encoded bytes (forwarded to the perception services), an RGB
/// pixel matrix and a BT.601 grayscale raster. Channel order of the matrix is
/// always R, G, B; alpha is dropped.
#[derive(Debug, Clone)]
pub struct PhotoImage {
    source: String,
    pixels: RgbImage,
    gray: GrayImage,
    encoded: Vec<u8>,
}

impl PhotoImage {
    /// Reads and decodes an image file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or decoded.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ImageLoadError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| ImageLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::decode(path.to_string_lossy(), bytes)
    }

    /// Decodes an in-memory image, e.g. an upload.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are not a supported image or the image
    /// has no pixels.
    pub fn decode(source: impl Into<String>, bytes: Vec<u8>) -> Result<Self, ImageLoadError> {
        let source = source.into();
        let image = match image::load_from_memory(&bytes) {
            Ok(image) => image,
            Err(err) => {
                return Err(ImageLoadError::Decode {
                    source_name: source,
                    source: err,
                })
            }
        };
        Self::from_parts(source, &image, bytes)
    }

    /// Builds an image from an already decoded picture and its encoding.
    ///
    /// # Errors
    ///
    /// Returns an error if the image has a zero dimension.
    pub fn from_parts(
        source: impl Into<String>,
        image: &DynamicImage,
        encoded: Vec<u8>,
    ) -> Result<Self, ImageLoadError> {
        let source = source.into();
        if image.width() == 0 || image.height() == 0 {
            return Err(ImageLoadError::EmptyImage(source));
        }
        let pixels = image.to_rgb8();
        let gray = GrayImage::from_fn(pixels.width(), pixels.height(), |x, y| {
            Luma([luma_bt601(pixels.get_pixel(x, y).0)])
        });
        Ok(Self {
            source,
            pixels,
            gray,
            encoded,
        })
    }

    /// Path or upload name the image came from.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    /// Height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Width and height.
    #[must_use]
    pub fn dimensions(&self) -> ImageDimensions {
        ImageDimensions::new(self.width(), self.height())
    }

    /// Original encoded bytes.
    #[must_use]
    pub fn encoded(&self) -> &[u8] {
        &self.encoded
    }

    /// RGB pixel matrix.
    #[must_use]
    pub const fn pixels(&self) -> &RgbImage {
        &self.pixels
    }

    /// BT.601 grayscale raster.
    #[must_use]
    pub const fn luma(&self) -> &GrayImage {
        &self.gray
    }

    /// RGB value at column `x`, row `y`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are out of bounds.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        self.pixels.get_pixel(x, y).0
    }

    /// Per-channel (R, G, B) statistics over the pixels selected by `include`.
    #[must_use]
    pub fn channel_stats(&self, include: impl Fn(u32, u32) -> bool) -> [ChannelStats; 3] {
        let selected: Vec<[u8; 3]> = self
            .pixels
            .enumerate_pixels()
            .filter(|(x, y, _)| include(*x, *y))
            .map(|(_, _, p)| p.0)
            .collect();
        [0, 1, 2].map(|c| Histogram::from_values(selected.iter().map(|p| p[c])).stats())
    }

    /// Grayscale statistics over the pixels selected by `include`.
    #[must_use]
    pub fn gray_stats(&self, include: impl Fn(u32, u32) -> bool) -> ChannelStats {
        let values = self
            .gray
            .enumerate_pixels()
            .filter(|(x, y, _)| include(*x, *y))
            .map(|(_, _, p)| p.0[0]);
        Histogram::from_values(values).stats()
    }

    /// Mean grayscale brightness of the whole image (0-255).
    #[must_use]
    pub fn mean_brightness(&self) -> f64 {
        self.gray_stats(|_, _| true).mean
    }
}
