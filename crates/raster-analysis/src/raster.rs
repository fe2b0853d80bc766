//! In-memory rasters of rendered slides.

use std::path::Path;

use image::{DynamicImage, GrayImage, RgbImage};
use slidereveal_common::error::{SlideError, SlideResult};
use slidereveal_deck_model::Color;

/// A rasterized slide, either single-channel or RGB.
#[derive(Debug, Clone)]
pub enum RasterImage {
    Gray(GrayImage),
    Rgb(RgbImage),
}

impl RasterImage {
    /// Wrap a decoded image, keeping grayscale rasters single-channel.
    ///
    /// Alpha is dropped; 16-bit and float rasters are reduced to 8 bits.
    pub fn from_dynamic(image: DynamicImage) -> Self {
        match image {
            DynamicImage::ImageLuma8(gray) => RasterImage::Gray(gray),
            DynamicImage::ImageRgb8(rgb) => RasterImage::Rgb(rgb),
            other if other.color().has_color() => RasterImage::Rgb(other.to_rgb8()),
            other => RasterImage::Gray(other.to_luma8()),
        }
    }

    /// Decode a raster file written by the rasterizer.
    pub fn open(path: &Path) -> SlideResult<Self> {
        let image = image::open(path).map_err(|e| {
            SlideError::rasterize(format!("Failed to decode {}: {e}", path.display()))
        })?;
        Ok(Self::from_dynamic(image))
    }

    pub fn width(&self) -> u32 {
        match self {
            RasterImage::Gray(img) => img.width(),
            RasterImage::Rgb(img) => img.width(),
        }
    }

    pub fn height(&self) -> u32 {
        match self {
            RasterImage::Gray(img) => img.height(),
            RasterImage::Rgb(img) => img.height(),
        }
    }

    /// The pixel at `(x, y)`, in the raster's own color layout.
    ///
    /// Panics when the coordinates are out of bounds, like `image`'s accessors.
    pub fn pixel(&self, x: u32, y: u32) -> Color {
        match self {
            RasterImage::Gray(img) => Color::Gray(img.get_pixel(x, y).0[0]),
            RasterImage::Rgb(img) => Color::Rgb(img.get_pixel(x, y).0),
        }
    }

    pub fn is_grayscale(&self) -> bool {
        matches!(self, RasterImage::Gray(_))
    }
}
