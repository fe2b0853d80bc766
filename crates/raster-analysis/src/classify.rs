//! Background/ink classification.
//!
//! A pixel is background when every channel is at least `255 - tolerance`.
//! One dark or saturated channel is enough to make it ink.

use slidereveal_deck_model::Color;

use crate::raster::RasterImage;

/// Whether a single pixel counts as background.
pub fn is_background(pixel: Color, tolerance: u8) -> bool {
    let threshold = 255u8.saturating_sub(tolerance);
    pixel.channels().iter().all(|&c| c >= threshold)
}

/// Whether row `y` is background across `[left_margin, width - right_margin)`.
///
/// An empty span counts as background.
pub fn is_background_line(
    image: &RasterImage,
    y: u32,
    left_margin: u32,
    right_margin: u32,
    tolerance: u8,
) -> bool {
    let end = image.width().saturating_sub(right_margin);
    (left_margin..end).all(|x| is_background(image.pixel(x, y), tolerance))
}
