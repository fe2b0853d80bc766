//! Fill colors derived from rasterized slides.

use serde::{Deserialize, Serialize};

/// A pixel value or fill color.
///
/// The variant always matches the pixel layout of the raster it was read
/// from: grayscale rasters yield [`Color::Gray`], color rasters [`Color::Rgb`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    Gray(u8),
    Rgb([u8; 3]),
}

impl Color {
    /// Pure white in RGB.
    pub const WHITE: Color = Color::Rgb([255, 255, 255]);

    /// Raw channel values (one for grayscale, three for RGB).
    pub fn channels(&self) -> &[u8] {
        match self {
            Color::Gray(v) => std::slice::from_ref(v),
            Color::Rgb(c) => c,
        }
    }

    /// The color as an RGB triple, replicating grayscale intensity.
    pub fn to_rgb(self) -> [u8; 3] {
        match self {
            Color::Gray(v) => [v, v, v],
            Color::Rgb(c) => c,
        }
    }

    /// Channels scaled to `[0.0, 1.0]`, as PDF color operators expect.
    pub fn unit_channels(&self) -> Vec<f32> {
        self.channels().iter().map(|&c| c as f32 / 255.0).collect()
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Color::Gray(v) => write!(f, "gray({v})"),
            Color::Rgb([r, g, b]) => write!(f, "rgb({r}, {g}, {b})"),
        }
    }
}
