//! Slide analysis with a fixed set of margins and tolerance.

use serde::{Deserialize, Serialize};
use slidereveal_common::config::AnalysisDefaults;
use slidereveal_common::error::SlideResult;
use slidereveal_deck_model::Color;

use crate::background::estimate_background;
use crate::boundaries::{detect_boundaries, BoundaryList};
use crate::raster::RasterImage;

/// Configuration for slide analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// A channel counts as background when it is at least `255 - tolerance`.
    pub tolerance: u8,

    /// Rows skipped at the top. Also the first reveal boundary.
    pub top_margin: u32,

    /// Rows skipped at the bottom.
    pub bottom_margin: u32,

    /// Columns skipped at both sides of every row.
    pub side_margin: u32,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self::from(&AnalysisDefaults::default())
    }
}

impl From<&AnalysisDefaults> for AnalysisConfig {
    fn from(defaults: &AnalysisDefaults) -> Self {
        Self {
            tolerance: defaults.tolerance,
            top_margin: defaults.top_margin,
            bottom_margin: defaults.bottom_margin,
            side_margin: defaults.side_margin,
        }
    }
}

impl AnalysisConfig {
    /// The same margin on every side, as used for handwritten slides.
    pub fn uniform(margin: u32, tolerance: u8) -> Self {
        Self {
            tolerance,
            top_margin: margin,
            bottom_margin: margin,
            side_margin: margin,
        }
    }
}

/// Runs background estimation and boundary detection on rasterized slides.
#[derive(Debug, Clone)]
pub struct SlideAnalyzer {
    config: AnalysisConfig,
}

impl SlideAnalyzer {
    /// Create a new analyzer with the given configuration.
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    /// Create an analyzer with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(AnalysisConfig::default())
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Estimate the slide's background fill color.
    pub fn background(&self, image: &RasterImage) -> SlideResult<Color> {
        estimate_background(
            image,
            self.config.top_margin,
            self.config.side_margin,
            self.config.tolerance,
        )
    }

    /// Reveal boundaries of one slide.
    pub fn boundaries(&self, image: &RasterImage) -> BoundaryList {
        detect_boundaries(
            image,
            self.config.top_margin,
            self.config.bottom_margin,
            self.config.side_margin,
            self.config.tolerance,
        )
    }
}
