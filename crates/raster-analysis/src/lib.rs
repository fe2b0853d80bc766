//! SlideReveal Raster Analysis
//!
//! Decides, from a rasterized slide, where the reveal steps go:
//! - **Classification:** Background vs. ink, per pixel and per row
//! - **Background:** Estimating the true fill color of scanned slides
//! - **Boundaries:** Scanning ink bands top to bottom into reveal checkpoints
//!
//! This crate is pure computation over in-memory rasters. Rasterizing
//! pages is the caller's business.

pub mod analyzer;
pub mod background;
pub mod boundaries;
pub mod classify;
pub mod raster;

pub use analyzer::{AnalysisConfig, SlideAnalyzer};
pub use background::estimate_background;
pub use boundaries::{detect_boundaries, BoundaryList};
pub use classify::{is_background, is_background_line};
pub use raster::RasterImage;
