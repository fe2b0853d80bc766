//! SlideReveal PDF Backend
//!
//! Connects the animation pipeline to real documents:
//! - **Ghostscript:** Binary discovery, page rasterizing, annotation flattening
//! - **Document:** Reading source pages and writing decks with `lopdf`
//! - **Scratch:** Scoped per-page intermediates in a private directory

pub mod backend;
pub mod document;
pub mod ghostscript;
pub mod scratch;

pub use backend::{BackendOptions, PdfBackend};
pub use document::{DeckWriter, SourceDocument};
pub use ghostscript::{GhostscriptBinary, RasterSettings, Rasterizer};
pub use scratch::{PageScratch, ScratchDir};
