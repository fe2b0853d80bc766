//! SlideReveal Deck Model
//!
//! Defines the core data contracts shared by analysis, composition and
//! document output:
//! - **Color:** Grayscale or RGB fill colors derived from rasters
//! - **Page:** Source pages with their media box and display rotation
//! - **Frame:** Layered output pages and pane placement
//! - **Deck:** The ordered, append-only sequence of output frames
//!
//! Page-space coordinates follow PDF conventions: points, origin at the
//! lower-left corner, y growing upwards.

pub mod color;
pub mod deck;
pub mod frame;
pub mod page;

pub use color::*;
pub use deck::*;
pub use frame::*;
pub use page::*;
