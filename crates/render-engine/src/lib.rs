//! SlideReveal Render Engine
//!
//! Turns analyzed slides into the frames of the animated deck.
//!
//! # Pipeline Architecture
//!
//! ```text
//! input.pdf ── page j ── rasterize ──┬── background (first slide only)
//!                                    │          │
//!                                    └── boundaries
//!                                               │
//! page j-1 (history) ─────────────────── compose, one frame per boundary
//!                                               │
//!                                               ▼
//!                                     Deck (append, page order)
//!                                               │
//!                                               ▼
//!                                     input<suffix>.pdf
//! ```

pub mod animate;
pub mod compositor;

pub use animate::*;
pub use compositor::{compose, partial_reveal, CompositionOptions};
