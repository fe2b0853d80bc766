//! The animated deck: an append-only sequence of frames.

use serde::{Deserialize, Serialize};

use crate::frame::ComposedFrame;

/// Ordered output frames. Insertion order is reveal order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Deck {
    frames: Vec<ComposedFrame>,
}

impl Deck {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one frame at the end of the deck.
    pub fn push(&mut self, frame: ComposedFrame) {
        self.frames.push(frame);
    }

    /// Append all frames of one source page, keeping their boundary order.
    pub fn extend_page(&mut self, frames: impl IntoIterator<Item = ComposedFrame>) {
        self.frames.extend(frames);
    }

    pub fn frames(&self) -> &[ComposedFrame] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Number of frames revealing the given source page.
    pub fn frames_for_page(&self, source_index: usize) -> usize {
        self.frames
            .iter()
            .filter(|f| f.source_index == source_index)
            .count()
    }

    /// Serialize the frame layout (not the page content) as pretty JSON.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
