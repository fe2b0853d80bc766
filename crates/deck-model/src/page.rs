//! Source page geometry.

use serde::{Deserialize, Serialize};

use crate::frame::Affine;

/// A page rectangle in PDF user space (points).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageBox {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl PageBox {
    /// US Letter, used when a document declares no media box at all.
    pub const LETTER: PageBox = PageBox {
        x0: 0.0,
        y0: 0.0,
        x1: 612.0,
        y1: 792.0,
    };

    /// Build a box from two corners in any order.
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self {
            x0: x0.min(x1),
            y0: y0.min(y1),
            x1: x0.max(x1),
            y1: y0.max(y1),
        }
    }

    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }
}

/// Clockwise display rotation of a page, in quarter turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Rotation {
    #[default]
    None,
    Cw90,
    Cw180,
    Cw270,
}

impl Rotation {
    /// Parse a `/Rotate`-style angle. Negative angles and full turns are normalized.
    pub fn from_degrees(degrees: i64) -> Result<Self, ModelError> {
        match degrees.rem_euclid(360) {
            0 => Ok(Rotation::None),
            90 => Ok(Rotation::Cw90),
            180 => Ok(Rotation::Cw180),
            270 => Ok(Rotation::Cw270),
            _ => Err(ModelError::InvalidRotation { degrees }),
        }
    }

    pub fn degrees(self) -> i64 {
        match self {
            Rotation::None => 0,
            Rotation::Cw90 => 90,
            Rotation::Cw180 => 180,
            Rotation::Cw270 => 270,
        }
    }

    /// Whether the displayed page swaps width and height.
    pub fn is_quarter_turn(self) -> bool {
        matches!(self, Rotation::Cw90 | Rotation::Cw270)
    }
}

/// An immutable page of the input document.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SourcePage {
    /// Zero-based position in the input document.
    pub index: usize,

    /// The page's media box in its own user space.
    pub media_box: PageBox,

    /// Display rotation applied to the page.
    pub rotation: Rotation,
}

impl SourcePage {
    pub fn new(index: usize, media_box: PageBox, rotation: Rotation) -> Self {
        Self {
            index,
            media_box,
            rotation,
        }
    }

    /// Displayed width, after rotation.
    pub fn width(&self) -> f64 {
        if self.rotation.is_quarter_turn() {
            self.media_box.height()
        } else {
            self.media_box.width()
        }
    }

    /// Displayed height, after rotation.
    pub fn height(&self) -> f64 {
        if self.rotation.is_quarter_turn() {
            self.media_box.width()
        } else {
            self.media_box.height()
        }
    }

    /// Maps the page's user space onto `[0, width] x [0, height]` as displayed.
    pub fn display_transform(&self) -> Affine {
        let w = self.media_box.width();
        let h = self.media_box.height();
        let rotate = match self.rotation {
            Rotation::None => Affine::IDENTITY,
            Rotation::Cw90 => Affine::new(0.0, -1.0, 1.0, 0.0, 0.0, w),
            Rotation::Cw180 => Affine::new(-1.0, 0.0, 0.0, -1.0, w, h),
            Rotation::Cw270 => Affine::new(0.0, 1.0, -1.0, 0.0, h, 0.0),
        };
        Affine::translate(-self.media_box.x0, -self.media_box.y0).then(&rotate)
    }
}

/// Errors raised while building model values from user input.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("Rotation must be a multiple of 90 degrees, got {degrees}")]
    InvalidRotation { degrees: i64 },

    #[error("Unknown placement '{value}'. Use: left, right, top, bottom")]
    InvalidPlacement { value: String },
}
