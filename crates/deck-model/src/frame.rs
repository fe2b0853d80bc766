//! Layered output frames.
//!
//! A [`ComposedFrame`] is a stack of axis-aligned layers, drawn bottom to
//! top. Every layer carries its own scale factors and offset; the frame's
//! page size is the bounding box of its layers.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::page::{ModelError, SourcePage};

/// A 2D affine transform in PDF `cm` order: `x' = a*x + c*y + e`, `y' = b*x + d*y + f`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Affine {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Affine {
    pub const IDENTITY: Affine = Affine {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    pub fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self { a, b, c, d, e, f }
    }

    pub fn translate(tx: f64, ty: f64) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    pub fn from_scale_translate(scale_x: f64, scale_y: f64, tx: f64, ty: f64) -> Self {
        Self::new(scale_x, 0.0, 0.0, scale_y, tx, ty)
    }

    /// The transform that applies `self` first and `next` afterwards.
    pub fn then(&self, next: &Affine) -> Affine {
        Affine {
            a: self.a * next.a + self.b * next.c,
            b: self.a * next.b + self.b * next.d,
            c: self.c * next.a + self.d * next.c,
            d: self.c * next.b + self.d * next.d,
            e: self.e * next.a + self.f * next.c + next.e,
            f: self.e * next.b + self.f * next.d + next.f,
        }
    }

    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.a * x + self.c * y + self.e,
            self.b * x + self.d * y + self.f,
        )
    }

    /// Coefficients in `cm` operand order.
    pub fn coefficients(&self) -> [f64; 6] {
        [self.a, self.b, self.c, self.d, self.e, self.f]
    }
}

/// Where the history pane sits relative to the current slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Placement {
    #[default]
    Left,
    Right,
    Top,
    Bottom,
}

impl Placement {
    /// Panes side by side (`left`/`right`) rather than stacked.
    pub fn is_horizontal(self) -> bool {
        matches!(self, Placement::Left | Placement::Right)
    }

    /// Placements that put the history pane in the leading position.
    pub fn history_leads(self) -> bool {
        matches!(self, Placement::Left | Placement::Top)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Placement::Left => "left",
            Placement::Right => "right",
            Placement::Top => "top",
            Placement::Bottom => "bottom",
        }
    }
}

impl FromStr for Placement {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" => Ok(Placement::Left),
            "right" => Ok(Placement::Right),
            "top" => Ok(Placement::Top),
            "bottom" => Ok(Placement::Bottom),
            _ => Err(ModelError::InvalidPlacement {
                value: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for Placement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a layer draws.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LayerContent {
    /// A source page, drawn as displayed (rotation applied).
    Page { page: SourcePage },

    /// A solid unit square in the given color.
    Fill { color: Color },
}

/// One positioned, scaled layer of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub content: LayerContent,
    pub x: f64,
    pub y: f64,
    pub scale_x: f64,
    pub scale_y: f64,
}

impl Layer {
    /// An unscaled page at the origin.
    pub fn page(page: SourcePage) -> Self {
        Self {
            content: LayerContent::Page { page },
            x: 0.0,
            y: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
        }
    }

    /// A unit-square fill at the origin.
    pub fn fill(color: Color) -> Self {
        Self {
            content: LayerContent::Fill { color },
            x: 0.0,
            y: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
        }
    }

    pub fn scaled(mut self, scale_x: f64, scale_y: f64) -> Self {
        self.scale_x = scale_x;
        self.scale_y = scale_y;
        self
    }

    pub fn intrinsic_size(&self) -> (f64, f64) {
        match &self.content {
            LayerContent::Page { page } => (page.width(), page.height()),
            LayerContent::Fill { .. } => (1.0, 1.0),
        }
    }

    /// Width on the output page.
    pub fn width(&self) -> f64 {
        self.intrinsic_size().0 * self.scale_x
    }

    /// Height on the output page.
    pub fn height(&self) -> f64 {
        self.intrinsic_size().1 * self.scale_y
    }

    /// Maps the layer's own space onto the output page.
    ///
    /// For pages this is the page's user space; for fills the unit square.
    pub fn transform(&self) -> Affine {
        let place = Affine::from_scale_translate(self.scale_x, self.scale_y, self.x, self.y);
        match &self.content {
            LayerContent::Page { page } => page.display_transform().then(&place),
            LayerContent::Fill { .. } => place,
        }
    }
}

/// A single output page of the animated deck.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComposedFrame {
    /// Index of the source page this frame reveals.
    pub source_index: usize,

    /// Raster row up to which the slide is revealed.
    pub boundary: u32,

    /// Output page width (points).
    pub width: f64,

    /// Output page height (points).
    pub height: f64,

    /// Layers, bottom to top.
    pub layers: Vec<Layer>,
}

impl ComposedFrame {
    /// Build a frame sized to the bounding box of its layers.
    pub fn from_layers(source_index: usize, boundary: u32, layers: Vec<Layer>) -> Self {
        let width = layers
            .iter()
            .map(|l| l.x + l.width())
            .fold(0.0_f64, f64::max);
        let height = layers
            .iter()
            .map(|l| l.y + l.height())
            .fold(0.0_f64, f64::max);
        Self {
            source_index,
            boundary,
            width,
            height,
            layers,
        }
    }

    /// The frame's layers moved by `(dx, dy)`, for embedding it as a pane.
    pub fn shifted_layers(&self, dx: f64, dy: f64) -> Vec<Layer> {
        self.layers
            .iter()
            .map(|l| Layer {
                x: l.x + dx,
                y: l.y + dy,
                ..*l
            })
            .collect()
    }

    /// Distinct source pages drawn by this frame.
    pub fn source_pages(&self) -> impl Iterator<Item = &SourcePage> {
        self.layers.iter().filter_map(|l| match &l.content {
            LayerContent::Page { page } => Some(page),
            LayerContent::Fill { .. } => None,
        })
    }
}
