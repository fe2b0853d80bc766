//! The PDF slide backend: lopdf for pages, a [`Rasterizer`] for pixels.

use std::path::Path;

use slidereveal_common::error::{SlideError, SlideResult};
use slidereveal_deck_model::{Deck, Rotation, SourcePage};
use slidereveal_raster_analysis::RasterImage;
use slidereveal_render_engine::SlideBackend;

use crate::document::SourceDocument;
use crate::ghostscript::{GhostscriptBinary, Rasterizer};
use crate::scratch::ScratchDir;

/// How the input document is prepared before slides are processed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BackendOptions {
    /// Merge annotations into page content first.
    pub flatten: bool,

    /// Rotation forced onto every page. `None` keeps each page's own.
    pub rotation: Option<Rotation>,
}

/// Slide backend over a PDF file on disk.
pub struct PdfBackend<R: Rasterizer = GhostscriptBinary> {
    rasterizer: R,
    source: SourceDocument,
    scratch: ScratchDir,
}

impl<R: Rasterizer> PdfBackend<R> {
    /// Open `input`, running the flatten pre-pass if asked to.
    ///
    /// The flattened copy lives in the scratch directory and goes away with
    /// the backend.
    pub fn open(input: &Path, rasterizer: R, options: &BackendOptions) -> SlideResult<Self> {
        if !input.exists() {
            return Err(SlideError::input_not_found(input));
        }

        let scratch = ScratchDir::new()?;
        let mut source = if options.flatten {
            let flattened = scratch.path().join("flattened.pdf");
            tracing::info!(input = %input.display(), "Flattening annotations");
            rasterizer.flatten(input, &flattened)?;
            SourceDocument::open(&flattened)?
        } else {
            SourceDocument::open(input)?
        };

        if let Some(rotation) = options.rotation {
            source.set_rotation(rotation)?;
        }

        Ok(Self {
            rasterizer,
            source,
            scratch,
        })
    }

    pub fn source(&self) -> &SourceDocument {
        &self.source
    }

    pub fn rasterizer(&self) -> &R {
        &self.rasterizer
    }

    pub fn scratch_path(&self) -> &Path {
        self.scratch.path()
    }
}

impl<R: Rasterizer> SlideBackend for PdfBackend<R> {
    fn pages(&self) -> SlideResult<Vec<SourcePage>> {
        self.source.pages()
    }

    fn rasterize_page(&mut self, page: &SourcePage) -> SlideResult<RasterImage> {
        let files = self
            .scratch
            .page(page.index, self.rasterizer.image_extension());

        self.source.extract_page(page.index, &files.pdf)?;
        self.rasterizer.render_page(&files.pdf, &files.image)?;
        let raster = RasterImage::open(&files.image)?;

        tracing::debug!(
            page = page.index + 1,
            width = raster.width(),
            height = raster.height(),
            "Rasterized page"
        );
        Ok(raster)
    }

    fn write_deck(&mut self, deck: &Deck, output: &Path) -> SlideResult<()> {
        self.source.deck_writer().write(deck, output)
    }

    fn name(&self) -> &str {
        "pdf"
    }
}
