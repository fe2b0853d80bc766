//! Animation jobs: drive every slide through rasterize → analyze → compose
//! and assemble the resulting frames into one deck.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use slidereveal_common::error::{SlideError, SlideResult};
use slidereveal_deck_model::{Color, Deck, SourcePage};
use slidereveal_raster_analysis::{AnalysisConfig, BoundaryList, RasterImage, SlideAnalyzer};

use crate::compositor::{compose, CompositionOptions};

/// Where the occlusion fill color comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackgroundMode {
    /// Estimate it from the first slide's raster.
    Estimate,
    /// Use a fixed color.
    Fixed(Color),
}

/// How each slide is split into frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevealMode {
    /// One frame per ink band.
    LineByLine,
    /// One frame per slide.
    WholeSlide,
}

/// An animation job ready to be run against a backend.
#[derive(Debug, Clone)]
pub struct AnimationJob {
    /// Output document path.
    pub output_path: PathBuf,

    /// Margins and tolerance for slide analysis.
    pub analysis: AnalysisConfig,

    /// Occlusion fill color source.
    pub background: BackgroundMode,

    /// Line-by-line or whole-slide reveal.
    pub reveal: RevealMode,

    /// Pane layout.
    pub composition: CompositionOptions,

    /// Number of trailing slides left out.
    pub skip_last: usize,
}

/// Progress callback, invoked once per slide before it is rasterized.
pub type ProgressCallback = Box<dyn Fn(SlideProgress)>;

/// Per-slide progress report.
#[derive(Debug, Clone, Copy)]
pub struct SlideProgress {
    /// One-based slide number.
    pub slide: usize,

    /// Slides that will be processed in total.
    pub total: usize,

    /// Frames assembled so far.
    pub frames_so_far: usize,
}

/// Result of a completed animation job.
#[derive(Debug, Clone, Serialize)]
pub struct AnimationSummary {
    pub output_path: PathBuf,
    pub slides: usize,
    pub frames: usize,
    pub background: Color,
}

/// Everything the pipeline needs from the outside world: the input pages,
/// a way to rasterize them, and a way to write the finished deck.
pub trait SlideBackend {
    /// Input pages in document order.
    fn pages(&self) -> SlideResult<Vec<SourcePage>>;

    /// Rasterize one page. Intermediates are released before returning.
    fn rasterize_page(&mut self, page: &SourcePage) -> SlideResult<RasterImage>;

    /// Write the whole deck as one output document.
    fn write_deck(&mut self, deck: &Deck, output: &Path) -> SlideResult<()>;

    /// Backend name.
    fn name(&self) -> &str;
}

/// Rasterize, analyze and compose every slide, in page order.
///
/// Returns the assembled deck together with the fill color used. Any
/// failure aborts the whole job.
pub fn build_deck(
    backend: &mut dyn SlideBackend,
    job: &AnimationJob,
    progress: Option<&ProgressCallback>,
) -> SlideResult<(Deck, Color)> {
    let pages = backend.pages()?;
    let total = pages.len().saturating_sub(job.skip_last);
    if total == 0 {
        return Err(SlideError::document(format!(
            "Nothing to animate: {} page(s), {} skipped",
            pages.len(),
            job.skip_last
        )));
    }

    let analyzer = SlideAnalyzer::new(job.analysis);
    let mut deck = Deck::new();
    let mut fill: Option<Color> = None;

    for (j, page) in pages.iter().take(total).enumerate() {
        tracing::debug!(slide = j + 1, total, "Rasterizing slide");
        if let Some(cb) = progress {
            cb(SlideProgress {
                slide: j + 1,
                total,
                frames_so_far: deck.len(),
            });
        }

        let raster = backend.rasterize_page(page)?;

        // The first slide fixes the fill color for the whole deck.
        let background = match fill {
            Some(color) => color,
            None => {
                let color = match job.background {
                    BackgroundMode::Estimate => analyzer.background(&raster)?,
                    BackgroundMode::Fixed(color) => color,
                };
                tracing::info!(%color, "Using background fill");
                fill = Some(color);
                color
            }
        };

        let boundaries = match job.reveal {
            RevealMode::LineByLine => analyzer.boundaries(&raster),
            RevealMode::WholeSlide => BoundaryList::single(raster.height().saturating_sub(1)),
        };

        let previous = j.checked_sub(1).map(|p| &pages[p]);
        let frames = boundaries
            .iter()
            .map(|boundary| {
                compose(
                    page,
                    previous,
                    background,
                    boundary,
                    raster.height(),
                    &job.composition,
                )
            })
            .collect::<SlideResult<Vec<_>>>()?;

        tracing::debug!(
            slide = j + 1,
            frames = frames.len(),
            raster_width = raster.width(),
            raster_height = raster.height(),
            "Composed slide"
        );
        deck.extend_page(frames);
    }

    let background = fill.ok_or_else(|| SlideError::compose("No slide was processed"))?;
    Ok((deck, background))
}

/// Run an animation job end to end and write the output document.
///
/// Nothing is written unless every slide was processed.
pub fn animate_deck(
    backend: &mut dyn SlideBackend,
    job: &AnimationJob,
    progress: Option<ProgressCallback>,
) -> SlideResult<AnimationSummary> {
    tracing::info!(
        backend = backend.name(),
        output = %job.output_path.display(),
        placement = %job.composition.placement,
        history = job.composition.history,
        reveal = ?job.reveal,
        "Starting animation"
    );

    let (deck, background) = build_deck(backend, job, progress.as_ref())?;
    let mut sources: Vec<usize> = deck.frames().iter().map(|f| f.source_index).collect();
    sources.dedup();

    backend.write_deck(&deck, &job.output_path)?;

    tracing::info!(
        frames = deck.len(),
        output = %job.output_path.display(),
        "Wrote animated deck"
    );

    Ok(AnimationSummary {
        output_path: job.output_path.clone(),
        slides: sources.len(),
        frames: deck.len(),
        background,
    })
}
