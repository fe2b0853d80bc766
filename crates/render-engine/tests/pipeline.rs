use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use image::{Rgb, RgbImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;
use slidereveal_common::error::{SlideError, SlideResult};
use slidereveal_deck_model::{
    Color, Deck, LayerContent, PageBox, Placement, Rotation, SourcePage,
};
use slidereveal_raster_analysis::{AnalysisConfig, RasterImage};
use slidereveal_render_engine::{
    animate_deck, build_deck, AnimationJob, BackgroundMode, CompositionOptions, RevealMode,
    SlideBackend, SlideProgress,
};

const PAPER: Rgb<u8> = Rgb([248, 246, 238]);
const INK: Rgb<u8> = Rgb([20, 20, 60]);

/// In-memory backend: each page is a synthetic raster with the given ink bands.
struct FakeBackend {
    slides: Vec<Vec<(u32, u32)>>,
    fail_on: Option<usize>,
    rasterized: Vec<usize>,
    written: Option<(Deck, PathBuf)>,
}

impl FakeBackend {
    fn new(slides: Vec<Vec<(u32, u32)>>) -> Self {
        Self {
            slides,
            fail_on: None,
            rasterized: vec![],
            written: None,
        }
    }
}

impl SlideBackend for FakeBackend {
    fn pages(&self) -> SlideResult<Vec<SourcePage>> {
        Ok((0..self.slides.len())
            .map(|i| SourcePage::new(i, PageBox::new(0.0, 0.0, 720.0, 576.0), Rotation::None))
            .collect())
    }

    fn rasterize_page(&mut self, page: &SourcePage) -> SlideResult<RasterImage> {
        if self.fail_on == Some(page.index) {
            return Err(SlideError::rasterize("ghostscript exited with status 1"));
        }
        self.rasterized.push(page.index);

        let mut img = RgbImage::from_pixel(1000, 800, PAPER);
        for &(start, end) in &self.slides[page.index] {
            draw_filled_rect_mut(
                &mut img,
                Rect::at(200, start as i32).of_size(500, end - start + 1),
                INK,
            );
        }
        Ok(RasterImage::Rgb(img))
    }

    fn write_deck(&mut self, deck: &Deck, output: &Path) -> SlideResult<()> {
        self.written = Some((deck.clone(), output.to_path_buf()));
        Ok(())
    }

    fn name(&self) -> &str {
        "fake"
    }
}

fn job(reveal: RevealMode, history: bool) -> AnimationJob {
    AnimationJob {
        output_path: PathBuf::from("talk_anim.pdf"),
        analysis: AnalysisConfig::default(),
        background: BackgroundMode::Estimate,
        reveal,
        composition: CompositionOptions {
            history,
            placement: Placement::Left,
            two_screens: false,
        },
        skip_last: 0,
    }
}

fn three_slides() -> Vec<Vec<(u32, u32)>> {
    vec![
        vec![(10, 150), (300, 500)],
        vec![(40, 90), (200, 260), (400, 420)],
        vec![],
    ]
}

#[test]
fn deck_has_one_frame_per_boundary_in_page_order() {
    slidereveal_common::logging::init_default_logging();
    let mut backend = FakeBackend::new(three_slides());

    let summary = animate_deck(&mut backend, &job(RevealMode::LineByLine, true), None).unwrap();

    // 3 + 4 + 1 boundaries
    assert_eq!(summary.frames, 8);
    assert_eq!(summary.slides, 3);
    assert_eq!(summary.background, Color::Rgb([248, 246, 238]));

    let (deck, path) = backend.written.expect("deck should be written");
    assert_eq!(path, PathBuf::from("talk_anim.pdf"));
    let order: Vec<(usize, u32)> = deck
        .frames()
        .iter()
        .map(|f| (f.source_index, f.boundary))
        .collect();
    assert_eq!(
        order,
        vec![
            (0, 5),
            (0, 299),
            (0, 794),
            (1, 5),
            (1, 199),
            (1, 399),
            (1, 794),
            (2, 5),
        ]
    );
    assert_eq!(backend.rasterized, vec![0, 1, 2]);
}

#[test]
fn frames_of_one_slide_share_the_previous_page() {
    let mut backend = FakeBackend::new(three_slides());
    let (deck, _) = build_deck(&mut backend, &job(RevealMode::LineByLine, true), None).unwrap();

    for frame in deck.frames().iter().filter(|f| f.source_index == 1) {
        let history = &frame.layers[0];
        assert!(matches!(history.content, LayerContent::Page { page } if page.index == 0));
    }
}

#[test]
fn first_slide_gets_blank_history_in_estimated_color() {
    let mut backend = FakeBackend::new(three_slides());
    let (deck, background) =
        build_deck(&mut backend, &job(RevealMode::LineByLine, true), None).unwrap();

    let first = &deck.frames()[0];
    let blank = first.layers.last().unwrap();
    assert_eq!(blank.content, LayerContent::Fill { color: background });
    assert_eq!((blank.width(), blank.height()), (720.0, 576.0));
    assert_eq!((first.width, first.height), (1440.0, 576.0));
}

#[test]
fn whole_slide_reveal_without_history_keeps_pages_untouched() {
    let mut backend = FakeBackend::new(three_slides());
    let (deck, _) = build_deck(&mut backend, &job(RevealMode::WholeSlide, false), None).unwrap();

    assert_eq!(deck.len(), 3);
    for (i, frame) in deck.frames().iter().enumerate() {
        assert_eq!(frame.boundary, 799);
        assert_eq!((frame.width, frame.height), (720.0, 576.0));

        let layer = &frame.layers[0];
        assert!(matches!(layer.content, LayerContent::Page { page } if page.index == i));
        assert_eq!((layer.x, layer.y, layer.scale_x, layer.scale_y), (0.0, 0.0, 1.0, 1.0));

        // Only the last raster row stays masked.
        let mask = &frame.layers[1];
        assert!((mask.height() - 576.0 / 800.0).abs() < 1e-9);
    }
}

#[test]
fn skip_leaves_out_trailing_slides() {
    let mut backend = FakeBackend::new(three_slides());
    let mut job = job(RevealMode::LineByLine, false);
    job.skip_last = 2;

    let summary = animate_deck(&mut backend, &job, None).unwrap();
    assert_eq!(summary.slides, 1);
    assert_eq!(summary.frames, 3);
    assert_eq!(backend.rasterized, vec![0]);
}

#[test]
fn skipping_everything_is_an_error() {
    let mut backend = FakeBackend::new(three_slides());
    let mut job = job(RevealMode::LineByLine, false);
    job.skip_last = 5;

    assert!(animate_deck(&mut backend, &job, None).is_err());
    assert!(backend.written.is_none());
}

#[test]
fn failure_midway_writes_nothing() {
    let mut backend = FakeBackend::new(three_slides());
    backend.fail_on = Some(1);

    let err = animate_deck(&mut backend, &job(RevealMode::LineByLine, true), None).unwrap_err();
    assert!(matches!(err, SlideError::Rasterize { .. }));
    assert!(backend.written.is_none());
    assert_eq!(backend.rasterized, vec![0]);
}

#[test]
fn fixed_background_skips_estimation() {
    let mut backend = FakeBackend::new(three_slides());
    let mut job = job(RevealMode::LineByLine, true);
    job.background = BackgroundMode::Fixed(Color::WHITE);

    let (deck, background) = build_deck(&mut backend, &job, None).unwrap();
    assert_eq!(background, Color::WHITE);
    assert_eq!(
        deck.frames()[0].layers[1].content,
        LayerContent::Fill {
            color: Color::WHITE
        }
    );
}

#[test]
fn progress_reports_every_slide() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let mut backend = FakeBackend::new(three_slides());

    animate_deck(
        &mut backend,
        &job(RevealMode::LineByLine, true),
        Some(Box::new(move |p: SlideProgress| {
            sink.borrow_mut().push((p.slide, p.total, p.frames_so_far))
        })),
    )
    .unwrap();

    assert_eq!(*seen.borrow(), vec![(1, 3, 0), (2, 3, 3), (3, 3, 7)]);
}

#[test]
fn deck_layout_serializes() {
    let mut backend = FakeBackend::new(three_slides());
    let (deck, _) = build_deck(&mut backend, &job(RevealMode::LineByLine, true), None).unwrap();
    let json = serde_json::to_value(&deck).unwrap();
    assert_eq!(json["frames"].as_array().unwrap().len(), 8);
}
