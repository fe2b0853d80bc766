//! Frame compositor: combines the current slide, its occlusion mask, and
//! the history pane into one output page.
//!
//! Page space is PDF space (y up), so "anchored to the lower edge" means the
//! mask sits at the page origin and grows upwards, hiding the rows below the
//! reveal boundary.

use serde::{Deserialize, Serialize};
use slidereveal_common::error::{SlideError, SlideResult};
use slidereveal_deck_model::{Color, ComposedFrame, Layer, Placement, SourcePage};

/// How frames are laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompositionOptions {
    /// Show the previous slide next to the current one.
    pub history: bool,

    /// Where the history pane goes.
    pub placement: Placement,

    /// Lead with the (blank) history pane even on the first slide.
    pub two_screens: bool,
}

impl Default for CompositionOptions {
    fn default() -> Self {
        Self {
            history: true,
            placement: Placement::Left,
            two_screens: false,
        }
    }
}

/// Fraction of the page height still hidden once rows up to `boundary` are revealed.
pub fn occlusion_fraction(boundary: u32, image_height: u32) -> SlideResult<f64> {
    if image_height == 0 {
        return Err(SlideError::compose("Raster has zero height"));
    }
    if boundary >= image_height {
        return Err(SlideError::compose(format!(
            "Boundary {boundary} lies outside a raster of height {image_height}"
        )));
    }
    Ok(1.0 - boundary as f64 / image_height as f64)
}

/// The current slide with everything below `boundary` masked in `background`.
pub fn partial_reveal(
    current: &SourcePage,
    background: Color,
    boundary: u32,
    image_height: u32,
) -> SlideResult<ComposedFrame> {
    let fraction = occlusion_fraction(boundary, image_height)?;
    let mask = Layer::fill(background).scaled(current.width(), fraction * current.height());
    Ok(ComposedFrame::from_layers(
        current.index,
        boundary,
        vec![Layer::page(*current), mask],
    ))
}

/// One side of a two-pane frame.
enum Pane {
    Current(ComposedFrame),
    History(Layer),
}

impl Pane {
    fn width(&self) -> f64 {
        match self {
            Pane::Current(frame) => frame.width,
            Pane::History(layer) => layer.width(),
        }
    }

    fn height(&self) -> f64 {
        match self {
            Pane::Current(frame) => frame.height,
            Pane::History(layer) => layer.height(),
        }
    }

    fn layers_at(&self, dx: f64, dy: f64) -> Vec<Layer> {
        match self {
            Pane::Current(frame) => frame.shifted_layers(dx, dy),
            Pane::History(layer) => vec![Layer {
                x: layer.x + dx,
                y: layer.y + dy,
                ..*layer
            }],
        }
    }
}

/// Whether the history pane takes the leading position.
///
/// Only `left`/`top` lead with history, and on the first slide only when
/// `two_screens` asks for it.
pub fn history_first(placement: Placement, first_slide: bool, two_screens: bool) -> bool {
    placement.history_leads() && (!first_slide || two_screens)
}

/// Compose the output frame revealing `current` up to `boundary`.
///
/// `previous` is `None` for the first slide of the deck, which gets a blank
/// history pane in the background color, sized like the current pane.
pub fn compose(
    current: &SourcePage,
    previous: Option<&SourcePage>,
    background: Color,
    boundary: u32,
    image_height: u32,
    options: &CompositionOptions,
) -> SlideResult<ComposedFrame> {
    let partial = partial_reveal(current, background, boundary, image_height)?;
    if !options.history {
        return Ok(partial);
    }

    let first_slide = previous.is_none();
    let history = match previous {
        Some(page) => Layer::page(*page),
        None => Layer::fill(background).scaled(partial.width, partial.height),
    };

    let current_pane = Pane::Current(partial);
    let history_pane = Pane::History(history);
    let (leading, trailing) = if history_first(options.placement, first_slide, options.two_screens)
    {
        (history_pane, current_pane)
    } else {
        (current_pane, history_pane)
    };

    let mut layers = Vec::with_capacity(4);
    if options.placement.is_horizontal() {
        layers.extend(leading.layers_at(0.0, 0.0));
        layers.extend(trailing.layers_at(leading.width(), 0.0));
    } else {
        layers.extend(leading.layers_at(0.0, trailing.height()));
        layers.extend(trailing.layers_at(0.0, 0.0));
    }

    Ok(ComposedFrame::from_layers(current.index, boundary, layers))
}

#[cfg(test)]
mod tests {
    use super::*;
    use slidereveal_deck_model::{LayerContent, PageBox, Rotation};

    const PAPER: Color = Color::Rgb([250, 248, 240]);

    fn slide(index: usize) -> SourcePage {
        SourcePage::new(index, PageBox::new(0.0, 0.0, 720.0, 540.0), Rotation::None)
    }

    fn history(placement: Placement, two_screens: bool) -> CompositionOptions {
        CompositionOptions {
            history: true,
            placement,
            two_screens,
        }
    }

    fn is_page(layer: &Layer, index: usize) -> bool {
        matches!(layer.content, LayerContent::Page { page } if page.index == index)
    }

    fn is_fill(layer: &Layer) -> bool {
        matches!(layer.content, LayerContent::Fill { .. })
    }

    #[test]
    fn test_mask_covers_unrevealed_lower_part() {
        let frame = partial_reveal(&slide(0), PAPER, 300, 1000).unwrap();
        assert_eq!(frame.layers.len(), 2);
        assert!(is_page(&frame.layers[0], 0));

        let mask = &frame.layers[1];
        assert_eq!(mask.content, LayerContent::Fill { color: PAPER });
        assert_eq!((mask.x, mask.y), (0.0, 0.0));
        assert!((mask.width() - 720.0).abs() < 1e-9);
        assert!((mask.height() - 0.7 * 540.0).abs() < 1e-9);
        assert_eq!((frame.width, frame.height), (720.0, 540.0));
    }

    #[test]
    fn test_occlusion_fraction_bounds() {
        assert_eq!(occlusion_fraction(0, 800).unwrap(), 1.0);
        let last = occlusion_fraction(799, 800).unwrap();
        assert!(last > 0.0 && last < 1.0);
        assert!(occlusion_fraction(800, 800).is_err());
        assert!(occlusion_fraction(0, 0).is_err());
    }

    #[test]
    fn test_history_disabled_is_partial_reveal() {
        let options = CompositionOptions {
            history: false,
            ..CompositionOptions::default()
        };
        let frame = compose(&slide(3), Some(&slide(2)), PAPER, 5, 1000, &options).unwrap();
        assert_eq!(frame, partial_reveal(&slide(3), PAPER, 5, 1000).unwrap());
    }

    #[test]
    fn test_left_first_slide_leads_with_current() {
        let frame = compose(&slide(0), None, PAPER, 5, 1000, &history(Placement::Left, false))
            .unwrap();

        assert!(is_page(&frame.layers[0], 0));
        assert!(is_fill(&frame.layers[1]));
        let blank = &frame.layers[2];
        assert!(is_fill(blank));
        assert_eq!(blank.x, 720.0);
        assert_eq!((blank.width(), blank.height()), (720.0, 540.0));
        assert_eq!((frame.width, frame.height), (1440.0, 540.0));
    }

    #[test]
    fn test_left_first_slide_with_two_screens_leads_with_blank_history() {
        let frame =
            compose(&slide(0), None, PAPER, 5, 1000, &history(Placement::Left, true)).unwrap();

        let blank = &frame.layers[0];
        assert!(is_fill(blank));
        assert_eq!((blank.x, blank.y), (0.0, 0.0));
        assert_eq!((blank.width(), blank.height()), (720.0, 540.0));

        assert!(is_page(&frame.layers[1], 0));
        assert_eq!(frame.layers[1].x, 720.0);
        assert_eq!(frame.layers[2].x, 720.0);
    }

    #[test]
    fn test_left_later_slide_puts_previous_on_the_left() {
        let frame = compose(
            &slide(4),
            Some(&slide(3)),
            PAPER,
            5,
            1000,
            &history(Placement::Left, false),
        )
        .unwrap();

        assert!(is_page(&frame.layers[0], 3));
        assert_eq!(frame.layers[0].x, 0.0);
        assert!(is_page(&frame.layers[1], 4));
        assert_eq!(frame.layers[1].x, 720.0);
    }

    #[test]
    fn test_right_never_leads_with_history() {
        for two_screens in [false, true] {
            let frame = compose(
                &slide(1),
                Some(&slide(0)),
                PAPER,
                5,
                1000,
                &history(Placement::Right, two_screens),
            )
            .unwrap();
            assert!(is_page(&frame.layers[0], 1));
            assert!(is_page(&frame.layers[2], 0));
            assert_eq!(frame.layers[2].x, 720.0);
        }
    }

    #[test]
    fn test_top_stacks_history_above_current() {
        let frame = compose(
            &slide(1),
            Some(&slide(0)),
            PAPER,
            5,
            1000,
            &history(Placement::Top, false),
        )
        .unwrap();

        // Leading pane is lifted by the trailing pane's height.
        assert!(is_page(&frame.layers[0], 0));
        assert_eq!(frame.layers[0].y, 540.0);
        assert!(is_page(&frame.layers[1], 1));
        assert_eq!(frame.layers[1].y, 0.0);
        assert_eq!((frame.width, frame.height), (720.0, 1080.0));
    }

    #[test]
    fn test_bottom_puts_current_above_history() {
        let frame = compose(
            &slide(1),
            Some(&slide(0)),
            PAPER,
            5,
            1000,
            &history(Placement::Bottom, false),
        )
        .unwrap();

        assert!(is_page(&frame.layers[0], 1));
        assert_eq!(frame.layers[0].y, 540.0);
        assert_eq!(frame.layers[1].y, 540.0);
        assert!(is_page(&frame.layers[2], 0));
        assert_eq!(frame.layers[2].y, 0.0);
    }

    #[test]
    fn test_top_first_slide_without_two_screens_leads_with_current() {
        let frame =
            compose(&slide(0), None, PAPER, 5, 1000, &history(Placement::Top, false)).unwrap();
        assert!(is_page(&frame.layers[0], 0));
        assert_eq!(frame.layers[0].y, 540.0);
        assert!(is_fill(&frame.layers[2]));
        assert_eq!(frame.layers[2].y, 0.0);
    }

    #[test]
    fn test_history_pane_keeps_its_own_size() {
        let previous = SourcePage::new(0, PageBox::new(0.0, 0.0, 400.0, 300.0), Rotation::None);
        let frame = compose(
            &slide(1),
            Some(&previous),
            PAPER,
            5,
            1000,
            &history(Placement::Left, false),
        )
        .unwrap();

        assert_eq!(frame.layers[0].width(), 400.0);
        assert_eq!(frame.layers[1].x, 400.0);
        assert_eq!((frame.width, frame.height), (1120.0, 540.0));
    }

    #[test]
    fn test_history_first_truth_table() {
        assert!(!history_first(Placement::Left, true, false));
        assert!(history_first(Placement::Left, true, true));
        assert!(history_first(Placement::Left, false, false));
        assert!(history_first(Placement::Top, false, false));
        assert!(!history_first(Placement::Bottom, false, true));
        assert!(!history_first(Placement::Right, true, true));
    }
}
