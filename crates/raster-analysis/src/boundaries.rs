//! Reveal boundary detection.
//!
//! # Algorithm
//!
//! Rows `top_margin .. H - bottom_margin` are classified once each (see
//! [`is_background_line`]) and fed through a three-state scanner:
//!
//! 1. **LeadingGap:** background above the first ink. The first ink row
//!    starts a band.
//! 2. **InBand:** inside an ink band. A background row opens a gap.
//! 3. **InGap:** between bands. The next ink row `y` closes the gap and
//!    emits `y - 1`, the last row revealed before that band.
//!
//! Reaching the bound while in a band or gap emits `H - bottom_margin - 1`.
//! The list always starts with `top_margin`.

use crate::classify::is_background_line;
use crate::raster::RasterImage;

/// Cumulative reveal checkpoints of one slide, in raster rows.
///
/// Non-empty and strictly increasing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundaryList(Vec<u32>);

impl BoundaryList {
    /// A single reveal step at `row` (used when line-by-line animation is off).
    pub fn single(row: u32) -> Self {
        Self(vec![row])
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Lists come only from `detect_boundaries` and `single`, so this is never true.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.0.iter().copied()
    }

    pub fn last(&self) -> u32 {
        self.0[self.0.len() - 1]
    }

    pub fn into_vec(self) -> Vec<u32> {
        self.0
    }
}

impl<'a> IntoIterator for &'a BoundaryList {
    type Item = u32;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, u32>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter().copied()
    }
}

/// Scanner state while walking rows top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    LeadingGap,
    InBand,
    InGap,
}

/// Scan a slide top to bottom into reveal boundaries.
pub fn detect_boundaries(
    image: &RasterImage,
    top_margin: u32,
    bottom_margin: u32,
    side_margin: u32,
    tolerance: u8,
) -> BoundaryList {
    let bound = image.height().saturating_sub(bottom_margin);
    let mut boundaries = vec![top_margin];
    let mut state = ScanState::LeadingGap;

    for y in top_margin..bound {
        let background = is_background_line(image, y, side_margin, side_margin, tolerance);
        state = match (state, background) {
            (ScanState::LeadingGap, true) => ScanState::LeadingGap,
            (ScanState::LeadingGap, false) => ScanState::InBand,
            (ScanState::InBand, false) => ScanState::InBand,
            (ScanState::InBand, true) => ScanState::InGap,
            (ScanState::InGap, true) => ScanState::InGap,
            (ScanState::InGap, false) => {
                boundaries.push(y - 1);
                ScanState::InBand
            }
        };
    }

    if state != ScanState::LeadingGap {
        boundaries.push(bound - 1);
    }

    tracing::debug!(?boundaries, height = image.height(), "Detected reveal boundaries");
    BoundaryList(boundaries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma, Rgb, RgbImage};
    use imageproc::drawing::draw_filled_rect_mut;
    use imageproc::rect::Rect;
    use proptest::prelude::*;

    const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
    const INK: Rgb<u8> = Rgb([30, 30, 120]);

    /// A white slide with ink drawn over the inclusive row ranges.
    fn slide(width: u32, height: u32, bands: &[(u32, u32)]) -> RasterImage {
        let mut img = RgbImage::from_pixel(width, height, WHITE);
        for &(start, end) in bands {
            draw_filled_rect_mut(
                &mut img,
                Rect::at(100, start as i32).of_size(width / 2, end - start + 1),
                INK,
            );
        }
        RasterImage::Rgb(img)
    }

    #[test]
    fn test_two_bands_on_board() {
        let image = slide(1000, 800, &[(10, 150), (300, 500)]);
        let boundaries = detect_boundaries(&image, 5, 5, 50, 120);
        assert_eq!(boundaries.as_slice(), &[5, 299, 794]);
    }

    #[test]
    fn test_blank_slide_yields_top_margin_only() {
        let image = slide(400, 300, &[]);
        let boundaries = detect_boundaries(&image, 5, 5, 50, 120);
        assert_eq!(boundaries.as_slice(), &[5]);
        assert!(!boundaries.is_empty());
        assert_eq!(boundaries.last(), 5);
    }

    #[test]
    fn test_single_step_list() {
        let boundaries = BoundaryList::single(799);
        assert_eq!(boundaries.len(), 1);
        assert!(!boundaries.is_empty());
        assert_eq!(boundaries.last(), 799);
    }

    #[test]
    fn test_one_continuous_region_reveals_in_one_step() {
        let image = slide(400, 300, &[(20, 250)]);
        assert_eq!(detect_boundaries(&image, 5, 5, 50, 120).as_slice(), &[5, 294]);
    }

    #[test]
    fn test_ink_reaching_bottom_margin() {
        let image = slide(400, 300, &[(20, 60), (100, 299)]);
        assert_eq!(detect_boundaries(&image, 5, 5, 50, 120).as_slice(), &[5, 99, 294]);
    }

    #[test]
    fn test_ink_starting_at_top_margin() {
        let image = slide(400, 300, &[(0, 40), (80, 90)]);
        assert_eq!(detect_boundaries(&image, 5, 5, 50, 120).as_slice(), &[5, 79, 294]);
    }

    #[test]
    fn test_ink_inside_side_margin_is_ignored() {
        let mut img = RgbImage::from_pixel(400, 300, WHITE);
        draw_filled_rect_mut(&mut img, Rect::at(0, 100).of_size(40, 50), INK);
        let image = RasterImage::Rgb(img);
        assert_eq!(detect_boundaries(&image, 5, 5, 50, 120).as_slice(), &[5]);
    }

    #[test]
    fn test_faint_marks_within_tolerance_are_background() {
        let mut img = GrayImage::from_pixel(300, 200, Luma([250]));
        draw_filled_rect_mut(&mut img, Rect::at(100, 50).of_size(50, 20), Luma([200]));
        draw_filled_rect_mut(&mut img, Rect::at(100, 120).of_size(50, 20), Luma([40]));
        let image = RasterImage::Gray(img);
        assert_eq!(detect_boundaries(&image, 5, 5, 50, 120).as_slice(), &[5, 194]);
    }

    #[test]
    fn test_image_shorter_than_margins() {
        let image = slide(400, 8, &[(0, 7)]);
        assert_eq!(detect_boundaries(&image, 5, 5, 50, 120).as_slice(), &[5]);
    }

    #[test]
    fn test_extra_background_rows_only_move_final_boundary() {
        let short = detect_boundaries(&slide(600, 500, &[(30, 80), (200, 260)]), 5, 5, 50, 120);
        let tall = detect_boundaries(&slide(600, 900, &[(30, 80), (200, 260)]), 5, 5, 50, 120);

        let n = short.len();
        assert_eq!(n, tall.len());
        assert_eq!(short.as_slice()[..n - 1], tall.as_slice()[..n - 1]);
        assert_eq!(short.last(), 494);
        assert_eq!(tall.last(), 894);
    }

    proptest! {
        #[test]
        fn prop_boundaries_are_strictly_increasing(
            cuts in proptest::collection::btree_set(6u32..394, 0..12),
        ) {
            // Pair sorted cut rows into disjoint inclusive bands.
            let cuts: Vec<u32> = cuts.into_iter().collect();
            let bands: Vec<(u32, u32)> = cuts.chunks_exact(2).map(|c| (c[0], c[1])).collect();
            let image = slide(300, 400, &bands);

            let boundaries = detect_boundaries(&image, 5, 5, 50, 120);
            let rows = boundaries.as_slice();

            prop_assert_eq!(rows[0], 5);
            prop_assert!(rows.windows(2).all(|w| w[0] < w[1]));
            prop_assert!(boundaries.last() < 400 - 5);
            if bands.is_empty() {
                prop_assert_eq!(rows.len(), 1);
            } else {
                prop_assert_eq!(boundaries.last(), 394);
            }
        }
    }
}
