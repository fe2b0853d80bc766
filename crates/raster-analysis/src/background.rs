//! Background color estimation.
//!
//! Scanned or exported slides are rarely pure white. The fill color of the
//! occlusion mask is estimated by averaging the raw values of the pixels
//! that classify as background inside a centered interior rectangle, which
//! keeps title bars and page borders out of the sample.

use slidereveal_common::error::{SlideError, SlideResult};
use slidereveal_deck_model::Color;

use crate::classify::is_background;
use crate::raster::RasterImage;

/// Average background color of the interior
/// `[3*side, W - 3*side) x [3*top, H - 3*top)`.
///
/// RGB channels are averaged over the same sample set. The result has the
/// raster's color layout. Returns [`SlideError::DegenerateSample`] when no
/// pixel in the region is background.
pub fn estimate_background(
    image: &RasterImage,
    top_margin: u32,
    side_margin: u32,
    tolerance: u8,
) -> SlideResult<Color> {
    let x0 = side_margin.saturating_mul(3);
    let x1 = image.width().saturating_sub(side_margin.saturating_mul(3));
    let y0 = top_margin.saturating_mul(3);
    let y1 = image.height().saturating_sub(top_margin.saturating_mul(3));

    let mut sums = [0u64; 3];
    let mut samples = 0u64;

    for y in y0..y1 {
        for x in x0..x1 {
            let pixel = image.pixel(x, y);
            if !is_background(pixel, tolerance) {
                continue;
            }
            for (sum, &channel) in sums.iter_mut().zip(pixel.channels()) {
                *sum += channel as u64;
            }
            samples += 1;
        }
    }

    if samples == 0 {
        return Err(SlideError::DegenerateSample {
            width: x1.saturating_sub(x0),
            height: y1.saturating_sub(y0),
        });
    }

    let average = |sum: u64| mean_ties_even(sum, samples);
    let color = match image {
        RasterImage::Gray(_) => Color::Gray(average(sums[0])),
        RasterImage::Rgb(_) => Color::Rgb([average(sums[0]), average(sums[1]), average(sums[2])]),
    };

    tracing::debug!(%color, samples, "Estimated slide background");
    Ok(color)
}

/// `sum / count` rounded to the nearest integer, exact halves to even.
fn mean_ties_even(sum: u64, count: u64) -> u8 {
    let mut q = sum / count;
    let r = sum % count;
    if 2 * r > count || (2 * r == count && q % 2 == 1) {
        q += 1;
    }
    q.min(255) as u8
}
