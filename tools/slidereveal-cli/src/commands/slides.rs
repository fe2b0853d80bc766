//! Animate handwritten slides.

use slidereveal_common::config::AppConfig;
use slidereveal_deck_model::Color;
use slidereveal_raster_analysis::AnalysisConfig;
use slidereveal_render_engine::BackgroundMode;

use super::{run_reveal, Profile, RevealArgs};

/// Margin on every side of a handwritten page.
const HANDWRITTEN_MARGIN: u32 = 5;

/// Handwritten notes live in annotations, so they are always flattened.
/// Pages are white, and ink may run close to every edge.
pub fn profile(config: &AppConfig) -> Profile {
    Profile {
        flatten: true,
        analysis: AnalysisConfig::uniform(HANDWRITTEN_MARGIN, config.analysis.tolerance),
        background: BackgroundMode::Fixed(Color::WHITE),
    }
}

pub fn run(config: &AppConfig, args: RevealArgs) -> anyhow::Result<()> {
    run_reveal(config, args, profile(config))
}
