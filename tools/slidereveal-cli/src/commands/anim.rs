//! Animate a typeset deck.

use slidereveal_common::config::AppConfig;
use slidereveal_raster_analysis::AnalysisConfig;
use slidereveal_render_engine::BackgroundMode;

use super::{run_reveal, Profile, RevealArgs};

/// Wide side margins keep slide frames and footers out of the band scan.
/// The occlusion fill is estimated from the first slide.
pub fn profile(config: &AppConfig, flatten: bool) -> Profile {
    Profile {
        flatten,
        analysis: AnalysisConfig::from(&config.analysis),
        background: BackgroundMode::Estimate,
    }
}

pub fn run(config: &AppConfig, args: RevealArgs, flatten: bool) -> anyhow::Result<()> {
    run_reveal(config, args, profile(config, flatten))
}
