pub mod anim;
pub mod check;
pub mod info;
pub mod slides;

use std::path::{Path, PathBuf};

use anyhow::Context;
use slidereveal_common::config::AppConfig;
use slidereveal_common::error::SlideError;
use slidereveal_deck_model::{Placement, Rotation};
use slidereveal_pdf_backend::{BackendOptions, GhostscriptBinary, PdfBackend};
use slidereveal_raster_analysis::AnalysisConfig;
use slidereveal_render_engine::{
    animate_deck, AnimationJob, BackgroundMode, CompositionOptions, ProgressCallback, RevealMode,
    SlideProgress,
};

/// Options shared by `anim` and `slides`.
#[derive(Debug, Clone)]
pub struct RevealArgs {
    pub input: PathBuf,
    pub rotate: i64,
    pub history: bool,
    pub animate: bool,
    pub place: Placement,
    pub suffix: String,
    pub two_screens: bool,
    pub skip: usize,
}

/// What differs between the `anim` and `slides` tools.
#[derive(Debug, Clone, Copy)]
pub struct Profile {
    pub flatten: bool,
    pub analysis: AnalysisConfig,
    pub background: BackgroundMode,
}

/// `talk` and `talk.pdf` both name `talk.pdf`.
pub fn resolve_input(input: &Path) -> PathBuf {
    let is_pdf = input
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
    if is_pdf {
        input.to_path_buf()
    } else {
        let mut name = input.as_os_str().to_os_string();
        name.push(".pdf");
        PathBuf::from(name)
    }
}

/// `<dir>/<stem><suffix>.pdf` next to the input.
pub fn output_path(input_pdf: &Path, suffix: &str) -> PathBuf {
    let mut name = input_pdf.file_stem().unwrap_or_default().to_os_string();
    name.push(suffix);
    name.push(".pdf");
    input_pdf.with_file_name(name)
}

/// Every page gets the requested rotation, 0 included, so stray `/Rotate`
/// entries in the input are cleared.
pub fn backend_options(args: &RevealArgs, profile: &Profile) -> anyhow::Result<BackendOptions> {
    let rotation = Rotation::from_degrees(args.rotate).context("Invalid --rotate")?;
    Ok(BackendOptions {
        flatten: profile.flatten,
        rotation: Some(rotation),
    })
}

/// The one per-slide line shown while a deck is built.
pub fn progress_line(p: &SlideProgress) -> String {
    format!("slide {} of {}", p.slide, p.total)
}

pub fn run_reveal(config: &AppConfig, args: RevealArgs, profile: Profile) -> anyhow::Result<()> {
    let input = resolve_input(&args.input);
    if !input.exists() {
        return Err(SlideError::input_not_found(&input).into());
    }

    let options = backend_options(&args, &profile)?;
    let gs = GhostscriptBinary::from_defaults(&config.raster)?;
    let output = output_path(&input, &args.suffix);

    println!("Animating: {}", input.display());
    println!("  Output: {}", output.display());
    println!("  Ghostscript: {} ({})", gs.command(), gs.version());

    let mut backend = PdfBackend::open(&input, gs, &options)
        .with_context(|| format!("Failed to open {}", input.display()))?;

    let job = AnimationJob {
        output_path: output,
        analysis: profile.analysis,
        background: profile.background,
        reveal: if args.animate {
            RevealMode::LineByLine
        } else {
            RevealMode::WholeSlide
        },
        composition: CompositionOptions {
            history: args.history,
            placement: args.place,
            two_screens: args.two_screens,
        },
        skip_last: args.skip,
    };

    let progress: ProgressCallback = Box::new(|p| println!("{}", progress_line(&p)));

    let summary = animate_deck(&mut backend, &job, Some(progress))?;
    println!(
        "Wrote {} frames from {} slides to {} (fill {})",
        summary.frames,
        summary.slides,
        summary.output_path.display(),
        summary.background
    );
    Ok(())
}
