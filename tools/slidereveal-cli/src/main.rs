//! SlideReveal CLI: turn PDF slides into line-by-line reveal decks.
//!
//! Usage:
//!   slidereveal anim <INPUT>     Animate a typeset deck line by line
//!   slidereveal slides <INPUT>   Animate handwritten slides (flattened, white fill)
//!   slidereveal info <INPUT>     Show page count and geometry
//!   slidereveal check            Check for Ghostscript

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use slidereveal_common::config::AppConfig;
use slidereveal_deck_model::Placement;

mod commands;

use commands::RevealArgs;

#[derive(Parser)]
#[command(
    name = "slidereveal",
    about = "Line-by-line reveal animations for PDF slide decks",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file to use instead of the standard location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Animate a typeset deck: reveal each slide band by band
    Anim {
        /// Input PDF, with or without the .pdf extension
        input: PathBuf,

        /// Set the rotation of every page to this angle (multiple of 90)
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        rotate: i64,

        /// Do not show the previous slide next to the current one
        #[arg(long)]
        nohistory: bool,

        /// One frame per slide instead of one per band
        #[arg(long)]
        nolines: bool,

        /// Merge annotations into page content first
        #[arg(long)]
        flatten: bool,

        /// Where the previous slide goes: left, right, top or bottom
        #[arg(long, default_value = "left")]
        place: Placement,

        /// Suffix appended to the input name for the output file
        #[arg(long, default_value = "_anim")]
        addname: String,

        /// Lead with the blank history pane on the first slide too
        #[arg(long, hide = true)]
        twoscreens: bool,

        /// Leave out the last N pages
        #[arg(long, hide = true, default_value = "0")]
        skip: usize,
    },

    /// Animate handwritten slides: always flattened, pure white fill, tight margins
    Slides {
        /// Input PDF, with or without the .pdf extension
        input: PathBuf,

        /// Set the rotation of every page to this angle (multiple of 90)
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        rotate: i64,

        /// Do not show the previous slide next to the current one
        #[arg(long)]
        nohistory: bool,

        /// One frame per slide instead of one per band
        #[arg(long)]
        noanim: bool,

        /// Where the previous slide goes: left, right, top or bottom
        #[arg(long, default_value = "left")]
        place: Placement,

        /// Suffix appended to the input name for the output file
        #[arg(long, default_value = "_slides")]
        addname: String,

        /// Lead with the blank history pane on the first slide too
        #[arg(long, hide = true)]
        twoscreens: bool,

        /// Leave out the last N pages
        #[arg(long, hide = true, default_value = "0")]
        skip: usize,
    },

    /// Show page count and page geometry
    Info {
        /// Input PDF, with or without the .pdf extension
        input: PathBuf,

        /// Print the pages as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check whether Ghostscript can be found
    Check,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => AppConfig::load(),
    };

    // Initialize logging
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    slidereveal_common::logging::init_logging(&config.logging);

    match cli.command {
        Commands::Anim {
            input,
            rotate,
            nohistory,
            nolines,
            flatten,
            place,
            addname,
            twoscreens,
            skip,
        } => commands::anim::run(
            &config,
            RevealArgs {
                input,
                rotate,
                history: !nohistory,
                animate: !nolines,
                place,
                suffix: addname,
                two_screens: twoscreens,
                skip,
            },
            flatten,
        ),
        Commands::Slides {
            input,
            rotate,
            nohistory,
            noanim,
            place,
            addname,
            twoscreens,
            skip,
        } => commands::slides::run(
            &config,
            RevealArgs {
                input,
                rotate,
                history: !nohistory,
                animate: !noanim,
                place,
                suffix: addname,
                two_screens: twoscreens,
                skip,
            },
        ),
        Commands::Info { input, json } => commands::info::run(input, json),
        Commands::Check => commands::check::run(&config),
    }
}
