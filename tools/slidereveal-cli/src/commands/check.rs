//! Check external tool availability.

use slidereveal_common::config::{config_file_path, AppConfig};
use slidereveal_pdf_backend::GhostscriptBinary;

pub fn run(config: &AppConfig) -> anyhow::Result<()> {
    println!("SlideReveal System Check");
    println!("{}", "=".repeat(50));

    match GhostscriptBinary::from_defaults(&config.raster) {
        Ok(gs) => {
            println!("[OK] Ghostscript: {} (version {})", gs.command(), gs.version());
        }
        Err(e) => {
            println!("[MISSING] {e}");
            println!(
                "     Tried: {}",
                config.raster.ghostscript_candidates.join(", ")
            );
        }
    }

    println!(
        "[OK] Raster: {} dpi, device {}",
        config.raster.dpi, config.raster.device
    );
    println!("     Config file: {}", config_file_path().display());

    Ok(())
}
