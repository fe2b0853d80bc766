//! Ghostscript discovery and invocation.
//!
//! The binary is resolved once, up front, and then passed around as a
//! [`GhostscriptBinary`] value. Every later call runs that exact command.

use std::ffi::OsString;
use std::path::Path;
use std::process::{Command, Output, Stdio};

use slidereveal_common::config::RasterDefaults;
use slidereveal_common::error::{SlideError, SlideResult};

/// Turns single-page PDFs into raster images and flattens annotations.
pub trait Rasterizer {
    /// Rasterize the first page of `pdf` into `image`.
    fn render_page(&self, pdf: &Path, image: &Path) -> SlideResult<()>;

    /// Rewrite `input` into `output` with annotations merged into page content.
    fn flatten(&self, input: &Path, output: &Path) -> SlideResult<()>;

    /// File extension of the images written by [`Rasterizer::render_page`].
    fn image_extension(&self) -> &str;
}

/// Resolution and output device for rasterizing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterSettings {
    pub dpi: u32,
    pub device: String,
}

impl Default for RasterSettings {
    fn default() -> Self {
        Self::from(&RasterDefaults::default())
    }
}

impl From<&RasterDefaults> for RasterSettings {
    fn from(defaults: &RasterDefaults) -> Self {
        Self {
            dpi: defaults.dpi,
            device: defaults.device.clone(),
        }
    }
}

impl RasterSettings {
    /// File extension matching the output device.
    pub fn extension(&self) -> &'static str {
        match self.device.as_str() {
            "jpeg" | "jpeggray" | "jpegcmyk" => "jpg",
            d if d.starts_with("png") => "png",
            d if d.starts_with("tiff") => "tif",
            "pnmraw" | "pnm" => "pnm",
            "pgmraw" | "pgm" => "pgm",
            "ppmraw" | "ppm" => "ppm",
            _ => "img",
        }
    }
}

/// A Ghostscript executable known to run.
#[derive(Debug, Clone)]
pub struct GhostscriptBinary {
    command: String,
    version: String,
    settings: RasterSettings,
}

impl GhostscriptBinary {
    /// Probe `candidates` in order and keep the first one that answers `--version`.
    pub fn resolve(candidates: &[String], settings: RasterSettings) -> SlideResult<Self> {
        for candidate in candidates {
            match probe_version(candidate) {
                Some(version) => {
                    tracing::info!(command = %candidate, %version, "Found Ghostscript");
                    return Ok(Self {
                        command: candidate.clone(),
                        version,
                        settings,
                    });
                }
                None => tracing::debug!(command = %candidate, "Ghostscript candidate not usable"),
            }
        }

        Err(SlideError::MissingDependency {
            tried: candidates.to_vec(),
        })
    }

    /// Resolve using the configured candidate list and raster settings.
    pub fn from_defaults(defaults: &RasterDefaults) -> SlideResult<Self> {
        Self::resolve(&defaults.ghostscript_candidates, RasterSettings::from(defaults))
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn settings(&self) -> &RasterSettings {
        &self.settings
    }

    fn run(&self, args: Vec<OsString>, what: &str) -> SlideResult<()> {
        tracing::debug!(command = %self.command, ?args, "Running Ghostscript");

        let output = Command::new(&self.command)
            .args(&args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| SlideError::rasterize(format!("Failed to start {}: {e}", self.command)))?;

        check_status(&output, what)
    }
}

impl Rasterizer for GhostscriptBinary {
    fn render_page(&self, pdf: &Path, image: &Path) -> SlideResult<()> {
        self.run(raster_args(pdf, image, &self.settings), "rasterize")?;
        if !image.exists() {
            return Err(SlideError::rasterize(format!(
                "Ghostscript produced no image at {}",
                image.display()
            )));
        }
        Ok(())
    }

    fn flatten(&self, input: &Path, output: &Path) -> SlideResult<()> {
        self.run(flatten_args(input, output, self.settings.dpi), "flatten")?;
        if !output.exists() {
            return Err(SlideError::rasterize(format!(
                "Ghostscript produced no document at {}",
                output.display()
            )));
        }
        Ok(())
    }

    fn image_extension(&self) -> &str {
        self.settings.extension()
    }
}

fn probe_version(command: &str) -> Option<String> {
    let output = Command::new(command)
        .arg("--version")
        .stdin(Stdio::null())
        .output()
        .ok()?;

    if !output.status.success() {
        return None;
    }

    let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
    Some(if version.is_empty() {
        "unknown".to_string()
    } else {
        version
    })
}

fn check_status(output: &Output, what: &str) -> SlideResult<()> {
    if output.status.success() {
        return Ok(());
    }

    let stderr = String::from_utf8_lossy(&output.stderr);
    let stderr = stderr.trim();
    Err(SlideError::rasterize(if stderr.is_empty() {
        format!("Ghostscript {what} failed with {}", output.status)
    } else {
        format!("Ghostscript {what} failed with {}: {stderr}", output.status)
    }))
}

fn output_file_arg(path: &Path) -> OsString {
    let mut arg = OsString::from("-sOutputFile=");
    arg.push(path.as_os_str());
    arg
}

/// Arguments rendering every page of `pdf` into `image`.
pub fn raster_args(pdf: &Path, image: &Path, settings: &RasterSettings) -> Vec<OsString> {
    vec![
        "-dBATCH".into(),
        "-dNOPAUSE".into(),
        output_file_arg(image),
        format!("-r{}", settings.dpi).into(),
        format!("-sDEVICE={}", settings.device).into(),
        "-q".into(),
        pdf.as_os_str().to_os_string(),
    ]
}

/// Arguments rewriting `input` through pdfwrite with annotations baked in.
pub fn flatten_args(input: &Path, output: &Path, dpi: u32) -> Vec<OsString> {
    vec![
        "-dBATCH".into(),
        "-dNOPAUSE".into(),
        output_file_arg(output),
        "-dPreserveAnnots=false".into(),
        format!("-r{dpi}").into(),
        "-sDEVICE=pdfwrite".into(),
        "-q".into(),
        input.as_os_str().to_os_string(),
    ]
}
