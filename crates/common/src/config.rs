//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{SlideError, SlideResult};

/// Global application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Raster analysis parameters.
    pub analysis: AnalysisDefaults,

    /// Rasterizer invocation parameters.
    pub raster: RasterDefaults,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Default parameters for pixel classification and boundary scanning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisDefaults {
    /// A channel counts as background when it is at least `255 - tolerance`.
    pub tolerance: u8,

    /// Rows skipped at the top of the raster.
    pub top_margin: u32,

    /// Rows skipped at the bottom of the raster.
    pub bottom_margin: u32,

    /// Columns skipped at both sides of every scanned row.
    pub side_margin: u32,
}

/// Rasterizer settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RasterDefaults {
    /// Rasterization resolution.
    pub dpi: u32,

    /// Ghostscript output device used for page bitmaps.
    pub device: String,

    /// Binary names and absolute paths probed, in order, at startup.
    pub ghostscript_candidates: Vec<String>,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "slidereveal=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for AnalysisDefaults {
    fn default() -> Self {
        Self {
            tolerance: 120,
            top_margin: 5,
            bottom_margin: 5,
            side_margin: 50,
        }
    }
}

impl Default for RasterDefaults {
    fn default() -> Self {
        Self {
            dpi: 200,
            device: "jpeg".to_string(),
            ghostscript_candidates: [
                "gs",
                "gswin32c",
                "gswin64c",
                "/usr/local/bin/gs",
                "/usr/bin/gs",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        let config_path = config_file_path();
        if config_path.exists() {
            match Self::load_from(&config_path) {
                Ok(config) => return config,
                Err(e) => {
                    tracing::warn!("Failed to load config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Load config from an explicit path. Unlike [`AppConfig::load`], errors are returned.
    pub fn load_from(path: &Path) -> SlideResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save config to the standard location.
    pub fn save(&self) -> Result<(), std::io::Error> {
        let config_path = config_file_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(config_path, json)
    }

    /// Reject settings that would make rasterizing or scanning meaningless.
    pub fn validate(&self) -> SlideResult<()> {
        if self.raster.dpi == 0 {
            return Err(SlideError::config("raster.dpi must be non-zero"));
        }
        if self.raster.ghostscript_candidates.is_empty() {
            return Err(SlideError::config(
                "raster.ghostscript_candidates must list at least one binary",
            ));
        }
        Ok(())
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("slidereveal").join("config.json")
}
