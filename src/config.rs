//! Viewer configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. Stock defaults are
//! overridden by the user's file, key by key.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [viewer]
//! min_zoom = 0.1            # Smallest zoom scale in the single-image viewer
//! max_zoom = 1.25           # Largest zoom scale
//!
//! [share]
//! max_bytes = 10485760      # Byte budget for shared images (10 MiB)
//!
//! [overlay]
//! color = "#1A1B22"         # Gradient colour at the bottom edge
//! height = 30               # Strip height in pixels
//! corner_radius = 16        # Rounded bottom corners
//!
//! [processing]
//! max_processes = 4         # Max parallel workers (omit for auto = CPU cores)
//! ```
//!
//! Config files are sparse: override just the values you want. Unknown keys
//! are rejected to catch typos early.

use crate::imaging::{DEFAULT_MAX_SHARE_BYTES, ZoomBounds};
use crate::overlay::{ColorError, GradientOverlay, parse_hex};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Configuration loaded from `config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FeedConfig {
    /// Single-image viewer settings (zoom range).
    pub viewer: ViewerConfig,
    /// Share/export settings (byte budget).
    pub share: ShareConfig,
    /// Feed-cell gradient overlay.
    pub overlay: OverlayConfig,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

impl FeedConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let ViewerConfig { min_zoom, max_zoom } = self.viewer;
        if !(min_zoom.is_finite() && min_zoom > 0.0) {
            return Err(ConfigError::Validation(
                "viewer.min_zoom must be positive".into(),
            ));
        }
        if !(max_zoom.is_finite() && min_zoom <= max_zoom) {
            return Err(ConfigError::Validation(
                "viewer.max_zoom must be >= viewer.min_zoom".into(),
            ));
        }
        if self.share.max_bytes == 0 {
            return Err(ConfigError::Validation(
                "share.max_bytes must be positive".into(),
            ));
        }
        if self.overlay.height == 0 {
            return Err(ConfigError::Validation(
                "overlay.height must be non-zero".into(),
            ));
        }
        parse_hex(&self.overlay.color)
            .map_err(|e| ConfigError::Validation(format!("overlay.color: {e}")))?;
        Ok(())
    }
}

/// Zoom range for the single-image viewer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewerConfig {
    pub min_zoom: f64,
    pub max_zoom: f64,
}

impl ViewerConfig {
    pub fn zoom_bounds(&self) -> ZoomBounds {
        ZoomBounds {
            min: self.min_zoom,
            max: self.max_zoom,
        }
    }
}

impl Default for ViewerConfig {
    fn default() -> Self {
        let bounds = ZoomBounds::default();
        Self {
            min_zoom: bounds.min,
            max_zoom: bounds.max,
        }
    }
}

/// Share/export settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ShareConfig {
    /// Maximum size in bytes of an exported image.
    pub max_bytes: u64,
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_SHARE_BYTES,
        }
    }
}

/// Gradient overlay settings for feed cells.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OverlayConfig {
    /// Hex colour (`#RGB`, `#RRGGBB` or `#AARRGGBB`).
    pub color: String,
    pub height: u32,
    pub corner_radius: u32,
}

impl OverlayConfig {
    pub fn to_overlay(&self) -> Result<GradientOverlay, ColorError> {
        Ok(GradientOverlay {
            color: parse_hex(&self.color)?,
            height: self.height,
            corner_radius: self.corner_radius,
        })
    }
}

impl Default for OverlayConfig {
    fn default() -> Self {
        let overlay = GradientOverlay::default();
        Self {
            color: "#1A1B22".to_string(),
            height: overlay.height,
            corner_radius: overlay.corner_radius,
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel share workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(FeedConfig::default())
        .map_err(|e| ConfigError::Validation(format!("default config does not serialize: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if no `config.toml` exists in the directory.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<FeedConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: FeedConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the given directory.
pub fn load_config(dir: &Path) -> Result<FeedConfig, ConfigError> {
    let overlay = load_raw_config(dir)?;
    if overlay.is_some() {
        tracing::debug!(dir = %dir.display(), "loaded config.toml");
    }
    resolve_config(stock_defaults_value()?, overlay)
}

/// Returns a fully-commented stock `config.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Image Feed Configuration
# ========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Single-image viewer
# ---------------------------------------------------------------------------
[viewer]
# Zoom range for pinch-to-zoom. The layout pass always resets zoom to 1.0.
min_zoom = 0.1
max_zoom = 1.25

# ---------------------------------------------------------------------------
# Share / export
# ---------------------------------------------------------------------------
[share]
# Byte budget for shared images. Quality is lowered in steps of 0.1 until the
# JPEG fits or quality 0.1 is reached.
max_bytes = 10485760

# ---------------------------------------------------------------------------
# Feed cell gradient overlay
# ---------------------------------------------------------------------------
[overlay]
# Colour at the bottom edge; the strip fades to transparent upwards.
color = "#1A1B22"
height = 30
corner_radius = 16

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel share workers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}
