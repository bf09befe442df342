// SPDX-License-Identifier: MPL-2.0
//! This module handles the preview's configuration, loaded from a
//! `settings.toml` file.
//!
//! # Configuration Sections
//!
//! - `[preview]` - Transition timing, page spacing and dismissal behavior
//! - `[gestures]` - Zoom bound, tap timing and drag thresholds
//! - `[loading]` - Page and image cache sizes
//!
//! Every field is optional; missing values fall back to [`defaults`].
//!
//! # Examples
//!
//! ```no_run
//! use iced_preview::config::{self, Config};
//!
//! // Load existing configuration (returns tuple with optional warning)
//! let (mut config, _warning) = config::load();
//!
//! config.preview.dismiss_on_tap = Some(false);
//!
//! config::save(&config).expect("Failed to save config");
//! ```

pub mod defaults;
pub mod paths;

pub use defaults::*;

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_FILE: &str = "settings.toml";

// =============================================================================
// Section Structs
// =============================================================================

/// Overlay behavior.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PreviewConfig {
    /// Present/dismiss animation duration in milliseconds.
    #[serde(
        default = "default_animation_duration_ms",
        skip_serializing_if = "Option::is_none"
    )]
    pub animation_duration_ms: Option<u64>,

    /// Gap between pages while swiping.
    #[serde(
        default = "default_page_spacing",
        skip_serializing_if = "Option::is_none"
    )]
    pub page_spacing: Option<f32>,

    /// Whether a single tap dismisses the preview.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dismiss_on_tap: Option<bool>,

    /// Whether the host navigation bar hides while the preview is shown.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hide_navigation_bar: Option<bool>,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            animation_duration_ms: default_animation_duration_ms(),
            page_spacing: default_page_spacing(),
            dismiss_on_tap: Some(DEFAULT_DISMISS_ON_TAP),
            hide_navigation_bar: Some(DEFAULT_HIDE_NAVIGATION_BAR),
        }
    }
}

/// Gesture recognition.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GesturesConfig {
    /// Scale reached by double tap.
    #[serde(
        default = "default_max_zoom_scale",
        skip_serializing_if = "Option::is_none"
    )]
    pub max_zoom_scale: Option<f32>,

    /// Time a single tap waits for a second one, in milliseconds.
    #[serde(
        default = "default_double_tap_timeout_ms",
        skip_serializing_if = "Option::is_none"
    )]
    pub double_tap_timeout_ms: Option<u64>,

    /// Pointer travel before a press becomes a pan.
    #[serde(default = "default_pan_slop", skip_serializing_if = "Option::is_none")]
    pub pan_slop: Option<f32>,
}

impl Default for GesturesConfig {
    fn default() -> Self {
        Self {
            max_zoom_scale: default_max_zoom_scale(),
            double_tap_timeout_ms: default_double_tap_timeout_ms(),
            pan_slop: default_pan_slop(),
        }
    }
}

/// Cache sizes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoadingConfig {
    /// Number of page controllers kept alive.
    #[serde(
        default = "default_page_cache_capacity",
        skip_serializing_if = "Option::is_none"
    )]
    pub page_cache_capacity: Option<usize>,

    /// Number of loaded images kept in memory.
    #[serde(
        default = "default_image_cache_capacity",
        skip_serializing_if = "Option::is_none"
    )]
    pub image_cache_capacity: Option<usize>,
}

impl Default for LoadingConfig {
    fn default() -> Self {
        Self {
            page_cache_capacity: default_page_cache_capacity(),
            image_cache_capacity: default_image_cache_capacity(),
        }
    }
}

// =============================================================================
// Main Config Struct (Sectioned)
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub preview: PreviewConfig,

    #[serde(default)]
    pub gestures: GesturesConfig,

    #[serde(default)]
    pub loading: LoadingConfig,
}

impl Config {
    /// Animation duration, clamped to the accepted range.
    #[must_use]
    pub fn animation_duration(&self) -> Duration {
        let millis = self
            .preview
            .animation_duration_ms
            .unwrap_or(DEFAULT_ANIMATION_DURATION_MS)
            .min(MAX_ANIMATION_DURATION_MS);
        Duration::from_millis(millis)
    }

    #[must_use]
    pub fn page_spacing(&self) -> f32 {
        self.preview
            .page_spacing
            .unwrap_or(DEFAULT_PAGE_SPACING)
            .clamp(0.0, MAX_PAGE_SPACING)
    }

    #[must_use]
    pub fn dismiss_on_tap(&self) -> bool {
        self.preview.dismiss_on_tap.unwrap_or(DEFAULT_DISMISS_ON_TAP)
    }

    #[must_use]
    pub fn hide_navigation_bar(&self) -> bool {
        self.preview
            .hide_navigation_bar
            .unwrap_or(DEFAULT_HIDE_NAVIGATION_BAR)
    }

    #[must_use]
    pub fn max_zoom_scale(&self) -> f32 {
        self.gestures
            .max_zoom_scale
            .unwrap_or(DEFAULT_MAX_ZOOM_SCALE)
            .clamp(MIN_ZOOM_SCALE, MAX_ZOOM_SCALE_LIMIT)
    }

    #[must_use]
    pub fn double_tap_timeout(&self) -> Duration {
        Duration::from_millis(
            self.gestures
                .double_tap_timeout_ms
                .unwrap_or(DEFAULT_DOUBLE_TAP_TIMEOUT_MS),
        )
    }

    #[must_use]
    pub fn pan_slop(&self) -> f32 {
        self.gestures.pan_slop.unwrap_or(DEFAULT_PAN_SLOP).max(0.0)
    }

    #[must_use]
    pub fn page_cache_capacity(&self) -> usize {
        self.loading
            .page_cache_capacity
            .unwrap_or(DEFAULT_PAGE_CACHE_CAPACITY)
            .clamp(MIN_PAGE_CACHE_CAPACITY, MAX_CACHE_CAPACITY)
    }

    #[must_use]
    pub fn image_cache_capacity(&self) -> usize {
        self.loading
            .image_cache_capacity
            .unwrap_or(DEFAULT_IMAGE_CACHE_CAPACITY)
            .clamp(1, MAX_CACHE_CAPACITY)
    }
}

// =============================================================================
// Default Value Functions
// =============================================================================

fn default_animation_duration_ms() -> Option<u64> {
    Some(DEFAULT_ANIMATION_DURATION_MS)
}

fn default_page_spacing() -> Option<f32> {
    Some(DEFAULT_PAGE_SPACING)
}

fn default_max_zoom_scale() -> Option<f32> {
    Some(DEFAULT_MAX_ZOOM_SCALE)
}

fn default_double_tap_timeout_ms() -> Option<u64> {
    Some(DEFAULT_DOUBLE_TAP_TIMEOUT_MS)
}

fn default_pan_slop() -> Option<f32> {
    Some(DEFAULT_PAN_SLOP)
}

fn default_page_cache_capacity() -> Option<usize> {
    Some(DEFAULT_PAGE_CACHE_CAPACITY)
}

fn default_image_cache_capacity() -> Option<usize> {
    Some(DEFAULT_IMAGE_CACHE_CAPACITY)
}

// =============================================================================
// Config Path Resolution
// =============================================================================

fn config_path_with_override(base_dir: Option<PathBuf>) -> Option<PathBuf> {
    paths::config_dir_with_override(base_dir).map(|mut path| {
        path.push(CONFIG_FILE);
        path
    })
}

// =============================================================================
// Load Functions
// =============================================================================

/// Loads the configuration from the default path.
///
/// Returns a tuple of (config, optional_warning). If loading fails, returns
/// the default config with a warning explaining what went wrong.
pub fn load() -> (Config, Option<String>) {
    load_with_override(None)
}

/// Loads the configuration from a custom directory.
pub fn load_with_override(base_dir: Option<PathBuf>) -> (Config, Option<String>) {
    if let Some(path) = config_path_with_override(base_dir) {
        if path.exists() {
            match load_from_path(&path) {
                Ok(config) => return (config, None),
                Err(err) => {
                    let warning = format!(
                        "could not read {}, using defaults: {err}",
                        path.display()
                    );
                    log::warn!("{warning}");
                    return (Config::default(), Some(warning));
                }
            }
        }
    }
    (Config::default(), None)
}

/// Loads configuration from a specific path.
pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    Ok(config)
}

// =============================================================================
// Save Functions
// =============================================================================

/// Saves the configuration to the default path.
pub fn save(config: &Config) -> Result<()> {
    save_with_override(config, None)
}

/// Saves the configuration to a custom directory.
pub fn save_with_override(config: &Config, base_dir: Option<PathBuf>) -> Result<()> {
    if let Some(path) = config_path_with_override(base_dir) {
        return save_to_path(config, &path);
    }
    Ok(())
}

/// Saves configuration to a specific path.
pub fn save_to_path(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config).map_err(Error::from)?;
    fs::write(path, content)?;
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================
