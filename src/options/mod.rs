//! Centralized engine options with TOML preset support.
//!
//! All tweakable settings (dock geometry, magnification, smoothing,
//! throttling) are consolidated here. Options serialize to/from TOML so a
//! preferences UI can store presets, and [`Options::json_schema`] describes
//! the UI-exposed fields.

mod dock;
mod magnification;
mod smoothing;
mod throttle;

use std::path::Path;

pub use dock::{DockEdge, DockOptions};
pub use magnification::MagnificationOptions;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
pub use smoothing::SmoothingOptions;
pub use throttle::ThrottleOptions;

use crate::error::DockError;

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[magnification]`) work
/// correctly.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[serde(default)]
pub struct Options {
    /// Dock geometry and host overrides.
    pub dock: DockOptions,
    /// Magnification strength and falloff.
    pub magnification: MagnificationOptions,
    /// Per-tick smoothing coefficients and frame-rate tier.
    pub smoothing: SmoothingOptions,
    /// Icon cache, idle throttling and lifecycle timers.
    pub throttle: ThrottleOptions,
}

impl Options {
    /// Generate JSON Schema describing the UI-exposed options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Options)
    }

    /// Load options from a TOML file. Missing fields use defaults.
    pub fn load(path: &Path) -> Result<Self, DockError> {
        let content = std::fs::read_to_string(path).map_err(DockError::Io)?;
        toml::from_str(&content)
            .map_err(|e| DockError::OptionsParse(e.to_string()))
    }

    /// Save options to a TOML file (pretty-printed).
    pub fn save(&self, path: &Path) -> Result<(), DockError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| DockError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(DockError::Io)?;
        }
        std::fs::write(path, content).map_err(DockError::Io)
    }

    /// Copy with every out-of-range value clamped into its valid range.
    ///
    /// Configuration errors never reject: a negative spread becomes 0, a
    /// NaN factor falls back to the lower bound, and so on. Each clamped
    /// field is logged at warn level.
    #[must_use]
    pub fn sanitized(mut self) -> Self {
        self.dock.sanitize();
        self.magnification.sanitize();
        self.smoothing.sanitize();
        self.throttle.sanitize();
        self
    }
}

/// Clamp `value` into `[min, max]`, logging when it had to move.
///
/// NaN clamps to `min`.
pub(crate) fn clamp_logged(field: &str, value: f32, min: f32, max: f32) -> f32 {
    let clamped = if value.is_nan() {
        min
    } else {
        value.clamp(min, max)
    };
    if clamped != value || value.is_nan() {
        log::warn!("option `{field}` = {value} out of range, using {clamped}");
    }
    clamped
}

/// Integer flavour of [`clamp_logged`].
pub(crate) fn clamp_logged_u32(field: &str, value: u32, min: u32, max: u32) -> u32 {
    let clamped = value.clamp(min, max);
    if clamped != value {
        log::warn!("option `{field}` = {value} out of range, using {clamped}");
    }
    clamped
}
