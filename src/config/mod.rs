//! Configuration structures and loading logic.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::atlas::{CacheSettings, DEFAULT_ATLAS_SIZE, DEFAULT_FRAME_BUDGET};
use crate::curve::Winding;
use crate::gpu::TextureFilter;
use crate::gpu::pipeline::DEFAULT_CURVE_SEGMENTS;
use crate::sdf::DistanceFieldMode;

/// Errors from [`Config::load`] and [`Config::from_toml_str`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub atlas: AtlasConfig,
    pub field: FieldConfig,
    pub schedule: ScheduleConfig,
}

/// Atlas texture configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AtlasConfig {
    /// Edge length of the square atlas texture in pixels.
    pub size: u32,
}

impl Default for AtlasConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_ATLAS_SIZE,
        }
    }
}

impl AtlasConfig {
    /// Returns `size` clamped to [64, 8192], the range every wgpu adapter
    /// accepts for 2D textures.
    pub fn effective_size(&self) -> u32 {
        self.size.clamp(64, 8192)
    }
}

/// Distance-field generator configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    pub mode: DistanceFieldMode,
    /// Generator size before the first glyph resizes it.
    pub initial_size: u32,
    pub pixel_density: f32,
    /// Subdivisions per curve ribbon.
    pub curve_segments: u32,
    pub winding: Winding,
    /// Linear filtering when fields are sampled. `false` uses nearest.
    pub smooth: bool,
    /// Default field spread in pixels on every side of a glyph.
    pub padding: f32,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            mode: DistanceFieldMode::Sdf,
            initial_size: 64,
            pixel_density: 1.0,
            curve_segments: DEFAULT_CURVE_SEGMENTS,
            winding: Winding::Positive,
            smooth: true,
            padding: 6.0,
        }
    }
}

impl FieldConfig {
    /// Returns `pixel_density` clamped to [0.25, 8.0]; non-finite values
    /// fall back to 1.0.
    pub fn effective_pixel_density(&self) -> f32 {
        if self.pixel_density.is_finite() {
            self.pixel_density.clamp(0.25, 8.0)
        } else {
            1.0
        }
    }

    /// Returns `curve_segments` clamped to [1, 256].
    pub fn effective_curve_segments(&self) -> u32 {
        self.curve_segments.clamp(1, 256)
    }

    /// Returns `padding`, with negative or non-finite values treated as 0.
    pub fn effective_padding(&self) -> f32 {
        if self.padding.is_finite() { self.padding.max(0.0) } else { 0.0 }
    }

    pub fn filter(&self) -> TextureFilter {
        if self.smooth {
            TextureFilter::Linear
        } else {
            TextureFilter::Nearest
        }
    }
}

/// Per-frame scheduling configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Time one frame may spend baking queued glyphs, in milliseconds.
    pub frame_budget_ms: u64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            frame_budget_ms: DEFAULT_FRAME_BUDGET.as_millis() as u64,
        }
    }
}

impl ScheduleConfig {
    pub fn frame_budget(&self) -> Duration {
        Duration::from_millis(self.frame_budget_ms)
    }
}

impl Config {
    /// Load config from `path`.
    ///
    /// Unlike a missing-file fallback, errors are returned so callers can
    /// keep a previous config or report the problem.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let data = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let cfg = Self::from_toml_str(&data)?;
        log::info!("config: loaded from {}", path.display());
        Ok(cfg)
    }

    pub fn from_toml_str(data: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(data)?)
    }

    /// Glyph cache settings with every value clamped to its usable range.
    pub fn cache_settings(&self) -> CacheSettings {
        CacheSettings {
            atlas_size: self.atlas.effective_size(),
            mode: self.field.mode,
            initial_size: self.field.initial_size.max(1),
            pixel_density: self.field.effective_pixel_density(),
            winding: self.field.winding,
            filter: self.field.filter(),
            frame_budget: self.schedule.frame_budget(),
        }
    }
}

#[cfg(test)]
mod tests;
