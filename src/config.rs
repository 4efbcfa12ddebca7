//! Decoder configuration.
//!
//! Everything here is cosmetic, so bad values are normalised with a warning
//! instead of rejected. The only hard errors are an unreadable file and
//! TOML that does not parse.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::engine::driver::Timeline;
use crate::engine::glyphs::GlyphSet;
use crate::engine::shuffle::{DEFAULT_HOLD_THRESHOLD, Shuffler};

/// Errors from loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid decoder config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("glyph set must contain at least one glyph")]
    EmptyGlyphSet,
}

/// Where placeholder glyphs come from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GlyphSource {
    #[default]
    Katakana,
    Latin,
    /// Every character of the string is a glyph.
    Custom(String),
}

impl GlyphSource {
    /// Build the glyph set. An empty custom set falls back to katakana.
    pub fn glyph_set(&self) -> GlyphSet {
        match self {
            GlyphSource::Katakana => GlyphSet::katakana(),
            GlyphSource::Latin => GlyphSet::latin(),
            GlyphSource::Custom(glyphs) => GlyphSet::from_str_chars(glyphs).unwrap_or_else(|e| {
                log::warn!("{e}; using katakana glyphs");
                GlyphSet::katakana()
            }),
        }
    }
}

/// Settings for one decoder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoderConfig {
    /// Wait before decoding starts, in milliseconds.
    pub delay_ms: f64,
    /// How progress moves over time.
    pub timeline: Timeline,
    /// Placeholder glyph pool.
    pub glyphs: GlyphSource,
    /// Fraction of each character step during which noise is redrawn.
    pub hold_threshold: f64,
    /// Frame rate for hosts that drive their own frame loop.
    pub fps: u32,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            delay_ms: 0.0,
            timeline: Timeline::default(),
            glyphs: GlyphSource::default(),
            hold_threshold: DEFAULT_HOLD_THRESHOLD,
            fps: 60,
        }
    }
}

impl DecoderConfig {
    /// Parse TOML and normalise the result.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        Ok(config.normalized())
    }

    /// Read and parse a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("loaded decoder config from {}", path.display());
        Self::from_toml_str(&content)
    }

    /// Builder-style delay setter.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay_ms = delay.as_secs_f64() * 1000.0;
        self
    }

    pub fn with_timeline(mut self, timeline: Timeline) -> Self {
        self.timeline = timeline;
        self
    }

    pub fn with_glyphs(mut self, glyphs: GlyphSource) -> Self {
        self.glyphs = glyphs;
        self
    }

    /// Clamp every field into its usable range.
    pub fn normalized(self) -> Self {
        let delay_ms = if self.delay_ms.is_finite() && self.delay_ms > 0.0 {
            self.delay_ms
        } else {
            if self.delay_ms != 0.0 {
                log::warn!("delay_ms {} clamped to 0", self.delay_ms);
            }
            0.0
        };
        let hold_threshold = if self.hold_threshold.is_nan() {
            DEFAULT_HOLD_THRESHOLD
        } else {
            self.hold_threshold.clamp(0.0, 1.0)
        };
        let fps = if self.fps == 0 { 60 } else { self.fps };
        Self {
            delay_ms,
            timeline: self.timeline.normalized(),
            glyphs: self.glyphs,
            hold_threshold,
            fps,
        }
    }

    /// Start delay; negative or NaN reads as zero.
    pub fn delay(&self) -> Duration {
        if self.delay_ms.is_finite() && self.delay_ms > 0.0 {
            Duration::from_micros((self.delay_ms * 1000.0).round() as u64)
        } else {
            Duration::ZERO
        }
    }

    pub fn shuffler(&self) -> Shuffler {
        Shuffler::new(self.glyphs.glyph_set(), self.hold_threshold)
    }
}

// =============================================================================
// TESTS
// =============================================================================
