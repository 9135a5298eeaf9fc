// TOML config adapter - Settings file, environment overrides and validation
//
// Precedence: CLI > Env > File > Defaults. The CLI layer applies its own
// flags on top of what `SliceSettings::load` returns.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::domain::errors::{SliceError, SliceResult};
use crate::domain::rules::EncodeDefaults;

/// Settings file looked up in the working directory when none is given
pub const DEFAULT_CONFIG_FILE: &str = "slicer.toml";

const LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

/// All tunables of the slicer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SliceSettings {
    pub slice: SliceSection,
    pub encoder: EncoderSection,
    pub tools: ToolsSection,
    pub logging: LoggingSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SliceSection {
    /// Re-encoded window around each cut point, in seconds
    pub margin: f64,
    /// Process the regions of a plan concurrently
    pub parallel_regions: bool,
    /// Parent for scratch directories; system temp dir when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scratch_dir: Option<PathBuf>,
}

impl Default for SliceSection {
    fn default() -> Self {
        Self {
            margin: 2.0,
            parallel_regions: true,
            scratch_dir: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderSection {
    pub crf: u8,
    pub preset: String,
    pub audio_bitrate: String,
}

impl Default for EncoderSection {
    fn default() -> Self {
        let defaults = EncodeDefaults::default();
        Self {
            crf: defaults.crf,
            preset: defaults.preset,
            audio_bitrate: defaults.audio_bitrate,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsSection {
    pub ffmpeg: String,
    pub ffprobe: String,
    /// Per-invocation limit; unlimited when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Default for ToolsSection {
    fn default() -> Self {
        Self {
            ffmpeg: "ffmpeg".to_string(),
            ffprobe: "ffprobe".to_string(),
            timeout_secs: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    pub level: String,
    pub json: bool,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl SliceSettings {
    /// Defaults, then the settings file, then `SLICER_*` environment variables
    ///
    /// An explicit `path` must exist; the implicit `slicer.toml` is optional.
    pub fn load(path: Option<&Path>) -> SliceResult<Self> {
        let mut settings = match path {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => {
                debug!("No settings file, using defaults");
                Self::default()
            }
        };
        settings.apply_env(|key| std::env::var(key).ok())?;
        Ok(settings)
    }

    pub fn from_file(path: &Path) -> SliceResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            SliceError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        let settings = Self::from_toml(&content)
            .map_err(|e| SliceError::Config(format!("{}: {}", path.display(), e)))?;
        info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn from_toml(content: &str) -> SliceResult<Self> {
        toml::from_str(content).map_err(|e| SliceError::Config(e.to_string()))
    }

    pub fn to_toml(&self) -> SliceResult<String> {
        toml::to_string_pretty(self).map_err(|e| SliceError::Config(e.to_string()))
    }

    /// Apply `SLICER_*` overrides read through `lookup`
    pub fn apply_env<F>(&mut self, lookup: F) -> SliceResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("SLICER_MARGIN") {
            self.slice.margin = parse_env("SLICER_MARGIN", &v)?;
        }
        if let Some(v) = lookup("SLICER_CRF") {
            self.encoder.crf = parse_env("SLICER_CRF", &v)?;
        }
        if let Some(v) = lookup("SLICER_PRESET") {
            self.encoder.preset = v;
        }
        if let Some(v) = lookup("SLICER_AUDIO_BITRATE") {
            self.encoder.audio_bitrate = v;
        }
        if let Some(v) = lookup("SLICER_FFMPEG") {
            self.tools.ffmpeg = v;
        }
        if let Some(v) = lookup("SLICER_FFPROBE") {
            self.tools.ffprobe = v;
        }
        if let Some(v) = lookup("SLICER_TIMEOUT_SECS") {
            self.tools.timeout_secs = Some(parse_env("SLICER_TIMEOUT_SECS", &v)?);
        }
        if let Some(v) = lookup("SLICER_LOG_LEVEL") {
            self.logging.level = v;
        }
        Ok(())
    }

    pub fn validate(&self) -> SliceResult<()> {
        if !(self.slice.margin.is_finite() && self.slice.margin > 0.0) {
            return Err(SliceError::Config(format!(
                "margin must be a positive number of seconds, got {}",
                self.slice.margin
            )));
        }
        if self.encoder.crf > 51 {
            return Err(SliceError::Config(format!(
                "crf must be between 0 and 51, got {}",
                self.encoder.crf
            )));
        }
        if self.encoder.preset.trim().is_empty() {
            return Err(SliceError::Config("preset must not be empty".to_string()));
        }
        if self.encoder.audio_bitrate.trim().is_empty() {
            return Err(SliceError::Config(
                "audio_bitrate must not be empty".to_string(),
            ));
        }
        if self.tools.ffmpeg.trim().is_empty() || self.tools.ffprobe.trim().is_empty() {
            return Err(SliceError::Config("tool paths must not be empty".to_string()));
        }
        if self.tools.timeout_secs == Some(0) {
            return Err(SliceError::Config("timeout_secs must be positive".to_string()));
        }
        if !LOG_LEVELS.contains(&self.logging.level.to_ascii_lowercase().as_str()) {
            return Err(SliceError::Config(format!(
                "unknown log level '{}', expected one of {}",
                self.logging.level,
                LOG_LEVELS.join(", ")
            )));
        }
        Ok(())
    }

    pub fn encode_defaults(&self) -> EncodeDefaults {
        EncodeDefaults {
            crf: self.encoder.crf,
            preset: self.encoder.preset.clone(),
            audio_bitrate: self.encoder.audio_bitrate.clone(),
        }
    }

    pub fn tool_timeout(&self) -> Option<Duration> {
        self.tools.timeout_secs.map(Duration::from_secs)
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> SliceResult<T> {
    value
        .trim()
        .parse()
        .map_err(|_| SliceError::Config(format!("{}: cannot parse '{}'", key, value)))
}
