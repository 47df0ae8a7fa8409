//! Runtime configuration
//!
//! Every field has a default, so a JSON file only needs the values it wants
//! to change:
//!
//! ```json
//! { "volume": 0.1, "format": { "bits": 16 }, "scope": { "zoom_step": 1.0 } }
//! ```

use crate::pcm::PcmFormat;
use crate::playback::ErrorPolicy;
use crate::{DawError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Default seconds of audio held by a monitor's history
pub const DEFAULT_BUFFER_LENGTH_SECONDS: f64 = 0.5;

/// Default frames per loop iteration
pub const DEFAULT_LOOP_BUFFER_FRAMES: usize = 1024;

/// Oscilloscope geometry and input behaviour
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScopeConfig {
    /// Columns sampled per trace
    pub width: usize,
    /// Trace height in pixels; full negative scale maps here
    pub height: f64,
    /// Zoom change per scroll tick
    pub zoom_step: f64,
    /// Render interval in milliseconds
    pub refresh_ms: u64,
}

impl Default for ScopeConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 200.0,
            zoom_step: 0.5,
            refresh_ms: 50,
        }
    }
}

/// Top-level configuration for voices, loops, monitors and devices
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DawConfig {
    /// Output format for synthesized voices
    pub format: PcmFormat,
    /// Voice volume in `[0, 1]`
    pub volume: f64,
    /// Seconds of audio the monitor history holds
    pub buffer_length_seconds: f64,
    /// Oscilloscope settings
    pub scope: ScopeConfig,
    /// Frames moved per loop iteration
    pub loop_buffer_frames: usize,
    /// What a loop does when its writer fails
    pub error_policy: ErrorPolicy,
    /// Device queue capacity in samples (streaming output)
    pub queue_samples: usize,
}

impl Default for DawConfig {
    fn default() -> Self {
        Self::stable()
    }
}

impl DawConfig {
    /// Small buffers; reacts quickly to live changes
    pub fn low_latency() -> Self {
        Self {
            format: PcmFormat::default(),
            volume: 0.05,
            buffer_length_seconds: 0.1,
            scope: ScopeConfig::default(),
            loop_buffer_frames: 256,
            error_policy: ErrorPolicy::Ignore,
            queue_samples: 4096,
        }
    }

    /// Larger buffers; fewer underruns on a busy machine
    pub fn stable() -> Self {
        Self {
            format: PcmFormat::default(),
            volume: 0.05,
            buffer_length_seconds: DEFAULT_BUFFER_LENGTH_SECONDS,
            scope: ScopeConfig::default(),
            loop_buffer_frames: DEFAULT_LOOP_BUFFER_FRAMES,
            error_policy: ErrorPolicy::Ignore,
            queue_samples: 16384,
        }
    }

    /// Parse and validate a JSON document
    pub fn from_json(json: &str) -> Result<Self> {
        let config: DawConfig =
            serde_json::from_str(json).map_err(|e| DawError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        debug!(path = %path.display(), format = %config.format, "loaded configuration");
        Ok(config)
    }

    /// Serialize as pretty JSON
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| DawError::Config(e.to_string()))
    }

    /// Reject values the runtime cannot work with
    pub fn validate(&self) -> Result<()> {
        self.format
            .validate()
            .map_err(|e| DawError::Config(e.to_string()))?;
        if !(0.0..=1.0).contains(&self.volume) {
            return Err(DawError::Config(format!(
                "volume {} outside [0, 1]",
                self.volume
            )));
        }
        if !(self.buffer_length_seconds > 0.0) {
            return Err(DawError::Config(
                "buffer_length_seconds must be positive".into(),
            ));
        }
        if self.scope.width == 0 || !(self.scope.height > 0.0) {
            return Err(DawError::Config("scope dimensions must be positive".into()));
        }
        if !(self.scope.zoom_step > 0.0) {
            return Err(DawError::Config("scope zoom_step must be positive".into()));
        }
        if self.loop_buffer_frames == 0 {
            return Err(DawError::Config("loop_buffer_frames must be > 0".into()));
        }
        if self.queue_samples == 0 {
            return Err(DawError::Config("queue_samples must be > 0".into()));
        }
        Ok(())
    }

    /// Bytes the monitor history holds for this format
    pub fn history_bytes(&self) -> usize {
        self.format.buffer_length(self.buffer_length_seconds)
    }

    /// Bytes moved per loop iteration
    pub fn loop_buffer_bytes(&self) -> usize {
        self.loop_buffer_frames * self.format.frame_stride()
    }

    /// Device queue latency in milliseconds
    pub fn latency_ms(&self) -> f32 {
        let samples_per_second = self.format.sample_rate as f32 * self.format.channels as f32;
        (self.queue_samples as f32 / samples_per_second) * 1000.0
    }
}
