// SPDX-License-Identifier: MIT OR Apache-2.0
//! Demo configuration.

use ordoplay_timeline::{SettingsError, TimelineSettings};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for the headless demo run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Simulated frames per second
    pub frame_rate: f32,
    /// Number of frames to simulate
    pub frames: u32,
    /// Extra `tracing` filter directives, comma separated
    pub log_filter: String,
    /// Settings for every timeline the demo creates
    pub timeline: TimelineSettings,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            frame_rate: 30.0,
            frames: 150,
            log_filter: "ordoplay_timeline=debug,ordoplay_timeline_demo=info".to_string(),
            timeline: TimelineSettings::named("demo"),
        }
    }
}

/// Error when loading the demo configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// File is not valid RON
    #[error("Failed to parse config: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// Frame rate must be positive
    #[error("Invalid frame rate: {0}")]
    InvalidFrameRate(f32),

    /// Nested timeline settings are invalid
    #[error(transparent)]
    Timeline(#[from] SettingsError),
}

impl DemoConfig {
    /// Parse a configuration from RON
    pub fn from_ron(source: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(source)?;
        config.timeline.validate()?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path`, or fall back to defaults when no path is given
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_ron(&std::fs::read_to_string(path)?),
            None => Ok(Self::default()),
        }
    }

    /// Seconds per simulated frame
    pub fn frame_delta(&self) -> f32 {
        1.0 / self.frame_rate
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !self.frame_rate.is_finite() || self.frame_rate <= 0.0 {
            return Err(ConfigError::InvalidFrameRate(self.frame_rate));
        }
        Ok(())
    }
}
