// SPDX-License-Identifier: MIT OR Apache-2.0
//! Timeline settings.
//!
//! Settings are stored as RON and cover:
//! - Format version
//! - An optional display name used in logs
//! - What happens to steps queued after `destroy`

use crate::error::SettingsError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Current settings format version
pub const SETTINGS_FORMAT_VERSION: u32 = 1;

/// Policy for steps queued after a `destroy` step.
///
/// Such steps can never run because the target is gone by the time they
/// would activate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AfterDestroy {
    /// Queue them and log a warning
    #[default]
    Allow,
    /// Refuse them with `TimelineError::StepAfterDestroy`
    Reject,
}

/// Settings applied to a timeline when it is created
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineSettings {
    /// Format version
    pub version: u32,
    /// Name shown in logs instead of the timeline ID
    pub name: Option<String>,
    /// Handling of steps queued after `destroy`
    pub after_destroy: AfterDestroy,
}

impl Default for TimelineSettings {
    fn default() -> Self {
        Self {
            version: SETTINGS_FORMAT_VERSION,
            name: None,
            after_destroy: AfterDestroy::Allow,
        }
    }
}

impl TimelineSettings {
    /// Create settings with a display name
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Set the post-destroy policy
    pub fn with_after_destroy(mut self, policy: AfterDestroy) -> Self {
        self.after_destroy = policy;
        self
    }

    /// Parse settings from RON
    pub fn from_ron(source: &str) -> Result<Self, SettingsError> {
        let settings: Self = ron::from_str(source)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Check that this build can use the settings
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.version > SETTINGS_FORMAT_VERSION {
            return Err(SettingsError::UnsupportedVersion {
                found: self.version,
                supported: SETTINGS_FORMAT_VERSION,
            });
        }
        Ok(())
    }

    /// Encode settings as pretty RON
    pub fn to_ron(&self) -> Result<String, SettingsError> {
        Ok(ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?)
    }

    /// Load settings from a file
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_ron(&content)
    }

    /// Save settings to a file
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        std::fs::write(path, self.to_ron()?)?;
        Ok(())
    }
}
