// SPDX-License-Identifier: MIT OR Apache-2.0
//! Error types for timelines and their settings.

use crate::target::Capability;

/// Error raised while building or driving a timeline
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TimelineError {
    /// Step duration is negative or not finite
    #[error("Invalid step duration: {0}")]
    InvalidDuration(f32),

    /// Tick delta is negative or not finite
    #[error("Invalid tick delta: {0}")]
    InvalidDelta(f32),

    /// Target lacks a property the step needs
    #[error("Target does not support {0}")]
    MissingCapability(Capability),

    /// Target was dropped by its owner
    #[error("Target has been released")]
    TargetReleased,

    /// Target is already borrowed by the host
    #[error("Target is borrowed elsewhere")]
    TargetBusy,

    /// A step was queued after `destroy` while the settings forbid it
    #[error("Step queued after destroy")]
    StepAfterDestroy,
}

/// Result type alias
pub type Result<T> = std::result::Result<T, TimelineError>;

/// Error when loading or saving timeline settings
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// File could not be read or written
    #[error("Settings I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// File is not valid RON for the settings
    #[error("Failed to parse settings: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// Settings could not be encoded
    #[error("Failed to serialize settings: {0}")]
    Serialize(#[from] ron::Error),

    /// Settings were written by a newer format
    #[error("Unsupported settings version {found} (max {supported})")]
    UnsupportedVersion {
        /// Version in the file
        found: u32,
        /// Highest version this build reads
        supported: u32,
    },
}
