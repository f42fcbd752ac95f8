// SPDX-License-Identifier: MIT OR Apache-2.0
//! Step timelines for OrdoPlay.
//!
//! A [`Timeline`] is bound to one target object and runs a queue of timed
//! steps against it, one step at a time:
//! - Delays
//! - Absolute and rate-based movement
//! - Color fades
//! - Sprite swaps
//! - Destruction
//!
//! ## Architecture
//!
//! The timeline is built on:
//! - A FIFO step queue with fluent appends
//! - A tick driver that advances exactly one active step
//! - A capability trait ([`Target`]) for the object being animated
//!
//! ```ignore
//! timeline
//!     .delay(1.0)?
//!     .move_to([10.0, 0.0, 0.0], 2.0)?
//!     .set_color([1.0, 0.0, 0.0, 1.0], 0.5)?
//!     .destroy()?;
//!
//! // Once per frame:
//! timeline.tick(delta_time)?;
//! ```

pub mod builders;
pub mod error;
pub mod interpolation;
pub mod settings;
pub mod step;
pub mod target;
pub mod timeline;

pub use builders::{Delay, Destroy, FadeColor, MoveBy, MoveTo, SetSprite, StartValue};
pub use error::{Result, SettingsError, TimelineError};
pub use interpolation::Interpolation;
pub use settings::{AfterDestroy, TimelineSettings};
pub use step::{Step, StepAction, StepContext};
pub use target::{Capability, Color, SpriteId, Target, TargetHandle, Vec3};
pub use timeline::{Timeline, TimelineId, TimelineState};
