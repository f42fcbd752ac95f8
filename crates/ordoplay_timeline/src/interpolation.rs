// SPDX-License-Identifier: MIT OR Apache-2.0
//! Linear interpolation helpers used by the tweening steps.

use crate::target::{Color, Vec3};

/// Interpolation utilities
pub struct Interpolation;

impl Interpolation {
    /// Linear interpolation between two floats
    pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
        a + (b - a) * t
    }

    /// Interpolate a position
    pub fn lerp_vec3(a: Vec3, b: Vec3, t: f32) -> Vec3 {
        [
            Self::lerp(a[0], b[0], t),
            Self::lerp(a[1], b[1], t),
            Self::lerp(a[2], b[2], t),
        ]
    }

    /// Interpolate an RGBA color
    pub fn lerp_color(a: Color, b: Color, t: f32) -> Color {
        [
            Self::lerp(a[0], b[0], t),
            Self::lerp(a[1], b[1], t),
            Self::lerp(a[2], b[2], t),
            Self::lerp(a[3], b[3], t),
        ]
    }

    /// Normalized progress of a step, clamped to `[0, 1]`.
    ///
    /// A non-positive duration jumps straight to 1.
    pub fn progress(elapsed: f32, duration: f32) -> f32 {
        if duration > 0.0 {
            (elapsed / duration).clamp(0.0, 1.0)
        } else {
            1.0
        }
    }
}
