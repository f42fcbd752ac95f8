// SPDX-License-Identifier: MIT OR Apache-2.0
//! Built-in steps and the fluent builders that queue them.
//!
//! Each builder appends exactly one step. Interpolating steps read their
//! start value on their first invocation, so an earlier step in the same
//! chain may move or recolor the target before they begin.

use crate::error::{Result, TimelineError};
use crate::interpolation::Interpolation;
use crate::step::{StepAction, StepContext};
use crate::target::{Capability, Color, SpriteId, Target, Vec3};
use crate::timeline::Timeline;

/// Start value of an interpolating step
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum StartValue<V> {
    /// Not read from the target yet
    #[default]
    Pending,
    /// Read on the step's first invocation
    Captured(V),
}

impl<V: Copy> StartValue<V> {
    /// Return the captured value, reading it with `read` the first time
    pub fn get_or_capture(&mut self, read: impl FnOnce() -> V) -> V {
        match *self {
            Self::Captured(value) => value,
            Self::Pending => {
                let value = read();
                *self = Self::Captured(value);
                value
            }
        }
    }

    /// Captured value, if any
    pub fn captured(&self) -> Option<V> {
        match self {
            Self::Captured(value) => Some(*value),
            Self::Pending => None,
        }
    }
}

/// Waits without touching the target
#[derive(Debug, Clone, Copy, Default)]
pub struct Delay;

impl<T> StepAction<T> for Delay {
    fn run(&mut self, _target: &mut T, _ctx: StepContext) -> Result<()> {
        Ok(())
    }

    fn label(&self) -> &'static str {
        "delay"
    }
}

/// Moves the target to an absolute position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveTo {
    /// Final position
    pub destination: Vec3,
    /// Position when the step first ran
    pub start: StartValue<Vec3>,
}

impl MoveTo {
    /// Create a move toward `destination`
    pub fn new(destination: Vec3) -> Self {
        Self {
            destination,
            start: StartValue::Pending,
        }
    }
}

impl<T: Target> StepAction<T> for MoveTo {
    fn run(&mut self, target: &mut T, ctx: StepContext) -> Result<()> {
        let start = self.start.get_or_capture(|| target.position());
        target.set_position(Interpolation::lerp_vec3(start, self.destination, ctx.progress()));
        Ok(())
    }

    fn label(&self) -> &'static str {
        "move_to"
    }
}

/// Moves the target at a constant rate per second
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveBy {
    /// Units per second on each axis
    pub rate: Vec3,
}

impl<T: Target> StepAction<T> for MoveBy {
    fn run(&mut self, target: &mut T, ctx: StepContext) -> Result<()> {
        let mut position = target.position();
        for (axis, rate) in position.iter_mut().zip(self.rate) {
            *axis += rate * ctx.delta;
        }
        target.set_position(position);
        Ok(())
    }

    fn label(&self) -> &'static str {
        "move_by"
    }
}

/// Requests removal of the target
#[derive(Debug, Clone, Copy, Default)]
pub struct Destroy;

impl<T: Target> StepAction<T> for Destroy {
    fn run(&mut self, target: &mut T, _ctx: StepContext) -> Result<()> {
        if !target.is_removed() {
            target.remove();
        }
        Ok(())
    }

    fn label(&self) -> &'static str {
        "destroy"
    }
}

/// Fades the target's color
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FadeColor {
    /// Final color
    pub color: Color,
    /// Color when the step first ran
    pub start: StartValue<Color>,
}

impl FadeColor {
    /// Create a fade toward `color`
    pub fn new(color: Color) -> Self {
        Self {
            color,
            start: StartValue::Pending,
        }
    }
}

impl<T: Target> StepAction<T> for FadeColor {
    fn run(&mut self, target: &mut T, ctx: StepContext) -> Result<()> {
        let current = target
            .color_mut()
            .ok_or(TimelineError::MissingCapability(Capability::Color))?;
        let start = self.start.get_or_capture(|| *current);
        *current = Interpolation::lerp_color(start, self.color, ctx.progress());
        Ok(())
    }

    fn label(&self) -> &'static str {
        "set_color"
    }
}

/// Swaps the target's sprite
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SetSprite {
    /// Sprite to show
    pub sprite: SpriteId,
}

impl<T: Target> StepAction<T> for SetSprite {
    fn run(&mut self, target: &mut T, _ctx: StepContext) -> Result<()> {
        let slot = target
            .sprite_mut()
            .ok_or(TimelineError::MissingCapability(Capability::Sprite))?;
        *slot = self.sprite;
        Ok(())
    }

    fn label(&self) -> &'static str {
        "set_sprite"
    }
}

impl<T: Target> Timeline<T> {
    /// Wait `duration` seconds before the next step
    pub fn delay(&mut self, duration: f32) -> Result<&mut Self> {
        self.then(Delay, duration)
    }

    /// Move to `destination` over `duration` seconds
    pub fn move_to(&mut self, destination: Vec3, duration: f32) -> Result<&mut Self> {
        self.then(MoveTo::new(destination), duration)
    }

    /// Move at `rate` units per second for `duration` seconds.
    ///
    /// Displacement follows the tick deltas, so it is not normalized to
    /// `duration`.
    pub fn move_by(&mut self, rate: Vec3, duration: f32) -> Result<&mut Self> {
        self.then(MoveBy { rate }, duration)
    }

    /// Remove the target.
    ///
    /// Steps queued after this one never run.
    pub fn destroy(&mut self) -> Result<&mut Self> {
        self.then_once(Destroy)?;
        self.mark_destroy_queued();
        Ok(self)
    }

    /// Fade to `color` over `duration` seconds.
    ///
    /// Fails with `MissingCapability` if the target has no color.
    pub fn set_color(&mut self, color: Color, duration: f32) -> Result<&mut Self> {
        self.require(Capability::Color)?;
        self.then(FadeColor::new(color), duration)
    }

    /// Swap the sprite once.
    ///
    /// Fails with `MissingCapability` if the target has no sprite slot.
    pub fn set_sprite(&mut self, sprite: SpriteId) -> Result<&mut Self> {
        self.require(Capability::Sprite)?;
        self.then_once(SetSprite { sprite })
    }

    fn require(&self, capability: Capability) -> Result<()> {
        if self.inspect_target(|target| target.supports(capability))? {
            Ok(())
        } else {
            Err(TimelineError::MissingCapability(capability))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{AfterDestroy, TimelineSettings};
    use crate::target::tests::TestTarget;
    use crate::timeline::TimelineState;

    fn assert_vec3_near(actual: Vec3, expected: Vec3) {
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < 1e-4, "{actual:?} != {expected:?}");
        }
    }

    #[test]
    fn test_scripted_sequence() {
        let target = TestTarget::at([0.0, 0.0, 0.0]).handle();
        let mut timeline = Timeline::new(&target);
        timeline
            .delay(1.0).unwrap()
            .move_to([10.0, 0.0, 0.0], 2.0).unwrap()
            .destroy().unwrap();

        timeline.tick(1.0).unwrap();
        assert_vec3_near(target.borrow().position, [0.0, 0.0, 0.0]);
        assert_eq!(timeline.active_label(), Some("move_to"));

        timeline.tick(1.0).unwrap();
        assert_vec3_near(target.borrow().position, [5.0, 0.0, 0.0]);
        assert!(!target.borrow().removed);

        timeline.tick(1.0).unwrap();
        assert_vec3_near(target.borrow().position, [10.0, 0.0, 0.0]);
        assert!(target.borrow().removed);
        assert!(timeline.is_idle());

        timeline.tick(1.0).unwrap();
        assert_eq!(target.borrow().remove_calls, 1);
        assert_eq!(timeline.completed_steps(), 3);
    }

    #[test]
    fn test_set_sprite_alone() {
        let sprite = SpriteId::new();
        let target = TestTarget::default().with_sprite(SpriteId::new()).handle();
        let mut timeline = Timeline::new(&target);
        timeline.set_sprite(sprite).unwrap();

        timeline.tick(0.3).unwrap();

        assert_eq!(target.borrow().sprite, Some(sprite));
        assert_eq!(target.borrow().sprite_writes, 1);
        assert!(timeline.is_idle());
    }

    #[test]
    fn test_negative_delay_rejected() {
        let target = TestTarget::default().handle();
        let mut timeline = Timeline::new(&target);
        timeline.delay(1.0).unwrap();

        assert_eq!(
            timeline.delay(-1.0).unwrap_err(),
            TimelineError::InvalidDuration(-1.0)
        );
        assert_eq!(timeline.pending_steps(), 1);
    }

    #[test]
    fn test_move_to_lands_on_destination() {
        let target = TestTarget::at([1.0, 2.0, 3.0]).handle();
        let mut timeline = Timeline::new(&target);
        timeline.move_to([4.0, -2.0, 0.0], 1.0).unwrap();

        for _ in 0..4 {
            timeline.tick(0.25).unwrap();
        }
        assert_vec3_near(target.borrow().position, [4.0, -2.0, 0.0]);
        assert!(timeline.is_idle());
    }

    #[test]
    fn test_move_to_zero_duration_jumps() {
        let target = TestTarget::at([1.0, 1.0, 1.0]).handle();
        let mut timeline = Timeline::new(&target);
        timeline.move_to([7.0, 8.0, 9.0], 0.0).unwrap();

        timeline.tick(0.016).unwrap();
        assert_vec3_near(target.borrow().position, [7.0, 8.0, 9.0]);
    }

    #[test]
    fn test_move_to_overshoot_clamps() {
        let target = TestTarget::at([0.0; 3]).handle();
        let mut timeline = Timeline::new(&target);
        timeline.move_to([2.0, 0.0, 0.0], 1.0).unwrap();

        timeline.tick(0.0).unwrap();
        timeline.tick(1.5).unwrap();
        assert_vec3_near(target.borrow().position, [2.0, 0.0, 0.0]);
    }

    #[test]
    fn test_move_to_captures_start_lazily() {
        let target = TestTarget::at([0.0; 3]).handle();
        let mut timeline = Timeline::new(&target);
        timeline
            .move_to([10.0, 0.0, 0.0], 0.0).unwrap()
            .move_to([10.0, 10.0, 0.0], 2.0).unwrap();

        timeline.tick(0.0).unwrap();
        timeline.tick(1.0).unwrap();
        assert_vec3_near(target.borrow().position, [10.0, 5.0, 0.0]);
    }

    #[test]
    fn test_interpolation_is_monotonic() {
        let target = TestTarget::at([0.0; 3]).handle();
        let mut timeline = Timeline::new(&target);
        timeline.move_to([3.0, 0.0, 0.0], 3.0).unwrap();

        let mut previous = 0.0;
        for _ in 0..30 {
            timeline.tick(0.1).unwrap();
            let x = target.borrow().position[0];
            assert!(x >= previous);
            previous = x;
        }
        assert!((previous - 3.0).abs() < 1e-4);
    }

    #[test]
    fn test_move_by_integrates_deltas() {
        let target = TestTarget::at([0.0; 3]).handle();
        let mut timeline = Timeline::new(&target);
        timeline.move_by([2.0, 0.0, -1.0], 1.0).unwrap();

        for _ in 0..4 {
            timeline.tick(0.25).unwrap();
        }
        assert_vec3_near(target.borrow().position, [2.0, 0.0, -1.0]);
        assert!(timeline.is_idle());
    }

    #[test]
    fn test_set_color_fades() {
        let target = TestTarget::default().with_color([0.0, 0.0, 0.0, 1.0]).handle();
        let mut timeline = Timeline::new(&target);
        timeline.set_color([1.0, 1.0, 1.0, 0.0], 2.0).unwrap();

        timeline.tick(1.0).unwrap();
        assert_eq!(target.borrow().color, Some([0.5, 0.5, 0.5, 0.5]));

        timeline.tick(1.0).unwrap();
        assert_eq!(target.borrow().color, Some([1.0, 1.0, 1.0, 0.0]));
    }

    #[test]
    fn test_set_color_captures_start_lazily() {
        let target = TestTarget::default().with_color([1.0, 0.0, 0.0, 1.0]).handle();
        let mut timeline = Timeline::new(&target);
        timeline.set_color([0.0, 0.0, 1.0, 1.0], 1.0).unwrap();

        target.borrow_mut().color = Some([0.0, 1.0, 0.0, 1.0]);
        timeline.tick(0.5).unwrap();
        assert_eq!(target.borrow().color, Some([0.0, 0.5, 0.5, 1.0]));
    }

    #[test]
    fn test_missing_capability_fails_at_build() {
        let target = TestTarget::default().handle();
        let mut timeline = Timeline::new(&target);

        assert_eq!(
            timeline.set_color([1.0; 4], 1.0).unwrap_err(),
            TimelineError::MissingCapability(Capability::Color)
        );
        assert_eq!(
            timeline.set_sprite(SpriteId::new()).unwrap_err(),
            TimelineError::MissingCapability(Capability::Sprite)
        );
        assert_eq!(timeline.pending_steps(), 0);
    }

    #[test]
    fn test_lost_capability_fails_at_tick() {
        let target = TestTarget::default().with_color([0.0; 4]).handle();
        let mut timeline = Timeline::new(&target);
        timeline.set_color([1.0; 4], 1.0).unwrap();

        target.borrow_mut().color = None;
        assert_eq!(
            timeline.tick(0.5),
            Err(TimelineError::MissingCapability(Capability::Color))
        );
        assert!(timeline.is_idle());
    }

    #[test]
    fn test_builders_on_released_target() {
        let target = TestTarget::default().with_color([0.0; 4]).handle();
        let mut timeline = Timeline::new(&target);
        drop(target);

        assert_eq!(
            timeline.set_color([1.0; 4], 1.0).unwrap_err(),
            TimelineError::TargetReleased
        );
        assert!(timeline.delay(1.0).is_ok());
    }

    #[test]
    fn test_steps_after_destroy_unreachable() {
        let target = TestTarget::at([0.0; 3]).handle();
        let mut timeline = Timeline::new(&target);
        timeline
            .destroy().unwrap()
            .move_to([5.0, 5.0, 5.0], 0.0).unwrap();

        timeline.tick(1.0).unwrap();
        timeline.tick(1.0).unwrap();

        assert!(target.borrow().removed);
        assert_vec3_near(target.borrow().position, [0.0; 3]);
        assert_eq!(timeline.pending_steps(), 1);
        assert_eq!(timeline.state(), TimelineState::Idle);
    }

    #[test]
    fn test_steps_after_destroy_rejected() {
        let target = TestTarget::default().handle();
        let settings = TimelineSettings::default().with_after_destroy(AfterDestroy::Reject);
        let mut timeline = Timeline::with_settings(&target, settings);
        timeline.delay(0.5).unwrap().destroy().unwrap();

        assert_eq!(
            timeline.delay(1.0).unwrap_err(),
            TimelineError::StepAfterDestroy
        );
        assert_eq!(timeline.pending_steps(), 2);
    }

    #[test]
    fn test_start_value_capture() {
        let mut start = StartValue::Pending;
        assert_eq!(start.captured(), None);
        assert_eq!(start.get_or_capture(|| 3), 3);
        assert_eq!(start.get_or_capture(|| 9), 3);
        assert_eq!(start, StartValue::Captured(3));
    }
}
