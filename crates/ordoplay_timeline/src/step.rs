// SPDX-License-Identifier: MIT OR Apache-2.0
//! Queued units of work.

use crate::error::{Result, TimelineError};
use crate::interpolation::Interpolation;
use std::fmt;

/// Timing passed to a step on each invocation
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StepContext {
    /// Seconds since the step became active
    pub elapsed: f32,
    /// Seconds added by the tick that caused this invocation
    pub delta: f32,
    /// Total seconds the step runs for
    pub duration: f32,
}

impl StepContext {
    /// Context of the first invocation, made on activation
    pub fn activation(duration: f32) -> Self {
        Self {
            elapsed: 0.0,
            delta: 0.0,
            duration,
        }
    }

    /// Normalized progress in `[0, 1]`; zero-length steps report 1
    pub fn progress(&self) -> f32 {
        Interpolation::progress(self.elapsed, self.duration)
    }
}

/// Per-tick behavior of a step
pub trait StepAction<T> {
    /// Invoke the step against its target
    fn run(&mut self, target: &mut T, ctx: StepContext) -> Result<()>;

    /// Short name used in logs
    fn label(&self) -> &'static str {
        "custom"
    }
}

impl<T, F> StepAction<T> for F
where
    F: FnMut(&mut T, StepContext),
{
    fn run(&mut self, target: &mut T, ctx: StepContext) -> Result<()> {
        self(target, ctx);
        Ok(())
    }
}

/// An action paired with how long it runs
pub struct Step<T> {
    action: Box<dyn StepAction<T>>,
    duration: f32,
}

impl<T> Step<T> {
    /// Create a step, rejecting negative or non-finite durations
    pub fn new(action: impl StepAction<T> + 'static, duration: f32) -> Result<Self> {
        if !duration.is_finite() || duration < 0.0 {
            return Err(TimelineError::InvalidDuration(duration));
        }
        Ok(Self {
            action: Box::new(action),
            duration,
        })
    }

    /// Seconds this step stays active
    pub fn duration(&self) -> f32 {
        self.duration
    }

    /// Name used in logs
    pub fn label(&self) -> &'static str {
        self.action.label()
    }

    /// Whether `elapsed` seconds complete this step
    pub fn is_complete(&self, elapsed: f32) -> bool {
        elapsed >= self.duration
    }

    pub(crate) fn run(&mut self, target: &mut T, ctx: StepContext) -> Result<()> {
        self.action.run(target, ctx)
    }
}

impl<T> fmt::Debug for Step<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Step")
            .field("label", &self.label())
            .field("duration", &self.duration)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_bad_durations() {
        let noop = |_: &mut (), _: StepContext| {};
        assert_eq!(
            Step::new(noop, -1.0).unwrap_err(),
            TimelineError::InvalidDuration(-1.0)
        );
        assert!(Step::new(noop, f32::INFINITY).is_err());
        assert!(Step::new(noop, f32::NAN).is_err());
        assert!(Step::new(noop, 0.0).is_ok());
    }

    #[test]
    fn test_completion_threshold() {
        let step = Step::new(|_: &mut (), _: StepContext| {}, 2.0).unwrap();
        assert!(!step.is_complete(1.999));
        assert!(step.is_complete(2.0));
        assert!(step.is_complete(2.5));

        let once = Step::new(|_: &mut (), _: StepContext| {}, 0.0).unwrap();
        assert!(once.is_complete(0.0));
    }

    #[test]
    fn test_context_progress() {
        assert_eq!(StepContext::activation(2.0).progress(), 0.0);
        assert_eq!(StepContext::activation(0.0).progress(), 1.0);
        let ctx = StepContext { elapsed: 1.5, delta: 0.5, duration: 2.0 };
        assert_eq!(ctx.progress(), 0.75);
    }

    #[test]
    fn test_closure_action_runs() {
        let mut step = Step::new(|hits: &mut u32, _: StepContext| *hits += 1, 1.0).unwrap();
        let mut hits = 0;
        step.run(&mut hits, StepContext::activation(1.0)).unwrap();
        step.run(&mut hits, StepContext { elapsed: 0.5, delta: 0.5, duration: 1.0 }).unwrap();
        assert_eq!(hits, 2);
        assert_eq!(step.label(), "custom");
    }
}
