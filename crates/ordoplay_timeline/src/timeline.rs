// SPDX-License-Identifier: MIT OR Apache-2.0
//! Step queue and tick driver.

use crate::error::{Result, TimelineError};
use crate::settings::{AfterDestroy, TimelineSettings};
use crate::step::{Step, StepAction, StepContext};
use crate::target::{Target, TargetHandle};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::{Rc, Weak};
use uuid::Uuid;

/// Unique identifier for a timeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimelineId(pub Uuid);

impl TimelineId {
    /// Create a new random timeline ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TimelineId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TimelineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Driver state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimelineState {
    /// No step is receiving ticks
    #[default]
    Idle,
    /// Step at this queue position is receiving ticks
    Active(usize),
}

/// Ordered steps run one at a time against a single target.
///
/// Every append returns the same timeline so calls chain:
/// `timeline.delay(1.0)?.move_to(p, 2.0)?.destroy()?`.
pub struct Timeline<T> {
    id: TimelineId,
    settings: TimelineSettings,
    target: Weak<RefCell<T>>,
    /// Pending steps; the front one is active when `state` is `Active`
    steps: VecDeque<Step<T>>,
    state: TimelineState,
    /// Seconds since the active step was activated
    elapsed: f32,
    completed: usize,
    destroy_queued: bool,
}

impl<T: Target> Timeline<T> {
    /// Create a timeline bound to `target`
    pub fn new(target: &TargetHandle<T>) -> Self {
        Self::with_settings(target, TimelineSettings::default())
    }

    /// Create a timeline bound to `target` with explicit settings
    pub fn with_settings(target: &TargetHandle<T>, settings: TimelineSettings) -> Self {
        Self {
            id: TimelineId::new(),
            settings,
            target: Rc::downgrade(target),
            steps: VecDeque::new(),
            state: TimelineState::Idle,
            elapsed: 0.0,
            completed: 0,
            destroy_queued: false,
        }
    }

    /// Timeline ID
    pub fn id(&self) -> TimelineId {
        self.id
    }

    /// Settings this timeline was created with
    pub fn settings(&self) -> &TimelineSettings {
        &self.settings
    }

    /// Name used in logs
    pub fn name(&self) -> String {
        match &self.settings.name {
            Some(name) => name.clone(),
            None => self.id.to_string(),
        }
    }

    /// Current driver state
    pub fn state(&self) -> TimelineState {
        self.state
    }

    /// Whether no step is receiving ticks
    pub fn is_idle(&self) -> bool {
        self.state == TimelineState::Idle
    }

    /// Steps not yet retired, including the active one
    pub fn pending_steps(&self) -> usize {
        self.steps.len()
    }

    /// Steps that have run to completion
    pub fn completed_steps(&self) -> usize {
        self.completed
    }

    /// Seconds the active step has been running
    pub fn active_elapsed(&self) -> Option<f32> {
        match self.state {
            TimelineState::Active(_) => Some(self.elapsed),
            TimelineState::Idle => None,
        }
    }

    /// Label of the active step
    pub fn active_label(&self) -> Option<&'static str> {
        match self.state {
            TimelineState::Active(_) => self.steps.front().map(Step::label),
            TimelineState::Idle => None,
        }
    }

    /// Whether the target has been dropped by its owner
    pub fn is_orphaned(&self) -> bool {
        self.target.strong_count() == 0
    }

    /// Append a step
    pub fn then(&mut self, action: impl StepAction<T> + 'static, duration: f32) -> Result<&mut Self> {
        let step = Step::new(action, duration)?;
        self.push(step)
    }

    /// Append a step that runs once
    pub fn then_once(&mut self, action: impl StepAction<T> + 'static) -> Result<&mut Self> {
        self.then(action, 0.0)
    }

    /// Append an already built step
    pub fn push(&mut self, step: Step<T>) -> Result<&mut Self> {
        if self.destroy_queued {
            match self.settings.after_destroy {
                AfterDestroy::Reject => return Err(TimelineError::StepAfterDestroy),
                AfterDestroy::Allow => tracing::warn!(
                    timeline = %self.name(),
                    step = step.label(),
                    "Step queued after destroy will never run"
                ),
            }
        }

        tracing::trace!(
            timeline = %self.name(),
            step = step.label(),
            duration = step.duration(),
            "Step queued"
        );
        self.steps.push_back(step);
        Ok(self)
    }

    /// Advance the active step by `delta` seconds.
    ///
    /// A step activated from idle runs once with zero elapsed time and then
    /// receives `delta`. A step that completes hands over to the next one
    /// within the same call; the next step runs once with zero elapsed time
    /// and the rest of `delta` is dropped.
    pub fn tick(&mut self, delta: f32) -> Result<()> {
        if !delta.is_finite() || delta < 0.0 {
            return Err(TimelineError::InvalidDelta(delta));
        }
        if self.steps.is_empty() {
            return Ok(());
        }

        let Some(handle) = self.target.upgrade() else {
            tracing::debug!(timeline = %self.name(), "Target released, tick ignored");
            return Ok(());
        };
        let Ok(mut target) = handle.try_borrow_mut() else {
            return Err(TimelineError::TargetBusy);
        };
        if target.is_removed() {
            return Ok(());
        }

        let mut carry = None;
        let mut step_delta = match self.state {
            TimelineState::Idle => {
                self.activate();
                carry = Some(delta).filter(|d| *d > 0.0);
                0.0
            }
            TimelineState::Active(_) => {
                self.elapsed += delta;
                delta
            }
        };

        loop {
            let Some(step) = self.steps.front_mut() else {
                break;
            };
            let ctx = StepContext {
                elapsed: self.elapsed,
                delta: step_delta,
                duration: step.duration(),
            };
            let outcome = step.run(&mut *target, ctx);
            let complete = step.is_complete(self.elapsed);

            if let Err(err) = outcome {
                tracing::warn!(timeline = %self.name(), "Step failed: {}", err);
                self.retire();
                return Err(err);
            }

            if !complete {
                match carry.take() {
                    Some(delta) => {
                        self.elapsed += delta;
                        step_delta = delta;
                        continue;
                    }
                    None => break,
                }
            }

            carry = None;
            self.retire();
            if target.is_removed() {
                if !self.steps.is_empty() {
                    tracing::debug!(
                        timeline = %self.name(),
                        unreachable = self.steps.len(),
                        "Target removed with steps remaining"
                    );
                }
                break;
            }
            if !self.activate() {
                break;
            }
            step_delta = 0.0;
        }

        Ok(())
    }

    /// Make the front step active. Returns `false` when nothing is queued.
    fn activate(&mut self) -> bool {
        let Some(step) = self.steps.front() else {
            self.state = TimelineState::Idle;
            return false;
        };
        tracing::debug!(
            timeline = %self.name(),
            index = self.completed,
            step = step.label(),
            duration = step.duration(),
            "Step activated"
        );
        self.state = TimelineState::Active(self.completed);
        self.elapsed = 0.0;
        true
    }

    fn retire(&mut self) {
        if let Some(step) = self.steps.pop_front() {
            tracing::debug!(
                timeline = %self.name(),
                index = self.completed,
                step = step.label(),
                "Step completed"
            );
            self.completed += 1;
        }
        self.state = TimelineState::Idle;
        self.elapsed = 0.0;
    }

    /// Run `f` against the target, failing if it is gone or borrowed
    pub(crate) fn inspect_target<R>(&self, f: impl FnOnce(&T) -> R) -> Result<R> {
        let handle = self.target.upgrade().ok_or(TimelineError::TargetReleased)?;
        let target = handle.try_borrow().map_err(|_| TimelineError::TargetBusy)?;
        Ok(f(&target))
    }

    pub(crate) fn mark_destroy_queued(&mut self) {
        self.destroy_queued = true;
    }
}

impl<T> fmt::Debug for Timeline<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Timeline")
            .field("id", &self.id)
            .field("state", &self.state)
            .field("elapsed", &self.elapsed)
            .field("steps", &self.steps)
            .field("completed", &self.completed)
            .finish()
    }
}
