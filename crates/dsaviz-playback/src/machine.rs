//! Playback state machine over a loaded trace.
//!
//! [`PlaybackMachine`] owns the steps and the cursor and implements every
//! transition synchronously. It has no notion of time: the autoplay timer
//! lives in [`PlaybackController`](crate::PlaybackController), which calls
//! [`PlaybackMachine::tick`] on each interval.
//!
//! States: `Idle` (nothing loaded), `Paused`, `Playing`. The cursor always
//! stays within `[0, max(len - 1, 0)]`, and reaching the final step while
//! playing drops back to `Paused`.

use dsaviz_core::Step;
use serde::Serialize;

/// Lifecycle state of a playback session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackStatus {
    /// No steps loaded.
    #[default]
    Idle,
    /// Steps loaded, cursor not advancing.
    Paused,
    /// Cursor advancing on a timer.
    Playing,
}

/// Cheap copy of the observable playback state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackSnapshot {
    pub current_index: usize,
    pub len: usize,
    pub status: PlaybackStatus,
}

impl PlaybackSnapshot {
    pub fn is_playing(&self) -> bool {
        self.status == PlaybackStatus::Playing
    }

    /// Whether the cursor sits on the last step (false when nothing is loaded).
    pub fn at_end(&self) -> bool {
        self.len > 0 && self.current_index == self.len - 1
    }
}

#[derive(Debug, Clone, Default)]
pub struct PlaybackMachine {
    steps: Vec<Step>,
    current_index: usize,
    status: PlaybackStatus,
}

impl PlaybackMachine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the trace and rewinds to the first step.
    pub fn load(&mut self, steps: Vec<Step>) {
        self.status = if steps.is_empty() {
            PlaybackStatus::Idle
        } else {
            PlaybackStatus::Paused
        };
        self.steps = steps;
        self.current_index = 0;
    }

    /// Starts autoplay. Returns `false` (and changes nothing) unless paused
    /// with at least one step still ahead.
    pub fn play(&mut self) -> bool {
        if self.status != PlaybackStatus::Paused || self.at_end() {
            return false;
        }
        self.status = PlaybackStatus::Playing;
        true
    }

    pub fn pause(&mut self) {
        if self.status == PlaybackStatus::Playing {
            self.status = PlaybackStatus::Paused;
        }
    }

    pub fn step_forward(&mut self) {
        if self.steps.is_empty() {
            return;
        }
        self.current_index = (self.current_index + 1).min(self.last_index());
        self.settle();
    }

    pub fn step_backward(&mut self) {
        self.current_index = self.current_index.saturating_sub(1);
    }

    /// Rewinds to the first step and stops autoplay.
    pub fn reset(&mut self) {
        self.current_index = 0;
        self.pause();
    }

    /// Jumps to `index`, clamped to the trace.
    pub fn seek(&mut self, index: usize) {
        if self.steps.is_empty() {
            return;
        }
        self.current_index = index.min(self.last_index());
        self.settle();
    }

    /// Advances one step if playing. Returns whether playback continues.
    pub fn tick(&mut self) -> bool {
        if self.status != PlaybackStatus::Playing {
            return false;
        }
        self.current_index = (self.current_index + 1).min(self.last_index());
        self.settle();
        self.is_playing()
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn current_step(&self) -> Option<&Step> {
        self.steps.get(self.current_index)
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn status(&self) -> PlaybackStatus {
        self.status
    }

    pub fn is_playing(&self) -> bool {
        self.status == PlaybackStatus::Playing
    }

    pub fn snapshot(&self) -> PlaybackSnapshot {
        PlaybackSnapshot {
            current_index: self.current_index,
            len: self.steps.len(),
            status: self.status,
        }
    }

    fn at_end(&self) -> bool {
        self.snapshot().at_end()
    }

    fn last_index(&self) -> usize {
        self.steps.len().saturating_sub(1)
    }

    /// Playing ends once the final step is current.
    fn settle(&mut self) {
        if self.status == PlaybackStatus::Playing && self.at_end() {
            self.status = PlaybackStatus::Paused;
        }
    }
}
