//! Timed autoplay on top of [`PlaybackMachine`].
//!
//! The controller keeps the machine behind a mutex together with at most one
//! autoplay task. Every transition out of `Playing` (and every `load`)
//! aborts that task and bumps a generation counter before returning, so a
//! tick that was already waking up sees a stale generation and does nothing.
//! State changes are published on a `watch` channel for the UI.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use dsaviz_core::Step;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::machine::{PlaybackMachine, PlaybackSnapshot};

/// Delay between autoplay advances.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(1500);

/// Drives a [`PlaybackMachine`] for one visualization session.
///
/// Operations are synchronous and may be called from any thread, but
/// [`play`](Self::play) (and any operation that leaves the machine playing)
/// spawns the autoplay task and therefore must run inside a Tokio runtime.
pub struct PlaybackController {
    shared: Arc<Shared>,
    interval: Duration,
}

struct Shared {
    inner: Mutex<Inner>,
    updates: watch::Sender<PlaybackSnapshot>,
}

struct Inner {
    machine: PlaybackMachine,
    timer: Option<JoinHandle<()>>,
    generation: u64,
}

impl Inner {
    fn cancel_timer(&mut self) {
        if let Some(handle) = self.timer.take() {
            handle.abort();
        }
        self.generation = self.generation.wrapping_add(1);
    }
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, machine: &PlaybackMachine) {
        let next = machine.snapshot();
        self.updates.send_if_modified(|current| {
            if *current == next {
                return false;
            }
            *current = next;
            true
        });
    }

    /// Runs one autoplay tick for `generation`. Returns whether the task
    /// should keep going.
    fn tick(&self, generation: u64) -> bool {
        let mut inner = self.lock();
        if inner.generation != generation {
            return false;
        }

        let still_playing = inner.machine.tick();
        tracing::debug!(
            index = inner.machine.current_index(),
            still_playing,
            "playback tick"
        );
        if !still_playing {
            // The finishing task is the one holding this handle; detach it.
            inner.timer = None;
        }
        self.publish(&inner.machine);
        still_playing
    }
}

impl PlaybackController {
    pub fn new(interval: Duration) -> Self {
        let (updates, _) = watch::channel(PlaybackSnapshot::default());
        PlaybackController {
            shared: Arc::new(Shared {
                inner: Mutex::new(Inner {
                    machine: PlaybackMachine::new(),
                    timer: None,
                    generation: 0,
                }),
                updates,
            }),
            interval,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Replaces the trace. Any running autoplay is cancelled first.
    pub fn load(&self, steps: Vec<Step>) {
        self.transition(|machine| machine.load(steps));
    }

    /// Starts autoplay; returns `false` when there is nothing left to play.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn play(&self) -> bool {
        self.transition(PlaybackMachine::play)
    }

    pub fn pause(&self) {
        self.transition(PlaybackMachine::pause);
    }

    pub fn step_forward(&self) {
        self.transition(PlaybackMachine::step_forward);
    }

    pub fn step_backward(&self) {
        self.transition(PlaybackMachine::step_backward);
    }

    pub fn reset(&self) {
        self.transition(PlaybackMachine::reset);
    }

    pub fn seek(&self, index: usize) {
        self.transition(|machine| machine.seek(index));
    }

    pub fn snapshot(&self) -> PlaybackSnapshot {
        self.shared.lock().machine.snapshot()
    }

    pub fn current_step(&self) -> Option<Step> {
        self.shared.lock().machine.current_step().cloned()
    }

    pub fn steps(&self) -> Vec<Step> {
        self.shared.lock().machine.steps().to_vec()
    }

    /// Receives a snapshot after every observable state change.
    pub fn subscribe(&self) -> watch::Receiver<PlaybackSnapshot> {
        self.shared.updates.subscribe()
    }

    /// Whether an autoplay task is currently scheduled.
    pub fn has_pending_tick(&self) -> bool {
        self.shared.lock().timer.is_some()
    }

    fn transition<R>(&self, op: impl FnOnce(&mut PlaybackMachine) -> R) -> R {
        let mut inner = self.shared.lock();
        let was_playing = inner.machine.is_playing();
        let out = op(&mut inner.machine);

        // load() always lands in Paused or Idle, so it takes the cancel arm.
        let playing = inner.machine.is_playing();
        if was_playing && !playing {
            inner.cancel_timer();
        } else if !was_playing && playing {
            self.schedule(&mut inner);
        }

        self.shared.publish(&inner.machine);
        out
    }

    fn schedule(&self, inner: &mut Inner) {
        inner.cancel_timer();
        let generation = inner.generation;
        let shared = Arc::clone(&self.shared);
        let interval = self.interval;

        inner.timer = Some(tokio::spawn(async move {
            loop {
                tokio::time::sleep(interval).await;
                if !shared.tick(generation) {
                    break;
                }
            }
        }));
    }
}

impl Default for PlaybackController {
    fn default() -> Self {
        Self::new(DEFAULT_TICK_INTERVAL)
    }
}

impl Drop for PlaybackController {
    fn drop(&mut self) {
        self.shared.lock().cancel_timer();
    }
}
