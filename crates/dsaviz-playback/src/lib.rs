//! Step navigation and timed autoplay over an analysis trace.
//!
//! - [`PlaybackMachine`] is the synchronous state machine
//!   (`Idle`, `Paused`, `Playing`) with clamped cursor movement.
//! - [`PlaybackController`] wraps it with a cancellable Tokio autoplay task
//!   and a `watch` channel of [`PlaybackSnapshot`]s for the rendering side.

pub mod controller;
pub mod machine;

pub use controller::{PlaybackController, DEFAULT_TICK_INTERVAL};
pub use machine::{PlaybackMachine, PlaybackSnapshot, PlaybackStatus};
