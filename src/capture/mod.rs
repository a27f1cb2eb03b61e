//! The timed countdown, flash and grab sequence.

/// Waits between phases.
pub mod clock;
/// Phases and their durations.
pub mod phase;
/// The capture run state machine.
pub mod sequencer;
