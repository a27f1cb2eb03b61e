use std::time::Duration;

/// One step of the per-shot capture cycle.
///
/// A run walks `Ready → Pose → Smile → Flash → Grab → Cooldown` once per shot and ends in
/// `Done`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// First countdown step.
    Ready,
    /// Second countdown step.
    Pose,
    /// Last countdown step.
    Smile,
    /// White flash shown before the grab.
    Flash,
    /// Frame read, filter bake and encode. Instantaneous.
    Grab,
    /// Pause between shots.
    Cooldown,
    /// Every requested shot has been taken or skipped.
    Done,
}

impl Phase {
    /// Countdown label shown while this phase is active.
    pub fn countdown_label(self) -> Option<&'static str> {
        match self {
            Self::Ready => Some("1 Get Ready!"),
            Self::Pose => Some("2 Pose"),
            Self::Smile => Some("3 Smile!"),
            _ => None,
        }
    }

    /// How long the phase stays visible before the run advances.
    pub fn duration(self, timings: &PhaseTimings) -> Duration {
        let ms = match self {
            Self::Ready => timings.ready_ms,
            Self::Pose => timings.pose_ms,
            Self::Smile => timings.smile_ms,
            Self::Flash => timings.flash_ms,
            Self::Cooldown => timings.cooldown_ms,
            Self::Grab | Self::Done => 0,
        };
        Duration::from_millis(ms)
    }

    /// Successor phase. `more_shots` tells `Cooldown` whether to loop back to `Ready`.
    pub fn next(self, more_shots: bool) -> Self {
        match self {
            Self::Ready => Self::Pose,
            Self::Pose => Self::Smile,
            Self::Smile => Self::Flash,
            Self::Flash => Self::Grab,
            Self::Grab => Self::Cooldown,
            Self::Cooldown if more_shots => Self::Ready,
            Self::Cooldown | Self::Done => Self::Done,
        }
    }

    /// `true` for the three countdown steps.
    pub fn is_countdown(self) -> bool {
        self.countdown_label().is_some()
    }
}

/// Phase durations in milliseconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PhaseTimings {
    /// "1 Get Ready!" duration.
    pub ready_ms: u64,
    /// "2 Pose" duration.
    pub pose_ms: u64,
    /// "3 Smile!" duration.
    pub smile_ms: u64,
    /// Flash duration.
    pub flash_ms: u64,
    /// Pause after each grab.
    pub cooldown_ms: u64,
}

impl Default for PhaseTimings {
    fn default() -> Self {
        Self {
            ready_ms: 1000,
            pose_ms: 1000,
            smile_ms: 1000,
            flash_ms: 150,
            cooldown_ms: 700,
        }
    }
}

impl PhaseTimings {
    /// All phases zero-length, for tests and batch runs.
    pub const INSTANT: Self = Self {
        ready_ms: 0,
        pose_ms: 0,
        smile_ms: 0,
        flash_ms: 0,
        cooldown_ms: 0,
    };

    /// Total wait for one shot.
    pub fn per_shot(&self) -> Duration {
        Duration::from_millis(
            self.ready_ms + self.pose_ms + self.smile_ms + self.flash_ms + self.cooldown_ms,
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/capture/phase.rs"]
mod tests;
