use std::time::Duration;

/// Source of timed waits for a capture run.
pub trait Clock {
    /// Suspend for `d`.
    fn sleep(&mut self, d: Duration);
}

/// Wall-clock waits via [`std::thread::sleep`].
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn sleep(&mut self, d: Duration) {
        if !d.is_zero() {
            std::thread::sleep(d);
        }
    }
}

/// Records requested waits without sleeping.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    waits: Vec<Duration>,
}

impl ManualClock {
    /// Create an empty clock.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every wait requested so far, in order.
    pub fn waits(&self) -> &[Duration] {
        &self.waits
    }

    /// Sum of all requested waits.
    pub fn elapsed(&self) -> Duration {
        self.waits.iter().sum()
    }
}

impl Clock for ManualClock {
    fn sleep(&mut self, d: Duration) {
        self.waits.push(d);
    }
}
