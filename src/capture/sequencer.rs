use std::time::Duration;

use crate::assets::decode::{ImageFrame, encode_png};
use crate::camera::source::FrameSource;
use crate::capture::clock::Clock;
use crate::capture::phase::{Phase, PhaseTimings};
use crate::filters::registry::FilterDescriptor;
use crate::foundation::config::validate_shot_count;
use crate::foundation::error::{BoothError, BoothResult};

/// State of one capture run.
#[derive(Clone, Debug)]
pub struct CaptureSession {
    shots_requested: u8,
    current_phase: Phase,
    frames: Vec<ImageFrame>,
    skipped_shots: Vec<usize>,
}

impl CaptureSession {
    fn new(shots_requested: u8) -> Self {
        Self {
            shots_requested,
            current_phase: Phase::Ready,
            frames: Vec::with_capacity(usize::from(shots_requested)),
            skipped_shots: Vec::new(),
        }
    }

    /// Shots the run was started with.
    pub fn shots_requested(&self) -> u8 {
        self.shots_requested
    }

    /// Phase the run is in.
    pub fn current_phase(&self) -> Phase {
        self.current_phase
    }

    /// Encoded frames in capture order.
    pub fn frames(&self) -> &[ImageFrame] {
        &self.frames
    }

    /// Take the frames out of the session.
    pub fn into_frames(self) -> Vec<ImageFrame> {
        self.frames
    }

    /// 0-based indices of shots whose grab failed after retrying.
    pub fn skipped_shots(&self) -> &[usize] {
        &self.skipped_shots
    }

    /// `true` once the run reached [`Phase::Done`].
    pub fn is_done(&self) -> bool {
        self.current_phase == Phase::Done
    }
}

/// Hooks fired as a run progresses. All methods default to no-ops.
pub trait SequenceObserver {
    /// `phase` became active for 0-based `shot`.
    fn phase_entered(&mut self, _phase: Phase, _shot: usize) {}
    /// Frame `index` was encoded and appended.
    fn frame_captured(&mut self, _index: usize, _frame: &ImageFrame) {}
    /// Shot `shot` produced no frame.
    fn shot_skipped(&mut self, _shot: usize, _err: &BoothError) {}
}

/// Observer that ignores every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl SequenceObserver for NoopObserver {}

/// A timed capture run, advanced one phase per [`CaptureRun::tick`].
#[derive(Debug)]
pub struct CaptureRun {
    session: CaptureSession,
    filter: FilterDescriptor,
    timings: PhaseTimings,
    grab_retries: u8,
    shot: usize,
}

impl CaptureRun {
    /// Start a run in [`Phase::Ready`] for the first shot.
    pub fn new(
        shots: u8,
        filter: FilterDescriptor,
        timings: PhaseTimings,
        grab_retries: u8,
    ) -> BoothResult<Self> {
        validate_shot_count(shots)?;
        Ok(Self {
            session: CaptureSession::new(shots),
            filter,
            timings,
            grab_retries,
            shot: 0,
        })
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.session.current_phase
    }

    /// 0-based index of the shot in progress.
    pub fn shot(&self) -> usize {
        self.shot
    }

    /// Session state so far.
    pub fn session(&self) -> &CaptureSession {
        &self.session
    }

    /// Finish the run and hand over its session.
    pub fn into_session(self) -> CaptureSession {
        self.session
    }

    /// How long the current phase stays up before the next tick.
    pub fn current_wait(&self) -> Duration {
        self.phase().duration(&self.timings)
    }

    /// Leave the current phase and enter the next one.
    ///
    /// Entering [`Phase::Grab`] performs the grab. Returns the wait for the new phase, or `None`
    /// once the run is done.
    pub fn tick(
        &mut self,
        source: &mut dyn FrameSource,
        observer: &mut dyn SequenceObserver,
    ) -> Option<Duration> {
        if self.session.is_done() {
            return None;
        }
        let phase = self.phase();
        let more_shots = self.shot + 1 < usize::from(self.session.shots_requested);
        if phase == Phase::Cooldown && more_shots {
            self.shot += 1;
        }
        let next = phase.next(more_shots);
        self.session.current_phase = next;
        tracing::debug!(?next, shot = self.shot, "capture phase");

        if next == Phase::Done {
            return None;
        }
        observer.phase_entered(next, self.shot);
        if next == Phase::Grab {
            self.grab(source, observer);
        }
        Some(self.current_wait())
    }

    fn grab(&mut self, source: &mut dyn FrameSource, observer: &mut dyn SequenceObserver) {
        let attempts = u32::from(self.grab_retries) + 1;
        let mut last_err = None;
        for attempt in 0..attempts {
            match self.grab_once(source) {
                Ok(frame) => {
                    let index = self.session.frames.len();
                    observer.frame_captured(index, &frame);
                    self.session.frames.push(frame);
                    return;
                }
                Err(err) => {
                    tracing::debug!(%err, attempt, shot = self.shot, "grab attempt failed");
                    last_err = Some(err);
                }
            }
        }
        let err = last_err.unwrap_or_else(|| BoothError::grab_skipped("no grab attempts"));
        tracing::warn!(%err, shot = self.shot, "shot skipped");
        observer.shot_skipped(self.shot, &err);
        self.session.skipped_shots.push(self.shot);
    }

    fn grab_once(&self, source: &mut dyn FrameSource) -> BoothResult<ImageFrame> {
        let mut frame = source.read_frame()?;
        if frame.is_empty() {
            return Err(BoothError::grab_skipped("camera returned an empty frame"));
        }
        frame.mirror_horizontal();
        self.filter.bake(&mut frame)?;
        encode_png(&frame)
    }
}

/// Drive `run` to completion, sleeping through each phase on `clock`.
#[tracing::instrument(skip_all, fields(shots = run.session.shots_requested, filter = %run.filter.name))]
pub fn run_capture(
    mut run: CaptureRun,
    source: &mut dyn FrameSource,
    clock: &mut dyn Clock,
    observer: &mut dyn SequenceObserver,
) -> CaptureSession {
    observer.phase_entered(run.phase(), run.shot);
    let mut wait = Some(run.current_wait());
    while let Some(d) = wait {
        if !d.is_zero() {
            clock.sleep(d);
        }
        wait = run.tick(source, observer);
    }
    let session = run.into_session();
    tracing::info!(
        frames = session.frames.len(),
        skipped = session.skipped_shots.len(),
        "capture run finished"
    );
    session
}

#[cfg(test)]
#[path = "../../tests/unit/capture/sequencer.rs"]
mod tests;
