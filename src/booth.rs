//! The booth session: one owner for the camera, selections, the capture run and exports.

use std::path::PathBuf;
use std::time::Duration;

use crate::assets::decode::ImageFrame;
use crate::camera::source::{FrameSource, UnavailableSource};
use crate::capture::clock::Clock;
use crate::capture::phase::Phase;
use crate::capture::sequencer::{CaptureRun, CaptureSession, SequenceObserver};
use crate::export::Exporter;
use crate::export::print::{PrintJob, PrintSpooler};
use crate::filters::registry::{FilterDescriptor, FilterRegistry};
use crate::foundation::config::{BoothConfig, validate_shot_count};
use crate::foundation::core::RgbaFrame;
use crate::foundation::error::{BoothError, BoothResult};
use crate::preview::renderer::LivePreview;

/// The single blocking overlay shown over the booth.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Modal {
    /// Nothing shown.
    Idle,
    /// A countdown label.
    Countdown(&'static str),
    /// The white flash.
    Flash,
}

/// Snapshot of what the UI should display.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UiState {
    /// Active overlay.
    pub modal: Modal,
    /// Download control is disabled while this is set.
    pub is_downloading: bool,
    /// Captured frames are on display.
    pub show_gallery: bool,
}

/// A photo booth session.
pub struct PhotoBooth {
    config: BoothConfig,
    registry: FilterRegistry,
    filter: FilterDescriptor,
    shots: u8,
    preview: LivePreview,
    run: Option<CaptureRun>,
    session: Option<CaptureSession>,
    exporter: Exporter,
}

impl PhotoBooth {
    /// Build a booth from a validated config, attach `camera` to the preview and select the
    /// configured filter.
    pub fn new(
        config: BoothConfig,
        camera: Box<dyn FrameSource>,
        spooler: Box<dyn PrintSpooler>,
    ) -> BoothResult<Self> {
        config.validate()?;
        let registry = FilterRegistry::builtin()?;
        let filter = registry.resolve(&config.filter)?.clone();
        let mut preview = LivePreview::new(config.preview);
        preview.attach_stream(camera);
        preview.apply_filter(&filter);
        let exporter = Exporter::new(
            config.collage.clone(),
            config.output_dir.clone(),
            config.title_font.clone(),
            spooler,
        )?;
        Ok(Self {
            shots: config.shots,
            config,
            registry,
            filter,
            preview,
            run: None,
            session: None,
            exporter,
        })
    }

    /// Config the booth was built with.
    pub fn config(&self) -> &BoothConfig {
        &self.config
    }

    /// Registered filters.
    pub fn filters(&self) -> &FilterRegistry {
        &self.registry
    }

    /// Selected filter.
    pub fn selected_filter(&self) -> &FilterDescriptor {
        &self.filter
    }

    /// Shots the next run will take.
    pub fn shot_count(&self) -> u8 {
        self.shots
    }

    /// The live preview.
    pub fn preview(&self) -> &LivePreview {
        &self.preview
    }

    /// Select a filter by name. A run in progress keeps the filter it started with.
    pub fn select_filter(&mut self, name: &str) -> BoothResult<()> {
        let descriptor = self.registry.resolve(name)?.clone();
        self.preview.apply_filter(&descriptor);
        tracing::debug!(filter = %descriptor.name, "filter selected");
        self.filter = descriptor;
        Ok(())
    }

    /// Choose how many shots the next run takes.
    pub fn set_shot_count(&mut self, shots: u8) -> BoothResult<()> {
        validate_shot_count(shots)?;
        self.shots = shots;
        Ok(())
    }

    /// Render one preview frame.
    pub fn render_preview(&mut self) -> BoothResult<RgbaFrame> {
        self.preview.render_frame()
    }

    /// `true` while a capture run is in progress.
    pub fn is_capturing(&self) -> bool {
        self.run.is_some()
    }

    /// Begin a capture run and return the wait before the first [`PhotoBooth::tick`].
    ///
    /// Starting from the gallery drops the previous frames and turns the camera back on.
    /// Rejected with [`BoothError::CaptureInProgress`] while a run is active.
    pub fn start_capture(&mut self) -> BoothResult<Duration> {
        if self.run.is_some() {
            return Err(BoothError::CaptureInProgress);
        }
        let run = CaptureRun::new(
            self.shots,
            self.filter.clone(),
            self.config.timings,
            self.config.grab_retries,
        )?;
        self.session = None;
        self.preview.reopen_stream();
        let wait = run.current_wait();
        tracing::info!(shots = self.shots, filter = %self.filter.name, "capture started");
        self.run = Some(run);
        Ok(wait)
    }

    /// Advance the active run by one phase.
    ///
    /// Returns the wait before the next tick, or `None` once the run has finished; the frames
    /// then move to the gallery and the camera is released.
    pub fn tick(&mut self, observer: &mut dyn SequenceObserver) -> BoothResult<Option<Duration>> {
        let Some(run) = self.run.as_mut() else {
            return Err(BoothError::validation("no capture run in progress"));
        };
        let mut no_camera = UnavailableSource::default();
        let source: &mut dyn FrameSource = match self.preview.source_mut() {
            Some(source) => source,
            None => &mut no_camera,
        };
        let wait = run.tick(source, observer);
        if wait.is_none() {
            self.finish_run();
        }
        Ok(wait)
    }

    /// Start a run and drive it to completion on `clock`.
    pub fn run_capture(
        &mut self,
        clock: &mut dyn Clock,
        observer: &mut dyn SequenceObserver,
    ) -> BoothResult<&CaptureSession> {
        let first = self.start_capture()?;
        observer.phase_entered(Phase::Ready, 0);
        let mut wait = Some(first);
        while let Some(d) = wait {
            if !d.is_zero() {
                clock.sleep(d);
            }
            wait = self.tick(observer)?;
        }
        self.session
            .as_ref()
            .ok_or_else(|| BoothError::validation("capture run ended without a session"))
    }

    fn finish_run(&mut self) {
        let Some(run) = self.run.take() else {
            return;
        };
        let session = run.into_session();
        tracing::info!(
            frames = session.frames().len(),
            skipped = session.skipped_shots().len(),
            "capture finished"
        );
        self.session = Some(session);
        self.preview.release_stream();
    }

    /// Last finished session, if any.
    pub fn session(&self) -> Option<&CaptureSession> {
        self.session.as_ref()
    }

    /// Frames of the last finished session.
    pub fn frames(&self) -> &[ImageFrame] {
        self.session
            .as_ref()
            .map(CaptureSession::frames)
            .unwrap_or_default()
    }

    /// What the UI should show right now.
    pub fn ui_state(&self) -> UiState {
        let modal = match self.run.as_ref().map(CaptureRun::phase) {
            Some(Phase::Flash) => Modal::Flash,
            Some(phase) => phase
                .countdown_label()
                .map_or(Modal::Idle, Modal::Countdown),
            None => Modal::Idle,
        };
        UiState {
            modal,
            is_downloading: self.exporter.is_downloading(),
            show_gallery: self.session.is_some(),
        }
    }

    /// Leave the gallery: drop the frames and any run, and turn the camera back on.
    pub fn back(&mut self) {
        self.run = None;
        self.session = None;
        self.preview.reopen_stream();
        tracing::debug!("back to live preview");
    }

    /// Print a collage of the captured frames.
    pub fn print(&mut self) -> BoothResult<PrintJob> {
        let frames = self.frames().to_vec();
        self.exporter.print(&frames)
    }

    /// Save a collage of the captured frames into the output directory.
    pub fn download(&mut self) -> BoothResult<PathBuf> {
        let frames = self.frames().to_vec();
        self.exporter.download(&frames)
    }

    /// The export adapter, for dated or composed-only exports.
    pub fn exporter_mut(&mut self) -> &mut Exporter {
        &mut self.exporter
    }
}

#[cfg(test)]
#[path = "../tests/unit/booth.rs"]
mod tests;
