//! Live, mirrored, filtered camera preview.

use crate::camera::source::{FrameSource, StreamInfo};
use crate::filters::registry::FilterDescriptor;
use crate::filters::vignette::Vignette;
use crate::foundation::config::PreviewConfig;
use crate::foundation::core::RgbaFrame;
use crate::foundation::error::BoothResult;

/// What the preview surface is showing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PreviewStatus {
    /// A camera is attached and streaming.
    Live(StreamInfo),
    /// No camera; a neutral blank surface is shown instead.
    Placeholder,
}

/// Owns the camera while the booth is idle and renders preview frames from it.
pub struct LivePreview {
    config: PreviewConfig,
    source: Option<Box<dyn FrameSource>>,
    status: PreviewStatus,
    filter: Option<FilterDescriptor>,
    overlay: Option<Vignette>,
}

impl LivePreview {
    /// A preview with no camera attached.
    pub fn new(config: PreviewConfig) -> Self {
        Self {
            config,
            source: None,
            status: PreviewStatus::Placeholder,
            filter: None,
            overlay: None,
        }
    }

    /// Take ownership of `source` and open it.
    ///
    /// An unavailable camera is logged and leaves the preview on its placeholder; it is never an
    /// error for the caller. The source is kept either way so [`LivePreview::reopen_stream`] can
    /// retry it.
    pub fn attach_stream(&mut self, source: Box<dyn FrameSource>) -> &PreviewStatus {
        self.release_stream();
        self.source = Some(source);
        self.reopen_stream()
    }

    /// Open the held camera again, e.g. when returning from the gallery.
    pub fn reopen_stream(&mut self) -> &PreviewStatus {
        let Some(source) = self.source.as_deref_mut() else {
            self.status = PreviewStatus::Placeholder;
            return &self.status;
        };
        if source.is_open() {
            return &self.status;
        }
        self.status = match source.open() {
            Ok(info) => {
                tracing::info!(
                    label = %info.label,
                    width = info.canvas.width,
                    height = info.canvas.height,
                    "camera attached"
                );
                PreviewStatus::Live(info)
            }
            Err(err) => {
                tracing::warn!(%err, "camera unavailable, showing placeholder");
                PreviewStatus::Placeholder
            }
        };
        &self.status
    }

    /// Relinquish the camera device. The source object is kept for a later reopen. Idempotent.
    pub fn release_stream(&mut self) {
        if let Some(source) = self.source.as_deref_mut()
            && source.is_open()
        {
            source.release();
            tracing::debug!("camera released");
        }
        self.status = PreviewStatus::Placeholder;
    }

    /// Select the filter applied to preview frames.
    ///
    /// The vignette overlay is present exactly when the selected filter is the overlay filter.
    pub fn apply_filter(&mut self, descriptor: &FilterDescriptor) {
        self.overlay = descriptor
            .is_special_overlay
            .then(Vignette::preview_overlay);
        self.filter = Some(descriptor.clone());
    }

    /// Current status.
    pub fn status(&self) -> &PreviewStatus {
        &self.status
    }

    /// `true` while a camera is attached.
    pub fn is_live(&self) -> bool {
        matches!(self.status, PreviewStatus::Live(_))
    }

    /// Selected filter, if any.
    pub fn filter(&self) -> Option<&FilterDescriptor> {
        self.filter.as_ref()
    }

    /// Overlay drawn over the preview.
    pub fn overlay(&self) -> Option<&Vignette> {
        self.overlay.as_ref()
    }

    /// Borrow the held camera, e.g. to grab a still.
    pub fn source_mut(&mut self) -> Option<&mut (dyn FrameSource + 'static)> {
        self.source.as_deref_mut()
    }

    /// Render one preview frame.
    ///
    /// Live frames are mirrored, filtered, and overlaid. A missing or stalled camera yields the
    /// placeholder surface.
    pub fn render_frame(&mut self) -> BoothResult<RgbaFrame> {
        let live = self.is_live();
        let frame = match self.source.as_deref_mut() {
            Some(source) if live => match source.read_frame() {
                Ok(frame) if !frame.is_empty() => Some(frame),
                Ok(_) => None,
                Err(err) => {
                    tracing::debug!(%err, "preview frame not ready");
                    None
                }
            },
            _ => None,
        };
        let Some(mut frame) = frame else {
            return Ok(self.placeholder());
        };

        frame.mirror_horizontal();
        if let Some(filter) = &self.filter {
            filter.apply_expression(&mut frame)?;
        }
        if let Some(overlay) = &self.overlay {
            overlay.apply(&mut frame);
        }
        Ok(frame)
    }

    fn placeholder(&self) -> RgbaFrame {
        RgbaFrame::filled(
            self.config.width,
            self.config.height,
            self.config.placeholder,
        )
    }
}

impl Drop for LivePreview {
    fn drop(&mut self) {
        self.release_stream();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/preview/renderer.rs"]
mod tests;
