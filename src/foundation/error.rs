/// Convenience result type used across the booth.
pub type BoothResult<T> = Result<T, BoothError>;

/// Top-level error taxonomy used by booth APIs.
///
/// Camera, grab, image-load and font failures are recovered locally by the component that hits
/// them. Only the export-level variants are meant to reach the user, see
/// [`BoothError::user_message`].
#[derive(thiserror::Error, Debug)]
pub enum BoothError {
    /// A filter name that is not in the registry.
    #[error("unknown filter: {0}")]
    UnknownFilter(String),

    /// Camera permission denied or no device present.
    #[error("camera unavailable: {0}")]
    CameraUnavailable(String),

    /// The capture surface was not ready when a shot was due.
    #[error("frame grab skipped: {0}")]
    FrameGrabSkipped(String),

    /// One captured frame could not be decoded during composition.
    #[error("image load failed for frame {index}: {reason}")]
    ImageLoadFailed {
        /// Position of the frame in capture order.
        index: usize,
        /// Decoder message.
        reason: String,
    },

    /// The decorative title font could not be loaded.
    #[error("font load failed: {0}")]
    FontLoadFailed(String),

    /// The collage could not be rendered or encoded.
    #[error("composition error: {0}")]
    Composition(String),

    /// The output location refused access.
    #[error("security error: {0}")]
    Security(String),

    /// The print document could not be produced or handed off.
    #[error("print failed: {0}")]
    PrintFailed(String),

    /// The collage file could not be written.
    #[error("download failed: {0}")]
    DownloadFailed(String),

    /// A capture run is already counting down.
    #[error("a capture run is already in progress")]
    CaptureInProgress,

    /// An export is already in flight.
    #[error("an export is already in progress")]
    ExportInProgress,

    /// Invalid user-provided or configuration data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BoothError {
    /// Build a [`BoothError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`BoothError::Composition`] value.
    pub fn composition(msg: impl Into<String>) -> Self {
        Self::Composition(msg.into())
    }

    /// Build a [`BoothError::CameraUnavailable`] value.
    pub fn camera(msg: impl Into<String>) -> Self {
        Self::CameraUnavailable(msg.into())
    }

    /// Build a [`BoothError::FrameGrabSkipped`] value.
    pub fn grab_skipped(msg: impl Into<String>) -> Self {
        Self::FrameGrabSkipped(msg.into())
    }

    /// Message shown to the user in a blocking alert, if this error is user-visible.
    pub fn user_message(&self) -> Option<&'static str> {
        match self {
            Self::Security(_) => Some(
                "Download blocked by browser security. Please try again or check image sources.",
            ),
            Self::Composition(_) => {
                Some("Error creating collage. Please check your images and try again.")
            }
            Self::DownloadFailed(_) => Some("Download failed. Please try again."),
            Self::PrintFailed(_) => Some("Print failed. Please try again."),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
