//! Photobooth: a camera capture pipeline that turns a short countdown session into a printable
//! collage.
//!
//! # Pipeline overview
//!
//! 1. **Preview**: a [`FrameSource`] feeds a mirrored, filtered [`LivePreview`]
//! 2. **Capture**: a [`CaptureRun`] walks countdown, flash and grab once per shot and produces
//!    encoded [`ImageFrame`]s with the filter baked in
//! 3. **Compose**: a [`CollageComposer`] stacks the frames on a rounded, shadowed, dated card
//! 4. **Export**: the [`Exporter`] prints the collage as an HTML document or saves it as PNG
//!
//! [`PhotoBooth`] owns all of the above for one session.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

/// Encoded images and fonts.
pub mod assets;
/// The booth session controller.
pub mod booth;
/// Camera sources.
pub mod camera;
/// The timed capture sequence.
pub mod capture;
/// Collage layout and rendering.
pub mod collage;
/// Print and download outputs.
pub mod export;
/// Named visual filters.
pub mod filters;
/// Shared types, errors and configuration.
pub mod foundation;
/// Live camera preview.
pub mod preview;

pub use crate::assets::decode::{ImageFrame, decode_image, encode_png};
pub use crate::assets::fonts::{TitleFont, resolve_title_font};
pub use crate::booth::{Modal, PhotoBooth, UiState};
pub use crate::camera::source::{
    FrameSource, StillImageSource, StreamInfo, SyntheticSource, UnavailableSource,
    open_source_spec,
};
pub use crate::capture::clock::{Clock, ManualClock, SystemClock};
pub use crate::capture::phase::{Phase, PhaseTimings};
pub use crate::capture::sequencer::{
    CaptureRun, CaptureSession, NoopObserver, SequenceObserver, run_capture,
};
pub use crate::collage::compose::{Collage, CollageComposer, format_title_date};
pub use crate::collage::layout::CollageLayout;
pub use crate::export::Exporter;
pub use crate::export::print::{HtmlFileSpooler, InMemorySpooler, PrintJob, PrintSpooler};
pub use crate::filters::registry::{FilterDescriptor, FilterRegistry};
pub use crate::foundation::config::BoothConfig;
pub use crate::foundation::core::{Canvas, Rgba8, RgbaFrame};
pub use crate::foundation::error::{BoothError, BoothResult};
pub use crate::preview::renderer::{LivePreview, PreviewStatus};
