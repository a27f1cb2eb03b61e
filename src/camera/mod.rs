//! Camera sources.

/// The camera trait and built-in sources.
pub mod source;
/// V4L2 devices.
#[cfg(feature = "camera-v4l2")]
pub mod v4l2;
