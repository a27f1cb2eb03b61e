//! Camera input.
//!
//! A [`FrameSource`] is the one exclusively-owned device in the booth: the preview holds it
//! while idle, lends it to the sequencer for each grab and releases it once a run completes.

use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::assets::decode::ImageFrame;
use crate::foundation::core::{Canvas, RgbaFrame};
use crate::foundation::error::{BoothError, BoothResult};

/// Native stream properties reported when a source opens.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StreamInfo {
    /// Native frame size.
    pub canvas: Canvas,
    /// Human-readable device label.
    pub label: String,
}

/// A live camera stream.
pub trait FrameSource: Send {
    /// Acquire the device. Fails with [`BoothError::CameraUnavailable`] when access is denied or
    /// no device exists.
    fn open(&mut self) -> BoothResult<StreamInfo>;

    /// Read the current frame at native resolution, unmirrored and unfiltered.
    ///
    /// Fails with [`BoothError::FrameGrabSkipped`] when the stream has no frame ready.
    fn read_frame(&mut self) -> BoothResult<RgbaFrame>;

    /// Relinquish the device. Idempotent.
    fn release(&mut self);

    /// Return `true` between a successful `open` and `release`.
    fn is_open(&self) -> bool;
}

/// Serves one still image as if it were a camera.
pub struct StillImageSource {
    path: PathBuf,
    frame: Option<RgbaFrame>,
}

impl StillImageSource {
    /// Create a source reading `path` on open.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            frame: None,
        }
    }
}

impl FrameSource for StillImageSource {
    fn open(&mut self) -> BoothResult<StreamInfo> {
        let frame = ImageFrame::from_path(&self.path)
            .and_then(|f| f.decode())
            .map_err(|e| BoothError::camera(format!("{}: {e}", self.path.display())))?;
        let info = StreamInfo {
            canvas: frame.canvas(),
            label: self.path.display().to_string(),
        };
        self.frame = Some(frame);
        Ok(info)
    }

    fn read_frame(&mut self) -> BoothResult<RgbaFrame> {
        self.frame
            .clone()
            .ok_or_else(|| BoothError::grab_skipped("still image source is not open"))
    }

    fn release(&mut self) {
        self.frame = None;
    }

    fn is_open(&self) -> bool {
        self.frame.is_some()
    }
}

/// Deterministic test pattern: a diagonal color ramp with a bright marker in the top-left
/// quadrant, shifted a little on every read.
pub struct SyntheticSource {
    canvas: Canvas,
    open: bool,
    reads: u64,
    failing_reads: BTreeSet<u64>,
}

impl SyntheticSource {
    /// Create a synthetic camera of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            canvas: Canvas { width, height },
            open: false,
            reads: 0,
            failing_reads: BTreeSet::new(),
        }
    }

    /// Make the given 0-based read attempts report "not ready".
    pub fn with_failing_reads(mut self, reads: impl IntoIterator<Item = u64>) -> Self {
        self.failing_reads.extend(reads);
        self
    }

    /// Number of read attempts so far, failed ones included.
    pub fn reads(&self) -> u64 {
        self.reads
    }

    fn pattern(&self) -> RgbaFrame {
        let Canvas { width, height } = self.canvas;
        let shift = (self.reads % 32) as u32;
        let mut data = Vec::with_capacity(self.canvas.rgba_len());
        for y in 0..height {
            for x in 0..width {
                let marker = x < width / 4 && y < height / 4;
                if marker {
                    data.extend_from_slice(&[250, 250, 250, 255]);
                    continue;
                }
                let r = (((x + shift) % width) * 255 / width) as u8;
                let g = (y * 255 / height.max(1)) as u8;
                let b = (((x + y) * 255) / (width + height).max(1)) as u8;
                data.extend_from_slice(&[r, g, b, 255]);
            }
        }
        RgbaFrame {
            width,
            height,
            data,
        }
    }
}

impl FrameSource for SyntheticSource {
    fn open(&mut self) -> BoothResult<StreamInfo> {
        if self.canvas.width == 0 || self.canvas.height == 0 {
            return Err(BoothError::camera("synthetic source has zero size"));
        }
        self.open = true;
        Ok(StreamInfo {
            canvas: self.canvas,
            label: format!("synthetic {}x{}", self.canvas.width, self.canvas.height),
        })
    }

    fn read_frame(&mut self) -> BoothResult<RgbaFrame> {
        let attempt = self.reads;
        self.reads += 1;
        if !self.open {
            return Err(BoothError::grab_skipped("synthetic source is not open"));
        }
        if self.failing_reads.contains(&attempt) {
            return Err(BoothError::grab_skipped(format!(
                "synthetic read {attempt} not ready"
            )));
        }
        Ok(self.pattern())
    }

    fn release(&mut self) {
        self.open = false;
    }

    fn is_open(&self) -> bool {
        self.open
    }
}

/// A camera that always refuses access, as when permission is denied.
#[derive(Debug, Default)]
pub struct UnavailableSource {
    /// Reason reported from `open`.
    pub reason: String,
}

impl FrameSource for UnavailableSource {
    fn open(&mut self) -> BoothResult<StreamInfo> {
        let reason = if self.reason.is_empty() {
            "no camera device"
        } else {
            self.reason.as_str()
        };
        Err(BoothError::camera(reason))
    }

    fn read_frame(&mut self) -> BoothResult<RgbaFrame> {
        Err(BoothError::grab_skipped("no camera attached"))
    }

    fn release(&mut self) {}

    fn is_open(&self) -> bool {
        false
    }
}

/// Build a source from a CLI/config spec.
///
/// - `synthetic` or `synthetic:WxH`: test pattern (default 640x480)
/// - `none`: a camera that is never available
/// - `/dev/video*`: V4L2 device (requires the `camera-v4l2` feature)
/// - anything else: path to a still image
pub fn open_source_spec(spec: &str) -> BoothResult<Box<dyn FrameSource>> {
    if let Some(rest) = spec.strip_prefix("synthetic") {
        let (w, h) = match rest.strip_prefix(':') {
            None if rest.is_empty() => (640, 480),
            Some(dims) => parse_dims(dims)?,
            None => {
                return Err(BoothError::validation(format!(
                    "unrecognized source '{spec}'"
                )));
            }
        };
        return Ok(Box::new(SyntheticSource::new(w, h)));
    }
    if spec == "none" {
        return Ok(Box::new(UnavailableSource::default()));
    }
    if spec.starts_with("/dev/video") {
        return device_source(spec);
    }
    Ok(Box::new(StillImageSource::new(spec)))
}

#[cfg(feature = "camera-v4l2")]
fn device_source(spec: &str) -> BoothResult<Box<dyn FrameSource>> {
    let config = crate::camera::v4l2::V4l2Config {
        device: spec.to_string(),
        ..Default::default()
    };
    Ok(Box::new(crate::camera::v4l2::V4l2Source::new(config)))
}

#[cfg(not(feature = "camera-v4l2"))]
fn device_source(spec: &str) -> BoothResult<Box<dyn FrameSource>> {
    Ok(Box::new(UnavailableSource {
        reason: format!("{spec}: built without the camera-v4l2 feature"),
    }))
}

fn parse_dims(dims: &str) -> BoothResult<(u32, u32)> {
    let (w, h) = dims
        .split_once('x')
        .ok_or_else(|| BoothError::validation(format!("expected WxH, got '{dims}'")))?;
    let parse = |s: &str| -> BoothResult<u32> {
        s.trim()
            .parse::<u32>()
            .ok()
            .filter(|&v| v > 0)
            .ok_or_else(|| BoothError::validation(format!("invalid dimension '{s}'")))
    };
    Ok((parse(w)?, parse(h)?))
}

#[cfg(test)]
#[path = "../../tests/unit/camera/source.rs"]
mod tests;
