//! V4L2 camera source (`camera-v4l2` feature).
//!
//! Requests packed RGB24 at the configured size; devices that only offer MJPEG are decoded
//! through the image decoder instead.

use anyhow::Context;
use ouroboros::self_referencing;

use crate::assets::decode::decode_image;
use crate::camera::source::{FrameSource, StreamInfo};
use crate::foundation::core::{Canvas, RgbaFrame};
use crate::foundation::error::{BoothError, BoothResult};

/// Device settings.
#[derive(Clone, Debug)]
pub struct V4l2Config {
    /// Device node, e.g. `/dev/video0`.
    pub device: String,
    /// Preferred frame width.
    pub width: u32,
    /// Preferred frame height.
    pub height: u32,
    /// Preferred frame rate; 0 keeps the driver default.
    pub target_fps: u32,
    /// Number of mmap buffers.
    pub buffers: u32,
}

impl Default for V4l2Config {
    fn default() -> Self {
        Self {
            device: "/dev/video0".to_string(),
            width: 640,
            height: 480,
            target_fps: 30,
            buffers: 4,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum PixelLayout {
    Rgb24,
    Mjpeg,
}

#[self_referencing]
struct StreamState {
    device: v4l::Device,
    #[borrows(mut device)]
    #[covariant]
    stream: v4l::prelude::MmapStream<'this, v4l::Device>,
}

/// A V4L2 capture device.
pub struct V4l2Source {
    config: V4l2Config,
    state: Option<StreamState>,
    canvas: Canvas,
    layout: PixelLayout,
}

impl V4l2Source {
    /// Create an unopened source.
    pub fn new(config: V4l2Config) -> Self {
        Self {
            canvas: Canvas {
                width: config.width,
                height: config.height,
            },
            config,
            state: None,
            layout: PixelLayout::Rgb24,
        }
    }

    fn connect(&mut self) -> anyhow::Result<StreamInfo> {
        use v4l::buffer::Type;
        use v4l::video::Capture;

        let mut device = v4l::Device::with_path(&self.config.device)
            .with_context(|| format!("open v4l2 device {}", self.config.device))?;
        let mut format = device.format().context("read v4l2 format")?;
        format.width = self.config.width;
        format.height = self.config.height;
        format.fourcc = v4l::FourCC::new(b"RGB3");

        let format = match device.set_format(&format) {
            Ok(format) => format,
            Err(err) => {
                tracing::warn!(device = %self.config.device, %err, "set v4l2 format failed");
                device
                    .format()
                    .context("read v4l2 format after set failure")?
            }
        };
        self.layout = match &format.fourcc.repr {
            b"RGB3" => PixelLayout::Rgb24,
            b"MJPG" => PixelLayout::Mjpeg,
            other => anyhow::bail!(
                "unsupported v4l2 pixel format {}",
                String::from_utf8_lossy(other)
            ),
        };

        if self.config.target_fps > 0 {
            let params = v4l::video::capture::Parameters::with_fps(self.config.target_fps);
            if let Err(err) = device.set_params(&params) {
                tracing::warn!(device = %self.config.device, %err, "set v4l2 fps failed");
            }
        }

        self.canvas = Canvas {
            width: format.width,
            height: format.height,
        };
        let buffers = self.config.buffers.max(1);
        let state = StreamStateBuilder {
            device,
            stream_builder: |device| {
                v4l::prelude::MmapStream::with_buffers(device, Type::VideoCapture, buffers)
                    .map_err(|err| anyhow::Error::new(err).context("create v4l2 buffer stream"))
            },
        }
        .try_build()?;
        self.state = Some(state);

        Ok(StreamInfo {
            canvas: self.canvas,
            label: self.config.device.clone(),
        })
    }

    fn convert(&self, buf: &[u8]) -> BoothResult<RgbaFrame> {
        match self.layout {
            PixelLayout::Mjpeg => decode_image(buf),
            PixelLayout::Rgb24 => {
                let px = usize::try_from(u64::from(self.canvas.width) * u64::from(self.canvas.height))
                    .map_err(|_| BoothError::grab_skipped("frame too large"))?;
                if buf.len() < px * 3 {
                    return Err(BoothError::grab_skipped(format!(
                        "short v4l2 buffer: {} bytes for {}x{}",
                        buf.len(),
                        self.canvas.width,
                        self.canvas.height
                    )));
                }
                let mut data = Vec::with_capacity(px * 4);
                for rgb in buf[..px * 3].chunks_exact(3) {
                    data.extend_from_slice(&[rgb[0], rgb[1], rgb[2], 255]);
                }
                RgbaFrame::new(self.canvas.width, self.canvas.height, data)
            }
        }
    }
}

impl FrameSource for V4l2Source {
    fn open(&mut self) -> BoothResult<StreamInfo> {
        let info = self
            .connect()
            .map_err(|e| BoothError::camera(format!("{e:#}")))?;
        tracing::info!(device = %self.config.device, width = info.canvas.width, height = info.canvas.height, layout = ?self.layout, "v4l2 stream open");
        Ok(info)
    }

    fn read_frame(&mut self) -> BoothResult<RgbaFrame> {
        use v4l::io::traits::CaptureStream;

        let state = self
            .state
            .as_mut()
            .ok_or_else(|| BoothError::grab_skipped("v4l2 device not open"))?;
        let buf = state
            .with_mut(|fields| fields.stream.next().map(|(buf, _meta)| buf.to_vec()))
            .map_err(|err| BoothError::grab_skipped(format!("capture v4l2 frame: {err}")))?;
        self.convert(&buf)
    }

    fn release(&mut self) {
        if self.state.take().is_some() {
            tracing::debug!(device = %self.config.device, "v4l2 stream closed");
        }
    }

    fn is_open(&self) -> bool {
        self.state.is_some()
    }
}
