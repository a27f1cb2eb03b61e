use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::capture::phase::PhaseTimings;
use crate::collage::layout::CollageLayout;
use crate::filters::registry::FilterRegistry;
use crate::foundation::core::Rgba8;
use crate::foundation::error::{BoothError, BoothResult};

/// Shot counts the booth accepts for one capture run.
pub const SHOT_COUNTS: [u8; 3] = [2, 3, 4];

/// Environment variable overriding [`BoothConfig::output_dir`].
pub const ENV_OUTPUT_DIR: &str = "PHOTOBOOTH_OUTPUT_DIR";
/// Environment variable overriding [`BoothConfig::title_font`].
pub const ENV_TITLE_FONT: &str = "PHOTOBOOTH_TITLE_FONT";

/// Booth-wide settings, read from JSON. Every field has a default.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BoothConfig {
    /// Shots per capture run, one of [`SHOT_COUNTS`].
    pub shots: u8,
    /// Filter selected at startup.
    pub filter: String,
    /// Countdown and flash durations.
    pub timings: PhaseTimings,
    /// Collage card geometry and colors.
    pub collage: CollageLayout,
    /// Placeholder preview settings used while no camera is attached.
    pub preview: PreviewConfig,
    /// How many extra attempts a failed grab gets before the shot is skipped.
    pub grab_retries: u8,
    /// Directory receiving downloaded collages and print documents.
    pub output_dir: PathBuf,
    /// Decorative title font file (TTF/OTF).
    pub title_font: Option<PathBuf>,
    /// Open the print document with the platform opener once written.
    pub open_print_document: bool,
}

impl Default for BoothConfig {
    fn default() -> Self {
        Self {
            shots: 2,
            filter: "None".to_string(),
            timings: PhaseTimings::default(),
            collage: CollageLayout::default(),
            preview: PreviewConfig::default(),
            grab_retries: 1,
            output_dir: PathBuf::from("."),
            title_font: None,
            open_print_document: false,
        }
    }
}

/// Placeholder preview surface shown when the camera is unavailable.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    /// Placeholder width in pixels.
    pub width: u32,
    /// Placeholder height in pixels.
    pub height: u32,
    /// Placeholder fill.
    pub placeholder: Rgba8,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            placeholder: Rgba8::opaque(0x1f, 0x1f, 0x1f),
        }
    }
}

impl BoothConfig {
    /// Parse a config from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> BoothResult<Self> {
        let cfg: Self = serde_json::from_reader(r)
            .map_err(|e| BoothError::validation(format!("parse booth config JSON: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse a config from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> BoothResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            BoothError::validation(format!("open booth config '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Apply `PHOTOBOOTH_*` environment overrides.
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(dir) = std::env::var_os(ENV_OUTPUT_DIR).filter(|v| !v.is_empty()) {
            self.output_dir = PathBuf::from(dir);
        }
        if let Some(font) = std::env::var_os(ENV_TITLE_FONT).filter(|v| !v.is_empty()) {
            self.title_font = Some(PathBuf::from(font));
        }
        self
    }

    /// Check cross-field constraints.
    pub fn validate(&self) -> BoothResult<()> {
        validate_shot_count(self.shots)?;
        FilterRegistry::builtin()?.resolve(&self.filter)?;
        if self.preview.width == 0 || self.preview.height == 0 {
            return Err(BoothError::validation("preview size must be non-zero"));
        }
        self.collage.validate()
    }
}

/// Reject shot counts outside [`SHOT_COUNTS`].
pub fn validate_shot_count(shots: u8) -> BoothResult<()> {
    if SHOT_COUNTS.contains(&shots) {
        Ok(())
    } else {
        Err(BoothError::validation(format!(
            "shot count must be one of {SHOT_COUNTS:?}, got {shots}"
        )))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/config.rs"]
mod tests;
