//! Print and download outputs.
//!
//! Each call composes a fresh collage from the captured frames; nothing is cached between
//! exports.

/// Saving collages to disk.
pub mod download;
/// Print documents and spoolers.
pub mod print;

use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::assets::decode::ImageFrame;
use crate::assets::fonts::resolve_title_font;
use crate::collage::compose::{Collage, CollageComposer};
use crate::collage::layout::CollageLayout;
use crate::foundation::error::{BoothError, BoothResult};

use self::download::{BusyFlag, save_collage};
use self::print::{PrintJob, PrintSpooler, print_document_html};

/// Turns captured frames into a printed document or a saved PNG.
pub struct Exporter {
    composer: CollageComposer,
    output_dir: PathBuf,
    title_font: Option<PathBuf>,
    spooler: Box<dyn PrintSpooler>,
    downloading: BusyFlag,
}

impl Exporter {
    /// Create an exporter. The title font is resolved lazily on the first export.
    pub fn new(
        layout: CollageLayout,
        output_dir: impl Into<PathBuf>,
        title_font: Option<PathBuf>,
        spooler: Box<dyn PrintSpooler>,
    ) -> BoothResult<Self> {
        Ok(Self {
            composer: CollageComposer::new(layout, None)?,
            output_dir: output_dir.into(),
            title_font,
            spooler,
            downloading: BusyFlag::new(),
        })
    }

    /// Directory receiving downloads.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Flag that is set while a download runs.
    pub fn busy_flag(&self) -> &BusyFlag {
        &self.downloading
    }

    /// `true` while a download runs.
    pub fn is_downloading(&self) -> bool {
        self.downloading.is_set()
    }

    /// Compose a collage titled with `date`.
    pub fn compose(&mut self, frames: &[ImageFrame], date: NaiveDate) -> BoothResult<Collage> {
        self.ensure_font();
        self.composer.compose(frames, date)
    }

    /// Compose and spool a print document for today.
    pub fn print(&mut self, frames: &[ImageFrame]) -> BoothResult<PrintJob> {
        self.print_on(frames, chrono::Local::now().date_naive())
    }

    /// Compose and spool a print document titled with `date`.
    #[tracing::instrument(skip(self, frames), fields(frames = frames.len()))]
    pub fn print_on(&mut self, frames: &[ImageFrame], date: NaiveDate) -> BoothResult<PrintJob> {
        let collage = self
            .compose(frames, date)
            .map_err(|e| BoothError::PrintFailed(e.to_string()))?;
        let html = print_document_html(&collage);
        self.spooler.spool(&html).map_err(|e| match e {
            BoothError::PrintFailed(_) => e,
            other => BoothError::PrintFailed(other.to_string()),
        })
    }

    /// Compose and save today's collage. The title uses the local date and the file name the
    /// UTC date.
    pub fn download(&mut self, frames: &[ImageFrame]) -> BoothResult<PathBuf> {
        self.download_on(
            frames,
            chrono::Local::now().date_naive(),
            chrono::Utc::now().date_naive(),
        )
    }

    /// Compose and save a collage titled `title_date` as `memories-<file_date>.png`.
    ///
    /// Only one download runs at a time; the busy flag is cleared on every exit path.
    #[tracing::instrument(skip(self, frames), fields(frames = frames.len()))]
    pub fn download_on(
        &mut self,
        frames: &[ImageFrame],
        title_date: NaiveDate,
        file_date: NaiveDate,
    ) -> BoothResult<PathBuf> {
        let _busy = self.downloading.acquire()?;
        let collage = self.compose(frames, title_date).map_err(|e| match e {
            BoothError::Composition(_) => e,
            other => BoothError::composition(other.to_string()),
        })?;
        save_collage(&self.output_dir, &collage, file_date)
    }

    fn ensure_font(&mut self) {
        if self.composer.has_title_font() {
            return;
        }
        self.composer
            .set_font(resolve_title_font(self.title_font.as_deref()));
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/mod.rs"]
mod tests;
