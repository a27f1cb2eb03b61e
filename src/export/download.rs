use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::NaiveDate;

use crate::collage::compose::Collage;
use crate::foundation::error::{BoothError, BoothResult};

/// `memories-YYYY-MM-DD.png`.
pub fn download_filename(date: NaiveDate) -> String {
    format!("memories-{}.png", date.format("%Y-%m-%d"))
}

/// Shared "download in progress" flag.
#[derive(Clone, Debug, Default)]
pub struct BusyFlag(Arc<AtomicBool>);

impl BusyFlag {
    /// Create a cleared flag.
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` while a download holds the flag.
    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Set the flag for the lifetime of the returned guard.
    ///
    /// Fails with [`BoothError::ExportInProgress`] if it is already set.
    pub fn acquire(&self) -> BoothResult<BusyGuard> {
        self.0
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| BoothError::ExportInProgress)?;
        Ok(BusyGuard(Arc::clone(&self.0)))
    }
}

/// Clears its [`BusyFlag`] on drop.
#[derive(Debug)]
pub struct BusyGuard(Arc<AtomicBool>);

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Write the collage PNG into `dir` under [`download_filename`].
pub fn save_collage(dir: &Path, collage: &Collage, date: NaiveDate) -> BoothResult<PathBuf> {
    std::fs::create_dir_all(dir).map_err(|e| io_error(dir, &e))?;
    let path = dir.join(download_filename(date));
    std::fs::write(&path, collage.image.bytes()).map_err(|e| io_error(&path, &e))?;
    tracing::info!(path = %path.display(), bytes = collage.image.bytes().len(), "collage saved");
    Ok(path)
}

fn io_error(path: &Path, e: &std::io::Error) -> BoothError {
    let msg = format!("'{}': {e}", path.display());
    match e.kind() {
        ErrorKind::PermissionDenied | ErrorKind::ReadOnlyFilesystem => BoothError::Security(msg),
        _ => BoothError::DownloadFailed(msg),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/download.rs"]
mod tests;
