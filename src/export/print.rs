use std::path::{Path, PathBuf};

use crate::collage::compose::Collage;
use crate::foundation::error::{BoothError, BoothResult};

/// File name the default spooler writes.
pub const PRINT_DOCUMENT_NAME: &str = "print-memories.html";

/// Build the print document: a page holding only the collage, printing itself once the image
/// loads and closing afterwards.
pub fn print_document_html(collage: &Collage) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
  <head>
    <meta charset="utf-8">
    <title>Print Memories</title>
    <style>
      body {{ margin: 0; display: flex; justify-content: center; align-items: center; height: 100vh; }}
      img {{ max-width: 100%; max-height: 100%; }}
    </style>
  </head>
  <body>
    <img alt="{title}" src="{src}" onload="window.print(); window.onafterprint = function(){{ window.close(); }}"/>
  </body>
</html>
"#,
        title = collage.title,
        src = collage.image.to_data_url(),
    )
}

/// Where a spooled document ended up.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrintJob {
    /// File written, if the spooler writes one.
    pub location: Option<PathBuf>,
}

/// Destination for print documents.
pub trait PrintSpooler: Send {
    /// Hand off one HTML document.
    fn spool(&mut self, html: &str) -> BoothResult<PrintJob>;
}

/// Writes the document into a directory and optionally opens it with the platform opener.
#[derive(Clone, Debug)]
pub struct HtmlFileSpooler {
    dir: PathBuf,
    open_after_write: bool,
}

impl HtmlFileSpooler {
    /// Spool into `dir`.
    pub fn new(dir: impl Into<PathBuf>, open_after_write: bool) -> Self {
        Self {
            dir: dir.into(),
            open_after_write,
        }
    }

    /// Target directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl PrintSpooler for HtmlFileSpooler {
    fn spool(&mut self, html: &str) -> BoothResult<PrintJob> {
        std::fs::create_dir_all(&self.dir).map_err(|e| {
            BoothError::PrintFailed(format!("create '{}': {e}", self.dir.display()))
        })?;
        let path = self.dir.join(PRINT_DOCUMENT_NAME);
        std::fs::write(&path, html)
            .map_err(|e| BoothError::PrintFailed(format!("write '{}': {e}", path.display())))?;
        if self.open_after_write {
            open::that(&path)
                .map_err(|e| BoothError::PrintFailed(format!("open '{}': {e}", path.display())))?;
        }
        tracing::info!(path = %path.display(), "print document written");
        Ok(PrintJob {
            location: Some(path),
        })
    }
}

/// Keeps spooled documents in memory.
#[derive(Debug, Default)]
pub struct InMemorySpooler {
    documents: Vec<String>,
}

impl InMemorySpooler {
    /// Create an empty spooler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Documents spooled so far.
    pub fn documents(&self) -> &[String] {
        &self.documents
    }
}

impl PrintSpooler for InMemorySpooler {
    fn spool(&mut self, html: &str) -> BoothResult<PrintJob> {
        self.documents.push(html.to_string());
        Ok(PrintJob { location: None })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/print.rs"]
mod tests;
