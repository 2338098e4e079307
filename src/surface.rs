//! Host surfaces: where a finished PNG goes.
//!
//! Both surfaces are trait seams so the orchestrator can be exercised
//! end-to-end with in-memory fakes. The production implementations are a
//! directory writer with atomic rename semantics and the system clipboard
//! via `arboard`.

use crate::error::ExportError;
use std::io::Write;
use std::path::PathBuf;

/// Saves an exported image under a caller-visible name.
pub trait DownloadSurface: Send + Sync {
    /// Persist `png` as `filename`; returns the final path.
    fn save(&self, filename: &str, png: &[u8]) -> Result<PathBuf, ExportError>;
}

/// [`DownloadSurface`] writing into a fixed directory.
///
/// Writes go to a temp file first and are renamed into place, so a crashed
/// export never leaves a half-written PNG behind.
pub struct DirectoryDownloads {
    dir: PathBuf,
}

impl DirectoryDownloads {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl DownloadSurface for DirectoryDownloads {
    fn save(&self, filename: &str, png: &[u8]) -> Result<PathBuf, ExportError> {
        let path = self.dir.join(filename);
        let write_failed = |source: std::io::Error| ExportError::OutputWriteFailed {
            path: path.clone(),
            source,
        };

        std::fs::create_dir_all(&self.dir).map_err(write_failed)?;
        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir).map_err(write_failed)?;
        tmp.write_all(png).map_err(write_failed)?;
        tmp.persist(&path)
            .map_err(|e| write_failed(e.error))?;
        Ok(path)
    }
}

/// Writes an exported image to the system clipboard.
pub trait ClipboardSurface: Send + Sync {
    /// Put `png` on the clipboard as an image entry.
    fn write_image(&self, png: &[u8]) -> Result<(), ExportError>;
}

/// [`ClipboardSurface`] over the OS clipboard.
pub struct SystemClipboard;

impl ClipboardSurface for SystemClipboard {
    fn write_image(&self, png: &[u8]) -> Result<(), ExportError> {
        let decoded = image::load_from_memory(png)
            .map_err(|e| ExportError::ClipboardWriteFailed {
                detail: format!("could not decode exported image: {e}"),
            })?
            .to_rgba8();
        let (width, height) = decoded.dimensions();

        let mut clipboard =
            arboard::Clipboard::new().map_err(|e| ExportError::ClipboardDenied {
                detail: e.to_string(),
            })?;
        clipboard
            .set_image(arboard::ImageData {
                width: width as usize,
                height: height as usize,
                bytes: decoded.into_raw().into(),
            })
            .map_err(|e| match e {
                arboard::Error::ClipboardOccupied => ExportError::ClipboardDenied {
                    detail: e.to_string(),
                },
                other => ExportError::ClipboardWriteFailed {
                    detail: other.to_string(),
                },
            })
    }
}
