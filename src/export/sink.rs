//! Destinations for exported files.

use std::path::PathBuf;

use crate::error::Result;

/// What to save and how to present the choice to the user.
#[derive(Debug, Clone, Copy)]
pub struct SaveRequest<'a> {
    pub file_name: &'a str,
    pub title: &'a str,
    pub filter_name: &'a str,
    pub extensions: &'a [&'a str],
}

impl<'a> SaveRequest<'a> {
    pub fn csv(file_name: &'a str) -> Self {
        Self {
            file_name,
            title: "Select file to save VOI timeseries in",
            filter_name: "CSV Files",
            extensions: &["csv"],
        }
    }

    pub fn png(file_name: &'a str) -> Self {
        Self {
            file_name,
            title: "Select file to save snapshot in",
            filter_name: "PNG Files",
            extensions: &["png"],
        }
    }
}

/// Write exported content somewhere the user chose.
///
/// `Ok(None)` means the user cancelled; it is not an error.
pub trait FileSink {
    fn write_binary(&mut self, request: &SaveRequest<'_>, bytes: &[u8]) -> Result<Option<PathBuf>>;

    fn write_text(&mut self, request: &SaveRequest<'_>, text: &str) -> Result<Option<PathBuf>> {
        self.write_binary(request, text.as_bytes())
    }
}

/// Asks for a destination with the native save dialog.
#[derive(Debug, Default)]
pub struct DialogSink;

impl FileSink for DialogSink {
    fn write_binary(&mut self, request: &SaveRequest<'_>, bytes: &[u8]) -> Result<Option<PathBuf>> {
        let Some(path) = rfd::FileDialog::new()
            .set_title(request.title)
            .set_file_name(request.file_name)
            .add_filter(request.filter_name, request.extensions)
            .save_file()
        else {
            return Ok(None);
        };
        std::fs::write(&path, bytes)?;
        tracing::info!("Saved {} bytes to {:?}", bytes.len(), path);
        Ok(Some(path))
    }
}

/// Writes every file under the requested name into one directory.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl FileSink for DirectorySink {
    fn write_binary(&mut self, request: &SaveRequest<'_>, bytes: &[u8]) -> Result<Option<PathBuf>> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(request.file_name);
        std::fs::write(&path, bytes)?;
        tracing::info!("Saved {} bytes to {:?}", bytes.len(), path);
        Ok(Some(path))
    }
}
