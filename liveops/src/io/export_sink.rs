//! Destinations for export files.
//!
//! The [`ExportSink`] trait stands in for the host's save-to-disk action.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{info, instrument};

use crate::core::export::ExportKind;
use crate::document::Document;

pub trait ExportSink {
    /// Save `contents` under `filename`, returning where it landed.
    fn save(&self, filename: &str, contents: &str) -> Result<PathBuf>;
}

/// Sink writing into a directory, overwriting files of the same name.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ExportSink for DirectorySink {
    fn save(&self, filename: &str, contents: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("create export directory {}", self.dir.display()))?;
        let path = self.dir.join(filename);
        fs::write(&path, contents).with_context(|| format!("write export {}", path.display()))?;
        Ok(path)
    }
}

/// Render `kind` from `doc` and hand it to `sink`.
#[instrument(skip_all, fields(file = kind.filename()))]
pub fn export<S: ExportSink>(doc: &Document, kind: ExportKind, sink: &S) -> Result<PathBuf> {
    let contents = kind.render(doc)?;
    let path = sink.save(kind.filename(), &contents)?;
    info!(path = %path.display(), bytes = contents.len(), "export saved");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::export::PLATFORMS_FILENAME;
    use crate::document::default_document;

    #[test]
    fn directory_sink_writes_fixed_filenames() {
        let temp = tempfile::tempdir().expect("tempdir");
        let sink = DirectorySink::new(temp.path().join("out"));
        let path = export(&default_document(), ExportKind::Platforms, &sink).expect("export");
        assert_eq!(path, temp.path().join("out").join(PLATFORMS_FILENAME));
        let contents = fs::read_to_string(path).expect("read");
        assert!(contents.starts_with("\"episodeNumber\""));
    }
}
