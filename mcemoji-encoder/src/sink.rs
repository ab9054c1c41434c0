//! Destinations for packaged files
//!
//! Building an actual container (zip, upload bundle, ...) is left to
//! whatever implements [`ArchiveSink`]; the exporter only names each file
//! and hands over its bytes.

use crate::export::ExportEntry;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Receives the packaged files of one export
pub trait ArchiveSink {
    /// What the archive produces once complete
    type Output;

    /// Adds one named file
    fn add_entry(&mut self, filename: &str, bytes: &[u8]) -> io::Result<()>;

    /// Completes the archive
    fn finish(self) -> io::Result<Self::Output>;
}

/// Collects files in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    entries: Vec<ExportEntry>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ArchiveSink for MemorySink {
    type Output = Vec<ExportEntry>;

    fn add_entry(&mut self, filename: &str, bytes: &[u8]) -> io::Result<()> {
        self.entries.push(ExportEntry {
            filename: filename.to_string(),
            bytes: bytes.to_vec(),
        });
        Ok(())
    }

    fn finish(self) -> io::Result<Vec<ExportEntry>> {
        Ok(self.entries)
    }
}

/// Writes each file into a directory
///
/// Entries are staged in memory and only written by [`ArchiveSink::finish`],
/// so an export that fails part way leaves the directory as it found it.
#[derive(Debug)]
pub struct DirectorySink {
    root: PathBuf,
    staged: Vec<ExportEntry>,
}

impl DirectorySink {
    /// Creates the directory if needed
    pub fn create(root: impl AsRef<Path>) -> io::Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        Ok(Self {
            root,
            staged: Vec::new(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn write_all(&self, written: &mut Vec<PathBuf>) -> io::Result<()> {
        for entry in &self.staged {
            let path = self.root.join(&entry.filename);
            fs::write(&path, &entry.bytes)?;
            debug!(path = %path.display(), size = entry.bytes.len(), "wrote entry");
            written.push(path);
        }
        Ok(())
    }
}

fn check_entry_name(filename: &str) -> io::Result<()> {
    if filename.is_empty() || filename.contains(['/', '\\']) || filename.starts_with('.') {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("invalid entry name: {filename:?}"),
        ));
    }
    Ok(())
}

impl ArchiveSink for DirectorySink {
    type Output = Vec<PathBuf>;

    fn add_entry(&mut self, filename: &str, bytes: &[u8]) -> io::Result<()> {
        check_entry_name(filename)?;
        if self.staged.iter().any(|entry| entry.filename == filename) {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("duplicate entry name: {filename:?}"),
            ));
        }

        self.staged.push(ExportEntry {
            filename: filename.to_string(),
            bytes: bytes.to_vec(),
        });
        Ok(())
    }

    fn finish(self) -> io::Result<Vec<PathBuf>> {
        let mut written = Vec::with_capacity(self.staged.len());
        if let Err(err) = self.write_all(&mut written) {
            // Undo the files of this export, then report the original failure.
            for path in &written {
                let _ = fs::remove_file(path);
            }
            return Err(err);
        }
        Ok(written)
    }
}
