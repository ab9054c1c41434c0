//! MCEmoji Encoder Library
//!
//! This library turns a record store into packaged `.mcemoji` files and
//! fills stores from PNG files or JSON manifests.

pub mod export;
pub mod import;
pub mod manifest;
pub mod sink;

pub use export::{export_all, export_to, sort_keys, wire_sort_key, ExportEntry, FIRST_SORT_KEY};
pub use import::{import_png, import_pngs, ImportReport};
pub use manifest::Manifest;
pub use sink::{ArchiveSink, DirectorySink, MemorySink};

use mcemoji_core::{FormatVariant, RecordDefaults};
use std::path::PathBuf;

/// Result type for mcemoji-encoder operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for mcemoji-encoder operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("MCEmoji core error: {0}")]
    Core(#[from] mcemoji_core::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Manifest error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to encode emoji '{name}' (index {index}): {source}")]
    RecordFailed {
        index: usize,
        name: String,
        #[source]
        source: mcemoji_core::Error,
    },

    #[error("No emojis to export, first add some emojis")]
    NothingToExport,

    #[error("Archive error: {0}")]
    Archive(#[source] std::io::Error),

    #[error("Cannot load {}. Invalid extension", .0.display())]
    InvalidExtension(PathBuf),

    #[error("Cannot load {}. Not a PNG image", .0.display())]
    NotPng(PathBuf),

    #[error("Unsupported manifest format version {found} (supported: {supported})")]
    UnsupportedManifestVersion { found: u32, supported: u32 },
}

/// Encoder configuration
#[derive(Debug, Clone, Default)]
pub struct EncoderConfig {
    /// Binary layout of exported records
    pub variant: FormatVariant,
    /// Metrics for emojis imported without explicit values
    pub defaults: RecordDefaults,
}
