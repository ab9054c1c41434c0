//! Single `.mcemoji` file decoding

use crate::{Error, Result};
use image::ImageReader;
use mcemoji_core::{decode_record, EncodedEmoji};
use std::fs;
use std::io::Cursor;
use std::path::Path;
use tracing::warn;

/// File extension of packaged emojis
pub const EXTENSION: &str = "mcemoji";

/// A decoded emoji together with where it came from
#[derive(Debug, Clone)]
pub struct DecodedEmoji {
    /// File name the emoji was packaged under, if known
    pub filename: Option<String>,
    /// Decoded fields
    pub record: EncodedEmoji,
    /// Size of the packaged file in bytes
    pub file_size: usize,
}

impl DecodedEmoji {
    /// Decodes an emoji from packaged bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(Self {
            filename: None,
            record: decode_record(bytes)?,
            file_size: bytes.len(),
        })
    }

    /// Decodes a packaged file
    ///
    /// A file whose name does not match the emoji name inside it still
    /// decodes; the mismatch is logged since the runtime keys emojis by the
    /// embedded name.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path)?;
        let record = decode_record(&bytes).map_err(|source| Error::File {
            path: path.to_path_buf(),
            source,
        })?;

        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned());
        let stem = path.file_stem().map(|stem| stem.to_string_lossy());
        if stem.as_deref() != Some(record.name.as_str()) {
            warn!(
                path = %path.display(),
                name = %record.name,
                "file name does not match emoji name"
            );
        }

        Ok(Self {
            filename,
            record,
            file_size: bytes.len(),
        })
    }

    /// Sort key as the runtime reads it, a signed 16-bit value
    pub fn priority(&self) -> Option<i16> {
        self.record.sort_key.map(|key| key as i16)
    }

    /// Reads the pixel size of the embedded image, if there is one
    pub fn image_dimensions(&self) -> Result<Option<(u32, u32)>> {
        if self.record.image.is_empty() {
            return Ok(None);
        }

        let dimensions = ImageReader::new(Cursor::new(&self.record.image))
            .with_guessed_format()?
            .into_dimensions()?;
        Ok(Some(dimensions))
    }
}
