//! MCEmoji Core Library
//!
//! This library provides the record store and the binary record format for
//! MCEmoji assets: small PNG emojis with vertical metrics that a Minecraft
//! server renders inline with chat text.

pub mod format;
pub mod names;
pub mod record;
pub mod store;

pub use format::{decode_record, encode_record, EncodedEmoji, FormatVariant};
pub use names::{NameGenerator, RandomNameGenerator};
pub use record::{AssetRecord, Field, RecordDefaults};
pub use store::Store;

/// Result type for mcemoji-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for mcemoji-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid value for {field}: {value:?}")]
    ValidationRejected { field: Field, value: String },

    #[error("Name already in use: {0}")]
    NameTaken(String),

    #[error("No record at index {0}")]
    RecordNotFound(usize),

    #[error("Name is {len} characters long, the format allows at most {max}")]
    NameTooLong { len: usize, max: usize },

    #[error("Image is {0} bytes, the format allows at most 65535")]
    ImageTooLarge(usize),

    #[error("Invalid format marker: {0}")]
    InvalidMarker(u8),

    #[error("Record is truncated")]
    Truncated,
}
