//! MCEmoji Decoder Library
//!
//! This library reads packaged `.mcemoji` files back into their fields, the
//! way the server runtime sees them.

pub mod emoji_file;
pub mod emoji_set;

pub use emoji_file::DecodedEmoji;
pub use emoji_set::EmojiSet;

use std::path::PathBuf;

/// Result type for mcemoji-decoder operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for mcemoji-decoder operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("MCEmoji core error: {0}")]
    Core(#[from] mcemoji_core::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("{}: {source}", .path.display())]
    File {
        path: PathBuf,
        #[source]
        source: mcemoji_core::Error,
    },
}
