//! A directory of packaged emojis in render order

use crate::emoji_file::{DecodedEmoji, EXTENSION};
use crate::Result;
use std::cmp::Reverse;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Packaged emojis ordered the way the runtime renders them
#[derive(Debug, Clone, Default)]
pub struct EmojiSet {
    emojis: Vec<DecodedEmoji>,
}

impl EmojiSet {
    /// Creates a set, ordering emojis by descending priority
    ///
    /// Legacy records carry no sort key and go last; ties keep their input
    /// order.
    pub fn new(mut emojis: Vec<DecodedEmoji>) -> Self {
        emojis.sort_by_key(|emoji| Reverse(emoji.priority()));
        Self { emojis }
    }

    /// Loads every `.mcemoji` file of a directory
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let mut paths = Vec::new();
        for entry in fs::read_dir(dir.as_ref())? {
            let path = entry?.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == EXTENSION) {
                paths.push(path);
            }
        }
        paths.sort();

        let emojis = paths
            .iter()
            .map(DecodedEmoji::open)
            .collect::<Result<Vec<_>>>()?;
        debug!(dir = %dir.as_ref().display(), count = emojis.len(), "loaded emoji set");
        Ok(Self::new(emojis))
    }

    pub fn emojis(&self) -> &[DecodedEmoji] {
        &self.emojis
    }

    /// Emoji names in render order
    pub fn names(&self) -> Vec<&str> {
        self.emojis.iter().map(|e| e.record.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.emojis.len()
    }

    pub fn is_empty(&self) -> bool {
        self.emojis.is_empty()
    }

    /// Total size of the embedded images in bytes
    pub fn total_image_size(&self) -> usize {
        self.emojis.iter().map(|e| e.record.image.len()).sum()
    }
}
