//! JSON manifests describing an emoji set
//!
//! ```json
//! {
//!   "metadata": { "formatVersion": 1 },
//!   "emojis": [
//!     { "file": "smile.png", "ascent": 8, "height": 9, "permission": "emojis.smile" },
//!     { "file": "art/sad-face.png", "name": "sad" }
//!   ]
//! }
//! ```
//!
//! Image paths are relative to the manifest. Missing names come from the
//! file name, missing metrics from the encoder defaults.

use crate::import::{emoji_name, is_png};
use crate::{Error, Result};
use mcemoji_core::record::{is_valid_name, is_valid_permission};
use mcemoji_core::{AssetRecord, Field, RecordDefaults, Store};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use tracing::info;

/// Manifest format version understood by this crate
pub const MANIFEST_FORMAT_VERSION: u32 = 1;

/// Describes a set of emojis to pack
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub metadata: ManifestMetadata,
    #[serde(default)]
    pub emojis: Vec<ManifestEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestMetadata {
    pub format_version: u32,
}

/// One emoji of a manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// PNG image, relative to the manifest
    pub file: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ascent: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permission: Option<String>,
}

impl Manifest {
    /// Creates a manifest of the current version
    pub fn new(emojis: Vec<ManifestEntry>) -> Self {
        Self {
            metadata: ManifestMetadata {
                format_version: MANIFEST_FORMAT_VERSION,
            },
            emojis,
        }
    }

    /// Reads and version-checks a manifest
    pub fn read<R: Read>(reader: R) -> Result<Self> {
        let manifest: Manifest = serde_json::from_reader(reader)?;
        if manifest.metadata.format_version != MANIFEST_FORMAT_VERSION {
            return Err(Error::UnsupportedManifestVersion {
                found: manifest.metadata.format_version,
                supported: MANIFEST_FORMAT_VERSION,
            });
        }
        Ok(manifest)
    }

    /// Opens a manifest file
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        Self::read(BufReader::new(file))
    }

    /// Adds every emoji of the manifest to the store
    ///
    /// All entries are read and validated first; if any is invalid the
    /// store is left untouched.
    pub fn populate(
        &self,
        store: &mut Store,
        base_dir: &Path,
        defaults: RecordDefaults,
    ) -> Result<Vec<usize>> {
        let records = self
            .emojis
            .iter()
            .map(|entry| entry.load(base_dir, defaults))
            .collect::<Result<Vec<_>>>()?;

        let indices: Vec<usize> = records
            .into_iter()
            .map(|r| store.add(r.name, r.image, r.ascent, r.height, r.permission))
            .collect();

        info!(count = indices.len(), "manifest emojis added");
        Ok(indices)
    }
}

impl ManifestEntry {
    fn load(&self, base_dir: &Path, defaults: RecordDefaults) -> Result<AssetRecord> {
        let path = base_dir.join(&self.file);

        let name = match &self.name {
            Some(name) => name.clone(),
            None => emoji_name(&path)
                .ok_or_else(|| Error::InvalidExtension(path.clone()))?
                .to_string(),
        };
        if !is_valid_name(&name) {
            return Err(rejected(Field::Name, &name));
        }

        let permission = match self.permission.as_deref() {
            None | Some("") => None,
            Some(p) if is_valid_permission(p) => Some(p.to_string()),
            Some(p) => return Err(rejected(Field::Permission, p)),
        };

        let image = fs::read(&path)?;
        if !is_png(&image) {
            return Err(Error::NotPng(path));
        }

        Ok(AssetRecord::new(
            name,
            image,
            self.ascent.unwrap_or(defaults.ascent),
            self.height.unwrap_or(defaults.height),
            permission,
        ))
    }
}

fn rejected(field: Field, value: &str) -> Error {
    mcemoji_core::Error::ValidationRejected {
        field,
        value: value.to_string(),
    }
    .into()
}
