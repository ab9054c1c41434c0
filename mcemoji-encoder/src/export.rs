//! Export of a record store into packaged `.mcemoji` files

use crate::sink::ArchiveSink;
use crate::{EncoderConfig, Error, Result};
use mcemoji_core::{encode_record, Store};
use tracing::{debug, info, warn};

/// Sort key given to the first exported emoji
///
/// The runtime renders emojis with higher keys first, so keys count down
/// from here in store order. The field is a signed 16-bit value: past 32768
/// emojis the counter goes negative and only its low 16 bits are written.
pub const FIRST_SORT_KEY: i32 = 32767;

/// One packaged file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportEntry {
    /// `<name>.mcemoji`
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Returns the sort keys handed out by a single export, in order
pub fn sort_keys() -> impl Iterator<Item = i32> {
    (i32::MIN..=FIRST_SORT_KEY).rev()
}

/// Keeps the low 16 bits of a sort key, as the signed field on the wire does
pub fn wire_sort_key(sort_key: i32) -> u16 {
    sort_key as u16
}

/// Encodes every live record of the store
///
/// Each call starts a fresh sort key counter. The first record that cannot
/// be encoded aborts the export.
pub fn export_all(store: &Store, config: &EncoderConfig) -> Result<Vec<ExportEntry>> {
    let mut entries = Vec::with_capacity(store.live_count());

    for ((index, record), sort_key) in store.live_entries().zip(sort_keys()) {
        if sort_key == -1 {
            warn!(
                index,
                "sort key counter went negative, the runtime will see wrapped keys"
            );
        }

        let bytes =
            encode_record(record, wire_sort_key(sort_key), config.variant).map_err(|source| {
                Error::RecordFailed {
                    index,
                    name: record.name.clone(),
                    source,
                }
            })?;

        debug!(
            index,
            name = %record.name,
            sort_key,
            size = bytes.len(),
            "encoded emoji"
        );
        entries.push(ExportEntry {
            filename: record.filename(),
            bytes,
        });
    }

    info!(count = entries.len(), variant = %config.variant, "emojis encoded");
    Ok(entries)
}

/// Encodes every live record and hands the files to an archive
///
/// Nothing reaches the sink unless every record encodes. Sinks that refuse
/// an entry must not have published the earlier ones (see
/// [`DirectorySink`](crate::DirectorySink)), so a failed export never leaves
/// a partial archive behind. The store is only read and can be exported
/// again after a failure.
pub fn export_to<S: ArchiveSink>(
    store: &Store,
    config: &EncoderConfig,
    mut sink: S,
) -> Result<S::Output> {
    if store.is_empty() {
        return Err(Error::NothingToExport);
    }

    let entries = export_all(store, config)?;
    for entry in &entries {
        sink.add_entry(&entry.filename, &entry.bytes)
            .map_err(Error::Archive)?;
    }

    sink.finish().map_err(Error::Archive)
}
