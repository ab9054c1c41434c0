//! MCEmoji binary record serialization and deserialization
//!
//! Every exported emoji becomes one self-contained record. The current
//! layout (all integers big-endian) is:
//!
//! | offset      | size | field                                      |
//! |-------------|------|--------------------------------------------|
//! | 0           | 1    | format marker, always `1`                  |
//! | 1           | 1    | name length `L` in UTF-16 units            |
//! | 2           | 2L   | name, one 16-bit value per UTF-16 unit     |
//! | 2 + 2L      | 1    | height (low byte)                          |
//! | 3 + 2L      | 1    | ascent (low byte)                          |
//! | 4 + 2L      | 2    | sort key                                   |
//! | 6 + 2L      | 1    | reserved, always `0`                       |
//! | 7 + 2L      | 2    | image length `I`                           |
//! | 9 + 2L      | I    | PNG image bytes                            |
//!
//! The legacy layout is a fixed 48-byte record without image or sort key:
//! marker `0`, name length, the name padded to 14 code units, height,
//! ascent, and 16 reserved zero bytes.
//!
//! A name unit that starts a surrogate pair is written as the pair's code
//! point truncated to 16 bits; the trailing surrogate follows unchanged.
//!
//! Height and ascent are stored as single bytes; larger values keep only
//! their low byte. The permission node is not part of either layout.

use crate::record::{AssetRecord, MAX_NAME_LEN};
use crate::{Error, Result};
use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use std::fmt;
use std::io::{self, Cursor, Read, Write};
use std::str::FromStr;

/// Marker byte of the current layout
const CURRENT_MARKER: u8 = 1;

/// Marker byte of the legacy layout
const LEGACY_MARKER: u8 = 0;

/// Current layout header size, excluding the name
const HEADER_BASE_LEN: usize = 9;

/// Size of every legacy record
pub const LEGACY_RECORD_LEN: usize = 48;

/// Longest name the one-byte length prefix can describe
const MAX_ENCODED_NAME_LEN: usize = u8::MAX as usize;

/// Largest image the two-byte length field can describe
const MAX_IMAGE_LEN: usize = u16::MAX as usize;

/// Binary layout used when encoding a record
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum FormatVariant {
    /// Variable-length layout with embedded image
    #[default]
    Current,
    /// Fixed 48-byte layout kept for old consumers
    Legacy,
}

impl FormatVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormatVariant::Current => "current",
            FormatVariant::Legacy => "legacy",
        }
    }
}

impl fmt::Display for FormatVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormatVariant {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "current" => Ok(FormatVariant::Current),
            "legacy" => Ok(FormatVariant::Legacy),
            other => Err(format!(
                "unknown format variant '{other}', expected 'current' or 'legacy'"
            )),
        }
    }
}

/// A record read back from its binary form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedEmoji {
    pub variant: FormatVariant,
    pub name: String,
    pub height: u8,
    pub ascent: u8,
    /// Absent in the legacy layout
    pub sort_key: Option<u16>,
    pub reserved: u8,
    /// Empty in the legacy layout
    pub image: Vec<u8>,
    /// Bytes found after the record, e.g. allocation padding
    pub padding: usize,
}

/// Returns the size of the current-layout record for a name and image
pub fn encoded_len(name_len: usize, image_len: usize) -> usize {
    HEADER_BASE_LEN + 2 * name_len + image_len
}

/// Encodes a record with the given sort key
pub fn encode_record(
    record: &AssetRecord,
    sort_key: u16,
    variant: FormatVariant,
) -> Result<Vec<u8>> {
    match variant {
        FormatVariant::Current => encode_current(record, sort_key),
        FormatVariant::Legacy => encode_legacy(record),
    }
}

fn encode_current(record: &AssetRecord, sort_key: u16) -> Result<Vec<u8>> {
    let name = name_units(&record.name);
    let name_len = name.len();
    if name_len > MAX_ENCODED_NAME_LEN {
        return Err(Error::NameTooLong {
            len: name_len,
            max: MAX_ENCODED_NAME_LEN,
        });
    }
    if record.image.len() > MAX_IMAGE_LEN {
        return Err(Error::ImageTooLarge(record.image.len()));
    }

    let mut buffer = Vec::with_capacity(encoded_len(name_len, record.image.len()));
    buffer.write_u8(CURRENT_MARKER)?;
    buffer.write_u8(name_len as u8)?;
    write_name(&mut buffer, &name)?;
    buffer.write_u8(low_byte(record.height))?;
    buffer.write_u8(low_byte(record.ascent))?;
    buffer.write_u16::<BigEndian>(sort_key)?;
    buffer.write_u8(0)?;
    buffer.write_u16::<BigEndian>(record.image.len() as u16)?;
    buffer.write_all(&record.image)?;

    Ok(buffer)
}

fn encode_legacy(record: &AssetRecord) -> Result<Vec<u8>> {
    let name = name_units(&record.name);
    let name_len = name.len();
    if name_len > MAX_NAME_LEN {
        return Err(Error::NameTooLong {
            len: name_len,
            max: MAX_NAME_LEN,
        });
    }

    let mut buffer = Vec::with_capacity(LEGACY_RECORD_LEN);
    buffer.write_u8(LEGACY_MARKER)?;
    buffer.write_u8(name_len as u8)?;
    write_name(&mut buffer, &name)?;
    for _ in name_len..MAX_NAME_LEN {
        buffer.write_u16::<BigEndian>(0)?;
    }
    buffer.write_u8(low_byte(record.height))?;
    buffer.write_u8(low_byte(record.ascent))?;
    buffer.resize(LEGACY_RECORD_LEN, 0);

    Ok(buffer)
}

/// Splits a name into the 16-bit values written for it, one per UTF-16 unit
fn name_units(name: &str) -> Vec<u16> {
    let mut units = Vec::with_capacity(name.len());
    for c in name.chars() {
        units.push(c as u32 as u16);
        let mut pair = [0u16; 2];
        if let [_, low] = c.encode_utf16(&mut pair) {
            units.push(*low);
        }
    }
    units
}

fn write_name<W: Write>(writer: &mut W, units: &[u16]) -> io::Result<()> {
    for &unit in units {
        writer.write_u16::<BigEndian>(unit)?;
    }
    Ok(())
}

fn low_byte(value: u32) -> u8 {
    (value & 0xFF) as u8
}

/// Decodes a record in either layout
pub fn decode_record(bytes: &[u8]) -> Result<EncodedEmoji> {
    match bytes.first() {
        None => Err(Error::Truncated),
        Some(&CURRENT_MARKER) => decode_current(bytes),
        Some(&LEGACY_MARKER) => decode_legacy(bytes),
        Some(&marker) => Err(Error::InvalidMarker(marker)),
    }
}

fn decode_current(bytes: &[u8]) -> Result<EncodedEmoji> {
    let mut reader = Cursor::new(bytes);
    reader.read_u8().map_err(truncated)?;
    let name_len = reader.read_u8().map_err(truncated)? as usize;
    let name = read_name(&mut reader, name_len)?;
    let height = reader.read_u8().map_err(truncated)?;
    let ascent = reader.read_u8().map_err(truncated)?;
    let sort_key = reader.read_u16::<BigEndian>().map_err(truncated)?;
    let reserved = reader.read_u8().map_err(truncated)?;
    let image_len = reader.read_u16::<BigEndian>().map_err(truncated)? as usize;

    let mut image = vec![0u8; image_len];
    reader.read_exact(&mut image).map_err(truncated)?;

    let padding = bytes.len() - reader.position() as usize;

    Ok(EncodedEmoji {
        variant: FormatVariant::Current,
        name,
        height,
        ascent,
        sort_key: Some(sort_key),
        reserved,
        image,
        padding,
    })
}

fn decode_legacy(bytes: &[u8]) -> Result<EncodedEmoji> {
    if bytes.len() < LEGACY_RECORD_LEN {
        return Err(Error::Truncated);
    }

    let mut reader = Cursor::new(bytes);
    reader.read_u8().map_err(truncated)?;
    let name_len = reader.read_u8().map_err(truncated)? as usize;
    if name_len > MAX_NAME_LEN {
        return Err(Error::NameTooLong {
            len: name_len,
            max: MAX_NAME_LEN,
        });
    }
    let name = read_name(&mut reader, name_len)?;
    reader.set_position(2 + 2 * MAX_NAME_LEN as u64);
    let height = reader.read_u8().map_err(truncated)?;
    let ascent = reader.read_u8().map_err(truncated)?;

    Ok(EncodedEmoji {
        variant: FormatVariant::Legacy,
        name,
        height,
        ascent,
        sort_key: None,
        reserved: 0,
        image: Vec::new(),
        padding: bytes.len() - LEGACY_RECORD_LEN,
    })
}

fn read_name<R: Read>(reader: &mut R, len: usize) -> Result<String> {
    (0..len)
        .map(|_| {
            let unit = reader.read_u16::<BigEndian>().map_err(truncated)?;
            Ok(char::from_u32(u32::from(unit)).unwrap_or(char::REPLACEMENT_CHARACTER))
        })
        .collect()
}

fn truncated(err: io::Error) -> Error {
    if err.kind() == io::ErrorKind::UnexpectedEof {
        Error::Truncated
    } else {
        Error::Io(err)
    }
}
