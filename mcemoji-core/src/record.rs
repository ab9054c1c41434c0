//! Emoji record data structures and field validation

use std::fmt;

/// Maximum number of characters in an emoji name
pub const MAX_NAME_LEN: usize = 14;

/// Represents a single emoji asset held by the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRecord {
    /// Identifier used in chat, `[A-Za-z_]{1,14}`
    pub name: String,
    /// Vertical offset from the text baseline
    pub ascent: u32,
    /// Rendered height
    pub height: u32,
    /// Permission node required to use the emoji, if any
    pub permission: Option<String>,
    /// PNG-encoded image data
    pub image: Vec<u8>,
}

impl AssetRecord {
    /// Creates a new record
    pub fn new(
        name: impl Into<String>,
        image: Vec<u8>,
        ascent: u32,
        height: u32,
        permission: Option<String>,
    ) -> Self {
        Self {
            name: name.into(),
            ascent,
            height,
            permission,
            image,
        }
    }

    /// Returns the size of the image data in bytes
    pub fn image_len(&self) -> usize {
        self.image.len()
    }

    /// Returns the name of the packaged file for this record
    pub fn filename(&self) -> String {
        format!("{}.mcemoji", self.name)
    }
}

/// Editable fields of a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Ascent,
    Height,
    Permission,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Ascent => "ascent",
            Field::Height => "height",
            Field::Permission => "permission",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metrics given to records created from a bare image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordDefaults {
    pub ascent: u32,
    pub height: u32,
}

impl RecordDefaults {
    /// Metrics used by the older editor revision
    pub const LEGACY: Self = Self {
        ascent: 7,
        height: 7,
    };
}

impl Default for RecordDefaults {
    fn default() -> Self {
        Self {
            ascent: 8,
            height: 9,
        }
    }
}

/// Checks a name against `[A-Za-z_]{1,14}`
pub fn is_valid_name(value: &str) -> bool {
    let len = value.chars().count();
    (1..=MAX_NAME_LEN).contains(&len)
        && value.chars().all(|c| c.is_ascii_alphabetic() || c == '_')
}

/// Checks a permission node against `[a-z0-9_.]+`
pub fn is_valid_permission(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '.')
}

/// Parses a metric written as plain decimal digits
pub fn parse_metric(value: &str) -> Option<u32> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    value.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_validation() {
        assert!(is_valid_name("smile"));
        assert!(is_valid_name("Big_Grin"));
        assert!(is_valid_name("abcdefghijklmn"));
        assert!(!is_valid_name(""));
        assert!(!is_valid_name("abcdefghijklmno"));
        assert!(!is_valid_name("1smile"));
        assert!(!is_valid_name("smile face"));
        assert!(!is_valid_name("sonrisa_ñ"));
    }

    #[test]
    fn test_permission_validation() {
        assert!(is_valid_permission("emojis.use.smile"));
        assert!(is_valid_permission("vip_2"));
        assert!(!is_valid_permission(""));
        assert!(!is_valid_permission("Emojis.Use"));
        assert!(!is_valid_permission("emojis use"));
    }

    #[test]
    fn test_metric_parsing() {
        assert_eq!(parse_metric("0"), Some(0));
        assert_eq!(parse_metric("0012"), Some(12));
        assert_eq!(parse_metric(""), None);
        assert_eq!(parse_metric("-1"), None);
        assert_eq!(parse_metric("+1"), None);
        assert_eq!(parse_metric("8px"), None);
        assert_eq!(parse_metric("99999999999"), None);
    }

    #[test]
    fn test_defaults() {
        let defaults = RecordDefaults::default();
        assert_eq!((defaults.ascent, defaults.height), (8, 9));
        assert_eq!((RecordDefaults::LEGACY.ascent, RecordDefaults::LEGACY.height), (7, 7));
    }

    #[test]
    fn test_filename() {
        let record = AssetRecord::new("smile", vec![1, 2, 3], 8, 9, None);
        assert_eq!(record.filename(), "smile.mcemoji");
        assert_eq!(record.image_len(), 3);
    }
}
