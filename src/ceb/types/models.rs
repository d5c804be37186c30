//! Core data structures for CEB format components.
//!
//! This module defines the fundamental types used throughout the library:
//! - Format constants and the decoded file header
//! - Index entries, record types and plugin identifiers
//! - The lookup key used to query the index
//! - The decoded book info record

use std::fmt;
use super::error::{CebError, Result};

/// Copyright signature stored in the first 11 bytes of every CEB file.
pub const SIGNATURE: &[u8; SIGNATURE_LEN] = b"Founder CEB";
pub const SIGNATURE_LEN: usize = 11;

/// Size of the version-info region at the start of the header.
pub const VERSION_INFO_LEN: usize = 16;
/// Offset of the major version byte in the modern layout.
pub const MAJORVER_OFFSET: usize = 14;
/// Offset of the minor version byte in the modern layout.
pub const MINORVER_OFFSET: usize = 15;

/// Total size of the fixed file header: version-info region plus the u16 index count.
pub const HEADER_SIZE: usize = VERSION_INFO_LEN + 2;
/// Size of one index record: type (1), plugin id (8), offset (4), length (4).
pub const INDEX_ENTRY_SIZE: usize = 1 + PLUGIN_ID_LEN + 4 + 4;

pub const PLUGIN_ID_LEN: usize = 8;

/// Size of the book info record in bytes.
pub const BOOK_INFO_SIZE: usize = 256;

/// How the version was encoded in the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionLayout {
    /// Bytes 11..14 are zero; version stored as raw bytes.
    Modern,
    /// Version stored as text at the end of the first 16 bytes.
    Legacy,
}

/// Format version derived from the file header.
///
/// Only produced by header decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FormatVersion {
    major: u8,
    minor: u8,
}

impl FormatVersion {
    pub(crate) fn new(major: u8, minor: u8) -> Self {
        Self { major, minor }
    }

    pub fn major(&self) -> u8 {
        self.major
    }

    pub fn minor(&self) -> u8 {
        self.minor
    }
}

impl fmt::Display for FormatVersion {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}.{:02}", self.major, self.minor)
    }
}

/// Decoded fixed-size file header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHeader {
    pub copyright: [u8; SIGNATURE_LEN],
    /// Raw bytes `[0..16)`, overlapping the copyright signature.
    pub version_info: [u8; VERSION_INFO_LEN],
    pub index_count: u16,
    pub layout: VersionLayout,
    pub version: FormatVersion,
}

/// Record type byte of an index entry.
///
/// Unknown values pass through unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecordType(pub u8);

impl RecordType {
    pub const BOOK_INFO: RecordType = RecordType(0x01);
    pub const CATALOG: RecordType = RecordType(0x02);
    pub const PAGE_INDEX: RecordType = RecordType(0x03);
    pub const PAGE_DATA: RecordType = RecordType(0x04);
    pub const IMAGE_DATA: RecordType = RecordType(0x05);
    pub const FONT_DATA: RecordType = RecordType(0x06);
    pub const COVER_IMAGE: RecordType = RecordType(0x07);
    pub const PLUGIN_DATA: RecordType = RecordType(0x80);

    /// Human-readable name for known types.
    pub fn name(&self) -> Option<&'static str> {
        match *self {
            Self::BOOK_INFO => Some("book-info"),
            Self::CATALOG => Some("catalog"),
            Self::PAGE_INDEX => Some("page-index"),
            Self::PAGE_DATA => Some("page-data"),
            Self::IMAGE_DATA => Some("image-data"),
            Self::FONT_DATA => Some("font-data"),
            Self::COVER_IMAGE => Some("cover-image"),
            Self::PLUGIN_DATA => Some("plugin-data"),
            _ => None,
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{}", name),
            None => write!(f, "type-{:#04x}", self.0),
        }
    }
}

/// Eight-byte plugin identifier carried by `PLUGIN_DATA` entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PluginId(pub [u8; PLUGIN_ID_LEN]);

impl PluginId {
    pub fn as_bytes(&self) -> &[u8; PLUGIN_ID_LEN] {
        &self.0
    }
}

impl From<[u8; PLUGIN_ID_LEN]> for PluginId {
    fn from(bytes: [u8; PLUGIN_ID_LEN]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for PluginId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for b in self.0 {
            write!(f, "{:02x}", b)?;
        }
        Ok(())
    }
}

/// One slot of the index table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexEntry {
    pub record_type: RecordType,
    /// Only meaningful when `record_type` is `PLUGIN_DATA`.
    pub plugin_id: PluginId,
    pub data_offset: u32,
    pub data_length: u32,
}

impl IndexEntry {
    /// Exclusive end of the payload, computed without overflow.
    pub fn data_end(&self) -> u64 {
        self.data_offset as u64 + self.data_length as u64
    }
}

/// A query against the index table.
///
/// A plugin id is present exactly when the record type is `PLUGIN_DATA`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexKey {
    record_type: RecordType,
    plugin_id: Option<PluginId>,
}

impl IndexKey {
    /// Builds a key, rejecting a missing plugin id for `PLUGIN_DATA`
    /// and a plugin id supplied for any other type.
    pub fn new(record_type: RecordType, plugin_id: Option<PluginId>) -> Result<Self> {
        match (record_type == RecordType::PLUGIN_DATA, plugin_id) {
            (true, None) => Err(CebError::InvalidQuery(
                "plugin-data lookup requires a plugin id".to_string(),
            )),
            (false, Some(_)) => Err(CebError::InvalidQuery(format!(
                "{} records carry no plugin id",
                record_type
            ))),
            _ => Ok(Self { record_type, plugin_id }),
        }
    }

    /// Key for a record type without plugin id.
    pub fn record(record_type: RecordType) -> Result<Self> {
        Self::new(record_type, None)
    }

    /// Key for a plugin-data entry.
    pub fn plugin(plugin_id: PluginId) -> Self {
        Self {
            record_type: RecordType::PLUGIN_DATA,
            plugin_id: Some(plugin_id),
        }
    }

    pub fn record_type(&self) -> RecordType {
        self.record_type
    }

    pub fn plugin_id(&self) -> Option<&PluginId> {
        self.plugin_id.as_ref()
    }

    /// Whether `entry` satisfies this key.
    pub fn matches(&self, entry: &IndexEntry) -> bool {
        if entry.record_type != self.record_type {
            return false;
        }
        match &self.plugin_id {
            Some(id) => entry.plugin_id == *id,
            None => true,
        }
    }
}

impl fmt::Display for IndexKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.plugin_id {
            Some(id) => write!(f, "{} [{}]", self.record_type, id),
            None => write!(f, "{}", self.record_type),
        }
    }
}

/// Publication date stored in the book info record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PublishDate {
    pub year: u16,
    pub month: u8,
    pub day: u8,
}

impl fmt::Display for PublishDate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

/// Book-level metadata, copied out of the file.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BookInfo {
    pub title: String,
    pub author: String,
    pub publisher: String,
    pub isbn: String,
    pub publish_date: PublishDate,
    pub page_count: u32,
    pub char_count: u32,
    pub flags: u32,
}

impl BookInfo {
    pub const FLAG_HAS_COVER: u32 = 0x01;
    pub const FLAG_HAS_CATALOG: u32 = 0x02;

    pub fn has_cover(&self) -> bool {
        self.flags & Self::FLAG_HAS_COVER != 0
    }

    pub fn has_catalog(&self) -> bool {
        self.flags & Self::FLAG_HAS_CATALOG != 0
    }
}
