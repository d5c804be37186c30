#![allow(dead_code)]

use std::io::Write;
use tempfile::NamedTempFile;

pub const SIGNATURE: &[u8; 11] = b"Founder CEB";
pub const HEADER_SIZE: usize = 18;
pub const INDEX_ENTRY_SIZE: usize = 17;
pub const BOOK_INFO_SIZE: usize = 256;

pub const BOOK_INFO: u8 = 0x01;
pub const CATALOG: u8 = 0x02;
pub const PAGE_DATA: u8 = 0x04;
pub const PLUGIN_DATA: u8 = 0x80;

/// Assembles CEB file images for tests.
pub struct CebBuilder {
    version_info: [u8; 16],
    declared_count: Option<u16>,
    entries: Vec<(u8, [u8; 8], Location)>,
    payload: Vec<u8>,
}

impl CebBuilder {
    /// Modern layout: zero marker bytes, raw major/minor.
    pub fn modern(major: u8, minor: u8) -> Self {
        let mut version_info = [0u8; 16];
        version_info[..11].copy_from_slice(SIGNATURE);
        version_info[14] = major;
        version_info[15] = minor;
        Self::with_version_info(version_info)
    }

    /// Legacy layout: five bytes of text after the signature, e.g. `"v2.05"`.
    pub fn legacy(version_text: &str) -> Self {
        assert_eq!(version_text.len(), 5, "legacy version text must be 5 bytes");
        let mut version_info = [0u8; 16];
        version_info[..11].copy_from_slice(SIGNATURE);
        version_info[11..].copy_from_slice(version_text.as_bytes());
        Self::with_version_info(version_info)
    }

    pub fn with_version_info(version_info: [u8; 16]) -> Self {
        Self {
            version_info,
            declared_count: None,
            entries: Vec::new(),
            payload: Vec::new(),
        }
    }

    /// Overrides the index count written to the header.
    pub fn declared_count(mut self, count: u16) -> Self {
        self.declared_count = Some(count);
        self
    }

    /// Adds an entry pointing at an explicit offset and length.
    pub fn raw_entry(mut self, record_type: u8, plugin_id: [u8; 8], offset: u32, length: u32) -> Self {
        self.entries.push((record_type, plugin_id, Location::Absolute(offset, length)));
        self
    }

    /// Appends `data` to the payload area and adds an entry pointing at it.
    pub fn entry(mut self, record_type: u8, plugin_id: [u8; 8], data: &[u8]) -> Self {
        let offset = self.payload.len() as u32;
        self.payload.extend_from_slice(data);
        self.entries.push((record_type, plugin_id, Location::Payload(offset, data.len() as u32)));
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let count = self.declared_count.unwrap_or(self.entries.len() as u16);
        let payload_start = (HEADER_SIZE + self.entries.len() * INDEX_ENTRY_SIZE) as u32;

        let mut bytes = Vec::new();
        bytes.extend_from_slice(&self.version_info);
        bytes.extend_from_slice(&count.to_le_bytes());
        for (record_type, plugin_id, location) in &self.entries {
            let (offset, length) = match *location {
                Location::Payload(offset, length) => (offset + payload_start, length),
                Location::Absolute(offset, length) => (offset, length),
            };
            bytes.push(*record_type);
            bytes.extend_from_slice(plugin_id);
            bytes.extend_from_slice(&offset.to_le_bytes());
            bytes.extend_from_slice(&length.to_le_bytes());
        }
        bytes.extend_from_slice(&self.payload);
        bytes
    }

    pub fn write_temp(&self) -> NamedTempFile {
        write_temp(&self.build())
    }
}

/// Where an entry's block lives.
enum Location {
    /// Offset relative to the start of the payload area.
    Payload(u32, u32),
    Absolute(u32, u32),
}

pub fn write_temp(bytes: &[u8]) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp file");
    file.write_all(bytes).expect("write temp file");
    file.flush().expect("flush temp file");
    file
}

/// Encodes a book info record.
pub fn book_info_record(
    title: &[u8],
    author: &[u8],
    publisher: &[u8],
    isbn: &str,
    date: (u16, u8, u8),
    page_count: u32,
    char_count: u32,
    flags: u32,
) -> Vec<u8> {
    let mut record = vec![0u8; BOOK_INFO_SIZE];
    record[..title.len()].copy_from_slice(title);
    record[64..64 + author.len()].copy_from_slice(author);
    record[96..96 + publisher.len()].copy_from_slice(publisher);
    record[160..160 + isbn.len()].copy_from_slice(isbn.as_bytes());
    record[180..182].copy_from_slice(&date.0.to_le_bytes());
    record[182] = date.1;
    record[183] = date.2;
    record[184..188].copy_from_slice(&page_count.to_le_bytes());
    record[188..192].copy_from_slice(&char_count.to_le_bytes());
    record[192..196].copy_from_slice(&flags.to_le_bytes());
    record
}

pub fn sample_book_info() -> Vec<u8> {
    book_info_record(
        b"The Art of Reading",
        b"A. Writer",
        b"Example Press",
        "978-7-000-00000-0",
        (2004, 6, 15),
        320,
        150_000,
        0x03,
    )
}
