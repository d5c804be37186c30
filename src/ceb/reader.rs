use std::path::Path;
use log::{info, warn};

use super::format::{book_info, header, index};
use super::source::ByteSource;
use super::types::error::{CebError, Result};
use super::types::models::*;

/// Lifecycle state of a [`CebReader`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReaderState {
    /// Header and index were fully decoded.
    Valid,
    /// Opening failed; see [`CebReader::open_error`].
    Invalid,
    /// Released by [`CebReader::close`].
    Closed,
}

/// Everything owned by a successfully opened file.
#[derive(Debug)]
struct OpenFile {
    source: ByteSource,
    header: FileHeader,
    entries: Vec<IndexEntry>,
}

#[derive(Debug)]
enum Inner {
    Valid(OpenFile),
    Invalid(CebError),
    Closed,
}

/// The main reader for CEB e-book files.
///
/// Opening never fails outright: a file that cannot be mapped or decoded
/// yields a reader in the [`ReaderState::Invalid`] state, and every query
/// on it fails with [`CebError::NotOpen`] without touching the file.
///
/// The mapping is released by [`close`](Self::close) or when the reader is
/// dropped, whichever comes first. Queries borrow the reader and `close`
/// needs it mutably, so a close can never overlap a read.
#[derive(Debug)]
pub struct CebReader {
    inner: Inner,
    file_len: u64,
}

impl CebReader {
    /// Opens and decodes the CEB file at `path`.
    ///
    /// Check [`is_valid`](Self::is_valid) before querying.
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        info!("Opening CEB file: {}", path.display());
        match ByteSource::map(path) {
            Ok(source) => Self::decode(source),
            Err(e) => Self::invalid(e, 0),
        }
    }

    /// Decodes a CEB file already held in memory.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self::decode(ByteSource::from_vec(bytes))
    }

    fn decode(source: ByteSource) -> Self {
        let file_len = source.len();

        let header = match header::parse(source.bytes()) {
            Ok(header) => header,
            Err(e) => return Self::invalid(e, file_len),
        };

        let entries = index::build(source.bytes(), header.index_count, HEADER_SIZE);

        info!(
            "CEB file opened: version {}, {} index entries, {} bytes",
            header.version,
            entries.len(),
            file_len
        );

        Self {
            inner: Inner::Valid(OpenFile { source, header, entries }),
            file_len,
        }
    }

    fn invalid(error: CebError, file_len: u64) -> Self {
        warn!("CEB file is invalid: {}", error);
        Self {
            inner: Inner::Invalid(error),
            file_len,
        }
    }

    fn open_file(&self) -> Result<&OpenFile> {
        match &self.inner {
            Inner::Valid(file) => Ok(file),
            Inner::Invalid(_) | Inner::Closed => Err(CebError::NotOpen),
        }
    }

    pub fn state(&self) -> ReaderState {
        match self.inner {
            Inner::Valid(_) => ReaderState::Valid,
            Inner::Invalid(_) => ReaderState::Invalid,
            Inner::Closed => ReaderState::Closed,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.state() == ReaderState::Valid
    }

    /// The reason opening failed, if the reader is invalid.
    pub fn open_error(&self) -> Option<&CebError> {
        match &self.inner {
            Inner::Invalid(e) => Some(e),
            _ => None,
        }
    }

    /// Length of the underlying file in bytes, as seen when opened.
    pub fn file_len(&self) -> u64 {
        self.file_len
    }

    pub fn header(&self) -> Result<&FileHeader> {
        Ok(&self.open_file()?.header)
    }

    pub fn version(&self) -> Result<FormatVersion> {
        Ok(self.open_file()?.header.version)
    }

    /// All index entries in file order.
    pub fn entries(&self) -> Result<&[IndexEntry]> {
        Ok(&self.open_file()?.entries)
    }

    /// The raw index entry at `position`.
    pub fn entry(&self, position: usize) -> Result<&IndexEntry> {
        let entries = self.entries()?;
        entries.get(position).ok_or_else(|| {
            CebError::NotFound(format!(
                "index position {} (table holds {} entries)",
                position,
                entries.len()
            ))
        })
    }

    /// First entry matching `key`, in file order.
    pub fn find_entry(&self, key: &IndexKey) -> Result<&IndexEntry> {
        let entries = self.entries()?;
        index::find(entries, key)
            .ok_or_else(|| CebError::NotFound(format!("no index entry for {}", key)))
    }

    /// Position of the first entry matching `key`, in file order.
    pub fn find_position(&self, key: &IndexKey) -> Result<usize> {
        let entries = self.entries()?;
        index::position(entries, key)
            .ok_or_else(|| CebError::NotFound(format!("no index entry for {}", key)))
    }

    /// Convenience lookup of a plugin-data entry by plugin id.
    pub fn find_plugin_data(&self, plugin_id: PluginId) -> Result<&IndexEntry> {
        self.find_entry(&IndexKey::plugin(plugin_id))
    }

    /// Returns the payload bytes of `entry`, borrowed from the file.
    ///
    /// Fails with `OutOfBounds` if the block runs past the end of the file.
    pub fn read_entry_data(&self, entry: &IndexEntry) -> Result<&[u8]> {
        let file = self.open_file()?;
        file.source
            .read_at(entry.data_offset as u64, entry.data_length as u64)
            .inspect_err(|_| {
                warn!(
                    "{} block at {} (+{}) exceeds file length {}",
                    entry.record_type, entry.data_offset, entry.data_length, self.file_len
                )
            })
    }

    /// Returns `length` bytes at `offset`, borrowed from the file.
    pub fn read_bytes(&self, offset: u64, length: u64) -> Result<&[u8]> {
        self.open_file()?.source.read_at(offset, length)
    }

    /// Decodes the book info record into an owned value.
    pub fn book_info(&self) -> Result<BookInfo> {
        let file = self.open_file()?;
        book_info::read(&file.source, &file.entries)
    }

    /// Releases the mapping and the index table.
    ///
    /// Safe to call any number of times, on valid and invalid readers alike.
    pub fn close(&mut self) {
        if matches!(self.inner, Inner::Closed) {
            return;
        }
        info!("Closing CEB file");
        self.inner = Inner::Closed;
    }
}
