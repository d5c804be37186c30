//! Read-only byte views over CEB files.

use std::fs::File;
use std::io;
use std::path::Path;
use log::{debug, trace};
use memmap2::{Mmap, MmapOptions};

use super::types::error::{CebError, Result};

/// A read-only, randomly addressable view over a file's bytes.
///
/// The mapping is private and copy-on-write, so it never writes back to
/// the file. Dropping the source releases the mapping.
#[derive(Debug)]
pub enum ByteSource {
    Mapped(Mmap),
    Owned(Vec<u8>),
}

impl ByteSource {
    /// Maps the file at `path` for shared reading.
    ///
    /// Fails with `OpenFailure` if the file is missing, unreadable, empty,
    /// or cannot be mapped.
    pub fn map(path: &Path) -> Result<Self> {
        let open_failure = |source: io::Error| CebError::OpenFailure {
            path: path.to_path_buf(),
            source,
        };

        // File::open takes no exclusive lock, other readers are unaffected.
        let file = File::open(path).map_err(open_failure)?;
        let file_len = file.metadata().map_err(open_failure)?.len();
        trace!("File length: {} bytes", file_len);
        if file_len == 0 {
            return Err(open_failure(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "file is empty",
            )));
        }

        // SAFETY: the map is private (copy-on-write) and read-only; callers
        // must not truncate the file while the source is alive.
        let mmap = unsafe { MmapOptions::new().map_copy_read_only(&file) }.map_err(open_failure)?;
        if mmap.is_empty() {
            return Err(open_failure(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "mapped view is empty",
            )));
        }
        debug!("Mapped {} ({} bytes)", path.display(), mmap.len());
        Ok(Self::Mapped(mmap))
    }

    /// Wraps an in-memory buffer.
    pub fn from_vec(bytes: Vec<u8>) -> Self {
        Self::Owned(bytes)
    }

    pub fn bytes(&self) -> &[u8] {
        match self {
            Self::Mapped(mmap) => &mmap[..],
            Self::Owned(bytes) => &bytes[..],
        }
    }

    pub fn len(&self) -> u64 {
        self.bytes().len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.bytes().is_empty()
    }

    /// Returns `length` bytes starting at `offset`, or `OutOfBounds`.
    pub fn read_at(&self, offset: u64, length: u64) -> Result<&[u8]> {
        let file_len = self.len();
        match offset.checked_add(length) {
            Some(end) if end <= file_len => Ok(&self.bytes()[offset as usize..end as usize]),
            _ => Err(CebError::OutOfBounds { offset, length, file_len }),
        }
    }
}
