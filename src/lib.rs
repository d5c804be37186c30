//! # ceb-reader
//!
//! A read-only reader for CEB e-book container files.
//! Validates the header, builds the index table and gives bounds-checked
//! access to the data blocks it points at, including the book info record.
//!
//! **Note:** Payloads other than book info are returned as raw bytes; their
//! decompression and rendering are left to the caller.
pub mod ceb;

// Re-export the main types for convenience
pub use ceb::{
    CebError, CebReader, ReaderState, Result,
    source::ByteSource,
    types::models::{
        BookInfo,
        FileHeader,
        FormatVersion,
        IndexEntry,
        IndexKey,
        PluginId,
        PublishDate,
        RecordType,
        VersionLayout,
    },
};
