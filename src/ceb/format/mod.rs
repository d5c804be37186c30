//! File format parsing layer for CEB e-book files.
//!
//! This module provides the mid-level parsing layer that bridges between
//! the raw byte view and the high-level [`CebReader`](crate::ceb::reader::CebReader).
//!
//! # Module Organization
//!
//! - [`header`]: Validates the signature and decodes the format version
//! - [`index`]: Builds and searches the index table
//! - [`book_info`]: Decodes the book info record
//!
//! # Architecture
//!
//! ```text
//! File Structure:
//! ┌─────────────────┐
//! │  Header         │ ← header::parse()
//! ├─────────────────┤
//! │  Index Table    │ ← index::build()
//! │  (N x 17 bytes) │
//! ├─────────────────┤
//! │  Data Blocks    │ ← book_info::read(), CebReader::read_entry_data()
//! │  (any order)    │
//! └─────────────────┘
//! ```

pub mod book_info;
pub mod header;
pub mod index;
