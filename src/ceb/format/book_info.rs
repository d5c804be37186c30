//! Decoding of the fixed-size book info record.

use std::io::Read;
use byteorder::{LittleEndian, ReadBytesExt};
use encoding_rs::GB18030;
use log::{debug, warn};
use crate::ceb::source::ByteSource;
use crate::ceb::types::{
    error::{CebError, Result},
    models::{BookInfo, IndexEntry, IndexKey, PublishDate, RecordType, BOOK_INFO_SIZE},
};
use super::index;

const TITLE_LEN: usize = 64;
const AUTHOR_LEN: usize = 32;
const PUBLISHER_LEN: usize = 64;
const ISBN_LEN: usize = 20;

/// Locates the book info entry and copies the record out of `source`.
///
/// Fails with `NotFound` on an empty index or when no entry has type
/// `BOOK_INFO`, and with `OutOfBounds` when either the declared block or
/// the fixed-size record would run past the end of the file. Nothing is
/// read until both bounds checks pass.
pub fn read(source: &ByteSource, entries: &[IndexEntry]) -> Result<BookInfo> {
    if entries.is_empty() {
        return Err(CebError::NotFound("index table is empty".to_string()));
    }

    let key = IndexKey::record(RecordType::BOOK_INFO)?;
    let entry = index::find(entries, &key)
        .ok_or_else(|| CebError::NotFound("no book info entry in index".to_string()))?;

    let file_len = source.len();
    if entry.data_end() > file_len {
        warn!(
            "Book info block at {} (+{}) exceeds file length {}",
            entry.data_offset, entry.data_length, file_len
        );
        return Err(CebError::OutOfBounds {
            offset: entry.data_offset as u64,
            length: entry.data_length as u64,
            file_len,
        });
    }

    let record = source.read_at(entry.data_offset as u64, BOOK_INFO_SIZE as u64)?;
    let info = decode(record)?;
    debug!("Book info decoded: title='{}', pages={}", info.title, info.page_count);
    Ok(info)
}

/// Decodes a book info record from exactly `BOOK_INFO_SIZE` bytes.
///
/// # Record Structure
/// ```text
/// [64 bytes] Title (GB18030, NUL padded)
/// [32 bytes] Author (GB18030, NUL padded)
/// [64 bytes] Publisher (GB18030, NUL padded)
/// [20 bytes] ISBN (ASCII, NUL padded)
/// [ 2 bytes] Publish year (u16)
/// [ 1 byte ] Publish month
/// [ 1 byte ] Publish day
/// [ 4 bytes] Page count (u32)
/// [ 4 bytes] Character count (u32)
/// [ 4 bytes] Flags (u32)
/// [60 bytes] Reserved
/// ```
pub fn decode(record: &[u8]) -> Result<BookInfo> {
    if record.len() != BOOK_INFO_SIZE {
        return Err(CebError::InvalidFormat(format!(
            "Book info record must be {} bytes, got {}",
            BOOK_INFO_SIZE,
            record.len()
        )));
    }
    let mut reader = record;

    let title = read_text(&mut reader, TITLE_LEN)?;
    let author = read_text(&mut reader, AUTHOR_LEN)?;
    let publisher = read_text(&mut reader, PUBLISHER_LEN)?;
    let isbn = read_text(&mut reader, ISBN_LEN)?;

    let publish_date = PublishDate {
        year: reader.read_u16::<LittleEndian>().map_err(truncated)?,
        month: reader.read_u8().map_err(truncated)?,
        day: reader.read_u8().map_err(truncated)?,
    };
    let page_count = reader.read_u32::<LittleEndian>().map_err(truncated)?;
    let char_count = reader.read_u32::<LittleEndian>().map_err(truncated)?;
    let flags = reader.read_u32::<LittleEndian>().map_err(truncated)?;

    Ok(BookInfo {
        title,
        author,
        publisher,
        isbn,
        publish_date,
        page_count,
        char_count,
        flags,
    })
}

/// Reads a fixed-width, NUL-padded text field.
fn read_text(reader: &mut &[u8], width: usize) -> Result<String> {
    let mut field = vec![0u8; width];
    reader.read_exact(&mut field).map_err(truncated)?;
    let end = field.iter().position(|&b| b == 0).unwrap_or(width);
    let (text, _, _) = GB18030.decode(&field[..end]);
    Ok(text.trim_end().to_owned())
}

fn truncated(e: std::io::Error) -> CebError {
    CebError::InvalidFormat(format!("Truncated book info record: {}", e))
}
