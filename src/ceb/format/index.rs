//! # Index Table
//!
//! Builds the table of fixed-size index records that follows the header,
//! and searches it by record type and plugin id.

use byteorder::{ByteOrder, LittleEndian};
use log::{debug, info, warn};
use crate::ceb::types::models::{
    IndexEntry, IndexKey, PluginId, RecordType, INDEX_ENTRY_SIZE, PLUGIN_ID_LEN,
};

/// Reads `count` index records starting at `header_size`.
///
/// Entry `i` is read from `header_size + i * INDEX_ENTRY_SIZE`. The table
/// is not checked against the file length: slots that run past the end of
/// `bytes` are read with the missing bytes as zero, so the result always
/// holds exactly `count` entries. Payload offsets are checked when read.
pub fn build(bytes: &[u8], count: u16, header_size: usize) -> Vec<IndexEntry> {
    info!("Building index table: {} entries", count);

    let table_end = header_size + count as usize * INDEX_ENTRY_SIZE;
    if table_end > bytes.len() {
        warn!(
            "Index table ends at byte {} but file holds {} bytes",
            table_end,
            bytes.len()
        );
    }

    let entries: Vec<IndexEntry> = (0..count as usize)
        .map(|i| {
            let start = header_size + i * INDEX_ENTRY_SIZE;
            let mut slot = [0u8; INDEX_ENTRY_SIZE];
            if let Some(available) = bytes.get(start..) {
                let n = available.len().min(INDEX_ENTRY_SIZE);
                slot[..n].copy_from_slice(&available[..n]);
            }
            decode_entry(&slot)
        })
        .collect();

    debug!("Index table built with {} entries", entries.len());
    entries
}

/// Decodes one index record.
///
/// ```text
/// [1 byte ] Record type
/// [8 bytes] Plugin id
/// [4 bytes] Data offset (little-endian u32)
/// [4 bytes] Data length (little-endian u32)
/// ```
pub fn decode_entry(slot: &[u8; INDEX_ENTRY_SIZE]) -> IndexEntry {
    let mut plugin_id = [0u8; PLUGIN_ID_LEN];
    plugin_id.copy_from_slice(&slot[1..1 + PLUGIN_ID_LEN]);
    let fields = &slot[1 + PLUGIN_ID_LEN..];

    IndexEntry {
        record_type: RecordType(slot[0]),
        plugin_id: PluginId(plugin_id),
        data_offset: LittleEndian::read_u32(&fields[..4]),
        data_length: LittleEndian::read_u32(&fields[4..8]),
    }
}

/// Position of the first entry matching `key`, in file order.
pub fn position(entries: &[IndexEntry], key: &IndexKey) -> Option<usize> {
    if entries.is_empty() {
        return None;
    }
    entries.iter().position(|entry| key.matches(entry))
}

/// First entry matching `key`, in file order.
pub fn find<'a>(entries: &'a [IndexEntry], key: &IndexKey) -> Option<&'a IndexEntry> {
    position(entries, key).map(|i| &entries[i])
}
