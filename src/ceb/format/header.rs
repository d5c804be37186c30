//! CEB file header parsing and version detection.
//!
//! This module handles:
//! - Validating the copyright signature
//! - Telling the modern version layout from the legacy text layout
//! - Reading the index record count

use byteorder::{ByteOrder, LittleEndian};
use log::{debug, info, trace};
use crate::ceb::types::{
    error::{CebError, Result},
    models::{
        FileHeader, FormatVersion, VersionLayout, HEADER_SIZE, MAJORVER_OFFSET,
        MINORVER_OFFSET, SIGNATURE, SIGNATURE_LEN, VERSION_INFO_LEN,
    },
};

/// Highest major version a legacy text header may claim.
const LEGACY_MAJOR_CAP: u8 = 2;

/// Parses the fixed-size header from the start of the file.
///
/// # Header Structure
/// ```text
/// [11 bytes] Copyright signature
/// [ 3 bytes] Zero in the modern layout, version text otherwise
/// [ 1 byte ] Major version (modern layout)
/// [ 1 byte ] Minor version (modern layout)
/// [ 2 bytes] Index record count (little-endian u16)
/// ```
pub fn parse(bytes: &[u8]) -> Result<FileHeader> {
    info!("Parsing CEB header");

    if bytes.len() < HEADER_SIZE {
        return Err(CebError::InvalidFormat(format!(
            "File too short for header: {} < {} bytes",
            bytes.len(),
            HEADER_SIZE
        )));
    }

    // Step 1: Verify the signature
    let mut copyright = [0u8; SIGNATURE_LEN];
    copyright.copy_from_slice(&bytes[..SIGNATURE_LEN]);
    if &copyright != SIGNATURE {
        return Err(CebError::InvalidFormat(format!(
            "Signature mismatch: found {:?}",
            String::from_utf8_lossy(&copyright)
        )));
    }

    let mut version_info = [0u8; VERSION_INFO_LEN];
    version_info.copy_from_slice(&bytes[..VERSION_INFO_LEN]);

    // Step 2: Detect the version layout
    let (layout, version) = detect_version(&version_info)?;

    // Step 3: Read the index record count
    let index_count = LittleEndian::read_u16(&bytes[VERSION_INFO_LEN..HEADER_SIZE]);
    trace!("Index record count: {}", index_count);

    info!(
        "Header parsed successfully: version={}, layout={:?}, index entries={}",
        version, layout, index_count
    );

    Ok(FileHeader {
        copyright,
        version_info,
        index_count,
        layout,
        version,
    })
}

/// Decides between the modern and the legacy version encoding.
///
/// Bytes 11, 12 and 13 all zero select the modern layout, in which the
/// version is stored as two raw bytes. Anything else is a legacy header
/// carrying the version as text.
pub fn detect_version(version_info: &[u8; VERSION_INFO_LEN]) -> Result<(VersionLayout, FormatVersion)> {
    if version_info[SIGNATURE_LEN..MAJORVER_OFFSET].iter().all(|&b| b == 0) {
        let version = FormatVersion::new(version_info[MAJORVER_OFFSET], version_info[MINORVER_OFFSET]);
        debug!("Modern version layout: {}", version);
        return Ok((VersionLayout::Modern, version));
    }

    let version = parse_legacy_version(version_info)?;
    Ok((VersionLayout::Legacy, version))
}

/// Parses a legacy version string such as `"Founder CEBv2.05"`.
///
/// The region is read as text up to the first NUL. Of its trailing four
/// characters the first is the major digit and the last two are the
/// minor number. A major version of 3 or more is clamped to 2: older
/// files were tagged with version strings ahead of the layout they use.
fn parse_legacy_version(version_info: &[u8; VERSION_INFO_LEN]) -> Result<FormatVersion> {
    let text_len = version_info
        .iter()
        .position(|&b| b == 0)
        .unwrap_or(VERSION_INFO_LEN);
    let text = &version_info[..text_len];
    trace!("Legacy version text: {:?}", String::from_utf8_lossy(text));

    if text.len() < 4 {
        return Err(CebError::InvalidFormat(format!(
            "Legacy version text too short: {:?}",
            String::from_utf8_lossy(text)
        )));
    }
    let tail = &text[text.len() - 4..];

    let major = parse_decimal(&tail[..1])?;
    let minor = parse_decimal(&tail[2..])?;

    let major = if major >= 3 {
        debug!("Legacy major version {} clamped to {}", major, LEGACY_MAJOR_CAP);
        LEGACY_MAJOR_CAP
    } else {
        major
    };

    let version = FormatVersion::new(major, minor);
    debug!("Legacy version layout: {}", version);
    Ok(version)
}

fn parse_decimal(digits: &[u8]) -> Result<u8> {
    std::str::from_utf8(digits)
        .ok()
        .filter(|s| s.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|s| s.parse::<u8>().ok())
        .ok_or_else(|| {
            CebError::InvalidFormat(format!(
                "Unparseable version text: {:?}",
                String::from_utf8_lossy(digits)
            ))
        })
}
