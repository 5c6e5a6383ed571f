//! Batch frame codec
//!
//! Encoding and decoding of the on-disk unit of atomicity: one frame per
//! committed batch.
//!
//! ## Frame Format
//! ```text
//! ┌─────────┬─────────┬─────────┬──────────────────────────────┐
//! │ Seq (8) │ CRC (4) │ Len (4) │          Payload             │
//! └─────────┴─────────┴─────────┴──────────────────────────────┘
//!
//! Payload:
//!   [Count: u32]
//!   [KeyLen: u32][ValLen: u32][Key][Value]
//!   ... repeated Count times ...
//! ```
//! All integers are little-endian. CRC32 covers the payload only.

use std::fs::File;
use std::io::{self, Seek, SeekFrom, Write};

use crate::error::{DatasetError, Result};

use super::Value;

/// Magic bytes identifying a crnnkv store file
pub const MAGIC: &[u8; 4] = b"CRKV";

/// Current store format version
pub const VERSION: u16 = 1;

/// File header size: Magic (4) + Version (2) = 6 bytes
pub const FILE_HEADER_SIZE: u64 = 6;

/// Frame header size: Seq (8) + CRC (4) + Len (4) = 16 bytes
pub const FRAME_HEADER_SIZE: usize = 16;

/// Per-entry header size: KeyLen (4) + ValLen (4) = 8 bytes
const ENTRY_HEADER_SIZE: usize = 8;

/// Encoded file header
pub fn file_header() -> [u8; FILE_HEADER_SIZE as usize] {
    let mut header = [0u8; FILE_HEADER_SIZE as usize];
    header[0..4].copy_from_slice(MAGIC);
    header[4..6].copy_from_slice(&VERSION.to_le_bytes());
    header
}

/// Validate a file header read from disk
pub fn check_file_header(header: &[u8]) -> Result<()> {
    if header.len() < FILE_HEADER_SIZE as usize || &header[0..4] != MAGIC {
        return Err(DatasetError::Corruption(format!(
            "Invalid store magic: expected CRKV, got {:?}",
            &header[..header.len().min(4)]
        )));
    }

    let version = u16::from_le_bytes([header[4], header[5]]);
    if version != VERSION {
        return Err(DatasetError::Corruption(format!(
            "Unsupported store version: {}",
            version
        )));
    }

    Ok(())
}

/// Fixed-size frame header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    /// Commit sequence number, starting at 1
    pub seq: u64,
    /// CRC32 of the payload
    pub crc: u32,
    /// Payload length in bytes
    pub len: u32,
}

impl FrameHeader {
    pub fn decode(bytes: &[u8; FRAME_HEADER_SIZE]) -> Self {
        let mut seq = [0u8; 8];
        seq.copy_from_slice(&bytes[0..8]);
        let mut crc = [0u8; 4];
        crc.copy_from_slice(&bytes[8..12]);
        let mut len = [0u8; 4];
        len.copy_from_slice(&bytes[12..16]);

        Self {
            seq: u64::from_le_bytes(seq),
            crc: u32::from_le_bytes(crc),
            len: u32::from_le_bytes(len),
        }
    }
}

/// Location of one entry inside a decoded payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayloadEntry {
    pub key: Vec<u8>,
    /// Offset of the value bytes, relative to the payload start
    pub value_offset: usize,
    pub value_len: u32,
}

/// CRC32 of a payload
pub fn checksum(payload: &[u8]) -> u32 {
    crc32fast::hash(payload)
}

/// Encode a batch of entries into a complete frame (header + payload)
pub fn encode_frame(seq: u64, entries: &[(String, Value)]) -> Result<Vec<u8>> {
    let count = u32::try_from(entries.len())
        .map_err(|_| DatasetError::Storage(format!("Too many entries in batch: {}", entries.len())))?;

    let payload_len: usize = 4 + entries
        .iter()
        .map(|(key, value)| ENTRY_HEADER_SIZE + key.len() + value.len())
        .sum::<usize>();
    let len = u32::try_from(payload_len)
        .map_err(|_| DatasetError::Storage(format!("Batch too large: {} bytes", payload_len)))?;

    let mut frame = Vec::with_capacity(FRAME_HEADER_SIZE + payload_len);
    frame.extend_from_slice(&seq.to_le_bytes());
    frame.extend_from_slice(&[0u8; 4]); // CRC placeholder
    frame.extend_from_slice(&len.to_le_bytes());

    frame.extend_from_slice(&count.to_le_bytes());
    for (key, value) in entries {
        let bytes = value.as_bytes();
        frame.extend_from_slice(&(key.len() as u32).to_le_bytes());
        frame.extend_from_slice(&(bytes.len() as u32).to_le_bytes());
        frame.extend_from_slice(key.as_bytes());
        frame.extend_from_slice(bytes);
    }

    let crc = checksum(&frame[FRAME_HEADER_SIZE..]);
    frame[8..12].copy_from_slice(&crc.to_le_bytes());

    Ok(frame)
}

/// Decode the entry layout of a payload whose CRC has already been checked
pub fn decode_payload(payload: &[u8]) -> Result<Vec<PayloadEntry>> {
    if payload.len() < 4 {
        return Err(DatasetError::Corruption(
            "Frame payload: missing entry count".to_string(),
        ));
    }

    let count = read_u32(payload, 0) as usize;
    let mut entries = Vec::with_capacity(count.min(payload.len() / ENTRY_HEADER_SIZE));
    let mut pos = 4;

    for i in 0..count {
        if pos + ENTRY_HEADER_SIZE > payload.len() {
            return Err(DatasetError::Corruption(format!(
                "Frame payload: entry {} header out of bounds",
                i
            )));
        }
        let key_len = read_u32(payload, pos) as usize;
        let value_len = read_u32(payload, pos + 4);
        pos += ENTRY_HEADER_SIZE;

        let value_offset = pos + key_len;
        let end = value_offset + value_len as usize;
        if end > payload.len() {
            return Err(DatasetError::Corruption(format!(
                "Frame payload: entry {} data out of bounds (needs {}, have {})",
                i,
                end,
                payload.len()
            )));
        }

        entries.push(PayloadEntry {
            key: payload[pos..value_offset].to_vec(),
            value_offset,
            value_len,
        });
        pos = end;
    }

    if pos != payload.len() {
        return Err(DatasetError::Corruption(format!(
            "Frame payload: {} trailing bytes",
            payload.len() - pos
        )));
    }

    Ok(entries)
}

fn read_u32(bytes: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}

// =============================================================================
// Appending
// =============================================================================

/// A seekable file a frame can be appended to
pub trait FrameSink: Write + Seek {
    /// Flush file contents to disk
    fn sync_data(&mut self) -> io::Result<()>;

    /// Truncate or extend to `len` bytes
    fn set_len(&mut self, len: u64) -> io::Result<()>;
}

impl FrameSink for File {
    fn sync_data(&mut self) -> io::Result<()> {
        File::sync_data(self)
    }

    fn set_len(&mut self, len: u64) -> io::Result<()> {
        File::set_len(self, len)
    }
}

/// Write `frame` at `start`, optionally syncing it
///
/// If the write or the sync fails, the sink is truncated back to `start`
/// so no partial or unacknowledged frame is left behind.
pub fn append_frame<S: FrameSink>(
    sink: &mut S,
    start: u64,
    frame: &[u8],
    sync: bool,
) -> Result<()> {
    sink.seek(SeekFrom::Start(start))?;

    let written = sink.write_all(frame).and_then(|()| {
        if sync {
            sink.sync_data()
        } else {
            Ok(())
        }
    });

    if let Err(e) = written {
        sink.set_len(start)?;
        return Err(e.into());
    }
    Ok(())
}
