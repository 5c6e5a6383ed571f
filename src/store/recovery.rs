//! Store Recovery
//!
//! Rebuilds the key index from the frame log on open and removes any torn
//! tail left by a crash mid-commit.

use std::collections::BTreeMap;
use std::fs::{File, OpenOptions};
use std::io::{self, BufReader, Read};
use std::path::Path;

use crate::error::Result;

use super::frame::{
    check_file_header, checksum, decode_payload, FrameHeader, FILE_HEADER_SIZE,
    FRAME_HEADER_SIZE,
};

/// Where a value lives in the store file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValueLocation {
    /// Absolute file offset of the value bytes
    pub offset: u64,
    /// Value length in bytes
    pub len: u32,
}

/// Key → latest value location
pub type StoreIndex = BTreeMap<Vec<u8>, ValueLocation>;

/// Result of a recovery scan
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecoveryResult {
    /// Number of complete frames replayed into the index
    pub frames_recovered: u64,

    /// Number of frames rejected for a bad checksum or layout
    pub frames_corrupted: u64,

    /// Sequence number of the last good frame (0 if none)
    pub last_seq: u64,

    /// Whether bytes past the last good frame were (or would be) removed
    pub was_truncated: bool,

    /// File length covering the header and all good frames
    pub valid_len: u64,
}

/// Handles store recovery after a crash
pub struct Recovery;

impl Recovery {
    /// Scan a store file, truncate any bad tail, and return the index
    ///
    /// This will:
    /// 1. Validate the file header
    /// 2. Replay frames in order while they are complete and intact
    /// 3. Stop at the first torn or corrupted frame
    /// 4. Truncate the file to the end of the last good frame
    pub fn recover(path: &Path) -> Result<(StoreIndex, RecoveryResult)> {
        let (index, result) = Self::scan(path)?;

        if result.was_truncated {
            let file = OpenOptions::new().write(true).open(path)?;
            file.set_len(result.valid_len)?;
            file.sync_all()?;

            tracing::warn!(
                path = %path.display(),
                valid_len = result.valid_len,
                frames_corrupted = result.frames_corrupted,
                "truncated incomplete batch at store tail"
            );
        }

        Ok((index, result))
    }

    /// Verify integrity of a store file without modifying it
    pub fn verify(path: &Path) -> Result<RecoveryResult> {
        let (_, result) = Self::scan(path)?;
        Ok(result)
    }

    /// Rebuild the index from a store file without modifying it
    ///
    /// `was_truncated` reports a bad tail that `recover` would remove; the
    /// returned index covers only the frames before it.
    pub fn scan(path: &Path) -> Result<(StoreIndex, RecoveryResult)> {
        let file = File::open(path)?;
        let file_len = file.metadata()?.len();
        let mut reader = BufReader::new(file);
        let mut index = StoreIndex::new();
        let mut result = RecoveryResult::default();

        // A crash before the header landed leaves a short file; start over
        if file_len < FILE_HEADER_SIZE {
            result.was_truncated = file_len > 0;
            return Ok((index, result));
        }

        let mut header = [0u8; FILE_HEADER_SIZE as usize];
        reader.read_exact(&mut header)?;
        check_file_header(&header)?;

        let mut pos = FILE_HEADER_SIZE;
        result.valid_len = pos;

        loop {
            let mut frame_header = [0u8; FRAME_HEADER_SIZE];
            let read = read_full(&mut reader, &mut frame_header)?;
            if read == 0 {
                break;
            }
            if read < FRAME_HEADER_SIZE {
                result.was_truncated = true;
                break;
            }

            let header = FrameHeader::decode(&frame_header);
            let payload_start = pos + FRAME_HEADER_SIZE as u64;
            if payload_start + header.len as u64 > file_len {
                result.was_truncated = true;
                break;
            }

            let mut payload = vec![0u8; header.len as usize];
            reader.read_exact(&mut payload)?;

            if header.seq != result.last_seq + 1 || checksum(&payload) != header.crc {
                result.frames_corrupted += 1;
                result.was_truncated = true;
                break;
            }

            let entries = match decode_payload(&payload) {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::debug!(seq = header.seq, error = %e, "undecodable frame");
                    result.frames_corrupted += 1;
                    result.was_truncated = true;
                    break;
                }
            };

            for entry in entries {
                index.insert(
                    entry.key,
                    ValueLocation {
                        offset: payload_start + entry.value_offset as u64,
                        len: entry.value_len,
                    },
                );
            }

            pos = payload_start + header.len as u64;
            result.frames_recovered += 1;
            result.last_seq = header.seq;
            result.valid_len = pos;
        }

        Ok((index, result))
    }
}

/// Read until `buf` is full or EOF; returns bytes read
fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
