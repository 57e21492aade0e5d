//! Record log frame format.
//!
//! ```text
//! | magic "DSRL" (4) | payload len u32 LE (4) | CBOR(StoredRow) | crc32 u32 LE (4) |
//! ```
//!
//! The checksum covers the magic, the length and the payload.

use crate::error::{StorageError, StorageResult};
use crate::row::StoredRow;

/// Magic bytes opening every frame.
pub(crate) const FRAME_MAGIC: [u8; 4] = *b"DSRL";

/// Size of the fixed frame header.
pub(crate) const HEADER_LEN: usize = 8;

/// Size of the checksum trailer.
pub(crate) const CRC_LEN: usize = 4;

/// Largest payload a frame may carry.
pub(crate) const MAX_PAYLOAD_LEN: usize = 16 * 1024 * 1024;

/// Outcome of decoding the frame at some offset.
#[derive(Debug)]
pub(crate) enum Frame {
    /// A complete frame and its total encoded length.
    Row(StoredRow, usize),
    /// The buffer ends inside this frame.
    Torn,
}

/// Encodes a row into a complete frame.
pub(crate) fn encode_frame(row: &StoredRow) -> StorageResult<Vec<u8>> {
    let mut payload = Vec::new();
    ciborium::into_writer(row, &mut payload).map_err(|e| StorageError::Codec(e.to_string()))?;

    if payload.len() > MAX_PAYLOAD_LEN {
        return Err(StorageError::Codec(format!(
            "row too large: {} bytes",
            payload.len()
        )));
    }
    let len = payload.len() as u32;

    let mut frame = Vec::with_capacity(HEADER_LEN + payload.len() + CRC_LEN);
    frame.extend_from_slice(&FRAME_MAGIC);
    frame.extend_from_slice(&len.to_le_bytes());
    frame.extend_from_slice(&payload);
    let crc = compute_crc32(&frame);
    frame.extend_from_slice(&crc.to_le_bytes());
    Ok(frame)
}

/// Decodes the frame starting at the beginning of `buf`.
///
/// `buf` must run to the end of the log: a frame is only reported as
/// [`Frame::Torn`] when the log ends inside it. `offset` is the position
/// of `buf` in the log and only used for errors.
pub(crate) fn decode_frame(buf: &[u8], offset: u64) -> StorageResult<Frame> {
    if buf.len() < HEADER_LEN {
        if FRAME_MAGIC.starts_with(&buf[..buf.len().min(FRAME_MAGIC.len())]) {
            return Ok(Frame::Torn);
        }
        return Err(StorageError::corrupted(offset, "bad frame magic"));
    }
    if buf[0..4] != FRAME_MAGIC {
        return Err(StorageError::corrupted(offset, "bad frame magic"));
    }

    let len = u32::from_le_bytes([buf[4], buf[5], buf[6], buf[7]]) as usize;
    if len > MAX_PAYLOAD_LEN {
        return Err(StorageError::corrupted(
            offset,
            format!("frame length {len} out of range"),
        ));
    }

    let payload_end = HEADER_LEN + len;
    let end = payload_end + CRC_LEN;
    if buf.len() < end {
        // A later complete frame means this one is not the tail
        if contains_frame(&buf[HEADER_LEN..]) {
            return Err(StorageError::corrupted(
                offset,
                format!("frame length {len} runs past the end of the log"),
            ));
        }
        return Ok(Frame::Torn);
    }

    let stored = u32::from_le_bytes([
        buf[payload_end],
        buf[payload_end + 1],
        buf[payload_end + 2],
        buf[payload_end + 3],
    ]);
    if compute_crc32(&buf[..payload_end]) != stored {
        return Err(StorageError::corrupted(offset, "checksum mismatch"));
    }

    let row: StoredRow = ciborium::from_reader(&buf[HEADER_LEN..payload_end])
        .map_err(|e| StorageError::corrupted(offset, format!("undecodable row: {e}")))?;
    Ok(Frame::Row(row, end))
}

/// Whether a complete, checksum-valid frame starts anywhere in `buf`.
fn contains_frame(buf: &[u8]) -> bool {
    buf.windows(FRAME_MAGIC.len())
        .enumerate()
        .filter(|(_, window)| *window == FRAME_MAGIC)
        .any(|(start, _)| is_complete_frame(&buf[start..]))
}

fn is_complete_frame(buf: &[u8]) -> bool {
    if buf.len() < HEADER_LEN + CRC_LEN {
        return false;
    }
    let len = u32::from_le_bytes([buf[4], buf[5], buf[6], buf[7]]) as usize;
    if len > MAX_PAYLOAD_LEN || buf.len() < HEADER_LEN + len + CRC_LEN {
        return false;
    }
    let payload_end = HEADER_LEN + len;
    let stored = u32::from_le_bytes([
        buf[payload_end],
        buf[payload_end + 1],
        buf[payload_end + 2],
        buf[payload_end + 3],
    ]);
    compute_crc32(&buf[..payload_end]) == stored
}

/// Computes CRC32 checksum for data.
pub(crate) fn compute_crc32(data: &[u8]) -> u32 {
    // IEEE polynomial, table built at compile time
    const CRC32_TABLE: [u32; 256] = {
        let mut table = [0u32; 256];
        let mut i = 0;
        while i < 256 {
            let mut crc = i as u32;
            let mut j = 0;
            while j < 8 {
                if crc & 1 != 0 {
                    crc = (crc >> 1) ^ 0xEDB8_8320;
                } else {
                    crc >>= 1;
                }
                j += 1;
            }
            table[i] = crc;
            i += 1;
        }
        table
    };

    let mut crc = 0xFFFF_FFFF_u32;
    for &byte in data {
        let index = ((crc ^ u32::from(byte)) & 0xFF) as usize;
        crc = (crc >> 8) ^ CRC32_TABLE[index];
    }
    !crc
}
