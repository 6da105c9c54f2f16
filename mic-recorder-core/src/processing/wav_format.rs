//! WAV container layout.
//!
//! Generates and parses the standard 44-byte RIFF/WAVE header for
//! uncompressed PCM.

use crate::models::error::RecorderError;
use crate::models::format::AudioFormat;

/// Size of the standard WAV RIFF header in bytes.
pub const WAV_HEADER_SIZE: usize = 44;

/// RIFF size field counts everything after itself: `WAV_HEADER_SIZE - 8` plus the payload.
pub const RIFF_SIZE_OVERHEAD: u32 = 36;

const PCM_FORMAT_CHUNK_SIZE: u32 = 16;
const PCM_FORMAT_CODE: u16 = 1;

/// Decoded header fields.
///
/// Built fresh from an `AudioFormat` and a payload length for every write;
/// never stored alongside a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavHeader {
    pub channels: u16,
    pub sample_rate: u32,
    pub byte_rate: u32,
    pub block_align: u16,
    pub bit_depth: u16,
    pub payload_bytes: u32,
}

impl WavHeader {
    /// Derive every header field from `format` and the payload length.
    pub fn for_payload(format: &AudioFormat, payload_bytes: u32) -> Result<Self, RecorderError> {
        if payload_bytes > u32::MAX - RIFF_SIZE_OVERHEAD {
            return Err(RecorderError::InvalidState(format!(
                "payload of {} bytes does not fit a RIFF container",
                payload_bytes
            )));
        }
        Ok(Self {
            channels: format.channels(),
            sample_rate: format.sample_rate(),
            byte_rate: format.byte_rate(),
            block_align: format.block_align(),
            bit_depth: format.bit_depth(),
            payload_bytes,
        })
    }

    /// `36 + payload_bytes`: the file length minus the 8-byte RIFF preamble.
    pub fn total_size(&self) -> u32 {
        RIFF_SIZE_OVERHEAD + self.payload_bytes
    }

    /// Encode the header.
    ///
    /// Layout:
    /// ```text
    /// [0-3]    "RIFF"
    /// [4-7]    36 + payload_bytes
    /// [8-11]   "WAVE"
    /// [12-15]  "fmt "
    /// [16-19]  16 (PCM format chunk size)
    /// [20-21]  1 (PCM format code)
    /// [22-23]  channels
    /// [24-27]  sample_rate
    /// [28-31]  byte_rate = sample_rate * block_align
    /// [32-33]  block_align = channels * bit_depth / 8
    /// [34-35]  bit_depth
    /// [36-39]  "data"
    /// [40-43]  payload_bytes
    /// ```
    pub fn to_bytes(&self) -> [u8; WAV_HEADER_SIZE] {
        let mut header = [0u8; WAV_HEADER_SIZE];

        // RIFF chunk descriptor
        header[0..4].copy_from_slice(b"RIFF");
        header[4..8].copy_from_slice(&self.total_size().to_le_bytes());
        header[8..12].copy_from_slice(b"WAVE");

        // fmt sub-chunk
        header[12..16].copy_from_slice(b"fmt ");
        header[16..20].copy_from_slice(&PCM_FORMAT_CHUNK_SIZE.to_le_bytes());
        header[20..22].copy_from_slice(&PCM_FORMAT_CODE.to_le_bytes());
        header[22..24].copy_from_slice(&self.channels.to_le_bytes());
        header[24..28].copy_from_slice(&self.sample_rate.to_le_bytes());
        header[28..32].copy_from_slice(&self.byte_rate.to_le_bytes());
        header[32..34].copy_from_slice(&self.block_align.to_le_bytes());
        header[34..36].copy_from_slice(&self.bit_depth.to_le_bytes());

        // data sub-chunk
        header[36..40].copy_from_slice(b"data");
        header[40..44].copy_from_slice(&self.payload_bytes.to_le_bytes());

        header
    }

    /// Decode the first 44 bytes of a file written by this crate.
    ///
    /// Only the canonical layout is accepted: `fmt ` immediately followed by
    /// `data`, uncompressed PCM.
    pub fn parse(bytes: &[u8]) -> Result<Self, RecorderError> {
        if bytes.len() < WAV_HEADER_SIZE {
            return Err(RecorderError::CorruptContainer(format!(
                "header too short: {} bytes",
                bytes.len()
            )));
        }

        expect_tag(bytes, 0, b"RIFF")?;
        expect_tag(bytes, 8, b"WAVE")?;
        expect_tag(bytes, 12, b"fmt ")?;
        expect_tag(bytes, 36, b"data")?;

        let fmt_size = read_u32(bytes, 16);
        if fmt_size != PCM_FORMAT_CHUNK_SIZE {
            return Err(RecorderError::CorruptContainer(format!(
                "unexpected fmt chunk size: {}",
                fmt_size
            )));
        }
        let format_code = read_u16(bytes, 20);
        if format_code != PCM_FORMAT_CODE {
            return Err(RecorderError::CorruptContainer(format!(
                "unsupported format code: {}",
                format_code
            )));
        }

        let header = Self {
            channels: read_u16(bytes, 22),
            sample_rate: read_u32(bytes, 24),
            byte_rate: read_u32(bytes, 28),
            block_align: read_u16(bytes, 32),
            bit_depth: read_u16(bytes, 34),
            payload_bytes: read_u32(bytes, 40),
        };

        let total_size = read_u32(bytes, 4);
        if total_size != header.total_size() {
            return Err(RecorderError::CorruptContainer(format!(
                "RIFF size {} does not match payload of {} bytes",
                total_size, header.payload_bytes
            )));
        }

        Ok(header)
    }
}

fn expect_tag(bytes: &[u8], offset: usize, tag: &[u8; 4]) -> Result<(), RecorderError> {
    if &bytes[offset..offset + 4] != tag {
        return Err(RecorderError::CorruptContainer(format!(
            "missing {} tag at offset {}",
            String::from_utf8_lossy(tag),
            offset
        )));
    }
    Ok(())
}

fn read_u16(bytes: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([bytes[offset], bytes[offset + 1]])
}

fn read_u32(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([bytes[offset], bytes[offset + 1], bytes[offset + 2], bytes[offset + 3]])
}
