use serde::{Deserialize, Serialize};

use crate::processing::wav_format::WavHeader;

/// Result returned when a recording has been stored.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordingResult {
    pub file_path: String,
    pub duration_secs: f64,
    pub metadata: RecordingMetadata,
    pub checksum: String,
}

/// Metadata stored as a JSON sidecar next to each recording.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordingMetadata {
    pub file_path: String,
    pub created_at: String,
    pub duration_secs: f64,
    pub sample_rate: u32,
    pub channels: u16,
    pub bit_depth: u16,
    pub payload_bytes: u32,
    pub checksum: String,
    pub storage: String,
}

impl RecordingMetadata {
    pub fn new(file_path: &str, created_at: &str, header: &WavHeader, checksum: &str, storage: &str) -> Self {
        Self {
            file_path: file_path.to_string(),
            created_at: created_at.to_string(),
            duration_secs: duration_secs(header),
            sample_rate: header.sample_rate,
            channels: header.channels,
            bit_depth: header.bit_depth,
            payload_bytes: header.payload_bytes,
            checksum: checksum.to_string(),
            storage: storage.to_string(),
        }
    }
}

/// Playback length of the payload described by `header`.
pub fn duration_secs(header: &WavHeader) -> f64 {
    if header.byte_rate == 0 {
        return 0.0;
    }
    header.payload_bytes as f64 / header.byte_rate as f64
}
