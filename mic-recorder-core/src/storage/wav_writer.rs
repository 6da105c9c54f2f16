use crate::models::error::RecorderError;
use crate::models::format::AudioFormat;
use crate::processing::remap::AdcRange;
use crate::processing::sample_buffer::SampleBuffer;
use crate::processing::wav_format::{WavHeader, WAV_HEADER_SIZE};
use crate::traits::storage_backend::{write_all, OpenMode, StorageBackend, StorageHandle};

/// Samples remapped per backend write call.
const CHUNK_SAMPLES: usize = 256;

/// Serializes a filled `SampleBuffer` into a WAV file on a `StorageBackend`.
///
/// ## File Format
///
/// ```text
/// [44-byte WAV header]
/// [remapped 16-bit little-endian PCM, in buffer order]
/// ```
///
/// The header is derived from the format and the buffer length on every
/// call. Each raw reading is stretched from the writer's `AdcRange` onto the
/// signed 16-bit range before it is written.
#[derive(Debug, Clone, Copy, Default)]
pub struct WavWriter {
    range: AdcRange,
}

impl WavWriter {
    pub fn new(range: AdcRange) -> Self {
        Self { range }
    }

    pub fn range(&self) -> AdcRange {
        self.range
    }

    /// Write `buffer` to `path`, replacing any existing file.
    ///
    /// Fails without touching the store when the buffer is empty. Once the
    /// file is open it is closed on every path; after a failed write its
    /// contents are unspecified and should be treated as corrupt.
    pub fn write(
        &self,
        buffer: &SampleBuffer,
        format: &AudioFormat,
        store: &dyn StorageBackend,
        path: &str,
    ) -> Result<WavHeader, RecorderError> {
        if buffer.is_empty() {
            return Err(RecorderError::InvalidState("cannot write an empty sample buffer".into()));
        }

        let header = WavHeader::for_payload(format, payload_bytes(buffer.len(), format)?)?;

        let mut handle = store.open(path, OpenMode::Write).map_err(|e| {
            log::error!("Failed to open {} on {}: {}", path, store.name(), e);
            e
        })?;

        let written = self.write_body(handle.as_mut(), &header, buffer.samples());
        let closed = handle.close();

        match written.and(closed) {
            Ok(()) => {
                log::info!(
                    "Wrote {} ({} bytes, {} Hz, {} ch) to {}",
                    path,
                    WAV_HEADER_SIZE as u64 + header.payload_bytes as u64,
                    header.sample_rate,
                    header.channels,
                    store.name()
                );
                Ok(header)
            }
            Err(e) => {
                log::error!("Failed to write {}: {}", path, e);
                Err(e)
            }
        }
    }

    fn write_body(
        &self,
        handle: &mut dyn StorageHandle,
        header: &WavHeader,
        samples: &[i16],
    ) -> Result<(), RecorderError> {
        write_all(handle, &header.to_bytes())?;

        let mut chunk = [0u8; CHUNK_SAMPLES * 2];
        for block in samples.chunks(CHUNK_SAMPLES) {
            for (dst, &raw) in chunk.chunks_exact_mut(2).zip(block) {
                dst.copy_from_slice(&self.range.remap(raw).to_le_bytes());
            }
            write_all(handle, &chunk[..block.len() * 2])?;
        }
        Ok(())
    }
}

/// Payload length for `sample_count` interleaved samples.
///
/// `sample_count` must cover whole frames, and the result must fit the
/// 32-bit RIFF size fields.
pub fn payload_bytes(sample_count: usize, format: &AudioFormat) -> Result<u32, RecorderError> {
    let channels = format.channels() as usize;
    if sample_count % channels != 0 {
        return Err(RecorderError::InvalidState(format!(
            "{} samples do not fill whole {}-channel frames",
            sample_count, channels
        )));
    }

    let frames = (sample_count / channels) as u64;
    frames
        .checked_mul(format.block_align() as u64)
        .and_then(|bytes| u32::try_from(bytes).ok())
        .ok_or_else(|| {
            RecorderError::InvalidState(format!(
                "payload of {} frames does not fit a RIFF container",
                frames
            ))
        })
}
