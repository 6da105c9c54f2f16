use std::rc::Rc;

use chrono::NaiveDateTime;
use sha2::{Digest, Sha256};

use crate::models::config::RecorderConfig;
use crate::models::error::RecorderError;
use crate::models::format::AudioFormat;
use crate::models::recording_result::{duration_secs, RecordingMetadata, RecordingResult};
use crate::models::timestamp::{format_timestamp, indexed_recording_path, recording_path, MAX_COLLISION_INDEX};
use crate::processing::sample_buffer::SampleBuffer;
use crate::storage::event_log::{append_entry, LogLevel};
use crate::storage::metadata::write_metadata;
use crate::storage::wav_writer::WavWriter;
use crate::traits::recorder_delegate::RecorderDelegate;
use crate::traits::sample_source::SampleSource;
use crate::traits::storage_backend::StorageBackend;

/// One recorder: a sample buffer plus the format it is written with.
///
/// Lifecycle:
/// ```text
/// arm (allocate) → capture (fill) → save (WAV + sidecar) → release
/// ```
///
/// The buffer is released by `release`, by the next `arm`, or when the
/// session is dropped, whichever comes first. Single-threaded: one session
/// performs at most one save at a time.
pub struct RecordingSession {
    config: RecorderConfig,
    format: AudioFormat,
    writer: WavWriter,
    buffer: SampleBuffer,
    delegate: Option<Rc<dyn RecorderDelegate>>,
}

impl RecordingSession {
    pub fn new(config: RecorderConfig) -> Result<Self, RecorderError> {
        config.validate().map_err(RecorderError::ConfigurationFailed)?;
        let format = config.audio_format()?;
        let writer = WavWriter::new(config.adc_range()?);

        Ok(Self {
            config,
            format,
            writer,
            buffer: SampleBuffer::new(),
            delegate: None,
        })
    }

    pub fn set_delegate(&mut self, delegate: Rc<dyn RecorderDelegate>) {
        self.delegate = Some(delegate);
    }

    pub fn config(&self) -> &RecorderConfig {
        &self.config
    }

    pub fn format(&self) -> &AudioFormat {
        &self.format
    }

    pub fn buffer(&self) -> &SampleBuffer {
        &self.buffer
    }

    pub fn buffer_mut(&mut self) -> &mut SampleBuffer {
        &mut self.buffer
    }

    /// Allocate the buffer for one configured recording.
    pub fn arm(&mut self) -> Result<usize, RecorderError> {
        let sample_count = match self.allocate() {
            Ok(count) => count,
            Err(e) => {
                self.notify_error(&e);
                return Err(e);
            }
        };

        log::info!(
            "Armed recorder: {} samples ({} s at {} Hz, {} ch)",
            sample_count,
            self.config.duration_secs,
            self.format.sample_rate(),
            self.format.channels()
        );
        if let Some(ref delegate) = self.delegate {
            delegate.on_armed(sample_count);
        }
        Ok(sample_count)
    }

    /// Fill the armed buffer from `source`.
    pub fn capture(&mut self, source: &mut dyn SampleSource) -> Result<usize, RecorderError> {
        if self.buffer.is_empty() {
            let e = RecorderError::InvalidState("capture before arm".into());
            self.notify_error(&e);
            return Err(e);
        }
        self.buffer.fill_from(source).map_err(|e| {
            self.notify_error(&e);
            e
        })
    }

    /// Write the buffer as a WAV file plus JSON sidecar on `store`.
    ///
    /// The file is named after `time`; an existing recording with the same
    /// name is never overwritten. Failures are reported to the delegate and
    /// appended to the event log before being returned.
    pub fn save(&self, store: &dyn StorageBackend, time: &NaiveDateTime) -> Result<RecordingResult, RecorderError> {
        match self.save_inner(store, time) {
            Ok(result) => {
                if let Some(ref delegate) = self.delegate {
                    delegate.on_recording_saved(&result);
                }
                Ok(result)
            }
            Err(e) => {
                self.notify_error(&e);
                if let Err(log_err) =
                    append_entry(store, &self.config.log_file, LogLevel::Error, &e.to_string(), time)
                {
                    log::warn!("Failed to append to event log: {}", log_err);
                }
                Err(e)
            }
        }
    }

    /// Free the sample buffer.
    pub fn release(&mut self) {
        self.buffer.release();
    }

    fn allocate(&mut self) -> Result<usize, RecorderError> {
        let sample_count = self.config.sample_count()?;
        self.buffer.allocate(sample_count)?;
        Ok(sample_count)
    }

    fn save_inner(&self, store: &dyn StorageBackend, time: &NaiveDateTime) -> Result<RecordingResult, RecorderError> {
        let path = unique_recording_path(store, &self.config.recording_prefix, time)?;
        let header = self.writer.write(&self.buffer, &self.format, store, &path)?;

        let checksum = hex_encode(&Sha256::digest(store.read(&path)?));
        let metadata = RecordingMetadata::new(&path, &format_timestamp(time), &header, &checksum, store.name());
        write_metadata(store, &metadata, &path)?;

        Ok(RecordingResult {
            file_path: path,
            duration_secs: duration_secs(&header),
            metadata,
            checksum,
        })
    }

    fn notify_error(&self, error: &RecorderError) {
        log::error!("Recorder error: {}", error);
        if let Some(ref delegate) = self.delegate {
            delegate.on_error(error);
        }
    }
}

/// First free path for a recording at `time`, adding `_1`, `_2`, ... on collision.
fn unique_recording_path(
    store: &dyn StorageBackend,
    prefix: &str,
    time: &NaiveDateTime,
) -> Result<String, RecorderError> {
    let base = recording_path(prefix, time);
    if !store.exists(&base) {
        return Ok(base);
    }
    (1..=MAX_COLLISION_INDEX)
        .map(|n| indexed_recording_path(prefix, time, n))
        .find(|candidate| !store.exists(candidate))
        .ok_or_else(|| {
            RecorderError::InvalidState(format!(
                "{} recordings already share the name {}",
                MAX_COLLISION_INDEX + 1,
                base
            ))
        })
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}
