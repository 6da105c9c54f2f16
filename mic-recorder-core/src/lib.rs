//! # mic-recorder-core
//!
//! Platform-agnostic core of the microcontroller voice recorder.
//!
//! Owns the sample buffer lifecycle and the RIFF/WAVE serialization that
//! turns raw ADC readings into a playable 16-bit PCM file. Concrete storage
//! media (SD card, internal flash) implement the `StorageBackend` trait and
//! live in `mic-recorder-storage`.
//!
//! ## Architecture
//!
//! ```text
//! mic-recorder-core (this crate)
//! ├── traits/       ← StorageBackend, StorageHandle, SampleSource, RecorderDelegate
//! ├── models/       ← RecorderError, AudioFormat, RecorderConfig, RecordingResult, timestamps
//! ├── processing/   ← SampleBuffer, AdcRange remap, WAV header generation/parsing
//! ├── session/      ← RecordingSession (arm → capture → save → release)
//! └── storage/      ← WavWriter, event log file, metadata sidecar
//! ```

pub mod models;
pub mod processing;
pub mod session;
pub mod storage;
pub mod traits;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export key types at crate root for convenience.
pub use models::config::RecorderConfig;
pub use models::error::RecorderError;
pub use models::format::AudioFormat;
pub use models::recording_result::{RecordingMetadata, RecordingResult};
pub use processing::remap::AdcRange;
pub use processing::sample_buffer::SampleBuffer;
pub use processing::wav_format::WavHeader;
pub use session::recorder::RecordingSession;
pub use storage::wav_writer::WavWriter;
pub use traits::recorder_delegate::RecorderDelegate;
pub use traits::sample_source::SampleSource;
pub use traits::storage_backend::{OpenMode, StorageBackend, StorageHandle, MAX_PATH_LENGTH};
