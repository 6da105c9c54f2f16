use crate::models::error::RecorderError;
use crate::models::recording_result::RecordingMetadata;
use crate::traits::storage_backend::{write_file, StorageBackend};

/// Sidecar path for a recording: `/rec_x.wav` → `/rec_x.json`.
pub fn sidecar_path(recording_path: &str) -> String {
    let stem = recording_path.strip_suffix(".wav").unwrap_or(recording_path);
    format!("{}.json", stem)
}

/// Write recording metadata as a JSON sidecar file next to the recording.
pub fn write_metadata(
    store: &dyn StorageBackend,
    metadata: &RecordingMetadata,
    recording_path: &str,
) -> Result<(), RecorderError> {
    let json = serde_json::to_vec_pretty(metadata)
        .map_err(|e| RecorderError::BackendUnavailable(format!("failed to serialize metadata: {}", e)))?;
    write_file(store, &sidecar_path(recording_path), &json)
}

/// Read recording metadata from its JSON sidecar file.
pub fn read_metadata(store: &dyn StorageBackend, recording_path: &str) -> Result<RecordingMetadata, RecorderError> {
    let bytes = store.read(&sidecar_path(recording_path))?;
    serde_json::from_slice(&bytes)
        .map_err(|e| RecorderError::BackendUnavailable(format!("failed to parse metadata: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::format::AudioFormat;
    use crate::processing::wav_format::WavHeader;
    use crate::test_support::MemoryStore;

    #[test]
    fn sidecar_replaces_wav_extension() {
        assert_eq!(sidecar_path("/rec_20240101_000000.wav"), "/rec_20240101_000000.json");
        assert_eq!(sidecar_path("/raw"), "/raw.json");
    }

    #[test]
    fn metadata_round_trips_through_store() {
        let store = MemoryStore::new();
        let header = WavHeader::for_payload(&AudioFormat::mono(16000).unwrap(), 64000).unwrap();
        let metadata = RecordingMetadata::new("/rec.wav", "2024-01-01 00:00:00", &header, "abc", "memory");

        write_metadata(&store, &metadata, "/rec.wav").unwrap();
        let loaded = read_metadata(&store, "/rec.wav").unwrap();

        assert_eq!(loaded, metadata);
        assert_eq!(loaded.duration_secs, 2.0);
    }
}
