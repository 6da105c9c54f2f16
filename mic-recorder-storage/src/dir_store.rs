//! Directory-rooted store for the card and flash file systems.
//!
//! Each medium is mounted at a host directory; store paths such as
//! `/log.json` resolve below it. Paths are limited to `MAX_PATH_LENGTH`
//! bytes, matching the firmware's fixed path buffers.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Component, Path, PathBuf};

pub use mic_recorder_core::MAX_PATH_LENGTH;
use mic_recorder_core::{OpenMode, RecorderError, StorageBackend, StorageHandle};

use crate::error::MountError;

/// Which medium a `DirStore` represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    /// Removable SD card. Mounting fails when no card is present.
    Card,
    /// Internal flash. Formatted on first mount.
    Flash,
}

impl StoreKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Card => "SD_MMC",
            Self::Flash => "LittleFS",
        }
    }
}

#[derive(Debug)]
pub struct DirStore {
    kind: StoreKind,
    root: PathBuf,
}

impl DirStore {
    /// Mount the medium rooted at `root`.
    pub fn mount(kind: StoreKind, root: impl Into<PathBuf>) -> Result<Self, MountError> {
        let root = root.into();

        if !root.exists() {
            match kind {
                StoreKind::Card => return Err(MountError::NoCard(root)),
                StoreKind::Flash => {
                    log::warn!("{} not formatted at {}, formatting", kind.name(), root.display());
                    fs::create_dir_all(&root).map_err(|e| MountError::FormatFailed {
                        path: root.clone(),
                        reason: e.to_string(),
                    })?;
                }
            }
        }
        if !root.is_dir() {
            return Err(MountError::NotADirectory(root));
        }

        let store = Self { kind, root };
        match store.usage() {
            Ok(used) => log::info!("{} mounted at {}, used space: {}KB", kind.name(), store.root.display(), used / 1024),
            Err(e) => log::warn!("{} mounted but usage unavailable: {}", kind.name(), e),
        }
        Ok(store)
    }

    pub fn kind(&self) -> StoreKind {
        self.kind
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Total bytes used by files on the medium.
    pub fn usage(&self) -> Result<u64, RecorderError> {
        dir_size(&self.root).map_err(|e| RecorderError::BackendUnavailable(format!("failed to scan store: {}", e)))
    }

    fn resolve(&self, path: &str) -> Result<PathBuf, RecorderError> {
        if path.len() > MAX_PATH_LENGTH {
            return Err(RecorderError::BackendUnavailable(format!(
                "path longer than {} bytes: {}",
                MAX_PATH_LENGTH, path
            )));
        }
        let relative = path
            .strip_prefix('/')
            .ok_or_else(|| RecorderError::BackendUnavailable(format!("path is not absolute: {}", path)))?;

        let relative = Path::new(relative);
        let plain = relative.components().all(|c| matches!(c, Component::Normal(_)));
        if relative.as_os_str().is_empty() || !plain {
            return Err(RecorderError::BackendUnavailable(format!("invalid store path: {}", path)));
        }
        Ok(self.root.join(relative))
    }
}

impl StorageBackend for DirStore {
    fn name(&self) -> &str {
        self.kind.name()
    }

    fn open(&self, path: &str, mode: OpenMode) -> Result<Box<dyn StorageHandle + '_>, RecorderError> {
        let full = self.resolve(path)?;
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| RecorderError::BackendUnavailable(format!("failed to create directory: {}", e)))?;
        }

        let mut options = OpenOptions::new();
        match mode {
            OpenMode::Write => options.write(true).create(true).truncate(true),
        };
        let file = options
            .open(&full)
            .map_err(|e| RecorderError::BackendUnavailable(format!("failed to open {}: {}", path, e)))?;

        log::debug!("Opened {} on {} ({:?})", path, self.kind.name(), mode);
        Ok(Box::new(DirHandle { file }))
    }

    fn exists(&self, path: &str) -> bool {
        self.resolve(path).map(|p| p.is_file()).unwrap_or(false)
    }

    fn read(&self, path: &str) -> Result<Vec<u8>, RecorderError> {
        let full = self.resolve(path)?;
        fs::read(&full).map_err(|e| RecorderError::BackendUnavailable(format!("failed to read {}: {}", path, e)))
    }
}

struct DirHandle {
    file: File,
}

impl StorageHandle for DirHandle {
    fn write(&mut self, bytes: &[u8]) -> Result<usize, RecorderError> {
        self.file
            .write_all(bytes)
            .map_err(|e| RecorderError::BackendUnavailable(format!("write failed: {}", e)))?;
        Ok(bytes.len())
    }

    fn close(mut self: Box<Self>) -> Result<(), RecorderError> {
        self.file.flush().map_err(|e| RecorderError::BackendUnavailable(e.to_string()))?;
        self.file
            .sync_all()
            .map_err(|e| RecorderError::BackendUnavailable(format!("sync failed: {}", e)))
    }
}

fn dir_size(dir: &Path) -> std::io::Result<u64> {
    let mut total = 0;
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let meta = entry.metadata()?;
        total += if meta.is_dir() { dir_size(&entry.path())? } else { meta.len() };
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use mic_recorder_core::{AudioFormat, SampleBuffer, WavHeader, WavWriter};

    use super::*;

    fn temp_root(name: &str) -> PathBuf {
        let root = std::env::temp_dir().join(format!("mic_recorder_test_{}_{}", std::process::id(), name));
        fs::remove_dir_all(&root).ok();
        root
    }

    fn write(store: &DirStore, path: &str, mode: OpenMode, bytes: &[u8]) {
        let mut handle = store.open(path, mode).unwrap();
        assert_eq!(handle.write(bytes).unwrap(), bytes.len());
        handle.close().unwrap();
    }

    #[test]
    fn card_mount_requires_existing_root() {
        let root = temp_root("no_card");
        let err = DirStore::mount(StoreKind::Card, &root).unwrap_err();
        assert_eq!(err, MountError::NoCard(root.clone()));
        assert!(!root.exists());
    }

    #[test]
    fn flash_mount_formats_missing_root() {
        let root = temp_root("flash_format");
        let store = DirStore::mount(StoreKind::Flash, &root).unwrap();

        assert!(root.is_dir());
        assert_eq!(store.kind(), StoreKind::Flash);
        assert_eq!(store.name(), "LittleFS");
        assert_eq!(store.usage().unwrap(), 0);

        fs::remove_dir_all(&root).ok();
    }

    #[test]
    fn mount_rejects_plain_file() {
        let root = temp_root("plain_file");
        fs::write(&root, b"x").unwrap();

        let err = DirStore::mount(StoreKind::Card, &root).unwrap_err();
        assert_eq!(err, MountError::NotADirectory(root.clone()));

        fs::remove_file(&root).ok();
    }

    #[test]
    fn write_truncates_existing_file() {
        let root = temp_root("modes");
        let store = DirStore::mount(StoreKind::Flash, &root).unwrap();

        write(&store, "/a.bin", OpenMode::Write, b"hello world");
        write(&store, "/a.bin", OpenMode::Write, b"hey");
        assert_eq!(store.read("/a.bin").unwrap(), b"hey");
        assert_eq!(store.usage().unwrap(), 3);

        fs::remove_dir_all(&root).ok();
    }

    #[test]
    fn wav_written_through_card_store_matches_header() {
        let root = temp_root("wav_card");
        fs::create_dir_all(&root).unwrap();
        let store = DirStore::mount(StoreKind::Card, &root).unwrap();

        let mut buf = SampleBuffer::new();
        buf.allocate(3).unwrap();
        buf.samples_mut().copy_from_slice(&[0, 2048, 4095]);
        let format = AudioFormat::mono(16000).unwrap();

        let written = WavWriter::default()
            .write(&buf, &format, &store, "/rec_20240602_083000.wav")
            .unwrap();

        let file = fs::read(root.join("rec_20240602_083000.wav")).unwrap();
        assert_eq!(file.len(), 44 + 3 * format.block_align() as usize);

        let header = WavHeader::parse(&file).unwrap();
        assert_eq!(header, written);
        assert_eq!(header.total_size(), 42);
        assert_eq!(header.payload_bytes, 6);
        assert_eq!(header.byte_rate, 32000);

        let samples: Vec<i16> = file[44..]
            .chunks_exact(2)
            .map(|b| i16::from_le_bytes([b[0], b[1]]))
            .collect();
        assert_eq!(samples[0], -32768);
        assert!(samples[1].abs() <= 16, "midpoint decoded to {}", samples[1]);
        assert_eq!(samples[2], 32767);

        fs::remove_dir_all(&root).ok();
    }

    #[test]
    fn exists_tracks_files_only() {
        let root = temp_root("exists");
        let store = DirStore::mount(StoreKind::Flash, &root).unwrap();

        assert!(!store.exists("/log.json"));
        write(&store, "/log.json", OpenMode::Write, b"{}");
        assert!(store.exists("/log.json"));

        write(&store, "/sub/x.wav", OpenMode::Write, b"1");
        assert!(store.exists("/sub/x.wav"));
        assert!(!store.exists("/sub"));

        fs::remove_dir_all(&root).ok();
    }

    #[test]
    fn rejects_long_relative_and_escaping_paths() {
        let root = temp_root("paths");
        let store = DirStore::mount(StoreKind::Flash, &root).unwrap();

        let long = format!("/{}", "a".repeat(MAX_PATH_LENGTH));
        for bad in [long.as_str(), "log.json", "/", "/../x", "/./x"] {
            assert!(store.open(bad, OpenMode::Write).is_err(), "accepted {}", bad);
            assert!(!store.exists(bad));
        }
        assert!(store.read("/missing.wav").is_err());

        fs::remove_dir_all(&root).ok();
    }
}
