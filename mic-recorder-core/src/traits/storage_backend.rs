use crate::models::error::RecorderError;

/// Longest store path a backend accepts, in bytes (the firmware's fixed path buffers).
pub const MAX_PATH_LENGTH: usize = 32;

/// How a file is opened for writing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    /// Create the file, truncating any existing contents.
    Write,
}

/// Persistent store the recorder writes through.
///
/// Implemented by:
/// - `DirStore` with `StoreKind::Card` (removable SD card)
/// - `DirStore` with `StoreKind::Flash` (internal flash file system)
///
/// Paths are store-absolute (`/rec_20240101_120000.wav`). The core never asks
/// which medium is behind the trait or how much space is left.
pub trait StorageBackend {
    /// Human-readable medium name for diagnostics.
    fn name(&self) -> &str;

    /// Open `path` for writing. The handle is closed by `StorageHandle::close`
    /// or, failing that, when it is dropped.
    fn open(&self, path: &str, mode: OpenMode) -> Result<Box<dyn StorageHandle + '_>, RecorderError>;

    /// Whether a file exists at `path`.
    fn exists(&self, path: &str) -> bool;

    /// Read the whole file at `path`.
    fn read(&self, path: &str) -> Result<Vec<u8>, RecorderError>;
}

/// An open file on a `StorageBackend`.
pub trait StorageHandle {
    /// Write `bytes`, returning how many were accepted. A count lower than
    /// `bytes.len()` means the medium is full or failing.
    fn write(&mut self, bytes: &[u8]) -> Result<usize, RecorderError>;

    /// Flush and close the handle.
    fn close(self: Box<Self>) -> Result<(), RecorderError>;
}

/// Write all of `bytes`, treating a short write as a failure.
pub fn write_all(handle: &mut dyn StorageHandle, bytes: &[u8]) -> Result<(), RecorderError> {
    let written = handle.write(bytes)?;
    if written != bytes.len() {
        return Err(RecorderError::BackendUnavailable(format!(
            "short write: {} of {} bytes",
            written,
            bytes.len()
        )));
    }
    Ok(())
}

/// Replace the file at `path` with `bytes`, closing the handle on every path.
pub fn write_file(store: &dyn StorageBackend, path: &str, bytes: &[u8]) -> Result<(), RecorderError> {
    let mut handle = store.open(path, OpenMode::Write)?;
    let written = write_all(handle.as_mut(), bytes);
    let closed = handle.close();
    written.and(closed)
}
