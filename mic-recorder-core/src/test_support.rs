//! In-memory `StorageBackend` for unit tests.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use crate::models::error::RecorderError;
use crate::traits::storage_backend::{OpenMode, StorageBackend, StorageHandle};

#[derive(Default)]
pub struct MemoryStore {
    files: RefCell<HashMap<String, Vec<u8>>>,
    pub open_calls: Cell<usize>,
    pub close_calls: Cell<usize>,
    /// Refuse every `open`.
    pub fail_open: bool,
    /// Accept at most this many bytes per file, then report short writes.
    pub capacity: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: Some(capacity),
            ..Self::default()
        }
    }

    pub fn failing_open() -> Self {
        Self {
            fail_open: true,
            ..Self::default()
        }
    }

    pub fn file(&self, path: &str) -> Option<Vec<u8>> {
        self.files.borrow().get(path).cloned()
    }

    pub fn insert(&self, path: &str, bytes: &[u8]) {
        self.files.borrow_mut().insert(path.to_string(), bytes.to_vec());
    }
}

impl StorageBackend for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    fn open(&self, path: &str, mode: OpenMode) -> Result<Box<dyn StorageHandle + '_>, RecorderError> {
        self.open_calls.set(self.open_calls.get() + 1);
        if self.fail_open {
            return Err(RecorderError::BackendUnavailable(format!("cannot open {}", path)));
        }

        match mode {
            OpenMode::Write => {
                self.files.borrow_mut().insert(path.to_string(), Vec::new());
            }
        }
        Ok(Box::new(MemoryHandle {
            store: self,
            path: path.to_string(),
        }))
    }

    fn exists(&self, path: &str) -> bool {
        self.files.borrow().contains_key(path)
    }

    fn read(&self, path: &str) -> Result<Vec<u8>, RecorderError> {
        self.file(path)
            .ok_or_else(|| RecorderError::BackendUnavailable(format!("no such file: {}", path)))
    }
}

struct MemoryHandle<'a> {
    store: &'a MemoryStore,
    path: String,
}

impl StorageHandle for MemoryHandle<'_> {
    fn write(&mut self, bytes: &[u8]) -> Result<usize, RecorderError> {
        let mut files = self.store.files.borrow_mut();
        let file = files
            .get_mut(&self.path)
            .ok_or_else(|| RecorderError::BackendUnavailable("file vanished".into()))?;

        let room = match self.store.capacity {
            Some(capacity) => capacity.saturating_sub(file.len()),
            None => bytes.len(),
        };
        let accepted = room.min(bytes.len());
        file.extend_from_slice(&bytes[..accepted]);
        Ok(accepted)
    }

    fn close(self: Box<Self>) -> Result<(), RecorderError> {
        self.store.close_calls.set(self.store.close_calls.get() + 1);
        Ok(())
    }
}
