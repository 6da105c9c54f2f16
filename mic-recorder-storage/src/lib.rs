//! # mic-recorder-storage
//!
//! Concrete storage media for the recorder.
//!
//! Provides:
//! - `DirStore`: a store rooted at a mount directory, in two flavours:
//!   `StoreKind::Card` (removable SD card) and `StoreKind::Flash` (internal
//!   flash file system)
//! - `select_store`: startup fallback policy: card first, then flash
//!
//! ## Usage
//! ```ignore
//! use mic_recorder_core::{RecorderConfig, RecordingSession};
//! use mic_recorder_storage::select_store;
//!
//! let store = select_store("/sdcard", "/littlefs")?;
//! let config = RecorderConfig::load(store.as_ref(), "/config.json")?;
//! let mut session = RecordingSession::new(config)?;
//! ```

pub mod dir_store;
pub mod error;
pub mod fallback;

pub use dir_store::{DirStore, StoreKind, MAX_PATH_LENGTH};
pub use error::MountError;
pub use fallback::select_store;
