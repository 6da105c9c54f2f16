use std::path::Path;

use mic_recorder_core::{RecorderError, StorageBackend};

use crate::dir_store::{DirStore, StoreKind};

/// Pick the store for this boot: the SD card when one is attached, otherwise
/// internal flash.
///
/// Called once at startup; the recorder only ever sees the returned trait
/// object.
pub fn select_store(
    card_root: impl AsRef<Path>,
    flash_root: impl AsRef<Path>,
) -> Result<Box<dyn StorageBackend>, RecorderError> {
    match DirStore::mount(StoreKind::Card, card_root.as_ref()) {
        Ok(store) => {
            log::info!("SD_MMC mounted");
            return Ok(Box::new(store));
        }
        Err(e) => log::warn!("Card mount failed: {}", e),
    }

    match DirStore::mount(StoreKind::Flash, flash_root.as_ref()) {
        Ok(store) => {
            log::info!("LittleFS mounted");
            Ok(Box::new(store))
        }
        Err(e) => {
            log::error!("Failed to mount any file system: {}", e);
            Err(e.into())
        }
    }
}
