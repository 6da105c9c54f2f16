use serde::{Deserialize, Serialize};

use super::error::RecorderError;
use super::format::AudioFormat;
use super::timestamp::RECORDING_SUFFIX_LEN;
use crate::processing::remap::AdcRange;
use crate::traits::storage_backend::{StorageBackend, MAX_PATH_LENGTH};

/// Recorder configuration.
///
/// Read from a JSON file on the active store at startup; every field has a
/// default so a partial file only overrides what it names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecorderConfig {
    /// Sample rate in Hz (default: 16000).
    pub sample_rate: u32,

    /// Number of interleaved channels (default: 1).
    pub channels: u16,

    /// Lowest raw ADC reading (default: 0).
    pub adc_min: i16,

    /// Highest raw ADC reading (default: 4095, a 12-bit converter).
    pub adc_max: i16,

    /// Length of one recording in seconds (default: 10).
    pub duration_secs: u32,

    /// Path of the JSON event log (default: `/log.json`).
    pub log_file: String,

    /// Path prefix for recording files (default: `/rec`).
    pub recording_prefix: String,
}

impl RecorderConfig {
    pub fn validate(&self) -> Result<(), String> {
        AudioFormat::new(self.channels, self.sample_rate).map_err(|e| e.to_string())?;
        AdcRange::new(self.adc_min, self.adc_max).map_err(|e| e.to_string())?;
        if self.duration_secs == 0 {
            return Err("recording duration must be positive".into());
        }
        if !self.log_file.starts_with('/') || !self.recording_prefix.starts_with('/') {
            return Err("store paths must be absolute".into());
        }
        if self.log_file.len() > MAX_PATH_LENGTH {
            return Err(format!("log file path longer than {} bytes", MAX_PATH_LENGTH));
        }
        if self.recording_prefix.len() + RECORDING_SUFFIX_LEN > MAX_PATH_LENGTH {
            return Err(format!(
                "recording prefix {:?} too long: at most {} bytes",
                self.recording_prefix,
                MAX_PATH_LENGTH - RECORDING_SUFFIX_LEN
            ));
        }
        self.sample_count().map_err(|e| e.to_string())?;
        Ok(())
    }

    pub fn audio_format(&self) -> Result<AudioFormat, RecorderError> {
        AudioFormat::new(self.channels, self.sample_rate)
    }

    pub fn adc_range(&self) -> Result<AdcRange, RecorderError> {
        AdcRange::new(self.adc_min, self.adc_max)
    }

    /// Number of buffer slots one recording needs.
    pub fn sample_count(&self) -> Result<usize, RecorderError> {
        (self.sample_rate as usize)
            .checked_mul(self.duration_secs as usize)
            .and_then(|n| n.checked_mul(self.channels as usize))
            .ok_or_else(|| {
                RecorderError::ConfigurationFailed(format!(
                    "{} s at {} Hz x {} ch does not fit in memory",
                    self.duration_secs, self.sample_rate, self.channels
                ))
            })
    }

    /// Parse a JSON config document and validate it.
    pub fn from_json(json: &str) -> Result<Self, RecorderError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| RecorderError::ConfigurationFailed(format!("failed to parse config: {}", e)))?;
        config.validate().map_err(RecorderError::ConfigurationFailed)?;
        Ok(config)
    }

    /// Load the config file at `path`, or the defaults when it does not exist.
    pub fn load(store: &dyn StorageBackend, path: &str) -> Result<Self, RecorderError> {
        if !store.exists(path) {
            log::info!("No config at {} on {}, using defaults", path, store.name());
            return Ok(Self::default());
        }
        let bytes = store.read(path)?;
        let json = String::from_utf8(bytes)
            .map_err(|e| RecorderError::ConfigurationFailed(format!("config is not UTF-8: {}", e)))?;
        let config = Self::from_json(&json)?;
        log::info!(
            "Loaded config from {}: {} Hz, {} ch, {} s",
            path,
            config.sample_rate,
            config.channels,
            config.duration_secs
        );
        Ok(config)
    }
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            sample_rate: 16000,
            channels: 1,
            adc_min: 0,
            adc_max: 4095,
            duration_secs: 10,
            log_file: "/log.json".into(),
            recording_prefix: "/rec".into(),
        }
    }
}
