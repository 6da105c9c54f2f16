use super::error::RecorderError;

/// The only PCM width the recorder writes.
pub const BIT_DEPTH: u16 = 16;

/// Sample layout of one recording.
///
/// Only the primary fields are stored. `block_align` and `byte_rate` are
/// computed on every call, so changing the sample rate or channel count can
/// never leave a stale derived value behind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioFormat {
    channels: u16,
    sample_rate: u32,
}

impl AudioFormat {
    pub fn new(channels: u16, sample_rate: u32) -> Result<Self, RecorderError> {
        validate(channels, sample_rate)?;
        Ok(Self { channels, sample_rate })
    }

    /// Single-channel format at `sample_rate` Hz.
    pub fn mono(sample_rate: u32) -> Result<Self, RecorderError> {
        Self::new(1, sample_rate)
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn bit_depth(&self) -> u16 {
        BIT_DEPTH
    }

    /// Bytes per frame: `channels * bit_depth / 8`.
    pub fn block_align(&self) -> u16 {
        self.channels * (BIT_DEPTH / 8)
    }

    /// Bytes per second: `sample_rate * block_align`.
    pub fn byte_rate(&self) -> u32 {
        self.sample_rate * self.block_align() as u32
    }

    pub fn set_sample_rate(&mut self, sample_rate: u32) -> Result<(), RecorderError> {
        validate(self.channels, sample_rate)?;
        self.sample_rate = sample_rate;
        Ok(())
    }

    pub fn set_channels(&mut self, channels: u16) -> Result<(), RecorderError> {
        validate(channels, self.sample_rate)?;
        self.channels = channels;
        Ok(())
    }
}

fn validate(channels: u16, sample_rate: u32) -> Result<(), RecorderError> {
    // block_align and byte_rate must still fit their header fields
    if channels == 0 || channels > u16::MAX / (BIT_DEPTH / 8) {
        return Err(RecorderError::ConfigurationFailed(format!(
            "unsupported channel count: {}",
            channels
        )));
    }
    if sample_rate == 0 {
        return Err(RecorderError::ConfigurationFailed("sample rate must be positive".into()));
    }
    let byte_rate = sample_rate as u64 * channels as u64 * (BIT_DEPTH / 8) as u64;
    if byte_rate > u32::MAX as u64 {
        return Err(RecorderError::ConfigurationFailed(format!(
            "byte rate overflows: {} Hz x {} channels",
            sample_rate, channels
        )));
    }
    Ok(())
}
