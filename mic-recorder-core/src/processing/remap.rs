use crate::models::error::RecorderError;

/// Input domain of the analog front end.
///
/// Raw readings are linearly stretched from `[min, max]` onto the full signed
/// 16-bit range, so `min` lands on -32768 and `max` on 32767. Readings outside
/// the range are clamped first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdcRange {
    min: i16,
    max: i16,
}

impl AdcRange {
    pub fn new(min: i16, max: i16) -> Result<Self, RecorderError> {
        if min >= max {
            return Err(RecorderError::ConfigurationFailed(format!(
                "ADC range is empty: {}..={}",
                min, max
            )));
        }
        Ok(Self { min, max })
    }

    /// Range of an unsigned converter with `bits` of resolution (`0..=2^bits - 1`).
    pub fn unsigned_bits(bits: u8) -> Result<Self, RecorderError> {
        if !(1..=15).contains(&bits) {
            return Err(RecorderError::ConfigurationFailed(format!(
                "unsupported ADC resolution: {} bits",
                bits
            )));
        }
        Self::new(0, ((1u16 << bits) - 1) as i16)
    }

    pub fn min(&self) -> i16 {
        self.min
    }

    pub fn max(&self) -> i16 {
        self.max
    }

    /// Map one raw reading into the signed PCM domain.
    pub fn remap(&self, raw: i16) -> i16 {
        const OUT_MIN: i64 = i16::MIN as i64;
        const OUT_SPAN: i64 = i16::MAX as i64 - i16::MIN as i64;

        let clamped = raw.clamp(self.min, self.max) as i64;
        let offset = clamped - self.min as i64;
        let span = self.max as i64 - self.min as i64;

        // offset <= span, so the result stays inside i16
        (offset * OUT_SPAN / span + OUT_MIN) as i16
    }
}

impl Default for AdcRange {
    /// The 12-bit converter on the recorder board.
    fn default() -> Self {
        Self { min: 0, max: 4095 }
    }
}
