use crate::models::error::RecorderError;

/// Source of raw readings from the analog front end.
///
/// Implemented by the board's ADC driver. One call yields one sample for one
/// channel; the caller is responsible for pacing reads at the sample rate.
/// Readings are raw converter values inside the writer's `AdcRange`.
pub trait SampleSource {
    fn read_sample(&mut self) -> Result<i16, RecorderError>;
}
