use crate::models::error::RecorderError;
use crate::traits::sample_source::SampleSource;

/// Heap-resident buffer of raw 16-bit samples for one recording.
///
/// Storage is present iff `len() > 0`. Allocating again releases the prior
/// storage first, and dropping the buffer frees it, so repeated recording
/// sessions cannot leak.
#[derive(Debug, Default)]
pub struct SampleBuffer {
    data: Option<Box<[i16]>>,
}

impl SampleBuffer {
    /// Create an empty buffer. No storage is reserved until `allocate`.
    pub fn new() -> Self {
        Self { data: None }
    }

    /// Reserve storage for exactly `sample_count` samples.
    ///
    /// Any prior allocation is released first. On failure the buffer is left
    /// empty. Slots start zeroed until the caller fills them.
    pub fn allocate(&mut self, sample_count: usize) -> Result<(), RecorderError> {
        self.release();

        if sample_count == 0 {
            return Err(RecorderError::InvalidState("sample count must be positive".into()));
        }

        let mut data: Vec<i16> = Vec::new();
        data.try_reserve_exact(sample_count).map_err(|e| {
            log::error!("Failed to allocate {} samples: {}", sample_count, e);
            RecorderError::ResourceExhausted {
                requested: sample_count,
            }
        })?;
        data.resize(sample_count, 0);

        log::debug!(
            "Allocated sample buffer: {} samples ({} bytes)",
            sample_count,
            sample_count * std::mem::size_of::<i16>()
        );
        self.data = Some(data.into_boxed_slice());
        Ok(())
    }

    /// Free the storage. Safe to call on an empty buffer.
    pub fn release(&mut self) {
        if let Some(data) = self.data.take() {
            log::debug!("Released sample buffer: {} samples", data.len());
        }
    }

    /// Number of valid samples.
    pub fn len(&self) -> usize {
        self.data.as_ref().map_or(0, |d| d.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_allocated(&self) -> bool {
        self.data.is_some()
    }

    pub fn samples(&self) -> &[i16] {
        self.data.as_deref().unwrap_or(&[])
    }

    pub fn samples_mut(&mut self) -> &mut [i16] {
        self.data.as_deref_mut().unwrap_or(&mut [])
    }

    /// Fill every slot with `f(index)`.
    pub fn fill_with<F: FnMut(usize) -> i16>(&mut self, mut f: F) {
        for (i, slot) in self.samples_mut().iter_mut().enumerate() {
            *slot = f(i);
        }
    }

    /// Fill every slot from `source`, in order.
    ///
    /// Returns the number of samples read. A source error stops the fill and
    /// is propagated; slots after the failing one keep their previous value.
    pub fn fill_from(&mut self, source: &mut dyn SampleSource) -> Result<usize, RecorderError> {
        let mut filled = 0;
        for slot in self.samples_mut() {
            *slot = source.read_sample()?;
            filled += 1;
        }
        Ok(filled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Ramp(i16);

    impl SampleSource for Ramp {
        fn read_sample(&mut self) -> Result<i16, RecorderError> {
            self.0 += 1;
            Ok(self.0)
        }
    }

    struct Failing {
        remaining: usize,
    }

    impl SampleSource for Failing {
        fn read_sample(&mut self) -> Result<i16, RecorderError> {
            if self.remaining == 0 {
                return Err(RecorderError::BackendUnavailable("adc read failed".into()));
            }
            self.remaining -= 1;
            Ok(7)
        }
    }

    #[test]
    fn new_buffer_is_empty() {
        let buf = SampleBuffer::new();
        assert!(buf.is_empty());
        assert!(!buf.is_allocated());
        assert_eq!(buf.len(), 0);
        assert!(buf.samples().is_empty());
    }

    #[test]
    fn allocate_reserves_zeroed_slots() {
        let mut buf = SampleBuffer::new();
        buf.allocate(16000).unwrap();

        assert_eq!(buf.len(), 16000);
        assert!(!buf.is_empty());
        assert!(buf.samples().iter().all(|&s| s == 0));
    }

    #[test]
    fn reallocate_replaces_prior_storage() {
        let mut buf = SampleBuffer::new();
        buf.allocate(10).unwrap();
        buf.fill_with(|_| 99);

        buf.allocate(4).unwrap();
        assert_eq!(buf.len(), 4);
        assert_eq!(buf.samples(), &[0, 0, 0, 0]);
    }

    #[test]
    fn release_is_idempotent() {
        let mut buf = SampleBuffer::new();
        buf.allocate(8).unwrap();

        buf.release();
        assert_eq!(buf.len(), 0);
        assert!(!buf.is_allocated());

        buf.release();
        assert_eq!(buf.len(), 0);
        assert!(!buf.is_allocated());
    }

    #[test]
    fn zero_sized_allocation_is_rejected() {
        let mut buf = SampleBuffer::new();
        buf.allocate(3).unwrap();

        let err = buf.allocate(0).unwrap_err();
        assert!(matches!(err, RecorderError::InvalidState(_)));
        assert!(buf.is_empty());
    }

    #[test]
    fn impossible_allocation_reports_exhaustion() {
        let mut buf = SampleBuffer::new();
        buf.allocate(3).unwrap();

        let err = buf.allocate(usize::MAX).unwrap_err();
        assert_eq!(err, RecorderError::ResourceExhausted { requested: usize::MAX });
        assert!(buf.is_empty());
        assert!(!buf.is_allocated());
    }

    #[test]
    fn fill_with_writes_every_slot() {
        let mut buf = SampleBuffer::new();
        buf.allocate(5).unwrap();
        buf.fill_with(|i| i as i16 * 10);
        assert_eq!(buf.samples(), &[0, 10, 20, 30, 40]);
    }

    #[test]
    fn fill_from_drains_source_in_order() {
        let mut buf = SampleBuffer::new();
        buf.allocate(3).unwrap();

        let filled = buf.fill_from(&mut Ramp(0)).unwrap();
        assert_eq!(filled, 3);
        assert_eq!(buf.samples(), &[1, 2, 3]);
    }

    #[test]
    fn fill_from_propagates_source_errors() {
        let mut buf = SampleBuffer::new();
        buf.allocate(4).unwrap();

        let err = buf.fill_from(&mut Failing { remaining: 2 }).unwrap_err();
        assert!(matches!(err, RecorderError::BackendUnavailable(_)));
        assert_eq!(buf.samples(), &[7, 7, 0, 0]);
    }

    #[test]
    fn fill_on_empty_buffer_is_noop() {
        let mut buf = SampleBuffer::new();
        assert_eq!(buf.fill_from(&mut Ramp(0)).unwrap(), 0);
        buf.fill_with(|_| 1);
        assert!(buf.is_empty());
    }
}
