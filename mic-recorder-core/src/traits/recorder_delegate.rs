use crate::models::error::RecorderError;
use crate::models::recording_result::RecordingResult;

/// Event delegate for recording session notifications.
///
/// Injected into a `RecordingSession` in place of global debug output. All
/// methods are called synchronously from the thread driving the session.
pub trait RecorderDelegate {
    /// Called after the sample buffer has been allocated for a new recording.
    fn on_armed(&self, sample_count: usize);

    /// Called when an operation fails.
    fn on_error(&self, error: &RecorderError);

    /// Called when the recording file and its metadata are stored.
    fn on_recording_saved(&self, result: &RecordingResult);
}
