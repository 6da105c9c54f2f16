use chrono::{Datelike, NaiveDateTime};

/// MySQL `DATETIME` layout used in metadata and the event log.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Render `time` as `YYYY-MM-DD HH:MM:SS`.
///
/// The board's RTC starts at the Unix epoch until it is synchronized, so any
/// time in 1970 or earlier is reported as `"None"`.
pub fn format_timestamp(time: &NaiveDateTime) -> String {
    if time.year() <= 1970 {
        return "None".into();
    }
    time.format(DATETIME_FORMAT).to_string()
}

/// Highest `_n` suffix tried when recordings share a timestamp.
pub const MAX_COLLISION_INDEX: u32 = 999;

/// Bytes a recording name adds after the prefix, worst case.
pub const RECORDING_SUFFIX_LEN: usize = "_YYYYMMDD_HHMMSS_999.wav".len();

/// Store path for a recording started at `time`: `{prefix}_YYYYMMDD_HHMMSS.wav`.
pub fn recording_path(prefix: &str, time: &NaiveDateTime) -> String {
    format!("{}_{}.wav", prefix, time.format("%Y%m%d_%H%M%S"))
}

/// `recording_path` with a `_n` collision suffix before the extension.
pub fn indexed_recording_path(prefix: &str, time: &NaiveDateTime, index: u32) -> String {
    format!("{}_{}_{}.wav", prefix, time.format("%Y%m%d_%H%M%S"), index)
}
