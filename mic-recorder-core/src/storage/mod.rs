pub mod event_log;
pub mod metadata;
pub mod wav_writer;
