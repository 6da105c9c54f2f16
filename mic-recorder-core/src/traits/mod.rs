pub mod recorder_delegate;
pub mod sample_source;
pub mod storage_backend;
