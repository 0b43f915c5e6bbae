//! Analyzer error types

use std::io;
use thiserror::Error;

/// Result type for analyzer operations
pub type Result<T> = std::result::Result<T, AnalyzerError>;

/// Errors that can occur while loading audio or running the pipeline
#[derive(Error, Debug)]
pub enum AnalyzerError {
    /// Transform configuration rejected before the pipeline runs
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// File container or codec the loader cannot handle
    #[error("unsupported audio format: {0}")]
    UnsupportedFormat(String),

    /// Container recognized but the sample data failed to decode
    #[error("failed to decode audio: {0}")]
    AudioDecode(String),

    /// Underlying file I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
