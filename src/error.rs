use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChbError {
    #[error("File not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Parse error in {file_name} while looking for {marker:?}: {reason}")]
    Parse {
        file_name: String,
        marker: String,
        reason: String,
    },

    #[error("Duplicate record for file: {0}")]
    DuplicateRecord(String),

    #[error("Window size {window_size} exceeds signal length {signal_len}")]
    InvalidWindow {
        window_size: usize,
        signal_len: usize,
    },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("FFT error: {0}")]
    Fft(String),
}

impl ChbError {
    pub(crate) fn parse(file_name: &str, marker: &str, reason: impl Into<String>) -> Self {
        ChbError::Parse {
            file_name: file_name.to_string(),
            marker: marker.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ChbError>;
