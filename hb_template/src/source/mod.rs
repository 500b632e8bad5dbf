//! Byte sources feeding the scanner
//!
//! A [`ByteSource`] is a pull-based reader: each call fills part of the
//! caller's buffer and returns the number of bytes written, with zero meaning
//! the stream is exhausted. The scanner never learns which kind of source it
//! is reading from.

pub mod reader;

use crate::logging::codes;
use std::io;

pub use reader::{FileSource, ReaderSource, StringSource};

/// Pull-based byte reader consumed by the scanner
pub trait ByteSource {
    /// Fill `buf` with up to `buf.len()` bytes; `Ok(0)` signals end of stream
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    /// Name used to tag diagnostics for this source
    fn name(&self) -> &str {
        "<anonymous>"
    }
}

impl<S: ByteSource + ?Sized> ByteSource for &mut S {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        (**self).read(buf)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

impl<S: ByteSource + ?Sized> ByteSource for Box<S> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        (**self).read(buf)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Errors opening a byte source
#[derive(Debug, Clone, thiserror::Error)]
pub enum SourceError {
    #[error("Invalid template path: '{path}'")]
    InvalidPath { path: String },

    #[error("Template not found: {path}")]
    NotFound { path: String },

    #[error("Not a regular file: {path}")]
    NotAFile { path: String },

    #[error("Permission denied: {path}")]
    PermissionDenied { path: String },

    #[error("Template too large: {size} bytes (max: {max_size})")]
    TooLarge { size: u64, max_size: u64 },

    #[error("I/O error opening template: {message}")]
    Io { message: String },
}

impl SourceError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            SourceError::InvalidPath { .. } | SourceError::NotAFile { .. } => {
                codes::source::INVALID_PATH
            }
            SourceError::NotFound { .. } => codes::source::NOT_FOUND,
            SourceError::PermissionDenied { .. } => codes::source::PERMISSION_DENIED,
            SourceError::TooLarge { .. } => codes::source::TOO_LARGE,
            SourceError::Io { .. } => codes::source::IO_ERROR,
        }
    }

    pub fn severity(&self) -> &'static str {
        codes::get_severity(self.error_code().as_str()).as_str()
    }

    pub fn category(&self) -> &'static str {
        codes::get_category(self.error_code().as_str())
    }

    pub fn is_recoverable(&self) -> bool {
        codes::is_recoverable(self.error_code().as_str())
    }

    pub(crate) fn from_io(path: &str, error: &io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::NotFound => SourceError::NotFound {
                path: path.to_string(),
            },
            io::ErrorKind::PermissionDenied => SourceError::PermissionDenied {
                path: path.to_string(),
            },
            _ => SourceError::Io {
                message: format!("{}: {}", path, error),
            },
        }
    }
}
