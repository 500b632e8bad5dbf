//! Concrete byte sources: in-memory strings, files, and arbitrary readers

use super::{ByteSource, SourceError};
use crate::config::compile_time::source::MAX_SOURCE_SIZE;
use crate::logging::codes;
use crate::{log_debug, log_error, log_success};
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

/// Cursor over an owned string; returns 0 once every byte has been handed out
#[derive(Debug, Clone)]
pub struct StringSource {
    bytes: Vec<u8>,
    position: usize,
}

impl StringSource {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            bytes: text.into().into_bytes(),
            position: 0,
        }
    }

    /// Bytes not yet handed out
    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.position
    }
}

impl ByteSource for StringSource {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let count = self.remaining().min(buf.len());
        buf[..count].copy_from_slice(&self.bytes[self.position..self.position + count]);
        self.position += count;
        Ok(count)
    }

    fn name(&self) -> &str {
        "<string>"
    }
}

/// Template file opened for chunked reading
#[derive(Debug)]
pub struct FileSource {
    file: File,
    path: PathBuf,
    name: String,
    size: u64,
}

impl FileSource {
    /// Validate and open a template file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, SourceError> {
        let path = path.as_ref();
        let display = path.display().to_string();

        log_debug!("Opening template file", "path" => display.as_str());

        if display.is_empty() {
            let error = SourceError::InvalidPath { path: display };
            log_error!(error.error_code(), "Empty template path provided");
            return Err(error);
        }

        let metadata = fs::metadata(path).map_err(|e| {
            let error = SourceError::from_io(&display, &e);
            log_error!(error.error_code(), "Failed to read template metadata",
                "path" => display.as_str(),
                "io_error" => e);
            error
        })?;

        if !metadata.is_file() {
            let error = SourceError::NotAFile {
                path: display.clone(),
            };
            log_error!(error.error_code(), "Template path is not a file", "path" => display.as_str());
            return Err(error);
        }

        let size = metadata.len();
        if size > MAX_SOURCE_SIZE {
            let error = SourceError::TooLarge {
                size,
                max_size: MAX_SOURCE_SIZE,
            };
            log_error!(error.error_code(), "Template exceeds maximum source size",
                "path" => display.as_str(),
                "size" => size,
                "max_size" => MAX_SOURCE_SIZE);
            return Err(error);
        }

        let file = File::open(path).map_err(|e| {
            let error = SourceError::from_io(&display, &e);
            log_error!(error.error_code(), "Failed to open template", "path" => display.as_str());
            error
        })?;

        log_success!(codes::success::SOURCE_OPENED, "Template source opened",
            "path" => display.as_str(),
            "size_bytes" => size);

        Ok(Self {
            file,
            path: path.to_path_buf(),
            name: display,
            size,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File size observed when the source was opened
    pub fn size(&self) -> u64 {
        self.size
    }
}

impl ByteSource for FileSource {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        loop {
            match self.file.read(buf) {
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                result => return result,
            }
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Adapts any `io::Read` into a byte source
pub struct ReaderSource<R> {
    reader: R,
    name: String,
}

impl<R: Read> ReaderSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            name: "<reader>".to_string(),
        }
    }

    pub fn with_name(reader: R, name: &str) -> Self {
        Self {
            reader,
            name: name.to_string(),
        }
    }

    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: Read> ByteSource for ReaderSource<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        loop {
            match self.reader.read(buf) {
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                result => return result,
            }
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}
