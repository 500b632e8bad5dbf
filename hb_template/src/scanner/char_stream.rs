//! Buffered byte stream with a fixed lookahead window
//!
//! Bytes are pulled from the [`ByteSource`] in chunks of up to the buffer
//! capacity. When fewer than the requested lookahead bytes remain buffered, the
//! unread tail is shifted to the front and the rest of the buffer is refilled,
//! so a peek never straddles two reads.

use super::analyzer::LexerError;
use crate::config::compile_time::scanner::{CHAR_BUFFER_CAPACITY, PEEK_LENGTH};
use crate::source::ByteSource;
use crate::utils::Position;
use std::io;

pub struct CharStream<S> {
    source: S,
    buffer: Box<[u8]>,
    index: usize,
    level: usize,
    exhausted: bool,
    position: Position,
}

impl<S: ByteSource> CharStream<S> {
    pub fn new(source: S) -> Self {
        Self::with_capacity(source, CHAR_BUFFER_CAPACITY)
    }

    /// Capacity is raised to at least one byte past the peek window
    pub fn with_capacity(source: S, capacity: usize) -> Self {
        let capacity = capacity.max(PEEK_LENGTH + 1);
        Self {
            source,
            buffer: vec![0u8; capacity].into_boxed_slice(),
            index: 0,
            level: 0,
            exhausted: false,
            position: Position::start(),
        }
    }

    /// Look at the byte `ahead` places past the cursor without consuming it
    pub fn peek(&mut self, ahead: usize) -> Result<Option<u8>, LexerError> {
        debug_assert!(ahead < PEEK_LENGTH, "peek beyond the lookahead window");
        self.fill(ahead + 1)?;
        Ok(self.buffered().get(ahead).copied())
    }

    /// Consume one byte, tracking line and column
    pub fn next_byte(&mut self) -> Result<Option<u8>, LexerError> {
        self.fill(1)?;
        if self.index == self.level {
            return Ok(None);
        }

        let byte = self.buffer[self.index];
        self.index += 1;
        self.position = self.position.advance(byte);
        Ok(Some(byte))
    }

    /// Position of the next unconsumed byte
    pub fn position(&self) -> Position {
        self.position
    }

    pub fn bytes_consumed(&self) -> usize {
        self.position.offset
    }

    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    pub fn into_source(self) -> S {
        self.source
    }

    fn buffered(&self) -> &[u8] {
        &self.buffer[self.index..self.level]
    }

    fn fill(&mut self, needed: usize) -> Result<(), LexerError> {
        while self.level - self.index < needed && !self.exhausted {
            if self.index > 0 {
                self.buffer.copy_within(self.index..self.level, 0);
                self.level -= self.index;
                self.index = 0;
            }

            let available = self.buffer.len() - self.level;
            match self.source.read(&mut self.buffer[self.level..]) {
                Ok(0) => self.exhausted = true,
                Ok(count) => self.level += count.min(available),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    return Err(LexerError::Read {
                        message: e.to_string(),
                        position: self.position,
                    })
                }
            }
        }
        Ok(())
    }
}
