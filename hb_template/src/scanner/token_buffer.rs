//! Bounded FIFO of tokens awaiting delivery to the parser

use super::analyzer::LexerError;
use super::token::Token;
use crate::config::compile_time::scanner::TOKEN_BUFFER_CAPACITY;
use std::collections::VecDeque;

#[derive(Debug, Clone)]
pub struct TokenBuffer {
    tokens: VecDeque<Token>,
    capacity: usize,
}

impl TokenBuffer {
    pub fn new() -> Self {
        Self::with_capacity(TOKEN_BUFFER_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            tokens: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Queue a token; fails rather than growing past capacity
    pub fn push(&mut self, token: Token) -> Result<(), LexerError> {
        if self.is_full() {
            return Err(LexerError::TokenBufferFull {
                capacity: self.capacity,
            });
        }
        self.tokens.push_back(token);
        Ok(())
    }

    pub fn pop(&mut self) -> Option<Token> {
        self.tokens.pop_front()
    }

    pub fn peek(&self) -> Option<&Token> {
        self.tokens.front()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.tokens.len() >= self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.tokens.clear();
    }
}

impl Default for TokenBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::Position;
    use assert_matches::assert_matches;

    #[test]
    fn test_fifo_order() {
        let mut buffer = TokenBuffer::new();
        buffer.push(Token::open_marker(Position::start())).unwrap();
        buffer
            .push(Token::text("x".to_string(), Position::new(2, 1, 2)))
            .unwrap();

        assert_eq!(buffer.len(), 2);
        assert_eq!(buffer.peek().map(|t| t.column()), Some(0));
        assert_eq!(buffer.pop().map(|t| t.column()), Some(0));
        assert_eq!(buffer.pop().and_then(|t| t.into_payload()), Some("x".to_string()));
        assert!(buffer.pop().is_none());
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_capacity_is_enforced() {
        let mut buffer = TokenBuffer::with_capacity(2);
        buffer.push(Token::open_marker(Position::start())).unwrap();
        buffer.push(Token::close_marker(Position::start())).unwrap();
        assert!(buffer.is_full());

        let result = buffer.push(Token::end_of_stream(Position::start()));
        assert_matches!(result, Err(LexerError::TokenBufferFull { capacity: 2 }));

        buffer.pop();
        assert!(buffer.push(Token::end_of_stream(Position::start())).is_ok());

        buffer.clear();
        assert!(buffer.is_empty());
        assert_eq!(buffer.capacity(), 2);
    }
}
