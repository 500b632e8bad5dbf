//! Token types produced by the scanner

use crate::utils::{Position, Span};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kinds of token the scanner can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    /// `{{`
    OpenMarker,
    /// `}}`
    CloseMarker,
    /// Run of bytes that is neither a marker nor (in expression mode) whitespace
    Text,
    /// Run of whitespace, only produced in expression mode
    Whitespace,
    EndOfStream,
}

impl TokenKind {
    /// Whether tokens of this kind carry text
    pub fn has_payload(&self) -> bool {
        matches!(self, TokenKind::Text | TokenKind::Whitespace)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(token_to_display_string(*self))
    }
}

/// Diagnostic name for a token kind
pub fn token_to_display_string(kind: TokenKind) -> &'static str {
    match kind {
        TokenKind::OpenMarker => "OPEN_MARKER",
        TokenKind::CloseMarker => "CLOSE_MARKER",
        TokenKind::Text => "TEXT",
        TokenKind::Whitespace => "WHITESPACE",
        TokenKind::EndOfStream => "END_OF_STREAM",
    }
}

/// A scanned token and the position of its first byte
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    pub payload: Option<String>,
    pub position: Position,
}

impl Token {
    pub fn new(kind: TokenKind, payload: Option<String>, position: Position) -> Self {
        Self {
            kind,
            payload,
            position,
        }
    }

    pub fn open_marker(position: Position) -> Self {
        Self::new(TokenKind::OpenMarker, None, position)
    }

    pub fn close_marker(position: Position) -> Self {
        Self::new(TokenKind::CloseMarker, None, position)
    }

    pub fn text(text: String, position: Position) -> Self {
        Self::new(TokenKind::Text, Some(text), position)
    }

    pub fn whitespace(run: String, position: Position) -> Self {
        Self::new(TokenKind::Whitespace, Some(run), position)
    }

    pub fn end_of_stream(position: Position) -> Self {
        Self::new(TokenKind::EndOfStream, None, position)
    }

    pub fn line(&self) -> u32 {
        self.position.line
    }

    pub fn column(&self) -> u32 {
        self.position.column
    }

    pub fn payload(&self) -> Option<&str> {
        self.payload.as_deref()
    }

    /// Hand the payload to the caller, consuming the token
    pub fn into_payload(self) -> Option<String> {
        self.payload
    }

    pub fn is_end_of_stream(&self) -> bool {
        self.kind == TokenKind::EndOfStream
    }

    /// Source bytes covered by this token
    pub fn span(&self) -> Span {
        let end = match (self.kind, &self.payload) {
            (TokenKind::OpenMarker, _) => self.position.advance_bytes(b"{{"),
            (TokenKind::CloseMarker, _) => self.position.advance_bytes(b"}}"),
            (_, Some(text)) => self.position.advance_bytes(text.as_bytes()),
            (_, None) => self.position,
        };
        Span::new(self.position, end)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.payload {
            Some(text) => write!(f, "{}({:?}) at {}", self.kind, text, self.position),
            None => write!(f, "{} at {}", self.kind, self.position),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_strings() {
        assert_eq!(token_to_display_string(TokenKind::OpenMarker), "OPEN_MARKER");
        assert_eq!(token_to_display_string(TokenKind::EndOfStream), "END_OF_STREAM");
        assert_eq!(TokenKind::Whitespace.to_string(), "WHITESPACE");
    }

    #[test]
    fn test_token_span_covers_payload() {
        let token = Token::text("ab\nc".to_string(), Position::new(3, 1, 3));
        let span = token.span();
        assert_eq!(span.start(), Position::new(3, 1, 3));
        assert_eq!(span.end(), Position::new(7, 2, 1));

        let marker = Token::close_marker(Position::new(10, 2, 4));
        assert_eq!(marker.span().end(), Position::new(12, 2, 6));
    }

    #[test]
    fn test_token_accessors() {
        let token = Token::whitespace("  ".to_string(), Position::new(4, 1, 4));
        assert_eq!(token.line(), 1);
        assert_eq!(token.column(), 4);
        assert_eq!(token.payload(), Some("  "));
        assert!(token.kind.has_payload());
        assert!(!TokenKind::OpenMarker.has_payload());
        assert_eq!(token.to_string(), "WHITESPACE(\"  \") at 1:4");
        assert_eq!(token.into_payload(), Some("  ".to_string()));
    }
}
