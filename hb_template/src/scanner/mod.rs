//! Template scanner
//!
//! Converts a [`ByteSource`] into a stream of [`Token`]s. The scanner reads
//! through a buffered [`CharStream`] with two bytes of lookahead and hands
//! tokens out one at a time, queueing at most one extra token in its
//! [`TokenBuffer`] when a text run is flushed ahead of the token that ended it.

pub mod analyzer;
pub mod char_stream;
pub mod token;
pub mod token_buffer;

use crate::config::runtime::ScannerPreferences;
use crate::source::{ByteSource, StringSource};

pub use analyzer::{is_template_whitespace, LexMode, LexerError, Scanner, ScannerMetrics};
pub use char_stream::CharStream;
pub use token::{token_to_display_string, Token, TokenKind};
pub use token_buffer::TokenBuffer;

/// Scan a whole source in one mode, END_OF_STREAM included
pub fn tokenize<S: ByteSource>(source: S, mode: LexMode) -> Result<Vec<Token>, LexerError> {
    let mut scanner = Scanner::new(source);
    collect_tokens(&mut scanner, mode)
}

/// Scan with custom runtime preferences
pub fn tokenize_with_preferences<S: ByteSource>(
    source: S,
    mode: LexMode,
    preferences: ScannerPreferences,
) -> Result<Vec<Token>, LexerError> {
    let mut scanner = Scanner::with_preferences(source, preferences);
    collect_tokens(&mut scanner, mode)
}

pub fn tokenize_str(text: &str, mode: LexMode) -> Result<Vec<Token>, LexerError> {
    tokenize(StringSource::new(text), mode)
}

fn collect_tokens<S: ByteSource>(
    scanner: &mut Scanner<S>,
    mode: LexMode,
) -> Result<Vec<Token>, LexerError> {
    let mut tokens = Vec::new();
    loop {
        let token = scanner.next_token_in(mode)?;
        let done = token.is_end_of_stream();
        tokens.push(token);
        if done {
            return Ok(tokens);
        }
    }
}
