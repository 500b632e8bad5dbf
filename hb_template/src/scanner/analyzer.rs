//! Streaming scanner turning template bytes into tokens
//!
//! Each call to [`Scanner::next_token_in`] classifies input in priority order:
//! a doubled brace becomes a marker, whitespace becomes its own token while in
//! expression mode, and end of input becomes END_OF_STREAM. Every other byte is
//! appended to a TEXT token. When a classification fires while text is pending,
//! the TEXT token is returned first and the fired token is queued behind it.

use super::char_stream::CharStream;
use super::token::{Token, TokenKind};
use super::token_buffer::TokenBuffer;
use crate::config::compile_time::scanner::*;
use crate::config::runtime::ScannerPreferences;
use crate::logging::codes;
use crate::source::ByteSource;
use crate::utils::{Position, Span};
use crate::{log_debug, log_error, log_success};

/// Scanner errors with compile-time limits
#[derive(Debug, Clone, thiserror::Error)]
pub enum LexerError {
    #[error("Failed to read template source at {position}: {message}")]
    Read { message: String, position: Position },

    #[error("Text starting at {position} is not valid UTF-8")]
    InvalidEncoding { position: Position },

    #[error("Text run too large: {size} bytes starting at {position} (max {MAX_TEXT_LENGTH})")]
    TextTooLarge { size: usize, position: Position },

    #[error("Too many tokens: {count} (max {MAX_TOKEN_COUNT})")]
    TooManyTokens { count: usize },

    #[error("Token buffer full: capacity {capacity}")]
    TokenBufferFull { capacity: usize },
}

impl LexerError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            LexerError::Read { .. } => codes::scanner::READ_FAILURE,
            LexerError::InvalidEncoding { .. } => codes::scanner::INVALID_ENCODING,
            LexerError::TextTooLarge { .. } => codes::scanner::TEXT_TOO_LARGE,
            LexerError::TooManyTokens { .. } => codes::scanner::TOO_MANY_TOKENS,
            LexerError::TokenBufferFull { .. } => codes::scanner::TOKEN_BUFFER_OVERFLOW,
        }
    }

    pub fn position(&self) -> Option<Position> {
        match self {
            LexerError::Read { position, .. }
            | LexerError::InvalidEncoding { position }
            | LexerError::TextTooLarge { position, .. } => Some(*position),
            LexerError::TooManyTokens { .. } | LexerError::TokenBufferFull { .. } => None,
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
}

/// Lexical mode requested by the caller for one token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LexMode {
    /// Whitespace is part of surrounding text
    #[default]
    Literal,
    /// Whitespace separates arguments and is emitted as its own token
    Expression,
}

/// Counters gathered while scanning one source
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScannerMetrics {
    pub total_tokens: usize,
    pub open_markers: usize,
    pub close_markers: usize,
    pub text_tokens: usize,
    pub whitespace_tokens: usize,
    pub bytes_consumed: usize,
    pub max_text_length: usize,
}

impl ScannerMetrics {
    pub(crate) fn record_token(&mut self, token: &Token, preferences: &ScannerPreferences) {
        self.total_tokens += 1;

        if !preferences.collect_detailed_metrics {
            return;
        }

        match token.kind {
            TokenKind::OpenMarker => self.open_markers += 1,
            TokenKind::CloseMarker => self.close_markers += 1,
            TokenKind::Text => {
                self.text_tokens += 1;
                let length = token.payload().map_or(0, str::len);
                self.max_text_length = self.max_text_length.max(length);
            }
            TokenKind::Whitespace => self.whitespace_tokens += 1,
            TokenKind::EndOfStream => {}
        }
    }
}

/// Matches the C `isspace` set, which includes vertical tab
pub fn is_template_whitespace(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | 0x0b | 0x0c | b'\r')
}

pub struct Scanner<S> {
    stream: CharStream<S>,
    pending: TokenBuffer,
    whitespace_mode: bool,
    metrics: ScannerMetrics,
    preferences: ScannerPreferences,
    finished: bool,
}

impl<S: ByteSource> Scanner<S> {
    pub fn new(source: S) -> Self {
        Self::with_preferences(source, ScannerPreferences::default())
    }

    pub fn with_preferences(source: S, preferences: ScannerPreferences) -> Self {
        Self::from_stream(CharStream::new(source), preferences)
    }

    pub fn from_stream(stream: CharStream<S>, preferences: ScannerPreferences) -> Self {
        Self {
            stream,
            pending: TokenBuffer::new(),
            whitespace_mode: false,
            metrics: ScannerMetrics::default(),
            preferences,
            finished: false,
        }
    }

    pub fn enable_whitespace_mode(&mut self) {
        self.whitespace_mode = true;
    }

    pub fn disable_whitespace_mode(&mut self) {
        self.whitespace_mode = false;
    }

    pub fn is_whitespace_mode(&self) -> bool {
        self.whitespace_mode
    }

    /// Next token using the mode selected by the whitespace toggle
    pub fn next_token(&mut self) -> Result<Token, LexerError> {
        let mode = if self.whitespace_mode {
            LexMode::Expression
        } else {
            LexMode::Literal
        };
        self.next_token_in(mode)
    }

    /// Next token scanned in an explicit mode
    ///
    /// A token queued by the previous call is returned first, as classified
    /// when it was scanned.
    pub fn next_token_in(&mut self, mode: LexMode) -> Result<Token, LexerError> {
        if let Some(token) = self.pending.pop() {
            return Ok(token);
        }

        let mut text: Option<(Position, Vec<u8>)> = None;
        let fired = loop {
            let start = self.stream.position();
            let current = self.stream.peek(0)?;
            let next = if current.is_some() {
                self.stream.peek(1)?
            } else {
                None
            };

            match current {
                Some(byte @ (b'{' | b'}')) if next == Some(byte) => {
                    self.stream.next_byte()?;
                    self.stream.next_byte()?;
                    break if byte == b'{' {
                        Token::open_marker(start)
                    } else {
                        Token::close_marker(start)
                    };
                }
                Some(byte) if mode == LexMode::Expression && is_template_whitespace(byte) => {
                    break Token::whitespace(self.consume_whitespace()?, start);
                }
                None => break Token::end_of_stream(start),
                Some(byte) => {
                    self.stream.next_byte()?;
                    let (text_start, bytes) = text.get_or_insert_with(|| (start, Vec::new()));
                    bytes.push(byte);
                    if bytes.len() > MAX_TEXT_LENGTH {
                        let error = LexerError::TextTooLarge {
                            size: bytes.len(),
                            position: *text_start,
                        };
                        self.report(&error);
                        return Err(error);
                    }
                }
            }
        };

        match text {
            Some((position, bytes)) => {
                let token = self.finish_text(position, bytes)?;
                self.record(&token)?;
                self.record(&fired)?;
                self.pending.push(fired).map_err(|e| {
                    self.report(&e);
                    e
                })?;
                Ok(token)
            }
            None => {
                self.record(&fired)?;
                Ok(fired)
            }
        }
    }

    pub fn metrics(&self) -> &ScannerMetrics {
        &self.metrics
    }

    /// Position of the next unscanned byte
    pub fn position(&self) -> Position {
        self.stream.position()
    }

    pub fn source_name(&self) -> &str {
        self.stream.source_name()
    }

    fn consume_whitespace(&mut self) -> Result<String, LexerError> {
        let mut run = String::new();
        while let Some(byte) = self.stream.peek(0)? {
            if !is_template_whitespace(byte) {
                break;
            }
            self.stream.next_byte()?;
            run.push(char::from(byte));
        }
        Ok(run)
    }

    fn finish_text(&self, position: Position, bytes: Vec<u8>) -> Result<Token, LexerError> {
        match String::from_utf8(bytes) {
            Ok(text) => Ok(Token::text(text, position)),
            Err(_) => {
                let error = LexerError::InvalidEncoding { position };
                self.report(&error);
                Err(error)
            }
        }
    }

    fn record(&mut self, token: &Token) -> Result<(), LexerError> {
        if token.is_end_of_stream() {
            if self.finished {
                return Ok(());
            }
            self.finished = true;
        }

        if self.metrics.total_tokens >= MAX_TOKEN_COUNT {
            let error = LexerError::TooManyTokens {
                count: self.metrics.total_tokens + 1,
            };
            self.report(&error);
            return Err(error);
        }

        self.metrics.record_token(token, &self.preferences);
        self.metrics.bytes_consumed = self.stream.bytes_consumed();

        if token.is_end_of_stream() {
            log_success!(codes::success::SCANNING_COMPLETE, "Scanning completed",
                "source" => self.source_name(),
                "tokens" => self.metrics.total_tokens,
                "bytes" => self.metrics.bytes_consumed,
                "max_text_length" => self.metrics.max_text_length
            );
        } else if self.preferences.collect_detailed_metrics {
            log_debug!("Token scanned",
                "kind" => token.kind,
                "position" => token.position
            );
        }

        Ok(())
    }

    fn report(&self, error: &LexerError) {
        let message = error.to_string();
        match error.position() {
            Some(position) if self.preferences.include_position_in_errors => {
                log_error!(error.error_code(), &message,
                    span = Span::at(position),
                    "source" => self.source_name()
                );
            }
            _ => {
                log_error!(error.error_code(), &message, "source" => self.source_name());
            }
        }
    }
}

impl<S: ByteSource> Iterator for Scanner<S> {
    type Item = Result<Token, LexerError>;

    /// Yields tokens in the toggled mode, stopping after END_OF_STREAM
    fn next(&mut self) -> Option<Self::Item> {
        if self.finished && self.pending.is_empty() {
            return None;
        }

        let result = self.next_token();
        if result.is_err() {
            self.finished = true;
            self.pending.clear();
        }
        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{ReaderSource, StringSource};
    use assert_matches::assert_matches;

    fn summary(token: &Token) -> (TokenKind, Option<&str>, u32, u32) {
        (token.kind, token.payload(), token.line(), token.column())
    }

    fn scan_all(text: &str, mode: LexMode) -> Vec<Token> {
        let mut scanner = Scanner::new(StringSource::new(text));
        let mut tokens = Vec::new();
        loop {
            let token = scanner.next_token_in(mode).unwrap();
            let done = token.is_end_of_stream();
            tokens.push(token);
            if done {
                return tokens;
            }
        }
    }

    #[test]
    fn test_literal_mode_keeps_whitespace_in_text() {
        use TokenKind::*;
        let tokens = scan_all("Text {{ whitespace }}.", LexMode::Literal);
        let summaries: Vec<_> = tokens.iter().map(summary).collect();

        assert_eq!(
            summaries,
            vec![
                (Text, Some("Text "), 1, 0),
                (OpenMarker, None, 1, 5),
                (Text, Some(" whitespace "), 1, 7),
                (CloseMarker, None, 1, 19),
                (Text, Some("."), 1, 21),
                (EndOfStream, None, 1, 22),
            ]
        );
    }

    #[test]
    fn test_expression_mode_inside_markers() {
        use TokenKind::*;
        let mut scanner = Scanner::new(StringSource::new("Text {{ whitespace }}."));
        let mut summaries = Vec::new();

        let mut push = |token: Token| {
            summaries.push((token.kind, token.payload, token.position.line, token.position.column));
        };

        push(scanner.next_token().unwrap());
        push(scanner.next_token().unwrap());
        scanner.enable_whitespace_mode();
        for _ in 0..4 {
            push(scanner.next_token().unwrap());
        }
        scanner.disable_whitespace_mode();
        push(scanner.next_token().unwrap());
        push(scanner.next_token().unwrap());

        let text = |s: &str| Some(s.to_string());
        assert_eq!(
            summaries,
            vec![
                (Text, text("Text "), 1, 0),
                (OpenMarker, None, 1, 5),
                (Whitespace, text(" "), 1, 7),
                (Text, text("whitespace"), 1, 8),
                (Whitespace, text(" "), 1, 18),
                (CloseMarker, None, 1, 19),
                (Text, text("."), 1, 21),
                (EndOfStream, None, 1, 22),
            ]
        );
    }

    #[test]
    fn test_empty_input() {
        let tokens = scan_all("", LexMode::Literal);
        assert_eq!(tokens.len(), 1);
        assert_eq!(summary(&tokens[0]), (TokenKind::EndOfStream, None, 1, 0));
    }

    #[test]
    fn test_whitespace_run_is_greedy() {
        use TokenKind::*;
        let tokens = scan_all("Text \t\x0btext", LexMode::Expression);
        let summaries: Vec<_> = tokens.iter().map(summary).collect();

        assert_eq!(
            summaries,
            vec![
                (Text, Some("Text"), 1, 0),
                (Whitespace, Some(" \t\x0b"), 1, 4),
                (Text, Some("text"), 1, 7),
                (EndOfStream, None, 1, 11),
            ]
        );
    }

    #[test]
    fn test_newline_resets_column() {
        use TokenKind::*;
        let tokens = scan_all("a\nbc\n{{d}}", LexMode::Literal);
        let summaries: Vec<_> = tokens.iter().map(summary).collect();

        assert_eq!(
            summaries,
            vec![
                (Text, Some("a\nbc\n"), 1, 0),
                (OpenMarker, None, 3, 0),
                (Text, Some("d"), 3, 2),
                (CloseMarker, None, 3, 3),
                (EndOfStream, None, 3, 5),
            ]
        );
    }

    #[test]
    fn test_single_braces_are_text() {
        use TokenKind::*;
        let tokens = scan_all("{a} }{ {", LexMode::Literal);
        let summaries: Vec<_> = tokens.iter().map(summary).collect();
        assert_eq!(
            summaries,
            vec![(Text, Some("{a} }{ {"), 1, 0), (EndOfStream, None, 1, 8)]
        );
    }

    #[test]
    fn test_triple_brace_splits_after_marker() {
        use TokenKind::*;
        let tokens = scan_all("{{{x", LexMode::Literal);
        let kinds: Vec<_> = tokens.iter().map(|t| (t.kind, t.payload())).collect();
        assert_eq!(
            kinds,
            vec![(OpenMarker, None), (Text, Some("{x")), (EndOfStream, None)]
        );
    }

    #[test]
    fn test_markers_across_buffer_refills() {
        let reader = ReaderSource::new(std::io::Cursor::new(b"ab{{c}}".to_vec()));
        let stream = CharStream::with_capacity(reader, 3);
        let mut scanner = Scanner::from_stream(stream, ScannerPreferences::default());

        let kinds: Vec<TokenKind> = scanner
            .by_ref()
            .map(|t| t.unwrap().kind)
            .collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Text,
                TokenKind::OpenMarker,
                TokenKind::Text,
                TokenKind::CloseMarker,
                TokenKind::EndOfStream,
            ]
        );
        assert_eq!(scanner.metrics().bytes_consumed, 7);
    }

    #[test]
    fn test_multibyte_text_is_preserved() {
        let tokens = scan_all("héllo {{wörld}}", LexMode::Literal);
        assert_eq!(tokens[0].payload(), Some("héllo "));
        assert_eq!(tokens[2].payload(), Some("wörld"));
    }

    #[test]
    fn test_invalid_utf8_is_rejected() {
        let reader = ReaderSource::new(std::io::Cursor::new(vec![b'o', b'k', 0xff, b'{', b'{']));
        let mut scanner = Scanner::new(reader);
        assert_matches!(
            scanner.next_token(),
            Err(LexerError::InvalidEncoding { position }) if position == Position::start()
        );
    }

    #[test]
    fn test_metrics_count_kinds() {
        let mut scanner = Scanner::new(StringSource::new("a {{b c}} d"));
        scanner.enable_whitespace_mode();
        while !scanner.next_token().unwrap().is_end_of_stream() {}

        let metrics = scanner.metrics();
        assert_eq!(metrics.total_tokens, 10);
        assert_eq!(metrics.bytes_consumed, 11);
        if ScannerPreferences::default().collect_detailed_metrics {
            assert_eq!(metrics.open_markers, 1);
            assert_eq!(metrics.close_markers, 1);
            assert_eq!(metrics.text_tokens, 4);
            assert_eq!(metrics.whitespace_tokens, 3);
        }
    }

    #[test]
    fn test_repeated_end_of_stream() {
        let mut scanner = Scanner::new(StringSource::new("x"));
        assert_eq!(scanner.next_token().unwrap().kind, TokenKind::Text);
        assert!(scanner.next_token().unwrap().is_end_of_stream());
        assert!(scanner.next_token().unwrap().is_end_of_stream());
        assert_eq!(scanner.metrics().total_tokens, 2);
        assert!(scanner.next().is_none());
    }

    #[test]
    fn test_error_metadata() {
        let error = LexerError::InvalidEncoding {
            position: Position::new(4, 1, 4),
        };
        assert_eq!(error.error_code().as_str(), "E021");
        assert_eq!(error.category(), "Scanner");
        assert!(!error.is_recoverable());
        assert_eq!(error.position(), Some(Position::new(4, 1, 4)));
        assert_eq!(LexerError::TooManyTokens { count: 3 }.position(), None);
    }
}
