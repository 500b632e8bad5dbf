//! Syntax errors raised while building the rendering tree

use crate::config::compile_time::syntax::{MAX_COMPONENTS, MAX_EXPRESSION_ARGUMENTS};
use crate::logging::{codes, Code};
use crate::scanner::LexerError;
use crate::tree::TreeError;
use crate::utils::{Position, Span};

pub type SyntaxResult<T> = Result<T, SyntaxError>;

#[derive(Debug, Clone, thiserror::Error)]
pub enum SyntaxError {
    #[error("Unterminated expression opened at {open}")]
    UnterminatedExpression { open: Position },

    #[error("Close marker at {position} has no matching open marker")]
    UnmatchedCloseMarker { position: Position },

    #[error("Expression at {span} has no arguments")]
    EmptyExpression { span: Span },

    #[error("Open marker at {position} inside the expression opened at {open}")]
    NestedOpenMarker { position: Position, open: Position },

    #[error("Too many expression arguments: {count} at {position} (max {MAX_EXPRESSION_ARGUMENTS})")]
    TooManyArguments { count: usize, position: Position },

    #[error("Too many components: {count} (max {MAX_COMPONENTS})")]
    TooManyComponents { count: usize },

    #[error(transparent)]
    Scanner(#[from] LexerError),

    #[error("Tree construction failed: {0}")]
    Tree(#[from] TreeError),

    #[error("Internal parser error: {message}")]
    InternalParserError { message: String },
}

impl SyntaxError {
    pub fn internal_parser_error(message: &str) -> Self {
        Self::InternalParserError {
            message: message.to_string(),
        }
    }

    /// Get error code for global logging system
    pub fn error_code(&self) -> Code {
        match self {
            Self::UnterminatedExpression { .. } => codes::syntax::UNTERMINATED_EXPRESSION,
            Self::UnmatchedCloseMarker { .. } => codes::syntax::UNMATCHED_CLOSE_MARKER,
            Self::EmptyExpression { .. } => codes::syntax::EMPTY_EXPRESSION,
            Self::NestedOpenMarker { .. } => codes::syntax::NESTED_OPEN_MARKER,
            Self::TooManyArguments { .. } => codes::syntax::TOO_MANY_ARGUMENTS,
            Self::TooManyComponents { .. } => codes::syntax::TOO_MANY_COMPONENTS,
            Self::Scanner(error) => error.error_code(),
            Self::Tree(_) => codes::syntax::TREE_CONSTRUCTION_ERROR,
            Self::InternalParserError { .. } => codes::system::INTERNAL_ERROR,
        }
    }

    /// Get span if available
    pub fn span(&self) -> Option<Span> {
        match self {
            Self::UnterminatedExpression { open: position }
            | Self::UnmatchedCloseMarker { position }
            | Self::NestedOpenMarker { position, .. }
            | Self::TooManyArguments { position, .. } => Some(Span::at(*position)),
            Self::EmptyExpression { span } => Some(*span),
            Self::Scanner(error) => error.position().map(Span::at),
            Self::TooManyComponents { .. } | Self::Tree(_) | Self::InternalParserError { .. } => {
                None
            }
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

    /// Whether the error comes from marker structure rather than limits or I/O
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::UnterminatedExpression { .. }
                | Self::UnmatchedCloseMarker { .. }
                | Self::EmptyExpression { .. }
                | Self::NestedOpenMarker { .. }
        )
    }
}
