use crate::logging::Code;
use crate::source::SourceError;
use crate::syntax::SyntaxError;
use crate::utils::Span;

/// Template loading errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum TemplateError {
    #[error("Template source failed: {0}")]
    Source(#[from] SourceError),

    #[error("Template parsing failed: {0}")]
    Syntax(#[from] SyntaxError),
}

impl TemplateError {
    pub fn error_code(&self) -> Code {
        match self {
            Self::Source(error) => error.error_code(),
            Self::Syntax(error) => error.error_code(),
        }
    }

    pub fn span(&self) -> Option<Span> {
        match self {
            Self::Source(_) => None,
            Self::Syntax(error) => error.span(),
        }
    }
}
