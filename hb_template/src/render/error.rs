//! Render errors

use super::resolver::ResolveError;
use crate::logging::{codes, Code};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    #[error("Resolver failed for key '{key}': {source}")]
    Resolver { key: String, source: ResolveError },

    #[error("Expression with {arguments} arguments cannot be rendered")]
    UnsupportedArity { arguments: usize },

    #[error("Rendered output too large: {size} bytes (max {max_size})")]
    OutputTooLarge { size: usize, max_size: usize },
}

impl RenderError {
    pub fn error_code(&self) -> Code {
        match self {
            Self::Resolver { .. } => codes::render::RESOLVER_FAILURE,
            Self::UnsupportedArity { .. } => codes::render::UNSUPPORTED_ARITY,
            Self::OutputTooLarge { .. } => codes::render::OUTPUT_TOO_LARGE,
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

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_resolver_error_chain() {
        let error = RenderError::Resolver {
            key: "user".to_string(),
            source: ResolveError::new("database unavailable"),
        };

        assert_eq!(error.error_code().as_str(), "E060");
        assert_eq!(error.category(), "Render");
        assert!(!error.is_recoverable());
        assert_eq!(
            error.source().map(|s| s.to_string()),
            Some("database unavailable".to_string())
        );
    }

    #[test]
    fn test_arity_message() {
        let error = RenderError::UnsupportedArity { arguments: 2 };
        assert_eq!(error.to_string(), "Expression with 2 arguments cannot be rendered");
        assert_eq!(error.error_code().as_str(), "E061");
    }
}
