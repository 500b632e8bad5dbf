//! Resolution callback contract used while rendering

/// Hard failure reported by a resolver; aborts the render
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ResolveError {
    message: String,
}

impl ResolveError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Maps an expression key to its substitution value
///
/// `Ok(None)` means the key is unknown and renders as empty text. The renderer
/// calls `resolve` once per expression, in template order.
pub trait Resolver {
    fn resolve(&mut self, key: &str) -> Result<Option<String>, ResolveError>;
}

impl<F> Resolver for F
where
    F: FnMut(&str) -> Result<Option<String>, ResolveError>,
{
    fn resolve(&mut self, key: &str) -> Result<Option<String>, ResolveError> {
        self(key)
    }
}
