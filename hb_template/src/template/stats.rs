use crate::syntax::ParseStatistics;
use serde::Serialize;
use std::time::Duration;

/// Counts gathered when a template was loaded
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TemplateStatistics {
    pub source_name: String,
    pub text_components: usize,
    pub expressions: usize,
    pub arguments: usize,
    pub tokens_scanned: usize,
    pub load_duration: Duration,
}

impl TemplateStatistics {
    pub(crate) fn new(source_name: &str, parse: &ParseStatistics, load_duration: Duration) -> Self {
        Self {
            source_name: source_name.to_string(),
            text_components: parse.text_components,
            expressions: parse.expressions,
            arguments: parse.arguments,
            tokens_scanned: parse.tokens_scanned,
            load_duration,
        }
    }

    pub fn components(&self) -> usize {
        self.text_components + self.expressions
    }
}
