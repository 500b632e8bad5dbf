//! Syntax analysis: token stream to rendering tree
//!
//! The parser pulls tokens from the scanner on demand, choosing the lexical
//! mode per token, and appends one [`Component`] per text run or expression
//! under the tree's root.

mod component;
mod error;
mod parser;

pub use component::Component;
pub use error::{SyntaxError, SyntaxResult};
pub use parser::{ParseStatistics, ParsedTemplate, Parser};

use crate::config::runtime::ParserPreferences;
use crate::source::{ByteSource, StringSource};

/// Parse a template from any byte source
pub fn parse_template<S: ByteSource>(source: S) -> SyntaxResult<ParsedTemplate> {
    Parser::new(source).parse()
}

/// Parse with custom runtime preferences
pub fn parse_template_with_preferences<S: ByteSource>(
    source: S,
    preferences: ParserPreferences,
) -> SyntaxResult<ParsedTemplate> {
    Parser::with_preferences(source, preferences).parse()
}

pub fn parse_str(text: &str) -> SyntaxResult<ParsedTemplate> {
    parse_template(StringSource::new(text))
}
