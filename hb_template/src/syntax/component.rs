//! Rendering-tree payloads

use serde::{Deserialize, Serialize};
use std::fmt;

/// One unit of a loaded template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Component {
    /// Literal text copied to the output unchanged
    Text(String),
    /// `{{...}}` with its arguments in source order; never empty
    Expression(Vec<String>),
}

impl Component {
    pub fn is_text(&self) -> bool {
        matches!(self, Component::Text(_))
    }

    pub fn is_expression(&self) -> bool {
        matches!(self, Component::Expression(_))
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            Component::Text(text) => Some(text),
            Component::Expression(_) => None,
        }
    }

    pub fn arguments(&self) -> Option<&[String]> {
        match self {
            Component::Expression(arguments) => Some(arguments),
            Component::Text(_) => None,
        }
    }

    /// Argument count; zero for text
    pub fn arity(&self) -> usize {
        self.arguments().map_or(0, <[String]>::len)
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Component::Text(text) => f.write_str(text),
            Component::Expression(arguments) => write!(f, "{{{{{}}}}}", arguments.join(" ")),
        }
    }
}
