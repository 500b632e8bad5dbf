//! String-keyed template context

use super::resolver::{ResolveError, Resolver};
use crate::logging::codes;
use crate::log_error;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

#[derive(Debug, thiserror::Error)]
pub enum ContextError {
    #[error("Invalid context JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Context JSON must be an object")]
    NotAnObject,

    #[error("Context value for '{key}' is not a string, number or boolean")]
    UnsupportedValue { key: String },
}

impl ContextError {
    pub fn error_code(&self) -> crate::logging::Code {
        codes::render::INVALID_CONTEXT
    }
}

/// Key/value pairs substituted into `{{key}}` expressions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateContext {
    values: HashMap<String, String>,
}

impl TemplateContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a pair, replacing any earlier value for `key`
    pub fn set_string(&mut self, key: &str, value: &str) -> &mut Self {
        self.values.insert(key.to_string(), value.to_string());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.values.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Build a context from a flat JSON object; `null` members are skipped
    pub fn from_json_str(json: &str) -> Result<Self, ContextError> {
        let value: Value = serde_json::from_str(json).map_err(|e| {
            log_error!(codes::render::INVALID_CONTEXT, "Failed to parse context JSON",
                "line" => e.line(),
                "column" => e.column()
            );
            ContextError::InvalidJson(e)
        })?;

        let Value::Object(members) = value else {
            log_error!(codes::render::INVALID_CONTEXT, "Context JSON is not an object");
            return Err(ContextError::NotAnObject);
        };

        let mut context = Self::new();
        for (key, member) in members {
            let text = match member {
                Value::Null => continue,
                Value::String(text) => text,
                Value::Number(number) => number.to_string(),
                Value::Bool(flag) => flag.to_string(),
                Value::Array(_) | Value::Object(_) => {
                    log_error!(codes::render::INVALID_CONTEXT, "Unsupported context value",
                        "key" => key.as_str()
                    );
                    return Err(ContextError::UnsupportedValue { key });
                }
            };
            context.values.insert(key, text);
        }
        Ok(context)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for TemplateContext {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut context = Self::new();
        context.extend(iter);
        context
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for TemplateContext {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.values.insert(key.into(), value.into());
        }
    }
}

impl Resolver for TemplateContext {
    fn resolve(&mut self, key: &str) -> Result<Option<String>, ResolveError> {
        Ok(self.get(key).map(str::to_string))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_set_and_get() {
        let mut context = TemplateContext::new();
        context.set_string("quick", "sneaky").set_string("fox", "cat");

        assert_eq!(context.get("quick"), Some("sneaky"));
        assert_eq!(context.len(), 2);
        assert!(context.contains_key("fox"));
        assert_eq!(context.get("missing"), None);
    }

    #[test]
    fn test_later_set_replaces_value() {
        let mut context = TemplateContext::new();
        context.set_string("key", "first");
        context.set_string("key", "second");

        assert_eq!(context.get("key"), Some("second"));
        assert_eq!(context.len(), 1);
        assert_eq!(context.remove("key"), Some("second".to_string()));
        assert!(context.is_empty());
    }

    #[test]
    fn test_resolver_reports_missing_as_none() {
        let mut context: TemplateContext = [("name", "World")].into_iter().collect();
        assert_eq!(context.resolve("name").unwrap(), Some("World".to_string()));
        assert_eq!(context.resolve("other").unwrap(), None);
    }

    #[test]
    fn test_from_json_scalars() {
        let context = TemplateContext::from_json_str(
            r#"{"name": "Ada", "age": 36, "ratio": 0.5, "admin": true, "nickname": null}"#,
        )
        .unwrap();

        assert_eq!(context.get("name"), Some("Ada"));
        assert_eq!(context.get("age"), Some("36"));
        assert_eq!(context.get("ratio"), Some("0.5"));
        assert_eq!(context.get("admin"), Some("true"));
        assert!(!context.contains_key("nickname"));
        assert_eq!(context.len(), 4);
    }

    #[test]
    fn test_from_json_rejects_nested_values() {
        assert_matches!(
            TemplateContext::from_json_str(r#"{"items": [1, 2]}"#),
            Err(ContextError::UnsupportedValue { key }) if key == "items"
        );
        assert_matches!(
            TemplateContext::from_json_str(r#"["not", "an", "object"]"#),
            Err(ContextError::NotAnObject)
        );
        assert_matches!(
            TemplateContext::from_json_str("{not json"),
            Err(ContextError::InvalidJson(_))
        );
    }

    #[test]
    fn test_serde_is_a_flat_map() {
        let context: TemplateContext = [("k", "v")].into_iter().collect();
        assert_eq!(serde_json::to_string(&context).unwrap(), r#"{"k":"v"}"#);
    }
}
