//! Walks a rendering tree and produces output text

use super::error::RenderError;
use super::resolver::Resolver;
use crate::config::compile_time::render::MAX_OUTPUT_SIZE;
use crate::config::runtime::RenderPreferences;
use crate::logging::codes;
use crate::syntax::Component;
use crate::tree::NaryTree;
use crate::{log_error, log_success, log_warning};

/// Counts from one render pass
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RenderStatistics {
    pub text_components: usize,
    pub substitutions: usize,
    pub missing_keys: usize,
    pub output_bytes: usize,
}

#[derive(Debug, Clone, Default)]
pub struct Renderer {
    preferences: RenderPreferences,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_preferences(preferences: RenderPreferences) -> Self {
        Self { preferences }
    }

    /// Render every content node before the root, in order
    ///
    /// Unknown keys render as empty text. A resolver failure or an expression
    /// with more than one argument aborts the pass and discards its output.
    pub fn render<R: Resolver + ?Sized>(
        &self,
        tree: &NaryTree<Component>,
        resolver: &mut R,
    ) -> Result<String, RenderError> {
        self.render_with_statistics(tree, resolver)
            .map(|(output, _)| output)
    }

    pub fn render_with_statistics<R: Resolver + ?Sized>(
        &self,
        tree: &NaryTree<Component>,
        resolver: &mut R,
    ) -> Result<(String, RenderStatistics), RenderError> {
        let mut output = String::new();
        let mut statistics = RenderStatistics::default();

        for component in tree.contents() {
            self.render_component(component, resolver, &mut output, &mut statistics)?;

            if output.len() > MAX_OUTPUT_SIZE {
                let error = RenderError::OutputTooLarge {
                    size: output.len(),
                    max_size: MAX_OUTPUT_SIZE,
                };
                log_error!(error.error_code(), "Rendered output exceeds limit",
                    "size" => output.len(),
                    "max_size" => MAX_OUTPUT_SIZE
                );
                return Err(error);
            }
        }

        statistics.output_bytes = output.len();
        log_success!(codes::success::RENDER_COMPLETE, "Template rendered",
            "output_bytes" => statistics.output_bytes,
            "substitutions" => statistics.substitutions,
            "missing_keys" => statistics.missing_keys
        );

        Ok((output, statistics))
    }

    fn render_component<R: Resolver + ?Sized>(
        &self,
        component: &Component,
        resolver: &mut R,
        output: &mut String,
        statistics: &mut RenderStatistics,
    ) -> Result<(), RenderError> {
        match component {
            Component::Text(text) => {
                statistics.text_components += 1;
                output.push_str(text);
                Ok(())
            }
            Component::Expression(arguments) => match arguments.as_slice() {
                [key] => {
                    statistics.substitutions += 1;
                    self.substitute(key, resolver, output, statistics)
                }
                _ => {
                    let error = RenderError::UnsupportedArity {
                        arguments: arguments.len(),
                    };
                    log_error!(error.error_code(), "Expression arity not supported",
                        "expression" => component,
                        "arguments" => arguments.len()
                    );
                    Err(error)
                }
            },
        }
    }

    fn substitute<R: Resolver + ?Sized>(
        &self,
        key: &str,
        resolver: &mut R,
        output: &mut String,
        statistics: &mut RenderStatistics,
    ) -> Result<(), RenderError> {
        match resolver.resolve(key) {
            Ok(Some(value)) => {
                output.push_str(&value);
                Ok(())
            }
            Ok(None) => {
                statistics.missing_keys += 1;
                if self.preferences.log_missing_keys {
                    log_warning!(code = codes::render::MISSING_KEY, "Key not found; rendering empty text",
                        "key" => key
                    );
                }
                Ok(())
            }
            Err(source) => {
                log_error!(codes::render::RESOLVER_FAILURE, "Resolver failed",
                    "key" => key,
                    "error" => source.message()
                );
                Err(RenderError::Resolver {
                    key: key.to_string(),
                    source,
                })
            }
        }
    }
}
