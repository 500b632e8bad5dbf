//! Template facade: load once, render many times
//!
//! A [`Template`] owns the rendering tree built when it was loaded and is
//! independent of the source it was read from. Loading runs inside a logging
//! source context named after the source, so every event emitted by the
//! scanner and parser carries the template's name.

mod error;
mod stats;

pub use error::TemplateError;
pub use stats::TemplateStatistics;

use crate::config::runtime::RuntimeConfig;
use crate::logging::{self, codes};
use crate::render::{RenderError, ResolveError, Renderer, Resolver, TemplateContext};
use crate::scanner::Scanner;
use crate::source::{ByteSource, FileSource, StringSource};
use crate::syntax::{Component, Parser};
use crate::tree::NaryTree;
use crate::{log_info, log_success};
use std::path::Path;
use std::time::Instant;

#[derive(Debug, Clone)]
pub struct Template {
    tree: NaryTree<Component>,
    statistics: TemplateStatistics,
    config: RuntimeConfig,
}

impl Template {
    /// Scan and parse a whole source with default preferences
    pub fn load<S: ByteSource>(source: S) -> Result<Self, TemplateError> {
        Self::load_with_config(source, &RuntimeConfig::default())
    }

    /// Scan and parse with the scanner, parser and render preferences of `config`
    pub fn load_with_config<S: ByteSource>(
        source: S,
        config: &RuntimeConfig,
    ) -> Result<Self, TemplateError> {
        let name = source.name().to_string();

        let load = || -> Result<Self, TemplateError> {
            log_info!("Loading template", "source" => name.as_str());
            let start_time = Instant::now();

            let scanner = Scanner::with_preferences(source, config.scanner.clone());
            let parsed = Parser::from_scanner(scanner, config.parser.clone()).parse()?;
            let statistics =
                TemplateStatistics::new(&name, &parsed.statistics, start_time.elapsed());

            log_success!(codes::success::TEMPLATE_LOADED, "Template loaded",
                "source" => name.as_str(),
                "components" => statistics.components(),
                "expressions" => statistics.expressions,
                "duration_us" => statistics.load_duration.as_micros()
            );

            Ok(Self {
                tree: parsed.tree,
                statistics,
                config: config.clone(),
            })
        };

        logging::with_source_context(&name, logging::next_source_id(), load)
    }

    pub fn load_str(text: &str) -> Result<Self, TemplateError> {
        Self::load(StringSource::new(text))
    }

    /// Read a template file as it is on disk now; later edits need [`Template::reload_file`]
    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Self, TemplateError> {
        let source = FileSource::open(path)?;
        Self::load(source)
    }

    /// Replace this template's tree; on failure the current tree is kept
    pub fn reload<S: ByteSource>(&mut self, source: S) -> Result<(), TemplateError> {
        let replacement = Self::load_with_config(source, &self.config)?;

        log_info!("Template reloaded",
            "previous" => self.statistics.source_name.as_str(),
            "source" => replacement.statistics.source_name.as_str()
        );
        *self = replacement;
        Ok(())
    }

    pub fn reload_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), TemplateError> {
        let source = FileSource::open(path)?;
        self.reload(source)
    }

    /// Render against a resolver; unknown keys become empty text
    pub fn render<R: Resolver + ?Sized>(&self, resolver: &mut R) -> Result<String, RenderError> {
        Renderer::with_preferences(self.config.render.clone()).render(&self.tree, resolver)
    }

    /// Render with a closure resolver
    pub fn render_with<F>(&self, mut resolve: F) -> Result<String, RenderError>
    where
        F: FnMut(&str) -> Result<Option<String>, ResolveError>,
    {
        self.render(&mut resolve)
    }

    pub fn render_context(&self, context: &TemplateContext) -> Result<String, RenderError> {
        self.render_with(|key| Ok(context.get(key).map(str::to_string)))
    }

    /// Content components in render order
    pub fn components(&self) -> impl Iterator<Item = &Component> + '_ {
        self.tree.contents()
    }

    pub fn tree(&self) -> &NaryTree<Component> {
        &self.tree
    }

    /// Number of content components
    pub fn len(&self) -> usize {
        self.statistics.components()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn statistics(&self) -> &TemplateStatistics {
        &self.statistics
    }

    pub fn name(&self) -> &str {
        &self.statistics.source_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::compile_time::source::MAX_SOURCE_SIZE;
    use crate::syntax::SyntaxError;
    use assert_matches::assert_matches;
    use std::fs;
    use tempfile::tempdir;

    fn not_found(_: &str) -> Result<Option<String>, ResolveError> {
        Ok(None)
    }

    #[test]
    fn test_pure_text_is_identity() {
        for text in ["", "plain", "a { b } c", "line\n\tindent  ", "{x} }y{", "üñí {"] {
            let template = Template::load_str(text).unwrap();
            assert_eq!(template.render_with(not_found).unwrap(), text);
        }
    }

    #[test]
    fn test_single_key() {
        let template = Template::load_str("{{key}}").unwrap();

        let found = template
            .render_with(|key| Ok((key == "key").then(|| "value".to_string())))
            .unwrap();
        assert_eq!(found, "value");
        assert_eq!(template.render_with(not_found).unwrap(), "");
    }

    #[test]
    fn test_text_around_expression() {
        let template = Template::load_str("A {{x}} B").unwrap();
        let mut context = TemplateContext::new();
        context.set_string("x", "Y");

        assert_eq!(template.render_context(&context).unwrap(), "A Y B");
        assert_eq!(template.render(&mut context).unwrap(), "A Y B");
    }

    #[test]
    fn test_quick_brown_fox() {
        let template = Template::load_str("The {{quick}} brown fox").unwrap();
        let mut context = TemplateContext::new();
        context.set_string("quick", "sneaky");

        assert_eq!(template.render_context(&context).unwrap(), "The sneaky brown fox");
    }

    #[test]
    fn test_two_arguments_parse_but_fail_to_render() {
        let template = Template::load_str("{{a b}}").unwrap();
        assert_eq!(template.len(), 1);
        assert_matches!(
            template.render_with(not_found),
            Err(RenderError::UnsupportedArity { arguments: 2 })
        );
    }

    #[test]
    fn test_malformed_templates_fail_to_load() {
        assert_matches!(
            Template::load_str("{{unterminated"),
            Err(TemplateError::Syntax(SyntaxError::UnterminatedExpression { .. }))
        );
        assert_matches!(
            Template::load_str("}}"),
            Err(TemplateError::Syntax(SyntaxError::UnmatchedCloseMarker { .. }))
        );
        assert_matches!(
            Template::load_str("{{}}"),
            Err(TemplateError::Syntax(SyntaxError::EmptyExpression { .. }))
        );
        assert_matches!(
            Template::load_str("{{ }}"),
            Err(TemplateError::Syntax(SyntaxError::EmptyExpression { .. }))
        );
        assert_matches!(
            Template::load_str("{{test {{"),
            Err(TemplateError::Syntax(SyntaxError::NestedOpenMarker { .. }))
        );
    }

    #[test]
    fn test_render_is_idempotent() {
        let template = Template::load_str("Hi {{name}}, you have {{count}} messages").unwrap();
        let context: TemplateContext = [("name", "Ada"), ("count", "3")].into_iter().collect();

        let first = template.render_context(&context).unwrap();
        let second = template.render_context(&context).unwrap();
        assert_eq!(first, "Hi Ada, you have 3 messages");
        assert_eq!(first, second);
        assert_eq!(template.len(), 5);
    }

    #[test]
    fn test_template_outlives_source() {
        let template = {
            let text = String::from("{{greeting}}, world");
            let mut source = StringSource::new(text);
            Template::load(&mut source).unwrap()
        };
        let context: TemplateContext = [("greeting", "Hello")].into_iter().collect();
        assert_eq!(template.render_context(&context).unwrap(), "Hello, world");
    }

    #[test]
    fn test_components_and_statistics() {
        let template = Template::load_str("a{{b}}c{{d e}}").unwrap();
        let components: Vec<&Component> = template.components().collect();

        assert_eq!(components.len(), 4);
        assert_eq!(components[3].arity(), 2);

        let stats = template.statistics();
        assert_eq!(stats.source_name, "<string>");
        assert_eq!(stats.text_components, 2);
        assert_eq!(stats.expressions, 2);
        assert_eq!(stats.arguments, 3);
        assert!(stats.tokens_scanned > 0);
        assert_eq!(template.name(), "<string>");
    }

    #[test]
    fn test_empty_template() {
        let template = Template::load_str("").unwrap();
        assert!(template.is_empty());
        assert_eq!(template.render_with(not_found).unwrap(), "");
    }

    #[test]
    fn test_load_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("greeting.hbs");
        fs::write(&path, "Dear {{name}},\nWelcome.\n").unwrap();

        let template = Template::load_file(&path).unwrap();
        let context: TemplateContext = [("name", "Grace")].into_iter().collect();
        assert_eq!(
            template.render_context(&context).unwrap(),
            "Dear Grace,\nWelcome.\n"
        );
        assert!(template.name().ends_with("greeting.hbs"));
    }

    #[test]
    fn test_largest_plain_text_file_renders_unchanged() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("large.hbs");
        let body = "a".repeat(MAX_SOURCE_SIZE as usize);
        fs::write(&path, &body).unwrap();

        let template = Template::load_file(&path).unwrap();
        assert_eq!(template.len(), 1);
        assert_eq!(template.render_with(not_found).unwrap(), body);
    }

    #[test]
    fn test_many_expressions_load() {
        let count = 200_000;
        let template = Template::load_str(&"{{x}}".repeat(count)).unwrap();
        assert_eq!(template.statistics().expressions, count);

        let output = template.render_with(|_| Ok(Some("y".to_string()))).unwrap();
        assert_eq!(output, "y".repeat(count));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let result = Template::load_file(dir.path().join("absent.hbs"));
        assert_matches!(result, Err(TemplateError::Source(_)));
        assert_eq!(result.unwrap_err().error_code().as_str(), "E005");
    }

    #[test]
    fn test_reload_replaces_tree() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("page.hbs");
        fs::write(&path, "v1 {{x}}").unwrap();

        let mut template = Template::load_file(&path).unwrap();
        fs::write(&path, "v2 [{{x}}]").unwrap();
        template.reload_file(&path).unwrap();

        let context: TemplateContext = [("x", "X")].into_iter().collect();
        assert_eq!(template.render_context(&context).unwrap(), "v2 [X]");
    }

    #[test]
    fn test_failed_reload_keeps_previous_tree() {
        let mut template = Template::load_str("kept {{x}}").unwrap();

        let result = template.reload(StringSource::new("broken {{"));
        assert_matches!(result, Err(TemplateError::Syntax(_)));
        assert_eq!(result.unwrap_err().error_code().as_str(), "E040");

        let context: TemplateContext = [("x", "!")].into_iter().collect();
        assert_eq!(template.render_context(&context).unwrap(), "kept !");
    }

    #[test]
    fn test_load_with_config() {
        let config = RuntimeConfig::from_toml_str(
            r#"
            [scanner]
            collect_detailed_metrics = false

            [render]
            log_missing_keys = true
            "#,
        )
        .unwrap();

        let template = Template::load_with_config(StringSource::new("{{a}}"), &config).unwrap();
        assert_eq!(template.render_with(not_found).unwrap(), "");
        assert_eq!(template.statistics().expressions, 1);
    }
}
