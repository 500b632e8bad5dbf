//! Recursive-descent parser building the rendering tree
//!
//! ```text
//! Expression     := Text | Handlebars | EOF
//! Text           := TEXT
//! Handlebars     := OPEN HandlebarsBody
//! HandlebarsBody := TEXT HandlebarsBody | WS HandlebarsBody | CLOSE
//! ```
//!
//! Tokens inside an expression are kept on an explicit stack until the close
//! marker arrives, then popped back to the open marker to form the argument
//! list. Every component becomes a child of the tree's payload-free root.

use super::component::Component;
use super::error::{SyntaxError, SyntaxResult};
use crate::config::compile_time::syntax::{MAX_COMPONENTS, MAX_EXPRESSION_ARGUMENTS};
use crate::config::runtime::ParserPreferences;
use crate::logging::codes;
use crate::scanner::{LexMode, Scanner, Token, TokenKind};
use crate::source::ByteSource;
use crate::tree::{NaryTree, NodeId};
use crate::utils::{Position, Span};
use crate::{log_debug, log_error, log_success};
use serde::Serialize;
use std::collections::VecDeque;

/// Counts gathered while parsing one template
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct ParseStatistics {
    pub text_components: usize,
    pub expressions: usize,
    pub arguments: usize,
    pub tokens_scanned: usize,
}

impl ParseStatistics {
    pub fn components(&self) -> usize {
        self.text_components + self.expressions
    }

    fn record(&mut self, component: &Component) {
        match component {
            Component::Text(_) => self.text_components += 1,
            Component::Expression(arguments) => {
                self.expressions += 1;
                self.arguments += arguments.len();
            }
        }
    }
}

/// A successfully parsed template
#[derive(Debug, Clone)]
pub struct ParsedTemplate {
    pub tree: NaryTree<Component>,
    pub statistics: ParseStatistics,
}

pub struct Parser<S> {
    scanner: Scanner<S>,
    stack: Vec<Token>,
    preferences: ParserPreferences,
    statistics: ParseStatistics,
}

impl<S: ByteSource> Parser<S> {
    pub fn new(source: S) -> Self {
        Self::from_scanner(Scanner::new(source), ParserPreferences::default())
    }

    pub fn with_preferences(source: S, preferences: ParserPreferences) -> Self {
        Self::from_scanner(Scanner::new(source), preferences)
    }

    pub fn from_scanner(scanner: Scanner<S>, preferences: ParserPreferences) -> Self {
        Self {
            scanner,
            stack: Vec::new(),
            preferences,
            statistics: ParseStatistics::default(),
        }
    }

    /// Parse the whole source; on failure nothing built so far survives
    pub fn parse(mut self) -> SyntaxResult<ParsedTemplate> {
        log_debug!("Starting template parsing", "source" => self.scanner.source_name());

        let mut tree = NaryTree::new();
        let root = tree.set_root(None);

        match self.parse_components(&mut tree, root) {
            Ok(()) => {
                self.statistics.tokens_scanned = self.scanner.metrics().total_tokens;
                log_success!(codes::success::PARSING_COMPLETE, "Template parsing completed",
                    "source" => self.scanner.source_name(),
                    "components" => self.statistics.components(),
                    "text_components" => self.statistics.text_components,
                    "expressions" => self.statistics.expressions,
                    "tokens" => self.statistics.tokens_scanned
                );
                Ok(ParsedTemplate {
                    tree,
                    statistics: self.statistics,
                })
            }
            Err(error) => {
                self.stack.clear();
                self.report(&error);
                Err(error)
            }
        }
    }

    fn parse_components(&mut self, tree: &mut NaryTree<Component>, root: NodeId) -> SyntaxResult<()> {
        while let Some(component) = self.parse_expression()? {
            let count = self.statistics.components();
            if count >= MAX_COMPONENTS {
                return Err(SyntaxError::TooManyComponents { count: count + 1 });
            }

            if self.preferences.log_component_details {
                log_debug!("Component parsed",
                    "index" => count,
                    "kind" => if component.is_text() { "text" } else { "expression" },
                    "arity" => component.arity()
                );
            }

            self.statistics.record(&component);
            tree.append_child(root, component)?;
        }

        if !self.stack.is_empty() {
            return Err(SyntaxError::internal_parser_error(
                "token stack not empty at end of stream",
            ));
        }
        Ok(())
    }

    /// One top-level unit; `None` once the stream is exhausted
    fn parse_expression(&mut self) -> SyntaxResult<Option<Component>> {
        let token = self.scanner.next_token_in(LexMode::Literal)?;
        match token.kind {
            TokenKind::Text | TokenKind::Whitespace => Ok(Some(Component::Text(
                token.into_payload().unwrap_or_default(),
            ))),
            TokenKind::OpenMarker => {
                self.stack.push(token);
                self.parse_handlebars().map(Some)
            }
            TokenKind::CloseMarker => Err(SyntaxError::UnmatchedCloseMarker {
                position: token.position,
            }),
            TokenKind::EndOfStream => Ok(None),
        }
    }

    fn parse_handlebars(&mut self) -> SyntaxResult<Component> {
        loop {
            let token = self.scanner.next_token_in(LexMode::Expression)?;
            match token.kind {
                TokenKind::Text => {
                    let count = self.stack.len().saturating_sub(1);
                    if count >= MAX_EXPRESSION_ARGUMENTS {
                        return Err(SyntaxError::TooManyArguments {
                            count: count + 1,
                            position: token.position,
                        });
                    }
                    self.stack.push(token);
                }
                TokenKind::Whitespace => {}
                TokenKind::CloseMarker => return self.reduce_expression(token),
                TokenKind::OpenMarker => {
                    return Err(SyntaxError::NestedOpenMarker {
                        position: token.position,
                        open: self.open_position(),
                    })
                }
                TokenKind::EndOfStream => {
                    return Err(SyntaxError::UnterminatedExpression {
                        open: self.open_position(),
                    })
                }
            }
        }
    }

    /// Pop arguments back to the matching open marker
    fn reduce_expression(&mut self, close: Token) -> SyntaxResult<Component> {
        let mut arguments = VecDeque::new();
        let open = loop {
            match self.stack.pop() {
                Some(token) if token.kind == TokenKind::Text => {
                    arguments.push_front(token.into_payload().unwrap_or_default());
                }
                Some(token) if token.kind == TokenKind::OpenMarker => break token.position,
                Some(token) => {
                    return Err(SyntaxError::internal_parser_error(&format!(
                        "unexpected {} on expression stack",
                        token.kind
                    )))
                }
                None => {
                    return Err(SyntaxError::UnmatchedCloseMarker {
                        position: close.position,
                    })
                }
            }
        };

        if arguments.is_empty() {
            return Err(SyntaxError::EmptyExpression {
                span: Span::new(open, close.span().end()),
            });
        }

        Ok(Component::Expression(Vec::from(arguments)))
    }

    fn open_position(&self) -> Position {
        self.stack
            .iter()
            .rev()
            .find(|token| token.kind == TokenKind::OpenMarker)
            .map_or_else(|| self.scanner.position(), |token| token.position)
    }

    fn report(&self, error: &SyntaxError) {
        // Scanner failures were logged where they happened
        if matches!(error, SyntaxError::Scanner(_)) {
            return;
        }

        let message = error.to_string();
        match error.span() {
            Some(span) => {
                log_error!(error.error_code(), &message,
                    span = span,
                    "source" => self.scanner.source_name()
                );
            }
            None => {
                log_error!(error.error_code(), &message, "source" => self.scanner.source_name());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::LexerError;
    use crate::source::{ReaderSource, StringSource};
    use assert_matches::assert_matches;

    fn parse(text: &str) -> SyntaxResult<ParsedTemplate> {
        Parser::new(StringSource::new(text)).parse()
    }

    fn components(text: &str) -> Vec<Component> {
        parse(text).unwrap().tree.contents().cloned().collect()
    }

    fn text(value: &str) -> Component {
        Component::Text(value.to_string())
    }

    fn expression(arguments: &[&str]) -> Component {
        Component::Expression(arguments.iter().map(|a| a.to_string()).collect())
    }

    #[test]
    fn test_text_and_expression_order() {
        assert_eq!(
            components("The {{quick}} brown fox"),
            vec![text("The "), expression(&["quick"]), text(" brown fox")]
        );
    }

    #[test]
    fn test_arguments_keep_source_order() {
        assert_eq!(
            components("{{ helper  first\tsecond\n}}"),
            vec![expression(&["helper", "first", "second"])]
        );
    }

    #[test]
    fn test_adjacent_expressions() {
        assert_eq!(
            components("{{a}}{{b}}"),
            vec![expression(&["a"]), expression(&["b"])]
        );
    }

    #[test]
    fn test_whitespace_outside_markers_stays_in_text() {
        assert_eq!(
            components("  line one\n  {{x}}  "),
            vec![text("  line one\n  "), expression(&["x"]), text("  ")]
        );
    }

    #[test]
    fn test_empty_input_has_only_root() {
        let parsed = parse("").unwrap();
        assert_eq!(parsed.tree.len(), 1);
        assert_eq!(parsed.tree.contents().count(), 0);
        assert_eq!(parsed.statistics, ParseStatistics {
            tokens_scanned: 1,
            ..ParseStatistics::default()
        });
    }

    #[test]
    fn test_root_is_last_and_parents_are_root() {
        let parsed = parse("a{{b}}c").unwrap();
        let root = parsed.tree.get_root().unwrap();
        let nodes: Vec<_> = parsed.tree.iter().collect();

        assert_eq!(nodes.len(), 4);
        assert_eq!(nodes[3].0, root);
        for (_, node) in &nodes[..3] {
            assert_eq!(node.parent(), Some(root));
        }
    }

    #[test]
    fn test_statistics() {
        let parsed = parse("Hi {{a b}} and {{c}}!").unwrap();
        let stats = parsed.statistics;

        assert_eq!(stats.text_components, 3);
        assert_eq!(stats.expressions, 2);
        assert_eq!(stats.arguments, 3);
        assert_eq!(stats.components(), 5);
        assert!(stats.tokens_scanned >= 11);
    }

    #[test]
    fn test_unterminated_expression() {
        assert_matches!(
            parse("text {{unterminated"),
            Err(SyntaxError::UnterminatedExpression { open }) if open == Position::new(5, 1, 5)
        );
        assert_matches!(parse("{{"), Err(SyntaxError::UnterminatedExpression { .. }));
    }

    #[test]
    fn test_unmatched_close_marker() {
        assert_matches!(
            parse("}}"),
            Err(SyntaxError::UnmatchedCloseMarker { position }) if position == Position::start()
        );
        assert_matches!(
            parse("{{a}} b }}"),
            Err(SyntaxError::UnmatchedCloseMarker { position }) if position.column == 8
        );
    }

    #[test]
    fn test_empty_expressions() {
        assert_matches!(
            parse("{{}}"),
            Err(SyntaxError::EmptyExpression { span }) if span.len() == 4
        );
        assert_matches!(parse("{{ }}"), Err(SyntaxError::EmptyExpression { .. }));
        assert_matches!(parse("x {{ \n\t }} y"), Err(SyntaxError::EmptyExpression { .. }));
    }

    #[test]
    fn test_nested_open_marker() {
        assert_matches!(
            parse("{{test {{"),
            Err(SyntaxError::NestedOpenMarker { position, open }) => {
                assert_eq!(position, Position::new(7, 1, 7));
                assert_eq!(open, Position::start());
            }
        );
    }

    #[test]
    fn test_error_positions_on_later_lines() {
        assert_matches!(
            parse("line one\nline {{ two"),
            Err(SyntaxError::UnterminatedExpression { open }) => {
                assert_eq!(open.line, 2);
                assert_eq!(open.column, 5);
            }
        );
    }

    #[test]
    fn test_too_many_arguments() {
        let arguments: Vec<String> = (0..=MAX_EXPRESSION_ARGUMENTS)
            .map(|i| format!("a{}", i))
            .collect();
        let source = format!("{{{{{}}}}}", arguments.join(" "));

        assert_matches!(
            parse(&source),
            Err(SyntaxError::TooManyArguments { count, .. }) if count == MAX_EXPRESSION_ARGUMENTS + 1
        );
    }

    #[test]
    fn test_maximum_arguments_accepted() {
        let arguments: Vec<String> = (0..MAX_EXPRESSION_ARGUMENTS)
            .map(|i| format!("a{}", i))
            .collect();
        let source = format!("{{{{{}}}}}", arguments.join(" "));

        let parsed = components(&source);
        assert_eq!(parsed[0].arity(), MAX_EXPRESSION_ARGUMENTS);
    }

    #[test]
    fn test_scanner_errors_propagate() {
        let reader = ReaderSource::new(std::io::Cursor::new(vec![0xc3, 0x28]));
        let result = Parser::new(reader).parse();
        assert_matches!(
            result,
            Err(SyntaxError::Scanner(LexerError::InvalidEncoding { .. }))
        );
    }

    #[test]
    fn test_component_details_preference() {
        let preferences = ParserPreferences {
            log_component_details: true,
        };
        let parsed = Parser::with_preferences(StringSource::new("a{{b}}"), preferences)
            .parse()
            .unwrap();
        assert_eq!(parsed.statistics.components(), 2);
    }
}
