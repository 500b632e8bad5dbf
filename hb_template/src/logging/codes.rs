//! Error and success codes with their classification metadata
//!
//! Every code a stage can emit is declared here together with its category,
//! severity and recommended action.

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// CODE WRAPPER TYPE
// ============================================================================

/// Universal code wrapper for both error and success codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// ERROR CLASSIFICATION TYPES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Critical = 0,
    High = 1,
    Medium = 2,
    Low = 3,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

/// Complete metadata for a code
#[derive(Debug, Clone)]
pub struct ErrorMetadata {
    pub code: &'static str,
    pub category: &'static str,
    pub severity: Severity,
    pub recoverable: bool,
    pub requires_halt: bool,
    pub description: &'static str,
    pub recommended_action: &'static str,
}

impl ErrorMetadata {
    pub fn new(
        code: &'static str,
        category: &'static str,
        severity: Severity,
        recoverable: bool,
        requires_halt: bool,
        description: &'static str,
        recommended_action: &'static str,
    ) -> Self {
        Self {
            code,
            category,
            severity,
            recoverable,
            requires_halt,
            description,
            recommended_action,
        }
    }
}

// ============================================================================
// ERROR CODE CONSTANTS
// ============================================================================

/// System error codes
pub mod system {
    use super::Code;

    pub const INTERNAL_ERROR: Code = Code::new("ERR001");
}

/// Byte source error codes
pub mod source {
    use super::Code;

    pub const NOT_FOUND: Code = Code::new("E005");
    pub const TOO_LARGE: Code = Code::new("E007");
    pub const PERMISSION_DENIED: Code = Code::new("E009");
    pub const IO_ERROR: Code = Code::new("E011");
    pub const INVALID_PATH: Code = Code::new("E012");
}

/// Scanner error codes
pub mod scanner {
    use super::Code;

    pub const READ_FAILURE: Code = Code::new("E020");
    pub const INVALID_ENCODING: Code = Code::new("E021");
    pub const TEXT_TOO_LARGE: Code = Code::new("E024");
    pub const TOO_MANY_TOKENS: Code = Code::new("E027");
    pub const TOKEN_BUFFER_OVERFLOW: Code = Code::new("E028");
}

/// Parser error codes
pub mod syntax {
    use super::Code;

    pub const UNTERMINATED_EXPRESSION: Code = Code::new("E040");
    pub const UNMATCHED_CLOSE_MARKER: Code = Code::new("E042");
    pub const EMPTY_EXPRESSION: Code = Code::new("E043");
    pub const NESTED_OPEN_MARKER: Code = Code::new("E044");
    pub const TOO_MANY_ARGUMENTS: Code = Code::new("E045");
    pub const TOO_MANY_COMPONENTS: Code = Code::new("E046");
    pub const TREE_CONSTRUCTION_ERROR: Code = Code::new("E081");
}

/// Render error codes
pub mod render {
    use super::Code;

    pub const RESOLVER_FAILURE: Code = Code::new("E060");
    pub const UNSUPPORTED_ARITY: Code = Code::new("E061");
    pub const OUTPUT_TOO_LARGE: Code = Code::new("E062");
    pub const INVALID_CONTEXT: Code = Code::new("E063");
    pub const MISSING_KEY: Code = Code::new("W060");
}

// ============================================================================
// SUCCESS CODE CONSTANTS
// ============================================================================

pub mod success {
    use super::Code;

    pub const SYSTEM_INITIALIZATION_COMPLETED: Code = Code::new("I004");
    pub const SOURCE_OPENED: Code = Code::new("I006");
    pub const SCANNING_COMPLETE: Code = Code::new("I020");
    pub const PARSING_COMPLETE: Code = Code::new("I040");
    pub const TEMPLATE_LOADED: Code = Code::new("I041");
    pub const RENDER_COMPLETE: Code = Code::new("I060");
}

// ============================================================================
// ERROR METADATA REGISTRY
// ============================================================================

static ERROR_REGISTRY: OnceLock<HashMap<&'static str, ErrorMetadata>> = OnceLock::new();

fn get_error_registry() -> &'static HashMap<&'static str, ErrorMetadata> {
    ERROR_REGISTRY.get_or_init(|| {
        let entries = [
            // System
            ErrorMetadata::new(
                "ERR001",
                "System",
                Severity::Critical,
                false,
                true,
                "Critical internal error",
                "File a bug report with the failing template",
            ),
            // Source
            ErrorMetadata::new(
                "E005",
                "Source",
                Severity::Medium,
                false,
                true,
                "Template file does not exist",
                "Verify the template path",
            ),
            ErrorMetadata::new(
                "E007",
                "Source",
                Severity::Medium,
                false,
                true,
                "Template file exceeds the configured size limit",
                "Split the template or raise max_source_size",
            ),
            ErrorMetadata::new(
                "E009",
                "Source",
                Severity::High,
                false,
                true,
                "Template file cannot be read due to permissions",
                "Check file permissions",
            ),
            ErrorMetadata::new(
                "E011",
                "Source",
                Severity::High,
                false,
                true,
                "I/O error while accessing the template source",
                "Check the underlying device or reader",
            ),
            ErrorMetadata::new(
                "E012",
                "Source",
                Severity::Medium,
                false,
                true,
                "Template path is empty or not a regular file",
                "Pass the path of a regular file",
            ),
            // Scanner
            ErrorMetadata::new(
                "E020",
                "Scanner",
                Severity::High,
                false,
                true,
                "Reading from the byte source failed",
                "Check the byte source implementation",
            ),
            ErrorMetadata::new(
                "E021",
                "Scanner",
                Severity::Medium,
                false,
                true,
                "Template text is not valid UTF-8",
                "Re-encode the template as UTF-8",
            ),
            ErrorMetadata::new(
                "E024",
                "Scanner",
                Severity::Medium,
                false,
                true,
                "A single text run exceeds the configured limit",
                "Split the template or raise max_text_length",
            ),
            ErrorMetadata::new(
                "E027",
                "Scanner",
                Severity::Medium,
                false,
                true,
                "Template produced more tokens than allowed",
                "Split the template or raise max_token_count",
            ),
            ErrorMetadata::new(
                "E028",
                "Scanner",
                Severity::Critical,
                false,
                true,
                "Pending token buffer overflowed",
                "Raise token_buffer_capacity; this indicates a scanner defect",
            ),
            // Syntax
            ErrorMetadata::new(
                "E040",
                "Syntax",
                Severity::Medium,
                true,
                false,
                "Input ended inside an expression",
                "Close the expression with '}}'",
            ),
            ErrorMetadata::new(
                "E042",
                "Syntax",
                Severity::Medium,
                true,
                false,
                "Close marker without a matching open marker",
                "Remove the stray '}}' or add the missing '{{'",
            ),
            ErrorMetadata::new(
                "E043",
                "Syntax",
                Severity::Medium,
                true,
                false,
                "Expression names no identifier",
                "Put a key between the markers",
            ),
            ErrorMetadata::new(
                "E044",
                "Syntax",
                Severity::Medium,
                true,
                false,
                "Open marker inside an expression",
                "Expressions do not nest; close the first one",
            ),
            ErrorMetadata::new(
                "E045",
                "Syntax",
                Severity::Medium,
                true,
                false,
                "Expression has more arguments than allowed",
                "Reduce the number of identifiers in the expression",
            ),
            ErrorMetadata::new(
                "E046",
                "Syntax",
                Severity::Medium,
                false,
                true,
                "Template has more components than allowed",
                "Split the template or raise max_components",
            ),
            ErrorMetadata::new(
                "E081",
                "Syntax",
                Severity::Critical,
                false,
                true,
                "Rendering tree construction failed",
                "File a bug report with the failing template",
            ),
            // Render
            ErrorMetadata::new(
                "E060",
                "Render",
                Severity::High,
                false,
                true,
                "Resolver reported a hard failure",
                "Inspect the resolver error",
            ),
            ErrorMetadata::new(
                "E061",
                "Render",
                Severity::Medium,
                false,
                true,
                "Expression with several arguments has no render semantics",
                "Use single-key expressions",
            ),
            ErrorMetadata::new(
                "E062",
                "Render",
                Severity::Medium,
                false,
                true,
                "Rendered output exceeds the configured limit",
                "Raise max_output_size or shorten substituted values",
            ),
            ErrorMetadata::new(
                "E063",
                "Render",
                Severity::Medium,
                false,
                true,
                "Context data could not be converted to key/value pairs",
                "Supply a flat JSON object of strings, numbers and booleans",
            ),
            ErrorMetadata::new(
                "W060",
                "Render",
                Severity::Low,
                true,
                false,
                "Key not known to the resolver; rendered as empty text",
                "Provide a value for the key if output is incomplete",
            ),
            // Success
            ErrorMetadata::new(
                "I004",
                "System",
                Severity::Low,
                true,
                false,
                "Logging system initialized",
                "None",
            ),
            ErrorMetadata::new(
                "I006",
                "Source",
                Severity::Low,
                true,
                false,
                "Template source opened",
                "Continue to scanning",
            ),
            ErrorMetadata::new(
                "I020",
                "Scanner",
                Severity::Low,
                true,
                false,
                "Scanning reached end of stream",
                "None",
            ),
            ErrorMetadata::new(
                "I040",
                "Syntax",
                Severity::Low,
                true,
                false,
                "Rendering tree built",
                "Template is ready to render",
            ),
            ErrorMetadata::new(
                "I041",
                "Template",
                Severity::Low,
                true,
                false,
                "Template loaded",
                "None",
            ),
            ErrorMetadata::new(
                "I060",
                "Render",
                Severity::Low,
                true,
                false,
                "Template rendered",
                "None",
            ),
        ];

        entries
            .into_iter()
            .map(|metadata| (metadata.code, metadata))
            .collect()
    })
}

// ============================================================================
// CLASSIFICATION FUNCTIONS
// ============================================================================

pub fn get_error_metadata(code: &str) -> Option<&'static ErrorMetadata> {
    get_error_registry().get(code)
}

pub fn get_severity(code: &str) -> Severity {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.severity)
        .unwrap_or(Severity::Medium)
}

pub fn is_recoverable(code: &str) -> bool {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.recoverable)
        .unwrap_or(true)
}

pub fn requires_halt(code: &str) -> bool {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.requires_halt)
        .unwrap_or(false)
}

pub fn get_description(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.description)
        .unwrap_or("Unknown error")
}

pub fn get_action(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.recommended_action)
        .unwrap_or("No specific action available")
}

pub fn get_category(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.category)
        .unwrap_or("Unknown")
}
