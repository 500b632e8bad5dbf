// Internal modules
pub mod config;
#[macro_use]
pub mod logging;
pub mod render;
pub mod scanner;
pub mod source;
pub mod syntax;
pub mod template;
pub mod tree;
pub mod utils;

// Re-export key types for library consumers
pub use render::{ContextError, RenderError, ResolveError, Resolver, TemplateContext};
pub use source::{ByteSource, FileSource, ReaderSource, SourceError, StringSource};
pub use syntax::{Component, SyntaxError};
pub use template::{Template, TemplateError, TemplateStatistics};
