//! Rendering loaded templates against a resolver
//!
//! Rendering is a single left-to-right pass over the tree. Text is copied,
//! single-key expressions are substituted through the caller's [`Resolver`],
//! and the first failure discards everything produced so far.

pub mod context;
pub mod error;
pub mod renderer;
pub mod resolver;

use crate::syntax::Component;
use crate::tree::NaryTree;

pub use context::{ContextError, TemplateContext};
pub use error::RenderError;
pub use renderer::{RenderStatistics, Renderer};
pub use resolver::{ResolveError, Resolver};

/// Render a tree with default preferences
pub fn render_tree<R: Resolver + ?Sized>(
    tree: &NaryTree<Component>,
    resolver: &mut R,
) -> Result<String, RenderError> {
    Renderer::new().render(tree, resolver)
}
