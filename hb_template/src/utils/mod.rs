//! Shared source-location types used by the scanner, parser and logging layer

pub mod span;

pub use span::{Position, Span};
