//! Parsers for the SVG attribute micro-grammars carried by elements.

pub mod lexer;
mod path;
mod transform;

pub use path::parse_path;
pub use transform::parse_transform;
