//! Syntax trees handed to the projection engine.
//!
//! Neither front end is parsed here: both trees arrive already built by an
//! external grammar and are loaded from JSON.
//!
//! - [`nodes`]: the C front end's closed syntax-kind taxonomy
//! - [`json`]: loading C trees in pycparser's `c_json` layout
//! - [`reg`]: the register-DSL front end's tree
//! - [`literal_parsing`]: decoding constant spellings

pub mod json;
pub mod literal_parsing;
pub mod nodes;
pub mod reg;
pub mod utils;

pub use nodes::{SyntaxKind, SyntaxNode};
