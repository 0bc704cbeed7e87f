//! Concrete syntax tree input boundary
//!
//! The lowering engine consumes an externally produced parse tree through the
//! types in this module: a rule kind per node, an ordered child list mixing
//! sub-rules and terminal tokens, and literal text on terminals. Nothing here
//! depends on how the tree was produced; a grammar-driven parser and the
//! hand-built trees used in tests are interchangeable.

mod node;
mod token;

pub use node::{CstChild, CstNode, Rule};
pub use token::{Token, TokenKind};
