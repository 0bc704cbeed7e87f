//! clower: CST to AST lowering and scope tracking for a C-like language
//!
//! The crate takes the concrete syntax tree an external parser produced and
//! lowers it into a slot-addressed abstract syntax tree, tracking C scopes
//! and namespaces along the way:
//!
//! - [`cst`] describes the parse-tree surface the engine consumes: grammar
//!   rules, labeled alternatives and terminal tokens.
//! - [`ast`] owns the lowered tree: an arena of composite and leaf nodes,
//!   fixed named slots per node kind, and a per-kind visitor.
//! - [`sema`] is the scope engine: a session holding the scope tree, one
//!   symbol table per namespace per scope, and parent-delegated lookup.
//! - [`lower`] drives the single pass that turns one into the other.
//!
//! Errors split into two families: CST shapes the engine has no mapping for
//! (malformed trees, unmapped operators) and misuse of the AST or scope
//! structure (bad slots, attaching to leaves, redeclarations, mismatched
//! scope guards). Both are fatal to the pass; see [`common::LowerError`].
//!
//! ```
//! use clower::cst::{CstNode, Rule, TokenKind};
//! use clower::Lowerer;
//!
//! // int x;
//! let unit = CstNode::new(Rule::TranslationUnit).with(
//!     CstNode::new(Rule::Declaration)
//!         .with(CstNode::new(Rule::TypeSpecifier).with_token(TokenKind::Int, "int"))
//!         .with(CstNode::new(Rule::Declarator).with_token(TokenKind::Identifier, "x")),
//! );
//!
//! let lowered = Lowerer::new().lower(&unit, "example.c").unwrap();
//! assert!(lowered.scopes.report().contains("Ordinary: x"));
//! ```

pub mod ast;
pub mod common;
pub mod cst;
pub mod lower;
pub mod sema;

pub use ast::{Ast, AstDump, AstVisitor, NodeId, NodeKind};
pub use common::{DiagnosticReporter, LowerError, LowerResult, Span};
pub use lower::{Lowered, Lowerer};
pub use sema::{Namespace, ScopeKind, ScopeSession, Symbol, SymbolKind};
