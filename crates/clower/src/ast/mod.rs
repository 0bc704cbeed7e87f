//! Abstract syntax tree: arena storage, node kinds and visitors

mod dump;
mod kind;
mod node;
mod visit;

pub use dump::AstDump;
pub use kind::{slots, NodeKind};
pub use node::{Ast, AstNode, NodeId};
pub use visit::AstVisitor;
