//! Scope and namespace tracking

mod scope;
mod symbol;

pub use scope::{Namespace, Scope, ScopeGuard, ScopeId, ScopeKind, ScopeSession};
pub use symbol::{Symbol, SymbolKind, SymbolTable};
