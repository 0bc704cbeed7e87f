//! Symbols and insertion-ordered symbol tables

use indexmap::IndexMap;

use crate::ast::NodeId;

/// What a name stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Variable,
    Function,
    Type,
}

/// A declared name: its spelling, what it declares and the AST node that
/// introduced it.
#[derive(Debug, Clone)]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,
    pub node: NodeId,
}

impl Symbol {
    pub fn new(name: impl Into<String>, kind: SymbolKind, node: NodeId) -> Self {
        Self {
            name: name.into(),
            kind,
            node,
        }
    }
}

/// Unique-key symbol table preserving declaration order.
#[derive(Debug, Default)]
pub struct SymbolTable {
    symbols: IndexMap<String, Symbol>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `symbol` under its name. A table never overwrites: a second
    /// insertion of the same name hands the rejected symbol back to the
    /// caller, which knows the scope and namespace and can build the
    /// redeclaration error.
    pub fn insert(&mut self, symbol: Symbol) -> Result<(), Symbol> {
        if self.symbols.contains_key(&symbol.name) {
            return Err(symbol);
        }
        self.symbols.insert(symbol.name.clone(), symbol);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Symbol> {
        self.symbols.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.symbols.contains_key(name)
    }

    /// Symbols in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.values()
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Ast, NodeKind};
    use crate::common::Span;

    fn leaf(ast: &mut Ast, name: &str) -> NodeId {
        ast.add_leaf(NodeKind::Identifier, name, Span::default())
    }

    #[test]
    fn test_insert_preserves_declaration_order() {
        let mut ast = Ast::new();
        let mut table = SymbolTable::new();
        for name in ["c", "a", "b"] {
            let node = leaf(&mut ast, name);
            table.insert(Symbol::new(name, SymbolKind::Variable, node)).unwrap();
        }

        let names: Vec<&str> = table.iter().map(|symbol| symbol.name.as_str()).collect();
        assert_eq!(names, ["c", "a", "b"]);
    }

    #[test]
    fn test_insert_rejects_duplicates() {
        let mut ast = Ast::new();
        let mut table = SymbolTable::new();
        let node = leaf(&mut ast, "x");
        table.insert(Symbol::new("x", SymbolKind::Variable, node)).unwrap();

        let rejected = table
            .insert(Symbol::new("x", SymbolKind::Function, node))
            .unwrap_err();
        assert_eq!(rejected.name, "x");
        // The first entry survives.
        assert_eq!(table.get("x").unwrap().kind, SymbolKind::Variable);
        assert_eq!(table.len(), 1);
    }
}
