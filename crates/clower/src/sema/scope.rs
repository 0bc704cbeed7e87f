//! Scopes, namespaces and the scope session
//!
//! Scopes form a tree rooted at the single File scope of a session. Each
//! scope owns one symbol table per namespace its kind supports; a name is
//! meaningful only as the triple (scope, namespace, name). Lookup walks the
//! parent chain within a single namespace and never crosses into another
//! namespace. The session is an explicit object: callers enter a scope,
//! receive a guard, and hand the guard back to exit, so mismatched
//! enter/exit pairs fail instead of silently corrupting the stack.

use indexmap::IndexMap;

use crate::common::{LowerError, LowerResult};

use super::{Symbol, SymbolTable};

/// The four C name spaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    /// Variables, functions, typedef names.
    Ordinary,
    /// struct/union/enum tags.
    Tags,
    /// Members of one struct or union.
    Members,
    /// goto labels.
    Labels,
}

impl Namespace {
    pub fn as_str(&self) -> &'static str {
        match self {
            Namespace::Ordinary => "Ordinary",
            Namespace::Tags => "Tags",
            Namespace::Members => "Members",
            Namespace::Labels => "Labels",
        }
    }
}

/// Scope kinds of the C scope model. The kind fixes which namespaces the
/// scope carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    File,
    Function,
    Block,
    FunctionPrototype,
    StructUnionEnum,
}

impl ScopeKind {
    /// Namespaces a scope of this kind owns a table for.
    pub fn namespaces(&self) -> &'static [Namespace] {
        match self {
            ScopeKind::File => &[Namespace::Ordinary, Namespace::Tags],
            ScopeKind::Function => &[Namespace::Ordinary, Namespace::Labels, Namespace::Tags],
            ScopeKind::Block => &[Namespace::Ordinary, Namespace::Tags],
            ScopeKind::FunctionPrototype => &[Namespace::Ordinary, Namespace::Tags],
            ScopeKind::StructUnionEnum => &[Namespace::Members, Namespace::Tags],
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ScopeKind::File => "File",
            ScopeKind::Function => "Function",
            ScopeKind::Block => "Block",
            ScopeKind::FunctionPrototype => "FunctionPrototype",
            ScopeKind::StructUnionEnum => "StructUnionEnum",
        }
    }
}

/// Handle to a scope inside a [`ScopeSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(u32);

impl ScopeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// One scope: kind, display name, tree links and per-namespace tables.
#[derive(Debug)]
pub struct Scope {
    kind: ScopeKind,
    name: String,
    parent: Option<ScopeId>,
    children: Vec<ScopeId>,
    tables: IndexMap<Namespace, SymbolTable>,
}

impl Scope {
    fn new(kind: ScopeKind, name: String, parent: Option<ScopeId>) -> Self {
        let tables = kind
            .namespaces()
            .iter()
            .map(|&namespace| (namespace, SymbolTable::new()))
            .collect();
        Self {
            kind,
            name,
            parent,
            children: Vec::new(),
            tables,
        }
    }

    pub fn kind(&self) -> ScopeKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<ScopeId> {
        self.parent
    }

    pub fn children(&self) -> &[ScopeId] {
        &self.children
    }

    /// The scope's table for `namespace`; `None` when the kind does not
    /// carry that namespace.
    pub fn table(&self, namespace: Namespace) -> Option<&SymbolTable> {
        self.tables.get(&namespace)
    }
}

/// Proof of an entered scope. Must be handed back to
/// [`ScopeSession::exit_scope`]; exiting with the wrong guard is an error.
#[must_use = "an entered scope must be exited with its guard"]
#[derive(Debug)]
pub struct ScopeGuard {
    id: ScopeId,
}

impl ScopeGuard {
    pub fn scope(&self) -> ScopeId {
        self.id
    }
}

/// One scope-tracking session: the scope tree, the stack of currently open
/// scopes and the session's unique File scope.
#[derive(Debug, Default)]
pub struct ScopeSession {
    scopes: Vec<Scope>,
    stack: Vec<ScopeId>,
    file_scope: Option<ScopeId>,
}

impl ScopeSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a scope of `kind` under the current scope and make it current.
    ///
    /// The first scope entered must be the File scope and a session holds at
    /// most one; every other kind requires an enclosing open scope.
    pub fn enter_scope(&mut self, kind: ScopeKind, name: impl Into<String>) -> LowerResult<ScopeGuard> {
        let parent = self.stack.last().copied();
        match kind {
            ScopeKind::File if self.file_scope.is_some() => {
                return Err(LowerError::DuplicateFileScope);
            }
            ScopeKind::File => {}
            _ if parent.is_none() => return Err(LowerError::NoActiveScope),
            _ => {}
        }

        let id = ScopeId(
            u32::try_from(self.scopes.len()).expect("scope arena exceeds u32::MAX scopes"),
        );
        self.scopes.push(Scope::new(kind, name.into(), parent));
        if let Some(parent) = parent {
            self.scopes[parent.index()].children.push(id);
        }
        if kind == ScopeKind::File {
            self.file_scope = Some(id);
        }
        self.stack.push(id);
        Ok(ScopeGuard { id })
    }

    /// Close the current scope. Consumes the guard returned by the matching
    /// [`enter_scope`](Self::enter_scope); the scope itself stays in the tree
    /// for later lookup and reporting.
    pub fn exit_scope(&mut self, guard: ScopeGuard) -> LowerResult<ScopeId> {
        let Some(&top) = self.stack.last() else {
            return Err(LowerError::NoActiveScope);
        };
        if top != guard.id {
            return Err(LowerError::ScopeGuardMismatch);
        }
        self.stack.pop();
        Ok(top)
    }

    /// The innermost open scope.
    pub fn current(&self) -> Option<ScopeId> {
        self.stack.last().copied()
    }

    pub fn file_scope(&self) -> Option<ScopeId> {
        self.file_scope
    }

    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.index()]
    }

    /// Declare `symbol` in `namespace` of the current scope.
    pub fn add_symbol(&mut self, namespace: Namespace, symbol: Symbol) -> LowerResult<()> {
        let Some(&current) = self.stack.last() else {
            return Err(LowerError::NoActiveScope);
        };
        self.add_symbol_to(current, namespace, symbol)
    }

    /// Declare `symbol` in `namespace` of a specific scope. Used when a name
    /// belongs to an enclosing scope, e.g. a function name declared in the
    /// scope surrounding its definition.
    pub fn add_symbol_to(
        &mut self,
        id: ScopeId,
        namespace: Namespace,
        symbol: Symbol,
    ) -> LowerResult<()> {
        let scope = &mut self.scopes[id.index()];
        let kind = scope.kind;
        let name = scope.name.clone();
        let Some(table) = scope.tables.get_mut(&namespace) else {
            return Err(LowerError::UndefinedNamespace {
                namespace: namespace.as_str(),
                scope: kind.as_str(),
            });
        };
        table.insert(symbol).map_err(|rejected| LowerError::Redeclaration {
            name: rejected.name,
            namespace: namespace.as_str(),
            scope: name,
        })
    }

    /// Resolve `name` in `namespace`, starting at the current scope and
    /// delegating along the parent chain. A scope whose kind does not carry
    /// `namespace` is a miss there and delegation continues; the namespace is
    /// never switched mid-walk.
    pub fn lookup_symbol(&self, namespace: Namespace, name: &str) -> Option<&Symbol> {
        self.lookup_from(self.current()?, namespace, name)
    }

    /// Resolve `name` in `namespace` starting at an explicit scope.
    pub fn lookup_from(&self, from: ScopeId, namespace: Namespace, name: &str) -> Option<&Symbol> {
        let mut cursor = Some(from);
        while let Some(id) = cursor {
            let scope = self.scope(id);
            if let Some(symbol) = scope.table(namespace).and_then(|table| table.get(name)) {
                return Some(symbol);
            }
            cursor = scope.parent;
        }
        None
    }

    /// Indented rendering of the scope tree with every declared symbol, in
    /// declaration order. Debugging and test aid.
    pub fn report(&self) -> String {
        let mut out = String::new();
        if let Some(file) = self.file_scope {
            self.report_scope(file, 0, &mut out);
        }
        out
    }

    fn report_scope(&self, id: ScopeId, depth: usize, out: &mut String) {
        let scope = self.scope(id);
        for _ in 0..depth {
            out.push_str("  ");
        }
        out.push_str(scope.kind.as_str());
        out.push_str(" '");
        out.push_str(&scope.name);
        out.push_str("'\n");
        for &namespace in scope.kind.namespaces() {
            let Some(table) = scope.table(namespace) else { continue };
            if table.is_empty() {
                continue;
            }
            for _ in 0..=depth {
                out.push_str("  ");
            }
            out.push_str(namespace.as_str());
            out.push(':');
            for symbol in table.iter() {
                out.push(' ');
                out.push_str(&symbol.name);
            }
            out.push('\n');
        }
        for &child in scope.children() {
            self.report_scope(child, depth + 1, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Ast, NodeId, NodeKind};
    use crate::common::Span;
    use crate::sema::SymbolKind;

    fn node(ast: &mut Ast, name: &str) -> NodeId {
        ast.add_leaf(NodeKind::Identifier, name, Span::default())
    }

    fn variable(ast: &mut Ast, name: &str) -> Symbol {
        let id = node(ast, name);
        Symbol::new(name, SymbolKind::Variable, id)
    }

    #[test]
    fn test_first_scope_must_be_file() {
        let mut session = ScopeSession::new();
        let err = session.enter_scope(ScopeKind::Block, "orphan").unwrap_err();
        assert!(matches!(err, LowerError::NoActiveScope));
    }

    #[test]
    fn test_single_file_scope_per_session() {
        let mut session = ScopeSession::new();
        let _file = session.enter_scope(ScopeKind::File, "test.c").unwrap();
        let err = session.enter_scope(ScopeKind::File, "again.c").unwrap_err();
        assert!(matches!(err, LowerError::DuplicateFileScope));
    }

    #[test]
    fn test_lookup_delegates_to_parent() {
        let mut ast = Ast::new();
        let mut session = ScopeSession::new();
        let file = session.enter_scope(ScopeKind::File, "test.c").unwrap();
        let global = variable(&mut ast, "g");
        session.add_symbol(Namespace::Ordinary, global).unwrap();

        let func = session.enter_scope(ScopeKind::Function, "main").unwrap();
        let block = session.enter_scope(ScopeKind::Block, "body").unwrap();
        let local = variable(&mut ast, "x");
        session.add_symbol(Namespace::Ordinary, local).unwrap();

        assert!(session.lookup_symbol(Namespace::Ordinary, "x").is_some());
        assert!(session.lookup_symbol(Namespace::Ordinary, "g").is_some());
        assert!(session.lookup_symbol(Namespace::Ordinary, "missing").is_none());

        session.exit_scope(block).unwrap();
        // Leaving the block hides its locals but keeps the chain intact.
        assert!(session.lookup_symbol(Namespace::Ordinary, "x").is_none());
        assert!(session.lookup_symbol(Namespace::Ordinary, "g").is_some());
        session.exit_scope(func).unwrap();
        session.exit_scope(file).unwrap();
    }

    #[test]
    fn test_namespaces_are_isolated() {
        let mut ast = Ast::new();
        let mut session = ScopeSession::new();
        let _file = session.enter_scope(ScopeKind::File, "test.c").unwrap();
        let tag = node(&mut ast, "point");
        session
            .add_symbol(Namespace::Tags, Symbol::new("point", SymbolKind::Type, tag))
            .unwrap();

        // Same spelling in another namespace is a different name.
        assert!(session.lookup_symbol(Namespace::Tags, "point").is_some());
        assert!(session.lookup_symbol(Namespace::Ordinary, "point").is_none());

        let var = variable(&mut ast, "point");
        session.add_symbol(Namespace::Ordinary, var).unwrap();
        assert!(session.lookup_symbol(Namespace::Ordinary, "point").is_some());
    }

    #[test]
    fn test_redeclaration_in_same_namespace_fails() {
        let mut ast = Ast::new();
        let mut session = ScopeSession::new();
        let _file = session.enter_scope(ScopeKind::File, "test.c").unwrap();
        let first = variable(&mut ast, "x");
        session.add_symbol(Namespace::Ordinary, first).unwrap();

        let second = variable(&mut ast, "x");
        let err = session.add_symbol(Namespace::Ordinary, second).unwrap_err();
        assert!(matches!(err, LowerError::Redeclaration { .. }));
    }

    #[test]
    fn test_undefined_namespace_is_an_error() {
        let mut ast = Ast::new();
        let mut session = ScopeSession::new();
        let _file = session.enter_scope(ScopeKind::File, "test.c").unwrap();
        // File scopes carry no Labels namespace.
        let label = variable(&mut ast, "done");
        let err = session.add_symbol(Namespace::Labels, label).unwrap_err();
        assert!(matches!(err, LowerError::UndefinedNamespace { .. }));
    }

    #[test]
    fn test_lookup_skips_scopes_without_the_namespace() {
        let mut ast = Ast::new();
        let mut session = ScopeSession::new();
        let _file = session.enter_scope(ScopeKind::File, "test.c").unwrap();
        let func = session.enter_scope(ScopeKind::Function, "main").unwrap();
        let label = node(&mut ast, "done");
        session
            .add_symbol(Namespace::Labels, Symbol::new("done", SymbolKind::Variable, label))
            .unwrap();

        let _block = session.enter_scope(ScopeKind::Block, "body").unwrap();
        // Block scopes have no Labels table; delegation reaches the
        // function scope anyway.
        assert_eq!(session.current(), Some(_block.scope()));
        assert!(session.lookup_symbol(Namespace::Labels, "done").is_some());
        let _ = func;
    }

    #[test]
    fn test_exit_with_wrong_guard_fails() {
        let mut session = ScopeSession::new();
        let file = session.enter_scope(ScopeKind::File, "test.c").unwrap();
        let func = session.enter_scope(ScopeKind::Function, "main").unwrap();

        let err = session.exit_scope(file).unwrap_err();
        assert!(matches!(err, LowerError::ScopeGuardMismatch));

        // The stack is untouched by the failed exit.
        session.exit_scope(func).unwrap();
    }

    #[test]
    fn test_struct_scope_uses_members_namespace() {
        let mut ast = Ast::new();
        let mut session = ScopeSession::new();
        let _file = session.enter_scope(ScopeKind::File, "test.c").unwrap();
        let record = session.enter_scope(ScopeKind::StructUnionEnum, "point").unwrap();
        let member = variable(&mut ast, "x");
        session.add_symbol(Namespace::Members, member).unwrap();

        let err = session
            .add_symbol(Namespace::Ordinary, variable(&mut ast, "y"))
            .unwrap_err();
        assert!(matches!(err, LowerError::UndefinedNamespace { .. }));
        session.exit_scope(record).unwrap();
    }

    #[test]
    fn test_report_renders_the_tree() {
        let mut ast = Ast::new();
        let mut session = ScopeSession::new();
        let file = session.enter_scope(ScopeKind::File, "test.c").unwrap();
        session.add_symbol(Namespace::Ordinary, variable(&mut ast, "g")).unwrap();
        let func = session.enter_scope(ScopeKind::Function, "main").unwrap();
        session.add_symbol(Namespace::Ordinary, variable(&mut ast, "x")).unwrap();
        session.exit_scope(func).unwrap();
        session.exit_scope(file).unwrap();

        let report = session.report();
        assert!(report.contains("File 'test.c'"));
        assert!(report.contains("Ordinary: g"));
        assert!(report.contains("  Function 'main'"));
        assert!(report.contains("Ordinary: x"));
    }
}
