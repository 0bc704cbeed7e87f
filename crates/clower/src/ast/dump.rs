//! Indented textual dump of an AST, mainly for tests and debugging

use std::fmt::Write;

use super::{Ast, AstVisitor, NodeId};

/// Visitor rendering the tree one node per line, two spaces per level,
/// with non-empty slots labelled by their slot names.
#[derive(Debug, Default)]
pub struct AstDump {
    out: String,
}

impl AstDump {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render the subtree under `id`.
    pub fn render(ast: &Ast, id: NodeId) -> String {
        let mut dump = Self::new();
        ast.accept(id, &mut dump, &0);
        dump.out
    }

    /// Render the whole tree from the root; empty string when no root is set.
    pub fn render_root(ast: &Ast) -> String {
        ast.root().map_or_else(String::new, |root| Self::render(ast, root))
    }

    fn line(&mut self, depth: usize, text: &str) {
        for _ in 0..depth {
            self.out.push_str("  ");
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn leaf(&mut self, ast: &Ast, id: NodeId, depth: usize) {
        let node = ast.node(id);
        let lexeme = node.lexeme().unwrap_or("");
        let mut text = String::new();
        let _ = write!(text, "{} '{}'", node.name(), lexeme);
        self.line(depth, &text);
    }
}

impl AstVisitor for AstDump {
    type Output = ();
    type Context = usize;

    fn visit_children(&mut self, ast: &Ast, id: NodeId, depth: &usize) {
        let kind = ast.kind(id);
        self.line(*depth, ast.node(id).name());
        for slot in 0..ast.slot_count(id) {
            if ast.children(id, slot).is_empty() {
                continue;
            }
            if let Some(name) = kind.slot_name(slot) {
                self.line(depth + 1, name);
            }
            for &child in ast.children(id, slot) {
                ast.accept(child, self, &(depth + 2));
            }
        }
    }

    fn visit_identifier(&mut self, ast: &Ast, id: NodeId, depth: &usize) {
        self.leaf(ast, id, *depth);
    }

    fn visit_integer_constant(&mut self, ast: &Ast, id: NodeId, depth: &usize) {
        self.leaf(ast, id, *depth);
    }

    fn visit_string_literal(&mut self, ast: &Ast, id: NodeId, depth: &usize) {
        self.leaf(ast, id, *depth);
    }

    fn visit_integer_type(&mut self, ast: &Ast, id: NodeId, depth: &usize) {
        self.leaf(ast, id, *depth);
    }

    fn visit_char_type(&mut self, ast: &Ast, id: NodeId, depth: &usize) {
        self.leaf(ast, id, *depth);
    }
}
