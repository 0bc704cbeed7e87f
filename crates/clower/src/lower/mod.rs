//! CST to AST lowering engine
//!
//! The engine walks the parse tree once, top down. Every step receives a
//! [`Target`], the slot of an already-built AST node that the step's output
//! belongs to; handlers that build a composite pass fresh targets to their
//! operands. There is no mutable context stack and no "last created node"
//! register: placement is decided by the caller and carried down the
//! recursion, so a handler can never observe stale placement state.
//!
//! Declarators are the one place placement is deferred. A pointer chain is
//! built outermost-first and the innermost `TARGET` slot becomes the pending
//! target for whatever the declarator names, so `**p` lowers to
//! `PointerType(PointerType(Identifier))` without revisiting the chain.

use crate::ast::{slots, Ast, NodeId, NodeKind};
use crate::common::{LowerError, LowerResult};
use crate::cst::{CstChild, CstNode, Rule, Token, TokenKind};
use crate::sema::{Namespace, ScopeKind, ScopeSession, Symbol, SymbolKind};

/// Where the next lowered node is attached: a parent and one of its slots.
///
/// A target without a slot is a sink; trying to attach through it fails with
/// [`LowerError::NoTargetSlot`]. Top-level routing uses sinks for rules that
/// have no place in a translation unit.
#[derive(Debug, Clone, Copy)]
struct Target {
    parent: NodeId,
    slot: Option<usize>,
}

impl Target {
    fn new(parent: NodeId, slot: usize) -> Self {
        Self {
            parent,
            slot: Some(slot),
        }
    }

    fn sink(parent: NodeId) -> Self {
        Self { parent, slot: None }
    }
}

/// Result of one lowering pass: the AST, its root and the populated scope
/// session.
#[derive(Debug)]
pub struct Lowered {
    pub ast: Ast,
    pub root: NodeId,
    pub scopes: ScopeSession,
}

/// One-shot lowering engine. Construct, feed it a translation unit, take the
/// [`Lowered`] result.
#[derive(Debug, Default)]
pub struct Lowerer {
    ast: Ast,
    scopes: ScopeSession,
}

impl Lowerer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lower a `translation_unit` CST. `unit_name` names the File scope,
    /// conventionally the source file name.
    pub fn lower(mut self, unit: &CstNode, unit_name: &str) -> LowerResult<Lowered> {
        if unit.rule != Rule::TranslationUnit {
            return Err(LowerError::malformed(
                "translation_unit",
                format!("expected translation_unit, found {}", unit.rule.name()),
            ));
        }

        let file = self.scopes.enter_scope(ScopeKind::File, unit_name)?;
        let root = self.ast.add_composite(NodeKind::TranslationUnit);
        self.ast.set_root(root);
        for child in unit.rules() {
            self.lower_top_level(child, root)?;
        }
        self.scopes.exit_scope(file)?;

        Ok(Lowered {
            ast: self.ast,
            root,
            scopes: self.scopes,
        })
    }

    /// Route a top-level item into the translation unit's slots.
    fn lower_top_level(&mut self, node: &CstNode, root: NodeId) -> LowerResult<()> {
        match node.rule {
            Rule::ExternalDeclaration => {
                for child in node.rules() {
                    self.lower_top_level(child, root)?;
                }
                Ok(())
            }
            Rule::FunctionDefinition => self.lower_node(
                node,
                Target::new(root, slots::translation_unit::FUNCTION_DEFINITION),
            ),
            Rule::Declaration => self.lower_node(
                node,
                Target::new(root, slots::translation_unit::DECLARATIONS),
            ),
            _ => self.lower_node(node, Target::sink(root)),
        }
    }

    fn lower_node(&mut self, node: &CstNode, target: Target) -> LowerResult<()> {
        match node.rule {
            Rule::ExternalDeclaration => self.lower_top_level(node, target.parent),
            Rule::FunctionDefinition => self.lower_function_definition(node, target),
            Rule::Declaration => self.lower_declaration(node, target),
            Rule::ParameterDeclaration => self.lower_parameter_declaration(node, target),

            Rule::Declarator | Rule::InitDeclarator => self.lower_declarator(node, target),
            Rule::Pointer => self.lower_pointer(node, target).map(|_| ()),
            Rule::FunctionWithArguments => self.lower_function_declarator(node, target, true),
            Rule::FunctionWithNoArguments => self.lower_function_declarator(node, target, false),

            Rule::CompoundStatement => self.lower_compound_statement(node, target),
            Rule::ExpressionStatement => self.lower_expression_statement(node, target),

            Rule::Assignment => self.lower_assignment(node, target),
            Rule::Conditional => self.lower_conditional(node, target),
            Rule::Cast => self.lower_cast(node, target),
            Rule::UnaryOperator => self.lower_unary(node, target),
            Rule::UnaryIncrement => self.lower_wrapped(node, target, NodeKind::PreIncrement, slots::prefix::OPERAND),
            Rule::UnaryDecrement => self.lower_wrapped(node, target, NodeKind::PreDecrement, slots::prefix::OPERAND),
            Rule::SizeofExpression => {
                self.lower_wrapped(node, target, NodeKind::SizeOfExpression, slots::unary::EXPRESSION)
            }
            Rule::SizeofType => {
                self.lower_wrapped(node, target, NodeKind::SizeOfTypeName, slots::unary::EXPRESSION)
            }

            Rule::PostfixArraySubscript => self.lower_array_subscript(node, target),
            Rule::PostfixCallNoArgs => {
                self.lower_wrapped(node, target, NodeKind::FunctionCallNoArgs, slots::function_call::FUNCTION)
            }
            Rule::PostfixCallWithArgs => self.lower_call_with_args(node, target),
            Rule::PostfixMemberAccess => {
                self.lower_member_access(node, target, NodeKind::MemberAccess)
            }
            Rule::PostfixPointerMemberAccess => {
                self.lower_member_access(node, target, NodeKind::PointerMemberAccess)
            }
            Rule::PostfixIncrement => {
                self.lower_wrapped(node, target, NodeKind::PostIncrement, slots::postfix::ACCESS)
            }
            Rule::PostfixDecrement => {
                self.lower_wrapped(node, target, NodeKind::PostDecrement, slots::postfix::ACCESS)
            }

            rule => match binary_kind(rule) {
                Some(kind) => self.lower_binary(node, target, kind),
                // Wrapper rules pass the target through to their children.
                None => self.lower_children(node, target),
            },
        }
    }

    /// Default traversal: lower every child, rules and terminals alike, at
    /// the unchanged target.
    fn lower_children(&mut self, node: &CstNode, target: Target) -> LowerResult<()> {
        for child in &node.children {
            match child {
                CstChild::Rule(rule) => self.lower_node(rule, target)?,
                CstChild::Token(token) => self.lower_token(token, target)?,
            }
        }
        Ok(())
    }

    /// Terminal conversion. Identifiers, constants and the `int`/`char` type
    /// keywords become leaves; every other terminal is dropped.
    fn lower_token(&mut self, token: &Token, target: Target) -> LowerResult<()> {
        let kind = match token.kind {
            TokenKind::Identifier => NodeKind::Identifier,
            TokenKind::Constant => NodeKind::IntegerConstant,
            TokenKind::StringLiteral => NodeKind::StringLiteral,
            TokenKind::Int => NodeKind::IntegerType,
            TokenKind::Char => NodeKind::CharType,
            _ => return Ok(()),
        };
        let leaf = self.ast.add_leaf(kind, token.text.clone(), token.span);
        self.emit(target, leaf)
    }

    /// Attach `child` through `target`.
    fn emit(&mut self, target: Target, child: NodeId) -> LowerResult<()> {
        match target.slot {
            Some(slot) => self.ast.attach(target.parent, slot, child),
            None => Err(LowerError::NoTargetSlot {
                node: self.ast.node(child).name().to_string(),
            }),
        }
    }

    // Declarations

    fn lower_function_definition(&mut self, node: &CstNode, target: Target) -> LowerResult<()> {
        let def = self.ast.add_composite(NodeKind::FunctionDefinition);
        self.emit(target, def)?;

        if let Some(specs) = node.find_rule(Rule::DeclarationSpecifiers) {
            self.route_specifiers(specs, def)?;
        }
        let declarator = node
            .find_rule(Rule::Declarator)
            .ok_or_else(|| LowerError::malformed("function_definition", "missing declarator"))?;
        self.lower_node(declarator, Target::new(def, slots::function_definition::DECLARATOR))?;

        let declarator_root = self
            .ast
            .first_child(def, slots::function_definition::DECLARATOR)
            .ok_or_else(|| LowerError::malformed("function_definition", "empty declarator"))?;
        let name_id = self
            .ast
            .find_leaf(declarator_root, NodeKind::Identifier)
            .ok_or_else(|| {
                LowerError::malformed("function_definition", "declarator names no identifier")
            })?;
        let name = self.leaf_text(name_id);

        // The function's own name lives in the enclosing scope; its
        // parameters and body live in the new Function scope.
        self.scopes
            .add_symbol(Namespace::Ordinary, Symbol::new(&name, SymbolKind::Function, name_id))?;
        let guard = self.scopes.enter_scope(ScopeKind::Function, &name)?;
        self.declare_parameters(def, slots::function_definition::PARAMETER_DECLARATIONS)?;

        let body = node.find_rule(Rule::CompoundStatement).ok_or_else(|| {
            LowerError::malformed("function_definition", "missing function body")
        })?;
        self.lower_compound_statement(body, Target::new(def, slots::function_definition::FUNCTION_BODY))?;
        self.scopes.exit_scope(guard)?;
        Ok(())
    }

    fn lower_declaration(&mut self, node: &CstNode, target: Target) -> LowerResult<()> {
        let decl = self.ast.add_composite(NodeKind::Declaration);
        self.emit(target, decl)?;

        for child in node.rules() {
            match child.rule {
                Rule::DeclarationSpecifiers
                | Rule::TypeSpecifier
                | Rule::TypeQualifier
                | Rule::TypeQualifierList
                | Rule::StorageClassSpecifier => self.route_specifiers(child, decl)?,
                Rule::InitDeclaratorList => {
                    for init in child.rules() {
                        self.lower_one_declarator(init, decl)?;
                    }
                }
                Rule::InitDeclarator | Rule::Declarator => {
                    self.lower_one_declarator(child, decl)?;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Lower one declarator into the declaration's `DECLARATORS` slot and
    /// declare every name it introduced.
    fn lower_one_declarator(&mut self, node: &CstNode, decl: NodeId) -> LowerResult<()> {
        let slot = slots::declaration::DECLARATORS;
        let before = self.ast.children(decl, slot).len();
        self.lower_node(node, Target::new(decl, slot))?;
        let added: Vec<NodeId> = self.ast.children(decl, slot)[before..].to_vec();
        for id in added {
            self.declare_from_declarator(id)?;
        }
        Ok(())
    }

    fn lower_parameter_declaration(&mut self, node: &CstNode, target: Target) -> LowerResult<()> {
        let param = self.ast.add_composite(NodeKind::ParameterDeclaration);
        self.emit(target, param)?;
        for child in node.rules() {
            match child.rule {
                Rule::DeclarationSpecifiers
                | Rule::TypeSpecifier
                | Rule::TypeQualifier
                | Rule::TypeQualifierList
                | Rule::StorageClassSpecifier => self.route_specifiers(child, param)?,
                Rule::Declarator => self.lower_node(
                    child,
                    Target::new(param, slots::parameter_declaration::DECLARATOR),
                )?,
                _ => {}
            }
        }
        Ok(())
    }

    /// Route declaration specifiers to the slot their parent kind reserves
    /// for them. A specifier kind the parent has no slot for is dropped
    /// whole, subtree included.
    fn route_specifiers(&mut self, node: &CstNode, parent: NodeId) -> LowerResult<()> {
        match node.rule {
            Rule::DeclarationSpecifiers | Rule::TypeQualifierList => {
                for child in node.rules() {
                    self.route_specifiers(child, parent)?;
                }
                Ok(())
            }
            rule => {
                if let Some(slot) = specifier_slot(self.ast.kind(parent), rule) {
                    self.lower_node(node, Target::new(parent, slot))?;
                }
                Ok(())
            }
        }
    }

    // Declarators

    /// Lower a declarator: build the pointer chain first, then lower the
    /// named part at the pending target the chain left behind. The pending
    /// target is one-shot: the first child that attaches through it consumes
    /// it, and anything after that goes back to the declarator's own target.
    fn lower_declarator(&mut self, node: &CstNode, target: Target) -> LowerResult<()> {
        let mut pending = match node.find_rule(Rule::Pointer) {
            Some(pointer) => Some(self.lower_pointer(pointer, target)?),
            None => None,
        };
        for child in &node.children {
            let place = pending.unwrap_or(target);
            let before = self.slot_len(place);
            match child {
                CstChild::Rule(rule) if rule.rule == Rule::Pointer => continue,
                CstChild::Rule(rule) => self.lower_node(rule, place)?,
                CstChild::Token(token) => self.lower_token(token, place)?,
            }
            if self.slot_len(place) > before {
                pending = None;
            }
        }
        Ok(())
    }

    fn slot_len(&self, target: Target) -> usize {
        target
            .slot
            .map_or(0, |slot| self.ast.children(target.parent, slot).len())
    }

    /// Build a `PointerType` chain, one node per `*`, outermost first.
    /// Returns the innermost `TARGET` slot as the new pending target.
    fn lower_pointer(&mut self, node: &CstNode, target: Target) -> LowerResult<Target> {
        let mut pending = target;
        let mut cursor = Some(node);
        while let Some(pointer) = cursor {
            for _ in pointer.tokens().filter(|token| token.kind == TokenKind::Star) {
                let ptr = self.ast.add_composite(NodeKind::PointerType);
                self.emit(pending, ptr)?;
                pending = Target::new(ptr, slots::pointer_type::TARGET);
            }
            cursor = pointer.find_rule(Rule::Pointer);
        }
        Ok(pending)
    }

    /// Function declarators are routed by what they are attached to. Under a
    /// `FunctionDefinition` the name and parameters go straight into the
    /// definition's own slots; anywhere else (prototypes, parameters) they
    /// form a standalone `FunctionType` node at the target.
    fn lower_function_declarator(
        &mut self,
        node: &CstNode,
        target: Target,
        with_args: bool,
    ) -> LowerResult<()> {
        let inner = node.operand(0)?;
        if self.ast.kind(target.parent) == NodeKind::FunctionDefinition {
            let def = target.parent;
            self.lower_node(inner, Target::new(def, slots::function_definition::DECLARATOR))?;
            if with_args {
                let params = node.operand(1)?;
                self.lower_node(
                    params,
                    Target::new(def, slots::function_definition::PARAMETER_DECLARATIONS),
                )?;
            }
        } else {
            let func = self.ast.add_composite(NodeKind::FunctionType);
            self.emit(target, func)?;
            self.lower_node(inner, Target::new(func, slots::function_type::NAME))?;
            if with_args {
                let params = node.operand(1)?;
                let name = self.ast.node(func).name().to_string();
                let guard = self.scopes.enter_scope(ScopeKind::FunctionPrototype, name)?;
                self.lower_node(params, Target::new(func, slots::function_type::PARAMETERS))?;
                self.declare_parameters(func, slots::function_type::PARAMETERS)?;
                self.scopes.exit_scope(guard)?;
            }
        }
        Ok(())
    }

    // Statements

    /// Lower a compound statement. The body of a function definition runs in
    /// the Function scope the definition already opened; any other compound
    /// opens its own Block scope.
    fn lower_compound_statement(&mut self, node: &CstNode, target: Target) -> LowerResult<()> {
        let block = self.ast.add_composite(NodeKind::CompoundStatement);
        self.emit(target, block)?;

        let is_function_body = self.ast.kind(target.parent) == NodeKind::FunctionDefinition;
        let guard = if is_function_body {
            None
        } else {
            let name = self.ast.node(block).name().to_string();
            Some(self.scopes.enter_scope(ScopeKind::Block, name)?)
        };

        for child in node.rules() {
            let slot = if child.rule == Rule::Declaration {
                slots::compound_statement::DECLARATIONS
            } else {
                slots::compound_statement::STATEMENTS
            };
            self.lower_node(child, Target::new(block, slot))?;
        }

        if let Some(guard) = guard {
            self.scopes.exit_scope(guard)?;
        }
        Ok(())
    }

    fn lower_expression_statement(&mut self, node: &CstNode, target: Target) -> LowerResult<()> {
        let stmt = self.ast.add_composite(NodeKind::ExpressionStatement);
        self.emit(target, stmt)?;
        self.lower_children(node, Target::new(stmt, slots::expression_statement::EXPRESSION))
    }

    // Expressions

    fn lower_binary(&mut self, node: &CstNode, target: Target, kind: NodeKind) -> LowerResult<()> {
        let op = self.ast.add_composite(kind);
        self.emit(target, op)?;
        self.lower_node(node.operand(0)?, Target::new(op, slots::binary::LEFT))?;
        self.lower_node(node.operand(1)?, Target::new(op, slots::binary::RIGHT))
    }

    fn lower_assignment(&mut self, node: &CstNode, target: Target) -> LowerResult<()> {
        let token = node
            .first_token()
            .ok_or_else(|| LowerError::malformed("assignment_expression", "missing operator"))?;
        let kind = assignment_kind(token.kind)
            .ok_or_else(|| LowerError::unmapped("assignment", &token.text, token.span))?;
        self.lower_binary(node, target, kind)
    }

    fn lower_unary(&mut self, node: &CstNode, target: Target) -> LowerResult<()> {
        let token = node
            .first_token()
            .ok_or_else(|| LowerError::malformed("unary_expression", "missing operator"))?;
        let kind = unary_kind(token.kind)
            .ok_or_else(|| LowerError::unmapped("unary", &token.text, token.span))?;
        self.lower_wrapped(node, target, kind, slots::unary::EXPRESSION)
    }

    /// Single-operand composite: wrap operand 0 of `node` in a fresh node of
    /// `kind` at `slot`.
    fn lower_wrapped(
        &mut self,
        node: &CstNode,
        target: Target,
        kind: NodeKind,
        slot: usize,
    ) -> LowerResult<()> {
        let wrapper = self.ast.add_composite(kind);
        self.emit(target, wrapper)?;
        self.lower_node(node.operand(0)?, Target::new(wrapper, slot))
    }

    fn lower_conditional(&mut self, node: &CstNode, target: Target) -> LowerResult<()> {
        let cond = self.ast.add_composite(NodeKind::ConditionalExpression);
        self.emit(target, cond)?;
        self.lower_node(node.operand(0)?, Target::new(cond, slots::conditional::CONDITION))?;
        self.lower_node(node.operand(1)?, Target::new(cond, slots::conditional::TRUE_EXPRESSION))?;
        self.lower_node(node.operand(2)?, Target::new(cond, slots::conditional::FALSE_EXPRESSION))
    }

    fn lower_cast(&mut self, node: &CstNode, target: Target) -> LowerResult<()> {
        let cast = self.ast.add_composite(NodeKind::Cast);
        self.emit(target, cast)?;
        self.lower_node(node.operand(0)?, Target::new(cast, slots::cast::TYPE))?;
        self.lower_node(node.operand(1)?, Target::new(cast, slots::cast::EXPRESSION))
    }

    fn lower_array_subscript(&mut self, node: &CstNode, target: Target) -> LowerResult<()> {
        let subscript = self.ast.add_composite(NodeKind::ArraySubscript);
        self.emit(target, subscript)?;
        self.lower_node(node.operand(0)?, Target::new(subscript, slots::array_subscript::ARRAY))?;
        self.lower_node(node.operand(1)?, Target::new(subscript, slots::array_subscript::INDEX))
    }

    fn lower_call_with_args(&mut self, node: &CstNode, target: Target) -> LowerResult<()> {
        let call = self.ast.add_composite(NodeKind::FunctionCallWithArgs);
        self.emit(target, call)?;
        self.lower_node(node.operand(0)?, Target::new(call, slots::function_call::FUNCTION))?;
        self.lower_node(node.operand(1)?, Target::new(call, slots::function_call::ARGUMENTS))
    }

    fn lower_member_access(
        &mut self,
        node: &CstNode,
        target: Target,
        kind: NodeKind,
    ) -> LowerResult<()> {
        let access = self.ast.add_composite(kind);
        self.emit(target, access)?;
        self.lower_node(node.operand(0)?, Target::new(access, slots::member_access::ACCESS))?;
        let member = node
            .find_token(TokenKind::Identifier)
            .ok_or_else(|| LowerError::malformed("postfix_expression", "missing member name"))?;
        self.lower_token(member, Target::new(access, slots::member_access::MEMBER))
    }

    // Symbol declaration

    fn leaf_text(&self, id: NodeId) -> String {
        self.ast.node(id).lexeme().unwrap_or_default().to_string()
    }

    /// Declare the name a lowered declarator subtree introduced, if any.
    /// A subtree rooted at a `FunctionType` declares a function, anything
    /// else a variable.
    fn declare_from_declarator(&mut self, root: NodeId) -> LowerResult<()> {
        let Some(name_id) = self.ast.find_leaf(root, NodeKind::Identifier) else {
            return Ok(());
        };
        let kind = if self.ast.kind(root) == NodeKind::FunctionType {
            SymbolKind::Function
        } else {
            SymbolKind::Variable
        };
        let name = self.leaf_text(name_id);
        self.scopes
            .add_symbol(Namespace::Ordinary, Symbol::new(name, kind, name_id))
    }

    /// Declare every lowered parameter under `parent`'s `slot` in the current
    /// scope: the Function scope of a definition, the FunctionPrototype scope
    /// of a standalone function type.
    fn declare_parameters(&mut self, parent: NodeId, slot: usize) -> LowerResult<()> {
        let params: Vec<NodeId> = self.ast.children(parent, slot).to_vec();
        for param in params {
            let Some(declarator) = self
                .ast
                .first_child(param, slots::parameter_declaration::DECLARATOR)
            else {
                // Abstract declarator, e.g. `int f(int)`.
                continue;
            };
            let Some(name_id) = self.ast.find_leaf(declarator, NodeKind::Identifier) else {
                continue;
            };
            let name = self.leaf_text(name_id);
            self.scopes
                .add_symbol(Namespace::Ordinary, Symbol::new(name, SymbolKind::Variable, name_id))?;
        }
        Ok(())
    }
}

/// Slot a specifier rule is routed to under `parent`, or `None` when the
/// parent drops that specifier kind. Only declarations and parameter
/// declarations keep qualifiers and storage classes; function definitions
/// keep type specifiers only.
fn specifier_slot(parent: NodeKind, rule: Rule) -> Option<usize> {
    match (parent, rule) {
        (NodeKind::Declaration, Rule::TypeSpecifier) => Some(slots::declaration::TYPE_SPECIFIER),
        (NodeKind::Declaration, Rule::TypeQualifier) => Some(slots::declaration::TYPE_QUALIFIER),
        (NodeKind::Declaration, Rule::StorageClassSpecifier) => {
            Some(slots::declaration::STORAGE_SPECIFIER)
        }
        (NodeKind::ParameterDeclaration, Rule::TypeSpecifier) => {
            Some(slots::parameter_declaration::TYPE_SPECIFIER)
        }
        (NodeKind::ParameterDeclaration, Rule::TypeQualifier) => {
            Some(slots::parameter_declaration::TYPE_QUALIFIER)
        }
        (NodeKind::ParameterDeclaration, Rule::StorageClassSpecifier) => {
            Some(slots::parameter_declaration::STORAGE_SPECIFIER)
        }
        (NodeKind::FunctionDefinition, Rule::TypeSpecifier) => {
            Some(slots::function_definition::DECLARATION_SPECIFIERS)
        }
        _ => None,
    }
}

/// AST kind for a binary-operator rule alternative.
fn binary_kind(rule: Rule) -> Option<NodeKind> {
    let kind = match rule {
        Rule::Addition => NodeKind::Addition,
        Rule::Subtraction => NodeKind::Subtraction,
        Rule::Multiplication => NodeKind::Multiplication,
        Rule::Division => NodeKind::Division,
        Rule::Modulo => NodeKind::Modulo,
        Rule::And => NodeKind::BitwiseAnd,
        Rule::InclusiveOr => NodeKind::BitwiseOr,
        Rule::ExclusiveOr => NodeKind::BitwiseXor,
        Rule::LogicalAnd => NodeKind::LogicalAnd,
        Rule::LogicalOr => NodeKind::LogicalOr,
        Rule::EqualityEqual => NodeKind::EqualityEqual,
        Rule::EqualityNotEqual => NodeKind::EqualityNotEqual,
        Rule::RelationalLess => NodeKind::RelationalLess,
        Rule::RelationalGreater => NodeKind::RelationalGreater,
        Rule::RelationalLessEqual => NodeKind::RelationalLessOrEqual,
        Rule::RelationalGreaterEqual => NodeKind::RelationalGreaterOrEqual,
        Rule::ShiftLeft => NodeKind::ShiftLeft,
        Rule::ShiftRight => NodeKind::ShiftRight,
        Rule::CommaExpression => NodeKind::CommaExpression,
        _ => return None,
    };
    Some(kind)
}

/// AST kind for an assignment operator token.
fn assignment_kind(token: TokenKind) -> Option<NodeKind> {
    let kind = match token {
        TokenKind::Assign => NodeKind::Assignment,
        TokenKind::StarAssign => NodeKind::AssignMultiply,
        TokenKind::SlashAssign => NodeKind::AssignDivide,
        TokenKind::PercentAssign => NodeKind::AssignModulo,
        TokenKind::PlusAssign => NodeKind::AssignAdd,
        TokenKind::MinusAssign => NodeKind::AssignSubtract,
        TokenKind::ShlAssign => NodeKind::AssignShiftLeft,
        TokenKind::ShrAssign => NodeKind::AssignShiftRight,
        TokenKind::AmpAssign => NodeKind::AssignBitwiseAnd,
        TokenKind::CaretAssign => NodeKind::AssignBitwiseXor,
        TokenKind::PipeAssign => NodeKind::AssignBitwiseOr,
        _ => return None,
    };
    Some(kind)
}

/// AST kind for a unary operator token.
fn unary_kind(token: TokenKind) -> Option<NodeKind> {
    let kind = match token {
        TokenKind::Amp => NodeKind::AddressOf,
        TokenKind::Star => NodeKind::Dereference,
        TokenKind::Plus => NodeKind::UnaryPlus,
        TokenKind::Minus => NodeKind::UnaryMinus,
        TokenKind::Tilde => NodeKind::BitwiseNot,
        TokenKind::Bang => NodeKind::LogicalNot,
        _ => return None,
    };
    Some(kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Span;

    fn identifier(text: &str) -> CstNode {
        CstNode::new(Rule::PrimaryExpression).with_token(TokenKind::Identifier, text)
    }

    fn constant(text: &str) -> CstNode {
        CstNode::new(Rule::PrimaryExpression).with_token(TokenKind::Constant, text)
    }

    /// Lowering rig for expression-level tests: an engine plus a statement
    /// node to attach the expression under.
    fn expression_rig() -> (Lowerer, Target) {
        let mut lowerer = Lowerer::new();
        let stmt = lowerer.ast.add_composite(NodeKind::ExpressionStatement);
        let target = Target::new(stmt, slots::expression_statement::EXPRESSION);
        (lowerer, target)
    }

    fn lowered_expression(lowerer: &Lowerer, target: Target) -> NodeId {
        lowerer
            .ast
            .first_child(target.parent, slots::expression_statement::EXPRESSION)
            .unwrap()
    }

    #[test]
    fn test_assignment_dispatch_covers_all_operators() {
        let cases = [
            (TokenKind::Assign, "=", NodeKind::Assignment),
            (TokenKind::StarAssign, "*=", NodeKind::AssignMultiply),
            (TokenKind::SlashAssign, "/=", NodeKind::AssignDivide),
            (TokenKind::PercentAssign, "%=", NodeKind::AssignModulo),
            (TokenKind::PlusAssign, "+=", NodeKind::AssignAdd),
            (TokenKind::MinusAssign, "-=", NodeKind::AssignSubtract),
            (TokenKind::ShlAssign, "<<=", NodeKind::AssignShiftLeft),
            (TokenKind::ShrAssign, ">>=", NodeKind::AssignShiftRight),
            (TokenKind::AmpAssign, "&=", NodeKind::AssignBitwiseAnd),
            (TokenKind::CaretAssign, "^=", NodeKind::AssignBitwiseXor),
            (TokenKind::PipeAssign, "|=", NodeKind::AssignBitwiseOr),
        ];
        for (token, text, expected) in cases {
            let (mut lowerer, target) = expression_rig();
            let node = CstNode::new(Rule::Assignment)
                .with(identifier("x"))
                .with_token(token, text)
                .with(constant("1"));
            lowerer.lower_node(&node, target).unwrap();

            let assign = lowered_expression(&lowerer, target);
            assert_eq!(lowerer.ast.kind(assign), expected, "{text}");
            assert_eq!(
                lowerer.ast.children(assign, slots::binary::LEFT).len(),
                1,
                "{text}"
            );
            assert_eq!(
                lowerer.ast.children(assign, slots::binary::RIGHT).len(),
                1,
                "{text}"
            );
        }
    }

    #[test]
    fn test_unmapped_assignment_operator_fails_with_its_span() {
        let (mut lowerer, target) = expression_rig();
        let mut node = CstNode::new(Rule::Assignment).with(identifier("x"));
        node.push(CstChild::Token(
            Token::new(TokenKind::Plus, "+").with_span(Span::new(4, 5)),
        ));
        let node = node.with(constant("1"));

        let err = lowerer.lower_node(&node, target).unwrap_err();
        assert!(matches!(err, LowerError::UnmappedOperator { category: "assignment", .. }));
        assert_eq!(err.span(), Some(Span::new(4, 5)));
    }

    #[test]
    fn test_pointer_pending_target_takes_one_named_part() {
        let mut lowerer = Lowerer::new();
        let decl = lowerer.ast.add_composite(NodeKind::Declaration);
        let declarator = CstNode::new(Rule::Declarator)
            .with(CstNode::new(Rule::Pointer).with_token(TokenKind::Star, "*"))
            .with_token(TokenKind::Identifier, "p")
            .with_token(TokenKind::Identifier, "q");
        lowerer
            .lower_node(&declarator, Target::new(decl, slots::declaration::DECLARATORS))
            .unwrap();

        // `p` consumes the pointer's pending target; `q` lands back at the
        // declarator's own slot.
        let ast = &lowerer.ast;
        let declarators = ast.children(decl, slots::declaration::DECLARATORS);
        assert_eq!(declarators.len(), 2);
        assert_eq!(ast.kind(declarators[0]), NodeKind::PointerType);
        let named = ast.first_child(declarators[0], slots::pointer_type::TARGET).unwrap();
        assert_eq!(ast.node(named).lexeme(), Some("p"));
        assert_eq!(ast.children(declarators[0], slots::pointer_type::TARGET).len(), 1);
        assert_eq!(ast.node(declarators[1]).lexeme(), Some("q"));
    }

    #[test]
    fn test_unary_dispatch_covers_all_operators() {
        let cases = [
            (TokenKind::Amp, "&", NodeKind::AddressOf),
            (TokenKind::Star, "*", NodeKind::Dereference),
            (TokenKind::Plus, "+", NodeKind::UnaryPlus),
            (TokenKind::Minus, "-", NodeKind::UnaryMinus),
            (TokenKind::Tilde, "~", NodeKind::BitwiseNot),
            (TokenKind::Bang, "!", NodeKind::LogicalNot),
        ];
        for (token, text, expected) in cases {
            let (mut lowerer, target) = expression_rig();
            let node = CstNode::new(Rule::UnaryOperator)
                .with_token(token, text)
                .with(identifier("x"));
            lowerer.lower_node(&node, target).unwrap();

            let op = lowered_expression(&lowerer, target);
            assert_eq!(lowerer.ast.kind(op), expected, "{text}");
            let operand = lowerer.ast.first_child(op, slots::unary::EXPRESSION).unwrap();
            assert_eq!(lowerer.ast.kind(operand), NodeKind::Identifier, "{text}");
        }
    }

    #[test]
    fn test_binary_operands_keep_their_sides() {
        let (mut lowerer, target) = expression_rig();
        let node = CstNode::new(Rule::Subtraction)
            .with(identifier("a"))
            .with_token(TokenKind::Minus, "-")
            .with(constant("1"));
        lowerer.lower_node(&node, target).unwrap();

        let op = lowered_expression(&lowerer, target);
        assert_eq!(lowerer.ast.kind(op), NodeKind::Subtraction);
        let left = lowerer.ast.first_child(op, slots::binary::LEFT).unwrap();
        let right = lowerer.ast.first_child(op, slots::binary::RIGHT).unwrap();
        assert_eq!(lowerer.ast.node(left).lexeme(), Some("a"));
        assert_eq!(lowerer.ast.node(right).lexeme(), Some("1"));
    }

    #[test]
    fn test_pointer_chain_is_built_outermost_first() {
        let mut lowerer = Lowerer::new();
        let _file = lowerer.scopes.enter_scope(ScopeKind::File, "test.c").unwrap();
        let tu = lowerer.ast.add_composite(NodeKind::TranslationUnit);

        // int **p;
        let decl = CstNode::new(Rule::Declaration)
            .with(
                CstNode::new(Rule::DeclarationSpecifiers)
                    .with(CstNode::new(Rule::TypeSpecifier).with_token(TokenKind::Int, "int")),
            )
            .with(CstNode::new(Rule::InitDeclaratorList).with(
                CstNode::new(Rule::Declarator)
                    .with(
                        CstNode::new(Rule::Pointer)
                            .with_token(TokenKind::Star, "*")
                            .with_token(TokenKind::Star, "*"),
                    )
                    .with_token(TokenKind::Identifier, "p"),
            ));
        lowerer
            .lower_node(&decl, Target::new(tu, slots::translation_unit::DECLARATIONS))
            .unwrap();

        let ast = &lowerer.ast;
        let decl_id = ast.first_child(tu, slots::translation_unit::DECLARATIONS).unwrap();
        let outer = ast.first_child(decl_id, slots::declaration::DECLARATORS).unwrap();
        assert_eq!(ast.kind(outer), NodeKind::PointerType);
        let inner = ast.first_child(outer, slots::pointer_type::TARGET).unwrap();
        assert_eq!(ast.kind(inner), NodeKind::PointerType);
        let name = ast.first_child(inner, slots::pointer_type::TARGET).unwrap();
        assert_eq!(ast.node(name).lexeme(), Some("p"));

        // The declared symbol is reachable through the pointer chain.
        assert!(lowerer.scopes.lookup_symbol(Namespace::Ordinary, "p").is_some());
    }

    #[test]
    fn test_qualifiers_route_but_leave_no_leaves() {
        let mut lowerer = Lowerer::new();
        let _file = lowerer.scopes.enter_scope(ScopeKind::File, "test.c").unwrap();
        let tu = lowerer.ast.add_composite(NodeKind::TranslationUnit);

        // const static int x;
        let decl = CstNode::new(Rule::Declaration)
            .with(
                CstNode::new(Rule::DeclarationSpecifiers)
                    .with(CstNode::new(Rule::TypeQualifier).with_token(TokenKind::Const, "const"))
                    .with(
                        CstNode::new(Rule::StorageClassSpecifier)
                            .with_token(TokenKind::Static, "static"),
                    )
                    .with(CstNode::new(Rule::TypeSpecifier).with_token(TokenKind::Int, "int")),
            )
            .with(
                CstNode::new(Rule::InitDeclaratorList)
                    .with(CstNode::new(Rule::Declarator).with_token(TokenKind::Identifier, "x")),
            );
        lowerer
            .lower_node(&decl, Target::new(tu, slots::translation_unit::DECLARATIONS))
            .unwrap();

        let ast = &lowerer.ast;
        let decl_id = ast.first_child(tu, slots::translation_unit::DECLARATIONS).unwrap();
        let ty = ast.first_child(decl_id, slots::declaration::TYPE_SPECIFIER).unwrap();
        assert_eq!(ast.kind(ty), NodeKind::IntegerType);
        // `const` and `static` have no terminal lowering, so the routed
        // slots stay empty.
        assert!(ast.children(decl_id, slots::declaration::TYPE_QUALIFIER).is_empty());
        assert!(ast.children(decl_id, slots::declaration::STORAGE_SPECIFIER).is_empty());
    }

    #[test]
    fn test_prototype_builds_standalone_function_type() {
        let mut lowerer = Lowerer::new();
        let _file = lowerer.scopes.enter_scope(ScopeKind::File, "test.c").unwrap();
        let tu = lowerer.ast.add_composite(NodeKind::TranslationUnit);

        // int f(int a);
        let decl = CstNode::new(Rule::Declaration)
            .with(
                CstNode::new(Rule::DeclarationSpecifiers)
                    .with(CstNode::new(Rule::TypeSpecifier).with_token(TokenKind::Int, "int")),
            )
            .with(CstNode::new(Rule::InitDeclaratorList).with(
                CstNode::new(Rule::Declarator).with(
                    CstNode::new(Rule::FunctionWithArguments)
                        .with(
                            CstNode::new(Rule::DirectDeclarator)
                                .with_token(TokenKind::Identifier, "f"),
                        )
                        .with(CstNode::new(Rule::ParameterTypeList).with(
                            CstNode::new(Rule::ParameterList).with(
                                CstNode::new(Rule::ParameterDeclaration)
                                    .with(CstNode::new(Rule::TypeSpecifier).with_token(TokenKind::Int, "int"))
                                    .with(
                                        CstNode::new(Rule::Declarator)
                                            .with_token(TokenKind::Identifier, "a"),
                                    ),
                            ),
                        )),
                ),
            ));
        lowerer
            .lower_node(&decl, Target::new(tu, slots::translation_unit::DECLARATIONS))
            .unwrap();

        let ast = &lowerer.ast;
        let decl_id = ast.first_child(tu, slots::translation_unit::DECLARATIONS).unwrap();
        let func = ast.first_child(decl_id, slots::declaration::DECLARATORS).unwrap();
        assert_eq!(ast.kind(func), NodeKind::FunctionType);
        let name = ast.first_child(func, slots::function_type::NAME).unwrap();
        assert_eq!(ast.node(name).lexeme(), Some("f"));
        let param = ast.first_child(func, slots::function_type::PARAMETERS).unwrap();
        assert_eq!(ast.kind(param), NodeKind::ParameterDeclaration);

        let symbol = lowerer.scopes.lookup_symbol(Namespace::Ordinary, "f").unwrap();
        assert_eq!(symbol.kind, SymbolKind::Function);
    }

    #[test]
    fn test_sink_target_rejects_materialized_nodes() {
        let mut lowerer = Lowerer::new();
        let tu = lowerer.ast.add_composite(NodeKind::TranslationUnit);
        let err = lowerer
            .lower_node(&constant("1"), Target::sink(tu))
            .unwrap_err();
        assert!(matches!(err, LowerError::NoTargetSlot { .. }));
    }
}
