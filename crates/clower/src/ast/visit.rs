//! Visitor contract and generic traversal
//!
//! [`Ast::accept`] performs the double dispatch: it matches the node's kind
//! and calls the visitor method for exactly that kind, threading the caller's
//! context value through. Every method defaults to [`AstVisitor::visit_children`]
//! (leaves default to an empty result), so a visitor that overrides only the
//! kinds it cares about is still total over the whole tree. Traversal order
//! is fixed: slots in index order, children within a slot in insertion order.

use super::{Ast, NodeId, NodeKind};

/// Depth-first AST visitor with one method per node kind.
///
/// `Output` is the per-node result (`Default` supplies the value for nodes
/// the visitor does not handle); `Context` is an arbitrary value the caller
/// threads down the traversal, e.g. a depth or the enclosing node.
pub trait AstVisitor {
    type Output: Default;
    type Context;

    /// Generic traversal: visit every child of `id`, slots in index order,
    /// children in insertion order.
    fn visit_children(&mut self, ast: &Ast, id: NodeId, ctx: &Self::Context) -> Self::Output
    where
        Self: Sized,
    {
        for slot in 0..ast.slot_count(id) {
            for &child in ast.children(id, slot) {
                ast.accept(child, self, ctx);
            }
        }
        Self::Output::default()
    }

    // Program structure

    fn visit_translation_unit(&mut self, ast: &Ast, id: NodeId, ctx: &Self::Context) -> Self::Output
    where
        Self: Sized,
    {
        self.visit_children(ast, id, ctx)
    }

    fn visit_declaration(&mut self, ast: &Ast, id: NodeId, ctx: &Self::Context) -> Self::Output
    where
        Self: Sized,
    {
        self.visit_children(ast, id, ctx)
    }

    fn visit_function_definition(
        &mut self,
        ast: &Ast,
        id: NodeId,
        ctx: &Self::Context,
    ) -> Self::Output
    where
        Self: Sized,
    {
        self.visit_children(ast, id, ctx)
    }

    fn visit_parameter_declaration(
        &mut self,
        ast: &Ast,
        id: NodeId,
        ctx: &Self::Context,
    ) -> Self::Output
    where
        Self: Sized,
    {
        self.visit_children(ast, id, ctx)
    }

    // Types

    fn visit_pointer_type(&mut self, ast: &Ast, id: NodeId, ctx: &Self::Context) -> Self::Output
    where
        Self: Sized,
    {
        self.visit_children(ast, id, ctx)
    }

    fn visit_function_type(&mut self, ast: &Ast, id: NodeId, ctx: &Self::Context) -> Self::Output
    where
        Self: Sized,
    {
        self.visit_children(ast, id, ctx)
    }

    // Statements

    fn visit_compound_statement(
        &mut self,
        ast: &Ast,
        id: NodeId,
        ctx: &Self::Context,
    ) -> Self::Output
    where
        Self: Sized,
    {
        self.visit_children(ast, id, ctx)
    }

    fn visit_expression_statement(
        &mut self,
        ast: &Ast,
        id: NodeId,
        ctx: &Self::Context,
    ) -> Self::Output
    where
        Self: Sized,
    {
        self.visit_children(ast, id, ctx)
    }

    // Binary expressions

    fn visit_addition(&mut self, ast: &Ast, id: NodeId, ctx: &Self::Context) -> Self::Output
    where
        Self: Sized,
    {
        self.visit_children(ast, id, ctx)
    }

    fn visit_subtraction(&mut self, ast: &Ast, id: NodeId, ctx: &Self::Context) -> Self::Output
    where
        Self: Sized,
    {
        self.visit_children(ast, id, ctx)
    }

    fn visit_multiplication(&mut self, ast: &Ast, id: NodeId, ctx: &Self::Context) -> Self::Output
    where
        Self: Sized,
    {
        self.visit_children(ast, id, ctx)
    }

    fn visit_division(&mut self, ast: &Ast, id: NodeId, ctx: &Self::Context) -> Self::Output
    where
        Self: Sized,
    {
        self.visit_children(ast, id, ctx)
    }

    fn visit_modulo(&mut self, ast: &Ast, id: NodeId, ctx: &Self::Context) -> Self::Output
    where
        Self: Sized,
    {
        self.visit_children(ast, id, ctx)
    }

    fn visit_bitwise_and(&mut self, ast: &Ast, id: NodeId, ctx: &Self::Context) -> Self::Output
    where
        Self: Sized,
    {
        self.visit_children(ast, id, ctx)
    }

    fn visit_bitwise_or(&mut self, ast: &Ast, id: NodeId, ctx: &Self::Context) -> Self::Output
    where
        Self: Sized,
    {
        self.visit_children(ast, id, ctx)
    }

    fn visit_bitwise_xor(&mut self, ast: &Ast, id: NodeId, ctx: &Self::Context) -> Self::Output
    where
        Self: Sized,
    {
        self.visit_children(ast, id, ctx)
    }

    fn visit_logical_and(&mut self, ast: &Ast, id: NodeId, ctx: &Self::Context) -> Self::Output
    where
        Self: Sized,
    {
        self.visit_children(ast, id, ctx)
    }

    fn visit_logical_or(&mut self, ast: &Ast, id: NodeId, ctx: &Self::Context) -> Self::Output
    where
        Self: Sized,
    {
        self.visit_children(ast, id, ctx)
    }

    fn visit_equality_equal(&mut self, ast: &Ast, id: NodeId, ctx: &Self::Context) -> Self::Output
    where
        Self: Sized,
    {
        self.visit_children(ast, id, ctx)
    }

    fn visit_equality_not_equal(
        &mut self,
        ast: &Ast,
        id: NodeId,
        ctx: &Self::Context,
    ) -> Self::Output
    where
        Self: Sized,
    {
        self.visit_children(ast, id, ctx)
    }

    fn visit_relational_less(&mut self, ast: &Ast, id: NodeId, ctx: &Self::Context) -> Self::Output
    where
        Self: Sized,
    {
        self.visit_children(ast, id, ctx)
    }

    fn visit_relational_greater(
        &mut self,
        ast: &Ast,
        id: NodeId,
        ctx: &Self::Context,
    ) -> Self::Output
    where
        Self: Sized,
    {
        self.visit_children(ast, id, ctx)
    }

    fn visit_relational_less_or_equal(
        &mut self,
        ast: &Ast,
        id: NodeId,
        ctx: &Self::Context,
    ) -> Self::Output
    where
        Self: Sized,
    {
        self.visit_children(ast, id, ctx)
    }

    fn visit_relational_greater_or_equal(
        &mut self,
        ast: &Ast,
        id: NodeId,
        ctx: &Self::Context,
    ) -> Self::Output
    where
        Self: Sized,
    {
        self.visit_children(ast, id, ctx)
    }

    fn visit_shift_left(&mut self, ast: &Ast, id: NodeId, ctx: &Self::Context) -> Self::Output
    where
        Self: Sized,
    {
        self.visit_children(ast, id, ctx)
    }

    fn visit_shift_right(&mut self, ast: &Ast, id: NodeId, ctx: &Self::Context) -> Self::Output
    where
        Self: Sized,
    {
        self.visit_children(ast, id, ctx)
    }

    fn visit_comma_expression(&mut self, ast: &Ast, id: NodeId, ctx: &Self::Context) -> Self::Output
    where
        Self: Sized,
    {
        self.visit_children(ast, id, ctx)
    }

    // Assignment expressions

    fn visit_assignment(&mut self, ast: &Ast, id: NodeId, ctx: &Self::Context) -> Self::Output
    where
        Self: Sized,
    {
        self.visit_children(ast, id, ctx)
    }

    fn visit_assign_multiply(&mut self, ast: &Ast, id: NodeId, ctx: &Self::Context) -> Self::Output
    where
        Self: Sized,
    {
        self.visit_children(ast, id, ctx)
    }

    fn visit_assign_divide(&mut self, ast: &Ast, id: NodeId, ctx: &Self::Context) -> Self::Output
    where
        Self: Sized,
    {
        self.visit_children(ast, id, ctx)
    }

    fn visit_assign_modulo(&mut self, ast: &Ast, id: NodeId, ctx: &Self::Context) -> Self::Output
    where
        Self: Sized,
    {
        self.visit_children(ast, id, ctx)
    }

    fn visit_assign_add(&mut self, ast: &Ast, id: NodeId, ctx: &Self::Context) -> Self::Output
    where
        Self: Sized,
    {
        self.visit_children(ast, id, ctx)
    }

    fn visit_assign_subtract(&mut self, ast: &Ast, id: NodeId, ctx: &Self::Context) -> Self::Output
    where
        Self: Sized,
    {
        self.visit_children(ast, id, ctx)
    }

    fn visit_assign_shift_left(&mut self, ast: &Ast, id: NodeId, ctx: &Self::Context) -> Self::Output
    where
        Self: Sized,
    {
        self.visit_children(ast, id, ctx)
    }

    fn visit_assign_shift_right(
        &mut self,
        ast: &Ast,
        id: NodeId,
        ctx: &Self::Context,
    ) -> Self::Output
    where
        Self: Sized,
    {
        self.visit_children(ast, id, ctx)
    }

    fn visit_assign_bitwise_and(
        &mut self,
        ast: &Ast,
        id: NodeId,
        ctx: &Self::Context,
    ) -> Self::Output
    where
        Self: Sized,
    {
        self.visit_children(ast, id, ctx)
    }

    fn visit_assign_bitwise_xor(
        &mut self,
        ast: &Ast,
        id: NodeId,
        ctx: &Self::Context,
    ) -> Self::Output
    where
        Self: Sized,
    {
        self.visit_children(ast, id, ctx)
    }

    fn visit_assign_bitwise_or(&mut self, ast: &Ast, id: NodeId, ctx: &Self::Context) -> Self::Output
    where
        Self: Sized,
    {
        self.visit_children(ast, id, ctx)
    }

    // Unary expressions

    fn visit_address_of(&mut self, ast: &Ast, id: NodeId, ctx: &Self::Context) -> Self::Output
    where
        Self: Sized,
    {
        self.visit_children(ast, id, ctx)
    }

    fn visit_dereference(&mut self, ast: &Ast, id: NodeId, ctx: &Self::Context) -> Self::Output
    where
        Self: Sized,
    {
        self.visit_children(ast, id, ctx)
    }

    fn visit_unary_plus(&mut self, ast: &Ast, id: NodeId, ctx: &Self::Context) -> Self::Output
    where
        Self: Sized,
    {
        self.visit_children(ast, id, ctx)
    }

    fn visit_unary_minus(&mut self, ast: &Ast, id: NodeId, ctx: &Self::Context) -> Self::Output
    where
        Self: Sized,
    {
        self.visit_children(ast, id, ctx)
    }

    fn visit_bitwise_not(&mut self, ast: &Ast, id: NodeId, ctx: &Self::Context) -> Self::Output
    where
        Self: Sized,
    {
        self.visit_children(ast, id, ctx)
    }

    fn visit_logical_not(&mut self, ast: &Ast, id: NodeId, ctx: &Self::Context) -> Self::Output
    where
        Self: Sized,
    {
        self.visit_children(ast, id, ctx)
    }

    fn visit_pre_increment(&mut self, ast: &Ast, id: NodeId, ctx: &Self::Context) -> Self::Output
    where
        Self: Sized,
    {
        self.visit_children(ast, id, ctx)
    }

    fn visit_pre_decrement(&mut self, ast: &Ast, id: NodeId, ctx: &Self::Context) -> Self::Output
    where
        Self: Sized,
    {
        self.visit_children(ast, id, ctx)
    }

    fn visit_sizeof_expression(&mut self, ast: &Ast, id: NodeId, ctx: &Self::Context) -> Self::Output
    where
        Self: Sized,
    {
        self.visit_children(ast, id, ctx)
    }

    fn visit_sizeof_type_name(&mut self, ast: &Ast, id: NodeId, ctx: &Self::Context) -> Self::Output
    where
        Self: Sized,
    {
        self.visit_children(ast, id, ctx)
    }

    fn visit_cast(&mut self, ast: &Ast, id: NodeId, ctx: &Self::Context) -> Self::Output
    where
        Self: Sized,
    {
        self.visit_children(ast, id, ctx)
    }

    // Postfix expressions

    fn visit_array_subscript(&mut self, ast: &Ast, id: NodeId, ctx: &Self::Context) -> Self::Output
    where
        Self: Sized,
    {
        self.visit_children(ast, id, ctx)
    }

    fn visit_function_call_no_args(
        &mut self,
        ast: &Ast,
        id: NodeId,
        ctx: &Self::Context,
    ) -> Self::Output
    where
        Self: Sized,
    {
        self.visit_children(ast, id, ctx)
    }

    fn visit_function_call_with_args(
        &mut self,
        ast: &Ast,
        id: NodeId,
        ctx: &Self::Context,
    ) -> Self::Output
    where
        Self: Sized,
    {
        self.visit_children(ast, id, ctx)
    }

    fn visit_member_access(&mut self, ast: &Ast, id: NodeId, ctx: &Self::Context) -> Self::Output
    where
        Self: Sized,
    {
        self.visit_children(ast, id, ctx)
    }

    fn visit_pointer_member_access(
        &mut self,
        ast: &Ast,
        id: NodeId,
        ctx: &Self::Context,
    ) -> Self::Output
    where
        Self: Sized,
    {
        self.visit_children(ast, id, ctx)
    }

    fn visit_post_increment(&mut self, ast: &Ast, id: NodeId, ctx: &Self::Context) -> Self::Output
    where
        Self: Sized,
    {
        self.visit_children(ast, id, ctx)
    }

    fn visit_post_decrement(&mut self, ast: &Ast, id: NodeId, ctx: &Self::Context) -> Self::Output
    where
        Self: Sized,
    {
        self.visit_children(ast, id, ctx)
    }

    // Ternary

    fn visit_conditional_expression(
        &mut self,
        ast: &Ast,
        id: NodeId,
        ctx: &Self::Context,
    ) -> Self::Output
    where
        Self: Sized,
    {
        self.visit_children(ast, id, ctx)
    }

    // Leaves

    fn visit_identifier(&mut self, _ast: &Ast, _id: NodeId, _ctx: &Self::Context) -> Self::Output {
        Self::Output::default()
    }

    fn visit_integer_constant(
        &mut self,
        _ast: &Ast,
        _id: NodeId,
        _ctx: &Self::Context,
    ) -> Self::Output {
        Self::Output::default()
    }

    fn visit_string_literal(&mut self, _ast: &Ast, _id: NodeId, _ctx: &Self::Context) -> Self::Output {
        Self::Output::default()
    }

    fn visit_integer_type(&mut self, _ast: &Ast, _id: NodeId, _ctx: &Self::Context) -> Self::Output {
        Self::Output::default()
    }

    fn visit_char_type(&mut self, _ast: &Ast, _id: NodeId, _ctx: &Self::Context) -> Self::Output {
        Self::Output::default()
    }
}

impl Ast {
    /// Double dispatch: route `id` to the visitor method for its kind.
    pub fn accept<V: AstVisitor>(&self, id: NodeId, visitor: &mut V, ctx: &V::Context) -> V::Output {
        match self.kind(id) {
            NodeKind::TranslationUnit => visitor.visit_translation_unit(self, id, ctx),
            NodeKind::Declaration => visitor.visit_declaration(self, id, ctx),
            NodeKind::FunctionDefinition => visitor.visit_function_definition(self, id, ctx),
            NodeKind::ParameterDeclaration => visitor.visit_parameter_declaration(self, id, ctx),
            NodeKind::PointerType => visitor.visit_pointer_type(self, id, ctx),
            NodeKind::FunctionType => visitor.visit_function_type(self, id, ctx),
            NodeKind::CompoundStatement => visitor.visit_compound_statement(self, id, ctx),
            NodeKind::ExpressionStatement => visitor.visit_expression_statement(self, id, ctx),
            NodeKind::Addition => visitor.visit_addition(self, id, ctx),
            NodeKind::Subtraction => visitor.visit_subtraction(self, id, ctx),
            NodeKind::Multiplication => visitor.visit_multiplication(self, id, ctx),
            NodeKind::Division => visitor.visit_division(self, id, ctx),
            NodeKind::Modulo => visitor.visit_modulo(self, id, ctx),
            NodeKind::BitwiseAnd => visitor.visit_bitwise_and(self, id, ctx),
            NodeKind::BitwiseOr => visitor.visit_bitwise_or(self, id, ctx),
            NodeKind::BitwiseXor => visitor.visit_bitwise_xor(self, id, ctx),
            NodeKind::LogicalAnd => visitor.visit_logical_and(self, id, ctx),
            NodeKind::LogicalOr => visitor.visit_logical_or(self, id, ctx),
            NodeKind::EqualityEqual => visitor.visit_equality_equal(self, id, ctx),
            NodeKind::EqualityNotEqual => visitor.visit_equality_not_equal(self, id, ctx),
            NodeKind::RelationalLess => visitor.visit_relational_less(self, id, ctx),
            NodeKind::RelationalGreater => visitor.visit_relational_greater(self, id, ctx),
            NodeKind::RelationalLessOrEqual => visitor.visit_relational_less_or_equal(self, id, ctx),
            NodeKind::RelationalGreaterOrEqual => {
                visitor.visit_relational_greater_or_equal(self, id, ctx)
            }
            NodeKind::ShiftLeft => visitor.visit_shift_left(self, id, ctx),
            NodeKind::ShiftRight => visitor.visit_shift_right(self, id, ctx),
            NodeKind::CommaExpression => visitor.visit_comma_expression(self, id, ctx),
            NodeKind::Assignment => visitor.visit_assignment(self, id, ctx),
            NodeKind::AssignMultiply => visitor.visit_assign_multiply(self, id, ctx),
            NodeKind::AssignDivide => visitor.visit_assign_divide(self, id, ctx),
            NodeKind::AssignModulo => visitor.visit_assign_modulo(self, id, ctx),
            NodeKind::AssignAdd => visitor.visit_assign_add(self, id, ctx),
            NodeKind::AssignSubtract => visitor.visit_assign_subtract(self, id, ctx),
            NodeKind::AssignShiftLeft => visitor.visit_assign_shift_left(self, id, ctx),
            NodeKind::AssignShiftRight => visitor.visit_assign_shift_right(self, id, ctx),
            NodeKind::AssignBitwiseAnd => visitor.visit_assign_bitwise_and(self, id, ctx),
            NodeKind::AssignBitwiseXor => visitor.visit_assign_bitwise_xor(self, id, ctx),
            NodeKind::AssignBitwiseOr => visitor.visit_assign_bitwise_or(self, id, ctx),
            NodeKind::AddressOf => visitor.visit_address_of(self, id, ctx),
            NodeKind::Dereference => visitor.visit_dereference(self, id, ctx),
            NodeKind::UnaryPlus => visitor.visit_unary_plus(self, id, ctx),
            NodeKind::UnaryMinus => visitor.visit_unary_minus(self, id, ctx),
            NodeKind::BitwiseNot => visitor.visit_bitwise_not(self, id, ctx),
            NodeKind::LogicalNot => visitor.visit_logical_not(self, id, ctx),
            NodeKind::PreIncrement => visitor.visit_pre_increment(self, id, ctx),
            NodeKind::PreDecrement => visitor.visit_pre_decrement(self, id, ctx),
            NodeKind::SizeOfExpression => visitor.visit_sizeof_expression(self, id, ctx),
            NodeKind::SizeOfTypeName => visitor.visit_sizeof_type_name(self, id, ctx),
            NodeKind::Cast => visitor.visit_cast(self, id, ctx),
            NodeKind::ArraySubscript => visitor.visit_array_subscript(self, id, ctx),
            NodeKind::FunctionCallNoArgs => visitor.visit_function_call_no_args(self, id, ctx),
            NodeKind::FunctionCallWithArgs => visitor.visit_function_call_with_args(self, id, ctx),
            NodeKind::MemberAccess => visitor.visit_member_access(self, id, ctx),
            NodeKind::PointerMemberAccess => visitor.visit_pointer_member_access(self, id, ctx),
            NodeKind::PostIncrement => visitor.visit_post_increment(self, id, ctx),
            NodeKind::PostDecrement => visitor.visit_post_decrement(self, id, ctx),
            NodeKind::ConditionalExpression => visitor.visit_conditional_expression(self, id, ctx),
            NodeKind::Identifier => visitor.visit_identifier(self, id, ctx),
            NodeKind::IntegerConstant => visitor.visit_integer_constant(self, id, ctx),
            NodeKind::StringLiteral => visitor.visit_string_literal(self, id, ctx),
            NodeKind::IntegerType => visitor.visit_integer_type(self, id, ctx),
            NodeKind::CharType => visitor.visit_char_type(self, id, ctx),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::slots;
    use crate::common::Span;

    /// Records the kind of every node it sees, overriding nothing else.
    struct KindCollector {
        kinds: Vec<NodeKind>,
    }

    impl AstVisitor for KindCollector {
        type Output = ();
        type Context = ();

        fn visit_children(&mut self, ast: &Ast, id: NodeId, ctx: &()) {
            self.kinds.push(ast.kind(id));
            for slot in 0..ast.slot_count(id) {
                for &child in ast.children(id, slot) {
                    ast.accept(child, self, ctx);
                }
            }
        }

        fn visit_identifier(&mut self, ast: &Ast, id: NodeId, _ctx: &()) {
            self.kinds.push(ast.kind(id));
        }

        fn visit_integer_constant(&mut self, ast: &Ast, id: NodeId, _ctx: &()) {
            self.kinds.push(ast.kind(id));
        }
    }

    fn sample_ast() -> (Ast, NodeId) {
        let mut ast = Ast::new();
        let assign = ast.add_composite(NodeKind::Assignment);
        let target = ast.add_leaf(NodeKind::Identifier, "x", Span::default());
        let sum = ast.add_composite(NodeKind::Addition);
        let one = ast.add_leaf(NodeKind::IntegerConstant, "1", Span::default());
        let two = ast.add_leaf(NodeKind::IntegerConstant, "2", Span::default());
        ast.attach(assign, slots::binary::LEFT, target).unwrap();
        ast.attach(assign, slots::binary::RIGHT, sum).unwrap();
        ast.attach(sum, slots::binary::LEFT, one).unwrap();
        ast.attach(sum, slots::binary::RIGHT, two).unwrap();
        (ast, assign)
    }

    #[test]
    fn test_traversal_visits_slots_in_order() {
        let (ast, root) = sample_ast();
        let mut collector = KindCollector { kinds: Vec::new() };
        ast.accept(root, &mut collector, &());

        assert_eq!(
            collector.kinds,
            vec![
                NodeKind::Assignment,
                NodeKind::Identifier,
                NodeKind::Addition,
                NodeKind::IntegerConstant,
                NodeKind::IntegerConstant,
            ]
        );
    }

    #[test]
    fn test_traversal_is_idempotent() {
        let (ast, root) = sample_ast();
        let mut first = KindCollector { kinds: Vec::new() };
        ast.accept(root, &mut first, &());
        let mut second = KindCollector { kinds: Vec::new() };
        ast.accept(root, &mut second, &());

        assert_eq!(first.kinds, second.kinds);
    }

    /// A partial visitor overriding a single kind stays total over the tree.
    #[test]
    fn test_partial_visitor_counts_only_overridden_kind() {
        struct AdditionCounter {
            count: usize,
        }
        impl AstVisitor for AdditionCounter {
            type Output = ();
            type Context = ();

            fn visit_addition(&mut self, ast: &Ast, id: NodeId, ctx: &()) {
                self.count += 1;
                self.visit_children(ast, id, ctx);
            }
        }

        let (ast, root) = sample_ast();
        let mut counter = AdditionCounter { count: 0 };
        ast.accept(root, &mut counter, &());
        assert_eq!(counter.count, 1);
    }
}
