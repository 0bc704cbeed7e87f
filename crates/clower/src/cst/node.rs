//! CST nodes and grammar rule kinds

use crate::common::{LowerError, LowerResult};

use super::{Token, TokenKind};

/// Grammar productions and labeled alternatives the lowering engine
/// dispatches on.
///
/// Left-recursive expression rules appear once per operator alternative
/// (`Addition`, `ShiftLeft`, ...); the non-operator alternative of such a rule
/// is not represented — the parser emits the reduced operand directly, which
/// is how a grammar-driven visitor sees the tree after default pass-through.
/// Rules without a handler in the engine are lowered by visiting their
/// children at the current target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    TranslationUnit,
    ExternalDeclaration,
    FunctionDefinition,
    Declaration,
    DeclarationSpecifiers,
    TypeSpecifier,
    TypeQualifier,
    TypeQualifierList,
    StorageClassSpecifier,
    InitDeclaratorList,
    InitDeclarator,
    Declarator,
    DirectDeclarator,
    FunctionWithArguments,
    FunctionWithNoArguments,
    Pointer,
    ParameterTypeList,
    ParameterList,
    ParameterDeclaration,
    TypeName,

    CompoundStatement,
    Statement,
    ExpressionStatement,

    Expression,
    CommaExpression,
    Assignment,
    Conditional,
    LogicalOr,
    LogicalAnd,
    InclusiveOr,
    ExclusiveOr,
    And,
    EqualityEqual,
    EqualityNotEqual,
    RelationalLess,
    RelationalGreater,
    RelationalLessEqual,
    RelationalGreaterEqual,
    ShiftLeft,
    ShiftRight,
    Addition,
    Subtraction,
    Multiplication,
    Division,
    Modulo,
    Cast,
    UnaryOperator,
    UnaryIncrement,
    UnaryDecrement,
    SizeofExpression,
    SizeofType,
    PostfixArraySubscript,
    PostfixCallNoArgs,
    PostfixCallWithArgs,
    PostfixMemberAccess,
    PostfixPointerMemberAccess,
    PostfixIncrement,
    PostfixDecrement,
    ArgumentExpressionList,
    PrimaryExpression,
}

impl Rule {
    pub fn name(&self) -> &'static str {
        match self {
            Rule::TranslationUnit => "translation_unit",
            Rule::ExternalDeclaration => "external_declaration",
            Rule::FunctionDefinition => "function_definition",
            Rule::Declaration => "declaration",
            Rule::DeclarationSpecifiers => "declaration_specifiers",
            Rule::TypeSpecifier => "type_specifier",
            Rule::TypeQualifier => "type_qualifier",
            Rule::TypeQualifierList => "type_qualifier_list",
            Rule::StorageClassSpecifier => "storage_class_specifier",
            Rule::InitDeclaratorList => "init_declarator_list",
            Rule::InitDeclarator => "init_declarator",
            Rule::Declarator => "declarator",
            Rule::DirectDeclarator => "direct_declarator",
            Rule::FunctionWithArguments => "direct_declarator.function_with_arguments",
            Rule::FunctionWithNoArguments => "direct_declarator.function_with_no_arguments",
            Rule::Pointer => "pointer",
            Rule::ParameterTypeList => "parameter_type_list",
            Rule::ParameterList => "parameter_list",
            Rule::ParameterDeclaration => "parameter_declaration",
            Rule::TypeName => "type_name",
            Rule::CompoundStatement => "compound_statement",
            Rule::Statement => "statement",
            Rule::ExpressionStatement => "expression_statement",
            Rule::Expression => "expression",
            Rule::CommaExpression => "expression.comma",
            Rule::Assignment => "assignment_expression.assignment",
            Rule::Conditional => "conditional_expression.conditional",
            Rule::LogicalOr => "logical_or_expression",
            Rule::LogicalAnd => "logical_and_expression",
            Rule::InclusiveOr => "inclusive_or_expression",
            Rule::ExclusiveOr => "exclusive_or_expression",
            Rule::And => "and_expression",
            Rule::EqualityEqual => "equality_expression.equal",
            Rule::EqualityNotEqual => "equality_expression.not_equal",
            Rule::RelationalLess => "relational_expression.less",
            Rule::RelationalGreater => "relational_expression.greater",
            Rule::RelationalLessEqual => "relational_expression.less_equal",
            Rule::RelationalGreaterEqual => "relational_expression.greater_equal",
            Rule::ShiftLeft => "shift_expression.left",
            Rule::ShiftRight => "shift_expression.right",
            Rule::Addition => "additive_expression.addition",
            Rule::Subtraction => "additive_expression.subtraction",
            Rule::Multiplication => "multiplicative_expression.multiplication",
            Rule::Division => "multiplicative_expression.division",
            Rule::Modulo => "multiplicative_expression.modulo",
            Rule::Cast => "cast_expression.cast",
            Rule::UnaryOperator => "unary_expression.unary_operator",
            Rule::UnaryIncrement => "unary_expression.increment",
            Rule::UnaryDecrement => "unary_expression.decrement",
            Rule::SizeofExpression => "unary_expression.sizeof",
            Rule::SizeofType => "unary_expression.sizeof_type",
            Rule::PostfixArraySubscript => "postfix_expression.array_subscript",
            Rule::PostfixCallNoArgs => "postfix_expression.call_no_args",
            Rule::PostfixCallWithArgs => "postfix_expression.call_with_args",
            Rule::PostfixMemberAccess => "postfix_expression.member_access",
            Rule::PostfixPointerMemberAccess => "postfix_expression.pointer_member_access",
            Rule::PostfixIncrement => "postfix_expression.increment",
            Rule::PostfixDecrement => "postfix_expression.decrement",
            Rule::ArgumentExpressionList => "argument_expression_list",
            Rule::PrimaryExpression => "primary_expression",
        }
    }
}

/// One entry in a CST node's ordered child list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CstChild {
    Rule(CstNode),
    Token(Token),
}

/// A node of the external parse tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CstNode {
    pub rule: Rule,
    pub children: Vec<CstChild>,
}

impl CstNode {
    pub fn new(rule: Rule) -> Self {
        Self {
            rule,
            children: Vec::new(),
        }
    }

    /// Builder: append a sub-rule child.
    pub fn with(mut self, child: CstNode) -> Self {
        self.children.push(CstChild::Rule(child));
        self
    }

    /// Builder: append a terminal token child.
    pub fn with_token(mut self, kind: TokenKind, text: impl Into<String>) -> Self {
        self.children.push(CstChild::Token(Token::new(kind, text)));
        self
    }

    pub fn push(&mut self, child: CstChild) {
        self.children.push(child);
    }

    /// Sub-rule children in order, skipping tokens.
    pub fn rules(&self) -> impl Iterator<Item = &CstNode> {
        self.children.iter().filter_map(|child| match child {
            CstChild::Rule(node) => Some(node),
            CstChild::Token(_) => None,
        })
    }

    /// Terminal children in order, skipping sub-rules.
    pub fn tokens(&self) -> impl Iterator<Item = &Token> {
        self.children.iter().filter_map(|child| match child {
            CstChild::Token(token) => Some(token),
            CstChild::Rule(_) => None,
        })
    }

    /// The `index`-th sub-rule child. Rules with a fixed operand shape
    /// address their operands this way; a missing operand means the tree
    /// does not match the grammar the engine was built against.
    pub fn operand(&self, index: usize) -> LowerResult<&CstNode> {
        self.rules().nth(index).ok_or_else(|| {
            LowerError::malformed(self.rule.name(), format!("missing operand {index}"))
        })
    }

    pub fn find_rule(&self, rule: Rule) -> Option<&CstNode> {
        self.rules().find(|node| node.rule == rule)
    }

    pub fn find_token(&self, kind: TokenKind) -> Option<&Token> {
        self.tokens().find(|token| token.kind == kind)
    }

    pub fn first_token(&self) -> Option<&Token> {
        self.tokens().next()
    }
}
