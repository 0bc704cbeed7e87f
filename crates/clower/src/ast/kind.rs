//! Node kinds and slot layout
//!
//! Every AST node carries one of these kinds. A kind fixes the node's shape
//! for good: composites own a fixed number of named child slots, leaves own a
//! lexeme and nothing else. Slot indices are public API — consumers address
//! children through the constants in [`slots`] and those values never change
//! for a given kind.

/// Closed enumeration of AST node kinds, mirroring the C grammar subset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    // Program structure
    TranslationUnit,
    Declaration,
    FunctionDefinition,
    ParameterDeclaration,

    // Types
    PointerType,
    FunctionType,

    // Statements
    CompoundStatement,
    ExpressionStatement,

    // Binary expressions
    Addition,
    Subtraction,
    Multiplication,
    Division,
    Modulo,
    BitwiseAnd,
    BitwiseOr,
    BitwiseXor,
    LogicalAnd,
    LogicalOr,
    EqualityEqual,
    EqualityNotEqual,
    RelationalLess,
    RelationalGreater,
    RelationalLessOrEqual,
    RelationalGreaterOrEqual,
    ShiftLeft,
    ShiftRight,
    CommaExpression,

    // Assignment expressions
    Assignment,
    AssignMultiply,
    AssignDivide,
    AssignModulo,
    AssignAdd,
    AssignSubtract,
    AssignShiftLeft,
    AssignShiftRight,
    AssignBitwiseAnd,
    AssignBitwiseXor,
    AssignBitwiseOr,

    // Unary expressions
    AddressOf,
    Dereference,
    UnaryPlus,
    UnaryMinus,
    BitwiseNot,
    LogicalNot,
    PreIncrement,
    PreDecrement,
    SizeOfExpression,
    SizeOfTypeName,
    Cast,

    // Postfix expressions
    ArraySubscript,
    FunctionCallNoArgs,
    FunctionCallWithArgs,
    MemberAccess,
    PointerMemberAccess,
    PostIncrement,
    PostDecrement,

    // Ternary
    ConditionalExpression,

    // Leaves
    Identifier,
    IntegerConstant,
    StringLiteral,
    IntegerType,
    CharType,
}

impl NodeKind {
    /// Number of child slots a composite of this kind owns; 0 for leaves.
    pub fn slot_count(&self) -> usize {
        use NodeKind::*;
        match self {
            TranslationUnit | CompoundStatement => 2,
            Declaration | ParameterDeclaration | FunctionDefinition => 4,
            FunctionType | ConditionalExpression => 3,

            PointerType | ExpressionStatement | AddressOf | Dereference | UnaryPlus
            | UnaryMinus | BitwiseNot | LogicalNot | PreIncrement | PreDecrement
            | SizeOfExpression | SizeOfTypeName | FunctionCallNoArgs | PostIncrement
            | PostDecrement => 1,

            Addition | Subtraction | Multiplication | Division | Modulo | BitwiseAnd
            | BitwiseOr | BitwiseXor | LogicalAnd | LogicalOr | EqualityEqual
            | EqualityNotEqual | RelationalLess | RelationalGreater | RelationalLessOrEqual
            | RelationalGreaterOrEqual | ShiftLeft | ShiftRight | CommaExpression
            | Assignment | AssignMultiply | AssignDivide | AssignModulo | AssignAdd
            | AssignSubtract | AssignShiftLeft | AssignShiftRight | AssignBitwiseAnd
            | AssignBitwiseXor | AssignBitwiseOr | Cast | ArraySubscript
            | FunctionCallWithArgs | MemberAccess | PointerMemberAccess => 2,

            Identifier | IntegerConstant | StringLiteral | IntegerType | CharType => 0,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.slot_count() == 0
    }

    pub fn is_binary_expression(&self) -> bool {
        use NodeKind::*;
        matches!(
            self,
            Addition
                | Subtraction
                | Multiplication
                | Division
                | Modulo
                | BitwiseAnd
                | BitwiseOr
                | BitwiseXor
                | LogicalAnd
                | LogicalOr
                | EqualityEqual
                | EqualityNotEqual
                | RelationalLess
                | RelationalGreater
                | RelationalLessOrEqual
                | RelationalGreaterOrEqual
                | ShiftLeft
                | ShiftRight
                | CommaExpression
        )
    }

    pub fn is_assignment(&self) -> bool {
        use NodeKind::*;
        matches!(
            self,
            Assignment
                | AssignMultiply
                | AssignDivide
                | AssignModulo
                | AssignAdd
                | AssignSubtract
                | AssignShiftLeft
                | AssignShiftRight
                | AssignBitwiseAnd
                | AssignBitwiseXor
                | AssignBitwiseOr
        )
    }

    pub fn is_unary_operator(&self) -> bool {
        use NodeKind::*;
        matches!(
            self,
            AddressOf | Dereference | UnaryPlus | UnaryMinus | BitwiseNot | LogicalNot
        )
    }

    /// Human-readable slot name, for dumps and error messages.
    pub fn slot_name(&self, slot: usize) -> Option<&'static str> {
        use NodeKind::*;
        let names: &[&'static str] = match self {
            TranslationUnit => &["FUNCTION_DEFINITION", "DECLARATIONS"],
            Declaration => {
                &["TYPE_SPECIFIER", "DECLARATORS", "TYPE_QUALIFIER", "STORAGE_SPECIFIER"]
            }
            ParameterDeclaration => {
                &["TYPE_SPECIFIER", "DECLARATOR", "TYPE_QUALIFIER", "STORAGE_SPECIFIER"]
            }
            FunctionDefinition => &[
                "DECLARATION_SPECIFIERS",
                "DECLARATOR",
                "PARAMETER_DECLARATIONS",
                "FUNCTION_BODY",
            ],
            FunctionType => &["RETURN_TYPE", "NAME", "PARAMETERS"],
            PointerType => &["TARGET"],
            CompoundStatement => &["STATEMENTS", "DECLARATIONS"],
            ExpressionStatement => &["EXPRESSION"],
            Cast => &["TYPE", "EXPRESSION"],
            ConditionalExpression => &["CONDITION", "TRUE_EXPRESSION", "FALSE_EXPRESSION"],
            ArraySubscript => &["ARRAY", "INDEX"],
            FunctionCallNoArgs => &["FUNCTION"],
            FunctionCallWithArgs => &["FUNCTION", "ARGUMENTS"],
            MemberAccess | PointerMemberAccess => &["ACCESS", "MEMBER"],
            PostIncrement | PostDecrement => &["ACCESS"],
            PreIncrement | PreDecrement => &["OPERAND"],
            AddressOf | Dereference | UnaryPlus | UnaryMinus | BitwiseNot | LogicalNot
            | SizeOfExpression | SizeOfTypeName => &["EXPRESSION"],
            kind if kind.is_binary_expression() || kind.is_assignment() => &["LEFT", "RIGHT"],
            _ => &[],
        };
        names.get(slot).copied()
    }
}

/// Named slot indices, fixed per node kind.
///
/// These constants are the public shape of the AST: `DECLARATIONS` on a
/// translation unit is slot 1 today and stays slot 1.
pub mod slots {
    pub mod translation_unit {
        pub const FUNCTION_DEFINITION: usize = 0;
        pub const DECLARATIONS: usize = 1;
    }

    pub mod declaration {
        pub const TYPE_SPECIFIER: usize = 0;
        pub const DECLARATORS: usize = 1;
        pub const TYPE_QUALIFIER: usize = 2;
        pub const STORAGE_SPECIFIER: usize = 3;
    }

    pub mod parameter_declaration {
        pub const TYPE_SPECIFIER: usize = 0;
        pub const DECLARATOR: usize = 1;
        pub const TYPE_QUALIFIER: usize = 2;
        pub const STORAGE_SPECIFIER: usize = 3;
    }

    pub mod function_definition {
        pub const DECLARATION_SPECIFIERS: usize = 0;
        pub const DECLARATOR: usize = 1;
        pub const PARAMETER_DECLARATIONS: usize = 2;
        pub const FUNCTION_BODY: usize = 3;
    }

    pub mod function_type {
        pub const RETURN_TYPE: usize = 0;
        pub const NAME: usize = 1;
        pub const PARAMETERS: usize = 2;
    }

    pub mod pointer_type {
        pub const TARGET: usize = 0;
    }

    pub mod compound_statement {
        pub const STATEMENTS: usize = 0;
        pub const DECLARATIONS: usize = 1;
    }

    pub mod expression_statement {
        pub const EXPRESSION: usize = 0;
    }

    /// LEFT/RIGHT of every binary and assignment kind.
    pub mod binary {
        pub const LEFT: usize = 0;
        pub const RIGHT: usize = 1;
    }

    /// Single operand of the six unary-operator kinds and both sizeof kinds.
    pub mod unary {
        pub const EXPRESSION: usize = 0;
    }

    /// Single operand of pre-increment/pre-decrement.
    pub mod prefix {
        pub const OPERAND: usize = 0;
    }

    pub mod cast {
        pub const TYPE: usize = 0;
        pub const EXPRESSION: usize = 1;
    }

    pub mod conditional {
        pub const CONDITION: usize = 0;
        pub const TRUE_EXPRESSION: usize = 1;
        pub const FALSE_EXPRESSION: usize = 2;
    }

    pub mod array_subscript {
        pub const ARRAY: usize = 0;
        pub const INDEX: usize = 1;
    }

    pub mod function_call {
        pub const FUNCTION: usize = 0;
        pub const ARGUMENTS: usize = 1;
    }

    pub mod member_access {
        pub const ACCESS: usize = 0;
        pub const MEMBER: usize = 1;
    }

    /// Wrapped operand of the postfix increment/decrement kinds.
    pub mod postfix {
        pub const ACCESS: usize = 0;
    }
}
