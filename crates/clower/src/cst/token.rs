//! Terminal tokens of the CST

use crate::common::Span;

/// Token types the grammar can hand to the lowering engine.
///
/// Only a few of these produce AST leaves (identifiers, integer constants and
/// the `int`/`char` type keywords); the rest either steer operator dispatch or
/// are ignored as punctuation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Identifier,
    Constant,
    StringLiteral,

    // Type keywords
    Int,
    Char,
    Void,

    // Qualifiers and storage classes (dropped during lowering)
    Const,
    Restrict,
    Volatile,
    Static,
    Extern,
    Auto,
    Register,

    // Assignment operators
    Assign,
    StarAssign,
    SlashAssign,
    PercentAssign,
    PlusAssign,
    MinusAssign,
    ShlAssign,
    ShrAssign,
    AmpAssign,
    CaretAssign,
    PipeAssign,

    // Unary operators
    Amp,
    Star,
    Plus,
    Minus,
    Tilde,
    Bang,

    // Punctuation
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Semicolon,
    Comma,
    Dot,
    Arrow,
    PlusPlus,
    MinusMinus,
    Sizeof,
}

/// A terminal token: type, literal text and (optional) source span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            span: Span::default(),
        }
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }
}
