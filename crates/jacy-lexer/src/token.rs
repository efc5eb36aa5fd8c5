//! The token model.

use jacy_span::{Kw, Span, Symbol};
use strum_macros::Display;

/// Literal kinds as they leave the lexer. Numeric values are decoded
/// later, on the AST side; the lexer only records the lexeme symbol
/// and the base.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Display)]
pub enum LitKind {
    Bool,
    Dec,
    Bin,
    Oct,
    Hex,
    Float,
    /// Single-quoted string.
    SqStr,
    /// Double-quoted string.
    DqStr,
}

impl LitKind {
    pub fn is_int(self) -> bool {
        matches!(self, LitKind::Dec | LitKind::Bin | LitKind::Oct | LitKind::Hex)
    }

    /// Numeric base for integer kinds.
    pub fn base(self) -> Option<u32> {
        match self {
            LitKind::Dec => Some(10),
            LitKind::Bin => Some(2),
            LitKind::Oct => Some(8),
            LitKind::Hex => Some(16),
            _ => None,
        }
    }
}

/// A literal token: kind, value symbol and optional type suffix.
///
/// For strings the symbol holds the unescaped contents; for numbers
/// the digits without base prefix; for floats the full lexeme.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct TokenLit {
    pub kind: LitKind,
    pub sym: Symbol,
    pub suffix: Option<Symbol>,
}

impl TokenLit {
    pub fn new(kind: LitKind, sym: Symbol, suffix: Option<Symbol>) -> Self {
        Self { kind, sym, suffix }
    }
}

/// The closed set of token kinds.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum TokenKind {
    // Assignment
    Assign,
    PlusAssign,
    MinusAssign,
    MulAssign,
    DivAssign,
    RemAssign,
    BitAndAssign,
    BitOrAssign,
    BitXorAssign,
    ShlAssign,
    ShrAssign,

    // Binary operators
    Plus,
    Minus,
    Mul,
    Div,
    Rem,
    Or,
    And,
    BitOr,
    BitXor,
    Ampersand,
    Eq,
    NotEq,
    Lt,
    Gt,
    Le,
    Ge,
    Spaceship,
    Shl,
    Shr,

    // Prefix / postfix
    Not,
    Quest,

    // Punctuation
    Dot,
    Comma,
    Semi,
    Colon,
    Path,
    Arrow,
    FatArrow,
    Range,
    RangeEq,
    At,
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,

    Id(Symbol),
    /// `'name`, produced only when a single quote is not opening a
    /// terminated string.
    Lifetime(Symbol),
    Lit(TokenLit),

    /// Recovery token covering unlexable input.
    Error(Symbol),
    Eof,
}

impl TokenKind {
    /// Lexeme text for fixed tokens, a category word otherwise. Used
    /// in "expected `...`" messages.
    pub fn describe(&self) -> &'static str {
        match self {
            TokenKind::Assign => "=",
            TokenKind::PlusAssign => "+=",
            TokenKind::MinusAssign => "-=",
            TokenKind::MulAssign => "*=",
            TokenKind::DivAssign => "/=",
            TokenKind::RemAssign => "%=",
            TokenKind::BitAndAssign => "&=",
            TokenKind::BitOrAssign => "|=",
            TokenKind::BitXorAssign => "^=",
            TokenKind::ShlAssign => "<<=",
            TokenKind::ShrAssign => ">>=",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Mul => "*",
            TokenKind::Div => "/",
            TokenKind::Rem => "%",
            TokenKind::Or => "||",
            TokenKind::And => "&&",
            TokenKind::BitOr => "|",
            TokenKind::BitXor => "^",
            TokenKind::Ampersand => "&",
            TokenKind::Eq => "==",
            TokenKind::NotEq => "!=",
            TokenKind::Lt => "<",
            TokenKind::Gt => ">",
            TokenKind::Le => "<=",
            TokenKind::Ge => ">=",
            TokenKind::Spaceship => "<=>",
            TokenKind::Shl => "<<",
            TokenKind::Shr => ">>",
            TokenKind::Not => "!",
            TokenKind::Quest => "?",
            TokenKind::Dot => ".",
            TokenKind::Comma => ",",
            TokenKind::Semi => ";",
            TokenKind::Colon => ":",
            TokenKind::Path => "::",
            TokenKind::Arrow => "->",
            TokenKind::FatArrow => "=>",
            TokenKind::Range => "..",
            TokenKind::RangeEq => "..=",
            TokenKind::At => "@",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBrace => "{",
            TokenKind::RBrace => "}",
            TokenKind::LBracket => "[",
            TokenKind::RBracket => "]",
            TokenKind::Id(_) => "identifier",
            TokenKind::Lifetime(_) => "lifetime",
            TokenKind::Lit(_) => "literal",
            TokenKind::Error(_) => "erroneous token",
            TokenKind::Eof => "end of file",
        }
    }
}

/// One token with its source span.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }

    pub fn is_eof(&self) -> bool {
        matches!(self.kind, TokenKind::Eof)
    }

    /// The identifier's symbol, keywords included.
    pub fn as_ident(&self) -> Option<Symbol> {
        match self.kind {
            TokenKind::Id(sym) => Some(sym),
            _ => None,
        }
    }

    /// Whether this is the given keyword.
    pub fn is_kw(&self, kw: Kw) -> bool {
        matches!(self.kind, TokenKind::Id(sym) if sym.is_specific_kw(kw))
    }

    /// Whether this is a non-keyword identifier.
    pub fn is_plain_ident(&self) -> bool {
        matches!(self.kind, TokenKind::Id(sym) if !sym.is_kw())
    }

    pub fn as_lit(&self) -> Option<TokenLit> {
        match self.kind {
            TokenKind::Lit(lit) => Some(lit),
            _ => None,
        }
    }
}
