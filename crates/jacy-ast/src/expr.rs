//! Expression nodes.

use jacy_span::Span;
use strum_macros::Display;

use crate::fragments::{Ident, Path};
use crate::lit::LitValue;
use crate::node_id::{NodeId, PR};
use crate::pat::Pat;
use crate::stmt::Stmt;
use crate::ty::Ty;
use crate::P;

#[derive(Clone, Debug)]
pub struct Expr {
    pub id: NodeId,
    pub kind: ExprKind,
    pub span: Span,
}

#[derive(Clone, Debug)]
pub enum ExprKind {
    Lit(LitValue),
    Path(Path),
    Prefix {
        op: PrefixOp,
        rhs: PR<P<Expr>>,
    },
    /// `&expr` / `&mut expr`.
    Borrow {
        mutable: bool,
        rhs: PR<P<Expr>>,
    },
    /// `*expr`.
    Deref {
        rhs: PR<P<Expr>>,
    },
    Infix {
        lhs: PR<P<Expr>>,
        op: BinOp,
        rhs: PR<P<Expr>>,
    },
    Assign {
        lhs: PR<P<Expr>>,
        op: AssignOp,
        rhs: PR<P<Expr>>,
    },
    /// `expr as Type`.
    Cast {
        lhs: PR<P<Expr>>,
        ty: PR<P<Ty>>,
    },
    Block(Block),
    If {
        cond: PR<P<Expr>>,
        then_block: PR<Block>,
        /// `else { .. }` or the nested `If` an `elif` desugars to.
        else_expr: Option<P<Expr>>,
    },
    Loop {
        body: Block,
    },
    While {
        cond: PR<P<Expr>>,
        body: Block,
    },
    For {
        pat: PR<P<Pat>>,
        iter: PR<P<Expr>>,
        body: Block,
    },
    Match {
        subject: PR<P<Expr>>,
        arms: Vec<MatchArm>,
    },
    Lambda(Lambda),
    Invoke {
        callee: PR<P<Expr>>,
        args: Vec<PR<Expr>>,
    },
    Tuple {
        els: Vec<PR<Expr>>,
    },
    /// `Path { field: value, .. }`.
    StructLit {
        path: Path,
        fields: Vec<StructExprField>,
    },
    /// `expr.field`.
    Field {
        lhs: PR<P<Expr>>,
        field: Ident,
    },
    /// `expr[index]`.
    Subscript {
        lhs: PR<P<Expr>>,
        index: PR<P<Expr>>,
    },
    /// `expr?`.
    Quest {
        lhs: PR<P<Expr>>,
    },
    Paren(PR<P<Expr>>),
    Unit,
    SelfExpr,
    Break {
        value: Option<PR<P<Expr>>>,
    },
    Continue,
    Return {
        value: Option<PR<P<Expr>>>,
    },
    /// `..expr` in call arguments and struct literals.
    Spread {
        rhs: PR<P<Expr>>,
    },
}

/// Prefix operators. Borrow and deref are separate kinds since they
/// carry extra structure.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Display)]
pub enum PrefixOp {
    #[strum(serialize = "-")]
    Neg,
    #[strum(serialize = "not")]
    Not,
}

/// Infix operators in increasing binding power groups; the parser owns
/// the actual precedence table.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Display)]
pub enum BinOp {
    #[strum(serialize = "||")]
    Or,
    #[strum(serialize = "&&")]
    And,
    #[strum(serialize = "==")]
    Eq,
    #[strum(serialize = "!=")]
    NotEq,
    #[strum(serialize = "<")]
    Lt,
    #[strum(serialize = ">")]
    Gt,
    #[strum(serialize = "<=")]
    Le,
    #[strum(serialize = ">=")]
    Ge,
    #[strum(serialize = "<=>")]
    Spaceship,
    #[strum(serialize = "|")]
    BitOr,
    #[strum(serialize = "^")]
    BitXor,
    #[strum(serialize = "&")]
    BitAnd,
    #[strum(serialize = "<<")]
    Shl,
    #[strum(serialize = ">>")]
    Shr,
    #[strum(serialize = "+")]
    Add,
    #[strum(serialize = "-")]
    Sub,
    #[strum(serialize = "*")]
    Mul,
    #[strum(serialize = "/")]
    Div,
    #[strum(serialize = "%")]
    Rem,
}

impl BinOp {
    /// Binding power: assignment is 1, postfix operators bind above
    /// every infix level. Shared by the parser's precedence loop and
    /// the pretty-printer's parenthesization.
    pub fn precedence(self) -> u8 {
        match self {
            BinOp::Or => 2,
            BinOp::And => 3,
            BinOp::Eq
            | BinOp::NotEq
            | BinOp::Lt
            | BinOp::Gt
            | BinOp::Le
            | BinOp::Ge
            | BinOp::Spaceship => 4,
            BinOp::BitOr => 5,
            BinOp::BitXor => 6,
            BinOp::BitAnd => 7,
            BinOp::Shl | BinOp::Shr => 8,
            BinOp::Add | BinOp::Sub => 9,
            BinOp::Mul | BinOp::Div | BinOp::Rem => 10,
        }
    }

    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinOp::Eq
                | BinOp::NotEq
                | BinOp::Lt
                | BinOp::Gt
                | BinOp::Le
                | BinOp::Ge
                | BinOp::Spaceship
        )
    }
}

/// Assignment operators, all right-associative at the same level.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Display)]
pub enum AssignOp {
    #[strum(serialize = "=")]
    Assign,
    #[strum(serialize = "+=")]
    AddAssign,
    #[strum(serialize = "-=")]
    SubAssign,
    #[strum(serialize = "*=")]
    MulAssign,
    #[strum(serialize = "/=")]
    DivAssign,
    #[strum(serialize = "%=")]
    RemAssign,
    #[strum(serialize = "&=")]
    BitAndAssign,
    #[strum(serialize = "|=")]
    BitOrAssign,
    #[strum(serialize = "^=")]
    BitXorAssign,
    #[strum(serialize = "<<=")]
    ShlAssign,
    #[strum(serialize = ">>=")]
    ShrAssign,
}

/// `{ stmt* }`.
#[derive(Clone, Debug)]
pub struct Block {
    pub id: NodeId,
    pub stmts: Vec<PR<Stmt>>,
    pub span: Span,
}

/// One arm of a `match`.
#[derive(Clone, Debug)]
pub struct MatchArm {
    pub id: NodeId,
    pub pat: PR<P<Pat>>,
    pub body: PR<P<Expr>>,
    pub span: Span,
}

#[derive(Clone, Debug)]
pub struct Lambda {
    pub params: Vec<LambdaParam>,
    pub body: PR<P<Expr>>,
}

#[derive(Clone, Debug)]
pub struct LambdaParam {
    pub id: NodeId,
    pub pat: PR<P<Pat>>,
    pub ty: Option<P<Ty>>,
    pub span: Span,
}

/// One entry of a struct literal.
#[derive(Clone, Debug)]
pub struct StructExprField {
    pub id: NodeId,
    pub kind: StructExprFieldKind,
    pub span: Span,
}

#[derive(Clone, Debug)]
pub enum StructExprFieldKind {
    /// `name: value`.
    Full(Ident, PR<P<Expr>>),
    /// `name`, expanded to `name: name` during lowering.
    Shorthand(Ident),
    /// `..base`.
    Spread(PR<P<Expr>>),
}
