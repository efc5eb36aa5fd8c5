//! HIR node model.
//!
//! Mirrors the AST shape with the sugar gone: no `while`/`for` (both
//! become `loop`), no struct-literal shorthand, no `elif`, no parse
//! recovery markers. Paths carry their [`Res`]; name lookup is over.

use std::collections::BTreeMap;

use jacy_ast::{AssignOp, BinOp, FloatKind, IntKind, PrefixOp};
use jacy_resolve::{DefId, Res};
use jacy_span::{Span, Symbol};

use crate::ids::{BodyId, HirId};

pub type P<T> = Box<T>;

/// The compilation unit after lowering: one [`OwnerInfo`] per
/// definition that owns HIR nodes. `BTreeMap` keeps iteration (and
/// therefore every downstream dump) deterministic.
#[derive(Debug, Default)]
pub struct Party {
    pub owners: BTreeMap<DefId, OwnerInfo>,
}

impl Party {
    pub fn owner(&self, def_id: DefId) -> &OwnerInfo {
        self.owners
            .get(&def_id)
            .unwrap_or_else(|| panic!("[DEV] no HIR owner for {def_id:?}"))
    }

    pub fn body(&self, body_id: BodyId) -> &Body {
        let owner = self.owner(body_id.0.owner);
        owner
            .bodies
            .get(&body_id.0.child)
            .unwrap_or_else(|| panic!("[DEV] no body {body_id:?}"))
    }
}

/// One owner's item shell and bodies, stored separately so the
/// type-checker can process signatures without touching bodies.
#[derive(Debug)]
pub struct OwnerInfo {
    pub item: Item,
    pub bodies: BTreeMap<crate::ids::ChildId, Body>,
}

// Items //

#[derive(Debug)]
pub struct Item {
    pub hir_id: HirId,
    pub def_id: DefId,
    pub name: Ident,
    pub kind: ItemKind,
    pub span: Span,
}

#[derive(Debug)]
pub enum ItemKind {
    Mod {
        items: Vec<DefId>,
    },
    Enum {
        generics: Vec<GenericParam>,
        variants: Vec<Variant>,
    },
    Struct {
        generics: Vec<GenericParam>,
        fields: Vec<StructField>,
    },
    Trait {
        generics: Vec<GenericParam>,
        members: Vec<DefId>,
    },
    Impl {
        generics: Vec<GenericParam>,
        trait_path: Option<Path>,
        ty: P<Ty>,
        members: Vec<DefId>,
    },
    /// Functions and `init` constructors; the def kind tells them
    /// apart.
    Func {
        generics: Vec<GenericParam>,
        sig: FuncSig,
        body: Option<BodyId>,
    },
    TypeAlias {
        generics: Vec<GenericParam>,
        ty: Option<P<Ty>>,
    },
}

#[derive(Debug)]
pub struct Variant {
    pub hir_id: HirId,
    pub def_id: DefId,
    pub name: Ident,
    pub body: VariantBody,
    pub span: Span,
}

#[derive(Debug)]
pub enum VariantBody {
    Unit(Option<AnonConst>),
    Tuple(Vec<TupleTyEl>),
    Struct(Vec<StructField>),
}

#[derive(Debug)]
pub struct TupleTyEl {
    pub hir_id: HirId,
    pub name: Option<Ident>,
    pub ty: P<Ty>,
    pub span: Span,
}

#[derive(Debug)]
pub struct StructField {
    pub hir_id: HirId,
    pub def_id: Option<DefId>,
    pub name: Ident,
    pub ty: P<Ty>,
    pub span: Span,
}

// Fragments //

#[derive(Copy, Clone, Debug)]
pub struct Ident {
    pub sym: Symbol,
    pub span: Span,
}

#[derive(Debug)]
pub struct FuncSig {
    pub params: Vec<Param>,
    pub ret_ty: Option<P<Ty>>,
    pub span: Span,
}

#[derive(Debug)]
pub struct Param {
    pub hir_id: HirId,
    pub label: Option<Ident>,
    pub pat: P<Pat>,
    pub ty: P<Ty>,
    pub default: Option<AnonConst>,
    pub span: Span,
}

/// A function or constant body, owning its expression tree. Stored in
/// the owner's body map, away from the item shell.
#[derive(Debug)]
pub struct Body {
    pub id: BodyId,
    pub expr_body: bool,
    pub value: Expr,
}

#[derive(Debug)]
pub struct AnonConst {
    pub hir_id: HirId,
    pub value: P<Expr>,
}

#[derive(Debug)]
pub struct GenericParam {
    pub hir_id: HirId,
    pub def_id: DefId,
    pub kind: GenericParamKind,
    pub span: Span,
}

#[derive(Debug)]
pub enum GenericParamKind {
    Type {
        name: Ident,
        bound: Option<P<Ty>>,
    },
    Lifetime {
        name: Ident,
    },
    Const {
        name: Ident,
        ty: P<Ty>,
        default: Option<AnonConst>,
    },
}

#[derive(Debug)]
pub enum GenericArg {
    Type(P<Ty>),
    Lifetime { name: Ident, res: Res },
    Const(AnonConst),
}

/// A fully-resolved path. Segments are retained for diagnostics and
/// generic arguments only; no string lookup remains.
#[derive(Debug)]
pub struct Path {
    pub res: Res,
    pub segs: Vec<PathSeg>,
    pub span: Span,
}

#[derive(Debug)]
pub struct PathSeg {
    pub ident: Ident,
    pub generics: Vec<GenericArg>,
}

// Statements and expressions //

#[derive(Debug)]
pub struct Block {
    pub hir_id: HirId,
    pub stmts: Vec<Stmt>,
    pub span: Span,
}

#[derive(Debug)]
pub struct Stmt {
    pub hir_id: HirId,
    pub kind: StmtKind,
    pub span: Span,
}

#[derive(Debug)]
pub enum StmtKind {
    Let(LetStmt),
    Expr(P<Expr>),
    /// Nested items stay owners of their own; the statement only
    /// references them.
    Item(DefId),
}

#[derive(Debug)]
pub struct LetStmt {
    pub pat: P<Pat>,
    pub ty: Option<P<Ty>>,
    pub value: Option<P<Expr>>,
}

#[derive(Debug)]
pub struct Expr {
    pub hir_id: HirId,
    pub kind: ExprKind,
    pub span: Span,
}

#[derive(Debug)]
pub enum ExprKind {
    Lit(LitValue),
    Path(Path),
    Prefix {
        op: PrefixOp,
        rhs: P<Expr>,
    },
    Borrow {
        mutable: bool,
        rhs: P<Expr>,
    },
    Deref {
        rhs: P<Expr>,
    },
    Infix {
        lhs: P<Expr>,
        op: BinOp,
        rhs: P<Expr>,
    },
    Assign {
        lhs: P<Expr>,
        op: AssignOp,
        rhs: P<Expr>,
    },
    Cast {
        lhs: P<Expr>,
        ty: P<Ty>,
    },
    Block(P<Block>),
    If {
        cond: P<Expr>,
        then_block: P<Block>,
        else_expr: Option<P<Expr>>,
    },
    /// The only loop form left after lowering.
    Loop {
        body: P<Block>,
    },
    Match {
        subject: P<Expr>,
        arms: Vec<MatchArm>,
    },
    Lambda {
        params: Vec<LambdaParam>,
        value: P<Expr>,
    },
    Invoke {
        callee: P<Expr>,
        args: Vec<Expr>,
    },
    Tuple {
        els: Vec<Expr>,
    },
    StructLit {
        path: Path,
        fields: Vec<StructLitField>,
        /// Functional-update base a `..expr` entry lowered to.
        base: Option<P<Expr>>,
    },
    Field {
        lhs: P<Expr>,
        field: Ident,
    },
    Subscript {
        lhs: P<Expr>,
        index: P<Expr>,
    },
    Quest {
        lhs: P<Expr>,
    },
    Unit,
    SelfExpr,
    Break {
        value: Option<P<Expr>>,
    },
    Continue,
    Return {
        value: Option<P<Expr>>,
    },
    Spread {
        rhs: P<Expr>,
    },
    /// Survives parse recovery; only present when lowering ran over a
    /// tree with errors.
    Err,
}

/// Literal values in HIR: integers decoded, floats still symbolic.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum LitValue {
    Bool(bool),
    Int { val: u64, kind: IntKind },
    Float { sym: Symbol, kind: FloatKind },
    Str { sym: Symbol },
}

#[derive(Debug)]
pub struct MatchArm {
    pub hir_id: HirId,
    pub pat: P<Pat>,
    pub value: P<Expr>,
    pub span: Span,
}

#[derive(Debug)]
pub struct LambdaParam {
    pub hir_id: HirId,
    pub pat: P<Pat>,
    pub ty: Option<P<Ty>>,
    pub span: Span,
}

/// Struct-literal fields are always in full `field: value` form after
/// lowering.
#[derive(Debug)]
pub struct StructLitField {
    pub hir_id: HirId,
    pub name: Ident,
    pub value: Expr,
    pub span: Span,
}

// Patterns //

#[derive(Debug)]
pub struct Pat {
    pub hir_id: HirId,
    pub kind: PatKind,
    pub span: Span,
}

#[derive(Debug)]
pub enum PatKind {
    Wildcard,
    Lit(LitValue),
    Ident {
        reference: bool,
        mutable: bool,
        name: Ident,
        /// Node id of the AST binding pattern, so `Res::Local` links
        /// stay valid in HIR.
        binding: jacy_ast::NodeId,
        sub: Option<P<Pat>>,
    },
    Ref {
        mutable: bool,
        pat: P<Pat>,
    },
    Path(Path),
    Struct {
        path: Path,
        fields: Vec<StructPatField>,
        rest: bool,
    },
    Tuple {
        els: Vec<Pat>,
        rest_pat_index: Option<usize>,
    },
    Slice {
        before: Vec<Pat>,
        rest: Option<Span>,
        after: Vec<Pat>,
    },
    Multi(Vec<Pat>),
    /// Constructor pattern produced by loop desugaring; the names it
    /// uses (`Some`, `None`) are bound by the type-checker.
    Ctor {
        name: Ident,
        args: Vec<Pat>,
    },
}

#[derive(Debug)]
pub struct StructPatField {
    pub hir_id: HirId,
    pub name: Ident,
    pub pat: P<Pat>,
    pub span: Span,
}

// Types //

#[derive(Debug)]
pub struct Ty {
    pub hir_id: HirId,
    pub kind: TyKind,
    pub span: Span,
}

#[derive(Debug)]
pub enum TyKind {
    Paren(P<Ty>),
    Tuple(Vec<Ty>),
    Func { params: Vec<Ty>, ret: P<Ty> },
    Slice(P<Ty>),
    Array { ty: P<Ty>, size: AnonConst },
    Path(Path),
    Unit,
    Err,
}
