//! The abstract syntax tree.
//!
//! Owned trees produced by the parser: one item list per file under a
//! [`Party`] root. Node categories are tagged enums (`ItemKind`,
//! `StmtKind`, `ExprKind`, `PatKind`, `TyKind`); every node carries a
//! fresh [`NodeId`] and a [`Span`]. Parse errors are represented
//! in-tree by the [`PR`] sum so later stages keep working on
//! best-effort input.

pub mod expr;
pub mod fragments;
pub mod item;
pub mod lit;
pub mod node_id;
pub mod party;
pub mod pat;
pub mod pretty;
pub mod stmt;
pub mod ty;
pub mod visit;

pub use expr::{
    AssignOp, BinOp, Block, Expr, ExprKind, Lambda, LambdaParam, MatchArm, PrefixOp,
    StructExprField, StructExprFieldKind,
};
pub use fragments::{
    AnonConst, Attr, Body, FuncParam, FuncRetTy, FuncSig, GenericArg, GenericParam,
    GenericParamKind, Ident, Path, PathSeg, SimplePath, SimplePathSeg, Vis,
};
pub use item::{
    EnumItem, FuncItem, ImplItem, Item, ItemKind, ModItem, StructField, StructItem, TraitItem,
    TupleTyEl, TypeAliasItem, UseDeclItem, UseTree, UseTreeKind, Variant, VariantBody,
};
pub use lit::{FloatKind, IntKind, LitDecodeError, LitValue};
pub use node_id::{pr_span, ErrorNode, NodeId, NodeIdCounter, PR};
pub use party::{FileItems, Party};
pub use pretty::Printer;
pub use pat::{Pat, PatKind, StructPatField};
pub use stmt::{LetStmt, Stmt, StmtKind};
pub use ty::{Ty, TyKind};
pub use visit::AstVisitor;

/// Owning pointer used for all child links in the tree.
pub type P<T> = Box<T>;
