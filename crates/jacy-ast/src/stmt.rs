//! Statement nodes.

use jacy_span::Span;

use crate::expr::Expr;
use crate::item::Item;
use crate::node_id::{NodeId, PR};
use crate::pat::Pat;
use crate::ty::Ty;
use crate::P;

#[derive(Clone, Debug)]
pub struct Stmt {
    pub id: NodeId,
    pub kind: StmtKind,
    pub span: Span,
}

#[derive(Clone, Debug)]
pub enum StmtKind {
    Let(LetStmt),
    Expr(PR<P<Expr>>),
    Item(PR<P<Item>>),
}

/// `let pat: Ty = value;`
#[derive(Clone, Debug)]
pub struct LetStmt {
    pub pat: PR<P<Pat>>,
    pub ty: Option<PR<P<Ty>>>,
    pub value: Option<PR<P<Expr>>>,
}
