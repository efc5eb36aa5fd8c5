//! Type nodes.

use jacy_span::Span;

use crate::fragments::{AnonConst, Path};
use crate::node_id::{NodeId, PR};
use crate::P;

#[derive(Clone, Debug)]
pub struct Ty {
    pub id: NodeId,
    pub kind: TyKind,
    pub span: Span,
}

#[derive(Clone, Debug)]
pub enum TyKind {
    Paren(PR<P<Ty>>),
    /// `(A, B, C)`; one unnamed element is a paren type instead.
    Tuple(Vec<PR<Ty>>),
    /// `(A, B) -> R`.
    Func {
        params: Vec<PR<Ty>>,
        ret: PR<P<Ty>>,
    },
    /// `[T]`.
    Slice(PR<P<Ty>>),
    /// `[T; N]`.
    Array {
        ty: PR<P<Ty>>,
        size: AnonConst,
    },
    Path(Path),
    Unit,
}
