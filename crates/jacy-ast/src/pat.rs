//! Pattern nodes.

use jacy_span::Span;

use crate::fragments::{Ident, Path};
use crate::lit::LitValue;
use crate::node_id::{NodeId, PR};
use crate::P;

#[derive(Clone, Debug)]
pub struct Pat {
    pub id: NodeId,
    pub kind: PatKind,
    pub span: Span,
}

#[derive(Clone, Debug)]
pub enum PatKind {
    /// `_`.
    Wildcard,
    Lit(LitValue),
    /// `ref mut name @ sub`.
    Ident {
        reference: bool,
        mutable: bool,
        name: Ident,
        sub: Option<PR<P<Pat>>>,
    },
    /// `&pat`.
    Ref {
        mutable: bool,
        pat: PR<P<Pat>>,
    },
    Path(Path),
    /// `Path { field: pat, .., rest }`; `rest` records a trailing
    /// `..`.
    Struct {
        path: Path,
        fields: Vec<StructPatField>,
        rest: bool,
    },
    /// `(a, .., b)`; at most one rest whose position is recorded.
    Tuple {
        els: Vec<PR<Pat>>,
        /// Index in `els` where the `..` was written; always a valid
        /// index into `els` (the rest slot itself holds a wildcard).
        rest_pat_index: Option<usize>,
    },
    /// `[a, b, .., y, z]` partitioned around the rest.
    Slice {
        before: Vec<PR<Pat>>,
        rest: Option<Span>,
        after: Vec<PR<Pat>>,
    },
    /// `p1 | p2 | p3`.
    Multi(Vec<PR<Pat>>),
}

/// One field of a struct pattern: `name: pat` or shorthand `name`.
#[derive(Clone, Debug)]
pub struct StructPatField {
    pub id: NodeId,
    pub name: Ident,
    /// `None` for the shorthand, which binds `name` itself.
    pub pat: Option<PR<P<Pat>>>,
    pub span: Span,
}
