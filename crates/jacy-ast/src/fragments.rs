//! Shared fragments: identifiers, paths, generics, function
//! signatures, attributes.

use jacy_span::{Span, Symbol};
use smallvec::SmallVec;

use crate::node_id::{NodeId, PR};
use crate::ty::Ty;
use crate::{Expr, P};

/// A name occurrence in the tree.
#[derive(Copy, Clone, Debug)]
pub struct Ident {
    pub id: NodeId,
    pub sym: Symbol,
    pub span: Span,
}

impl Ident {
    pub fn new(id: NodeId, sym: Symbol, span: Span) -> Self {
        Self { id, sym, span }
    }
}

/// One segment of a full path: name plus optional generic arguments.
/// The ident span always lies within the segment span.
#[derive(Clone, Debug)]
pub struct PathSeg {
    pub id: NodeId,
    pub ident: Ident,
    pub generics: Option<Vec<GenericArg>>,
    pub span: Span,
}

/// `a::b::<T>::c`, optionally `::`-anchored at the crate root.
#[derive(Clone, Debug)]
pub struct Path {
    pub id: NodeId,
    pub global: bool,
    pub segs: SmallVec<[PathSeg; 2]>,
    pub span: Span,
}

impl Path {
    /// The final segment; a path always has at least one.
    pub fn target(&self) -> &PathSeg {
        self.segs.last().expect("path with no segments")
    }
}

/// A generics-free path segment, as used in use-trees and attributes.
#[derive(Clone, Debug)]
pub struct SimplePathSeg {
    pub id: NodeId,
    pub ident: Ident,
    pub span: Span,
}

/// Restricted path without generic arguments.
#[derive(Clone, Debug)]
pub struct SimplePath {
    pub id: NodeId,
    pub global: bool,
    pub segs: SmallVec<[SimplePathSeg; 2]>,
    pub span: Span,
}

/// `@name` attached before an item.
#[derive(Clone, Debug)]
pub struct Attr {
    pub id: NodeId,
    pub name: SimplePath,
    pub span: Span,
}

/// Item visibility. Only `pub` is in scope; everything else is
/// module-private by default.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Vis {
    Unset,
    Pub(Span),
}

impl Vis {
    pub fn is_pub(&self) -> bool {
        matches!(self, Vis::Pub(_))
    }
}

/// A generic parameter declaration.
#[derive(Clone, Debug)]
pub struct GenericParam {
    pub id: NodeId,
    pub kind: GenericParamKind,
    pub span: Span,
}

impl GenericParam {
    pub fn name(&self) -> &Ident {
        match &self.kind {
            GenericParamKind::Type { name, .. }
            | GenericParamKind::Lifetime { name }
            | GenericParamKind::Const { name, .. } => name,
        }
    }
}

#[derive(Clone, Debug)]
pub enum GenericParamKind {
    Type {
        name: Ident,
        bound: Option<P<Ty>>,
    },
    /// `'a`; the param span includes the quote, the name span does
    /// not.
    Lifetime {
        name: Ident,
    },
    Const {
        name: Ident,
        ty: P<Ty>,
        default: Option<AnonConst>,
    },
}

/// A generic argument at a use site.
#[derive(Clone, Debug)]
pub enum GenericArg {
    Type(P<Ty>),
    Lifetime(Ident),
    Const(AnonConst),
}

impl GenericArg {
    pub fn span(&self) -> Span {
        match self {
            GenericArg::Type(ty) => ty.span,
            GenericArg::Lifetime(name) => name.span,
            GenericArg::Const(value) => value.span(),
        }
    }
}

/// An expression in const position (array sizes, parameter defaults,
/// discriminants).
#[derive(Clone, Debug)]
pub struct AnonConst {
    pub id: NodeId,
    pub expr: P<Expr>,
}

impl AnonConst {
    pub fn span(&self) -> Span {
        self.expr.span
    }
}

/// A function parameter: `label name: Type = default`.
#[derive(Clone, Debug)]
pub struct FuncParam {
    pub id: NodeId,
    /// External label callers use; `None` means positional.
    pub label: Option<Ident>,
    pub pat: PR<crate::pat::Pat>,
    pub ty: PR<P<Ty>>,
    pub default: Option<AnonConst>,
    pub span: Span,
}

/// Return type: either written out or elided (unit), keeping the span
/// where it would have been.
#[derive(Clone, Debug)]
pub enum FuncRetTy {
    Default(Span),
    Some(P<Ty>),
}

impl FuncRetTy {
    pub fn span(&self) -> Span {
        match self {
            FuncRetTy::Default(span) => *span,
            FuncRetTy::Some(ty) => ty.span,
        }
    }
}

/// Signature of a function-like item.
#[derive(Clone, Debug)]
pub struct FuncSig {
    pub params: Vec<FuncParam>,
    pub ret_ty: FuncRetTy,
    pub span: Span,
}

/// A function/const body: either `= expr` or a block.
#[derive(Clone, Debug)]
pub struct Body {
    pub id: NodeId,
    pub expr_body: bool,
    pub value: PR<P<Expr>>,
}
