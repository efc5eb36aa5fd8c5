//! Item nodes: everything that introduces a name at module level.

use jacy_span::Span;
use strum_macros::Display;

use crate::fragments::{
    AnonConst, Attr, Body, FuncSig, GenericParam, Ident, SimplePath, Vis,
};
use crate::node_id::{NodeId, PR};
use crate::ty::Ty;
use crate::P;

#[derive(Clone, Debug)]
pub struct Item {
    pub id: NodeId,
    pub attrs: Vec<Attr>,
    pub vis: Vis,
    pub kind: ItemKind,
    pub span: Span,
}

impl Item {
    /// The item's declared name. `use` declarations have none.
    pub fn name(&self) -> Option<&Ident> {
        match &self.kind {
            ItemKind::Enum(item) => Some(&item.name),
            ItemKind::Struct(item) => Some(&item.name),
            ItemKind::Trait(item) => Some(&item.name),
            ItemKind::Func(item) => Some(&item.name),
            ItemKind::Init(_) => None,
            ItemKind::Mod(item) => Some(&item.name),
            ItemKind::TypeAlias(item) => Some(&item.name),
            ItemKind::Impl(_) | ItemKind::Use(_) => None,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match &self.kind {
            ItemKind::Enum(_) => "enum",
            ItemKind::Struct(_) => "struct",
            ItemKind::Trait(_) => "trait",
            ItemKind::Impl(_) => "impl",
            ItemKind::Func(_) => "function",
            ItemKind::Init(_) => "initializer",
            ItemKind::Mod(_) => "module",
            ItemKind::TypeAlias(_) => "type alias",
            ItemKind::Use(_) => "use declaration",
        }
    }
}

#[derive(Clone, Debug)]
pub enum ItemKind {
    Enum(EnumItem),
    Struct(StructItem),
    Trait(TraitItem),
    Impl(ImplItem),
    Func(FuncItem),
    /// `init` constructor inside an `impl`.
    Init(FuncItem),
    Mod(ModItem),
    TypeAlias(TypeAliasItem),
    Use(UseDeclItem),
}

#[derive(Clone, Debug)]
pub struct EnumItem {
    pub name: Ident,
    pub generics: Vec<GenericParam>,
    pub variants: Vec<PR<Variant>>,
}

/// An enum variant with one of three body shapes.
#[derive(Clone, Debug)]
pub struct Variant {
    pub id: NodeId,
    pub name: Ident,
    pub body: VariantBody,
    pub span: Span,
}

#[derive(Clone, Debug)]
pub enum VariantBody {
    /// Plain variant with an optional explicit discriminant.
    Unit(Option<AnonConst>),
    Tuple(Vec<TupleTyEl>),
    Struct(Vec<StructField>),
}

/// Element of a tuple type or tuple variant, optionally named.
#[derive(Clone, Debug)]
pub struct TupleTyEl {
    pub id: NodeId,
    pub name: Option<Ident>,
    pub ty: PR<P<Ty>>,
    pub span: Span,
}

#[derive(Clone, Debug)]
pub struct StructItem {
    pub name: Ident,
    pub generics: Vec<GenericParam>,
    pub fields: Vec<StructField>,
}

#[derive(Clone, Debug)]
pub struct StructField {
    pub id: NodeId,
    pub vis: Vis,
    pub name: Ident,
    pub ty: PR<P<Ty>>,
    pub span: Span,
}

#[derive(Clone, Debug)]
pub struct TraitItem {
    pub name: Ident,
    pub generics: Vec<GenericParam>,
    pub members: Vec<PR<Item>>,
}

#[derive(Clone, Debug)]
pub struct ImplItem {
    pub generics: Vec<GenericParam>,
    /// `impl Trait for Ty` when present, plain `impl Ty` otherwise.
    pub trait_path: Option<PR<crate::fragments::Path>>,
    pub ty: PR<P<Ty>>,
    pub members: Vec<PR<Item>>,
}

#[derive(Clone, Debug)]
pub struct FuncItem {
    pub name: Ident,
    pub generics: Vec<GenericParam>,
    pub sig: FuncSig,
    /// Absent for trait method declarations without a default body.
    pub body: Option<Body>,
}

#[derive(Clone, Debug)]
pub struct ModItem {
    pub name: Ident,
    pub items: Vec<PR<Item>>,
}

#[derive(Clone, Debug)]
pub struct TypeAliasItem {
    pub name: Ident,
    pub generics: Vec<GenericParam>,
    /// Absent in trait position (`type Output;`).
    pub ty: Option<PR<P<Ty>>>,
}

#[derive(Clone, Debug)]
pub struct UseDeclItem {
    pub use_tree: PR<UseTree>,
}

/// The nested form of an import declaration.
#[derive(Clone, Debug)]
pub struct UseTree {
    pub id: NodeId,
    pub kind: UseTreeKind,
    pub span: Span,
}

impl UseTree {
    pub fn prefix(&self) -> Option<&SimplePath> {
        match &self.kind {
            UseTreeKind::Raw(path) => Some(path),
            UseTreeKind::All(path) | UseTreeKind::Specific(path, _) => path.as_ref(),
            UseTreeKind::Rebind(path, _) => Some(path),
        }
    }
}

#[derive(Clone, Debug, Display)]
pub enum UseTreeKind {
    /// `use a::b;`
    Raw(SimplePath),
    /// `use a::b::*;`
    All(Option<SimplePath>),
    /// `use a::{b, c::d};`
    Specific(Option<SimplePath>, Vec<PR<UseTree>>),
    /// `use a::b as c;`
    Rebind(SimplePath, Ident),
}
