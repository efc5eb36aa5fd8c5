//! The module tree: index-linked, owned by the def table.

use std::collections::HashMap;

use jacy_ast::NodeId;
use jacy_span::Symbol;

use crate::def::{DefId, Namespace, PerNS};
use crate::def_table::FuncOverloadId;

/// Index of a module in the def table's module vector. Modules link
/// to each other only through these indices, so the cyclic module
/// graph needs no owning pointers.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct ModuleId(pub u32);

impl ModuleId {
    pub const ROOT: ModuleId = ModuleId(0);

    pub fn as_usize(self) -> usize {
        self.0 as usize
    }
}

/// What a module was created for.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum ModuleKind {
    /// The crate root.
    Root,
    /// A module-like definition: `mod`, `trait`, `impl`, `enum`.
    Def(DefId),
    /// A block scope that holds items.
    Block(NodeId),
}

/// One entry of a namespace map.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum NameBinding {
    Def(DefId),
    /// A set of functions sharing an unsuffixed name, disambiguated
    /// by suffix.
    FuncOverload(FuncOverloadId),
}

/// One node of the module tree.
#[derive(Clone, Debug)]
pub struct Module {
    pub id: ModuleId,
    pub parent: Option<ModuleId>,
    pub kind: ModuleKind,
    /// Child modules by name, for path-segment walking.
    pub children: HashMap<Symbol, ModuleId>,
    /// Per-namespace name bindings.
    pub ns: PerNS<HashMap<Symbol, NameBinding>>,
}

impl Module {
    pub fn new(id: ModuleId, parent: Option<ModuleId>, kind: ModuleKind) -> Self {
        Self {
            id,
            parent,
            kind,
            children: HashMap::new(),
            ns: PerNS::default(),
        }
    }

    pub fn binding(&self, ns: Namespace, sym: Symbol) -> Option<NameBinding> {
        self.ns.get(ns).get(&sym).copied()
    }
}
