//! The append-only definition table and its side maps.

use std::collections::HashMap;

use jacy_ast::NodeId;
use jacy_span::{Ident, Interner, Span, Symbol};
use strum::IntoEnumIterator as _;

use crate::def::{Def, DefId, DefIndex, DefKind, DefVis, Namespace, PrimType};
use crate::module::{Module, ModuleId, ModuleKind, NameBinding};

/// Identifies one function overload group.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct FuncOverloadId(pub u32);

/// Suffix symbol to concrete function def.
pub type FuncOverloadMap = HashMap<Symbol, DefId>;

/// All definitions of a compilation unit plus the module tree built
/// over them. Append-only: defs and modules are never removed.
#[derive(Debug, Default)]
pub struct DefTable {
    defs: Vec<Def>,
    def_vis: HashMap<DefId, DefVis>,
    node_to_def: HashMap<NodeId, DefId>,
    def_to_node: HashMap<DefId, NodeId>,

    modules: Vec<Module>,
    def_modules: HashMap<DefId, ModuleId>,
    block_modules: HashMap<NodeId, ModuleId>,
    /// Module each use-declaration was written in, until the importer
    /// resolves it.
    use_decl_modules: HashMap<NodeId, ModuleId>,

    func_overloads: Vec<FuncOverloadMap>,
    /// Synthetic def of each overload group, indexed by
    /// [`FuncOverloadId`], plus the reverse direction.
    overload_defs: Vec<DefId>,
    def_overloads: HashMap<DefId, FuncOverloadId>,

    /// Synthetic defs of the built-in types, by name.
    builtin_types: HashMap<Symbol, DefId>,
    prim_types: HashMap<DefId, PrimType>,
}

impl DefTable {
    pub fn new() -> Self {
        Self::default()
    }

    // Definitions //

    /// Append a definition, recording visibility and the
    /// NodeId <-> DefId bijection.
    pub fn define(&mut self, vis: DefVis, node_id: NodeId, kind: DefKind, ident: Ident) -> DefId {
        let def_id = DefId::new(DefIndex(self.defs.len() as u32));
        self.defs.push(Def {
            id: def_id,
            kind,
            ident,
        });
        tracing::debug!("define {kind} {:?} as {def_id} for node {node_id}", ident.sym);
        self.def_vis.insert(def_id, vis);
        let stale = self.node_to_def.insert(node_id, def_id);
        debug_assert!(stale.is_none(), "[DEV] node {node_id} defined twice");
        let stale = self.def_to_node.insert(def_id, node_id);
        debug_assert!(stale.is_none(), "[DEV] def {def_id} bound to two nodes");
        def_id
    }

    /// Append a definition with no AST node behind it. Synthetic defs
    /// never enter the NodeId <-> DefId maps.
    pub fn define_synthetic(&mut self, kind: DefKind, ident: Ident) -> DefId {
        let def_id = DefId::new(DefIndex(self.defs.len() as u32));
        self.defs.push(Def {
            id: def_id,
            kind,
            ident,
        });
        self.def_vis.insert(def_id, DefVis::Pub);
        def_id
    }

    /// Seed the synthetic defs of the built-in types. Called once,
    /// right after the root def.
    pub fn define_builtin_types(&mut self, interner: &Interner) {
        for prim in PrimType::iter() {
            let sym = interner.intern(prim.to_string());
            let def_id =
                self.define_synthetic(DefKind::PrimType, Ident::new(sym, Span::DUMMY));
            self.builtin_types.insert(sym, def_id);
            self.prim_types.insert(def_id, prim);
        }
    }

    /// The built-in type def named `sym`, if any. Callers consult the
    /// module chain first, so user definitions shadow these.
    pub fn builtin_type(&self, sym: Symbol) -> Option<DefId> {
        self.builtin_types.get(&sym).copied()
    }

    /// The built-in type a synthetic def stands for.
    pub fn prim_type_of(&self, def_id: DefId) -> Option<PrimType> {
        self.prim_types.get(&def_id).copied()
    }

    pub fn def(&self, def_id: DefId) -> &Def {
        self.defs
            .get(def_id.as_usize())
            .unwrap_or_else(|| panic!("[DEV] `DefTable::def` with non-existent {def_id:?}"))
    }

    pub fn defs(&self) -> &[Def] {
        &self.defs
    }

    pub fn def_count(&self) -> usize {
        self.defs.len()
    }

    pub fn def_vis(&self, def_id: DefId) -> DefVis {
        self.def_vis.get(&def_id).copied().unwrap_or_default()
    }

    pub fn def_name_span(&self, def_id: DefId) -> Span {
        self.def(def_id).ident.span
    }

    pub fn opt_def_of_node(&self, node_id: NodeId) -> Option<DefId> {
        self.node_to_def.get(&node_id).copied()
    }

    pub fn def_of_node(&self, node_id: NodeId) -> DefId {
        self.opt_def_of_node(node_id)
            .unwrap_or_else(|| panic!("[DEV] no def for node {node_id}"))
    }

    pub fn node_of_def(&self, def_id: DefId) -> NodeId {
        self.def_to_node
            .get(&def_id)
            .copied()
            .unwrap_or_else(|| panic!("[DEV] no node for {def_id:?}"))
    }

    /// The two id maps, for bijection checks.
    pub fn node_def_pairs(&self) -> (&HashMap<NodeId, DefId>, &HashMap<DefId, NodeId>) {
        (&self.node_to_def, &self.def_to_node)
    }

    // Modules //

    pub fn add_root_module(&mut self) -> ModuleId {
        debug_assert!(self.modules.is_empty(), "[DEV] root module added twice");
        let id = ModuleId(0);
        self.modules.push(Module::new(id, None, ModuleKind::Root));
        id
    }

    pub fn add_module(&mut self, parent: ModuleId, kind: ModuleKind) -> ModuleId {
        let id = ModuleId(self.modules.len() as u32);
        self.modules.push(Module::new(id, Some(parent), kind));
        match kind {
            ModuleKind::Def(def_id) => {
                let stale = self.def_modules.insert(def_id, id);
                debug_assert!(stale.is_none(), "[DEV] module for {def_id:?} added twice");
            }
            ModuleKind::Block(node_id) => {
                let stale = self.block_modules.insert(node_id, id);
                debug_assert!(stale.is_none(), "[DEV] block module {node_id} added twice");
            }
            ModuleKind::Root => panic!("[DEV] root module must use `add_root_module`"),
        }
        id
    }

    pub fn module(&self, id: ModuleId) -> &Module {
        &self.modules[id.as_usize()]
    }

    pub fn module_mut(&mut self, id: ModuleId) -> &mut Module {
        &mut self.modules[id.as_usize()]
    }

    pub fn module_count(&self) -> usize {
        self.modules.len()
    }

    pub fn opt_module_of_def(&self, def_id: DefId) -> Option<ModuleId> {
        self.def_modules.get(&def_id).copied()
    }

    pub fn module_of_def(&self, def_id: DefId) -> ModuleId {
        self.opt_module_of_def(def_id)
            .unwrap_or_else(|| panic!("[DEV] no module for {def_id:?}"))
    }

    pub fn opt_block_module(&self, node_id: NodeId) -> Option<ModuleId> {
        self.block_modules.get(&node_id).copied()
    }

    pub fn set_use_decl_module(&mut self, node_id: NodeId, module: ModuleId) {
        self.use_decl_modules.insert(node_id, module);
    }

    pub fn use_decl_module(&self, node_id: NodeId) -> ModuleId {
        self.use_decl_modules
            .get(&node_id)
            .copied()
            .unwrap_or_else(|| panic!("[DEV] no module recorded for use-decl {node_id}"))
    }

    // Function overloading //

    /// Open a fresh overload group under `base`. The group gets a
    /// synthetic def so name resolution can answer with a plain
    /// `DefId`; type checking narrows the group by suffix.
    pub fn new_func_overload_group(&mut self, base: Ident) -> FuncOverloadId {
        let overload_id = FuncOverloadId(self.func_overloads.len() as u32);
        self.func_overloads.push(FuncOverloadMap::new());
        let def_id = self.define_synthetic(DefKind::FuncOverload, base);
        self.overload_defs.push(def_id);
        self.def_overloads.insert(def_id, overload_id);
        overload_id
    }

    /// Add `def_id` to an overload group under `suffix`.
    pub fn define_func_overload(
        &mut self,
        def_id: DefId,
        overload_id: FuncOverloadId,
        suffix: Symbol,
    ) {
        let group = self
            .func_overloads
            .get_mut(overload_id.0 as usize)
            .unwrap_or_else(|| panic!("[DEV] unknown overload group {overload_id:?}"));
        let stale = group.insert(suffix, def_id);
        debug_assert!(stale.is_none(), "[DEV] overload suffix bound twice");
    }

    pub fn func_overload(&self, overload_id: FuncOverloadId) -> &FuncOverloadMap {
        self.func_overloads
            .get(overload_id.0 as usize)
            .unwrap_or_else(|| panic!("[DEV] unknown overload group {overload_id:?}"))
    }

    /// The synthetic def standing for a whole overload group.
    pub fn func_overload_def(&self, overload_id: FuncOverloadId) -> DefId {
        self.overload_defs
            .get(overload_id.0 as usize)
            .copied()
            .unwrap_or_else(|| panic!("[DEV] unknown overload group {overload_id:?}"))
    }

    /// The overload group behind a `DefKind::FuncOverload` def.
    pub fn overload_of_def(&self, def_id: DefId) -> Option<FuncOverloadId> {
        self.def_overloads.get(&def_id).copied()
    }

    /// An arbitrary-but-stable representative of a group, for
    /// diagnostics.
    pub fn func_overload_first_def(&self, overload_id: FuncOverloadId) -> DefId {
        let group = self.func_overload(overload_id);
        let mut defs: Vec<DefId> = group.values().copied().collect();
        defs.sort();
        defs[0]
    }

    // Dumps //

    /// Multi-line rendering of every definition, for
    /// `print=definitions`.
    pub fn dump_defs(&self, interner: &Interner) -> String {
        let mut out = String::new();
        for def in &self.defs {
            let name = interner
                .resolve_owned(def.ident.sym)
                .unwrap_or_else(|| "<?>".into());
            out.push_str(&format!("{} {} `{}`\n", def.id, def.kind, name));
        }
        out
    }

    /// Indented module tree rendering, for `print=mod-tree`.
    pub fn dump_mod_tree(&self, interner: &Interner) -> String {
        let mut out = String::new();
        self.dump_module(ModuleId::ROOT, 0, interner, &mut out);
        out
    }

    fn dump_module(&self, id: ModuleId, depth: usize, interner: &Interner, out: &mut String) {
        let module = self.module(id);
        let indent = "  ".repeat(depth);
        let title = match module.kind {
            ModuleKind::Root => "party".to_string(),
            ModuleKind::Def(def_id) => {
                let def = self.def(def_id);
                let name = interner
                    .resolve_owned(def.ident.sym)
                    .unwrap_or_else(|| "<?>".into());
                format!("{} `{}`", def.kind, name)
            }
            ModuleKind::Block(node_id) => format!("block {node_id}"),
        };
        out.push_str(&format!("{indent}[{title}]\n"));
        for (ns, map) in module.ns.iter() {
            for (sym, binding) in map {
                let name = interner
                    .resolve_owned(*sym)
                    .unwrap_or_else(|| "<?>".into());
                out.push_str(&format!("{indent}  {ns} `{name}` -> {binding:?}\n"));
            }
        }
        let mut children: Vec<ModuleId> = module.children.values().copied().collect();
        children.sort_by_key(|id| id.0);
        for child in children {
            self.dump_module(child, depth + 1, interner, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jacy_span::Interner;

    fn ident(interner: &Interner, name: &str) -> Ident {
        Ident::new(interner.intern(name), Span::DUMMY)
    }

    #[test]
    fn define_keeps_the_bijection() {
        let interner = Interner::new();
        let mut table = DefTable::new();
        let node = NodeId::new(4);
        let def = table.define(DefVis::Pub, node, DefKind::Func, ident(&interner, "f"));
        assert_eq!(table.def_of_node(node), def);
        assert_eq!(table.node_of_def(def), node);
        assert_eq!(table.def(def).kind, DefKind::Func);
        assert_eq!(table.def_vis(def), DefVis::Pub);
    }

    #[test]
    fn module_links_are_indices() {
        let interner = Interner::new();
        let mut table = DefTable::new();
        let root = table.add_root_module();
        let node = NodeId::new(1);
        let def = table.define(DefVis::Unset, node, DefKind::Mod, ident(&interner, "m"));
        let child = table.add_module(root, ModuleKind::Def(def));
        assert_eq!(table.module(child).parent, Some(root));
        assert_eq!(table.module_of_def(def), child);
    }

    #[test]
    fn overload_groups_collect_suffixes() {
        let interner = Interner::new();
        let mut table = DefTable::new();
        let f1 = table.define(
            DefVis::Unset,
            NodeId::new(1),
            DefKind::Func,
            ident(&interner, "f"),
        );
        let f2 = table.define(
            DefVis::Unset,
            NodeId::new(2),
            DefKind::Func,
            ident(&interner, "f"),
        );
        let group = table.new_func_overload_group(ident(&interner, "f"));
        table.define_func_overload(f1, group, interner.intern("a:"));
        table.define_func_overload(f2, group, interner.intern("a:b:"));
        assert_eq!(table.func_overload(group).len(), 2);
        assert_eq!(table.func_overload_first_def(group), f1);

        // The group is addressable as an ordinary def.
        let group_def = table.func_overload_def(group);
        assert_eq!(table.def(group_def).kind, DefKind::FuncOverload);
        assert_eq!(table.overload_of_def(group_def), Some(group));
        // Synthetic defs stay out of the node maps.
        let (to_def, to_node) = table.node_def_pairs();
        assert!(!to_node.contains_key(&group_def));
        assert_eq!(to_def.len(), 2);
    }

    #[test]
    fn builtin_types_get_synthetic_defs() {
        let interner = Interner::new();
        let mut table = DefTable::new();
        table.define_builtin_types(&interner);
        let int_def = table
            .builtin_type(interner.intern("int"))
            .expect("`int` must be seeded");
        assert_eq!(table.def(int_def).kind, DefKind::PrimType);
        assert_eq!(table.prim_type_of(int_def), Some(PrimType::Int));
        assert!(table.builtin_type(interner.intern("intish")).is_none());
    }
}
