//! Use-declaration resolution.
//!
//! Runs after the module tree is built and before body resolution.
//! Each use-tree is resolved depth-first: looking a name up in a
//! module whose own use-declarations are still pending resolves those
//! first, and reentering a use-declaration that is already in
//! progress is a cycle. Cyclic declarations are all reported and none
//! of them mutates its module's bindings.

use std::collections::{HashMap, HashSet};

use jacy_ast::visit::{self, AstVisitor};
use jacy_ast::{Item, ItemKind, NodeId, Party, SimplePath, UseTree, UseTreeKind};
use jacy_message::{Message, MessageBuilder, MessageHolder};
use jacy_span::{Interner, Kw, Span, Symbol};

use crate::def::{DefKind, DefVis, Namespace};
use crate::def_table::DefTable;
use crate::module::{ModuleId, NameBinding};

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
enum UseState {
    Unresolved,
    InProgress,
    Resolved,
}

#[derive(Clone, Debug)]
struct UseDecl {
    node: NodeId,
    vis: DefVis,
    module: ModuleId,
    tree: UseTree,
}

pub struct Importer<'a> {
    def_table: &'a mut DefTable,
    interner: &'a Interner,
    msg: MessageHolder,
    decls: Vec<UseDecl>,
    states: HashMap<NodeId, UseState>,
    stack: Vec<NodeId>,
    /// Declarations already reported as part of a cycle; they fail
    /// silently afterwards.
    cycle_members: HashSet<NodeId>,
    /// Bindings introduced by glob imports, to diagnose two globs
    /// dragging different things in under one name.
    glob_imports: HashMap<(ModuleId, Namespace, Symbol), NameBinding>,
}

impl<'a> Importer<'a> {
    pub fn new(def_table: &'a mut DefTable, interner: &'a Interner) -> Self {
        Self {
            def_table,
            interner,
            msg: MessageHolder::new(),
            decls: Vec::new(),
            states: HashMap::new(),
            stack: Vec::new(),
            cycle_members: HashSet::new(),
            glob_imports: HashMap::new(),
        }
    }

    /// Resolve every use-declaration of the party.
    pub fn resolve(mut self, party: &Party) -> Vec<Message> {
        let mut collector = UseCollector { decls: Vec::new() };
        collector.visit_party(party);
        for (node, tree) in collector.decls {
            let vis = self
                .def_table
                .opt_def_of_node(node)
                .map(|def| self.def_table.def_vis(def))
                .unwrap_or_default();
            let module = self.def_table.use_decl_module(node);
            self.states.insert(node, UseState::Unresolved);
            self.decls.push(UseDecl {
                node,
                vis,
                module,
                tree,
            });
        }
        for index in 0..self.decls.len() {
            self.resolve_decl(index);
        }
        let mut holder = self.msg;
        holder.take()
    }

    fn resolve_decl(&mut self, index: usize) {
        let node = self.decls[index].node;
        match self.states[&node] {
            UseState::Resolved => return,
            UseState::InProgress => {
                self.report_cycle(node);
                return;
            }
            UseState::Unresolved => {}
        }
        self.states.insert(node, UseState::InProgress);
        self.stack.push(node);
        let decl = self.decls[index].clone();
        self.resolve_tree(&decl, &decl.tree, None);
        self.stack.pop();
        self.states.insert(node, UseState::Resolved);
    }

    /// Every declaration currently being resolved participates in the
    /// cycle; report each once and let them fail without binding.
    fn report_cycle(&mut self, reentered: NodeId) {
        let mut members: Vec<NodeId> = self.stack.clone();
        members.push(reentered);
        for node in members {
            if !self.cycle_members.insert(node) {
                continue;
            }
            let span = self
                .decls
                .iter()
                .find(|decl| decl.node == node)
                .map(|decl| decl.tree.span)
                .unwrap_or(Span::DUMMY);
            MessageBuilder::error()
                .text("cyclic `use` declarations")
                .primary(span, "this import depends on itself")
                .emit(&mut self.msg);
        }
    }

    fn resolve_tree(&mut self, decl: &UseDecl, tree: &UseTree, base: Option<ModuleId>) {
        match &tree.kind {
            UseTreeKind::Raw(path) => {
                self.import_name(decl, path, None, base);
            }
            UseTreeKind::Rebind(path, alias) => {
                self.import_name(decl, path, Some((alias.sym, alias.span)), base);
            }
            UseTreeKind::All(path) => {
                let target = match path {
                    Some(path) => self.resolve_module_path(decl, path, base, path.segs.len()),
                    None => base.or(Some(decl.module)),
                };
                if let Some(target) = target {
                    self.import_glob(decl, target);
                }
            }
            UseTreeKind::Specific(path, subtrees) => {
                let target = match path {
                    Some(path) => self.resolve_module_path(decl, path, base, path.segs.len()),
                    None => base.or(Some(decl.module)),
                };
                let Some(target) = target else {
                    return;
                };
                for subtree in subtrees.iter().flatten() {
                    self.resolve_tree(decl, subtree, Some(target));
                }
            }
        }
    }

    /// Import the final segment of `path` into the declaring module,
    /// under its own name or a rebinding alias.
    fn import_name(
        &mut self,
        decl: &UseDecl,
        path: &SimplePath,
        alias: Option<(Symbol, Span)>,
        base: Option<ModuleId>,
    ) {
        debug_assert!(!path.segs.is_empty());
        let final_seg = path.segs.last().unwrap();
        // With a one-segment path the prefix is the subtree base, or
        // the declaring module itself.
        let Some(target) = self.resolve_module_path(decl, path, base, path.segs.len() - 1)
        else {
            return;
        };
        let mut found = false;
        for ns in [Namespace::Value, Namespace::Type] {
            let Some(binding) = self.lookup_with_pending(target, ns, final_seg.ident.sym) else {
                continue;
            };
            found = true;
            self.check_import_vis(decl, target, binding, final_seg.ident.span);
            let (name, span) = alias.unwrap_or((final_seg.ident.sym, final_seg.ident.span));
            self.insert_binding(decl.module, ns, name, binding, span);
        }
        if !found && !self.cycle_members.contains(&decl.node) {
            let name = self
                .interner
                .resolve_owned(final_seg.ident.sym)
                .unwrap_or_else(|| "<?>".into());
            MessageBuilder::error()
                .text(format!("unresolved import `{name}`"))
                .primary(final_seg.ident.span, "not found")
                .emit(&mut self.msg);
        }
    }

    /// Copy every `pub` binding of `target` into the declaring
    /// module. Existing bindings win silently.
    fn import_glob(&mut self, decl: &UseDecl, target: ModuleId) {
        self.resolve_pending_uses_of(target);
        let mut imports: Vec<(Namespace, Symbol, NameBinding)> = Vec::new();
        for ns in [Namespace::Value, Namespace::Type] {
            for (sym, binding) in self.def_table.module(target).ns.get(ns) {
                let visible = match binding {
                    NameBinding::Def(def_id) => self.def_table.def_vis(*def_id) == DefVis::Pub,
                    NameBinding::FuncOverload(_) => true,
                };
                if visible {
                    imports.push((ns, *sym, *binding));
                }
            }
        }
        for (ns, sym, binding) in imports {
            match self.glob_imports.get(&(decl.module, ns, sym)) {
                Some(previous) if *previous != binding => {
                    let name = self
                        .interner
                        .resolve_owned(sym)
                        .unwrap_or_else(|| "<?>".into());
                    MessageBuilder::error()
                        .text(format!("`{name}` is ambiguous: two glob imports bring it in"))
                        .primary(decl.tree.span, "conflicting glob import")
                        .emit(&mut self.msg);
                    continue;
                }
                _ => {}
            }
            self.glob_imports.insert((decl.module, ns, sym), binding);
            let map = self.def_table.module_mut(decl.module).ns.get_mut(ns);
            map.entry(sym).or_insert(binding);
        }
    }

    fn insert_binding(
        &mut self,
        module: ModuleId,
        ns: Namespace,
        sym: Symbol,
        binding: NameBinding,
        span: Span,
    ) {
        if self.def_table.module(module).binding(ns, sym).is_some() {
            let name = self
                .interner
                .resolve_owned(sym)
                .unwrap_or_else(|| "<?>".into());
            MessageBuilder::error()
                .text(format!("`{name}` has been already declared in this scope"))
                .primary(span, "imported here")
                .emit(&mut self.msg);
            return;
        }
        self.def_table
            .module_mut(module)
            .ns
            .get_mut(ns)
            .insert(sym, binding);
    }

    fn check_import_vis(
        &mut self,
        decl: &UseDecl,
        target: ModuleId,
        binding: NameBinding,
        span: Span,
    ) {
        let NameBinding::Def(def_id) = binding else {
            return;
        };
        if self.def_table.def_vis(def_id) == DefVis::Pub {
            return;
        }
        if self.is_ancestor_or_self(target, decl.module) {
            return;
        }
        let name = self
            .interner
            .resolve_owned(self.def_table.def(def_id).ident.sym)
            .unwrap_or_else(|| "<?>".into());
        MessageBuilder::error()
            .text(format!("`{name}` is private"))
            .primary(span, "not visible from here")
            .aux(self.def_table.def_name_span(def_id), "declared non-`pub` here")
            .emit(&mut self.msg);
    }

    fn is_ancestor_or_self(&self, candidate: ModuleId, of: ModuleId) -> bool {
        let mut cursor = Some(of);
        while let Some(module) = cursor {
            if module == candidate {
                return true;
            }
            cursor = self.def_table.module(module).parent;
        }
        false
    }

    /// Resolve the first `prefix_len` segments of a path to a module.
    fn resolve_module_path(
        &mut self,
        decl: &UseDecl,
        path: &SimplePath,
        base: Option<ModuleId>,
        prefix_len: usize,
    ) -> Option<ModuleId> {
        let mut current = base;
        if path.global {
            current = Some(ModuleId::ROOT);
        }
        for seg in path.segs.iter().take(prefix_len) {
            let sym = seg.ident.sym;
            let next = if sym.is_specific_kw(Kw::Party) {
                Some(ModuleId::ROOT)
            } else if sym.is_specific_kw(Kw::Super) {
                self.def_table
                    .module(current.unwrap_or(decl.module))
                    .parent
            } else {
                match current {
                    Some(module) => self.child_module(module, sym),
                    // Leading segment: search outwards from the
                    // declaring module.
                    None => self.find_module_upwards(decl.module, sym),
                }
            };
            match next {
                Some(module) => current = Some(module),
                None => {
                    if !self.cycle_members.contains(&decl.node) {
                        let name = self
                            .interner
                            .resolve_owned(sym)
                            .unwrap_or_else(|| "<?>".into());
                        MessageBuilder::error()
                            .text(format!("unresolved module `{name}` in use declaration"))
                            .primary(seg.ident.span, "no such module")
                            .emit(&mut self.msg);
                    }
                    return None;
                }
            }
        }
        Some(current.unwrap_or(decl.module))
    }

    fn child_module(&mut self, module: ModuleId, sym: Symbol) -> Option<ModuleId> {
        if let Some(child) = self.def_table.module(module).children.get(&sym) {
            return Some(*child);
        }
        // A re-exported module can come from a pending use.
        self.resolve_pending_uses_of(module);
        if let Some(child) = self.def_table.module(module).children.get(&sym) {
            return Some(*child);
        }
        match self.def_table.module(module).binding(Namespace::Type, sym) {
            Some(NameBinding::Def(def_id)) if self.def_table.def(def_id).kind == DefKind::Mod => {
                self.def_table.opt_module_of_def(def_id)
            }
            _ => None,
        }
    }

    fn find_module_upwards(&mut self, from: ModuleId, sym: Symbol) -> Option<ModuleId> {
        let mut cursor = Some(from);
        while let Some(module) = cursor {
            if let Some(found) = self.child_module(module, sym) {
                return Some(found);
            }
            cursor = self.def_table.module(module).parent;
        }
        None
    }

    /// A name lookup that first forces the target module's own
    /// pending use-declarations, so re-exports chain.
    fn lookup_with_pending(
        &mut self,
        module: ModuleId,
        ns: Namespace,
        sym: Symbol,
    ) -> Option<NameBinding> {
        if let Some(binding) = self.def_table.module(module).binding(ns, sym) {
            return Some(binding);
        }
        self.resolve_pending_uses_of(module);
        self.def_table.module(module).binding(ns, sym)
    }

    fn resolve_pending_uses_of(&mut self, module: ModuleId) {
        for index in 0..self.decls.len() {
            if self.decls[index].module == module
                && self.states[&self.decls[index].node] != UseState::Resolved
            {
                self.resolve_decl(index);
            }
        }
    }
}

/// Collects every use-declaration in the party, wherever it nests.
struct UseCollector {
    decls: Vec<(NodeId, UseTree)>,
}

impl AstVisitor for UseCollector {
    fn visit_item(&mut self, item: &Item) {
        if let ItemKind::Use(decl) = &item.kind {
            if let Ok(tree) = &decl.use_tree {
                self.decls.push((item.id, tree.clone()));
            }
        }
        visit::walk_item(self, item);
    }
}
