//! Rib-stack name resolution over the AST.
//!
//! Runs last, after module-tree construction and import resolution.
//! Locals and generic parameters live in ribs; everything else goes
//! through the module cursor and its ancestors. Every identifier use
//! in expression, type or pattern position gets a [`Res`] recorded
//! under its path's node id.

use std::collections::HashMap;

use jacy_ast::visit::{self, AstVisitor};
use jacy_ast::{
    Block, Expr, ExprKind, GenericArg, GenericParam, GenericParamKind, Item, ItemKind, NodeId,
    Party, Pat, PatKind, Path, Stmt, StmtKind, Ty, TyKind,
};
use jacy_message::{MessageBuilder, MessageHolder, MessageResult};
use jacy_span::{Interner, Kw, Span, Symbol};

use crate::def::{DefVis, Namespace, PerNS};
use crate::def_table::DefTable;
use crate::module::{ModuleId, NameBinding};

/// What an identifier use resolved to. A closed three-variant sum:
/// overload groups and built-in types answer through the synthetic
/// defs the [`DefTable`] holds for them.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Res {
    Def(crate::def::DefId),
    /// A local binding, by the node id of its binding pattern.
    Local(NodeId),
    Err,
}

/// Node-id-keyed resolution results.
#[derive(Debug, Default)]
pub struct ResStorage {
    map: HashMap<NodeId, Res>,
}

impl ResStorage {
    pub fn set(&mut self, node: NodeId, res: Res) {
        let stale = self.map.insert(node, res);
        debug_assert!(stale.is_none(), "[DEV] node {node} resolved twice");
    }

    pub fn get(&self, node: NodeId) -> Option<Res> {
        self.map.get(&node).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, Res)> + '_ {
        self.map.iter().map(|(node, res)| (*node, *res))
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Render sorted resolutions, for `print=resolutions`.
    pub fn dump(&self) -> String {
        let mut entries: Vec<(NodeId, Res)> = self.iter().collect();
        entries.sort_by_key(|(node, _)| *node);
        entries
            .iter()
            .map(|(node, res)| format!("{node} -> {res:?}\n"))
            .collect()
    }
}

/// One frame of the lexical scope stack.
#[derive(Debug, Default)]
struct Rib {
    bindings: PerNS<HashMap<Symbol, Res>>,
}

pub struct NameResolver<'a> {
    def_table: &'a DefTable,
    interner: &'a Interner,
    res: ResStorage,
    ribs: Vec<Rib>,
    module: ModuleId,
    msg: MessageHolder,
}

impl<'a> NameResolver<'a> {
    pub fn new(def_table: &'a DefTable, interner: &'a Interner) -> Self {
        Self {
            def_table,
            interner,
            res: ResStorage::default(),
            ribs: Vec::new(),
            module: ModuleId::ROOT,
            msg: MessageHolder::new(),
        }
    }

    pub fn resolve(mut self, party: &Party) -> MessageResult<ResStorage> {
        self.visit_party(party);
        debug_assert!(self.ribs.is_empty(), "[DEV] rib stack not drained");
        self.msg.result(self.res)
    }

    // Ribs //

    fn with_rib(&mut self, rib: Rib, f: impl FnOnce(&mut Self)) {
        self.ribs.push(rib);
        f(self);
        self.ribs.pop();
    }

    fn top_rib(&mut self) -> &mut Rib {
        self.ribs
            .last_mut()
            .expect("[DEV] binding outside of any rib")
    }

    /// A rib pre-populated with an item's generic parameters, each in
    /// its own namespace.
    fn generics_rib(&self, generics: &[GenericParam]) -> Rib {
        let mut rib = Rib::default();
        for param in generics {
            let Some(def_id) = self.def_table.opt_def_of_node(param.id) else {
                continue;
            };
            let (ns, name) = match &param.kind {
                GenericParamKind::Type { name, .. } => (Namespace::Type, name),
                GenericParamKind::Lifetime { name } => (Namespace::Lifetime, name),
                GenericParamKind::Const { name, .. } => (Namespace::Value, name),
            };
            rib.bindings.get_mut(ns).insert(name.sym, Res::Def(def_id));
        }
        rib
    }

    // Pattern bindings //

    /// Introduce every name a pattern binds into the top rib, and
    /// resolve the paths it mentions.
    fn bind_pat(&mut self, pat: &Pat) {
        match &pat.kind {
            PatKind::Wildcard | PatKind::Lit(_) => {}
            PatKind::Ident { name, sub, .. } => {
                self.top_rib()
                    .bindings
                    .get_mut(Namespace::Value)
                    .insert(name.sym, Res::Local(pat.id));
                if let Some(Ok(sub)) = sub {
                    self.bind_pat(sub);
                }
            }
            PatKind::Ref { pat: inner, .. } => {
                if let Ok(inner) = inner {
                    self.bind_pat(inner);
                }
            }
            PatKind::Path(path) => {
                self.resolve_path(Namespace::Value, path);
                visit::walk_path(self, path);
            }
            PatKind::Struct { path, fields, .. } => {
                self.resolve_path(Namespace::Type, path);
                visit::walk_path(self, path);
                for field in fields {
                    match &field.pat {
                        Some(Ok(sub)) => self.bind_pat(sub),
                        Some(Err(_)) => {}
                        // Shorthand binds the field name itself.
                        None => {
                            self.top_rib()
                                .bindings
                                .get_mut(Namespace::Value)
                                .insert(field.name.sym, Res::Local(field.id));
                        }
                    }
                }
            }
            PatKind::Tuple { els, .. } | PatKind::Multi(els) => {
                for el in els.iter().flatten() {
                    self.bind_pat(el);
                }
            }
            PatKind::Slice {
                before,
                rest: _,
                after,
            } => {
                for el in before.iter().chain(after.iter()).flatten() {
                    self.bind_pat(el);
                }
            }
        }
    }

    // Lookup //

    fn resolve_path(&mut self, ns: Namespace, path: &Path) {
        let res = self.lookup_path(ns, path, true);
        if res == Res::Err {
            let name = path.target().ident;
            let other = self.other_namespace_of(ns, path);
            self.report_unresolved(ns, name.sym, name.span, other);
        }
        self.res.set(path.id, res);
    }

    /// Unresolved names come in two flavors: the name exists in a
    /// sibling namespace (wrong namespace), or nowhere at all.
    fn report_unresolved(
        &mut self,
        ns: Namespace,
        sym: Symbol,
        span: Span,
        other: Option<Namespace>,
    ) {
        let text = self
            .interner
            .resolve_owned(sym)
            .unwrap_or_else(|| "<?>".into());
        match other {
            Some(other) => MessageBuilder::error()
                .text(format!(
                    "`{text}` is in the {other} namespace, not the {ns} namespace"
                ))
                .primary(span, "wrong namespace")
                .emit(&mut self.msg),
            None => MessageBuilder::error()
                .text(format!("cannot resolve `{text}` in {ns} namespace"))
                .primary(span, "unresolved name")
                .emit(&mut self.msg),
        }
    }

    /// A sibling namespace the path would have resolved in, probed
    /// without emitting diagnostics.
    fn other_namespace_of(&mut self, ns: Namespace, path: &Path) -> Option<Namespace> {
        Namespace::each()
            .into_iter()
            .filter(|other| *other != ns)
            .find(|other| self.lookup_path(*other, path, false) != Res::Err)
    }

    fn lookup_path(&mut self, ns: Namespace, path: &Path, report_vis: bool) -> Res {
        if path.segs.len() == 1 && !path.global {
            return self.lookup_unqualified(ns, path.target().ident.sym);
        }
        let Some(module) = self.resolve_prefix_module(path) else {
            return Res::Err;
        };
        let final_seg = path.target();
        match self.def_table.module(module).binding(ns, final_seg.ident.sym) {
            Some(NameBinding::Def(def_id)) => {
                if report_vis {
                    self.check_vis(module, def_id, final_seg.ident.span);
                }
                Res::Def(def_id)
            }
            Some(NameBinding::FuncOverload(overload_id)) => {
                Res::Def(self.def_table.func_overload_def(overload_id))
            }
            None => Res::Err,
        }
    }

    /// Walk a qualified path's prefix: every segment except the last
    /// names a module.
    fn resolve_prefix_module(&self, path: &Path) -> Option<ModuleId> {
        let mut module = if path.global { Some(ModuleId::ROOT) } else { None };
        for seg in &path.segs[..path.segs.len() - 1] {
            let sym = seg.ident.sym;
            let next = if sym.is_specific_kw(Kw::Party) {
                Some(ModuleId::ROOT)
            } else if sym.is_specific_kw(Kw::Super) {
                self.def_table
                    .module(module.unwrap_or(self.module))
                    .parent
            } else {
                match module {
                    Some(module) => self.child_module(module, sym),
                    None => self.find_module_upwards(sym),
                }
            };
            module = Some(next?);
        }
        Some(module.expect("qualified path with no prefix module"))
    }

    /// Ribs from the top down, then the module cursor and its
    /// ancestors; built-in type names resolve last, so user
    /// definitions shadow them.
    fn lookup_unqualified(&mut self, ns: Namespace, sym: Symbol) -> Res {
        for rib in self.ribs.iter().rev() {
            if let Some(res) = rib.bindings.get(ns).get(&sym) {
                return *res;
            }
        }
        let mut cursor = Some(self.module);
        while let Some(module) = cursor {
            match self.def_table.module(module).binding(ns, sym) {
                Some(NameBinding::Def(def_id)) => return Res::Def(def_id),
                Some(NameBinding::FuncOverload(overload_id)) => {
                    return Res::Def(self.def_table.func_overload_def(overload_id))
                }
                None => {}
            }
            cursor = self.def_table.module(module).parent;
        }
        if ns == Namespace::Type {
            if let Some(def_id) = self.def_table.builtin_type(sym) {
                return Res::Def(def_id);
            }
        }
        Res::Err
    }

    fn child_module(&self, module: ModuleId, sym: Symbol) -> Option<ModuleId> {
        if let Some(child) = self.def_table.module(module).children.get(&sym) {
            return Some(*child);
        }
        match self.def_table.module(module).binding(Namespace::Type, sym) {
            Some(NameBinding::Def(def_id))
                if self.def_table.def(def_id).kind == crate::def::DefKind::Mod =>
            {
                self.def_table.opt_module_of_def(def_id)
            }
            _ => None,
        }
    }

    fn find_module_upwards(&self, sym: Symbol) -> Option<ModuleId> {
        let mut cursor = Some(self.module);
        while let Some(module) = cursor {
            if let Some(found) = self.child_module(module, sym) {
                return Some(found);
            }
            cursor = self.def_table.module(module).parent;
        }
        None
    }

    /// A non-`pub` def is only reachable from inside its owning
    /// module's subtree.
    fn check_vis(&mut self, owner: ModuleId, def_id: crate::def::DefId, span: Span) {
        if self.def_table.def_vis(def_id) == DefVis::Pub {
            return;
        }
        let mut cursor = Some(self.module);
        while let Some(module) = cursor {
            if module == owner {
                return;
            }
            cursor = self.def_table.module(module).parent;
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

    fn with_module_of(&mut self, node: NodeId, f: impl FnOnce(&mut Self)) {
        let def = self.def_table.def_of_node(node);
        let module = self.def_table.module_of_def(def);
        let saved = self.module;
        self.module = module;
        f(self);
        self.module = saved;
    }
}

impl<'a> AstVisitor for NameResolver<'a> {
    fn visit_item(&mut self, item: &Item) {
        match &item.kind {
            ItemKind::Func(func) | ItemKind::Init(func) => {
                let rib = self.generics_rib(&func.generics);
                self.with_rib(rib, |this| {
                    for param in &func.generics {
                        this.visit_generic_param(param);
                    }
                    // Signature types; parameter patterns are bound
                    // below, into the body rib.
                    for param in &func.sig.params {
                        if let Ok(ty) = &param.ty {
                            this.visit_ty(ty);
                        }
                        if let Some(default) = &param.default {
                            this.visit_anon_const(default);
                        }
                    }
                    if let jacy_ast::FuncRetTy::Some(ty) = &func.sig.ret_ty {
                        this.visit_ty(ty);
                    }
                    this.with_rib(Rib::default(), |this| {
                        for param in &func.sig.params {
                            if let Ok(pat) = &param.pat {
                                this.bind_pat(pat);
                            }
                        }
                        if let Some(body) = &func.body {
                            this.visit_body(body);
                        }
                    });
                });
            }
            ItemKind::Mod(mod_item) => {
                self.with_module_of(item.id, |this| {
                    for sub in mod_item.items.iter().flatten() {
                        this.visit_item(sub);
                    }
                });
            }
            ItemKind::Enum(enum_item) => {
                let rib = self.generics_rib(&enum_item.generics);
                self.with_rib(rib, |this| visit::walk_item(this, item));
            }
            ItemKind::Struct(struct_item) => {
                let rib = self.generics_rib(&struct_item.generics);
                self.with_rib(rib, |this| visit::walk_item(this, item));
            }
            ItemKind::TypeAlias(alias) => {
                let rib = self.generics_rib(&alias.generics);
                self.with_rib(rib, |this| visit::walk_item(this, item));
            }
            ItemKind::Trait(trait_item) => {
                let rib = self.generics_rib(&trait_item.generics);
                self.with_rib(rib, |this| {
                    this.with_module_of(item.id, |this| {
                        for param in &trait_item.generics {
                            this.visit_generic_param(param);
                        }
                        for member in trait_item.members.iter().flatten() {
                            this.visit_item(member);
                        }
                    });
                });
            }
            ItemKind::Impl(impl_item) => {
                let rib = self.generics_rib(&impl_item.generics);
                self.with_rib(rib, |this| {
                    for param in &impl_item.generics {
                        this.visit_generic_param(param);
                    }
                    if let Some(Ok(trait_path)) = &impl_item.trait_path {
                        this.resolve_path(Namespace::Type, trait_path);
                        visit::walk_path(this, trait_path);
                    }
                    if let Ok(ty) = &impl_item.ty {
                        this.visit_ty(ty);
                    }
                    this.with_module_of(item.id, |this| {
                        for member in impl_item.members.iter().flatten() {
                            this.visit_item(member);
                        }
                    });
                });
            }
            ItemKind::Use(_) => {
                // Handled by the importer.
            }
        }
    }

    fn visit_block(&mut self, block: &Block) {
        let block_module = self.def_table.opt_block_module(block.id);
        let saved = self.module;
        if let Some(module) = block_module {
            self.module = module;
        }
        self.with_rib(Rib::default(), |this| visit::walk_block(this, block));
        self.module = saved;
    }

    fn visit_stmt(&mut self, stmt: &Stmt) {
        match &stmt.kind {
            StmtKind::Let(let_stmt) => {
                // The initializer sees the scope before the binding.
                if let Some(Ok(value)) = &let_stmt.value {
                    self.visit_expr(value);
                }
                if let Some(Ok(ty)) = &let_stmt.ty {
                    self.visit_ty(ty);
                }
                if let Ok(pat) = &let_stmt.pat {
                    self.bind_pat(pat);
                }
            }
            _ => visit::walk_stmt(self, stmt),
        }
    }

    fn visit_expr(&mut self, expr: &Expr) {
        match &expr.kind {
            ExprKind::Path(path) => {
                self.resolve_path(Namespace::Value, path);
                visit::walk_path(self, path);
            }
            ExprKind::StructLit { path, fields } => {
                self.resolve_path(Namespace::Type, path);
                visit::walk_path(self, path);
                for field in fields {
                    self.visit_struct_expr_field(field);
                }
            }
            ExprKind::Lambda(lambda) => {
                self.with_rib(Rib::default(), |this| {
                    for param in &lambda.params {
                        if let Some(ty) = &param.ty {
                            this.visit_ty(ty);
                        }
                        if let Ok(pat) = &param.pat {
                            this.bind_pat(pat);
                        }
                    }
                    if let Ok(body) = &lambda.body {
                        this.visit_expr(body);
                    }
                });
            }
            ExprKind::For { pat, iter, body } => {
                if let Ok(iter) = iter {
                    self.visit_expr(iter);
                }
                self.with_rib(Rib::default(), |this| {
                    if let Ok(pat) = pat {
                        this.bind_pat(pat);
                    }
                    this.visit_block(body);
                });
            }
            ExprKind::Match { subject, arms } => {
                if let Ok(subject) = subject {
                    self.visit_expr(subject);
                }
                for arm in arms {
                    self.with_rib(Rib::default(), |this| {
                        if let Ok(pat) = &arm.pat {
                            this.bind_pat(pat);
                        }
                        if let Ok(body) = &arm.body {
                            this.visit_expr(body);
                        }
                    });
                }
            }
            _ => visit::walk_expr(self, expr),
        }
    }

    fn visit_pat(&mut self, pat: &Pat) {
        // Patterns reached outside of a binding context (defaults,
        // anon consts) still resolve their paths.
        match &pat.kind {
            PatKind::Path(path) => {
                self.resolve_path(Namespace::Value, path);
                visit::walk_path(self, path);
            }
            PatKind::Struct { path, fields, .. } => {
                self.resolve_path(Namespace::Type, path);
                visit::walk_path(self, path);
                for field in fields {
                    self.visit_struct_pat_field(field);
                }
            }
            _ => visit::walk_pat(self, pat),
        }
    }

    fn visit_ty(&mut self, ty: &Ty) {
        match &ty.kind {
            TyKind::Path(path) => {
                self.resolve_path(Namespace::Type, path);
                visit::walk_path(self, path);
            }
            _ => visit::walk_ty(self, ty),
        }
    }

    /// Shorthand struct-literal fields (`P { x }`) reference a value
    /// named like the field; lowering expands them to `x: x` and
    /// needs the reference resolved.
    fn visit_struct_expr_field(&mut self, field: &jacy_ast::StructExprField) {
        match &field.kind {
            jacy_ast::StructExprFieldKind::Shorthand(name) => {
                let res = self.lookup_unqualified(Namespace::Value, name.sym);
                if res == Res::Err {
                    let other = Namespace::each()
                        .into_iter()
                        .filter(|other| *other != Namespace::Value)
                        .find(|other| self.lookup_unqualified(*other, name.sym) != Res::Err);
                    self.report_unresolved(Namespace::Value, name.sym, name.span, other);
                }
                self.res.set(name.id, res);
            }
            _ => visit::walk_struct_expr_field(self, field),
        }
    }

    fn visit_generic_arg(&mut self, arg: &GenericArg) {
        match arg {
            GenericArg::Lifetime(name) => {
                let res = self.lookup_unqualified(Namespace::Lifetime, name.sym);
                if res == Res::Err {
                    let text = self
                        .interner
                        .resolve_owned(name.sym)
                        .unwrap_or_else(|| "<?>".into());
                    MessageBuilder::error()
                        .text(format!("cannot resolve lifetime `'{text}`"))
                        .primary(name.span, "undeclared lifetime")
                        .emit(&mut self.msg);
                }
                self.res.set(name.id, res);
            }
            _ => visit::walk_generic_arg(self, arg),
        }
    }
}
