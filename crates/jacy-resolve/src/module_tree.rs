//! Pre-resolution pass: definitions and the module tree.
//!
//! Walks parsed items top-down. Every name-introducing item gets a
//! [`DefId`], its binding goes into the enclosing module's namespace
//! map, and module-like items (`mod`, `trait`, `impl`, `enum`, blocks
//! holding items) get their own [`Module`] linked to the parent.

use jacy_ast::visit::{self, AstVisitor};
use jacy_ast::{
    Block, FuncItem, GenericParam, GenericParamKind, Item, ItemKind, Party, StmtKind, Variant,
    VariantBody, Vis,
};
use jacy_message::{MessageBuilder, MessageHolder, MessageResult};
use jacy_span::{Interner, Kw, Span, Symbol};

use crate::def::{DefId, DefKind, DefVis, Namespace};
use crate::def_table::DefTable;
use crate::module::{ModuleId, ModuleKind, NameBinding};

pub struct ModuleTreeBuilder<'a> {
    interner: &'a Interner,
    def_table: DefTable,
    current: ModuleId,
    msg: MessageHolder,
}

impl<'a> ModuleTreeBuilder<'a> {
    pub fn new(interner: &'a Interner) -> Self {
        Self {
            interner,
            def_table: DefTable::new(),
            current: ModuleId::ROOT,
            msg: MessageHolder::new(),
        }
    }

    /// Build definitions and the module tree for a whole party.
    pub fn build(mut self, party: &Party) -> MessageResult<DefTable> {
        // The crate root is always def 0 / module 0.
        let root_def = self.def_table.define(
            DefVis::Pub,
            jacy_ast::NodeId::ROOT,
            DefKind::Mod,
            jacy_span::Ident::new(self.interner.kw(Kw::Party), Span::DUMMY),
        );
        debug_assert_eq!(root_def, DefId::ROOT);
        self.def_table.define_builtin_types(self.interner);
        self.current = self.def_table.add_root_module();
        self.visit_party(party);
        self.msg.result(self.def_table)
    }

    fn span_ident(ident: &jacy_ast::Ident) -> jacy_span::Ident {
        jacy_span::Ident::new(ident.sym, ident.span)
    }

    fn vis_of(vis: &Vis) -> DefVis {
        if vis.is_pub() {
            DefVis::Pub
        } else {
            DefVis::Unset
        }
    }

    /// Insert a binding into the current module, reporting a
    /// redefinition and leaving the module untouched on clash.
    fn bind(&mut self, ns: Namespace, sym: Symbol, binding: NameBinding, span: Span) -> bool {
        if let Some(existing) = self.def_table.module(self.current).binding(ns, sym) {
            self.report_redefinition(sym, span, existing);
            return false;
        }
        self.def_table
            .module_mut(self.current)
            .ns
            .get_mut(ns)
            .insert(sym, binding);
        true
    }

    fn report_redefinition(&mut self, sym: Symbol, span: Span, existing: NameBinding) {
        let name = self
            .interner
            .resolve_owned(sym)
            .unwrap_or_else(|| "<?>".into());
        let prev_span = match existing {
            NameBinding::Def(def_id) => self.def_table.def_name_span(def_id),
            NameBinding::FuncOverload(overload_id) => self
                .def_table
                .def_name_span(self.def_table.func_overload_first_def(overload_id)),
        };
        MessageBuilder::error()
            .text(format!("`{name}` has been already declared in this scope"))
            .primary(span, "redeclared here")
            .aux(prev_span, "previous declaration")
            .emit(&mut self.msg);
    }

    /// Create a module for a def, register it as a named child of the
    /// current module and run `f` inside it.
    fn enter_def_module(&mut self, def_id: DefId, name: Option<Symbol>, f: impl FnOnce(&mut Self)) {
        let module = self.def_table.add_module(self.current, ModuleKind::Def(def_id));
        if let Some(sym) = name {
            self.def_table
                .module_mut(self.current)
                .children
                .entry(sym)
                .or_insert(module);
        }
        let parent = self.current;
        self.current = module;
        f(self);
        self.current = parent;
    }

    fn define_generics(&mut self, generics: &[GenericParam]) {
        for param in generics {
            let (kind, name) = match &param.kind {
                GenericParamKind::Type { name, .. } => (DefKind::TypeParam, name),
                GenericParamKind::Lifetime { name } => (DefKind::Lifetime, name),
                GenericParamKind::Const { name, .. } => (DefKind::ConstParam, name),
            };
            self.def_table
                .define(DefVis::Unset, param.id, kind, Self::span_ident(name));
        }
    }

    /// Overload suffix of a function: its labeled parameters joined
    /// as `label:` runs. Empty when no parameter carries a label.
    fn func_suffix(&self, func: &FuncItem) -> Option<Symbol> {
        let mut suffix = String::new();
        for param in &func.sig.params {
            if let Some(label) = &param.label {
                self.interner.with_resolved(label.sym, |text| {
                    suffix.push_str(text);
                    suffix.push(':');
                });
            }
        }
        if suffix.is_empty() {
            None
        } else {
            Some(self.interner.intern(suffix))
        }
    }

    fn define_func(&mut self, item: &Item, func: &FuncItem, kind: DefKind) {
        let vis = Self::vis_of(&item.vis);
        let def_id = self
            .def_table
            .define(vis, item.id, kind, Self::span_ident(&func.name));
        let sym = func.name.sym;

        match self.func_suffix(func) {
            None => {
                self.bind(Namespace::Value, sym, NameBinding::Def(def_id), func.name.span);
            }
            Some(suffix) => {
                // Labeled functions join (or open) the overload group
                // registered under the base name.
                match self.def_table.module(self.current).binding(Namespace::Value, sym) {
                    None => {
                        let overload_id = self
                            .def_table
                            .new_func_overload_group(Self::span_ident(&func.name));
                        self.def_table.define_func_overload(def_id, overload_id, suffix);
                        self.bind(
                            Namespace::Value,
                            sym,
                            NameBinding::FuncOverload(overload_id),
                            func.name.span,
                        );
                    }
                    Some(NameBinding::FuncOverload(overload_id)) => {
                        if self.def_table.func_overload(overload_id).contains_key(&suffix) {
                            self.report_redefinition(
                                sym,
                                func.name.span,
                                NameBinding::FuncOverload(overload_id),
                            );
                        } else {
                            self.def_table
                                .define_func_overload(def_id, overload_id, suffix);
                        }
                    }
                    Some(existing) => {
                        self.report_redefinition(sym, func.name.span, existing);
                    }
                }
            }
        }

        self.define_generics(&func.generics);
    }

    fn define_variant(&mut self, variant: &Variant) {
        let def_id = self.def_table.define(
            DefVis::Pub,
            variant.id,
            DefKind::Variant,
            Self::span_ident(&variant.name),
        );
        self.bind(
            Namespace::Value,
            variant.name.sym,
            NameBinding::Def(def_id),
            variant.name.span,
        );
        if let VariantBody::Struct(fields) = &variant.body {
            for field in fields {
                self.def_table.define(
                    DefVis::Pub,
                    field.id,
                    DefKind::Field,
                    Self::span_ident(&field.name),
                );
            }
        }
    }
}

impl<'a> AstVisitor for ModuleTreeBuilder<'a> {
    fn visit_item(&mut self, item: &Item) {
        let vis = Self::vis_of(&item.vis);
        match &item.kind {
            ItemKind::Enum(enum_item) => {
                let def_id = self.def_table.define(
                    vis,
                    item.id,
                    DefKind::Enum,
                    Self::span_ident(&enum_item.name),
                );
                self.bind(
                    Namespace::Type,
                    enum_item.name.sym,
                    NameBinding::Def(def_id),
                    enum_item.name.span,
                );
                self.define_generics(&enum_item.generics);
                self.enter_def_module(def_id, Some(enum_item.name.sym), |this| {
                    for variant in enum_item.variants.iter().flatten() {
                        this.define_variant(variant);
                    }
                });
            }
            ItemKind::Struct(struct_item) => {
                let def_id = self.def_table.define(
                    vis,
                    item.id,
                    DefKind::Struct,
                    Self::span_ident(&struct_item.name),
                );
                self.bind(
                    Namespace::Type,
                    struct_item.name.sym,
                    NameBinding::Def(def_id),
                    struct_item.name.span,
                );
                self.define_generics(&struct_item.generics);
                for field in &struct_item.fields {
                    self.def_table.define(
                        Self::vis_of(&field.vis),
                        field.id,
                        DefKind::Field,
                        Self::span_ident(&field.name),
                    );
                }
            }
            ItemKind::Trait(trait_item) => {
                let def_id = self.def_table.define(
                    vis,
                    item.id,
                    DefKind::Trait,
                    Self::span_ident(&trait_item.name),
                );
                self.bind(
                    Namespace::Type,
                    trait_item.name.sym,
                    NameBinding::Def(def_id),
                    trait_item.name.span,
                );
                self.define_generics(&trait_item.generics);
                self.enter_def_module(def_id, Some(trait_item.name.sym), |this| {
                    for member in trait_item.members.iter().flatten() {
                        this.visit_item(member);
                    }
                });
            }
            ItemKind::Impl(impl_item) => {
                // Impls are anonymous; the def exists for identity and
                // the member module only.
                if let Vis::Pub(span) = item.vis {
                    MessageBuilder::error()
                        .text("visibility modifiers are not allowed on `impl` blocks")
                        .primary(span, "remove this `pub`")
                        .emit(&mut self.msg);
                }
                let def_id = self.def_table.define(
                    vis,
                    item.id,
                    DefKind::Impl,
                    jacy_span::Ident::new(self.interner.kw(Kw::Impl), item.span.from_start_to(4)),
                );
                self.define_generics(&impl_item.generics);
                self.enter_def_module(def_id, None, |this| {
                    for member in impl_item.members.iter().flatten() {
                        this.visit_item(member);
                    }
                });
            }
            ItemKind::Func(func) => {
                self.define_func(item, func, DefKind::Func);
                visit::walk_item(self, item);
            }
            ItemKind::Init(func) => {
                self.define_func(item, func, DefKind::Init);
                visit::walk_item(self, item);
            }
            ItemKind::Mod(mod_item) => {
                let def_id = self.def_table.define(
                    vis,
                    item.id,
                    DefKind::Mod,
                    Self::span_ident(&mod_item.name),
                );
                self.bind(
                    Namespace::Type,
                    mod_item.name.sym,
                    NameBinding::Def(def_id),
                    mod_item.name.span,
                );
                self.enter_def_module(def_id, Some(mod_item.name.sym), |this| {
                    for sub in mod_item.items.iter().flatten() {
                        this.visit_item(sub);
                    }
                });
            }
            ItemKind::TypeAlias(alias) => {
                let def_id = self.def_table.define(
                    vis,
                    item.id,
                    DefKind::TypeAlias,
                    Self::span_ident(&alias.name),
                );
                self.bind(
                    Namespace::Type,
                    alias.name.sym,
                    NameBinding::Def(def_id),
                    alias.name.span,
                );
                self.define_generics(&alias.generics);
            }
            ItemKind::Use(_) => {
                // Bindings appear when the importer resolves the tree;
                // until then only the declaring module is recorded.
                self.def_table.define(
                    vis,
                    item.id,
                    DefKind::Use,
                    jacy_span::Ident::new(self.interner.kw(Kw::Use), item.span.from_start_to(3)),
                );
                self.def_table.set_use_decl_module(item.id, self.current);
            }
        }
    }

    /// Blocks that hold items become modules keyed by the block's
    /// node id.
    fn visit_block(&mut self, block: &Block) {
        let has_items = block
            .stmts
            .iter()
            .flatten()
            .any(|stmt| matches!(stmt.kind, StmtKind::Item(_)));
        if !has_items {
            visit::walk_block(self, block);
            return;
        }
        let module = self
            .def_table
            .add_module(self.current, ModuleKind::Block(block.id));
        let parent = self.current;
        self.current = module;
        visit::walk_block(self, block);
        self.current = parent;
    }
}
