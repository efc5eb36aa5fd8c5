//! Canonical pretty-printing.
//!
//! Produces source that parses back into a structurally equal tree
//! (modulo spans and node ids). Used by `print=ast` dumps and the
//! re-parse round-trip checks. Parentheses are emitted only where the
//! precedence of a child demands them, so no spurious `Paren` nodes
//! appear on re-parse.

use jacy_span::Interner;

use crate::expr::{
    Block, Expr, ExprKind, Lambda, MatchArm, StructExprField, StructExprFieldKind,
};
use crate::fragments::{
    AnonConst, Attr, Body, FuncParam, FuncRetTy, FuncSig, GenericArg, GenericParam,
    GenericParamKind, Ident, Path, SimplePath, Vis,
};
use crate::item::{
    Item, ItemKind, StructField, TupleTyEl, UseTree, UseTreeKind, Variant, VariantBody,
};
use crate::lit::{FloatKind, IntKind, LitValue};
use crate::node_id::PR;
use crate::party::Party;
use crate::pat::{Pat, PatKind, StructPatField};
use crate::stmt::{Stmt, StmtKind};
use crate::ty::{Ty, TyKind};

/// Precedence context for expression printing.
const PREC_BOTTOM: u8 = 0;
const PREC_ASSIGN: u8 = 1;
const PREC_PREFIX: u8 = 12;
const PREC_POSTFIX: u8 = 13;

pub struct Printer<'a> {
    interner: &'a Interner,
    out: String,
    indent: usize,
}

impl<'a> Printer<'a> {
    pub fn new(interner: &'a Interner) -> Self {
        Self {
            interner,
            out: String::new(),
            indent: 0,
        }
    }

    pub fn finish(self) -> String {
        self.out
    }

    /// Print a whole party.
    pub fn party(mut self, party: &Party) -> String {
        for item in party.items() {
            self.print_item_pr(item);
        }
        self.finish()
    }

    /// Print a single expression (test helper and dump entry point).
    pub fn expr_to_string(mut self, expr: &Expr) -> String {
        self.print_expr(expr, PREC_BOTTOM);
        self.finish()
    }

    // Low-level output //

    fn word(&mut self, text: &str) {
        self.out.push_str(text);
    }

    fn sym(&mut self, sym: jacy_span::Symbol) {
        let text = self
            .interner
            .resolve_owned(sym)
            .unwrap_or_else(|| "<unresolved>".into());
        self.out.push_str(&text);
    }

    fn nl(&mut self) {
        self.out.push('\n');
        for _ in 0..self.indent {
            self.out.push_str("    ");
        }
    }

    fn open_brace(&mut self) {
        self.word("{");
        self.indent += 1;
    }

    fn close_brace(&mut self) {
        self.indent -= 1;
        self.nl();
        self.word("}");
    }

    fn ident(&mut self, ident: &Ident) {
        self.sym(ident.sym);
    }

    fn sep_list<T>(&mut self, items: &[T], sep: &str, mut f: impl FnMut(&mut Self, &T)) {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.word(sep);
            }
            f(self, item);
        }
    }

    fn err_marker(&mut self) {
        self.word("<parse-error>");
    }

    // Fragments //

    fn print_path(&mut self, path: &Path, turbofish: bool) {
        if path.global {
            self.word("::");
        }
        for (i, seg) in path.segs.iter().enumerate() {
            if i > 0 {
                self.word("::");
            }
            self.ident(&seg.ident);
            if let Some(args) = &seg.generics {
                if turbofish {
                    self.word("::");
                }
                self.word("<");
                self.sep_list(args, ", ", |p, arg| p.print_generic_arg(arg));
                self.word(">");
            }
        }
    }

    fn print_simple_path(&mut self, path: &SimplePath) {
        if path.global {
            self.word("::");
        }
        for (i, seg) in path.segs.iter().enumerate() {
            if i > 0 {
                self.word("::");
            }
            self.ident(&seg.ident);
        }
    }

    fn print_generic_arg(&mut self, arg: &GenericArg) {
        match arg {
            GenericArg::Type(ty) => self.print_ty(ty),
            GenericArg::Lifetime(name) => {
                self.word("'");
                self.ident(name);
            }
            GenericArg::Const(value) => self.print_anon_const(value),
        }
    }

    fn print_generics(&mut self, generics: &[GenericParam]) {
        if generics.is_empty() {
            return;
        }
        self.word("<");
        self.sep_list(generics, ", ", |p, param| match &param.kind {
            GenericParamKind::Lifetime { name } => {
                p.word("'");
                p.ident(name);
            }
            GenericParamKind::Type { name, bound } => {
                p.ident(name);
                if let Some(bound) = bound {
                    p.word(": ");
                    p.print_ty(bound);
                }
            }
            GenericParamKind::Const { name, ty, default } => {
                p.word("const ");
                p.ident(name);
                p.word(": ");
                p.print_ty(ty);
                if let Some(default) = default {
                    p.word(" = ");
                    p.print_anon_const(default);
                }
            }
        });
        self.word(">");
    }

    fn print_anon_const(&mut self, value: &AnonConst) {
        self.print_expr(&value.expr, PREC_BOTTOM);
    }

    fn print_vis(&mut self, vis: &Vis) {
        if vis.is_pub() {
            self.word("pub ");
        }
    }

    fn print_attr(&mut self, attr: &Attr) {
        self.word("@");
        self.print_simple_path(&attr.name);
        self.nl();
    }

    // Items //

    fn print_item_pr(&mut self, item: &PR<Item>) {
        self.nl();
        match item {
            Ok(item) => self.print_item(item),
            Err(_) => self.err_marker(),
        }
    }

    pub fn print_item(&mut self, item: &Item) {
        for attr in &item.attrs {
            self.print_attr(attr);
        }
        self.print_vis(&item.vis);
        match &item.kind {
            ItemKind::Enum(item) => {
                self.word("enum ");
                self.ident(&item.name);
                self.print_generics(&item.generics);
                self.word(" ");
                self.open_brace();
                for variant in &item.variants {
                    self.nl();
                    match variant {
                        Ok(variant) => self.print_variant(variant),
                        Err(_) => self.err_marker(),
                    }
                    self.word(",");
                }
                self.close_brace();
            }
            ItemKind::Struct(item) => {
                self.word("struct ");
                self.ident(&item.name);
                self.print_generics(&item.generics);
                self.word(" ");
                self.open_brace();
                for field in &item.fields {
                    self.nl();
                    self.print_struct_field(field);
                    self.word(",");
                }
                self.close_brace();
            }
            ItemKind::Trait(item) => {
                self.word("trait ");
                self.ident(&item.name);
                self.print_generics(&item.generics);
                self.word(" ");
                self.open_brace();
                for member in &item.members {
                    self.print_item_pr(member);
                }
                self.close_brace();
            }
            ItemKind::Impl(item) => {
                self.word("impl");
                self.print_generics(&item.generics);
                self.word(" ");
                if let Some(trait_path) = &item.trait_path {
                    match trait_path {
                        Ok(path) => self.print_path(path, false),
                        Err(_) => self.err_marker(),
                    }
                    self.word(" for ");
                }
                self.print_ty_pr(&item.ty);
                self.word(" ");
                self.open_brace();
                for member in &item.members {
                    self.print_item_pr(member);
                }
                self.close_brace();
            }
            ItemKind::Func(func) => {
                self.word("fn ");
                self.ident(&func.name);
                self.print_func_rest(func);
            }
            ItemKind::Init(func) => {
                self.word("init");
                self.print_func_rest(func);
            }
            ItemKind::Mod(item) => {
                self.word("mod ");
                self.ident(&item.name);
                self.word(" ");
                self.open_brace();
                for sub in &item.items {
                    self.print_item_pr(sub);
                }
                self.close_brace();
            }
            ItemKind::TypeAlias(item) => {
                self.word("type ");
                self.ident(&item.name);
                self.print_generics(&item.generics);
                if let Some(ty) = &item.ty {
                    self.word(" = ");
                    self.print_ty_pr(ty);
                }
                self.word(";");
            }
            ItemKind::Use(item) => {
                self.word("use ");
                match &item.use_tree {
                    Ok(tree) => self.print_use_tree(tree),
                    Err(_) => self.err_marker(),
                }
                self.word(";");
            }
        }
    }

    fn print_func_rest(&mut self, func: &crate::item::FuncItem) {
        self.print_generics(&func.generics);
        self.print_sig(&func.sig);
        match &func.body {
            None => self.word(";"),
            Some(body) => self.print_body(body),
        }
    }

    fn print_sig(&mut self, sig: &FuncSig) {
        self.word("(");
        self.sep_list(&sig.params, ", ", |p, param| p.print_func_param(param));
        self.word(")");
        if let FuncRetTy::Some(ty) = &sig.ret_ty {
            self.word(" -> ");
            self.print_ty(ty);
        }
    }

    fn print_func_param(&mut self, param: &FuncParam) {
        if let Some(label) = &param.label {
            self.ident(label);
            self.word(" ");
        }
        self.print_pat_pr(&param.pat);
        self.word(": ");
        self.print_ty_pr(&param.ty);
        if let Some(default) = &param.default {
            self.word(" = ");
            self.print_anon_const(default);
        }
    }

    fn print_body(&mut self, body: &Body) {
        match &body.value {
            Ok(value) if body.expr_body => {
                self.word(" = ");
                self.print_expr(value, PREC_BOTTOM);
                self.word(";");
            }
            Ok(value) => {
                self.word(" ");
                self.print_expr(value, PREC_BOTTOM);
            }
            Err(_) => {
                self.word(" ");
                self.err_marker();
            }
        }
    }

    fn print_variant(&mut self, variant: &Variant) {
        self.ident(&variant.name);
        match &variant.body {
            VariantBody::Unit(None) => {}
            VariantBody::Unit(Some(discriminant)) => {
                self.word(" = ");
                self.print_anon_const(discriminant);
            }
            VariantBody::Tuple(els) => {
                self.word("(");
                self.sep_list(els, ", ", |p, el| p.print_tuple_ty_el(el));
                self.word(")");
            }
            VariantBody::Struct(fields) => {
                self.word(" ");
                self.open_brace();
                for field in fields {
                    self.nl();
                    self.print_struct_field(field);
                    self.word(",");
                }
                self.close_brace();
            }
        }
    }

    fn print_struct_field(&mut self, field: &StructField) {
        self.print_vis(&field.vis);
        self.ident(&field.name);
        self.word(": ");
        self.print_ty_pr(&field.ty);
    }

    fn print_tuple_ty_el(&mut self, el: &TupleTyEl) {
        if let Some(name) = &el.name {
            self.ident(name);
            self.word(": ");
        }
        self.print_ty_pr(&el.ty);
    }

    fn print_use_tree(&mut self, tree: &UseTree) {
        match &tree.kind {
            UseTreeKind::Raw(path) => self.print_simple_path(path),
            UseTreeKind::All(path) => {
                if let Some(path) = path {
                    self.print_simple_path(path);
                    self.word("::");
                }
                self.word("*");
            }
            UseTreeKind::Specific(path, trees) => {
                if let Some(path) = path {
                    self.print_simple_path(path);
                    self.word("::");
                }
                self.word("{");
                self.sep_list(trees, ", ", |p, sub| match sub {
                    Ok(sub) => p.print_use_tree(sub),
                    Err(_) => p.err_marker(),
                });
                self.word("}");
            }
            UseTreeKind::Rebind(path, alias) => {
                self.print_simple_path(path);
                self.word(" as ");
                self.ident(alias);
            }
        }
    }

    // Statements //

    fn print_stmt(&mut self, stmt: &Stmt) {
        match &stmt.kind {
            StmtKind::Let(let_stmt) => {
                self.word("let ");
                self.print_pat_pr2(&let_stmt.pat);
                if let Some(ty) = &let_stmt.ty {
                    self.word(": ");
                    self.print_ty_pr(ty);
                }
                if let Some(value) = &let_stmt.value {
                    self.word(" = ");
                    self.print_expr_pr(value, PREC_BOTTOM);
                }
                self.word(";");
            }
            StmtKind::Expr(expr) => {
                self.print_expr_pr(expr, PREC_BOTTOM);
                self.word(";");
            }
            StmtKind::Item(item) => match item {
                Ok(item) => self.print_item(item),
                Err(_) => self.err_marker(),
            },
        }
    }

    // Expressions //

    fn print_expr_pr(&mut self, expr: &PR<crate::P<Expr>>, prec: u8) {
        match expr {
            Ok(expr) => self.print_expr(expr, prec),
            Err(_) => self.err_marker(),
        }
    }

    /// Print an expression, parenthesizing when its own binding power
    /// is below the context's.
    fn print_expr(&mut self, expr: &Expr, prec: u8) {
        let own = expr_precedence(expr);
        let needs_parens = own < prec;
        if needs_parens {
            self.word("(");
        }
        self.print_expr_inner(expr);
        if needs_parens {
            self.word(")");
        }
    }

    fn print_expr_inner(&mut self, expr: &Expr) {
        match &expr.kind {
            ExprKind::Lit(lit) => self.print_lit(lit),
            ExprKind::Path(path) => self.print_path(path, true),
            ExprKind::Prefix { op, rhs } => {
                self.word(&op.to_string());
                if *op == crate::expr::PrefixOp::Not {
                    self.word(" ");
                }
                self.print_expr_pr(rhs, PREC_PREFIX);
            }
            ExprKind::Borrow { mutable, rhs } => {
                self.word("&");
                if *mutable {
                    self.word("mut ");
                }
                self.print_expr_pr(rhs, PREC_PREFIX);
            }
            ExprKind::Deref { rhs } => {
                self.word("*");
                self.print_expr_pr(rhs, PREC_PREFIX);
            }
            ExprKind::Infix { lhs, op, rhs } => {
                let prec = op.precedence();
                // Left-associative: the right child needs one more
                // level of binding to avoid re-grouping.
                self.print_expr_pr(lhs, prec);
                self.word(" ");
                self.word(&op.to_string());
                self.word(" ");
                self.print_expr_pr(rhs, prec + 1);
            }
            ExprKind::Assign { lhs, op, rhs } => {
                // Right-associative, mirrored.
                self.print_expr_pr(lhs, PREC_ASSIGN + 1);
                self.word(" ");
                self.word(&op.to_string());
                self.word(" ");
                self.print_expr_pr(rhs, PREC_ASSIGN);
            }
            ExprKind::Cast { lhs, ty } => {
                self.print_expr_pr(lhs, 11);
                self.word(" as ");
                self.print_ty_pr(ty);
            }
            ExprKind::Block(block) => self.print_block(block),
            ExprKind::If {
                cond,
                then_block,
                else_expr,
            } => {
                self.word("if ");
                self.print_expr_pr(cond, PREC_BOTTOM);
                self.word(" ");
                match then_block {
                    Ok(block) => self.print_block(block),
                    Err(_) => self.err_marker(),
                }
                if let Some(else_expr) = else_expr {
                    self.word(" else ");
                    self.print_expr(else_expr, PREC_BOTTOM);
                }
            }
            ExprKind::Loop { body } => {
                self.word("loop ");
                self.print_block(body);
            }
            ExprKind::While { cond, body } => {
                self.word("while ");
                self.print_expr_pr(cond, PREC_BOTTOM);
                self.word(" ");
                self.print_block(body);
            }
            ExprKind::For { pat, iter, body } => {
                self.word("for ");
                self.print_pat_pr2(pat);
                self.word(" in ");
                self.print_expr_pr(iter, PREC_BOTTOM);
                self.word(" ");
                self.print_block(body);
            }
            ExprKind::Match { subject, arms } => {
                self.word("match ");
                self.print_expr_pr(subject, PREC_BOTTOM);
                self.word(" ");
                self.open_brace();
                for arm in arms {
                    self.nl();
                    self.print_match_arm(arm);
                    self.word(",");
                }
                self.close_brace();
            }
            ExprKind::Lambda(Lambda { params, body }) => {
                self.word("|");
                self.sep_list(params, ", ", |p, param| {
                    p.print_pat_pr2(&param.pat);
                    if let Some(ty) = &param.ty {
                        p.word(": ");
                        p.print_ty(ty);
                    }
                });
                self.word("| ");
                self.print_expr_pr(body, PREC_BOTTOM);
            }
            ExprKind::Invoke { callee, args } => {
                self.print_expr_pr(callee, PREC_POSTFIX);
                self.word("(");
                self.sep_list(args, ", ", |p, arg| match arg {
                    Ok(arg) => p.print_expr(arg, PREC_BOTTOM),
                    Err(_) => p.err_marker(),
                });
                self.word(")");
            }
            ExprKind::Tuple { els } => {
                self.word("(");
                self.sep_list(els, ", ", |p, el| match el {
                    Ok(el) => p.print_expr(el, PREC_BOTTOM),
                    Err(_) => p.err_marker(),
                });
                if els.len() == 1 {
                    self.word(",");
                }
                self.word(")");
            }
            ExprKind::StructLit { path, fields } => {
                self.print_path(path, true);
                self.word(" { ");
                self.sep_list(fields, ", ", |p, field| p.print_struct_expr_field(field));
                self.word(" }");
            }
            ExprKind::Field { lhs, field } => {
                self.print_expr_pr(lhs, PREC_POSTFIX);
                self.word(".");
                self.ident(field);
            }
            ExprKind::Subscript { lhs, index } => {
                self.print_expr_pr(lhs, PREC_POSTFIX);
                self.word("[");
                self.print_expr_pr(index, PREC_BOTTOM);
                self.word("]");
            }
            ExprKind::Quest { lhs } => {
                self.print_expr_pr(lhs, PREC_POSTFIX);
                self.word("?");
            }
            ExprKind::Paren(inner) => {
                self.word("(");
                self.print_expr_pr(inner, PREC_BOTTOM);
                self.word(")");
            }
            ExprKind::Unit => self.word("()"),
            ExprKind::SelfExpr => self.word("self"),
            ExprKind::Break { value } => {
                self.word("break");
                if let Some(value) = value {
                    self.word(" ");
                    self.print_expr_pr(value, PREC_BOTTOM);
                }
            }
            ExprKind::Continue => self.word("continue"),
            ExprKind::Return { value } => {
                self.word("return");
                if let Some(value) = value {
                    self.word(" ");
                    self.print_expr_pr(value, PREC_BOTTOM);
                }
            }
            ExprKind::Spread { rhs } => {
                self.word("..");
                self.print_expr_pr(rhs, PREC_PREFIX);
            }
        }
    }

    fn print_lit(&mut self, lit: &LitValue) {
        match lit {
            LitValue::Bool(true) => self.word("true"),
            LitValue::Bool(false) => self.word("false"),
            LitValue::Int { val, kind } => {
                self.word(&val.to_string());
                self.word(int_suffix(*kind));
            }
            LitValue::Float { sym, kind } => {
                self.sym(*sym);
                self.word(match kind {
                    FloatKind::Unset => "",
                    FloatKind::F32 => "f32",
                    FloatKind::F64 => "f64",
                });
            }
            LitValue::Str { sym } => {
                self.word("\"");
                let text = self.interner.resolve_owned(*sym).unwrap_or_default();
                for c in text.chars() {
                    match c {
                        '\\' => self.word("\\\\"),
                        '"' => self.word("\\\""),
                        '\n' => self.word("\\n"),
                        '\r' => self.word("\\r"),
                        '\t' => self.word("\\t"),
                        '\0' => self.word("\\0"),
                        c => self.out.push(c),
                    }
                }
                self.word("\"");
            }
        }
    }

    fn print_block(&mut self, block: &Block) {
        self.open_brace();
        for stmt in &block.stmts {
            self.nl();
            match stmt {
                Ok(stmt) => self.print_stmt(stmt),
                Err(_) => self.err_marker(),
            }
        }
        self.close_brace();
    }

    fn print_match_arm(&mut self, arm: &MatchArm) {
        self.print_pat_pr2(&arm.pat);
        self.word(" => ");
        self.print_expr_pr(&arm.body, PREC_BOTTOM);
    }

    fn print_struct_expr_field(&mut self, field: &StructExprField) {
        match &field.kind {
            StructExprFieldKind::Full(name, value) => {
                self.ident(name);
                self.word(": ");
                self.print_expr_pr(value, PREC_BOTTOM);
            }
            StructExprFieldKind::Shorthand(name) => self.ident(name),
            StructExprFieldKind::Spread(value) => {
                self.word("..");
                self.print_expr_pr(value, PREC_BOTTOM);
            }
        }
    }

    // Patterns //

    fn print_pat_pr(&mut self, pat: &PR<Pat>) {
        match pat {
            Ok(pat) => self.print_pat(pat),
            Err(_) => self.err_marker(),
        }
    }

    fn print_pat_pr2(&mut self, pat: &PR<crate::P<Pat>>) {
        match pat {
            Ok(pat) => self.print_pat(pat),
            Err(_) => self.err_marker(),
        }
    }

    pub fn print_pat(&mut self, pat: &Pat) {
        match &pat.kind {
            PatKind::Wildcard => self.word("_"),
            PatKind::Lit(lit) => self.print_lit(lit),
            PatKind::Ident {
                reference,
                mutable,
                name,
                sub,
            } => {
                if *reference {
                    self.word("ref ");
                }
                if *mutable {
                    self.word("mut ");
                }
                self.ident(name);
                if let Some(sub) = sub {
                    self.word(" @ ");
                    self.print_pat_pr2(sub);
                }
            }
            PatKind::Ref { mutable, pat } => {
                self.word("&");
                if *mutable {
                    self.word("mut ");
                }
                self.print_pat_pr2(pat);
            }
            PatKind::Path(path) => self.print_path(path, true),
            PatKind::Struct { path, fields, rest } => {
                self.print_path(path, true);
                self.word(" { ");
                self.sep_list(fields, ", ", |p, field| p.print_struct_pat_field(field));
                if *rest {
                    if !fields.is_empty() {
                        self.word(", ");
                    }
                    self.word("..");
                }
                self.word(" }");
            }
            PatKind::Tuple { els, rest_pat_index } => {
                self.word("(");
                for (i, el) in els.iter().enumerate() {
                    if i > 0 {
                        self.word(", ");
                    }
                    if Some(i) == *rest_pat_index {
                        self.word("..");
                    } else {
                        match el {
                            Ok(el) => self.print_pat(el),
                            Err(_) => self.err_marker(),
                        }
                    }
                }
                self.word(")");
            }
            PatKind::Slice {
                before,
                rest,
                after,
            } => {
                self.word("[");
                let mut first = true;
                for el in before {
                    if !first {
                        self.word(", ");
                    }
                    first = false;
                    match el {
                        Ok(el) => self.print_pat(el),
                        Err(_) => self.err_marker(),
                    }
                }
                if rest.is_some() {
                    if !first {
                        self.word(", ");
                    }
                    first = false;
                    self.word("..");
                }
                for el in after {
                    if !first {
                        self.word(", ");
                    }
                    first = false;
                    match el {
                        Ok(el) => self.print_pat(el),
                        Err(_) => self.err_marker(),
                    }
                }
                self.word("]");
            }
            PatKind::Multi(els) => {
                self.sep_list(els, " | ", |p, el| match el {
                    Ok(el) => p.print_pat(el),
                    Err(_) => p.err_marker(),
                });
            }
        }
    }

    fn print_struct_pat_field(&mut self, field: &StructPatField) {
        self.ident(&field.name);
        if let Some(pat) = &field.pat {
            self.word(": ");
            self.print_pat_pr2(pat);
        }
    }

    // Types //

    fn print_ty_pr(&mut self, ty: &PR<crate::P<Ty>>) {
        match ty {
            Ok(ty) => self.print_ty(ty),
            Err(_) => self.err_marker(),
        }
    }

    pub fn print_ty(&mut self, ty: &Ty) {
        match &ty.kind {
            TyKind::Unit => self.word("()"),
            TyKind::Paren(inner) => {
                self.word("(");
                self.print_ty_pr(inner);
                self.word(")");
            }
            TyKind::Tuple(els) => {
                self.word("(");
                self.sep_list(els, ", ", |p, el| match el {
                    Ok(el) => p.print_ty(el),
                    Err(_) => p.err_marker(),
                });
                self.word(")");
            }
            TyKind::Func { params, ret } => {
                self.word("(");
                self.sep_list(params, ", ", |p, el| match el {
                    Ok(el) => p.print_ty(el),
                    Err(_) => p.err_marker(),
                });
                self.word(") -> ");
                self.print_ty_pr(ret);
            }
            TyKind::Slice(inner) => {
                self.word("[");
                self.print_ty_pr(inner);
                self.word("]");
            }
            TyKind::Array { ty, size } => {
                self.word("[");
                self.print_ty_pr(ty);
                self.word("; ");
                self.print_anon_const(size);
                self.word("]");
            }
            TyKind::Path(path) => self.print_path(path, false),
        }
    }
}

fn expr_precedence(expr: &Expr) -> u8 {
    match &expr.kind {
        ExprKind::Assign { .. } => PREC_ASSIGN,
        ExprKind::Infix { op, .. } => op.precedence(),
        ExprKind::Cast { .. } => 11,
        ExprKind::Prefix { .. }
        | ExprKind::Borrow { .. }
        | ExprKind::Deref { .. }
        | ExprKind::Spread { .. } => PREC_PREFIX,
        ExprKind::Field { .. }
        | ExprKind::Subscript { .. }
        | ExprKind::Invoke { .. }
        | ExprKind::Quest { .. } => PREC_POSTFIX,
        // Control-flow and break/return bind loosely.
        ExprKind::Break { .. } | ExprKind::Return { .. } | ExprKind::Lambda(_) => PREC_ASSIGN,
        _ => u8::MAX,
    }
}

fn int_suffix(kind: IntKind) -> &'static str {
    match kind {
        IntKind::Unset => "",
        IntKind::I8 => "i8",
        IntKind::I16 => "i16",
        IntKind::I32 => "i32",
        IntKind::I64 => "i64",
        IntKind::Int => "int",
        IntKind::U8 => "u8",
        IntKind::U16 => "u16",
        IntKind::U32 => "u32",
        IntKind::U64 => "u64",
        IntKind::Uint => "uint",
    }
}
