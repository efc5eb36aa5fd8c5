//! Generic AST traversal.
//!
//! [`AstVisitor`] dispatches on node kind; every method defaults to
//! walking the node's children via the `walk_*` drivers, so a pass
//! only overrides the cases it cares about. The drivers visit every
//! child of every node kind; passes that check tree-wide invariants
//! rely on that completeness.

use crate::expr::{Block, Expr, ExprKind, Lambda, MatchArm, StructExprField, StructExprFieldKind};
use crate::fragments::{
    AnonConst, Attr, Body, FuncParam, FuncRetTy, FuncSig, GenericArg, GenericParam,
    GenericParamKind, Ident, Path, PathSeg, SimplePath,
};
use crate::item::{
    Item, ItemKind, StructField, TupleTyEl, UseTree, UseTreeKind, Variant, VariantBody,
};
use crate::node_id::{ErrorNode, PR};
use crate::party::Party;
use crate::pat::{Pat, PatKind, StructPatField};
use crate::stmt::{Stmt, StmtKind};
use crate::ty::{Ty, TyKind};

pub trait AstVisitor: Sized {
    fn visit_party(&mut self, party: &Party) {
        walk_party(self, party);
    }

    fn visit_item(&mut self, item: &Item) {
        walk_item(self, item);
    }

    fn visit_stmt(&mut self, stmt: &Stmt) {
        walk_stmt(self, stmt);
    }

    fn visit_expr(&mut self, expr: &Expr) {
        walk_expr(self, expr);
    }

    fn visit_pat(&mut self, pat: &Pat) {
        walk_pat(self, pat);
    }

    fn visit_ty(&mut self, ty: &Ty) {
        walk_ty(self, ty);
    }

    fn visit_block(&mut self, block: &Block) {
        walk_block(self, block);
    }

    fn visit_path(&mut self, path: &Path) {
        walk_path(self, path);
    }

    fn visit_path_seg(&mut self, seg: &PathSeg) {
        walk_path_seg(self, seg);
    }

    fn visit_simple_path(&mut self, path: &SimplePath) {
        walk_simple_path(self, path);
    }

    fn visit_ident(&mut self, _ident: &Ident) {}

    fn visit_generic_param(&mut self, param: &GenericParam) {
        walk_generic_param(self, param);
    }

    fn visit_generic_arg(&mut self, arg: &GenericArg) {
        walk_generic_arg(self, arg);
    }

    fn visit_func_sig(&mut self, sig: &FuncSig) {
        walk_func_sig(self, sig);
    }

    fn visit_func_param(&mut self, param: &FuncParam) {
        walk_func_param(self, param);
    }

    fn visit_body(&mut self, body: &Body) {
        walk_body(self, body);
    }

    fn visit_anon_const(&mut self, value: &AnonConst) {
        walk_anon_const(self, value);
    }

    fn visit_attr(&mut self, attr: &Attr) {
        walk_attr(self, attr);
    }

    fn visit_use_tree(&mut self, tree: &UseTree) {
        walk_use_tree(self, tree);
    }

    fn visit_variant(&mut self, variant: &Variant) {
        walk_variant(self, variant);
    }

    fn visit_struct_field(&mut self, field: &StructField) {
        walk_struct_field(self, field);
    }

    fn visit_tuple_ty_el(&mut self, el: &TupleTyEl) {
        walk_tuple_ty_el(self, el);
    }

    fn visit_match_arm(&mut self, arm: &MatchArm) {
        walk_match_arm(self, arm);
    }

    fn visit_struct_expr_field(&mut self, field: &StructExprField) {
        walk_struct_expr_field(self, field);
    }

    fn visit_struct_pat_field(&mut self, field: &StructPatField) {
        walk_struct_pat_field(self, field);
    }

    /// Recovery markers are leaves; most passes ignore them.
    fn visit_err(&mut self, _error: &ErrorNode) {}
}

/// Visit a parse result: the node on success, the marker on failure.
pub fn visit_pr<V: AstVisitor, T>(visitor: &mut V, pr: &PR<T>, f: impl FnOnce(&mut V, &T)) {
    match pr {
        Ok(value) => f(visitor, value),
        Err(error) => visitor.visit_err(error),
    }
}

pub fn walk_party<V: AstVisitor>(visitor: &mut V, party: &Party) {
    for file in &party.files {
        for item in &file.items {
            visit_pr(visitor, item, |v, item| v.visit_item(item));
        }
    }
}

pub fn walk_item<V: AstVisitor>(visitor: &mut V, item: &Item) {
    for attr in &item.attrs {
        visitor.visit_attr(attr);
    }
    match &item.kind {
        ItemKind::Enum(item) => {
            visitor.visit_ident(&item.name);
            for param in &item.generics {
                visitor.visit_generic_param(param);
            }
            for variant in &item.variants {
                visit_pr(visitor, variant, |v, variant| v.visit_variant(variant));
            }
        }
        ItemKind::Struct(item) => {
            visitor.visit_ident(&item.name);
            for param in &item.generics {
                visitor.visit_generic_param(param);
            }
            for field in &item.fields {
                visitor.visit_struct_field(field);
            }
        }
        ItemKind::Trait(item) => {
            visitor.visit_ident(&item.name);
            for param in &item.generics {
                visitor.visit_generic_param(param);
            }
            for member in &item.members {
                visit_pr(visitor, member, |v, member| v.visit_item(member));
            }
        }
        ItemKind::Impl(item) => {
            for param in &item.generics {
                visitor.visit_generic_param(param);
            }
            if let Some(trait_path) = &item.trait_path {
                visit_pr(visitor, trait_path, |v, path| v.visit_path(path));
            }
            visit_pr(visitor, &item.ty, |v, ty| v.visit_ty(ty));
            for member in &item.members {
                visit_pr(visitor, member, |v, member| v.visit_item(member));
            }
        }
        ItemKind::Func(item) | ItemKind::Init(item) => {
            visitor.visit_ident(&item.name);
            for param in &item.generics {
                visitor.visit_generic_param(param);
            }
            visitor.visit_func_sig(&item.sig);
            if let Some(body) = &item.body {
                visitor.visit_body(body);
            }
        }
        ItemKind::Mod(item) => {
            visitor.visit_ident(&item.name);
            for sub in &item.items {
                visit_pr(visitor, sub, |v, sub| v.visit_item(sub));
            }
        }
        ItemKind::TypeAlias(item) => {
            visitor.visit_ident(&item.name);
            for param in &item.generics {
                visitor.visit_generic_param(param);
            }
            if let Some(ty) = &item.ty {
                visit_pr(visitor, ty, |v, ty| v.visit_ty(ty));
            }
        }
        ItemKind::Use(item) => {
            visit_pr(visitor, &item.use_tree, |v, tree| v.visit_use_tree(tree));
        }
    }
}

pub fn walk_stmt<V: AstVisitor>(visitor: &mut V, stmt: &Stmt) {
    match &stmt.kind {
        StmtKind::Let(let_stmt) => {
            visit_pr(visitor, &let_stmt.pat, |v, pat| v.visit_pat(pat));
            if let Some(ty) = &let_stmt.ty {
                visit_pr(visitor, ty, |v, ty| v.visit_ty(ty));
            }
            if let Some(value) = &let_stmt.value {
                visit_pr(visitor, value, |v, value| v.visit_expr(value));
            }
        }
        StmtKind::Expr(expr) => visit_pr(visitor, expr, |v, expr| v.visit_expr(expr)),
        StmtKind::Item(item) => visit_pr(visitor, item, |v, item| v.visit_item(item)),
    }
}

pub fn walk_expr<V: AstVisitor>(visitor: &mut V, expr: &Expr) {
    match &expr.kind {
        ExprKind::Lit(_) | ExprKind::Unit | ExprKind::SelfExpr | ExprKind::Continue => {}
        ExprKind::Path(path) => visitor.visit_path(path),
        ExprKind::Prefix { rhs, .. }
        | ExprKind::Borrow { rhs, .. }
        | ExprKind::Deref { rhs }
        | ExprKind::Spread { rhs } => visit_pr(visitor, rhs, |v, e| v.visit_expr(e)),
        ExprKind::Infix { lhs, rhs, .. } | ExprKind::Assign { lhs, rhs, .. } => {
            visit_pr(visitor, lhs, |v, e| v.visit_expr(e));
            visit_pr(visitor, rhs, |v, e| v.visit_expr(e));
        }
        ExprKind::Cast { lhs, ty } => {
            visit_pr(visitor, lhs, |v, e| v.visit_expr(e));
            visit_pr(visitor, ty, |v, ty| v.visit_ty(ty));
        }
        ExprKind::Block(block) => visitor.visit_block(block),
        ExprKind::If {
            cond,
            then_block,
            else_expr,
        } => {
            visit_pr(visitor, cond, |v, e| v.visit_expr(e));
            visit_pr(visitor, then_block, |v, b| v.visit_block(b));
            if let Some(else_expr) = else_expr {
                visitor.visit_expr(else_expr);
            }
        }
        ExprKind::Loop { body } => visitor.visit_block(body),
        ExprKind::While { cond, body } => {
            visit_pr(visitor, cond, |v, e| v.visit_expr(e));
            visitor.visit_block(body);
        }
        ExprKind::For { pat, iter, body } => {
            visit_pr(visitor, pat, |v, p| v.visit_pat(p));
            visit_pr(visitor, iter, |v, e| v.visit_expr(e));
            visitor.visit_block(body);
        }
        ExprKind::Match { subject, arms } => {
            visit_pr(visitor, subject, |v, e| v.visit_expr(e));
            for arm in arms {
                visitor.visit_match_arm(arm);
            }
        }
        ExprKind::Lambda(Lambda { params, body }) => {
            for param in params {
                visit_pr(visitor, &param.pat, |v, p| v.visit_pat(p));
                if let Some(ty) = &param.ty {
                    visitor.visit_ty(ty);
                }
            }
            visit_pr(visitor, body, |v, e| v.visit_expr(e));
        }
        ExprKind::Invoke { callee, args } => {
            visit_pr(visitor, callee, |v, e| v.visit_expr(e));
            for arg in args {
                visit_pr(visitor, arg, |v, e| v.visit_expr(e));
            }
        }
        ExprKind::Tuple { els } => {
            for el in els {
                visit_pr(visitor, el, |v, e| v.visit_expr(e));
            }
        }
        ExprKind::StructLit { path, fields } => {
            visitor.visit_path(path);
            for field in fields {
                visitor.visit_struct_expr_field(field);
            }
        }
        ExprKind::Field { lhs, field } => {
            visit_pr(visitor, lhs, |v, e| v.visit_expr(e));
            visitor.visit_ident(field);
        }
        ExprKind::Subscript { lhs, index } => {
            visit_pr(visitor, lhs, |v, e| v.visit_expr(e));
            visit_pr(visitor, index, |v, e| v.visit_expr(e));
        }
        ExprKind::Quest { lhs } => visit_pr(visitor, lhs, |v, e| v.visit_expr(e)),
        ExprKind::Paren(inner) => visit_pr(visitor, inner, |v, e| v.visit_expr(e)),
        ExprKind::Break { value } | ExprKind::Return { value } => {
            if let Some(value) = value {
                visit_pr(visitor, value, |v, e| v.visit_expr(e));
            }
        }
    }
}

pub fn walk_pat<V: AstVisitor>(visitor: &mut V, pat: &Pat) {
    match &pat.kind {
        PatKind::Wildcard | PatKind::Lit(_) => {}
        PatKind::Ident { name, sub, .. } => {
            visitor.visit_ident(name);
            if let Some(sub) = sub {
                visit_pr(visitor, sub, |v, p| v.visit_pat(p));
            }
        }
        PatKind::Ref { pat, .. } => visit_pr(visitor, pat, |v, p| v.visit_pat(p)),
        PatKind::Path(path) => visitor.visit_path(path),
        PatKind::Struct { path, fields, .. } => {
            visitor.visit_path(path);
            for field in fields {
                visitor.visit_struct_pat_field(field);
            }
        }
        PatKind::Tuple { els, .. } => {
            for el in els {
                visit_pr(visitor, el, |v, p| v.visit_pat(p));
            }
        }
        PatKind::Slice {
            before,
            rest: _,
            after,
        } => {
            for el in before.iter().chain(after.iter()) {
                visit_pr(visitor, el, |v, p| v.visit_pat(p));
            }
        }
        PatKind::Multi(els) => {
            for el in els {
                visit_pr(visitor, el, |v, p| v.visit_pat(p));
            }
        }
    }
}

pub fn walk_ty<V: AstVisitor>(visitor: &mut V, ty: &Ty) {
    match &ty.kind {
        TyKind::Unit => {}
        TyKind::Paren(inner) | TyKind::Slice(inner) => {
            visit_pr(visitor, inner, |v, ty| v.visit_ty(ty))
        }
        TyKind::Tuple(els) => {
            for el in els {
                visit_pr(visitor, el, |v, ty| v.visit_ty(ty));
            }
        }
        TyKind::Func { params, ret } => {
            for param in params {
                visit_pr(visitor, param, |v, ty| v.visit_ty(ty));
            }
            visit_pr(visitor, ret, |v, ty| v.visit_ty(ty));
        }
        TyKind::Array { ty, size } => {
            visit_pr(visitor, ty, |v, ty| v.visit_ty(ty));
            visitor.visit_anon_const(size);
        }
        TyKind::Path(path) => visitor.visit_path(path),
    }
}

pub fn walk_block<V: AstVisitor>(visitor: &mut V, block: &Block) {
    for stmt in &block.stmts {
        visit_pr(visitor, stmt, |v, stmt| v.visit_stmt(stmt));
    }
}

pub fn walk_path<V: AstVisitor>(visitor: &mut V, path: &Path) {
    for seg in &path.segs {
        visitor.visit_path_seg(seg);
    }
}

pub fn walk_path_seg<V: AstVisitor>(visitor: &mut V, seg: &PathSeg) {
    visitor.visit_ident(&seg.ident);
    if let Some(args) = &seg.generics {
        for arg in args {
            visitor.visit_generic_arg(arg);
        }
    }
}

pub fn walk_simple_path<V: AstVisitor>(visitor: &mut V, path: &SimplePath) {
    for seg in &path.segs {
        visitor.visit_ident(&seg.ident);
    }
}

pub fn walk_generic_param<V: AstVisitor>(visitor: &mut V, param: &GenericParam) {
    match &param.kind {
        GenericParamKind::Type { name, bound } => {
            visitor.visit_ident(name);
            if let Some(bound) = bound {
                visitor.visit_ty(bound);
            }
        }
        GenericParamKind::Lifetime { name } => visitor.visit_ident(name),
        GenericParamKind::Const { name, ty, default } => {
            visitor.visit_ident(name);
            visitor.visit_ty(ty);
            if let Some(default) = default {
                visitor.visit_anon_const(default);
            }
        }
    }
}

pub fn walk_generic_arg<V: AstVisitor>(visitor: &mut V, arg: &GenericArg) {
    match arg {
        GenericArg::Type(ty) => visitor.visit_ty(ty),
        GenericArg::Lifetime(name) => visitor.visit_ident(name),
        GenericArg::Const(value) => visitor.visit_anon_const(value),
    }
}

pub fn walk_func_sig<V: AstVisitor>(visitor: &mut V, sig: &FuncSig) {
    for param in &sig.params {
        visitor.visit_func_param(param);
    }
    if let FuncRetTy::Some(ty) = &sig.ret_ty {
        visitor.visit_ty(ty);
    }
}

pub fn walk_func_param<V: AstVisitor>(visitor: &mut V, param: &FuncParam) {
    if let Some(label) = &param.label {
        visitor.visit_ident(label);
    }
    visit_pr(visitor, &param.pat, |v, pat| v.visit_pat(pat));
    visit_pr(visitor, &param.ty, |v, ty| v.visit_ty(ty));
    if let Some(default) = &param.default {
        visitor.visit_anon_const(default);
    }
}

pub fn walk_body<V: AstVisitor>(visitor: &mut V, body: &Body) {
    visit_pr(visitor, &body.value, |v, value| v.visit_expr(value));
}

pub fn walk_anon_const<V: AstVisitor>(visitor: &mut V, value: &AnonConst) {
    visitor.visit_expr(&value.expr);
}

pub fn walk_attr<V: AstVisitor>(visitor: &mut V, attr: &Attr) {
    visitor.visit_simple_path(&attr.name);
}

pub fn walk_use_tree<V: AstVisitor>(visitor: &mut V, tree: &UseTree) {
    match &tree.kind {
        UseTreeKind::Raw(path) => visitor.visit_simple_path(path),
        UseTreeKind::All(path) => {
            if let Some(path) = path {
                visitor.visit_simple_path(path);
            }
        }
        UseTreeKind::Specific(path, trees) => {
            if let Some(path) = path {
                visitor.visit_simple_path(path);
            }
            for tree in trees {
                visit_pr(visitor, tree, |v, tree| v.visit_use_tree(tree));
            }
        }
        UseTreeKind::Rebind(path, alias) => {
            visitor.visit_simple_path(path);
            visitor.visit_ident(alias);
        }
    }
}

pub fn walk_variant<V: AstVisitor>(visitor: &mut V, variant: &Variant) {
    visitor.visit_ident(&variant.name);
    match &variant.body {
        VariantBody::Unit(discriminant) => {
            if let Some(discriminant) = discriminant {
                visitor.visit_anon_const(discriminant);
            }
        }
        VariantBody::Tuple(els) => {
            for el in els {
                visitor.visit_tuple_ty_el(el);
            }
        }
        VariantBody::Struct(fields) => {
            for field in fields {
                visitor.visit_struct_field(field);
            }
        }
    }
}

pub fn walk_struct_field<V: AstVisitor>(visitor: &mut V, field: &StructField) {
    visitor.visit_ident(&field.name);
    visit_pr(visitor, &field.ty, |v, ty| v.visit_ty(ty));
}

pub fn walk_tuple_ty_el<V: AstVisitor>(visitor: &mut V, el: &TupleTyEl) {
    if let Some(name) = &el.name {
        visitor.visit_ident(name);
    }
    visit_pr(visitor, &el.ty, |v, ty| v.visit_ty(ty));
}

pub fn walk_match_arm<V: AstVisitor>(visitor: &mut V, arm: &MatchArm) {
    visit_pr(visitor, &arm.pat, |v, pat| v.visit_pat(pat));
    visit_pr(visitor, &arm.body, |v, body| v.visit_expr(body));
}

pub fn walk_struct_expr_field<V: AstVisitor>(visitor: &mut V, field: &StructExprField) {
    match &field.kind {
        StructExprFieldKind::Full(name, value) => {
            visitor.visit_ident(name);
            visit_pr(visitor, value, |v, value| v.visit_expr(value));
        }
        StructExprFieldKind::Shorthand(name) => visitor.visit_ident(name),
        StructExprFieldKind::Spread(value) => {
            visit_pr(visitor, value, |v, value| v.visit_expr(value))
        }
    }
}

pub fn walk_struct_pat_field<V: AstVisitor>(visitor: &mut V, field: &StructPatField) {
    visitor.visit_ident(&field.name);
    if let Some(pat) = &field.pat {
        visit_pr(visitor, pat, |v, pat| v.visit_pat(pat));
    }
}
