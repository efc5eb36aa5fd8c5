//! AST → HIR lowering.
//!
//! Each named item becomes an owner; its children get dense
//! [`ChildId`]s in visit order, so lowering the same tree twice
//! produces identical HIR. Loop sugar is rewritten here: `while`
//! becomes `loop` + `if`, `for` becomes `loop` + `match` over the
//! iterator protocol. Bodies move into the owner's body map, leaving
//! a [`BodyId`] in the item shell.

use std::collections::BTreeMap;

use jacy_ast as ast;
use jacy_ast::{ItemKind as AstItemKind, PR};
use jacy_message::{MessageHolder, MessageResult};
use jacy_resolve::{DefId, Res, Resolutions};
use jacy_span::{Interner, Span};

use crate::ids::{BodyId, ChildId, HirId};
use crate::nodes as hir;

pub struct Lowering<'a> {
    resolutions: &'a Resolutions,
    interner: &'a Interner,
    msg: MessageHolder,
    owners: BTreeMap<DefId, hir::OwnerInfo>,
    owner: DefId,
    next_child: u32,
    bodies: BTreeMap<ChildId, hir::Body>,
}

impl<'a> Lowering<'a> {
    pub fn new(resolutions: &'a Resolutions, interner: &'a Interner) -> Self {
        Self {
            resolutions,
            interner,
            msg: MessageHolder::new(),
            owners: BTreeMap::new(),
            owner: DefId::DUMMY,
            next_child: 1,
            bodies: BTreeMap::new(),
        }
    }

    /// Lower a whole party. The crate root becomes the owner of a
    /// synthetic `mod` shell listing the top-level items.
    pub fn lower(mut self, party: &ast::Party) -> MessageResult<hir::Party> {
        self.owner = DefId::ROOT;
        self.next_child = 1;
        let mut items = Vec::new();
        for item in party.items().flatten() {
            if let Some(def_id) = self.lower_owner(item) {
                items.push(def_id);
            }
        }
        let root = hir::Item {
            hir_id: HirId::owner_of(DefId::ROOT),
            def_id: DefId::ROOT,
            name: hir::Ident {
                sym: self.resolutions.def_table.def(DefId::ROOT).ident.sym,
                span: Span::DUMMY,
            },
            kind: hir::ItemKind::Mod { items },
            span: Span::DUMMY,
        };
        self.owners.insert(
            DefId::ROOT,
            hir::OwnerInfo {
                item: root,
                bodies: BTreeMap::new(),
            },
        );
        self.msg.result(hir::Party {
            owners: self.owners,
        })
    }

    // Owner plumbing //

    fn next_hir_id(&mut self) -> HirId {
        let id = HirId::new(self.owner, ChildId(self.next_child));
        self.next_child += 1;
        id
    }

    fn res_of(&self, node: ast::NodeId) -> Res {
        self.resolutions.res.get(node).unwrap_or(Res::Err)
    }

    /// Lower one item as its own owner; returns `None` for items that
    /// leave no HIR (use declarations, parse failures).
    fn lower_owner(&mut self, item: &ast::Item) -> Option<DefId> {
        if matches!(item.kind, AstItemKind::Use(_)) {
            return None;
        }
        let def_id = self.resolutions.def_table.opt_def_of_node(item.id)?;
        tracing::debug!("lowering owner {def_id:?}");

        let saved_owner = self.owner;
        let saved_child = self.next_child;
        let saved_bodies = std::mem::take(&mut self.bodies);
        self.owner = def_id;
        self.next_child = 1;

        let name = item
            .name()
            .map(|ident| self.lower_ident(ident))
            .unwrap_or(hir::Ident {
                sym: self.resolutions.def_table.def(def_id).ident.sym,
                span: item.span,
            });
        let kind = self.lower_item_kind(item);
        let shell = hir::Item {
            hir_id: HirId::owner_of(def_id),
            def_id,
            name,
            kind,
            span: item.span,
        };
        let bodies = std::mem::replace(&mut self.bodies, saved_bodies);
        self.owners.insert(def_id, hir::OwnerInfo { item: shell, bodies });
        self.owner = saved_owner;
        self.next_child = saved_child;
        Some(def_id)
    }

    fn lower_item_kind(&mut self, item: &ast::Item) -> hir::ItemKind {
        match &item.kind {
            AstItemKind::Mod(mod_item) => {
                let items = mod_item
                    .items
                    .iter()
                    .flatten()
                    .filter_map(|sub| self.lower_owner(sub))
                    .collect();
                hir::ItemKind::Mod { items }
            }
            AstItemKind::Enum(enum_item) => hir::ItemKind::Enum {
                generics: self.lower_generics(&enum_item.generics),
                variants: enum_item
                    .variants
                    .iter()
                    .flatten()
                    .map(|variant| self.lower_variant(variant))
                    .collect(),
            },
            AstItemKind::Struct(struct_item) => hir::ItemKind::Struct {
                generics: self.lower_generics(&struct_item.generics),
                fields: struct_item
                    .fields
                    .iter()
                    .map(|field| self.lower_struct_field(field))
                    .collect(),
            },
            AstItemKind::Trait(trait_item) => hir::ItemKind::Trait {
                generics: self.lower_generics(&trait_item.generics),
                members: trait_item
                    .members
                    .iter()
                    .flatten()
                    .filter_map(|member| self.lower_owner(member))
                    .collect(),
            },
            AstItemKind::Impl(impl_item) => hir::ItemKind::Impl {
                generics: self.lower_generics(&impl_item.generics),
                trait_path: match &impl_item.trait_path {
                    Some(Ok(path)) => Some(self.lower_path(path)),
                    _ => None,
                },
                ty: Box::new(self.lower_ty_pr2(&impl_item.ty)),
                members: impl_item
                    .members
                    .iter()
                    .flatten()
                    .filter_map(|member| self.lower_owner(member))
                    .collect(),
            },
            AstItemKind::Func(func) | AstItemKind::Init(func) => {
                let generics = self.lower_generics(&func.generics);
                let sig = self.lower_sig(&func.sig);
                let body = func.body.as_ref().map(|body| self.lower_body(body));
                hir::ItemKind::Func { generics, sig, body }
            }
            AstItemKind::TypeAlias(alias) => hir::ItemKind::TypeAlias {
                generics: self.lower_generics(&alias.generics),
                ty: alias
                    .ty
                    .as_ref()
                    .map(|ty| Box::new(self.lower_ty_pr2(ty))),
            },
            AstItemKind::Use(_) => unreachable!("use declarations never reach lowering"),
        }
    }

    // Fragments //

    fn lower_ident(&mut self, ident: &ast::Ident) -> hir::Ident {
        hir::Ident {
            sym: ident.sym,
            span: ident.span,
        }
    }

    fn lower_generics(&mut self, generics: &[ast::GenericParam]) -> Vec<hir::GenericParam> {
        generics
            .iter()
            .map(|param| {
                let hir_id = self.next_hir_id();
                let def_id = self
                    .resolutions
                    .def_table
                    .opt_def_of_node(param.id)
                    .unwrap_or(DefId::DUMMY);
                let kind = match &param.kind {
                    ast::GenericParamKind::Type { name, bound } => hir::GenericParamKind::Type {
                        name: self.lower_ident(name),
                        bound: bound.as_ref().map(|ty| Box::new(self.lower_ty(ty))),
                    },
                    ast::GenericParamKind::Lifetime { name } => hir::GenericParamKind::Lifetime {
                        name: self.lower_ident(name),
                    },
                    ast::GenericParamKind::Const { name, ty, default } => {
                        hir::GenericParamKind::Const {
                            name: self.lower_ident(name),
                            ty: Box::new(self.lower_ty(ty)),
                            default: default.as_ref().map(|dflt| self.lower_anon_const(dflt)),
                        }
                    }
                };
                hir::GenericParam {
                    hir_id,
                    def_id,
                    kind,
                    span: param.span,
                }
            })
            .collect()
    }

    fn lower_path(&mut self, path: &ast::Path) -> hir::Path {
        hir::Path {
            res: self.res_of(path.id),
            segs: path
                .segs
                .iter()
                .map(|seg| hir::PathSeg {
                    ident: hir::Ident {
                        sym: seg.ident.sym,
                        span: seg.ident.span,
                    },
                    generics: seg
                        .generics
                        .as_ref()
                        .map(|args| args.iter().map(|arg| self.lower_generic_arg(arg)).collect())
                        .unwrap_or_default(),
                })
                .collect(),
            span: path.span,
        }
    }

    fn lower_generic_arg(&mut self, arg: &ast::GenericArg) -> hir::GenericArg {
        match arg {
            ast::GenericArg::Type(ty) => hir::GenericArg::Type(Box::new(self.lower_ty(ty))),
            ast::GenericArg::Lifetime(name) => hir::GenericArg::Lifetime {
                res: self.res_of(name.id),
                name: hir::Ident {
                    sym: name.sym,
                    span: name.span,
                },
            },
            ast::GenericArg::Const(value) => {
                hir::GenericArg::Const(self.lower_anon_const(value))
            }
        }
    }

    fn lower_anon_const(&mut self, value: &ast::AnonConst) -> hir::AnonConst {
        hir::AnonConst {
            hir_id: self.next_hir_id(),
            value: Box::new(self.lower_expr(&value.expr)),
        }
    }

    fn lower_sig(&mut self, sig: &ast::FuncSig) -> hir::FuncSig {
        hir::FuncSig {
            params: sig
                .params
                .iter()
                .map(|param| hir::Param {
                    hir_id: self.next_hir_id(),
                    label: param.label.as_ref().map(|label| self.lower_ident(label)),
                    pat: Box::new(self.lower_pat_pr(&param.pat, param.span)),
                    ty: Box::new(self.lower_ty_pr2(&param.ty)),
                    default: param
                        .default
                        .as_ref()
                        .map(|dflt| self.lower_anon_const(dflt)),
                    span: param.span,
                })
                .collect(),
            ret_ty: match &sig.ret_ty {
                ast::FuncRetTy::Default(_) => None,
                ast::FuncRetTy::Some(ty) => Some(Box::new(self.lower_ty(ty))),
            },
            span: sig.span,
        }
    }

    /// Move a body into the owner's body map, leaving only its id in
    /// the shell.
    fn lower_body(&mut self, body: &ast::Body) -> BodyId {
        let hir_id = self.next_hir_id();
        let id = BodyId(hir_id);
        let value = match &body.value {
            Ok(expr) => self.lower_expr(expr),
            Err(error) => self.err_expr(error.span),
        };
        let lowered = hir::Body {
            id,
            expr_body: body.expr_body,
            value,
        };
        debug_assert!(!hir_id.is_dummy(), "[DEV] dummy hir id for a body");
        self.bodies.insert(hir_id.child, lowered);
        id
    }

    fn lower_variant(&mut self, variant: &ast::Variant) -> hir::Variant {
        let hir_id = self.next_hir_id();
        let def_id = self
            .resolutions
            .def_table
            .opt_def_of_node(variant.id)
            .unwrap_or(DefId::DUMMY);
        let body = match &variant.body {
            ast::VariantBody::Unit(discriminant) => hir::VariantBody::Unit(
                discriminant
                    .as_ref()
                    .map(|value| self.lower_anon_const(value)),
            ),
            ast::VariantBody::Tuple(els) => hir::VariantBody::Tuple(
                els.iter()
                    .map(|el| hir::TupleTyEl {
                        hir_id: self.next_hir_id(),
                        name: el.name.as_ref().map(|name| self.lower_ident(name)),
                        ty: Box::new(self.lower_ty_pr2(&el.ty)),
                        span: el.span,
                    })
                    .collect(),
            ),
            ast::VariantBody::Struct(fields) => hir::VariantBody::Struct(
                fields
                    .iter()
                    .map(|field| self.lower_struct_field(field))
                    .collect(),
            ),
        };
        hir::Variant {
            hir_id,
            def_id,
            name: self.lower_ident(&variant.name),
            body,
            span: variant.span,
        }
    }

    fn lower_struct_field(&mut self, field: &ast::StructField) -> hir::StructField {
        hir::StructField {
            hir_id: self.next_hir_id(),
            def_id: self.resolutions.def_table.opt_def_of_node(field.id),
            name: self.lower_ident(&field.name),
            ty: Box::new(self.lower_ty_pr2(&field.ty)),
            span: field.span,
        }
    }

    // Statements //

    fn lower_block(&mut self, block: &ast::Block) -> hir::Block {
        let hir_id = self.next_hir_id();
        let stmts = block
            .stmts
            .iter()
            .flatten()
            .filter_map(|stmt| self.lower_stmt(stmt))
            .collect();
        hir::Block {
            hir_id,
            stmts,
            span: block.span,
        }
    }

    fn lower_stmt(&mut self, stmt: &ast::Stmt) -> Option<hir::Stmt> {
        let hir_id = self.next_hir_id();
        let kind = match &stmt.kind {
            ast::StmtKind::Let(let_stmt) => hir::StmtKind::Let(hir::LetStmt {
                pat: Box::new(self.lower_pat_pr2(&let_stmt.pat, stmt.span)),
                ty: let_stmt
                    .ty
                    .as_ref()
                    .map(|ty| Box::new(self.lower_ty_pr2(ty))),
                value: let_stmt
                    .value
                    .as_ref()
                    .map(|value| Box::new(self.lower_expr_pr(value))),
            }),
            ast::StmtKind::Expr(expr) => {
                hir::StmtKind::Expr(Box::new(self.lower_expr_pr(expr)))
            }
            ast::StmtKind::Item(item) => {
                let item = item.as_ref().ok()?;
                let def_id = self.lower_owner(item)?;
                hir::StmtKind::Item(def_id)
            }
        };
        Some(hir::Stmt {
            hir_id,
            kind,
            span: stmt.span,
        })
    }

    // Expressions //

    fn err_expr(&mut self, span: Span) -> hir::Expr {
        hir::Expr {
            hir_id: self.next_hir_id(),
            kind: hir::ExprKind::Err,
            span,
        }
    }

    fn lower_expr_pr(&mut self, expr: &PR<ast::P<ast::Expr>>) -> hir::Expr {
        match expr {
            Ok(expr) => self.lower_expr(expr),
            Err(error) => self.err_expr(error.span),
        }
    }

    fn lower_expr(&mut self, expr: &ast::Expr) -> hir::Expr {
        let hir_id = self.next_hir_id();
        let span = expr.span;
        let kind = match &expr.kind {
            ast::ExprKind::Lit(lit) => hir::ExprKind::Lit(lower_lit(*lit)),
            ast::ExprKind::Path(path) => hir::ExprKind::Path(self.lower_path(path)),
            ast::ExprKind::Prefix { op, rhs } => hir::ExprKind::Prefix {
                op: *op,
                rhs: Box::new(self.lower_expr_pr(rhs)),
            },
            ast::ExprKind::Borrow { mutable, rhs } => hir::ExprKind::Borrow {
                mutable: *mutable,
                rhs: Box::new(self.lower_expr_pr(rhs)),
            },
            ast::ExprKind::Deref { rhs } => hir::ExprKind::Deref {
                rhs: Box::new(self.lower_expr_pr(rhs)),
            },
            ast::ExprKind::Infix { lhs, op, rhs } => hir::ExprKind::Infix {
                lhs: Box::new(self.lower_expr_pr(lhs)),
                op: *op,
                rhs: Box::new(self.lower_expr_pr(rhs)),
            },
            ast::ExprKind::Assign { lhs, op, rhs } => hir::ExprKind::Assign {
                lhs: Box::new(self.lower_expr_pr(lhs)),
                op: *op,
                rhs: Box::new(self.lower_expr_pr(rhs)),
            },
            ast::ExprKind::Cast { lhs, ty } => hir::ExprKind::Cast {
                lhs: Box::new(self.lower_expr_pr(lhs)),
                ty: Box::new(self.lower_ty_pr2(ty)),
            },
            ast::ExprKind::Block(block) => {
                hir::ExprKind::Block(Box::new(self.lower_block(block)))
            }
            ast::ExprKind::If {
                cond,
                then_block,
                else_expr,
            } => hir::ExprKind::If {
                cond: Box::new(self.lower_expr_pr(cond)),
                then_block: Box::new(match then_block {
                    Ok(block) => self.lower_block(block),
                    Err(error) => self.err_block(error.span),
                }),
                else_expr: else_expr
                    .as_ref()
                    .map(|els| Box::new(self.lower_expr(els))),
            },
            ast::ExprKind::Loop { body } => hir::ExprKind::Loop {
                body: Box::new(self.lower_block(body)),
            },
            ast::ExprKind::While { cond, body } => self.desugar_while(cond, body, span),
            ast::ExprKind::For { pat, iter, body } => self.desugar_for(pat, iter, body, span),
            ast::ExprKind::Match { subject, arms } => hir::ExprKind::Match {
                subject: Box::new(self.lower_expr_pr(subject)),
                arms: arms
                    .iter()
                    .map(|arm| hir::MatchArm {
                        hir_id: self.next_hir_id(),
                        pat: Box::new(self.lower_pat_pr2(&arm.pat, arm.span)),
                        value: Box::new(self.lower_expr_pr(&arm.body)),
                        span: arm.span,
                    })
                    .collect(),
            },
            ast::ExprKind::Lambda(lambda) => hir::ExprKind::Lambda {
                params: lambda
                    .params
                    .iter()
                    .map(|param| hir::LambdaParam {
                        hir_id: self.next_hir_id(),
                        pat: Box::new(self.lower_pat_pr2(&param.pat, param.span)),
                        ty: param.ty.as_ref().map(|ty| Box::new(self.lower_ty(ty))),
                        span: param.span,
                    })
                    .collect(),
                value: Box::new(self.lower_expr_pr(&lambda.body)),
            },
            ast::ExprKind::Invoke { callee, args } => hir::ExprKind::Invoke {
                callee: Box::new(self.lower_expr_pr(callee)),
                args: args
                    .iter()
                    .map(|arg| match arg {
                        Ok(arg) => self.lower_expr(arg),
                        Err(error) => self.err_expr(error.span),
                    })
                    .collect(),
            },
            ast::ExprKind::Tuple { els } => hir::ExprKind::Tuple {
                els: els
                    .iter()
                    .map(|el| match el {
                        Ok(el) => self.lower_expr(el),
                        Err(error) => self.err_expr(error.span),
                    })
                    .collect(),
            },
            ast::ExprKind::StructLit { path, fields } => self.lower_struct_lit(path, fields),
            ast::ExprKind::Field { lhs, field } => hir::ExprKind::Field {
                lhs: Box::new(self.lower_expr_pr(lhs)),
                field: self.lower_ident(field),
            },
            ast::ExprKind::Subscript { lhs, index } => hir::ExprKind::Subscript {
                lhs: Box::new(self.lower_expr_pr(lhs)),
                index: Box::new(self.lower_expr_pr(index)),
            },
            ast::ExprKind::Quest { lhs } => hir::ExprKind::Quest {
                lhs: Box::new(self.lower_expr_pr(lhs)),
            },
            ast::ExprKind::Paren(inner) => {
                // Parens carry no semantics past parsing.
                return self.lower_expr_pr(inner);
            }
            ast::ExprKind::Unit => hir::ExprKind::Unit,
            ast::ExprKind::SelfExpr => hir::ExprKind::SelfExpr,
            ast::ExprKind::Break { value } => hir::ExprKind::Break {
                value: value
                    .as_ref()
                    .map(|value| Box::new(self.lower_expr_pr(value))),
            },
            ast::ExprKind::Continue => hir::ExprKind::Continue,
            ast::ExprKind::Return { value } => hir::ExprKind::Return {
                value: value
                    .as_ref()
                    .map(|value| Box::new(self.lower_expr_pr(value))),
            },
            ast::ExprKind::Spread { rhs } => hir::ExprKind::Spread {
                rhs: Box::new(self.lower_expr_pr(rhs)),
            },
        };
        hir::Expr { hir_id, kind, span }
    }

    /// `P { a, b: x, ..rest }` → full fields plus a functional-update
    /// base.
    fn lower_struct_lit(
        &mut self,
        path: &ast::Path,
        fields: &[ast::StructExprField],
    ) -> hir::ExprKind {
        let path = self.lower_path(path);
        let mut lowered = Vec::new();
        let mut base = None;
        for field in fields {
            match &field.kind {
                ast::StructExprFieldKind::Full(name, value) => {
                    lowered.push(hir::StructLitField {
                        hir_id: self.next_hir_id(),
                        name: self.lower_ident(name),
                        value: self.lower_expr_pr(value),
                        span: field.span,
                    });
                }
                ast::StructExprFieldKind::Shorthand(name) => {
                    // `x` becomes `x: x`, reusing the resolution made
                    // for the shorthand.
                    let value_id = self.next_hir_id();
                    let value = hir::Expr {
                        hir_id: value_id,
                        kind: hir::ExprKind::Path(hir::Path {
                            res: self.res_of(name.id),
                            segs: vec![hir::PathSeg {
                                ident: hir::Ident {
                                    sym: name.sym,
                                    span: name.span,
                                },
                                generics: Vec::new(),
                            }],
                            span: name.span,
                        }),
                        span: name.span,
                    };
                    lowered.push(hir::StructLitField {
                        hir_id: self.next_hir_id(),
                        name: self.lower_ident(name),
                        value,
                        span: field.span,
                    });
                }
                ast::StructExprFieldKind::Spread(value) => {
                    base = Some(Box::new(self.lower_expr_pr(value)));
                }
            }
        }
        hir::ExprKind::StructLit {
            path,
            fields: lowered,
            base,
        }
    }

    // Desugaring //

    fn err_block(&mut self, span: Span) -> hir::Block {
        hir::Block {
            hir_id: self.next_hir_id(),
            stmts: Vec::new(),
            span,
        }
    }

    fn synth_expr(&mut self, kind: hir::ExprKind, span: Span) -> hir::Expr {
        hir::Expr {
            hir_id: self.next_hir_id(),
            kind,
            span,
        }
    }

    fn expr_stmt_block(&mut self, expr: hir::Expr, span: Span) -> hir::Block {
        let block_id = self.next_hir_id();
        let stmt = hir::Stmt {
            hir_id: self.next_hir_id(),
            kind: hir::StmtKind::Expr(Box::new(expr)),
            span,
        };
        hir::Block {
            hir_id: block_id,
            stmts: vec![stmt],
            span,
        }
    }

    /// `while cond { body }` → `loop { if cond { body } else { break } }`.
    fn desugar_while(
        &mut self,
        cond: &PR<ast::P<ast::Expr>>,
        body: &ast::Block,
        span: Span,
    ) -> hir::ExprKind {
        let cond = self.lower_expr_pr(cond);
        let then_block = self.lower_block(body);
        let break_expr = self.synth_expr(hir::ExprKind::Break { value: None }, span);
        let else_block = self.expr_stmt_block(break_expr, span);
        let else_expr = self.synth_expr(hir::ExprKind::Block(Box::new(else_block)), span);
        let if_expr = self.synth_expr(
            hir::ExprKind::If {
                cond: Box::new(cond),
                then_block: Box::new(then_block),
                else_expr: Some(Box::new(else_expr)),
            },
            span,
        );
        let loop_body = self.expr_stmt_block(if_expr, span);
        hir::ExprKind::Loop {
            body: Box::new(loop_body),
        }
    }

    /// `for pat in iter { body }` →
    /// `loop { match iter.next() { Some(pat) => { body }, None => break } }`.
    fn desugar_for(
        &mut self,
        pat: &PR<ast::P<ast::Pat>>,
        iter: &PR<ast::P<ast::Expr>>,
        body: &ast::Block,
        span: Span,
    ) -> hir::ExprKind {
        let iter = self.lower_expr_pr(iter);
        let next_callee = self.synth_expr(
            hir::ExprKind::Field {
                lhs: Box::new(iter),
                field: hir::Ident {
                    sym: self.interner.intern("next"),
                    span,
                },
            },
            span,
        );
        let subject = self.synth_expr(
            hir::ExprKind::Invoke {
                callee: Box::new(next_callee),
                args: Vec::new(),
            },
            span,
        );

        let element_pat = self.lower_pat_pr2(pat, span);
        let some_pat = hir::Pat {
            hir_id: self.next_hir_id(),
            kind: hir::PatKind::Ctor {
                name: hir::Ident {
                    sym: self.interner.intern("Some"),
                    span,
                },
                args: vec![element_pat],
            },
            span,
        };
        let body_block = self.lower_block(body);
        let some_value = self.synth_expr(hir::ExprKind::Block(Box::new(body_block)), span);
        let some_arm = hir::MatchArm {
            hir_id: self.next_hir_id(),
            pat: Box::new(some_pat),
            value: Box::new(some_value),
            span,
        };

        let none_pat = hir::Pat {
            hir_id: self.next_hir_id(),
            kind: hir::PatKind::Ctor {
                name: hir::Ident {
                    sym: self.interner.intern("None"),
                    span,
                },
                args: Vec::new(),
            },
            span,
        };
        let none_value = self.synth_expr(hir::ExprKind::Break { value: None }, span);
        let none_arm = hir::MatchArm {
            hir_id: self.next_hir_id(),
            pat: Box::new(none_pat),
            value: Box::new(none_value),
            span,
        };

        let match_expr = self.synth_expr(
            hir::ExprKind::Match {
                subject: Box::new(subject),
                arms: vec![some_arm, none_arm],
            },
            span,
        );
        let loop_body = self.expr_stmt_block(match_expr, span);
        hir::ExprKind::Loop {
            body: Box::new(loop_body),
        }
    }

    // Patterns //

    fn lower_pat_pr(&mut self, pat: &PR<ast::Pat>, span: Span) -> hir::Pat {
        match pat {
            Ok(pat) => self.lower_pat(pat),
            Err(_) => hir::Pat {
                hir_id: self.next_hir_id(),
                kind: hir::PatKind::Wildcard,
                span,
            },
        }
    }

    fn lower_pat_pr2(&mut self, pat: &PR<ast::P<ast::Pat>>, span: Span) -> hir::Pat {
        match pat {
            Ok(pat) => self.lower_pat(pat),
            Err(_) => hir::Pat {
                hir_id: self.next_hir_id(),
                kind: hir::PatKind::Wildcard,
                span,
            },
        }
    }

    fn lower_pat(&mut self, pat: &ast::Pat) -> hir::Pat {
        let hir_id = self.next_hir_id();
        let span = pat.span;
        let kind = match &pat.kind {
            ast::PatKind::Wildcard => hir::PatKind::Wildcard,
            ast::PatKind::Lit(lit) => hir::PatKind::Lit(lower_lit(*lit)),
            ast::PatKind::Ident {
                reference,
                mutable,
                name,
                sub,
            } => hir::PatKind::Ident {
                reference: *reference,
                mutable: *mutable,
                name: self.lower_ident(name),
                binding: pat.id,
                sub: sub
                    .as_ref()
                    .map(|sub| Box::new(self.lower_pat_pr2(sub, span))),
            },
            ast::PatKind::Ref { mutable, pat: inner } => hir::PatKind::Ref {
                mutable: *mutable,
                pat: Box::new(self.lower_pat_pr2(inner, span)),
            },
            ast::PatKind::Path(path) => hir::PatKind::Path(self.lower_path(path)),
            ast::PatKind::Struct { path, fields, rest } => hir::PatKind::Struct {
                path: self.lower_path(path),
                fields: fields
                    .iter()
                    .map(|field| {
                        let field_id = self.next_hir_id();
                        let pat = match &field.pat {
                            Some(sub) => self.lower_pat_pr2(sub, field.span),
                            // Shorthand `x` binds like `x: x`.
                            None => hir::Pat {
                                hir_id: self.next_hir_id(),
                                kind: hir::PatKind::Ident {
                                    reference: false,
                                    mutable: false,
                                    name: hir::Ident {
                                        sym: field.name.sym,
                                        span: field.name.span,
                                    },
                                    binding: field.id,
                                    sub: None,
                                },
                                span: field.name.span,
                            },
                        };
                        hir::StructPatField {
                            hir_id: field_id,
                            name: hir::Ident {
                                sym: field.name.sym,
                                span: field.name.span,
                            },
                            pat: Box::new(pat),
                            span: field.span,
                        }
                    })
                    .collect(),
                rest: *rest,
            },
            ast::PatKind::Tuple { els, rest_pat_index } => hir::PatKind::Tuple {
                els: els
                    .iter()
                    .map(|el| self.lower_pat_pr(el, span))
                    .collect(),
                rest_pat_index: *rest_pat_index,
            },
            ast::PatKind::Slice {
                before,
                rest,
                after,
            } => hir::PatKind::Slice {
                before: before
                    .iter()
                    .map(|el| self.lower_pat_pr(el, span))
                    .collect(),
                rest: *rest,
                after: after
                    .iter()
                    .map(|el| self.lower_pat_pr(el, span))
                    .collect(),
            },
            ast::PatKind::Multi(els) => hir::PatKind::Multi(
                els.iter()
                    .map(|el| self.lower_pat_pr(el, span))
                    .collect(),
            ),
        };
        hir::Pat { hir_id, kind, span }
    }

    // Types //

    fn lower_ty_pr2(&mut self, ty: &PR<ast::P<ast::Ty>>) -> hir::Ty {
        match ty {
            Ok(ty) => self.lower_ty(ty),
            Err(error) => hir::Ty {
                hir_id: self.next_hir_id(),
                kind: hir::TyKind::Err,
                span: error.span,
            },
        }
    }

    fn lower_ty_pr(&mut self, ty: &PR<ast::Ty>, span: Span) -> hir::Ty {
        match ty {
            Ok(ty) => self.lower_ty(ty),
            Err(_) => hir::Ty {
                hir_id: self.next_hir_id(),
                kind: hir::TyKind::Err,
                span,
            },
        }
    }

    fn lower_ty(&mut self, ty: &ast::Ty) -> hir::Ty {
        let hir_id = self.next_hir_id();
        let span = ty.span;
        let kind = match &ty.kind {
            ast::TyKind::Paren(inner) => {
                hir::TyKind::Paren(Box::new(self.lower_ty_pr2(inner)))
            }
            ast::TyKind::Tuple(els) => hir::TyKind::Tuple(
                els.iter().map(|el| self.lower_ty_pr(el, span)).collect(),
            ),
            ast::TyKind::Func { params, ret } => hir::TyKind::Func {
                params: params
                    .iter()
                    .map(|param| self.lower_ty_pr(param, span))
                    .collect(),
                ret: Box::new(self.lower_ty_pr2(ret)),
            },
            ast::TyKind::Slice(inner) => {
                hir::TyKind::Slice(Box::new(self.lower_ty_pr2(inner)))
            }
            ast::TyKind::Array { ty, size } => hir::TyKind::Array {
                ty: Box::new(self.lower_ty_pr2(ty)),
                size: self.lower_anon_const(size),
            },
            ast::TyKind::Path(path) => hir::TyKind::Path(self.lower_path(path)),
            ast::TyKind::Unit => hir::TyKind::Unit,
        };
        hir::Ty { hir_id, kind, span }
    }
}

fn lower_lit(lit: ast::LitValue) -> hir::LitValue {
    match lit {
        ast::LitValue::Bool(value) => hir::LitValue::Bool(value),
        ast::LitValue::Int { val, kind } => hir::LitValue::Int { val, kind },
        ast::LitValue::Float { sym, kind } => hir::LitValue::Float { sym, kind },
        ast::LitValue::Str { sym } => hir::LitValue::Str { sym },
    }
}
