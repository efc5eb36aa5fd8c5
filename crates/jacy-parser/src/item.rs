//! Item grammar: everything that can appear at module level.

use jacy_ast::{
    AnonConst, Attr, Body, EnumItem, FuncItem, FuncParam, FuncRetTy, FuncSig, GenericParam,
    GenericParamKind, Ident, ImplItem, Item, ItemKind, ModItem, StructField, StructItem,
    TraitItem, TupleTyEl, TyKind, TypeAliasItem, UseDeclItem, UseTree, UseTreeKind, Variant,
    VariantBody, Vis, PR,
};
use jacy_lexer::TokenKind;
use jacy_message::MessageBuilder;
use jacy_span::Kw;

use crate::parser::Parser;

impl<'a> Parser<'a> {
    /// Parse items until the terminator (Eof at top level, `}` inside
    /// a braced body). Non-item tokens are reported and skipped.
    pub(crate) fn parse_items_until(&mut self, end: TokenKind) -> Vec<PR<Item>> {
        let mut items = Vec::new();
        while !self.check(end) && !self.peek().is_eof() {
            match self.parse_item() {
                Some(item) => items.push(item),
                None => {
                    items.push(Err(self.expected("an item")));
                    // The recovery may have stopped right at `;`/`}`
                    // without consuming; don't loop forever.
                    if !self.check(end) && !self.is_item_start() {
                        self.advance();
                    }
                }
            }
        }
        items
    }

    /// Parse one item if the current token can start one.
    pub(crate) fn parse_item(&mut self) -> Option<PR<Item>> {
        if !self.is_item_start() {
            return None;
        }
        let lo = self.peek().span;
        let attrs = self.parse_attrs();
        let vis = self.parse_vis();

        let token = self.peek();
        let kind = if token.is_kw(Kw::Enum) {
            self.parse_enum()
        } else if token.is_kw(Kw::Struct) {
            self.parse_struct()
        } else if token.is_kw(Kw::Trait) {
            self.parse_trait()
        } else if token.is_kw(Kw::Impl) {
            self.parse_impl()
        } else if token.is_kw(Kw::Fn) {
            self.parse_func().map(ItemKind::Func)
        } else if token.is_kw(Kw::Init) {
            self.parse_init().map(ItemKind::Init)
        } else if token.is_kw(Kw::Mod) {
            self.parse_mod()
        } else if token.is_kw(Kw::Type) {
            self.parse_type_alias()
        } else if token.is_kw(Kw::Use) {
            self.parse_use_decl()
        } else {
            // `pub`/attrs were consumed but no item keyword follows.
            Err(self.expected("an item keyword"))
        };

        let span = lo.to(self.prev_span());
        Some(kind.map(|kind| Item {
            id: self.next_id(),
            attrs,
            vis,
            kind,
            span,
        }))
    }

    fn parse_attrs(&mut self) -> Vec<Attr> {
        let mut attrs = Vec::new();
        while self.check(TokenKind::At) {
            let lo = self.advance().span;
            match self.parse_simple_path() {
                Ok(name) => {
                    let span = lo.to(name.span);
                    let id = self.next_id();
                    attrs.push(Attr { id, name, span });
                }
                Err(_) => break,
            }
        }
        attrs
    }

    fn parse_vis(&mut self) -> Vis {
        if self.peek().is_kw(Kw::Pub) {
            Vis::Pub(self.advance().span)
        } else {
            Vis::Unset
        }
    }

    // Item kinds //

    fn parse_enum(&mut self) -> PR<ItemKind> {
        self.expect_kw(Kw::Enum)?;
        let name = self.expect_ident()?;
        let generics = self.parse_generics()?;
        self.expect(TokenKind::LBrace)?;
        let mut variants = Vec::new();
        while !self.check(TokenKind::RBrace) && !self.peek().is_eof() {
            variants.push(self.parse_variant());
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RBrace)?;
        Ok(ItemKind::Enum(EnumItem {
            name,
            generics,
            variants,
        }))
    }

    fn parse_variant(&mut self) -> PR<Variant> {
        let lo = self.peek().span;
        let name = self.expect_ident()?;
        let body = if self.check(TokenKind::LParen) {
            self.advance();
            let mut els = Vec::new();
            while !self.check(TokenKind::RParen) && !self.peek().is_eof() {
                els.push(self.parse_tuple_ty_el()?);
                if !self.eat(TokenKind::Comma) {
                    break;
                }
            }
            self.expect(TokenKind::RParen)?;
            VariantBody::Tuple(els)
        } else if self.check(TokenKind::LBrace) {
            VariantBody::Struct(self.parse_struct_fields()?)
        } else if self.eat(TokenKind::Assign) {
            VariantBody::Unit(Some(self.parse_anon_const()?))
        } else {
            VariantBody::Unit(None)
        };
        let span = lo.to(self.prev_span());
        Ok(Variant {
            id: self.next_id(),
            name,
            body,
            span,
        })
    }

    fn parse_tuple_ty_el(&mut self) -> PR<TupleTyEl> {
        let lo = self.peek().span;
        // `name: Ty` when an identifier is directly followed by `:`.
        let name = if self.peek().is_plain_ident() && self.lookahead(1) == TokenKind::Colon {
            let name = self.expect_ident()?;
            self.expect(TokenKind::Colon)?;
            Some(name)
        } else {
            None
        };
        let ty = self.parse_ty().map(Box::new);
        let span = lo.to(self.prev_span());
        Ok(TupleTyEl {
            id: self.next_id(),
            name,
            ty,
            span,
        })
    }

    fn parse_struct(&mut self) -> PR<ItemKind> {
        self.expect_kw(Kw::Struct)?;
        let name = self.expect_ident()?;
        let generics = self.parse_generics()?;
        let fields = self.parse_struct_fields()?;
        Ok(ItemKind::Struct(StructItem {
            name,
            generics,
            fields,
        }))
    }

    fn parse_struct_fields(&mut self) -> PR<Vec<StructField>> {
        self.expect(TokenKind::LBrace)?;
        let mut fields = Vec::new();
        while !self.check(TokenKind::RBrace) && !self.peek().is_eof() {
            let lo = self.peek().span;
            let vis = self.parse_vis();
            let name = self.expect_ident()?;
            self.expect(TokenKind::Colon)?;
            let ty = self.parse_ty().map(Box::new);
            let span = lo.to(self.prev_span());
            fields.push(StructField {
                id: self.next_id(),
                vis,
                name,
                ty,
                span,
            });
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RBrace)?;
        Ok(fields)
    }

    fn parse_trait(&mut self) -> PR<ItemKind> {
        self.expect_kw(Kw::Trait)?;
        let name = self.expect_ident()?;
        let generics = self.parse_generics()?;
        self.expect(TokenKind::LBrace)?;
        let members = self.parse_items_until(TokenKind::RBrace);
        self.expect(TokenKind::RBrace)?;
        Ok(ItemKind::Trait(TraitItem {
            name,
            generics,
            members,
        }))
    }

    fn parse_impl(&mut self) -> PR<ItemKind> {
        self.expect_kw(Kw::Impl)?;
        let generics = self.parse_generics()?;
        let first_ty = self.parse_ty().map(Box::new);
        let (trait_path, ty) = if self.eat_kw(Kw::For) {
            let trait_path = match first_ty {
                Ok(ty) => match ty.kind {
                    TyKind::Path(path) => Ok(path),
                    _ => {
                        MessageBuilder::error()
                            .text("`impl ... for` needs a trait path before `for`")
                            .primary(ty.span, "not a trait path")
                            .emit(&mut self.msg);
                        Err(jacy_ast::ErrorNode::new(ty.span))
                    }
                },
                Err(error) => Err(error),
            };
            (Some(trait_path), self.parse_ty().map(Box::new))
        } else {
            (None, first_ty)
        };
        self.expect(TokenKind::LBrace)?;
        let members = self.parse_items_until(TokenKind::RBrace);
        self.expect(TokenKind::RBrace)?;
        Ok(ItemKind::Impl(ImplItem {
            generics,
            trait_path,
            ty,
            members,
        }))
    }

    fn parse_func(&mut self) -> PR<FuncItem> {
        self.expect_kw(Kw::Fn)?;
        let name = self.expect_ident()?;
        self.parse_func_rest(name)
    }

    /// `init` constructors share the function grammar; the name is
    /// the `init` keyword itself.
    fn parse_init(&mut self) -> PR<FuncItem> {
        let span = self.expect_kw(Kw::Init)?;
        let id = self.next_id();
        let name = Ident::new(id, self.interner.kw(Kw::Init), span);
        self.parse_func_rest(name)
    }

    fn parse_func_rest(&mut self, name: Ident) -> PR<FuncItem> {
        let generics = self.parse_generics()?;
        let sig = self.parse_func_sig()?;
        let body = self.parse_func_body()?;
        Ok(FuncItem {
            name,
            generics,
            sig,
            body,
        })
    }

    fn parse_func_sig(&mut self) -> PR<FuncSig> {
        let lo = self.peek().span;
        self.expect(TokenKind::LParen)?;
        let mut params = Vec::new();
        while !self.check(TokenKind::RParen) && !self.peek().is_eof() {
            params.push(self.parse_func_param()?);
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        let rparen = self.expect(TokenKind::RParen)?;
        let ret_ty = if self.eat(TokenKind::Arrow) {
            FuncRetTy::Some(Box::new(match self.parse_ty() {
                Ok(ty) => ty,
                Err(error) => {
                    return Err(error);
                }
            }))
        } else {
            // Elided: unit, recorded at the closing paren.
            FuncRetTy::Default(rparen.from_start_to(0))
        };
        let span = lo.to(self.prev_span());
        Ok(FuncSig {
            params,
            ret_ty,
            span,
        })
    }

    fn parse_func_param(&mut self) -> PR<FuncParam> {
        let lo = self.peek().span;
        // `label name: Ty`: two adjacent identifiers make the first
        // one the external label.
        let label = if self.peek().is_plain_ident()
            && matches!(self.lookahead(1), TokenKind::Id(sym) if !sym.is_kw())
        {
            Some(self.expect_ident()?)
        } else {
            None
        };
        let pat = self.parse_pat_single();
        self.expect(TokenKind::Colon)?;
        let ty = self.parse_ty().map(Box::new);
        let default = if self.eat(TokenKind::Assign) {
            Some(self.parse_anon_const()?)
        } else {
            None
        };
        let span = lo.to(self.prev_span());
        Ok(FuncParam {
            id: self.next_id(),
            label,
            pat,
            ty,
            default,
            span,
        })
    }

    /// `= expr;`, a block, or no body at all (trait declarations).
    fn parse_func_body(&mut self) -> PR<Option<Body>> {
        if self.eat(TokenKind::Semi) {
            return Ok(None);
        }
        if self.eat(TokenKind::Assign) {
            let value = self.parse_expr().map(Box::new);
            self.eat(TokenKind::Semi);
            let id = self.next_id();
            return Ok(Some(Body {
                id,
                expr_body: true,
                value,
            }));
        }
        if self.check(TokenKind::LBrace) {
            let value = self.parse_block_expr().map(Box::new);
            let id = self.next_id();
            return Ok(Some(Body {
                id,
                expr_body: false,
                value,
            }));
        }
        Err(self.expected("a function body, `=` or `;`"))
    }

    fn parse_mod(&mut self) -> PR<ItemKind> {
        self.expect_kw(Kw::Mod)?;
        let name = self.expect_ident()?;
        self.expect(TokenKind::LBrace)?;
        let items = self.parse_items_until(TokenKind::RBrace);
        self.expect(TokenKind::RBrace)?;
        Ok(ItemKind::Mod(ModItem { name, items }))
    }

    fn parse_type_alias(&mut self) -> PR<ItemKind> {
        self.expect_kw(Kw::Type)?;
        let name = self.expect_ident()?;
        let generics = self.parse_generics()?;
        let ty = if self.eat(TokenKind::Assign) {
            Some(self.parse_ty().map(Box::new))
        } else {
            None
        };
        self.expect(TokenKind::Semi)?;
        Ok(ItemKind::TypeAlias(TypeAliasItem { name, generics, ty }))
    }

    fn parse_use_decl(&mut self) -> PR<ItemKind> {
        self.expect_kw(Kw::Use)?;
        let use_tree = self.parse_use_tree();
        self.expect(TokenKind::Semi)?;
        Ok(ItemKind::Use(UseDeclItem { use_tree }))
    }

    /// `UseTree ::= SimplePath? ("*" | "{" UseTree ("," UseTree)* ","? "}" | "as" Ident)?`
    pub(crate) fn parse_use_tree(&mut self) -> PR<UseTree> {
        let lo = self.peek().span;

        // Prefix-less glob / specifics.
        if self.eat(TokenKind::Mul) {
            let span = lo.to(self.prev_span());
            let id = self.next_id();
            return Ok(UseTree {
                id,
                kind: UseTreeKind::All(None),
                span,
            });
        }
        if self.check(TokenKind::LBrace) {
            let trees = self.parse_use_specifics()?;
            let span = lo.to(self.prev_span());
            let id = self.next_id();
            return Ok(UseTree {
                id,
                kind: UseTreeKind::Specific(None, trees),
                span,
            });
        }

        let path = self.parse_use_path()?;
        let kind = if self.check(TokenKind::Path) {
            // `::*` or `::{...}` after the prefix.
            self.advance();
            if self.eat(TokenKind::Mul) {
                UseTreeKind::All(Some(path))
            } else if self.check(TokenKind::LBrace) {
                UseTreeKind::Specific(Some(path), self.parse_use_specifics()?)
            } else {
                return Err(self.expected("`*` or `{` after `::` in use declaration"));
            }
        } else if self.eat_kw(Kw::As) {
            UseTreeKind::Rebind(path, self.expect_ident()?)
        } else {
            UseTreeKind::Raw(path)
        };
        let span = lo.to(self.prev_span());
        let id = self.next_id();
        Ok(UseTree { id, kind, span })
    }

    fn parse_use_specifics(&mut self) -> PR<Vec<PR<UseTree>>> {
        self.expect(TokenKind::LBrace)?;
        let mut trees = Vec::new();
        while !self.check(TokenKind::RBrace) && !self.peek().is_eof() {
            trees.push(self.parse_use_tree());
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RBrace)?;
        Ok(trees)
    }

    /// Attribute names share the use-prefix grammar.
    pub(crate) fn parse_simple_path(&mut self) -> PR<jacy_ast::SimplePath> {
        self.parse_use_path()
    }

    /// A use-tree prefix: a simple path that stops before `::*` and
    /// `::{`.
    fn parse_use_path(&mut self) -> PR<jacy_ast::SimplePath> {
        let lo = self.peek().span;
        let global = self.check(TokenKind::Path)
            && matches!(self.lookahead(1), TokenKind::Id(_));
        if global {
            self.advance();
        }
        let mut segs = smallvec::SmallVec::new();
        loop {
            let seg_lo = self.peek().span;
            let ident = self.expect_use_seg_ident()?;
            let id = self.next_id();
            segs.push(jacy_ast::SimplePathSeg {
                id,
                ident,
                span: seg_lo,
            });
            if self.check(TokenKind::Path)
                && matches!(self.lookahead(1), TokenKind::Id(sym)
                    if !sym.is_kw() || sym.is_specific_kw(Kw::Super) || sym.is_specific_kw(Kw::Party))
            {
                self.advance();
            } else {
                break;
            }
        }
        let span = lo.to(self.prev_span());
        let id = self.next_id();
        Ok(jacy_ast::SimplePath {
            id,
            global,
            segs,
            span,
        })
    }

    /// Segment identifier in a use path; `super` and `party` are
    /// allowed as leading segments.
    fn expect_use_seg_ident(&mut self) -> PR<Ident> {
        let token = self.peek();
        match token.as_ident() {
            Some(sym)
                if !sym.is_kw()
                    || sym.is_specific_kw(Kw::Super)
                    || sym.is_specific_kw(Kw::Party) =>
            {
                self.advance();
                let id = self.next_id();
                Ok(Ident::new(id, sym, token.span))
            }
            _ => Err(self.expected("identifier")),
        }
    }

    // Generics //

    /// Generic parameter declarations, `<T: Bound, 'a, const N: int>`.
    pub(crate) fn parse_generics(&mut self) -> PR<Vec<GenericParam>> {
        if !self.eat(TokenKind::Lt) {
            return Ok(Vec::new());
        }
        let mut params = Vec::new();
        loop {
            if self.eat_gt() {
                break;
            }
            let lo = self.peek().span;
            let kind = match self.peek_kind() {
                TokenKind::Lifetime(sym) => {
                    let span = self.advance().span;
                    let id = self.next_id();
                    // Name span excludes the quote.
                    let name_span = jacy_span::Span::new(span.pos + 1, span.len - 1, span.file);
                    GenericParamKind::Lifetime {
                        name: Ident::new(id, sym, name_span),
                    }
                }
                _ if self.peek().is_kw(Kw::Const) => {
                    self.advance();
                    let name = self.expect_ident()?;
                    self.expect(TokenKind::Colon)?;
                    let ty = Box::new(self.parse_ty()?);
                    let default = if self.eat(TokenKind::Assign) {
                        Some(self.parse_anon_const()?)
                    } else {
                        None
                    };
                    GenericParamKind::Const { name, ty, default }
                }
                _ => {
                    let name = self.expect_ident()?;
                    let bound = if self.eat(TokenKind::Colon) {
                        Some(Box::new(self.parse_ty()?))
                    } else {
                        None
                    };
                    GenericParamKind::Type { name, bound }
                }
            };
            let span = lo.to(self.prev_span());
            let id = self.next_id();
            params.push(GenericParam { id, kind, span });
            if !self.eat(TokenKind::Comma) {
                if !self.eat_gt() {
                    return Err(self.expected("`,` or `>` in generic parameter list"));
                }
                break;
            }
        }
        Ok(params)
    }

    pub(crate) fn parse_anon_const(&mut self) -> PR<AnonConst> {
        let expr = self.parse_expr()?;
        let id = self.next_id();
        Ok(AnonConst {
            id,
            expr: Box::new(expr),
        })
    }
}
