//! Type grammar and path parsing (shared with expressions).

use jacy_ast::{Expr, ExprKind, GenericArg, Ident, Path, PathSeg, Ty, TyKind, PR};
use jacy_lexer::TokenKind;
use jacy_message::MessageBuilder;
use jacy_span::Kw;
use smallvec::SmallVec;

use crate::parser::Parser;

impl<'a> Parser<'a> {
    pub(crate) fn parse_ty(&mut self) -> PR<Ty> {
        let lo = self.peek().span;
        let kind = match self.peek_kind() {
            TokenKind::LParen => self.parse_paren_ty()?,
            TokenKind::LBracket => {
                self.advance();
                let ty = self.parse_ty().map(Box::new);
                let kind = if self.eat(TokenKind::Semi) {
                    let size = self.parse_anon_const()?;
                    TyKind::Array { ty, size }
                } else {
                    TyKind::Slice(ty)
                };
                self.expect(TokenKind::RBracket)?;
                kind
            }
            TokenKind::Path | TokenKind::Id(_) => TyKind::Path(self.parse_path(false)?),
            _ => return Err(self.expected("a type")),
        };
        let span = lo.to(self.prev_span());
        let id = self.next_id();
        Ok(Ty { id, kind, span })
    }

    /// `()`, `(T)`, `(A, B)`, and function types `(A, B) -> R`.
    fn parse_paren_ty(&mut self) -> PR<TyKind> {
        self.expect(TokenKind::LParen)?;
        let mut els: Vec<PR<Ty>> = Vec::new();
        let mut trailing_comma = false;
        while !self.check(TokenKind::RParen) && !self.peek().is_eof() {
            els.push(self.parse_ty());
            trailing_comma = self.eat(TokenKind::Comma);
            if !trailing_comma {
                break;
            }
        }
        self.expect(TokenKind::RParen)?;
        if self.eat(TokenKind::Arrow) {
            let ret = self.parse_ty().map(Box::new);
            return Ok(TyKind::Func { params: els, ret });
        }
        Ok(match els.len() {
            0 => TyKind::Unit,
            1 if !trailing_comma => TyKind::Paren(els.pop().unwrap().map(Box::new)),
            _ => TyKind::Tuple(els),
        })
    }

    // Paths //

    /// `Path ::= "::"? PathSeg ("::" PathSeg)*`.
    ///
    /// In type context (`in_expr == false`) a segment takes generic
    /// arguments directly (`Foo<T>`); in expression context they need
    /// a turbofish (`Foo::<T>`) confirmed by the speculative scan.
    pub(crate) fn parse_path(&mut self, in_expr: bool) -> PR<Path> {
        let lo = self.peek().span;
        let global = self.check(TokenKind::Path) && self.seg_ident_ahead(1);
        if global {
            self.advance();
        }
        let mut segs: SmallVec<[PathSeg; 2]> = SmallVec::new();
        loop {
            let seg_lo = self.peek().span;
            let ident = self.expect_path_seg_ident()?;
            let generics = self.parse_seg_generics(in_expr)?;
            let span = seg_lo.to(self.prev_span());
            let id = self.next_id();

            let continues = self.check(TokenKind::Path) && self.seg_ident_ahead(1);
            if continues && generics.is_some() {
                MessageBuilder::error()
                    .text("generic arguments are not allowed on intermediate path segments")
                    .primary(span, "only the final segment takes generics")
                    .emit(&mut self.msg);
            }
            segs.push(PathSeg {
                id,
                ident,
                generics,
                span,
            });
            if continues {
                self.advance();
            } else {
                break;
            }
        }
        let span = lo.to(self.prev_span());
        let id = self.next_id();
        Ok(Path {
            id,
            global,
            segs,
            span,
        })
    }

    fn seg_ident_ahead(&self, n: usize) -> bool {
        matches!(self.lookahead(n), TokenKind::Id(sym)
            if !sym.is_kw() || sym.is_specific_kw(Kw::Super) || sym.is_specific_kw(Kw::Party))
    }

    fn expect_path_seg_ident(&mut self) -> PR<Ident> {
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

    fn parse_seg_generics(&mut self, in_expr: bool) -> PR<Option<Vec<GenericArg>>> {
        if in_expr {
            // Turbofish only: `::` then `<`, with the speculative scan
            // confirming a balanced argument list. Without the
            // confirmation `<` stays a comparison.
            if self.check(TokenKind::Path) && self.lookahead(1) == TokenKind::Lt {
                if self.speculate_generic_args(self.index + 1) {
                    self.advance();
                    return Ok(Some(self.parse_generic_args()?));
                }
                let span = self.peek().span;
                MessageBuilder::error()
                    .text("ambiguous angle bracket after `::`")
                    .primary(span, "cannot be parsed as generic arguments")
                    .emit(&mut self.msg);
            }
            Ok(None)
        } else if self.check(TokenKind::Lt) {
            Ok(Some(self.parse_generic_args()?))
        } else {
            Ok(None)
        }
    }

    /// The one speculative lookahead: from a `<` at `start`, confirm a
    /// matching `>` with balanced nesting before any token that could
    /// not appear in a generic argument list.
    pub(crate) fn speculate_generic_args(&self, start: usize) -> bool {
        debug_assert_eq!(self.lookahead(start - self.index), TokenKind::Lt);
        let mut depth = 0i32;
        let mut offset = start;
        loop {
            let kind = self.tokens[offset.min(self.tokens.len() - 1)].kind;
            match kind {
                TokenKind::Lt => depth += 1,
                TokenKind::Gt => depth -= 1,
                TokenKind::Shr => depth -= 2,
                TokenKind::Ge | TokenKind::ShrAssign => depth -= 1,
                TokenKind::Id(_)
                | TokenKind::Lifetime(_)
                | TokenKind::Lit(_)
                | TokenKind::Comma
                | TokenKind::Path
                | TokenKind::Colon
                | TokenKind::Arrow
                | TokenKind::LParen
                | TokenKind::RParen
                | TokenKind::LBracket
                | TokenKind::RBracket
                | TokenKind::Semi => {}
                // Anything that cannot appear in a generic argument
                // list, Eof included.
                _ => return false,
            }
            if depth == 0 {
                return true;
            }
            if depth < 0 {
                return false;
            }
            offset += 1;
        }
    }

    /// `<` args `>`, with `>`-splitting for nested closers.
    pub(crate) fn parse_generic_args(&mut self) -> PR<Vec<GenericArg>> {
        self.expect(TokenKind::Lt)?;
        let mut args = Vec::new();
        loop {
            if self.eat_gt() {
                break;
            }
            let arg = match self.peek_kind() {
                TokenKind::Lifetime(sym) => {
                    let span = self.advance().span;
                    let id = self.next_id();
                    let name_span = jacy_span::Span::new(span.pos + 1, span.len - 1, span.file);
                    GenericArg::Lifetime(Ident::new(id, sym, name_span))
                }
                TokenKind::Lit(_) => {
                    let expr = self.parse_lit_expr()?;
                    let id = self.next_id();
                    GenericArg::Const(jacy_ast::AnonConst {
                        id,
                        expr: Box::new(expr),
                    })
                }
                _ => GenericArg::Type(Box::new(self.parse_ty()?)),
            };
            args.push(arg);
            if !self.eat(TokenKind::Comma) {
                if !self.eat_gt() {
                    return Err(self.expected("`,` or `>` in generic argument list"));
                }
                break;
            }
        }
        Ok(args)
    }

    /// A literal in expression position, decoding the token.
    pub(crate) fn parse_lit_expr(&mut self) -> PR<Expr> {
        let token = self.peek();
        let Some(lit) = token.as_lit() else {
            return Err(self.expected("literal"));
        };
        self.advance();
        let value = match jacy_ast::LitValue::from_token(lit, self.interner) {
            Ok(value) => value,
            Err(jacy_ast::LitDecodeError::OutOfRange) => {
                // Deferred diagnostic; the node survives with a zero
                // value so later stages keep going.
                MessageBuilder::error()
                    .text("integer literal out of range for 64 bits")
                    .primary(token.span, "too large")
                    .emit(&mut self.msg);
                jacy_ast::LitValue::Int {
                    val: 0,
                    kind: jacy_ast::IntKind::Unset,
                }
            }
        };
        let id = self.next_id();
        Ok(Expr {
            id,
            kind: ExprKind::Lit(value),
            span: token.span,
        })
    }
}
