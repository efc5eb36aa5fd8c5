//! Pattern grammar.

use jacy_ast::{Pat, PatKind, StructPatField, PR};
use jacy_lexer::TokenKind;
use jacy_message::MessageBuilder;
use jacy_span::Kw;

use crate::parser::Parser;

impl<'a> Parser<'a> {
    /// Full pattern, including multi-patterns `p1 | p2`.
    pub(crate) fn parse_pat(&mut self) -> PR<Pat> {
        let lo = self.peek().span;
        let first = self.parse_pat_single()?;
        if !self.check(TokenKind::BitOr) {
            return Ok(first);
        }
        let mut els = vec![Ok(first)];
        while self.eat(TokenKind::BitOr) {
            els.push(self.parse_pat_single());
        }
        let span = lo.to(self.prev_span());
        let id = self.next_id();
        Ok(Pat {
            id,
            kind: PatKind::Multi(els),
            span,
        })
    }

    /// One alternative of a pattern.
    pub(crate) fn parse_pat_single(&mut self) -> PR<Pat> {
        let token = self.peek();
        let lo = token.span;

        if token.as_lit().is_some() {
            let expr = self.parse_lit_expr()?;
            let lit = match expr.kind {
                jacy_ast::ExprKind::Lit(lit) => lit,
                _ => unreachable!(),
            };
            let id = self.next_id();
            return Ok(Pat {
                id,
                kind: PatKind::Lit(lit),
                span: lo,
            });
        }

        let kind = match self.peek_kind() {
            TokenKind::Ampersand => {
                self.advance();
                let mutable = self.eat_kw(Kw::Mut);
                PatKind::Ref {
                    mutable,
                    pat: self.parse_pat_single().map(Box::new),
                }
            }
            TokenKind::LParen => return self.parse_tuple_pat(),
            TokenKind::LBracket => return self.parse_slice_pat(),
            TokenKind::Id(sym) if sym.is_specific_kw(Kw::Ref) || sym.is_specific_kw(Kw::Mut) => {
                return self.parse_binding_pat();
            }
            TokenKind::Id(sym) if !sym.is_kw() => return self.parse_name_pat(),
            TokenKind::Id(sym)
                if sym.is_specific_kw(Kw::Super) || sym.is_specific_kw(Kw::Party) =>
            {
                return self.parse_name_pat();
            }
            TokenKind::Path => return self.parse_name_pat(),
            _ => return Err(self.expected("a pattern")),
        };
        let span = lo.to(self.prev_span());
        let id = self.next_id();
        Ok(Pat { id, kind, span })
    }

    /// `ref`/`mut` prefixed identifier binding with optional
    /// sub-pattern.
    fn parse_binding_pat(&mut self) -> PR<Pat> {
        let lo = self.peek().span;
        let reference = self.eat_kw(Kw::Ref);
        let mutable = self.eat_kw(Kw::Mut);
        let name = self.expect_ident()?;
        let sub = if self.eat(TokenKind::At) {
            Some(self.parse_pat_single().map(Box::new))
        } else {
            None
        };
        let span = lo.to(self.prev_span());
        let id = self.next_id();
        Ok(Pat {
            id,
            kind: PatKind::Ident {
                reference,
                mutable,
                name,
                sub,
            },
            span,
        })
    }

    /// A pattern starting with a name: `_`, a binding, a path, or a
    /// struct pattern.
    fn parse_name_pat(&mut self) -> PR<Pat> {
        let lo = self.peek().span;

        // `_` and plain single-segment lowercase names are bindings
        // unless a path or struct body follows.
        let path_follows = matches!(self.lookahead(1), TokenKind::Path)
            || matches!(self.lookahead(1), TokenKind::LBrace);
        if !path_follows && !self.check(TokenKind::Path) {
            let name = self.expect_ident()?;
            if self.interner.with_resolved(name.sym, |s| s == "_") == Some(true) {
                let span = lo;
                let id = self.next_id();
                return Ok(Pat {
                    id,
                    kind: PatKind::Wildcard,
                    span,
                });
            }
            let sub = if self.eat(TokenKind::At) {
                Some(self.parse_pat_single().map(Box::new))
            } else {
                None
            };
            let span = lo.to(self.prev_span());
            let id = self.next_id();
            return Ok(Pat {
                id,
                kind: PatKind::Ident {
                    reference: false,
                    mutable: false,
                    name,
                    sub,
                },
                span,
            });
        }

        let path = self.parse_path(true)?;
        if self.check(TokenKind::LBrace) {
            return self.parse_struct_pat(lo, path);
        }
        let span = lo.to(self.prev_span());
        let id = self.next_id();
        Ok(Pat {
            id,
            kind: PatKind::Path(path),
            span,
        })
    }

    fn parse_struct_pat(&mut self, lo: jacy_span::Span, path: jacy_ast::Path) -> PR<Pat> {
        self.expect(TokenKind::LBrace)?;
        let mut fields = Vec::new();
        let mut rest = false;
        while !self.check(TokenKind::RBrace) && !self.peek().is_eof() {
            if self.check(TokenKind::Range) {
                let rest_span = self.advance().span;
                if rest {
                    MessageBuilder::error()
                        .text("`..` can appear only once in a struct pattern")
                        .primary(rest_span, "duplicate rest")
                        .emit(&mut self.msg);
                }
                rest = true;
                if !self.check(TokenKind::RBrace) {
                    MessageBuilder::error()
                        .text("`..` must be the last entry of a struct pattern")
                        .primary(rest_span, "move this to the end")
                        .emit(&mut self.msg);
                }
                self.eat(TokenKind::Comma);
                continue;
            }
            let field_lo = self.peek().span;
            let name = self.expect_ident()?;
            let pat = if self.eat(TokenKind::Colon) {
                Some(self.parse_pat().map(Box::new))
            } else {
                None
            };
            let span = field_lo.to(self.prev_span());
            let id = self.next_id();
            fields.push(StructPatField {
                id,
                name,
                pat,
                span,
            });
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RBrace)?;
        let span = lo.to(self.prev_span());
        let id = self.next_id();
        Ok(Pat {
            id,
            kind: PatKind::Struct { path, fields, rest },
            span,
        })
    }

    /// Tuple pattern with at most one `..`, whose position is
    /// recorded; the rest slot itself is stored as a wildcard.
    fn parse_tuple_pat(&mut self) -> PR<Pat> {
        let lo = self.expect(TokenKind::LParen)?;
        let mut els: Vec<PR<Pat>> = Vec::new();
        let mut rest_pat_index = None;
        while !self.check(TokenKind::RParen) && !self.peek().is_eof() {
            if self.check(TokenKind::Range) {
                let rest_span = self.advance().span;
                if rest_pat_index.is_some() {
                    MessageBuilder::error()
                        .text("`..` can appear only once in a tuple pattern")
                        .primary(rest_span, "second rest pattern")
                        .emit(&mut self.msg);
                } else {
                    rest_pat_index = Some(els.len());
                    let id = self.next_id();
                    els.push(Ok(Pat {
                        id,
                        kind: PatKind::Wildcard,
                        span: rest_span,
                    }));
                }
            } else {
                els.push(self.parse_pat());
            }
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RParen)?;
        let span = lo.to(self.prev_span());
        let id = self.next_id();
        Ok(Pat {
            id,
            kind: PatKind::Tuple {
                els,
                rest_pat_index,
            },
            span,
        })
    }

    /// Slice pattern partitioned into before/rest/after.
    fn parse_slice_pat(&mut self) -> PR<Pat> {
        let lo = self.expect(TokenKind::LBracket)?;
        let mut before = Vec::new();
        let mut rest = None;
        let mut after = Vec::new();
        while !self.check(TokenKind::RBracket) && !self.peek().is_eof() {
            if self.check(TokenKind::Range) {
                let rest_span = self.advance().span;
                if rest.is_some() {
                    MessageBuilder::error()
                        .text("`..` can appear only once in a slice pattern")
                        .primary(rest_span, "second rest pattern")
                        .emit(&mut self.msg);
                } else {
                    rest = Some(rest_span);
                }
            } else {
                let pat = self.parse_pat();
                if rest.is_some() {
                    after.push(pat);
                } else {
                    before.push(pat);
                }
            }
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RBracket)?;
        let span = lo.to(self.prev_span());
        let id = self.next_id();
        Ok(Pat {
            id,
            kind: PatKind::Slice {
                before,
                rest,
                after,
            },
            span,
        })
    }
}
