//! Expression grammar: precedence climbing plus primaries.

use jacy_ast::{
    AssignOp, BinOp, Block, Expr, ExprKind, Lambda, LambdaParam, LetStmt, MatchArm, PrefixOp,
    Stmt, StmtKind, StructExprField, StructExprFieldKind, PR,
};
use jacy_lexer::TokenKind;
use jacy_message::MessageBuilder;
use jacy_span::{Kw, Span};

use crate::parser::Parser;

/// Infix level right above assignment; the climbing loop starts here.
const MIN_INFIX_PREC: u8 = 2;

impl<'a> Parser<'a> {
    // Statements and blocks //

    pub(crate) fn parse_block(&mut self) -> PR<Block> {
        let lo = self.expect(TokenKind::LBrace)?;
        let mut stmts = Vec::new();
        while !self.check(TokenKind::RBrace) && !self.peek().is_eof() {
            stmts.push(self.parse_stmt());
            // Recovery may stop right before `}`; stray semicolons
            // between statements are tolerated.
            while self.eat(TokenKind::Semi) {}
        }
        let hi = self.expect(TokenKind::RBrace)?;
        let id = self.next_id();
        Ok(Block {
            id,
            stmts,
            span: lo.to(hi),
        })
    }

    pub(crate) fn parse_block_expr(&mut self) -> PR<Expr> {
        let block = self.parse_block()?;
        let span = block.span;
        let id = self.next_id();
        Ok(Expr {
            id,
            kind: ExprKind::Block(block),
            span,
        })
    }

    pub(crate) fn parse_stmt(&mut self) -> PR<Stmt> {
        let lo = self.peek().span;
        if self.peek().is_kw(Kw::Let) {
            return self.parse_let_stmt();
        }
        if self.is_item_start() {
            let item = match self.parse_item() {
                Some(item) => item.map(Box::new),
                None => Err(self.expected("an item")),
            };
            let span = lo.to(self.prev_span());
            let id = self.next_id();
            return Ok(Stmt {
                id,
                kind: StmtKind::Item(item),
                span,
            });
        }
        let expr = self.with_struct_lit(|p| p.parse_expr()).map(Box::new);
        self.eat(TokenKind::Semi);
        let span = lo.to(self.prev_span());
        let id = self.next_id();
        Ok(Stmt {
            id,
            kind: StmtKind::Expr(expr),
            span,
        })
    }

    fn parse_let_stmt(&mut self) -> PR<Stmt> {
        let lo = self.expect_kw(Kw::Let)?;
        let pat = self.parse_pat().map(Box::new);
        let ty = if self.eat(TokenKind::Colon) {
            Some(self.parse_ty().map(Box::new))
        } else {
            None
        };
        let value = if self.eat(TokenKind::Assign) {
            Some(self.with_struct_lit(|p| p.parse_expr()).map(Box::new))
        } else {
            None
        };
        self.expect(TokenKind::Semi)?;
        let span = lo.to(self.prev_span());
        let id = self.next_id();
        Ok(Stmt {
            id,
            kind: StmtKind::Let(LetStmt { pat, ty, value }),
            span,
        })
    }

    // Precedence levels //

    /// Entry point: assignment level, right-associative.
    pub(crate) fn parse_expr(&mut self) -> PR<Expr> {
        let lo = self.peek().span;
        let lhs = self.parse_infix(MIN_INFIX_PREC)?;
        let Some(op) = assign_op_of(self.peek_kind()) else {
            return Ok(lhs);
        };
        self.advance();
        let rhs = self.parse_expr().map(Box::new);
        let span = lo.to(self.prev_span());
        let id = self.next_id();
        Ok(Expr {
            id,
            kind: ExprKind::Assign {
                lhs: Ok(Box::new(lhs)),
                op,
                rhs,
            },
            span,
        })
    }

    /// Precedence-climbing loop over the infix table. All levels are
    /// parsed left-associatively; comparison chains additionally get
    /// a diagnostic.
    fn parse_infix(&mut self, min_prec: u8) -> PR<Expr> {
        let lo = self.peek().span;
        let mut lhs = self.parse_cast()?;
        loop {
            let Some(op) = bin_op_of(self.peek_kind()) else {
                break;
            };
            let prec = op.precedence();
            if prec < min_prec {
                break;
            }
            if op.is_comparison() && is_comparison_expr(&lhs) {
                MessageBuilder::warn()
                    .text("comparison operators cannot be chained")
                    .primary(self.peek().span, "chained comparison")
                    .help(Span::DUMMY, "split the comparison or parenthesize one side")
                    .emit(&mut self.msg);
            }
            self.advance();
            let rhs = self.parse_infix(prec + 1).map(Box::new);
            let span = lo.to(self.prev_span());
            let id = self.next_id();
            lhs = Expr {
                id,
                kind: ExprKind::Infix {
                    lhs: Ok(Box::new(lhs)),
                    op,
                    rhs,
                },
                span,
            };
        }
        Ok(lhs)
    }

    /// `expr as Type`, binding tighter than any infix operator.
    fn parse_cast(&mut self) -> PR<Expr> {
        let lo = self.peek().span;
        let mut lhs = self.parse_prefix()?;
        while self.eat_kw(Kw::As) {
            let ty = self.parse_ty().map(Box::new);
            let span = lo.to(self.prev_span());
            let id = self.next_id();
            lhs = Expr {
                id,
                kind: ExprKind::Cast {
                    lhs: Ok(Box::new(lhs)),
                    ty,
                },
                span,
            };
        }
        Ok(lhs)
    }

    fn parse_prefix(&mut self) -> PR<Expr> {
        let lo = self.peek().span;
        let kind = match self.peek_kind() {
            TokenKind::Minus => {
                self.advance();
                ExprKind::Prefix {
                    op: PrefixOp::Neg,
                    rhs: self.parse_prefix().map(Box::new),
                }
            }
            _ if self.peek().is_kw(Kw::Not) => {
                self.advance();
                ExprKind::Prefix {
                    op: PrefixOp::Not,
                    rhs: self.parse_prefix().map(Box::new),
                }
            }
            TokenKind::Ampersand => {
                self.advance();
                let mutable = self.eat_kw(Kw::Mut);
                ExprKind::Borrow {
                    mutable,
                    rhs: self.parse_prefix().map(Box::new),
                }
            }
            // `&&x` lexes as one token; it is a borrow of a borrow.
            TokenKind::And => {
                self.advance();
                let mutable = self.eat_kw(Kw::Mut);
                let inner = self.parse_prefix().map(Box::new);
                let span = lo.to(self.prev_span());
                let inner_id = self.next_id();
                ExprKind::Borrow {
                    mutable: false,
                    rhs: Ok(Box::new(Expr {
                        id: inner_id,
                        kind: ExprKind::Borrow {
                            mutable,
                            rhs: inner,
                        },
                        span: Span::new(span.pos + 1, span.len - 1, span.file),
                    })),
                }
            }
            TokenKind::Mul => {
                self.advance();
                ExprKind::Deref {
                    rhs: self.parse_prefix().map(Box::new),
                }
            }
            _ => return self.parse_postfix(),
        };
        let span = lo.to(self.prev_span());
        let id = self.next_id();
        Ok(Expr { id, kind, span })
    }

    fn parse_postfix(&mut self) -> PR<Expr> {
        let lo = self.peek().span;
        let mut expr = self.parse_primary()?;
        loop {
            let kind = match self.peek_kind() {
                TokenKind::Dot => {
                    self.advance();
                    let field = self.expect_ident()?;
                    ExprKind::Field {
                        lhs: Ok(Box::new(expr)),
                        field,
                    }
                }
                TokenKind::LParen => {
                    let args = self.parse_call_args()?;
                    ExprKind::Invoke {
                        callee: Ok(Box::new(expr)),
                        args,
                    }
                }
                TokenKind::LBracket => {
                    self.advance();
                    let index = self.with_struct_lit(|p| p.parse_expr()).map(Box::new);
                    self.expect(TokenKind::RBracket)?;
                    ExprKind::Subscript {
                        lhs: Ok(Box::new(expr)),
                        index,
                    }
                }
                TokenKind::Quest => {
                    self.advance();
                    ExprKind::Quest {
                        lhs: Ok(Box::new(expr)),
                    }
                }
                _ => break,
            };
            let span = lo.to(self.prev_span());
            let id = self.next_id();
            expr = Expr { id, kind, span };
        }
        Ok(expr)
    }

    fn parse_call_args(&mut self) -> PR<Vec<PR<Expr>>> {
        self.expect(TokenKind::LParen)?;
        let mut args = Vec::new();
        while !self.check(TokenKind::RParen) && !self.peek().is_eof() {
            let arg = self.with_struct_lit(|p| {
                if p.check(TokenKind::Range) {
                    p.parse_spread()
                } else {
                    p.parse_expr()
                }
            });
            args.push(arg);
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RParen)?;
        Ok(args)
    }

    fn parse_spread(&mut self) -> PR<Expr> {
        let lo = self.expect(TokenKind::Range)?;
        let rhs = self.parse_expr().map(Box::new);
        let span = lo.to(self.prev_span());
        let id = self.next_id();
        Ok(Expr {
            id,
            kind: ExprKind::Spread { rhs },
            span,
        })
    }

    // Primaries //

    fn parse_primary(&mut self) -> PR<Expr> {
        let token = self.peek();
        let lo = token.span;

        if token.as_lit().is_some() {
            return self.parse_lit_expr();
        }
        if token.is_kw(Kw::If) {
            return self.parse_if_expr();
        }
        if token.is_kw(Kw::Match) {
            return self.parse_match_expr();
        }
        if token.is_kw(Kw::Loop) {
            self.advance();
            let body = self.parse_block()?;
            return Ok(self.finish_expr(lo, ExprKind::Loop { body }));
        }
        if token.is_kw(Kw::While) {
            self.advance();
            let cond = self.without_struct_lit(|p| p.parse_expr()).map(Box::new);
            let body = self.parse_block()?;
            return Ok(self.finish_expr(lo, ExprKind::While { cond, body }));
        }
        if token.is_kw(Kw::For) {
            self.advance();
            let pat = self.parse_pat().map(Box::new);
            self.expect_kw(Kw::In)?;
            let iter = self.without_struct_lit(|p| p.parse_expr()).map(Box::new);
            let body = self.parse_block()?;
            return Ok(self.finish_expr(lo, ExprKind::For { pat, iter, body }));
        }
        if token.is_kw(Kw::Return) {
            self.advance();
            let value = self.parse_trailing_value();
            return Ok(self.finish_expr(lo, ExprKind::Return { value }));
        }
        if token.is_kw(Kw::Break) {
            self.advance();
            let value = self.parse_trailing_value();
            return Ok(self.finish_expr(lo, ExprKind::Break { value }));
        }
        if token.is_kw(Kw::Continue) {
            self.advance();
            return Ok(self.finish_expr(lo, ExprKind::Continue));
        }
        if token.is_kw(Kw::SelfValue) || token.is_kw(Kw::This) {
            self.advance();
            return Ok(self.finish_expr(lo, ExprKind::SelfExpr));
        }

        match self.peek_kind() {
            TokenKind::Id(_) | TokenKind::Path => self.parse_path_like_expr(),
            TokenKind::LParen => self.parse_paren_expr(),
            TokenKind::LBrace => self.parse_block_expr(),
            TokenKind::BitOr | TokenKind::Or => self.parse_lambda(),
            _ => Err(self.expected("an expression")),
        }
    }

    fn finish_expr(&mut self, lo: Span, kind: ExprKind) -> Expr {
        let span = lo.to(self.prev_span());
        let id = self.next_id();
        Expr { id, kind, span }
    }

    /// `return`/`break` take a value only when one can start here.
    fn parse_trailing_value(&mut self) -> Option<PR<Box<Expr>>> {
        match self.peek_kind() {
            TokenKind::Semi
            | TokenKind::RBrace
            | TokenKind::RParen
            | TokenKind::RBracket
            | TokenKind::Comma
            | TokenKind::Eof => None,
            _ => Some(self.parse_expr().map(Box::new)),
        }
    }

    /// A path expression, possibly a struct literal when `{` follows
    /// and the context allows it.
    fn parse_path_like_expr(&mut self) -> PR<Expr> {
        let lo = self.peek().span;
        let path = self.parse_path(true)?;
        if self.check(TokenKind::LBrace) && !self.no_struct_lit {
            let fields = self.parse_struct_lit_fields()?;
            return Ok(self.finish_expr(lo, ExprKind::StructLit { path, fields }));
        }
        Ok(self.finish_expr(lo, ExprKind::Path(path)))
    }

    fn parse_struct_lit_fields(&mut self) -> PR<Vec<StructExprField>> {
        self.expect(TokenKind::LBrace)?;
        let mut fields = Vec::new();
        while !self.check(TokenKind::RBrace) && !self.peek().is_eof() {
            let lo = self.peek().span;
            let kind = if self.check(TokenKind::Range) {
                self.advance();
                let base = self.with_struct_lit(|p| p.parse_expr()).map(Box::new);
                StructExprFieldKind::Spread(base)
            } else {
                let name = self.expect_ident()?;
                if self.eat(TokenKind::Colon) {
                    let value = self.with_struct_lit(|p| p.parse_expr()).map(Box::new);
                    StructExprFieldKind::Full(name, value)
                } else {
                    StructExprFieldKind::Shorthand(name)
                }
            };
            let span = lo.to(self.prev_span());
            let id = self.next_id();
            fields.push(StructExprField { id, kind, span });
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RBrace)?;
        Ok(fields)
    }

    /// `()`, `(e)`, `(a, b)`.
    fn parse_paren_expr(&mut self) -> PR<Expr> {
        let lo = self.expect(TokenKind::LParen)?;
        if self.eat(TokenKind::RParen) {
            return Ok(self.finish_expr(lo, ExprKind::Unit));
        }
        let mut els = Vec::new();
        let mut trailing_comma = false;
        while !self.check(TokenKind::RParen) && !self.peek().is_eof() {
            els.push(self.with_struct_lit(|p| p.parse_expr()));
            trailing_comma = self.eat(TokenKind::Comma);
            if !trailing_comma {
                break;
            }
        }
        self.expect(TokenKind::RParen)?;
        let kind = if els.len() == 1 && !trailing_comma {
            ExprKind::Paren(els.pop().unwrap().map(Box::new))
        } else {
            ExprKind::Tuple { els }
        };
        Ok(self.finish_expr(lo, kind))
    }

    fn parse_if_expr(&mut self) -> PR<Expr> {
        let lo = self.expect_kw(Kw::If)?;
        self.parse_if_rest(lo)
    }

    /// Shared by `if` and `elif`: condition, then-block, optional
    /// else/elif tail.
    fn parse_if_rest(&mut self, lo: Span) -> PR<Expr> {
        let cond = self.without_struct_lit(|p| p.parse_expr()).map(Box::new);
        let then_block = self.parse_block();
        let else_expr = if self.peek().is_kw(Kw::Elif) {
            let elif_lo = self.advance().span;
            Some(Box::new(self.parse_if_rest(elif_lo)?))
        } else if self.eat_kw(Kw::Else) {
            if self.peek().is_kw(Kw::If) {
                Some(Box::new(self.parse_if_expr()?))
            } else {
                Some(Box::new(self.parse_block_expr()?))
            }
        } else {
            None
        };
        Ok(self.finish_expr(
            lo,
            ExprKind::If {
                cond,
                then_block,
                else_expr,
            },
        ))
    }

    fn parse_match_expr(&mut self) -> PR<Expr> {
        let lo = self.expect_kw(Kw::Match)?;
        let subject = self.without_struct_lit(|p| p.parse_expr()).map(Box::new);
        self.expect(TokenKind::LBrace)?;
        let mut arms = Vec::new();
        while !self.check(TokenKind::RBrace) && !self.peek().is_eof() {
            let arm_lo = self.peek().span;
            let pat = self.parse_pat().map(Box::new);
            self.expect(TokenKind::FatArrow)?;
            let body = self.with_struct_lit(|p| p.parse_expr()).map(Box::new);
            let span = arm_lo.to(self.prev_span());
            let id = self.next_id();
            arms.push(MatchArm {
                id,
                pat,
                body,
                span,
            });
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RBrace)?;
        Ok(self.finish_expr(lo, ExprKind::Match { subject, arms }))
    }

    /// `|a, b: T| body`; `||` is an empty parameter list.
    fn parse_lambda(&mut self) -> PR<Expr> {
        let lo = self.peek().span;
        let mut params = Vec::new();
        if self.eat(TokenKind::Or) {
            // No parameters.
        } else {
            self.expect(TokenKind::BitOr)?;
            while !self.check(TokenKind::BitOr) && !self.peek().is_eof() {
                let param_lo = self.peek().span;
                let pat = self.parse_pat_single().map(Box::new);
                let ty = if self.eat(TokenKind::Colon) {
                    Some(Box::new(self.parse_ty()?))
                } else {
                    None
                };
                let span = param_lo.to(self.prev_span());
                let id = self.next_id();
                params.push(LambdaParam { id, pat, ty, span });
                if !self.eat(TokenKind::Comma) {
                    break;
                }
            }
            self.expect(TokenKind::BitOr)?;
        }
        let body = self.parse_expr().map(Box::new);
        Ok(self.finish_expr(lo, ExprKind::Lambda(Lambda { params, body })))
    }
}

fn bin_op_of(kind: TokenKind) -> Option<BinOp> {
    Some(match kind {
        TokenKind::Or => BinOp::Or,
        TokenKind::And => BinOp::And,
        TokenKind::Eq => BinOp::Eq,
        TokenKind::NotEq => BinOp::NotEq,
        TokenKind::Lt => BinOp::Lt,
        TokenKind::Gt => BinOp::Gt,
        TokenKind::Le => BinOp::Le,
        TokenKind::Ge => BinOp::Ge,
        TokenKind::Spaceship => BinOp::Spaceship,
        TokenKind::BitOr => BinOp::BitOr,
        TokenKind::BitXor => BinOp::BitXor,
        TokenKind::Ampersand => BinOp::BitAnd,
        TokenKind::Shl => BinOp::Shl,
        TokenKind::Shr => BinOp::Shr,
        TokenKind::Plus => BinOp::Add,
        TokenKind::Minus => BinOp::Sub,
        TokenKind::Mul => BinOp::Mul,
        TokenKind::Div => BinOp::Div,
        TokenKind::Rem => BinOp::Rem,
        _ => return None,
    })
}

fn assign_op_of(kind: TokenKind) -> Option<AssignOp> {
    Some(match kind {
        TokenKind::Assign => AssignOp::Assign,
        TokenKind::PlusAssign => AssignOp::AddAssign,
        TokenKind::MinusAssign => AssignOp::SubAssign,
        TokenKind::MulAssign => AssignOp::MulAssign,
        TokenKind::DivAssign => AssignOp::DivAssign,
        TokenKind::RemAssign => AssignOp::RemAssign,
        TokenKind::BitAndAssign => AssignOp::BitAndAssign,
        TokenKind::BitOrAssign => AssignOp::BitOrAssign,
        TokenKind::BitXorAssign => AssignOp::BitXorAssign,
        TokenKind::ShlAssign => AssignOp::ShlAssign,
        TokenKind::ShrAssign => AssignOp::ShrAssign,
        _ => return None,
    })
}

fn is_comparison_expr(expr: &Expr) -> bool {
    matches!(&expr.kind, ExprKind::Infix { op, .. } if op.is_comparison())
}
