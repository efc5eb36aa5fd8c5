//! Parser state, token cursor and recovery.

use jacy_ast::{ErrorNode, Ident, Item, NodeId, NodeIdCounter, PR};
use jacy_lexer::{Token, TokenKind};
use jacy_message::{MessageBuilder, MessageHolder, MessageResult};
use jacy_span::{Interner, Kw, Span};

/// Parse one file's token stream into its item list.
///
/// The node id counter is shared across files so ids stay unique for
/// the whole party.
pub fn parse_file(
    tokens: Vec<Token>,
    interner: &Interner,
    counter: &mut NodeIdCounter,
) -> MessageResult<Vec<PR<Item>>> {
    let mut parser = Parser::new(tokens, interner, counter);
    let items = parser.parse_items_until(TokenKind::Eof);
    parser.msg.result(items)
}

pub struct Parser<'a> {
    pub(crate) tokens: Vec<Token>,
    pub(crate) index: usize,
    pub(crate) interner: &'a Interner,
    pub(crate) counter: &'a mut NodeIdCounter,
    pub(crate) msg: MessageHolder,
    /// Struct literals are forbidden in `if`/`while`/`for`/`match`
    /// header positions, where `{` starts the body instead.
    pub(crate) no_struct_lit: bool,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: Vec<Token>, interner: &'a Interner, counter: &'a mut NodeIdCounter) -> Self {
        debug_assert!(
            matches!(tokens.last(), Some(token) if token.is_eof()),
            "[DEV] parser fed a token stream without Eof"
        );
        Self {
            tokens,
            index: 0,
            interner,
            counter,
            msg: MessageHolder::new(),
            no_struct_lit: false,
        }
    }

    // Cursor //

    pub(crate) fn peek(&self) -> Token {
        self.tokens[self.index.min(self.tokens.len() - 1)]
    }

    pub(crate) fn peek_kind(&self) -> TokenKind {
        self.peek().kind
    }

    /// Kind of the token `n` ahead of the cursor (0 is the current).
    pub(crate) fn lookahead(&self, n: usize) -> TokenKind {
        let index = (self.index + n).min(self.tokens.len() - 1);
        self.tokens[index].kind
    }

    pub(crate) fn advance(&mut self) -> Token {
        let token = self.peek();
        if !token.is_eof() {
            self.index += 1;
        }
        token
    }

    /// Span of the last consumed token; start-of-file when nothing
    /// was consumed yet.
    pub(crate) fn prev_span(&self) -> Span {
        if self.index == 0 {
            self.peek().span.from_start_to(0)
        } else {
            self.tokens[self.index - 1].span
        }
    }

    pub(crate) fn check(&self, kind: TokenKind) -> bool {
        self.peek_kind() == kind
    }

    pub(crate) fn eat(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn eat_kw(&mut self, kw: Kw) -> bool {
        if self.peek().is_kw(kw) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn next_id(&mut self) -> NodeId {
        self.counter.next()
    }

    /// Consume the expected token or report and recover.
    pub(crate) fn expect(&mut self, kind: TokenKind) -> PR<Span> {
        if self.check(kind) {
            Ok(self.advance().span)
        } else {
            Err(self.expected(kind.describe()))
        }
    }

    pub(crate) fn expect_kw(&mut self, kw: Kw) -> PR<Span> {
        if self.peek().is_kw(kw) {
            Ok(self.advance().span)
        } else {
            Err(self.expected(&format!("`{kw}`")))
        }
    }

    /// A non-keyword identifier.
    pub(crate) fn expect_ident(&mut self) -> PR<Ident> {
        let token = self.peek();
        match token.as_ident() {
            Some(sym) if !sym.is_kw() => {
                self.advance();
                let id = self.next_id();
                Ok(Ident::new(id, sym, token.span))
            }
            _ => Err(self.expected("identifier")),
        }
    }

    /// Report `expected X` at the current token and skip to a
    /// synchronization point. The returned marker spans from the last
    /// accepted token to the sync token.
    pub(crate) fn expected(&mut self, what: &str) -> ErrorNode {
        let token = self.peek();
        MessageBuilder::error()
            .text(format!(
                "expected {}, found {}",
                what,
                token.kind.describe()
            ))
            .primary(token.span, format!("expected {what}"))
            .emit(&mut self.msg);
        self.recover()
    }

    /// Skip forward to the next synchronization token: `;`, `}` or a
    /// token that can start a top-level item. Never consumes the sync
    /// token itself.
    pub(crate) fn recover(&mut self) -> ErrorNode {
        let from = self.prev_span();
        let mut last = from;
        while !self.peek().is_eof() && !self.is_sync_token() {
            last = self.advance().span;
        }
        tracing::trace!("parser recovered over {from:?}..{last:?}");
        ErrorNode::new(from.to(last))
    }

    fn is_sync_token(&self) -> bool {
        let token = self.peek();
        if matches!(token.kind, TokenKind::Semi | TokenKind::RBrace) {
            return true;
        }
        self.is_item_start()
    }

    /// Whether the current token can begin an item.
    pub(crate) fn is_item_start(&self) -> bool {
        let token = self.peek();
        [
            Kw::Enum,
            Kw::Struct,
            Kw::Trait,
            Kw::Impl,
            Kw::Fn,
            Kw::Init,
            Kw::Mod,
            Kw::Type,
            Kw::Use,
            Kw::Pub,
        ]
        .iter()
        .any(|&kw| token.is_kw(kw))
            || token.is(TokenKind::At)
    }

    /// Consume a closing `>`, splitting composite tokens that start
    /// with one (`>>`, `>=`, `>>=`) so nested generic lists close
    /// without lexer cooperation.
    pub(crate) fn eat_gt(&mut self) -> bool {
        let token = self.peek();
        let split = |kind| {
            let span = Span::new(token.span.pos + 1, token.span.len - 1, token.span.file);
            Token::new(kind, span)
        };
        match token.kind {
            TokenKind::Gt => {
                self.advance();
                true
            }
            TokenKind::Shr => {
                self.tokens[self.index] = split(TokenKind::Gt);
                true
            }
            TokenKind::Ge => {
                self.tokens[self.index] = split(TokenKind::Assign);
                true
            }
            TokenKind::ShrAssign => {
                self.tokens[self.index] = split(TokenKind::Ge);
                true
            }
            _ => false,
        }
    }

    /// Run `f` with struct literals disabled, restoring the previous
    /// state after.
    pub(crate) fn without_struct_lit<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        let saved = self.no_struct_lit;
        self.no_struct_lit = true;
        let result = f(self);
        self.no_struct_lit = saved;
        result
    }

    pub(crate) fn with_struct_lit<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        let saved = self.no_struct_lit;
        self.no_struct_lit = false;
        let result = f(self);
        self.no_struct_lit = saved;
        result
    }
}
