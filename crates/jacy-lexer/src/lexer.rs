//! The hand-written, longest-match lexer.

use jacy_message::{MessageBuilder, MessageHolder, MessageResult};
use jacy_span::{FileId, Interner, Kw, Span, Symbol};

use crate::token::{LitKind, Token, TokenKind, TokenLit};

const INT_SUFFIXES: &[&str] = &[
    "i8", "i16", "i32", "i64", "u8", "u16", "u32", "u64", "int", "uint",
];
const FLOAT_SUFFIXES: &[&str] = &["f32", "f64"];

/// Tokenize one file. Always returns a token vector terminated by
/// `Eof`; problems become messages plus `Error` recovery tokens.
pub fn lex(file: FileId, src: &str, interner: &Interner) -> MessageResult<Vec<Token>> {
    Lexer::new(file, src, interner).run()
}

/// Cursor over one file's text.
pub struct Lexer<'src> {
    src: &'src str,
    file: FileId,
    interner: &'src Interner,
    pos: usize,
    tokens: Vec<Token>,
    msg: MessageHolder,
}

impl<'src> Lexer<'src> {
    pub fn new(file: FileId, src: &'src str, interner: &'src Interner) -> Self {
        Self {
            src,
            file,
            interner,
            pos: 0,
            tokens: Vec::new(),
            msg: MessageHolder::new(),
        }
    }

    pub fn run(mut self) -> MessageResult<Vec<Token>> {
        loop {
            self.skip_trivia();
            let start = self.pos;
            let Some(first) = self.peek() else {
                self.push(TokenKind::Eof, start);
                break;
            };
            match first {
                c if is_ident_start(c) => self.lex_ident(start),
                c if c.is_ascii_digit() => self.lex_number(start),
                '"' => self.lex_string(start, '"'),
                '\'' => self.lex_quote(start),
                _ => self.lex_op(start, first),
            }
        }
        self.msg.result(self.tokens)
    }

    // Cursor //

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        let mut chars = self.src[self.pos..].chars();
        chars.next();
        chars.next()
    }

    fn peek_third(&self) -> Option<char> {
        let mut chars = self.src[self.pos..].chars();
        chars.next();
        chars.next();
        chars.next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn span_from(&self, start: usize) -> Span {
        Span::from_bounds(start as u32, self.pos as u32, self.file)
    }

    fn push(&mut self, kind: TokenKind, start: usize) {
        let span = self.span_from(start);
        self.tokens.push(Token::new(kind, span));
    }

    // Trivia //

    fn skip_trivia(&mut self) {
        loop {
            match (self.peek(), self.peek_second()) {
                (Some(c), _) if c.is_whitespace() => {
                    self.bump();
                }
                (Some('/'), Some('/')) => {
                    while let Some(c) = self.peek() {
                        if c == '\n' {
                            break;
                        }
                        self.bump();
                    }
                }
                (Some('/'), Some('*')) => self.skip_block_comment(),
                _ => break,
            }
        }
    }

    fn skip_block_comment(&mut self) {
        let start = self.pos;
        self.bump();
        self.bump();
        let mut depth = 1usize;
        while depth > 0 {
            match (self.peek(), self.peek_second()) {
                (Some('/'), Some('*')) => {
                    self.bump();
                    self.bump();
                    depth += 1;
                }
                (Some('*'), Some('/')) => {
                    self.bump();
                    self.bump();
                    depth -= 1;
                }
                (Some(_), _) => {
                    self.bump();
                }
                (None, _) => {
                    MessageBuilder::error()
                        .text("unterminated block comment")
                        .primary(self.span_from(start), "opened here")
                        .emit(&mut self.msg);
                    return;
                }
            }
        }
    }

    // Lexemes //

    fn lex_ident(&mut self, start: usize) {
        while matches!(self.peek(), Some(c) if is_ident_continue(c)) {
            self.bump();
        }
        let sym = self.interner.intern(&self.src[start..self.pos]);
        if sym.is_specific_kw(Kw::True) || sym.is_specific_kw(Kw::False) {
            let lit = TokenLit::new(LitKind::Bool, sym, None);
            self.push(TokenKind::Lit(lit), start);
        } else {
            self.push(TokenKind::Id(sym), start);
        }
    }

    fn lex_number(&mut self, start: usize) {
        let kind = if self.peek() == Some('0') {
            match self.peek_second() {
                Some('b') => LitKind::Bin,
                Some('o') => LitKind::Oct,
                Some('x') => LitKind::Hex,
                _ => LitKind::Dec,
            }
        } else {
            LitKind::Dec
        };

        let digits_start = if kind == LitKind::Dec {
            start
        } else {
            // Skip the base prefix.
            self.bump();
            self.bump();
            self.pos
        };

        let mut kind = kind;
        self.eat_digits(kind);

        // A decimal literal followed by `.digit` is a float; `..` is
        // left alone so ranges keep working.
        if kind == LitKind::Dec
            && self.peek() == Some('.')
            && matches!(self.peek_second(), Some(c) if c.is_ascii_digit())
        {
            kind = LitKind::Float;
            self.bump();
            self.eat_digits(LitKind::Dec);
            if matches!(self.peek(), Some('e' | 'E')) {
                let exp_digit = if matches!(self.peek_second(), Some('+' | '-')) {
                    self.peek_third()
                } else {
                    self.peek_second()
                };
                if matches!(exp_digit, Some(c) if c.is_ascii_digit()) {
                    self.bump();
                    if matches!(self.peek(), Some('+' | '-')) {
                        self.bump();
                    }
                    self.eat_digits(LitKind::Dec);
                }
            }
        }

        let sym = self.interner.intern(&self.src[digits_start..self.pos]);
        let suffix = self.lex_suffix(kind);
        let lit = TokenLit::new(kind, sym, suffix);
        self.push(TokenKind::Lit(lit), start);
    }

    fn eat_digits(&mut self, kind: LitKind) {
        while let Some(c) = self.peek() {
            let ok = match kind {
                LitKind::Bin => matches!(c, '0' | '1'),
                LitKind::Oct => matches!(c, '0'..='7'),
                LitKind::Hex => c.is_ascii_hexdigit(),
                _ => c.is_ascii_digit(),
            };
            if !ok {
                break;
            }
            self.bump();
        }
    }

    /// Lex a trailing type suffix and validate it against the literal
    /// kind. An invalid suffix is reported and dropped.
    fn lex_suffix(&mut self, kind: LitKind) -> Option<Symbol> {
        let start = self.pos;
        if !matches!(self.peek(), Some(c) if is_ident_start(c)) {
            return None;
        }
        while matches!(self.peek(), Some(c) if is_ident_continue(c)) {
            self.bump();
        }
        let text = &self.src[start..self.pos];
        let allowed = match kind {
            k if k.is_int() => INT_SUFFIXES.contains(&text),
            LitKind::Float => FLOAT_SUFFIXES.contains(&text),
            _ => false,
        };
        if allowed {
            Some(self.interner.intern(text))
        } else {
            MessageBuilder::error()
                .text(format!("invalid suffix `{text}` for {kind} literal"))
                .primary(self.span_from(start), "unexpected suffix")
                .emit(&mut self.msg);
            None
        }
    }

    /// Disambiguate a single quote: `'abc'` is a string, `'abc` not
    /// followed by a closing quote is a lifetime. A quote not followed
    /// by an identifier always starts a string.
    fn lex_quote(&mut self, start: usize) {
        let rest = &self.src[start + 1..];
        let ident_len = rest
            .char_indices()
            .take_while(|&(i, c)| {
                if i == 0 {
                    is_ident_start(c)
                } else {
                    is_ident_continue(c)
                }
            })
            .count();
        if ident_len > 0 && rest[ident_len..].chars().next() != Some('\'') {
            self.bump();
            for _ in 0..ident_len {
                self.bump();
            }
            let sym = self.interner.intern(&self.src[start + 1..self.pos]);
            self.push(TokenKind::Lifetime(sym), start);
        } else {
            self.lex_string(start, '\'');
        }
    }

    fn lex_string(&mut self, start: usize, quote: char) {
        self.bump();
        let mut value = String::new();
        loop {
            match self.peek() {
                None => {
                    MessageBuilder::error()
                        .text("unterminated string literal")
                        .primary(self.span_from(start), "opened here")
                        .emit(&mut self.msg);
                    let sym = self.interner.intern(&self.src[start..self.pos]);
                    self.push(TokenKind::Error(sym), start);
                    return;
                }
                Some(c) if c == quote => {
                    self.bump();
                    break;
                }
                Some('\\') => {
                    self.bump();
                    self.lex_escape(&mut value);
                }
                Some(c) => {
                    value.push(c);
                    self.bump();
                }
            }
        }
        let kind = if quote == '\'' {
            LitKind::SqStr
        } else {
            LitKind::DqStr
        };
        let sym = self.interner.intern(&value);
        let suffix = self.lex_suffix(kind);
        self.push(TokenKind::Lit(TokenLit::new(kind, sym, suffix)), start);
    }

    fn lex_escape(&mut self, value: &mut String) {
        let esc_start = self.pos - 1;
        match self.bump() {
            Some('n') => value.push('\n'),
            Some('r') => value.push('\r'),
            Some('t') => value.push('\t'),
            Some('\\') => value.push('\\'),
            Some('\'') => value.push('\''),
            Some('"') => value.push('"'),
            Some('0') => value.push('\0'),
            Some('x') => {
                let hi = self.peek().filter(char::is_ascii_hexdigit);
                let lo = self.peek_second().filter(char::is_ascii_hexdigit);
                match (hi, lo) {
                    (Some(hi), Some(lo)) => {
                        self.bump();
                        self.bump();
                        let byte = (hi.to_digit(16).unwrap() * 16 + lo.to_digit(16).unwrap()) as u8;
                        value.push(byte as char);
                    }
                    _ => {
                        MessageBuilder::error()
                            .text("invalid escape sequence")
                            .primary(self.span_from(esc_start), "`\\x` needs two hex digits")
                            .emit(&mut self.msg);
                    }
                }
            }
            other => {
                MessageBuilder::error()
                    .text("invalid escape sequence")
                    .primary(self.span_from(esc_start), "unknown escape")
                    .emit(&mut self.msg);
                if let Some(c) = other {
                    value.push(c);
                }
            }
        }
    }

    fn lex_op(&mut self, start: usize, first: char) {
        self.bump();
        let kind = match first {
            '+' => self.pick('=', TokenKind::PlusAssign, TokenKind::Plus),
            '-' => {
                if self.eat('=') {
                    TokenKind::MinusAssign
                } else if self.eat('>') {
                    TokenKind::Arrow
                } else {
                    TokenKind::Minus
                }
            }
            '*' => self.pick('=', TokenKind::MulAssign, TokenKind::Mul),
            '/' => self.pick('=', TokenKind::DivAssign, TokenKind::Div),
            '%' => self.pick('=', TokenKind::RemAssign, TokenKind::Rem),
            '=' => {
                if self.eat('=') {
                    TokenKind::Eq
                } else if self.eat('>') {
                    TokenKind::FatArrow
                } else {
                    TokenKind::Assign
                }
            }
            '!' => self.pick('=', TokenKind::NotEq, TokenKind::Not),
            '<' => {
                if self.eat('=') {
                    if self.eat('>') {
                        TokenKind::Spaceship
                    } else {
                        TokenKind::Le
                    }
                } else if self.eat('<') {
                    self.pick('=', TokenKind::ShlAssign, TokenKind::Shl)
                } else {
                    TokenKind::Lt
                }
            }
            '>' => {
                if self.eat('=') {
                    TokenKind::Ge
                } else if self.eat('>') {
                    self.pick('=', TokenKind::ShrAssign, TokenKind::Shr)
                } else {
                    TokenKind::Gt
                }
            }
            '&' => {
                if self.eat('&') {
                    TokenKind::And
                } else {
                    self.pick('=', TokenKind::BitAndAssign, TokenKind::Ampersand)
                }
            }
            '|' => {
                if self.eat('|') {
                    TokenKind::Or
                } else {
                    self.pick('=', TokenKind::BitOrAssign, TokenKind::BitOr)
                }
            }
            '^' => self.pick('=', TokenKind::BitXorAssign, TokenKind::BitXor),
            '.' => {
                if self.eat('.') {
                    self.pick('=', TokenKind::RangeEq, TokenKind::Range)
                } else {
                    TokenKind::Dot
                }
            }
            ',' => TokenKind::Comma,
            ';' => TokenKind::Semi,
            ':' => self.pick(':', TokenKind::Path, TokenKind::Colon),
            '?' => TokenKind::Quest,
            '@' => TokenKind::At,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            other => {
                tracing::trace!("lexer recovering from unknown char {other:?}");
                MessageBuilder::error()
                    .text(format!("unexpected character `{other}`"))
                    .primary(self.span_from(start), "cannot start any token")
                    .emit(&mut self.msg);
                TokenKind::Error(self.interner.intern(&self.src[start..self.pos]))
            }
        };
        self.push(kind, start);
    }

    fn pick(&mut self, next: char, matched: TokenKind, fallback: TokenKind) -> TokenKind {
        if self.eat(next) {
            matched
        } else {
            fallback
        }
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn lex_kinds(src: &str) -> (Vec<TokenKind>, Vec<jacy_message::Message>, Interner) {
        let interner = Interner::new();
        let result = lex(FileId::new(0), src, &interner);
        let kinds = result.value.iter().map(|t| t.kind).collect();
        (kinds, result.messages, interner)
    }

    #[test]
    fn empty_input_is_a_lone_eof() {
        let (kinds, messages, _) = lex_kinds("");
        assert_eq!(kinds, vec![TokenKind::Eof]);
        assert!(messages.is_empty());
    }

    #[test]
    fn keywords_and_idents() {
        let (kinds, messages, interner) = lex_kinds("fn main");
        assert!(messages.is_empty());
        assert_eq!(
            kinds,
            vec![
                TokenKind::Id(interner.kw(Kw::Fn)),
                TokenKind::Id(interner.intern("main")),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn bools_lex_as_literals() {
        let (kinds, _, interner) = lex_kinds("true false");
        assert_eq!(
            kinds[0],
            TokenKind::Lit(TokenLit::new(LitKind::Bool, interner.kw(Kw::True), None))
        );
        assert_eq!(
            kinds[1],
            TokenKind::Lit(TokenLit::new(LitKind::Bool, interner.kw(Kw::False), None))
        );
    }

    #[test]
    fn integer_bases_and_suffixes() {
        let (kinds, messages, interner) = lex_kinds("42 0b101 0o17 0xfFu64 3i32");
        assert!(messages.is_empty());
        let lits: Vec<TokenLit> = kinds
            .iter()
            .filter_map(|k| match k {
                TokenKind::Lit(l) => Some(*l),
                _ => None,
            })
            .collect();
        assert_eq!(lits[0], TokenLit::new(LitKind::Dec, interner.intern("42"), None));
        assert_eq!(lits[1], TokenLit::new(LitKind::Bin, interner.intern("101"), None));
        assert_eq!(lits[2], TokenLit::new(LitKind::Oct, interner.intern("17"), None));
        assert_eq!(
            lits[3],
            TokenLit::new(LitKind::Hex, interner.intern("fF"), Some(interner.intern("u64")))
        );
        assert_eq!(
            lits[4],
            TokenLit::new(LitKind::Dec, interner.intern("3"), Some(interner.intern("i32")))
        );
    }

    #[test]
    fn floats_stay_symbolic() {
        let (kinds, messages, interner) = lex_kinds("1.5 2.0e10 3.25E-2f64");
        assert!(messages.is_empty());
        assert_eq!(
            kinds[0],
            TokenKind::Lit(TokenLit::new(LitKind::Float, interner.intern("1.5"), None))
        );
        assert_eq!(
            kinds[1],
            TokenKind::Lit(TokenLit::new(LitKind::Float, interner.intern("2.0e10"), None))
        );
        assert_eq!(
            kinds[2],
            TokenKind::Lit(TokenLit::new(
                LitKind::Float,
                interner.intern("3.25E-2"),
                Some(interner.intern("f64"))
            ))
        );
    }

    #[test]
    fn range_after_int_is_not_a_float() {
        let (kinds, _, interner) = lex_kinds("1..2 1..=3");
        assert_eq!(
            kinds,
            vec![
                TokenKind::Lit(TokenLit::new(LitKind::Dec, interner.intern("1"), None)),
                TokenKind::Range,
                TokenKind::Lit(TokenLit::new(LitKind::Dec, interner.intern("2"), None)),
                TokenKind::Lit(TokenLit::new(LitKind::Dec, interner.intern("1"), None)),
                TokenKind::RangeEq,
                TokenKind::Lit(TokenLit::new(LitKind::Dec, interner.intern("3"), None)),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn bad_suffix_is_reported_and_dropped() {
        let (kinds, messages, interner) = lex_kinds("1up");
        assert_eq!(messages.len(), 1);
        assert!(messages[0].text.contains("invalid suffix `up`"));
        assert_eq!(
            kinds[0],
            TokenKind::Lit(TokenLit::new(LitKind::Dec, interner.intern("1"), None))
        );
    }

    #[test]
    fn float_suffix_on_int_is_rejected() {
        let (_, messages, _) = lex_kinds("0x1f32_oops");
        // `f32` digits get eaten by the hex literal; the rest is a bad
        // suffix for a hex literal.
        assert_eq!(messages.len(), 1);
    }

    #[test]
    fn strings_unescape() {
        let (kinds, messages, interner) = lex_kinds(r#""a\tb\x41" 'c\n'"#);
        assert!(messages.is_empty());
        assert_eq!(
            kinds[0],
            TokenKind::Lit(TokenLit::new(LitKind::DqStr, interner.intern("a\tbA"), None))
        );
        assert_eq!(
            kinds[1],
            TokenKind::Lit(TokenLit::new(LitKind::SqStr, interner.intern("c\n"), None))
        );
    }

    #[test]
    fn bad_escape_is_reported() {
        let (_, messages, _) = lex_kinds(r#""a\q""#);
        assert_eq!(messages.len(), 1);
        assert!(messages[0].text.contains("invalid escape"));
    }

    #[test]
    fn unterminated_string_recovers_with_error_token() {
        let (kinds, messages, _) = lex_kinds("\"abc");
        assert_eq!(messages.len(), 1);
        assert!(messages[0].text.contains("unterminated string"));
        assert!(matches!(kinds[0], TokenKind::Error(_)));
        assert_eq!(*kinds.last().unwrap(), TokenKind::Eof);
    }

    #[test]
    fn nested_block_comments() {
        let (kinds, messages, _) = lex_kinds("/* outer /* inner */ still */ 1");
        assert!(messages.is_empty());
        assert!(matches!(kinds[0], TokenKind::Lit(_)));
    }

    #[test]
    fn unterminated_block_comment_is_reported() {
        let (kinds, messages, _) = lex_kinds("/* never closed");
        assert_eq!(messages.len(), 1);
        assert!(messages[0].text.contains("unterminated block comment"));
        assert_eq!(kinds, vec![TokenKind::Eof]);
    }

    #[test]
    fn multi_char_operators_longest_match() {
        let (kinds, _, _) = lex_kinds("<=> <= << <<= .. ..= :: -> => && || >>=");
        assert_eq!(
            kinds,
            vec![
                TokenKind::Spaceship,
                TokenKind::Le,
                TokenKind::Shl,
                TokenKind::ShlAssign,
                TokenKind::Range,
                TokenKind::RangeEq,
                TokenKind::Path,
                TokenKind::Arrow,
                TokenKind::FatArrow,
                TokenKind::And,
                TokenKind::Or,
                TokenKind::ShrAssign,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn unknown_char_recovers() {
        let (kinds, messages, _) = lex_kinds("a $ b");
        assert_eq!(messages.len(), 1);
        assert!(messages[0].text.contains("unexpected character"));
        assert!(matches!(kinds[1], TokenKind::Error(_)));
        assert!(matches!(kinds[2], TokenKind::Id(_)));
    }

    #[test]
    fn single_quote_disambiguation() {
        let (kinds, messages, interner) = lex_kinds("'a' 'abc' 'static");
        assert!(messages.is_empty());
        assert_eq!(
            kinds,
            vec![
                TokenKind::Lit(TokenLit::new(LitKind::SqStr, interner.intern("a"), None)),
                TokenKind::Lit(TokenLit::new(LitKind::SqStr, interner.intern("abc"), None)),
                TokenKind::Lifetime(interner.intern("static")),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn spans_slice_back_to_lexemes() {
        let src = "fn add(a: int) { a + 40 }";
        let interner = Interner::new();
        let mut map = jacy_span::SourceMap::new();
        let file = map.add_file("t.jc", src);
        let tokens = lex(file, src, &interner).value;
        for token in &tokens {
            if token.is_eof() {
                continue;
            }
            let text = map.slice(token.span).unwrap();
            assert!(!text.is_empty());
            assert_eq!(text, &src[token.span.pos as usize..token.span.hi() as usize]);
        }
        // Spans are strictly ordered and non-overlapping.
        for pair in tokens.windows(2) {
            assert!(pair[0].span.hi() <= pair[1].span.pos || pair[1].is_eof());
        }
    }
}
