//! Identifiers: an interned name plus the span it was written at.

use crate::span::Span;
use crate::symbol::{Interner, Kw, Symbol};

/// A name as it appears in source.
///
/// Equality and hashing consider only the symbol; the span is carried
/// for diagnostics and never participates in lookup.
#[derive(Copy, Clone, Debug)]
pub struct Ident {
    pub sym: Symbol,
    pub span: Span,
}

impl Ident {
    pub fn new(sym: Symbol, span: Span) -> Self {
        Self { sym, span }
    }

    pub fn is_kw(&self, kw: Kw) -> bool {
        self.sym.is_specific_kw(kw)
    }

    /// Resolve the name for display.
    pub fn display(&self, interner: &Interner) -> String {
        interner
            .resolve_owned(self.sym)
            .unwrap_or_else(|| "<unresolved>".into())
    }
}

impl PartialEq for Ident {
    fn eq(&self, other: &Self) -> bool {
        self.sym == other.sym
    }
}

impl Eq for Ident {}

impl std::hash::Hash for Ident {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.sym.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_ignores_spans() {
        let pool = Interner::new();
        let sym = pool.intern("x");
        let a = Ident::new(sym, Span::DUMMY);
        let b = Ident::new(sym, Span::new(3, 1, crate::FileId::new(0)));
        assert_eq!(a, b);
        assert_ne!(a, Ident::new(pool.intern("y"), Span::DUMMY));
    }
}
