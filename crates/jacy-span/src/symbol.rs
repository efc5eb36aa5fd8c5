//! String interning and the keyword table.
//!
//! Symbols are small copyable ids handed out by the [`Interner`]. The
//! interner is backed by `string-interner` behind a `parking_lot`
//! read-write lock and is cheap to clone (shared `Arc`). Keywords are
//! interned first, in declaration order of [`Kw`], so their ids occupy
//! the low contiguous range and `Symbol::is_kw` is a range check.

use std::sync::Arc;

use parking_lot::RwLock;
use string_interner::backend::DefaultBackend;
use string_interner::symbol::SymbolU32;
use string_interner::StringInterner;
use string_interner::Symbol as _;
use strum::{EnumCount as _, IntoEnumIterator as _};
use strum_macros::{Display, EnumCount, EnumIter, EnumString};

/// Interned string id. Two symbols are equal iff they intern the same
/// string within one session.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(SymbolU32);

impl Symbol {
    /// Dense index of this symbol, starting at 0.
    #[inline]
    pub fn as_usize(self) -> usize {
        self.0.to_usize()
    }

    /// Whether this symbol is one of the reserved keywords.
    #[inline]
    pub fn is_kw(self) -> bool {
        self.as_usize() < Kw::COUNT
    }

    /// Whether this symbol is a specific keyword.
    #[inline]
    pub fn is_specific_kw(self, kw: Kw) -> bool {
        self.as_usize() == kw as usize
    }

    /// The keyword this symbol names, if it is in the keyword range.
    pub fn as_kw(self) -> Option<Kw> {
        Kw::from_repr(self.as_usize())
    }
}

impl std::fmt::Debug for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Symbol({})", self.as_usize())
    }
}

/// The Jacy keyword set.
///
/// Declaration order is load-bearing: [`Interner::new`] interns these
/// first, so `kw as usize` equals the keyword's symbol index.
#[derive(
    Copy, Clone, PartialEq, Eq, Hash, Debug, Display, EnumCount, EnumIter, EnumString,
    strum_macros::FromRepr,
)]
#[strum(serialize_all = "lowercase")]
pub enum Kw {
    And,
    As,
    Async,
    Await,
    Break,
    Const,
    Continue,
    Do,
    Elif,
    Else,
    Enum,
    False,
    Fn,
    For,
    If,
    Impl,
    Import,
    In,
    Infix,
    Init,
    Let,
    Loop,
    Match,
    Mod,
    Move,
    Mut,
    Not,
    Of,
    Or,
    Party,
    Pub,
    Ref,
    Return,
    #[strum(serialize = "self")]
    SelfValue,
    Static,
    Struct,
    Super,
    This,
    Trait,
    True,
    Type,
    Use,
    Where,
    While,
}

#[derive(Debug)]
struct InternerInner {
    strings: RwLock<StringInterner<DefaultBackend>>,
}

/// Session-wide string interner.
///
/// Clones share the same pool. Interning is deterministic within a
/// session: identical strings always return the same [`Symbol`], and
/// keywords get the same low ids in every session.
#[derive(Clone, Debug)]
pub struct Interner {
    inner: Arc<InternerInner>,
}

impl Interner {
    /// Create a pool with all keywords pre-interned.
    pub fn new() -> Self {
        let mut strings = StringInterner::new();
        for kw in Kw::iter() {
            strings.get_or_intern(kw.to_string());
        }
        Self {
            inner: Arc::new(InternerInner {
                strings: RwLock::new(strings),
            }),
        }
    }

    /// Intern a string and return its symbol.
    #[inline]
    pub fn intern<S>(&self, value: S) -> Symbol
    where
        S: AsRef<str>,
    {
        Symbol(self.inner.strings.write().get_or_intern(value.as_ref()))
    }

    /// The pre-interned symbol of a keyword.
    #[inline]
    pub fn kw(&self, kw: Kw) -> Symbol {
        // Keywords were interned in declaration order by `new`.
        Symbol(SymbolU32::try_from_usize(kw as usize).unwrap())
    }

    /// Resolve a symbol back into an owned string.
    pub fn resolve_owned(&self, sym: Symbol) -> Option<String> {
        self.inner.strings.read().resolve(sym.0).map(str::to_owned)
    }

    /// Resolve a symbol and apply a closure while the borrow is active.
    pub fn with_resolved<R, F>(&self, sym: Symbol, f: F) -> Option<R>
    where
        F: FnOnce(&str) -> R,
    {
        self.inner.strings.read().resolve(sym.0).map(f)
    }

    /// Number of interned strings.
    pub fn len(&self) -> usize {
        self.inner.strings.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for Interner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn interning_is_idempotent() {
        let pool = Interner::new();
        let a = pool.intern("party");
        let b = pool.intern("party");
        assert_eq!(a, b);
        assert_eq!(pool.resolve_owned(a).as_deref(), Some("party"));
    }

    #[test]
    fn keywords_occupy_the_low_range() {
        let pool = Interner::new();
        for kw in Kw::iter() {
            let sym = pool.kw(kw);
            assert!(sym.is_kw(), "{kw} should be in the keyword range");
            assert_eq!(sym.as_usize(), kw as usize);
            assert_eq!(pool.resolve_owned(sym).unwrap(), kw.to_string());
        }
        let user = pool.intern("definitely_not_a_keyword");
        assert!(!user.is_kw());
    }

    #[test]
    fn interning_a_keyword_string_yields_its_kw_symbol() {
        let pool = Interner::new();
        assert_eq!(pool.intern("fn"), pool.kw(Kw::Fn));
        assert_eq!(pool.intern("self"), pool.kw(Kw::SelfValue));
        assert!(pool.intern("while").is_specific_kw(Kw::While));
        assert_eq!(pool.intern("use").as_kw(), Some(Kw::Use));
    }

    #[test]
    fn clones_share_the_pool() {
        let a = Interner::new();
        let b = a.clone();
        let sym = a.intern("shared");
        assert_eq!(b.intern("shared"), sym);
    }

    #[test]
    fn with_resolved_borrows() {
        let pool = Interner::new();
        let sym = pool.intern("abc");
        assert_eq!(pool.with_resolved(sym, str::len), Some(3));
    }
}
