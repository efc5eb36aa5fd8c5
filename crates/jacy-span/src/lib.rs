//! Source positions, interned symbols and the session source map.
//!
//! Everything in this crate lives for the whole compilation session:
//! the [`Interner`] hands out stable [`Symbol`]s (keywords first, so
//! keyword checks are a range check), the [`SourceMap`] owns file
//! contents keyed by [`FileId`], and every syntactic entity downstream
//! carries a [`Span`] pointing back into it.

pub mod ident;
pub mod source_map;
pub mod span;
pub mod symbol;

pub use ident::Ident;
pub use source_map::{FileId, SourceFile, SourceMap, SourceMapError};
pub use span::Span;
pub use symbol::{Interner, Kw, Symbol};
