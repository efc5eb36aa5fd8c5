//! The high-level IR and the AST → HIR lowering pass.
//!
//! HIR is the stable interface handed to the type-checker: every
//! local reference is resolved, loop sugar is gone, and item shells
//! are separated from their bodies so signatures can be processed
//! independently. Nodes are identified by [`HirId`], an
//! `(owner DefId, child index)` pair.

pub mod ids;
pub mod lower;
pub mod nodes;

pub use ids::{BodyId, ChildId, HirId};
pub use lower::Lowering;
pub use nodes::*;
