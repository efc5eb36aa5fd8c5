//! Session state shared by every stage of the front-end.
//!
//! A [`Session`] owns the process-wide [`SourceMap`] and [`Interner`]
//! plus the driver [`Config`]. Stages borrow the session, never each
//! other.

pub mod config;
pub mod session;

pub use config::{BenchmarkKind, CompileDepth, Config, LogLevel, PrintKind};
pub use session::{Session, StageBench};
