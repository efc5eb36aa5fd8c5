//! The thin driver around the front-end library crates.

pub mod interface;

pub use interface::{run_pipeline, PipelineOutcome};
