//! Driver configuration.
//!
//! The recognized options mirror the driver surface: `dev`,
//! `print=<set>`, `compile-depth`, `benchmark` and `log-level`.
//! Discriminant order of [`CompileDepth`] and [`BenchmarkKind`] is
//! semantic; the pipeline compares them with `>=`.

use std::collections::BTreeSet;

use strum_macros::{Display, EnumIter, EnumString};

/// Intermediate artifacts the driver can dump.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Display, EnumString, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum PrintKind {
    Source,
    Tokens,
    Ast,
    ModTree,
    Definitions,
    Resolutions,
    Hir,
    All,
}

/// Where to stop the pipeline.
#[derive(
    Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Display, EnumString, Default,
)]
#[strum(serialize_all = "kebab-case")]
pub enum CompileDepth {
    Parser,
    NameResolution,
    Lowering,
    #[default]
    Full,
}

/// Timing granularity.
#[derive(
    Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Display, EnumString, Default,
)]
#[strum(serialize_all = "kebab-case")]
pub enum BenchmarkKind {
    /// Each sub-step, e.g. a single file's lexing.
    Verbose,
    /// Sub-stages, e.g. lexing inside the parsing stage.
    SubStage,
    /// Whole stages.
    Stage,
    /// One number for the whole invocation.
    #[default]
    Final,
}

/// Log verbosity. `Dev` forces everything on and is implied by `dev`.
#[derive(
    Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Display, EnumString, Default,
)]
#[strum(serialize_all = "lowercase")]
pub enum LogLevel {
    Dev,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// The `tracing` env-filter directive equivalent of this level.
    pub fn as_filter(self) -> &'static str {
        match self {
            LogLevel::Dev => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Parsed driver options.
#[derive(Clone, Debug, Default)]
pub struct Config {
    /// Extra internal assertions and dump logging.
    pub dev: bool,
    pub print: BTreeSet<PrintKind>,
    pub compile_depth: CompileDepth,
    pub benchmark: BenchmarkKind,
    pub log_level: LogLevel,
}

impl Config {
    /// Whether a dump of `kind` was requested.
    pub fn should_print(&self, kind: PrintKind) -> bool {
        self.print.contains(&PrintKind::All) || self.print.contains(&kind)
    }

    /// Whether the pipeline should run a stage at `depth`.
    pub fn reaches(&self, depth: CompileDepth) -> bool {
        self.compile_depth >= depth
    }

    /// Whether timings at `kind` granularity should be reported.
    pub fn benchmarks(&self, kind: BenchmarkKind) -> bool {
        self.benchmark <= kind
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn option_values_parse_from_kebab_case() {
        assert_eq!(
            CompileDepth::from_str("name-resolution").unwrap(),
            CompileDepth::NameResolution
        );
        assert_eq!(PrintKind::from_str("mod-tree").unwrap(), PrintKind::ModTree);
        assert_eq!(
            BenchmarkKind::from_str("sub-stage").unwrap(),
            BenchmarkKind::SubStage
        );
        assert_eq!(LogLevel::from_str("dev").unwrap(), LogLevel::Dev);
    }

    #[test]
    fn depth_order_is_semantic() {
        let mut config = Config::default();
        assert!(config.reaches(CompileDepth::Lowering));
        config.compile_depth = CompileDepth::Parser;
        assert!(config.reaches(CompileDepth::Parser));
        assert!(!config.reaches(CompileDepth::NameResolution));
    }

    #[test]
    fn print_all_covers_everything() {
        let mut config = Config::default();
        assert!(!config.should_print(PrintKind::Ast));
        config.print.insert(PrintKind::All);
        assert!(config.should_print(PrintKind::Ast));
        assert!(config.should_print(PrintKind::Hir));
    }

    #[test]
    fn benchmark_granularity_is_inclusive_downward() {
        let mut config = Config::default();
        assert!(config.benchmarks(BenchmarkKind::Final));
        assert!(!config.benchmarks(BenchmarkKind::Stage));
        config.benchmark = BenchmarkKind::Verbose;
        assert!(config.benchmarks(BenchmarkKind::Stage));
        assert!(config.benchmarks(BenchmarkKind::Verbose));
    }
}
