//! The compilation session.

use std::time::Instant;

use jacy_span::{FileId, Interner, SourceMap};

use crate::config::{BenchmarkKind, Config};

/// Process-wide state for one invocation: source map, interner and
/// the driver configuration. Created at session start, dropped at the
/// end; stages only borrow it.
#[derive(Debug)]
pub struct Session {
    pub source_map: SourceMap,
    pub interner: Interner,
    pub config: Config,
}

impl Session {
    pub fn new(config: Config) -> Self {
        Self {
            source_map: SourceMap::new(),
            interner: Interner::new(),
            config,
        }
    }

    /// Register a source file with the session.
    pub fn add_file(&mut self, path: impl Into<std::path::PathBuf>, src: impl Into<String>) -> FileId {
        self.source_map.add_file(path, src)
    }

    /// Start timing a named step at the given granularity.
    pub fn bench(&self, name: &'static str, kind: BenchmarkKind) -> StageBench {
        StageBench {
            name,
            kind,
            enabled: self.config.benchmarks(kind),
            started: Instant::now(),
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

/// A running timer for a stage or sub-stage. Reported through
/// `tracing` when finished, if the configured granularity covers it.
#[derive(Debug)]
pub struct StageBench {
    name: &'static str,
    kind: BenchmarkKind,
    enabled: bool,
    started: Instant,
}

impl StageBench {
    /// Stop the timer and report.
    pub fn finish(self) {
        if self.enabled {
            tracing::info!(
                "[bench:{}] {} took {:.3}ms",
                self.kind,
                self.name,
                self.started.elapsed().as_secs_f64() * 1e3
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jacy_span::Kw;

    #[test]
    fn session_owns_map_and_interner() {
        let mut sess = Session::default();
        let file = sess.add_file("a.jc", "fn f() {}");
        assert_eq!(sess.source_map.file(file).unwrap().src(), "fn f() {}");
        assert!(sess.interner.kw(Kw::Fn).is_kw());
    }

    #[test]
    fn bench_respects_granularity() {
        let sess = Session::default();
        // Default granularity is Final; a stage-level bench is muted
        // but must still be finishable.
        let bench = sess.bench("parse", BenchmarkKind::Stage);
        bench.finish();
        let bench = sess.bench("total", BenchmarkKind::Final);
        bench.finish();
    }
}
