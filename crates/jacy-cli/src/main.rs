use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Result;
use clap::Parser;

use jacy_cli::run_pipeline;
use jacy_session::{BenchmarkKind, CompileDepth, Config, LogLevel, PrintKind};

#[derive(Parser, Debug)]
#[command(name = "jacy", about = "Jacy compiler front-end", version)]
pub struct Cli {
    /// Source files to compile (`.jc`)
    #[arg(value_name = "FILE", required = true)]
    files: Vec<PathBuf>,

    /// Enable internal assertions and dump logging
    #[arg(long)]
    dev: bool,

    /// Intermediate artifacts to dump (comma separated):
    /// source, tokens, ast, mod-tree, definitions, resolutions, hir, all
    #[arg(long, value_name = "SET", value_delimiter = ',')]
    print: Vec<String>,

    /// Stop the pipeline early: parser, name-resolution, lowering, full
    #[arg(long = "compile-depth", value_name = "DEPTH", default_value = "full")]
    compile_depth: String,

    /// Timing granularity: final, stage, sub-stage, verbose
    #[arg(long, value_name = "KIND", default_value = "final")]
    benchmark: String,

    /// Log verbosity: dev, debug, info, warn, error
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info")]
    log_level: String,
}

fn build_config(args: &Cli) -> Result<Config> {
    let mut config = Config {
        dev: args.dev,
        ..Config::default()
    };
    for kind in &args.print {
        let kind = PrintKind::from_str(kind)
            .map_err(|_| anyhow::anyhow!("unknown `print` value: {kind}"))?;
        config.print.insert(kind);
    }
    config.compile_depth = CompileDepth::from_str(&args.compile_depth)
        .map_err(|_| anyhow::anyhow!("unknown `compile-depth` value: {}", args.compile_depth))?;
    config.benchmark = BenchmarkKind::from_str(&args.benchmark)
        .map_err(|_| anyhow::anyhow!("unknown `benchmark` value: {}", args.benchmark))?;
    config.log_level = LogLevel::from_str(&args.log_level)
        .map_err(|_| anyhow::anyhow!("unknown `log-level` value: {}", args.log_level))?;
    if config.dev {
        config.log_level = LogLevel::Dev;
    }
    Ok(config)
}

fn init_tracing(config: &Config) {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::EnvFilter::from_default_env()
    } else {
        tracing_subscriber::EnvFilter::new(config.log_level.as_filter())
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: Cli) -> Result<i32> {
    let config = build_config(&args)?;
    init_tracing(&config);

    for path in &args.files {
        if path.extension().and_then(|ext| ext.to_str()) != Some("jc") {
            tracing::warn!("`{}` does not carry the `.jc` extension", path.display());
        }
    }

    let outcome = run_pipeline(config, &args.files)?;
    for (kind, dump) in &outcome.dumps {
        println!("=== {kind} ===");
        print!("{dump}");
    }
    Ok(outcome.exit_code)
}

pub fn main() -> Result<()> {
    let args = Cli::parse();
    // An invariant breach inside the pipeline is a panic; report it as
    // an internal error with its own exit code.
    let code = match std::panic::catch_unwind(|| run(args)) {
        Ok(result) => result?,
        Err(_) => {
            eprintln!("internal compiler invariant violated; rerun with --dev for details");
            2
        }
    };
    std::process::exit(code);
}
