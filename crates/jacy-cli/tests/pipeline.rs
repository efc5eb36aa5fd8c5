//! End-to-end driver runs over real files on disk.

use std::io::Write;
use std::path::PathBuf;

use jacy_cli::run_pipeline;
use jacy_session::{CompileDepth, Config, PrintKind};

fn write_source(dir: &tempfile::TempDir, name: &str, src: &str) -> PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).expect("create source file");
    file.write_all(src.as_bytes()).expect("write source file");
    path
}

#[test]
fn clean_program_exits_zero() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_source(
        &dir,
        "main.jc",
        "mod m { pub fn f() {} } fn main() { m::f(); }",
    );
    let outcome = run_pipeline(Config::default(), &[path]).unwrap();
    assert_eq!(outcome.exit_code, 0, "{:?}", outcome.messages);
    assert!(outcome.messages.is_empty());
}

#[test]
fn user_errors_exit_one() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_source(&dir, "main.jc", "fn main() { missing; }");
    let outcome = run_pipeline(Config::default(), &[path]).unwrap();
    assert_eq!(outcome.exit_code, 1);
    assert!(outcome
        .messages
        .iter()
        .any(|m| m.text.contains("cannot resolve")));
}

#[test]
fn invalid_utf8_reports_bad_encoding_at_offset_zero() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.jc");
    std::fs::write(&path, [0xff, 0xfe, 0x00]).unwrap();
    let outcome = run_pipeline(Config::default(), &[path]).unwrap();
    assert_eq!(outcome.exit_code, 1);
    let msg = &outcome.messages[0];
    assert!(msg.text.contains("not valid UTF-8"));
    assert_eq!(msg.span().unwrap().pos, 0);
}

#[test]
fn compile_depth_parser_stops_before_resolution() {
    let dir = tempfile::tempdir().unwrap();
    // Unresolved name: only detectable by the resolver.
    let path = write_source(&dir, "main.jc", "fn main() { missing; }");
    let config = Config {
        compile_depth: CompileDepth::Parser,
        ..Config::default()
    };
    let outcome = run_pipeline(config, &[path]).unwrap();
    assert_eq!(outcome.exit_code, 0, "{:?}", outcome.messages);
}

#[test]
fn print_dumps_are_emitted_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_source(&dir, "main.jc", "fn main() { 1 + 2; }");
    let mut config = Config::default();
    config.print.insert(PrintKind::Tokens);
    config.print.insert(PrintKind::Ast);
    config.print.insert(PrintKind::Hir);
    let outcome = run_pipeline(config, &[path]).unwrap();
    assert_eq!(outcome.exit_code, 0);
    let kinds: Vec<PrintKind> = outcome.dumps.iter().map(|(kind, _)| *kind).collect();
    assert_eq!(kinds, vec![PrintKind::Tokens, PrintKind::Ast, PrintKind::Hir]);
    let ast_dump = &outcome.dumps[1].1;
    assert!(ast_dump.contains("fn main()"));
}

#[test]
fn multiple_files_share_one_node_id_space() {
    let dir = tempfile::tempdir().unwrap();
    let first = write_source(&dir, "a.jc", "pub fn f() {}");
    let second = write_source(&dir, "b.jc", "fn main() { f(); }");
    let outcome = run_pipeline(Config::default(), &[first, second]).unwrap();
    assert_eq!(outcome.exit_code, 0, "{:?}", outcome.messages);
}
