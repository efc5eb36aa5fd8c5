//! The compilation pipeline: Lex → Parse → BuildModules → Resolve →
//! Lower, cut off at the configured depth.

use std::path::PathBuf;

use jacy_ast::{FileItems, NodeIdCounter, Party, Printer};
use jacy_hir::Lowering;
use jacy_lexer::{lex, Token};
use jacy_message::{Message, MessageBuilder, MessageDumper, MessageHolder};
use jacy_resolve::resolve_party;
use jacy_session::{BenchmarkKind, CompileDepth, Config, PrintKind, Session};
use jacy_span::{FileId, Span};

/// What one invocation produced, for the driver and for tests.
pub struct PipelineOutcome {
    pub messages: Vec<Message>,
    pub exit_code: i32,
    /// Requested dumps, in emission order.
    pub dumps: Vec<(PrintKind, String)>,
}

impl PipelineOutcome {
    pub fn has_errors(&self) -> bool {
        self.exit_code != 0
    }
}

/// Run the front-end over a set of `.jc` files.
pub fn run_pipeline(config: Config, paths: &[PathBuf]) -> anyhow::Result<PipelineOutcome> {
    let mut sess = Session::new(config);
    let mut msg = MessageHolder::new();
    let mut dumps: Vec<(PrintKind, String)> = Vec::new();
    let total = sess.bench("total", BenchmarkKind::Final);

    // Read sources. Invalid UTF-8 is a message at offset 0, with the
    // file registered empty so spans stay valid.
    let mut file_ids: Vec<FileId> = Vec::new();
    for path in paths {
        let bytes = std::fs::read(path)?;
        match String::from_utf8(bytes) {
            Ok(src) => file_ids.push(sess.add_file(path.clone(), src)),
            Err(_) => {
                let file = sess.add_file(path.clone(), String::new());
                file_ids.push(file);
                MessageBuilder::error()
                    .text(format!("file `{}` is not valid UTF-8", path.display()))
                    .primary(Span::new(0, 0, file), "invalid encoding")
                    .emit(&mut msg);
            }
        }
    }

    if sess.config.should_print(PrintKind::Source) {
        let mut out = String::new();
        for (_, file) in sess.source_map.files() {
            out.push_str(&format!("// {}\n{}", file.path().display(), file.src()));
        }
        dumps.push((PrintKind::Source, out));
    }

    // Lex + Parse //

    let parse_bench = sess.bench("parse", BenchmarkKind::Stage);
    let mut counter = NodeIdCounter::new();
    let mut files: Vec<FileItems> = Vec::new();
    let mut token_dump = String::new();
    for file in &file_ids {
        let lex_bench = sess.bench("lex", BenchmarkKind::SubStage);
        let src = sess.source_map.file(*file)?.src().to_owned();
        let (tokens, lex_messages) = lex(*file, &src, &sess.interner).split();
        msg.extend(lex_messages);
        lex_bench.finish();

        if sess.config.should_print(PrintKind::Tokens) {
            token_dump.push_str(&dump_tokens(&sess, &tokens));
        }

        let (items, parse_messages) =
            jacy_parser::parse_file(tokens, &sess.interner, &mut counter).split();
        msg.extend(parse_messages);
        files.push(FileItems { file: *file, items });
    }
    let party = Party::new(files, counter.count());
    parse_bench.finish();

    if sess.config.should_print(PrintKind::Tokens) {
        dumps.push((PrintKind::Tokens, token_dump));
    }
    if sess.config.should_print(PrintKind::Ast) {
        dumps.push((PrintKind::Ast, Printer::new(&sess.interner).party(&party)));
    }

    if !sess.config.reaches(CompileDepth::NameResolution) {
        return Ok(finish(sess, msg, dumps, total));
    }

    // Resolve //

    let resolve_bench = sess.bench("name-resolution", BenchmarkKind::Stage);
    let (resolutions, resolve_messages) = resolve_party(&party, &sess.interner).split();
    msg.extend(resolve_messages);
    resolve_bench.finish();

    if sess.config.should_print(PrintKind::ModTree) {
        dumps.push((
            PrintKind::ModTree,
            resolutions.def_table.dump_mod_tree(&sess.interner),
        ));
    }
    if sess.config.should_print(PrintKind::Definitions) {
        dumps.push((
            PrintKind::Definitions,
            resolutions.def_table.dump_defs(&sess.interner),
        ));
    }
    if sess.config.should_print(PrintKind::Resolutions) {
        dumps.push((PrintKind::Resolutions, resolutions.res.dump()));
    }

    if !sess.config.reaches(CompileDepth::Lowering) {
        return Ok(finish(sess, msg, dumps, total));
    }

    // Lower //

    let lower_bench = sess.bench("lowering", BenchmarkKind::Stage);
    let (hir, lower_messages) = Lowering::new(&resolutions, &sess.interner)
        .lower(&party)
        .split();
    msg.extend(lower_messages);
    lower_bench.finish();

    if sess.config.should_print(PrintKind::Hir) {
        dumps.push((PrintKind::Hir, format!("{hir:#?}\n")));
    }

    Ok(finish(sess, msg, dumps, total))
}

fn finish(
    sess: Session,
    mut msg: MessageHolder,
    dumps: Vec<(PrintKind, String)>,
    total: jacy_session::StageBench,
) -> PipelineOutcome {
    total.finish();
    let exit_code = if msg.has_errors() { 1 } else { 0 };
    let messages = msg.take();
    let rendered = MessageDumper::new(&sess.source_map).render_all(&messages);
    if !rendered.is_empty() {
        eprint!("{rendered}");
    }
    PipelineOutcome {
        messages,
        exit_code,
        dumps,
    }
}

fn dump_tokens(sess: &Session, tokens: &[Token]) -> String {
    let mut out = String::new();
    for token in tokens {
        let text = sess
            .source_map
            .slice(token.span)
            .unwrap_or_default()
            .to_owned();
        out.push_str(&format!(
            "{:?} `{}` @ {}..{}\n",
            token.kind,
            text,
            token.span.pos,
            token.span.hi()
        ));
    }
    out
}
