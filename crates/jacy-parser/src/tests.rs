//! Parser unit suite: grammar shapes, recovery and round-trips.

use std::collections::HashSet;

use jacy_ast::{
    AstVisitor, BinOp, Expr, ExprKind, FileItems, Item, ItemKind, NodeId, NodeIdCounter, Party,
    PatKind, Printer, StmtKind, PR,
};
use jacy_lexer::lex;
use jacy_message::{Level, Message};
use jacy_span::{FileId, Interner};
use pretty_assertions::assert_eq;

use crate::parser::{parse_file, Parser};

struct Parsed {
    items: Vec<PR<Item>>,
    messages: Vec<Message>,
    interner: Interner,
    node_count: u32,
}

fn parse_source(src: &str) -> Parsed {
    let interner = Interner::new();
    let file = FileId::new(0);
    let lexed = lex(file, src, &interner);
    assert!(
        !lexed.has_errors(),
        "lexer errors in test input: {:?}",
        lexed.messages
    );
    let mut counter = NodeIdCounter::new();
    let result = parse_file(lexed.value, &interner, &mut counter);
    Parsed {
        items: result.value,
        messages: result.messages,
        interner,
        node_count: counter.count(),
    }
}

fn parse_expr_source(src: &str) -> (Expr, Vec<Message>, Interner) {
    let interner = Interner::new();
    let lexed = lex(FileId::new(0), src, &interner);
    assert!(!lexed.has_errors());
    let mut counter = NodeIdCounter::new();
    let mut parser = Parser::new(lexed.value, &interner, &mut counter);
    let expr = parser.parse_expr().expect("expression should parse");
    let messages = parser.msg.take();
    (expr, messages, interner)
}

fn errors(messages: &[Message]) -> Vec<&Message> {
    messages.iter().filter(|m| m.level == Level::Error).collect()
}

// S1 //

#[test]
fn empty_input_parses_to_no_items() {
    let parsed = parse_source("");
    assert!(parsed.items.is_empty());
    assert!(parsed.messages.is_empty());
}

// S2 //

#[test]
fn function_with_infix_body() {
    let parsed = parse_source("fn main() { 1 + 2 }");
    assert!(parsed.messages.is_empty());
    assert_eq!(parsed.items.len(), 1);
    let item = parsed.items[0].as_ref().unwrap();
    let ItemKind::Func(func) = &item.kind else {
        panic!("expected a function, got {}", item.kind_name());
    };
    assert_eq!(
        parsed.interner.resolve_owned(func.name.sym).as_deref(),
        Some("main")
    );
    let body = func.body.as_ref().expect("function should have a body");
    assert!(!body.expr_body);
    let block = match &body.value.as_ref().unwrap().kind {
        ExprKind::Block(block) => block,
        other => panic!("expected block body, got {other:?}"),
    };
    assert_eq!(block.stmts.len(), 1);
    let stmt = block.stmts[0].as_ref().unwrap();
    let StmtKind::Expr(expr) = &stmt.kind else {
        panic!("expected expression statement");
    };
    let ExprKind::Infix { op, .. } = &expr.as_ref().unwrap().kind else {
        panic!("expected infix body");
    };
    assert_eq!(*op, BinOp::Add);
}

// S3 //

#[test]
fn precedence_groups_mul_add_cmp() {
    let (expr, messages, _) = parse_expr_source("a * b + c == d");
    assert!(messages.is_empty());
    // ((a * b) + c) == d
    let ExprKind::Infix { lhs, op, .. } = &expr.kind else {
        panic!("expected comparison at the top");
    };
    assert_eq!(*op, BinOp::Eq);
    let ExprKind::Infix { lhs: add_lhs, op: add_op, .. } = &lhs.as_ref().unwrap().kind else {
        panic!("expected addition under the comparison");
    };
    assert_eq!(*add_op, BinOp::Add);
    let ExprKind::Infix { op: mul_op, .. } = &add_lhs.as_ref().unwrap().kind else {
        panic!("expected multiplication on the left of the addition");
    };
    assert_eq!(*mul_op, BinOp::Mul);
}

#[test]
fn assignment_is_right_associative() {
    let (expr, _, _) = parse_expr_source("a = b = c");
    let ExprKind::Assign { rhs, .. } = &expr.kind else {
        panic!("expected assignment");
    };
    assert!(matches!(
        rhs.as_ref().unwrap().kind,
        ExprKind::Assign { .. }
    ));
}

#[test]
fn spaceship_sits_at_comparison_level() {
    let (expr, _, _) = parse_expr_source("a + b <=> c");
    let ExprKind::Infix { op, .. } = &expr.kind else {
        panic!("expected infix");
    };
    assert_eq!(*op, BinOp::Spaceship);
}

// S4 //

#[test]
fn chained_comparison_warns_and_stays_left_assoc() {
    let (expr, messages, _) = parse_expr_source("a < b > (c)");
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].level, Level::Warn);
    assert!(messages[0].text.contains("chained"));
    // (a < b) > (c)
    let ExprKind::Infix { lhs, op, rhs } = &expr.kind else {
        panic!("expected comparison");
    };
    assert_eq!(*op, BinOp::Gt);
    assert!(matches!(
        lhs.as_ref().unwrap().kind,
        ExprKind::Infix { op: BinOp::Lt, .. }
    ));
    assert!(matches!(rhs.as_ref().unwrap().kind, ExprKind::Paren(_)));
}

#[test]
fn turbofish_parses_as_generic_invoke() {
    let (expr, messages, _) = parse_expr_source("f::<T>(x)");
    assert!(messages.is_empty());
    let ExprKind::Invoke { callee, args } = &expr.kind else {
        panic!("expected invoke");
    };
    assert_eq!(args.len(), 1);
    let ExprKind::Path(path) = &callee.as_ref().unwrap().kind else {
        panic!("expected path callee");
    };
    let generics = path.target().generics.as_ref().expect("turbofish args");
    assert_eq!(generics.len(), 1);
}

#[test]
fn nested_turbofish_splits_shr() {
    let (expr, messages, _) = parse_expr_source("f::<a::Wrap<T>>(x)");
    assert!(messages.is_empty());
    assert!(matches!(expr.kind, ExprKind::Invoke { .. }));
}

#[test]
fn lone_angle_bracket_is_comparison() {
    let (expr, messages, _) = parse_expr_source("a < b");
    assert!(messages.is_empty());
    assert!(matches!(
        expr.kind,
        ExprKind::Infix { op: BinOp::Lt, .. }
    ));
}

// Items //

#[test]
fn parses_module_tree_items() {
    let parsed = parse_source(
        "mod m {
            pub fn f() {}
            struct S { pub x: int, y: str }
            enum E { A, B = 3, C(int), D { z: int } }
            trait T { fn req(); }
            impl T for S { fn req() {} }
            type Alias = S;
            use m2::thing;
        }",
    );
    assert!(parsed.messages.is_empty(), "{:?}", parsed.messages);
    let item = parsed.items[0].as_ref().unwrap();
    let ItemKind::Mod(module) = &item.kind else {
        panic!("expected module");
    };
    assert_eq!(module.items.len(), 7);
    let kinds: Vec<&'static str> = module
        .items
        .iter()
        .map(|item| item.as_ref().unwrap().kind_name())
        .collect();
    assert_eq!(
        kinds,
        vec![
            "function",
            "struct",
            "enum",
            "trait",
            "impl",
            "type alias",
            "use declaration"
        ]
    );
}

#[test]
fn func_params_with_labels_and_defaults() {
    let parsed = parse_source("fn greet(to name: str, excited flag: bool = false) {}");
    assert!(parsed.messages.is_empty());
    let item = parsed.items[0].as_ref().unwrap();
    let ItemKind::Func(func) = &item.kind else {
        panic!()
    };
    assert_eq!(func.sig.params.len(), 2);
    let first = &func.sig.params[0];
    assert_eq!(
        parsed
            .interner
            .resolve_owned(first.label.as_ref().unwrap().sym)
            .as_deref(),
        Some("to")
    );
    assert!(first.default.is_none());
    assert!(func.sig.params[1].default.is_some());
}

#[test]
fn expr_bodied_function() {
    let parsed = parse_source("fn double(x: int) -> int = x * 2;");
    assert!(parsed.messages.is_empty());
    let ItemKind::Func(func) = &parsed.items[0].as_ref().unwrap().kind else {
        panic!()
    };
    let body = func.body.as_ref().unwrap();
    assert!(body.expr_body);
    assert!(matches!(
        func.sig.ret_ty,
        jacy_ast::FuncRetTy::Some(_)
    ));
}

#[test]
fn generics_with_lifetimes_and_consts() {
    let parsed = parse_source("struct Buf<'a, T: Clone, const N: int> { data: [T; N] }");
    assert!(parsed.messages.is_empty(), "{:?}", parsed.messages);
    let ItemKind::Struct(item) = &parsed.items[0].as_ref().unwrap().kind else {
        panic!()
    };
    assert_eq!(item.generics.len(), 3);
}

#[test]
fn use_tree_kinds_classify() {
    let parsed = parse_source(
        "use a::b;
         use a::b::*;
         use a::{b, c::d};
         use a::b as c;",
    );
    assert!(parsed.messages.is_empty(), "{:?}", parsed.messages);
    let kinds: Vec<String> = parsed
        .items
        .iter()
        .map(|item| {
            let ItemKind::Use(decl) = &item.as_ref().unwrap().kind else {
                panic!()
            };
            decl.use_tree.as_ref().unwrap().kind.to_string()
        })
        .collect();
    assert_eq!(kinds, vec!["Raw", "All", "Specific", "Rebind"]);
}

#[test]
fn generics_on_intermediate_segment_is_a_parse_error() {
    let parsed = parse_source("fn f(x: a::B<int>::C) {}");
    let errs = errors(&parsed.messages);
    assert_eq!(errs.len(), 1);
    assert!(errs[0].text.contains("intermediate"));
}

// Patterns //

#[test]
fn pattern_forms() {
    let parsed = parse_source(
        "fn f() {
            match x {
                _ => 0,
                1 => 0,
                ref mut y @ z => 0,
                &inner => 0,
                a::b::C => 0,
                Point { x: px, y, .. } => 0,
                (first, .., last) => 0,
                [head, .., tail] => 0,
                1 | 2 | 3 => 0,
            };
        }",
    );
    assert!(parsed.messages.is_empty(), "{:?}", parsed.messages);
    let ItemKind::Func(func) = &parsed.items[0].as_ref().unwrap().kind else {
        panic!()
    };
    let ExprKind::Block(block) = &func.body.as_ref().unwrap().value.as_ref().unwrap().kind
    else {
        panic!()
    };
    let StmtKind::Expr(expr) = &block.stmts[0].as_ref().unwrap().kind else {
        panic!()
    };
    let ExprKind::Match { arms, .. } = &expr.as_ref().unwrap().kind else {
        panic!("expected match");
    };
    assert_eq!(arms.len(), 9);
    let pat_of = |i: usize| &arms[i].pat.as_ref().unwrap().kind;
    assert!(matches!(pat_of(0), PatKind::Wildcard));
    assert!(matches!(pat_of(1), PatKind::Lit(_)));
    assert!(
        matches!(pat_of(2), PatKind::Ident { reference: true, mutable: true, sub: Some(_), .. })
    );
    assert!(matches!(pat_of(3), PatKind::Ref { .. }));
    assert!(matches!(pat_of(4), PatKind::Path(_)));
    assert!(matches!(pat_of(5), PatKind::Struct { rest: true, .. }));
    let PatKind::Tuple { els, rest_pat_index } = pat_of(6) else {
        panic!("expected tuple pattern");
    };
    assert_eq!(els.len(), 3);
    assert_eq!(*rest_pat_index, Some(1));
    let PatKind::Slice { before, rest, after } = pat_of(7) else {
        panic!("expected slice pattern");
    };
    assert_eq!(before.len(), 1);
    assert!(rest.is_some());
    assert_eq!(after.len(), 1);
    assert!(matches!(pat_of(8), PatKind::Multi(els) if els.len() == 3));
}

// Recovery //

#[test]
fn recovery_reports_once_and_continues() {
    let parsed = parse_source("fn f() { let x = ; } fn g() {}");
    let errs = errors(&parsed.messages);
    assert_eq!(errs.len(), 1);
    assert!(errs[0].text.contains("expected"));
    // Both functions survive in the tree.
    assert_eq!(parsed.items.len(), 2);
    assert!(parsed.items.iter().all(|item| item.is_ok()));
}

#[test]
fn stray_tokens_at_top_level_recover_to_next_item() {
    let parsed = parse_source("+ fn f() {}");
    assert!(!errors(&parsed.messages).is_empty());
    let funcs = parsed
        .items
        .iter()
        .filter(|item| matches!(item, Ok(i) if matches!(i.kind, ItemKind::Func(_))))
        .count();
    assert_eq!(funcs, 1);
}

// Tree-wide invariants //

#[derive(Default)]
struct IdCollector {
    ids: Vec<NodeId>,
}

impl AstVisitor for IdCollector {
    fn visit_item(&mut self, item: &Item) {
        self.ids.push(item.id);
        jacy_ast::visit::walk_item(self, item);
    }

    fn visit_expr(&mut self, expr: &Expr) {
        self.ids.push(expr.id);
        jacy_ast::visit::walk_expr(self, expr);
    }

    fn visit_stmt(&mut self, stmt: &jacy_ast::Stmt) {
        self.ids.push(stmt.id);
        jacy_ast::visit::walk_stmt(self, stmt);
    }

    fn visit_pat(&mut self, pat: &jacy_ast::Pat) {
        self.ids.push(pat.id);
        jacy_ast::visit::walk_pat(self, pat);
    }

    fn visit_ty(&mut self, ty: &jacy_ast::Ty) {
        self.ids.push(ty.id);
        jacy_ast::visit::walk_ty(self, ty);
    }

    fn visit_ident(&mut self, ident: &jacy_ast::Ident) {
        self.ids.push(ident.id);
    }
}

#[test]
fn node_ids_are_unique_and_dense_enough() {
    let parsed = parse_source(
        "mod m {
            pub fn f<T>(a: T, named b: int = 1) -> int {
                let mut acc = 0;
                for i in xs { acc += i; }
                while acc < 100 { acc = acc * 2; }
                if acc > 10 { acc } else { 0 }
            }
        }",
    );
    assert!(parsed.messages.is_empty(), "{:?}", parsed.messages);
    let party = Party::new(
        vec![FileItems {
            file: FileId::new(0),
            items: parsed.items,
        }],
        parsed.node_count,
    );
    let mut collector = IdCollector::default();
    collector.visit_party(&party);
    let mut seen = HashSet::new();
    for id in &collector.ids {
        assert!(!id.is_dummy());
        assert!(seen.insert(*id), "duplicate node id {id:?}");
        assert!(id.as_u32() < party.node_count);
    }
}

/// Checks that every child span stays inside its parent's span, in
/// the same file.
struct SpanChecker {
    stack: Vec<jacy_span::Span>,
}

impl SpanChecker {
    fn enter(&mut self, span: jacy_span::Span) {
        if let Some(parent) = self.stack.last() {
            assert!(
                parent.contains(span),
                "child span {span:?} escapes parent {parent:?}"
            );
        }
        self.stack.push(span);
    }
}

impl AstVisitor for SpanChecker {
    fn visit_item(&mut self, item: &Item) {
        self.enter(item.span);
        jacy_ast::visit::walk_item(self, item);
        self.stack.pop();
    }

    fn visit_stmt(&mut self, stmt: &jacy_ast::Stmt) {
        self.enter(stmt.span);
        jacy_ast::visit::walk_stmt(self, stmt);
        self.stack.pop();
    }

    fn visit_expr(&mut self, expr: &Expr) {
        self.enter(expr.span);
        jacy_ast::visit::walk_expr(self, expr);
        self.stack.pop();
    }

    fn visit_pat(&mut self, pat: &jacy_ast::Pat) {
        self.enter(pat.span);
        jacy_ast::visit::walk_pat(self, pat);
        self.stack.pop();
    }

    fn visit_ty(&mut self, ty: &jacy_ast::Ty) {
        self.enter(ty.span);
        jacy_ast::visit::walk_ty(self, ty);
        self.stack.pop();
    }

    fn visit_ident(&mut self, ident: &jacy_ast::Ident) {
        self.enter(ident.span);
        self.stack.pop();
    }
}

#[test]
fn child_spans_nest_inside_parents() {
    let parsed = parse_source(
        "mod m {
            pub fn f(a: int, named b: (int, str)) -> [int; 3] {
                let x = a * (a + 2);
                match x { 1 | 2 => x, other => other + 1, }
            }
        }",
    );
    assert!(parsed.messages.is_empty(), "{:?}", parsed.messages);
    let mut checker = SpanChecker { stack: Vec::new() };
    for item in parsed.items.iter().flatten() {
        checker.visit_item(item);
    }
    assert!(checker.stack.is_empty());
}

// Round-trip //

fn roundtrip(src: &str) {
    let first = parse_source(src);
    assert!(
        first.messages.is_empty(),
        "first parse of {src:?}: {:?}",
        first.messages
    );
    let party = Party::new(
        vec![FileItems {
            file: FileId::new(0),
            items: first.items,
        }],
        first.node_count,
    );
    let printed = Printer::new(&first.interner).party(&party);

    let second = parse_source(&printed);
    assert!(
        second.messages.is_empty(),
        "re-parse of {printed:?}: {:?}",
        second.messages
    );
    let party2 = Party::new(
        vec![FileItems {
            file: FileId::new(0),
            items: second.items,
        }],
        second.node_count,
    );
    let printed2 = Printer::new(&second.interner).party(&party2);
    // The printer ignores spans and node ids, so equal output means
    // structural equality modulo spans and ids.
    assert_eq!(printed, printed2);
}

#[test]
fn pretty_print_roundtrips() {
    roundtrip("fn main() { 1 + 2 }");
    roundtrip("fn f(x: int) -> int = x * 2;");
    roundtrip(
        "mod m {
            pub struct P<T> { x: T, y: (int, str) }
            enum E { A, B = 3, C(int, named: str), D { q: [int; 4] } }
            pub fn f(a: int = 1) -> (int) { let p = P { x: a, y: e }; p.x }
        }",
    );
    roundtrip("fn f() { a * b + c == d; f::<T>(x); m::g(-y, not z); }");
    roundtrip(
        "fn g() {
            match v {
                Point { x, .. } => x,
                (a, .., b) => a,
                [h, .., t] => h,
                1 | 2 => 0,
                _ => 9,
            };
        }",
    );
    roundtrip("fn h() { if a { 1 } elif b { 2 } else { 3 }; while c { d(); } }");
    roundtrip("use a::{b, c::d, e::*, f as g};");
    roundtrip("fn k() { let s = \"line\\n\\\"quoted\\\"\"; s }");
    roundtrip("fn lam() { |x: int, y| x + y; loop { break 1; }; }");
    roundtrip("impl<T> Show for Pair<T> { fn show(self_: Pair<T>) -> str { t() } init(x: int) {} }");
}

#[test]
fn float_literals_stay_symbolic_through_roundtrip() {
    roundtrip("fn f() { 1.5; 2.0e10f64; 3.25E-2f32; }");
}
