//! Lowering scenarios: sugar elimination, body separation and id
//! discipline.

use jacy_ast::{FileItems, NodeIdCounter, Party as AstParty};
use jacy_hir::{
    Body, ChildId, ExprKind, HirId, ItemKind, Lowering, Party, PatKind, StmtKind,
};
use jacy_lexer::lex;
use jacy_parser::parse_file;
use jacy_resolve::{resolve_party, DefId, DefKind, Resolutions};
use jacy_span::{FileId, Interner};
use pretty_assertions::assert_eq;

struct Lowered {
    party: Party,
    resolutions: Resolutions,
    interner: Interner,
}

fn lower_source(src: &str) -> Lowered {
    let interner = Interner::new();
    let lexed = lex(FileId::new(0), src, &interner);
    assert!(!lexed.has_errors(), "lex errors: {:?}", lexed.messages);
    let mut counter = NodeIdCounter::new();
    let parsed = parse_file(lexed.value, &interner, &mut counter);
    assert!(!parsed.has_errors(), "parse errors: {:?}", parsed.messages);
    let ast_party = AstParty::new(
        vec![FileItems {
            file: FileId::new(0),
            items: parsed.value,
        }],
        counter.count(),
    );
    let resolved = resolve_party(&ast_party, &interner);
    assert!(
        !resolved.has_errors(),
        "resolve errors: {:?}",
        resolved.messages
    );
    let resolutions = resolved.value;
    let lowered = Lowering::new(&resolutions, &interner).lower(&ast_party);
    assert!(lowered.messages.is_empty());
    Lowered {
        party: lowered.value,
        resolutions,
        interner,
    }
}

fn func_def(lowered: &Lowered, name: &str) -> DefId {
    let sym = lowered.interner.intern(name);
    lowered
        .resolutions
        .def_table
        .defs()
        .iter()
        .find(|def| def.kind == DefKind::Func && def.ident.sym == sym)
        .unwrap_or_else(|| panic!("no function `{name}`"))
        .id
}

fn func_body<'a>(lowered: &'a Lowered, name: &str) -> &'a Body {
    let def = func_def(lowered, name);
    let owner = lowered.party.owner(def);
    let ItemKind::Func { body, .. } = &owner.item.kind else {
        panic!("`{name}` did not lower to a function shell");
    };
    let body_id = body.expect("function should have a body");
    assert_eq!(body_id.0.owner, def, "body must belong to its function");
    lowered.party.body(body_id)
}

// S2 //

#[test]
fn function_body_is_separated_from_the_shell() {
    let lowered = lower_source("fn main() { 1 + 2 }");
    let body = func_body(&lowered, "main");
    assert!(!body.expr_body);
    let ExprKind::Block(block) = &body.value.kind else {
        panic!("expected block body");
    };
    let StmtKind::Expr(expr) = &block.stmts[0].kind else {
        panic!("expected expression statement");
    };
    assert!(matches!(expr.kind, ExprKind::Infix { .. }));
}

#[test]
fn expr_bodies_keep_their_flag() {
    let lowered = lower_source("fn double(x: int) -> int = x * 2;");
    let body = func_body(&lowered, "double");
    assert!(body.expr_body);
    assert!(matches!(body.value.kind, ExprKind::Infix { .. }));
}

// Desugaring //

#[test]
fn while_lowers_to_loop_with_conditional_break() {
    let lowered = lower_source("fn f() { while a() { b(); } } fn a() -> bool { true } fn b() {}");
    let body = func_body(&lowered, "f");
    let ExprKind::Block(block) = &body.value.kind else {
        panic!()
    };
    let StmtKind::Expr(expr) = &block.stmts[0].kind else {
        panic!()
    };
    let ExprKind::Loop { body: loop_body } = &expr.kind else {
        panic!("while must lower to a loop");
    };
    let StmtKind::Expr(if_expr) = &loop_body.stmts[0].kind else {
        panic!()
    };
    let ExprKind::If {
        cond, else_expr, ..
    } = &if_expr.kind
    else {
        panic!("loop body must start with the condition check");
    };
    assert!(matches!(cond.kind, ExprKind::Invoke { .. }));
    let else_expr = else_expr.as_ref().expect("desugared if needs an else");
    let ExprKind::Block(else_block) = &else_expr.kind else {
        panic!()
    };
    let StmtKind::Expr(break_expr) = &else_block.stmts[0].kind else {
        panic!()
    };
    assert!(matches!(break_expr.kind, ExprKind::Break { value: None }));
}

#[test]
fn for_lowers_to_loop_match_over_iterator() {
    let lowered = lower_source("fn f(xs: [int]) { for x in xs { } }");
    let body = func_body(&lowered, "f");
    let ExprKind::Block(block) = &body.value.kind else {
        panic!()
    };
    let StmtKind::Expr(expr) = &block.stmts[0].kind else {
        panic!()
    };
    let ExprKind::Loop { body: loop_body } = &expr.kind else {
        panic!("for must lower to a loop");
    };
    let StmtKind::Expr(match_expr) = &loop_body.stmts[0].kind else {
        panic!()
    };
    let ExprKind::Match { subject, arms } = &match_expr.kind else {
        panic!("loop body must be a match");
    };
    // Subject is `xs.next()`.
    let ExprKind::Invoke { callee, args } = &subject.kind else {
        panic!()
    };
    assert!(args.is_empty());
    let ExprKind::Field { field, .. } = &callee.kind else {
        panic!()
    };
    assert_eq!(lowered.interner.resolve_owned(field.sym).as_deref(), Some("next"));

    assert_eq!(arms.len(), 2);
    let PatKind::Ctor { name, args } = &arms[0].pat.kind else {
        panic!("first arm must match the element constructor");
    };
    assert_eq!(lowered.interner.resolve_owned(name.sym).as_deref(), Some("Some"));
    assert_eq!(args.len(), 1);
    assert!(matches!(args[0].kind, PatKind::Ident { .. }));
    let PatKind::Ctor { name, args } = &arms[1].pat.kind else {
        panic!("second arm must match the exhausted constructor");
    };
    assert_eq!(lowered.interner.resolve_owned(name.sym).as_deref(), Some("None"));
    assert!(args.is_empty());
    assert!(matches!(arms[1].value.kind, ExprKind::Break { value: None }));
}

#[test]
fn struct_shorthand_expands_to_full_fields() {
    let lowered = lower_source(
        "struct P { x: int, y: int }
         fn make(x: int, y: int) -> P { P { x, y: y } }",
    );
    let body = func_body(&lowered, "make");
    let ExprKind::Block(block) = &body.value.kind else {
        panic!()
    };
    let StmtKind::Expr(expr) = &block.stmts[0].kind else {
        panic!()
    };
    let ExprKind::StructLit { fields, base, .. } = &expr.kind else {
        panic!("expected a struct literal");
    };
    assert!(base.is_none());
    assert_eq!(fields.len(), 2);
    for field in fields {
        // Both fields are in full `name: value` form now.
        let ExprKind::Path(path) = &field.value.kind else {
            panic!("field value must be an expression");
        };
        assert!(matches!(path.res, jacy_resolve::Res::Local(_)));
    }
}

// Identity discipline //

#[test]
fn owner_shells_sit_at_child_zero() {
    let lowered = lower_source("mod m { pub fn f() {} } fn main() { m::f(); }");
    for (def_id, owner) in &lowered.party.owners {
        assert_eq!(owner.item.hir_id, HirId::owner_of(*def_id));
        assert_eq!(owner.item.hir_id.child, ChildId::OWNER);
        assert!(!owner.item.hir_id.is_dummy());
        for (child, body) in &owner.bodies {
            assert!(!child.is_owner(), "bodies never take the owner slot");
            assert_eq!(body.id.0.owner, *def_id);
        }
    }
}

#[test]
fn paths_carry_res_not_strings() {
    let lowered = lower_source("mod m { pub fn f() {} } fn main() { m::f(); }");
    let f_def = func_def(&lowered, "f");
    let body = func_body(&lowered, "main");
    let ExprKind::Block(block) = &body.value.kind else {
        panic!()
    };
    let StmtKind::Expr(expr) = &block.stmts[0].kind else {
        panic!()
    };
    let ExprKind::Invoke { callee, .. } = &expr.kind else {
        panic!()
    };
    let ExprKind::Path(path) = &callee.kind else {
        panic!()
    };
    assert_eq!(path.res, jacy_resolve::Res::Def(f_def));
}

// Determinism //

#[test]
fn lowering_twice_is_byte_identical() {
    let src = "mod m {
        pub struct P<T> { x: T }
        pub fn make(v: int) -> P<int> { P { x: v } }
    }
    fn main(ys: [int]) {
        let p = m::make(3);
        let mut i = 0;
        while i < 10 { i += 1; }
        for q in ys { q; }
        p;
    }";
    let interner = Interner::new();
    let lexed = lex(FileId::new(0), src, &interner);
    assert!(!lexed.has_errors());
    let mut counter = NodeIdCounter::new();
    let parsed = parse_file(lexed.value, &interner, &mut counter);
    assert!(!parsed.has_errors(), "{:?}", parsed.messages);
    let ast_party = AstParty::new(
        vec![FileItems {
            file: FileId::new(0),
            items: parsed.value,
        }],
        counter.count(),
    );
    let resolved = resolve_party(&ast_party, &interner);
    assert!(!resolved.has_errors(), "{:?}", resolved.messages);

    let first = Lowering::new(&resolved.value, &interner).lower(&ast_party);
    let second = Lowering::new(&resolved.value, &interner).lower(&ast_party);
    assert_eq!(
        format!("{:#?}", first.value),
        format!("{:#?}", second.value)
    );
}
