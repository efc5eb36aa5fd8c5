//! End-to-end resolution scenarios over parsed source.

use jacy_ast::{
    Expr, ExprKind, FileItems, Item, ItemKind, NodeIdCounter, Party, Path, StmtKind,
};
use jacy_lexer::lex;
use jacy_message::{Level, Message};
use jacy_parser::parse_file;
use jacy_resolve::{resolve_party, DefKind, Namespace, Res, Resolutions};
use jacy_span::{FileId, Interner};
use pretty_assertions::assert_eq;

struct Resolved {
    party: Party,
    resolutions: Resolutions,
    messages: Vec<Message>,
    interner: Interner,
}

fn resolve_source(src: &str) -> Resolved {
    let interner = Interner::new();
    let lexed = lex(FileId::new(0), src, &interner);
    assert!(!lexed.has_errors(), "lex errors: {:?}", lexed.messages);
    let mut counter = NodeIdCounter::new();
    let parsed = parse_file(lexed.value, &interner, &mut counter);
    assert!(!parsed.has_errors(), "parse errors: {:?}", parsed.messages);
    let party = Party::new(
        vec![FileItems {
            file: FileId::new(0),
            items: parsed.value,
        }],
        counter.count(),
    );
    let result = resolve_party(&party, &interner);
    Resolved {
        party,
        resolutions: result.value,
        messages: result.messages,
        interner,
    }
}

fn errors(resolved: &Resolved) -> Vec<&Message> {
    resolved
        .messages
        .iter()
        .filter(|m| m.level == Level::Error)
        .collect()
}

fn find_def(resolved: &Resolved, kind: DefKind, name: &str) -> jacy_resolve::DefId {
    let sym = resolved.interner.intern(name);
    resolved
        .resolutions
        .def_table
        .defs()
        .iter()
        .find(|def| def.kind == kind && def.ident.sym == sym)
        .unwrap_or_else(|| panic!("no {kind} def named `{name}`"))
        .id
}

/// Item at `index`, expected to be a function.
fn func_item(party: &Party, index: usize) -> &Item {
    let item = party
        .items()
        .nth(index)
        .expect("missing item")
        .as_ref()
        .expect("item failed to parse");
    assert!(matches!(item.kind, ItemKind::Func(_)));
    item
}

/// The statements of a function's block body.
fn body_stmts(item: &Item) -> &[jacy_ast::PR<jacy_ast::Stmt>] {
    let ItemKind::Func(func) = &item.kind else {
        panic!("not a function");
    };
    let body = func.body.as_ref().expect("no body");
    let ExprKind::Block(block) = &body.value.as_ref().unwrap().kind else {
        panic!("not a block body");
    };
    &block.stmts
}

fn stmt_expr(stmts: &[jacy_ast::PR<jacy_ast::Stmt>], index: usize) -> &Expr {
    let StmtKind::Expr(expr) = &stmts[index].as_ref().unwrap().kind else {
        panic!("statement {index} is not an expression");
    };
    expr.as_ref().unwrap()
}

fn as_path(expr: &Expr) -> &Path {
    match &expr.kind {
        ExprKind::Path(path) => path,
        ExprKind::Invoke { callee, .. } => as_path(callee.as_ref().unwrap()),
        other => panic!("expected a path-like expression, got {other:?}"),
    }
}

// S5 //

#[test]
fn qualified_path_resolves_to_pub_fn() {
    let resolved = resolve_source("mod m { pub fn f() {} } fn main() { m::f(); }");
    assert!(errors(&resolved).is_empty(), "{:?}", resolved.messages);
    let f_def = find_def(&resolved, DefKind::Func, "f");
    let main_item = func_item(&resolved.party, 1);
    let path = as_path(stmt_expr(body_stmts(main_item), 0));
    assert_eq!(resolved.resolutions.res.get(path.id), Some(Res::Def(f_def)));
}

#[test]
fn private_target_reports_only_a_visibility_violation() {
    let resolved = resolve_source("mod m { fn f() {} } fn main() { m::f(); }");
    let errs = errors(&resolved);
    assert_eq!(errs.len(), 1, "{:?}", resolved.messages);
    assert!(errs[0].text.contains("private"));
    // Best-effort resolution still points at the def.
    let f_def = find_def(&resolved, DefKind::Func, "f");
    let main_item = func_item(&resolved.party, 1);
    let path = as_path(stmt_expr(body_stmts(main_item), 0));
    assert_eq!(resolved.resolutions.res.get(path.id), Some(Res::Def(f_def)));
}

// S6 //

#[test]
fn mutually_recursive_uses_report_cycles_and_bind_nothing() {
    let resolved =
        resolve_source("mod a { use super::b::x; } mod b { use super::a::x; }");
    let errs = errors(&resolved);
    assert_eq!(errs.len(), 2, "{:?}", resolved.messages);
    assert!(errs.iter().all(|e| e.text.contains("cyclic")));

    let table = &resolved.resolutions.def_table;
    let x = resolved.interner.intern("x");
    for name in ["a", "b"] {
        let def = find_def(&resolved, DefKind::Mod, name);
        let module = table.module(table.module_of_def(def));
        assert!(
            module.binding(Namespace::Value, x).is_none(),
            "module `{name}` must stay unbound"
        );
    }
}

// Definitions //

#[test]
fn redefinition_is_reported_and_first_binding_wins() {
    let resolved = resolve_source("fn f() {} struct S {} fn f() {} fn main() { f(); }");
    let errs = errors(&resolved);
    assert_eq!(errs.len(), 1);
    assert!(errs[0].text.contains("already declared"));
    let first = find_def(&resolved, DefKind::Func, "f");
    let main_item = func_item(&resolved.party, 3);
    let path = as_path(stmt_expr(body_stmts(main_item), 0));
    assert_eq!(resolved.resolutions.res.get(path.id), Some(Res::Def(first)));
}

#[test]
fn node_def_maps_are_mutual_inverses() {
    let resolved = resolve_source(
        "mod m { pub struct S { x: int } pub enum E { A, B } trait T { fn g(); } }",
    );
    let (to_def, to_node) = resolved.resolutions.def_table.node_def_pairs();
    assert_eq!(to_def.len(), to_node.len());
    for (node, def) in to_def {
        assert_eq!(to_node.get(def), Some(node));
    }
}

// Ribs and locals //

#[test]
fn local_binding_resolves_through_ribs() {
    let resolved = resolve_source("fn main() { let x = 1; x; }");
    assert!(errors(&resolved).is_empty(), "{:?}", resolved.messages);
    let main_item = func_item(&resolved.party, 0);
    let stmts = body_stmts(main_item);
    let path = as_path(stmt_expr(stmts, 1));
    let Some(Res::Local(node)) = resolved.resolutions.res.get(path.id) else {
        panic!("expected a local resolution");
    };
    // The local points at the `let` binding pattern.
    let StmtKind::Let(let_stmt) = &stmts[0].as_ref().unwrap().kind else {
        panic!()
    };
    assert_eq!(node, let_stmt.pat.as_ref().unwrap().id);
}

#[test]
fn inner_binding_shadows_parameter() {
    let resolved = resolve_source("fn f(x: int) { let x = 2; x; }");
    assert!(errors(&resolved).is_empty());
    let item = func_item(&resolved.party, 0);
    let stmts = body_stmts(item);
    let path = as_path(stmt_expr(stmts, 1));
    let StmtKind::Let(let_stmt) = &stmts[0].as_ref().unwrap().kind else {
        panic!()
    };
    assert_eq!(
        resolved.resolutions.res.get(path.id),
        Some(Res::Local(let_stmt.pat.as_ref().unwrap().id))
    );
}

#[test]
fn unresolved_name_is_an_error_with_err_res() {
    let resolved = resolve_source("fn main() { missing; }");
    let errs = errors(&resolved);
    assert_eq!(errs.len(), 1);
    assert!(errs[0].text.contains("cannot resolve"));
    let main_item = func_item(&resolved.party, 0);
    let path = as_path(stmt_expr(body_stmts(main_item), 0));
    assert_eq!(resolved.resolutions.res.get(path.id), Some(Res::Err));
}

#[test]
fn name_in_sibling_namespace_reports_wrong_namespace() {
    // `S` exists, but only as a type; using it as a value is a wrong
    // namespace, not a missing name.
    let resolved = resolve_source("struct S { x: int } fn main() { S; }");
    let errs = errors(&resolved);
    assert_eq!(errs.len(), 1, "{:?}", resolved.messages);
    assert!(errs[0].text.contains("type namespace, not the value namespace"));
    let main_item = func_item(&resolved.party, 1);
    let path = as_path(stmt_expr(body_stmts(main_item), 0));
    assert_eq!(resolved.resolutions.res.get(path.id), Some(Res::Err));
}

#[test]
fn wrong_namespace_applies_to_qualified_paths_too() {
    let resolved = resolve_source("mod m { pub fn f() {} } type T = m::f;");
    let errs = errors(&resolved);
    assert_eq!(errs.len(), 1, "{:?}", resolved.messages);
    assert!(errs[0].text.contains("value namespace, not the type namespace"));
}

#[test]
fn builtin_types_resolve_to_synthetic_defs() {
    let resolved = resolve_source("fn id(x: int) -> int { x }");
    assert!(errors(&resolved).is_empty(), "{:?}", resolved.messages);
    let table = &resolved.resolutions.def_table;
    let int_def = table
        .builtin_type(resolved.interner.intern("int"))
        .expect("`int` is seeded");
    assert_eq!(table.def(int_def).kind, DefKind::PrimType);
    let hits = resolved
        .resolutions
        .res
        .iter()
        .filter(|(_, res)| *res == Res::Def(int_def))
        .count();
    assert_eq!(hits, 2);
}

#[test]
fn user_types_shadow_builtins() {
    let resolved = resolve_source("struct int { raw: i64 } fn f(x: int) {}");
    assert!(errors(&resolved).is_empty(), "{:?}", resolved.messages);
    let user = find_def(&resolved, DefKind::Struct, "int");
    let item = func_item(&resolved.party, 1);
    let ItemKind::Func(func) = &item.kind else {
        panic!()
    };
    let ty = func.sig.params[0].ty.as_ref().unwrap();
    let jacy_ast::TyKind::Path(path) = &ty.kind else {
        panic!("expected a path type");
    };
    assert_eq!(resolved.resolutions.res.get(path.id), Some(Res::Def(user)));
}

#[test]
fn type_params_resolve_in_type_namespace() {
    let resolved = resolve_source("struct S<T> { x: T, y: S<int> }");
    assert!(errors(&resolved).is_empty(), "{:?}", resolved.messages);
    let t_param = find_def(&resolved, DefKind::TypeParam, "T");
    let hit = resolved
        .resolutions
        .res
        .iter()
        .filter(|(_, res)| *res == Res::Def(t_param))
        .count();
    assert_eq!(hit, 1);
}

#[test]
fn enum_variant_path_resolves_in_value_namespace() {
    let resolved = resolve_source("enum E { A, B } fn main() { E::A; }");
    assert!(errors(&resolved).is_empty(), "{:?}", resolved.messages);
    let variant = find_def(&resolved, DefKind::Variant, "A");
    let main_item = func_item(&resolved.party, 1);
    let path = as_path(stmt_expr(body_stmts(main_item), 0));
    assert_eq!(
        resolved.resolutions.res.get(path.id),
        Some(Res::Def(variant))
    );
}

// Imports //

#[test]
fn rebind_import_resolves_under_alias() {
    let resolved =
        resolve_source("mod a { pub fn g() {} } use a::g as h; fn main() { h(); }");
    assert!(errors(&resolved).is_empty(), "{:?}", resolved.messages);
    let g_def = find_def(&resolved, DefKind::Func, "g");
    let main_item = func_item(&resolved.party, 2);
    let path = as_path(stmt_expr(body_stmts(main_item), 0));
    assert_eq!(resolved.resolutions.res.get(path.id), Some(Res::Def(g_def)));
}

#[test]
fn glob_import_copies_visible_bindings() {
    let resolved = resolve_source(
        "mod a { pub fn g() {} fn hidden() {} }
         mod b { use super::a::*; fn call() { g(); } }",
    );
    assert!(errors(&resolved).is_empty(), "{:?}", resolved.messages);
    // Only the pub binding was copied.
    let table = &resolved.resolutions.def_table;
    let b_def = find_def(&resolved, DefKind::Mod, "b");
    let module = table.module(table.module_of_def(b_def));
    assert!(module
        .binding(Namespace::Value, resolved.interner.intern("g"))
        .is_some());
    assert!(module
        .binding(Namespace::Value, resolved.interner.intern("hidden"))
        .is_none());
}

#[test]
fn chained_reexports_resolve_lazily() {
    let resolved = resolve_source(
        "mod a { pub fn deep() {} }
         mod b { pub use super::a::deep; }
         fn main() { b::deep(); }",
    );
    assert!(errors(&resolved).is_empty(), "{:?}", resolved.messages);
    let deep = find_def(&resolved, DefKind::Func, "deep");
    let main_item = func_item(&resolved.party, 2);
    let path = as_path(stmt_expr(body_stmts(main_item), 0));
    assert_eq!(resolved.resolutions.res.get(path.id), Some(Res::Def(deep)));
}

#[test]
fn specific_use_trees_resolve_relative_to_their_prefix() {
    let resolved = resolve_source(
        "mod a { pub fn b() {} pub mod c { pub fn d() {} } }
         use a::{b, c::d};
         fn main() { b(); d(); }",
    );
    assert!(errors(&resolved).is_empty(), "{:?}", resolved.messages);
    let b_def = find_def(&resolved, DefKind::Func, "b");
    let d_def = find_def(&resolved, DefKind::Func, "d");
    let main_item = func_item(&resolved.party, 2);
    let stmts = body_stmts(main_item);
    assert_eq!(
        resolved.resolutions.res.get(as_path(stmt_expr(stmts, 0)).id),
        Some(Res::Def(b_def))
    );
    assert_eq!(
        resolved.resolutions.res.get(as_path(stmt_expr(stmts, 1)).id),
        Some(Res::Def(d_def))
    );
}

// Overloads //

#[test]
fn labeled_functions_group_into_an_overload() {
    let resolved = resolve_source(
        "fn send(to addr: int) {}
         fn send(via route: int) {}
         fn main() { send; }",
    );
    assert!(errors(&resolved).is_empty(), "{:?}", resolved.messages);
    let main_item = func_item(&resolved.party, 2);
    let path = as_path(stmt_expr(body_stmts(main_item), 0));
    // The unsuffixed name resolves to the group's own def; the
    // type-checker narrows it by suffix.
    let Some(Res::Def(group_def)) = resolved.resolutions.res.get(path.id) else {
        panic!("expected a def resolution for the overload group");
    };
    let table = &resolved.resolutions.def_table;
    assert_eq!(table.def(group_def).kind, DefKind::FuncOverload);
    let group = table
        .overload_of_def(group_def)
        .expect("group def must map back to its overload id");
    assert_eq!(table.func_overload(group).len(), 2);
}

// Totality //

#[test]
fn clean_programs_resolve_totally() {
    let resolved = resolve_source(
        "mod util { pub fn helper(x: int) -> int { x } }
         enum Shape { Dot, Line }
         fn area(s: Shape) -> int {
            match s {
                Shape::Dot => 0,
                Shape::Line => 1,
                _ => 2,
            }
         }
         fn main() { let d = Shape::Dot; util::helper(area(d)); }",
    );
    assert!(errors(&resolved).is_empty(), "{:?}", resolved.messages);
    for (node, res) in resolved.resolutions.res.iter() {
        assert!(res != Res::Err, "node {node} left unresolved");
    }
}
