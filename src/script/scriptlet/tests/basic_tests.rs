//! Core language behaviour: bindings, functions, control flow

use super::helpers::{engine, global, run, s};
use crate::script::scriptlet::types::Val;

#[test]
fn test_assign_literals() {
    let (engine, _) = engine();
    run(&engine, "a = \"x\"\nb = 42\nc = true\nd = none\ne = [1, \"two\"]").unwrap();

    assert_eq!(global(&engine, "a"), s("x"));
    assert_eq!(global(&engine, "b"), Val::Int(42));
    assert_eq!(global(&engine, "c"), Val::Bool(true));
    assert_eq!(global(&engine, "d"), Val::None);
    assert_eq!(global(&engine, "e"), Val::List(vec![Val::Int(1), s("two")]));
}

#[test]
fn test_function_call_and_return() {
    let (engine, _) = engine();
    let source = r#"
fn greet(name) {
    return "hello " + name
}
out = greet("world")
"#;
    run(&engine, source).unwrap();
    assert_eq!(global(&engine, "out"), s("hello world"));
}

#[test]
fn test_function_without_return_yields_none() {
    let (engine, _) = engine();
    run(&engine, "fn f() { x = 1 }\nout = f()").unwrap();
    assert_eq!(global(&engine, "out"), Val::None);
}

#[test]
fn test_locals_do_not_leak_into_globals() {
    let (engine, _) = engine();
    run(&engine, "fn f() { inner = 1 }\nf()").unwrap();
    assert!(!engine.main_namespace().contains("inner"));
}

#[test]
fn test_rest_parameter_and_spread() {
    let (engine, _) = engine();
    let source = r#"
fn collect(first, *rest) {
    return [first] + rest
}
args = ["b", "c"]
out = collect("a", *args)
none_rest = collect("z")
"#;
    run(&engine, source).unwrap();
    assert_eq!(global(&engine, "out"), Val::List(vec![s("a"), s("b"), s("c")]));
    assert_eq!(global(&engine, "none_rest"), Val::List(vec![s("z")]));
}

#[test]
fn test_if_else_chain() {
    let (engine, _) = engine();
    let source = r#"
fn classify(x) {
    if x == 1 {
        return "one"
    } else if x == 2 {
        return "two"
    } else {
        return "many"
    }
}
a = classify(1)
b = classify(2)
c = classify(7)
"#;
    run(&engine, source).unwrap();
    assert_eq!(global(&engine, "a"), s("one"));
    assert_eq!(global(&engine, "b"), s("two"));
    assert_eq!(global(&engine, "c"), s("many"));
}

#[test]
fn test_for_loop_accumulates() {
    let (engine, _) = engine();
    let source = r#"
total = 0
for n in [1, 2, 3] {
    total = total + n
}
"#;
    run(&engine, source).unwrap();
    assert_eq!(global(&engine, "total"), Val::Int(6));
}

#[test]
fn test_return_from_inside_loop() {
    let (engine, _) = engine();
    let source = r#"
fn first_match(items, wanted) {
    for item in items {
        if item == wanted {
            return item
        }
    }
    return none
}
hit = first_match(["a", "b"], "b")
miss = first_match(["a"], "q")
"#;
    run(&engine, source).unwrap();
    assert_eq!(global(&engine, "hit"), s("b"));
    assert_eq!(global(&engine, "miss"), Val::None);
}

#[test]
fn test_try_catch_binds_message() {
    let (engine, _) = engine();
    let source = r#"
try {
    raise "bad thing"
} catch err {
    caught = err
}
"#;
    run(&engine, source).unwrap();
    assert_eq!(global(&engine, "caught"), s("bad thing"));
}

#[test]
fn test_runs_share_main_namespace() {
    let (engine, _) = engine();
    run(&engine, "fn f() { return \"from a\" }").unwrap();
    run(&engine, "out = f()").unwrap();
    assert_eq!(global(&engine, "out"), s("from a"));
}

#[test]
fn test_map_index_assignment() {
    let (engine, _) = engine();
    let source = r#"
import bridge
fn f() { }
bridge.exported_functions["name"] = f
registry = bridge.exported_functions
"#;
    run(&engine, source).unwrap();
    assert_eq!(engine.exported_names(), vec!["name".to_string()]);
    assert!(matches!(global(&engine, "registry"), Val::Map(_)));
}
