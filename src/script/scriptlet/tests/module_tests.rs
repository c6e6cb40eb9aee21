//! Module resolution and the host support module

use super::helpers::{engine, global, run, s, write_script};
use crate::script::scriptlet::types::Val;
use crate::script::{ScriptArg, ScriptEngine, ScriptError};

#[test]
fn test_import_missing_module() {
    let (engine, _) = engine();
    let err = run(&engine, "import nowhere").unwrap_err();
    assert_eq!(err, ScriptError::Import("nowhere".to_string()));
}

#[test]
fn test_import_from_search_path_runs_once() {
    let (engine, calls) = engine();
    let dir = tempfile::tempdir().unwrap();
    write_script(&dir, "util.sl", "import bridge\nbridge.invoke(\"loaded\")\nfn twice(x) { return x + x }");
    engine.insert_module_path(0, dir.path().to_path_buf());

    run(&engine, "import util\nimport util\nout = util.twice(\"ab\")").unwrap();

    assert_eq!(global(&engine, "out"), s("abab"));
    let calls = calls.calls.borrow();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].command, "loaded");
    assert_eq!(calls[0].caller, "util");
}

#[test]
fn test_search_path_order_prefers_earlier_entries() {
    let (engine, _) = engine();
    let first = tempfile::tempdir().unwrap();
    let second = tempfile::tempdir().unwrap();
    write_script(&first, "pick.sl", "name = \"first\"");
    write_script(&second, "pick.sl", "name = \"second\"");
    engine.insert_module_path(0, second.path().to_path_buf());
    engine.insert_module_path(0, first.path().to_path_buf());

    run(&engine, "import pick\nout = pick.name").unwrap();
    assert_eq!(global(&engine, "out"), s("first"));
}

#[test]
fn test_failed_import_is_not_cached() {
    let (engine, _) = engine();
    let dir = tempfile::tempdir().unwrap();
    write_script(&dir, "broken.sl", "raise \"module failed\"");
    engine.insert_module_path(0, dir.path().to_path_buf());

    assert!(run(&engine, "import broken").is_err());
    let err = run(&engine, "import broken").unwrap_err();
    assert_eq!(err.to_string(), "module failed");
}

#[test]
fn test_unknown_module_attribute() {
    let (engine, _) = engine();
    let err = run(&engine, "import bridge\nbridge.nothing()").unwrap_err();
    assert!(matches!(err, ScriptError::Attribute(_)));
}

/* ===================== bridge / host ===================== */

#[test]
fn test_bridge_invoke_quotes_plain_and_passes_literal() {
    let (engine, calls) = engine();
    run(
        &engine,
        "import bridge\nbridge.invoke(\"cmd\", \"a;b\", bridge.literal(\"c;d\"), 3)",
    )
    .unwrap();

    let calls = calls.calls.borrow();
    assert_eq!(calls[0].command, "cmd");
    assert_eq!(calls[0].caller, "__main__");
    assert_eq!(
        calls[0].args,
        vec![
            ScriptArg::quoted("a;b"),
            ScriptArg::literal("c;d"),
            ScriptArg::quoted("3"),
        ]
    );
}

#[test]
fn test_bridge_get_returns_none_when_unset() {
    let (engine, calls) = engine();
    calls
        .vars
        .borrow_mut()
        .insert("SET".to_string(), "value".to_string());

    run(&engine, "import bridge\na = bridge.get(\"SET\")\nb = bridge.get(\"UNSET\")").unwrap();

    assert_eq!(global(&engine, "a"), s("value"));
    assert_eq!(global(&engine, "b"), Val::None);
}

#[test]
fn test_bridge_enable_debug() {
    let (engine, calls) = engine();
    run(&engine, "import bridge\nbridge.enable_debug(true)").unwrap();
    assert!(calls.debug.get());
}

#[test]
fn test_invoke_failure_surfaces_as_host_error() {
    let (engine, calls) = engine();
    calls.failing.borrow_mut().push("bad".to_string());

    let err = run(&engine, "import host\nhost.call(\"bad\")").unwrap_err();

    assert_eq!(err, ScriptError::Host("invoke error: bad: boom".to_string()));
}

#[test]
fn test_invoke_failure_can_be_caught() {
    let (engine, calls) = engine();
    calls.failing.borrow_mut().push("bad".to_string());

    run(
        &engine,
        "import host\ntry { host.call(\"bad\") } catch e { msg = e }\nhost.call(\"good\")",
    )
    .unwrap();

    assert_eq!(global(&engine, "msg"), s("invoke error: bad: boom"));
    assert_eq!(calls.calls.borrow().len(), 2);
}

#[test]
fn test_host_module_wrappers() {
    let (engine, calls) = engine();
    calls
        .vars
        .borrow_mut()
        .insert("SRCS".to_string(), "a.c;b.c".to_string());

    let source = r#"
import host
host.set("VAR", "x", host.lit("y;z"))
host.message("hello")
srcs = host.get_list("SRCS")
missing = host.get_list("NOPE")
"#;
    run(&engine, source).unwrap();

    let calls = calls.calls.borrow();
    assert_eq!(calls[0].command, "set");
    assert_eq!(calls[0].caller, "host");
    assert_eq!(
        calls[0].args,
        vec![
            ScriptArg::quoted("VAR"),
            ScriptArg::quoted("x"),
            ScriptArg::literal("y;z"),
        ]
    );
    assert_eq!(calls[1].command, "message");
    assert_eq!(global(&engine, "srcs"), Val::List(vec![s("a.c"), s("b.c")]));
    assert_eq!(global(&engine, "missing"), Val::None);
}

#[test]
fn test_export_function_defines_host_wrapper() {
    let (engine, calls) = engine();
    let source = r#"
import host
fn configure(name, kind) { }
host.export_function(configure)
host.export_function(configure, "configure_alias")
"#;
    run(&engine, source).unwrap();

    let calls = calls.calls.borrow();
    let commands: Vec<&str> = calls.iter().map(|c| c.command.as_str()).collect();
    assert_eq!(
        commands,
        vec![
            "function",
            "__invoke_scriptfunc",
            "endfunction",
            "function",
            "__invoke_scriptfunc",
            "endfunction",
        ]
    );
    assert_eq!(
        calls[0].args,
        vec![
            ScriptArg::quoted("configure"),
            ScriptArg::quoted("arg0"),
            ScriptArg::quoted("arg1"),
        ]
    );
    assert_eq!(
        calls[1].args,
        vec![
            ScriptArg::quoted("configure"),
            ScriptArg::quoted("${arg0}"),
            ScriptArg::quoted("${arg1}"),
            ScriptArg::literal("${ARGN}"),
        ]
    );
    assert_eq!(calls[3].args[0], ScriptArg::quoted("configure_alias"));
    assert_eq!(
        engine.exported_names(),
        vec!["configure".to_string(), "configure_alias".to_string()]
    );
}

#[test]
fn test_call_exported_passes_string_arguments() {
    let (engine, calls) = engine();
    let source = r#"
import host
fn build(name, *rest) {
    host.call("add", name, *rest)
}
host.export_function(build)
"#;
    run(&engine, source).unwrap();
    calls.calls.borrow_mut().clear();

    engine
        .call_exported("build", &["app".to_string(), "x".to_string()])
        .unwrap();

    let calls = calls.calls.borrow();
    assert_eq!(calls[0].command, "add");
    assert_eq!(
        calls[0].args,
        vec![ScriptArg::quoted("app"), ScriptArg::quoted("x")]
    );
}
