//! Script failures and how they render

use super::helpers::{engine, run};
use crate::script::{ScriptEngine, ScriptError};

#[test]
fn test_unknown_name() {
    let (engine, _) = engine();
    let err = run(&engine, "missing()").unwrap_err();
    assert_eq!(err, ScriptError::Name("missing".to_string()));
    assert_eq!(err.to_string(), "NameError: name 'missing' is not defined");
}

#[test]
fn test_raise_keeps_bare_message() {
    let (engine, _) = engine();
    let err = run(&engine, "raise \"custom failure\"").unwrap_err();
    assert_eq!(err.to_string(), "custom failure");
}

#[test]
fn test_arity_mismatch() {
    let (engine, _) = engine();
    let err = run(&engine, "fn f(a, b) { }\nf(\"x\")").unwrap_err();
    assert_eq!(
        err,
        ScriptError::Type("f() takes 2 positional arguments but 1 were given".to_string())
    );
}

#[test]
fn test_too_many_arguments_without_rest() {
    let (engine, _) = engine();
    let err = run(&engine, "fn f(a) { }\nf(\"x\", \"y\")").unwrap_err();
    assert!(matches!(err, ScriptError::Type(_)));
}

#[test]
fn test_calling_a_non_function() {
    let (engine, _) = engine();
    let err = run(&engine, "x = 1\nx()").unwrap_err();
    assert_eq!(err.to_string(), "TypeError: 'int' object is not callable");
}

#[test]
fn test_missing_exported_function_is_key_error() {
    let (engine, _) = engine();
    let err = engine.call_exported("nope", &[]).unwrap_err();
    assert_eq!(err, ScriptError::Key("nope".to_string()));
}

#[test]
fn test_syntax_error_names_file() {
    let (engine, _) = engine();
    let err = run(&engine, "fn (").unwrap_err();
    match err {
        ScriptError::Syntax(message) => assert!(message.contains("main.sl")),
        other => panic!("Expected syntax error, got {:?}", other),
    }
}

#[test]
fn test_missing_file_is_io_error() {
    let (engine, _) = engine();
    let err = engine
        .run_file(std::path::Path::new("/nonexistent/script.sl"))
        .unwrap_err();
    assert!(matches!(err, ScriptError::Io { .. }));
}

#[test]
fn test_error_inside_function_unwinds_to_try() {
    let (engine, _) = engine();
    let source = r#"
fn inner() { raise "deep" }
fn outer() { inner() }
try {
    outer()
} catch e {
    seen = e
}
"#;
    run(&engine, source).unwrap();
    assert_eq!(
        engine.main_namespace().get("seen").map(|v| v.render()),
        Some("deep".to_string())
    );
}

#[test]
fn test_failed_run_keeps_earlier_definitions() {
    let (engine, _) = engine();
    assert!(run(&engine, "kept = 1\nraise \"stop\"\nskipped = 2").is_err());
    assert!(engine.main_namespace().contains("kept"));
    assert!(!engine.main_namespace().contains("skipped"));
}
