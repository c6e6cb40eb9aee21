//! Global builtins

use std::collections::HashMap;

use super::{expect_args, expect_str};
use crate::script::scriptlet::types::{NativeFunc, Val};
use crate::script::ScriptError;

/// Build the builtin table consulted after locals and globals
pub fn builtins() -> HashMap<String, Val> {
    let mut env = HashMap::new();

    register(&mut env, "str", |_, args| {
        let args = expect_args("str", args, 1)?;
        Ok(Val::Str(args[0].render()))
    });

    register(&mut env, "len", |_, args| {
        let args = expect_args("len", args, 1)?;
        let len = match &args[0] {
            Val::Str(s) | Val::Literal(s) => s.chars().count(),
            Val::List(items) => items.len(),
            Val::Map(map) => map.borrow().len(),
            other => {
                return Err(ScriptError::Type(format!(
                    "object of type '{}' has no len()",
                    other.type_name()
                )))
            }
        };
        Ok(Val::Int(len as i64))
    });

    register(&mut env, "split", |_, args| {
        let args = expect_args("split", args, 2)?;
        let text = expect_str("split", &args[0])?;
        let sep = expect_str("split", &args[1])?;
        if sep.is_empty() {
            return Err(ScriptError::Type("split() separator must not be empty".to_string()));
        }
        Ok(Val::List(
            text.split(sep.as_str())
                .map(|part| Val::Str(part.to_string()))
                .collect(),
        ))
    });

    register(&mut env, "join", |_, args| {
        let args = expect_args("join", args, 2)?;
        let sep = expect_str("join", &args[1])?;
        match &args[0] {
            Val::List(items) => {
                let parts: Vec<String> = items.iter().map(Val::render).collect();
                Ok(Val::Str(parts.join(&sep)))
            }
            other => Err(ScriptError::Type(format!(
                "join() expected a list, got {}",
                other.type_name()
            ))),
        }
    });

    register(&mut env, "params", |_, args| {
        let args = expect_args("params", args, 1)?;
        match &args[0] {
            Val::Func(f) => Ok(Val::List(
                f.params.iter().cloned().map(Val::Str).collect(),
            )),
            other => Err(ScriptError::Type(format!(
                "params() expected a script function, got {}",
                other.type_name()
            ))),
        }
    });

    register(&mut env, "nameof", |_, args| {
        let args = expect_args("nameof", args, 1)?;
        match &args[0] {
            Val::Func(f) => Ok(Val::Str(f.name.clone())),
            Val::Native(f) => Ok(Val::Str(f.name.clone())),
            other => Err(ScriptError::Type(format!(
                "nameof() expected a function, got {}",
                other.type_name()
            ))),
        }
    });

    register(&mut env, "print", |_, args| {
        let parts: Vec<String> = args.iter().map(Val::render).collect();
        println!("{}", parts.join(" "));
        Ok(Val::None)
    });

    env
}

fn register<F>(env: &mut HashMap<String, Val>, name: &str, call: F)
where
    F: Fn(&str, Vec<Val>) -> Result<Val, ScriptError> + 'static,
{
    env.insert(name.to_string(), Val::Native(NativeFunc::new(name, call)));
}
