//! Expression evaluation and calls

use std::cell::RefCell;
use std::collections::HashMap;

use super::{Control, Env};
use crate::script::scriptlet::types::{BinOp, CallArg, Expr, Function, Val};
use crate::script::scriptlet::Scriptlet;
use crate::script::ScriptError;

pub type EvalResult = Result<Val, ScriptError>;

impl Scriptlet {
    /// Evaluate an expression to a value
    pub(crate) fn eval_expr(&self, expr: &Expr, env: &Env) -> EvalResult {
        match expr {
            Expr::LitStr { v } => Ok(Val::Str(v.clone())),

            Expr::LitInt { v } => Ok(Val::Int(*v)),

            Expr::LitBool { v } => Ok(Val::Bool(*v)),

            Expr::LitNone => Ok(Val::None),

            Expr::List { items } => items
                .iter()
                .map(|item| self.eval_expr(item, env))
                .collect::<Result<Vec<_>, _>>()
                .map(Val::List),

            Expr::Ident { name } => env
                .lookup(name)
                .or_else(|| self.builtin(name))
                .ok_or_else(|| ScriptError::Name(name.clone())),

            Expr::Member { object, property } => {
                let object = self.eval_expr(object, env)?;
                get_member(&object, property)
            }

            Expr::Index { object, index } => {
                let object = self.eval_expr(object, env)?;
                let index = self.eval_expr(index, env)?;
                get_index(&object, &index)
            }

            Expr::Call { callee, args } => {
                let callee = self.eval_expr(callee, env)?;
                let args = self.eval_args(args, env)?;
                self.call_value(&callee, args, env.globals.name())
            }

            Expr::Binary { op, left, right } => {
                let left = self.eval_expr(left, env)?;
                let right = self.eval_expr(right, env)?;
                binary(*op, left, right)
            }
        }
    }

    fn eval_args(&self, args: &[CallArg], env: &Env) -> Result<Vec<Val>, ScriptError> {
        let mut out = Vec::with_capacity(args.len());
        for arg in args {
            let value = self.eval_expr(&arg.value, env)?;
            if !arg.spread {
                out.push(value);
                continue;
            }
            match value {
                Val::List(items) => out.extend(items),
                other => {
                    return Err(ScriptError::Type(format!(
                        "argument after * must be a list, not {}",
                        other.type_name()
                    )))
                }
            }
        }
        Ok(out)
    }

    /* ===================== Calls ===================== */

    /// Call any callable value. `caller` is the calling namespace's name.
    pub(crate) fn call_value(&self, callee: &Val, args: Vec<Val>, caller: &str) -> EvalResult {
        match callee {
            Val::Func(function) => self.call_function(function, args),
            Val::Native(native) => (native.call)(caller, args),
            other => Err(ScriptError::Type(format!(
                "'{}' object is not callable",
                other.type_name()
            ))),
        }
    }

    fn call_function(&self, function: &Function, args: Vec<Val>) -> EvalResult {
        let expected = function.params.len();
        if args.len() < expected || (function.rest.is_none() && args.len() > expected) {
            return Err(ScriptError::Type(format!(
                "{}() takes {} positional arguments but {} were given",
                function.name,
                expected,
                args.len()
            )));
        }

        let mut args = args.into_iter();
        let mut locals = HashMap::new();
        for param in &function.params {
            locals.insert(param.clone(), args.next().unwrap_or(Val::None));
        }
        if let Some(rest) = &function.rest {
            locals.insert(rest.clone(), Val::List(args.collect()));
        }

        let locals = RefCell::new(locals);
        let env = Env {
            globals: &function.globals,
            locals: Some(&locals),
        };
        match self.exec_block(&function.body, &env)? {
            Control::Return(value) => Ok(value),
            Control::None => Ok(Val::None),
        }
    }

    /* ===================== Containers ===================== */

    pub(crate) fn set_index(&self, object: &Val, index: &Val, value: Val) -> Result<(), ScriptError> {
        match (object, index) {
            (Val::Map(map), Val::Str(key) | Val::Literal(key)) => {
                map.borrow_mut().insert(key.clone(), value);
                Ok(())
            }
            (Val::Map(_), other) => Err(ScriptError::Type(format!(
                "map keys must be strings, not {}",
                other.type_name()
            ))),
            (other, _) => Err(ScriptError::Type(format!(
                "'{}' object does not support item assignment",
                other.type_name()
            ))),
        }
    }
}

fn get_member(object: &Val, property: &str) -> EvalResult {
    match object {
        Val::Module(ns) => ns.get(property).ok_or_else(|| {
            ScriptError::Attribute(format!(
                "module '{}' has no attribute '{property}'",
                ns.name()
            ))
        }),
        other => Err(ScriptError::Attribute(format!(
            "'{}' object has no attribute '{property}'",
            other.type_name()
        ))),
    }
}

fn get_index(object: &Val, index: &Val) -> EvalResult {
    match (object, index) {
        (Val::List(items), Val::Int(i)) => {
            let len = items.len() as i64;
            let idx = if *i < 0 { len + i } else { *i };
            if idx < 0 || idx >= len {
                return Err(ScriptError::Type("list index out of range".to_string()));
            }
            Ok(items[idx as usize].clone())
        }
        (Val::Map(map), Val::Str(key) | Val::Literal(key)) => map
            .borrow()
            .get(key)
            .cloned()
            .ok_or_else(|| ScriptError::Key(key.clone())),
        (object, index) => Err(ScriptError::Type(format!(
            "'{}' object cannot be indexed by {}",
            object.type_name(),
            index.type_name()
        ))),
    }
}

fn binary(op: BinOp, left: Val, right: Val) -> EvalResult {
    match op {
        BinOp::Eq => Ok(Val::Bool(left.equals(&right))),
        BinOp::Ne => Ok(Val::Bool(!left.equals(&right))),
        BinOp::Add => match (left, right) {
            (Val::Str(a), Val::Str(b)) => Ok(Val::Str(a + &b)),
            (Val::Int(a), Val::Int(b)) => a
                .checked_add(b)
                .map(Val::Int)
                .ok_or_else(|| ScriptError::Type("integer overflow".to_string())),
            (Val::List(mut a), Val::List(b)) => {
                a.extend(b);
                Ok(Val::List(a))
            }
            (a, b) => Err(ScriptError::Type(format!(
                "unsupported operand types for +: '{}' and '{}'",
                a.type_name(),
                b.type_name()
            ))),
        },
    }
}
