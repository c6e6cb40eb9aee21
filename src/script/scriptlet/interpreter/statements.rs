//! Statement execution

use std::rc::Rc;
use tracing::trace;

use super::{Control, Env, ExecResult};
use crate::script::scriptlet::types::{Function, Stmt, Target, Val};
use crate::script::scriptlet::Scriptlet;
use crate::script::ScriptError;

impl Scriptlet {
    /// Execute statements in order, stopping at the first `return`
    pub(crate) fn exec_block(&self, stmts: &[Stmt], env: &Env) -> ExecResult {
        for stmt in stmts {
            if let ret @ Control::Return(_) = self.exec_stmt(stmt, env)? {
                return Ok(ret);
            }
        }
        Ok(Control::None)
    }

    fn exec_stmt(&self, stmt: &Stmt, env: &Env) -> ExecResult {
        match stmt {
            Stmt::Import { module } => {
                let ns = self.import(module)?;
                env.assign(module, Val::Module(ns));
                Ok(Control::None)
            }

            Stmt::FnDef {
                name,
                params,
                rest,
                body,
            } => {
                let function = Function {
                    name: name.clone(),
                    params: params.clone(),
                    rest: rest.clone(),
                    body: Rc::new(body.clone()),
                    globals: Rc::clone(env.globals),
                };
                env.assign(name, Val::Func(Rc::new(function)));
                Ok(Control::None)
            }

            Stmt::Assign { target, value } => {
                let value = self.eval_expr(value, env)?;
                match target {
                    Target::Name { name } => env.assign(name, value),
                    Target::Index { object, index } => {
                        let object = self.eval_expr(object, env)?;
                        let index = self.eval_expr(index, env)?;
                        self.set_index(&object, &index, value)?;
                    }
                }
                Ok(Control::None)
            }

            Stmt::If {
                test,
                then_s,
                else_s,
            } => {
                if self.eval_expr(test, env)?.is_truthy() {
                    self.exec_block(then_s, env)
                } else if let Some(else_s) = else_s {
                    self.exec_block(else_s, env)
                } else {
                    Ok(Control::None)
                }
            }

            Stmt::For { var, iter, body } => {
                let items = match self.eval_expr(iter, env)? {
                    Val::List(items) => items,
                    Val::Map(map) => {
                        let keys = map.borrow().keys().cloned().map(Val::Str).collect();
                        keys
                    }
                    other => {
                        return Err(ScriptError::Type(format!(
                            "'{}' object is not iterable",
                            other.type_name()
                        )))
                    }
                };
                for item in items {
                    env.assign(var, item);
                    if let ret @ Control::Return(_) = self.exec_block(body, env)? {
                        return Ok(ret);
                    }
                }
                Ok(Control::None)
            }

            Stmt::Try {
                body,
                catch_var,
                handler,
            } => match self.exec_block(body, env) {
                Ok(control) => Ok(control),
                Err(err) => {
                    trace!(error = %err, "caught script error");
                    self.calls().failure_handled();
                    if let Some(name) = catch_var {
                        env.assign(name, Val::Str(err.to_string()));
                    }
                    self.exec_block(handler, env)
                }
            },

            Stmt::Raise { value } => {
                let value = self.eval_expr(value, env)?;
                Err(ScriptError::Raised(value.render()))
            }

            Stmt::Return { value } => {
                let value = match value {
                    Some(expr) => self.eval_expr(expr, env)?,
                    None => Val::None,
                };
                Ok(Control::Return(value))
            }

            Stmt::Expr { expr } => {
                self.eval_expr(expr, env)?;
                Ok(Control::None)
            }
        }
    }
}
