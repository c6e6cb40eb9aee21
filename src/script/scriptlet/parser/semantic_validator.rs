//! Semantic checks run after parsing
//!
//! - `return` only inside a function body
//! - no duplicate parameter names

use std::collections::HashSet;

use super::{ParseError, ParseResult};
use crate::script::scriptlet::types::Stmt;

pub fn validate_program(program: &[Stmt]) -> ParseResult<()> {
    validate_block(program, false)
}

fn validate_block(stmts: &[Stmt], in_function: bool) -> ParseResult<()> {
    for stmt in stmts {
        validate_stmt(stmt, in_function)?;
    }
    Ok(())
}

fn validate_stmt(stmt: &Stmt, in_function: bool) -> ParseResult<()> {
    match stmt {
        Stmt::Return { .. } if !in_function => Err(ParseError::Invalid(
            "'return' outside function".to_string(),
        )),

        Stmt::FnDef {
            name,
            params,
            rest,
            body,
        } => {
            let mut seen = HashSet::new();
            for param in params.iter().chain(rest.iter()) {
                if !seen.insert(param.as_str()) {
                    return Err(ParseError::Invalid(format!(
                        "duplicate parameter '{param}' in function '{name}'"
                    )));
                }
            }
            validate_block(body, true)
        }

        Stmt::If { then_s, else_s, .. } => {
            validate_block(then_s, in_function)?;
            if let Some(else_s) = else_s {
                validate_block(else_s, in_function)?;
            }
            Ok(())
        }

        Stmt::For { body, .. } => validate_block(body, in_function),

        Stmt::Try { body, handler, .. } => {
            validate_block(body, in_function)?;
            validate_block(handler, in_function)
        }

        _ => Ok(()),
    }
}
