//! PEST-based parser for scriptlet source
//!
//! Produces the AST in `types::ast`. Keyword tokens are matched as their own
//! atomic rules so they never swallow identifiers (`format`, `inner`); the
//! builder skips them.

use pest::iterators::{Pair, Pairs};
use pest::Parser;
use pest_derive::Parser;
use thiserror::Error;

use super::types::{BinOp, CallArg, Expr, Stmt, Target};

pub mod semantic_validator;


/* ===================== PEST Parser ===================== */

#[derive(Parser)]
#[grammar = "script/scriptlet/parser/scriptlet.pest"]
struct ScriptletParser;

/* ===================== Error Types ===================== */

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("{0}")]
    Pest(String),

    #[error("{0}")]
    Build(String),

    #[error("{0}")]
    Invalid(String),
}

impl From<pest::error::Error<Rule>> for ParseError {
    fn from(err: pest::error::Error<Rule>) -> Self {
        ParseError::Pest(err.to_string())
    }
}

pub type ParseResult<T> = Result<T, ParseError>;

/* ===================== Public API ===================== */

/// Parse and validate a complete program
pub fn parse_program(source: &str) -> ParseResult<Vec<Stmt>> {
    let program = parse_unchecked(source)?;
    semantic_validator::validate_program(&program)?;
    Ok(program)
}

/// Parse without running the semantic validator
pub fn parse_unchecked(source: &str) -> ParseResult<Vec<Stmt>> {
    let mut pairs = ScriptletParser::parse(Rule::program, source)?;
    let program = pairs
        .next()
        .ok_or_else(|| ParseError::Build("empty parse result".to_string()))?;
    build_statements(program.into_inner())
}

/* ===================== Helpers ===================== */

fn is_skipped(rule: Rule) -> bool {
    matches!(
        rule,
        Rule::EOI
            | Rule::kw_import
            | Rule::kw_fn
            | Rule::kw_if
            | Rule::kw_else
            | Rule::kw_for
            | Rule::kw_in
            | Rule::kw_try
            | Rule::kw_catch
            | Rule::kw_raise
            | Rule::kw_return
    )
}

/// Inner pairs without keyword tokens
fn children<'i>(pair: Pair<'i, Rule>) -> impl Iterator<Item = Pair<'i, Rule>> {
    pair.into_inner().filter(|p| !is_skipped(p.as_rule()))
}

fn next_child<'a>(
    iter: &mut impl Iterator<Item = Pair<'a, Rule>>,
    what: &str,
) -> ParseResult<Pair<'a, Rule>> {
    iter.next()
        .ok_or_else(|| ParseError::Build(format!("expected {what}")))
}

fn unexpected(pair: &Pair<Rule>) -> ParseError {
    ParseError::Build(format!(
        "unexpected {:?} at '{}'",
        pair.as_rule(),
        pair.as_str()
    ))
}

/* ===================== Statements ===================== */

fn build_statements(pairs: Pairs<Rule>) -> ParseResult<Vec<Stmt>> {
    pairs
        .filter(|p| !is_skipped(p.as_rule()))
        .map(build_statement)
        .collect()
}

fn build_block(pair: Pair<Rule>) -> ParseResult<Vec<Stmt>> {
    build_statements(pair.into_inner())
}

fn build_statement(pair: Pair<Rule>) -> ParseResult<Stmt> {
    match pair.as_rule() {
        Rule::import_stmt => {
            let mut inner = children(pair);
            let module = next_child(&mut inner, "module name")?.as_str().to_string();
            Ok(Stmt::Import { module })
        }

        Rule::fn_stmt => build_fn(pair),

        Rule::if_stmt => build_if(pair),

        Rule::for_stmt => {
            let mut inner = children(pair);
            let var = next_child(&mut inner, "loop variable")?.as_str().to_string();
            let iter = build_expr(next_child(&mut inner, "loop iterable")?)?;
            let body = build_block(next_child(&mut inner, "loop body")?)?;
            Ok(Stmt::For { var, iter, body })
        }

        Rule::try_stmt => {
            let mut inner = children(pair);
            let body = build_block(next_child(&mut inner, "try body")?)?;
            let next = next_child(&mut inner, "catch clause")?;
            let (catch_var, handler) = match next.as_rule() {
                Rule::ident => {
                    let name = next.as_str().to_string();
                    let handler = build_block(next_child(&mut inner, "catch body")?)?;
                    (Some(name), handler)
                }
                Rule::block => (None, build_block(next)?),
                _ => return Err(unexpected(&next)),
            };
            Ok(Stmt::Try {
                body,
                catch_var,
                handler,
            })
        }

        Rule::raise_stmt => {
            let mut inner = children(pair);
            let value = build_expr(next_child(&mut inner, "raise value")?)?;
            Ok(Stmt::Raise { value })
        }

        Rule::return_stmt => {
            let value = children(pair).next().map(build_expr).transpose()?;
            Ok(Stmt::Return { value })
        }

        Rule::assign_stmt => {
            let mut inner = children(pair);
            let target = build_target(next_child(&mut inner, "assignment target")?)?;
            let value = build_expr(next_child(&mut inner, "assigned value")?)?;
            Ok(Stmt::Assign { target, value })
        }

        Rule::expr_stmt => {
            let mut inner = children(pair);
            let expr = build_expr(next_child(&mut inner, "expression")?)?;
            Ok(Stmt::Expr { expr })
        }

        _ => Err(unexpected(&pair)),
    }
}

fn build_fn(pair: Pair<Rule>) -> ParseResult<Stmt> {
    let mut inner = children(pair);
    let name = next_child(&mut inner, "function name")?.as_str().to_string();

    let mut params = Vec::new();
    let mut rest = None;
    let mut next = next_child(&mut inner, "function body")?;
    if next.as_rule() == Rule::params {
        for param in next.into_inner() {
            let rule = param.as_rule();
            let ident = param
                .into_inner()
                .next()
                .map(|p| p.as_str().to_string())
                .ok_or_else(|| ParseError::Build("expected parameter name".to_string()))?;
            match rule {
                Rule::rest_param if rest.is_some() => {
                    return Err(ParseError::Invalid(format!(
                        "function '{name}' has more than one rest parameter"
                    )));
                }
                Rule::rest_param => rest = Some(ident),
                _ if rest.is_some() => {
                    return Err(ParseError::Invalid(format!(
                        "function '{name}': parameter '{ident}' follows the rest parameter"
                    )));
                }
                _ => params.push(ident),
            }
        }
        next = next_child(&mut inner, "function body")?;
    }

    let body = build_block(next)?;
    Ok(Stmt::FnDef {
        name,
        params,
        rest,
        body,
    })
}

fn build_if(pair: Pair<Rule>) -> ParseResult<Stmt> {
    let mut inner = children(pair);
    let test = build_expr(next_child(&mut inner, "condition")?)?;
    let then_s = build_block(next_child(&mut inner, "then block")?)?;
    let else_s = match inner.next() {
        None => None,
        Some(p) if p.as_rule() == Rule::if_stmt => Some(vec![build_if(p)?]),
        Some(p) if p.as_rule() == Rule::block => Some(build_block(p)?),
        Some(p) => return Err(unexpected(&p)),
    };
    Ok(Stmt::If {
        test,
        then_s,
        else_s,
    })
}

fn build_target(pair: Pair<Rule>) -> ParseResult<Target> {
    match build_postfix(pair)? {
        Expr::Ident { name } => Ok(Target::Name { name }),
        Expr::Index { object, index } => Ok(Target::Index {
            object: *object,
            index: *index,
        }),
        _ => Err(ParseError::Invalid(
            "cannot assign to this expression".to_string(),
        )),
    }
}

/* ===================== Expressions ===================== */

fn build_expr(pair: Pair<Rule>) -> ParseResult<Expr> {
    match pair.as_rule() {
        Rule::expr => {
            let mut inner = pair.into_inner();
            build_expr(next_child(&mut inner, "expression")?)
        }
        Rule::equality | Rule::additive => build_binary(pair),
        Rule::postfix => build_postfix(pair),
        _ => build_primary(pair),
    }
}

/// Left-associative chain: operand (op operand)*
fn build_binary(pair: Pair<Rule>) -> ParseResult<Expr> {
    let mut inner = pair.into_inner();
    let mut left = build_expr(next_child(&mut inner, "operand")?)?;
    while let Some(op_pair) = inner.next() {
        let op = match op_pair.as_str() {
            "+" => BinOp::Add,
            "==" => BinOp::Eq,
            "!=" => BinOp::Ne,
            _ => return Err(unexpected(&op_pair)),
        };
        let right = build_expr(next_child(&mut inner, "right operand")?)?;
        left = Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        };
    }
    Ok(left)
}

fn build_postfix(pair: Pair<Rule>) -> ParseResult<Expr> {
    let mut inner = pair.into_inner();
    let mut expr = build_primary(next_child(&mut inner, "primary expression")?)?;
    for suffix in inner {
        expr = match suffix.as_rule() {
            Rule::call_args => Expr::Call {
                callee: Box::new(expr),
                args: suffix
                    .into_inner()
                    .map(build_call_arg)
                    .collect::<ParseResult<_>>()?,
            },
            Rule::member => {
                let mut parts = suffix.into_inner();
                Expr::Member {
                    object: Box::new(expr),
                    property: next_child(&mut parts, "member name")?.as_str().to_string(),
                }
            }
            Rule::index => {
                let mut parts = suffix.into_inner();
                Expr::Index {
                    object: Box::new(expr),
                    index: Box::new(build_expr(next_child(&mut parts, "index")?)?),
                }
            }
            _ => return Err(unexpected(&suffix)),
        };
    }
    Ok(expr)
}

fn build_call_arg(pair: Pair<Rule>) -> ParseResult<CallArg> {
    let mut spread = false;
    let mut value = None;
    for part in pair.into_inner() {
        match part.as_rule() {
            Rule::spread => spread = true,
            _ => value = Some(build_expr(part)?),
        }
    }
    let value = value.ok_or_else(|| ParseError::Build("expected argument".to_string()))?;
    Ok(CallArg { spread, value })
}

fn build_primary(pair: Pair<Rule>) -> ParseResult<Expr> {
    match pair.as_rule() {
        Rule::string => {
            let raw = pair.into_inner().next().map(|p| p.as_str()).unwrap_or("");
            Ok(Expr::LitStr { v: unescape(raw) })
        }
        Rule::integer => pair
            .as_str()
            .parse::<i64>()
            .map(|v| Expr::LitInt { v })
            .map_err(|e| ParseError::Build(format!("invalid integer '{}': {e}", pair.as_str()))),
        Rule::boolean => Ok(Expr::LitBool {
            v: pair.as_str() == "true",
        }),
        Rule::none => Ok(Expr::LitNone),
        Rule::ident => Ok(Expr::Ident {
            name: pair.as_str().to_string(),
        }),
        Rule::list => Ok(Expr::List {
            items: pair
                .into_inner()
                .map(build_expr)
                .collect::<ParseResult<_>>()?,
        }),
        Rule::expr | Rule::equality | Rule::additive | Rule::postfix => build_expr(pair),
        _ => Err(unexpected(&pair)),
    }
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}
