//! Type definitions for the scriptlet engine
//!
//! - AST nodes (Stmt, Expr, Target)
//! - Runtime values (Val, Function, NativeFunc, Namespace)

pub mod ast;
pub mod values;

pub use ast::{BinOp, CallArg, Expr, Stmt, Target};
pub use values::{Function, Namespace, NativeFunc, SharedMap, Val};
