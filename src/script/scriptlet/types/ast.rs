//! AST node types

use serde::{Deserialize, Serialize};

/* ===================== Statements ===================== */

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "t")]
pub enum Stmt {
    Import {
        module: String,
    },

    FnDef {
        name: String,
        params: Vec<String>,
        rest: Option<String>,
        body: Vec<Stmt>,
    },

    Assign {
        target: Target,
        value: Expr,
    },

    If {
        test: Expr,
        then_s: Vec<Stmt>,
        else_s: Option<Vec<Stmt>>,
    },

    For {
        var: String,
        iter: Expr,
        body: Vec<Stmt>,
    },

    Try {
        body: Vec<Stmt>,
        catch_var: Option<String>,
        handler: Vec<Stmt>,
    },

    Raise {
        value: Expr,
    },

    Return {
        value: Option<Expr>,
    },

    Expr {
        expr: Expr,
    },
}

/// Left-hand side of an assignment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "t")]
pub enum Target {
    Name { name: String },
    Index { object: Expr, index: Expr },
}

/* ===================== Expressions ===================== */

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "t")]
pub enum Expr {
    LitStr {
        v: String,
    },

    LitInt {
        v: i64,
    },

    LitBool {
        v: bool,
    },

    LitNone,

    List {
        items: Vec<Expr>,
    },

    Ident {
        name: String,
    },

    Member {
        object: Box<Expr>,
        property: String,
    },

    Index {
        object: Box<Expr>,
        index: Box<Expr>,
    },

    Call {
        callee: Box<Expr>,
        args: Vec<CallArg>,
    },

    Binary {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallArg {
    /// `*expr`: splice a list into the argument list
    pub spread: bool,
    pub value: Expr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinOp {
    Add,
    Eq,
    Ne,
}
