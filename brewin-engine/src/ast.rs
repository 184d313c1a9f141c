//! Abstract syntax tree.
//!
//! Node shapes follow spec §3.1 directly: a fixed set of named children per
//! kind, with `arg`/`refarg` collapsed into a single [`Param`] carrying a
//! [`ParamKind`] tag (value vs. reference) since the evaluator only ever
//! needs to distinguish the two, never their own node identity.

use std::rc::Rc;

use smol_str::SmolStr;

#[derive(Debug, Clone)]
pub struct Program {
    pub functions: Vec<Rc<FuncDef>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    Value,
    Reference,
}

#[derive(Debug, Clone)]
pub struct Param {
    pub name: SmolStr,
    pub kind: ParamKind,
}

#[derive(Debug, Clone)]
pub struct FuncDef {
    pub name: SmolStr,
    pub params: Vec<Param>,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone)]
pub struct Lambda {
    pub params: Vec<Param>,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone)]
pub struct Call {
    pub name: SmolStr,
    pub args: Vec<Expr>,
    pub line: usize,
}

/// `objref.name(args)`. Parsed per `original_source/brewparse.py`'s grammar
/// but deliberately unimplemented by the evaluator — see spec §9's open
/// question and `SPEC_FULL.md`'s resolution.
#[derive(Debug, Clone)]
pub struct MethodCall {
    pub objref: SmolStr,
    pub name: SmolStr,
    pub args: Vec<Expr>,
    pub line: usize,
}

#[derive(Debug, Clone)]
pub enum Stmt {
    /// `name = expression;`. `name` may be a dotted `a.b` string, carried
    /// whole exactly as spec §3.1 describes.
    Assign {
        name: SmolStr,
        expr: Expr,
        line: usize,
    },
    /// Any expression used as a statement (in practice always an `fcall`;
    /// the grammar technically permits any expression here). Its result is
    /// discarded.
    ExprStmt(Expr),
    If {
        condition: Expr,
        then_branch: Vec<Stmt>,
        else_branch: Option<Vec<Stmt>>,
        line: usize,
    },
    While {
        condition: Expr,
        body: Vec<Stmt>,
        line: usize,
    },
    Return {
        expr: Option<Expr>,
        line: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Eq,
    NotEq,
    Less,
    Greater,
    LessEq,
    GreaterEq,
    And,
    Or,
}

impl BinaryOp {
    /// Source-level spelling, used in `Incompatible types for operation`
    /// messages (spec §4.6).
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Eq => "==",
            Self::NotEq => "!=",
            Self::Less => "<",
            Self::Greater => ">",
            Self::LessEq => "<=",
            Self::GreaterEq => ">=",
            Self::And => "&&",
            Self::Or => "||",
        }
    }
}

#[derive(Debug, Clone)]
pub enum Expr {
    Int(i64),
    Str(SmolStr),
    Bool(bool),
    Nil,
    /// Bare `@` object literal. Unimplemented; see [`MethodCall`].
    ObjectLiteral {
        line: usize,
    },
    Var {
        name: SmolStr,
        line: usize,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
        line: usize,
    },
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
        line: usize,
    },
    Call(Call),
    MethodCall(MethodCall),
    Lambda(Rc<Lambda>),
}

impl Expr {
    /// Best-effort source line for error reporting.
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::Int(_) | Self::Str(_) | Self::Bool(_) | Self::Nil | Self::Lambda(_) => None,
            Self::ObjectLiteral { line } => Some(*line),
            Self::Var { line, .. } => Some(*line),
            Self::Unary { line, .. } => Some(*line),
            Self::Binary { line, .. } => Some(*line),
            Self::Call(call) => Some(call.line),
            Self::MethodCall(call) => Some(call.line),
        }
    }

    /// If this expression is a bare variable reference, its name.
    ///
    /// Used by the call protocol (spec §4.4) to decide whether a reference
    /// parameter's argument aliases the caller's cell.
    pub fn as_bare_var(&self) -> Option<&SmolStr> {
        match self {
            Self::Var { name, .. } => Some(name),
            _ => None,
        }
    }
}
