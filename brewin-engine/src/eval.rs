//! The tree-walking evaluator (spec §4).
//!
//! One [`Evaluator`] is built fresh for each [`crate::Interpreter::run`]
//! call: a function registry, a variable environment, and a borrowed handle
//! to the host's I/O boundary. Nothing here survives past the call that
//! built it.

use std::collections::HashSet;

use smol_str::SmolStr;

use crate::ast::{BinaryOp, Expr, Param, ParamKind, Program, Stmt, UnaryOp};
use crate::builtins;
use crate::env::Env;
use crate::error::{Error, ErrorKind, Result};
use crate::handle::Handle;
use crate::io::Io;
use crate::registry::Registry;
use crate::value::{values_equal, ClosureData, Value};

/// Statement-execution outcome: either control fell off the end of a block,
/// or a `return` is unwinding toward the call that's currently executing
/// (spec §4.2's non-local return).
enum Flow {
    Normal,
    Return(Value),
}

pub struct Evaluator<'io> {
    registry: Registry,
    env: Env,
    io: &'io mut Io,
}

impl<'io> Evaluator<'io> {
    pub fn new(io: &'io mut Io) -> Self {
        Self {
            registry: Registry::new(),
            env: Env::new(),
            io,
        }
    }

    pub fn io_mut(&mut self) -> &mut Io {
        self.io
    }

    /// Register every function definition, then call `main` with no
    /// arguments (spec §4.1).
    pub fn run(&mut self, program: &Program) -> Result<()> {
        for func in &program.functions {
            self.registry.register(func.clone());
        }

        let main = self.registry.lookup("main", 0).ok_or_else(|| {
            Error::runtime(ErrorKind::Name, "No main() function found that takes 0 parameters", None)
        })?;

        self.invoke(&main.params, &main.body, &[], None, None)?;
        Ok(())
    }

    // -- statements ----------------------------------------------------

    fn exec_block(&mut self, stmts: &[Stmt]) -> Result<Flow> {
        for stmt in stmts {
            match self.exec_stmt(stmt)? {
                Flow::Normal => continue,
                ret @ Flow::Return(_) => return Ok(ret),
            }
        }
        Ok(Flow::Normal)
    }

    fn exec_stmt(&mut self, stmt: &Stmt) -> Result<Flow> {
        match stmt {
            Stmt::Assign { name, expr, line } => {
                if name.contains('.') {
                    return Err(Error::runtime(
                        ErrorKind::Name,
                        format!("assignment through dotted name '{name}' is not supported"),
                        Some(*line),
                    ));
                }
                let value = self.eval_expr(expr)?;
                self.env.assign(name, value);
                Ok(Flow::Normal)
            }
            Stmt::ExprStmt(expr) => {
                self.eval_expr(expr)?;
                Ok(Flow::Normal)
            }
            Stmt::If {
                condition,
                then_branch,
                else_branch,
                line,
            } => {
                self.env.push_scope();
                let outcome = (|| -> Result<Flow> {
                    let cond = self.eval_expr(condition)?;
                    let taken = cond.as_bool_coerced().ok_or_else(|| {
                        Error::runtime(
                            ErrorKind::Type,
                            "If condition does not evaluate to a boolean",
                            Some(*line),
                        )
                    })?;
                    if taken {
                        self.exec_block(then_branch)
                    } else if let Some(else_branch) = else_branch {
                        self.exec_block(else_branch)
                    } else {
                        Ok(Flow::Normal)
                    }
                })();
                self.env.pop_scope();
                outcome
            }
            Stmt::While {
                condition,
                body,
                line,
            } => {
                self.env.push_scope();
                let outcome = (|| -> Result<Flow> {
                    loop {
                        let cond = self.eval_expr(condition)?;
                        let keep_going = cond.as_bool_coerced().ok_or_else(|| {
                            Error::runtime(
                                ErrorKind::Type,
                                "While condition does not evaluate to a boolean",
                                Some(*line),
                            )
                        })?;
                        if !keep_going {
                            return Ok(Flow::Normal);
                        }
                        match self.exec_block(body)? {
                            Flow::Normal => continue,
                            ret @ Flow::Return(_) => return Ok(ret),
                        }
                    }
                })();
                self.env.pop_scope();
                outcome
            }
            Stmt::Return { expr, .. } => {
                let value = match expr {
                    Some(expr) => self.eval_expr(expr)?,
                    None => Value::Nil,
                };
                Ok(Flow::Return(value))
            }
        }
    }

    // -- expressions -----------------------------------------------------

    pub fn eval_expr(&mut self, expr: &Expr) -> Result<Value> {
        match expr {
            Expr::Int(n) => Ok(Value::Int(*n)),
            Expr::Str(s) => Ok(Value::Str(s.clone())),
            Expr::Bool(b) => Ok(Value::Bool(*b)),
            Expr::Nil => Ok(Value::Nil),
            Expr::ObjectLiteral { line } => Err(Error::runtime(
                ErrorKind::Name,
                "object literals are not supported",
                Some(*line),
            )),
            Expr::Var { name, line } => self.eval_var(name, Some(*line)),
            Expr::Unary { op, operand, line } => self.eval_unary(*op, operand, Some(*line)),
            Expr::Binary {
                op,
                lhs,
                rhs,
                line,
            } => self.eval_binary(*op, lhs, rhs, Some(*line)),
            Expr::Call(call) => self.eval_call(&call.name, &call.args, Some(call.line)),
            Expr::MethodCall(call) => Err(Error::runtime(
                ErrorKind::Name,
                format!(
                    "method calls are not supported ({}.{}(...))",
                    call.objref, call.name
                ),
                Some(call.line),
            )),
            Expr::Lambda(lambda) => Ok(Value::Closure(Handle::new(ClosureData {
                lambda: lambda.clone(),
                captures: self.env.live_snapshot(),
            }))),
        }
    }

    /// Resolve a bare name: live variable first, then a function with a
    /// single overload as a first-class value (spec §4.3, §4.5).
    fn eval_var(&mut self, name: &str, line: Option<usize>) -> Result<Value> {
        if name.contains('.') {
            return Err(Error::runtime(
                ErrorKind::Name,
                format!("dotted name '{name}' is not supported"),
                line,
            ));
        }

        if let Some(cell) = self.env.lookup(name) {
            return Ok(cell.borrow().clone());
        }

        if let Some(def) = self.registry.resolve_first_class(name, line)? {
            return Ok(Value::Func(def));
        }

        Err(Error::runtime(
            ErrorKind::Name,
            format!("variable {name} is not defined"),
            line,
        ))
    }

    fn eval_unary(&mut self, op: UnaryOp, operand: &Expr, line: Option<usize>) -> Result<Value> {
        let value = self.eval_expr(operand)?;
        match op {
            UnaryOp::Neg => match value {
                Value::Int(n) => Ok(Value::Int(-n)),
                other => Err(incompatible_unary("neg", other.kind_name(), line)),
            },
            UnaryOp::Not => match value.as_bool_coerced() {
                Some(b) => Ok(Value::Bool(!b)),
                None => Err(incompatible_unary("!", value.kind_name(), line)),
            },
        }
    }

    fn eval_binary(
        &mut self,
        op: BinaryOp,
        lhs: &Expr,
        rhs: &Expr,
        line: Option<usize>,
    ) -> Result<Value> {
        // `&&`/`||` coerce both operands to bool and evaluate both strictly
        // (no short-circuiting, spec §4.6).
        if matches!(op, BinaryOp::And | BinaryOp::Or) {
            let l = self.eval_expr(lhs)?;
            let r = self.eval_expr(rhs)?;
            let (Some(lb), Some(rb)) = (l.as_bool_coerced(), r.as_bool_coerced()) else {
                return Err(incompatible_binary(op.symbol(), l.kind_name(), r.kind_name(), line));
            };
            let result = if op == BinaryOp::And { lb && rb } else { lb || rb };
            return Ok(Value::Bool(result));
        }

        let l = self.eval_expr(lhs)?;
        let r = self.eval_expr(rhs)?;

        match op {
            BinaryOp::Eq => Ok(Value::Bool(values_equal(&l, &r))),
            BinaryOp::NotEq => Ok(Value::Bool(!values_equal(&l, &r))),
            BinaryOp::Add => match (&l, &r) {
                (Value::Str(a), Value::Str(b)) => Ok(Value::Str(SmolStr::new(format!("{a}{b}")))),
                _ => {
                    let (Some(a), Some(b)) = (l.as_int_coerced(), r.as_int_coerced()) else {
                        return Err(incompatible_binary(op.symbol(), l.kind_name(), r.kind_name(), line));
                    };
                    Ok(Value::Int(a.wrapping_add(b)))
                }
            },
            BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div => {
                let (Some(a), Some(b)) = (l.as_int_coerced(), r.as_int_coerced()) else {
                    return Err(incompatible_binary(op.symbol(), l.kind_name(), r.kind_name(), line));
                };
                match op {
                    BinaryOp::Sub => Ok(Value::Int(a.wrapping_sub(b))),
                    BinaryOp::Mul => Ok(Value::Int(a.wrapping_mul(b))),
                    BinaryOp::Div => {
                        if b == 0 {
                            Err(Error::runtime(ErrorKind::Type, "division by zero", line))
                        } else {
                            Ok(Value::Int(a / b))
                        }
                    }
                    _ => unreachable!(),
                }
            }
            BinaryOp::Less | BinaryOp::Greater | BinaryOp::LessEq | BinaryOp::GreaterEq => {
                let (Value::Int(a), Value::Int(b)) = (&l, &r) else {
                    return Err(incompatible_binary(op.symbol(), l.kind_name(), r.kind_name(), line));
                };
                let result = match op {
                    BinaryOp::Less => a < b,
                    BinaryOp::Greater => a > b,
                    BinaryOp::LessEq => a <= b,
                    BinaryOp::GreaterEq => a >= b,
                    _ => unreachable!(),
                };
                Ok(Value::Bool(result))
            }
            BinaryOp::And | BinaryOp::Or => unreachable!("handled above"),
        }
    }

    // -- calls -------------------------------------------------------------

    /// Call resolution order: registered overload of matching arity, then a
    /// live variable holding a callable, then a built-in, else a name error
    /// (spec §4.4 step 1).
    fn eval_call(&mut self, name: &str, args: &[Expr], line: Option<usize>) -> Result<Value> {
        if let Some(def) = self.registry.lookup(name, args.len()) {
            return self.invoke(&def.params, &def.body, args, None, line);
        }

        if self.env.is_live(name) {
            let held = self.env.lookup(name).unwrap().borrow().clone();
            return match held {
                Value::Func(def) => {
                    check_arity(name, def.params.len(), args.len(), line)?;
                    self.invoke(&def.params, &def.body, args, None, line)
                }
                Value::Closure(closure) => {
                    let lambda = closure.borrow().lambda.clone();
                    check_arity(name, lambda.params.len(), args.len(), line)?;
                    self.invoke(&lambda.params, &lambda.body, args, Some(closure), line)
                }
                other => Err(Error::runtime(
                    ErrorKind::Type,
                    format!("{name} is not a function, it holds a {}", other.kind_name()),
                    line,
                )),
            };
        }

        if builtins::is_builtin(name) {
            return builtins::call(self, name, args, line);
        }

        Err(Error::runtime(
            ErrorKind::Name,
            format!("No {name}() function found that takes {} parameters", args.len()),
            line,
        ))
    }

    /// The call protocol shared by named functions and closures (spec §4.4
    /// steps 2-5): bind arguments (aliasing reference parameters where
    /// possible), install closure captures, run the body, write captures
    /// back, then tear the scope down.
    fn invoke(
        &mut self,
        params: &[Param],
        body: &[Stmt],
        args: &[Expr],
        closure: Option<Handle<ClosureData>>,
        line: Option<usize>,
    ) -> Result<Value> {
        let mut arg_cells: Vec<(SmolStr, Handle<Value>)> = Vec::with_capacity(params.len());
        for (param, arg) in params.iter().zip(args.iter()) {
            let cell = match param.kind {
                ParamKind::Reference => match arg.as_bare_var() {
                    Some(var_name) if self.env.is_live(var_name) => self.env.lookup(var_name).unwrap(),
                    _ => Handle::new(self.eval_expr(arg)?),
                },
                ParamKind::Value => Handle::new(self.eval_expr(arg)?),
            };
            arg_cells.push((param.name.clone(), cell));
        }

        let param_names: HashSet<&SmolStr> = params.iter().map(|p| &p.name).collect();

        self.env.push_scope();

        if let Some(closure) = &closure {
            let captures: Vec<(SmolStr, Value)> = closure
                .borrow()
                .captures
                .iter()
                .filter(|(name, _)| !param_names.contains(name))
                .map(|(name, value)| (name.clone(), value.clone()))
                .collect();
            for (name, value) in captures {
                self.env.declare(name, value);
            }
        }

        for (name, cell) in arg_cells {
            self.env.bind_cell(name, cell);
        }

        let outcome = self.exec_block(body);

        if let Some(closure) = &closure {
            let names: Vec<SmolStr> = closure
                .borrow()
                .captures
                .keys()
                .filter(|name| !param_names.contains(*name))
                .cloned()
                .collect();
            let mut data = closure.borrow_mut();
            for name in names {
                if let Some(cell) = self.env.lookup(&name) {
                    data.captures.insert(name, cell.borrow().clone());
                }
            }
        }

        self.env.pop_scope();

        match outcome? {
            Flow::Return(value) => Ok(value),
            Flow::Normal => Ok(Value::Nil),
        }
    }
}

fn check_arity(name: &str, expected: usize, got: usize, line: Option<usize>) -> Result<()> {
    if expected == got {
        Ok(())
    } else {
        Err(Error::runtime(
            ErrorKind::Type,
            format!("{name} takes {expected} parameters: {got} arguments given"),
            line,
        ))
    }
}

fn incompatible_unary(op: &str, kind: &str, line: Option<usize>) -> Error {
    Error::runtime(
        ErrorKind::Type,
        format!("Incompatible types for operation `{op}`: `{kind}`"),
        line,
    )
}

fn incompatible_binary(op: &str, kind1: &str, kind2: &str, line: Option<usize>) -> Error {
    Error::runtime(
        ErrorKind::Type,
        format!("Incompatible types for operation `{op}`: `{kind1}` and `{kind2}`"),
        line,
    )
}
