//! Built-in functions: `print`, `inputi`, `inputs` (spec §4.7).
//!
//! These are the only names the evaluator dispatches to without a matching
//! user-defined overload or live variable. Grounded on
//! `original_source/interpreterv3.py`'s `run_builtin`.

use smol_str::SmolStr;

use crate::ast::Expr;
use crate::error::{Error, ErrorKind, Result};
use crate::eval::Evaluator;
use crate::value::Value;

/// Names the evaluator recognizes as built-in functions.
pub fn is_builtin(name: &str) -> bool {
    matches!(name, "print" | "inputi" | "inputs")
}

/// Dispatch a call to a built-in, returning its result. Only called once the
/// evaluator has confirmed no user-defined overload or live variable shadows
/// `name` (spec §4.4 step 1c).
pub fn call(
    evaluator: &mut Evaluator<'_>,
    name: &str,
    args: &[Expr],
    line: Option<usize>,
) -> Result<Value> {
    match name {
        "print" => {
            let mut line_out = String::new();
            for arg in args {
                let value = evaluator.eval_expr(arg)?;
                line_out.push_str(&value.format());
            }
            evaluator.io_mut().write_line(line_out);
            Ok(Value::Nil)
        }
        "inputi" => read_input(evaluator, "inputi", args, line, |s| {
            s.parse::<i64>().ok().map(Value::Int)
        }),
        "inputs" => read_input(evaluator, "inputs", args, line, |s| {
            Some(Value::Str(SmolStr::new(s)))
        }),
        _ => unreachable!("is_builtin gate excludes unknown names"),
    }
}

fn read_input(
    evaluator: &mut Evaluator<'_>,
    name: &str,
    args: &[Expr],
    line: Option<usize>,
    parse: impl FnOnce(&str) -> Option<Value>,
) -> Result<Value> {
    if args.len() > 1 {
        return Err(Error::runtime(
            ErrorKind::Name,
            format!("No {name}() function found that takes {} parameters", args.len()),
            line,
        ));
    }

    if let Some(prompt) = args.first() {
        let prompt = evaluator.eval_expr(prompt)?;
        evaluator.io_mut().write_line(prompt.format());
    }

    match evaluator.io_mut().read_line() {
        Some(raw) => Ok(parse(&raw).unwrap_or(Value::Nil)),
        None => Ok(Value::Nil),
    }
}
