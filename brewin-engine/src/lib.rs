//! A tree-walking interpreter for the Brewin scripting language.
//!
//! [`Interpreter`] is the crate's one public entry point: construct it with
//! the host's console/input policy, call [`Interpreter::run`] with source
//! text, then read back [`Interpreter::get_output`] and
//! [`Interpreter::get_error_type_and_line`]. Lexing, parsing and evaluation
//! are internal — callers never see an AST node or a `Value`.

mod ast;
mod builtins;
mod cursor;
mod env;
pub mod error;
mod eval;
mod handle;
mod io;
mod lexer;
mod parser;
mod registry;
mod span;
mod token;
mod value;

pub use self::error::{Error, ErrorKind};

use self::eval::Evaluator;
use self::io::Io;

/// One interpreter session. Each [`Interpreter::run`] call builds a fresh
/// function registry and environment (spec §5: "both live for the duration
/// of one `run` invocation and are reinitialized on each call"); only the
/// I/O log and pre-canned input cursor persist across the struct's lifetime.
pub struct Interpreter {
    io: Io,
    last_error: Option<Error>,
}

impl Interpreter {
    /// `console_output` mirrors every `write_line` to real stdout in
    /// addition to the in-memory log `get_output` returns. `input`, if
    /// given, is a pre-canned sequence of lines consumed front-to-back by
    /// `inputi`/`inputs` instead of real stdin (spec §6).
    pub fn new(console_output: bool, input: Option<Vec<String>>) -> Self {
        Self {
            io: Io::new(console_output, input),
            last_error: None,
        }
    }

    /// Parse and execute `source`. Resets the output log and error state
    /// from any prior call before running.
    pub fn run(&mut self, source: &str) -> Result<(), Error> {
        self.io.reset();
        self.last_error = None;

        let result = parser::parse(source).and_then(|program| {
            let mut evaluator = Evaluator::new(&mut self.io);
            evaluator.run(&program)
        });

        if let Err(err) = &result {
            self.last_error = Some(err.clone());
        }
        result
    }

    /// Every line produced by `print` and by `inputi`/`inputs` prompt
    /// echoes, in emission order.
    pub fn get_output(&self) -> &[String] {
        self.io.output()
    }

    /// The classification and best-effort source line of the last error
    /// raised by `run`, if any. `None` for a syntax error's kind, since
    /// syntax errors are not one of the three semantic `ErrorKind`s.
    pub fn get_error_type_and_line(&self) -> (Option<ErrorKind>, Option<usize>) {
        match &self.last_error {
            Some(err) => (err.kind(), err.line()),
            None => (None, None),
        }
    }
}
