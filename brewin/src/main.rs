//! `brewin` — the command-line driver for the Brewin interpreter.
//!
//! This binary is the host collaborator the core spec places out of scope
//! (reading source text, wiring stdin/stdout, invoking `main`): it owns no
//! evaluator semantics of its own. Given a file argument it runs that file;
//! with none, it reads a whole program from stdin (the engine is not
//! line-oriented, so this is a "pipe a program in" mode rather than a REPL).

use std::env;
use std::fs;
use std::io::{self, Read};
use std::process::ExitCode;

use brewin_engine::Interpreter;

fn main() -> ExitCode {
    let source = match read_source() {
        Ok(source) => source,
        Err(err) => {
            eprintln!("brewin: {err}");
            return ExitCode::FAILURE;
        }
    };

    let mut interpreter = Interpreter::new(true, None);
    match interpreter.run(&source) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            // `err`'s `Display` already embeds the classification and line
            // (see `error.rs`); `get_error_type_and_line` exists for callers
            // that want the two fields apart from the formatted message.
            eprintln!("brewin: {err}");
            ExitCode::FAILURE
        }
    }
}

fn read_source() -> io::Result<String> {
    match env::args().nth(1) {
        Some(path) => fs::read_to_string(path),
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}
