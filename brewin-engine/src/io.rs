//! Host I/O boundary (spec §1(c), §6).
//!
//! The evaluator never touches real stdio directly: `print` appends to an
//! output log (and optionally echoes to the real console), and
//! `inputi`/`inputs` read from either a pre-canned input sequence or real
//! stdin. This mirrors `original_source/intbase.py`'s `output`/`get_input`.

use std::io::{self, BufRead};

pub struct Io {
    console_output: bool,
    /// Pre-canned input lines, consumed front-to-back. `None` means read
    /// from real stdin instead.
    input: Option<Vec<String>>,
    input_cursor: usize,
    output_log: Vec<String>,
}

impl Io {
    pub fn new(console_output: bool, input: Option<Vec<String>>) -> Self {
        Self {
            console_output,
            input,
            input_cursor: 0,
            output_log: Vec::new(),
        }
    }

    pub fn reset(&mut self) {
        self.input_cursor = 0;
        self.output_log.clear();
    }

    /// Record and optionally echo one line of output (`write_line`).
    pub fn write_line(&mut self, line: String) {
        if self.console_output {
            println!("{line}");
        }
        self.output_log.push(line);
    }

    pub fn output(&self) -> &[String] {
        &self.output_log
    }

    /// Read one line (`read_line`). From the pre-canned sequence if one was
    /// supplied and is not yet exhausted; otherwise from real stdin. Returns
    /// `None` once a pre-canned sequence is exhausted (spec §9's open
    /// question: input exhaustion yields nothing, letting the caller decide).
    pub fn read_line(&mut self) -> Option<String> {
        match &self.input {
            Some(lines) => {
                let line = lines.get(self.input_cursor).cloned();
                if line.is_some() {
                    self.input_cursor += 1;
                }
                line
            }
            None => {
                let mut buf = String::new();
                match io::stdin().lock().read_line(&mut buf) {
                    Ok(0) => None,
                    Ok(_) => {
                        if buf.ends_with('\n') {
                            buf.pop();
                            if buf.ends_with('\r') {
                                buf.pop();
                            }
                        }
                        Some(buf)
                    }
                    Err(_) => None,
                }
            }
        }
    }
}
