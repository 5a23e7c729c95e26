//! Character-level scanning of literal runs and merging of substitutions.
//!
//! The lexer is a small state machine over `{Unquoted, Quoted} x {NotEscaped,
//! Escaped}`. It is fed literal runs and substitution values alternately and
//! accumulates finished arguments plus one argument still under construction.

use crate::error::ParseError;
use crate::escape;
use crate::template::Substitution;
use tracing::trace;

/// Quote and escape flags, carried across runs and substitutions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct ScanState {
    pub quoted: bool,
    pub escaped: bool,
}

/// Accumulates arguments for one parse.
#[derive(Debug, Default)]
pub(crate) struct Lexer {
    state: ScanState,
    buffer: String,
    args: Vec<String>,
}

impl Lexer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ScanState {
        self.state
    }

    /// Scans one literal run. `run_index` is only used for error reporting.
    pub fn scan_run(&mut self, run_index: usize, run: &str) -> Result<(), ParseError> {
        let input: Vec<char> = run.chars().collect();
        let mut pos = 0;

        while let Some(&ch) = input.get(pos) {
            if !self.state.escaped {
                match ch {
                    '\\' => {
                        self.state.escaped = true;
                        pos += 1;
                        continue;
                    }
                    '"' => {
                        self.handle_quote();
                        pos += 1;
                        continue;
                    }
                    _ => {}
                }
            }

            let (ch, size) = if self.state.escaped {
                let decoded = escape::decode(&input, pos)
                    .ok_or_else(|| ParseError::invalid_escape(run_index, pos, &input[pos..]))?;
                (decoded.ch, decoded.size)
            } else {
                (ch, 1)
            };

            self.handle_char(ch);
            self.state.escaped = false;
            pos += size;
        }

        Ok(())
    }

    /// Merges the substitution following run `slot` into the output.
    pub fn expand(&mut self, slot: usize, value: &Substitution) -> Result<(), ParseError> {
        match value {
            Substitution::List(items) => {
                if !self.buffer.is_empty() || self.state.quoted {
                    return Err(ParseError::IllegalArraySubstitution { slot });
                }
                trace!(slot, count = items.len(), "expanding list substitution");
                self.args.extend(items.iter().cloned());
            }
            Substitution::Scalar(text) => self.buffer.push_str(text),
        }
        Ok(())
    }

    /// Flushes the trailing buffer and hands back every argument in order.
    pub fn finish(mut self) -> Vec<String> {
        self.flush();
        self.args
    }

    /// An unescaped quote always ends the current argument.
    fn handle_quote(&mut self) {
        self.state.quoted = !self.state.quoted;

        if !self.buffer.is_empty() {
            self.flush();
        } else if !self.state.quoted {
            // `""` stands for an explicit empty argument
            trace!("pushing empty argument");
            self.args.push(String::new());
        }
    }

    fn handle_char(&mut self, ch: char) {
        if is_separator(ch) && !self.state.quoted {
            self.flush();
        } else {
            self.buffer.push(ch);
        }
    }

    fn flush(&mut self) {
        if self.buffer.is_empty() {
            return;
        }
        let arg = std::mem::take(&mut self.buffer);
        trace!(arg = %arg, "argument complete");
        self.args.push(arg);
    }
}

/// Whitespace that separates arguments outside of quotes.
pub(crate) fn is_separator(ch: char) -> bool {
    ch.is_whitespace() || ch == '\u{feff}'
}
