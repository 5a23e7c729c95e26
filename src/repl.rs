//! Interactive loop: one command template per line.

use crate::launcher::Launcher;
use crate::parser::{CommandLine, parse};
use crate::template::Template;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::io::Write;
use tracing::debug;

const PROMPT: &str = "tmpl$ ";

/// What the loop does with every parsed line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplMode {
    /// Print the executable and arguments without running anything.
    DryRun,
    /// Run the command with inherited stdio.
    Execute,
}

pub struct Repl {
    launcher: Launcher,
    mode: ReplMode,
}

impl Repl {
    pub fn new(launcher: Launcher, mode: ReplMode) -> Self {
        Self { launcher, mode }
    }

    /// Reads lines until Ctrl-C or Ctrl-D. Errors on individual lines are
    /// reported and the loop keeps going.
    pub fn run(&mut self) -> rustyline::Result<()> {
        let mut rl = DefaultEditor::new()?;
        let mut stdout = std::io::stdout();

        loop {
            match rl.readline(PROMPT) {
                Ok(line) => {
                    if line.trim().is_empty() {
                        continue;
                    }
                    rl.add_history_entry(line.as_str())?;
                    if let Err(err) = self.handle_line(&line, &mut stdout) {
                        eprintln!("error: {err:#}");
                    }
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
                Err(err) => return Err(err),
            }
        }

        Ok(())
    }

    /// Parses one line and either prints or runs it.
    pub fn handle_line(&self, line: &str, out: &mut dyn Write) -> anyhow::Result<()> {
        let template = Template::literal(line);
        match self.mode {
            ReplMode::DryRun => {
                let parsed = parse(&template)?;
                write_command_line(out, &parsed)?;
            }
            ReplMode::Execute => {
                let status = self.launcher.exec_inherit(&template)?;
                debug!(?status, "repl command finished");
                if !status.success {
                    writeln!(out, "[exit {}]", status.exit_code())?;
                }
            }
        }
        Ok(())
    }
}

/// Prints the executable and each argument on its own line, debug-quoted so
/// empty and whitespace-only arguments stay visible.
pub fn write_command_line(out: &mut dyn Write, line: &CommandLine) -> std::io::Result<()> {
    writeln!(out, "executable: {:?}", line.executable)?;
    for (index, arg) in line.arguments.iter().enumerate() {
        writeln!(out, "arg[{index}]: {arg:?}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ParseError;

    fn dry_run(line: &str) -> anyhow::Result<String> {
        let repl = Repl::new(Launcher::default(), ReplMode::DryRun);
        let mut out = Vec::new();
        repl.handle_line(line, &mut out)?;
        Ok(String::from_utf8(out).expect("utf8"))
    }

    #[test]
    fn test_dry_run_prints_parsed_line() {
        let printed = dry_run(r#"echo "hello world" "" x"#).unwrap();
        assert_eq!(
            printed,
            "executable: \"echo\"\narg[0]: \"hello world\"\narg[1]: \"\"\narg[2]: \"x\"\n"
        );
    }

    #[test]
    fn test_dry_run_reports_parse_errors() {
        let err = dry_run(r"echo \q").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ParseError>(),
            Some(ParseError::InvalidEscapeSequence { offset: 6, .. })
        ));
    }

    #[test]
    #[cfg(unix)]
    fn test_execute_reports_failure_code() {
        let repl = Repl::new(Launcher::default(), ReplMode::Execute);
        let mut out = Vec::new();
        repl.handle_line("false", &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "[exit 1]\n");
    }
}
