//! Shell-like command templates turned into an executable and its arguments.
//!
//! A [`Template`] is a sequence of raw literal runs with substitution values
//! between them, in the shape of a tagged template literal. [`parse`] scans the
//! runs with double-quote quoting and backslash escapes, merges scalar values
//! into the surrounding argument and expands list values into standalone
//! arguments, and returns a [`CommandLine`].
//!
//! Parsing never executes anything. The [`Launcher`] is a separate consumer of
//! parsed command lines that starts processes with piped or inherited stdio and
//! decodes their captured output.
//!
//! ```
//! use command_template::{parse, template};
//!
//! let files = ["a.txt", "b c.txt"];
//! let line = parse(&template!("cp -v " {files} " \"/tmp/my dir\"")).unwrap();
//! assert_eq!(line.executable, "cp");
//! assert_eq!(line.arguments, ["-v", "a.txt", "b c.txt", "/tmp/my dir"]);
//! ```

pub mod config;
pub mod decode;
pub mod env;
mod error;
mod escape;
mod launcher;
mod lexer;
mod parser;
pub mod repl;
mod template;

pub use error::{LaunchError, ParseError};
pub use launcher::{
    DecodedOutput, ExitCode, InheritedOutput, Launcher, PipedOutput, StdioMode, exec,
    exec_inherit, find_command_path, spawn, spawn_inherit,
};
pub use parser::{CommandLine, parse};
pub use template::{Substitution, Template, TemplateBuilder};
