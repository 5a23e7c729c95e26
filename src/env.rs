use std::collections::HashMap;
use std::env as stdenv;
use std::path::PathBuf;

/// Variables and working directory that launched commands run with.
///
/// By default this is a snapshot of the current process. Changes made here
/// only affect commands started through a [`Launcher`](crate::Launcher) that
/// owns this environment, never the parent process.
#[derive(Debug, Clone)]
pub struct Environment {
    /// Variables passed to child processes (e.g. `PATH`, `HOME`).
    pub vars: HashMap<String, String>,
    /// Working directory of child processes.
    pub current_dir: PathBuf,
}

impl Environment {
    /// Capture the current process state.
    pub fn capture() -> Self {
        let vars = stdenv::vars().collect();
        let current_dir = stdenv::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self { vars, current_dir }
    }

    /// An environment without any variables, rooted at `current_dir`.
    pub fn empty(current_dir: impl Into<PathBuf>) -> Self {
        Self {
            vars: HashMap::new(),
            current_dir: current_dir.into(),
        }
    }

    pub fn get_var(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Set or override a variable for child processes.
    pub fn set_var(&mut self, key: impl Into<String>, val: impl Into<String>) {
        self.vars.insert(key.into(), val.into());
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::capture()
    }
}
