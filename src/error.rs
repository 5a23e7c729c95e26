use std::io;
use thiserror::Error;

/// Errors produced while turning a [`Template`](crate::Template) into a
/// [`CommandLine`](crate::CommandLine).
///
/// Positions are stored 0-based; the `Display` output counts from 1.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A backslash was followed by an unknown or malformed escape body.
    #[error("invalid escape sequence at run {}, character {}: \\{}", .run + 1, .offset + 1, .snippet)]
    InvalidEscapeSequence {
        /// Index of the literal run holding the escape.
        run: usize,
        /// Character offset (not byte offset) of the character following the backslash.
        offset: usize,
        /// Remaining text of the run from the offending character on.
        snippet: String,
    },

    /// A list substitution touched other content of the same argument.
    #[error("list substitution #{} cannot be combined with other argument content", .slot + 1)]
    IllegalArraySubstitution { slot: usize },

    /// Nothing was left to use as the program name.
    #[error("no executable provided")]
    MissingExecutable,

    /// A substitution slot was absent while template text still followed it.
    #[error("substitution #{} is missing but the template continues after it", .slot + 1)]
    MissingSubstitution { slot: usize },
}

impl ParseError {
    pub(crate) fn invalid_escape(run: usize, offset: usize, rest: &[char]) -> Self {
        let snippet: String = rest
            .iter()
            .map(|&c| if c == '\n' { ' ' } else { c })
            .collect();
        ParseError::InvalidEscapeSequence {
            run,
            offset,
            snippet: snippet.trim().to_string(),
        }
    }
}

/// Errors produced while launching a parsed command line.
#[derive(Debug, Error)]
pub enum LaunchError {
    /// The template never made it to process creation.
    #[error("failed to parse command template")]
    Parse(#[from] ParseError),

    #[error("command not found: {executable}")]
    NotFound { executable: String },

    #[error("failed to spawn `{executable}`")]
    Spawn {
        executable: String,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Io(#[from] io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_escape_display_is_one_based() {
        let rest: Vec<char> = "q rest\nof run ".chars().collect();
        let err = ParseError::invalid_escape(0, 5, &rest);
        assert_eq!(
            err.to_string(),
            "invalid escape sequence at run 1, character 6: \\q rest of run"
        );
    }

    #[test]
    fn launch_error_keeps_parse_error_as_source() {
        let err = LaunchError::from(ParseError::MissingExecutable);
        let source = std::error::Error::source(&err).map(|s| s.to_string());
        assert_eq!(source.as_deref(), Some("no executable provided"));
    }
}
