use crate::error::ParseError;
use crate::lexer::{Lexer, is_separator};
use crate::template::{Substitution, Template};
use tracing::debug;

/// A parsed command line, ready to be handed to a process launcher verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    /// Program name: the first parsed argument.
    pub executable: String,
    /// Everything after the program name, in encounter order.
    pub arguments: Vec<String>,
}

impl CommandLine {
    /// Renders the command line back into a template that parses to the same
    /// value: each argument becomes a double-quoted scalar substitution.
    pub fn to_template(&self) -> Template {
        let mut builder = Template::builder().text("\"");
        for (index, arg) in std::iter::once(&self.executable)
            .chain(&self.arguments)
            .enumerate()
        {
            if index > 0 {
                builder = builder.text(" \"");
            }
            builder = builder.value(Substitution::Scalar(arg.clone())).text("\"");
        }
        builder.build()
    }
}

/// Splits a command template into an executable and its arguments.
///
/// Literal runs are scanned with double-quote quoting and backslash escapes;
/// substitutions are merged in between them. Scalars concatenate with
/// whatever surrounds them, lists expand into one argument per element and
/// must stand alone.
///
/// # Errors
///
/// * [`ParseError::InvalidEscapeSequence`] for an unknown or malformed escape.
/// * [`ParseError::IllegalArraySubstitution`] when a list touches other text
///   of the same argument or sits inside quotes.
/// * [`ParseError::MissingSubstitution`] when a slot is absent but template
///   text still follows it.
/// * [`ParseError::MissingExecutable`] when nothing was parsed at all.
///
/// # Example
///
/// ```
/// use command_template::{parse, Template};
///
/// let template = Template::builder()
///     .text("echo \"Hello, ")
///     .value("world")
///     .text("!\"")
///     .build();
/// let line = parse(&template).unwrap();
/// assert_eq!(line.executable, "echo");
/// assert_eq!(line.arguments, ["Hello, world!"]);
/// ```
pub fn parse(template: &Template) -> Result<CommandLine, ParseError> {
    let runs = template.runs();
    let mut lexer = Lexer::new();

    for (index, run) in runs.iter().enumerate() {
        lexer.scan_run(index, run)?;

        let is_last = index + 1 == runs.len();
        if is_last {
            break;
        }

        match template.slot(index) {
            Some(value) => lexer.expand(index, value)?,
            None => {
                // Stopping early is only harmless when nothing meaningful follows.
                if runs[index + 1..].iter().any(|r| !r.chars().all(is_separator)) {
                    return Err(ParseError::MissingSubstitution { slot: index });
                }
                debug!(slot = index, "no more substitutions, stopping");
                break;
            }
        }
    }

    let state = lexer.state();
    if state.quoted || state.escaped {
        debug!(
            quoted = state.quoted,
            escaped = state.escaped,
            "template ended inside a quote or escape"
        );
    }

    let mut args = lexer.finish().into_iter();
    let executable = args.next().ok_or(ParseError::MissingExecutable)?;
    let arguments: Vec<String> = args.collect();

    debug!(%executable, ?arguments, "parsed command line");
    Ok(CommandLine {
        executable,
        arguments,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn line(executable: &str, arguments: &[&str]) -> CommandLine {
        CommandLine {
            executable: executable.to_string(),
            arguments: arguments.iter().map(|a| a.to_string()).collect(),
        }
    }

    #[test]
    fn test_empty_executable_from_quotes() {
        let result = parse(&Template::literal(r#""" a"#)).unwrap();
        assert_eq!(result, line("", &["a"]));
    }

    #[test]
    fn test_empty_list_then_escaped_backslash() {
        let empty: Vec<String> = Vec::new();
        let result = parse(&template!("echo -e " {empty} r#" "\\x61""#)).unwrap();
        assert_eq!(result, line("echo", &["-e", r"\x61"]));
    }

    #[test]
    fn test_closed_quote_next_to_list() {
        let result = parse(&template!(r#"echo "Hi""# {vec!["World"]})).unwrap();
        assert_eq!(result, line("echo", &["Hi", "World"]));
    }

    #[test]
    fn test_simple_command() {
        let result = parse(&Template::literal("echo hello")).unwrap();
        assert_eq!(result, line("echo", &["hello"]));
    }

    #[test]
    fn test_quoted_argument() {
        let result = parse(&Template::literal(r#"echo "hello world""#)).unwrap();
        assert_eq!(result, line("echo", &["hello world"]));
    }

    #[test]
    fn test_escaped_quotes_inside_quotes() {
        let result = parse(&Template::literal(r#"echo "hello \"world\"!""#)).unwrap();
        assert_eq!(result, line("echo", &[r#"hello "world"!"#]));
    }

    #[test]
    fn test_scalar_substitution_as_argument() {
        let result = parse(&template!("echo " {"foo"})).unwrap();
        assert_eq!(result, line("echo", &["foo"]));
    }

    #[test]
    fn test_list_substitution_as_arguments() {
        let result = parse(&template!("echo " {["foo", "bar"]})).unwrap();
        assert_eq!(result, line("echo", &["foo", "bar"]));
    }

    #[test]
    fn test_scalar_inside_quotes() {
        let result = parse(&template!(r#"echo "hello, "# {"world"} r#"!""#)).unwrap();
        assert_eq!(result, line("echo", &["hello, world!"]));
    }

    #[test]
    fn test_multiple_substitutions() {
        let result = parse(&template!("cp " {"a.txt"} " " {"b.txt"})).unwrap();
        assert_eq!(result, line("cp", &["a.txt", "b.txt"]));
    }

    #[test]
    fn test_number_substitution() {
        let result = parse(&template!("head -n" {10} " file")).unwrap();
        assert_eq!(result, line("head", &["-n10", "file"]));
    }

    #[test]
    fn test_escaped_whitespace_separates() {
        let result = parse(&Template::literal(r"echo foo\tbar")).unwrap();
        assert_eq!(result, line("echo", &["foo", "bar"]));
    }

    #[test]
    fn test_list_next_to_text_fails() {
        let err = parse(&template!("echo foo" {["bar", "baz"]})).unwrap_err();
        assert_eq!(err, ParseError::IllegalArraySubstitution { slot: 0 });
    }

    #[test]
    fn test_missing_executable() {
        assert_eq!(
            parse(&template!()).unwrap_err(),
            ParseError::MissingExecutable
        );
        assert_eq!(
            parse(&Template::default()).unwrap_err(),
            ParseError::MissingExecutable
        );
        assert_eq!(
            parse(&Template::literal(" \t\n")).unwrap_err(),
            ParseError::MissingExecutable
        );
    }

    #[test]
    fn test_invalid_escape_fails() {
        let err = parse(&Template::literal(r"echo \u{zz}")).unwrap_err();
        assert!(matches!(
            err,
            ParseError::InvalidEscapeSequence { run: 0, offset: 6, .. }
        ));
    }

    #[test]
    fn test_absent_tail_slot_stops_quietly() {
        let template = Template::from_parts(
            vec!["echo hi ".into(), "  ".into()],
            vec![None],
        );
        assert_eq!(parse(&template).unwrap(), line("echo", &["hi"]));
    }

    #[test]
    fn test_absent_slot_before_byte_order_mark_stops_quietly() {
        let template = Template::from_parts(
            vec!["echo hi ".into(), "\u{feff}".into()],
            vec![None],
        );
        assert_eq!(parse(&template).unwrap(), line("echo", &["hi"]));
    }

    #[test]
    fn test_exhausted_slots_before_text_fail() {
        let template = Template::with_placeholders("cp {} {}", ["a.txt"]);
        assert_eq!(parse(&template).unwrap(), line("cp", &["a.txt"]));

        let template = Template::with_placeholders("cp {} {} -v", ["a.txt"]);
        assert_eq!(
            parse(&template).unwrap_err(),
            ParseError::MissingSubstitution { slot: 1 }
        );
    }

    #[test]
    fn test_literal_braces_need_no_substitution() {
        let no_values: Vec<String> = Vec::new();
        let template = Template::with_placeholders("find . -exec rm {{}} ;", no_values);
        assert_eq!(
            parse(&template).unwrap(),
            line("find", &[".", "-exec", "rm", "{}", ";"])
        );
    }

    #[test]
    fn test_unterminated_quote_is_accepted() {
        let result = parse(&Template::literal(r#"echo "open ended"#)).unwrap();
        assert_eq!(result, line("echo", &["open ended"]));
    }

    #[test]
    fn test_render_round_trip_with_awkward_arguments() {
        let original = line("my tool", &["", "\"quoted\"", "back\\slash", "tab\there"]);
        assert_eq!(parse(&original.to_template()).unwrap(), original);
    }

    proptest! {
        #[test]
        fn plain_words_split_on_whitespace(words in prop::collection::vec("[a-zA-Z0-9_./-]{1,8}", 1..8)) {
            let result = parse(&Template::literal(words.join("  "))).unwrap();
            prop_assert_eq!(&result.executable, &words[0]);
            prop_assert_eq!(&result.arguments[..], &words[1..]);
        }

        #[test]
        fn rendered_command_line_parses_back(
            executable in ".*",
            arguments in prop::collection::vec(".*", 0..6),
        ) {
            let original = CommandLine { executable, arguments };
            prop_assert_eq!(parse(&original.to_template()).unwrap(), original);
        }
    }
}
