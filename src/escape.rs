//! Decoding of backslash escape sequences found in literal runs.

/// One decoded escape sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Escape {
    /// The character the sequence stands for.
    pub ch: char,
    /// Number of source characters consumed, not counting the backslash.
    pub size: usize,
}

impl Escape {
    fn single(ch: char) -> Option<Self> {
        Some(Escape { ch, size: 1 })
    }
}

/// Decodes the escape sequence whose body starts at `input[pos]`.
///
/// The backslash itself has already been consumed by the caller, so
/// `input[pos]` is the escape kind (`n`, `x`, `u`, ...). Returns `None` when the
/// kind is unknown or the hex body is malformed.
///
/// Supported forms:
/// - `\n` `\b` `\f` `\t` `\r` `\v` control characters
/// - `\'` `\"` `` \` `` `\\` the character itself
/// - `\xHH` exactly two hex digits
/// - `\uHHHH` exactly four hex digits
/// - `\u{H...}` one to five hex digits between braces
///
/// Code points that are not Unicode scalar values (surrogates) are rejected,
/// since they cannot live in a `String`.
pub(crate) fn decode(input: &[char], pos: usize) -> Option<Escape> {
    let rest = input.get(pos + 1..).unwrap_or_default();

    match *input.get(pos)? {
        'n' => Escape::single('\n'),
        'b' => Escape::single('\u{08}'),
        'f' => Escape::single('\u{0c}'),
        't' => Escape::single('\t'),
        'r' => Escape::single('\r'),
        'v' => Escape::single('\u{0b}'),
        c @ ('\'' | '"' | '`' | '\\') => Escape::single(c),
        'x' => {
            let code = fixed_hex(rest, 2)?;
            Some(Escape {
                ch: char::from_u32(code)?,
                size: 3,
            })
        }
        'u' => decode_unicode(rest),
        _ => None,
    }
}

/// Handles the body following `u`: either `{H..}` or `HHHH`.
fn decode_unicode(rest: &[char]) -> Option<Escape> {
    if let Some((code, digits)) = braced_hex(rest) {
        return Some(Escape {
            ch: char::from_u32(code)?,
            size: digits + 3,
        });
    }

    let code = fixed_hex(rest, 4)?;
    Some(Escape {
        ch: char::from_u32(code)?,
        size: 5,
    })
}

/// Reads exactly `count` hex digits from the start of `rest`.
fn fixed_hex(rest: &[char], count: usize) -> Option<u32> {
    let digits = rest.get(..count)?;
    digits
        .iter()
        .try_fold(0u32, |acc, c| Some(acc * 16 + c.to_digit(16)?))
}

/// Reads `{` + 1..=5 hex digits + `}` from the start of `rest`, returning the
/// value and the digit count.
fn braced_hex(rest: &[char]) -> Option<(u32, usize)> {
    const MAX_DIGITS: usize = 5;

    if rest.first() != Some(&'{') {
        return None;
    }

    let digits = rest[1..]
        .iter()
        .take(MAX_DIGITS + 1)
        .take_while(|c| c.is_ascii_hexdigit())
        .count();

    if digits == 0 || digits > MAX_DIGITS || rest.get(digits + 1) != Some(&'}') {
        return None;
    }

    let code = fixed_hex(&rest[1..], digits)?;
    Some((code, digits))
}
