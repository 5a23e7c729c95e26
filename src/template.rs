//! Command templates: literal text runs interleaved with substitution values.

/// A value interpolated between two literal runs.
///
/// Numbers are turned into their decimal string form when the value is built,
/// so the parser only ever sees strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Substitution {
    /// Concatenated into the argument currently being built.
    Scalar(String),
    /// Expanded into one standalone argument per element.
    List(Vec<String>),
}

impl Substitution {
    /// Creates a list substitution from anything yielding displayable items.
    pub fn list<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: ToString,
    {
        Substitution::List(items.into_iter().map(|item| item.to_string()).collect())
    }
}

impl From<&str> for Substitution {
    fn from(value: &str) -> Self {
        Substitution::Scalar(value.to_string())
    }
}

impl From<String> for Substitution {
    fn from(value: String) -> Self {
        Substitution::Scalar(value)
    }
}

impl From<&String> for Substitution {
    fn from(value: &String) -> Self {
        Substitution::Scalar(value.clone())
    }
}

macro_rules! scalar_from_number {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Substitution {
                fn from(value: $ty) -> Self {
                    Substitution::Scalar(value.to_string())
                }
            }
        )*
    };
}

scalar_from_number!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

impl<T: ToString> From<Vec<T>> for Substitution {
    fn from(value: Vec<T>) -> Self {
        Substitution::list(value)
    }
}

impl<T: ToString> From<&[T]> for Substitution {
    fn from(value: &[T]) -> Self {
        Substitution::List(value.iter().map(ToString::to_string).collect())
    }
}

impl<T: ToString, const N: usize> From<[T; N]> for Substitution {
    fn from(value: [T; N]) -> Self {
        Substitution::list(value)
    }
}

/// Raw literal runs plus the substitution slots between them.
///
/// Runs are kept exactly as authored: escapes are not decoded until parsing.
/// A well-formed template has one slot less than it has runs; missing tail
/// slots and `None` slots are both treated as "no value".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Template {
    runs: Vec<String>,
    slots: Vec<Option<Substitution>>,
}

impl Template {
    /// Start building a template piece by piece.
    pub fn builder() -> TemplateBuilder {
        TemplateBuilder::default()
    }

    /// A template made of a single literal run.
    pub fn literal(text: impl Into<String>) -> Self {
        Self {
            runs: vec![text.into()],
            slots: Vec::new(),
        }
    }

    /// Assembles a template from already split runs and slots.
    pub fn from_parts(runs: Vec<String>, slots: Vec<Option<Substitution>>) -> Self {
        Self { runs, slots }
    }

    /// Splits `text` on every `{}` placeholder and fills the holes with
    /// `values` in order. Surplus placeholders become absent slots.
    ///
    /// `{{}}` stands for a literal `{}` and never opens a slot.
    pub fn with_placeholders<I, T>(text: &str, values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Substitution>,
    {
        let mut runs = Vec::new();
        let mut current = String::new();
        let mut rest = text;

        while let Some(pos) = rest.find("{}") {
            if rest[..pos].ends_with('{') && rest[pos + 2..].starts_with('}') {
                current.push_str(&rest[..pos - 1]);
                current.push_str("{}");
                rest = &rest[pos + 3..];
            } else {
                current.push_str(&rest[..pos]);
                runs.push(std::mem::take(&mut current));
                rest = &rest[pos + 2..];
            }
        }
        current.push_str(rest);
        runs.push(current);

        let mut values = values.into_iter();
        let slots = (1..runs.len())
            .map(|_| values.next().map(Into::into))
            .collect();
        Self { runs, slots }
    }

    pub fn runs(&self) -> &[String] {
        &self.runs
    }

    /// The value for the slot following run `index`, if any.
    pub fn slot(&self, index: usize) -> Option<&Substitution> {
        self.slots.get(index).and_then(Option::as_ref)
    }
}

/// Incremental construction of a [`Template`].
///
/// Adjacent text pieces are merged into one run and adjacent values get an
/// empty run between them, so the result always alternates correctly.
#[derive(Debug, Default)]
pub struct TemplateBuilder {
    runs: Vec<String>,
    slots: Vec<Option<Substitution>>,
    current: String,
}

impl TemplateBuilder {
    pub fn text(mut self, text: &str) -> Self {
        self.current.push_str(text);
        self
    }

    pub fn value(mut self, value: impl Into<Substitution>) -> Self {
        self.runs.push(std::mem::take(&mut self.current));
        self.slots.push(Some(value.into()));
        self
    }

    pub fn build(mut self) -> Template {
        self.runs.push(self.current);
        Template {
            runs: self.runs,
            slots: self.slots,
        }
    }
}

/// Builds a [`Template`] from string literals and `{expr}` values.
///
/// ```
/// use command_template::{parse, template};
///
/// let name = "world";
/// let files = vec!["a.txt", "b.txt"];
/// let line = parse(&template!("echo \"Hello, " {name} "!\" " {files})).unwrap();
/// assert_eq!(line.arguments, ["Hello, world!", "a.txt", "b.txt"]);
/// ```
#[macro_export]
macro_rules! template {
    (@part $builder:ident { $value:expr }) => {
        $builder.value($value)
    };
    (@part $builder:ident $text:literal) => {
        $builder.text($text)
    };
    ($($part:tt)*) => {{
        let builder = $crate::Template::builder();
        $( let builder = $crate::template!(@part builder $part); )*
        builder.build()
    }};
}
