//! Language-neutral intermediate representation shared by every parser and renderer.
//!
//! A [`ParsedQuery`] is built fresh by one parser, read once by one renderer,
//! then dropped. Nothing in here is mutated after parsing finishes.

use std::fmt;

use serde::Serialize;

/// A parsed query containing all components.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParsedQuery {
    /// Search predicates and free-text tokens, in source order
    pub terms: Vec<Term>,
    /// Time bounds (None when neither bound was given)
    pub time_range: Option<TimeRange>,
    /// Pipeline stages, in source order
    pub commands: Vec<Command>,
    /// Bracketed sub-queries, stored verbatim
    pub subsearches: Vec<String>,
    /// Lookup descriptors
    pub lookups: Vec<Lookup>,
}

impl ParsedQuery {
    /// True when the query carries nothing a renderer could emit.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
            && self.time_range.is_none()
            && self.commands.is_empty()
            && self.subsearches.is_empty()
            && self.lookups.is_empty()
    }
}

/// Time bounds, kept as the source text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TimeRange {
    /// Lower bound (`-1d`, `2024-01-01T00:00:00`, ...)
    pub earliest: Option<String>,
    /// Upper bound (`now`, ...)
    pub latest: Option<String>,
}

impl TimeRange {
    /// Build a range, or `None` when both bounds are missing.
    pub fn new(earliest: Option<String>, latest: Option<String>) -> Option<Self> {
        if earliest.is_none() && latest.is_none() {
            None
        } else {
            Some(Self { earliest, latest })
        }
    }
}

/// One entry of the ordered term list.
///
/// Fielded predicates and bare words share a single list so that word order
/// from the source survives into the rendered output.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Term {
    /// `field<op>value` predicate (or a wildcard glob)
    Field(SearchTerm),
    /// Bare free-text token
    Text(String),
}

impl Term {
    /// Convenience constructor for a plain `field<op>value` predicate.
    pub fn field(field: impl Into<String>, op: Operator, value: impl Into<String>) -> Self {
        Term::Field(SearchTerm::new(field, op, value))
    }

    /// Whether this term came from inside a parenthesized group.
    pub fn is_grouped(&self) -> bool {
        matches!(self, Term::Field(t) if t.is_grouped)
    }
}

/// A single predicate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchTerm {
    /// Field name (None = free text against the message field)
    pub field: Option<String>,
    /// Comparison operator
    pub operator: Operator,
    /// Value with surrounding quotes removed
    pub value: String,
    /// The field expression itself was a `*` glob
    pub is_wildcard: bool,
    /// The term came from a parenthesized sub-expression (marker only)
    pub is_grouped: bool,
}

impl SearchTerm {
    pub fn new(field: impl Into<String>, operator: Operator, value: impl Into<String>) -> Self {
        Self {
            field: Some(field.into()),
            operator,
            value: value.into(),
            is_wildcard: false,
            is_grouped: false,
        }
    }

    /// A glob such as `user*` standing on its own.
    pub fn wildcard(glob: impl Into<String>) -> Self {
        Self {
            field: Some(glob.into()),
            operator: Operator::Eq,
            value: "*".to_string(),
            is_wildcard: true,
            is_grouped: false,
        }
    }

    /// Mark the term as coming from a parenthesized group.
    pub fn grouped(mut self) -> Self {
        self.is_grouped = true;
        self
    }
}

/// Comparison operators across all three languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// `=`
    Eq,
    /// `!=`
    NotEq,
    /// `>`
    Gt,
    /// `<`
    Lt,
    /// `>=`
    Gte,
    /// `<=`
    Lte,
    /// LEQL `ICONTAINS`
    IContains,
    /// WQL `~` (like)
    Fuzzy,
}

impl Operator {
    /// Relational operators, two-character forms first so that a prefix
    /// never claims a longer operator.
    pub const RELATIONAL: [(&'static str, Operator); 6] = [
        (">=", Operator::Gte),
        ("<=", Operator::Lte),
        ("!=", Operator::NotEq),
        (">", Operator::Gt),
        ("<", Operator::Lt),
        ("=", Operator::Eq),
    ];

    /// Parse one of `= != > < >= <=`.
    pub fn parse_relational(s: &str) -> Option<Self> {
        Self::RELATIONAL
            .iter()
            .find(|(token, _)| *token == s)
            .map(|(_, op)| *op)
    }

    /// The symbol used by languages that write the operator inline.
    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::NotEq => "!=",
            Operator::Gt => ">",
            Operator::Lt => "<",
            Operator::Gte => ">=",
            Operator::Lte => "<=",
            Operator::IContains => "icontains",
            Operator::Fuzzy => "~",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl Serialize for Operator {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.symbol())
    }
}

/// What a pipeline stage does, so renderers can match without re-reading names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandKind {
    Stats,
    Table,
    Sort,
    Timeslice,
    Groupby,
    Lookup,
    /// Stand-alone `BY` stage
    By,
    /// Stand-alone `AS` stage
    As,
    /// Anything else (carried through, dropped by renderers that cannot express it)
    Other,
}

impl CommandKind {
    /// Classify a command name (case-insensitive).
    pub fn classify(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "stats" => CommandKind::Stats,
            "table" => CommandKind::Table,
            "sort" => CommandKind::Sort,
            "timeslice" => CommandKind::Timeslice,
            "groupby" => CommandKind::Groupby,
            "lookup" => CommandKind::Lookup,
            "by" => CommandKind::By,
            "as" => CommandKind::As,
            _ => CommandKind::Other,
        }
    }
}

/// One pipeline stage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Command {
    pub kind: CommandKind,
    /// Name as written in the source
    pub name: String,
    pub args: Vec<String>,
}

impl Command {
    pub fn new(name: impl Into<String>, args: Vec<String>) -> Self {
        let name = name.into();
        Self {
            kind: CommandKind::classify(&name),
            name,
            args,
        }
    }

    /// Check for an exact (case-insensitive) argument token.
    pub fn has_arg(&self, arg: &str) -> bool {
        self.args.iter().any(|a| a.eq_ignore_ascii_case(arg))
    }

    /// Fields after a `by` marker, with list commas removed.
    pub fn by_fields(&self) -> Vec<String> {
        let Some(pos) = self.args.iter().position(|a| a.eq_ignore_ascii_case("by")) else {
            return Vec::new();
        };
        split_field_list(&self.args[pos + 1..])
    }
}

/// Flatten tokens like `["a,", "b", "c,d"]` into `["a", "b", "c", "d"]`.
pub(crate) fn split_field_list(tokens: &[String]) -> Vec<String> {
    tokens
        .iter()
        .flat_map(|t| t.split(','))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Lookup descriptor (`lookup <table> <field> ...`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Lookup {
    pub args: Vec<String>,
}
