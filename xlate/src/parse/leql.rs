//! LEQL parser.
//!
//! Only two constructs are recognized: a `where(...)` clause holding
//! `field ICONTAINS value` conditions, and a `groupby(...)` clause. Both
//! clauses end at the first `)` after their opener (see [`crate::scan`]).

use std::sync::OnceLock;

use regex::Regex;

use crate::ir::{Command, Operator, ParsedQuery, SearchTerm, Term};
use crate::scan::{find_enclosed, split_boolean, unquote};

const ICONTAINS: &str = "icontains";

fn where_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\bwhere\s*\(").expect("valid where regex"))
}

fn groupby_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\bgroupby\s*\(").expect("valid groupby regex"))
}

/// Parse a LEQL query.
pub fn parse_leql(raw: &str) -> ParsedQuery {
    let mut query = ParsedQuery::default();

    if let Some(clause) = clause_body(raw, where_re()) {
        for (_, condition) in split_boolean(clause) {
            if let Some(term) = parse_condition(condition) {
                query.terms.push(term);
            }
        }
    }

    if let Some(clause) = clause_body(raw, groupby_re()) {
        query
            .commands
            .push(Command::new("groupby", vec![clause.trim().to_string()]));
    }

    query
}

/// Text between the marker's `(` and the first `)` after it.
fn clause_body<'a>(raw: &'a str, marker: &Regex) -> Option<&'a str> {
    let m = marker.find(raw)?;
    let (open, close) = find_enclosed(raw, '(', ')', m.end() - 1)?;
    Some(&raw[open + 1..close])
}

/// `field ICONTAINS value`; any other condition is ignored.
fn parse_condition(condition: &str) -> Option<Term> {
    // ASCII lowering keeps byte offsets aligned with `condition`
    let pos = condition.to_ascii_lowercase().find(ICONTAINS)?;
    let field = condition[..pos].trim();
    let value = unquote(&condition[pos + ICONTAINS.len()..]).to_string();

    let term = if field.is_empty() {
        SearchTerm {
            field: None,
            operator: Operator::IContains,
            value,
            is_wildcard: false,
            is_grouped: false,
        }
    } else {
        SearchTerm::new(field, Operator::IContains, value)
    };
    Some(Term::Field(term))
}
