//! WQL parser.

use crate::ir::{Operator, ParsedQuery, SearchTerm, Term, TimeRange};
use crate::scan::{find_enclosed, split_top_level, unquote};

/// Clause operators in classification order.
///
/// `>=`/`<=` must be tried before `>`/`<`, otherwise `cpu>=90` would read as
/// field `cpu`, value `=90`. `!=` is tried before `=` for the same reason.
const CLAUSE_OPERATORS: [(&str, Operator); 7] = [
    (">=", Operator::Gte),
    ("<=", Operator::Lte),
    (">", Operator::Gt),
    ("<", Operator::Lt),
    ("!=", Operator::NotEq),
    ("=", Operator::Eq),
    ("~", Operator::Fuzzy),
];

const TIME_FIELD: &str = "time";

/// Limitation notes appended by renderers, e.g. `(Note: ...)`.
const NOTE_PREFIX: &str = "Note:";

#[derive(Default)]
struct Bounds {
    earliest: Option<String>,
    latest: Option<String>,
}

impl Bounds {
    /// Record a bound; lower-bound operators set earliest, upper-bound set latest.
    fn set(&mut self, op: Operator, value: &str) -> bool {
        let value = Some(value.trim().to_string());
        match op {
            Operator::Gte | Operator::Gt => self.earliest = value,
            Operator::Lte | Operator::Lt => self.latest = value,
            _ => return false,
        }
        true
    }
}

/// Parse a WQL query.
pub fn parse_wql(raw: &str) -> ParsedQuery {
    let mut query = ParsedQuery::default();
    let mut bounds = Bounds::default();

    parse_clauses(raw, false, &mut query.terms, &mut bounds);

    query.time_range = TimeRange::new(bounds.earliest, bounds.latest);
    query
}

fn parse_clauses(input: &str, grouped: bool, terms: &mut Vec<Term>, bounds: &mut Bounds) {
    for clause in split_top_level(input, ';', '(', ')') {
        let clause = clause.trim();
        if clause.is_empty() || clause.starts_with(NOTE_PREFIX) {
            continue;
        }

        if let Some(rest) = clause.strip_prefix("time:") {
            if let Some((_, op, value)) = split_clause(rest) {
                bounds.set(op, value);
            }
            continue;
        }

        if let Some(groups) = paren_groups(clause) {
            // `(a) (b)` is a layout of separate parts, `(a;b)` is a group
            let inner_grouped = grouped || groups.len() == 1;
            for group in groups {
                parse_clauses(group, inner_grouped, terms, bounds);
            }
            continue;
        }

        match split_clause(clause) {
            Some((field, op, value)) => {
                // Second half of `time: time>=a;time<=b`
                if field == TIME_FIELD && bounds.set(op, value) {
                    continue;
                }
                let mut term = SearchTerm::new(field, op, unquote(value));
                term.is_grouped = grouped;
                terms.push(Term::Field(term));
            }
            None => terms.push(Term::Text(unquote(clause).to_string())),
        }
    }
}

/// Split a clause made only of whitespace-separated `(...)` groups.
///
/// Returns `None` when anything other than groups is present. Groups do not
/// nest: each ends at the first `)` after its `(`.
fn paren_groups(clause: &str) -> Option<Vec<&str>> {
    let mut groups = Vec::new();
    let mut rest = clause;
    while !rest.is_empty() {
        if !rest.starts_with('(') {
            return None;
        }
        let (_, close) = find_enclosed(rest, '(', ')', 0)?;
        groups.push(&rest[1..close]);
        rest = rest[close + 1..].trim_start();
    }
    Some(groups)
}

/// Split `field<op>value` on the first operator in classification order.
fn split_clause(clause: &str) -> Option<(&str, Operator, &str)> {
    CLAUSE_OPERATORS.iter().find_map(|(token, op)| {
        clause
            .split_once(token)
            .map(|(field, value)| (field.trim(), *op, value))
    })
}
