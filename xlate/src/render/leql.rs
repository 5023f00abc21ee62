//! LEQL renderer.

use tracing::debug;

use super::Renderer;
use crate::ir::{split_field_list, Command, CommandKind, Operator, ParsedQuery, SearchTerm, Term};
use crate::Language;

/// SPL aggregate names and their LEQL `calculate` spelling (count handled apart).
const AGGREGATES: [(&str, &str); 4] = [
    ("avg", "average"),
    ("sum", "sum"),
    ("min", "min"),
    ("max", "max"),
];

/// Renders `from .. to .. where (..) calculate(..) groupby(..) ...`.
pub struct LeqlRenderer;

impl Renderer for LeqlRenderer {
    fn language(&self) -> Language {
        Language::Leql
    }

    fn render(&self, query: &ParsedQuery) -> String {
        let mut parts = Vec::new();

        if let Some(range) = &query.time_range {
            if let Some(earliest) = &range.earliest {
                // Relative SPL offsets (`-1d`) read as plain durations in LEQL
                let earliest = earliest.strip_prefix('-').unwrap_or(earliest);
                parts.push(format!("from {}", earliest));
            }
            if let Some(latest) = &range.latest {
                parts.push(format!("to {}", latest));
            }
        }

        // No grouping in LEQL: grouped terms join the flat conjunction
        let clauses: Vec<String> = query.terms.iter().map(render_term).collect();
        if !clauses.is_empty() {
            parts.push(format!("where ({})", clauses.join(" AND ")));
        }

        if !query.subsearches.is_empty() {
            debug!(count = query.subsearches.len(), "dropping subsearches with no LEQL equivalent");
        }

        for command in &query.commands {
            render_command(command, &mut parts);
        }

        parts.join(" ")
    }
}

fn render_term(term: &Term) -> String {
    match term {
        Term::Text(text) => contains("message", text),
        Term::Field(t) => render_search_term(t),
    }
}

fn render_search_term(term: &SearchTerm) -> String {
    let field = match &term.field {
        Some(field) if term.is_wildcard => return contains("message", field),
        Some(field) => field,
        None => return contains("message", &term.value),
    };

    match term.operator {
        Operator::Eq
        | Operator::NotEq
        | Operator::Gt
        | Operator::Lt
        | Operator::Gte
        | Operator::Lte => format!("{} {} '{}'", field, term.operator, term.value),
        Operator::IContains => format!("{} ICONTAINS '{}'", field, term.value),
        Operator::Fuzzy => contains(field, &term.value),
    }
}

fn contains(field: &str, value: &str) -> String {
    format!("{} contains '{}'", field, value)
}

fn render_command(command: &Command, parts: &mut Vec<String>) {
    match command.kind {
        CommandKind::Stats => render_stats(command, parts),
        CommandKind::Table => {
            let fields = split_field_list(&command.args);
            if !fields.is_empty() {
                parts.push(format!("select ({})", fields.join(", ")));
            }
        }
        CommandKind::Sort => {
            if let Some(direction) = sort_direction(&command.args) {
                parts.push(format!("sort({})", direction));
            }
        }
        CommandKind::Timeslice => {
            if let Some(interval) = command.args.first() {
                parts.push(format!("timeslice({})", interval));
            }
        }
        CommandKind::Groupby => {
            if !command.args.is_empty() {
                parts.push(format!("groupby({})", command.args.join(", ")));
            }
        }
        CommandKind::Lookup | CommandKind::By | CommandKind::As | CommandKind::Other => {
            debug!(command = %command.name, "dropping command with no LEQL equivalent");
        }
    }
}

/// `stats count [by f]` or `stats avg|sum|min|max <field> [by f]`.
fn render_stats(command: &Command, parts: &mut Vec<String>) {
    let counts = command.has_arg("count") || command.args.iter().any(|a| is_call(a, "count"));
    let calculation = if counts {
        Some("count".to_string())
    } else {
        AGGREGATES.iter().find_map(|(spl, leql)| {
            aggregate_field(&command.args, spl).map(|field| format!("{}:{}", leql, field))
        })
    };

    let Some(calculation) = calculation else {
        debug!(args = ?command.args, "dropping stats without a supported aggregate");
        return;
    };
    parts.push(format!("calculate({})", calculation));

    let by = command.by_fields();
    if !by.is_empty() {
        parts.push(format!("groupby({})", by.join(", ")));
    }
}

/// Field for `avg bytes` or `avg(bytes)`. A missing or empty field is no match.
fn aggregate_field<'a>(args: &'a [String], name: &str) -> Option<&'a str> {
    args.iter().enumerate().find_map(|(i, arg)| {
        let field = if arg.eq_ignore_ascii_case(name) {
            args.get(i + 1).map(String::as_str)?
        } else if is_call(arg, name) {
            &arg[name.len() + 1..arg.len() - 1]
        } else {
            return None;
        };
        let field = field.trim();
        (!field.is_empty() && !field.eq_ignore_ascii_case("by")).then_some(field)
    })
}

/// `name(...)`, case-insensitive on the name.
fn is_call(arg: &str, name: &str) -> bool {
    arg.len() > name.len() + 1
        && arg.get(..name.len()).is_some_and(|head| head.eq_ignore_ascii_case(name))
        && arg[name.len()..].starts_with('(')
        && arg.ends_with(')')
}

/// `sort <field> <dir>`, or `sort -field` / `sort +field`.
fn sort_direction(args: &[String]) -> Option<&'static str> {
    match args {
        [_, direction, ..] => Some(if direction.eq_ignore_ascii_case("desc") {
            "desc"
        } else {
            "asc"
        }),
        [field] if field.starts_with('-') => Some("desc"),
        [field] if field.starts_with('+') => Some("asc"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::TimeRange;

    fn render(query: &ParsedQuery) -> String {
        LeqlRenderer.render(query)
    }

    #[test]
    fn test_free_text() {
        let q = ParsedQuery {
            terms: vec![Term::Text("error".into())],
            ..Default::default()
        };
        assert_eq!(render(&q), "where (message contains 'error')");
    }

    #[test]
    fn test_fielded_terms_joined_with_and() {
        let q = ParsedQuery {
            terms: vec![
                Term::field("status", Operator::Eq, "404"),
                Term::field("bytes", Operator::Gte, "100"),
            ],
            ..Default::default()
        };
        assert_eq!(render(&q), "where (status = '404' AND bytes >= '100')");
    }

    #[test]
    fn test_time_range_strips_minus() {
        let q = ParsedQuery {
            time_range: TimeRange::new(Some("-1d".into()), Some("now".into())),
            ..Default::default()
        };
        assert_eq!(render(&q), "from 1d to now");
    }

    #[test]
    fn test_icontains_and_fuzzy() {
        let q = ParsedQuery {
            terms: vec![
                Term::field("user", Operator::IContains, "adm"),
                Term::field("message", Operator::Fuzzy, "error"),
            ],
            ..Default::default()
        };
        assert_eq!(
            render(&q),
            "where (user ICONTAINS 'adm' AND message contains 'error')"
        );
    }

    #[test]
    fn test_wildcard_is_message_search() {
        let q = ParsedQuery {
            terms: vec![Term::Field(SearchTerm::wildcard("user*"))],
            ..Default::default()
        };
        assert_eq!(render(&q), "where (message contains 'user*')");
    }

    #[test]
    fn test_stats_count_by() {
        let q = ParsedQuery {
            commands: vec![Command::new(
                "stats",
                vec!["count".into(), "by".into(), "status".into()],
            )],
            ..Default::default()
        };
        assert_eq!(render(&q), "calculate(count) groupby(status)");
    }

    #[test]
    fn test_stats_aggregates() {
        let cases = [
            (vec!["avg", "bytes"], "calculate(average:bytes)"),
            (vec!["sum", "bytes"], "calculate(sum:bytes)"),
            (vec!["min", "latency"], "calculate(min:latency)"),
            (vec!["max(latency)"], "calculate(max:latency)"),
        ];
        for (args, expected) in cases {
            let q = ParsedQuery {
                commands: vec![Command::new(
                    "stats",
                    args.into_iter().map(String::from).collect(),
                )],
                ..Default::default()
            };
            assert_eq!(render(&q), expected);
        }
    }

    #[test]
    fn test_stats_count_call_form() {
        let q = ParsedQuery {
            commands: vec![Command::new(
                "stats",
                vec!["count(status)".into(), "by".into(), "host".into()],
            )],
            ..Default::default()
        };
        assert_eq!(render(&q), "calculate(count) groupby(host)");
    }

    #[test]
    fn test_stats_aggregate_without_field_dropped() {
        for args in [vec!["max()"], vec!["avg"], vec!["sum", "by", "host"]] {
            let q = ParsedQuery {
                commands: vec![Command::new(
                    "stats",
                    args.into_iter().map(String::from).collect(),
                )],
                ..Default::default()
            };
            assert_eq!(render(&q), "");
        }
    }

    #[test]
    fn test_table_sort_timeslice() {
        let q = ParsedQuery {
            commands: vec![
                Command::new("table", vec!["status,".into(), "count".into()]),
                Command::new("sort", vec!["count".into(), "DESC".into()]),
                Command::new("sort", vec!["-count".into()]),
                Command::new("timeslice", vec!["5m".into()]),
            ],
            ..Default::default()
        };
        assert_eq!(
            render(&q),
            "select (status, count) sort(desc) sort(desc) timeslice(5m)"
        );
    }

    #[test]
    fn test_unknown_commands_dropped() {
        let q = ParsedQuery {
            terms: vec![Term::Text("error".into())],
            commands: vec![
                Command::new("eval", vec!["x=1".into()]),
                Command::new("stats", vec!["dc".into(), "user".into()]),
            ],
            ..Default::default()
        };
        assert_eq!(render(&q), "where (message contains 'error')");
    }
}
