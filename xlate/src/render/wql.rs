//! WQL renderer.
//!
//! WQL has no pipeline, so commands cannot be translated. Rather than
//! dropping them silently, a note is appended to the output.

use std::borrow::Cow;

use super::{group_runs, Renderer};
use crate::ir::{CommandKind, Operator, ParsedQuery, SearchTerm, Term};
use crate::Language;

pub const COMMANDS_NOTE: &str = "(Note: WQL does not support SPL commands)";
pub const GROUPING_NOTE: &str = "(Note: WQL does not support grouping operations)";

/// Renders `time: ..;..`, `field<op>value;...` and limitation notes.
pub struct WqlRenderer;

impl Renderer for WqlRenderer {
    fn language(&self) -> Language {
        Language::Wql
    }

    fn render(&self, query: &ParsedQuery) -> String {
        let mut parts = Vec::new();

        if let Some(range) = &query.time_range {
            let mut bounds = Vec::new();
            if let Some(earliest) = &range.earliest {
                bounds.push(format!("time>={}", earliest));
            }
            if let Some(latest) = &range.latest {
                bounds.push(format!("time<={}", latest));
            }
            parts.push(format!("time: {}", bounds.join(";")));
        }

        let mut clauses = Vec::new();
        for (grouped, run) in group_runs(&query.terms) {
            let rendered: Vec<String> = run.iter().map(render_term).collect();
            if grouped {
                clauses.push(format!("({})", rendered.join(";")));
            } else {
                clauses.extend(rendered);
            }
        }
        if !clauses.is_empty() {
            parts.push(clauses.join(";"));
        }

        if parts.len() > 1 {
            parts = parts.into_iter().map(|p| format!("({})", p)).collect();
        }

        let mut notes: Vec<&str> = Vec::new();
        for command in &query.commands {
            let note = match command.kind {
                CommandKind::Groupby => GROUPING_NOTE,
                CommandKind::Stats
                | CommandKind::Table
                | CommandKind::Sort
                | CommandKind::Timeslice
                | CommandKind::Lookup
                | CommandKind::By
                | CommandKind::As
                | CommandKind::Other => COMMANDS_NOTE,
            };
            if !notes.contains(&note) {
                notes.push(note);
            }
        }
        parts.extend(notes.into_iter().map(String::from));

        parts.join(" ")
    }
}

fn render_term(term: &Term) -> String {
    match term {
        Term::Text(text) => format!("message~{}", clause_value(text)),
        Term::Field(t) => render_search_term(t),
    }
}

fn render_search_term(term: &SearchTerm) -> String {
    let field = match &term.field {
        Some(field) if term.is_wildcard => return format!("message~{}", clause_value(field)),
        Some(field) => field,
        None => return format!("message~{}", clause_value(&term.value)),
    };

    let value = clause_value(&term.value);
    match term.operator {
        Operator::Eq
        | Operator::NotEq
        | Operator::Gt
        | Operator::Lt
        | Operator::Gte
        | Operator::Lte => format!("{}{}{}", field, term.operator, value),
        Operator::IContains | Operator::Fuzzy => format!("{}~{}", field, value),
    }
}

/// Double-quote a value that would otherwise be cut at the `;` clause separator.
fn clause_value(value: &str) -> Cow<'_, str> {
    if value.contains(';') {
        Cow::Owned(format!("\"{}\"", value))
    } else {
        Cow::Borrowed(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{Command, TimeRange};

    fn render(query: &ParsedQuery) -> String {
        WqlRenderer.render(query)
    }

    #[test]
    fn test_free_text() {
        let q = ParsedQuery {
            terms: vec![Term::Text("error".into())],
            ..Default::default()
        };
        assert_eq!(render(&q), "message~error");
    }

    #[test]
    fn test_operators_copied() {
        let q = ParsedQuery {
            terms: vec![
                Term::field("status", Operator::Eq, "404"),
                Term::field("cpu", Operator::Gte, "90"),
                Term::field("user", Operator::NotEq, "root"),
                Term::field("host", Operator::IContains, "web"),
            ],
            ..Default::default()
        };
        assert_eq!(render(&q), "status=404;cpu>=90;user!=root;host~web");
    }

    #[test]
    fn test_separator_in_value_is_quoted() {
        let q = ParsedQuery {
            terms: vec![
                Term::Text("a;b".into()),
                Term::Text("c".into()),
                Term::field("path", Operator::Eq, "x;y"),
            ],
            ..Default::default()
        };
        assert_eq!(render(&q), r#"message~"a;b";message~c;path="x;y""#);
    }

    #[test]
    fn test_time_range_wraps_parts() {
        let q = ParsedQuery {
            terms: vec![Term::Text("error".into())],
            time_range: TimeRange::new(Some("-1d".into()), Some("now".into())),
            ..Default::default()
        };
        assert_eq!(render(&q), "(time: time>=-1d;time<=now) (message~error)");
    }

    #[test]
    fn test_time_range_alone() {
        let q = ParsedQuery {
            time_range: TimeRange::new(None, Some("now".into())),
            ..Default::default()
        };
        assert_eq!(render(&q), "time: time<=now");
    }

    #[test]
    fn test_grouped_run() {
        let q = ParsedQuery {
            terms: vec![
                Term::field("a", Operator::Eq, "1"),
                Term::Field(SearchTerm::new("b", Operator::Eq, "2").grouped()),
                Term::Field(SearchTerm::new("c", Operator::Fuzzy, "x").grouped()),
            ],
            ..Default::default()
        };
        assert_eq!(render(&q), "a=1;(b=2;c~x)");
    }

    #[test]
    fn test_commands_note_once() {
        let q = ParsedQuery {
            terms: vec![Term::Text("error".into())],
            commands: vec![
                Command::new("stats", vec!["count".into()]),
                Command::new("table", vec!["status".into()]),
            ],
            ..Default::default()
        };
        assert_eq!(render(&q), format!("message~error {}", COMMANDS_NOTE));
    }

    #[test]
    fn test_groupby_note() {
        let q = ParsedQuery {
            terms: vec![Term::field("message", Operator::IContains, "error")],
            commands: vec![Command::new("groupby", vec!["status".into()])],
            ..Default::default()
        };
        assert_eq!(render(&q), format!("message~error {}", GROUPING_NOTE));
    }
}
