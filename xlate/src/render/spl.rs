//! SPL renderer.

use super::{group_runs, Renderer};
use crate::ir::{CommandKind, Operator, ParsedQuery, SearchTerm, Term};
use crate::Language;

/// Field searched by free-text terms in the other languages.
const MESSAGE_FIELD: &str = "message";

/// Renders `earliest=.. latest=.. terms | command ...`.
pub struct SplRenderer;

impl Renderer for SplRenderer {
    fn language(&self) -> Language {
        Language::Spl
    }

    fn render(&self, query: &ParsedQuery) -> String {
        let mut parts = Vec::new();

        if let Some(range) = &query.time_range {
            if let Some(earliest) = &range.earliest {
                parts.push(format!("earliest={}", earliest));
            }
            if let Some(latest) = &range.latest {
                parts.push(format!("latest={}", latest));
            }
        }

        for (grouped, run) in group_runs(&query.terms) {
            let rendered: Vec<String> = run.iter().map(render_term).collect();
            if grouped {
                parts.push(format!("({})", rendered.join(" ")));
            } else {
                parts.extend(rendered);
            }
        }

        for subsearch in &query.subsearches {
            parts.push(format!("[{}]", subsearch));
        }

        for command in &query.commands {
            match command.kind {
                CommandKind::Groupby => {
                    if !command.args.is_empty() {
                        parts.push(format!("| stats count by {}", command.args.join(", ")));
                    }
                }
                CommandKind::Stats
                | CommandKind::Table
                | CommandKind::Sort
                | CommandKind::Timeslice
                | CommandKind::Lookup
                | CommandKind::By
                | CommandKind::As
                | CommandKind::Other => {
                    let mut stage = format!("| {}", command.name);
                    for arg in &command.args {
                        stage.push(' ');
                        stage.push_str(arg);
                    }
                    parts.push(stage);
                }
            }
        }

        parts.join(" ")
    }
}

fn render_term(term: &Term) -> String {
    match term {
        Term::Text(text) => quote(text),
        Term::Field(t) => render_search_term(t),
    }
}

fn render_search_term(term: &SearchTerm) -> String {
    let field = match &term.field {
        Some(field) if term.is_wildcard => return field.clone(),
        Some(field) => field,
        None => return quote(&term.value),
    };

    match term.operator {
        Operator::Eq
        | Operator::NotEq
        | Operator::Gt
        | Operator::Lt
        | Operator::Gte
        | Operator::Lte => format!("{}{}{}", field, term.operator, quote(&term.value)),
        Operator::IContains => format!("{}*{}*", field, term.value),
        Operator::Fuzzy if field == MESSAGE_FIELD => quote(&term.value),
        Operator::Fuzzy => format!("{}=*{}*", field, term.value),
    }
}

/// Double-quote values that would otherwise split into several tokens.
fn quote(value: &str) -> String {
    if value.is_empty() || value.chars().any(char::is_whitespace) {
        format!("\"{}\"", value)
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{Command, TimeRange};

    fn render(query: &ParsedQuery) -> String {
        SplRenderer.render(query)
    }

    #[test]
    fn test_icontains_becomes_wildcard() {
        let q = ParsedQuery {
            terms: vec![Term::field("message", Operator::IContains, "error")],
            ..Default::default()
        };
        assert_eq!(render(&q), "message*error*");
    }

    #[test]
    fn test_groupby_becomes_stats() {
        let q = ParsedQuery {
            terms: vec![Term::field("user", Operator::IContains, "adm")],
            commands: vec![Command::new("groupby", vec!["host, status".into()])],
            ..Default::default()
        };
        assert_eq!(render(&q), "user*adm* | stats count by host, status");
    }

    #[test]
    fn test_fuzzy_message_is_free_text() {
        let q = ParsedQuery {
            terms: vec![
                Term::field("message", Operator::Fuzzy, "error"),
                Term::field("user", Operator::Fuzzy, "adm"),
            ],
            ..Default::default()
        };
        assert_eq!(render(&q), "error user=*adm*");
    }

    #[test]
    fn test_time_range_and_operators() {
        let q = ParsedQuery {
            terms: vec![
                Term::field("cpu", Operator::Gte, "90"),
                Term::field("msg", Operator::Eq, "disk full"),
            ],
            time_range: TimeRange::new(Some("-1d".into()), Some("now".into())),
            ..Default::default()
        };
        assert_eq!(render(&q), "earliest=-1d latest=now cpu>=90 msg=\"disk full\"");
    }

    #[test]
    fn test_grouped_run() {
        let q = ParsedQuery {
            terms: vec![
                Term::field("a", Operator::Eq, "1"),
                Term::Field(SearchTerm::new("b", Operator::Eq, "2").grouped()),
                Term::Field(SearchTerm::new("c", Operator::NotEq, "3").grouped()),
            ],
            ..Default::default()
        };
        assert_eq!(render(&q), "a=1 (b=2 c!=3)");
    }

    #[test]
    fn test_other_commands_reemitted() {
        let q = ParsedQuery {
            terms: vec![Term::Text("error".into())],
            commands: vec![Command::new("head", vec!["10".into()])],
            ..Default::default()
        };
        assert_eq!(render(&q), "error | head 10");
    }
}
