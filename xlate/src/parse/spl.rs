//! SPL parser.

use std::sync::OnceLock;

use regex::Regex;

use crate::ir::{Command, Lookup, Operator, ParsedQuery, SearchTerm, Term, TimeRange};
use crate::scan::{find_enclosed, paren_spans, split_boolean, split_top_level, unquote};

fn time_modifier_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(earliest|latest)=(\S+)").expect("valid time modifier regex"))
}

fn field_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Two-character operators come first in the alternation.
    RE.get_or_init(|| {
        Regex::new(r#"([A-Za-z0-9_.]+)\s*(!=|>=|<=|=|>|<)\s*("[^"]*"|'[^']*'|[^\s()]+)"#)
            .expect("valid field regex")
    })
}

fn token_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Parentheses are grouping punctuation, never part of a token
    RE.get_or_init(|| Regex::new(r#""[^"]*"|'[^']*'|[^\s()]+"#).expect("valid token regex"))
}

/// Parse an SPL query.
pub fn parse_spl(raw: &str) -> ParsedQuery {
    let mut query = ParsedQuery::default();

    // Segment 0 is the search, the rest are pipeline commands
    let segments = split_top_level(raw, '|', '[', ']');
    let mut search = segments[0].trim().to_string();

    let mut earliest = None;
    let mut latest = None;
    for caps in time_modifier_re().captures_iter(segments[0]) {
        let value = caps[2].to_string();
        if &caps[1] == "earliest" {
            earliest = Some(value);
        } else {
            latest = Some(value);
        }
    }
    search = time_modifier_re().replace_all(&search, " ").into_owned();
    query.time_range = TimeRange::new(earliest, latest);

    while let Some((start, end)) = find_enclosed(&search, '[', ']', 0) {
        query.subsearches.push(search[start + 1..end].trim().to_string());
        search.replace_range(start..=end, " ");
    }

    let groups = paren_spans(&search);
    for (offset, segment) in split_boolean(&search) {
        parse_segment(segment, offset, &groups, &mut query.terms);
    }

    for segment in &segments[1..] {
        parse_command(segment, &mut query);
    }

    query
}

/// Parse one conjunct segment, keeping terms in source order.
///
/// `offset` locates the segment in the search text; fielded terms starting
/// inside one of `groups` are marked as grouped.
fn parse_segment(segment: &str, offset: usize, groups: &[(usize, usize)], terms: &mut Vec<Term>) {
    let in_group = |pos: usize| {
        let pos = offset + pos;
        groups.iter().any(|(open, close)| *open < pos && pos < *close)
    };

    let mut found: Vec<(usize, Term)> = Vec::new();
    let mut masked = segment.to_string();

    for caps in field_re().captures_iter(segment) {
        let (Some(whole), Some(op)) = (caps.get(0), Operator::parse_relational(&caps[2])) else {
            continue;
        };
        let mut term = SearchTerm::new(&caps[1], op, unquote(&caps[3]));
        term.is_grouped = in_group(whole.start());
        found.push((whole.start(), Term::Field(term)));
        masked.replace_range(whole.range(), &" ".repeat(whole.len()));
    }

    for token in token_re().find_iter(&masked) {
        // Leftover keywords such as a leading `NOT` stay as free text
        let text = token.as_str();
        let quoted = text.starts_with('"') || text.starts_with('\'');
        let term = if !quoted && text.contains('*') {
            let mut glob = SearchTerm::wildcard(text);
            glob.is_grouped = in_group(token.start());
            Term::Field(glob)
        } else {
            Term::Text(unquote(text).to_string())
        };
        found.push((token.start(), term));
    }

    found.sort_by_key(|(pos, _)| *pos);
    terms.extend(found.into_iter().map(|(_, term)| term));
}

/// Turn one pipeline segment into a command (and maybe a lookup descriptor).
fn parse_command(segment: &str, query: &mut ParsedQuery) {
    let tokens: Vec<&str> = segment.split_whitespace().collect();
    let Some((&name, rest)) = tokens.split_first() else {
        return;
    };

    match name.to_uppercase().as_str() {
        "BY" => {
            let mut args = vec!["by".to_string()];
            args.extend(
                rest.iter()
                    .filter(|t| !t.eq_ignore_ascii_case("by"))
                    .map(|t| t.to_string()),
            );
            query.commands.push(Command::new(name, args));
        }
        "AS" => query.commands.push(alias_command(name, rest)),
        "LOOKUP" => {
            let split = rest
                .iter()
                .position(|t| t.eq_ignore_ascii_case("as"))
                .unwrap_or(rest.len());
            let args: Vec<String> = rest[..split].iter().map(|t| t.to_string()).collect();
            query.lookups.push(Lookup { args: args.clone() });
            query.commands.push(Command::new(name, args));
            if let Some((&alias, after)) = rest[split..].split_first() {
                query.commands.push(alias_command(alias, after));
            }
        }
        _ => {
            let args = rest.iter().map(|t| t.to_string()).collect();
            query.commands.push(Command::new(name, args));
        }
    }
}

/// `AS <alias>`: exactly one following token is captured.
fn alias_command(name: &str, rest: &[&str]) -> Command {
    let mut args = vec!["as".to_string()];
    if let Some(alias) = rest.first() {
        args.push(alias.to_string());
    }
    Command::new(name, args)
}
