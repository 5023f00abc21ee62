//! Text scanning helpers shared by the parsers.
//!
//! Delimiter scans here are single-level: an opener starts a region and the
//! FIRST matching closer ends it. Nested openers are not counted, so
//! `where(a(b)c)` yields the region `a(b`. Callers rely on that behavior.

/// Find the first `open ... close` region starting at or after byte `from`.
///
/// Returns the byte offsets of the opening and closing delimiters. The closer
/// is the first `close` after the opener; nesting is not tracked.
pub fn find_enclosed(input: &str, open: char, close: char, from: usize) -> Option<(usize, usize)> {
    let start = from + input.get(from..)?.find(open)?;
    let inner = start + open.len_utf8();
    let end = inner + input[inner..].find(close)?;
    Some((start, end))
}

/// Split on `sep`, ignoring separators inside one level of `open ... close`
/// and inside double-quoted strings.
///
/// An unclosed opener or quote swallows the rest of the input into the final piece.
pub fn split_top_level(input: &str, sep: char, open: char, close: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut inside = false;
    let mut quoted = false;
    let mut last = 0;

    for (i, c) in input.char_indices() {
        if c == '"' {
            quoted = !quoted;
        } else if quoted {
            // separators and delimiters inside a string are plain text
        } else if inside {
            if c == close {
                inside = false;
            }
        } else if c == open {
            inside = true;
        } else if c == sep {
            parts.push(&input[last..i]);
            last = i + c.len_utf8();
        }
    }
    parts.push(&input[last..]);
    parts
}

/// Flatten a boolean search expression into its conjunct segments.
///
/// Splits on the literal `" OR "`, then each piece on `" AND "`. There is no
/// precedence and no tree: `a OR b AND c` becomes `[a, b, c]`, and a quoted
/// value containing `" OR "` is split too. Renderers only ever see the flat
/// segment list, so a precedence-aware splitter can replace this function
/// without touching them.
///
/// Each segment is trimmed and returned with its byte offset in `input`.
pub fn split_boolean(input: &str) -> Vec<(usize, &str)> {
    let mut segments = Vec::new();
    for (or_start, or_part) in split_with_offsets(input, " OR ") {
        for (and_start, and_part) in split_with_offsets(or_part, " AND ") {
            let trimmed = and_part.trim_start();
            let lead = and_part.len() - trimmed.len();
            let trimmed = trimmed.trim_end();
            if !trimmed.is_empty() {
                segments.push((or_start + and_start + lead, trimmed));
            }
        }
    }
    segments
}

fn split_with_offsets<'a>(input: &'a str, sep: &str) -> Vec<(usize, &'a str)> {
    let mut pieces = Vec::new();
    let mut start = 0;
    for (i, _) in input.match_indices(sep) {
        pieces.push((start, &input[start..i]));
        start = i + sep.len();
    }
    pieces.push((start, &input[start..]));
    pieces
}

/// Every top-level `(...)` region, as (open, close) byte offsets.
pub fn paren_spans(input: &str) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut from = 0;
    while let Some((open, close)) = find_enclosed(input, '(', ')', from) {
        spans.push((open, close));
        from = close + 1;
    }
    spans
}

/// Strip one pair of matching surrounding quotes (`"` or `'`).
pub fn unquote(s: &str) -> &str {
    let s = s.trim();
    for q in ['"', '\''] {
        if s.len() >= 2 && s.starts_with(q) && s.ends_with(q) {
            return &s[1..s.len() - 1];
        }
    }
    s
}
