//! Source-language parsers.
//!
//! Every parser is total: input that matches none of a language's constructs
//! yields an empty [`ParsedQuery`] rather than an error.
//!
//! - **SPL**: `search terms | command args | ...`
//! - **LEQL**: `where(field ICONTAINS value) groupby(field)`
//! - **WQL**: `field<op>value;field~value;(grouped;clauses)`

mod leql;
mod spl;
mod wql;

pub use leql::parse_leql;
pub use spl::parse_spl;
pub use wql::parse_wql;

use crate::{Language, ParsedQuery};

/// Parse `raw` as a query written in `language`.
pub fn parse(language: Language, raw: &str) -> ParsedQuery {
    match language {
        Language::Spl => parse_spl(raw),
        Language::Leql => parse_leql(raw),
        Language::Wql => parse_wql(raw),
    }
}
