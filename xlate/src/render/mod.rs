//! Target-language renderers.
//!
//! Each renderer turns a [`ParsedQuery`] into one language's surface syntax.
//! Renderers never fail: constructs with no equivalent in the target are
//! dropped or replaced by a visible note, depending on the language.

mod leql;
mod spl;
mod wql;

pub use leql::LeqlRenderer;
pub use spl::SplRenderer;
pub use wql::{WqlRenderer, COMMANDS_NOTE, GROUPING_NOTE};

use crate::ir::{ParsedQuery, Term};
use crate::Language;

/// Trait for target-language renderers
pub trait Renderer {
    /// Language this renderer emits
    fn language(&self) -> Language;

    /// Render the query as text in the target language
    fn render(&self, query: &ParsedQuery) -> String;
}

/// Renderer for `language`.
pub fn renderer_for(language: Language) -> &'static dyn Renderer {
    match language {
        Language::Spl => &SplRenderer,
        Language::Leql => &LeqlRenderer,
        Language::Wql => &WqlRenderer,
    }
}

/// Consecutive runs of terms sharing the same grouped marker.
fn group_runs(terms: &[Term]) -> impl Iterator<Item = (bool, &[Term])> {
    terms
        .chunk_by(|a, b| a.is_grouped() == b.is_grouped())
        .map(|run| (run[0].is_grouped(), run))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{Operator, SearchTerm};

    #[test]
    fn test_renderer_for_language() {
        for lang in Language::ALL {
            assert_eq!(renderer_for(lang).language(), lang);
        }
    }

    #[test]
    fn test_empty_query_renders_empty() {
        for lang in Language::ALL {
            assert_eq!(renderer_for(lang).render(&ParsedQuery::default()), "");
        }
    }

    #[test]
    fn test_group_runs() {
        let terms = vec![
            Term::field("a", Operator::Eq, "1"),
            Term::Field(SearchTerm::new("b", Operator::Eq, "2").grouped()),
            Term::Field(SearchTerm::new("c", Operator::Eq, "3").grouped()),
            Term::Text("d".into()),
        ];
        let runs: Vec<_> = group_runs(&terms).map(|(g, run)| (g, run.len())).collect();
        assert_eq!(runs, vec![(false, 1), (true, 2), (false, 1)]);
        assert_eq!(group_runs(&[]).count(), 0);
    }
}
