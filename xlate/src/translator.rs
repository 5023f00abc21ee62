//! Conversion dispatcher.
//!
//! A [`Translator`] owns the routing table from ordered (source, target)
//! language pairs to converter functions. The table is built once and only
//! read afterwards, so one translator can serve any number of callers.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use tracing::debug;

use crate::parse::{parse_leql, parse_spl, parse_wql};
use crate::render::{LeqlRenderer, Renderer, SplRenderer, WqlRenderer};
use crate::{Error, Language, Result};

/// Converts a raw query from one language to another.
pub type Converter = fn(&str) -> String;

fn spl_to_leql(query: &str) -> String {
    LeqlRenderer.render(&parse_spl(query))
}

fn spl_to_wql(query: &str) -> String {
    WqlRenderer.render(&parse_spl(query))
}

fn leql_to_spl(query: &str) -> String {
    SplRenderer.render(&parse_leql(query))
}

fn leql_to_wql(query: &str) -> String {
    WqlRenderer.render(&parse_leql(query))
}

fn wql_to_spl(query: &str) -> String {
    SplRenderer.render(&parse_wql(query))
}

fn wql_to_leql(query: &str) -> String {
    LeqlRenderer.render(&parse_wql(query))
}

/// Every converter this crate provides.
const CONVERTERS: [((Language, Language), Converter); 6] = [
    ((Language::Spl, Language::Leql), spl_to_leql),
    ((Language::Spl, Language::Wql), spl_to_wql),
    ((Language::Leql, Language::Spl), leql_to_spl),
    ((Language::Leql, Language::Wql), leql_to_wql),
    ((Language::Wql, Language::Spl), wql_to_spl),
    ((Language::Wql, Language::Leql), wql_to_leql),
];

/// Routing table plus the fan-out entry point.
#[derive(Clone)]
pub struct Translator {
    converters: HashMap<(Language, Language), Converter>,
}

impl fmt::Debug for Translator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Translator")
            .field("pairs", &self.pairs())
            .finish()
    }
}

impl Default for Translator {
    fn default() -> Self {
        Self::new()
    }
}

impl Translator {
    /// Translator with all six language pairs registered.
    pub fn new() -> Self {
        Self::from_pairs(CONVERTERS)
    }

    /// Translator with only the given pairs registered.
    pub fn from_pairs(pairs: impl IntoIterator<Item = ((Language, Language), Converter)>) -> Self {
        Self {
            converters: pairs.into_iter().collect(),
        }
    }

    /// Check whether a converter is registered for `from -> to`.
    pub fn supports(&self, from: Language, to: Language) -> bool {
        from == to || self.converters.contains_key(&(from, to))
    }

    /// Registered pairs, sorted.
    pub fn pairs(&self) -> Vec<(Language, Language)> {
        let mut pairs: Vec<_> = self.converters.keys().copied().collect();
        pairs.sort();
        pairs
    }

    /// Convert `query` from `from` to `to`.
    ///
    /// Identity conversion returns the input untouched. Fails only when no
    /// converter is registered for the pair.
    pub fn convert(&self, query: &str, from: Language, to: Language) -> Result<String> {
        if from == to {
            return Ok(query.to_string());
        }

        let converter = self
            .converters
            .get(&(from, to))
            .ok_or(Error::UnsupportedConversion { from, to })?;

        debug!(%from, %to, query, "converting query");
        let converted = converter(query);
        debug!(%from, %to, result = %converted, "conversion finished");
        Ok(converted)
    }

    /// Convert into every other language, keeping per-target outcomes apart.
    pub fn convert_all(&self, query: &str, from: Language) -> BTreeMap<Language, Result<String>> {
        from.others()
            .map(|to| (to, self.convert(query, from, to)))
            .collect()
    }

    /// Boundary form of [`Translator::convert_all`].
    ///
    /// An unknown `source_language` tag fails the whole call. A failed
    /// target is reported inline as `Error: <message>`, so one bad pair never
    /// hides the others.
    pub fn convert_to_all_languages(
        &self,
        query: &str,
        source_language: &str,
    ) -> Result<BTreeMap<String, String>> {
        let from: Language = source_language.parse()?;

        Ok(self
            .convert_all(query, from)
            .into_iter()
            .map(|(to, outcome)| {
                let text = outcome.unwrap_or_else(|e| {
                    debug!(%from, %to, error = %e, "conversion failed");
                    format!("Error: {}", e)
                });
                (to.name().to_string(), text)
            })
            .collect())
    }
}
