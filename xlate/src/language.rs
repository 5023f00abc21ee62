//! The closed set of query languages the translator understands.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A SIEM query language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Splunk search processing language
    Spl,
    /// Log entry query language
    Leql,
    /// Wazuh query language
    Wql,
}

impl Language {
    /// Every supported language, in declaration order.
    pub const ALL: [Language; 3] = [Language::Spl, Language::Leql, Language::Wql];

    /// Lower-case tag used at the boundary (`spl`, `leql`, `wql`).
    pub fn name(self) -> &'static str {
        match self {
            Language::Spl => "spl",
            Language::Leql => "leql",
            Language::Wql => "wql",
        }
    }

    /// Every language other than `self`.
    pub fn others(self) -> impl Iterator<Item = Language> {
        Self::ALL.into_iter().filter(move |l| *l != self)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Language {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "spl" => Ok(Language::Spl),
            "leql" => Ok(Language::Leql),
            "wql" => Ok(Language::Wql),
            _ => Err(Error::UnsupportedLanguage(s.to_string())),
        }
    }
}
