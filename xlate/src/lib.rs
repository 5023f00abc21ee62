//! SIEM query translation between SPL, LEQL and WQL.
//!
//! Queries are parsed into a language-neutral [`ParsedQuery`] and rendered
//! into each target language. [`Translator`] routes (source, target) pairs
//! to converters and fans one query out to every other language.

pub mod config;
pub mod error;
pub mod ir;
pub mod language;
pub mod parse;
pub mod render;
pub mod scan;
pub mod translator;

pub use config::{Config, OutputFormat};
pub use error::{Error, Result};
pub use ir::{Command, CommandKind, Lookup, Operator, ParsedQuery, SearchTerm, Term, TimeRange};
pub use language::Language;
pub use parse::{parse, parse_leql, parse_spl, parse_wql};
pub use render::{renderer_for, LeqlRenderer, Renderer, SplRenderer, WqlRenderer};
pub use translator::{Converter, Translator};
