//! CLI command implementations.

use tracing::info;
use xlate::{parse, Config, Language, OutputFormat, Result, Translator};

/// Resolve the source language from a flag or the config default.
fn source_language(config: &Config, from: Option<&str>) -> Result<Language> {
    match from {
        Some(tag) => tag.parse(),
        None => Ok(config.default_source),
    }
}

/// Convert a query to one target, or fan out to every other language.
pub fn convert(
    config: &Config,
    query: &str,
    from: Option<&str>,
    to: Option<&str>,
    format: Option<&str>,
) -> Result<()> {
    let source = source_language(config, from)?;
    let format = match format {
        Some(f) => f.parse()?,
        None => config.format,
    };
    let translator = Translator::new();

    if let Some(target) = to {
        let target: Language = target.parse()?;
        let converted = translator.convert(query, source, target)?;
        match format {
            OutputFormat::Table => println!("{}", converted),
            OutputFormat::Json => {
                let single = [(target.name(), converted)]
                    .into_iter()
                    .collect::<std::collections::BTreeMap<_, _>>();
                println!("{}", serde_json::to_string_pretty(&single)?);
            }
        }
        return Ok(());
    }

    let results = translator.convert_to_all_languages(query, source.name())?;
    info!(source = %source, targets = results.len(), "converted query");

    match format {
        OutputFormat::Table => {
            for (language, text) in &results {
                println!("{:<5} {}", format!("{}:", language), text);
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&results)?),
    }
    Ok(())
}

/// Print the parsed intermediate representation.
pub fn parse_query(config: &Config, query: &str, from: Option<&str>) -> Result<()> {
    let source = source_language(config, from)?;
    let parsed = parse(source, query);
    println!("{}", serde_json::to_string_pretty(&parsed)?);
    Ok(())
}

/// List languages and registered conversion pairs.
pub fn languages() -> Result<()> {
    let translator = Translator::new();

    println!("Languages:");
    for language in Language::ALL {
        println!("  {}", language);
    }

    println!("Conversions:");
    for (from, to) in translator.pairs() {
        println!("  {} -> {}", from, to);
    }
    Ok(())
}

/// Print the effective configuration as TOML.
pub fn show_config(config: &Config) -> Result<()> {
    print!("{}", config.to_toml()?);
    Ok(())
}
