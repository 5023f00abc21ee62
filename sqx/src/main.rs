//! sqx: convert SIEM queries between SPL, LEQL and WQL.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use xlate::Config;

mod commands;

#[derive(Parser)]
#[command(name = "sqx")]
#[command(about = "SIEM query translator - convert between SPL, LEQL and WQL")]
#[command(version)]
struct Cli {
    /// Config file (default: $SQX_CONFIG or the platform config dir)
    #[arg(short = 'c', long = "config", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a query into one or all other languages
    #[command(visible_alias = "c")]
    Convert {
        /// Query text in the source language
        query: String,

        /// Source language: spl, leql, wql (default from config)
        #[arg(short = 'f', long = "from")]
        from: Option<String>,

        /// Target language (omit to convert into every other language)
        #[arg(short = 't', long = "to")]
        to: Option<String>,

        /// Output format: table, json (default from config)
        #[arg(long = "format")]
        format: Option<String>,
    },

    /// Show the parsed intermediate representation as JSON
    #[command(visible_alias = "p")]
    Parse {
        /// Query text in the source language
        query: String,

        /// Source language: spl, leql, wql (default from config)
        #[arg(short = 'f', long = "from")]
        from: Option<String>,
    },

    /// List supported languages and conversion pairs
    Languages,

    /// Print the effective configuration
    Config,
}

fn init_logging(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    init_logging(&config);

    let result = match cli.command {
        Commands::Convert { query, from, to, format } => {
            commands::convert(&config, &query, from.as_deref(), to.as_deref(), format.as_deref())
        }
        Commands::Parse { query, from } => commands::parse_query(&config, &query, from.as_deref()),
        Commands::Languages => commands::languages(),
        Commands::Config => commands::show_config(&config),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
