//! Clap argument definitions for the `sift` CLI.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};
use sift_sql::Placeholder;

/// Parse a placeholder style from a string.
fn parse_placeholder(s: &str) -> Result<Placeholder, String> {
    s.parse()
}

/// Top-level CLI options.
#[derive(Parser)]
#[command(name = "sift")]
#[command(about = "Compile search queries to tsquery and SQL")]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Log verbosity (-v for debug, -vv for trace); SIFT_LOG overrides
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Read this configuration file instead of discovering sift.toml
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Arguments for `sift parse`.
#[derive(Args, Debug, Clone)]
pub struct ParseCommand {
    /// Query to parse
    pub query: String,

    /// Also print the token stream
    #[arg(long)]
    pub tokens: bool,
}

/// Arguments for `sift tsquery`.
#[derive(Args, Debug, Clone)]
pub struct TsQueryCommand {
    /// Query to compile
    pub query: String,
}

/// Arguments for `sift sql`.
#[derive(Args, Debug, Clone)]
pub struct SqlCommand {
    /// Query to compile
    pub query: String,

    /// Entity to query [default: settings.default_entity]
    #[arg(short = 'e', long)]
    pub entity: Option<String>,

    /// Placeholder style: dollar ($1) or question (?) [default: settings.placeholder]
    #[arg(short = 'p', long, value_parser = parse_placeholder)]
    pub placeholder: Option<Placeholder>,

    /// Number placeholders after this many existing parameters
    #[arg(long, default_value = "0")]
    pub offset: usize,

    /// Print values inline instead of as bound parameters
    #[arg(long, conflicts_with = "json")]
    pub inline: bool,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `sift fields`.
#[derive(Args, Debug, Clone)]
pub struct FieldsCommand {
    /// Entity to describe [default: every entity]
    #[arg(short = 'e', long)]
    pub entity: Option<String>,
}

/// Arguments for `sift init`.
#[derive(Args, Debug, Clone)]
pub struct InitCommand {
    /// Create the global configuration file instead
    #[arg(long)]
    pub global: bool,

    /// Overwrite existing configuration file
    #[arg(long)]
    pub force: bool,
}

/// Supported `sift` subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Show how a query parses
    #[command(after_help = "\
QUERY SYNTAX:
  word              Word must match
  word1 word2       Both words (implicit AND)
  \"a phrase\"        Consecutive words
  prefix*           Any word starting with prefix
  -term             Term must NOT match
  a | b             Either side
  (expr)            Grouping
  field:value       Match one field
  field:(a|b*)      Field matches any of the values

EXAMPLES:
  sift parse 'status:(active|terminated) -tag:test \"core link\"'
  sift parse --tokens 'name:jo*'")]
    Parse(ParseCommand),

    /// Compile a query to a PostgreSQL tsquery expression
    #[command(name = "tsquery")]
    TsQuery(TsQueryCommand),

    /// Compile a query to SQL over a configured entity
    #[command(after_help = "\
EXAMPLES:
  sift sql 'status:active'
  sift sql -e people 'name:jo* -(role:admin | role:owner)'
  sift sql --json 'status:(active|terminated)'
  sift sql --placeholder question --offset 2 'status:active'")]
    Sql(SqlCommand),

    /// List the searchable fields of configured entities
    Fields(FieldsCommand),

    /// Validate configuration and diagnose issues
    Check,

    /// Initialize sift configuration in current directory
    Init(InitCommand),
}

impl Commands {
    /// Whether the command reads the configuration.
    pub fn needs_config(&self) -> bool {
        matches!(self, Self::Sql(_) | Self::Fields(_) | Self::Check)
    }
}
