use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::collections::HashMap;
use std::process::ExitCode;

use crate::logging::{init_logging_with_config, LogConfig};
use crate::matcher::UriTemplateMatcher;
use crate::template::{UriTemplate, Value};

/// Command-line interface for URI templates
#[derive(Parser, Debug)]
#[command(name = "uritemplate")]
#[command(about = "Expand, match and order RFC 6570 URI templates", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Log level: trace/debug/info/warn/error
    #[arg(long, global = true, env = "URITEMPLATE_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Expand a template with the given values
    Expand {
        /// Template to expand
        #[arg(short, long)]
        template: String,

        /// Scalar value as KEY=VALUE (repeatable)
        #[arg(long = "var", value_parser = parse_key_value)]
        vars: Vec<(String, String)>,

        /// List value as KEY=A,B,C (repeatable)
        #[arg(long = "list", value_parser = parse_key_value)]
        lists: Vec<(String, String)>,

        /// JSON object whose members become parameters
        #[arg(long)]
        json: Option<String>,
    },
    /// Match a URI against a template and print the captured variables
    Match {
        /// Template to match against
        #[arg(short, long)]
        template: String,

        /// URI to match
        uri: String,
    },
    /// Print templates most specific first
    Order {
        /// Templates to order
        #[arg(required = true, num_args = 1..)]
        templates: Vec<String>,
    },
}

/// Split `KEY=VALUE` at the first `=`.
///
/// # Errors
///
/// Returns a message when there is no `=` or the key is empty.
pub fn parse_key_value(s: &str) -> std::result::Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got '{s}'")),
    }
}

/// Expand `template`. JSON members are applied first, then lists, then
/// scalar values, later ones overriding earlier ones with the same name.
///
/// # Errors
///
/// Fails on a malformed template, invalid JSON, or JSON that is not an
/// object.
pub fn expand_command(
    template: &str,
    vars: &[(String, String)],
    lists: &[(String, String)],
    json: Option<&str>,
) -> Result<String> {
    let template =
        UriTemplate::new(template).with_context(|| format!("Invalid template: {template}"))?;

    let mut params: HashMap<String, Value> = HashMap::new();
    if let Some(json) = json {
        let value: serde_json::Value =
            serde_json::from_str(json).context("Failed to parse --json")?;
        let serde_json::Value::Object(members) = value else {
            bail!("--json must be a JSON object");
        };
        params.extend(members.into_iter().map(|(k, v)| (k, Value::from(v))));
    }
    for (key, items) in lists {
        let items: Vec<String> = items.split(',').map(str::to_string).collect();
        params.insert(key.clone(), Value::List(items));
    }
    for (key, value) in vars {
        params.insert(key.clone(), Value::from(value));
    }

    Ok(template.expand(&params))
}

/// Match `uri` against `template`. Returns the captured variables as a JSON
/// object, or `None` on a miss.
///
/// # Errors
///
/// Fails on a malformed template.
pub fn match_command(template: &str, uri: &str) -> Result<Option<String>> {
    let matcher = UriTemplateMatcher::new(template)
        .with_context(|| format!("Invalid template: {template}"))?;
    let Some(info) = matcher.match_uri(uri) else {
        return Ok(None);
    };
    let mut captured = serde_json::Map::new();
    for (name, value) in info.values() {
        captured.insert(name.to_string(), serde_json::Value::String(value.clone()));
    }
    let json = serde_json::to_string(&captured).context("Failed to serialize match")?;
    Ok(Some(json))
}

/// Sort templates most specific first.
///
/// # Errors
///
/// Fails on the first malformed template.
pub fn order_command(templates: &[String]) -> Result<Vec<String>> {
    let mut matchers = templates
        .iter()
        .map(|t| UriTemplateMatcher::new(t).with_context(|| format!("Invalid template: {t}")))
        .collect::<Result<Vec<_>>>()?;
    matchers.sort();
    Ok(matchers
        .iter()
        .map(|m| m.template().to_string())
        .collect())
}

/// Execute a parsed command line.
///
/// # Errors
///
/// Propagates logging setup and command failures.
pub fn run(cli: Cli) -> Result<ExitCode> {
    let mut log_config = LogConfig::from_env();
    if let Some(level) = cli.log_level {
        log_config.log_level = level;
    }
    init_logging_with_config(&log_config)?;

    match cli.command {
        Commands::Expand {
            template,
            vars,
            lists,
            json,
        } => {
            println!("{}", expand_command(&template, &vars, &lists, json.as_deref())?);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Match { template, uri } => match match_command(&template, &uri)? {
            Some(json) => {
                println!("{json}");
                Ok(ExitCode::SUCCESS)
            }
            None => {
                eprintln!("{uri} does not match {template}");
                Ok(ExitCode::FAILURE)
            }
        },
        Commands::Order { templates } => {
            for template in order_command(&templates)? {
                println!("{template}");
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Parse the process arguments and run.
///
/// # Errors
///
/// See [`run`].
pub fn run_cli() -> Result<ExitCode> {
    run(Cli::parse())
}
