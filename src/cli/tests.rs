//! Unit tests for CLI commands

use crate::cli::{Cli, Commands};
use clap::Parser;

#[test]
fn test_expand_command_parses_repeated_values() {
    let cli = Cli::try_parse_from([
        "uritemplate",
        "expand",
        "--template",
        "/search{?q,tags}",
        "--var",
        "q=a b",
        "--list",
        "tags=x,y",
    ])
    .unwrap();

    match cli.command {
        Commands::Expand {
            template,
            vars,
            lists,
            json,
        } => {
            assert_eq!(template, "/search{?q,tags}");
            assert_eq!(vars, vec![("q".to_string(), "a b".to_string())]);
            assert_eq!(lists, vec![("tags".to_string(), "x,y".to_string())]);
            assert!(json.is_none());
        }
        _ => panic!("Expected Expand command"),
    }
}

#[test]
fn test_global_log_level() {
    let cli = Cli::try_parse_from([
        "uritemplate",
        "match",
        "--template",
        "/a/{b}",
        "/a/1",
        "--log-level",
        "debug",
    ])
    .unwrap();
    assert_eq!(cli.log_level.as_deref(), Some("debug"));
    assert!(matches!(cli.command, Commands::Match { .. }));
}

#[test]
fn test_order_requires_templates() {
    assert!(Cli::try_parse_from(["uritemplate", "order"]).is_err());
}

#[test]
fn test_invalid_key_value_is_rejected() {
    assert!(Cli::try_parse_from(["uritemplate", "expand", "-t", "/a", "--var", "novalue"]).is_err());
    assert!(Cli::try_parse_from(["uritemplate", "expand", "-t", "/a", "--var", "=v"]).is_err());
}
