//! # CLI Module
//!
//! Command-line front end for expanding, matching and ordering URI
//! templates.
//!
//! ## Commands
//!
//! ### `expand`
//!
//! ```bash
//! uritemplate expand --template '/search{?q,tags}' --var q='a b' --list tags=x,y
//! # /search?q=a%20b&tags=x,y
//! ```
//!
//! Options:
//! - `--template <T>` - Template to expand (required)
//! - `--var <K=V>` - Scalar value, repeatable
//! - `--list <K=A,B>` - List value, repeatable
//! - `--json <OBJECT>` - JSON object whose members become parameters
//!
//! ### `match`
//!
//! ```bash
//! uritemplate match --template '/users/{id}' /users/42
//! # {"id":"42"}
//! ```
//!
//! Exits with status 1 when the URI does not match.
//!
//! ### `order`
//!
//! ```bash
//! uritemplate order '/{path}' '/users/{id}' /users/list
//! ```
//!
//! Prints the templates most specific first.

mod commands;

#[cfg(test)]
mod tests;

pub use commands::{
    expand_command, match_command, order_command, parse_key_value, run, run_cli, Cli, Commands,
};
