//! # uritemplate
//!
//! **uritemplate** parses [RFC 6570](https://www.rfc-editor.org/rfc/rfc6570) URI
//! templates, expands them with values, and matches request paths against
//! them to extract variables.
//!
//! ## Architecture
//!
//! The library is organized into several key modules:
//!
//! - **[`template`]** - Parsing, concatenation and expansion
//! - **[`matcher`]** - Compiling templates into match segments and matching paths
//! - **[`router`]** - Method-aware route table kept in precedence order
//! - **[`error`]** - The error type shared by parsing and compilation
//! - **[`logging`]** - `tracing` subscriber setup
//! - **[`runtime_config`]** - Environment based settings
//! - **[`cli`]** - The `uritemplate` command line tool
//!
//! ### Template Flow
//!
//! ```text
//! "/books/{id}{?max}"
//!        │ parse
//!        ▼
//! [Literal("/books/"), Expression(id), Expression(?max)]
//!        │                                 │
//!        │ expand(values)                  │ compile
//!        ▼                                 ▼
//! "/books/7?max=10"            [Literal("/books/"), Path(id)]
//!                                          │ match_uri("/books/7/")
//!                                          ▼
//!                                   UriMatchInfo { id = "7" }
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use std::collections::HashMap;
//! use uritemplate::{UriTemplate, UriTemplateMatcher, Value};
//!
//! let template = UriTemplate::new("/books/{id}{?max}").unwrap();
//! let params = HashMap::from([
//!     ("id".to_string(), Value::from(7)),
//!     ("max".to_string(), Value::from(10)),
//! ]);
//! assert_eq!(template.expand(&params), "/books/7?max=10");
//!
//! let matcher = UriTemplateMatcher::new("/books/{id}{?max}").unwrap();
//! let info = matcher.match_uri("/books/7?max=10").unwrap();
//! assert_eq!(info.get("id"), Some("7"));
//! ```
//!
//! ## Supported Operators
//!
//! | Operator | Example | Expansion of `x=1024,y=768` |
//! |---|---|---|
//! | none | `{x,y}` | `1024,768` |
//! | `+` | `{+x}` | `1024` (reserved characters kept) |
//! | `#` | `{#x,y}` | `#1024,768` |
//! | `.` | `{.x}` | `.1024` |
//! | `/` | `{/x,y}` | `/1024/768` |
//! | `;` | `{;x}` | `;x=1024` |
//! | `?` | `{?x,y}` | `?x=1024&y=768` |
//! | `&` | `{&x}` | `&x=1024` |
//!
//! Variables accept an explode flag (`{list*}`), a prefix length
//! (`{name:3}`) or, for matching, a regex pattern (`{id:[0-9]+}`).
//!
//! ## Concurrency
//!
//! Templates and matchers are immutable after construction and can be shared
//! across threads. Matchers memoize their variable-free match results.

pub mod cli;
pub mod error;
pub mod logging;
pub mod matcher;
pub mod router;
pub mod runtime_config;
pub mod template;

pub use error::{Result, UriTemplateError};
pub use matcher::{UriMatchInfo, UriMatchVariable, UriTemplateMatcher};
pub use router::{Route, RouteMatch, Router};
pub use template::{UriTemplate, Value};
