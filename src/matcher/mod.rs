//! # Matcher Module
//!
//! Compiles URI templates into match segments and matches request paths
//! against them.
//!
//! ## Architecture
//!
//! The matcher uses a two-phase approach:
//!
//! 1. **Compilation**: At registration, a template such as `/users/{id}` is
//!    compiled into an ordered list of segments. Plain literals and single
//!    `{name}` captures followed by `/` are matched by scanning; the first
//!    expression that needs more (a modifier, an operator, several
//!    variables) switches the rest of the template to one anchored regex.
//!
//! 2. **Matching**: For each request path, the segments are walked left to
//!    right, capturing variable values into a [`UriMatchInfo`].
//!
//! ## Example
//!
//! ```rust
//! use uritemplate::matcher::UriTemplateMatcher;
//!
//! let matcher = UriTemplateMatcher::new("/users/{id}/posts").unwrap();
//! let info = matcher.match_uri("/users/42/posts/").unwrap();
//! assert_eq!(info.get("id"), Some("42"));
//! ```
//!
//! ## Precedence
//!
//! Matchers implement `Ord` so a route table can try the most specific
//! template first: more literal characters win, then fewer variables.

mod compile;
mod core;
mod info;

pub use self::core::UriTemplateMatcher;
pub use info::{ParamVec, UriMatchInfo, UriMatchVariable, MAX_INLINE_PARAMS};
