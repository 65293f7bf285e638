//! # Template Module
//!
//! RFC 6570 URI templates: parsing into [`Part`]s, expansion with
//! [`Value`]s, and nesting of one template under another.
//!
//! ## Overview
//!
//! - [`parser`] tokenizes a template string into literal and expression parts
//! - [`expand`] substitutes values honoring each operator's prefix,
//!   separator and encoding rules
//! - [`UriTemplate`] ties the two together and orders templates by
//!   specificity
//!
//! ## Example
//!
//! ```rust
//! use std::collections::HashMap;
//! use uritemplate::template::{UriTemplate, Value};
//!
//! let template = UriTemplate::new("/search{?q,limit}").unwrap();
//! let params = HashMap::from([
//!     ("q".to_string(), Value::from("a b")),
//!     ("limit".to_string(), Value::from(10)),
//! ]);
//! assert_eq!(template.expand(&params), "/search?q=a%20b&limit=10");
//! ```

mod core;
pub mod expand;
pub mod parser;

pub use self::core::{Precedence, UriTemplate};
pub use expand::{parameters_from, JsonObject, Properties, Value};
pub use parser::{concat, parse, parts_to_template, ExpressionType, Part, Variable};
