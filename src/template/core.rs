use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::Serialize;

use super::expand::{expand, parameters_from, Value};
use super::parser::{concat, parse, parts_to_template, ExpressionType, Part};
use crate::error::{Result, UriTemplateError};

/// Precedence inputs of a template: literal character count and number of
/// non-query variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Precedence {
    /// Characters in literal parts
    pub raw_length: usize,
    /// Variables outside `?` and `&` expressions
    pub variable_count: usize,
}

impl Precedence {
    /// Compute precedence for parsed parts.
    #[must_use]
    pub fn of(parts: &[Part]) -> Self {
        parts.iter().fold(Self::default(), |mut acc, part| {
            match part {
                Part::Literal(text) => acc.raw_length += text.chars().count(),
                Part::Expression { kind, variables } if !kind.is_query_part() => {
                    acc.variable_count += variables.len();
                }
                Part::Expression { .. } => {}
            }
            acc
        })
    }
}

impl PartialOrd for Precedence {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// More literal text sorts first; among equals, fewer variables sorts first.
impl Ord for Precedence {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .raw_length
            .cmp(&self.raw_length)
            .then_with(|| self.variable_count.cmp(&other.variable_count))
    }
}

/// A parsed URI template that can be expanded and nested.
///
/// ```
/// use std::collections::HashMap;
/// use uritemplate::{UriTemplate, Value};
///
/// let template = UriTemplate::new("/hello{/world}").unwrap();
/// let mut params = HashMap::new();
/// params.insert("world".to_string(), Value::from("Earth"));
/// assert_eq!(template.expand(&params), "/hello/Earth");
/// ```
#[derive(Debug, Clone)]
pub struct UriTemplate {
    template: String,
    parts: Vec<Part>,
    precedence: Precedence,
}

impl UriTemplate {
    /// Parse a template string.
    ///
    /// # Errors
    ///
    /// Returns the parse error for malformed templates.
    pub fn new(template: &str) -> Result<Self> {
        let parts = parse(template)?;
        Ok(Self {
            template: template.to_string(),
            precedence: Precedence::of(&parts),
            parts,
        })
    }

    /// Build a template from already parsed parts.
    #[must_use]
    pub fn from_parts(parts: Vec<Part>) -> Self {
        Self {
            template: parts_to_template(&parts),
            precedence: Precedence::of(&parts),
            parts,
        }
    }

    /// The template string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.template
    }

    /// Parsed parts in template order.
    #[must_use]
    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    #[must_use]
    pub fn precedence(&self) -> Precedence {
        self.precedence
    }

    /// Expand the template with the given parameters.
    #[must_use]
    pub fn expand(&self, parameters: &HashMap<String, Value>) -> String {
        expand(&self.parts, parameters)
    }

    /// Expand using the fields of a serializable struct as parameters.
    ///
    /// # Errors
    ///
    /// Fails when `object` does not serialize to a JSON object.
    pub fn expand_object<T: Serialize + ?Sized>(&self, object: &T) -> Result<String> {
        Ok(self.expand(&parameters_from(object)?))
    }

    /// Nest another template under this one, e.g. a method route under its
    /// controller route.
    ///
    /// # Errors
    ///
    /// Returns the parse error of `other`.
    pub fn nest(&self, other: &str) -> Result<Self> {
        Ok(Self::from_parts(concat(&self.parts, &parse(other)?)))
    }

    /// The template without its query and fragment expressions.
    #[must_use]
    pub fn to_path_string(&self) -> String {
        self.parts
            .iter()
            .filter(|part| {
                !matches!(
                    part.expression_type(),
                    Some(kind) if kind.is_query_part() || kind == ExpressionType::FragmentExpansion
                )
            })
            .map(ToString::to_string)
            .collect()
    }
}

impl FromStr for UriTemplate {
    type Err = UriTemplateError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl fmt::Display for UriTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.template)
    }
}

impl PartialEq for UriTemplate {
    fn eq(&self, other: &Self) -> bool {
        self.template == other.template
    }
}

impl Eq for UriTemplate {}

impl Hash for UriTemplate {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.template.hash(state);
    }
}

impl PartialOrd for UriTemplate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for UriTemplate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.precedence
            .cmp(&other.precedence)
            .then_with(|| self.template.cmp(&other.template))
    }
}
