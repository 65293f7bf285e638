use smallvec::SmallVec;
use std::collections::HashMap;
use std::sync::Arc;

use crate::template::Variable;

/// Maximum number of captured variables before heap allocation.
/// Most routes have ≤4 path variables (e.g., /users/{id}/posts/{postId}).
pub const MAX_INLINE_PARAMS: usize = 8;

/// Captured variable values in capture order.
///
/// Names are `Arc<str>` shared with the compiled matcher, so building a
/// match only allocates the captured values.
pub type ParamVec = SmallVec<[(Arc<str>, String); MAX_INLINE_PARAMS]>;

/// Match-time view of a template variable.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UriMatchVariable {
    name: String,
    modifier: char,
    operator: char,
}

impl UriMatchVariable {
    /// Create a variable view.
    ///
    /// `modifier` is `*` for exploded variables, `:` for variables with a
    /// modifier and `'0'` otherwise; `operator` is the expression sigil or `'0'`.
    #[must_use]
    pub fn new(name: impl Into<String>, modifier: char, operator: char) -> Self {
        Self {
            name: name.into(),
            modifier,
            operator,
        }
    }

    pub(crate) fn from_variable(variable: &Variable, operator: char) -> Self {
        let modifier = if variable.explode {
            '*'
        } else if variable.modifier.is_some() {
            ':'
        } else {
            '0'
        };
        Self::new(variable.name.clone(), modifier, operator)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn modifier(&self) -> char {
        self.modifier
    }

    #[must_use]
    pub fn operator(&self) -> char {
        self.operator
    }

    /// `true` when the variable comes from a `?`, `#` or `&` expression.
    #[must_use]
    pub fn is_query(&self) -> bool {
        matches!(self.operator, '?' | '#' | '&')
    }

    /// `true` when the variable may be missing from a matching URI.
    #[must_use]
    pub fn is_optional(&self) -> bool {
        matches!(self.operator, '/' | '#' | '?' | '&')
    }

    #[must_use]
    pub fn is_exploded(&self) -> bool {
        self.modifier == '*'
    }
}

/// Result of successfully matching a URI against a template.
///
/// Holds the matched URI (trailing slash and query string removed), the
/// captured values and the template's variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UriMatchInfo {
    uri: String,
    values: ParamVec,
    variables: Arc<[UriMatchVariable]>,
}

impl UriMatchInfo {
    pub(crate) fn new(uri: String, values: ParamVec, variables: Arc<[UriMatchVariable]>) -> Self {
        Self {
            uri,
            values,
            variables,
        }
    }

    /// The matched URI.
    #[must_use]
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Get a captured value by variable name
    ///
    /// Uses "last write wins" semantics when a name is captured twice.
    #[inline]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    /// Captured values in capture order.
    #[must_use]
    pub fn values(&self) -> &ParamVec {
        &self.values
    }

    /// Convert captured values to a HashMap
    /// Note: This allocates - use get() in hot paths instead
    #[must_use]
    pub fn variable_values(&self) -> HashMap<String, String> {
        self.values
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    /// All variables declared by the matched template.
    #[must_use]
    pub fn variables(&self) -> &[UriMatchVariable] {
        &self.variables
    }

    #[must_use]
    pub fn variable_names(&self) -> Vec<&str> {
        self.variables.iter().map(UriMatchVariable::name).collect()
    }
}
