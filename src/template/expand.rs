//! Template expansion.
//!
//! [`expand`] walks parsed parts once, substituting [`Value`]s and applying
//! the per-operator prefix, separator and encoding rules. Query (`?`/`&`)
//! and fragment (`#`) sigils are tracked across the whole pass rather than
//! per expression, so `{?a}{&b}` and `{&b}` alone both start with `?`.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use super::parser::{ExpressionType, Part, Variable};
use crate::error::Result;

/// Object-to-properties extractor used when an exploded variable holds an
/// [`Value::Object`].
///
/// A non-exploded object expands through its `Display` implementation.
pub trait Properties: fmt::Display + fmt::Debug + Send + Sync {
    /// Ordered key/value pairs of the object.
    fn properties(&self) -> Vec<(String, String)>;
}

/// A JSON object produced by [`Value::serialize`].
#[derive(Debug, Clone)]
pub struct JsonObject(pub serde_json::Map<String, serde_json::Value>);

impl Properties for JsonObject {
    fn properties(&self) -> Vec<(String, String)> {
        self.0
            .iter()
            .filter_map(|(k, v)| json_scalar(v).map(|v| (k.clone(), v)))
            .collect()
    }
}

impl fmt::Display for JsonObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = serde_json::to_string(&self.0).map_err(|_| fmt::Error)?;
        f.write_str(&rendered)
    }
}

/// A value bound to a template variable.
#[derive(Debug, Clone)]
pub enum Value {
    /// Skipped entirely, including delimiters
    Absent,
    /// A single string
    Scalar(String),
    /// An ordered collection
    List(Vec<String>),
    /// Ordered key/value pairs
    Map(Vec<(String, String)>),
    /// An object exploded through its [`Properties`]
    Object(Arc<dyn Properties>),
}

impl Value {
    /// Build a map value from ordered pairs.
    pub fn map<K, V, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: ToString,
        V: ToString,
    {
        Value::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    /// Wrap a custom [`Properties`] implementation.
    pub fn object<P: Properties + 'static>(object: P) -> Self {
        Value::Object(Arc::new(object))
    }

    /// Convert any serializable value.
    ///
    /// `null` becomes [`Value::Absent`], arrays become lists and objects
    /// become [`Value::Object`] backed by [`JsonObject`].
    ///
    /// # Errors
    ///
    /// Returns [`crate::UriTemplateError::Serialization`] when `value` fails to serialize.
    pub fn serialize<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        Ok(Value::from(serde_json::to_value(value)?))
    }

    /// `true` for [`Value::Absent`].
    #[must_use]
    pub fn is_absent(&self) -> bool {
        matches!(self, Value::Absent)
    }
}

fn json_scalar(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Absent,
            serde_json::Value::Array(items) => {
                Value::List(items.iter().filter_map(json_scalar).collect())
            }
            serde_json::Value::Object(map) => Value::object(JsonObject(map)),
            other => json_scalar(&other).map_or(Value::Absent, Value::Scalar),
        }
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Scalar(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Scalar(v)
    }
}

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Value::Scalar(v.clone())
    }
}

macro_rules! scalar_from {
    ($($t:ty),*) => {
        $(impl From<$t> for Value {
            fn from(v: $t) -> Self {
                Value::Scalar(v.to_string())
            }
        })*
    };
}

scalar_from!(bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Absent, Into::into)
    }
}

impl<T: ToString> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::List(v.iter().map(ToString::to_string).collect())
    }
}

impl<T: ToString> From<&[T]> for Value {
    fn from(v: &[T]) -> Self {
        Value::List(v.iter().map(ToString::to_string).collect())
    }
}

impl<T: ToString, const N: usize> From<[T; N]> for Value {
    fn from(v: [T; N]) -> Self {
        Value::List(v.iter().map(ToString::to_string).collect())
    }
}

impl<K: ToString, V: ToString> From<BTreeMap<K, V>> for Value {
    fn from(v: BTreeMap<K, V>) -> Self {
        Value::map(v)
    }
}

/// Turn a serializable struct into expansion parameters, one per field.
///
/// # Errors
///
/// Fails when `value` cannot be serialized or does not serialize to an object.
pub fn parameters_from<T: Serialize + ?Sized>(value: &T) -> Result<HashMap<String, Value>> {
    match serde_json::to_value(value)? {
        serde_json::Value::Object(map) => Ok(map
            .into_iter()
            .map(|(k, v)| (k, Value::from(v)))
            .collect()),
        _ => Err(<serde_json::Error as serde::de::Error>::custom(
            "template parameters must serialize to an object",
        )
        .into()),
    }
}

#[derive(Default)]
struct ExpansionState {
    query_started: bool,
    fragment_started: bool,
}

/// Expand parsed parts with the given parameters.
#[must_use]
pub fn expand(parts: &[Part], parameters: &HashMap<String, Value>) -> String {
    let mut state = ExpansionState::default();
    let mut out = String::new();
    for part in parts {
        match part {
            Part::Literal(text) => {
                out.push_str(text);
                if text.contains('?') {
                    state.query_started = true;
                }
            }
            Part::Expression { kind, variables } => {
                expand_expression(*kind, variables, parameters, &mut state, &mut out);
            }
        }
    }
    out
}

fn expand_expression(
    kind: ExpressionType,
    variables: &[Variable],
    parameters: &HashMap<String, Value>,
    state: &mut ExpansionState,
    out: &mut String,
) {
    let mut first = true;
    for variable in variables {
        let Some(value) = parameters.get(&variable.name) else {
            continue;
        };
        let Some(expanded) = expand_variable(kind, variable, value) else {
            continue;
        };
        match kind {
            ExpressionType::None | ExpressionType::ReservedExpansion => {
                if !first {
                    out.push(',');
                }
            }
            ExpressionType::FragmentExpansion => {
                out.push(if state.fragment_started { ',' } else { '#' });
                state.fragment_started = true;
            }
            ExpressionType::LabelExpansion
            | ExpressionType::PathSegmentExpansion
            | ExpressionType::PathStyleParameterExpansion => out.push(kind.operator()),
            ExpressionType::FormStyleParameterExpansion
            | ExpressionType::FormStyleQueryContinuation => {
                out.push(if state.query_started { '&' } else { '?' });
                state.query_started = true;
            }
        }
        out.push_str(&expanded);
        first = false;
    }
}

fn expand_variable(kind: ExpressionType, variable: &Variable, value: &Value) -> Option<String> {
    match value {
        Value::Absent => None,
        Value::Scalar(s) => Some(expand_scalar(kind, variable, s)),
        Value::List(items) if items.is_empty() => None,
        Value::List(items) => Some(expand_list(kind, variable, items)),
        Value::Map(entries) if entries.is_empty() => None,
        Value::Map(entries) => Some(expand_map(kind, variable, entries)),
        Value::Object(object) if variable.explode => {
            let entries = object.properties();
            if entries.is_empty() {
                None
            } else {
                Some(expand_map(kind, variable, &entries))
            }
        }
        Value::Object(object) => Some(expand_scalar(kind, variable, &object.to_string())),
    }
}

fn expand_scalar(kind: ExpressionType, variable: &Variable, value: &str) -> String {
    let value = match variable.max_length() {
        Some(max) => truncate(value, max),
        None => value,
    };
    let encoded = encode_value(kind, value);
    if kind.is_named() {
        named(kind, &variable.name, &encoded)
    } else {
        encoded
    }
}

fn expand_list(kind: ExpressionType, variable: &Variable, items: &[String]) -> String {
    let encoded = items.iter().map(|item| encode_value(kind, item));
    if variable.explode {
        let tokens: Vec<String> = if kind.is_named() {
            encoded.map(|item| named(kind, &variable.name, &item)).collect()
        } else {
            encoded.collect()
        };
        join(&tokens, kind.separator())
    } else {
        let joined = join(&encoded.collect::<Vec<_>>(), kind.delimiter());
        if kind.is_named() {
            named(kind, &variable.name, &joined)
        } else {
            joined
        }
    }
}

fn expand_map(kind: ExpressionType, variable: &Variable, entries: &[(String, String)]) -> String {
    let encoded = entries
        .iter()
        .map(|(k, v)| (encode_value(kind, k), encode_value(kind, v)));
    if variable.explode {
        let tokens: Vec<String> = encoded.map(|(k, v)| named(kind, &k, &v)).collect();
        join(&tokens, kind.separator())
    } else {
        let flattened: Vec<String> = encoded.flat_map(|(k, v)| [k, v]).collect();
        let joined = join(&flattened, kind.delimiter());
        if kind.is_named() {
            named(kind, &variable.name, &joined)
        } else {
            joined
        }
    }
}

/// `name=value`, or bare `name` for an empty path-style parameter.
fn named(kind: ExpressionType, name: &str, value: &str) -> String {
    if value.is_empty() && kind == ExpressionType::PathStyleParameterExpansion {
        name.to_string()
    } else {
        format!("{name}={value}")
    }
}

fn join(tokens: &[String], separator: char) -> String {
    let mut buf = [0u8; 4];
    tokens.join(separator.encode_utf8(&mut buf))
}

fn truncate(value: &str, max: usize) -> &str {
    match value.char_indices().nth(max) {
        Some((idx, _)) => &value[..idx],
        None => value,
    }
}

fn encode_value(kind: ExpressionType, value: &str) -> String {
    if kind.encode() {
        encode(value)
    } else {
        escape(value)
    }
}

/// Form-style percent-encoding: ASCII alphanumerics and `- _ . *` pass
/// through, a space becomes `%20` and everything else is `%XX`.
#[must_use]
pub fn encode(value: &str) -> String {
    let encoded = urlencoding::encode(value);
    if !value.contains(['*', '~']) {
        return encoded.into_owned();
    }
    // `%` itself is encoded as `%25`, so `%2A` can only come from `*`.
    encoded.replace("%2A", "*").replace('~', "%7E")
}

/// Escape only `%` and whitespace, leaving reserved characters intact.
#[must_use]
pub fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '%' => out.push_str("%25"),
            c if c.is_whitespace() => out.push_str("%20"),
            c => out.push(c),
        }
    }
    out
}
