//! Matcher core module - hot path for URI matching.
//!
//! Matching runs once per candidate route per request, so the segment walk
//! works on string slices and only allocates the captured values.

#![deny(clippy::inefficient_to_string)]
#![deny(clippy::format_push_string)]
#![deny(clippy::unnecessary_to_owned)]

use once_cell::sync::OnceCell;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::sync::Arc;

use super::compile::{compile, Segment};
use super::info::{ParamVec, UriMatchInfo, UriMatchVariable};
use crate::error::{Result, UriTemplateError};
use crate::template::{concat, parse, parts_to_template, ExpressionType, Part, Precedence};

/// A URI template compiled for matching request paths.
///
/// Built once at route registration, then shared read-only between request
/// threads. The root and exact-match results carry no per-call state and are
/// memoized on first use.
///
/// ```
/// use uritemplate::UriTemplateMatcher;
///
/// let matcher = UriTemplateMatcher::new("/items/{id:[0-9]+}").unwrap();
/// let info = matcher.match_uri("/items/42").unwrap();
/// assert_eq!(info.get("id"), Some("42"));
/// assert!(matcher.match_uri("/items/abc").is_none());
/// ```
#[derive(Debug, Clone)]
pub struct UriTemplateMatcher {
    template: String,
    /// Template with a trailing slash removed, compared against templates
    /// without variables
    exact: String,
    parts: Vec<Part>,
    pub(crate) segments: Vec<Segment>,
    variables: Arc<[UriMatchVariable]>,
    is_root: bool,
    precedence: Precedence,
    root_match: OnceCell<Arc<UriMatchInfo>>,
    exact_match: OnceCell<Arc<UriMatchInfo>>,
}

impl UriTemplateMatcher {
    /// Parse and compile a template.
    ///
    /// # Errors
    ///
    /// Returns the parse error for malformed templates and
    /// [`UriTemplateError::InvalidPattern`] when a modifier is not a valid
    /// regex fragment.
    pub fn new(template: &str) -> Result<Self> {
        let parts = parse(template)?;
        Self::from_parts(template.to_string(), parts)
    }

    fn from_parts(template: String, parts: Vec<Part>) -> Result<Self> {
        let compiled = compile(&template, &parts)?;
        Ok(Self {
            exact: strip_trailing_slash(&template).to_string(),
            precedence: Precedence::of(&parts),
            template,
            parts,
            segments: compiled.segments,
            variables: compiled.variables.into(),
            is_root: compiled.is_root,
            root_match: OnceCell::new(),
            exact_match: OnceCell::new(),
        })
    }

    /// Nest another template under this one.
    ///
    /// ```
    /// use uritemplate::UriTemplateMatcher;
    ///
    /// let api = UriTemplateMatcher::new("/api").unwrap();
    /// let nested = api.nest("/{id}").unwrap();
    /// assert_eq!(nested.match_uri("/api/5").unwrap().get("id"), Some("5"));
    /// ```
    ///
    /// # Errors
    ///
    /// Returns the parse or compile error of the combined template.
    pub fn nest(&self, other: &str) -> Result<Self> {
        let parts = concat(&self.parts, &parse(other)?);
        Self::from_parts(parts_to_template(&parts), parts)
    }

    /// The template string.
    #[must_use]
    pub fn template(&self) -> &str {
        &self.template
    }

    #[must_use]
    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    /// Variables of every expression, in template order.
    #[must_use]
    pub fn variables(&self) -> &[UriMatchVariable] {
        &self.variables
    }

    #[must_use]
    pub fn variable_names(&self) -> Vec<&str> {
        self.variables.iter().map(UriMatchVariable::name).collect()
    }

    /// `true` when the template matches only `/` (or the empty path).
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.is_root
    }

    #[must_use]
    pub fn precedence(&self) -> Precedence {
        self.precedence
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

    /// `true` when `uri` matches.
    #[must_use]
    pub fn matches(&self, uri: &str) -> bool {
        self.match_uri(uri).is_some()
    }

    /// Match a request path against the template.
    ///
    /// One trailing slash and any query string are ignored. Returns `None`
    /// when the path does not match; that is the expected outcome for most
    /// routes tried against a request.
    #[must_use]
    pub fn match_uri(&self, uri: &str) -> Option<Arc<UriMatchInfo>> {
        let uri = strip_trailing_slash(uri);
        if self.is_root && (uri.is_empty() || uri == "/") {
            return Some(Arc::clone(self.root_match.get_or_init(|| {
                Arc::new(UriMatchInfo::new(
                    "/".to_string(),
                    ParamVec::new(),
                    Arc::clone(&self.variables),
                ))
            })));
        }

        let uri = match uri.find('?') {
            Some(idx) => strip_trailing_slash(&uri[..idx]),
            None => uri,
        };

        if self.variables.is_empty() {
            if uri != self.exact {
                return None;
            }
            return Some(Arc::clone(self.exact_match.get_or_init(|| {
                Arc::new(UriMatchInfo::new(
                    self.exact.clone(),
                    ParamVec::new(),
                    Arc::clone(&self.variables),
                ))
            })));
        }

        let values = self.walk(uri)?;
        Some(Arc::new(UriMatchInfo::new(
            uri.to_string(),
            values,
            Arc::clone(&self.variables),
        )))
    }

    fn walk(&self, uri: &str) -> Option<ParamVec> {
        let mut values = ParamVec::new();
        let mut rest = uri;
        let last = self.segments.len().saturating_sub(1);

        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Literal(text) => rest = rest.strip_prefix(text.as_str())?,
                Segment::Path(name) => {
                    let end = path_capture_end(rest, i == last)?;
                    if end == 0 {
                        return None;
                    }
                    values.push((Arc::clone(name), rest[..end].to_owned()));
                    rest = &rest[end..];
                }
                Segment::Regex { pattern, variables } => {
                    let captures = pattern.captures(rest)?;
                    for (name, group) in variables {
                        if let Some(m) = captures.get(*group) {
                            values.push((Arc::clone(name), m.as_str().to_owned()));
                        }
                    }
                    return Some(values);
                }
            }
        }

        rest.is_empty().then_some(values)
    }
}

/// Remove one trailing `/` from anything longer than `/`.
fn strip_trailing_slash(uri: &str) -> &str {
    if uri.len() > 1 {
        uri.strip_suffix('/').unwrap_or(uri)
    } else {
        uri
    }
}

/// Length of a path capture at the start of `input`, or `None` when the
/// capture runs into a character that cannot belong to a path variable.
///
/// Distinct from the parser's literal table: this one decides where a
/// captured value ends at match time.
fn path_capture_end(input: &str, is_last: bool) -> Option<usize> {
    let bytes = input.as_bytes();
    for (i, &b) in bytes.iter().enumerate() {
        match b {
            b'/' if !is_last => return Some(i),
            b'/' | b'?' | b'{' | b'}' | b'&' | b';' | b'+' => return None,
            b'#' if bytes.get(i + 1) != Some(&b'{') => return None,
            _ => {}
        }
    }
    Some(bytes.len())
}

impl FromStr for UriTemplateMatcher {
    type Err = UriTemplateError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl fmt::Display for UriTemplateMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.template)
    }
}

impl PartialEq for UriTemplateMatcher {
    fn eq(&self, other: &Self) -> bool {
        self.template == other.template
    }
}

impl Eq for UriTemplateMatcher {}

impl Hash for UriTemplateMatcher {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.template.hash(state);
    }
}

impl PartialOrd for UriTemplateMatcher {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Most specific first: longer literal text, then fewer variables. The
/// template string breaks remaining ties so the order is total.
impl Ord for UriTemplateMatcher {
    fn cmp(&self, other: &Self) -> Ordering {
        self.precedence
            .cmp(&other.precedence)
            .then_with(|| self.template.cmp(&other.template))
    }
}
