//! Template to segment compilation.
//!
//! The common route shapes (`/users/{id}`, `/users/{id}/posts`) compile to
//! plain literal and path-capture segments that are matched by string
//! scanning. Anything else switches to regex mode for the rest of the
//! template, producing a single trailing [`Segment::Regex`].

use regex::Regex;
use std::sync::Arc;
use tracing::debug;

use super::info::UriMatchVariable;
use crate::error::{Result, UriTemplateError};
use crate::template::{ExpressionType, Part, Variable};

/// Character class for a variable without modifier.
const VARIABLE_CLASS: &str = r"[^/?#(!{)\&;+]";

/// Character class for reserved expansion (`{+var}`), which may span slashes.
const RESERVED_CLASS: &str = r"[\S]";

/// One compiled unit of match logic.
#[derive(Debug, Clone)]
pub(crate) enum Segment {
    /// Input must start with this text
    Literal(String),
    /// A single variable absorbing up to the next `/` or the end
    Path(Arc<str>),
    /// Matches the whole remaining input; `variables` pairs each name with
    /// the capture group holding its value
    Regex {
        pattern: Regex,
        variables: Vec<(Arc<str>, usize)>,
    },
}

#[derive(Debug)]
pub(crate) struct Compiled {
    pub segments: Vec<Segment>,
    pub variables: Vec<UriMatchVariable>,
    pub is_root: bool,
}

/// Compile parsed parts into match segments.
pub(crate) fn compile(template: &str, parts: &[Part]) -> Result<Compiled> {
    let path_parts = trim_trailing_slash(parts);
    let mut segments = Vec::with_capacity(path_parts.len());
    let mut regex: Option<PatternBuilder> = None;

    for (i, part) in path_parts.iter().enumerate() {
        if let Some(builder) = regex.as_mut() {
            builder.push(part);
            continue;
        }
        match part {
            Part::Literal(text) => segments.push(Segment::Literal(text.clone())),
            Part::Expression { kind, variables }
                if is_path_capture(*kind, variables, path_parts.get(i + 1)) =>
            {
                segments.push(Segment::Path(Arc::from(variables[0].name.as_str())));
            }
            Part::Expression { .. } => {
                let mut builder = PatternBuilder::default();
                builder.push(part);
                regex = Some(builder);
            }
        }
    }

    let regex_mode = regex.is_some();
    if let Some(builder) = regex {
        if let Some(segment) = builder.build(template)? {
            segments.push(segment);
        }
    }

    let variables: Vec<UriMatchVariable> = parts
        .iter()
        .filter_map(|part| match part {
            Part::Expression { kind, variables } => Some(
                variables
                    .iter()
                    .map(move |v| UriMatchVariable::from_variable(v, kind.operator())),
            ),
            Part::Literal(_) => None,
        })
        .flatten()
        .collect();

    let is_root = match segments.as_slice() {
        [] => true,
        [Segment::Literal(text)] => text.is_empty() || text == "/",
        _ => false,
    };

    debug!(
        template = %template,
        segments = segments.len(),
        variables = variables.len(),
        regex_mode,
        is_root,
        "URI template compiled"
    );

    Ok(Compiled {
        segments,
        variables,
        is_root,
    })
}

/// Parts with one trailing `/` removed from the path, i.e. from the last
/// literal that is followed only by query or fragment expressions. Request
/// paths are matched with their trailing slash stripped, so the template
/// must be too. A leading `/` on its own is kept for the root.
fn trim_trailing_slash(parts: &[Part]) -> Vec<Part> {
    let mut parts = parts.to_vec();
    let path_end = parts.iter().rposition(|part| {
        !matches!(
            part.expression_type(),
            Some(kind) if kind.is_query_part() || kind == ExpressionType::FragmentExpansion
        )
    });
    let Some(i) = path_end else {
        return parts;
    };
    let Part::Literal(text) = &parts[i] else {
        return parts;
    };
    if text == "/" {
        if i > 0 {
            parts.remove(i);
        }
    } else if let Some(trimmed) = text.strip_suffix('/') {
        let trimmed = trimmed.to_string();
        parts[i] = Part::Literal(trimmed);
    }
    parts
}

/// A bare `{name}` that is last or followed by `/...` is scanned, not regex-matched.
fn is_path_capture(kind: ExpressionType, variables: &[Variable], next: Option<&Part>) -> bool {
    let [variable] = variables else {
        return false;
    };
    kind == ExpressionType::None
        && !variable.is_modified()
        && match next {
            None => true,
            Some(Part::Literal(text)) => text.starts_with('/'),
            Some(Part::Expression { .. }) => false,
        }
}

#[derive(Default)]
struct PatternBuilder {
    pattern: String,
    names: Vec<Arc<str>>,
}

impl PatternBuilder {
    fn push(&mut self, part: &Part) {
        match part {
            Part::Literal(text) => self.pattern.push_str(&regex::escape(text)),
            Part::Expression { kind, variables } => match kind {
                ExpressionType::None
                | ExpressionType::ReservedExpansion
                | ExpressionType::LabelExpansion
                | ExpressionType::PathSegmentExpansion => {
                    for (i, variable) in variables.iter().enumerate() {
                        if i > 0
                            && matches!(
                                kind,
                                ExpressionType::None | ExpressionType::ReservedExpansion
                            )
                        {
                            self.pattern.push(',');
                        }
                        let group = self.names.len();
                        self.pattern.push_str(&variable_pattern(*kind, variable, group));
                        self.names.push(Arc::from(variable.name.as_str()));
                    }
                }
                // Query, fragment and path-style parameters only affect expansion.
                ExpressionType::FragmentExpansion
                | ExpressionType::PathStyleParameterExpansion
                | ExpressionType::FormStyleParameterExpansion
                | ExpressionType::FormStyleQueryContinuation => {}
            },
        }
    }

    fn build(self, template: &str) -> Result<Option<Segment>> {
        if self.pattern.is_empty() {
            return Ok(None);
        }
        let pattern = Regex::new(&format!("^(?:{})$", self.pattern)).map_err(|source| {
            UriTemplateError::InvalidPattern {
                template: template.to_string(),
                source,
            }
        })?;
        let variables = self
            .names
            .into_iter()
            .enumerate()
            .filter_map(|(i, name)| {
                let group = group_name(i);
                pattern
                    .capture_names()
                    .position(|n| n == Some(group.as_str()))
                    .map(|index| (name, index))
            })
            .collect();
        Ok(Some(Segment::Regex { pattern, variables }))
    }
}

fn group_name(index: usize) -> String {
    format!("v{index}")
}

/// `true` when a pattern modifier makes the preceding operator optional.
fn is_optional_pattern(modifier: &str) -> bool {
    let mut rev = modifier.chars().rev();
    match (rev.next(), rev.next()) {
        (Some('*'), _) => true,
        (Some('?'), Some(prev)) => prev == '.' || prev.is_alphanumeric(),
        _ => false,
    }
}

/// Two capture groups per variable: the outer one spans the operator and the
/// value, the inner named one holds the value.
fn variable_pattern(kind: ExpressionType, variable: &Variable, index: usize) -> String {
    let class = if kind == ExpressionType::ReservedExpansion {
        RESERVED_CLASS
    } else {
        VARIABLE_CLASS
    };
    let mut optional_group = kind == ExpressionType::PathSegmentExpansion;
    let mut optional_operator = false;

    let value = match variable.modifier.as_deref() {
        // An exploded path segment list spans `/a/b/c`.
        None | Some("") if variable.explode && kind == ExpressionType::PathSegmentExpansion => {
            format!("{class}+(?:/{class}+)*")
        }
        None | Some("") => format!("{class}+"),
        Some("?") => {
            optional_group = true;
            format!("{class}+")
        }
        Some(modifier) => match variable.max_length() {
            Some(max) => format!("{class}{{1,{max}}}"),
            None => {
                optional_operator = is_optional_pattern(modifier);
                modifier.strip_prefix('^').unwrap_or(modifier).to_string()
            }
        },
    };

    let inner = format!("(?P<{}>{value})", group_name(index));
    let mut out = match kind {
        ExpressionType::LabelExpansion | ExpressionType::PathSegmentExpansion => format!(
            "({}{}{inner})",
            regex::escape(&kind.operator().to_string()),
            if optional_operator { "?" } else { "" }
        ),
        _ => format!("({inner})"),
    };
    if optional_group {
        out.push('?');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::parse;

    fn compiled(template: &str) -> Compiled {
        compile(template, &parse(template).unwrap()).unwrap()
    }

    #[test]
    fn test_path_segments_for_plain_variables() {
        let c = compiled("/users/{id}/posts/{post}");
        assert!(matches!(
            c.segments.as_slice(),
            [
                Segment::Literal(_),
                Segment::Path(_),
                Segment::Literal(_),
                Segment::Path(_)
            ]
        ));
        assert!(!c.is_root);
    }

    #[test]
    fn test_modifier_switches_to_regex_for_rest() {
        let c = compiled("/items/{id:[0-9]+}/x/{y}");
        assert!(matches!(
            c.segments.as_slice(),
            [Segment::Literal(_), Segment::Regex { .. }]
        ));
        let Some(Segment::Regex { variables, .. }) = c.segments.last() else {
            panic!("expected regex segment");
        };
        let names: Vec<&str> = variables.iter().map(|(n, _)| n.as_ref()).collect();
        assert_eq!(names, vec!["id", "y"]);
        assert_eq!(variables[0].1, 2);
        assert_eq!(variables[1].1, 4);
    }

    #[test]
    fn test_query_expressions_do_not_emit_regex() {
        let c = compiled("/search{?q,limit}");
        assert!(matches!(c.segments.as_slice(), [Segment::Literal(_)]));
        assert_eq!(c.variables.len(), 2);
        assert!(c.variables.iter().all(UriMatchVariable::is_query));
    }

    #[test]
    fn test_root_detection() {
        assert!(compiled("/").is_root);
        assert!(compiled("").is_root);
        assert!(!compiled("/a").is_root);
    }

    #[test]
    fn test_variable_patterns() {
        let plain = Variable {
            name: "x".into(),
            modifier: None,
            explode: false,
        };
        assert_eq!(
            variable_pattern(ExpressionType::None, &plain, 0),
            r"((?P<v0>[^/?#(!{)\&;+]+))"
        );
        assert_eq!(
            variable_pattern(ExpressionType::PathSegmentExpansion, &plain, 1),
            r"(/(?P<v1>[^/?#(!{)\&;+]+))?"
        );
        assert_eq!(
            variable_pattern(ExpressionType::ReservedExpansion, &plain, 0),
            r"((?P<v0>[\S]+))"
        );
        let bounded = Variable {
            modifier: Some("3".into()),
            ..plain.clone()
        };
        assert_eq!(
            variable_pattern(ExpressionType::None, &bounded, 0),
            r"((?P<v0>[^/?#(!{)\&;+]{1,3}))"
        );
        let optional = Variable {
            modifier: Some("[a-z]*".into()),
            ..plain
        };
        assert_eq!(
            variable_pattern(ExpressionType::LabelExpansion, &optional, 0),
            r"(\.?(?P<v0>[a-z]*))"
        );
    }

    #[test]
    fn test_exploded_path_segments_span_slashes() {
        let exploded = Variable {
            name: "p".into(),
            modifier: None,
            explode: true,
        };
        assert_eq!(
            variable_pattern(ExpressionType::PathSegmentExpansion, &exploded, 0),
            r"(/(?P<v0>[^/?#(!{)\&;+]+(?:/[^/?#(!{)\&;+]+)*))?"
        );
        assert_eq!(
            variable_pattern(ExpressionType::LabelExpansion, &exploded, 0),
            r"(\.(?P<v0>[^/?#(!{)\&;+]+))"
        );
    }

    #[test]
    fn test_trailing_slash_trimmed_from_path() {
        let c = compiled("/books/{?max}");
        assert!(matches!(
            c.segments.as_slice(),
            [Segment::Literal(text)] if text == "/books"
        ));
        let c = compiled("/users/{id}/");
        assert!(matches!(
            c.segments.as_slice(),
            [Segment::Literal(_), Segment::Path(_)]
        ));
        let c = compiled("/a/{id:[0-9]+}/{#f}");
        let Some(Segment::Regex { pattern, .. }) = c.segments.last() else {
            panic!("expected regex segment");
        };
        assert!(pattern.is_match("12"));
        assert!(compiled("/{?x}").is_root);
    }

    #[test]
    fn test_invalid_modifier_pattern_fails() {
        let err = compile("/{x:(}", &parse("/{x:(}").unwrap()).unwrap_err();
        assert!(matches!(err, UriTemplateError::InvalidPattern { .. }));
    }

    #[test]
    fn test_optional_pattern_markers() {
        assert!(is_optional_pattern(".*"));
        assert!(is_optional_pattern("a?"));
        assert!(is_optional_pattern(".?"));
        assert!(!is_optional_pattern("?"));
        assert!(!is_optional_pattern("[0-9]+"));
    }
}
