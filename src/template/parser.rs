//! Template tokenizer.
//!
//! Turns a template string such as `/books/{id}{?max,offset}` into an ordered
//! list of [`Part`]s. The parser is a single left-to-right character scan and
//! never reorders or merges parts; [`concat`] is the only place parts from two
//! templates are combined.

use std::fmt;

use crate::error::{Result, UriTemplateError};

/// Expression operator as defined by RFC 6570 section 2.2.
///
/// Each variant carries its per-operator constants: the sigil, the separator
/// used between repeated values, whether it contributes to the query string
/// and whether values are percent-encoded or merely escaped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExpressionType {
    /// `{var}`
    None,
    /// `{+var}`
    ReservedExpansion,
    /// `{#var}`
    FragmentExpansion,
    /// `{.var}`
    LabelExpansion,
    /// `{/var}`
    PathSegmentExpansion,
    /// `{;var}`
    PathStyleParameterExpansion,
    /// `{?var}`
    FormStyleParameterExpansion,
    /// `{&var}`
    FormStyleQueryContinuation,
}

impl ExpressionType {
    /// Operator for a leading expression character, if it is one.
    #[must_use]
    pub fn from_operator(c: char) -> Option<Self> {
        match c {
            '+' => Some(Self::ReservedExpansion),
            '#' => Some(Self::FragmentExpansion),
            '.' => Some(Self::LabelExpansion),
            '/' => Some(Self::PathSegmentExpansion),
            ';' => Some(Self::PathStyleParameterExpansion),
            '?' => Some(Self::FormStyleParameterExpansion),
            '&' => Some(Self::FormStyleQueryContinuation),
            _ => None,
        }
    }

    /// The leading sigil, or `'0'` for [`ExpressionType::None`].
    #[must_use]
    pub const fn operator(self) -> char {
        match self {
            Self::None => '0',
            Self::ReservedExpansion => '+',
            Self::FragmentExpansion => '#',
            Self::LabelExpansion => '.',
            Self::PathSegmentExpansion => '/',
            Self::PathStyleParameterExpansion => ';',
            Self::FormStyleParameterExpansion => '?',
            Self::FormStyleQueryContinuation => '&',
        }
    }

    /// Separator between exploded values.
    #[must_use]
    pub const fn separator(self) -> char {
        match self {
            Self::None | Self::ReservedExpansion | Self::FragmentExpansion => ',',
            Self::LabelExpansion => '.',
            Self::PathSegmentExpansion => '/',
            Self::PathStyleParameterExpansion => ';',
            Self::FormStyleParameterExpansion | Self::FormStyleQueryContinuation => '&',
        }
    }

    /// Delimiter between the values of a non-exploded list or map.
    ///
    /// Label and path segment expansion reuse their operator; everything else
    /// joins with a comma.
    #[must_use]
    pub const fn delimiter(self) -> char {
        match self {
            Self::LabelExpansion => '.',
            Self::PathSegmentExpansion => '/',
            _ => ',',
        }
    }

    /// `true` for `?` and `&`.
    #[must_use]
    pub const fn is_query_part(self) -> bool {
        matches!(
            self,
            Self::FormStyleParameterExpansion | Self::FormStyleQueryContinuation
        )
    }

    /// `true` when values are percent-encoded, `false` when only `%` and
    /// whitespace are escaped.
    #[must_use]
    pub const fn encode(self) -> bool {
        !matches!(self, Self::ReservedExpansion | Self::FragmentExpansion)
    }

    /// `true` for operators that render `name=value` pairs.
    #[must_use]
    pub const fn is_named(self) -> bool {
        matches!(
            self,
            Self::PathStyleParameterExpansion
                | Self::FormStyleParameterExpansion
                | Self::FormStyleQueryContinuation
        )
    }
}

/// A variable inside an expression: `name`, `name*` or `name:modifier`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Variable {
    /// Variable name
    pub name: String,
    /// Raw modifier text after `:`, if any
    pub modifier: Option<String>,
    /// `true` when declared with a trailing `*`
    pub explode: bool,
}

impl Variable {
    /// Truncation length when the modifier is numeric.
    ///
    /// A digit string that does not fit a `usize` is not a length; it is
    /// left to the matcher as a pattern fragment.
    #[must_use]
    pub fn max_length(&self) -> Option<usize> {
        self.modifier
            .as_deref()
            .filter(|m| !m.is_empty() && m.bytes().all(|b| b.is_ascii_digit()))
            .and_then(|m| m.parse().ok())
    }

    /// `true` when the variable has a modifier or explode flag.
    #[must_use]
    pub fn is_modified(&self) -> bool {
        self.explode || self.modifier.is_some()
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if self.explode {
            f.write_str("*")?;
        }
        if let Some(modifier) = &self.modifier {
            write!(f, ":{modifier}")?;
        }
        Ok(())
    }
}

/// One piece of a parsed template.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Part {
    /// Text copied verbatim
    Literal(String),
    /// A `{...}` expression
    Expression {
        /// Operator of the expression
        kind: ExpressionType,
        /// Variables in declaration order
        variables: Vec<Variable>,
    },
}

impl Part {
    /// Expression type, or `None` for literals.
    #[must_use]
    pub fn expression_type(&self) -> Option<ExpressionType> {
        match self {
            Part::Literal(_) => None,
            Part::Expression { kind, .. } => Some(*kind),
        }
    }

    fn is_query_part(&self) -> bool {
        self.expression_type()
            .is_some_and(ExpressionType::is_query_part)
    }

    fn is_fragment(&self) -> bool {
        self.expression_type() == Some(ExpressionType::FragmentExpansion)
    }
}

impl fmt::Display for Part {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Part::Literal(text) => f.write_str(text),
            Part::Expression { kind, variables } => {
                f.write_str("{")?;
                if *kind != ExpressionType::None {
                    write!(f, "{}", kind.operator())?;
                }
                for (i, variable) in variables.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{variable}")?;
                }
                f.write_str("}")
            }
        }
    }
}

/// Renders parts back into template syntax.
#[must_use]
pub fn parts_to_template(parts: &[Part]) -> String {
    parts.iter().map(ToString::to_string).collect()
}

/// Characters permitted in a literal part.
///
/// Distinct from the matcher's capture boundary table: this one governs
/// what a template author may write, not where a path capture stops.
#[must_use]
pub const fn is_allowed_character(c: char) -> bool {
    !matches!(c, '<' | '>' | '\\' | '^' | '`' | '{' | '|' | '}')
}

/// Parse a template string into its parts.
///
/// # Errors
///
/// * [`UriTemplateError::IllegalCharacter`] for a character rejected by [`is_allowed_character`] outside an expression
/// * [`UriTemplateError::UnterminatedExpression`] for a `{` never closed
/// * [`UriTemplateError::EmptyExpression`] for an expression without variables
pub fn parse(template: &str) -> Result<Vec<Part>> {
    let mut parts = Vec::new();
    let mut literal = String::new();
    let mut chars = template.chars().enumerate();

    while let Some((position, c)) = chars.next() {
        if c == '{' {
            if !literal.is_empty() {
                parts.push(Part::Literal(std::mem::take(&mut literal)));
            }
            let mut body = String::new();
            let mut depth = ModifierDepth::default();
            let mut closed = false;
            for (_, c) in chars.by_ref() {
                if c == '}' && depth.at_top_level() {
                    closed = true;
                    break;
                }
                depth.track(c);
                body.push(c);
            }
            if !closed {
                return Err(UriTemplateError::UnterminatedExpression {
                    position,
                    template: template.to_string(),
                });
            }
            let part = parse_expression(&body).ok_or_else(|| UriTemplateError::EmptyExpression {
                position,
                template: template.to_string(),
            })?;
            parts.push(part);
        } else if is_allowed_character(c) {
            literal.push(c);
        } else {
            return Err(UriTemplateError::IllegalCharacter {
                character: c,
                position,
                template: template.to_string(),
            });
        }
    }

    if !literal.is_empty() {
        parts.push(Part::Literal(literal));
    }
    Ok(parts)
}

fn parse_expression(body: &str) -> Option<Part> {
    let mut chars = body.chars();
    let (kind, rest) = match chars.next().and_then(ExpressionType::from_operator) {
        Some(kind) => (kind, chars.as_str()),
        None => (ExpressionType::None, body),
    };

    let variables: Vec<Variable> = split_variables(rest)
        .into_iter()
        .filter_map(parse_variable)
        .collect();

    if variables.is_empty() {
        return None;
    }
    Some(Part::Expression { kind, variables })
}

/// Nesting inside a modifier pattern.
///
/// Inside a `[...]` class braces are plain characters; outside one they
/// open and close a `{m,n}` repetition. A backslash escapes the next
/// character.
#[derive(Debug, Default)]
struct ModifierDepth {
    brackets: usize,
    braces: usize,
    escaped: bool,
}

impl ModifierDepth {
    /// `true` when the next character is not nested or escaped.
    fn at_top_level(&self) -> bool {
        !self.escaped && self.brackets == 0 && self.braces == 0
    }

    fn track(&mut self, c: char) {
        if self.escaped {
            self.escaped = false;
            return;
        }
        match c {
            '\\' => self.escaped = true,
            '[' => self.brackets += 1,
            ']' => self.brackets = self.brackets.saturating_sub(1),
            '{' if self.brackets == 0 => self.braces += 1,
            '}' if self.brackets == 0 => self.braces = self.braces.saturating_sub(1),
            _ => {}
        }
    }
}

/// Split on commas that are not inside `[...]` or `{...}` of a modifier.
fn split_variables(body: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut depth = ModifierDepth::default();
    let mut start = 0;
    for (i, c) in body.char_indices() {
        if c == ',' && depth.at_top_level() {
            out.push(&body[start..i]);
            start = i + 1;
        }
        depth.track(c);
    }
    out.push(&body[start..]);
    out
}

fn parse_variable(raw: &str) -> Option<Variable> {
    let (name, modifier) = match raw.split_once(':') {
        Some((name, modifier)) => (name, Some(modifier.to_string())),
        None => (raw, None),
    };
    let (name, explode) = match name.strip_suffix('*') {
        Some(name) => (name, true),
        None => (name, false),
    };
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    Some(Variable {
        name: name.to_string(),
        modifier,
        explode,
    })
}

/// Combine two part lists, as when nesting a method route under a
/// controller route.
///
/// Query expressions (`?`, `&`) from both lists end up last and fragment
/// expressions (`#`) right before them, each group in template order. The
/// slash at the join is normalised so that exactly one separates the two
/// halves.
#[must_use]
pub fn concat(first: &[Part], second: &[Part]) -> Vec<Part> {
    let (mut result, fragments_first, queries_first) = split_trailing(first);
    let (rest, fragments_second, queries_second) = split_trailing(second);
    let has_params = !(fragments_first.is_empty()
        && queries_first.is_empty()
        && fragments_second.is_empty()
        && queries_second.is_empty());

    let mut rest = rest.into_iter();
    if let Some(head) = rest.next() {
        let is_whole_second = rest.len() == 0;
        match (result.pop(), head) {
            (None, head) => result.push(head),
            (Some(Part::Literal(mut left)), Part::Literal(right)) => {
                if right == "/" && is_whole_second && !has_params {
                    // "/api" nested with "/" stays "/api"
                } else if left.ends_with('/') && right.starts_with('/') {
                    left.push_str(&right[1..]);
                } else if !left.ends_with('/') && !right.starts_with('/') {
                    left.push('/');
                    left.push_str(&right);
                } else {
                    left.push_str(&right);
                }
                if !left.is_empty() {
                    result.push(Part::Literal(left));
                }
            }
            (Some(Part::Literal(mut left)), head)
                if head.expression_type() == Some(ExpressionType::PathSegmentExpansion)
                    && left.ends_with('/') =>
            {
                left.pop();
                if !left.is_empty() {
                    result.push(Part::Literal(left));
                }
                result.push(head);
            }
            (Some(last), head) => {
                result.push(last);
                result.push(head);
            }
        }
    }
    result.extend(rest);
    result.extend(fragments_first);
    result.extend(fragments_second);
    result.extend(queries_first);
    result.extend(queries_second);
    result
}

fn split_trailing(parts: &[Part]) -> (Vec<Part>, Vec<Part>, Vec<Part>) {
    let mut rest = Vec::with_capacity(parts.len());
    let mut fragments = Vec::new();
    let mut queries = Vec::new();
    for part in parts {
        if part.is_query_part() {
            queries.push(part.clone());
        } else if part.is_fragment() {
            fragments.push(part.clone());
        } else {
            rest.push(part.clone());
        }
    }
    (rest, fragments, queries)
}
