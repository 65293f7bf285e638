//! Error type shared by template parsing, compilation and expansion.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, UriTemplateError>;

/// Errors raised while turning a template string into something usable.
///
/// Match misses are not errors: [`crate::UriTemplateMatcher::match_uri`]
/// returns `None` for them. Everything here happens at registration time,
/// so callers normally abort wiring of the offending route.
#[derive(Debug, Error)]
pub enum UriTemplateError {
    /// A character that may not appear in a literal part.
    ///
    /// `position` is the zero-based character index in `template`.
    #[error("illegal character '{character}' at position {position} in URI template: {template}")]
    IllegalCharacter {
        /// The rejected character
        character: char,
        /// Zero-based character index
        position: usize,
        /// The template being parsed
        template: String,
    },
    /// A `{` with no matching `}`.
    #[error("unterminated expression starting at position {position} in URI template: {template}")]
    UnterminatedExpression {
        /// Position of the opening brace
        position: usize,
        /// The template being parsed
        template: String,
    },
    /// `{}` with no variables.
    #[error("empty expression at position {position} in URI template: {template}")]
    EmptyExpression {
        /// Position of the opening brace
        position: usize,
        /// The template being parsed
        template: String,
    },
    /// The match pattern built from the template's modifiers is not a valid regex.
    #[error("invalid match pattern for URI template {template}: {source}")]
    InvalidPattern {
        /// The template being compiled
        template: String,
        /// Underlying regex compilation error
        #[source]
        source: regex::Error,
    },
    /// A value could not be converted into expansion parameters.
    #[error("failed to convert value into template parameters: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_illegal_character_message_names_position() {
        let err = UriTemplateError::IllegalCharacter {
            character: '<',
            position: 3,
            template: "/a/<b".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "illegal character '<' at position 3 in URI template: /a/<b"
        );
    }

    #[test]
    fn test_invalid_pattern_exposes_source() {
        let source = regex::Regex::new("(").unwrap_err();
        let err = UriTemplateError::InvalidPattern {
            template: "/{x:(}".to_string(),
            source,
        };
        assert!(std::error::Error::source(&err).is_some());
    }
}
