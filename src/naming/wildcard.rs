//! Wildcard patterns compiled into anchored regular expressions.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::Chars;
use thiserror::Error;

/// Dialect used when compiling a [`Wildcard`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WildcardSyntax {
    /// `*` and `?` are wildcards and every other character is literal.
    ///
    /// Used for name domains and unquoted property values.
    Name,
    /// `*` and `?` are wildcards; a backslash pair is matched as the same two
    /// literal characters.
    ///
    /// Used for quoted property values, which are stored in escaped form.
    QuotedName,
    /// `*`, `?`, `[...]`, `[!...]` and backslash escapes.
    ///
    /// Used by string-match query expressions.
    Query,
}

/// Errors returned while compiling a [`Wildcard`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WildcardError {
    /// A `[` character class has no closing `]`.
    #[error("unterminated character class in wildcard '{0}'")]
    UnterminatedClass(String),

    /// The pattern ends in a lone backslash.
    #[error("dangling escape at end of wildcard '{0}'")]
    DanglingEscape(String),

    /// The translated expression was rejected by the regex engine.
    #[error("wildcard '{pattern}' failed to compile: {reason}")]
    Compile {
        /// Wildcard source text.
        pattern: String,
        /// Regex engine diagnostic.
        reason: String,
    },
}

/// A compiled wildcard pattern.
///
/// Equality and serialization use the source text only. Deserialization
/// compiles with [`WildcardSyntax::Query`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Wildcard {
    source: String,
    regex: Regex,
}

impl Wildcard {
    /// Compiles `source` using the given dialect.
    ///
    /// # Errors
    ///
    /// Returns [`WildcardError`] when the pattern has an unterminated
    /// character class, a dangling escape, or cannot be compiled.
    pub fn compile(source: impl Into<String>, syntax: WildcardSyntax) -> Result<Self, WildcardError> {
        let source = source.into();
        let translated = translate(&source, syntax)?;
        let regex = Regex::new(&translated).map_err(|err| WildcardError::Compile {
            pattern: source.clone(),
            reason: err.to_string(),
        })?;
        Ok(Self { source, regex })
    }

    /// Returns whether `text` contains an active wildcard character under the
    /// given dialect.
    #[must_use]
    pub fn contains_wildcard(text: &str, syntax: WildcardSyntax) -> bool {
        match syntax {
            WildcardSyntax::Name => text.contains(['*', '?']),
            WildcardSyntax::QuotedName | WildcardSyntax::Query => {
                let mut chars = text.chars();
                while let Some(character) = chars.next() {
                    match character {
                        '\\' => {
                            chars.next();
                        }
                        '*' | '?' => return true,
                        '[' if syntax == WildcardSyntax::Query => return true,
                        _ => {}
                    }
                }
                false
            }
        }
    }

    /// Returns the wildcard source text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Returns whether the whole of `candidate` matches the pattern.
    #[must_use]
    pub fn is_match(&self, candidate: &str) -> bool {
        self.regex.is_match(candidate)
    }
}

impl PartialEq for Wildcard {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for Wildcard {}

impl fmt::Display for Wildcard {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.source)
    }
}

impl TryFrom<String> for Wildcard {
    type Error = WildcardError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::compile(value, WildcardSyntax::Query)
    }
}

impl From<Wildcard> for String {
    fn from(value: Wildcard) -> Self {
        value.source
    }
}

fn translate(source: &str, syntax: WildcardSyntax) -> Result<String, WildcardError> {
    let mut pattern = String::with_capacity(source.len() + 8);
    pattern.push('^');
    let mut chars = source.chars();
    while let Some(character) = chars.next() {
        match character {
            '*' => pattern.push_str(".*"),
            '?' => pattern.push('.'),
            '\\' if syntax != WildcardSyntax::Name => {
                let escaped = chars
                    .next()
                    .ok_or_else(|| WildcardError::DanglingEscape(source.to_owned()))?;
                if syntax == WildcardSyntax::QuotedName {
                    push_literal(&mut pattern, '\\');
                }
                push_literal(&mut pattern, escaped);
            }
            '[' if syntax == WildcardSyntax::Query => translate_class(&mut chars, &mut pattern, source)?,
            other => push_literal(&mut pattern, other),
        }
    }
    pattern.push('$');
    Ok(pattern)
}

fn translate_class(
    chars: &mut Chars<'_>,
    pattern: &mut String,
    source: &str,
) -> Result<(), WildcardError> {
    pattern.push('[');
    let mut at_start = true;
    let mut negated = false;
    loop {
        let character = chars
            .next()
            .ok_or_else(|| WildcardError::UnterminatedClass(source.to_owned()))?;
        match character {
            '!' | '^' if at_start && !negated => {
                pattern.push('^');
                negated = true;
                continue;
            }
            ']' if !at_start => {
                pattern.push(']');
                return Ok(());
            }
            '\\' => {
                let escaped = chars
                    .next()
                    .ok_or_else(|| WildcardError::DanglingEscape(source.to_owned()))?;
                push_class_literal(pattern, escaped);
            }
            other => push_class_literal(pattern, other),
        }
        at_start = false;
    }
}

fn push_literal(pattern: &mut String, character: char) {
    let mut buffer = [0_u8; 4];
    pattern.push_str(&regex::escape(character.encode_utf8(&mut buffer)));
}

fn push_class_literal(pattern: &mut String, character: char) {
    if matches!(character, '[' | ']' | '\\' | '^' | '&' | '~') {
        pattern.push('\\');
    }
    pattern.push(character);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("*", "anything", true)]
    #[case("a?c", "abc", true)]
    #[case("a?c", "ac", false)]
    #[case("a.c", "abc", false)]
    #[case("a.c", "a.c", true)]
    #[case("web*", "webapp", true)]
    #[case("web*", "myweb", false)]
    fn name_syntax_treats_only_star_and_question_as_wildcards(
        #[case] pattern: &str,
        #[case] candidate: &str,
        #[case] expected: bool,
    ) {
        let wildcard = Wildcard::compile(pattern, WildcardSyntax::Name).expect("valid wildcard");
        assert_eq!(wildcard.is_match(candidate), expected);
    }

    #[rstest]
    #[case("[abc]x", "bx", true)]
    #[case("[!abc]x", "bx", false)]
    #[case("[!abc]x", "dx", true)]
    #[case("[a-c]*", "cat", true)]
    #[case(r"\*literal", "*literal", true)]
    #[case(r"\*literal", "xliteral", false)]
    fn query_syntax_supports_classes_and_escapes(
        #[case] pattern: &str,
        #[case] candidate: &str,
        #[case] expected: bool,
    ) {
        let wildcard = Wildcard::compile(pattern, WildcardSyntax::Query).expect("valid wildcard");
        assert_eq!(wildcard.is_match(candidate), expected);
    }

    #[test]
    fn quoted_name_syntax_matches_escape_pairs_literally() {
        let wildcard =
            Wildcard::compile(r#""a\*b*""#, WildcardSyntax::QuotedName).expect("valid wildcard");

        assert!(wildcard.is_match(r#""a\*bcd""#));
        assert!(!wildcard.is_match(r#""axbcd""#));
    }

    #[test]
    fn unterminated_class_is_rejected() {
        let result = Wildcard::compile("[abc", WildcardSyntax::Query);
        assert!(matches!(result, Err(WildcardError::UnterminatedClass(_))));
    }

    #[test]
    fn dangling_escape_is_rejected() {
        let result = Wildcard::compile("abc\\", WildcardSyntax::Query);
        assert!(matches!(result, Err(WildcardError::DanglingEscape(_))));
    }

    #[rstest]
    #[case("plain", WildcardSyntax::Name, false)]
    #[case("pl*n", WildcardSyntax::Name, true)]
    #[case(r#""a\*b""#, WildcardSyntax::QuotedName, false)]
    #[case(r#""a*b""#, WildcardSyntax::QuotedName, true)]
    fn detects_active_wildcards(
        #[case] text: &str,
        #[case] syntax: WildcardSyntax,
        #[case] expected: bool,
    ) {
        assert_eq!(Wildcard::contains_wildcard(text, syntax), expected);
    }
}
