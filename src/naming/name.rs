//! The [`ObjectName`] value type.

use super::{
    MalformedNameError, Wildcard, WildcardSyntax,
    parser::{self, ParsedName},
};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::sync::Arc;

/// Structured identifier of a managed object, or a pattern selecting many.
///
/// Two names are equal when their domains match exactly and their property
/// sets match regardless of declaration order.
///
/// # Examples
///
/// ```
/// use palladio::naming::ObjectName;
///
/// let name: ObjectName = "billing:type=Queue,name=orders".parse()?;
/// let pattern: ObjectName = "billing:type=Queue,*".parse()?;
///
/// assert!(pattern.matches(&name));
/// assert_eq!(name.canonical_name(), "billing:name=orders,type=Queue");
/// # Ok::<(), palladio::naming::MalformedNameError>(())
/// ```
#[derive(Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ObjectName(Arc<NameParts>);

/// Validated components shared by clones of one name.
struct NameParts {
    domain: String,
    declared: Vec<(String, String)>,
    properties: BTreeMap<String, String>,
    property_list_pattern: bool,
    matcher: Option<PatternMatcher>,
}

/// Compiled wildcards of a pattern name.
#[derive(Debug)]
struct PatternMatcher {
    domain: Option<Wildcard>,
    values: BTreeMap<String, Wildcard>,
}

impl ObjectName {
    /// Parses an object name from its string form.
    ///
    /// The empty string and `*:*` both denote the select-all pattern.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedNameError`] when the text violates name syntax.
    pub fn new(value: &str) -> Result<Self, MalformedNameError> {
        Self::from_parsed(parser::parse(value)?)
    }

    /// Returns the pattern matching every object name (`*:*`).
    #[must_use]
    pub fn select_all() -> Self {
        Self(Arc::new(NameParts {
            domain: "*".to_owned(),
            declared: Vec::new(),
            properties: BTreeMap::new(),
            property_list_pattern: true,
            matcher: Some(PatternMatcher {
                domain: None,
                values: BTreeMap::new(),
            }),
        }))
    }

    /// Returns whether this is the select-all pattern.
    #[must_use]
    pub fn is_select_all(&self) -> bool {
        self.0.property_list_pattern
            && self.0.properties.is_empty()
            && (self.0.domain.is_empty() || self.0.domain == "*")
    }

    /// Starts building a name in `domain`.
    #[must_use]
    pub fn builder(domain: impl Into<String>) -> ObjectNameBuilder {
        ObjectNameBuilder {
            domain: domain.into(),
            properties: Vec::new(),
            open: false,
        }
    }

    fn from_parsed(parsed: ParsedName) -> Result<Self, MalformedNameError> {
        let ParsedName {
            domain,
            properties: declared,
            open,
        } = parsed;

        let domain_pattern = parser::validate_domain(&domain)?;
        let mut properties = BTreeMap::new();
        let mut value_patterns = BTreeMap::new();
        for (key, value) in &declared {
            parser::validate_key(key, &domain)?;
            let shape = parser::validate_value(key, value)?;
            if properties.insert(key.clone(), value.clone()).is_some() {
                return Err(MalformedNameError::DuplicateKey(key.clone()));
            }
            if shape.pattern {
                let syntax = if shape.quoted {
                    WildcardSyntax::QuotedName
                } else {
                    WildcardSyntax::Name
                };
                value_patterns.insert(key.clone(), compile(value, syntax)?);
            }
        }

        if declared.is_empty() && !open {
            return Err(MalformedNameError::MissingProperties(format!("{domain}:")));
        }

        let is_pattern = domain_pattern || open || !value_patterns.is_empty();
        if domain.is_empty() && !is_pattern {
            return Err(MalformedNameError::EmptyDomain(render(
                &domain, &declared, open,
            )));
        }

        let matcher = if is_pattern {
            let domain_wildcard = if domain_pattern {
                Some(compile(&domain, WildcardSyntax::Name)?)
            } else {
                None
            };
            Some(PatternMatcher {
                domain: domain_wildcard,
                values: value_patterns,
            })
        } else {
            None
        };

        Ok(Self(Arc::new(NameParts {
            domain,
            declared,
            properties,
            property_list_pattern: open,
            matcher,
        })))
    }

    /// Returns the domain part.
    #[must_use]
    pub fn domain(&self) -> &str {
        &self.0.domain
    }

    /// Returns the value of `key` as written, quotes included.
    #[must_use]
    pub fn key_property(&self, key: &str) -> Option<&str> {
        self.0.properties.get(key).map(String::as_str)
    }

    /// Returns the properties keyed and ordered by key.
    #[must_use]
    pub fn key_properties(&self) -> &BTreeMap<String, String> {
        &self.0.properties
    }

    /// Returns the properties in declaration order.
    pub fn declared_properties(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.declared
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// Returns the property list in declaration order, without the open
    /// marker.
    #[must_use]
    pub fn key_property_list_string(&self) -> String {
        join_properties(self.declared_properties())
    }

    /// Returns the property list sorted by key, without the open marker.
    #[must_use]
    pub fn canonical_key_property_list_string(&self) -> String {
        join_properties(
            self.0.properties
                .iter()
                .map(|(key, value)| (key.as_str(), value.as_str())),
        )
    }

    /// Returns the canonical string form: domain, sorted properties and the
    /// open marker when present.
    #[must_use]
    pub fn canonical_name(&self) -> String {
        let sorted: Vec<(String, String)> = self
            .0
            .properties
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        render(&self.0.domain, &sorted, self.0.property_list_pattern)
    }

    /// Returns whether this name is a pattern of any kind.
    #[must_use]
    pub fn is_pattern(&self) -> bool {
        self.0.matcher.is_some()
    }

    /// Returns whether the domain contains wildcards.
    #[must_use]
    pub fn is_domain_pattern(&self) -> bool {
        Wildcard::contains_wildcard(&self.0.domain, WildcardSyntax::Name)
    }

    /// Returns whether the property list is open to additional keys.
    #[must_use]
    pub fn is_property_list_pattern(&self) -> bool {
        self.0.property_list_pattern
    }

    /// Returns whether any property value contains wildcards.
    #[must_use]
    pub fn is_property_value_pattern(&self) -> bool {
        self.0.matcher
            .as_ref()
            .is_some_and(|matcher| !matcher.values.is_empty())
    }

    /// Returns whether the value of `key` contains wildcards.
    #[must_use]
    pub fn is_property_value_pattern_for(&self, key: &str) -> bool {
        self.0.matcher
            .as_ref()
            .is_some_and(|matcher| matcher.values.contains_key(key))
    }

    /// Fails when this name is a pattern.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedNameError::PatternNotAllowed`] for pattern names.
    pub fn ensure_concrete(&self) -> Result<(), MalformedNameError> {
        if self.is_pattern() {
            return Err(MalformedNameError::PatternNotAllowed(self.canonical_name()));
        }
        Ok(())
    }

    /// Returns whether `name` is selected by this name.
    ///
    /// A concrete name selects only itself. A pattern never selects another
    /// pattern.
    #[must_use]
    pub fn matches(&self, name: &Self) -> bool {
        let Some(matcher) = self.0.matcher.as_ref() else {
            return self == name;
        };
        if name.is_pattern() {
            return false;
        }
        self.matches_domain(matcher, name) && self.matches_properties(matcher, name)
    }

    fn matches_domain(&self, matcher: &PatternMatcher, name: &Self) -> bool {
        if self.0.domain.is_empty() || self.0.domain == "*" {
            return true;
        }
        matcher.domain.as_ref().map_or_else(
            || self.0.domain == name.0.domain,
            |wildcard| wildcard.is_match(&name.0.domain),
        )
    }

    fn matches_properties(&self, matcher: &PatternMatcher, name: &Self) -> bool {
        if !self.0.property_list_pattern && self.0.properties.len() != name.0.properties.len() {
            return false;
        }
        self.0.properties.iter().all(|(key, expected)| {
            name.0.properties.get(key).is_some_and(|actual| {
                matcher.values.get(key).map_or_else(
                    || expected == actual,
                    |wildcard| wildcard.is_match(actual),
                )
            })
        })
    }

    /// Quotes `value` so it can be used as a property value verbatim.
    ///
    /// ```
    /// use palladio::naming::ObjectName;
    ///
    /// assert_eq!(ObjectName::quote("a,b"), "\"a,b\"");
    /// assert_eq!(ObjectName::quote("x*"), "\"x\\*\"");
    /// ```
    #[must_use]
    pub fn quote(value: &str) -> String {
        parser::quote(value)
    }

    /// Decodes a quoted property value.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedNameError`] when `value` is not a well-formed quoted
    /// string.
    pub fn unquote(value: &str) -> Result<String, MalformedNameError> {
        parser::unquote(value)
    }

    fn identity(&self) -> (&str, &BTreeMap<String, String>, bool) {
        (&self.0.domain, &self.0.properties, self.0.property_list_pattern)
    }
}

/// Incremental constructor for [`ObjectName`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectNameBuilder {
    domain: String,
    properties: Vec<(String, String)>,
    open: bool,
}

impl ObjectNameBuilder {
    /// Appends a property. The value is used as written; quote values that
    /// contain reserved characters with [`ObjectName::quote`].
    #[must_use]
    pub fn property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.push((key.into(), value.into()));
        self
    }

    /// Opens the property list so that extra properties match.
    #[must_use]
    pub const fn open(mut self) -> Self {
        self.open = true;
        self
    }

    /// Validates the components and builds the name.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedNameError`] when any component is invalid.
    pub fn build(self) -> Result<ObjectName, MalformedNameError> {
        ObjectName::from_parsed(ParsedName {
            domain: self.domain,
            properties: self.properties,
            open: self.open,
        })
    }
}

fn compile(source: &str, syntax: WildcardSyntax) -> Result<Wildcard, MalformedNameError> {
    Wildcard::compile(source, syntax).map_err(|err| MalformedNameError::InvalidWildcard {
        fragment: source.to_owned(),
        reason: err.to_string(),
    })
}

fn join_properties<'a>(properties: impl Iterator<Item = (&'a str, &'a str)>) -> String {
    properties
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join(",")
}

fn render(domain: &str, properties: &[(String, String)], open: bool) -> String {
    let mut list = join_properties(
        properties
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str())),
    );
    if open {
        if !list.is_empty() {
            list.push(',');
        }
        list.push('*');
    }
    format!("{domain}:{list}")
}

impl PartialEq for ObjectName {
    fn eq(&self, other: &Self) -> bool {
        self.identity() == other.identity()
    }
}

impl Eq for ObjectName {}

impl Hash for ObjectName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identity().hash(state);
    }
}

impl PartialOrd for ObjectName {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ObjectName {
    fn cmp(&self, other: &Self) -> Ordering {
        self.identity().cmp(&other.identity())
    }
}

impl fmt::Debug for ObjectName {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_tuple("ObjectName")
            .field(&self.canonical_name())
            .finish()
    }
}

impl fmt::Display for ObjectName {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.canonical_name())
    }
}

impl FromStr for ObjectName {
    type Err = MalformedNameError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::new(value)
    }
}

impl TryFrom<String> for ObjectName {
    type Error = MalformedNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl TryFrom<&str> for ObjectName {
    type Error = MalformedNameError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ObjectName> for String {
    fn from(value: ObjectName) -> Self {
        value.canonical_name()
    }
}
