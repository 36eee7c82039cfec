//! Object name parser and component validators.

use super::MalformedNameError;

/// Characters never allowed in a property key.
const RESERVED_KEY_CHARACTERS: [char; 7] = [':', ',', '=', '*', '?', '"', '\n'];

/// Characters never allowed in an unquoted property value.
const RESERVED_VALUE_CHARACTERS: [char; 5] = [':', ',', '=', '"', '\n'];

/// Characters never allowed in a domain.
const RESERVED_DOMAIN_CHARACTERS: [char; 2] = [':', '\n'];

/// Syntactic pieces of an object name before semantic validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct ParsedName {
    pub(super) domain: String,
    pub(super) properties: Vec<(String, String)>,
    pub(super) open: bool,
}

/// How a property value was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct ValueShape {
    pub(super) quoted: bool,
    pub(super) pattern: bool,
}

/// Splits `input` into domain, properties and the open-list marker.
pub(super) fn parse(input: &str) -> Result<ParsedName, MalformedNameError> {
    if input.is_empty() {
        return Ok(ParsedName {
            domain: "*".to_owned(),
            properties: Vec::new(),
            open: true,
        });
    }

    let (domain, property_list) = input
        .split_once(':')
        .ok_or_else(|| MalformedNameError::MissingDomainSeparator(input.to_owned()))?;

    let mut properties = Vec::new();
    let mut open = false;
    if !property_list.is_empty() {
        for element in split_properties(property_list) {
            if element == "*" {
                open = true;
                continue;
            }
            if element.is_empty() {
                return Err(MalformedNameError::EmptyKey(input.to_owned()));
            }
            let (key, value) = element
                .split_once('=')
                .ok_or_else(|| MalformedNameError::MissingEquals(element.to_owned()))?;
            properties.push((key.to_owned(), value.to_owned()));
        }
    }

    Ok(ParsedName {
        domain: domain.to_owned(),
        properties,
        open,
    })
}

/// Splits a property list on commas that sit outside quoted values.
fn split_properties(property_list: &str) -> Vec<&str> {
    let mut elements = Vec::new();
    let mut start = 0;
    let mut in_quotes = false;
    let mut escaped = false;
    for (offset, character) in property_list.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match character {
            '\\' if in_quotes => escaped = true,
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                elements.push(property_list.get(start..offset).unwrap_or_default());
                start = offset + 1;
            }
            _ => {}
        }
    }
    elements.push(property_list.get(start..).unwrap_or_default());
    elements
}

/// Validates a domain and reports whether it is a wildcard pattern.
pub(crate) fn validate_domain(domain: &str) -> Result<bool, MalformedNameError> {
    if let Some(character) = domain.chars().find(|c| RESERVED_DOMAIN_CHARACTERS.contains(c)) {
        return Err(MalformedNameError::InvalidDomain {
            domain: domain.to_owned(),
            character,
        });
    }
    Ok(domain.contains(['*', '?']))
}

/// Validates a property key.
pub(super) fn validate_key(key: &str, context: &str) -> Result<(), MalformedNameError> {
    if key.is_empty() {
        return Err(MalformedNameError::EmptyKey(context.to_owned()));
    }
    if let Some(character) = key.chars().find(|c| RESERVED_KEY_CHARACTERS.contains(c)) {
        return Err(MalformedNameError::InvalidKey {
            key: key.to_owned(),
            character,
        });
    }
    Ok(())
}

/// Validates a property value as written, quotes included.
pub(super) fn validate_value(key: &str, value: &str) -> Result<ValueShape, MalformedNameError> {
    if value.is_empty() {
        return Err(MalformedNameError::EmptyValue(key.to_owned()));
    }

    if let Some(body) = value.strip_prefix('"') {
        return validate_quoted(key, body).map(|pattern| ValueShape {
            quoted: true,
            pattern,
        });
    }

    if let Some(character) = value.chars().find(|c| RESERVED_VALUE_CHARACTERS.contains(c)) {
        return Err(MalformedNameError::InvalidValue {
            key: key.to_owned(),
            character,
        });
    }
    Ok(ValueShape {
        quoted: false,
        pattern: value.contains(['*', '?']),
    })
}

/// Validates the text after an opening quote and reports wildcard use.
fn validate_quoted(key: &str, body: &str) -> Result<bool, MalformedNameError> {
    let mut pattern = false;
    let mut chars = body.char_indices();
    while let Some((offset, character)) = chars.next() {
        match character {
            '\\' => match chars.next() {
                Some((_, '"' | '\\' | '*' | '?' | 'n')) => {}
                Some((_, escape)) => {
                    return Err(MalformedNameError::InvalidEscape {
                        key: key.to_owned(),
                        escape,
                    });
                }
                None => return Err(MalformedNameError::UnterminatedQuote(key.to_owned())),
            },
            '"' => {
                if offset + 1 != body.len() {
                    return Err(MalformedNameError::TrailingCharacters(key.to_owned()));
                }
                return Ok(pattern);
            }
            '\n' => {
                return Err(MalformedNameError::InvalidValue {
                    key: key.to_owned(),
                    character,
                });
            }
            '*' | '?' => pattern = true,
            _ => {}
        }
    }
    Err(MalformedNameError::UnterminatedQuote(key.to_owned()))
}

/// Quotes `value` so that it can be used verbatim as a property value.
pub(super) fn quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for character in value.chars() {
        match character {
            '"' | '\\' | '*' | '?' => {
                quoted.push('\\');
                quoted.push(character);
            }
            '\n' => quoted.push_str("\\n"),
            other => quoted.push(other),
        }
    }
    quoted.push('"');
    quoted
}

/// Reverses [`quote`].
pub(super) fn unquote(value: &str) -> Result<String, MalformedNameError> {
    let body = value
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .ok_or_else(|| MalformedNameError::UnterminatedQuote(value.to_owned()))?;

    let mut unquoted = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(character) = chars.next() {
        match character {
            '\\' => match chars.next() {
                Some('n') => unquoted.push('\n'),
                Some(escaped @ ('"' | '\\' | '*' | '?')) => unquoted.push(escaped),
                Some(escape) => {
                    return Err(MalformedNameError::InvalidEscape {
                        key: value.to_owned(),
                        escape,
                    });
                }
                None => return Err(MalformedNameError::UnterminatedQuote(value.to_owned())),
            },
            '"' => return Err(MalformedNameError::TrailingCharacters(value.to_owned())),
            other => unquoted.push(other),
        }
    }
    Ok(unquoted)
}
