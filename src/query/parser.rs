//! Text syntax for query expressions.
//!
//! ```text
//! or        := and ("or" and)*
//! and       := unary ("and" unary)*
//! unary     := "not" unary | primary
//! primary   := "(" or ")" | "present" "(" ident ")" | predicate
//! predicate := value ( cmp value
//!                    | ["not"] "between" value "and" value
//!                    | ["not"] "in" "(" value ("," value)* ")"
//!                    | ["not"] ("like" | "startswith" | "endswith" | "contains") string
//!                    )?            -- a bare value must be true or false
//! value     := term (("+" | "-") term)*
//! term      := factor (("*" | "/") factor)*
//! factor    := ident | `quoted ident` | string | number | true | false | null
//!            | "-" factor | "(" value ")"
//! ```
//!
//! Keywords are case-insensitive. Attribute names that collide with a keyword
//! or contain other characters are written in backticks.

use super::{ArithmeticOp, CompareOp, QueryError, QueryExpr, SubstringPosition, ValueExpr};
use serde_json::{Number, Value};
use std::iter::Peekable;
use std::str::CharIndices;

const KEYWORDS: [&str; 13] = [
    "and",
    "or",
    "not",
    "between",
    "in",
    "like",
    "startswith",
    "endswith",
    "contains",
    "present",
    "true",
    "false",
    "null",
];

/// Returns whether `name` can be written without backticks.
pub(super) fn is_plain_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_ascii_alphabetic() || first == '_')
        && chars.all(is_identifier_continuation)
        && !is_keyword(name)
}

fn is_keyword(name: &str) -> bool {
    KEYWORDS
        .iter()
        .any(|keyword| keyword.eq_ignore_ascii_case(name))
}

const fn is_identifier_continuation(character: char) -> bool {
    character.is_ascii_alphanumeric() || character == '_' || character == '.'
}

/// Parses a complete query expression.
pub(super) fn parse(text: &str) -> Result<QueryExpr, QueryError> {
    let tokens = tokenize(text)?;
    let mut parser = Parser {
        tokens,
        position: 0,
        end: text.len(),
    };
    let expr = parser.parse_or()?;
    if parser.peek().is_some() {
        return Err(parser.error("unexpected trailing input"));
    }
    Ok(expr)
}

#[derive(Debug, Clone, PartialEq)]
enum TokenKind {
    Identifier { name: String, quoted: bool },
    String(String),
    Number(Number),
    LeftParen,
    RightParen,
    Comma,
    Compare(CompareOp),
    Arithmetic(ArithmeticOp),
}

#[derive(Debug, Clone, PartialEq)]
struct Token {
    kind: TokenKind,
    offset: usize,
}

fn syntax(offset: usize, message: impl Into<String>) -> QueryError {
    QueryError::Syntax {
        offset,
        message: message.into(),
    }
}

fn tokenize(text: &str) -> Result<Vec<Token>, QueryError> {
    let mut tokens = Vec::new();
    let mut chars = text.char_indices().peekable();
    while let Some(&(offset, character)) = chars.peek() {
        let kind = match character {
            c if c.is_whitespace() => {
                chars.next();
                continue;
            }
            '(' | ')' | ',' | '+' | '-' | '*' | '/' | '=' => {
                chars.next();
                single_character_token(character)
            }
            '!' => {
                chars.next();
                if chars.next_if(|&(_, next)| next == '=').is_none() {
                    return Err(syntax(offset, "expected '=' after '!'"));
                }
                TokenKind::Compare(CompareOp::Ne)
            }
            '<' => {
                chars.next();
                if chars.next_if(|&(_, next)| next == '=').is_some() {
                    TokenKind::Compare(CompareOp::Le)
                } else if chars.next_if(|&(_, next)| next == '>').is_some() {
                    TokenKind::Compare(CompareOp::Ne)
                } else {
                    TokenKind::Compare(CompareOp::Lt)
                }
            }
            '>' => {
                chars.next();
                if chars.next_if(|&(_, next)| next == '=').is_some() {
                    TokenKind::Compare(CompareOp::Ge)
                } else {
                    TokenKind::Compare(CompareOp::Gt)
                }
            }
            '\'' | '"' => TokenKind::String(lex_string(&mut chars, offset)?),
            '`' => lex_quoted_identifier(&mut chars, offset)?,
            c if c.is_ascii_digit() => TokenKind::Number(lex_number(text, &mut chars, offset)?),
            c if c.is_ascii_alphabetic() || c == '_' => {
                let mut name = String::new();
                while let Some((_, next)) = chars.next_if(|&(_, next)| {
                    if name.is_empty() {
                        next.is_ascii_alphabetic() || next == '_'
                    } else {
                        is_identifier_continuation(next)
                    }
                }) {
                    name.push(next);
                }
                TokenKind::Identifier {
                    name,
                    quoted: false,
                }
            }
            other => return Err(syntax(offset, format!("unexpected character {other:?}"))),
        };
        tokens.push(Token { kind, offset });
    }
    Ok(tokens)
}

const fn single_character_token(character: char) -> TokenKind {
    match character {
        '(' => TokenKind::LeftParen,
        ')' => TokenKind::RightParen,
        ',' => TokenKind::Comma,
        '+' => TokenKind::Arithmetic(ArithmeticOp::Add),
        '-' => TokenKind::Arithmetic(ArithmeticOp::Subtract),
        '*' => TokenKind::Arithmetic(ArithmeticOp::Multiply),
        '/' => TokenKind::Arithmetic(ArithmeticOp::Divide),
        _ => TokenKind::Compare(CompareOp::Eq),
    }
}

fn lex_string(chars: &mut Peekable<CharIndices<'_>>, offset: usize) -> Result<String, QueryError> {
    let Some((_, quote)) = chars.next() else {
        return Err(syntax(offset, "expected a string literal"));
    };
    let mut value = String::new();
    while let Some((position, character)) = chars.next() {
        match character {
            '\\' => match chars.next() {
                Some((_, 'n')) => value.push('\n'),
                Some((_, escaped @ ('\\' | '\'' | '"'))) => value.push(escaped),
                Some((_, other)) => {
                    return Err(syntax(position, format!("invalid escape '\\{other}'")));
                }
                None => break,
            },
            c if c == quote => return Ok(value),
            other => value.push(other),
        }
    }
    Err(syntax(offset, "unterminated string literal"))
}

fn lex_quoted_identifier(
    chars: &mut Peekable<CharIndices<'_>>,
    offset: usize,
) -> Result<TokenKind, QueryError> {
    chars.next();
    let mut name = String::new();
    for (_, character) in chars.by_ref() {
        if character == '`' {
            if name.is_empty() {
                return Err(syntax(offset, "empty quoted identifier"));
            }
            return Ok(TokenKind::Identifier { name, quoted: true });
        }
        name.push(character);
    }
    Err(syntax(offset, "unterminated quoted identifier"))
}

fn lex_number(
    text: &str,
    chars: &mut Peekable<CharIndices<'_>>,
    offset: usize,
) -> Result<Number, QueryError> {
    let mut end = offset;
    let mut is_float = false;
    let mut previous = '\0';
    while let Some((position, character)) = chars.next_if(|&(_, next)| {
        next.is_ascii_digit()
            || matches!(next, '.' | 'e' | 'E')
            || (matches!(next, '+' | '-') && matches!(previous, 'e' | 'E'))
    }) {
        is_float |= matches!(character, '.' | 'e' | 'E');
        previous = character;
        end = position + character.len_utf8();
    }

    let literal = text
        .get(offset..end)
        .ok_or_else(|| syntax(offset, "invalid number literal"))?;
    let invalid = || syntax(offset, format!("invalid number literal '{literal}'"));
    if !is_float {
        if let Ok(integer) = literal.parse::<i64>() {
            return Ok(Number::from(integer));
        }
        if let Ok(unsigned) = literal.parse::<u64>() {
            return Ok(Number::from(unsigned));
        }
    }
    literal
        .parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .ok_or_else(invalid)
}

struct Parser {
    tokens: Vec<Token>,
    position: usize,
    end: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }

    fn peek_kind(&self) -> Option<&TokenKind> {
        self.peek().map(|token| &token.kind)
    }

    fn peek_nth_keyword(&self, distance: usize, keyword: &str) -> bool {
        matches!(
            self.tokens.get(self.position + distance).map(|token| &token.kind),
            Some(TokenKind::Identifier { name, quoted: false }) if name.eq_ignore_ascii_case(keyword)
        )
    }

    fn peek_keyword(&self, keyword: &str) -> bool {
        self.peek_nth_keyword(0, keyword)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.position).cloned();
        if token.is_some() {
            self.position += 1;
        }
        token
    }

    fn offset(&self) -> usize {
        self.peek().map_or(self.end, |token| token.offset)
    }

    fn error(&self, message: impl Into<String>) -> QueryError {
        syntax(self.offset(), message)
    }

    fn eat_keyword(&mut self, keyword: &str) -> bool {
        if self.peek_keyword(keyword) {
            self.position += 1;
            true
        } else {
            false
        }
    }

    fn expect_keyword(&mut self, keyword: &str) -> Result<(), QueryError> {
        if self.eat_keyword(keyword) {
            Ok(())
        } else {
            Err(self.error(format!("expected '{keyword}'")))
        }
    }

    fn expect(&mut self, kind: &TokenKind, description: &str) -> Result<(), QueryError> {
        if self.peek_kind() == Some(kind) {
            self.position += 1;
            Ok(())
        } else {
            Err(self.error(format!("expected {description}")))
        }
    }

    fn parse_or(&mut self) -> Result<QueryExpr, QueryError> {
        let mut operands = vec![self.parse_and()?];
        while self.eat_keyword("or") {
            operands.push(self.parse_and()?);
        }
        Ok(collapse(operands, |operands| QueryExpr::Or { operands }))
    }

    fn parse_and(&mut self) -> Result<QueryExpr, QueryError> {
        let mut operands = vec![self.parse_unary()?];
        while self.eat_keyword("and") {
            operands.push(self.parse_unary()?);
        }
        Ok(collapse(operands, |operands| QueryExpr::And { operands }))
    }

    fn parse_unary(&mut self) -> Result<QueryExpr, QueryError> {
        if self.eat_keyword("not") {
            return Ok(!self.parse_unary()?);
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<QueryExpr, QueryError> {
        if self.peek_kind() == Some(&TokenKind::LeftParen) {
            let saved = self.position;
            self.position += 1;
            let group_error = match self.parse_or() {
                Ok(inner) if self.peek_kind() == Some(&TokenKind::RightParen) => {
                    self.position += 1;
                    if !self.at_predicate_continuation() {
                        return Ok(inner);
                    }
                    None
                }
                Ok(_) => Some(self.error("expected ')'")),
                Err(err) => Some(err),
            };
            self.position = saved;
            // Report whichever reading of the parenthesis got further.
            return self.parse_predicate().map_err(|err| match group_error {
                Some(group) if error_offset(&group) > error_offset(&err) => group,
                _ => err,
            });
        }

        if self.peek_keyword("present")
            && matches!(
                self.tokens.get(self.position + 1).map(|token| &token.kind),
                Some(TokenKind::LeftParen)
            )
        {
            self.position += 2;
            let attribute = self.expect_identifier()?;
            self.expect(&TokenKind::RightParen, "')'")?;
            return Ok(QueryExpr::present(attribute));
        }

        self.parse_predicate()
    }

    fn at_predicate_continuation(&self) -> bool {
        matches!(
            self.peek_kind(),
            Some(TokenKind::Compare(_) | TokenKind::Arithmetic(_))
        ) || ["between", "in", "like", "startswith", "endswith", "contains"]
            .iter()
            .any(|keyword| self.peek_keyword(keyword))
    }

    fn parse_predicate(&mut self) -> Result<QueryExpr, QueryError> {
        let start = self.offset();
        let left = self.parse_value()?;

        let negated = self.peek_keyword("not")
            && ["between", "in", "like", "startswith", "endswith", "contains"]
                .iter()
                .any(|keyword| self.peek_nth_keyword(1, keyword));
        if negated {
            self.position += 1;
        }

        let predicate = if let Some(TokenKind::Compare(op)) = self.peek_kind().cloned() {
            self.position += 1;
            let right = self.parse_value()?;
            QueryExpr::compare(left, op, right)
        } else if self.eat_keyword("between") {
            let low = self.parse_value()?;
            self.expect_keyword("and")?;
            let high = self.parse_value()?;
            QueryExpr::between(left, low, high)
        } else if self.eat_keyword("in") {
            QueryExpr::is_in(left, self.parse_value_list()?)
        } else if self.eat_keyword("like") {
            let attribute = require_attribute(left, start)?;
            let pattern = self.expect_string()?;
            QueryExpr::matches(attribute, &pattern)?
        } else if let Some(position) = self.eat_substring_keyword() {
            let attribute = require_attribute(left, start)?;
            let needle = self.expect_string()?;
            QueryExpr::substring(attribute, position, needle)
        } else if let ValueExpr::Constant {
            value: Value::Bool(value),
        } = left
        {
            QueryExpr::constant(value)
        } else {
            return Err(self.error("expected a comparison"));
        };

        Ok(if negated { !predicate } else { predicate })
    }

    fn eat_substring_keyword(&mut self) -> Option<SubstringPosition> {
        [
            SubstringPosition::Initial,
            SubstringPosition::Final,
            SubstringPosition::Any,
        ]
        .into_iter()
        .find(|position| self.eat_keyword(position.keyword()))
    }

    fn parse_value_list(&mut self) -> Result<Vec<ValueExpr>, QueryError> {
        self.expect(&TokenKind::LeftParen, "'('")?;
        let mut values = vec![self.parse_value()?];
        while self.peek_kind() == Some(&TokenKind::Comma) {
            self.position += 1;
            values.push(self.parse_value()?);
        }
        self.expect(&TokenKind::RightParen, "')'")?;
        Ok(values)
    }

    fn parse_value(&mut self) -> Result<ValueExpr, QueryError> {
        let mut left = self.parse_term()?;
        while let Some(TokenKind::Arithmetic(op @ (ArithmeticOp::Add | ArithmeticOp::Subtract))) =
            self.peek_kind().cloned()
        {
            self.position += 1;
            let right = self.parse_term()?;
            left = ValueExpr::arithmetic(op, left, right);
        }
        Ok(left)
    }

    fn parse_term(&mut self) -> Result<ValueExpr, QueryError> {
        let mut left = self.parse_factor()?;
        while let Some(TokenKind::Arithmetic(op @ (ArithmeticOp::Multiply | ArithmeticOp::Divide))) =
            self.peek_kind().cloned()
        {
            self.position += 1;
            let right = self.parse_factor()?;
            left = ValueExpr::arithmetic(op, left, right);
        }
        Ok(left)
    }

    fn parse_factor(&mut self) -> Result<ValueExpr, QueryError> {
        let offset = self.offset();
        let Some(token) = self.advance() else {
            return Err(syntax(offset, "expected a value"));
        };
        match token.kind {
            TokenKind::Identifier {
                name,
                quoted: false,
            } if is_keyword(&name) => keyword_literal(&name)
                .map(ValueExpr::constant)
                .ok_or_else(|| syntax(offset, format!("unexpected keyword '{name}'"))),
            TokenKind::Identifier { name, .. } => Ok(ValueExpr::attribute(name)),
            TokenKind::String(text) => Ok(ValueExpr::constant(text)),
            TokenKind::Number(number) => Ok(ValueExpr::constant(number)),
            TokenKind::Arithmetic(ArithmeticOp::Subtract) => self.parse_negation(offset),
            TokenKind::LeftParen => {
                let inner = self.parse_value()?;
                self.expect(&TokenKind::RightParen, "')'")?;
                Ok(inner)
            }
            _ => Err(syntax(offset, "expected a value")),
        }
    }

    fn parse_negation(&mut self, offset: usize) -> Result<ValueExpr, QueryError> {
        if let Some(TokenKind::Number(number)) = self.peek_kind().cloned() {
            self.position += 1;
            return negate(&number)
                .map(ValueExpr::constant)
                .ok_or_else(|| syntax(offset, "number literal cannot be negated"));
        }
        let operand = self.parse_factor()?;
        Ok(ValueExpr::arithmetic(
            ArithmeticOp::Subtract,
            ValueExpr::constant(0),
            operand,
        ))
    }

    fn expect_identifier(&mut self) -> Result<String, QueryError> {
        match self.peek_kind().cloned() {
            Some(TokenKind::Identifier { name, quoted }) if quoted || !is_keyword(&name) => {
                self.position += 1;
                Ok(name)
            }
            _ => Err(self.error("expected an attribute name")),
        }
    }

    fn expect_string(&mut self) -> Result<String, QueryError> {
        match self.peek_kind().cloned() {
            Some(TokenKind::String(text)) => {
                self.position += 1;
                Ok(text)
            }
            _ => Err(self.error("expected a string literal")),
        }
    }
}

fn collapse(
    mut operands: Vec<QueryExpr>,
    combine: impl FnOnce(Vec<QueryExpr>) -> QueryExpr,
) -> QueryExpr {
    if operands.len() == 1 {
        if let Some(single) = operands.pop() {
            return single;
        }
    }
    combine(operands)
}

const fn error_offset(error: &QueryError) -> usize {
    match error {
        QueryError::Syntax { offset, .. } => *offset,
        _ => usize::MAX,
    }
}

fn require_attribute(value: ValueExpr, offset: usize) -> Result<String, QueryError> {
    match value {
        ValueExpr::Attribute { name } => Ok(name),
        _ => Err(syntax(offset, "string operators apply to attribute names")),
    }
}

fn keyword_literal(name: &str) -> Option<Value> {
    match name.to_ascii_lowercase().as_str() {
        "true" => Some(Value::Bool(true)),
        "false" => Some(Value::Bool(false)),
        "null" => Some(Value::Null),
        _ => None,
    }
}

#[expect(
    clippy::float_arithmetic,
    reason = "negative float literals are lexed as a minus sign and a magnitude"
)]
fn negate(number: &Number) -> Option<Number> {
    if let Some(integer) = number.as_i64() {
        return integer.checked_neg().map(Number::from);
    }
    number.as_f64().and_then(|float| Number::from_f64(-float))
}
