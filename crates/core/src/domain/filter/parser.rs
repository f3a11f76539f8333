// Filter query parser
//
// expr      := or
// or        := and ( "or" and )*
// and       := unary ( "and" unary )*
// unary     := "(" expr ")" | predicate
// predicate := FIELD OP value

use crate::domain::filter::{Field, FieldType, FilterExpression, Operator, ParseError, Predicate, Value};
use crate::domain::JobLevel;

/// Maximum parenthesis nesting
pub const MAX_DEPTH: usize = 64;

/// Maximum predicates in one filter; SQLite caps expression tree depth at 1000
pub const MAX_PREDICATES: usize = 256;

#[derive(Debug, Clone, PartialEq)]
enum TokenKind {
    Ident(String),
    Number(String),
    Str(String),
    Op(Operator),
    LParen,
    RParen,
    End,
}

impl TokenKind {
    fn describe(&self) -> String {
        match self {
            TokenKind::Ident(s) => format!("'{}'", s),
            TokenKind::Number(n) => format!("number {}", n),
            TokenKind::Str(_) => "string".to_string(),
            TokenKind::Op(op) => format!("operator '{}'", op),
            TokenKind::LParen => "'('".to_string(),
            TokenKind::RParen => "')'".to_string(),
            TokenKind::End => "end of filter".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
struct Token {
    kind: TokenKind,
    position: usize,
}

struct Lexer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        self.input[self.pos..].chars().nth(1)
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn eat_while(&mut self, pred: impl Fn(char) -> bool) {
        while self.peek().is_some_and(&pred) {
            self.bump();
        }
    }

    fn tokenize(mut self) -> Result<Vec<Token>, ParseError> {
        let mut tokens = Vec::new();

        while let Some(ch) = self.peek() {
            let start = self.pos;
            let kind = match ch {
                c if c.is_whitespace() => {
                    self.bump();
                    continue;
                }
                '(' => {
                    self.bump();
                    TokenKind::LParen
                }
                ')' => {
                    self.bump();
                    TokenKind::RParen
                }
                ':' => {
                    self.bump();
                    TokenKind::Op(Operator::Eq)
                }
                '!' => {
                    self.bump();
                    TokenKind::Op(Operator::Ne)
                }
                '~' => {
                    self.bump();
                    TokenKind::Op(Operator::Like)
                }
                '>' | '<' => {
                    self.bump();
                    let or_equal = self.peek() == Some(':');
                    if or_equal {
                        self.bump();
                    }
                    TokenKind::Op(match (ch, or_equal) {
                        ('>', false) => Operator::Gt,
                        ('>', true) => Operator::Ge,
                        ('<', false) => Operator::Lt,
                        _ => Operator::Le,
                    })
                }
                '\'' | '"' => TokenKind::Str(self.string(ch)?),
                c if c.is_ascii_digit()
                    || (c == '-' && self.peek_second().is_some_and(|d| d.is_ascii_digit())) =>
                {
                    self.bump();
                    self.eat_while(|d| d.is_ascii_digit());
                    if self.peek() == Some('.')
                        && self.peek_second().is_some_and(|d| d.is_ascii_digit())
                    {
                        self.bump();
                        self.eat_while(|d| d.is_ascii_digit());
                    }
                    TokenKind::Number(self.input[start..self.pos].to_string())
                }
                c if c.is_alphabetic() || c == '_' => {
                    self.eat_while(|d| d.is_alphanumeric() || d == '_');
                    TokenKind::Ident(self.input[start..self.pos].to_string())
                }
                other => {
                    return Err(ParseError::UnexpectedChar {
                        ch: other,
                        position: start,
                    })
                }
            };
            tokens.push(Token {
                kind,
                position: start,
            });
        }

        tokens.push(Token {
            kind: TokenKind::End,
            position: self.input.len(),
        });
        Ok(tokens)
    }

    /// Quoted string; backslash escapes the next character
    fn string(&mut self, quote: char) -> Result<String, ParseError> {
        let start = self.pos;
        self.bump();
        let mut out = String::new();
        loop {
            match self.bump() {
                None => return Err(ParseError::UnterminatedString(start)),
                Some('\\') => match self.bump() {
                    Some(escaped) => out.push(escaped),
                    None => return Err(ParseError::UnterminatedString(start)),
                },
                Some(c) if c == quote => return Ok(out),
                Some(c) => out.push(c),
            }
        }
    }
}

struct Parser {
    tokens: Vec<Token>,
    cursor: usize,
    predicates: usize,
}

/// Parse a filter query string into a FilterExpression.
///
/// A blank query yields [`FilterExpression::All`].
pub fn parse(input: &str) -> Result<FilterExpression, ParseError> {
    if input.trim().is_empty() {
        return Ok(FilterExpression::All);
    }

    let tokens = Lexer::new(input).tokenize()?;
    let mut parser = Parser {
        tokens,
        cursor: 0,
        predicates: 0,
    };
    let expr = parser.parse_or(0)?;

    let trailing = parser.peek();
    if trailing.kind != TokenKind::End {
        return Err(unexpected(trailing, "'and', 'or' or end of filter"));
    }
    Ok(expr)
}

fn unexpected(token: &Token, expected: &'static str) -> ParseError {
    ParseError::UnexpectedToken {
        found: token.kind.describe(),
        expected,
        position: token.position,
    }
}

impl Parser {
    fn peek(&self) -> &Token {
        // tokenize() always terminates the stream with End
        &self.tokens[self.cursor.min(self.tokens.len() - 1)]
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if self.cursor < self.tokens.len() - 1 {
            self.cursor += 1;
        }
        token
    }

    fn at_keyword(&self, keyword: &str) -> bool {
        matches!(&self.peek().kind, TokenKind::Ident(word) if word.eq_ignore_ascii_case(keyword))
    }

    fn parse_or(&mut self, depth: usize) -> Result<FilterExpression, ParseError> {
        let mut children = vec![self.parse_and(depth)?];
        while self.at_keyword("or") {
            self.advance();
            children.push(self.parse_and(depth)?);
        }
        Ok(if children.len() == 1 {
            children.remove(0)
        } else {
            FilterExpression::Or(children)
        })
    }

    fn parse_and(&mut self, depth: usize) -> Result<FilterExpression, ParseError> {
        let mut children = vec![self.parse_unary(depth)?];
        while self.at_keyword("and") {
            self.advance();
            children.push(self.parse_unary(depth)?);
        }
        Ok(if children.len() == 1 {
            children.remove(0)
        } else {
            FilterExpression::And(children)
        })
    }

    fn parse_unary(&mut self, depth: usize) -> Result<FilterExpression, ParseError> {
        if self.peek().kind != TokenKind::LParen {
            return self.parse_predicate();
        }
        if depth >= MAX_DEPTH {
            return Err(ParseError::TooDeep(MAX_DEPTH));
        }

        self.advance();
        let inner = self.parse_or(depth + 1)?;
        let closing = self.advance();
        if closing.kind != TokenKind::RParen {
            return Err(unexpected(&closing, "')'"));
        }
        Ok(inner)
    }

    fn parse_predicate(&mut self) -> Result<FilterExpression, ParseError> {
        self.predicates += 1;
        if self.predicates > MAX_PREDICATES {
            return Err(ParseError::TooManyPredicates(MAX_PREDICATES));
        }

        let token = self.advance();
        let TokenKind::Ident(name) = &token.kind else {
            return Err(unexpected(&token, "a field name"));
        };
        let field = Field::from_name(name).ok_or_else(|| ParseError::UnknownField {
            field: name.clone(),
            position: token.position,
        })?;

        let token = self.advance();
        let TokenKind::Op(op) = token.kind else {
            return Err(unexpected(&token, "an operator (: ! > >: < <: ~)"));
        };
        if !field.supports(op) {
            return Err(ParseError::UnsupportedOperator {
                field: field.name().to_string(),
                op: op.symbol().to_string(),
            });
        }

        let token = self.advance();
        let value = coerce(field, &token)?;
        FilterExpression::predicate(field, op, value)
    }
}

/// Coerce a literal token to the field's declared type
fn coerce(field: Field, token: &Token) -> Result<Value, ParseError> {
    let raw = match &token.kind {
        TokenKind::Ident(word) if word.eq_ignore_ascii_case("null") => return Ok(Value::Null),
        TokenKind::Ident(raw) | TokenKind::Number(raw) | TokenKind::Str(raw) => raw,
        _ => return Err(unexpected(token, "a value")),
    };

    let field_type = field.field_type();
    let invalid = || ParseError::InvalidValue {
        field: field.name().to_string(),
        value: raw.clone(),
        expected: field_type.describe(),
    };

    let value = match field_type {
        FieldType::Integer => Value::Int(raw.trim().parse::<i64>().map_err(|_| invalid())?),
        FieldType::Float => {
            let x = raw.trim().parse::<f64>().map_err(|_| invalid())?;
            if !x.is_finite() {
                return Err(invalid());
            }
            Value::Float(x)
        }
        FieldType::Text | FieldType::SkillSet => Value::Text(raw.clone()),
        FieldType::Boolean => match raw.trim() {
            b if b.eq_ignore_ascii_case("true") => Value::Bool(true),
            b if b.eq_ignore_ascii_case("false") => Value::Bool(false),
            _ => return Err(invalid()),
        },
        FieldType::Level => Value::Level(raw.parse::<JobLevel>().map_err(|_| invalid())?),
    };
    Ok(value)
}
