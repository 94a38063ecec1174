//! Recursive-descent parser, from tokens to values.

use std::iter::Peekable;

use super::{ReadResult, SyntaxError, Token, MAX_DEPTH};
use crate::data::Value;

/// Parse a single expression off the front of the token stream.
///
/// ```text
/// expr := atom | '(' expr* ')' | "'" expr
/// ```
pub fn parse<I>(tokens: &mut Peekable<I>) -> ReadResult<Value>
where
    I: Iterator<Item = Token>,
{
    parse_nested(tokens, 0)
}

fn parse_nested<I>(tokens: &mut Peekable<I>, depth: usize) -> ReadResult<Value>
where
    I: Iterator<Item = Token>,
{
    let token = tokens.next().ok_or(SyntaxError::UnexpectedEof)?;
    match token.as_str() {
        "(" | "'" if depth >= MAX_DEPTH => Err(SyntaxError::TooDeep {
            line: token.line,
            column: token.column,
        }),
        "(" => {
            let mut items = Vec::new();
            loop {
                match tokens.peek() {
                    None => return Err(SyntaxError::UnexpectedEof),
                    Some(t) if t.as_str() == ")" => {
                        tokens.next();
                        return Ok(Value::list(items));
                    }
                    Some(_) => items.push(parse_nested(tokens, depth + 1)?),
                }
            }
        }
        ")" => Err(SyntaxError::UnexpectedCloseParen {
            line: token.line,
            column: token.column,
        }),
        "'" => {
            let quoted = parse_nested(tokens, depth + 1)?;
            Ok(Value::list([Value::symbol("quote"), quoted]))
        }
        _ => Ok(atom(token.as_str())),
    }
}

/// Classify a single token: integer, then float, then string, then symbol.
fn atom(token: &str) -> Value {
    if let Ok(i) = token.parse() {
        return Value::Integer(i);
    }
    if let Ok(f) = token.parse() {
        return Value::Float(f);
    }
    if token.len() >= 2 && token.starts_with('"') && token.ends_with('"') {
        return Value::string(&token[1..token.len() - 1]);
    }
    Value::symbol(token)
}
