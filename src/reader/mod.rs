//! Support for reading Lisp expressions from strings.

use crate::data::Value;

mod parse;
mod token;

pub use parse::parse;
pub use token::{tokenize, Token};

/// How deeply lists and quotes may nest before the reader rejects the input.
pub const MAX_DEPTH: usize = 1024;

/// Parse the string as a sequence of top-level Lisp expressions (i.e. a program).
pub fn loads(input: &str) -> ReadResult<Vec<Value>> {
    let mut tokens = tokenize(input).into_iter().peekable();
    let mut program = Vec::new();
    while tokens.peek().is_some() {
        program.push(parse(&mut tokens)?);
    }
    Ok(program)
}

/// Error type if a read does not complete.
///
/// A reader may experience a true parsing error, e.g. "())", that no additional input can fix.
/// This is distinct from a reader that gets an unexpected end-of-input, e.g. "(()":
/// it may be that more input will fix the issue.
///
/// `MalformedClause` and `MalformedForm` are never produced by the reader itself;
/// they're raised by the evaluator, when a special form has the wrong shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyntaxError {
    UnexpectedEof,
    UnexpectedCloseParen { line: usize, column: usize },
    TooDeep { line: usize, column: usize },
    MalformedClause(String),
    MalformedForm(String),
}

impl SyntaxError {
    /// True if more input might complete the expression.
    pub fn is_incomplete(&self) -> bool {
        matches!(self, SyntaxError::UnexpectedEof)
    }

    /// Name of this error within the dialect's error taxonomy.
    pub fn kind(&self) -> &'static str {
        match self {
            SyntaxError::UnexpectedEof => "SyntaxError:UnexpectedEOF",
            SyntaxError::UnexpectedCloseParen { .. } => "SyntaxError:UnexpectedCloseParen",
            SyntaxError::TooDeep { .. } => "SyntaxError:NestingTooDeep",
            SyntaxError::MalformedClause(_) => "SyntaxError:MalformedClause",
            SyntaxError::MalformedForm(_) => "SyntaxError:MalformedForm",
        }
    }
}

impl std::fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyntaxError::UnexpectedEof => write!(f, "incomplete input: unexpected end of input"),
            SyntaxError::UnexpectedCloseParen { line, column } => {
                write!(f, "error in input: unexpected ) at line {line} column {column}")
            }
            SyntaxError::TooDeep { line, column } => write!(
                f,
                "error in input: nested more than {MAX_DEPTH} deep at line {line} column {column}"
            ),
            SyntaxError::MalformedClause(clause) => {
                write!(f, "cond clause {clause} is not a (test expression) pair")
            }
            SyntaxError::MalformedForm(e) => write!(f, "malformed special form: {e}"),
        }
    }
}

impl std::error::Error for SyntaxError {}

/// The main result type for this module:
/// a T (token, expression, etc), or an error.
pub type ReadResult<T> = Result<T, SyntaxError>;
