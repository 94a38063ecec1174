//! Lisp evaluator.
//!
//! This is a recursive tree-walker. Each expression is evaluated against a
//! frame; closures get a fresh child of the frame they were defined in.
//! There is no tail-call elimination, so deeply recursive Lisp programs
//! consume a proportional amount of the host's stack.

use crate::data::{Closure, Frame, Value};
use crate::reader::{self, SyntaxError};

mod builtins;
mod forms;

#[cfg(test)]
mod stdlib_test;

pub use builtins::global_frame;

/// A Builtin is a native procedure: it receives evaluated arguments and checks its own arity.
pub type Builtin = fn(args: &[Value]) -> Result<Value, Error>;

/// Errors that abort evaluation.
///
/// There is no way to catch these from within Lisp; they always propagate to the host.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    Syntax(SyntaxError),
    UndefinedSymbol(String),
    NotCallable(String),
    WrongArgumentType {
        procedure: String,
        expected: &'static str,
        got: String,
    },
    Arity {
        procedure: String,
        expected: String,
        got: usize,
    },
    DivisionByZero,
    Overflow(&'static str),
}

impl Error {
    /// Name of this error within the dialect's error taxonomy.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Syntax(e) => e.kind(),
            Error::UndefinedSymbol(_) => "NameError:UndefinedSymbol",
            Error::NotCallable(_) => "TypeError:NotCallable",
            Error::WrongArgumentType { .. } => "TypeError:WrongArgumentType",
            Error::Arity { .. } => "ArityError",
            Error::DivisionByZero => "ArithmeticError:DivisionByZero",
            Error::Overflow(_) => "ArithmeticError:Overflow",
        }
    }

    pub(crate) fn wrong_type(procedure: &str, expected: &'static str, got: &Value) -> Self {
        Error::WrongArgumentType {
            procedure: procedure.to_owned(),
            expected,
            got: format!("{} {}", got.type_name(), got),
        }
    }

    pub(crate) fn arity(procedure: &str, expected: impl ToString, got: usize) -> Self {
        Error::Arity {
            procedure: procedure.to_owned(),
            expected: expected.to_string(),
            got,
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: ", self.kind())?;
        match self {
            Error::Syntax(e) => write!(f, "{e}"),
            Error::UndefinedSymbol(s) => write!(f, "symbol {s} is not bound"),
            Error::NotCallable(v) => write!(f, "{v} is not a procedure"),
            Error::WrongArgumentType {
                procedure,
                expected,
                got,
            } => write!(f, "{procedure} expects {expected}, got {got}"),
            Error::Arity {
                procedure,
                expected,
                got,
            } => write!(f, "{procedure} expects {expected} arguments, got {got}"),
            Error::DivisionByZero => write!(f, "division by zero"),
            Error::Overflow(op) => write!(f, "integer overflow in {op}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Syntax(e) => Some(e),
            _ => None,
        }
    }
}

impl From<SyntaxError> for Error {
    fn from(value: SyntaxError) -> Self {
        Error::Syntax(value)
    }
}

/// Evaluate `expr` in `frame`.
pub fn eval(expr: &Value, frame: &Frame) -> Result<Value, Error> {
    match expr {
        Value::Symbol(symbol) => frame
            .get(*symbol)
            .ok_or_else(|| Error::UndefinedSymbol(symbol.name())),
        Value::List(items) if !items.is_empty() => {
            let (head, operands) = (&items[0], &items[1..]);
            if let Some(form) = head.as_symbol().and_then(forms::lookup) {
                return form(operands, frame);
            }
            let procedure = eval(head, frame)?;
            let args = operands
                .iter()
                .map(|operand| eval(operand, frame))
                .collect::<Result<Vec<_>, _>>()?;
            apply(&procedure, &args)
        }
        // Everything else, including NIL, evaluates to itself.
        _ => Ok(expr.clone()),
    }
}

/// Call `procedure` with already-evaluated `args`.
pub fn apply(procedure: &Value, args: &[Value]) -> Result<Value, Error> {
    match procedure {
        Value::Native(native) => (native.func)(args),
        Value::Closure(closure) => call_closure(closure, args),
        other => Err(Error::NotCallable(other.to_string())),
    }
}

fn call_closure(closure: &Closure, args: &[Value]) -> Result<Value, Error> {
    let lambda = &closure.lambda;
    if lambda.params.len() != args.len() {
        let name = lambda
            .name
            .map(|n| n.name())
            .unwrap_or_else(|| "lambda".to_owned());
        return Err(Error::arity(&name, lambda.params.len(), args.len()));
    }
    tracing::trace!(name = ?lambda.name, args = args.len(), "applying closure");

    // Static scoping: the new frame hangs off the closure's frame, not the caller's.
    let frame = closure.frame.child();
    for (param, arg) in lambda.params.iter().zip(args) {
        frame.bind_local(*param, arg.clone());
    }
    eval(&lambda.body, &frame)
}

/// A top-level evaluation environment: a session.
///
/// Each environment owns its own global frame, seeded with the builtins.
/// Definitions persist across calls to `run` on the same environment,
/// but are never shared between environments.
///
/// Dropping the environment clears its global frame. Procedures the host kept
/// from a dropped environment can still be applied, but no longer see its
/// global definitions.
pub struct EvalEnvironment {
    global: Frame,
}

impl Drop for EvalEnvironment {
    fn drop(&mut self) {
        tracing::trace!("releasing global frame");
        self.global.clear();
    }
}

impl Default for EvalEnvironment {
    fn default() -> Self {
        Self::new()
    }
}

impl EvalEnvironment {
    pub fn new() -> Self {
        EvalEnvironment {
            global: global_frame(),
        }
    }

    /// The global frame of this environment.
    pub fn global(&self) -> &Frame {
        &self.global
    }

    /// Read and evaluate each expression in `source`, in order.
    ///
    /// Returns the value of the last expression (NIL if there are none).
    /// Stops at the first error; output already printed stays printed.
    pub fn run(&self, source: &str) -> Result<Value, Error> {
        let program = reader::loads(source)?;
        let mut last = Value::nil();
        for expr in program.iter() {
            tracing::debug!(%expr, "evaluating top-level expression");
            last = eval(expr, &self.global)?;
        }
        Ok(last)
    }

    /// Evaluate an already-parsed expression in the global frame.
    pub fn eval(&self, expr: &Value) -> Result<Value, Error> {
        eval(expr, &self.global)
    }
}
