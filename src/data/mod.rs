//! Lisp data types.
//!
//! The language is homoiconic: the same `Value` type is produced by the reader
//! and manipulated by the evaluator.
//!
//! -   Integer, Float: i64 / f64 primitives.
//! -   String: immutable text.
//! -   Symbol: an interned name.
//! -   True: the boolean-true sentinel, printed as `T`.
//! -   List: an ordered sequence of values. The empty list is NIL,
//!     which is also boolean-false; there is no separate null type.
//! -   Closure, Native: procedures.
//!
//! Lists, strings, and procedures are reference-counted, so cloning a value is cheap.

use std::rc::Rc;

mod frame;
mod render;
mod symbol;

pub use frame::{Frame, WeakFrame};
pub use render::render;
pub use symbol::Symbol;

use crate::eval::Builtin;

pub type Integer = i64;
pub type Float = f64;

/// Enum for a Lisp object.
#[derive(Clone)]
pub enum Value {
    Integer(Integer),
    Float(Float),
    String(Rc<str>),
    Symbol(Symbol),
    True,
    List(Rc<[Value]>),
    Closure(Closure),
    Native(Native),
}

/// A user-defined procedure, closed over the frame it was created in.
#[derive(Clone)]
pub struct Closure {
    pub lambda: Rc<Lambda>,
    pub frame: Frame,
}

/// The code of a user-defined procedure.
pub struct Lambda {
    /// Set for procedures created by `defun`; anonymous lambdas have no name.
    pub name: Option<Symbol>,
    pub params: Vec<Symbol>,
    pub body: Value,
}

/// A procedure implemented by the host.
#[derive(Clone, Copy)]
pub struct Native {
    pub name: &'static str,
    pub func: Builtin,
}

impl Value {
    /// The empty list: NIL.
    pub fn nil() -> Self {
        Value::List(Rc::from([]))
    }

    pub fn list(items: impl IntoIterator<Item = Value>) -> Self {
        Value::List(items.into_iter().collect())
    }

    pub fn symbol(name: &str) -> Self {
        Value::Symbol(Symbol::new(name))
    }

    pub fn string(s: &str) -> Self {
        Value::String(Rc::from(s))
    }

    #[inline]
    pub fn is_nil(&self) -> bool {
        matches!(self, Value::List(items) if items.is_empty())
    }

    /// Anything but NIL is true.
    #[inline]
    pub fn is_truthy(&self) -> bool {
        !self.is_nil()
    }

    #[inline]
    pub fn is_list(&self) -> bool {
        matches!(self, Value::List(_))
    }

    /// Atoms are everything except non-empty lists.
    #[inline]
    pub fn is_atom(&self) -> bool {
        !matches!(self, Value::List(items) if !items.is_empty())
    }

    pub fn as_symbol(&self) -> Option<Symbol> {
        match self {
            Value::Symbol(s) => Some(*s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(&items[..]),
            _ => None,
        }
    }

    /// Human-readable name of this value's type, for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Symbol(_) => "symbol",
            Value::True => "boolean",
            Value::List(items) if items.is_empty() => "nil",
            Value::List(_) => "list",
            Value::Closure(_) => "closure",
            Value::Native(_) => "native procedure",
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::nil()
    }
}

/// Structural equality. Closures are equal when they share code and frame.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Symbol(a), Value::Symbol(b)) => a == b,
            (Value::True, Value::True) => true,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Closure(a), Value::Closure(b)) => {
                Rc::ptr_eq(&a.lambda, &b.lambda) && a.frame.ptr_eq(&b.frame)
            }
            (Value::Native(a), Value::Native(b)) => a.name == b.name,
            (_, _) => false,
        }
    }
}

impl From<Integer> for Value {
    fn from(value: Integer) -> Self {
        Value::Integer(value)
    }
}

impl From<Float> for Value {
    fn from(value: Float) -> Self {
        Value::Float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        if value {
            Value::True
        } else {
            Value::nil()
        }
    }
}

impl From<Symbol> for Value {
    fn from(value: Symbol) -> Self {
        Value::Symbol(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::List(value.into())
    }
}

impl From<Closure> for Value {
    fn from(value: Closure) -> Self {
        Value::Closure(value)
    }
}

impl From<Native> for Value {
    fn from(value: Native) -> Self {
        Value::Native(value)
    }
}
