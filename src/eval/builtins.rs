use std::cmp::Ordering;

use crate::data::{Frame, Native, Symbol, Value};
use crate::eval::{Builtin, Error};

/// The standard library of native procedures.
/// These are ordinary values: they're looked up in the global frame,
/// and receive already-evaluated arguments.
pub const BUILTINS: &[(&str, Builtin)] = &[
    ("+", builtin_add),
    ("-", builtin_sub),
    ("*", builtin_mul),
    ("/", builtin_div),
    ("<", builtin_lt),
    (">", builtin_gt),
    ("<=", builtin_le),
    (">=", builtin_ge),
    ("=", builtin_num_eq),
    ("cons", builtin_cons),
    ("car", builtin_car),
    ("cdr", builtin_cdr),
    ("atom", builtin_atom),
    ("eq", builtin_eq),
    ("print", builtin_print),
    ("list", builtin_list),
    ("null?", builtin_null),
    ("list?", builtin_listp),
];

/// Declare the base environment (builtins, constants, and their symbols)
/// and return it.
pub fn global_frame() -> Frame {
    let frame = Frame::root();
    for (name, func) in BUILTINS {
        frame.bind_local(Symbol::new(name), Native { name: *name, func: *func }.into());
    }
    for (name, value) in [
        ("T", Value::True),
        ("true", Value::True),
        ("NIL", Value::nil()),
        ("nil", Value::nil()),
        ("false", Value::nil()),
    ] {
        frame.bind_local(Symbol::new(name), value);
    }
    frame
}

/// Get exactly N arguments to a builtin.
fn get_args<'a, const N: usize>(name: &str, args: &'a [Value]) -> Result<&'a [Value; N], Error> {
    args.try_into().map_err(|_| Error::arity(name, N, args.len()))
}

#[derive(Debug, Clone, Copy)]
enum Number {
    Integer(i64),
    Float(f64),
}

impl Number {
    fn from_value(procedure: &str, value: &Value) -> Result<Number, Error> {
        match value {
            Value::Integer(i) => Ok(Number::Integer(*i)),
            Value::Float(f) => Ok(Number::Float(*f)),
            other => Err(Error::wrong_type(procedure, "a number", other)),
        }
    }

    fn as_float(self) -> f64 {
        match self {
            Number::Integer(i) => i as f64,
            Number::Float(f) => f,
        }
    }

    fn is_zero(self) -> bool {
        match self {
            Number::Integer(i) => i == 0,
            Number::Float(f) => f == 0.0,
        }
    }

    /// Integers stay integers, unless the other side is a float.
    fn combine(
        self,
        other: Number,
        op: &'static str,
        int_op: fn(i64, i64) -> Option<i64>,
        float_op: fn(f64, f64) -> f64,
    ) -> Result<Number, Error> {
        match (self, other) {
            (Number::Integer(a), Number::Integer(b)) => int_op(a, b)
                .map(Number::Integer)
                .ok_or(Error::Overflow(op)),
            (a, b) => Ok(Number::Float(float_op(a.as_float(), b.as_float()))),
        }
    }

    fn divide(self, other: Number) -> Result<Number, Error> {
        if other.is_zero() {
            return Err(Error::DivisionByZero);
        }
        match (self, other) {
            // Exact integer division stays integral; anything else becomes a float.
            (Number::Integer(a), Number::Integer(b)) => match a.checked_rem(b) {
                Some(0) => a
                    .checked_div(b)
                    .map(Number::Integer)
                    .ok_or(Error::Overflow("/")),
                Some(_) => Ok(Number::Float(a as f64 / b as f64)),
                None => Err(Error::Overflow("/")),
            },
            (a, b) => Ok(Number::Float(a.as_float() / b.as_float())),
        }
    }

    fn compare(self, other: Number) -> Option<Ordering> {
        match (self, other) {
            (Number::Integer(a), Number::Integer(b)) => Some(a.cmp(&b)),
            (a, b) => a.as_float().partial_cmp(&b.as_float()),
        }
    }
}

impl From<Number> for Value {
    fn from(value: Number) -> Self {
        match value {
            Number::Integer(i) => Value::Integer(i),
            Number::Float(f) => Value::Float(f),
        }
    }
}

fn numbers(procedure: &str, args: &[Value]) -> Result<Vec<Number>, Error> {
    args.iter()
        .map(|v| Number::from_value(procedure, v))
        .collect()
}

fn builtin_add(args: &[Value]) -> Result<Value, Error> {
    let mut sum = Number::Integer(0);
    for n in numbers("+", args)? {
        sum = sum.combine(n, "+", i64::checked_add, |a, b| a + b)?;
    }
    Ok(sum.into())
}

fn builtin_sub(args: &[Value]) -> Result<Value, Error> {
    let numbers = numbers("-", args)?;
    match numbers.as_slice() {
        [] => Err(Error::arity("-", "at least 1", 0)),
        [only] => Number::Integer(0)
            .combine(*only, "-", i64::checked_sub, |a, b| a - b)
            .map(Value::from),
        [first, rest @ ..] => {
            let mut difference = *first;
            for n in rest {
                difference = difference.combine(*n, "-", i64::checked_sub, |a, b| a - b)?;
            }
            Ok(difference.into())
        }
    }
}

fn builtin_mul(args: &[Value]) -> Result<Value, Error> {
    let mut product = Number::Integer(1);
    for n in numbers("*", args)? {
        product = product.combine(n, "*", i64::checked_mul, |a, b| a * b)?;
    }
    Ok(product.into())
}

fn builtin_div(args: &[Value]) -> Result<Value, Error> {
    let numbers = numbers("/", args)?;
    let Some((first, rest)) = numbers.split_first() else {
        return Err(Error::arity("/", "at least 1", 0));
    };
    let mut quotient = *first;
    for n in rest {
        quotient = quotient.divide(*n)?;
    }
    Ok(quotient.into())
}

fn compare(name: &str, args: &[Value], accept: fn(Ordering) -> bool) -> Result<Value, Error> {
    let [a, b] = get_args::<2>(name, args)?;
    let a = Number::from_value(name, a)?;
    let b = Number::from_value(name, b)?;
    // NaN compares as neither less, greater, nor equal.
    Ok(a.compare(b).is_some_and(accept).into())
}

fn builtin_lt(args: &[Value]) -> Result<Value, Error> {
    compare("<", args, Ordering::is_lt)
}

fn builtin_gt(args: &[Value]) -> Result<Value, Error> {
    compare(">", args, Ordering::is_gt)
}

fn builtin_le(args: &[Value]) -> Result<Value, Error> {
    compare("<=", args, Ordering::is_le)
}

fn builtin_ge(args: &[Value]) -> Result<Value, Error> {
    compare(">=", args, Ordering::is_ge)
}

/// Unlike the ordering comparisons, `=` accepts any values. It agrees with `eq`.
fn builtin_num_eq(args: &[Value]) -> Result<Value, Error> {
    let [a, b] = get_args::<2>("=", args)?;
    Ok(equal(a, b).into())
}

/// Create a new list, with `a` in front of list `b`.
fn builtin_cons(args: &[Value]) -> Result<Value, Error> {
    let [a, b] = get_args::<2>("cons", args)?;
    let Some(tail) = b.as_list() else {
        return Err(Error::wrong_type("cons", "a list as its second argument", b));
    };
    Ok(Value::list(std::iter::once(a.clone()).chain(tail.iter().cloned())))
}

// car and cdr of anything that isn't a non-empty list is NIL, not an error.
fn builtin_car(args: &[Value]) -> Result<Value, Error> {
    let [a] = get_args::<1>("car", args)?;
    match a.as_list() {
        Some([first, ..]) => Ok(first.clone()),
        _ => Ok(Value::nil()),
    }
}

fn builtin_cdr(args: &[Value]) -> Result<Value, Error> {
    let [a] = get_args::<1>("cdr", args)?;
    match a.as_list() {
        Some([_, rest @ ..]) => Ok(Value::list(rest.iter().cloned())),
        _ => Ok(Value::nil()),
    }
}

fn builtin_atom(args: &[Value]) -> Result<Value, Error> {
    let [a] = get_args::<1>("atom", args)?;
    Ok(a.is_atom().into())
}

/// Structural equality, where integers and floats compare numerically at any depth.
fn equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Integer(i), Value::Float(f)) | (Value::Float(f), Value::Integer(i)) => {
            *i as f64 == *f
        }
        (Value::List(a), Value::List(b)) => {
            a.len() == b.len() && a.iter().zip(b.iter()).all(|(a, b)| equal(a, b))
        }
        (a, b) => a == b,
    }
}

/// Return true/false based on the (two) arguments' value equality.
fn builtin_eq(args: &[Value]) -> Result<Value, Error> {
    let [a, b] = get_args::<2>("eq", args)?;
    Ok(equal(a, b).into())
}

fn builtin_print(args: &[Value]) -> Result<Value, Error> {
    let [a] = get_args::<1>("print", args)?;
    println!("{a}");
    Ok(a.clone())
}

fn builtin_list(args: &[Value]) -> Result<Value, Error> {
    Ok(Value::list(args.iter().cloned()))
}

fn builtin_null(args: &[Value]) -> Result<Value, Error> {
    let [a] = get_args::<1>("null?", args)?;
    Ok(a.is_nil().into())
}

fn builtin_listp(args: &[Value]) -> Result<Value, Error> {
    let [a] = get_args::<1>("list?", args)?;
    Ok(a.is_list().into())
}
