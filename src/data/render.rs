//! Printing values back out as Lisp text.
//!
//! The rendered form of any atom (other than a procedure) reads back as the same atom.
//! Quoting is not preserved: `'(a b)` evaluates to a list that renders as `(a b)`.

use std::fmt::{self, Display, Formatter};

use super::Value;

/// Render the value as Lisp text.
pub fn render(value: &Value) -> String {
    value.to_string()
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(i) => write!(f, "{i}"),
            // Debug formatting keeps the trailing ".0", so floats read back as floats.
            Value::Float(v) => write!(f, "{v:?}"),
            Value::String(s) => write!(f, "\"{s}\""),
            Value::Symbol(s) => write!(f, "{s}"),
            Value::True => f.write_str("T"),
            Value::List(items) if items.is_empty() => f.write_str("NIL"),
            Value::List(items) => {
                f.write_str("(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str(")")
            }
            Value::Closure(closure) => match closure.lambda.name {
                Some(name) => write!(f, "#<closure {name}>"),
                None => {
                    let params = closure.lambda.params.iter().map(|p| Value::Symbol(*p));
                    let params = Value::list(params);
                    write!(f, "#<lambda {params}>")
                }
            },
            Value::Native(native) => write!(f, "#<native {}>", native.name),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::loads;

    #[test]
    fn render_atoms() {
        assert_eq!(render(&Value::nil()), "NIL");
        assert_eq!(render(&Value::True), "T");
        assert_eq!(render(&Value::Integer(-12)), "-12");
        assert_eq!(render(&Value::Float(2.0)), "2.0");
        assert_eq!(render(&Value::Float(0.25)), "0.25");
        assert_eq!(render(&Value::string("hi")), "\"hi\"");
        assert_eq!(render(&Value::symbol("car")), "car");
    }

    #[test]
    fn render_nested() {
        let v = Value::list([
            Value::Integer(1),
            Value::list([Value::symbol("a"), Value::nil()]),
            Value::True,
        ]);
        assert_eq!(render(&v), "(1 (a NIL) T)");
    }

    #[test]
    fn round_trip() {
        let values = [
            Value::Integer(42),
            Value::Integer(-7),
            Value::Float(3.5),
            Value::Float(-2.0),
            Value::Float(1e300),
            Value::string("text"),
            Value::symbol("tree->list"),
            Value::list([
                Value::symbol("f"),
                Value::list([Value::Integer(1), Value::Float(0.5)]),
                Value::string("s"),
            ]),
        ];
        for v in values {
            let text = render(&v);
            let got = loads(&text).unwrap();
            assert_eq!(got, vec![v], "round trip of {text}");
        }
    }
}
