use std::rc::Rc;

use crate::data::{Closure, Frame, Lambda, Symbol, Value};
use crate::eval::{eval, Error};
use crate::reader::SyntaxError;

/// A special form receives its operands unevaluated, along with the current frame.
pub type SpecialForm = fn(operands: &[Value], frame: &Frame) -> Result<Value, Error>;

/// These could also be called "keywords".
/// They're matched on the head symbol before any environment lookup,
/// so binding one of these names has no effect on its use in head position.
const FORMS: &[(&str, SpecialForm)] = &[
    ("quote", form_quote),
    ("if", form_if),
    ("define", form_define),
    ("setq", form_define),
    ("set!", form_define),
    ("lambda", form_lambda),
    ("defun", form_defun),
    ("begin", form_begin),
    ("cond", form_cond),
];

pub fn lookup(symbol: Symbol) -> Option<SpecialForm> {
    symbol.with_name(|name| {
        FORMS
            .iter()
            .find(|(form, _)| *form == name)
            .map(|(_, f)| *f)
    })
}

fn malformed(message: impl Into<String>) -> Error {
    SyntaxError::MalformedForm(message.into()).into()
}

/// Destructure exactly N operands, or report the form as malformed.
fn operands<'a, const N: usize>(
    form: &str,
    shape: &str,
    tail: &'a [Value],
) -> Result<&'a [Value; N], Error> {
    tail.try_into().map_err(|_| {
        malformed(format!(
            "{form} takes {N} operands, as in {shape}; got {}",
            tail.len()
        ))
    })
}

// Return the single argument "quoted" - literally, without evaluation.
fn form_quote(tail: &[Value], _frame: &Frame) -> Result<Value, Error> {
    let [expression] = operands::<1>("quote", "(quote expr)", tail)?;
    Ok(expression.clone())
}

fn form_if(tail: &[Value], frame: &Frame) -> Result<Value, Error> {
    let [predicate, pos, neg] = operands::<3>("if", "(if test conseq alt)", tail)?;
    if eval(predicate, frame)?.is_truthy() {
        eval(pos, frame)
    } else {
        eval(neg, frame)
    }
}

// Bind a variable to a value: define, setq, and set! all share this.
fn form_define(tail: &[Value], frame: &Frame) -> Result<Value, Error> {
    let [binding, expression] = operands::<2>("define", "(define name expr)", tail)?;
    let symbol = binding
        .as_symbol()
        .ok_or_else(|| malformed(format!("cannot bind to non-symbol {binding}")))?;
    let value = eval(expression, frame)?;
    frame.define(symbol, value);
    Ok(Value::Symbol(symbol))
}

fn form_lambda(tail: &[Value], frame: &Frame) -> Result<Value, Error> {
    let [params, body] = operands::<2>("lambda", "(lambda (params...) body)", tail)?;
    Ok(make_closure(None, params, body, frame)?.into())
}

// (defun name (params...) body) is (define name (lambda (params...) body)),
// except that the closure remembers its name.
fn form_defun(tail: &[Value], frame: &Frame) -> Result<Value, Error> {
    let [name, params, body] =
        operands::<3>("defun", "(defun name (params...) body)", tail)?;
    let symbol = name
        .as_symbol()
        .ok_or_else(|| malformed(format!("defun name {name} is not a symbol")))?;
    let closure = make_closure(Some(symbol), params, body, frame)?;
    frame.define(symbol, closure.into());
    Ok(Value::Symbol(symbol))
}

fn make_closure(
    name: Option<Symbol>,
    params: &Value,
    body: &Value,
    frame: &Frame,
) -> Result<Closure, Error> {
    let params = params
        .as_list()
        .ok_or_else(|| malformed(format!("parameter list {params} is not a list")))?
        .iter()
        .map(|p| {
            p.as_symbol()
                .ok_or_else(|| malformed(format!("parameter {p} is not a symbol")))
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Closure {
        lambda: Rc::new(Lambda {
            name,
            params,
            body: body.clone(),
        }),
        // Captured by reference: later definitions in this frame are visible to the body.
        frame: frame.clone(),
    })
}

fn form_begin(tail: &[Value], frame: &Frame) -> Result<Value, Error> {
    // No nested frame: (begin (define a 1)) defines `a` right here.
    let mut last = Value::nil();
    for expression in tail {
        last = eval(expression, frame)?;
    }
    Ok(last)
}

fn form_cond(tail: &[Value], frame: &Frame) -> Result<Value, Error> {
    for clause in tail {
        let Some([test, expression]) = clause.as_list() else {
            return Err(SyntaxError::MalformedClause(clause.to_string()).into());
        };
        if eval(test, frame)?.is_truthy() {
            return eval(expression, frame);
        }
    }
    Ok(Value::nil())
}
