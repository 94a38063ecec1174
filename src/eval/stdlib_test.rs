//! Tests for the evaluator, special forms, and builtin functions.
use super::*;
use crate::data::Symbol;

fn init_logging() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// Run the program in a fresh environment; render the result.
fn run(input: &str) -> Result<String, Error> {
    init_logging();
    let eval = EvalEnvironment::new();
    Ok(eval.run(input)?.to_string())
}

/// Run the program, and check that it fails with the given kind of error.
fn run_err(input: &str, kind: &str) -> Error {
    match run(input) {
        Err(e) if e.kind() == kind => e,
        v => panic!("unexpected result for {input}: wanted {kind}, got {v:?}"),
    }
}

#[test]
fn self_evaluating() -> Result<(), Error> {
    let eval = EvalEnvironment::new();
    for v in [
        Value::Integer(42),
        Value::string("hi"),
        Value::nil(),
        Value::Float(1.5),
        Value::True,
    ] {
        assert_eq!(eval.eval(&v)?, v);
    }
    Ok(())
}

#[test]
fn empty_program_is_nil() -> Result<(), Error> {
    assert_eq!(run("")?, "NIL");
    Ok(())
}

#[test]
fn arithmetic() -> Result<(), Error> {
    for (input, want) in [
        ("(+ 1 2 3)", "6"),
        ("(- 5)", "-5"),
        ("(*)", "1"),
        ("(+)", "0"),
        ("(- 10 3 2)", "5"),
        ("(* 2 3 4)", "24"),
        ("(/ 12 2 3)", "2"),
        ("(/ 7 2)", "3.5"),
        ("(/ 5)", "5"),
        ("(+ 1 2.5)", "3.5"),
        ("(* 2 0.5)", "1.0"),
        ("(- 1.5)", "-1.5"),
    ] {
        assert_eq!(run(input)?, want, "evaluating {input}");
    }
    Ok(())
}

#[test]
fn arithmetic_errors() {
    run_err("(-)", "ArityError");
    run_err("(/)", "ArityError");
    run_err("(/ 1 0)", "ArithmeticError:DivisionByZero");
    run_err("(/ 1.0 0.0)", "ArithmeticError:DivisionByZero");
    run_err("(* 9223372036854775807 2)", "ArithmeticError:Overflow");
    run_err("(+ 1 \"two\")", "TypeError:WrongArgumentType");
    run_err("(< 'a 1)", "TypeError:WrongArgumentType");
}

#[test]
fn comparisons() -> Result<(), Error> {
    for (input, want) in [
        ("(< 1 2)", "T"),
        ("(> 1 2)", "NIL"),
        ("(<= 2 2)", "T"),
        ("(>= 1 2.5)", "NIL"),
        ("(= 2 2.0)", "T"),
        ("(= 2 3)", "NIL"),
        ("(= 'a 'a)", "T"),
        ("(= \"a\" 'a)", "NIL"),
        ("(= '(1 2) '(1.0 2))", "T"),
    ] {
        assert_eq!(run(input)?, want, "evaluating {input}");
    }
    run_err("(< 'a 1)", "TypeError:WrongArgumentType");
    run_err("(< 1)", "ArityError");
    run_err("(= 1 2 3)", "ArityError");
    Ok(())
}

#[test]
fn closure_sees_later_definitions() -> Result<(), Error> {
    let got = run(
        r#"
        (define x 1)
        (define f (lambda () x))
        (define x 2)
        (f)
        "#,
    )?;
    assert_eq!(got, "2");
    Ok(())
}

#[test]
fn factorial() -> Result<(), Error> {
    let got = run(
        r#"
        (defun fact (n) (cond ((eq n 0) 1) (T (* n (fact (- n 1))))))
        (fact 5)
        "#,
    )?;
    assert_eq!(got, "120");
    Ok(())
}

#[test]
fn mutual_recursion() -> Result<(), Error> {
    let got = run(
        r#"
        (defun even (n) (if (= n 0) T (odd (- n 1))))
        (defun odd (n) (if (= n 0) NIL (even (- n 1))))
        (list (even 10) (odd 7) (even 3))
        "#,
    )?;
    assert_eq!(got, "(T T NIL)");
    Ok(())
}

#[test]
fn static_scoping() -> Result<(), Error> {
    // getx sees the global x, not the caller's parameter.
    let got = run(
        r#"
        (define x 10)
        (defun getx () x)
        (defun f (x) (getx))
        (f 99)
        "#,
    )?;
    assert_eq!(got, "10");
    Ok(())
}

#[test]
fn parameters_shadow() -> Result<(), Error> {
    let got = run(
        r#"
        (define x 1)
        (defun g (x) (begin (setq x 5) x))
        (list (g 3) x)
        "#,
    )?;
    assert_eq!(got, "(5 1)");
    Ok(())
}

#[test]
fn make_adder() -> Result<(), Error> {
    let got = run(
        r#"
        (defun make-adder (n) (lambda (x) (+ x n)))
        (define add5 (make-adder 5))
        (add5 10)
        "#,
    )?;
    assert_eq!(got, "15");
    Ok(())
}

#[test]
fn higher_order_map() -> Result<(), Error> {
    let got = run(
        r#"
        (define map (lambda (f xs)
            (if (null? xs)
                '()
                (cons (f (car xs)) (map f (cdr xs))))))
        (map (lambda (x) (* x x)) (list 1 2 3 4))
        "#,
    )?;
    assert_eq!(got, "(1 4 9 16)");
    Ok(())
}

#[test]
fn define_returns_symbol() -> Result<(), Error> {
    assert_eq!(run("(define x 5)")?, "x");
    assert_eq!(run("(defun id (x) x)")?, "id");
    assert_eq!(run("(define x 5) (setq x 6)")?, "x");
    assert_eq!(run("(define x 5) (set! x 7) x")?, "7");
    // setq of an unbound name creates it.
    assert_eq!(run("(setq y 8) y")?, "8");
    Ok(())
}

#[test]
fn define_requires_symbol() {
    run_err("(define 1 39)", "SyntaxError:MalformedForm");
    run_err("(define a)", "SyntaxError:MalformedForm");
    run_err("(define a 1 2 3)", "SyntaxError:MalformedForm");
    run_err("(defun \"f\" (x) x)", "SyntaxError:MalformedForm");
}

#[test]
fn lambda_shape() -> Result<(), Error> {
    assert_eq!(run("((lambda () 7))")?, "7");
    assert_eq!(run("(lambda (a b) a)")?, "#<lambda (a b)>");
    assert_eq!(run("(defun fact (n) n) fact")?, "#<closure fact>");
    run_err("(lambda (x 1) x)", "SyntaxError:MalformedForm");
    run_err("(lambda x x)", "SyntaxError:MalformedForm");
    run_err("(lambda (x))", "SyntaxError:MalformedForm");
    Ok(())
}

#[test]
fn begin() -> Result<(), Error> {
    assert_eq!(run("(begin 1 2 3 4)")?, "4");
    assert_eq!(run("(begin)")?, "NIL");
    assert_eq!(run("(begin (define a 1)) a")?, "1");
    Ok(())
}

#[test]
fn if_form() -> Result<(), Error> {
    assert_eq!(run("(if () 1 2)")?, "2");
    assert_eq!(run("(if 0 1 2)")?, "1");
    assert_eq!(run("(if (< 1 2) 'yes 'no)")?, "yes");
    // Only the chosen branch is evaluated.
    assert_eq!(run("(if T 1 (undefined))")?, "1");
    run_err("(if 1 2)", "SyntaxError:MalformedForm");
    Ok(())
}

#[test]
fn cond_form() -> Result<(), Error> {
    assert_eq!(run("(cond ((eq 1 2) 'a))")?, "NIL");
    assert_eq!(run("(cond ((eq 'a 'b) 'no) ((atom 'a) 'yes))")?, "yes");
    assert_eq!(run("(cond)")?, "NIL");
    // Clauses after the first match are never evaluated.
    assert_eq!(run("(cond (T 1) ((undefined) 2))")?, "1");
    run_err("(cond (1 2 3))", "SyntaxError:MalformedClause");
    run_err("(cond 5)", "SyntaxError:MalformedClause");
    Ok(())
}

#[test]
fn quote() -> Result<(), Error> {
    assert_eq!(run("(quote unknown-symbol)")?, "unknown-symbol");
    assert_eq!(run("'(1 (a) \"s\")")?, "(1 (a) \"s\")");
    assert_eq!(run("''a")?, "(quote a)");
    run_err("(quote)", "SyntaxError:MalformedForm");
    run_err("(quote 1 2)", "SyntaxError:MalformedForm");
    Ok(())
}

#[test]
fn special_forms_are_not_shadowed() -> Result<(), Error> {
    assert_eq!(run("(define if 5) (if 1 2 3)")?, "2");
    Ok(())
}

#[test]
fn list_primitives() -> Result<(), Error> {
    for (input, want) in [
        ("(cons 1 '(2 3))", "(1 2 3)"),
        ("(cons 1 '())", "(1)"),
        ("(car '(1 2 3))", "1"),
        ("(cdr '(1 2 3))", "(2 3)"),
        ("(cdr '(1))", "NIL"),
        ("(car '())", "NIL"),
        ("(car 5)", "NIL"),
        ("(cdr \"str\")", "NIL"),
        ("(list 1 'a \"b\")", "(1 a \"b\")"),
        ("(list)", "NIL"),
        ("(null? '())", "T"),
        ("(null? 0)", "NIL"),
        ("(list? '())", "T"),
        ("(list? 'a)", "NIL"),
    ] {
        assert_eq!(run(input)?, want, "evaluating {input}");
    }
    run_err("(cons 1 2)", "TypeError:WrongArgumentType");
    run_err("(car)", "ArityError");
    run_err("(cdr '(1) '(2))", "ArityError");
    Ok(())
}

#[test]
fn predicates() -> Result<(), Error> {
    for (input, want) in [
        ("(eq 'a 'a)", "T"),
        ("(eq 'a 'b)", "NIL"),
        ("(eq 1 1.0)", "T"),
        ("(eq \"a\" \"a\")", "T"),
        ("(eq '(1 2) '(1 2))", "T"),
        ("(eq '(1 (2)) '(1.0 (2.0)))", "T"),
        ("(eq '(1) '(1 1))", "NIL"),
        ("(eq '() NIL)", "T"),
        ("(eq (= 1 1) T)", "T"),
        ("(atom '(1 2))", "NIL"),
        ("(atom '())", "T"),
        ("(atom 'a)", "T"),
        ("(atom 3)", "T"),
    ] {
        assert_eq!(run(input)?, want, "evaluating {input}");
    }
    Ok(())
}

#[test]
fn constants() -> Result<(), Error> {
    assert_eq!(run("(list T true NIL nil false)")?, "(T T NIL NIL NIL)");
    Ok(())
}

#[test]
fn print_returns_argument() -> Result<(), Error> {
    assert_eq!(run("(print '(1 2))")?, "(1 2)");
    Ok(())
}

#[test]
fn undefined_symbol() {
    let e = run_err("(+ 1 nope)", "NameError:UndefinedSymbol");
    assert_eq!(e, Error::UndefinedSymbol("nope".to_owned()));
}

#[test]
fn closure_arity() {
    run_err("((lambda (x y) x) 1)", "ArityError");
    let e = run_err("(defun two (a b) a) (two 1 2 3)", "ArityError");
    assert_eq!(e.to_string(), "ArityError: two expects 2 arguments, got 3");
}

#[test]
fn not_callable() {
    run_err("(5 1)", "TypeError:NotCallable");
    run_err("('(1 2))", "TypeError:NotCallable");
    run_err("(\"f\")", "TypeError:NotCallable");
}

#[test]
fn syntax_errors() {
    let e = run_err("(+ 1", "SyntaxError:UnexpectedEOF");
    assert!(matches!(e, Error::Syntax(ref s) if s.is_incomplete()));
    run_err("(+ 1))", "SyntaxError:UnexpectedCloseParen");
}

#[test]
fn run_stops_at_first_error() -> Result<(), Error> {
    init_logging();
    let eval = EvalEnvironment::new();
    eval.run("(define a 1) (undefined) (define b 2)")
        .expect_err("undefined symbol should stop the program");
    assert_eq!(eval.run("a")?, Value::Integer(1));
    match eval.run("b") {
        Err(Error::UndefinedSymbol(_)) => (),
        v => panic!("unexpected result: {v:?}"),
    }
    Ok(())
}

#[test]
fn environments_are_isolated() -> Result<(), Error> {
    init_logging();
    let first = EvalEnvironment::new();
    let second = EvalEnvironment::new();
    first.run("(define shared 1)")?;
    assert_eq!(first.run("shared")?, Value::Integer(1));
    match second.run("shared") {
        Err(Error::UndefinedSymbol(_)) => (),
        v => panic!("unexpected result: {v:?}"),
    }
    Ok(())
}

#[test]
fn definitions_persist_across_runs() -> Result<(), Error> {
    init_logging();
    let eval = EvalEnvironment::new();
    eval.run("(define id (lambda (x) x))")?;
    assert_eq!(eval.run("(id 7)")?, Value::Integer(7));
    Ok(())
}

#[test]
fn host_apply() -> Result<(), Error> {
    let eval = EvalEnvironment::new();
    let add = eval
        .global()
        .get(Symbol::new("+"))
        .expect("+ is a builtin");
    assert_eq!(apply(&add, &[Value::Integer(1), Value::Integer(2)])?, Value::Integer(3));

    eval.run("(defun pair (a b) (list a b))")?;
    let pair = eval.global().get(Symbol::new("pair")).expect("pair was defined");
    let got = apply(&pair, &[Value::symbol("x"), Value::nil()])?;
    assert_eq!(got.to_string(), "(x NIL)");

    match apply(&Value::Integer(1), &[]) {
        Err(Error::NotCallable(_)) => (),
        v => panic!("unexpected result: {v:?}"),
    }
    Ok(())
}

#[test]
fn host_eval_in_frame() -> Result<(), Error> {
    let eval = EvalEnvironment::new();
    let frame = eval.global().child();
    frame.bind_local(Symbol::new("local"), Value::Integer(4));
    let expr = crate::reader::loads("(* local local)")?.remove(0);
    assert_eq!(super::eval(&expr, &frame)?, Value::Integer(16));
    match eval.run("local") {
        Err(Error::UndefinedSymbol(_)) => (),
        v => panic!("unexpected result: {v:?}"),
    }
    Ok(())
}

#[test]
fn error_display() {
    let e = Error::wrong_type("cons", "a list as its second argument", &Value::Integer(2));
    assert_eq!(
        e.to_string(),
        "TypeError:WrongArgumentType: cons expects a list as its second argument, got integer 2"
    );
}

#[test]
fn activation_frame_released_after_call() -> Result<(), Error> {
    init_logging();
    let eval = EvalEnvironment::new();
    let inner = eval.run(
        r#"
        (defun outer () (begin (defun inner () 1) inner))
        (outer)
    "#,
    )?;
    let frame = match &inner {
        Value::Closure(closure) => closure.frame.downgrade(),
        v => panic!("expected a closure, got {v:?}"),
    };
    // The escaped closure keeps its frame alive, and still sees its own name.
    assert_eq!(apply(&inner, &[])?, Value::Integer(1));
    assert!(frame.upgrade().is_some());
    drop(inner);
    assert!(frame.upgrade().is_none());
    Ok(())
}

#[test]
fn recursive_closure_in_activation_frame() -> Result<(), Error> {
    assert_eq!(
        run(r#"
        (defun count-down (n)
            (begin
                (defun step (k) (if (= k 0) 'done (step (- k 1))))
                (step n)))
        (count-down 5)
    "#)?,
        "done"
    );
    Ok(())
}

#[test]
fn global_frame_released_with_environment() -> Result<(), Error> {
    init_logging();
    let eval = EvalEnvironment::new();
    eval.run(
        r#"
        (defun h (x) x)
        (defun make () (lambda () h))
        (define kept (make))
    "#,
    )?;
    let global = eval.global().downgrade();
    drop(eval);
    assert!(global.upgrade().is_none());
    Ok(())
}

#[test]
fn procedures_compare_by_identity() -> Result<(), Error> {
    assert_eq!(run("(defun f () 1) (eq f f)")?, "T");
    assert_eq!(run("(defun f () 1) (define g f) (eq f g)")?, "T");
    assert_eq!(run("(eq (lambda () 1) (lambda () 1))")?, "NIL");
    Ok(())
}
