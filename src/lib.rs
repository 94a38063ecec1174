//! A minimal Lisp core: reader, environments, and a tree-walking evaluator.
//!
//! ```
//! let value = minilisp::run("(defun sq (x) (* x x)) (sq 12)").unwrap();
//! assert_eq!(value.to_string(), "144");
//! ```

pub mod data;
pub mod eval;
pub mod reader;

pub use data::{Frame, Value};
pub use eval::{apply, eval, Error, EvalEnvironment};

/// Evaluate a program in a fresh environment, and return the value of its last expression.
pub fn run(source: &str) -> Result<Value, Error> {
    EvalEnvironment::new().run(source)
}
