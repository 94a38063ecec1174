//! Environments: chains of binding frames.
//!
//! A frame is a set of bindings plus (optionally) the frame that encloses it.
//! Links only point upward, towards the global frame.
//!
//! A closure bound in the same frame it closes over (every `defun`, for instance)
//! is stored as its bare `Lambda`. The frame handle is restored on lookup,
//! so a frame never holds a strong reference to itself.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use super::{Closure, Lambda, Symbol, Value};

/// A shared handle to a binding frame.
///
/// Cloning a Frame clones the handle, not the bindings:
/// closures capture their defining frame by reference, and see later changes to it.
#[derive(Clone, Default)]
pub struct Frame(Rc<RefCell<Scope>>);

/// A non-owning handle to a frame.
#[derive(Clone)]
pub struct WeakFrame(Weak<RefCell<Scope>>);

impl WeakFrame {
    /// The frame, if anything still holds it.
    pub fn upgrade(&self) -> Option<Frame> {
        self.0.upgrade().map(Frame)
    }
}

#[derive(Default)]
struct Scope {
    bindings: HashMap<Symbol, Binding>,
    parent: Option<Frame>,
}

enum Binding {
    Value(Value),
    /// A closure over the frame holding this binding.
    Procedure(Rc<Lambda>),
}

impl Frame {
    /// Create a new frame with no parent.
    pub fn root() -> Self {
        Default::default()
    }

    /// Create a new, empty frame enclosed by this one.
    pub fn child(&self) -> Self {
        Frame(Rc::new(RefCell::new(Scope {
            bindings: HashMap::new(),
            parent: Some(self.clone()),
        })))
    }

    /// Find the nearest frame (this one or an ancestor) that binds `symbol`.
    pub fn find(&self, symbol: Symbol) -> Option<Frame> {
        let mut frame = self.clone();
        loop {
            let parent = {
                let scope = frame.0.borrow();
                if scope.bindings.contains_key(&symbol) {
                    break;
                }
                scope.parent.clone()?
            };
            frame = parent;
        }
        Some(frame)
    }

    /// Look up the value of `symbol` in this frame or its ancestors.
    pub fn get(&self, symbol: Symbol) -> Option<Value> {
        let owner = self.find(symbol)?;
        let scope = owner.0.borrow();
        let value = match scope.bindings.get(&symbol)? {
            Binding::Value(value) => value.clone(),
            Binding::Procedure(lambda) => Closure {
                lambda: lambda.clone(),
                frame: owner.clone(),
            }
            .into(),
        };
        Some(value)
    }

    /// Bind `symbol` to `value`.
    ///
    /// If any frame in the chain already binds `symbol`, that binding is updated in place.
    /// Otherwise, the binding is created in this frame.
    pub fn define(&self, symbol: Symbol, value: Value) {
        let owner = self.find(symbol).unwrap_or_else(|| self.clone());
        tracing::trace!(%symbol, "binding");
        owner.bind_local(symbol, value);
    }

    /// Bind `symbol` to `value` in this frame, shadowing any outer binding.
    pub fn bind_local(&self, symbol: Symbol, value: Value) {
        let binding = match value {
            Value::Closure(closure) if closure.frame.ptr_eq(self) => {
                Binding::Procedure(closure.lambda)
            }
            value => Binding::Value(value),
        };
        self.0.borrow_mut().bindings.insert(symbol, binding);
    }

    /// Remove every binding from this frame.
    ///
    /// Breaks any reference cycle that runs through this frame's bindings.
    pub fn clear(&self) {
        let bindings = std::mem::take(&mut self.0.borrow_mut().bindings);
        // Released after the borrow ends: dropping a value may drop other frames.
        drop(bindings);
    }

    /// The enclosing frame, if any.
    pub fn parent(&self) -> Option<Frame> {
        self.0.borrow().parent.clone()
    }

    /// True if the two handles refer to the same frame.
    pub fn ptr_eq(&self, other: &Frame) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub fn downgrade(&self) -> WeakFrame {
        WeakFrame(Rc::downgrade(&self.0))
    }
}

impl std::fmt::Debug for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Frames can be reached from the closures they hold; don't recurse into them.
        let scope = self.0.borrow();
        f.debug_struct("Frame")
            .field("bindings", &scope.bindings.len())
            .field("root", &scope.parent.is_none())
            .finish()
    }
}
