//! Interned symbols.
//!
//! Symbols are interned into a per-thread table, so comparing two symbols
//! is comparing two integers. The table is append-only; symbols are perpetual.

use std::cell::RefCell;
use std::marker::PhantomData;
use std::rc::Rc;

use string_interner::{DefaultStringInterner, DefaultSymbol};

thread_local! {
    static SYMBOLS: RefCell<DefaultStringInterner> = RefCell::new(DefaultStringInterner::default());
}

/// A Lisp symbol: a name in the symbol table.
///
/// Symbols only resolve against the table of the thread that created them,
/// so they are neither Send nor Sync.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol {
    symbol: DefaultSymbol,
    table: PhantomData<Rc<()>>,
}

impl Symbol {
    /// Add a symbol to the symbol table, or find the existing one.
    pub fn new(name: &str) -> Self {
        let symbol = SYMBOLS.with(|s| s.borrow_mut().get_or_intern(name));
        Symbol {
            symbol,
            table: PhantomData,
        }
    }

    /// Run `f` against the name of this symbol.
    ///
    /// `f` must not intern new symbols.
    pub fn with_name<T>(&self, f: impl FnOnce(&str) -> T) -> T {
        SYMBOLS.with(|s| f(s.borrow().resolve(self.symbol).unwrap_or("")))
    }

    pub fn name(&self) -> String {
        self.with_name(str::to_owned)
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.with_name(|name| f.write_str(name))
    }
}

impl std::fmt::Debug for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.with_name(|name| write!(f, "Symbol({name:?})"))
    }
}

impl From<&str> for Symbol {
    fn from(value: &str) -> Self {
        Symbol::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interned_once() {
        let a = Symbol::new("hello");
        let b = Symbol::new("hello");
        assert_eq!(a, b);
        assert_ne!(a, Symbol::new("HELLO"));
        assert_eq!(a.name(), "hello");
        assert_eq!(format!("{a}"), "hello");
    }
}
