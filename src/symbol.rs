//! Interned symbols for attribute and keyword names.
//!
//! The engine compares names through an interning table rather than by
//! string content: two [`Sym`] values are the same name exactly when they
//! are equal integers. Keyword-argument lookup and attribute dispatch only
//! consider interned-symbol keys; a plain string handle never name-matches,
//! even with identical text.

use std::fmt;

use rustc_hash::FxHashMap;

/// An interned symbol. Equality is identity: two symbols interned from the
/// same text in the same [`SymbolTable`] are equal.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Sym(pub u32);

impl fmt::Debug for Sym {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sym({})", self.0)
    }
}

/// The interning table mapping names to symbols and back.
#[derive(Debug, Default)]
pub struct SymbolTable {
    names: Vec<String>,
    index: FxHashMap<String, Sym>,
}

impl SymbolTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern a name, returning its symbol. Repeated interning of the same
    /// text returns the same symbol.
    pub fn intern(&mut self, name: &str) -> Sym {
        if let Some(&sym) = self.index.get(name) {
            return sym;
        }
        let sym = Sym(self.names.len() as u32);
        self.names.push(name.to_owned());
        self.index.insert(name.to_owned(), sym);
        sym
    }

    /// Look up an already-interned name without interning it.
    pub fn lookup(&self, name: &str) -> Option<Sym> {
        self.index.get(name).copied()
    }

    /// Resolve a symbol back to its text.
    pub fn resolve(&self, sym: Sym) -> Option<&str> {
        self.names.get(sym.0 as usize).map(String::as_str)
    }

    /// Number of interned symbols.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// True if nothing has been interned yet.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
