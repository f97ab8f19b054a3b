//! Keyword-argument lookup over the engine's call-site argument array.
//!
//! The engine hands a call's keyword arguments over as a flat array of
//! key/value pairs in call-site order, not as a map. [`KwArgs`] keeps that
//! shape and resolves names with a linear scan gated on interned symbols:
//! only [`Obj::Sym`] keys are compared at all, so a plain string key with
//! identical text never matches. Keyword lists are small enough that the
//! scan beats building a map per call.

use crate::obj::Obj;
use crate::symbol::{Sym, SymbolTable};

/// A call's keyword arguments, in call-site order.
#[derive(Debug, Default)]
pub struct KwArgs {
    entries: Vec<(Obj, Obj)>,
}

impl KwArgs {
    /// An empty keyword list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from key/value pairs as the call site supplied them.
    pub fn from_entries(entries: Vec<(Obj, Obj)>) -> Self {
        Self { entries }
    }

    /// Append one entry. Entries keep insertion order.
    pub fn push(&mut self, key: Obj, value: Obj) {
        self.entries.push((key, value));
    }

    /// Number of entries, including any non-symbol keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the call passed no keyword arguments.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The raw entries in call-site order.
    pub fn entries(&self) -> &[(Obj, Obj)] {
        &self.entries
    }

    /// Find the value bound to `name`, scanning in order.
    ///
    /// Non-symbol keys are skipped without comparison. If the engine ever
    /// delivered a duplicate name, the first occurrence wins.
    pub fn find(&self, name: Sym) -> Option<&Obj> {
        self.entries
            .iter()
            .find(|(key, _)| matches!(key, Obj::Sym(sym) if *sym == name))
            .map(|(_, value)| value)
    }

    /// Find by text, via the interning table.
    ///
    /// A name that was never interned cannot be a key, so the lookup misses
    /// without scanning.
    pub fn find_named(&self, syms: &SymbolTable, name: &str) -> Option<&Obj> {
        self.find(syms.lookup(name)?)
    }

    /// True iff `name` is present as a symbol key.
    pub fn contains(&self, name: Sym) -> bool {
        self.find(name).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_each_present_name_and_misses_absent() {
        let mut syms = SymbolTable::new();
        let a = syms.intern("a");
        let b = syms.intern("b");
        let c = syms.intern("c");

        let kwargs = KwArgs::from_entries(vec![
            (Obj::Sym(a), Obj::Int(1)),
            (Obj::Sym(b), Obj::Int(2)),
        ]);

        assert!(matches!(kwargs.find(a), Some(Obj::Int(1))));
        assert!(matches!(kwargs.find(b), Some(Obj::Int(2))));
        assert!(kwargs.find(c).is_none());
        assert!(kwargs.contains(a));
        assert!(!kwargs.contains(c));
    }

    #[test]
    fn string_keys_never_match() {
        let mut syms = SymbolTable::new();
        let name = syms.intern("name");

        // Same text, but a string handle rather than an interned symbol.
        let kwargs = KwArgs::from_entries(vec![(
            Obj::Str("name".to_string()),
            Obj::Int(7),
        )]);
        assert!(kwargs.find(name).is_none());
        assert!(kwargs.find_named(&syms, "name").is_none());
    }

    #[test]
    fn non_symbol_keys_are_skipped_not_fatal() {
        let mut syms = SymbolTable::new();
        let b = syms.intern("b");

        let kwargs = KwArgs::from_entries(vec![
            (Obj::Int(0), Obj::Int(99)),
            (Obj::None, Obj::Int(98)),
            (Obj::Sym(b), Obj::Int(2)),
        ]);
        assert!(matches!(kwargs.find(b), Some(Obj::Int(2))));
    }

    #[test]
    fn first_duplicate_wins() {
        let mut syms = SymbolTable::new();
        let a = syms.intern("a");

        let kwargs = KwArgs::from_entries(vec![
            (Obj::Sym(a), Obj::Int(1)),
            (Obj::Sym(a), Obj::Int(2)),
        ]);
        assert!(matches!(kwargs.find(a), Some(Obj::Int(1))));
    }

    #[test]
    fn find_named_requires_interned_name() {
        let mut syms = SymbolTable::new();
        let a = syms.intern("a");
        let kwargs = KwArgs::from_entries(vec![(Obj::Sym(a), Obj::Bool(true))]);

        assert!(matches!(kwargs.find_named(&syms, "a"), Some(Obj::Bool(true))));
        assert!(kwargs.find_named(&syms, "never-interned").is_none());
    }

    #[test]
    fn empty_list_misses_everything() {
        let mut syms = SymbolTable::new();
        let a = syms.intern("a");
        let kwargs = KwArgs::new();
        assert!(kwargs.is_empty());
        assert!(kwargs.find(a).is_none());
    }
}
