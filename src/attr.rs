//! Attribute tables: named getter/setter dispatch for opaque classes.
//!
//! A class that declares the attribute slot gets one [`AttrTable`] built at
//! definition time, holding one [`AttrAccessor`] per script-visible field.
//! Dispatch resolves the attribute name by interned symbol with a linear
//! scan, the same gating as keyword lookup: attribute tables are small and
//! the symbol compare is an integer compare.
//!
//! An accessor without a setter is read-only; storing through it is a
//! [`ConversionError::ReadOnlyAttribute`].

use crate::error::ConversionError;
use crate::obj::Obj;
use crate::symbol::{Sym, SymbolTable};

/// One named attribute of class `T`.
pub struct AttrAccessor<T> {
    name: &'static str,
    sym: Sym,
    getter: fn(&T) -> Obj,
    setter: Option<fn(&mut T, &Obj) -> Result<(), ConversionError>>,
}

impl<T> AttrAccessor<T> {
    /// Script-visible attribute name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The interned symbol dispatch compares against.
    pub fn sym(&self) -> Sym {
        self.sym
    }

    /// True if the attribute has no setter.
    pub fn is_read_only(&self) -> bool {
        self.setter.is_none()
    }
}

/// The attribute table of class `T`, built once at definition time.
pub struct AttrTable<T> {
    accessors: Vec<AttrAccessor<T>>,
}

impl<T> AttrTable<T> {
    /// An empty table.
    pub fn new() -> Self {
        Self {
            accessors: Vec::new(),
        }
    }

    /// Register a read-write attribute. Names are interned on the spot; if
    /// the same name is registered twice, the first registration wins at
    /// dispatch.
    pub fn register(
        &mut self,
        syms: &mut SymbolTable,
        name: &'static str,
        getter: fn(&T) -> Obj,
        setter: fn(&mut T, &Obj) -> Result<(), ConversionError>,
    ) -> &mut Self {
        self.accessors.push(AttrAccessor {
            name,
            sym: syms.intern(name),
            getter,
            setter: Some(setter),
        });
        self
    }

    /// Register a read-only attribute.
    pub fn register_read_only(
        &mut self,
        syms: &mut SymbolTable,
        name: &'static str,
        getter: fn(&T) -> Obj,
    ) -> &mut Self {
        self.accessors.push(AttrAccessor {
            name,
            sym: syms.intern(name),
            getter,
            setter: None,
        });
        self
    }

    /// Number of registered accessors.
    pub fn len(&self) -> usize {
        self.accessors.len()
    }

    /// True if no accessor has been registered.
    pub fn is_empty(&self) -> bool {
        self.accessors.is_empty()
    }

    fn find(&self, name: Sym) -> Option<&AttrAccessor<T>> {
        self.accessors.iter().find(|acc| acc.sym == name)
    }

    /// Look up an accessor by name without dispatching.
    pub fn accessor(&self, name: Sym) -> Option<&AttrAccessor<T>> {
        self.find(name)
    }

    /// Load the attribute `name` from `target`.
    ///
    /// `None` means the class has no such attribute and the engine should
    /// continue its own lookup chain.
    pub fn load(&self, target: &T, name: Sym) -> Option<Obj> {
        self.find(name).map(|acc| (acc.getter)(target))
    }

    /// Store `value` into attribute `name` on `target`.
    ///
    /// `None` again means "not my attribute"; a present but setter-less
    /// accessor reports the read-only error instead.
    pub fn store(
        &self,
        target: &mut T,
        name: Sym,
        value: &Obj,
    ) -> Option<Result<(), ConversionError>> {
        let acc = self.find(name)?;
        Some(match acc.setter {
            Some(setter) => setter(target, value),
            None => Err(ConversionError::ReadOnlyAttribute(acc.name)),
        })
    }
}

impl<T> Default for AttrTable<T> {
    fn default() -> Self {
        Self::new()
    }
}
