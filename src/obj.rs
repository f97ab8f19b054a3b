//! The script handle type.
//!
//! [`Obj`] is the opaque reference native code receives from and returns to
//! the script engine. Scalars, booleans, and strings are carried directly as
//! fresh immutable values — there is no interning or identity sharing for
//! them. Opaque native types travel as [`WrapperRecord`]s. Two reserved
//! markers come from the engine: [`Obj::Sentinel`] distinguishes get from
//! set in the combined subscript call, and [`Obj::Null`] is the engine's
//! "no object" marker, distinct from the `None` value.
//!
//! `Obj` does not implement `Clone`: wrapper records with owned storage hold
//! values that may not be cloneable. Use [`Obj::clone_if_possible`] where a
//! copy of a non-owning handle is needed.

use std::fmt;

use crate::symbol::Sym;
use crate::wrapper::WrapperRecord;

/// A handle into the script engine's object space.
pub enum Obj {
    /// The `None` singleton.
    None,
    /// Boolean value.
    Bool(bool),
    /// Integer value (all native integer widths travel as i64).
    Int(i64),
    /// Floating point value (f32 and f64 both travel as f64).
    Float(f64),
    /// String value (owned; embedded NUL bytes are preserved).
    Str(String),
    /// Interned symbol, the name-comparable string form.
    Sym(Sym),
    /// Wrapped opaque native value.
    Wrapper(WrapperRecord),
    /// Reserved marker distinguishing subscript get from set.
    Sentinel,
    /// The engine's "no object" marker.
    Null,
}

impl Obj {
    /// Human-readable name of this handle's kind.
    pub fn type_name(&self) -> &'static str {
        match self {
            Obj::None => "NoneType",
            Obj::Bool(_) => "bool",
            Obj::Int(_) => "int",
            Obj::Float(_) => "float",
            Obj::Str(_) => "str",
            Obj::Sym(_) => "symbol",
            Obj::Wrapper(_) => "object",
            Obj::Sentinel => "sentinel",
            Obj::Null => "null",
        }
    }

    /// True for the `None` singleton.
    pub fn is_none(&self) -> bool {
        matches!(self, Obj::None)
    }

    /// True for the reserved subscript sentinel.
    pub fn is_sentinel(&self) -> bool {
        matches!(self, Obj::Sentinel)
    }

    /// True for the engine's "no object" marker.
    pub fn is_null(&self) -> bool {
        matches!(self, Obj::Null)
    }

    /// True for a wrapped opaque value.
    pub fn is_wrapper(&self) -> bool {
        matches!(self, Obj::Wrapper(_))
    }

    /// The wrapper record, if this handle is one.
    pub fn as_wrapper(&self) -> Option<&WrapperRecord> {
        match self {
            Obj::Wrapper(record) => Some(record),
            _ => None,
        }
    }

    /// Mutable wrapper access.
    pub fn as_wrapper_mut(&mut self) -> Option<&mut WrapperRecord> {
        match self {
            Obj::Wrapper(record) => Some(record),
            _ => None,
        }
    }

    /// Clone the handle if it does not carry an owned wrapper value.
    ///
    /// Borrowed wrappers are copyable (the alias is), owned wrappers are not.
    pub fn clone_if_possible(&self) -> Option<Self> {
        match self {
            Obj::None => Some(Obj::None),
            Obj::Bool(v) => Some(Obj::Bool(*v)),
            Obj::Int(v) => Some(Obj::Int(*v)),
            Obj::Float(v) => Some(Obj::Float(*v)),
            Obj::Str(s) => Some(Obj::Str(s.clone())),
            Obj::Sym(s) => Some(Obj::Sym(*s)),
            Obj::Wrapper(record) => record.borrowed_handle().map(|handle| {
                Obj::Wrapper(WrapperRecord::new(
                    record.type_hash(),
                    crate::wrapper::WrapperStorage::Borrowed(handle),
                ))
            }),
            Obj::Sentinel => Some(Obj::Sentinel),
            Obj::Null => Some(Obj::Null),
        }
    }
}

impl fmt::Debug for Obj {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Obj::None => write!(f, "None"),
            Obj::Bool(v) => write!(f, "Bool({v})"),
            Obj::Int(v) => write!(f, "Int({v})"),
            Obj::Float(v) => write!(f, "Float({v})"),
            Obj::Str(s) => write!(f, "Str({s:?})"),
            Obj::Sym(s) => write!(f, "{s:?}"),
            Obj::Wrapper(record) => write!(f, "Wrapper({:?})", record.type_hash()),
            Obj::Sentinel => write!(f, "Sentinel"),
            Obj::Null => write!(f, "Null"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TypeHash;
    use crate::wrapper::WrapperStorage;

    #[test]
    fn type_names() {
        assert_eq!(Obj::None.type_name(), "NoneType");
        assert_eq!(Obj::Bool(true).type_name(), "bool");
        assert_eq!(Obj::Int(0).type_name(), "int");
        assert_eq!(Obj::Float(0.0).type_name(), "float");
        assert_eq!(Obj::Str(String::new()).type_name(), "str");
        assert_eq!(Obj::Sym(Sym(0)).type_name(), "symbol");
        assert_eq!(Obj::Sentinel.type_name(), "sentinel");
        assert_eq!(Obj::Null.type_name(), "null");
    }

    #[test]
    fn predicates() {
        assert!(Obj::None.is_none());
        assert!(Obj::Sentinel.is_sentinel());
        assert!(Obj::Null.is_null());
        assert!(!Obj::Int(1).is_none());
        assert!(!Obj::Null.is_none());
    }

    #[test]
    fn clone_if_possible_covers_plain_values() {
        assert!(Obj::Int(3).clone_if_possible().is_some());
        assert!(Obj::Str("a\0b".into()).clone_if_possible().is_some());
        assert!(Obj::Sentinel.clone_if_possible().is_some());
    }

    #[test]
    fn clone_if_possible_rejects_owned_wrappers() {
        let owned = Obj::Wrapper(WrapperRecord::new(
            TypeHash::from_name("X"),
            WrapperStorage::Owned(Box::new(17_i64)),
        ));
        assert!(owned.clone_if_possible().is_none());
    }

    #[test]
    fn debug_output() {
        assert_eq!(format!("{:?}", Obj::Int(42)), "Int(42)");
        assert_eq!(format!("{:?}", Obj::Str("hi".into())), "Str(\"hi\")");
        assert_eq!(format!("{:?}", Obj::None), "None");
    }
}
