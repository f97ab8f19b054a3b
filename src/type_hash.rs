//! Deterministic hash-based type identity.
//!
//! [`TypeHash`] is a 64-bit hash uniquely identifying a script-visible type.
//! Hashes are computed deterministically from the type's script name, so the
//! same name always yields the same descriptor identity — registration order
//! does not matter, and a wrapper's descriptor can be compared against a
//! class's expected hash with a single integer equality.
//!
//! # Examples
//!
//! ```
//! use micropy_ffi::TypeHash;
//!
//! let a = TypeHash::from_name("Point");
//! let b = TypeHash::from_name("Point");
//! assert_eq!(a, b);
//! assert_ne!(a, TypeHash::from_name("Device"));
//! ```

use std::fmt;

use xxhash_rust::const_xxh64;
use xxhash_rust::xxh64::xxh64;

/// Domain-mixing constant folded into every type hash so that type identity
/// can never collide with other hash domains sharing the same name source.
const TYPE_DOMAIN: u64 = 0x2fac10b63a6cc57c;

/// A deterministic 64-bit hash identifying a script-visible type.
///
/// This is the "type descriptor" identity carried by wrapper objects and
/// registry entries. Computed from the script name via xxh64.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct TypeHash(pub u64);

impl TypeHash {
    /// Empty/invalid hash constant.
    pub const EMPTY: TypeHash = TypeHash(0);

    /// Create a type hash from a script-visible type name.
    ///
    /// The same name always produces the same hash.
    #[inline]
    pub fn from_name(name: &str) -> Self {
        TypeHash(TYPE_DOMAIN ^ xxh64(name.as_bytes(), 0))
    }

    /// `from_name` usable in const contexts, for precomputed descriptors.
    #[inline]
    pub const fn from_name_const(name: &str) -> Self {
        TypeHash(TYPE_DOMAIN ^ const_xxh64::xxh64(name.as_bytes(), 0))
    }

    /// Check if this is the empty/invalid hash.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Get the underlying u64 value.
    #[inline]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for TypeHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeHash({:#018x})", self.0)
    }
}

impl fmt::Display for TypeHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#018x}", self.0)
    }
}

/// Precomputed hashes for the engine's builtin kinds.
///
/// These use the engine-side names, so a wrapper descriptor and a
/// `TypeHash::from_name` lookup always agree.
pub mod builtins {
    use super::TypeHash;

    /// Hash for the `NoneType` singleton type.
    pub const NONE: TypeHash = TypeHash::from_name_const("NoneType");

    /// Hash for `bool`.
    pub const BOOL: TypeHash = TypeHash::from_name_const("bool");

    /// Hash for `int`.
    pub const INT: TypeHash = TypeHash::from_name_const("int");

    /// Hash for `float`.
    pub const FLOAT: TypeHash = TypeHash::from_name_const("float");

    /// Hash for `str`.
    pub const STR: TypeHash = TypeHash::from_name_const("str");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn determinism() {
        assert_eq!(TypeHash::from_name("Point"), TypeHash::from_name("Point"));
        assert_eq!(TypeHash::from_name("int"), builtins::INT);
    }

    #[test]
    fn uniqueness() {
        let hashes = [
            builtins::NONE,
            builtins::BOOL,
            builtins::INT,
            builtins::FLOAT,
            builtins::STR,
            TypeHash::from_name("Point"),
        ];
        for (i, a) in hashes.iter().enumerate() {
            for b in &hashes[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn builtin_constants_match_from_name() {
        assert_eq!(builtins::NONE, TypeHash::from_name("NoneType"));
        assert_eq!(builtins::BOOL, TypeHash::from_name("bool"));
        assert_eq!(builtins::INT, TypeHash::from_name("int"));
        assert_eq!(builtins::FLOAT, TypeHash::from_name("float"));
        assert_eq!(builtins::STR, TypeHash::from_name("str"));
    }

    #[test]
    fn empty_hash() {
        assert!(TypeHash::EMPTY.is_empty());
        assert!(!builtins::INT.is_empty());
    }

    #[test]
    fn display_and_debug() {
        let hash = TypeHash::from_name("int");
        assert!(format!("{hash}").starts_with("0x"));
        assert!(format!("{hash:?}").starts_with("TypeHash(0x"));
    }
}
