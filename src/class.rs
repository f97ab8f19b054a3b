//! The [`ScriptClass`] trait for opaque native types exposed to scripts.
//!
//! Every native type crossing the boundary as a wrapped object implements
//! this trait. It supplies the type's descriptor identity, its script-visible
//! name, and the storage form its wrapper uses — the three facts the
//! registry, heap, and marshaller all key on.
//!
//! # Example
//!
//! ```
//! use micropy_ffi::{ScriptClass, StorageForm, TypeHash};
//!
//! #[derive(Clone, Default)]
//! struct Point {
//!     x: f64,
//!     y: f64,
//! }
//!
//! impl ScriptClass for Point {
//!     const STORAGE: StorageForm = StorageForm::Value;
//!
//!     fn type_hash() -> TypeHash {
//!         TypeHash::from_name("Point")
//!     }
//!
//!     fn class_name() -> &'static str {
//!         "Point"
//!     }
//! }
//! ```

use std::any::Any;

use crate::TypeHash;
use crate::wrapper::StorageForm;

/// Trait for native types registrable as script-side wrapped objects.
///
/// The descriptor returned by [`type_hash`](ScriptClass::type_hash) must be
/// stable and unique among registered classes; the conventional
/// implementation hashes the class name. [`STORAGE`](ScriptClass::STORAGE)
/// declares how wrappers of this class hold the native value and is fixed
/// per class, exactly like the wrapper declaration in the generated binding.
pub trait ScriptClass: Any + Send + Sync {
    /// How a wrapper of this class stores its native value.
    const STORAGE: StorageForm;

    /// The descriptor identity of this class.
    fn type_hash() -> TypeHash;

    /// The script-visible class name.
    fn class_name() -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Default)]
    struct Probe;

    impl ScriptClass for Probe {
        const STORAGE: StorageForm = StorageForm::Value;

        fn type_hash() -> TypeHash {
            TypeHash::from_name("Probe")
        }

        fn class_name() -> &'static str {
            "Probe"
        }
    }

    #[test]
    fn identity_matches_name() {
        assert_eq!(Probe::type_hash(), TypeHash::from_name("Probe"));
        assert_eq!(Probe::class_name(), "Probe");
        assert_eq!(Probe::STORAGE, StorageForm::Value);
    }
}
