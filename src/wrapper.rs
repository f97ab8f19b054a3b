//! Script-side wrapper records for opaque native values.
//!
//! A [`WrapperRecord`] is the payload of a wrapped object handle: exactly one
//! native value plus the descriptor of its exact base type. Storage is
//! either *borrowed* — an alias into the engine heap the wrapper does not
//! own — or *owned* — a value whose lifetime is now tied to the wrapper.
//! The [`WrapperStorage`] enum makes that choice structural: a record can
//! never be both, and never neither.

use std::any::Any;
use std::fmt;

use crate::TypeHash;
use crate::class::ScriptClass;
use crate::heap::ObjectHandle;

/// How a registered class's wrappers store the native value.
///
/// Declared once per class (see [`ScriptClass::STORAGE`]); the marshaller's
/// ownership table keys on it together with the source value form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageForm {
    /// Wrappers alias engine-heap storage.
    Pointer,
    /// Wrappers embed an owned copy of the value.
    Value,
}

/// The storage of one wrapper: borrowed alias or owned value.
pub enum WrapperStorage {
    /// Alias into the engine heap; the wrapper does not own the storage.
    Borrowed(ObjectHandle),
    /// Owned value; its lifetime is tied to this wrapper.
    Owned(Box<dyn Any + Send + Sync>),
}

/// A script-side object embedding one native value and its type descriptor.
pub struct WrapperRecord {
    type_hash: TypeHash,
    storage: WrapperStorage,
}

impl WrapperRecord {
    /// Create a record. `type_hash` must be the descriptor of the exact
    /// native base type held in `storage`.
    pub fn new(type_hash: TypeHash, storage: WrapperStorage) -> Self {
        Self { type_hash, storage }
    }

    /// The descriptor of the wrapped type.
    pub fn type_hash(&self) -> TypeHash {
        self.type_hash
    }

    /// True if this wrapper aliases storage it does not own.
    pub fn is_borrowed(&self) -> bool {
        matches!(self.storage, WrapperStorage::Borrowed(_))
    }

    /// True if this wrapper owns its value.
    pub fn is_owned(&self) -> bool {
        matches!(self.storage, WrapperStorage::Owned(_))
    }

    /// The aliased heap handle, if storage is borrowed.
    pub fn borrowed_handle(&self) -> Option<ObjectHandle> {
        match self.storage {
            WrapperStorage::Borrowed(handle) => Some(handle),
            WrapperStorage::Owned(_) => None,
        }
    }

    /// The storage itself.
    pub fn storage(&self) -> &WrapperStorage {
        &self.storage
    }

    /// Mutable access to the storage.
    pub fn storage_mut(&mut self) -> &mut WrapperStorage {
        &mut self.storage
    }

    /// Borrow the owned value as `T`. `None` for borrowed storage or a
    /// descriptor mismatch.
    pub fn owned_ref<T: ScriptClass>(&self) -> Option<&T> {
        match &self.storage {
            WrapperStorage::Owned(value) => value.downcast_ref::<T>(),
            WrapperStorage::Borrowed(_) => None,
        }
    }

    /// Mutably borrow the owned value as `T`.
    pub fn owned_mut<T: ScriptClass>(&mut self) -> Option<&mut T> {
        match &mut self.storage {
            WrapperStorage::Owned(value) => value.downcast_mut::<T>(),
            WrapperStorage::Borrowed(_) => None,
        }
    }
}

impl fmt::Debug for WrapperRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let storage = match &self.storage {
            WrapperStorage::Borrowed(handle) => format!("Borrowed({handle:?})"),
            WrapperStorage::Owned(_) => "Owned(..)".to_string(),
        };
        f.debug_struct("WrapperRecord")
            .field("type_hash", &self.type_hash)
            .field("storage", &storage)
            .finish()
    }
}
