//! Opaque-type marshalling: Is / From / To over wrapped native values.
//!
//! [`MarshalCx`] pairs the class registry with the engine heap and carries
//! the three opaque-type operations:
//!
//! - [`is_instance`](MarshalCx::is_instance): side-effect-free descriptor
//!   check, safe on any handle.
//! - [`unwrap_value`](MarshalCx::unwrap_value) /
//!   [`unwrap_ref`](MarshalCx::unwrap_ref): extraction with the documented
//!   soft-failure policy — a mismatched handle yields a default value or
//!   null instead of raising, trading crash-safety for silent masking of
//!   caller bugs.
//! - [`wrap`](MarshalCx::wrap): always allocates a fresh wrapper record and
//!   fills its storage from the ownership table below.
//!
//! The ownership table, keyed jointly on the source value form and the
//! class's declared storage form:
//!
//! | source            | class stores Pointer      | class stores Value |
//! |-------------------|---------------------------|--------------------|
//! | `Ptr(handle)`     | alias the handle          | deref and copy     |
//! | `Ref(handle)`     | take its address (alias)  | copy               |
//! | `Value(v)`        | allocator, then alias     | copy directly      |
//!
//! The `Value` → Pointer cell is the only one that can fail by
//! construction: without a registered allocator the temporary has no
//! addressable storage. Definition-time resolution
//! ([`TypeRegistry::resolve_result`](crate::TypeRegistry::resolve_result))
//! rejects such bindings before any call runs; the same condition is still
//! checked here at call time.

use crate::class::ScriptClass;
use crate::error::RuntimeError;
use crate::heap::{ObjectHandle, ObjectSpace};
use crate::obj::Obj;
use crate::registry::TypeRegistry;
use crate::wrapper::{StorageForm, WrapperRecord, WrapperStorage};

/// A native value about to cross into script space, tagged with its form.
///
/// `Ptr` and `Ref` both name addressable engine-heap storage but are
/// distinct rules: a pointer may be aliased as-is, while a reference has
/// its address taken. `Value` is a temporary with no address of its own.
#[derive(Debug, Clone, Copy)]
pub enum NativeSource<T> {
    /// An addressable value, possibly shared.
    Ptr(ObjectHandle),
    /// A borrowed value, never null.
    Ref(ObjectHandle),
    /// A temporary produced by native code.
    Value(T),
}

/// Marshalling context: registry plus engine heap.
pub struct MarshalCx<'a> {
    registry: &'a TypeRegistry,
    space: &'a mut ObjectSpace,
}

impl<'a> MarshalCx<'a> {
    /// Create a context over the given registry and heap.
    pub fn new(registry: &'a TypeRegistry, space: &'a mut ObjectSpace) -> Self {
        Self { registry, space }
    }

    /// The registry this context resolves classes against.
    pub fn registry(&self) -> &TypeRegistry {
        self.registry
    }

    /// The engine heap.
    pub fn space(&self) -> &ObjectSpace {
        self.space
    }

    /// Mutable heap access.
    pub fn space_mut(&mut self) -> &mut ObjectSpace {
        self.space
    }

    /// True iff `obj` wraps exactly class `T`.
    ///
    /// Side-effect free and safe on any handle, wrapper or not.
    pub fn is_instance<T: ScriptClass>(&self, obj: &Obj) -> bool {
        matches!(obj, Obj::Wrapper(record) if record.type_hash() == T::type_hash())
    }

    /// Extract a `T` by value.
    ///
    /// Checks [`is_instance`](Self::is_instance) first; on any mismatch —
    /// wrong class, non-wrapper handle, or a stale borrowed alias — returns
    /// `T::default()` instead of failing. The default is constructed per
    /// call; no shared instance is handed out. This deliberately masks
    /// script-side type errors in exchange for never faulting on malformed
    /// input.
    pub fn unwrap_value<T: ScriptClass + Default + Clone>(&self, obj: &Obj) -> T {
        if let Obj::Wrapper(record) = obj
            && record.type_hash() == T::type_hash()
        {
            match record.storage() {
                WrapperStorage::Borrowed(handle) => {
                    if let Some(value) = self.space.get::<T>(*handle) {
                        return value.clone();
                    }
                }
                WrapperStorage::Owned(value) => {
                    if let Some(value) = value.downcast_ref::<T>() {
                        return value.clone();
                    }
                }
            }
        }
        T::default()
    }

    /// Borrow the wrapped `T`.
    ///
    /// The pointer-form counterpart of [`unwrap_value`](Self::unwrap_value):
    /// a mismatched or stale handle yields `None` (the documented null),
    /// never a fault.
    pub fn unwrap_ref<'o, T: ScriptClass>(&'o self, obj: &'o Obj) -> Option<&'o T> {
        let record = obj.as_wrapper()?;
        if record.type_hash() != T::type_hash() {
            return None;
        }
        match record.storage() {
            WrapperStorage::Borrowed(handle) => self.space.get::<T>(*handle),
            WrapperStorage::Owned(value) => value.downcast_ref::<T>(),
        }
    }

    /// Mutably borrow the wrapped `T`; `None` on mismatch, like
    /// [`unwrap_ref`](Self::unwrap_ref).
    pub fn unwrap_mut<'o, T: ScriptClass>(&'o mut self, obj: &'o mut Obj) -> Option<&'o mut T> {
        let record = obj.as_wrapper_mut()?;
        if record.type_hash() != T::type_hash() {
            return None;
        }
        match record.storage_mut() {
            WrapperStorage::Borrowed(handle) => {
                let handle = *handle;
                self.space.get_mut::<T>(handle)
            }
            WrapperStorage::Owned(value) => value.downcast_mut::<T>(),
        }
    }

    /// Wrap a native value into a fresh script-side wrapper.
    ///
    /// Always allocates a new [`WrapperRecord`] carrying `T`'s exact
    /// descriptor, then fills storage per the module-level ownership table.
    pub fn wrap<T: ScriptClass + Clone>(
        &mut self,
        source: NativeSource<T>,
    ) -> Result<Obj, RuntimeError> {
        let storage = match (source, T::STORAGE) {
            // Pointer source into pointer storage: alias the pointer.
            (NativeSource::Ptr(handle), StorageForm::Pointer) => WrapperStorage::Borrowed(handle),

            // Pointer source into value storage: dereference and copy.
            (NativeSource::Ptr(handle), StorageForm::Value) => {
                let value = self
                    .space
                    .get::<T>(handle)
                    .ok_or(RuntimeError::StaleHandle)?
                    .clone();
                WrapperStorage::Owned(Box::new(value))
            }

            // Reference source into pointer storage: take its address.
            (NativeSource::Ref(handle), StorageForm::Pointer) => WrapperStorage::Borrowed(handle),

            // Reference source into value storage: copy.
            (NativeSource::Ref(handle), StorageForm::Value) => {
                let value = self
                    .space
                    .get::<T>(handle)
                    .ok_or(RuntimeError::StaleHandle)?
                    .clone();
                WrapperStorage::Owned(Box::new(value))
            }

            // Temporary into pointer storage: allocator gives it an
            // address, the wrapper aliases the result. The storage now
            // belongs to the wrapper; this layer never frees it.
            (NativeSource::Value(value), StorageForm::Pointer) => {
                let allocator = self
                    .registry
                    .get_class(T::type_hash())
                    .and_then(|class| class.allocator())
                    .ok_or(RuntimeError::MissingAllocator(T::class_name()))?;
                let handle = allocator(self.space);
                *self
                    .space
                    .get_mut::<T>(handle)
                    .ok_or(RuntimeError::StaleHandle)? = value;
                WrapperStorage::Borrowed(handle)
            }

            // Temporary into value storage: forms match, copy directly.
            (NativeSource::Value(value), StorageForm::Value) => {
                WrapperStorage::Owned(Box::new(value))
            }
        };

        Ok(Obj::Wrapper(WrapperRecord::new(T::type_hash(), storage)))
    }
}
