//! Engine-heap stand-in: generational storage for addressable native values.
//!
//! [`ObjectSpace`] models the script engine's memory manager for native
//! storage. Values that exist "by pointer" or "by reference" on the native
//! side live here; handles into it are what borrowed wrappers alias.
//!
//! Slots use generational indices, so a handle that outlives its storage is
//! detected as stale rather than reading reused memory. The marshalling
//! layer itself never deallocates: storage it allocates belongs to the
//! script-side wrapper from then on, and reclamation is the engine's
//! business. [`free`](ObjectSpace::free) exists so tests can simulate the
//! engine collecting an object.

use std::any::Any;
use std::fmt;

use crate::TypeHash;
use crate::class::ScriptClass;

/// Handle to native storage inside the [`ObjectSpace`].
///
/// Copyable and cheap; carries the descriptor of the stored type so identity
/// checks need no heap access.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ObjectHandle {
    /// Index into the slot table.
    pub index: u32,
    /// Generation for stale-handle detection.
    pub generation: u32,
    /// Descriptor of the stored type.
    pub type_hash: TypeHash,
}

struct Slot {
    generation: u32,
    value: Option<Box<dyn Any + Send + Sync>>,
}

/// Generational arena holding addressable native values.
pub struct ObjectSpace {
    slots: Vec<Slot>,
    free_list: Vec<u32>,
}

impl ObjectSpace {
    /// Create an empty space.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_list: Vec::new(),
        }
    }

    /// Allocate storage for `value`, tied to its class descriptor.
    pub fn allocate<T: ScriptClass>(&mut self, value: T) -> ObjectHandle {
        let type_hash = T::type_hash();
        let boxed: Box<dyn Any + Send + Sync> = Box::new(value);

        if let Some(index) = self.free_list.pop() {
            let slot = &mut self.slots[index as usize];
            slot.value = Some(boxed);
            ObjectHandle {
                index,
                generation: slot.generation,
                type_hash,
            }
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(Slot {
                generation: 0,
                value: Some(boxed),
            });
            ObjectHandle {
                index,
                generation: 0,
                type_hash,
            }
        }
    }

    /// Borrow the value a handle points at.
    ///
    /// Returns `None` if the handle is stale or the type does not match.
    pub fn get<T: ScriptClass>(&self, handle: ObjectHandle) -> Option<&T> {
        let slot = self.slots.get(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.value.as_ref()?.downcast_ref::<T>()
    }

    /// Mutably borrow the value a handle points at.
    ///
    /// Returns `None` if the handle is stale or the type does not match.
    pub fn get_mut<T: ScriptClass>(&mut self, handle: ObjectHandle) -> Option<&mut T> {
        let slot = self.slots.get_mut(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.value.as_mut()?.downcast_mut::<T>()
    }

    /// True if the handle still points at live storage.
    pub fn is_live(&self, handle: ObjectHandle) -> bool {
        self.slots
            .get(handle.index as usize)
            .is_some_and(|slot| slot.generation == handle.generation && slot.value.is_some())
    }

    /// Simulate the engine collecting an object. The slot is reusable and
    /// the generation advances, invalidating existing handles.
    pub fn free(&mut self, handle: ObjectHandle) {
        if let Some(slot) = self.slots.get_mut(handle.index as usize)
            && slot.generation == handle.generation
            && slot.value.is_some()
        {
            slot.value = None;
            slot.generation = slot.generation.wrapping_add(1);
            self.free_list.push(handle.index);
        }
    }

    /// Number of live objects.
    pub fn live_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.value.is_some()).count()
    }
}

impl Default for ObjectSpace {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ObjectSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectSpace")
            .field("slot_count", &self.slots.len())
            .field("free_count", &self.free_list.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wrapper::StorageForm;

    #[derive(Clone, Default, PartialEq, Debug)]
    struct Counter(i64);

    impl ScriptClass for Counter {
        const STORAGE: StorageForm = StorageForm::Pointer;

        fn type_hash() -> TypeHash {
            TypeHash::from_name("Counter")
        }

        fn class_name() -> &'static str {
            "Counter"
        }
    }

    #[derive(Clone, Default)]
    struct Other;

    impl ScriptClass for Other {
        const STORAGE: StorageForm = StorageForm::Value;

        fn type_hash() -> TypeHash {
            TypeHash::from_name("Other")
        }

        fn class_name() -> &'static str {
            "Other"
        }
    }

    #[test]
    fn allocate_and_get() {
        let mut space = ObjectSpace::new();
        let handle = space.allocate(Counter(42));

        assert_eq!(handle.type_hash, Counter::type_hash());
        assert_eq!(space.get::<Counter>(handle), Some(&Counter(42)));
    }

    #[test]
    fn get_mut_writes_through() {
        let mut space = ObjectSpace::new();
        let handle = space.allocate(Counter(1));

        if let Some(value) = space.get_mut::<Counter>(handle) {
            value.0 = 7;
        }
        assert_eq!(space.get::<Counter>(handle), Some(&Counter(7)));
    }

    #[test]
    fn wrong_type_is_none() {
        let mut space = ObjectSpace::new();
        let handle = space.allocate(Counter(1));
        assert!(space.get::<Other>(handle).is_none());
    }

    #[test]
    fn freed_handles_go_stale() {
        let mut space = ObjectSpace::new();
        let old = space.allocate(Counter(1));
        space.free(old);
        assert!(!space.is_live(old));
        assert!(space.get::<Counter>(old).is_none());

        // Slot reuse must not resurrect the old handle.
        let new = space.allocate(Counter(2));
        assert_eq!(new.index, old.index);
        assert!(space.get::<Counter>(old).is_none());
        assert_eq!(space.get::<Counter>(new), Some(&Counter(2)));
    }

    #[test]
    fn live_count_tracks_frees() {
        let mut space = ObjectSpace::new();
        let a = space.allocate(Counter(1));
        let _b = space.allocate(Counter(2));
        assert_eq!(space.live_count(), 2);
        space.free(a);
        assert_eq!(space.live_count(), 1);
    }
}
