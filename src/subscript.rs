//! The combined get/set subscript protocol.
//!
//! The engine exposes indexing through a single hook taking three handles:
//! the container, the index, and a value slot. The reserved
//! [`Obj::Sentinel`] in the value slot selects a load; anything else is a
//! store. [`subscript`] is that hook over any [`ScriptIndex`] container, and
//! [`subscript_wrapper`] is the same entry point for containers living
//! behind a wrapper record.
//!
//! Misses follow each container's native contract rather than a common
//! policy: maps report [`RuntimeError::KeyNotFound`], sequences report
//! [`RuntimeError::IndexOutOfBounds`]. Sequence indices follow script
//! convention, so a negative index counts from the back.

use std::collections::HashMap;
use std::hash::{BuildHasher, Hash};

use crate::class::ScriptClass;
use crate::convert::{FromScript, ToScript};
use crate::error::{RuntimeError, SubscriptError};
use crate::heap::ObjectSpace;
use crate::obj::Obj;
use crate::wrapper::{WrapperRecord, WrapperStorage};

/// Indexable container, as the subscript hook sees it.
///
/// `Key` and `Elem` are converted with the builtin traits at the hook
/// boundary; implementations only deal in native types.
pub trait ScriptIndex {
    type Key;
    type Elem;

    /// Load the element at `key`.
    fn get(&self, key: &Self::Key) -> Result<&Self::Elem, RuntimeError>;

    /// Store `value` at `key`.
    fn set(&mut self, key: Self::Key, value: Self::Elem) -> Result<(), RuntimeError>;
}

impl<K, V, S> ScriptIndex for HashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    type Key = K;
    type Elem = V;

    fn get(&self, key: &K) -> Result<&V, RuntimeError> {
        HashMap::get(self, key).ok_or(RuntimeError::KeyNotFound)
    }

    fn set(&mut self, key: K, value: V) -> Result<(), RuntimeError> {
        self.insert(key, value);
        Ok(())
    }
}

/// Sequences index by `i64`; a negative index counts from the back.
impl<V> ScriptIndex for Vec<V> {
    type Key = i64;
    type Elem = V;

    fn get(&self, key: &i64) -> Result<&V, RuntimeError> {
        let index = normalize_index(*key, self.len())?;
        Ok(&self[index])
    }

    fn set(&mut self, key: i64, value: V) -> Result<(), RuntimeError> {
        let index = normalize_index(key, self.len())?;
        self[index] = value;
        Ok(())
    }
}

fn normalize_index(index: i64, len: usize) -> Result<usize, RuntimeError> {
    let out_of_bounds = RuntimeError::IndexOutOfBounds { index, len };
    let resolved = if index < 0 {
        index + len as i64
    } else {
        index
    };
    if resolved < 0 || resolved as usize >= len {
        return Err(out_of_bounds);
    }
    Ok(resolved as usize)
}

/// The combined subscript hook over a native container.
///
/// With [`Obj::Sentinel`] in `value` this is a load and returns the
/// element; otherwise it is a store and returns [`Obj::None`].
pub fn subscript<C>(container: &mut C, index: &Obj, value: Obj) -> Result<Obj, SubscriptError>
where
    C: ScriptIndex,
    C::Key: FromScript,
    C::Elem: FromScript + Clone + ToScript,
{
    let key = C::Key::from_script(index)?;
    if value.is_sentinel() {
        let elem = container.get(&key)?.clone();
        Ok(elem.to_script())
    } else {
        container.set(key, C::Elem::from_script(&value)?)?;
        Ok(Obj::None)
    }
}

/// The subscript hook for a container held in a wrapper record.
///
/// Resolves the concrete container out of the wrapper's storage first:
/// borrowed storage goes through the engine heap (a stale alias is a
/// [`RuntimeError::StaleHandle`]), owned storage is accessed in place. A
/// wrapper of a different class is a [`RuntimeError::WrapperClassMismatch`].
pub fn subscript_wrapper<C>(
    space: &mut ObjectSpace,
    wrapper: &mut WrapperRecord,
    index: &Obj,
    value: Obj,
) -> Result<Obj, SubscriptError>
where
    C: ScriptClass + ScriptIndex,
    C::Key: FromScript,
    C::Elem: FromScript + Clone + ToScript,
{
    if wrapper.type_hash() != C::type_hash() {
        return Err(RuntimeError::WrapperClassMismatch.into());
    }
    let container: &mut C = match wrapper.storage_mut() {
        WrapperStorage::Borrowed(handle) => {
            let handle = *handle;
            space.get_mut::<C>(handle).ok_or(RuntimeError::StaleHandle)?
        }
        WrapperStorage::Owned(value) => value
            .downcast_mut::<C>()
            .ok_or(RuntimeError::WrapperClassMismatch)?,
    };
    subscript(container, index, value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TypeHash;
    use crate::wrapper::StorageForm;
    use std::collections::HashMap;

    #[test]
    fn map_set_then_get_round_trips() {
        let mut map: HashMap<String, i64> = HashMap::new();

        let stored = subscript(&mut map, &Obj::Str("hp".into()), Obj::Int(40)).unwrap();
        assert!(stored.is_none());

        let loaded = subscript(&mut map, &Obj::Str("hp".into()), Obj::Sentinel).unwrap();
        assert!(matches!(loaded, Obj::Int(40)));
    }

    #[test]
    fn map_get_miss_is_key_not_found() {
        let mut map: HashMap<String, i64> = HashMap::new();
        let err = subscript(&mut map, &Obj::Str("missing".into()), Obj::Sentinel).unwrap_err();
        assert!(matches!(
            err,
            SubscriptError::Runtime(RuntimeError::KeyNotFound)
        ));
    }

    #[test]
    fn map_set_inserts_and_overwrites() {
        let mut map: HashMap<String, i64> = HashMap::new();
        subscript(&mut map, &Obj::Str("k".into()), Obj::Int(1)).unwrap();
        subscript(&mut map, &Obj::Str("k".into()), Obj::Int(2)).unwrap();
        assert_eq!(map.get("k"), Some(&2));
    }

    #[test]
    fn vec_get_and_set_in_bounds() {
        let mut items = vec![10i64, 20, 30];

        let loaded = subscript(&mut items, &Obj::Int(1), Obj::Sentinel).unwrap();
        assert!(matches!(loaded, Obj::Int(20)));

        subscript(&mut items, &Obj::Int(2), Obj::Int(99)).unwrap();
        assert_eq!(items, vec![10, 20, 99]);
    }

    #[test]
    fn vec_negative_index_counts_from_back() {
        let mut items = vec![1i64, 2, 3];
        let loaded = subscript(&mut items, &Obj::Int(-1), Obj::Sentinel).unwrap();
        assert!(matches!(loaded, Obj::Int(3)));

        subscript(&mut items, &Obj::Int(-3), Obj::Int(7)).unwrap();
        assert_eq!(items, vec![7, 2, 3]);
    }

    #[test]
    fn vec_out_of_bounds_both_directions() {
        let mut items = vec![1i64, 2, 3];
        for bad in [3i64, -4] {
            let err = subscript(&mut items, &Obj::Int(bad), Obj::Sentinel).unwrap_err();
            assert!(matches!(
                err,
                SubscriptError::Runtime(RuntimeError::IndexOutOfBounds { index, len: 3 })
                    if index == bad
            ));
        }
    }

    #[test]
    fn bad_key_type_is_a_conversion_error() {
        let mut items = vec![1i64];
        let err = subscript(&mut items, &Obj::Str("zero".into()), Obj::Sentinel).unwrap_err();
        assert!(matches!(err, SubscriptError::Convert(_)));
    }

    #[derive(Clone, Default)]
    struct Scores(HashMap<String, i64>);

    impl ScriptClass for Scores {
        const STORAGE: StorageForm = StorageForm::Pointer;

        fn type_hash() -> TypeHash {
            TypeHash::from_name("Scores")
        }

        fn class_name() -> &'static str {
            "Scores"
        }
    }

    impl ScriptIndex for Scores {
        type Key = String;
        type Elem = i64;

        fn get(&self, key: &String) -> Result<&i64, RuntimeError> {
            self.0.get(key).ok_or(RuntimeError::KeyNotFound)
        }

        fn set(&mut self, key: String, value: i64) -> Result<(), RuntimeError> {
            self.0.insert(key, value);
            Ok(())
        }
    }

    #[test]
    fn wrapper_subscript_borrowed_storage() {
        let mut space = ObjectSpace::new();
        let handle = space.allocate(Scores::default());
        let mut wrapper =
            WrapperRecord::new(Scores::type_hash(), WrapperStorage::Borrowed(handle));

        subscript_wrapper::<Scores>(&mut space, &mut wrapper, &Obj::Str("a".into()), Obj::Int(5))
            .unwrap();
        let loaded =
            subscript_wrapper::<Scores>(&mut space, &mut wrapper, &Obj::Str("a".into()), Obj::Sentinel)
                .unwrap();
        assert!(matches!(loaded, Obj::Int(5)));

        // Writes go to the shared heap storage.
        assert_eq!(space.get::<Scores>(handle).unwrap().0.get("a"), Some(&5));
    }

    #[test]
    fn wrapper_subscript_owned_storage() {
        let mut space = ObjectSpace::new();
        let mut wrapper = WrapperRecord::new(
            Scores::type_hash(),
            WrapperStorage::Owned(Box::new(Scores::default())),
        );

        subscript_wrapper::<Scores>(&mut space, &mut wrapper, &Obj::Str("b".into()), Obj::Int(9))
            .unwrap();
        let loaded =
            subscript_wrapper::<Scores>(&mut space, &mut wrapper, &Obj::Str("b".into()), Obj::Sentinel)
                .unwrap();
        assert!(matches!(loaded, Obj::Int(9)));
    }

    #[test]
    fn wrapper_subscript_class_mismatch() {
        let mut space = ObjectSpace::new();
        let mut wrapper =
            WrapperRecord::new(TypeHash::from_name("Elsewhere"), WrapperStorage::Owned(Box::new(0i64)));
        let err = subscript_wrapper::<Scores>(&mut space, &mut wrapper, &Obj::Int(0), Obj::Sentinel)
            .unwrap_err();
        assert!(matches!(
            err,
            SubscriptError::Runtime(RuntimeError::WrapperClassMismatch)
        ));
    }

    #[test]
    fn wrapper_subscript_stale_alias() {
        let mut space = ObjectSpace::new();
        let handle = space.allocate(Scores::default());
        let mut wrapper =
            WrapperRecord::new(Scores::type_hash(), WrapperStorage::Borrowed(handle));
        space.free(handle);

        let err = subscript_wrapper::<Scores>(&mut space, &mut wrapper, &Obj::Int(0), Obj::Sentinel)
            .unwrap_err();
        assert!(matches!(
            err,
            SubscriptError::Runtime(RuntimeError::StaleHandle)
        ));
    }
}
