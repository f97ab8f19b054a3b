//! Error types for the marshalling layer.
//!
//! Errors fall into two classes:
//!
//! - [`RegistryError`]: definition-time failures. A binding that refers to a
//!   type with no conversion rule, or that would need to wrap a temporary
//!   value into pointer storage without a registered allocator, fails while
//!   the registry is being built — before any script call executes.
//! - [`ConversionError`] / [`RuntimeError`]: call-time failures. Builtin
//!   conversions report typed mismatches; subscript and heap access report
//!   the container's native miss contract.
//!
//! Opaque-type extraction deliberately does *not* error on a type mismatch;
//! see [`MarshalCx::unwrap_value`](crate::MarshalCx::unwrap_value) for the
//! default-substitution policy.

use thiserror::Error;

/// Definition-time registration and classification errors.
///
/// All of these are detected while building the [`TypeRegistry`](crate::TypeRegistry)
/// or resolving a binding's signature, and prevent the binding from being
/// registered at all.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// A binding signature names a type with no conversion rule.
    #[error("no conversion defined for type {0}")]
    NoConversion(String),

    /// Two classes were registered under the same type hash.
    #[error("duplicate class registration: {0}")]
    DuplicateType(String),

    /// Two classes were registered under the same script-visible name.
    #[error("duplicate class name: {0}")]
    DuplicateClassName(String),

    /// A pointer-storage class would receive temporary values but has no
    /// allocator to give them addressable storage.
    #[error("class '{0}' stores a pointer and returns by value, but has no registered allocator")]
    MissingAllocator(&'static str),
}

/// Typed mismatch errors for builtin scalar, boolean, and string conversions.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConversionError {
    /// The handle holds a different builtin kind than the target type.
    #[error("type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        expected: &'static str,
        actual: &'static str,
    },

    /// An integer handle does not fit the narrower native type.
    #[error("integer value {value} out of range for {target_type}")]
    IntegerOverflow {
        value: i64,
        target_type: &'static str,
    },

    /// A store was attempted through an attribute with no setter.
    #[error("attribute '{0}' is read-only")]
    ReadOnlyAttribute(&'static str),
}

/// Call-time faults from subscript access and engine-heap aliasing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// Mapping lookup miss on a subscript get.
    #[error("key not found")]
    KeyNotFound,

    /// Sequence index outside the container bounds.
    #[error("index {index} out of range for length {len}")]
    IndexOutOfBounds { index: i64, len: usize },

    /// A borrowed wrapper aliases heap storage that is no longer live.
    #[error("stale object handle")]
    StaleHandle,

    /// A temporary needed addressable storage but the class has no
    /// allocator. Normally caught at definition time.
    #[error("no allocator registered for class '{0}'")]
    MissingAllocator(&'static str),

    /// A wrapper does not hold the class the caller asked for.
    #[error("wrapper does not hold the expected class")]
    WrapperClassMismatch,
}

/// Combined error surface of the subscript protocol, which converts with the
/// builtin traits and then touches the container.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SubscriptError {
    #[error(transparent)]
    Convert(#[from] ConversionError),

    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}
