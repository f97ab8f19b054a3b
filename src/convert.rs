//! Builtin conversion traits between native values and script handles.
//!
//! - [`FromScript`]: extract a native scalar, boolean, or string from an [`Obj`]
//! - [`ToScript`]: produce a fresh handle from a native value
//!
//! Every conversion resolves at compile time per native type, and each
//! storage form is its own rule: `ToScript` is implemented independently for
//! `T`, `&T`, and `&mut T` scalars, because the dereference happens inside
//! the rule, not at the call site. `ToScript` always builds a new immutable
//! handle — no interning, no identity sharing.
//!
//! Integer handles travel as `i64`; narrowing extraction is bounds-checked.
//! `u64` is the exception and round-trips via bit reinterpretation, so the
//! full unsigned range survives the signed carrier. Strings are owned Rust
//! strings: content and length are preserved exactly, embedded NUL bytes
//! included.
//!
//! ## Example
//!
//! ```
//! use micropy_ffi::{FromScript, Obj, ToScript};
//!
//! let handle = 42_i32.to_script();
//! let back = i32::from_script(&handle).unwrap();
//! assert_eq!(back, 42);
//! ```

use crate::error::ConversionError;
use crate::obj::Obj;

/// Extract a native value from a script handle.
///
/// Returns a [`ConversionError`] if the handle carries an incompatible kind.
pub trait FromScript: Sized {
    /// Extract a value from the given handle.
    fn from_script(obj: &Obj) -> Result<Self, ConversionError>;
}

/// Convert a native value into a fresh script handle.
pub trait ToScript {
    /// Build a new handle for this value.
    fn to_script(self) -> Obj;
}

// ============================================================================
// Integer implementations
// ============================================================================

macro_rules! impl_script_int {
    ($($ty:ty),*) => {
        $(
            impl FromScript for $ty {
                fn from_script(obj: &Obj) -> Result<Self, ConversionError> {
                    match obj {
                        Obj::Int(v) => {
                            if *v >= Self::MIN as i64 && *v <= Self::MAX as i64 {
                                Ok(*v as Self)
                            } else {
                                Err(ConversionError::IntegerOverflow {
                                    value: *v,
                                    target_type: stringify!($ty),
                                })
                            }
                        }
                        _ => Err(ConversionError::TypeMismatch {
                            expected: "int",
                            actual: obj.type_name(),
                        }),
                    }
                }
            }

            impl ToScript for $ty {
                fn to_script(self) -> Obj {
                    Obj::Int(self as i64)
                }
            }

            impl ToScript for &$ty {
                fn to_script(self) -> Obj {
                    Obj::Int(*self as i64)
                }
            }

            impl ToScript for &mut $ty {
                fn to_script(self) -> Obj {
                    Obj::Int(*self as i64)
                }
            }
        )*
    };
}

impl_script_int!(i8, i16, i32, i64);

macro_rules! impl_script_uint {
    ($($ty:ty),*) => {
        $(
            impl FromScript for $ty {
                fn from_script(obj: &Obj) -> Result<Self, ConversionError> {
                    match obj {
                        Obj::Int(v) => {
                            if *v >= 0 && *v <= Self::MAX as i64 {
                                Ok(*v as Self)
                            } else {
                                Err(ConversionError::IntegerOverflow {
                                    value: *v,
                                    target_type: stringify!($ty),
                                })
                            }
                        }
                        _ => Err(ConversionError::TypeMismatch {
                            expected: "int",
                            actual: obj.type_name(),
                        }),
                    }
                }
            }

            impl ToScript for $ty {
                fn to_script(self) -> Obj {
                    Obj::Int(self as i64)
                }
            }

            impl ToScript for &$ty {
                fn to_script(self) -> Obj {
                    Obj::Int(*self as i64)
                }
            }

            impl ToScript for &mut $ty {
                fn to_script(self) -> Obj {
                    Obj::Int(*self as i64)
                }
            }
        )*
    };
}

impl_script_uint!(u8, u16, u32);

// u64 reinterprets bits through the i64 carrier so the full range survives.
impl FromScript for u64 {
    fn from_script(obj: &Obj) -> Result<Self, ConversionError> {
        match obj {
            Obj::Int(v) => Ok(*v as u64),
            _ => Err(ConversionError::TypeMismatch {
                expected: "int",
                actual: obj.type_name(),
            }),
        }
    }
}

impl ToScript for u64 {
    fn to_script(self) -> Obj {
        Obj::Int(self as i64)
    }
}

impl ToScript for &u64 {
    fn to_script(self) -> Obj {
        Obj::Int(*self as i64)
    }
}

impl ToScript for &mut u64 {
    fn to_script(self) -> Obj {
        Obj::Int(*self as i64)
    }
}

// ============================================================================
// Float implementations
// ============================================================================

impl FromScript for f32 {
    fn from_script(obj: &Obj) -> Result<Self, ConversionError> {
        match obj {
            // Narrowing to f32 keeps infinities and NaN as-is.
            Obj::Float(v) => Ok(*v as f32),
            Obj::Int(v) => Ok(*v as f32),
            _ => Err(ConversionError::TypeMismatch {
                expected: "float",
                actual: obj.type_name(),
            }),
        }
    }
}

impl FromScript for f64 {
    fn from_script(obj: &Obj) -> Result<Self, ConversionError> {
        match obj {
            Obj::Float(v) => Ok(*v),
            Obj::Int(v) => Ok(*v as f64),
            _ => Err(ConversionError::TypeMismatch {
                expected: "float",
                actual: obj.type_name(),
            }),
        }
    }
}

macro_rules! impl_to_script_float {
    ($($ty:ty),*) => {
        $(
            impl ToScript for $ty {
                fn to_script(self) -> Obj {
                    Obj::Float(self as f64)
                }
            }

            impl ToScript for &$ty {
                fn to_script(self) -> Obj {
                    Obj::Float(*self as f64)
                }
            }

            impl ToScript for &mut $ty {
                fn to_script(self) -> Obj {
                    Obj::Float(*self as f64)
                }
            }
        )*
    };
}

impl_to_script_float!(f32, f64);

// ============================================================================
// Bool implementation
// ============================================================================

impl FromScript for bool {
    fn from_script(obj: &Obj) -> Result<Self, ConversionError> {
        match obj {
            Obj::Bool(v) => Ok(*v),
            _ => Err(ConversionError::TypeMismatch {
                expected: "bool",
                actual: obj.type_name(),
            }),
        }
    }
}

impl ToScript for bool {
    fn to_script(self) -> Obj {
        Obj::Bool(self)
    }
}

impl ToScript for &bool {
    fn to_script(self) -> Obj {
        Obj::Bool(*self)
    }
}

impl ToScript for &mut bool {
    fn to_script(self) -> Obj {
        Obj::Bool(*self)
    }
}

// ============================================================================
// String implementations
// ============================================================================

impl FromScript for String {
    fn from_script(obj: &Obj) -> Result<Self, ConversionError> {
        match obj {
            Obj::Str(s) => Ok(s.clone()),
            _ => Err(ConversionError::TypeMismatch {
                expected: "str",
                actual: obj.type_name(),
            }),
        }
    }
}

impl ToScript for String {
    fn to_script(self) -> Obj {
        Obj::Str(self)
    }
}

impl ToScript for &str {
    fn to_script(self) -> Obj {
        Obj::Str(self.to_owned())
    }
}

// ============================================================================
// Unit (functions without a result return None)
// ============================================================================

impl FromScript for () {
    fn from_script(obj: &Obj) -> Result<Self, ConversionError> {
        match obj {
            Obj::None => Ok(()),
            _ => Err(ConversionError::TypeMismatch {
                expected: "NoneType",
                actual: obj.type_name(),
            }),
        }
    }
}

impl ToScript for () {
    fn to_script(self) -> Obj {
        Obj::None
    }
}
