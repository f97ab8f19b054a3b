//! Marshalling layer between native Rust code and an embedded MicroPython-style
//! script engine.
//!
//! This crate carries values across the native/script boundary. It includes:
//! - Value conversion traits (FromScript, ToScript) for builtin scalars,
//!   booleans, and strings
//! - Opaque-class wrapping and extraction ([`MarshalCx`]) over a generational
//!   engine heap ([`ObjectSpace`])
//! - Definition-time class registration and signature resolution
//!   ([`TypeRegistry`])
//! - Keyword-argument lookup ([`KwArgs`]), attribute tables ([`AttrTable`]),
//!   and the combined get/set subscript protocol

// Error types
mod error;
pub use error::{ConversionError, RegistryError, RuntimeError, SubscriptError};

// Type identity
mod type_hash;
pub use type_hash::{TypeHash, builtins};

// Interned symbols
mod symbol;
pub use symbol::{Sym, SymbolTable};

// Opaque-class declaration
mod class;
pub use class::ScriptClass;

// Engine heap
mod heap;
pub use heap::{ObjectHandle, ObjectSpace};

// Wrapper records
mod wrapper;
pub use wrapper::{StorageForm, WrapperRecord, WrapperStorage};

// Script handles
mod obj;
pub use obj::Obj;

// Builtin conversion traits
mod convert;
pub use convert::{FromScript, ToScript};

// Class registry and signature resolution
pub mod registry;
pub use registry::{
    AllocFn, BaseKind, ClassDef, ClassFlags, ConversionRule, NativeType, TypeRegistry,
    TypeRegistryBuilder, ValueForm, alloc_default,
};

// Opaque-type marshalling
mod marshal;
pub use marshal::{MarshalCx, NativeSource};

// Keyword arguments
mod kwargs;
pub use kwargs::KwArgs;

// Attribute tables
mod attr;
pub use attr::{AttrAccessor, AttrTable};

// Subscript protocol
mod subscript;
pub use subscript::{ScriptIndex, subscript, subscript_wrapper};
