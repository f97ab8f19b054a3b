//! Class registration and definition-time conversion-rule resolution.
//!
//! Generated bindings register every opaque class up front, then resolve
//! each parameter and result type of their signatures against the built
//! [`TypeRegistry`]. Resolution happens once, at definition time: a type
//! with no rule, a duplicate registration, or a pointer-storage class that
//! would need to wrap temporaries without an allocator all fail *before*
//! any script call can execute.
//!
//! Resolution priority follows the classifier contract: an exact registered
//! class mapping wins; otherwise a builtin rule is selected by base kind and
//! value form (pointer, reference, and value forms are independent rules);
//! otherwise the type has no conversion.

use std::fmt;

use bitflags::bitflags;
use rustc_hash::FxHashMap;

use crate::TypeHash;
use crate::class::ScriptClass;
use crate::error::RegistryError;
use crate::heap::{ObjectHandle, ObjectSpace};
use crate::wrapper::StorageForm;

/// Allocator producing fresh addressable native storage for one class.
///
/// Invoked only when a temporary value must be wrapped into pointer
/// storage. The storage's lifetime thereafter belongs to the script-side
/// wrapper; this layer never deallocates it.
pub type AllocFn = fn(&mut ObjectSpace) -> ObjectHandle;

/// Ready-made allocator for classes with a `Default` value.
pub fn alloc_default<T: ScriptClass + Default>(space: &mut ObjectSpace) -> ObjectHandle {
    space.allocate(T::default())
}

bitflags! {
    /// Which protocol slots a class's generated binding fills.
    ///
    /// The binding emits a subscript or attribute hook only when the class
    /// declares it, mirroring the engine's per-type slot table.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ClassFlags: u8 {
        /// The class exposes the combined get/set subscript hook.
        const HAS_SUBSCRIPT = 1 << 0;
        /// The class exposes an attribute table.
        const HAS_ATTR = 1 << 1;
    }
}

/// Registry record for one opaque class.
#[derive(Debug, Clone)]
pub struct ClassDef {
    name: &'static str,
    type_hash: TypeHash,
    storage: StorageForm,
    flags: ClassFlags,
    allocator: Option<AllocFn>,
}

impl ClassDef {
    /// Script-visible class name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Descriptor identity.
    pub fn type_hash(&self) -> TypeHash {
        self.type_hash
    }

    /// How wrappers of this class store the native value.
    pub fn storage(&self) -> StorageForm {
        self.storage
    }

    /// Protocol slots the class declares.
    pub fn flags(&self) -> ClassFlags {
        self.flags
    }

    /// The registered allocator, if any.
    pub fn allocator(&self) -> Option<AllocFn> {
        self.allocator
    }
}

// ============================================================================
// Native type classification
// ============================================================================

/// Base category of a native type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseKind {
    Bool,
    Int,
    Float,
    Str,
    /// A registered opaque class, identified by descriptor.
    Opaque(TypeHash),
}

/// Storage form of a native value as it appears in a signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueForm {
    Pointer,
    Reference,
    Value,
}

/// A native type as the classifier sees it: base category crossed with
/// value form. Pointer-to-scalar, reference-to-scalar, and by-value scalar
/// are three distinct types resolving to three distinct rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NativeType {
    pub kind: BaseKind,
    pub form: ValueForm,
}

impl NativeType {
    /// Build a native type description.
    pub const fn new(kind: BaseKind, form: ValueForm) -> Self {
        Self { kind, form }
    }

    /// The native type of class `T` with the given value form.
    pub fn opaque<T: ScriptClass>(form: ValueForm) -> Self {
        Self {
            kind: BaseKind::Opaque(T::type_hash()),
            form,
        }
    }
}

impl fmt::Display for NativeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            BaseKind::Bool => write!(f, "bool")?,
            BaseKind::Int => write!(f, "int")?,
            BaseKind::Float => write!(f, "float")?,
            BaseKind::Str => write!(f, "str")?,
            BaseKind::Opaque(hash) => write!(f, "class({hash})")?,
        }
        match self.form {
            ValueForm::Pointer => write!(f, "*"),
            ValueForm::Reference => write!(f, "&"),
            ValueForm::Value => Ok(()),
        }
    }
}

/// The conversion rule a native type resolves to.
#[derive(Debug)]
pub enum ConversionRule<'a> {
    /// A builtin scalar/bool/string rule, one per base kind and value form.
    Builtin { kind: BaseKind, form: ValueForm },
    /// An opaque-class rule backed by a registry record.
    Opaque {
        class: &'a ClassDef,
        form: ValueForm,
    },
}

// ============================================================================
// Registry
// ============================================================================

/// Immutable registry of opaque classes, built once at definition time.
pub struct TypeRegistry {
    classes: FxHashMap<TypeHash, ClassDef>,
    by_name: FxHashMap<&'static str, TypeHash>,
}

impl TypeRegistry {
    /// Look up a class record by descriptor.
    pub fn get_class(&self, hash: TypeHash) -> Option<&ClassDef> {
        self.classes.get(&hash)
    }

    /// Look up a class record by script-visible name.
    pub fn get_class_by_name(&self, name: &str) -> Option<&ClassDef> {
        self.by_name.get(name).and_then(|hash| self.classes.get(hash))
    }

    /// Number of registered classes.
    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    /// Resolve the conversion rule for a parameter (script → native) type.
    pub fn resolve_param(&self, ty: NativeType) -> Result<ConversionRule<'_>, RegistryError> {
        self.resolve(ty)
    }

    /// Resolve the conversion rule for a result (native → script) type.
    ///
    /// Beyond plain resolution, this enforces the allocator invariant: a
    /// by-value result of a pointer-storage class needs a registered
    /// allocator to give the temporary addressable storage.
    pub fn resolve_result(&self, ty: NativeType) -> Result<ConversionRule<'_>, RegistryError> {
        let rule = self.resolve(ty)?;
        if let ConversionRule::Opaque { class, form: ValueForm::Value } = &rule
            && class.storage() == StorageForm::Pointer
            && class.allocator().is_none()
        {
            return Err(RegistryError::MissingAllocator(class.name()));
        }
        Ok(rule)
    }

    fn resolve(&self, ty: NativeType) -> Result<ConversionRule<'_>, RegistryError> {
        match ty.kind {
            BaseKind::Opaque(hash) => match self.classes.get(&hash) {
                Some(class) => Ok(ConversionRule::Opaque {
                    class,
                    form: ty.form,
                }),
                None => Err(RegistryError::NoConversion(ty.to_string())),
            },
            kind => Ok(ConversionRule::Builtin { kind, form: ty.form }),
        }
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("classes", &format!("<{} classes>", self.classes.len()))
            .finish()
    }
}

/// Builder accumulating class registrations, validated by [`build`](Self::build).
#[derive(Debug, Default)]
pub struct TypeRegistryBuilder {
    classes: Vec<ClassDef>,
}

impl TypeRegistryBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register class `T`.
    pub fn register_class<T: ScriptClass>(&mut self, flags: ClassFlags) -> &mut Self {
        self.classes.push(ClassDef {
            name: T::class_name(),
            type_hash: T::type_hash(),
            storage: T::STORAGE,
            flags,
            allocator: None,
        });
        self
    }

    /// Register class `T` with an allocator for wrapping temporaries into
    /// pointer storage.
    pub fn register_class_with_allocator<T: ScriptClass>(
        &mut self,
        flags: ClassFlags,
        allocator: AllocFn,
    ) -> &mut Self {
        self.classes.push(ClassDef {
            name: T::class_name(),
            type_hash: T::type_hash(),
            storage: T::STORAGE,
            flags,
            allocator: Some(allocator),
        });
        self
    }

    /// Validate and freeze the registry.
    ///
    /// Fails on a duplicated descriptor or script-visible name: every
    /// native type must map to exactly one conversion rule.
    pub fn build(self) -> Result<TypeRegistry, RegistryError> {
        let mut classes = FxHashMap::default();
        let mut by_name = FxHashMap::default();

        for class in self.classes {
            if classes.contains_key(&class.type_hash) {
                return Err(RegistryError::DuplicateType(class.name.to_string()));
            }
            if by_name.contains_key(class.name) {
                return Err(RegistryError::DuplicateClassName(class.name.to_string()));
            }
            by_name.insert(class.name, class.type_hash);
            classes.insert(class.type_hash, class);
        }

        Ok(TypeRegistry { classes, by_name })
    }
}
