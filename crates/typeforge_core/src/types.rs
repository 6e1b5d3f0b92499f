//! Semantic type references.
//!
//! A [`TypeRef`] names the type of a requested property. It is a plain description: it knows its storage
//! category and whether it can back a field, but it owns no runtime state.

use std::fmt;

use crate::names::{self, BuiltinType};

/// How values of a type are held in a field slot.
///
/// The instruction form used to load and store a field is chosen from this category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageCategory {
    /// The slot holds the value itself; loads copy it.
    ByValue,
    /// The slot holds a shared handle (or null); loads share it.
    ByReference,
}

impl fmt::Display for StorageCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageCategory::ByValue => write!(f, "by-value"),
            StorageCategory::ByReference => write!(f, "by-reference"),
        }
    }
}

/// Reference to a type that was generated earlier and finalized by a host.
///
/// `id` is unique per process; `name` is the full name (`Container.Type`) and only used for display.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClassRef {
    pub id: u64,
    pub name: String,
}

/// Semantic type of a requested property.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    Builtin(BuiltinType),
    /// A by-value type that may also hold null.
    Nullable(Box<TypeRef>),
    /// A one-dimensional array; stored by reference.
    Array(Box<TypeRef>),
    /// A previously generated type.
    Class(ClassRef),
    /// An unbound generic parameter (`!T`). Never embeddable.
    GenericParam(String),
    /// A by-reference-only type (`&T`). Never embeddable.
    ByRef(Box<TypeRef>),
    /// The empty type. Never embeddable.
    Void,
}

/// Reason a type cannot be embedded as field storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmbedIssue {
    OpenGeneric(String),
    ByRef,
    Void,
    NullableOfReference(String),
    NestedNullable,
}

impl fmt::Display for EmbedIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmbedIssue::OpenGeneric(name) => write!(f, "contains open generic parameter `{}`", name),
            EmbedIssue::ByRef => write!(f, "by-reference types cannot be stored in a field"),
            EmbedIssue::Void => write!(f, "`void` has no storage"),
            EmbedIssue::NullableOfReference(inner) => {
                write!(f, "nullable requires a by-value type, `{}` is by-reference", inner)
            }
            EmbedIssue::NestedNullable => write!(f, "nullable of nullable is not a valid type"),
        }
    }
}

impl TypeRef {
    pub const BOOL: TypeRef = TypeRef::Builtin(BuiltinType::Bool);
    pub const CHAR: TypeRef = TypeRef::Builtin(BuiltinType::Char);
    pub const INT32: TypeRef = TypeRef::Builtin(BuiltinType::Int32);
    pub const INT64: TypeRef = TypeRef::Builtin(BuiltinType::Int64);
    pub const FLOAT64: TypeRef = TypeRef::Builtin(BuiltinType::Float64);
    pub const STRING: TypeRef = TypeRef::Builtin(BuiltinType::String);
    pub const DATE_TIME: TypeRef = TypeRef::Builtin(BuiltinType::DateTime);
    pub const OBJECT: TypeRef = TypeRef::Builtin(BuiltinType::Object);

    pub fn nullable(inner: TypeRef) -> Self {
        TypeRef::Nullable(Box::new(inner))
    }

    pub fn array(elem: TypeRef) -> Self {
        TypeRef::Array(Box::new(elem))
    }

    pub fn by_ref(inner: TypeRef) -> Self {
        TypeRef::ByRef(Box::new(inner))
    }

    pub fn generic_param(name: impl Into<String>) -> Self {
        TypeRef::GenericParam(name.into())
    }

    /// Storage category of a field of this type, or `None` when the type has no field storage.
    pub fn storage(&self) -> Option<StorageCategory> {
        match self {
            TypeRef::Builtin(id) => Some(names::storage(*id)),
            TypeRef::Nullable(_) => Some(StorageCategory::ByValue),
            TypeRef::Array(_) | TypeRef::Class(_) => Some(StorageCategory::ByReference),
            TypeRef::GenericParam(_) | TypeRef::ByRef(_) | TypeRef::Void => None,
        }
    }

    /// Check that this type can back a field.
    ///
    /// Nested positions are checked too: `!T[]` is rejected for its element type.
    pub fn check_embeddable(&self) -> Result<(), EmbedIssue> {
        match self {
            TypeRef::Builtin(_) | TypeRef::Class(_) => Ok(()),
            TypeRef::GenericParam(name) => Err(EmbedIssue::OpenGeneric(name.clone())),
            TypeRef::ByRef(_) => Err(EmbedIssue::ByRef),
            TypeRef::Void => Err(EmbedIssue::Void),
            TypeRef::Array(elem) => elem.check_embeddable(),
            TypeRef::Nullable(inner) => {
                inner.check_embeddable()?;
                match inner.as_ref() {
                    TypeRef::Nullable(_) => Err(EmbedIssue::NestedNullable),
                    other if other.storage() == Some(StorageCategory::ByReference) => {
                        Err(EmbedIssue::NullableOfReference(other.to_string()))
                    }
                    _ => Ok(()),
                }
            }
        }
    }

    /// Whether `null` is a legal value of this type.
    pub fn admits_null(&self) -> bool {
        matches!(self, TypeRef::Nullable(_)) || self.storage() == Some(StorageCategory::ByReference)
    }

    fn needs_group(&self) -> bool {
        matches!(self, TypeRef::ByRef(_))
    }
}

impl From<BuiltinType> for TypeRef {
    fn from(id: BuiltinType) -> Self {
        TypeRef::Builtin(id)
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Builtin(id) => write!(f, "{}", names::as_str(*id)),
            TypeRef::Nullable(inner) if inner.needs_group() => write!(f, "({})?", inner),
            TypeRef::Nullable(inner) => write!(f, "{}?", inner),
            TypeRef::Array(elem) if elem.needs_group() => write!(f, "({})[]", elem),
            TypeRef::Array(elem) => write!(f, "{}[]", elem),
            TypeRef::Class(class) => write!(f, "{}", class.name),
            TypeRef::GenericParam(name) => write!(f, "!{}", name),
            TypeRef::ByRef(inner) => write!(f, "&{}", inner),
            TypeRef::Void => write!(f, "void"),
        }
    }
}
