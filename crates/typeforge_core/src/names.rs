//! Builtin type vocabulary.
//!
//! This module defines the canonical set of builtin semantic types a property can be declared with, their
//! spellings, and their storage category.
//!
//! ## Notes
//! - Lookup via [`from_str`] is **case-sensitive**.
//! - Aliases cover the short Rust-style spellings (`i32`) and the platform names used by existing fixtures
//!   (`System.Int32`).
//!
//! ## Examples
//! ```rust
//! use typeforge_core::names::{self, BuiltinType};
//!
//! assert_eq!(names::from_str("date-time"), Some(BuiltinType::DateTime));
//! assert_eq!(names::from_str("System.String"), Some(BuiltinType::String));
//! assert_eq!(names::as_str(BuiltinType::Int32), "int32");
//! ```

use crate::types::StorageCategory;

/// Stable identifier for builtin types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinType {
    Bool,
    Char,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float32,
    Float64,
    String,
    DateTime,
    /// The root type; a field of this type stores any value.
    Object,
}

/// Metadata for a builtin type.
#[derive(Debug, Clone, Copy)]
pub struct BuiltinTypeInfo {
    pub id: BuiltinType,
    pub canonical: &'static str,
    pub aliases: &'static [&'static str],
    pub storage: StorageCategory,
    pub description: &'static str,
}

/// Registry of all builtin types.
pub const BUILTIN_TYPES: &[BuiltinTypeInfo] = &[
    info(
        BuiltinType::Bool,
        "bool",
        &["boolean", "System.Boolean"],
        StorageCategory::ByValue,
        "Boolean flag",
    ),
    info(
        BuiltinType::Char,
        "char",
        &["System.Char"],
        StorageCategory::ByValue,
        "Single Unicode scalar value",
    ),
    info(
        BuiltinType::Int8,
        "int8",
        &["i8", "sbyte", "System.SByte"],
        StorageCategory::ByValue,
        "Signed 8-bit integer",
    ),
    info(
        BuiltinType::Int16,
        "int16",
        &["i16", "short", "System.Int16"],
        StorageCategory::ByValue,
        "Signed 16-bit integer",
    ),
    info(
        BuiltinType::Int32,
        "int32",
        &["i32", "int", "System.Int32"],
        StorageCategory::ByValue,
        "Signed 32-bit integer",
    ),
    info(
        BuiltinType::Int64,
        "int64",
        &["i64", "long", "System.Int64"],
        StorageCategory::ByValue,
        "Signed 64-bit integer",
    ),
    info(
        BuiltinType::UInt8,
        "uint8",
        &["u8", "byte", "System.Byte"],
        StorageCategory::ByValue,
        "Unsigned 8-bit integer",
    ),
    info(
        BuiltinType::UInt16,
        "uint16",
        &["u16", "ushort", "System.UInt16"],
        StorageCategory::ByValue,
        "Unsigned 16-bit integer",
    ),
    info(
        BuiltinType::UInt32,
        "uint32",
        &["u32", "uint", "System.UInt32"],
        StorageCategory::ByValue,
        "Unsigned 32-bit integer",
    ),
    info(
        BuiltinType::UInt64,
        "uint64",
        &["u64", "ulong", "System.UInt64"],
        StorageCategory::ByValue,
        "Unsigned 64-bit integer",
    ),
    info(
        BuiltinType::Float32,
        "float32",
        &["f32", "float", "single", "System.Single"],
        StorageCategory::ByValue,
        "IEEE 754 single precision",
    ),
    info(
        BuiltinType::Float64,
        "float64",
        &["f64", "double", "System.Double"],
        StorageCategory::ByValue,
        "IEEE 754 double precision",
    ),
    info(
        BuiltinType::String,
        "string",
        &["str", "System.String"],
        StorageCategory::ByReference,
        "Immutable UTF-8 text, null by default",
    ),
    info(
        BuiltinType::DateTime,
        "date-time",
        &["datetime", "DateTime", "System.DateTime"],
        StorageCategory::ByValue,
        "Calendar date and time of day without offset",
    ),
    info(
        BuiltinType::Object,
        "object",
        &["System.Object"],
        StorageCategory::ByReference,
        "Root type; holds any value",
    ),
];

/// Return the canonical spelling for a builtin type.
pub fn as_str(id: BuiltinType) -> &'static str {
    info_for(id).canonical
}

/// Return the accepted aliases for a builtin type.
pub fn aliases(id: BuiltinType) -> &'static [&'static str] {
    info_for(id).aliases
}

/// Return the storage category for a builtin type.
pub fn storage(id: BuiltinType) -> StorageCategory {
    info_for(id).storage
}

/// Return the full metadata entry for a builtin type.
pub fn info_for(id: BuiltinType) -> &'static BuiltinTypeInfo {
    // Every variant has exactly one registry entry; `vocab_guardrails` enforces it.
    match BUILTIN_TYPES.iter().find(|t| t.id == id) {
        Some(info) => info,
        None => unreachable!("builtin type info missing for {id:?}"),
    }
}

/// Resolve a builtin type spelling to its identifier.
///
/// ## Notes
/// - Matching is **case-sensitive**.
pub fn from_str(s: &str) -> Option<BuiltinType> {
    if let Some(t) = BUILTIN_TYPES.iter().find(|t| t.canonical == s) {
        return Some(t.id);
    }
    BUILTIN_TYPES
        .iter()
        .find(|t| {
            let aliases: &[&str] = t.aliases;
            aliases.contains(&s)
        })
        .map(|t| t.id)
}

const fn info(
    id: BuiltinType,
    canonical: &'static str,
    aliases: &'static [&'static str],
    storage: StorageCategory,
    description: &'static str,
) -> BuiltinTypeInfo {
    BuiltinTypeInfo {
        id,
        canonical,
        aliases,
        storage,
        description,
    }
}
