//! Provide the semantic type vocabulary shared by the typeforge engine and its host backend.
//!
//! This crate is intentionally small and dependency-light. It answers three questions about a requested
//! property type without touching any runtime state:
//! - what is it called (canonical spellings and aliases, see [`names`]),
//! - how is it stored (by value or by reference, see [`StorageCategory`]),
//! - can it be embedded as field storage at all (see [`TypeRef::check_embeddable`]).
//!
//! ## Notes
//!
//! - No IO, no global state, no backend types. Runtime values and generated types live in `typeforge`.
//! - Type expressions (`int32?`, `string[]`, `&int64`, `!T`) are parsed by [`parse::parse_type_ref`].

pub mod names;
pub mod parse;
pub mod types;

pub use names::BuiltinType;
pub use parse::{ParseTypeError, parse_type_ref};
pub use types::{ClassRef, EmbedIssue, StorageCategory, TypeRef};

/// Check whether `s` is a valid member or type identifier.
///
/// Identifiers are non-empty, start with an alphabetic character or `_`, and continue with alphanumerics or
/// `_`. Unicode letters are accepted.
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => chars.all(|c| c.is_alphanumeric() || c == '_'),
        _ => false,
    }
}
