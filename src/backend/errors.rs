//! Error types for the host backend.
//!
//! [`BackendError`] is what the host refuses at definition time (names, capacity, malformed bodies).
//! [`MemberError`] is what goes wrong when finalized types are used: instantiation, member lookup, and
//! faults while executing a body.

use thiserror::Error;
use typeforge_core::{EmbedIssue, TypeRef};

/// Refusal by the host while containers and types are being defined.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BackendError {
    #[error("container `{0}` already exists")]
    DuplicateContainer(String),

    #[error("`{name}` is not a valid {what} name")]
    InvalidName { what: &'static str, name: String },

    #[error("host container capacity of {limit} exhausted")]
    CapacityExceeded { limit: usize },

    #[error("`{owner}` already defines a member named `{member}`")]
    DuplicateMember { owner: String, member: String },

    #[error("`{ty}` cannot be used in `{member}`: {issue}")]
    Unembeddable { member: String, ty: TypeRef, issue: EmbedIssue },

    #[error("token does not belong to type `{owner}`")]
    ForeignToken { owner: String },

    #[error("invalid signature for `{member}`: {reason}")]
    InvalidSignature { member: String, reason: String },

    #[error("invalid body for `{method}` at IL_{offset:04x}: {reason}")]
    InvalidBody {
        method: String,
        offset: usize,
        reason: String,
    },
}

/// Failure while instantiating or accessing members of a finalized type.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MemberError {
    #[error("type `{type_name}` has no member `{member}`")]
    NoSuchMember { type_name: String, member: String },

    #[error("property `{member}` has no {accessor}")]
    MissingAccessor { member: String, accessor: &'static str },

    #[error("instance of `{actual}` used where `{expected}` was expected")]
    InstanceTypeMismatch { expected: String, actual: String },

    #[error("{value_kind} value does not conform to `{expected}` of member `{member}`")]
    ValueTypeMismatch {
        member: String,
        expected: TypeRef,
        value_kind: &'static str,
    },

    #[error("type `{type_name}` has no public parameterless constructor")]
    NoDefaultConstructor { type_name: String },

    #[error("fault in `{method}` at IL_{offset:04x}: {reason}")]
    Invocation {
        method: String,
        offset: usize,
        reason: String,
    },
}
