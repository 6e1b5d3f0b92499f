//! Errors raised while synthesizing a type.
//!
//! Every stage fails fast: the first error aborts the pipeline and no type handle is produced.

use miette::Diagnostic;
use thiserror::Error;

use crate::backend::BackendError;

/// Failure of a single synthesis request.
#[derive(Debug, Clone, PartialEq, Error, Diagnostic)]
pub enum SynthError {
    /// The host refused to create the generated container.
    #[error("could not allocate container `{container}`")]
    #[diagnostic(
        code(typeforge::allocation),
        help("check the container prefix and the host's container limit")
    )]
    Allocation {
        container: String,
        #[source]
        source: BackendError,
    },

    /// The property type cannot back a field.
    #[error("`{type_name}` cannot be the type of a synthesized property: {reason}")]
    #[diagnostic(
        code(typeforge::unsupported_type),
        help("use a closed, non-by-ref type; generic parameters, `&T` and `void` cannot be stored")
    )]
    UnsupportedType { type_name: String, reason: String },

    /// The host rejected a definition or a method body while emitting the type.
    #[error("emission of `{type_name}` failed")]
    #[diagnostic(code(typeforge::backend_emission))]
    BackendEmission {
        type_name: String,
        #[source]
        source: BackendError,
    },

    #[error("invalid request: {reason}")]
    #[diagnostic(code(typeforge::invalid_request))]
    InvalidRequest { reason: String },
}
