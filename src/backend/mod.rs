//! Host code-generation backend.
//!
//! Rust has no runtime facility for declaring new types, so the engine targets this small host instead: a
//! registry of containers, a metadata model, an evaluation-stack instruction set, a verifier, and an
//! interpreter.
//!
//! ## Pipeline
//!
//! ```text
//! Host → ContainerBuilder → TypeBuilder (+ IlGenerator per method) → verify → TypeDef → Instance
//! ```
//!
//! ## Notes
//! - Every body is verified before its type is published; the interpreter only runs verified bodies.
//! - Published definitions are immutable and shared via `Arc`.
//!
//! ## See also
//! - [`crate::synth`]: the engine that drives these builders
//! - [`crate::reflect`]: by-name access to finalized types

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod builder;
mod disasm;
mod errors;
mod host;
mod il;
pub(crate) mod interp;
mod metadata;
mod object;
mod opcode;
mod verify;

pub use builder::{ContainerBuilder, TypeBuilder};
pub use disasm::disassemble;
pub use errors::{BackendError, MemberError};
pub use host::{Container, Host};
pub use il::IlGenerator;
pub use metadata::{
    CONSTRUCTOR_NAME, FieldAttributes, FieldDef, FieldToken, MethodAttributes, MethodDef, MethodKind,
    MethodToken, PropertyDef, PropertyToken, TypeAttributes, TypeDef,
};
pub use object::Instance;
pub use opcode::OpCode;
