#![forbid(unsafe_code)]
//! Typeforge: dynamic type synthesis
//!
//! Typeforge mints brand-new types at runtime, each carrying exactly one read/write property of a
//! caller-chosen name and type. Test suites use them as throwaway fixtures for exercising
//! deserializers and other reflection-driven code against arbitrary property types, without writing a
//! fixture class per type.
//!
//! The crate has three layers:
//!
//! - [`backend`]: a small host with a container registry, metadata builders, a verified instruction set,
//!   and an interpreter.
//! - [`synth`]: the engine that turns a [`synth::TypeRequest`] into a finalized type on that host.
//! - [`reflect`] and [`json`]: by-name property access on the result, and JSON value conversion.
//!
//! ## Panic Policy
//!
//! This codebase follows explicit error handling:
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` and `backend` modules
//!   enforce `#![deny(clippy::unwrap_used)]`.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.

pub mod backend;
pub mod cli;
pub mod config;
pub mod json;
pub mod reflect;
pub mod synth;
pub mod value;
pub mod version;

pub use backend::{Host, Instance, MemberError};
pub use config::{HostLimits, SynthOptions};
pub use reflect::TypeHandle;
pub use synth::{SynthError, Synthesizer, TypeRequest, synthesize};
pub use value::Value;

pub use typeforge_core::{BuiltinType, ClassRef, StorageCategory, TypeRef, parse_type_ref};
