//! The type synthesis engine.
//!
//! Given a [`TypeRequest`] (a property name and a property type), the engine produces a brand-new type
//! with exactly that one property, backed by a private field and a default constructor:
//!
//! ```text
//! TypeRequest
//!   → allocate   (namespace.rs)    unique container `Forge_<hint>_<seq>`
//!   → declare    (skeleton.rs)     type `Foo_<seq>` + private field `_bar`
//!   → accessors  (accessors.rs)    get_Bar / set_Bar, bound as property `Bar`
//!   → ctor       (constructor.rs)  public `.ctor()` calling the base constructor
//!   → finalize                     verified, published TypeDef
//!   → TypeHandle
//! ```
//!
//! ## Notes
//! - Every call mints a new container and type; nothing is cached or reused.
//! - Any stage failure aborts the request. A container allocated before the failure stays registered
//!   but holds no type.
//!
//! ## Example
//!
//! ```
//! use typeforge::synth::{Synthesizer, TypeRequest};
//! use typeforge::{TypeRef, Value};
//!
//! let handle = Synthesizer::new()
//!     .synthesize(&TypeRequest::new("Bar", TypeRef::STRING))
//!     .unwrap();
//! let foo = handle.instantiate().unwrap();
//! assert!(handle.get(&foo, "Bar").unwrap().is_null());
//!
//! handle.set(&foo, "Bar", "abc").unwrap();
//! assert_eq!(handle.get(&foo, "Bar").unwrap(), Value::from("abc"));
//! ```

mod accessors;
mod constructor;
mod errors;
mod namespace;
mod skeleton;

use std::sync::Arc;

use typeforge_core::TypeRef;

use crate::backend::{Host, TypeBuilder, TypeDef};
use crate::config::SynthOptions;
use crate::reflect::TypeHandle;

pub use errors::SynthError;

/// What to synthesize: one property of one type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeRequest {
    pub property_name: String,
    pub property_type: TypeRef,
}

impl TypeRequest {
    pub fn new(property_name: impl Into<String>, property_type: impl Into<TypeRef>) -> Self {
        Self {
            property_name: property_name.into(),
            property_type: property_type.into(),
        }
    }
}

/// Drives the synthesis pipeline against one host.
#[derive(Debug, Clone)]
pub struct Synthesizer<'h> {
    host: &'h Host,
    options: SynthOptions,
}

impl Default for Synthesizer<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl Synthesizer<'static> {
    /// A synthesizer over the process-wide host with default options.
    pub fn new() -> Self {
        Self::with_host(Host::global())
    }
}

impl<'h> Synthesizer<'h> {
    pub fn with_host(host: &'h Host) -> Self {
        Self {
            host,
            options: SynthOptions::default(),
        }
    }

    pub fn with_options(mut self, options: SynthOptions) -> Self {
        self.options = options;
        self
    }

    pub fn host(&self) -> &'h Host {
        self.host
    }

    pub fn options(&self) -> &SynthOptions {
        &self.options
    }

    /// Synthesize a new type for `request` and return a handle to it.
    #[tracing::instrument(skip_all, fields(property = %request.property_name, ty = %request.property_type))]
    pub fn synthesize(&self, request: &TypeRequest) -> Result<TypeHandle, SynthError> {
        let allocation = namespace::allocate(self.host, &self.options, &request.property_name)?;
        let skeleton::Skeleton {
            mut builder,
            field,
            storage,
        } = skeleton::declare(&allocation.container, request, &self.options, allocation.sequence)?;

        accessors::synthesize(
            &mut builder,
            &request.property_name,
            &request.property_type,
            field,
            storage,
        )?;
        constructor::synthesize(&mut builder)?;

        let def = finalize(builder)?;
        tracing::debug!(type_name = %def.full_name(), "type synthesized");
        Ok(TypeHandle::new(def))
    }
}

/// Verify and publish the type; any host refusal is an emission failure.
fn finalize(builder: TypeBuilder) -> Result<Arc<TypeDef>, SynthError> {
    let type_name = builder.full_name();
    builder
        .create_type()
        .map_err(|source| SynthError::BackendEmission { type_name, source })
}

/// Synthesize on the process-wide host with default options.
pub fn synthesize(request: &TypeRequest) -> Result<TypeHandle, SynthError> {
    Synthesizer::new().synthesize(request)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::backend::{BackendError, FieldAttributes, MethodAttributes, OpCode, TypeAttributes};
    use crate::config::HostLimits;
    use crate::value::Value;

    #[test]
    fn test_generated_shape() {
        let host = Host::new(HostLimits::default());
        let handle = Synthesizer::with_host(&host)
            .synthesize(&TypeRequest::new("Bar", TypeRef::INT32))
            .unwrap();
        let def = handle.type_def();

        assert_eq!(def.full_name(), "Forge_Bar_1.Foo_1");
        assert_eq!(def.attributes(), skeleton::TYPE_ATTRIBUTES);
        assert!(!def.attributes().contains(TypeAttributes::PUBLIC));

        assert_eq!(def.fields().len(), 1);
        assert_eq!(def.fields()[0].name(), "_bar");
        assert_eq!(def.properties().len(), 1);
        assert_eq!(def.properties()[0].name(), "Bar");
        assert!(def.properties()[0].can_read());
        assert!(def.properties()[0].can_write());

        let getter = def.method("get_Bar").unwrap();
        assert_eq!(getter.attributes(), accessors::ACCESSOR_ATTRIBUTES);
        assert_eq!(getter.return_type(), Some(&TypeRef::INT32));
        let setter = def.method("set_Bar").unwrap();
        assert_eq!(setter.params(), &[TypeRef::INT32]);
        assert_eq!(setter.return_type(), None);

        let ctor = def.default_constructor().unwrap();
        assert!(ctor.attributes().contains(MethodAttributes::RT_SPECIAL_NAME));
        assert_eq!(ctor.max_stack(), 1);
    }

    #[test]
    fn test_synthesizer_carries_host_and_options() {
        let host = Host::new(HostLimits::default());
        let options = SynthOptions::default().with_type_name("Shape");
        let synth = Synthesizer::with_host(&host).with_options(options.clone());
        assert!(std::ptr::eq(synth.host(), &host));
        assert_eq!(synth.options(), &options);
        assert_eq!(Synthesizer::new().options(), &SynthOptions::default());
    }

    #[test]
    fn test_failure_leaves_empty_container() {
        let host = Host::new(HostLimits::default());
        let err = Synthesizer::with_host(&host)
            .synthesize(&TypeRequest::new("Bar", TypeRef::Void))
            .unwrap_err();
        assert!(matches!(err, SynthError::UnsupportedType { .. }));
        assert_eq!(host.container_count(), 1);
        assert_eq!(host.type_count(), 0);
    }

    #[test]
    fn test_invalid_type_name_option_is_emission_error() {
        let host = Host::new(HostLimits::default());
        let err = Synthesizer::with_host(&host)
            .with_options(SynthOptions::default().with_type_name("Not a name"))
            .synthesize(&TypeRequest::new("Bar", TypeRef::INT32))
            .unwrap_err();
        assert!(matches!(
            err,
            SynthError::BackendEmission {
                source: BackendError::InvalidName { what: "type", .. },
                ..
            }
        ));
    }

    #[test]
    fn test_malformed_body_is_emission_error() {
        let host = Host::new(HostLimits::default());
        let container = host.define_container("Forge_Bar_1").unwrap();
        let mut builder = container.define_type("Foo_1", skeleton::TYPE_ATTRIBUTES).unwrap();
        let field = builder
            .define_field("_bar", TypeRef::STRING, FieldAttributes::PRIVATE)
            .unwrap();
        let getter = builder
            .define_method("get_Bar", accessors::ACCESSOR_ATTRIBUTES, Some(TypeRef::STRING), vec![])
            .unwrap();
        // By-value load of a by-reference field
        let il = builder.il_generator(getter).unwrap();
        il.emit(OpCode::LdArg(0));
        il.emit(OpCode::LdFld(field));
        il.emit(OpCode::Ret);

        match finalize(builder).unwrap_err() {
            SynthError::BackendEmission { type_name, source } => {
                assert_eq!(type_name, "Forge_Bar_1.Foo_1");
                match source {
                    BackendError::InvalidBody { method, offset, reason } => {
                        assert_eq!(method, "Foo_1::get_Bar");
                        assert_eq!(offset, 1);
                        assert_eq!(reason, "`ldfld` requires a by-value field, `_bar` is by-reference");
                    }
                    other => panic!("expected InvalidBody, got {other:?}"),
                }
            }
            other => panic!("expected BackendEmission, got {other:?}"),
        }
        assert_eq!(host.type_count(), 0);
    }

    #[test]
    fn test_round_trip_through_global_host() {
        let handle = synthesize(&TypeRequest::new("Count", TypeRef::INT64)).unwrap();
        let obj = handle.instantiate().unwrap();
        assert_eq!(handle.get(&obj, "Count").unwrap(), Value::I64(0));
        handle.set(&obj, "Count", 42i64).unwrap();
        assert_eq!(handle.get(&obj, "Count").unwrap(), Value::I64(42));
    }
}
