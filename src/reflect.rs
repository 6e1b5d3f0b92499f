//! By-name access to synthesized types.
//!
//! A [`TypeHandle`] is the engine's output: consumers instantiate it and read or write its property by
//! name, the way a deserializer or a reflection-driven test would. All member access goes through the
//! generated accessor bodies; nothing here touches field slots directly.

use std::sync::Arc;

use typeforge_core::{ClassRef, TypeRef};

use crate::backend::interp;
use crate::backend::{Instance, MemberError, PropertyDef, TypeDef, disassemble};
use crate::value::Value;

/// Handle to a finalized type.
#[derive(Debug, Clone)]
pub struct TypeHandle {
    def: Arc<TypeDef>,
}

impl TypeHandle {
    pub(crate) fn new(def: Arc<TypeDef>) -> Self {
        Self { def }
    }

    /// Wrap a definition found through the host registry.
    pub fn from_def(def: Arc<TypeDef>) -> Self {
        Self::new(def)
    }

    pub fn type_def(&self) -> &Arc<TypeDef> {
        &self.def
    }

    pub fn name(&self) -> &str {
        self.def.name()
    }

    pub fn full_name(&self) -> String {
        self.def.full_name()
    }

    pub fn container_name(&self) -> &str {
        self.def.container()
    }

    /// The type's first property; a synthesized type has exactly one.
    pub fn property(&self) -> Option<&PropertyDef> {
        self.def.properties().first()
    }

    pub fn class_ref(&self) -> ClassRef {
        self.def.class_ref()
    }

    /// This type as a property type for another request.
    pub fn type_ref(&self) -> TypeRef {
        TypeRef::Class(self.class_ref())
    }

    pub fn is_instance(&self, instance: &Instance) -> bool {
        instance.type_def().id() == self.def.id()
    }

    /// Allocate an object and run the default constructor on it.
    pub fn instantiate(&self) -> Result<Instance, MemberError> {
        let ctor = self.def.default_constructor().ok_or_else(|| MemberError::NoDefaultConstructor {
            type_name: self.full_name(),
        })?;
        let instance = Instance::allocate(Arc::clone(&self.def));
        interp::invoke(ctor, &instance, &[])?;
        tracing::trace!(type_name = %self.full_name(), "instantiated");
        Ok(instance)
    }

    /// Read property `name` of `instance` through its getter.
    pub fn get(&self, instance: &Instance, name: &str) -> Result<Value, MemberError> {
        self.check_instance(instance)?;
        get_member(&self.def, instance, name)
    }

    /// Write property `name` of `instance` through its setter.
    pub fn set(&self, instance: &Instance, name: &str, value: impl Into<Value>) -> Result<(), MemberError> {
        self.check_instance(instance)?;
        set_member(&self.def, instance, name, value.into())
    }

    pub fn disassemble(&self) -> String {
        disassemble(&self.def)
    }

    fn check_instance(&self, instance: &Instance) -> Result<(), MemberError> {
        if self.is_instance(instance) {
            Ok(())
        } else {
            Err(MemberError::InstanceTypeMismatch {
                expected: self.full_name(),
                actual: instance.type_def().full_name(),
            })
        }
    }
}

impl PartialEq for TypeHandle {
    fn eq(&self, other: &Self) -> bool {
        self.def.id() == other.def.id()
    }
}

impl Eq for TypeHandle {}

impl Instance {
    /// Read property `name` through this object's own type.
    pub fn get(&self, name: &str) -> Result<Value, MemberError> {
        get_member(self.type_def(), self, name)
    }

    /// Write property `name` through this object's own type.
    pub fn set(&self, name: &str, value: impl Into<Value>) -> Result<(), MemberError> {
        set_member(self.type_def(), self, name, value.into())
    }
}

fn find_property<'a>(def: &'a TypeDef, name: &str) -> Result<&'a PropertyDef, MemberError> {
    def.property(name).ok_or_else(|| MemberError::NoSuchMember {
        type_name: def.full_name(),
        member: name.to_string(),
    })
}

fn get_member(def: &TypeDef, instance: &Instance, name: &str) -> Result<Value, MemberError> {
    let property = find_property(def, name)?;
    let getter = property
        .getter
        .and_then(|i| def.method_at(i))
        .ok_or_else(|| MemberError::MissingAccessor {
            member: name.to_string(),
            accessor: "getter",
        })?;

    interp::invoke(getter, instance, &[])?.ok_or_else(|| MemberError::Invocation {
        method: format!("{}::{}", def.name(), getter.name()),
        offset: getter.body().len(),
        reason: "getter returned no value".to_string(),
    })
}

fn set_member(def: &TypeDef, instance: &Instance, name: &str, value: Value) -> Result<(), MemberError> {
    let property = find_property(def, name)?;
    if !value.conforms_to(property.ty()) {
        return Err(MemberError::ValueTypeMismatch {
            member: name.to_string(),
            expected: property.ty().clone(),
            value_kind: value.kind(),
        });
    }
    let setter = property
        .setter
        .and_then(|i| def.method_at(i))
        .ok_or_else(|| MemberError::MissingAccessor {
            member: name.to_string(),
            accessor: "setter",
        })?;

    interp::invoke(setter, instance, &[value])?;
    Ok(())
}
