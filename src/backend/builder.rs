//! Builders for containers and the types defined in them.
//!
//! The flow mirrors a classic reflection-emit API:
//!
//! ```text
//! Host::define_container ─► ContainerBuilder::define_type ─► TypeBuilder
//!     define_field / define_method / define_constructor / define_property
//!     il_generator(method).emit(...)
//!     set_get_method / set_set_method
//! TypeBuilder::create_type ─► Arc<TypeDef>   (verified, published, immutable)
//! ```
//!
//! ## Notes
//! - Tokens handed out by a `TypeBuilder` are only valid for that builder; passing them elsewhere fails
//!   with [`BackendError::ForeignToken`].
//! - `create_type` consumes the builder, so a finalized type cannot be extended. If it fails, nothing is
//!   published; the container keeps its reservation of the type name.

use std::sync::Arc;

use typeforge_core::TypeRef;

use super::errors::BackendError;
use super::host::{Container, next_type_id};
use super::il::IlGenerator;
use super::metadata::{
    CONSTRUCTOR_NAME, FieldAttributes, FieldDef, FieldToken, MethodAttributes, MethodDef, MethodKind,
    MethodToken, PropertyDef, PropertyToken, TypeAttributes, TypeDef,
};
use super::verify::{MethodShape, OwnerView, verify_body};

/// Defines types inside one registered container.
#[derive(Debug)]
pub struct ContainerBuilder {
    container: Arc<Container>,
}

impl ContainerBuilder {
    pub(crate) fn new(container: Arc<Container>) -> Self {
        Self { container }
    }

    pub fn name(&self) -> &str {
        self.container.name()
    }

    /// Declare a new class deriving from the root `object` type.
    pub fn define_type(&self, name: &str, attributes: TypeAttributes) -> Result<TypeBuilder, BackendError> {
        if !typeforge_core::is_identifier(name) {
            return Err(BackendError::InvalidName {
                what: "type",
                name: name.to_string(),
            });
        }
        self.container.reserve_type_name(name)?;

        let id = next_type_id();
        tracing::debug!(container = self.name(), type_name = name, id, "type defined");
        Ok(TypeBuilder {
            container: Arc::clone(&self.container),
            id,
            name: name.to_string(),
            attributes,
            fields: Vec::new(),
            methods: Vec::new(),
            properties: Vec::new(),
        })
    }
}

#[derive(Debug)]
struct MethodBuilder {
    name: String,
    attributes: MethodAttributes,
    kind: MethodKind,
    params: Vec<TypeRef>,
    ret: Option<TypeRef>,
    il: IlGenerator,
}

/// A type under construction.
#[derive(Debug)]
pub struct TypeBuilder {
    container: Arc<Container>,
    id: u64,
    name: String,
    attributes: TypeAttributes,
    fields: Vec<FieldDef>,
    methods: Vec<MethodBuilder>,
    properties: Vec<PropertyDef>,
}

impl TypeBuilder {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn full_name(&self) -> String {
        format!("{}.{}", self.container.name(), self.name)
    }

    pub fn define_field(
        &mut self,
        name: &str,
        ty: TypeRef,
        attributes: FieldAttributes,
    ) -> Result<FieldToken, BackendError> {
        self.check_member_name("field", name, self.fields.iter().map(|f| f.name.as_str()))?;
        let storage = self.storage_of(name, &ty)?;

        self.fields.push(FieldDef {
            name: name.to_string(),
            ty,
            attributes,
            storage,
        });
        Ok(FieldToken {
            owner: self.id,
            index: self.fields.len() - 1,
        })
    }

    /// Declare an instance method. `ret` of `None` declares a `void` method.
    pub fn define_method(
        &mut self,
        name: &str,
        attributes: MethodAttributes,
        ret: Option<TypeRef>,
        params: Vec<TypeRef>,
    ) -> Result<MethodToken, BackendError> {
        self.check_member_name("method", name, self.methods.iter().map(|m| m.name.as_str()))?;
        self.push_method(name, attributes, MethodKind::Instance, ret, params)
    }

    /// Declare the type's constructor. Special-name flags are added automatically.
    pub fn define_constructor(
        &mut self,
        attributes: MethodAttributes,
        params: Vec<TypeRef>,
    ) -> Result<MethodToken, BackendError> {
        if self.methods.iter().any(|m| m.kind == MethodKind::Constructor) {
            return Err(BackendError::DuplicateMember {
                owner: self.full_name(),
                member: CONSTRUCTOR_NAME.to_string(),
            });
        }
        let attributes = attributes | MethodAttributes::SPECIAL_NAME | MethodAttributes::RT_SPECIAL_NAME;
        self.push_method(CONSTRUCTOR_NAME, attributes, MethodKind::Constructor, None, params)
    }

    /// The instruction stream of a declared method.
    pub fn il_generator(&mut self, method: MethodToken) -> Result<&mut IlGenerator, BackendError> {
        self.check_owner(method.owner)?;
        let owner = self.full_name();
        self.methods
            .get_mut(method.index)
            .map(|m| &mut m.il)
            .ok_or(BackendError::ForeignToken { owner })
    }

    pub fn define_property(&mut self, name: &str, ty: TypeRef) -> Result<PropertyToken, BackendError> {
        self.check_member_name("property", name, self.properties.iter().map(|p| p.name.as_str()))?;
        self.storage_of(name, &ty)?;

        self.properties.push(PropertyDef {
            name: name.to_string(),
            ty,
            getter: None,
            setter: None,
        });
        Ok(PropertyToken {
            owner: self.id,
            index: self.properties.len() - 1,
        })
    }

    pub fn set_get_method(&mut self, property: PropertyToken, method: MethodToken) -> Result<(), BackendError> {
        let index = self.check_method(method)?;
        self.property_mut(property)?.getter = Some(index);
        Ok(())
    }

    pub fn set_set_method(&mut self, property: PropertyToken, method: MethodToken) -> Result<(), BackendError> {
        let index = self.check_method(method)?;
        self.property_mut(property)?.setter = Some(index);
        Ok(())
    }

    /// Verify every body and accessor binding, then publish the type into its container.
    #[tracing::instrument(skip_all, fields(type_name = %self.full_name(), methods = self.methods.len()))]
    pub fn create_type(self) -> Result<Arc<TypeDef>, BackendError> {
        for property in &self.properties {
            self.check_accessor_signatures(property)?;
        }

        let owner = OwnerView {
            id: self.id,
            name: &self.name,
            fields: &self.fields,
        };
        let mut verified = Vec::with_capacity(self.methods.len());
        for method in &self.methods {
            let shape = MethodShape {
                name: &method.name,
                kind: method.kind,
                params: &method.params,
                ret: method.ret.as_ref(),
            };
            let max_stack = verify_body(owner, shape, method.il.instructions())?;
            verified.push(max_stack);
        }

        let methods = self
            .methods
            .into_iter()
            .zip(verified)
            .map(|(m, max_stack)| MethodDef {
                name: m.name,
                attributes: m.attributes,
                kind: m.kind,
                params: m.params,
                ret: m.ret,
                body: m.il.into_body(),
                max_stack,
            })
            .collect();

        let def = Arc::new(TypeDef {
            id: self.id,
            name: self.name,
            container: self.container.name().to_string(),
            attributes: self.attributes,
            fields: self.fields,
            methods,
            properties: self.properties,
        });
        self.container.publish(Arc::clone(&def));
        tracing::debug!(type_name = %def.full_name(), id = def.id(), "type created");
        Ok(def)
    }

    fn push_method(
        &mut self,
        name: &str,
        attributes: MethodAttributes,
        kind: MethodKind,
        ret: Option<TypeRef>,
        params: Vec<TypeRef>,
    ) -> Result<MethodToken, BackendError> {
        for param in &params {
            self.storage_of(name, param)?;
        }
        if let Some(ret) = &ret {
            self.storage_of(name, ret)?;
        }

        self.methods.push(MethodBuilder {
            name: name.to_string(),
            attributes,
            kind,
            params,
            ret,
            il: IlGenerator::new(format!("{}::{}", self.name, name)),
        });
        Ok(MethodToken {
            owner: self.id,
            index: self.methods.len() - 1,
        })
    }

    fn check_member_name<'a>(
        &self,
        what: &'static str,
        name: &str,
        mut existing: impl Iterator<Item = &'a str>,
    ) -> Result<(), BackendError> {
        if !typeforge_core::is_identifier(name) {
            return Err(BackendError::InvalidName {
                what,
                name: name.to_string(),
            });
        }
        if existing.any(|n| n == name) {
            return Err(BackendError::DuplicateMember {
                owner: self.full_name(),
                member: name.to_string(),
            });
        }
        Ok(())
    }

    fn storage_of(&self, member: &str, ty: &TypeRef) -> Result<typeforge_core::StorageCategory, BackendError> {
        let unembeddable = |issue| BackendError::Unembeddable {
            member: format!("{}::{}", self.name, member),
            ty: ty.clone(),
            issue,
        };
        ty.check_embeddable().map_err(unembeddable)?;
        ty.storage().ok_or_else(|| unembeddable(typeforge_core::EmbedIssue::Void))
    }

    fn check_owner(&self, owner: u64) -> Result<(), BackendError> {
        if owner == self.id {
            Ok(())
        } else {
            Err(BackendError::ForeignToken {
                owner: self.full_name(),
            })
        }
    }

    fn check_method(&self, method: MethodToken) -> Result<usize, BackendError> {
        self.check_owner(method.owner)?;
        match self.methods.get(method.index) {
            Some(m) if m.kind == MethodKind::Instance => Ok(method.index),
            Some(m) => Err(BackendError::InvalidSignature {
                member: m.name.clone(),
                reason: "a constructor cannot be a property accessor".to_string(),
            }),
            None => Err(BackendError::ForeignToken {
                owner: self.full_name(),
            }),
        }
    }

    fn property_mut(&mut self, property: PropertyToken) -> Result<&mut PropertyDef, BackendError> {
        self.check_owner(property.owner)?;
        let owner = self.full_name();
        self.properties
            .get_mut(property.index)
            .ok_or(BackendError::ForeignToken { owner })
    }

    fn check_accessor_signatures(&self, property: &PropertyDef) -> Result<(), BackendError> {
        let invalid = |method: &MethodBuilder, reason: String| BackendError::InvalidSignature {
            member: format!("{}::{}", self.name, method.name),
            reason,
        };

        if let Some(index) = property.getter {
            let getter = &self.methods[index];
            if !getter.params.is_empty() || getter.ret.as_ref() != Some(&property.ty) {
                return Err(invalid(
                    getter,
                    format!("getter of `{}` must take no arguments and return `{}`", property.name, property.ty),
                ));
            }
        }
        if let Some(index) = property.setter {
            let setter = &self.methods[index];
            if setter.params.as_slice() != std::slice::from_ref(&property.ty) || setter.ret.is_some() {
                return Err(invalid(
                    setter,
                    format!("setter of `{}` must take one `{}` and return void", property.name, property.ty),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::backend::Host;
    use crate::backend::opcode::OpCode;
    use crate::config::HostLimits;

    fn builder(host: &Host) -> TypeBuilder {
        let container = host.define_container("Tests").unwrap();
        container.define_type("Foo", TypeAttributes::NOT_PUBLIC).unwrap()
    }

    #[test]
    fn rejects_duplicate_members_and_bad_names() {
        let host = Host::new(HostLimits::default());
        let mut tb = builder(&host);
        tb.define_field("_bar", TypeRef::INT32, FieldAttributes::PRIVATE).unwrap();
        assert!(matches!(
            tb.define_field("_bar", TypeRef::INT32, FieldAttributes::PRIVATE),
            Err(BackendError::DuplicateMember { .. })
        ));
        assert!(matches!(
            tb.define_property("1bar", TypeRef::INT32),
            Err(BackendError::InvalidName { what: "property", .. })
        ));
    }

    #[test]
    fn rejects_unembeddable_field_types() {
        let host = Host::new(HostLimits::default());
        let mut tb = builder(&host);
        let err = tb
            .define_field("_bar", TypeRef::generic_param("T"), FieldAttributes::PRIVATE)
            .unwrap_err();
        assert!(matches!(err, BackendError::Unembeddable { .. }));
    }

    #[test]
    fn rejects_tokens_from_another_builder() {
        let host = Host::new(HostLimits::default());
        let container = host.define_container("Tests").unwrap();
        let mut a = container.define_type("A", TypeAttributes::NOT_PUBLIC).unwrap();
        let mut b = container.define_type("B", TypeAttributes::NOT_PUBLIC).unwrap();
        let method = a.define_method("m", MethodAttributes::PUBLIC, None, vec![]).unwrap();
        assert!(matches!(b.il_generator(method), Err(BackendError::ForeignToken { .. })));
    }

    #[test]
    fn rejects_mismatched_accessor_signature() {
        let host = Host::new(HostLimits::default());
        let mut tb = builder(&host);
        let field = tb.define_field("_bar", TypeRef::INT32, FieldAttributes::PRIVATE).unwrap();
        let get = tb
            .define_method("get_Bar", MethodAttributes::PUBLIC, Some(TypeRef::INT64), vec![])
            .unwrap();
        let il = tb.il_generator(get).unwrap();
        il.emit(OpCode::LdArg(0));
        il.emit(OpCode::LdFld(field));
        il.emit(OpCode::Ret);
        let prop = tb.define_property("Bar", TypeRef::INT32).unwrap();
        tb.set_get_method(prop, get).unwrap();
        assert!(matches!(tb.create_type(), Err(BackendError::InvalidSignature { .. })));
    }

    #[test]
    fn failed_creation_publishes_nothing() {
        let host = Host::new(HostLimits::default());
        let mut tb = builder(&host);
        let get = tb
            .define_method("get_Bar", MethodAttributes::PUBLIC, Some(TypeRef::INT32), vec![])
            .unwrap();
        tb.il_generator(get).unwrap().emit(OpCode::Ret);
        assert!(matches!(tb.create_type(), Err(BackendError::InvalidBody { .. })));
        assert_eq!(host.type_count(), 0);
        assert_eq!(host.container_count(), 1);
    }

    #[test]
    fn only_one_constructor() {
        let host = Host::new(HostLimits::default());
        let mut tb = builder(&host);
        tb.define_constructor(MethodAttributes::PUBLIC, vec![]).unwrap();
        assert!(matches!(
            tb.define_constructor(MethodAttributes::PUBLIC, vec![]),
            Err(BackendError::DuplicateMember { .. })
        ));
    }
}
