//! Declaration of the generated type and its backing field.

use typeforge_core::{StorageCategory, TypeRef};

use crate::backend::{ContainerBuilder, FieldAttributes, FieldToken, TypeAttributes, TypeBuilder};
use crate::config::SynthOptions;

use super::TypeRequest;
use super::errors::SynthError;

/// Internal, auto-layout class with lazy type initialization.
pub(crate) const TYPE_ATTRIBUTES: TypeAttributes = TypeAttributes::NOT_PUBLIC
    .union(TypeAttributes::AUTO_LAYOUT)
    .union(TypeAttributes::ANSI_CLASS)
    .union(TypeAttributes::BEFORE_FIELD_INIT);

/// A declared type with its backing field, ready for accessors.
#[derive(Debug)]
pub(crate) struct Skeleton {
    pub builder: TypeBuilder,
    pub field: FieldToken,
    pub storage: StorageCategory,
}

pub(crate) fn declare(
    container: &ContainerBuilder,
    request: &TypeRequest,
    options: &SynthOptions,
    sequence: u64,
) -> Result<Skeleton, SynthError> {
    let ty = &request.property_type;
    let storage = storage_category(ty)?;

    let property = request.property_name.as_str();
    if !typeforge_core::is_identifier(property) {
        return Err(SynthError::InvalidRequest {
            reason: format!("property name `{}` is not an identifier", property),
        });
    }
    let field_name = backing_field_name(&options.field_prefix, property);
    if field_name == property {
        return Err(SynthError::InvalidRequest {
            reason: format!("backing field of `{}` would share its name", property),
        });
    }

    let type_name = format!("{}_{}", options.type_name, sequence);
    let emission = |source| SynthError::BackendEmission {
        type_name: format!("{}.{}", container.name(), type_name),
        source,
    };
    let mut builder = container.define_type(&type_name, TYPE_ATTRIBUTES).map_err(emission)?;
    let field = builder
        .define_field(&field_name, ty.clone(), FieldAttributes::PRIVATE)
        .map_err(emission)?;

    tracing::debug!(type_name = %builder.full_name(), field = %field_name, %storage, "skeleton declared");
    Ok(Skeleton { builder, field, storage })
}

/// Storage category of an embeddable type; anything else is unsupported.
fn storage_category(ty: &TypeRef) -> Result<StorageCategory, SynthError> {
    let unsupported = |reason: String| SynthError::UnsupportedType {
        type_name: ty.to_string(),
        reason,
    };
    ty.check_embeddable().map_err(|issue| unsupported(issue.to_string()))?;
    ty.storage()
        .ok_or_else(|| unsupported("the type has no storage".to_string()))
}

/// `prefix` followed by the property name with its first character lower-cased.
pub(crate) fn backing_field_name(prefix: &str, property: &str) -> String {
    let mut chars = property.chars();
    let mut name = prefix.to_string();
    if let Some(first) = chars.next() {
        name.extend(first.to_lowercase());
        name.push_str(chars.as_str());
    }
    name
}
