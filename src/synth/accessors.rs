//! Getter and setter synthesis.
//!
//! Both accessors are pure pass-through: the getter returns the backing field, the setter overwrites it.
//! The load and store forms are picked by the field's storage category, since the host verifier refuses a
//! by-value form on a by-reference field and vice versa.

use typeforge_core::{StorageCategory, TypeRef};

use crate::backend::{BackendError, FieldToken, IlGenerator, MethodAttributes, OpCode, TypeBuilder};

use super::errors::SynthError;

pub(crate) const ACCESSOR_ATTRIBUTES: MethodAttributes = MethodAttributes::PUBLIC
    .union(MethodAttributes::HIDE_BY_SIG)
    .union(MethodAttributes::SPECIAL_NAME);

/// Define `get_<name>` and `set_<name>` over `field` and bind them as property `name`.
pub(crate) fn synthesize(
    builder: &mut TypeBuilder,
    name: &str,
    ty: &TypeRef,
    field: FieldToken,
    storage: StorageCategory,
) -> Result<(), SynthError> {
    let type_name = builder.full_name();
    emit_accessors(builder, name, ty, field, storage).map_err(|source| SynthError::BackendEmission { type_name, source })
}

fn emit_accessors(
    builder: &mut TypeBuilder,
    name: &str,
    ty: &TypeRef,
    field: FieldToken,
    storage: StorageCategory,
) -> Result<(), BackendError> {
    let getter = builder.define_method(&format!("get_{}", name), ACCESSOR_ATTRIBUTES, Some(ty.clone()), vec![])?;
    emit_getter(builder.il_generator(getter)?, field, storage);

    let setter = builder.define_method(&format!("set_{}", name), ACCESSOR_ATTRIBUTES, None, vec![ty.clone()])?;
    emit_setter(builder.il_generator(setter)?, field, storage);

    let property = builder.define_property(name, ty.clone())?;
    builder.set_get_method(property, getter)?;
    builder.set_set_method(property, setter)?;

    tracing::debug!(property = name, %storage, "accessors synthesized");
    Ok(())
}

fn emit_getter(il: &mut IlGenerator, field: FieldToken, storage: StorageCategory) {
    il.emit(OpCode::LdArg(0));
    il.emit(OpCode::load_field(field, storage));
    il.emit(OpCode::Ret);
}

fn emit_setter(il: &mut IlGenerator, field: FieldToken, storage: StorageCategory) {
    il.emit(OpCode::LdArg(0));
    il.emit(OpCode::LdArg(1));
    il.emit(OpCode::store_field(field, storage));
    il.emit(OpCode::Ret);
}
