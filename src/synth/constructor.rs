//! Default constructor synthesis.

use crate::backend::{BackendError, MethodAttributes, OpCode, TypeBuilder};

use super::errors::SynthError;

/// Define a public parameterless constructor that only calls the base constructor.
///
/// No field is initialized here; objects are allocated with every slot at its natural default.
pub(crate) fn synthesize(builder: &mut TypeBuilder) -> Result<(), SynthError> {
    let type_name = builder.full_name();
    emit_constructor(builder).map_err(|source| SynthError::BackendEmission { type_name, source })
}

fn emit_constructor(builder: &mut TypeBuilder) -> Result<(), BackendError> {
    let ctor = builder.define_constructor(MethodAttributes::PUBLIC, vec![])?;
    let il = builder.il_generator(ctor)?;
    il.emit(OpCode::LdArg(0));
    il.emit(OpCode::CallBaseCtor);
    il.emit(OpCode::Ret);
    Ok(())
}
