//! Instruction set of the host's evaluation-stack machine.
//!
//! Field loads and stores come in two forms keyed on the field's [`StorageCategory`]: the plain form copies a
//! by-value slot, the `.ref` form shares a by-reference slot's handle. The verifier rejects a form that does
//! not match the field it names.

use typeforge_core::StorageCategory;

use super::metadata::FieldToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpCode {
    /// Push argument `n`; argument 0 is the receiver.
    LdArg(u16),
    /// Pop a receiver, push a copy of a by-value field.
    LdFld(FieldToken),
    /// Pop a receiver, push the handle held by a by-reference field.
    LdFldRef(FieldToken),
    /// Pop a value and a receiver, store the value into a by-value field.
    StFld(FieldToken),
    /// Pop a handle and a receiver, store the handle into a by-reference field.
    StFldRef(FieldToken),
    /// Pop a receiver and run the root type's parameterless constructor on it.
    CallBaseCtor,
    /// Return to the caller, popping the return value if the method has one.
    Ret,
}

impl OpCode {
    /// The load instruction for a field of the given category.
    pub fn load_field(field: FieldToken, storage: StorageCategory) -> OpCode {
        match storage {
            StorageCategory::ByValue => OpCode::LdFld(field),
            StorageCategory::ByReference => OpCode::LdFldRef(field),
        }
    }

    /// The store instruction for a field of the given category.
    pub fn store_field(field: FieldToken, storage: StorageCategory) -> OpCode {
        match storage {
            StorageCategory::ByValue => OpCode::StFld(field),
            StorageCategory::ByReference => OpCode::StFldRef(field),
        }
    }

    pub fn mnemonic(&self) -> &'static str {
        match self {
            OpCode::LdArg(_) => "ldarg",
            OpCode::LdFld(_) => "ldfld",
            OpCode::LdFldRef(_) => "ldfld.ref",
            OpCode::StFld(_) => "stfld",
            OpCode::StFldRef(_) => "stfld.ref",
            OpCode::CallBaseCtor => "call",
            OpCode::Ret => "ret",
        }
    }

    /// The storage category a field instruction requires of its operand.
    pub fn required_storage(&self) -> Option<StorageCategory> {
        match self {
            OpCode::LdFld(_) | OpCode::StFld(_) => Some(StorageCategory::ByValue),
            OpCode::LdFldRef(_) | OpCode::StFldRef(_) => Some(StorageCategory::ByReference),
            _ => None,
        }
    }
}
