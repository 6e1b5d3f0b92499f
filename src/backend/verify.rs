//! Static verification of method bodies.
//!
//! The verifier walks a body once, simulating the evaluation stack with the *types* of the values it would
//! hold. A body is accepted only if every instruction finds the operands it needs, every field instruction
//! uses the form matching its field's storage category, and the body ends in a `ret` that leaves exactly the
//! declared return value.
//!
//! Accepted bodies are the only bodies the interpreter runs; it still guards against faults but never needs
//! to recover from a malformed body.

use typeforge_core::TypeRef;

use super::errors::BackendError;
use super::metadata::{FieldDef, FieldToken, MethodKind};
use super::opcode::OpCode;

/// Signature of the method whose body is being verified.
#[derive(Debug, Clone, Copy)]
pub(crate) struct MethodShape<'a> {
    pub name: &'a str,
    pub kind: MethodKind,
    pub params: &'a [TypeRef],
    pub ret: Option<&'a TypeRef>,
}

/// The owning type, as far as the verifier needs to see it.
#[derive(Debug, Clone, Copy)]
pub(crate) struct OwnerView<'a> {
    pub id: u64,
    pub name: &'a str,
    pub fields: &'a [FieldDef],
}

#[derive(Debug, Clone, PartialEq)]
enum Slot {
    Receiver,
    Value(TypeRef),
}

impl Slot {
    fn describe(&self) -> String {
        match self {
            Slot::Receiver => "the receiver".to_string(),
            Slot::Value(ty) => format!("a `{}`", ty),
        }
    }
}

/// Verify `body` and return its maximum stack depth.
pub(crate) fn verify_body(owner: OwnerView<'_>, method: MethodShape<'_>, body: &[OpCode]) -> Result<usize, BackendError> {
    let fail = |offset: usize, reason: String| BackendError::InvalidBody {
        method: format!("{}::{}", owner.name, method.name),
        offset,
        reason,
    };

    if body.is_empty() {
        return Err(fail(0, "method body is empty".to_string()));
    }

    let mut stack: Vec<Slot> = Vec::new();
    let mut max_stack = 0usize;
    let mut returned = false;

    for (offset, op) in body.iter().enumerate() {
        if returned {
            return Err(fail(offset, "unreachable instruction after `ret`".to_string()));
        }

        match *op {
            OpCode::LdArg(0) => stack.push(Slot::Receiver),
            OpCode::LdArg(n) => {
                let param = method.params.get(usize::from(n) - 1).ok_or_else(|| {
                    fail(
                        offset,
                        format!(
                            "argument index {} out of range ({} parameters)",
                            n,
                            method.params.len()
                        ),
                    )
                })?;
                stack.push(Slot::Value(param.clone()));
            }
            OpCode::LdFld(token) | OpCode::LdFldRef(token) => {
                let field = resolve_field(owner, op, token).map_err(|reason| fail(offset, reason))?;
                pop_receiver(&mut stack, op).map_err(|reason| fail(offset, reason))?;
                stack.push(Slot::Value(field.ty.clone()));
            }
            OpCode::StFld(token) | OpCode::StFldRef(token) => {
                let field = resolve_field(owner, op, token).map_err(|reason| fail(offset, reason))?;
                match stack.pop() {
                    Some(Slot::Value(ty)) if ty == field.ty => {}
                    Some(other) => {
                        return Err(fail(
                            offset,
                            format!(
                                "`{}` stores {} into `{}` of type `{}`",
                                op.mnemonic(),
                                other.describe(),
                                field.name,
                                field.ty
                            ),
                        ));
                    }
                    None => return Err(fail(offset, format!("stack underflow in `{}`", op.mnemonic()))),
                }
                pop_receiver(&mut stack, op).map_err(|reason| fail(offset, reason))?;
            }
            OpCode::CallBaseCtor => {
                if method.kind != MethodKind::Constructor {
                    return Err(fail(
                        offset,
                        "base constructor can only be called from a constructor".to_string(),
                    ));
                }
                pop_receiver(&mut stack, op).map_err(|reason| fail(offset, reason))?;
            }
            OpCode::Ret => {
                let ok = match (method.ret, stack.as_slice()) {
                    (None, []) => true,
                    (Some(ret), [Slot::Value(ty)]) => ty == ret,
                    _ => false,
                };
                if !ok {
                    let expected = method.ret.map_or("an empty stack".to_string(), |ty| format!("a single `{}`", ty));
                    let found: Vec<String> = stack.iter().map(Slot::describe).collect();
                    return Err(fail(
                        offset,
                        format!("`ret` expects {}, found [{}]", expected, found.join(", ")),
                    ));
                }
                stack.clear();
                returned = true;
            }
        }

        max_stack = max_stack.max(stack.len());
    }

    if !returned {
        return Err(fail(body.len(), "body does not end with `ret`".to_string()));
    }
    Ok(max_stack)
}

fn resolve_field<'a>(owner: OwnerView<'a>, op: &OpCode, token: FieldToken) -> Result<&'a FieldDef, String> {
    if token.owner != owner.id {
        return Err(format!("`{}` names a field of another type", op.mnemonic()));
    }
    let field = owner
        .fields
        .get(token.index)
        .ok_or_else(|| format!("`{}` names unknown field #{}", op.mnemonic(), token.index))?;
    if let Some(required) = op.required_storage() {
        if required != field.storage {
            return Err(format!(
                "`{}` requires a {} field, `{}` is {}",
                op.mnemonic(),
                required,
                field.name,
                field.storage
            ));
        }
    }
    Ok(field)
}

fn pop_receiver(stack: &mut Vec<Slot>, op: &OpCode) -> Result<(), String> {
    match stack.pop() {
        Some(Slot::Receiver) => Ok(()),
        Some(other) => Err(format!("`{}` expects the receiver, found {}", op.mnemonic(), other.describe())),
        None => Err(format!("stack underflow in `{}`", op.mnemonic())),
    }
}
