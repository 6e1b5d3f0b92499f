//! Execute verified method bodies.

use super::errors::MemberError;
use super::metadata::{FieldToken, MethodDef};
use super::object::Instance;
use super::opcode::OpCode;
use crate::value::Value;

enum StackValue {
    Receiver(Instance),
    Value(Value),
}

/// Run `method` on `this` with `args` (receiver excluded) and return its result, if any.
///
/// The body has already passed verification; any stack shape mismatch found here is reported as an
/// invocation fault rather than trusted.
pub(crate) fn invoke(method: &MethodDef, this: &Instance, args: &[Value]) -> Result<Option<Value>, MemberError> {
    let type_name = this.type_def().name().to_string();
    let fault = |offset: usize, reason: &str| MemberError::Invocation {
        method: format!("{}::{}", type_name, method.name()),
        offset,
        reason: reason.to_string(),
    };

    if args.len() != method.params().len() {
        return Err(fault(0, "argument count does not match the signature"));
    }

    let mut stack: Vec<StackValue> = Vec::with_capacity(method.max_stack());

    for (offset, op) in method.body().iter().enumerate() {
        match *op {
            OpCode::LdArg(0) => stack.push(StackValue::Receiver(this.clone())),
            OpCode::LdArg(n) => {
                let arg = args.get(usize::from(n) - 1).ok_or_else(|| fault(offset, "missing argument"))?;
                stack.push(StackValue::Value(arg.clone()));
            }
            // The slot clone is a copy for by-value contents and a shared handle for by-reference contents;
            // the form was matched to the field's category by the verifier.
            OpCode::LdFld(field) | OpCode::LdFldRef(field) => {
                let receiver = pop_receiver(&mut stack).ok_or_else(|| fault(offset, "expected receiver"))?;
                let value = receiver
                    .load(slot_of(&receiver, field).ok_or_else(|| fault(offset, "field not on receiver"))?)
                    .ok_or_else(|| fault(offset, "field slot missing"))?;
                stack.push(StackValue::Value(value));
            }
            OpCode::StFld(field) | OpCode::StFldRef(field) => {
                let value = match stack.pop() {
                    Some(StackValue::Value(v)) => v,
                    _ => return Err(fault(offset, "expected value to store")),
                };
                let receiver = pop_receiver(&mut stack).ok_or_else(|| fault(offset, "expected receiver"))?;
                let slot = slot_of(&receiver, field).ok_or_else(|| fault(offset, "field not on receiver"))?;
                if !receiver.store(slot, value) {
                    return Err(fault(offset, "field slot missing"));
                }
            }
            OpCode::CallBaseCtor => {
                // The root type's constructor has an empty body.
                pop_receiver(&mut stack).ok_or_else(|| fault(offset, "expected receiver"))?;
            }
            OpCode::Ret => {
                return match (method.return_type(), stack.pop()) {
                    (None, None) => Ok(None),
                    (Some(_), Some(StackValue::Value(v))) => Ok(Some(v)),
                    _ => Err(fault(offset, "return stack does not match the signature")),
                };
            }
        }
    }

    Err(fault(method.body().len(), "fell off the end of the body"))
}

fn pop_receiver(stack: &mut Vec<StackValue>) -> Option<Instance> {
    match stack.pop() {
        Some(StackValue::Receiver(obj)) => Some(obj),
        _ => None,
    }
}

fn slot_of(receiver: &Instance, field: FieldToken) -> Option<usize> {
    (receiver.type_def().id() == field.owner).then_some(field.index)
}
