//! Instruction stream for one method body under construction.

use super::opcode::OpCode;

/// Appends instructions to a method body.
///
/// The generator performs no checks; bodies are verified as a whole when the owning type is created.
#[derive(Debug, Default)]
pub struct IlGenerator {
    method: String,
    ops: Vec<OpCode>,
}

impl IlGenerator {
    pub(crate) fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            ops: Vec::new(),
        }
    }

    pub fn emit(&mut self, op: OpCode) {
        tracing::trace!(method = %self.method, offset = self.ops.len(), op = op.mnemonic(), "emit");
        self.ops.push(op);
    }

    pub fn instructions(&self) -> &[OpCode] {
        &self.ops
    }

    pub(crate) fn into_body(self) -> Vec<OpCode> {
        self.ops
    }
}
