//! Render finalized types as IL-style listings.
//!
//! The listing is for humans and snapshot tests. Instruction offsets are instruction indices, not byte
//! offsets.

use std::fmt::Write;

use super::metadata::{MethodDef, TypeDef};
use super::opcode::OpCode;

/// Disassemble `def` into a listing.
pub fn disassemble(def: &TypeDef) -> String {
    let mut sections: Vec<String> = Vec::new();

    if !def.fields().is_empty() {
        let fields: Vec<String> = def
            .fields()
            .iter()
            .map(|f| format!("  .field {} {} {}", f.attributes().keywords().join(" "), f.ty(), f.name()))
            .collect();
        sections.push(fields.join("\n"));
    }
    for method in def.methods() {
        sections.push(method_listing(def, method));
    }
    for property in def.properties() {
        let mut out = format!("  .property {} {}\n  {{\n", property.ty(), property.name());
        if let Some(getter) = property.getter.and_then(|i| def.method_at(i)) {
            let _ = writeln!(out, "    .get {}", getter.name());
        }
        if let Some(setter) = property.setter.and_then(|i| def.method_at(i)) {
            let _ = writeln!(out, "    .set {}", setter.name());
        }
        out.push_str("  }");
        sections.push(out);
    }

    let mut attrs: Vec<&str> = def.attributes().keywords();
    attrs.push(def.name());
    format!(
        ".container {}\n.class {} extends object\n{{\n{}\n}}\n",
        def.container(),
        attrs.join(" "),
        sections.join("\n\n")
    )
}

fn method_listing(def: &TypeDef, method: &MethodDef) -> String {
    let ret = method.return_type().map_or("void".to_string(), |t| t.to_string());
    let params: Vec<String> = method.params().iter().map(|p| p.to_string()).collect();

    let mut header = method.attributes().keywords();
    header.push("instance");
    let signature = format!("{} {}({})", ret, method.name(), params.join(", "));

    let mut out = format!("  .method {} {}\n  {{\n", header.join(" "), signature);
    let _ = writeln!(out, "    .maxstack {}", method.max_stack());
    for (offset, op) in method.body().iter().enumerate() {
        let _ = writeln!(out, "    IL_{:04x}: {}", offset, instruction(def, op));
    }
    out.push_str("  }");
    out
}

fn instruction(def: &TypeDef, op: &OpCode) -> String {
    match op {
        OpCode::LdArg(n @ 0..=3) => format!("ldarg.{}", n),
        OpCode::LdArg(n) => format!("ldarg {}", n),
        OpCode::CallBaseCtor => "call instance void object::.ctor()".to_string(),
        OpCode::Ret => "ret".to_string(),
        OpCode::LdFld(token) | OpCode::LdFldRef(token) | OpCode::StFld(token) | OpCode::StFldRef(token) => {
            match def.fields().get(token.index) {
                Some(field) => format!("{} {} {}::{}", op.mnemonic(), field.ty(), def.name(), field.name()),
                None => format!("{} <field #{}>", op.mnemonic(), token.index),
            }
        }
    }
}
