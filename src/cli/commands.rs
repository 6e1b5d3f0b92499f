//! CLI command implementations
//!
//! All command functions return their output as a `String` inside `CliResult` instead of printing and
//! calling `process::exit`. Error handling and exits happen in the top-level `run()`.

use std::fmt::Write;

use typeforge_core::names::BUILTIN_TYPES;
use typeforge_core::parse_type_ref;

use crate::backend::Host;
use crate::config::{HostLimits, SynthOptions};
use crate::json::{value_from_json, value_to_json};
use crate::synth::{Synthesizer, TypeRequest};

use super::{CliError, CliResult, SynthArgs};

/// Synthesize one type on a private host and exercise its property.
pub fn synth(args: &SynthArgs) -> CliResult<String> {
    let ty = parse_type_ref(&args.ty).map_err(|e| CliError::usage(format!("error: {}", e)))?;
    let json = args
        .set
        .as_deref()
        .map(serde_json::from_str::<serde_json::Value>)
        .transpose()
        .map_err(|e| CliError::usage(format!("error: --set is not valid JSON: {}", e)))?;

    let mut options = SynthOptions::default();
    if let Some(prefix) = &args.container_prefix {
        options = options.with_container_prefix(prefix.as_str());
    }
    if let Some(name) = &args.type_name {
        options = options.with_type_name(name.as_str());
    }

    let host = Host::new(HostLimits::default());
    let handle = Synthesizer::with_host(&host)
        .with_options(options)
        .synthesize(&TypeRequest::new(args.property.as_str(), ty.clone()))
        .map_err(|e| CliError::failure(format!("{:?}", miette::Report::new(e))))?;

    let member_error = |e: crate::backend::MemberError| CliError::failure(format!("error: {}", e));
    let instance = handle.instantiate().map_err(member_error)?;

    let mut out = String::new();
    let _ = writeln!(out, "type      {}", handle.full_name());
    let storage = ty.storage().map_or(String::new(), |s| format!(" ({})", s));
    let _ = writeln!(out, "property  {}: {}{}", args.property, ty, storage);
    let _ = writeln!(out, "default   {}", handle.get(&instance, &args.property).map_err(member_error)?);

    if let Some(json) = json {
        let value = value_from_json(&json, &ty).map_err(|e| CliError::usage(format!("error: {}", e)))?;
        handle.set(&instance, &args.property, value).map_err(member_error)?;
        let read = handle.get(&instance, &args.property).map_err(member_error)?;
        let _ = writeln!(out, "set       {}", json);
        let _ = writeln!(out, "read      {}", value_to_json(&read));
    }

    if args.disasm {
        out.push('\n');
        out.push_str(&handle.disassemble());
    }
    Ok(out)
}

/// Render the builtin type vocabulary as a table.
pub fn types() -> String {
    let mut out = String::new();
    for info in BUILTIN_TYPES {
        let _ = writeln!(
            out,
            "{:<10} {:<13} {:<40} {}",
            info.canonical,
            info.storage.to_string(),
            info.aliases.join(", "),
            info.description
        );
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn args(ty: &str) -> SynthArgs {
        SynthArgs {
            property: "Bar".to_string(),
            ty: ty.to_string(),
            set: None,
            disasm: false,
            container_prefix: None,
            type_name: None,
        }
    }

    #[test]
    fn test_synth_set_and_read_back() {
        let out = synth(&SynthArgs {
            set: Some("\"abc\"".to_string()),
            ..args("string")
        })
        .unwrap();
        assert_eq!(
            out,
            "type      Forge_Bar_1.Foo_1\n\
             property  Bar: string (by-reference)\n\
             default   null\n\
             set       \"abc\"\n\
             read      \"abc\"\n"
        );
    }

    #[test]
    fn test_synth_naming_flags_and_disasm() {
        let out = synth(&SynthArgs {
            disasm: true,
            container_prefix: Some("Fixtures".to_string()),
            type_name: Some("Shape".to_string()),
            ..args("int32")
        })
        .unwrap();
        assert!(out.starts_with("type      Fixtures_Bar_1.Shape_1\n"), "{out}");
        assert!(out.contains(".container Fixtures_Bar_1"), "{out}");
        assert!(out.contains("ldfld int32 Shape_1::_bar"), "{out}");
    }

    #[test]
    fn test_synth_rejects_mismatched_json() {
        let err = synth(&SynthArgs {
            set: Some("\"abc\"".to_string()),
            ..args("int32")
        })
        .unwrap_err();
        assert!(err.message.contains("expected `int32`, found JSON string"), "{}", err.message);
    }

    #[test]
    fn test_types_lists_every_builtin() {
        let out = types();
        assert_eq!(out.lines().count(), BUILTIN_TYPES.len());
        assert!(out.lines().any(|l| l.starts_with("date-time")));
    }
}
