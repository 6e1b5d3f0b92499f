//! Allocation of uniquely named containers.

use crate::backend::{ContainerBuilder, Host};
use crate::config::SynthOptions;

use super::errors::SynthError;

/// A freshly registered container and the sequence number its name carries.
#[derive(Debug)]
pub(crate) struct Allocation {
    pub container: ContainerBuilder,
    pub sequence: u64,
}

/// Register a new container named `<prefix>_<hint>_<seq>`.
///
/// The sequence comes from the host's monotonic counter, so names never repeat within a host even under
/// concurrent allocation.
pub(crate) fn allocate(host: &Host, options: &SynthOptions, hint: &str) -> Result<Allocation, SynthError> {
    let sequence = host.next_sequence();
    let name = container_name(&options.container_prefix, &sanitize_hint(hint, options.hint_max_len), sequence);

    let container = host.define_container(&name).map_err(|source| SynthError::Allocation {
        container: name.clone(),
        source,
    })?;
    tracing::debug!(container = %name, sequence, "container allocated");
    Ok(Allocation { container, sequence })
}

fn container_name(prefix: &str, hint: &str, sequence: u64) -> String {
    if hint.is_empty() {
        format!("{}_{}", prefix, sequence)
    } else {
        format!("{}_{}_{}", prefix, hint, sequence)
    }
}

/// Replace non-identifier characters with `_` and keep at most `max_len` characters.
fn sanitize_hint(hint: &str, max_len: usize) -> String {
    hint.chars()
        .take(max_len)
        .map(|c| if c.is_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}
