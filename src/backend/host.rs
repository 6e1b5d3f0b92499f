//! The host registry of containers and the types published into them.
//!
//! The registry is append-only: containers are added, never removed or renamed, and a container's types
//! are only ever appended when a [`super::TypeBuilder`] is finalized. Identity is guaranteed by monotonic
//! counters, so concurrent definitions never need to coordinate beyond the registry's write lock.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

use parking_lot::{Mutex, RwLock};

use super::builder::ContainerBuilder;
use super::errors::BackendError;
use super::metadata::TypeDef;
use crate::config::HostLimits;

/// Process-wide source of type ids, so ids stay unique across hosts.
static NEXT_TYPE_ID: AtomicU64 = AtomicU64::new(1);

pub(crate) fn next_type_id() -> u64 {
    NEXT_TYPE_ID.fetch_add(1, Ordering::Relaxed)
}

/// An isolated unit hosting generated types.
#[derive(Debug)]
pub struct Container {
    name: String,
    types: RwLock<Vec<Arc<TypeDef>>>,
    reserved: Mutex<HashSet<String>>,
}

impl Container {
    fn new(name: String) -> Self {
        Self {
            name,
            types: RwLock::new(Vec::new()),
            reserved: Mutex::new(HashSet::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Snapshot of the finalized types in definition order.
    pub fn types(&self) -> Vec<Arc<TypeDef>> {
        self.types.read().clone()
    }

    pub fn find_type(&self, name: &str) -> Option<Arc<TypeDef>> {
        self.types.read().iter().find(|t| t.name() == name).cloned()
    }

    /// Claim a type name in this container; fails if it was claimed before.
    pub(crate) fn reserve_type_name(&self, name: &str) -> Result<(), BackendError> {
        if self.reserved.lock().insert(name.to_string()) {
            Ok(())
        } else {
            Err(BackendError::DuplicateMember {
                owner: self.name.clone(),
                member: name.to_string(),
            })
        }
    }

    pub(crate) fn publish(&self, def: Arc<TypeDef>) {
        self.types.write().push(def);
    }
}

#[derive(Debug, Default)]
struct Registry {
    containers: Vec<Arc<Container>>,
    by_name: HashMap<String, usize>,
}

/// A code-generation host: owns the container registry and hands out container builders.
///
/// Most callers use [`Host::global`]. A separately constructed host scopes the lifetime of everything
/// defined in it: dropping the host (and every handle into it) releases its containers.
#[derive(Debug)]
pub struct Host {
    limits: HostLimits,
    registry: RwLock<Registry>,
    next_sequence: AtomicU64,
}

impl Host {
    pub fn new(limits: HostLimits) -> Self {
        Self {
            limits,
            registry: RwLock::new(Registry::default()),
            next_sequence: AtomicU64::new(1),
        }
    }

    /// The process-wide host with default limits.
    pub fn global() -> &'static Host {
        static GLOBAL: OnceLock<Host> = OnceLock::new();
        GLOBAL.get_or_init(|| Host::new(HostLimits::default()))
    }

    pub fn limits(&self) -> &HostLimits {
        &self.limits
    }

    /// Next value of this host's monotonic sequence, starting at 1. Never repeats.
    pub fn next_sequence(&self) -> u64 {
        self.next_sequence.fetch_add(1, Ordering::Relaxed)
    }

    /// Create and register a new, empty container.
    pub fn define_container(&self, name: &str) -> Result<ContainerBuilder, BackendError> {
        if !typeforge_core::is_identifier(name) {
            return Err(BackendError::InvalidName {
                what: "container",
                name: name.to_string(),
            });
        }

        let container = {
            let mut registry = self.registry.write();
            if let Some(limit) = self.limits.max_containers {
                if registry.containers.len() >= limit {
                    return Err(BackendError::CapacityExceeded { limit });
                }
            }
            if registry.by_name.contains_key(name) {
                return Err(BackendError::DuplicateContainer(name.to_string()));
            }
            let container = Arc::new(Container::new(name.to_string()));
            let index = registry.containers.len();
            registry.containers.push(Arc::clone(&container));
            registry.by_name.insert(name.to_string(), index);
            container
        };

        tracing::debug!(container = name, "container defined");
        Ok(ContainerBuilder::new(container))
    }

    /// Snapshot of all containers in creation order.
    pub fn containers(&self) -> Vec<Arc<Container>> {
        self.registry.read().containers.clone()
    }

    pub fn container(&self, name: &str) -> Option<Arc<Container>> {
        let registry = self.registry.read();
        registry.by_name.get(name).map(|&i| Arc::clone(&registry.containers[i]))
    }

    /// Look up a finalized type by `Container.Type` name.
    pub fn find_type(&self, full_name: &str) -> Option<Arc<TypeDef>> {
        let (container, name) = full_name.split_once('.')?;
        self.container(container)?.find_type(name)
    }

    pub fn container_count(&self) -> usize {
        self.registry.read().containers.len()
    }

    /// Number of finalized types across all containers.
    pub fn type_count(&self) -> usize {
        self.registry.read().containers.iter().map(|c| c.types.read().len()).sum()
    }
}
