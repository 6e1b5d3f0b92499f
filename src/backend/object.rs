//! Heap objects of generated types.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

use super::metadata::TypeDef;
use crate::value::Value;

struct ObjectData {
    def: Arc<TypeDef>,
    slots: Mutex<Vec<Value>>,
}

/// A shared reference to an object of a generated type.
///
/// Cloning an `Instance` clones the reference, not the object. Two instances are the same object iff
/// [`Instance::ptr_eq`] holds.
///
/// Objects are reference counted. An object reachable from its own slots (for example through an `object`
/// property holding itself) forms a cycle and is never freed.
#[derive(Clone)]
pub struct Instance(Arc<ObjectData>);

impl Instance {
    /// Allocate an object whose slots hold their fields' natural defaults. No constructor runs.
    pub(crate) fn allocate(def: Arc<TypeDef>) -> Instance {
        let slots = def.fields().iter().map(|f| Value::default_for(f.ty())).collect();
        Instance(Arc::new(ObjectData {
            def,
            slots: Mutex::new(slots),
        }))
    }

    pub fn type_def(&self) -> &Arc<TypeDef> {
        &self.0.def
    }

    pub fn ptr_eq(&self, other: &Instance) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Address of the shared object, stable for its lifetime.
    pub(crate) fn addr(&self) -> usize {
        Arc::as_ptr(&self.0) as usize
    }

    pub(crate) fn load(&self, slot: usize) -> Option<Value> {
        self.0.slots.lock().get(slot).cloned()
    }

    pub(crate) fn store(&self, slot: usize, value: Value) -> bool {
        match self.0.slots.lock().get_mut(slot) {
            Some(target) => {
                *target = value;
                true
            }
            None => false,
        }
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Instance({} @ {:p})", self.0.def.full_name(), Arc::as_ptr(&self.0))
    }
}
