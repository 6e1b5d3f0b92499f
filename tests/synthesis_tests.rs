//! End-to-end synthesis tests
//!
//! Each test drives the public API the way a fixture-hungry test suite would: request a type, instantiate
//! it, and read or write its single property by name.

use std::collections::HashSet;

use typeforge::backend::BackendError;
use typeforge::synth::{SynthError, Synthesizer, TypeRequest};
use typeforge::value::zero_instant;
use typeforge::{BuiltinType, Host, HostLimits, MemberError, SynthOptions, TypeRef, Value, parse_type_ref};
use typeforge_core::names::BUILTIN_TYPES;

fn host() -> Host {
    Host::new(HostLimits::default())
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_string_property_scenario() {
    let host = host();
    let handle = Synthesizer::with_host(&host)
        .synthesize(&TypeRequest::new("Bar", TypeRef::STRING))
        .unwrap();
    let foo = handle.instantiate().unwrap();

    assert_eq!(handle.get(&foo, "Bar").unwrap(), Value::Null);
    handle.set(&foo, "Bar", "abc").unwrap();
    assert_eq!(handle.get(&foo, "Bar").unwrap(), Value::str("abc"));
}

#[test]
fn test_date_time_property_scenario() {
    let host = host();
    let handle = Synthesizer::with_host(&host)
        .synthesize(&TypeRequest::new("When", TypeRef::DATE_TIME))
        .unwrap();
    let foo = handle.instantiate().unwrap();

    assert_eq!(handle.get(&foo, "When").unwrap(), Value::DateTime(zero_instant()));

    let instant = chrono::NaiveDate::from_ymd_opt(2024, 2, 29)
        .unwrap()
        .and_hms_milli_opt(13, 14, 15, 250)
        .unwrap();
    handle.set(&foo, "When", instant).unwrap();
    assert_eq!(handle.get(&foo, "When").unwrap().as_date_time(), Some(instant));
}

#[test]
fn test_open_generic_is_unsupported() {
    let host = host();
    let err = Synthesizer::with_host(&host)
        .synthesize(&TypeRequest::new("Bar", TypeRef::generic_param("T")))
        .unwrap_err();
    match err {
        SynthError::UnsupportedType { type_name, .. } => assert_eq!(type_name, "!T"),
        other => panic!("expected UnsupportedType, got {other:?}"),
    }
    assert_eq!(host.type_count(), 0);
}

#[test]
fn test_unembeddable_expressions_are_unsupported() {
    let host = host();
    let synth = Synthesizer::with_host(&host);
    for expr in ["&int32", "void", "!T[]", "string?", "int32??", "(&int64)[]"] {
        let ty = parse_type_ref(expr).unwrap();
        let err = synth.synthesize(&TypeRequest::new("Bar", ty)).unwrap_err();
        assert!(matches!(err, SynthError::UnsupportedType { .. }), "{expr}: {err:?}");
    }
}

// ============================================================================
// Laws
// ============================================================================

#[test]
fn test_default_law_for_every_builtin() {
    let host = host();
    let synth = Synthesizer::with_host(&host);
    for info in BUILTIN_TYPES {
        let ty = TypeRef::Builtin(info.id);
        let handle = synth.synthesize(&TypeRequest::new("Bar", ty.clone())).unwrap();
        let obj = handle.instantiate().unwrap();
        assert_eq!(
            handle.get(&obj, "Bar").unwrap(),
            Value::default_for(&ty),
            "default of {}",
            info.canonical
        );
    }
    assert_eq!(host.type_count(), BUILTIN_TYPES.len());
}

#[test]
fn test_default_law_for_composites() {
    let host = host();
    let synth = Synthesizer::with_host(&host);
    for expr in ["int32?", "date-time?", "string[]", "int8[][]", "object"] {
        let ty = parse_type_ref(expr).unwrap();
        let handle = synth.synthesize(&TypeRequest::new("Bar", ty)).unwrap();
        let obj = handle.instantiate().unwrap();
        assert!(handle.get(&obj, "Bar").unwrap().is_null(), "{expr}");
    }
}

#[test]
fn test_pass_through_for_composites() {
    let host = host();
    let synth = Synthesizer::with_host(&host);

    let nullable = synth
        .synthesize(&TypeRequest::new("Count", TypeRef::nullable(TypeRef::INT32)))
        .unwrap();
    let obj = nullable.instantiate().unwrap();
    obj.set("Count", 5).unwrap();
    assert_eq!(obj.get("Count").unwrap(), Value::I32(5));
    obj.set("Count", Value::Null).unwrap();
    assert_eq!(obj.get("Count").unwrap(), Value::Null);

    let array = synth
        .synthesize(&TypeRequest::new("Items", TypeRef::array(TypeRef::STRING)))
        .unwrap();
    let obj = array.instantiate().unwrap();
    let items = Value::array([Value::str("a"), Value::Null, Value::str("c")]);
    obj.set("Items", items.clone()).unwrap();
    assert_eq!(obj.get("Items").unwrap(), items);

    let any = synth.synthesize(&TypeRequest::new("Any", TypeRef::OBJECT)).unwrap();
    let obj = any.instantiate().unwrap();
    obj.set("Any", 'x').unwrap();
    assert_eq!(obj.get("Any").unwrap(), Value::Char('x'));
}

#[test]
fn test_value_is_stable_until_reassigned() {
    let host = host();
    let handle = Synthesizer::with_host(&host)
        .synthesize(&TypeRequest::new("Bar", TypeRef::FLOAT64))
        .unwrap();
    let obj = handle.instantiate().unwrap();
    handle.set(&obj, "Bar", 1.5).unwrap();
    for _ in 0..3 {
        assert_eq!(handle.get(&obj, "Bar").unwrap(), Value::F64(1.5));
    }
    handle.set(&obj, "Bar", f64::NAN).unwrap();
    assert_eq!(handle.get(&obj, "Bar").unwrap(), Value::F64(f64::NAN));
}

#[test]
fn test_independence_of_identical_requests() {
    let host = host();
    let synth = Synthesizer::with_host(&host);
    let request = TypeRequest::new("Bar", TypeRef::INT32);
    let a = synth.synthesize(&request).unwrap();
    let b = synth.synthesize(&request).unwrap();

    assert_ne!(a, b);
    assert_ne!(a.container_name(), b.container_name());
    assert_ne!(a.class_ref().id, b.class_ref().id);

    let obj_a = a.instantiate().unwrap();
    let obj_b = b.instantiate().unwrap();
    a.set(&obj_a, "Bar", 1).unwrap();
    assert_eq!(b.get(&obj_b, "Bar").unwrap(), Value::I32(0));
    assert!(matches!(a.get(&obj_b, "Bar"), Err(MemberError::InstanceTypeMismatch { .. })));
}

#[test]
fn test_type_ids_are_unique_across_hosts() {
    let (first, second) = (host(), host());
    let request = TypeRequest::new("Bar", TypeRef::INT32);
    let a = Synthesizer::with_host(&first).synthesize(&request).unwrap();
    let b = Synthesizer::with_host(&second).synthesize(&request).unwrap();

    // Each host numbers its containers independently
    assert_eq!(a.container_name(), b.container_name());
    assert_ne!(a.class_ref().id, b.class_ref().id);
}

#[test]
fn test_instances_do_not_share_state() {
    let host = host();
    let handle = Synthesizer::with_host(&host)
        .synthesize(&TypeRequest::new("Bar", TypeRef::STRING))
        .unwrap();
    let first = handle.instantiate().unwrap();
    let second = handle.instantiate().unwrap();
    first.set("Bar", "one").unwrap();
    assert!(second.get("Bar").unwrap().is_null());
}

// ============================================================================
// Concurrency
// ============================================================================

#[test]
fn test_concurrent_synthesis_never_collides() {
    const THREADS: usize = 8;
    const PER_THREAD: usize = 16;

    let host = host();
    let names: Vec<String> = std::thread::scope(|scope| {
        let workers: Vec<_> = (0..THREADS)
            .map(|t| {
                let host = &host;
                scope.spawn(move || {
                    let synth = Synthesizer::with_host(host);
                    (0..PER_THREAD)
                        .map(|i| {
                            let handle = synth.synthesize(&TypeRequest::new("Bar", TypeRef::INT64)).unwrap();
                            let obj = handle.instantiate().unwrap();
                            let value = (t * PER_THREAD + i) as i64;
                            obj.set("Bar", value).unwrap();
                            assert_eq!(obj.get("Bar").unwrap(), Value::I64(value));
                            handle.full_name()
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        workers.into_iter().flat_map(|w| w.join().unwrap()).collect()
    });

    let unique: HashSet<&String> = names.iter().collect();
    assert_eq!(unique.len(), THREADS * PER_THREAD);
    assert_eq!(host.container_count(), THREADS * PER_THREAD);
    assert_eq!(host.type_count(), THREADS * PER_THREAD);
}

// ============================================================================
// Host interaction
// ============================================================================

#[test]
fn test_allocation_refused_at_capacity() {
    let host = Host::new(HostLimits::default().with_max_containers(2));
    let synth = Synthesizer::with_host(&host);
    synth.synthesize(&TypeRequest::new("A", TypeRef::BOOL)).unwrap();
    synth.synthesize(&TypeRequest::new("B", TypeRef::BOOL)).unwrap();

    match synth.synthesize(&TypeRequest::new("C", TypeRef::BOOL)).unwrap_err() {
        SynthError::Allocation { container, source } => {
            assert_eq!(container, "Forge_C_3");
            assert_eq!(source, BackendError::CapacityExceeded { limit: 2 });
        }
        other => panic!("expected Allocation, got {other:?}"),
    }
}

#[test]
fn test_types_are_discoverable_by_full_name() {
    let host = host();
    let handle = Synthesizer::with_host(&host)
        .with_options(SynthOptions::default().with_container_prefix("Fixtures").with_type_name("Shape"))
        .synthesize(&TypeRequest::new("Radius", TypeRef::Builtin(BuiltinType::Float32)))
        .unwrap();
    assert_eq!(handle.full_name(), "Fixtures_Radius_1.Shape_1");

    let found = host.find_type("Fixtures_Radius_1.Shape_1").unwrap();
    assert_eq!(found.id(), handle.type_def().id());
    assert!(host.find_type("Fixtures_Radius_1.Shape_2").is_none());
    assert_eq!(host.containers().len(), 1);
}

#[test]
fn test_generated_types_nest() {
    let host = host();
    let synth = Synthesizer::with_host(&host);
    let inner = synth.synthesize(&TypeRequest::new("Name", TypeRef::STRING)).unwrap();
    let outer = synth.synthesize(&TypeRequest::new("Child", inner.type_ref())).unwrap();

    let parent = outer.instantiate().unwrap();
    assert!(parent.get("Child").unwrap().is_null());

    let child = inner.instantiate().unwrap();
    child.set("Name", "leaf").unwrap();
    parent.set("Child", child.clone()).unwrap();

    let read = parent.get("Child").unwrap();
    let read = read.as_object().unwrap();
    assert!(read.ptr_eq(&child));
    assert_eq!(read.get("Name").unwrap(), Value::str("leaf"));

    // Instances of an unrelated generated type do not conform
    let stranger = synth.synthesize(&TypeRequest::new("Name", TypeRef::STRING)).unwrap();
    let err = parent.set("Child", stranger.instantiate().unwrap()).unwrap_err();
    assert!(matches!(err, MemberError::ValueTypeMismatch { .. }));
}

#[test]
fn test_invalid_property_names_are_rejected() {
    let host = host();
    let synth = Synthesizer::with_host(&host);
    for name in ["", "2fast", "with space", "dash-ed"] {
        let err = synth.synthesize(&TypeRequest::new(name, TypeRef::INT32)).unwrap_err();
        assert!(matches!(err, SynthError::InvalidRequest { .. }), "{name:?}: {err:?}");
    }
}
