//! End-to-end traversal scenarios: cycles, depth budgets, containment, concurrency

use std::collections::BTreeMap;
use std::sync::Arc;

use graph_snapshot::DepthConfig;
use graph_snapshot::DepthLevel;
use graph_snapshot::Diagnostic;
use graph_snapshot::DynamicObject;
use graph_snapshot::Error;
use graph_snapshot::GraphValue;
use graph_snapshot::HandlerFn;
use graph_snapshot::HandlerRegistry;
use graph_snapshot::Marker;
use graph_snapshot::ObjectList;
use graph_snapshot::ObjectRef;
use graph_snapshot::SerializeOptions;
use graph_snapshot::Severity;
use graph_snapshot::Slot;
use graph_snapshot::Snapshotter;
use graph_snapshot::TypeInfo;
use graph_snapshot::Vec3;
use graph_snapshot::Walker;
use graph_snapshot::serialize;
use graph_snapshot::to_json_value;
use serde_json::Value;
use serde_json::json;

fn node(type_name: &str) -> ObjectRef {
    ObjectRef::new(DynamicObject::new(
        TypeInfo::builder(type_name)
            .public("name")
            .public("next")
            .private("secret")
            .build(),
    ))
}

fn set(object: &ObjectRef, field: &str, value: impl Into<Slot>) {
    let done = object
        .downcast_ref::<DynamicObject>()
        .map(|dynamic| dynamic.set(field, value).is_ok());
    assert_eq!(done, Some(true), "failed to set {field}");
}

fn named(type_name: &str, name: &str) -> ObjectRef {
    let object = node(type_name);
    set(&object, "name", name);
    set(&object, "secret", format!("{name}-secret"));
    object
}

/// A chain of `length` nodes linked through `next`
fn chain(length: usize) -> ObjectRef {
    let root = named("Node", "n0");
    let mut tail = root.clone();
    for index in 1..length {
        let next = named("Node", &format!("n{index}"));
        set(&tail, "next", next.clone());
        tail = next;
    }
    root
}

fn snapshotter() -> Snapshotter {
    Snapshotter::new(
        Arc::new(HandlerRegistry::with_defaults()),
        DepthConfig::with_defaults(),
    )
}

/// Scalar leaves and array lengths by path, skipping markers
#[derive(Default)]
struct Flattened {
    leaves: BTreeMap<String, Value>,
    arrays: BTreeMap<String, usize>,
}

fn flatten(value: &Value, path: &str, out: &mut Flattened) {
    match value {
        Value::Object(map) if map.contains_key("__marker") => {},
        Value::Object(map) => {
            for (key, child) in map {
                flatten(child, &format!("{path}.{key}"), out);
            }
        },
        Value::Array(items) => {
            out.arrays.insert(path.to_string(), items.len());
            for (index, child) in items.iter().enumerate() {
                flatten(child, &format!("{path}[{index}]"), out);
            }
        },
        scalar => {
            out.leaves.insert(path.to_string(), scalar.clone());
        },
    }
}

#[test]
fn test_three_node_cycle_marks_back_edge() {
    let a = named("Node", "A");
    let b = named("Node", "B");
    let c = named("Node", "C");
    set(&a, "next", b.clone());
    set(&b, "next", c.clone());
    set(&c, "next", a.clone());

    let registry = HandlerRegistry::with_defaults();
    let snapshot = serialize(&Slot::Object(a), DepthLevel::Deep, &registry);

    assert_eq!(
        to_json_value(&snapshot.value),
        json!({
            "name": "A",
            "next": {
                "name": "B",
                "next": {
                    "name": "C",
                    "next": {"__marker": "cycle", "type": "Node", "ref": "$"},
                    "secret": "C-secret"
                },
                "secret": "B-secret"
            },
            "secret": "A-secret"
        })
    );
    assert!(snapshot.diagnostics.is_empty());
}

#[test]
fn test_cycle_reference_names_the_ancestor_path() {
    let a = named("Node", "A");
    let b = named("Node", "B");
    let c = named("Node", "C");
    set(&a, "next", b.clone());
    set(&b, "next", c.clone());
    set(&c, "next", b);

    let registry = HandlerRegistry::with_defaults();
    let snapshot = serialize(&Slot::Object(a), DepthLevel::Standard, &registry);
    let markers = snapshot.value.markers();

    assert_eq!(markers.len(), 1);
    assert_eq!(markers[0].0, "$.next.next.next");
    assert_eq!(
        markers[0].1,
        &Marker::Cycle {
            type_name: "Node".into(),
            reference: "$.next".to_string(),
        }
    );
}

#[test]
fn test_fifty_levels_with_budget_ten_truncate_once() {
    let registry = HandlerRegistry::with_defaults();
    let snapshot = serialize(
        &Slot::Object(chain(50)),
        SerializeOptions::new(DepthLevel::Full).with_max_depth(10),
        &registry,
    );

    let markers = snapshot.value.markers();
    assert_eq!(markers.len(), 1);
    assert_eq!(markers[0].0, format!("${}", ".next".repeat(10)));
    assert_eq!(
        markers[0].1,
        &Marker::Truncated {
            type_name: "Node".into(),
        }
    );
    // Ten expanded objects, each one mapping level deep
    assert_eq!(snapshot.value.nesting_depth(), 10);
}

#[test]
fn test_acyclic_graph_within_budget_is_not_truncated() {
    let registry = HandlerRegistry::with_defaults();
    for level in [DepthLevel::Basic, DepthLevel::Standard, DepthLevel::Deep] {
        let depth = level.policy().max_depth;
        let snapshot = serialize(&Slot::Object(chain(depth)), level, &registry);
        assert!(snapshot.value.markers().is_empty(), "{level} truncated");
    }
}

#[test]
fn test_null_root_for_manage_scene() {
    let encoded = snapshotter().serialize_for_operation(&Slot::Null, "manage_scene", true);
    let encoded = encoded.map(|e| (e.json, e.diagnostics.len())).ok();
    assert_eq!(encoded, Some(("null".to_string(), 0)));
}

#[test]
fn test_serialization_is_idempotent() {
    let a = named("Node", "A");
    let b = named("Node", "B");
    set(&a, "next", b.clone());
    set(&b, "next", a.clone());

    let snapshotter = snapshotter();
    let root = Slot::Object(a);
    let first = snapshotter
        .serialize_for_operation(&root, "manage_scene", true)
        .map(|e| e.json)
        .ok();
    let second = snapshotter
        .serialize_for_operation(&root, "manage_scene", true)
        .map(|e| e.json)
        .ok();

    assert!(first.is_some());
    assert_eq!(first, second);
}

#[test]
fn test_higher_levels_never_carry_less() {
    let registry = HandlerRegistry::with_defaults();
    let inventory = ObjectRef::new(DynamicObject::new(
        TypeInfo::builder("Inventory")
            .public("head")
            .public("items")
            .build(),
    ));
    let items = (0..150_i64).map(Slot::from).collect();
    set(&inventory, "head", chain(12));
    set(&inventory, "items", ObjectRef::new(ObjectList::from_slots(items)));
    let root = Slot::Object(inventory);

    let levels = [
        DepthLevel::Basic,
        DepthLevel::Standard,
        DepthLevel::Deep,
        DepthLevel::Full,
    ];
    let collected: Vec<(Flattened, Vec<Diagnostic>)> = levels
        .iter()
        .map(|level| {
            let mut out = Flattened::default();
            let snapshot = serialize(&root, *level, &registry);
            flatten(&to_json_value(&snapshot.value), "$", &mut out);
            (out, snapshot.diagnostics)
        })
        .collect();

    for pair in collected.windows(2) {
        let (lower, _) = &pair[0];
        let (higher, higher_diagnostics) = &pair[1];
        for (path, value) in &lower.leaves {
            if higher.leaves.get(path) == Some(value) {
                continue;
            }
            // A collection summarized below is expanded above
            let collection = path.rsplit_once('.').map(|(parent, _)| parent).unwrap_or_default();
            let expanded = higher.arrays.get(collection).copied();
            assert!(expanded.is_some(), "lost {path}");
            if path.ends_with(".count") {
                let count = value.as_u64().and_then(|count| usize::try_from(count).ok());
                let capped_with_total = higher_diagnostics.iter().any(|diagnostic| {
                    diagnostic.object_path == collection
                        && diagnostic.message.ends_with(&format!("of {value} elements"))
                });
                assert!(
                    expanded == count || capped_with_total,
                    "{collection} lost its element count"
                );
            }
        }
        for (path, length) in &lower.arrays {
            assert!(higher.arrays.get(path) >= Some(length), "{path} shrank");
        }
    }
}

#[test]
fn test_one_failing_handler_degrades_locally() {
    let registry = HandlerRegistry::with_defaults();
    registry.register(
        "Renderer",
        HandlerFn::new(
            "renderer",
            |_: &ObjectRef, _: &mut Walker| -> graph_snapshot::Result<GraphValue> {
                Err(Error::handler_failed("renderer", "material destroyed").into())
            },
        ),
    );

    let object = ObjectRef::new(DynamicObject::new(
        TypeInfo::builder("GameObject")
            .public("name")
            .public("renderer")
            .public("position")
            .build(),
    ));
    set(&object, "name", "Player");
    set(
        &object,
        "renderer",
        ObjectRef::new(DynamicObject::new(TypeInfo::opaque("Renderer"))),
    );
    set(&object, "position", ObjectRef::new(Vec3::new(1.0, 2.0, 3.0)));

    let snapshot = serialize(&Slot::Object(object), DepthLevel::Standard, &registry);

    assert_eq!(
        to_json_value(&snapshot.value),
        json!({
            "name": "Player",
            "renderer": {
                "__marker": "error",
                "message": "Handler `renderer` failed: material destroyed"
            },
            "position": {"x": 1.0, "y": 2.0, "z": 3.0}
        })
    );
    assert_eq!(snapshot.diagnostics.len(), 1);
    assert_eq!(snapshot.diagnostics[0].severity, Severity::Error);
    assert_eq!(snapshot.diagnostics[0].object_path, "$.renderer");
}

#[test]
fn test_unknown_operation_and_unknown_level() {
    let config = DepthConfig::from_json_str(
        r#"{
            "default_level": "deep",
            "overrides": {"manage_asset": "abyssal", "read_console": "basic"},
            "aliases": {"console": "read_console"}
        }"#,
    )
    .unwrap_or_default();

    assert_eq!(config.resolve("never_heard_of_it"), DepthLevel::Deep);
    assert_eq!(config.resolve("manage_asset"), DepthLevel::Standard);
    assert_eq!(config.resolve("CONSOLE"), DepthLevel::Basic);
}

#[test]
fn test_shared_sibling_reference_is_not_a_cycle() {
    let shared = named("Mesh", "quad");
    let parent = ObjectRef::new(DynamicObject::new(
        TypeInfo::builder("Pair")
            .public("left")
            .public("right")
            .build(),
    ));
    set(&parent, "left", shared.clone());
    set(&parent, "right", shared);

    let registry = HandlerRegistry::with_defaults();
    let snapshot = serialize(&Slot::Object(parent), DepthLevel::Standard, &registry);

    assert!(snapshot.value.markers().is_empty());
    assert_eq!(snapshot.value.get("left"), snapshot.value.get("right"));
    assert_eq!(
        to_json_value(&snapshot.value)["left"],
        json!({"name": "quad", "next": null})
    );
}

#[test]
fn test_list_containing_itself_terminates() {
    let list = ObjectRef::new(ObjectList::new());
    let pushed = list
        .downcast_ref::<ObjectList>()
        .map(|inner| inner.push(1_i32).is_ok() && inner.push(list.clone()).is_ok());
    assert_eq!(pushed, Some(true));

    let registry = HandlerRegistry::with_defaults();
    let snapshot = serialize(&Slot::Object(list), DepthLevel::Full, &registry);
    assert_eq!(
        to_json_value(&snapshot.value),
        json!([1, {"__marker": "cycle", "type": "List", "ref": "$"}])
    );
}

#[test]
fn test_batch_matches_sequential_results() {
    let snapshotter = snapshotter();
    let roots: Vec<Slot> = (0..8)
        .map(|index| {
            let a = named("Node", &format!("a{index}"));
            let b = named("Node", &format!("b{index}"));
            set(&a, "next", b.clone());
            if index % 2 == 0 {
                set(&b, "next", a.clone());
            }
            Slot::Object(a)
        })
        .collect();

    let batch: Vec<Option<String>> = snapshotter
        .serialize_batch(&roots, "manage_gameobject", false)
        .into_iter()
        .map(|result| result.map(|e| e.json).ok())
        .collect();
    let sequential: Vec<Option<String>> = roots
        .iter()
        .map(|root| {
            snapshotter
                .serialize_for_operation(root, "manage_gameobject", false)
                .map(|e| e.json)
                .ok()
        })
        .collect();

    assert_eq!(batch.len(), 8);
    assert!(batch.iter().all(Option::is_some));
    assert_eq!(batch, sequential);
}

#[test]
fn test_handler_registered_mid_flight_applies_to_next_call() {
    let registry = HandlerRegistry::with_defaults();
    let root = Slot::Object(named("Node", "solo"));

    let before = serialize(&root, DepthLevel::Standard, &registry);
    registry.register(
        "Node",
        |object: &ObjectRef, _: &mut Walker| -> graph_snapshot::Result<GraphValue> {
            Ok(GraphValue::String(format!("<{}>", object.type_name())))
        },
    );
    let after = serialize(&root, DepthLevel::Standard, &registry);

    assert!(matches!(before.value, GraphValue::Mapping(_)));
    assert_eq!(after.value, GraphValue::String("<Node>".to_string()));
}
