//! Node update and delete semantics.

use weft::{GraphRequest, NodeId, NodeRequest, RelationChange, RelationRequest};

use crate::test_utils::{path_graph, props, service};

#[test]
fn update_replaces_whole_property_map() {
    let svc = service();
    let result = svc
        .create_graph_and_nodes(
            &GraphRequest::new("g"),
            &[NodeRequest::new("a")
                .with_property("name", "Alice")
                .with_property("dept", "cardiology")],
            &[],
        )
        .unwrap();
    let id = result.nodes[0].id;

    let updated = svc.update_node(&id, props(&[("name", "Bob")])).unwrap();
    assert_eq!(updated.properties, props(&[("name", "Bob")]));
    assert!(updated.properties.get("dept").is_none());
}

#[test]
fn update_preserves_identity_and_created_at() {
    let svc = service();
    let result = svc
        .create_graph_and_nodes(&GraphRequest::new("g"), &[NodeRequest::new("a")], &[])
        .unwrap();
    let original = &result.nodes[0];

    let updated = svc.update_node(&original.id, props(&[("k", "v")])).unwrap();
    assert_eq!(updated.id, original.id);
    assert_eq!(updated.created_at, original.created_at);
    assert!(updated.updated_at >= original.updated_at);
}

#[test]
fn update_with_reserved_key_fails() {
    let svc = service();
    let result = svc
        .create_graph_and_nodes(&GraphRequest::new("g"), &[NodeRequest::new("a")], &[])
        .unwrap();
    let err = svc
        .update_node(&result.nodes[0].id, props(&[("updated_at", "now")]))
        .unwrap_err();
    assert_eq!(err.code(), "RESERVED_PROPERTY_KEY");
}

#[test]
fn update_missing_node_fails() {
    let svc = service();
    let err = svc.update_node(&NodeId::new(), props(&[])).unwrap_err();
    assert_eq!(err.code(), "NODE_NOT_FOUND");
}

#[test]
fn delete_node_detaches_relations() {
    let svc = service();
    let (g, ids) = path_graph(&svc);

    // Removing b splits the path; a is alone, c-d survives.
    svc.delete_nodes(&g, &[ids[1]]).unwrap();

    assert_eq!(svc.get_node(&ids[1]).unwrap_err().code(), "NODE_NOT_FOUND");
    let from_a = svc.expand(&g, &ids[0], -1).unwrap();
    assert_eq!(from_a.node_count(), 1);
    assert_eq!(from_a.relation_count(), 0);

    svc.cache().clear();
    let from_c = svc.expand(&g, &ids[2], -1).unwrap();
    assert_eq!(from_c.node_count(), 2);
    assert_eq!(from_c.relation_count(), 1);
}

#[test]
fn delete_batch_is_atomic_on_wrong_graph() {
    let svc = service();
    let (g1, ids1) = path_graph(&svc);
    let foreign = svc
        .create_graph_and_nodes(&GraphRequest::new("other"), &[NodeRequest::new("x")], &[])
        .unwrap()
        .nodes[0]
        .id;

    let len_before = svc.store().len();
    let err = svc.delete_nodes(&g1, &[ids1[0], foreign]).unwrap_err();
    assert_eq!(err.code(), "NODE_BOUND_TO_ANOTHER_GRAPH");

    // Nothing was deleted, including the valid first target.
    assert_eq!(svc.store().len(), len_before);
    assert!(svc.get_node(&ids1[0]).is_ok());
    assert!(svc.get_node(&foreign).is_ok());
}

#[test]
fn delete_missing_node_aborts_batch() {
    let svc = service();
    let (g, ids) = path_graph(&svc);
    let err = svc.delete_nodes(&g, &[ids[0], NodeId::new()]).unwrap_err();
    assert_eq!(err.code(), "NODE_NOT_FOUND");
    assert!(svc.get_node(&ids[0]).is_ok());
}

#[test]
fn rename_then_delete_relations_in_one_batch() {
    let svc = service();
    let result = svc
        .create_graph_and_nodes(
            &GraphRequest::new("g"),
            &[NodeRequest::new("a"), NodeRequest::new("b")],
            &[
                RelationRequest::new("a", "b", "old"),
                RelationRequest::new("b", "a", "gone"),
            ],
        )
        .unwrap();
    let g = result.graph.id;
    let to_rename = result.relations.iter().find(|r| r.name == "old").unwrap().id;
    let to_delete = result.relations.iter().find(|r| r.name == "gone").unwrap().id;

    let renamed = svc
        .update_or_delete_relations(
            &g,
            &[
                RelationChange::Rename {
                    relation: to_rename,
                    name: "new".into(),
                },
                RelationChange::Delete {
                    relation: to_delete,
                },
            ],
        )
        .unwrap();
    assert_eq!(renamed.len(), 1);
    assert_eq!(renamed[0].name, "new");

    let view = svc.expand(&g, &result.nodes[0].id, -1).unwrap();
    assert_eq!(view.relation_count(), 1);
    assert_eq!(view.relations[0].name, "new");
}

#[test]
fn graph_lifecycle_listing() {
    let svc = service();
    let g1 = svc.create_graph(&GraphRequest::new("first")).unwrap();
    let g2 = svc.create_graph(&GraphRequest::new("second")).unwrap();
    assert_eq!(svc.list_graphs().unwrap().len(), 2);

    svc.delete_graph(&g1.id).unwrap();
    let remaining = svc.list_graphs().unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, g2.id);
}

#[test]
fn mutations_touch_graph_updated_at() {
    let svc = service();
    let g = svc.create_graph(&GraphRequest::new("g")).unwrap();

    svc.create_and_bind_nodes(&g.id, &[NodeRequest::new("a")], &[])
        .unwrap();
    let after = svc.get_graph(&g.id).unwrap();
    assert_eq!(after.created_at, g.created_at);
    assert!(after.updated_at >= g.updated_at);
}
