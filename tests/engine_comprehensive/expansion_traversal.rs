//! K-degree expansion over the undirected adjacency.

use std::collections::BTreeSet;

use weft::{GraphRequest, GraphResult, NodeId, NodeRequest, RelationRequest};

use crate::test_utils::{by_tag, path_graph, service, tagged};

fn node_set(result: &GraphResult) -> BTreeSet<NodeId> {
    result.nodes.iter().map(|n| n.id).collect()
}

#[test]
fn degree_zero_returns_start_alone() {
    let svc = service();
    let (g, ids) = path_graph(&svc);
    let result = svc.expand(&g, &ids[1], 0).unwrap();
    assert_eq!(node_set(&result), BTreeSet::from([ids[1]]));
    assert!(result.relations.is_empty());
}

#[test]
fn degree_one_from_middle_reaches_both_neighbors() {
    let svc = service();
    let (g, ids) = path_graph(&svc);
    let result = svc.expand(&g, &ids[1], 1).unwrap();
    assert_eq!(node_set(&result), BTreeSet::from([ids[0], ids[1], ids[2]]));
    assert_eq!(result.relation_count(), 2);
}

#[test]
fn degree_two_from_middle_covers_path() {
    let svc = service();
    let (g, ids) = path_graph(&svc);
    let result = svc.expand(&g, &ids[1], 2).unwrap();
    assert_eq!(node_set(&result), BTreeSet::from_iter(ids));
    assert_eq!(result.relation_count(), 3);
}

#[test]
fn unbounded_equals_oversized_bound() {
    let svc = service();
    let (g, ids) = path_graph(&svc);
    let unbounded = svc.expand(&g, &ids[1], -1).unwrap();
    svc.cache().clear();
    let oversized = svc.expand(&g, &ids[1], 100).unwrap();
    assert_eq!(unbounded, oversized);
}

#[test]
fn node_set_is_monotone_in_degree() {
    let svc = service();
    let (g, ids) = path_graph(&svc);
    let mut previous = BTreeSet::new();
    for degree in 0..6 {
        svc.cache().clear();
        let current = node_set(&svc.expand(&g, &ids[0], degree).unwrap());
        assert!(previous.is_subset(&current), "degree {degree} lost nodes");
        previous = current;
    }
}

#[test]
fn relations_need_both_endpoints_in_the_set() {
    let svc = service();
    let (g, ids) = path_graph(&svc);
    let result = svc.expand(&g, &ids[0], 1).unwrap();
    assert_eq!(node_set(&result), BTreeSet::from([ids[0], ids[1]]));
    assert_eq!(result.relation_count(), 1);
}

#[test]
fn membership_relation_never_surfaces() {
    let svc = service();
    let (g, ids) = path_graph(&svc);
    let result = svc.expand(&g, &ids[0], -1).unwrap();
    assert!(result.relations.iter().all(|r| r.name != "contains"));
    assert_eq!(result.relation_count(), 3);
}

#[test]
fn disconnected_node_stays_out() {
    let svc = service();
    let (g, ids) = path_graph(&svc);
    let island = svc
        .create_and_bind_nodes(&g, &[NodeRequest::new("island")], &[])
        .unwrap()
        .nodes[0]
        .id;

    let result = svc.expand(&g, &ids[0], -1).unwrap();
    assert!(!result.contains_node(&island));
    // From the island, nothing else is reachable. The cache keys on
    // graph and degree, so a different start needs a cold cache.
    svc.cache().clear();
    let from_island = svc.expand(&g, &island, -1).unwrap();
    assert_eq!(node_set(&from_island), BTreeSet::from([island]));
}

#[test]
fn direction_is_ignored_for_reachability() {
    let svc = service();
    // Edges point inward: a -> hub <- b.
    let result = svc
        .create_graph_and_nodes(
            &GraphRequest::new("g"),
            &[tagged("hub"), tagged("a"), tagged("b")],
            &[
                RelationRequest::new("a", "hub", "in"),
                RelationRequest::new("b", "hub", "in"),
            ],
        )
        .unwrap();
    let g = result.graph.id;
    let a = by_tag(&result, "a");

    let view = svc.expand(&g, &a, 2).unwrap();
    assert_eq!(view.node_count(), 3);
}

#[test]
fn cycle_saturates() {
    let svc = service();
    let result = svc
        .create_graph_and_nodes(
            &GraphRequest::new("ring"),
            &[tagged("a"), tagged("b"), tagged("c")],
            &[
                RelationRequest::new("a", "b", "e"),
                RelationRequest::new("b", "c", "e"),
                RelationRequest::new("c", "a", "e"),
            ],
        )
        .unwrap();
    let view = svc
        .expand(&result.graph.id, &by_tag(&result, "a"), -1)
        .unwrap();
    assert_eq!(view.node_count(), 3);
    assert_eq!(view.relation_count(), 3);
}

#[test]
fn expand_missing_graph_fails() {
    let svc = service();
    let err = svc
        .expand(&weft::GraphId::new(), &NodeId::new(), 1)
        .unwrap_err();
    assert_eq!(err.code(), "GRAPH_NOT_FOUND");
}

#[test]
fn expand_from_missing_node_fails() {
    let svc = service();
    let (g, _) = path_graph(&svc);
    let err = svc.expand(&g, &NodeId::new(), 1).unwrap_err();
    assert_eq!(err.code(), "NODE_NOT_FOUND");
}

#[test]
fn expand_from_foreign_node_fails() {
    let svc = service();
    let (g, _) = path_graph(&svc);
    let foreign = svc
        .create_graph_and_nodes(&GraphRequest::new("other"), &[NodeRequest::new("x")], &[])
        .unwrap()
        .nodes[0]
        .id;
    let err = svc.expand(&g, &foreign, 1).unwrap_err();
    assert_eq!(err.code(), "NODE_BOUND_TO_ANOTHER_GRAPH");
}

#[test]
fn equal_frontiers_compare_equal() {
    let svc = service();
    let (g, ids) = path_graph(&svc);
    let first = svc.expand(&g, &ids[1], 2).unwrap();
    svc.cache().clear();
    let second = svc.expand(&g, &ids[1], 2).unwrap();
    assert_eq!(first, second);
}
