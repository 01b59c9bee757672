//! Transaction boundary semantics at the service level.

use chrono::Utc;
use weft::{GraphRequest, NodeRequest, RelationRequest, WeftError, WeftResult};

use crate::test_utils::service;

#[test]
fn commit_bumps_store_version_once_per_request() {
    let svc = service();
    let before = svc.store().version();
    svc.create_graph_and_nodes(
        &GraphRequest::new("g"),
        &[NodeRequest::new("a"), NodeRequest::new("b")],
        &[RelationRequest::new("a", "b", "e")],
    )
    .unwrap();
    assert_eq!(svc.store().version(), before + 1);
}

#[test]
fn failed_request_does_not_bump_version() {
    let svc = service();
    let g = svc.create_graph(&GraphRequest::new("g")).unwrap();
    let before = svc.store().version();

    svc.create_and_bind_nodes(&g.id, &[NodeRequest::new("a"), NodeRequest::new("a")], &[])
        .unwrap_err();
    assert_eq!(svc.store().version(), before);
}

#[test]
fn several_operations_compose_in_one_transaction() {
    let svc = service();
    let now = Utc::now();

    let (g, first, second) = svc
        .with_transaction(|tx| {
            let first = svc.create_graph_and_nodes_tx(
                tx,
                &GraphRequest::new("g"),
                &[NodeRequest::new("a")],
                &[],
                now,
            )?;
            let g = first.graph.id;
            let second = svc.create_and_bind_nodes_tx(
                tx,
                &g,
                &[NodeRequest::new("b")],
                &[RelationRequest::new(
                    first.nodes[0].id.to_string(),
                    "b",
                    "e",
                )],
                now,
            )?;
            Ok((g, first, second))
        })
        .unwrap();

    let view = svc.expand(&g, &first.nodes[0].id, -1).unwrap();
    assert_eq!(view.node_count(), 2);
    assert_eq!(view.relation_count(), 1);
    assert!(view.contains_node(&second.nodes[0].id));
}

#[test]
fn error_mid_transaction_rolls_back_everything() {
    let svc = service();
    let now = Utc::now();

    let err = svc
        .with_transaction(|tx| -> WeftResult<()> {
            svc.create_graph_and_nodes_tx(
                tx,
                &GraphRequest::new("g"),
                &[NodeRequest::new("a")],
                &[],
                now,
            )?;
            // Second batch targets a graph that does not exist.
            let missing = weft::GraphId::new();
            svc.create_and_bind_nodes_tx(tx, &missing, &[], &[], now)?;
            Ok(())
        })
        .unwrap_err();
    assert_eq!(err.code(), "GRAPH_NOT_FOUND");
    assert!(svc.list_graphs().unwrap().is_empty());
}

#[test]
fn finished_transaction_rejects_further_use() {
    let svc = service();
    let mut tx = svc.store().begin();
    tx.commit().unwrap();

    assert_eq!(tx.get("anything").unwrap_err(), WeftError::TransactionRequired);
    assert_eq!(
        tx.put("k", "v").unwrap_err(),
        WeftError::TransactionRequired
    );
    assert!(!tx.is_active());
}

#[test]
fn dropped_transaction_discards_buffered_work() {
    let svc = service();
    let now = Utc::now();
    {
        let mut tx = svc.store().begin();
        svc.create_graph_and_nodes_tx(
            &mut tx,
            &GraphRequest::new("never"),
            &[NodeRequest::new("a")],
            &[],
            now,
        )
        .unwrap();
        // Dropped without commit.
    }
    assert!(svc.list_graphs().unwrap().is_empty());
    assert!(svc.store().is_empty());
}

#[test]
fn uncommitted_writes_are_invisible_to_readers() {
    let svc = service();
    let now = Utc::now();
    let mut tx = svc.store().begin();
    svc.create_graph_and_nodes_tx(
        &mut tx,
        &GraphRequest::new("pending"),
        &[NodeRequest::new("a")],
        &[],
        now,
    )
    .unwrap();

    // A separate reader sees the committed state only.
    assert!(svc.list_graphs().unwrap().is_empty());

    tx.commit().unwrap();
    assert_eq!(svc.list_graphs().unwrap().len(), 1);
}
