//! Integration tests for the graph model.
//!
//! Tests cover:
//! - Entry-node discovery over the exec topology
//! - Link navigation from both endpoints
//! - JSON documents surviving a serialize/parse cycle
//! - Pin classification on `NodeView`

use bpflow_core::{Graph, GraphBuilder, NodeId, NodeKind, PinCategory, PinType};

// ---------------------------------------------------------------------------
// Test helpers
// ---------------------------------------------------------------------------

struct Sample {
    graph: Graph,
    event: NodeId,
    loose: NodeId,
    call: NodeId,
    getter: NodeId,
}

/// An event feeding a call, a getter feeding the call, and a loose chain
/// that starts at a plain call with no incoming exec link.
fn sample() -> Sample {
    let mut b = GraphBuilder::new("/Game/MyAsset:EventGraph", "EventGraph", "MyAsset");
    let event = b.node(NodeKind::Event, "Event BeginPlay");
    b.prop(&event, "EventName", "ReceiveBeginPlay");
    let ev_then = b.exec_out(&event, "then");

    let call = b.node(NodeKind::CallFunction, "SetHealth");
    b.prop(&call, "FunctionName", "SetHealth");
    let call_exec = b.exec_in(&call, "execute");
    b.exec_out(&call, "then");
    let amount = b.input(&call, "Amount", PinType::new(PinCategory::Float));

    let getter = b.node(NodeKind::VariableGet, "MaxHealth");
    let max = b.output(&getter, "MaxHealth", PinType::new(PinCategory::Float));

    let loose = b.node(NodeKind::CallFunction, "Reset");
    b.exec_in(&loose, "execute");
    let loose_then = b.exec_out(&loose, "then");
    let tail = b.node(NodeKind::CallFunction, "Log");
    let tail_exec = b.exec_in(&tail, "execute");

    b.link(&ev_then, &call_exec)
        .link(&max, &amount)
        .link(&loose_then, &tail_exec);
    Sample {
        graph: b.build().unwrap(),
        event,
        loose,
        call,
        getter,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn entry_nodes_are_events_and_chain_heads() {
    let s = sample();
    assert_eq!(s.graph.entry_nodes(), vec![s.event.clone(), s.loose.clone()]);
}

#[test]
fn links_are_navigable_from_both_ends() {
    let s = sample();
    let call = s.graph.view(&s.call).unwrap();
    let amount = call.input("Amount").unwrap();
    let source = s.graph.source_of(amount).unwrap();
    assert_eq!(s.graph.owner_of(source).unwrap().id(), &s.getter);

    let targets: Vec<_> = s.graph.targets_of(source).map(|p| p.name.clone()).collect();
    assert_eq!(targets, vec!["Amount".to_string()]);
}

#[test]
fn json_documents_round_trip() {
    let s = sample();
    let json = s.graph.to_json().unwrap();
    let parsed = Graph::from_json(&json).unwrap();
    assert_eq!(parsed.to_document(), s.graph.to_document());
    assert_eq!(parsed.entry_nodes(), s.graph.entry_nodes());
}

#[test]
fn views_classify_pins() {
    let s = sample();
    let getter = s.graph.view(&s.getter).unwrap();
    assert!(getter.is_pure());
    assert_eq!(getter.data_outputs().count(), 1);

    let call = s.graph.view(&s.call).unwrap();
    assert!(!call.is_pure());
    assert_eq!(call.exec_inputs().count(), 1);
    assert_eq!(call.data_inputs().len(), 1);
    assert_eq!(call.property("FunctionName"), Some("SetHealth"));
    assert!(!call.flag("IsLatent"));
}
