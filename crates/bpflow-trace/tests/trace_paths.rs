//! End-to-end tests for execution-path tracing.
//!
//! Each test builds a small graph with `GraphBuilder`, serves it through an
//! `InMemoryProvider`, traces it with `Tracer` or `DocumentBuilder`, and
//! checks the rendered plain-text lines.
//!
//! Tests cover:
//! - Linear chains and repeated calls into one user function
//! - Branch layout with friendly pin labels
//! - Loop macros: forced branches and re-entry markers
//! - Data cycles reported in-band
//! - Execution cycles and previously described nodes
//! - Interface calls ending the branch
//! - Collapsed graphs traced in place
//! - Argument elision of trivial defaults
//! - Data resolution through user macros, expanded and symbolic
//! - Document assembly, definition sections and renderer modes
//! - Determinism across independent runs

use bpflow_core::{Graph, GraphBuilder, NodeId, NodeKind, PinCategory, PinId, PinType};
use bpflow_store::InMemoryProvider;
use bpflow_trace::{
    canonical_anchor, DocumentBuilder, ExecutionTrace, HtmlRenderer, MarkdownRenderer,
    PlainRenderer, SubgraphKind, TraceConfig, Tracer,
};

const LOC: &str = "/Game/MyAsset:EventGraph";
const SYSTEM: &str = "/Script/Engine.KismetSystemLibrary";
const STRINGS: &str = "/Script/Engine.KismetStringLibrary";
const MATH: &str = "/Script/Engine.KismetMathLibrary";
const FOR_EACH: &str = "/Engine/EditorBlueprintResources/StandardMacros.StandardMacros:ForEachLoop";

// ---------------------------------------------------------------------------
// Test helpers
// ---------------------------------------------------------------------------

/// An executable node with one exec input and one `then` output.
struct Step {
    exec: PinId,
    then: PinId,
}

fn event_graph() -> GraphBuilder {
    GraphBuilder::new(LOC, "EventGraph", "MyAsset")
}

/// `Event BeginPlay` with a `then` output.
fn begin_play(b: &mut GraphBuilder) -> (NodeId, PinId) {
    let ev = b.node(NodeKind::Event, "Event BeginPlay");
    b.prop(&ev, "EventName", "ReceiveBeginPlay");
    let then = b.exec_out(&ev, "then");
    (ev, then)
}

fn print_string(b: &mut GraphBuilder, text: &str) -> (Step, PinId) {
    let node = b.node(NodeKind::CallFunction, "Print String");
    b.prop(&node, "FunctionName", "PrintString")
        .prop(&node, "FunctionOwnerClass", SYSTEM);
    let exec = b.exec_in(&node, "execute");
    let then = b.exec_out(&node, "then");
    let input = b.input(&node, "InString", PinType::new(PinCategory::String));
    b.value(&input, text);
    (Step { exec, then }, input)
}

/// A call into a function of this blueprint.
fn user_call(b: &mut GraphBuilder, func: &str) -> Step {
    let node = b.node(NodeKind::CallFunction, func);
    b.prop(&node, "FunctionName", func)
        .prop(&node, "FunctionOwnerClass", "/Game/MyAsset.MyAsset_C");
    let exec = b.exec_in(&node, "execute");
    let then = b.exec_out(&node, "then");
    Step { exec, then }
}

fn getter(b: &mut GraphBuilder, name: &str, ty: PinType) -> PinId {
    let node = b.node(NodeKind::VariableGet, name);
    b.prop(&node, "VariableName", name);
    b.output(&node, name, ty)
}

fn trace(graph: Graph, start: &NodeId, config: TraceConfig) -> ExecutionTrace {
    let provider = InMemoryProvider::new().with_graph(graph);
    let mut tracer = Tracer::new(&provider, config);
    tracer.trace(LOC, start).unwrap()
}

fn plain(trace: &ExecutionTrace) -> String {
    trace.render(&PlainRenderer)
}

// ---------------------------------------------------------------------------
// Linear chains and cross-references
// ---------------------------------------------------------------------------

#[test]
fn repeated_calls_share_one_definition() {
    let mut b = event_graph();
    let (ev, then) = begin_play(&mut b);
    let first = user_call(&mut b, "Foo");
    let second = user_call(&mut b, "Foo");
    b.link(&then, &first.exec).link(&first.then, &second.exec);
    let graph = b.build().unwrap();

    let provider = InMemoryProvider::new().with_graph(graph);
    let mut tracer = Tracer::new(&provider, TraceConfig::default());
    let trace = tracer.trace(LOC, &ev).unwrap();

    assert_eq!(
        plain(&trace),
        "* Event BeginPlay\n* Foo()\n* Foo()\n* [Path ends]\n"
    );
    let anchor = canonical_anchor("/Game/MyAsset:Foo", "MyAsset.Foo", SubgraphKind::Function);
    assert_eq!(anchor, "game-myasset-foo");
    assert_eq!(trace.lines[1].content.anchors(), vec![anchor.as_str()]);
    assert_eq!(trace.lines[2].content.anchors(), vec![anchor.as_str()]);
    assert_eq!(trace.definitions.len(), 1);
    assert_eq!(trace.definitions[0].anchor, anchor);
    assert_eq!(tracer.state().pending_definitions(), 1);
}

#[test]
fn branches_use_friendly_labels() {
    let mut b = event_graph();
    let (ev, then) = begin_play(&mut b);
    let alive = getter(&mut b, "bAlive", PinType::new(PinCategory::Bool));
    let branch = b.node(NodeKind::IfThenElse, "Branch");
    let exec = b.exec_in(&branch, "execute");
    let yes = b.exec_out(&branch, "then");
    let no = b.exec_out(&branch, "else");
    let cond = b.input(&branch, "Condition", PinType::new(PinCategory::Bool));
    b.friendly_name(&branch, "then", "True")
        .friendly_name(&branch, "else", "False");
    let (on_true, _) = print_string(&mut b, "Alive");
    let (on_false, _) = print_string(&mut b, "Dead");
    b.link(&then, &exec)
        .link(&alive, &cond)
        .link(&no, &on_false.exec)
        .link(&yes, &on_true.exec);
    let graph = b.build().unwrap();

    let out = plain(&trace(graph, &ev, TraceConfig::default()));
    assert_eq!(
        out,
        "* Event BeginPlay\n\
         * If (bAlive)\n\
         |-- True:\n\
         |   * PrintString(InString=\"Alive\")\n\
         |   * [Path ends]\n\
         L-- False:\n\
         \x20   * PrintString(InString=\"Dead\")\n\
         \x20   * [Path ends]\n"
    );
}

#[test]
fn for_each_forces_branches_and_marks_reentry() {
    let mut b = event_graph();
    let (ev, then) = begin_play(&mut b);
    let numbers = getter(
        &mut b,
        "Numbers",
        PinType::new(PinCategory::Int).array_of(),
    );

    let each = b.node(NodeKind::MacroInstance, "ForEachLoop");
    b.prop(&each, "MacroGraph", FOR_EACH);
    let each_exec = b.exec_in(&each, "Exec");
    let array = b.input(&each, "Array", PinType::new(PinCategory::Int).array_of());
    let body = b.exec_out(&each, "LoopBody");
    let element = b.output(&each, "Array Element", PinType::new(PinCategory::Int));
    b.output(&each, "Array Index", PinType::new(PinCategory::Int));
    let completed = b.exec_out(&each, "Completed");
    b.friendly_name(&each, "LoopBody", "Loop Body");

    let conv = b.node(NodeKind::CallFunction, "ToString (Integer)");
    b.prop(&conv, "FunctionName", "Conv_IntToString")
        .prop(&conv, "FunctionOwnerClass", STRINGS);
    let conv_in = b.input(&conv, "InInt", PinType::new(PinCategory::Int));
    let conv_out = b.output(&conv, "ReturnValue", PinType::new(PinCategory::String));

    let (print_item, item_text) = print_string(&mut b, "");
    let (done, _) = print_string(&mut b, "Done");

    b.link(&then, &each_exec)
        .link(&numbers, &array)
        .link(&body, &print_item.exec)
        .link(&element, &conv_in)
        .link(&conv_out, &item_text)
        .link(&print_item.then, &each_exec)
        .link(&completed, &done.exec);
    let graph = b.build().unwrap();

    let out = plain(&trace(graph, &ev, TraceConfig::default()));
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(
        lines,
        vec![
            "* Event BeginPlay",
            "* For Each in (Numbers) [Element: int, Index: int]",
            "|-- Loop Body:",
            "|   * PrintString(InString=ToString(Loop Element))",
            "|   * [Loops back to start of ForEachLoop -> Exec Pin]",
            "L-- Completed:",
            "    * PrintString(InString=\"Done\")",
            "    * [Path ends]",
        ]
    );
}

#[test]
fn loop_macro_without_outputs_ends_the_path() {
    let mut b = event_graph();
    let (ev, then) = begin_play(&mut b);
    let each = b.node(NodeKind::MacroInstance, "ForEachLoop");
    b.prop(&each, "MacroGraph", FOR_EACH);
    let each_exec = b.exec_in(&each, "Exec");
    b.input(&each, "Array", PinType::new(PinCategory::Int).array_of());
    b.exec_out(&each, "LoopBody");
    b.exec_out(&each, "Completed");
    b.link(&then, &each_exec);
    let graph = b.build().unwrap();

    let out = plain(&trace(graph, &ev, TraceConfig::default()));
    assert!(
        out.ends_with("* [Path ends after macro 'ForEachLoop' - no linked exec outputs]\n"),
        "{out}"
    );
}

// ---------------------------------------------------------------------------
// Cycles and repetition
// ---------------------------------------------------------------------------

#[test]
fn data_cycles_are_reported_in_line() {
    let mut b = event_graph();
    let (ev, then) = begin_play(&mut b);
    let float = || PinType::new(PinCategory::Float);

    let add = b.node(NodeKind::CallFunction, "Add");
    b.prop(&add, "FunctionName", "Add_DoubleDouble")
        .prop(&add, "FunctionOwnerClass", MATH);
    let add_a = b.input(&add, "A", float());
    let add_b = b.input(&add, "B", float());
    let add_out = b.output(&add, "ReturnValue", float());
    b.value(&add_b, "1");

    let neg = b.node(NodeKind::CallFunction, "Negate");
    b.prop(&neg, "FunctionName", "Negate_Double")
        .prop(&neg, "FunctionOwnerClass", MATH);
    let neg_in = b.input(&neg, "A", float());
    let neg_out = b.output(&neg, "ReturnValue", float());

    let set = b.node(NodeKind::VariableSet, "Health");
    b.prop(&set, "VariableName", "Health");
    let set_exec = b.exec_in(&set, "execute");
    b.exec_out(&set, "then");
    let health = b.input(&set, "Health", float());

    b.link(&then, &set_exec)
        .link(&add_out, &neg_in)
        .link(&neg_out, &add_a)
        .link(&add_out, &health);
    let graph = b.build().unwrap();

    let out = plain(&trace(graph, &ev, TraceConfig::default()));
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 3, "{out}");
    assert!(lines[1].starts_with("* Set Health = "), "{out}");
    assert!(lines[1].contains("[ERROR: cyclic data reference ("), "{out}");
    assert_eq!(lines[2], "* [Path ends]");
}

#[test]
fn execution_cycles_terminate() {
    let mut b = event_graph();
    let (ev, then) = begin_play(&mut b);
    let first = user_call(&mut b, "StepA");
    let second = user_call(&mut b, "StepB");
    b.link(&then, &first.exec)
        .link(&first.then, &second.exec)
        .link(&second.then, &first.exec);
    let graph = b.build().unwrap();

    let out = plain(&trace(graph, &ev, TraceConfig::default()));
    assert_eq!(
        out,
        "* Event BeginPlay\n* StepA()\n* StepB()\n* [Execution loop back to: StepA]\n"
    );
}

#[test]
fn nodes_are_described_once_per_trace() {
    let mut b = event_graph();
    let (ev, then) = begin_play(&mut b);
    let seq = b.node(NodeKind::ExecutionSequence, "Sequence");
    let seq_exec = b.exec_in(&seq, "execute");
    let then_1 = b.exec_out(&seq, "then_1");
    let then_0 = b.exec_out(&seq, "then_0");
    b.friendly_name(&seq, "then_0", "Then 0")
        .friendly_name(&seq, "then_1", "Then 1");
    let (shared, _) = print_string(&mut b, "Shared");
    b.link(&then, &seq_exec)
        .link(&then_0, &shared.exec)
        .link(&then_1, &shared.exec);
    let graph = b.build().unwrap();

    let out = plain(&trace(graph, &ev, TraceConfig::default()));
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(
        lines,
        vec![
            "* Event BeginPlay",
            "* Sequence",
            "|-- Then 0:",
            "|   * PrintString(InString=\"Shared\")",
            "|   * [Path ends]",
            "L-- Then 1:",
            "    * [Continue execution at: PrintString(InString=\"Shared\") → Previously detailed]",
        ]
    );
}

#[test]
fn tracing_is_deterministic() {
    let build = || {
        let mut b = event_graph();
        let (ev, then) = begin_play(&mut b);
        let foo = user_call(&mut b, "Foo");
        let (print, _) = print_string(&mut b, "Hi");
        b.link(&then, &foo.exec).link(&foo.then, &print.exec);
        (b.build().unwrap(), ev)
    };
    let (g1, ev1) = build();
    let (g2, ev2) = build();
    let a = trace(g1, &ev1, TraceConfig::default());
    let b = trace(g2, &ev2, TraceConfig::default());
    assert_eq!(plain(&a), plain(&b));
    assert_eq!(a.definitions, b.definitions);
}

// ---------------------------------------------------------------------------
// Sub-graphs
// ---------------------------------------------------------------------------

#[test]
fn interface_calls_end_the_branch() {
    let mut b = event_graph();
    let (ev, then) = begin_play(&mut b);
    let door = getter(
        &mut b,
        "Door",
        PinType::with_object(PinCategory::Object, "/Game/BP_Door.BP_Door_C"),
    );
    let msg = b.node(NodeKind::Message, "Use");
    b.prop(&msg, "FunctionName", "Use")
        .prop(&msg, "InterfaceName", "/Game/BPI_Use.BPI_Use_C");
    let msg_exec = b.exec_in(&msg, "execute");
    let msg_then = b.exec_out(&msg, "then");
    let target = b.input(
        &msg,
        "self",
        PinType::with_object(PinCategory::Object, "/Game/BPI_Use.BPI_Use_C"),
    );
    let (after, _) = print_string(&mut b, "After");
    b.link(&then, &msg_exec)
        .link(&door, &target)
        .link(&msg_then, &after.exec);
    let graph = b.build().unwrap();

    let trace = trace(graph, &ev, TraceConfig::default());
    let out = plain(&trace);
    assert_eq!(out, "* Event BeginPlay\n* Call Interface BPI_Use.Use() on Door\n");
    assert_eq!(trace.definitions.len(), 1);
    assert_eq!(trace.definitions[0].kind, SubgraphKind::Interface);
}

#[test]
fn collapsed_graphs_inline_when_enabled() {
    const SETUP: &str = "/Game/MyAsset:Setup";

    let mut b = event_graph();
    let (ev, then) = begin_play(&mut b);
    let composite = b.node(NodeKind::Composite, "Setup");
    b.prop(&composite, "BoundGraph", SETUP);
    let comp_exec = b.exec_in(&composite, "execute");
    let comp_then = b.exec_out(&composite, "then");
    let speed = b.input(&composite, "Speed", PinType::new(PinCategory::Float));
    b.value(&speed, "600.000000");
    let (ready, _) = print_string(&mut b, "Ready");
    b.link(&then, &comp_exec).link(&comp_then, &ready.exec);
    let root = b.build().unwrap();

    let mut s = GraphBuilder::new(SETUP, "Setup", "MyAsset");
    let entry = s.node(NodeKind::Tunnel, "Inputs");
    let entry_then = s.exec_out(&entry, "then");
    let entry_speed = s.output(&entry, "Speed", PinType::new(PinCategory::Float));
    let set = s.node(NodeKind::VariableSet, "MaxSpeed");
    s.prop(&set, "VariableName", "MaxSpeed");
    let set_exec = s.exec_in(&set, "execute");
    let set_then = s.exec_out(&set, "then");
    let max_speed = s.input(&set, "MaxSpeed", PinType::new(PinCategory::Float));
    let exit = s.node(NodeKind::Tunnel, "Outputs");
    let exit_exec = s.exec_in(&exit, "execute");
    s.link(&entry_then, &set_exec)
        .link(&entry_speed, &max_speed)
        .link(&set_then, &exit_exec);
    let setup = s.build().unwrap();

    let provider = InMemoryProvider::new().with_graph(root).with_graph(setup);
    let config = TraceConfig {
        inline_collapsed_graphs: true,
        ..TraceConfig::default()
    };
    let mut tracer = Tracer::new(&provider, config);
    let trace = tracer.trace(LOC, &ev).unwrap();
    let lines: Vec<String> = plain(&trace).lines().map(str::to_string).collect();
    assert_eq!(
        lines,
        vec![
            "* Event BeginPlay",
            "* Collapsed Graph: Setup",
            "    * Inputs: (Speed=600)",
            "    * Set MaxSpeed = 600",
            "* PrintString(InString=\"Ready\")",
            "* [Path ends]",
        ]
    );
    assert!(trace.definitions.is_empty());
    assert!(tracer.state().is_queued(&canonical_anchor(
        SETUP,
        "MyAsset.Setup",
        SubgraphKind::CollapsedGraph
    )));
}

#[test]
fn collapsed_graphs_link_by_default() {
    let mut b = event_graph();
    let (ev, then) = begin_play(&mut b);
    let composite = b.node(NodeKind::Composite, "Setup");
    b.prop(&composite, "BoundGraph", "/Game/MyAsset:Setup");
    let comp_exec = b.exec_in(&composite, "execute");
    b.exec_out(&composite, "then");
    b.link(&then, &comp_exec);
    let graph = b.build().unwrap();

    let trace = trace(graph, &ev, TraceConfig::default());
    assert_eq!(
        plain(&trace),
        "* Event BeginPlay\n* Collapsed Graph: Setup\n* [Path ends]\n"
    );
    assert_eq!(trace.definitions.len(), 1);
    assert_eq!(trace.definitions[0].kind, SubgraphKind::CollapsedGraph);
}

// ---------------------------------------------------------------------------
// Arguments
// ---------------------------------------------------------------------------

#[test]
fn trivial_vector_defaults_are_elided() {
    let vector = || PinType::with_object(PinCategory::Struct, "/Script/CoreUObject.Vector");
    let mut b = event_graph();
    let (ev, then) = begin_play(&mut b);
    let call = b.node(NodeKind::CallFunction, "Teleport");
    b.prop(&call, "FunctionName", "Teleport")
        .prop(&call, "FunctionOwnerClass", "/Script/Game.MoverLibrary");
    let exec = b.exec_in(&call, "execute");
    let offset = b.input(&call, "Offset", vector());
    let location = b.input(&call, "Location", vector());
    b.value(&offset, "(X=0.000000,Y=0.000000,Z=0.000000)")
        .value(&location, "(X=1.000000,Y=0,Z=0)");
    b.link(&then, &exec);
    let graph = b.build().unwrap();

    let out = plain(&trace(graph.clone(), &ev, TraceConfig::default()));
    assert_eq!(
        out.lines().nth(1),
        Some("* Teleport(Location=(X=1, Y=0, Z=0))")
    );

    let config = TraceConfig {
        show_all_arguments: true,
        ..TraceConfig::default()
    };
    let out = plain(&trace(graph, &ev, config));
    assert_eq!(
        out.lines().nth(1),
        Some("* Teleport(Offset=(X=0, Y=0, Z=0), Location=(X=1, Y=0, Z=0))")
    );
}

// ---------------------------------------------------------------------------
// User macros
// ---------------------------------------------------------------------------

const DOUBLE: &str = "/Game/Lib:Double";

/// Macro graph `Lib.Double`: `Out = In * 2`.
fn double_macro() -> Graph {
    let mut b = GraphBuilder::new(DOUBLE, "Double", "Lib");
    let entry = b.node(NodeKind::Tunnel, "Inputs");
    let input = b.output(&entry, "In", PinType::new(PinCategory::Float));

    let mul = b.node(NodeKind::CallFunction, "Multiply");
    b.prop(&mul, "FunctionName", "Multiply_DoubleDouble")
        .prop(&mul, "FunctionOwnerClass", MATH);
    let lhs = b.input(&mul, "A", PinType::new(PinCategory::Float));
    let rhs = b.input(&mul, "B", PinType::new(PinCategory::Float));
    let product = b.output(&mul, "ReturnValue", PinType::new(PinCategory::Float));
    b.value(&rhs, "2.0");

    let exit = b.node(NodeKind::Tunnel, "Outputs");
    let out = b.input(&exit, "Out", PinType::new(PinCategory::Float));
    b.link(&input, &lhs).link(&product, &out);
    b.build().unwrap()
}

/// `X` fed through two chained `Double` macro instances; returns the
/// provider and the second instance's `Out` pin.
fn chained_doubles() -> (InMemoryProvider, PinId) {
    let mut b = event_graph();
    let x = getter(&mut b, "X", PinType::new(PinCategory::Float));
    let mut source = x;
    for _ in 0..2 {
        let node = b.node(NodeKind::MacroInstance, "Double");
        b.prop(&node, "MacroGraph", DOUBLE);
        let input = b.input(&node, "In", PinType::new(PinCategory::Float));
        let out = b.output(&node, "Out", PinType::new(PinCategory::Float));
        b.link(&source, &input);
        source = out;
    }
    let provider = InMemoryProvider::new()
        .with_graph(b.build().unwrap())
        .with_graph(double_macro());
    (provider, source)
}

#[test]
fn macro_outputs_resolve_through_the_macro_graph() {
    let (provider, out) = chained_doubles();
    let mut tracer = Tracer::new(&provider, TraceConfig::default());
    let value = tracer.resolve(LOC, &out).unwrap();
    assert_eq!(value.to_styled().to_string(), "((X * 2) * 2)");
}

#[test]
fn symbolic_mode_keeps_macro_calls() {
    let (provider, out) = chained_doubles();
    let config = TraceConfig {
        symbolic: true,
        ..TraceConfig::default()
    };
    let mut tracer = Tracer::new(&provider, config);
    let value = tracer.resolve(LOC, &out).unwrap();
    assert_eq!(
        value.to_styled().to_string(),
        "Lib.Double(In=Lib.Double(In=X).Out).Out"
    );
}

// ---------------------------------------------------------------------------
// Documents and renderers
// ---------------------------------------------------------------------------

/// Root graph calling `Foo` twice; `Foo` calls `Bar`, which has no graph.
fn document_provider() -> (InMemoryProvider, NodeId) {
    let mut b = event_graph();
    let (ev, then) = begin_play(&mut b);
    let first = user_call(&mut b, "Foo");
    let second = user_call(&mut b, "Foo");
    b.link(&then, &first.exec).link(&first.then, &second.exec);
    let root = b.build().unwrap();

    let mut f = GraphBuilder::new("/Game/MyAsset:Foo", "Foo", "MyAsset");
    let entry = f.node(NodeKind::FunctionEntry, "Foo");
    f.prop(&entry, "FunctionName", "Foo");
    let entry_then = f.exec_out(&entry, "then");
    let bar = user_call(&mut f, "Bar");
    f.link(&entry_then, &bar.exec);
    let foo = f.build().unwrap();

    (InMemoryProvider::new().with_graph(root).with_graph(foo), ev)
}

#[test]
fn documents_render_each_definition_once() {
    let (provider, _) = document_provider();
    let doc = DocumentBuilder::new(&provider, TraceConfig::default())
        .build(LOC, None)
        .unwrap();

    assert_eq!(doc.roots.len(), 1);
    assert_eq!(
        doc.anchors(),
        vec!["eventgraph-event-beginplay", "game-myasset-foo", "game-myasset-bar"]
    );
    let foo = doc.definitions[0].trace.as_ref().unwrap();
    assert_eq!(
        plain(foo),
        "* Function Entry Foo\n* Bar()\n* [Path ends]\n"
    );
    assert!(doc.definitions[1].trace.is_none());

    let text = doc.render(&PlainRenderer);
    assert_eq!(text.matches("Function: MyAsset.Foo").count(), 1);
    assert!(text.contains("Definition not available"), "{text}");
}

#[test]
fn renderers_link_cross_references() {
    let (provider, ev) = document_provider();
    let mut tracer = Tracer::new(&provider, TraceConfig::default());
    let trace = tracer.trace(LOC, &ev).unwrap();

    let markdown = trace.render(&MarkdownRenderer);
    assert!(
        markdown.contains("* [`Foo`](#game-myasset-foo)()  \n"),
        "{markdown}"
    );

    let html = trace.render(&HtmlRenderer);
    assert!(html.starts_with("<pre class=\"bp-trace\">"), "{html}");
    assert!(html.contains("href=\"#game-myasset-foo\""), "{html}");
}
