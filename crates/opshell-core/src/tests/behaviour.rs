//! Behaviour-driven tests for `run` command dispatch.

use std::cell::RefCell;
use std::sync::atomic::{AtomicUsize, Ordering};

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use serde_json::Value;

use crate::{
    Arguments, CollectedOutput, DispatchError, DispatchOutcome, Dispatcher, DisplayedRow,
    Operation, OperationTable, ParamType, Parameter, Signature, encode,
};

#[derive(Default)]
struct FakeNode {
    invocations: AtomicUsize,
}

impl FakeNode {
    fn record(&self) {
        self.invocations.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Default)]
struct TestWorld {
    node: FakeNode,
    dispatcher: Option<Dispatcher<FakeNode>>,
    output: CollectedOutput,
    result: Option<Result<DispatchOutcome, DispatchError>>,
}

#[fixture]
fn world() -> RefCell<TestWorld> {
    RefCell::new(TestWorld::default())
}

fn string_param(name: &'static str) -> Parameter {
    Parameter::new(name, ParamType::String)
}

fn echo_operation() -> Operation<FakeNode> {
    Operation::new(
        Signature::new("fooBar", [string_param("value")]),
        |node: &FakeNode, arguments: &Arguments| {
            node.record();
            let value: String = arguments.get(0)?;
            encode(&value)
        },
    )
}

fn protocol_version() -> Operation<FakeNode> {
    Operation::new(
        Signature::nullary("getProtocolVersion"),
        |node: &FakeNode, _: &Arguments| {
            node.record();
            encode(&7_u32)
        },
    )
}

fn primary_table() -> OperationTable<FakeNode> {
    OperationTable::new("Primary")
        .with(echo_operation())
        .with(Operation::new(
            Signature::nullary("nodeInfo"),
            |node: &FakeNode, _: &Arguments| {
                node.record();
                encode(&"O=Bank A, L=London, C=GB")
            },
        ))
        .with(protocol_version())
        .with(Operation::new(
            Signature::new("killFlow", [string_param("id")]),
            |node: &FakeNode, arguments: &Arguments| {
                node.record();
                let id: String = arguments.get(0)?;
                encode(&format!("killed {id}"))
            },
        ))
}

fn extended_table() -> OperationTable<FakeNode> {
    OperationTable::new("Extended")
        .with(echo_operation())
        .with(Operation::new(
            Signature::new("startFlowDynamic", [string_param("flowName")]),
            |node: &FakeNode, _: &Arguments| {
                node.record();
                encode(&"flow-1")
            },
        ))
        .with(Operation::new(
            Signature::new(
                "killFlow",
                [string_param("id"), Parameter::new("force", ParamType::Boolean)],
            ),
            |node: &FakeNode, arguments: &Arguments| {
                node.record();
                let id: String = arguments.get(0)?;
                let force: bool = arguments.get(1)?;
                let verb = if force { "forced" } else { "requested" };
                encode(&format!("{verb} {id}"))
            },
        ))
        .with(protocol_version())
}

fn listed_commands(world: &TestWorld) -> Vec<String> {
    world
        .output
        .rows
        .iter()
        .map(DisplayedRow::command)
        .map(str::to_owned)
        .collect()
}

fn dispatch(world: &RefCell<TestWorld>, tokens: &[String]) {
    let mut state = world.borrow_mut();
    let TestWorld {
        node,
        dispatcher,
        output,
        result,
    } = &mut *state;
    let configured = dispatcher.as_ref().expect("dispatcher should be configured");
    *result = Some(configured.dispatch(tokens, node, output));
}

#[given("a node exposing overlapping primary and extended catalogs")]
fn given_node(world: &RefCell<TestWorld>) {
    world.borrow_mut().dispatcher = Some(Dispatcher::new(primary_table(), extended_table()));
}

#[when("the operator runs an empty command line")]
fn when_runs_empty(world: &RefCell<TestWorld>) {
    dispatch(world, &[]);
}

#[when("the operator types {command}")]
fn when_types_command(world: &RefCell<TestWorld>, command: String) {
    let tokens: Vec<String> = command.split_whitespace().map(str::to_owned).collect();
    dispatch(world, &tokens);
}

#[then("the listing is {names}")]
fn then_listing_is(world: &RefCell<TestWorld>, names: String) {
    let state = world.borrow();
    let expected: Vec<&str> = names.split(',').map(str::trim).collect();
    assert_eq!(listed_commands(&state), expected);
}

#[then("the listing omits {name}")]
fn then_listing_omits(world: &RefCell<TestWorld>, name: String) {
    let state = world.borrow();
    assert!(
        !listed_commands(&state).contains(&name),
        "{name} should be hidden from help"
    );
}

#[then("no operation was invoked")]
fn then_nothing_invoked(world: &RefCell<TestWorld>) {
    assert_eq!(world.borrow().node.invocations.load(Ordering::SeqCst), 0);
}

#[then("exactly {count} operation was invoked")]
fn then_invoked_count(world: &RefCell<TestWorld>, count: usize) {
    assert_eq!(world.borrow().node.invocations.load(Ordering::SeqCst), count);
}

#[then("the result is {expected}")]
fn then_result_is(world: &RefCell<TestWorld>, expected: String) {
    let state = world.borrow();
    let outcome = state
        .result
        .as_ref()
        .expect("result missing")
        .as_ref()
        .expect("dispatch failed");
    let DispatchOutcome::Invoked { value, .. } = outcome else {
        panic!("expected an invocation, got {outcome:?}");
    };
    let rendered = match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    };
    assert_eq!(rendered, expected);
    assert_eq!(state.output.values.last(), Some(value));
}

#[then("the command fails with {kind}")]
fn then_command_fails(world: &RefCell<TestWorld>, kind: String) {
    let state = world.borrow();
    let error = state
        .result
        .as_ref()
        .expect("result missing")
        .as_ref()
        .expect_err("expected dispatch to fail");
    match kind.as_str() {
        "unknown_operation" => {
            assert!(matches!(error, DispatchError::UnknownOperation { .. }));
        }
        "invalid_argument" => {
            assert!(matches!(error, DispatchError::InvalidArgument { .. }));
        }
        other => panic!("unknown error kind: {other}"),
    }
    assert!(state.output.values.is_empty());
}

#[scenario(path = "tests/features/dispatcher.feature")]
fn dispatcher_behaviour(world: RefCell<TestWorld>) {
    let _ = world;
}
