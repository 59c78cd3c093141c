//! Behaviour-driven tests for the shell runtime.

use std::cell::RefCell;

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

use super::support::{Transcript, invoke};

#[derive(Default)]
struct TestWorld {
    output_flags: Vec<&'static str>,
    stdin: String,
    transcript: Option<Transcript>,
}

impl TestWorld {
    fn transcript(&self) -> &Transcript {
        self.transcript.as_ref().expect("shell should have run")
    }
}

#[fixture]
fn world() -> RefCell<TestWorld> {
    RefCell::new(TestWorld::default())
}

#[given("output renders for a human")]
fn given_human_output(world: &RefCell<TestWorld>) {
    world.borrow_mut().output_flags = vec!["--output", "human"];
}

#[given("output renders as JSON")]
fn given_json_output(world: &RefCell<TestWorld>) {
    world.borrow_mut().output_flags = vec!["--output", "json"];
}

#[given("the session input is {lines}")]
fn given_session_input(world: &RefCell<TestWorld>, lines: String) {
    world.borrow_mut().stdin = lines.split(';').map(|line| format!("{line}\n")).collect();
}

#[when("the operator runs the shell with {command}")]
fn when_shell_runs(world: &RefCell<TestWorld>, command: String) {
    let mut state = world.borrow_mut();
    let mut args: Vec<&str> = state.output_flags.clone();
    args.extend(command.split_whitespace());
    let transcript = invoke(&args, &state.stdin, false);
    state.transcript = Some(transcript);
}

#[then("the shell exits with status {status}")]
fn then_exit_status(world: &RefCell<TestWorld>, status: u8) {
    let state = world.borrow();
    let transcript = state.transcript();
    assert_eq!(transcript.status, status, "stderr: {}", transcript.stderr);
}

#[then("stdout lists {command}")]
fn then_stdout_lists(world: &RefCell<TestWorld>, command: String) {
    let state = world.borrow();
    assert!(
        state
            .transcript()
            .stdout
            .lines()
            .any(|line| line.split_whitespace().next() == Some(command.as_str())),
        "{command} should be listed"
    );
}

#[then("stdout does not mention {text}")]
fn then_stdout_omits(world: &RefCell<TestWorld>, text: String) {
    assert!(!world.borrow().transcript().stdout.contains(&text));
}

#[then("stdout ends with {line}")]
fn then_stdout_ends_with(world: &RefCell<TestWorld>, line: String) {
    let state = world.borrow();
    assert_eq!(state.transcript().stdout.lines().last(), Some(line.as_str()));
}

#[then("stderr mentions {text}")]
fn then_stderr_mentions(world: &RefCell<TestWorld>, text: String) {
    let state = world.borrow();
    let stderr = &state.transcript().stderr;
    assert!(stderr.contains(&text), "'{stderr}' should mention '{text}'");
}

#[scenario(path = "tests/features/shell.feature")]
fn shell_behaviour(world: RefCell<TestWorld>) {
    let _ = world;
}
