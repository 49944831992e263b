//! Scripted command runner shared by unit and integration tests.

use std::cell::RefCell;
use std::collections::VecDeque;

use crate::error::GhseedError;
use crate::process::{CommandOutput, CommandRunner, CommandSpec};

/// Returns queued outputs in FIFO order and records every invocation.
#[derive(Debug, Default)]
pub struct ScriptedRunner {
    responses: RefCell<VecDeque<CommandOutput>>,
    invocations: RefCell<Vec<CommandSpec>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful exit with empty output.
    pub fn push_success(&self) -> &Self {
        self.push_output(Some(0), "", "")
    }

    /// Queue a successful exit with the given stdout.
    pub fn push_stdout(&self, stdout: &str) -> &Self {
        self.push_output(Some(0), stdout, "")
    }

    /// Queue a non-zero exit with the given stderr.
    pub fn push_failure(&self, stderr: &str) -> &Self {
        self.push_output(Some(1), "", stderr)
    }

    pub fn push_output(&self, code: Option<i32>, stdout: &str, stderr: &str) -> &Self {
        self.responses.borrow_mut().push_back(CommandOutput {
            code,
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
        });
        self
    }

    pub fn invocations(&self) -> Vec<CommandSpec> {
        self.invocations.borrow().clone()
    }

    /// Each invocation rendered as `program arg1 arg2 ...`.
    pub fn command_lines(&self) -> Vec<String> {
        self.invocations
            .borrow()
            .iter()
            .map(|spec| format!("{} {}", spec.program, spec.args_line()))
            .collect()
    }

    pub fn remaining(&self) -> usize {
        self.responses.borrow().len()
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, spec: &CommandSpec) -> Result<CommandOutput, GhseedError> {
        self.invocations.borrow_mut().push(spec.clone());
        self.responses
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| GhseedError::Spawn {
                program: spec.program.clone(),
                message: "no scripted response available".to_string(),
            })
    }
}
