//! Ordered command sequences and their results.
//!
//! A [`Sequence`] is an ordered list of [`Step`]s with a title and a success
//! message. [`SequenceRunner`] executes it one step at a time and produces an
//! [`ExecutionResult`].

pub mod runner;

pub use runner::SequenceRunner;

use crate::exec::StepCommand;
use std::fmt;

/// One command plus its failure policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub command: StepCommand,
    /// When true a non-zero exit is logged and the sequence continues.
    pub allow_failure: bool,
}

impl Step {
    /// A step whose non-zero exit aborts the sequence.
    pub fn fail_fast(command: impl Into<StepCommand>) -> Self {
        Self {
            command: command.into(),
            allow_failure: false,
        }
    }

    /// A best-effort step: a non-zero exit is logged and ignored.
    pub fn allow_failure(command: impl Into<StepCommand>) -> Self {
        Self {
            command: command.into(),
            allow_failure: true,
        }
    }

    /// A fail-fast step spawned directly from an argument vector, without a shell.
    pub fn argv<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::fail_fast(StepCommand::Argv(args.into_iter().map(Into::into).collect()))
    }
}

/// An ordered list of steps with display metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequence {
    pub title: String,
    pub success_message: String,
    pub steps: Vec<Step>,
}

impl Sequence {
    pub fn new(title: impl Into<String>, success_message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            success_message: success_message.into(),
            steps: Vec::new(),
        }
    }

    /// Append a fail-fast shell step.
    pub fn step(mut self, command: impl Into<StepCommand>) -> Self {
        self.steps.push(Step::fail_fast(command));
        self
    }

    /// Append a best-effort shell step.
    pub fn step_allow_failure(mut self, command: impl Into<StepCommand>) -> Self {
        self.steps.push(Step::allow_failure(command));
        self
    }

    /// Append an already-built step.
    pub fn push(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// Runner state machine: `Idle -> Running(i) -> Succeeded | Failed(i)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SequenceState {
    #[default]
    Idle,
    Running(usize),
    Succeeded,
    Failed(usize),
}

impl SequenceState {
    pub fn is_terminal(self) -> bool {
        matches!(self, SequenceState::Succeeded | SequenceState::Failed(_))
    }
}

/// Why a step stopped the sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// The command ran and returned a non-zero exit code.
    NonZeroExit { code: i32 },
    /// The command could not be started or reaped.
    Spawn { message: String },
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::NonZeroExit { code } => write!(f, "exited with code {}", code),
            FailureReason::Spawn { message } => write!(f, "could not run: {}", message),
        }
    }
}

/// The step that stopped a failed sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepFailure {
    pub index: usize,
    pub step: Step,
    pub reason: FailureReason,
}

/// Verdict of one sequence run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    pub succeeded: bool,
    pub failure: Option<StepFailure>,
    /// Indices of allow-failure steps whose non-zero exit was ignored.
    pub ignored_failures: Vec<usize>,
}

impl ExecutionResult {
    pub(crate) fn success(ignored_failures: Vec<usize>) -> Self {
        Self {
            succeeded: true,
            failure: None,
            ignored_failures,
        }
    }

    pub(crate) fn failed(failure: StepFailure, ignored_failures: Vec<usize>) -> Self {
        Self {
            succeeded: false,
            failure: Some(failure),
            ignored_failures,
        }
    }

    pub fn failed_step(&self) -> Option<&Step> {
        self.failure.as_ref().map(|f| &f.step)
    }

    pub fn failed_index(&self) -> Option<usize> {
        self.failure.as_ref().map(|f| f.index)
    }

    /// Display form of the failing command, if any.
    pub fn failed_command(&self) -> Option<String> {
        self.failure.as_ref().map(|f| f.step.command.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_preserves_order_and_policy() {
        let seq = Sequence::new("Git", "done")
            .step("git push origin main")
            .step_allow_failure("git tag -d v1")
            .push(Step::argv(["git", "push", "origin", "v1"]));
        assert_eq!(seq.len(), 3);
        assert!(!seq.steps[0].allow_failure);
        assert!(seq.steps[1].allow_failure);
        assert_eq!(seq.steps[2].command.to_string(), "git push origin v1");
        assert!(matches!(seq.steps[2].command, StepCommand::Argv(_)));
    }

    #[test]
    fn test_failure_reason_display() {
        assert_eq!(
            FailureReason::NonZeroExit { code: 2 }.to_string(),
            "exited with code 2"
        );
        assert!(
            FailureReason::Spawn {
                message: "not found".into()
            }
            .to_string()
            .contains("not found")
        );
    }

    #[test]
    fn test_result_accessors() {
        let failure = StepFailure {
            index: 1,
            step: Step::fail_fast("false"),
            reason: FailureReason::NonZeroExit { code: 1 },
        };
        let result = ExecutionResult::failed(failure, vec![0]);
        assert!(!result.succeeded);
        assert_eq!(result.failed_index(), Some(1));
        assert_eq!(result.failed_command().as_deref(), Some("false"));
        assert_eq!(result.failed_step(), Some(&Step::fail_fast("false")));

        let ok = ExecutionResult::success(Vec::new());
        assert!(ok.succeeded);
        assert_eq!(ok.failed_step(), None);
        assert_eq!(ok.failed_command(), None);
    }

    #[test]
    fn test_terminal_states() {
        assert!(!SequenceState::Idle.is_terminal());
        assert!(!SequenceState::Running(0).is_terminal());
        assert!(SequenceState::Succeeded.is_terminal());
        assert!(SequenceState::Failed(3).is_terminal());
    }
}
