use super::{ExecutionResult, FailureReason, Sequence, SequenceState, Step, StepFailure};
use crate::exec::CommandExecutor;
use crate::ui::{LiveLogView, LogLine, ViewStatus};

/// Drives a [`CommandExecutor`] over the steps of a [`Sequence`].
///
/// Steps run strictly one after another. Output of every step is appended to
/// the supplied [`LiveLogView`]. The first fail-fast step that exits non-zero,
/// or any step that cannot be spawned, stops the run; allow-failure steps only
/// leave a warning line behind.
pub struct SequenceRunner<E> {
    executor: E,
    state: SequenceState,
}

impl<E: CommandExecutor> SequenceRunner<E> {
    pub fn new(executor: E) -> Self {
        Self {
            executor,
            state: SequenceState::Idle,
        }
    }

    /// Current state; terminal after `run` returns.
    pub fn state(&self) -> SequenceState {
        self.state
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Run every step of `sequence` in order, feeding `view`.
    ///
    /// The view is finished with the terminal status before returning.
    pub async fn run(&mut self, sequence: &Sequence, view: &mut LiveLogView) -> ExecutionResult {
        self.state = SequenceState::Idle;
        let mut ignored = Vec::new();

        tracing::info!(
            title = %sequence.title,
            steps = sequence.len(),
            "starting sequence"
        );

        for (index, step) in sequence.steps.iter().enumerate() {
            self.state = SequenceState::Running(index);
            view.append(LogLine::command(step.command.to_string()));

            let outcome = {
                let mut sink = |line: String| view.append(LogLine::output(line));
                self.executor.execute(&step.command, &mut sink).await
            };

            let reason = match outcome {
                Ok(0) => continue,
                Ok(code) if step.allow_failure => {
                    tracing::warn!(
                        step = index,
                        command = %step.command,
                        exit_code = code,
                        "ignoring failure of allow-failure step"
                    );
                    view.append(LogLine::warning(format!(
                        "step failed (exit {}) but is allowed to fail, continuing",
                        code
                    )));
                    ignored.push(index);
                    continue;
                }
                Ok(code) => FailureReason::NonZeroExit { code },
                Err(err) => {
                    view.append(LogLine::warning(err.to_string()));
                    FailureReason::Spawn {
                        message: err.to_string(),
                    }
                }
            };

            return self.fail(index, step, reason, ignored, view);
        }

        self.state = SequenceState::Succeeded;
        view.finish(ViewStatus::Succeeded);
        tracing::info!(title = %sequence.title, "sequence succeeded");
        ExecutionResult::success(ignored)
    }

    fn fail(
        &mut self,
        index: usize,
        step: &Step,
        reason: FailureReason,
        ignored: Vec<usize>,
        view: &mut LiveLogView,
    ) -> ExecutionResult {
        tracing::warn!(
            step = index,
            command = %step.command,
            reason = %reason,
            "sequence aborted"
        );
        self.state = SequenceState::Failed(index);
        view.finish(ViewStatus::Failed);
        ExecutionResult::failed(
            StepFailure {
                index,
                step: step.clone(),
                reason,
            },
            ignored,
        )
    }
}
