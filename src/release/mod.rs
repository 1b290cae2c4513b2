//! Release orchestration.
//!
//! Composes the build and tag sequences into the `build`, `tag` and `release`
//! workflows and calls the collaborators in between:
//!
//! | Step | Collaborator |
//! |------|--------------|
//! | Read version | [`VersionSource`] |
//! | Confirm version / push | [`ConfirmationOracle`] |
//! | Render metadata | [`Scaffolder`] |
//! | Build, tag, push | [`SequenceRunner`] |

pub mod manifest;
pub mod metadata;
pub mod prompt;
pub mod steps;

pub use manifest::{PomVersionSource, VersionSource};
pub use metadata::{MetadataScaffolder, Scaffolder};
pub use prompt::{AssumeYes, ConfirmationOracle, TerminalPrompt};

use crate::config::Config;
use crate::exec::{CommandExecutor, StepCommand};
use crate::sequence::{ExecutionResult, Sequence, SequenceRunner};
use crate::ui::icons::{BOLT, PACKAGE, ROCKET, SEARCH, STOP};
use crate::ui::report;
use crate::ui::{LiveLogView, ViewMode};
use anyhow::Result;
use console::style;
use std::path::PathBuf;

/// How a workflow ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowOutcome {
    Completed,
    /// The user declined a confirmation.
    Cancelled,
    /// A fail-fast step failed.
    Failed { command: String },
}

impl WorkflowOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, WorkflowOutcome::Completed)
    }

    /// `Completed` unless a fail-fast step failed.
    pub fn from_result(result: &ExecutionResult) -> Self {
        match result.failed_command() {
            None => WorkflowOutcome::Completed,
            Some(command) => WorkflowOutcome::Failed { command },
        }
    }
}

/// Knobs for `shipit release` / `shipit tag`.
#[derive(Debug, Clone, Default)]
pub struct ReleaseOptions {
    /// Use this version instead of asking.
    pub version: Option<String>,
    pub skip_build: bool,
}

/// Drives a release end to end.
pub struct ReleaseWorkflow<E> {
    config: Config,
    runner: SequenceRunner<E>,
    versions: Box<dyn VersionSource>,
    oracle: Box<dyn ConfirmationOracle>,
    metadata: Box<dyn Scaffolder>,
    view_mode: ViewMode,
}

impl<E: CommandExecutor> ReleaseWorkflow<E> {
    /// Workflow with the default collaborators for `config`.
    pub fn new(config: Config, executor: E) -> Self {
        let versions = Box::new(PomVersionSource::new(config.manifest_path()));
        let oracle = prompt::oracle_for(config.yes);
        let metadata = Box::new(MetadataScaffolder::from_config(
            &config.toml.metadata,
            &config.project_dir,
        ));
        Self {
            config,
            runner: SequenceRunner::new(executor),
            versions,
            oracle,
            metadata,
            view_mode: ViewMode::detect(),
        }
    }

    pub fn with_version_source(mut self, versions: impl VersionSource + 'static) -> Self {
        self.versions = Box::new(versions);
        self
    }

    pub fn with_oracle(mut self, oracle: impl ConfirmationOracle + 'static) -> Self {
        self.oracle = Box::new(oracle);
        self
    }

    pub fn with_scaffolder(mut self, metadata: impl Scaffolder + 'static) -> Self {
        self.metadata = Box::new(metadata);
        self
    }

    pub fn with_view_mode(mut self, mode: ViewMode) -> Self {
        self.view_mode = mode;
        self
    }

    pub fn runner(&self) -> &SequenceRunner<E> {
        &self.runner
    }

    /// Run `sequence` in a fresh panel and report the verdict.
    pub async fn run_sequence(&mut self, sequence: &Sequence) -> ExecutionResult {
        let mut view = LiveLogView::new(
            sequence.title.clone(),
            self.config.log_height(),
            self.view_mode,
        );
        let result = self.runner.run(sequence, &mut view).await;
        report::print_sequence_outcome(&result, &sequence.success_message);
        result
    }

    /// `shipit build`: the build sequence alone.
    pub async fn run_build(&mut self) -> Result<WorkflowOutcome> {
        let build_cmd = steps::resolve_build_command(self.config.build_cmd_override());
        report::print_rule(&format!("{}Build", PACKAGE));
        let result = self.run_sequence(&steps::build_sequence(&build_cmd)).await;
        Ok(WorkflowOutcome::from_result(&result))
    }

    /// `shipit release`: version, metadata, build, confirm, commit and tag.
    pub async fn run_release(&mut self, options: ReleaseOptions) -> Result<WorkflowOutcome> {
        self.print_banner();
        let version = self.resolve_version(options.version)?;
        let metadata_written = self.render_metadata(&version);

        if !options.skip_build {
            let outcome = self.run_build().await?;
            if !outcome.is_success() {
                return Ok(outcome);
            }
        }

        self.publish(&version, metadata_written).await
    }

    /// `shipit tag`: like `release` without metadata and build.
    pub async fn run_tag(&mut self, version: Option<String>) -> Result<WorkflowOutcome> {
        self.print_banner();
        let version = self.resolve_version(version)?;
        self.publish(&version, false).await
    }

    fn print_banner(&self) {
        println!(
            "{}{} {}",
            ROCKET,
            style("Releasing").bold(),
            style(self.config.project_name()).cyan().bold()
        );
    }

    fn resolve_version(&self, explicit: Option<String>) -> Result<String> {
        let detected = self.versions.read()?;
        println!("{}Detected version: {}", SEARCH, style(&detected).green().bold());
        let version = match explicit {
            Some(v) if !v.trim().is_empty() => v.trim().to_string(),
            _ => self.oracle.choose_version(&detected),
        };
        tracing::info!(%detected, %version, "release version chosen");
        Ok(version)
    }

    fn render_metadata(&self, version: &str) -> bool {
        match self.metadata.generate(version) {
            Ok(true) => {
                println!(
                    "{}Rendered {}",
                    BOLT,
                    self.config.toml.metadata.output.display()
                );
                true
            }
            Ok(false) => {
                report::print_note(&format!(
                    "No {} found, skipping release metadata",
                    self.config.toml.metadata.template.display()
                ));
                false
            }
            Err(err) => {
                tracing::warn!(error = %format!("{:#}", err), "metadata rendering failed");
                println!(
                    "{}",
                    style(format!("Release metadata skipped: {:#}", err)).yellow()
                );
                false
            }
        }
    }

    async fn publish(&mut self, version: &str, metadata_written: bool) -> Result<WorkflowOutcome> {
        let release = self.config.toml.release.clone();
        let tag = steps::tag_name(&release, version);

        let prompt = format!("Push {} to {}?", tag, release.remote);
        if !self.oracle.ask(&prompt) {
            println!("{}{}", STOP, style("Release cancelled").yellow());
            tracing::info!(%tag, "release cancelled by user");
            return Ok(WorkflowOutcome::Cancelled);
        }

        let mut files: Vec<PathBuf> = vec![self.config.toml.project.manifest.clone()];
        if metadata_written {
            files.push(self.config.toml.metadata.output.clone());
        }
        files.extend(release.extra_files.iter().cloned());
        let message = steps::commit_message(&release, &tag, version);
        self.commit_quietly(&files, &message).await;

        report::print_rule(&format!("{}Tag", ROCKET));
        let result = self.run_sequence(&steps::tag_sequence(&release, &tag)).await;
        let outcome = WorkflowOutcome::from_result(&result);
        if outcome.is_success() {
            report::print_release_summary(&self.config.project_name(), &tag);
        }
        Ok(outcome)
    }

    /// Stage and commit outside the panel; "nothing to commit" is normal.
    async fn commit_quietly(&self, files: &[PathBuf], message: &str) {
        for args in steps::commit_commands(files, message) {
            let command = StepCommand::Argv(args);
            let mut discard = |_line: String| {};
            match self.runner.executor().execute(&command, &mut discard).await {
                Ok(0) => tracing::debug!(%command, "quiet step succeeded"),
                Ok(code) => tracing::info!(%command, exit_code = code, "quiet step failed, continuing"),
                Err(err) => tracing::warn!(%command, error = %err, "quiet step could not run"),
            }
        }
    }
}
