//! Build and release commands: `shipit build`, `shipit release`, `shipit tag`.

use anyhow::Result;
use shipit::config::Config;
use shipit::exec::ShellExecutor;
use shipit::release::{ReleaseOptions, ReleaseWorkflow, WorkflowOutcome};
use shipit::ui::ViewMode;

fn workflow(config: &Config, mode: ViewMode) -> ReleaseWorkflow<ShellExecutor> {
    let executor = ShellExecutor::new(config.output_policy()).in_dir(&config.project_dir);
    ReleaseWorkflow::new(config.clone(), executor).with_view_mode(mode)
}

pub async fn cmd_build(config: &Config, mode: ViewMode) -> Result<WorkflowOutcome> {
    workflow(config, mode).run_build().await
}

pub async fn cmd_release(
    config: &Config,
    mode: ViewMode,
    version: Option<String>,
    skip_build: bool,
) -> Result<WorkflowOutcome> {
    workflow(config, mode)
        .run_release(ReleaseOptions {
            version,
            skip_build,
        })
        .await
}

pub async fn cmd_tag(
    config: &Config,
    mode: ViewMode,
    version: Option<String>,
) -> Result<WorkflowOutcome> {
    workflow(config, mode).run_tag(version).await
}
