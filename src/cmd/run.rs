//! User-defined sequences: `shipit run`.

use anyhow::{Result, bail};
use console::style;
use shipit::config::Config;
use shipit::exec::ShellExecutor;
use shipit::release::WorkflowOutcome;
use shipit::sequence::SequenceRunner;
use shipit::ui::report;
use shipit::ui::{LiveLogView, ViewMode};

fn print_sequences(config: &Config) {
    if config.toml.sequences.is_empty() {
        println!("No sequences defined.");
        println!("Add [sequences.<name>] tables to .shipit/shipit.toml.");
        return;
    }

    println!("Sequences:");
    for (name, sequence) in &config.toml.sequences {
        let title = sequence.title.as_deref().unwrap_or("");
        println!(
            "  {:<16} {} {}",
            style(name).cyan().bold(),
            style(format!("({} steps)", sequence.steps.len())).dim(),
            title
        );
    }
}

pub async fn cmd_run(
    config: &Config,
    mode: ViewMode,
    name: Option<&str>,
    list: bool,
) -> Result<WorkflowOutcome> {
    let name = match name {
        Some(name) if !list => name,
        _ => {
            print_sequences(config);
            return Ok(WorkflowOutcome::Completed);
        }
    };

    let Some(sequence_config) = config.toml.sequences.get(name) else {
        let known: Vec<&str> = config.toml.sequences.keys().map(String::as_str).collect();
        if known.is_empty() {
            bail!("Unknown sequence '{}': no sequences are defined", name);
        }
        bail!(
            "Unknown sequence '{}'. Available: {}",
            name,
            known.join(", ")
        );
    };
    let sequence = sequence_config.to_sequence(name)?;

    let executor = ShellExecutor::new(config.output_policy()).in_dir(&config.project_dir);
    let mut runner = SequenceRunner::new(executor);
    let mut view = LiveLogView::new(sequence.title.clone(), config.log_height(), mode);
    let result = runner.run(&sequence, &mut view).await;
    report::print_sequence_outcome(&result, &sequence.success_message);

    Ok(WorkflowOutcome::from_result(&result))
}
