//! Project scaffolding: `shipit new`.

use anyhow::{Context, Result};
use console::style;
use shipit::config::Config;
use shipit::scaffold::{self, PluginProject, ProjectInput};
use shipit::ui::icons::{FILE_NEW, FOLDER, SPARKLE};
use std::path::PathBuf;

pub fn cmd_new(
    config: &Config,
    input: ProjectInput,
    dir: Option<PathBuf>,
    force: bool,
) -> Result<()> {
    let project = PluginProject::resolve(input, &config.toml.scaffold)?;
    let target = match dir {
        Some(dir) => config.resolve(&dir),
        None => config.project_dir.join(&project.artifact_id),
    };

    let created = scaffold::generate(&project, &target, force)
        .with_context(|| format!("Failed to create project in {}", target.display()))?;

    for file in &created {
        println!("{}Created: {}", FILE_NEW, target.join(file).display());
    }

    println!();
    println!(
        "{}{}",
        SPARKLE,
        style("Project structure generated successfully!").green().bold()
    );
    println!("{}Location: {}", FOLDER, target.display());
    println!();
    println!("Next steps:");
    println!("  1. Open the folder as a Maven project in your IDE");
    println!("  2. Put your .onnx model under src/main/resources/");
    println!("  3. Run `shipit build` inside the project");
    Ok(())
}
