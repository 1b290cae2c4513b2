//! Configuration view and validation commands: `shipit config`.

use anyhow::{Context, Result};
use shipit::config::{Config, ShipitToml};
use shipit::release::steps::resolve_build_command;

use super::super::ConfigCommands;

pub fn cmd_config(config: &Config, command: Option<ConfigCommands>) -> Result<()> {
    let config_path = config.config_path();

    match command {
        None | Some(ConfigCommands::Show) => {
            println!();
            println!("Shipit Configuration");
            println!("====================");
            println!();

            match &config.source {
                Some(source) => println!("Config file: {}", source.display()),
                None => {
                    println!("No shipit.toml found at {}", config_path.display());
                    println!("Using default configuration.");
                }
            }
            println!();

            let rendered =
                toml::to_string_pretty(&config.toml).context("Failed to render configuration")?;
            for line in rendered.lines() {
                println!("  {}", line);
            }
            println!();

            // Effective values include env and CLI overrides
            println!("Effective values (with env/CLI overrides):");
            println!("  project = \"{}\"", config.project_name());
            println!("  manifest = \"{}\"", config.manifest_path().display());
            println!("  log_height = {}", config.log_height());
            println!(
                "  build_cmd = \"{}\"",
                resolve_build_command(config.build_cmd_override())
            );
            if let Some(log_file) = config.log_file() {
                println!("  log_file = \"{}\"", log_file.display());
            }
            println!();

            if config.source.is_none() {
                println!("Run 'shipit config init' to create a shipit.toml file.");
                println!();
            }
        }
        Some(ConfigCommands::Validate) => {
            println!();
            println!("Validating configuration...");
            println!();

            if config.source.is_none() {
                println!("No shipit.toml found. Using defaults (valid).");
                return Ok(());
            }

            let warnings = config.toml.validate();
            if warnings.is_empty() {
                println!("Configuration is valid.");
            } else {
                println!("Configuration warnings:");
                for warning in warnings {
                    println!("  - {}", warning);
                }
            }
            println!();
        }
        Some(ConfigCommands::Init) => {
            if config_path.exists() {
                println!("shipit.toml already exists at {}", config_path.display());
                println!("Delete it first if you want to recreate it.");
                return Ok(());
            }

            std::fs::create_dir_all(&config.shipit_dir).with_context(|| {
                format!("Failed to create {}", config.shipit_dir.display())
            })?;

            let toml = ShipitToml::default();
            toml.save(&config_path)?;

            println!("Created shipit.toml at {}", config_path.display());
            println!();
            println!("You can now customize:");
            println!("  - [project] name, manifest");
            println!("  - [build] command");
            println!("  - [release] remote, branch, tag_prefix, commit_message");
            println!("  - [sequences.<name>] for your own command sequences");
            println!();
        }
    }

    Ok(())
}
