use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use shipit::config::Config;
use shipit::logging;
use shipit::release::WorkflowOutcome;
use shipit::scaffold::ProjectInput;
use shipit::ui::ViewMode;
use std::path::PathBuf;
use std::process::ExitCode;

mod cmd;

#[derive(Parser)]
#[command(name = "shipit")]
#[command(version, about = "Build, tag and release through sequenced commands with a live log panel")]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Answer yes to every confirmation and keep the detected version
    #[arg(short, long, global = true)]
    pub yes: bool,

    #[arg(long, global = true)]
    pub project_dir: Option<PathBuf>,

    /// Lines kept in the live log panel. Overrides shipit.toml and SHIPIT_LOG_HEIGHT.
    #[arg(long, global = true)]
    pub log_height: Option<usize>,

    /// Build command. Overrides shipit.toml and SHIPIT_BUILD_CMD.
    #[arg(long, global = true)]
    pub build_cmd: Option<String>,

    /// Print output line by line instead of the live panel
    #[arg(long, global = true)]
    pub plain: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build the project (mvnd or mvn unless configured)
    Build,
    /// Build, commit, tag and push a release
    Release {
        /// Release this version instead of asking
        #[arg(long = "version", value_name = "VERSION")]
        set_version: Option<String>,

        /// Tag without building first
        #[arg(long)]
        skip_build: bool,
    },
    /// Commit, tag and push without building
    Tag {
        /// Tag this version instead of asking
        #[arg(long = "version", value_name = "VERSION")]
        set_version: Option<String>,
    },
    /// Run a sequence defined in shipit.toml
    Run {
        /// Sequence name
        name: Option<String>,

        /// List the defined sequences
        #[arg(short, long)]
        list: bool,
    },
    /// Generate a new ImageJ plugin project
    New {
        /// Human-readable project name
        name: String,

        /// Target directory (defaults to the artifact id)
        #[arg(long)]
        dir: Option<PathBuf>,

        #[arg(long)]
        group_id: Option<String>,

        #[arg(long)]
        artifact_id: Option<String>,

        /// Initial version (default 0.1.0-SNAPSHOT)
        #[arg(long = "initial-version")]
        initial_version: Option<String>,

        /// Java package (defaults to <group>.<first word of artifact>)
        #[arg(long)]
        package: Option<String>,

        /// Plugin class name (defaults to <Artifact>_Plugin)
        #[arg(long)]
        plugin_class: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        author: Option<String>,

        #[arg(long)]
        email: Option<String>,

        #[arg(long)]
        url: Option<String>,

        /// Write into a non-empty directory
        #[arg(long)]
        force: bool,
    },
    /// View or validate configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Clone)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Validate configuration and show any warnings
    Validate,
    /// Initialize a default shipit.toml file
    Init,
}

fn exit_code(outcome: &WorkflowOutcome) -> ExitCode {
    if outcome.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let project_dir = match cli.project_dir.clone() {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to get current directory")?,
    };

    let config = Config::with_cli_args(
        project_dir,
        cli.verbose,
        cli.yes,
        cli.log_height,
        cli.build_cmd.clone(),
    );
    // Set up logging before reporting a broken config so the failure is logged too.
    let log_file = config.as_ref().ok().and_then(|c| c.log_file());
    let log_level = config
        .as_ref()
        .ok()
        .and_then(|c| c.toml.logging.level.clone());
    let _guard = logging::init(cli.verbose, log_file.as_deref(), log_level.as_deref())?;
    let config = config?;

    let mode = if cli.plain {
        ViewMode::Plain
    } else {
        ViewMode::detect()
    };

    let outcome = match cli.command {
        Commands::Build => cmd::cmd_build(&config, mode).await?,
        Commands::Release {
            set_version,
            skip_build,
        } => cmd::cmd_release(&config, mode, set_version, skip_build).await?,
        Commands::Tag { set_version } => cmd::cmd_tag(&config, mode, set_version).await?,
        Commands::Run { name, list } => cmd::cmd_run(&config, mode, name.as_deref(), list).await?,
        Commands::New {
            name,
            dir,
            group_id,
            artifact_id,
            initial_version,
            package,
            plugin_class,
            description,
            author,
            email,
            url,
            force,
        } => {
            let input = ProjectInput {
                name,
                group_id,
                artifact_id,
                version: initial_version,
                package,
                plugin_class,
                description,
                author,
                email,
                url,
            };
            cmd::cmd_new(&config, input, dir, force)?;
            WorkflowOutcome::Completed
        }
        Commands::Config { command } => {
            cmd::cmd_config(&config, command)?;
            WorkflowOutcome::Completed
        }
    };

    tracing::debug!(?outcome, "command finished");
    Ok(exit_code(&outcome))
}
