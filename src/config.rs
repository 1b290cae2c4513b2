//! Configuration for shipit.
//!
//! Settings are read from `.shipit/shipit.toml` in the project directory,
//! falling back to `<config dir>/shipit/shipit.toml` for the current user and
//! then to built-in defaults. Environment variables and CLI flags are layered
//! on top by [`Config`].
//!
//! # Configuration File Format
//!
//! ```toml
//! [project]
//! name = "NIA Denoise"
//! manifest = "pom.xml"
//!
//! [build]
//! command = "mvn -B clean package"
//!
//! [release]
//! remote = "origin"
//! branch = "main"
//! tag_prefix = "v"
//! commit_message = "chore: release {tag}"
//! extra_files = ["CHANGELOG.md"]
//!
//! [metadata]
//! template = ".zenodo.template.json"
//! output = ".zenodo.json"
//! placeholder = "{{VERSION}}"
//!
//! [display]
//! log_height = 12
//! truncate_over = 100
//! truncate_to = 97
//! noise_markers = ["Downloading"]
//!
//! [logging]
//! file = ".shipit/shipit.log"
//! level = "info"
//!
//! [scaffold]
//! group_id = "cn.ac.cns"
//! author = "Jane Doe"
//!
//! [sequences.deploy]
//! title = "Deploying"
//! success = "Deployed"
//! steps = [
//!     { command = "mvn -B deploy" },
//!     { args = ["git", "push", "--tags"], allow_failure = true },
//! ]
//! ```

use crate::exec::OutputPolicy;
use crate::exec::StepCommand;
use crate::exec::filter::{DEFAULT_NOISE_MARKER, DEFAULT_TRUNCATE_OVER, DEFAULT_TRUNCATE_TO};
use crate::sequence::{Sequence, Step};
use crate::ui::log_view::DEFAULT_LOG_HEIGHT;
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Name of the per-project configuration directory.
pub const SHIPIT_DIR: &str = ".shipit";
/// Name of the configuration file inside [`SHIPIT_DIR`].
pub const CONFIG_FILE: &str = "shipit.toml";

/// Project-level settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectSection {
    /// Display name (defaults to the directory name)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Build manifest the release version is read from
    #[serde(default = "default_manifest")]
    pub manifest: PathBuf,
}

fn default_manifest() -> PathBuf {
    PathBuf::from("pom.xml")
}

impl Default for ProjectSection {
    fn default() -> Self {
        Self {
            name: None,
            manifest: default_manifest(),
        }
    }
}

/// Build step settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuildSection {
    /// Explicit build command; auto-detected (mvnd, then mvn) when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
}

/// Git tagging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseSection {
    #[serde(default = "default_remote")]
    pub remote: String,
    #[serde(default = "default_branch")]
    pub branch: String,
    #[serde(default = "default_tag_prefix")]
    pub tag_prefix: String,
    /// `{tag}` and `{version}` are substituted
    #[serde(default = "default_commit_message")]
    pub commit_message: String,
    /// Files staged in the release commit besides the manifest and metadata
    #[serde(default)]
    pub extra_files: Vec<PathBuf>,
}

fn default_remote() -> String {
    "origin".to_string()
}

fn default_branch() -> String {
    "main".to_string()
}

fn default_tag_prefix() -> String {
    "v".to_string()
}

fn default_commit_message() -> String {
    "chore: release {tag}".to_string()
}

impl Default for ReleaseSection {
    fn default() -> Self {
        Self {
            remote: default_remote(),
            branch: default_branch(),
            tag_prefix: default_tag_prefix(),
            commit_message: default_commit_message(),
            extra_files: Vec::new(),
        }
    }
}

/// Release metadata template settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetadataSection {
    #[serde(default = "default_metadata_template")]
    pub template: PathBuf,
    #[serde(default = "default_metadata_output")]
    pub output: PathBuf,
    #[serde(default = "default_metadata_placeholder")]
    pub placeholder: String,
}

fn default_metadata_template() -> PathBuf {
    PathBuf::from(".zenodo.template.json")
}

fn default_metadata_output() -> PathBuf {
    PathBuf::from(".zenodo.json")
}

fn default_metadata_placeholder() -> String {
    "{{VERSION}}".to_string()
}

impl Default for MetadataSection {
    fn default() -> Self {
        Self {
            template: default_metadata_template(),
            output: default_metadata_output(),
            placeholder: default_metadata_placeholder(),
        }
    }
}

/// Log panel settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplaySection {
    /// Number of output lines kept in the rolling panel
    #[serde(default = "default_log_height")]
    pub log_height: usize,
    #[serde(default = "default_truncate_over")]
    pub truncate_over: usize,
    #[serde(default = "default_truncate_to")]
    pub truncate_to: usize,
    #[serde(default = "default_noise_markers")]
    pub noise_markers: Vec<String>,
}

fn default_log_height() -> usize {
    DEFAULT_LOG_HEIGHT
}

fn default_truncate_over() -> usize {
    DEFAULT_TRUNCATE_OVER
}

fn default_truncate_to() -> usize {
    DEFAULT_TRUNCATE_TO
}

fn default_noise_markers() -> Vec<String> {
    vec![DEFAULT_NOISE_MARKER.to_string()]
}

impl Default for DisplaySection {
    fn default() -> Self {
        Self {
            log_height: default_log_height(),
            truncate_over: default_truncate_over(),
            truncate_to: default_truncate_to(),
            noise_markers: default_noise_markers(),
        }
    }
}

impl DisplaySection {
    pub fn output_policy(&self) -> OutputPolicy {
        OutputPolicy {
            truncate_over: self.truncate_over,
            truncate_to: self.truncate_to,
            noise_markers: self.noise_markers.clone(),
        }
    }
}

/// Diagnostic logging settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingSection {
    /// Also write logs to this file (relative to the project directory)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    /// Filter directive for the file log (default: "info")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
}

/// Defaults for `shipit new`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScaffoldSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// One step of a user-defined sequence.
///
/// Exactly one of `command` (shell string) or `args` (argument vector) must be set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StepConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args: Option<Vec<String>>,
    #[serde(default)]
    pub allow_failure: bool,
}

impl StepConfig {
    pub fn to_step(&self) -> Result<Step> {
        let command = match (&self.command, &self.args) {
            (Some(line), None) if !line.trim().is_empty() => StepCommand::Shell(line.clone()),
            (None, Some(args)) if !args.is_empty() => StepCommand::Argv(args.clone()),
            (Some(_), Some(_)) => bail!("step sets both `command` and `args`"),
            _ => bail!("step needs a non-empty `command` or `args`"),
        };
        Ok(Step {
            command,
            allow_failure: self.allow_failure,
        })
    }
}

/// A named, user-defined sequence.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SequenceConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<String>,
    #[serde(default)]
    pub steps: Vec<StepConfig>,
}

impl SequenceConfig {
    /// Build the runnable sequence; `name` supplies default title and message.
    pub fn to_sequence(&self, name: &str) -> Result<Sequence> {
        let title = self
            .title
            .clone()
            .unwrap_or_else(|| format!("Running {}", name));
        let success = self
            .success
            .clone()
            .unwrap_or_else(|| format!("{} finished", name));

        let mut sequence = Sequence::new(title, success);
        for (i, step) in self.steps.iter().enumerate() {
            let step = step
                .to_step()
                .with_context(|| format!("Invalid step {} in sequence '{}'", i + 1, name))?;
            sequence = sequence.push(step);
        }
        Ok(sequence)
    }
}

/// The complete shipit.toml structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShipitToml {
    #[serde(default)]
    pub project: ProjectSection,
    #[serde(default)]
    pub build: BuildSection,
    #[serde(default)]
    pub release: ReleaseSection,
    #[serde(default)]
    pub metadata: MetadataSection,
    #[serde(default)]
    pub display: DisplaySection,
    #[serde(default)]
    pub logging: LoggingSection,
    #[serde(default)]
    pub scaffold: ScaffoldSection,
    #[serde(default)]
    pub sequences: BTreeMap<String, SequenceConfig>,
}

impl ShipitToml {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::parse(&content).with_context(|| format!("Invalid config file: {}", path.display()))
    }

    /// Parse configuration from a TOML string.
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse shipit.toml")
    }

    /// Load `<shipit_dir>/shipit.toml`, or defaults if it does not exist.
    pub fn load_or_default(shipit_dir: &Path) -> Result<Self> {
        let config_path = shipit_dir.join(CONFIG_FILE);
        if config_path.exists() {
            Self::load(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Path of the per-user configuration file, if a config dir is known.
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("shipit").join(CONFIG_FILE))
    }

    /// Project file if present, else the user file, else defaults.
    pub fn load_layered(project_dir: &Path) -> Result<(Self, Option<PathBuf>)> {
        let project_path = project_dir.join(SHIPIT_DIR).join(CONFIG_FILE);
        if project_path.exists() {
            return Ok((Self::load(&project_path)?, Some(project_path)));
        }
        if let Some(user_path) = Self::user_config_path()
            && user_path.exists()
        {
            return Ok((Self::load(&user_path)?, Some(user_path)));
        }
        Ok((Self::default(), None))
    }

    /// Save configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize shipit.toml")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    /// Validate the configuration and return any warnings.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.display.log_height == 0 {
            warnings.push("display.log_height is 0; the panel will show 1 line".to_string());
        }
        if self.display.truncate_to >= self.display.truncate_over {
            warnings.push(format!(
                "display.truncate_to ({}) should be smaller than display.truncate_over ({})",
                self.display.truncate_to, self.display.truncate_over
            ));
        }
        if self.release.remote.trim().is_empty() {
            warnings.push("release.remote is empty".to_string());
        }
        if self.release.branch.trim().is_empty() {
            warnings.push("release.branch is empty".to_string());
        }
        if self.metadata.placeholder.is_empty() {
            warnings.push("metadata.placeholder is empty".to_string());
        }

        for (name, sequence) in &self.sequences {
            if sequence.steps.is_empty() {
                warnings.push(format!("sequence '{}' has no steps", name));
            }
            if let Err(err) = sequence.to_sequence(name) {
                warnings.push(format!("{:#}", err));
            }
        }

        warnings
    }
}

/// Effective configuration: file, then environment, then CLI.
#[derive(Debug, Clone)]
pub struct Config {
    pub project_dir: PathBuf,
    pub shipit_dir: PathBuf,
    pub toml: ShipitToml,
    /// Where `toml` was loaded from, if anywhere
    pub source: Option<PathBuf>,
    pub verbose: bool,
    pub yes: bool,
    cli_log_height: Option<usize>,
    cli_build_cmd: Option<String>,
}

impl Config {
    /// Resolve the project directory and load its layered configuration.
    pub fn new(project_dir: PathBuf) -> Result<Self> {
        let project_dir = project_dir
            .canonicalize()
            .context("Failed to resolve project directory")?;
        let shipit_dir = project_dir.join(SHIPIT_DIR);
        let (toml, source) = ShipitToml::load_layered(&project_dir)?;

        Ok(Self {
            project_dir,
            shipit_dir,
            toml,
            source,
            verbose: false,
            yes: false,
            cli_log_height: None,
            cli_build_cmd: None,
        })
    }

    /// Create Config with CLI overrides.
    pub fn with_cli_args(
        project_dir: PathBuf,
        verbose: bool,
        yes: bool,
        log_height: Option<usize>,
        build_cmd: Option<String>,
    ) -> Result<Self> {
        let mut config = Self::new(project_dir)?;
        config.verbose = verbose;
        config.yes = yes;
        config.cli_log_height = log_height;
        config.cli_build_cmd = build_cmd;
        Ok(config)
    }

    /// Project display name (file → directory name).
    pub fn project_name(&self) -> String {
        self.toml.project.name.clone().unwrap_or_else(|| {
            self.project_dir
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "project".to_string())
        })
    }

    /// Panel height (CLI → SHIPIT_LOG_HEIGHT → file → default).
    pub fn log_height(&self) -> usize {
        self.cli_log_height
            .or_else(|| {
                std::env::var("SHIPIT_LOG_HEIGHT")
                    .ok()
                    .and_then(|v| v.trim().parse().ok())
            })
            .unwrap_or(self.toml.display.log_height)
            .max(1)
    }

    /// Explicit build command (CLI → SHIPIT_BUILD_CMD → file), if any.
    pub fn build_cmd_override(&self) -> Option<String> {
        self.cli_build_cmd
            .clone()
            .or_else(|| {
                std::env::var("SHIPIT_BUILD_CMD")
                    .ok()
                    .filter(|v| !v.trim().is_empty())
            })
            .or_else(|| self.toml.build.command.clone())
    }

    pub fn output_policy(&self) -> OutputPolicy {
        self.toml.display.output_policy()
    }

    /// Absolute path of a project-relative setting.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.project_dir.join(path)
        }
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.resolve(&self.toml.project.manifest)
    }

    pub fn config_path(&self) -> PathBuf {
        self.shipit_dir.join(CONFIG_FILE)
    }

    pub fn log_file(&self) -> Option<PathBuf> {
        self.toml.logging.file.as_ref().map(|f| self.resolve(f))
    }
}
