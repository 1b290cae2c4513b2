//! Release metadata rendered from a template before tagging.

use crate::config::MetadataSection;
use anyhow::{Context, Result, bail};
use std::path::{Path, PathBuf};

/// Writes version-specific files before a release.
pub trait Scaffolder {
    /// Render for `version`. `Ok(false)` means there was nothing to render.
    fn generate(&self, version: &str) -> Result<bool>;
}

/// Renders a metadata template (by default `.zenodo.template.json`) into its
/// output file, replacing the placeholder with the release version.
#[derive(Debug, Clone)]
pub struct MetadataScaffolder {
    template: PathBuf,
    output: PathBuf,
    placeholder: String,
}

impl MetadataScaffolder {
    pub fn new(template: PathBuf, output: PathBuf, placeholder: impl Into<String>) -> Self {
        Self {
            template,
            output,
            placeholder: placeholder.into(),
        }
    }

    /// Build from the `[metadata]` section, resolving paths against `project_dir`.
    pub fn from_config(section: &MetadataSection, project_dir: &Path) -> Self {
        Self::new(
            project_dir.join(&section.template),
            project_dir.join(&section.output),
            section.placeholder.clone(),
        )
    }
}

impl Scaffolder for MetadataScaffolder {
    fn generate(&self, version: &str) -> Result<bool> {
        if !self.template.exists() {
            tracing::debug!(template = %self.template.display(), "no metadata template, skipping");
            return Ok(false);
        }

        if self.placeholder.is_empty() {
            bail!(
                "Metadata placeholder is empty; refusing to render {}",
                self.template.display()
            );
        }

        let content = std::fs::read_to_string(&self.template).with_context(|| {
            format!("Failed to read metadata template: {}", self.template.display())
        })?;
        let rendered = content.replace(&self.placeholder, version);

        if self
            .output
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
            && let Err(err) = serde_json::from_str::<serde_json::Value>(&rendered)
        {
            tracing::warn!(
                output = %self.output.display(),
                error = %err,
                "rendered metadata is not valid JSON"
            );
        }

        std::fs::write(&self.output, rendered)
            .with_context(|| format!("Failed to write metadata: {}", self.output.display()))?;
        tracing::info!(output = %self.output.display(), version, "metadata rendered");
        Ok(true)
    }
}
